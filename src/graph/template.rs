//! Template expansion for graph files.
//!
//! Supports `{{NAME}}` syntax. Unknown names, and forms with whitespace
//! inside the braces such as `{{ CYCLE_INTERVAL }}`, are left as-is so the
//! scheduler's own Jinja2 pass still sees them.

use std::collections::HashMap;

/// Expand `{{NAME}}` patterns in a template string.
///
/// Resolution: looks up each `{{name}}` in `vars`. If found, replaces with
/// the value. If not found, leaves the `{{name}}` literal in the output.
/// Substituted values are not scanned again.
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn expand_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        result.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];

        if let Some(close) = after_open.find("}}") {
            let var_name = &after_open[..close];
            // Only match if the variable name contains no whitespace
            if !var_name.is_empty() && !var_name.contains(char::is_whitespace) {
                if let Some(value) = vars.get(var_name) {
                    result.push_str(value);
                } else {
                    result.push_str(&rest[open..open + 2 + close + 2]);
                }
                rest = &after_open[close + 2..];
                continue;
            }
        }

        // No closing `}}` or whitespace in name: emit literal `{{`
        result.push_str("{{");
        rest = after_open;
    }

    result.push_str(rest);
    result
}
