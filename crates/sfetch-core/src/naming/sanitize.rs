//! Scene object name legalization.

/// Fallback object name when nothing legal is left.
pub const DEFAULT_OBJECT_NAME: &str = "obj";

/// Makes `name` usable as a scene object name.
///
/// - Characters outside `[A-Za-z0-9_+.-]` become `_`
/// - Runs of `_` collapse to one
/// - Leading/trailing `_` and `.` are trimmed
/// - An empty result becomes [`DEFAULT_OBJECT_NAME`]
pub fn legalize_object_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.trim().chars() {
        let legal = c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.');
        if legal {
            out.push(c);
            prev_underscore = false;
        } else if !prev_underscore {
            out.push('_');
            prev_underscore = true;
        }
    }

    let trimmed = out.trim_matches(|c| c == '_' || c == '.');
    if trimmed.is_empty() {
        DEFAULT_OBJECT_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
