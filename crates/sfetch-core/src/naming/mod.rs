//! Local file names and scene object names.
//!
//! Saved structures are named after the last segment of the URL they came
//! from; scene objects after the code (or a caller-supplied name), made legal.

mod path;
mod sanitize;

pub use path::file_name_from_url;
pub use sanitize::{legalize_object_name, DEFAULT_OBJECT_NAME};

/// Object name for a fetched code before legalization.
///
/// A non-blank caller-supplied name wins; otherwise the code itself is used.
pub fn object_name(code: &str, requested: Option<&str>) -> String {
    match requested.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_code() {
        assert_eq!(object_name("Q5VSL9", None), "Q5VSL9");
        assert_eq!(object_name("Q5VSL9", Some("  ")), "Q5VSL9");
    }

    #[test]
    fn requested_name_wins() {
        assert_eq!(object_name("Q5VSL9", Some(" kinase ")), "kinase");
    }
}
