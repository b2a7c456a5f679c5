//! Local file name from a download URL.

/// Returns the last non-empty path segment of `url`, ignoring query and fragment.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn file_name_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphafold_model_url() {
        assert_eq!(
            file_name_from_url("https://alphafold.ebi.ac.uk/files/AF-Q5VSL9-F1-model_v4.cif")
                .as_deref(),
            Some("AF-Q5VSL9-F1-model_v4.cif")
        );
    }

    #[test]
    fn esm_url_with_query() {
        assert_eq!(
            file_name_from_url(
                "https://api.esmatlas.com/fetchPredictedStructure/MGYP000911143359.pdb?x=1"
            )
            .as_deref(),
            Some("MGYP000911143359.pdb")
        );
    }

    #[test]
    fn root_or_unparseable() {
        assert_eq!(file_name_from_url("https://example.com/"), None);
        assert_eq!(file_name_from_url("https://example.com"), None);
        assert_eq!(file_name_from_url("not a url"), None);
    }
}
