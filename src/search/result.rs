use serde::{Deserialize, Serialize};

/// One ranked completion: a primary translation plus its near-duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Candidate string expected to start with the typed prefix
    pub english_search: String,
    /// Display text of the translation, never prefix-matched
    pub original_translation_string: String,
    /// Alternatives in the order the engine ranked them
    pub similar: Vec<SimilarEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarEntry {
    pub english: String,
    pub toki_pona_string: String,
}

/// Parse the engine's serialized result list.
///
/// Unknown fields are ignored. An empty array is a valid zero-result answer;
/// anything that is not an array of results is an error.
pub fn parse_results(json: &str) -> serde_json::Result<Vec<SearchResult>> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_format() {
        let json = r#"[{"english_search":"mi (subject)","original_translation_string":"mi","similar":[{"english":"I","toki_pona_string":"mi"}]}]"#;
        let results = parse_results(json).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].english_search, "mi (subject)");
        assert_eq!(results[0].original_translation_string, "mi");
        assert_eq!(
            results[0].similar,
            vec![SimilarEntry {
                english: "I".to_string(),
                toki_pona_string: "mi".to_string(),
            }]
        );
    }

    #[test]
    fn test_extra_engine_fields_are_ignored() {
        let json = r#"[{
            "english_search": "menu",
            "entry_english": "menu",
            "entry_weight": 50,
            "original_translation_string": "lipu moku",
            "similar": [{"english": "book", "toki_pona_len": 1, "toki_pona_string": "lipu", "dist": 1}]
        }]"#;
        let results = parse_results(json).unwrap();
        assert_eq!(results[0].similar[0].toki_pona_string, "lipu");
    }

    #[test]
    fn test_empty_array_is_zero_results() {
        assert!(parse_results("[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_payloads_fail() {
        assert!(parse_results("").is_err());
        assert!(parse_results("[{").is_err());
        assert!(parse_results("null").is_err());
        assert!(parse_results(r#"{"english_search":"a"}"#).is_err());
        assert!(
            parse_results(r#"[{"english_search":"a","original_translation_string":"b"}]"#)
                .is_err()
        );
    }
}
