//! Short-code field selectors attached to query terms (`build|pu,lo`).
//!
//! The table is fixed; adding a code is a code change.

/// Short code to canonical backend field name.
pub const FIELD_SELECTORS: &[(&str, &str)] = &[
    ("pu", "publisher"),
    ("lo", "location"),
    ("su", "summary"),
    ("cp", "cpvdesc"),
    ("ti", "reftitleshort"),
    ("aw", "awardedtofirstlines"),
    ("rl", "procedurelanguagescodes"),
];

/// Map one short code to its backend field. Codes are trimmed and matched
/// case-insensitively; unknown codes return `None`.
pub fn map_short_code(code: &str) -> Option<&'static str> {
    let code = code.trim();
    FIELD_SELECTORS
        .iter()
        .find(|(short, _)| short.eq_ignore_ascii_case(code))
        .map(|(_, field)| *field)
}

/// Resolve a term's selectors to the fields it should match against.
///
/// Unknown codes are dropped and duplicates collapsed (first occurrence wins).
/// When no selectors are given, or none of them resolve, the default fields
/// are returned.
pub fn resolve_fields<S: AsRef<str>>(
    selectors: Option<&[String]>,
    default_fields: &[S],
) -> Vec<String> {
    let defaults = || -> Vec<String> {
        default_fields
            .iter()
            .map(|f| f.as_ref().to_string())
            .collect()
    };

    let Some(selectors) = selectors.filter(|s| !s.is_empty()) else {
        return defaults();
    };

    let mut mapped: Vec<String> = Vec::with_capacity(selectors.len());
    for field in selectors.iter().filter_map(|code| map_short_code(code)) {
        if !mapped.iter().any(|m| m.eq_ignore_ascii_case(field)) {
            mapped.push(field.to_string());
        }
    }

    if mapped.is_empty() {
        defaults()
    } else {
        mapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULTS: &[&str] = &["summary", "reftitleshort"];

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_map_known_codes() {
        assert_eq!(map_short_code("pu"), Some("publisher"));
        assert_eq!(map_short_code("rl"), Some("procedurelanguagescodes"));
        assert_eq!(map_short_code(" TI "), Some("reftitleshort"));
    }

    #[test]
    fn test_map_unknown_code() {
        assert_eq!(map_short_code("xx"), None);
        assert_eq!(map_short_code(""), None);
    }

    #[test]
    fn test_table_has_seven_entries() {
        assert_eq!(FIELD_SELECTORS.len(), 7);
    }

    #[test]
    fn test_resolve_selected_fields() {
        let selectors = codes(&["pu", "lo"]);
        assert_eq!(
            resolve_fields(Some(selectors.as_slice()), DEFAULTS),
            vec!["publisher", "location"]
        );
    }

    #[test]
    fn test_resolve_drops_unknown_codes() {
        let selectors = codes(&["xx", "su"]);
        assert_eq!(resolve_fields(Some(selectors.as_slice()), DEFAULTS), vec!["summary"]);
    }

    #[test]
    fn test_resolve_all_unknown_falls_back() {
        let selectors = codes(&["xx"]);
        assert_eq!(
            resolve_fields(Some(selectors.as_slice()), DEFAULTS),
            vec!["summary", "reftitleshort"]
        );
    }

    #[test]
    fn test_resolve_none_uses_defaults() {
        assert_eq!(
            resolve_fields(None, DEFAULTS),
            vec!["summary", "reftitleshort"]
        );
        assert_eq!(
            resolve_fields(Some(&[] as &[String]), DEFAULTS),
            vec!["summary", "reftitleshort"]
        );
    }

    #[test]
    fn test_resolve_collapses_duplicates() {
        let selectors = codes(&["pu", "PU", "lo", "pu"]);
        assert_eq!(
            resolve_fields(Some(selectors.as_slice()), DEFAULTS),
            vec!["publisher", "location"]
        );
    }
}
