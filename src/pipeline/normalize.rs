use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static CITATION_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\d+\]").unwrap());
// Greedy: from the first '(' to the last ')' on the line.
static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*\)").unwrap());

/// Clean one raw listing cell. `None` when nothing is left.
pub fn normalize_name(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    let without_citations = CITATION_MARKER.replace_all(raw, "");
    let cleaned = PARENTHETICAL.replace_all(&without_citations, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

pub fn normalize_names(raw: &[String]) -> Vec<String> {
    let names: Vec<String> = raw.iter().filter_map(|r| normalize_name(r)).collect();
    debug!(
        "Normalized {} raw cells into {} names ({} dropped)",
        raw.len(),
        names.len(),
        raw.len() - names.len()
    );
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citation_and_parenthetical_removed() {
        assert_eq!(
            normalize_name("Test Airport [1](City)").as_deref(),
            Some("Test Airport")
        );
    }

    #[test]
    fn test_parenthetical_suffix_stripped() {
        assert_eq!(
            normalize_name("El Arish International Airport (El Arish)\n").as_deref(),
            Some("El Arish International Airport")
        );
        assert_eq!(
            normalize_name("Aarhus Airport (Tirstrup) (closed)").as_deref(),
            Some("Aarhus Airport")
        );
    }

    #[test]
    fn test_all_citation_markers_removed() {
        assert_eq!(
            normalize_name("Arrabury Airport[2][13]").as_deref(),
            Some("Arrabury Airport")
        );
    }

    #[test]
    fn test_empty_inputs_dropped() {
        let raw = vec![
            "".to_string(),
            "   \n".to_string(),
            "(formerly Idlewild)".to_string(),
            "[1]".to_string(),
            "Anaa Airport".to_string(),
        ];
        assert_eq!(normalize_names(&raw), vec!["Anaa Airport".to_string()]);
    }

    #[test]
    fn test_duplicates_preserved() {
        let raw = vec!["Anaa Airport".to_string(), "Anaa Airport[1]".to_string()];
        assert_eq!(normalize_names(&raw).len(), 2);
    }
}
