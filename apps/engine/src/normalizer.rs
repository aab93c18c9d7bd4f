//! Raw document text cleanup ahead of extraction.

/// Collapses every whitespace run to a single space and trims the ends.
///
/// Total over any input (including empty) and idempotent.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_runs() {
        assert_eq!(
            normalize("  Senior\tRust   Engineer \n\n Core  Infra "),
            "Senior Rust Engineer Core Infra"
        );
    }

    #[test]
    fn test_empty_and_blank_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t  "), "");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize("SKILLS:\n  Python,  Go\n\nEXPERIENCE");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_already_clean_input_unchanged() {
        assert_eq!(normalize("Python, Go, SQL"), "Python, Go, SQL");
    }
}
