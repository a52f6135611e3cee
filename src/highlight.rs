/// Best-effort guess of a snippet's language, used as a highlighting hint.
/// Ambiguous snippets can be misclassified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LanguageHint {
    Python,
    Java,
    JavaScript,
}

impl LanguageHint {
    pub fn sniff(snippet: &str) -> Self {
        if snippet.contains("def") || snippet.contains("range") {
            LanguageHint::Python
        } else if snippet.contains("System.") || snippet.contains("public static") {
            LanguageHint::Java
        } else {
            LanguageHint::JavaScript
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Difficulty};

    #[test]
    fn test_sniff_python() {
        assert_eq!(LanguageHint::sniff("for i in range(10):"), LanguageHint::Python);
        assert_eq!(LanguageHint::sniff("def greet():"), LanguageHint::Python);
    }

    #[test]
    fn test_sniff_java() {
        assert_eq!(
            LanguageHint::sniff("System.out.println(\"Hello, World!\");"),
            LanguageHint::Java
        );
        assert_eq!(
            LanguageHint::sniff("public static void main(String[] args) { }"),
            LanguageHint::Java
        );
    }

    #[test]
    fn test_sniff_falls_back_to_javascript() {
        assert_eq!(LanguageHint::sniff("let x = 10;"), LanguageHint::JavaScript);
        assert_eq!(LanguageHint::sniff(""), LanguageHint::JavaScript);
    }

    #[test]
    fn test_python_keywords_win_over_java() {
        // substring match, not a parse
        assert_eq!(LanguageHint::sniff("System.undefined()"), LanguageHint::Python);
    }

    #[test]
    fn test_hints_for_embedded_medium_snippets() {
        let catalog = Catalog::embedded();
        let hints: Vec<_> = catalog
            .snippets(Difficulty::Medium)
            .iter()
            .map(|s| LanguageHint::sniff(s))
            .collect();
        assert_eq!(
            hints,
            vec![
                LanguageHint::JavaScript,
                LanguageHint::JavaScript,
                LanguageHint::Java,
                LanguageHint::JavaScript,
                LanguageHint::Java,
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(LanguageHint::JavaScript.to_string(), "javascript");
    }
}
