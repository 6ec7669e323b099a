//! Folding document context into the prompt.

/// Merges a question and the optional document text into the prompt that
/// is sent to the model.
///
/// Empty document text counts as no document at all. The text is appended
/// as-is on the line after the question, nothing is truncated.
pub fn compose(question: &str, document_text: Option<&str>) -> String {
    match document_text.filter(|text| !text.is_empty()) {
        Some(text) => format!("{question}\n{text}"),
        None => question.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_document() {
        assert_eq!(compose("What is up?", None), "What is up?");
        assert_eq!(compose("What is up?", Some("")), "What is up?");
    }

    #[test]
    fn test_with_document() {
        assert_eq!(
            compose(
                "When is the deadline?",
                Some("Project X deadline is Friday.")
            ),
            "When is the deadline?\nProject X deadline is Friday."
        );
        // Whitespace is content, only the empty string means "absent".
        assert_eq!(compose("Q", Some("\n")), "Q\n\n");
    }
}
