/// System role for every summary request.
pub const SYSTEM_PROMPT: &str = "You are a healthcare policy expert.";

/// Build the system prompt for summarization.
pub fn build_system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// Build the user prompt for a corpus from the authority named by `source_label`.
pub fn build_summary_prompt(corpus: &str, source_label: &str) -> String {
    format!(
        "{SYSTEM_PROMPT} Summarise and analyse the following {source_label} guidance document:\n\n{corpus}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summary_prompt_format() {
        let prompt = build_summary_prompt("Recommendations...", "NICE");
        assert_eq!(
            prompt,
            "You are a healthcare policy expert. Summarise and analyse the following NICE guidance document:\n\nRecommendations..."
        );
    }

    #[test]
    fn test_corpus_is_passed_verbatim() {
        let corpus = "Beschluss\n\n  Tragende Gründe ";
        let prompt = build_summary_prompt(corpus, "G-BA");
        assert!(prompt.ends_with(corpus));
        assert!(prompt.contains("following G-BA guidance"));
    }

    #[test]
    fn test_system_prompt() {
        assert_eq!(build_system_prompt(), "You are a healthcare policy expert.");
    }
}
