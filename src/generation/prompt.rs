//! Prompt composition for grounded chat answers

use crate::types::chat::ChatTurn;
use crate::types::document::RetrievedPassage;

/// Marker inserted when retrieval produced nothing, so the model is told
/// explicitly that no supporting knowledge exists instead of being left to
/// fabricate some.
pub const NO_KNOWLEDGE_MARKER: &str = "No relevant knowledge found.";

/// Canned reply for bare greetings, returned without touching retrieval or
/// any generation backend.
pub const GREETING_REPLY: &str = "Hey! I'm ChatBot, here to assist you. How can I help today?";

const GREETINGS: &[&str] = &["hello", "hi", "hey", "welcome", "greetings", "howdy", "hiya"];

/// Whether the message is a bare greeting.
///
/// Matching is whole-message: trim, lowercase, strip trailing punctuation,
/// then compare against the greeting set. "hello there, what is X?" is a
/// real query, not a greeting.
pub fn is_greeting(message: &str) -> bool {
    let normalized = message
        .trim()
        .trim_end_matches(['!', '.', '?', ','])
        .to_lowercase();
    GREETINGS.contains(&normalized.as_str())
}

/// Prompt builder for grounded answers
pub struct PromptBuilder;

impl PromptBuilder {
    /// Compose the grounding prompt from the user message, the prior turns,
    /// and the retrieved passages. Pure string assembly, no I/O.
    pub fn compose(message: &str, history: &[ChatTurn], passages: &[RetrievedPassage]) -> String {
        let mut prompt = String::new();

        prompt.push_str(
            "You are an assistant that answers questions about an uploaded document.\n\n",
        );

        prompt.push_str("RULES:\n");
        prompt.push_str("1. Base every statement strictly on the knowledge below.\n");
        prompt.push_str(
            "2. If the answer is not present in the knowledge, say so explicitly instead of guessing.\n",
        );
        prompt.push_str("3. Never use external sources, assumptions, or personal opinions.\n");
        prompt.push_str("4. Keep the tone natural, informative, and concise.\n\n");

        prompt.push_str("CONVERSATION HISTORY:\n");
        prompt.push_str(&Self::format_history(history));
        prompt.push_str("\n\n");

        prompt.push_str("KNOWLEDGE:\n");
        prompt.push_str(&Self::format_knowledge(passages));
        prompt.push_str("\n\n");

        prompt.push_str("QUESTION: ");
        prompt.push_str(message);
        prompt.push_str("\n\nAnswer:");

        prompt
    }

    fn format_history(history: &[ChatTurn]) -> String {
        if history.is_empty() {
            return "No prior history available.".to_string();
        }

        history
            .iter()
            .map(|turn| format!("{}: {}", turn.role.label(), turn.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_knowledge(passages: &[RetrievedPassage]) -> String {
        if passages.is_empty() {
            return NO_KNOWLEDGE_MARKER.to_string();
        }

        passages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(text: &str) -> RetrievedPassage {
        RetrievedPassage {
            text: text.to_string(),
            score: 0.9,
        }
    }

    #[test]
    fn empty_knowledge_uses_marker() {
        let prompt = PromptBuilder::compose("what is the warranty period?", &[], &[]);
        assert!(prompt.contains(NO_KNOWLEDGE_MARKER));
    }

    #[test]
    fn passages_joined_with_blank_lines() {
        let prompt = PromptBuilder::compose(
            "question",
            &[],
            &[passage("first passage"), passage("second passage")],
        );
        assert!(prompt.contains("first passage\n\nsecond passage"));
        assert!(!prompt.contains(NO_KNOWLEDGE_MARKER));
    }

    #[test]
    fn history_renders_role_labels() {
        let history = vec![
            ChatTurn::user("what is this about?"),
            ChatTurn::assistant("it covers warranty terms"),
        ];
        let prompt = PromptBuilder::compose("and the duration?", &history, &[]);
        assert!(prompt.contains("User: what is this about?"));
        assert!(prompt.contains("Assistant: it covers warranty terms"));
    }

    #[test]
    fn missing_history_is_marked() {
        let prompt = PromptBuilder::compose("question", &[], &[]);
        assert!(prompt.contains("No prior history available."));
    }

    #[test]
    fn question_is_included_verbatim() {
        let prompt = PromptBuilder::compose("what is clause 4.2?", &[], &[passage("text")]);
        assert!(prompt.contains("QUESTION: what is clause 4.2?"));
    }

    #[test]
    fn greetings_match_case_insensitively() {
        assert!(is_greeting("hello"));
        assert!(is_greeting("Hi"));
        assert!(is_greeting("HEY"));
        assert!(is_greeting("welcome"));
        assert!(is_greeting("  hello!  "));
        assert!(is_greeting("Howdy."));
    }

    #[test]
    fn real_queries_are_not_greetings() {
        assert!(!is_greeting("hello there, what is the warranty period?"));
        assert!(!is_greeting("what does hi mean in this document?"));
        assert!(!is_greeting(""));
    }
}
