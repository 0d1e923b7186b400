// Prompt fragments for the CV chat. Every fragment names the CV subject,
// which comes from configuration.

/// Substring present in the composed prompt whenever no CV snippets were retrieved.
pub const NO_MATCHES_DISCLAIMER: &str = "No relevant examples were found";

/// Opening line of every composed prompt.
pub fn context_preamble(subject: &str) -> String {
    format!("Relevant information from {subject}'s CV:\n\n")
}

/// Replaces the Q/A blocks when retrieval produced nothing.
pub fn no_matches_fallback(subject: &str) -> String {
    format!(
        "{NO_MATCHES_DISCLAIMER} in {subject}'s CV. \
        Answer from general knowledge about {subject}, \
        and state clearly that no specific CV information was found for this question.\n\n"
    )
}

/// One retrieved record, rendered as a context block.
pub fn qa_block(question: &str, answer: &str) -> String {
    format!("Q: {question}\nA: {answer}\n\n")
}

/// Closing line of every composed prompt.
pub fn question_suffix(question: &str) -> String {
    format!("Question: {question}\nAnswer:")
}

/// System turn placed ahead of every conversation.
pub fn system_instruction(subject: &str) -> String {
    format!(
        "You are an assistant that answers questions about {subject}'s professional background. \
        Only use the information from {subject}'s CV provided in the conversation. \
        If the information is not available, say so plainly instead of guessing. \
        Keep answers concise and professional."
    )
}
