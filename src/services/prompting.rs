//! Prompt augmentation

/// Prefix `user_prompt` with retrieved context.
///
/// A blank context leaves the prompt untouched so generation falls back to
/// an ungrounded answer.
pub fn build_prompt(user_prompt: &str, context: &str) -> String {
    if context.trim().is_empty() {
        return user_prompt.to_string();
    }
    format!("Context:\n{context}\n\nUser question: {user_prompt}")
}
