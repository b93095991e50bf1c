//! Continuation mode: leave the final assistant message open.
//!
//! The final message is formatted with its trailing whitespace removed
//! ([`trim_trailing_whitespace`]), then [`open_final_segment`] drops the
//! assistant close delimiter from the end of the output. The prompt thus
//! ends on the last visible character a model should continue from.

use tracing::trace;

use crate::{Message, RenderError, Role};

/// Check that `messages` can be continued.
pub fn check_target(messages: &[Message]) -> Result<(), RenderError> {
    match messages.last() {
        None => Err(RenderError::NoMessages),
        Some(last) if last.role != Role::Assistant => {
            Err(RenderError::LastMessageNotAssistant { role: last.role })
        }
        Some(_) => Ok(()),
    }
}

/// Copy of `message` with trailing whitespace removed from its content.
///
/// Reasoning is left untouched.
pub fn trim_trailing_whitespace(message: &Message) -> Message {
    let mut trimmed = message.clone();
    if let Some(content) = trimmed.content.as_mut() {
        let keep = content.trim_end().len();
        content.truncate(keep);
    }
    trimmed
}

/// Strip the closing delimiter of `final_segment` from the end of `rendered`.
///
/// `final_segment` must be the last thing pushed into `rendered`.
pub fn open_final_segment(mut rendered: String, final_segment: &str, close: &str) -> String {
    debug_assert!(rendered.ends_with(final_segment));
    if close.is_empty() || !final_segment.ends_with(close) {
        return rendered;
    }
    if let Some(keep) = rendered.strip_suffix(close).map(str::len) {
        trace!("Continuation: dropped {} trailing bytes", close.len());
        rendered.truncate(keep);
    }
    rendered
}

/// Reopen a thinking block that ends the prompt, so the model continues
/// reasoning instead of answering.
pub fn reopen_thinking(mut rendered: String, thinking_close: &str) -> String {
    if thinking_close.is_empty() {
        return rendered;
    }
    if let Some(keep) = rendered.strip_suffix(thinking_close).map(str::len) {
        rendered.truncate(keep);
    }
    rendered
}
