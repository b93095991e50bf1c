//! Thinking-block formatting.
//!
//! Whether a reasoning block appears depends only on three things: the
//! render-wide [`ThinkingMode`], the message's `reasoning_content`
//! (absent, empty, or text), and whether the block is the generation
//! prompt's marker. No other message field is consulted.

use crate::profile::{GenerationThinking, TemplateProfile, ThinkingMarkers};

/// Render-wide thinking switch, taken from
/// [`RenderOptions::enable_thinking`](crate::RenderOptions::enable_thinking).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThinkingMode {
    Enabled,
    Disabled,
}

impl From<bool> for ThinkingMode {
    fn from(enabled: bool) -> Self {
        if enabled {
            ThinkingMode::Enabled
        } else {
            ThinkingMode::Disabled
        }
    }
}

/// The reasoning block for one assistant message, if any.
///
/// Disabled mode suppresses reasoning no matter what it contains. Enabled
/// mode wraps it when present, so `Some("")` yields an empty block and
/// `None` yields nothing.
pub fn reasoning_block(
    markers: &ThinkingMarkers,
    mode: ThinkingMode,
    reasoning: Option<&str>,
) -> Option<String> {
    match (mode, reasoning) {
        (ThinkingMode::Disabled, _) | (ThinkingMode::Enabled, None) => None,
        (ThinkingMode::Enabled, Some(text)) => {
            let mut block =
                String::with_capacity(markers.open.len() + text.len() + markers.close.len());
            block.push_str(&markers.open);
            block.push_str(text);
            block.push_str(&markers.close);
            Some(block)
        }
    }
}

/// Marker appended right after the generation prompt.
pub fn generation_marker(profile: &TemplateProfile, mode: ThinkingMode) -> String {
    let markers = &profile.thinking;
    match (profile.generation_thinking, mode) {
        (GenerationThinking::ForceOpen, ThinkingMode::Enabled) => markers.open.clone(),
        (GenerationThinking::CloseWhenDisabled, ThinkingMode::Disabled) => {
            format!("{}{}", markers.open, markers.close)
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ON: ThinkingMode = ThinkingMode::Enabled;
    const OFF: ThinkingMode = ThinkingMode::Disabled;

    fn markers() -> ThinkingMarkers {
        ThinkingMarkers {
            open: "<think>".into(),
            close: "</think>".into(),
        }
    }

    #[test]
    fn enabled_wraps_present_reasoning() {
        let block = reasoning_block(&markers(), ON, Some("2+2=4"));
        assert_eq!(block.as_deref(), Some("<think>2+2=4</think>"));
    }

    #[test]
    fn enabled_empty_reasoning_is_an_empty_block() {
        let block = reasoning_block(&markers(), ON, Some(""));
        assert_eq!(block.as_deref(), Some("<think></think>"));
    }

    #[test]
    fn enabled_absent_reasoning_emits_nothing() {
        assert!(reasoning_block(&markers(), ON, None).is_none());
    }

    #[test]
    fn disabled_suppresses_everything() {
        let m = markers();
        assert!(reasoning_block(&m, OFF, Some("secret")).is_none());
        assert!(reasoning_block(&m, OFF, Some("")).is_none());
        assert!(reasoning_block(&m, OFF, None).is_none());
    }

    #[test]
    fn generation_marker_policies() {
        let force = TemplateProfile::glm45();
        assert_eq!(generation_marker(&force, ON), "\n<think>");
        assert_eq!(generation_marker(&force, OFF), "");

        let close = TemplateProfile::glm45()
            .with_generation_thinking(GenerationThinking::CloseWhenDisabled);
        assert_eq!(generation_marker(&close, ON), "");
        assert_eq!(generation_marker(&close, OFF), "\n<think></think>");

        let off = TemplateProfile::glm45().with_generation_thinking(GenerationThinking::Off);
        assert_eq!(generation_marker(&off, ON), "");
        assert_eq!(generation_marker(&off, OFF), "");
    }

    #[test]
    fn mode_from_bool() {
        assert_eq!(ThinkingMode::from(true), ThinkingMode::Enabled);
        assert_eq!(ThinkingMode::from(false), ThinkingMode::Disabled);
    }
}
