//! Per-role segment formatters.
//!
//! Each formatter returns one self-contained segment: the role's open
//! marker, its body, and its close marker. System and user content is
//! inserted verbatim. Assistant content is trimmed only when the profile
//! sets [`trim_assistant_content`](TemplateProfile::trim_assistant_content).

use crate::profile::{DefaultSystem, RoleMarkers, TemplateProfile};
use crate::{Message, Role};

use super::thinking::{self, ThinkingMode};

fn push_content(segment: &mut String, markers: &RoleMarkers, content: &str) {
    if !content.is_empty() {
        segment.push_str(&markers.content_prefix);
        segment.push_str(content);
    }
}

fn plain_segment(markers: &RoleMarkers, content: &str) -> String {
    let mut segment =
        String::with_capacity(markers.open.len() + content.len() + markers.close.len());
    segment.push_str(&markers.open);
    push_content(&mut segment, markers, content);
    segment.push_str(&markers.close);
    segment
}

pub fn system_segment(profile: &TemplateProfile, content: &str) -> String {
    plain_segment(&profile.system, content)
}

pub fn user_segment(profile: &TemplateProfile, content: &str) -> String {
    plain_segment(&profile.user, content)
}

/// Assistant segment: reasoning block (if the thinking formatter emits one),
/// then visible content. Either part may be missing.
pub fn assistant_segment(
    profile: &TemplateProfile,
    message: &Message,
    mode: ThinkingMode,
) -> String {
    let markers = &profile.assistant;
    let mut segment = String::from(markers.open.as_str());
    let reasoning = message.reasoning_content.as_deref();
    if let Some(block) = thinking::reasoning_block(&profile.thinking, mode, reasoning) {
        segment.push_str(&block);
    }
    if let Some(content) = message.content.as_deref() {
        let content = if profile.trim_assistant_content {
            content.trim()
        } else {
            content
        };
        push_content(&mut segment, markers, content);
    }
    segment.push_str(&markers.close);
    segment
}

/// Dispatch one message to its role's formatter.
///
/// System and user content is checked by the renderer before any formatting
/// starts, so an absent value here can only mean the message was validated.
pub fn format_message(profile: &TemplateProfile, message: &Message, mode: ThinkingMode) -> String {
    let content = message.content.as_deref().unwrap_or_default();
    match message.role {
        Role::System => system_segment(profile, content),
        Role::User => user_segment(profile, content),
        Role::Assistant => assistant_segment(profile, message, mode),
    }
}

/// The substituted system segment, when the profile asks for one and the
/// conversation has no leading system message.
///
/// Empty conversations get nothing: they render as the bare preamble.
pub fn default_system_segment(profile: &TemplateProfile, messages: &[Message]) -> Option<String> {
    let first = messages.first()?;
    if first.role == Role::System {
        return None;
    }
    match &profile.default_system {
        DefaultSystem::Omit => None,
        DefaultSystem::Substitute(text) => Some(system_segment(profile, text)),
    }
}
