//! The template renderer.
//!
//! [`Renderer`] owns a [`TemplateProfile`] and turns a message slice plus
//! [`RenderOptions`] into a [`RenderedPrompt`]:
//!
//! 1. validate the options and every message;
//! 2. emit the profile preamble, then the default system segment if the
//!    profile asks for one;
//! 3. format each message through its role formatter ([`roles`]), with
//!    reasoning handled by [`thinking`];
//! 4. append the generation prompt, or hand the output to [`continuation`]
//!    to leave the final assistant turn open (its trailing whitespace and
//!    close delimiter removed).
//!
//! A renderer holds no mutable state and can be shared across threads.

pub mod continuation;
pub mod roles;
pub mod thinking;

use std::fmt;

use tracing::{debug, trace};

use crate::profile::TemplateProfile;
use crate::{Message, RenderError, RenderOptions, Role};

use thinking::ThinkingMode;

// ── Output ─────────────────────────────────────────────────────────

/// A finished prompt string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RenderedPrompt(String);

impl RenderedPrompt {
    /// Wrap text that was post-processed by the [`continuation`] helpers.
    pub(crate) fn from_continuation(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RenderedPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RenderedPrompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<RenderedPrompt> for String {
    fn from(prompt: RenderedPrompt) -> Self {
        prompt.0
    }
}

impl PartialEq<str> for RenderedPrompt {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RenderedPrompt {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ── Renderer ───────────────────────────────────────────────────────

/// Renders conversations with one [`TemplateProfile`].
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    profile: TemplateProfile,
}

impl Renderer {
    pub fn new(profile: TemplateProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &TemplateProfile {
        &self.profile
    }

    /// Render `messages` into a prompt string.
    ///
    /// All validation happens before formatting: on error nothing is
    /// produced.
    ///
    /// # Errors
    ///
    /// - [`RenderError::ConfigConflict`] if both the generation prompt and
    ///   continuation are requested.
    /// - [`RenderError::EmptyRoleContent`] if a system or user message has no
    ///   content, or an assistant message has neither content nor reasoning.
    /// - [`RenderError::NoMessages`] / [`RenderError::LastMessageNotAssistant`]
    ///   if continuation is requested without an assistant message to continue.
    pub fn render(
        &self,
        messages: &[Message],
        options: &RenderOptions,
    ) -> Result<RenderedPrompt, RenderError> {
        options.validate()?;
        validate_messages(messages)?;
        if options.continue_final_message {
            continuation::check_target(messages)?;
        }

        let profile = &self.profile;
        let mode = ThinkingMode::from(options.enable_thinking);

        let mut out = String::with_capacity(estimate_capacity(profile, messages));
        out.push_str(&profile.preamble);
        if let Some(segment) = roles::default_system_segment(profile, messages) {
            trace!("Substituting default system segment");
            out.push_str(&segment);
        }

        let last = messages.len().saturating_sub(1);
        let mut final_segment = String::new();
        for (index, message) in messages.iter().enumerate() {
            let segment = if options.continue_final_message && index == last {
                let open = continuation::trim_trailing_whitespace(message);
                roles::format_message(profile, &open, mode)
            } else {
                roles::format_message(profile, message, mode)
            };
            out.push_str(&segment);
            final_segment = segment;
        }

        if options.continue_final_message {
            out = continuation::open_final_segment(out, &final_segment, &profile.assistant.close);
        } else if options.add_generation_prompt {
            out.push_str(&profile.generation_prompt);
            out.push_str(&thinking::generation_marker(profile, mode));
        }

        debug!(
            "Rendered prompt: profile={}, messages={}, bytes={}, generation_prompt={}, thinking={}, continue={}",
            profile.name,
            messages.len(),
            out.len(),
            options.add_generation_prompt,
            options.enable_thinking,
            options.continue_final_message,
        );
        Ok(RenderedPrompt(out))
    }
}

/// Check every message's required fields.
fn validate_messages(messages: &[Message]) -> Result<(), RenderError> {
    for (index, message) in messages.iter().enumerate() {
        let missing = match message.role {
            Role::System | Role::User => message.content.is_none(),
            Role::Assistant => message.content.is_none() && message.reasoning_content.is_none(),
        };
        if missing {
            return Err(RenderError::EmptyRoleContent {
                role: message.role,
                index,
            });
        }
    }
    Ok(())
}

fn estimate_capacity(profile: &TemplateProfile, messages: &[Message]) -> usize {
    let markers = messages
        .iter()
        .map(|m| {
            let r = profile.markers(m.role);
            r.open.len() + r.content_prefix.len() + r.close.len()
        })
        .sum::<usize>();
    let text = messages
        .iter()
        .map(|m| {
            m.content.as_ref().map_or(0, String::len)
                + m.reasoning_content.as_ref().map_or(0, String::len)
                + profile.thinking.open.len()
                + profile.thinking.close.len()
        })
        .sum::<usize>();
    profile.preamble.len() + markers + text + profile.generation_prompt.len() + 16
}
