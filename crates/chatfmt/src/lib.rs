//! Deterministic chat-template rendering for language-model prompts.
//!
//! `chatfmt` turns a structured conversation plus a handful of rendering
//! options into the exact prompt string a model expects. Rendering is a pure
//! function: the same [`Message`] slice and [`RenderOptions`] always produce the
//! same bytes, and every input problem is reported before any output exists.
//!
//! Model-specific constants (preamble, role markers, thinking delimiters,
//! generation marker) live in a [`TemplateProfile`]. Two profiles ship
//! built in (`glm45` and `chatml`) and custom ones load from JSON.
//!
//! # Getting started
//!
//! ```
//! use chatfmt::prelude::*;
//!
//! let renderer = Renderer::new(TemplateProfile::glm45());
//! let messages = vec![
//!     Message::system("You are a helpful assistant."),
//!     Message::user("Hello!"),
//! ];
//! let options = RenderOptions::new().with_generation_prompt(true);
//!
//! let prompt = renderer.render(&messages, &options).unwrap();
//! assert_eq!(
//!     prompt.as_str(),
//!     "[gMASK]<sop><|system|>\nYou are a helpful assistant.<|user|>\nHello!<|assistant|>"
//! );
//! ```
//!
//! # Where to find things
//!
//! - **Render a conversation:** [`Renderer::render`](render::Renderer::render),
//!   or the [`render()`] shortcut for the default profile.
//! - **Describe a model's markers:** [`TemplateProfile`](profile::TemplateProfile)
//!   and its [`RoleMarkers`](profile::RoleMarkers) /
//!   [`ThinkingMarkers`](profile::ThinkingMarkers).
//! - **Build conversations fluently, with prefill modes:**
//!   [`PromptBuilder`](builder::PromptBuilder) and [`Prefill`](builder::Prefill).
//! - **Work with fixture directories:** [`fixture`] (`NAME.json` + `NAME.txt`
//!   pairs, schema validation, check and generate).
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`render`] | [`Renderer`](render::Renderer), role formatters, thinking blocks, continuation |
//! | [`profile`] | Template profiles: built-ins and JSON loading |
//! | [`options`] | [`RenderOptions`] and their validation |
//! | [`builder`] | Fluent conversation builder with prefill modes |
//! | [`config`] | Profile selection: file, built-in name, default |
//! | [`fixture`] | Fixture case format, discovery, check and generate |
//! | [`error`] | Error types |

pub mod builder;
pub mod config;
pub mod error;
pub mod fixture;
pub mod options;
pub mod prelude;
pub mod profile;
pub mod render;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use error::{FixtureError, ProfileError, RenderError};
pub use options::RenderOptions;
pub use profile::TemplateProfile;
pub use render::{RenderedPrompt, Renderer};

// ── Constants ──────────────────────────────────────────────────────

/// Profile used when nothing else is selected.
pub const DEFAULT_PROFILE: &str = "glm45";

// ── Message types ──────────────────────────────────────────────────

/// Role of a message in the conversation.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A message in the conversation.
///
/// `content` and `reasoning_content` are independent optionals: `Some("")`
/// and `None` render differently, so the distinction is kept all the way
/// through the renderer.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
            reasoning_content: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
            reasoning_content: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(content.into()),
            reasoning_content: None,
        }
    }

    pub fn assistant_with_reasoning(
        reasoning: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(content.into()),
            reasoning_content: Some(reasoning.into()),
        }
    }

    /// An assistant turn that carries reasoning but no visible answer.
    pub fn assistant_reasoning_only(reasoning: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: None,
            reasoning_content: Some(reasoning.into()),
        }
    }
}

// ── Conversation ───────────────────────────────────────────────────

/// An ordered list of messages.
///
/// Dereferences to `[Message]`, so a `&Conversation` can be passed anywhere
/// the renderer takes a message slice.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn with(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl std::ops::Deref for Conversation {
    type Target = [Message];

    fn deref(&self) -> &[Message] {
        &self.messages
    }
}

// ── Convenience ────────────────────────────────────────────────────

/// Render with the default (`glm45`) profile.
///
/// Shortcut for `Renderer::default().render(messages, options)`.
pub fn render(
    messages: &[Message],
    options: &RenderOptions,
) -> Result<RenderedPrompt, RenderError> {
    Renderer::default().render(messages, options)
}
