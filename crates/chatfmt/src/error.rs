//! Error types.
//!
//! [`RenderError`] covers the renderer's input validation. Every variant is
//! detected before output is produced, so a failed render never yields a
//! partial prompt. [`ProfileError`] and [`FixtureError`] belong to the
//! loading layers around the renderer.

use std::path::PathBuf;

use crate::Role;

/// Validation failure raised by [`Renderer::render`](crate::Renderer::render).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// `add_generation_prompt` and `continue_final_message` were both set.
    #[error("add_generation_prompt and continue_final_message are mutually exclusive")]
    ConfigConflict,

    /// A message is missing content its role requires.
    #[error("{role} message at index {index} has no content")]
    EmptyRoleContent { role: Role, index: usize },

    /// Continuation was requested for an empty conversation.
    #[error("continue_final_message requires at least one message")]
    NoMessages,

    /// Continuation was requested but the last message is not an assistant turn.
    #[error("continue_final_message requires a final assistant message, found {role}")]
    LastMessageNotAssistant { role: Role },
}

/// Failure to resolve or load a [`TemplateProfile`](crate::TemplateProfile).
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("unknown profile '{name}' (built-in profiles: {available})")]
    Unknown { name: String, available: String },

    #[error("failed to read profile '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure while loading, validating, checking, or generating fixtures.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{}' does not match the fixture schema:\n{}", .path.display(), .violations.join("\n"))]
    Schema {
        path: PathBuf,
        violations: Vec<String>,
    },

    #[error("failed to render '{}': {source}", .path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
}
