//! Convenience re-exports for common `chatfmt` types.
//!
//! ```ignore
//! use chatfmt::prelude::*;
//! ```
//!
//! Covers rendering, profiles and the builder. Fixture tooling and the
//! lower-level render helpers stay in their modules.

// ── Core types ──────────────────────────────────────────────────────
pub use crate::{Conversation, Message, RenderError, RenderOptions, Role, render};

// ── Rendering ───────────────────────────────────────────────────────
pub use crate::render::{RenderedPrompt, Renderer};

// ── Profiles ────────────────────────────────────────────────────────
pub use crate::profile::{
    DefaultSystem, GenerationThinking, RoleMarkers, TemplateProfile, ThinkingMarkers,
};

// ── Builder ─────────────────────────────────────────────────────────
pub use crate::builder::{Prefill, PromptBuilder};
