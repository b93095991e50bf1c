//! Rendering options.
//!
//! [`RenderOptions`] uses the same shape as the fixture `config` object, so
//! it deserializes straight from case files. Keys the renderer does not know
//! (such as `tokenize`) are ignored.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::RenderError;

/// Per-render switches.
///
/// `add_generation_prompt` and `continue_final_message` are mutually
/// exclusive; [`validate`](Self::validate) reports the conflict instead of
/// picking one.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Append the role-open marker for a new assistant turn.
    #[serde(default)]
    pub add_generation_prompt: bool,
    /// Render reasoning blocks and prompt the model to think.
    #[serde(default)]
    pub enable_thinking: bool,
    /// Leave the final assistant message open for direct continuation.
    #[serde(default)]
    pub continue_final_message: bool,
}

impl RenderOptions {
    /// All switches off.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_generation_prompt(mut self, enabled: bool) -> Self {
        self.add_generation_prompt = enabled;
        self
    }

    pub fn with_thinking(mut self, enabled: bool) -> Self {
        self.enable_thinking = enabled;
        self
    }

    pub fn with_continue_final_message(mut self, enabled: bool) -> Self {
        self.continue_final_message = enabled;
        self
    }

    /// Reject option combinations that have no single meaning.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.add_generation_prompt && self.continue_final_message {
            return Err(RenderError::ConfigConflict);
        }
        Ok(())
    }
}
