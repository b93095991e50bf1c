//! Template profiles: the model-specific constants a renderer wraps text in.
//!
//! A [`TemplateProfile`] holds everything that differs between chat formats
//! (the preamble, per-role markers, thinking delimiters, the generation
//! marker) plus two explicit policies: what to do when no system message is
//! given, and how the generation prompt signals thinking. The renderer's
//! logic never hardcodes a marker; it only reads them from here.
//!
//! Profiles are plain serde data. Use a built-in via
//! [`TemplateProfile::builtin`] or load one from JSON with
//! [`TemplateProfile::from_file`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::{ProfileError, Role};

/// Names accepted by [`TemplateProfile::builtin`].
pub const BUILTIN_PROFILES: &[&str] = &["glm45", "chatml"];

/// Delimiters for one role's segment.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleMarkers {
    /// Emitted at the start of every segment of this role.
    pub open: String,
    /// Emitted before visible content, only when that content is non-empty.
    #[serde(default)]
    pub content_prefix: String,
    /// Emitted at the end of every segment of this role.
    #[serde(default)]
    pub close: String,
}

impl RoleMarkers {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            content_prefix: String::new(),
            close: close.into(),
        }
    }

    pub fn with_content_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.content_prefix = prefix.into();
        self
    }
}

/// Delimiters around a reasoning block.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default, PartialEq, Eq)]
pub struct ThinkingMarkers {
    pub open: String,
    pub close: String,
}

/// What the generation prompt appends to steer thinking.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenerationThinking {
    /// With thinking enabled, open a thinking block for the model to fill.
    #[default]
    ForceOpen,
    /// With thinking disabled, emit an empty closed block so the model skips it.
    CloseWhenDisabled,
    /// Never add a thinking marker after the generation prompt.
    Off,
}

/// Behavior when a non-empty conversation does not start with a system message.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default, PartialEq, Eq)]
#[serde(tag = "policy", content = "text", rename_all = "snake_case")]
pub enum DefaultSystem {
    /// Emit no system segment.
    #[default]
    Omit,
    /// Emit a system segment with this text.
    Substitute(String),
}

/// The full set of constants for one chat format.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq, Eq)]
pub struct TemplateProfile {
    pub name: String,
    #[serde(default)]
    pub preamble: String,
    pub system: RoleMarkers,
    pub user: RoleMarkers,
    pub assistant: RoleMarkers,
    pub thinking: ThinkingMarkers,
    pub generation_prompt: String,
    #[serde(default)]
    pub generation_thinking: GenerationThinking,
    #[serde(default)]
    pub default_system: DefaultSystem,
    /// Strip surrounding whitespace from assistant content before emitting it.
    #[serde(default)]
    pub trim_assistant_content: bool,
}

impl Default for TemplateProfile {
    fn default() -> Self {
        Self::glm45()
    }
}

impl TemplateProfile {
    /// GLM-4.5-style markers.
    ///
    /// No role closes its segment; turns are separated by the next role's
    /// open tag. Reasoning sits on its own line after `<|assistant|>` and
    /// assistant content is trimmed.
    ///
    /// This is not a byte-for-byte copy of the model's own template: user
    /// turns get no `/nothink` suffix, and earlier assistant turns without
    /// reasoning get no empty `<think></think>` block.
    pub fn glm45() -> Self {
        Self {
            name: "glm45".into(),
            preamble: "[gMASK]<sop>".into(),
            system: RoleMarkers::new("<|system|>\n", ""),
            user: RoleMarkers::new("<|user|>\n", ""),
            assistant: RoleMarkers::new("<|assistant|>", "").with_content_prefix("\n"),
            thinking: ThinkingMarkers {
                open: "\n<think>".into(),
                close: "</think>".into(),
            },
            generation_prompt: "<|assistant|>".into(),
            generation_thinking: GenerationThinking::ForceOpen,
            default_system: DefaultSystem::Omit,
            trim_assistant_content: true,
        }
    }

    /// ChatML (`<|im_start|>` / `<|im_end|>`) markers with Qwen-style thinking.
    pub fn chatml() -> Self {
        Self {
            name: "chatml".into(),
            preamble: String::new(),
            system: RoleMarkers::new("<|im_start|>system\n", "<|im_end|>\n"),
            user: RoleMarkers::new("<|im_start|>user\n", "<|im_end|>\n"),
            assistant: RoleMarkers::new("<|im_start|>assistant\n", "<|im_end|>\n"),
            thinking: ThinkingMarkers {
                open: "<think>\n".into(),
                close: "\n</think>\n\n".into(),
            },
            generation_prompt: "<|im_start|>assistant\n".into(),
            generation_thinking: GenerationThinking::ForceOpen,
            default_system: DefaultSystem::Omit,
            trim_assistant_content: false,
        }
    }

    /// Look up a built-in profile by name.
    pub fn builtin(name: &str) -> Result<Self, ProfileError> {
        match name {
            "glm45" => Ok(Self::glm45()),
            "chatml" => Ok(Self::chatml()),
            _ => Err(ProfileError::Unknown {
                name: name.to_string(),
                available: BUILTIN_PROFILES.join(", "),
            }),
        }
    }

    /// Load a profile from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ProfileError> {
        let data = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profile: TemplateProfile =
            serde_json::from_str(&data).map_err(|source| ProfileError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(
            "Loaded template profile '{}' from {}",
            profile.name,
            path.display()
        );
        Ok(profile)
    }

    /// Save the profile as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ProfileError> {
        let data = serde_json::to_string_pretty(self).map_err(|source| ProfileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, data).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            "Saved template profile '{}' to {}",
            self.name,
            path.display()
        );
        Ok(())
    }

    pub fn with_default_system(mut self, policy: DefaultSystem) -> Self {
        self.default_system = policy;
        self
    }

    pub fn with_generation_thinking(mut self, policy: GenerationThinking) -> Self {
        self.generation_thinking = policy;
        self
    }

    /// Markers for `role`.
    pub fn markers(&self, role: Role) -> &RoleMarkers {
        match role {
            Role::System => &self.system,
            Role::User => &self.user,
            Role::Assistant => &self.assistant,
        }
    }
}
