//! Profile selection for the command line and other front ends.
//!
//! [`ProfileSelection`] collects the ways a caller can pick a profile and
//! resolves them in one place: an explicit profile file wins over a
//! built-in name, which wins over [`DEFAULT_PROFILE`](crate::DEFAULT_PROFILE).
//! A default-system override is applied last, whatever the source.

use std::path::PathBuf;

use tracing::debug;

use crate::profile::{DefaultSystem, TemplateProfile};
use crate::{DEFAULT_PROFILE, ProfileError, Renderer};

/// Where the active profile comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSelection {
    /// Path to a profile JSON file. Takes precedence over `name`.
    pub file: Option<PathBuf>,
    /// Built-in profile name. Default: `"glm45"`.
    pub name: Option<String>,
    /// Replace the profile's default-system policy with substitution of this text.
    pub default_system: Option<String>,
}

impl ProfileSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_default_system(mut self, text: impl Into<String>) -> Self {
        self.default_system = Some(text.into());
        self
    }

    /// Resolve to a concrete profile.
    pub fn resolve(&self) -> Result<TemplateProfile, ProfileError> {
        let mut profile = match (&self.file, &self.name) {
            (Some(path), _) => TemplateProfile::from_file(path)?,
            (None, Some(name)) => TemplateProfile::builtin(name)?,
            (None, None) => TemplateProfile::builtin(DEFAULT_PROFILE)?,
        };
        if let Some(text) = &self.default_system {
            profile = profile.with_default_system(DefaultSystem::Substitute(text.clone()));
        }
        debug!(
            "Resolved template profile '{}' (file={:?})",
            profile.name, self.file
        );
        Ok(profile)
    }

    /// Resolve and wrap in a [`Renderer`].
    pub fn renderer(&self) -> Result<Renderer, ProfileError> {
        self.resolve().map(Renderer::new)
    }
}
