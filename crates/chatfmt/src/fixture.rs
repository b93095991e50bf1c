//! Fixture cases: `{"messages": [...], "config": {...}}` inputs paired with
//! their expected prompt text.
//!
//! A fixture directory holds `NAME.json` + `NAME.txt` pairs. [`check_dir`]
//! renders every case and compares it byte for byte against its `.txt`, while
//! [`generate_dir`] (re)writes the `.txt` files from the current renderer.
//!
//! Case files are validated against the JSON Schema derived from
//! [`FixtureCase`] before decoding, so a malformed case reports every problem
//! with its JSON path instead of only the first serde error.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{FixtureError, Message, RenderError, RenderOptions, RenderedPrompt, Renderer};

// ── Case format ────────────────────────────────────────────────────

/// One fixture input.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq, Eq)]
pub struct FixtureCase {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub config: RenderOptions,
}

/// JSON Schema for [`FixtureCase`] files.
pub fn case_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(FixtureCase);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

/// Validate a parsed case document against [`case_schema`].
///
/// Returns one line per violation, empty when the document is valid.
pub fn schema_violations(document: &serde_json::Value) -> Vec<String> {
    let schema = case_schema();
    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(e) => {
            warn!("Fixture schema failed to compile, skipping validation: {e}");
            return Vec::new();
        }
    };
    validator
        .iter_errors(document)
        .map(|e| format!("  - {}: {e}", e.instance_path()))
        .collect()
}

impl FixtureCase {
    /// Parse and validate case JSON. `path` is only used in error messages.
    pub fn from_json_str(text: &str, path: &Path) -> Result<Self, FixtureError> {
        let document: serde_json::Value =
            serde_json::from_str(text).map_err(|source| FixtureError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let violations = schema_violations(&document);
        if !violations.is_empty() {
            return Err(FixtureError::Schema {
                path: path.to_path_buf(),
                violations,
            });
        }

        serde_json::from_value(document).map_err(|source| FixtureError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and validate a case file.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let text = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let case = Self::from_json_str(&text, path)?;
        debug!(
            "Loaded fixture case {} ({} messages)",
            path.display(),
            case.messages.len()
        );
        Ok(case)
    }

    pub fn render(&self, renderer: &Renderer) -> Result<RenderedPrompt, RenderError> {
        renderer.render(&self.messages, &self.config)
    }
}

// ── Directories ────────────────────────────────────────────────────

/// A case file and the path its expected output lives at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixturePair {
    pub name: String,
    pub case_path: PathBuf,
    pub expected_path: PathBuf,
}

/// List the `.json` cases in `dir`, sorted by name.
pub fn discover(dir: &Path) -> Result<Vec<FixturePair>, FixtureError> {
    let io_err = |source| FixtureError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut pairs = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        pairs.push(FixturePair {
            name: name.to_string(),
            expected_path: path.with_extension("txt"),
            case_path: path.clone(),
        });
    }
    pairs.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(
        "Discovered {} fixture case(s) in {}",
        pairs.len(),
        dir.display()
    );
    Ok(pairs)
}

/// Result of checking one case.
#[derive(Debug, PartialEq, Eq)]
pub enum CaseOutcome {
    Pass,
    /// Output differs; `offset` is the first differing byte.
    Mismatch {
        offset: usize,
        expected: String,
        actual: String,
    },
    RenderFailed(RenderError),
    /// The case file could not be read or failed validation.
    Invalid(String),
    MissingExpected,
}

impl CaseOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, CaseOutcome::Pass)
    }
}

#[derive(Debug)]
pub struct CaseReport {
    pub name: String,
    pub outcome: CaseOutcome,
}

/// Outcomes for every case in a directory, in name order.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub cases: Vec<CaseReport>,
}

impl CheckReport {
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.outcome.is_pass()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

fn first_difference(expected: &str, actual: &str) -> usize {
    expected
        .bytes()
        .zip(actual.bytes())
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| expected.len().min(actual.len()))
}

fn check_case(renderer: &Renderer, pair: &FixturePair) -> CaseOutcome {
    let case = match FixtureCase::load(&pair.case_path) {
        Ok(c) => c,
        Err(e) => return CaseOutcome::Invalid(e.to_string()),
    };
    if !pair.expected_path.is_file() {
        return CaseOutcome::MissingExpected;
    }
    let expected = match std::fs::read_to_string(&pair.expected_path) {
        Ok(text) => text,
        Err(e) => {
            return CaseOutcome::Invalid(format!(
                "failed to read '{}': {e}",
                pair.expected_path.display()
            ));
        }
    };
    let actual = match case.render(renderer) {
        Ok(prompt) => prompt.into_string(),
        Err(e) => return CaseOutcome::RenderFailed(e),
    };
    if actual == expected {
        CaseOutcome::Pass
    } else {
        CaseOutcome::Mismatch {
            offset: first_difference(&expected, &actual),
            expected,
            actual,
        }
    }
}

/// Render every case in `dir` and compare against its expected output.
pub fn check_dir(renderer: &Renderer, dir: &Path) -> Result<CheckReport, FixtureError> {
    let mut report = CheckReport::default();
    for pair in discover(dir)? {
        let outcome = check_case(renderer, &pair);
        if !outcome.is_pass() {
            warn!("Fixture {} failed: {outcome:?}", pair.name);
        }
        report.cases.push(CaseReport {
            name: pair.name,
            outcome,
        });
    }
    info!(
        "Checked {} fixture(s) in {}: {} passed, {} failed",
        report.cases.len(),
        dir.display(),
        report.passed(),
        report.failed()
    );
    Ok(report)
}

/// Write the expected `.txt` for every case in `dir`. Returns the number of
/// files written.
///
/// Stops at the first case that fails to load or render; files written
/// before that point stay on disk.
pub fn generate_dir(renderer: &Renderer, dir: &Path) -> Result<usize, FixtureError> {
    let pairs = discover(dir)?;
    for pair in &pairs {
        let case = FixtureCase::load(&pair.case_path)?;
        let prompt = case.render(renderer).map_err(|source| FixtureError::Render {
            path: pair.case_path.clone(),
            source,
        })?;
        std::fs::write(&pair.expected_path, prompt.as_str()).map_err(|source| FixtureError::Io {
            path: pair.expected_path.clone(),
            source,
        })?;
        debug!("Wrote {}", pair.expected_path.display());
    }
    info!(
        "Generated {} fixture output(s) in {}",
        pairs.len(),
        dir.display()
    );
    Ok(pairs.len())
}
