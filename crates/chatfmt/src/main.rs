//! Command-line front end for chatfmt.
//!
//! Renders fixture cases, checks and regenerates fixture directories, and
//! prints the fixture schema or the built-in template profiles.
//!
//! # Examples
//!
//! ```sh
//! # Render one case with the default (glm45) profile
//! chatfmt render cases/01_basic.json
//!
//! # Compare a fixture directory against ChatML output
//! chatfmt --profile chatml check fixtures/
//!
//! # Regenerate expected outputs with a custom profile
//! chatfmt --profile-file my_model.json generate fixtures/
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use chatfmt::config::ProfileSelection;
use chatfmt::fixture::{self, CaseOutcome, FixtureCase};
use chatfmt::profile::{BUILTIN_PROFILES, TemplateProfile};
use chatfmt::{DEFAULT_PROFILE, Renderer};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Deterministic chat-template prompt rendering.
#[derive(Parser)]
#[command(name = "chatfmt", version)]
struct Cli {
    /// Built-in template profile.
    #[arg(long, global = true, env = "CHATFMT_PROFILE", default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Load the template profile from a JSON file instead (overrides --profile).
    #[arg(long, global = true)]
    profile_file: Option<PathBuf>,

    /// Substitute this system message when a conversation has none.
    #[arg(long, global = true)]
    default_system: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one fixture case.
    Render {
        /// Case file (`{"messages": [...], "config": {...}}`).
        case: PathBuf,
        /// Write the prompt here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare every case in a directory with its expected `.txt`.
    Check { dir: PathBuf },
    /// Write the expected `.txt` for every case in a directory.
    Generate { dir: PathBuf },
    /// Print the fixture case JSON Schema.
    Schema,
    /// List built-in profiles, or print one as JSON.
    Profiles {
        #[arg(long, value_name = "NAME")]
        show: Option<String>,
    },
}

impl Cli {
    fn selection(&self) -> ProfileSelection {
        ProfileSelection {
            file: self.profile_file.clone(),
            name: Some(self.profile.clone()),
            default_system: self.default_system.clone(),
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn write_stdout(text: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn render_case(renderer: &Renderer, case: &Path, output: Option<&Path>) -> CliResult<()> {
    let prompt = FixtureCase::load(case)?.render(renderer)?;
    match output {
        Some(path) => {
            std::fs::write(path, prompt.as_str())?;
            debug!("Wrote {} bytes to {}", prompt.len(), path.display());
        }
        None => write_stdout(prompt.as_str())?,
    }
    Ok(())
}

fn describe(outcome: &CaseOutcome) -> String {
    match outcome {
        CaseOutcome::Pass => "ok".to_string(),
        CaseOutcome::Mismatch {
            offset,
            expected,
            actual,
        } => format!(
            "mismatch at byte {offset} (expected {} bytes, got {})",
            expected.len(),
            actual.len()
        ),
        CaseOutcome::RenderFailed(e) => format!("render failed: {e}"),
        CaseOutcome::Invalid(reason) => format!("invalid case: {reason}"),
        CaseOutcome::MissingExpected => "missing expected output".to_string(),
    }
}

/// Returns whether every case passed.
fn check(renderer: &Renderer, dir: &Path) -> CliResult<bool> {
    let report = fixture::check_dir(renderer, dir)?;
    let mut out = String::new();
    for case in &report.cases {
        let tag = if case.outcome.is_pass() {
            "PASS"
        } else {
            "FAIL"
        };
        let detail = describe(&case.outcome);
        out.push_str(&format!("{tag} {}: {detail}\n", case.name));
    }
    out.push_str(&format!(
        "\n{} passed, {} failed\n",
        report.passed(),
        report.failed()
    ));
    write_stdout(&out)?;
    Ok(report.is_success())
}

fn profiles(show: Option<&str>) -> CliResult<()> {
    match show {
        Some(name) => {
            let profile = TemplateProfile::builtin(name)?;
            write_stdout(&format!("{}\n", serde_json::to_string_pretty(&profile)?))
        }
        None => {
            let mut out = String::new();
            for name in BUILTIN_PROFILES {
                let marker = if *name == DEFAULT_PROFILE {
                    " (default)"
                } else {
                    ""
                };
                out.push_str(&format!("{name}{marker}\n"));
            }
            write_stdout(&out)
        }
    }
}

/// Returns whether the command succeeded.
fn run(cli: &Cli) -> CliResult<bool> {
    match &cli.command {
        Command::Render { case, output } => {
            let renderer = cli.selection().renderer()?;
            render_case(&renderer, case, output.as_deref())?;
            Ok(true)
        }
        Command::Check { dir } => {
            let renderer = cli.selection().renderer()?;
            check(&renderer, dir)
        }
        Command::Generate { dir } => {
            let renderer = cli.selection().renderer()?;
            let written = fixture::generate_dir(&renderer, dir)?;
            write_stdout(&format!("Wrote {written} expected output(s)\n"))?;
            Ok(true)
        }
        Command::Schema => {
            let schema = fixture::case_schema();
            write_stdout(&format!("{}\n", serde_json::to_string_pretty(&schema)?))?;
            Ok(true)
        }
        Command::Profiles { show } => {
            profiles(show.as_deref())?;
            Ok(true)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_options_reach_selection() {
        let cli = Cli::try_parse_from([
            "chatfmt",
            "check",
            "fixtures",
            "--profile",
            "chatml",
            "--default-system",
            "Hi",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let selection = cli.selection();
        assert_eq!(selection.name.as_deref(), Some("chatml"));
        assert_eq!(selection.default_system.as_deref(), Some("Hi"));
        assert!(matches!(cli.command, Command::Check { .. }));
    }

    #[test]
    fn render_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let case = dir.path().join("case.json");
        std::fs::write(
            &case,
            r#"{"messages": [{"role": "user", "content": "Hello!"}], "config": {"add_generation_prompt": true}}"#,
        )
        .unwrap();
        let out = dir.path().join("out.txt");

        render_case(&Renderer::default(), &case, Some(&out)).unwrap();
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "[gMASK]<sop><|user|>\nHello!<|assistant|>"
        );
    }

    #[test]
    fn describe_mismatch() {
        let text = describe(&CaseOutcome::Mismatch {
            offset: 3,
            expected: "abcd".into(),
            actual: "abcx!".into(),
        });
        assert_eq!(text, "mismatch at byte 3 (expected 4 bytes, got 5)");
    }
}
