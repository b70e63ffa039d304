// verity_cli - CLI functionality (library interface for testing)
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use verity_ast::CompilationInput;
use verity_checker::diagnostics::descriptor;
use verity_checker::{DiagnosticSeverity, VerificationReport, VerityConfig, verify_compilation};

#[derive(Parser)]
#[command(name = "verity", version)]
#[command(about = "Declaration-level verification for annotated class trees")]
pub struct Cli {
    /// tracing filter used when RUST_LOG is unset (overrides verity.toml)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Verify a compilation input serialized as JSON
    Check {
        /// Input .json file
        input: PathBuf,
        /// Path to verity.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Describe a diagnostic code
    Explain {
        /// Diagnostic code such as JVV3001
        code: String,
    },
}

pub fn load_config(path: Option<&Path>) -> Result<VerityConfig> {
    match path {
        Some(path) => VerityConfig::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display())),
        None => Ok(VerityConfig::default()),
    }
}

pub fn load_input(path: &Path) -> Result<CompilationInput> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input '{}'", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse compilation input '{}'", path.display()))
}

/// Runs the verification and returns the rendered report.
pub fn run_check(input: &Path, config: &VerityConfig) -> Result<(VerificationReport, String)> {
    let compilation = load_input(input)?;
    tracing::info!(
        input = %input.display(),
        units = compilation.units.len(),
        external = compilation.external.len(),
        "verifying compilation input"
    );
    let report = verify_compilation(compilation, config.verifier);
    let rendered = render_report(&report);
    Ok((report, rendered))
}

pub fn render_report(report: &VerificationReport) -> String {
    let mut out = String::new();
    for diagnostic in &report.diagnostics {
        let _ = writeln!(out, "{diagnostic}");
    }

    let unresolved = report.unresolved_names();
    if !unresolved.is_empty() {
        let _ = writeln!(out, "unresolved references: {}", unresolved.join(", "));
    }

    let errors = report
        .diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.severity() == DiagnosticSeverity::Error)
        .count();
    let _ = writeln!(
        out,
        "verified {} classes: {} error(s)",
        report.registry.classes().count(),
        errors
    );
    out
}

pub fn explain(code: &str) -> Result<String> {
    let normalized = code.trim().to_ascii_uppercase();
    let Some(entry) = descriptor(&normalized) else {
        bail!("Unknown diagnostic code '{}'", code);
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}): {}",
        entry.code,
        entry.severity.label(),
        entry.title
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", entry.help);
    Ok(out)
}
