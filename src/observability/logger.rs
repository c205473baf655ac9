//! Markdown log of discovery passes and test runs.

#[cfg(feature = "config")]
use crate::config::{ConfigurationLoader, EnvironmentLoader};
use crate::discovery::{DiscoveryObserver, DiscoverySummary, SuiteReport, TestOutcome};
use crate::doctest::{BoundExample, CollectionError};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Logger for discovery passes and their test runs.
///
/// This logger creates markdown-formatted log files recording which
/// modules were searched, which examples were bound (at `DEBUG`), every
/// collection error, and the outcome of each run.
#[derive(Debug)]
pub struct DiscoveryLogger {
    log_file: PathBuf,
    log_level: String,
}

impl DiscoveryLogger {
    /// Initialize logger.
    ///
    /// # Arguments
    /// * `log_file` - Path to log file. If None, creates a timestamped file in temp directory.
    /// * `log_level` - Logging level (defaults to "INFO").
    pub fn new(log_file: Option<&Path>, log_level: Option<&str>) -> Result<Self> {
        let log_file = match log_file {
            Some(p) => p.to_path_buf(),
            None => std::env::temp_dir().join("mockable-doctests").join(format!(
                "discovery_{}_{}.md",
                Utc::now().timestamp_millis(),
                std::process::id()
            )),
        };

        if let Some(parent) = log_file.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }

        let logger = Self {
            log_file,
            log_level: log_level.unwrap_or("INFO").to_uppercase(),
        };

        if !logger.log_file.exists() {
            logger.initialize_log_file()?;
        }

        Ok(logger)
    }

    /// Initialize logger from loaded configuration.
    ///
    /// `MOCKABLE_DOCTESTS_LOG_LEVEL` overrides the file's `[logging]`
    /// level; the log file comes from the configuration file only.
    #[cfg(feature = "config")]
    pub fn from_config(config: &ConfigurationLoader, env: &EnvironmentLoader) -> Result<Self> {
        let level = env.log_level();
        let level = level.as_deref().unwrap_or_else(|| config.log_level());
        Self::new(config.log_file(), Some(level))
    }

    fn initialize_log_file(&self) -> Result<()> {
        let mut file = File::create(&self.log_file)
            .with_context(|| format!("Failed to create log file: {}", self.log_file.display()))?;

        let now: DateTime<Utc> = Utc::now();

        writeln!(file, "# Mock Discovery Log\n")?;
        writeln!(file, "Log started: {}\n", now.to_rfc3339())?;
        writeln!(file, "---\n")?;

        Ok(())
    }

    fn append_to_log(&self, content: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)
            .with_context(|| format!("Failed to open log file: {}", self.log_file.display()))?;

        write!(file, "{}", content).with_context(|| "Failed to write to log file")?;

        Ok(())
    }

    /// Log the start of a discovery pass.
    ///
    /// # Arguments
    /// * `modules` - Modules the registry names.
    pub fn log_pass_start(&self, modules: &[&str]) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let content = format!(
            "## Discovery Pass - {}\n\n**Modules:** {}\n\n",
            now.to_rfc3339(),
            serde_json::to_string(modules).unwrap_or_default()
        );
        self.append_to_log(&content)
    }

    /// Log a bound example. Recorded only at `DEBUG` level.
    pub fn log_bound_example(&self, example: &BoundExample) -> Result<()> {
        if !self.is_debug() {
            return Ok(());
        }

        let content = format!(
            "- `{}`{} ({} steps)\n\n",
            example.id(),
            if example.is_mocked() { " mocked" } else { "" },
            example.example().steps.len()
        );
        self.append_to_log(&content)
    }

    /// Log a collection error with its module, function, position, and key.
    pub fn log_collection_error(&self, error: &CollectionError) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let context = json!({
            "module": error.module(),
            "function": error.function(),
            "position": error.position(),
            "key": error.key(),
        });
        let content = format!(
            "### Collection Error - {}\n\n**Test:** {}\n**Error:** {}\n**Context:** {}\n\n",
            now.to_rfc3339(),
            error.test_id(),
            error,
            serde_json::to_string_pretty(&context).unwrap_or_default()
        );
        self.append_to_log(&content)
    }

    /// Log the summary closing a discovery pass.
    pub fn log_pass_complete(&self, summary: &DiscoverySummary) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let content = format!(
            "### Pass Complete - {}\n\n**Modules:** {}\n**Examples:** {} ({} mocked)\n**Collection errors:** {}\n\n---\n\n",
            now.to_rfc3339(),
            summary.modules,
            summary.examples,
            summary.mocked,
            summary.errors
        );
        self.append_to_log(&content)
    }

    /// Log the outcome of running a suite.
    pub fn log_suite_report(&self, report: &SuiteReport) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let mut content = format!(
            "## Test Run - {}\n\n**Passed:** {}/{}\n\n",
            now.to_rfc3339(),
            report.passed(),
            report.total()
        );

        for test in report.failures() {
            match &test.outcome {
                TestOutcome::Failed(failures) => {
                    content.push_str(&format!("### Failed: {}\n\n```\n", test.id));
                    for failure in failures {
                        content.push_str(&failure.to_string());
                    }
                    content.push_str("```\n\n");
                }
                TestOutcome::CollectionError(message) => {
                    content.push_str(&format!("### Error: {}\n\n{}\n\n", test.id, message));
                }
                TestOutcome::Passed => {}
            }
        }

        self.append_to_log(&content)
    }

    /// Check if bound examples are recorded.
    pub fn is_debug(&self) -> bool {
        self.log_level == "DEBUG"
    }

    /// Get the log file path.
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Get the log level.
    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

impl DiscoveryObserver for DiscoveryLogger {
    fn on_pass_start(&self, modules: &[&str]) {
        if let Err(e) = self.log_pass_start(modules) {
            warn!(error = %e, "failed to write discovery log");
        }
    }

    fn on_example_bound(&self, example: &BoundExample) {
        if let Err(e) = self.log_bound_example(example) {
            warn!(error = %e, "failed to write discovery log");
        }
    }

    fn on_collection_error(&self, error: &CollectionError) {
        if let Err(e) = self.log_collection_error(error) {
            warn!(error = %e, "failed to write discovery log");
        }
    }

    fn on_pass_complete(&self, summary: &DiscoverySummary) {
        if let Err(e) = self.log_pass_complete(summary) {
            warn!(error = %e, "failed to write discovery log");
        }
    }
}
