//! Configuration loading and resolution.

use std::path::PathBuf;

/// Environment variable naming the tool catalog file.
pub const CATALOG_ENV_VAR: &str = "TOOLBRIDGE_CATALOG";

/// Catalog looked up in the working directory when nothing else is given.
pub const LOCAL_CATALOG_PATH: &str = ".toolbridge/catalog.json";

/// When the transport loop stops reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Stop at end of input or on cancellation.
    #[default]
    UntilEof,
    /// Serve until cancelled; end of input parks the loop until then.
    UntilCancelled,
    /// Handle this many non-blank lines, then stop.
    Lines(usize),
}

/// CLI-facing stop condition, combined with `--max-lines` into a [`RunMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StopCondition {
    #[default]
    Eof,
    Cancelled,
}

impl RunMode {
    pub fn from_args(until: StopCondition, max_lines: Option<usize>) -> Self {
        match (max_lines, until) {
            (Some(n), _) => RunMode::Lines(n),
            (None, StopCondition::Eof) => RunMode::UntilEof,
            (None, StopCondition::Cancelled) => RunMode::UntilCancelled,
        }
    }
}

/// Resolved server settings.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub run_mode: RunMode,
    /// `None` serves the built-in stand-in catalog.
    pub catalog_path: Option<PathBuf>,
}

impl ServerConfig {
    pub fn new(run_mode: RunMode, explicit_catalog: Option<&str>) -> Self {
        Self {
            run_mode,
            catalog_path: resolve_catalog_path(explicit_catalog),
        }
    }
}

/// Resolve the catalog file: flag, then environment, then working directory.
pub fn resolve_catalog_path(explicit: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }

    if let Ok(env_path) = std::env::var(CATALOG_ENV_VAR) {
        if !env_path.trim().is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    let local = PathBuf::from(LOCAL_CATALOG_PATH);
    if local.exists() {
        return Some(local);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        assert_eq!(
            resolve_catalog_path(Some("/tmp/tools.json")),
            Some(PathBuf::from("/tmp/tools.json"))
        );
    }

    #[test]
    fn test_run_mode_from_args() {
        assert_eq!(RunMode::from_args(StopCondition::Eof, None), RunMode::UntilEof);
        assert_eq!(
            RunMode::from_args(StopCondition::Cancelled, None),
            RunMode::UntilCancelled
        );
        assert_eq!(
            RunMode::from_args(StopCondition::Cancelled, Some(3)),
            RunMode::Lines(3)
        );
    }

    #[test]
    fn test_default_mode_is_until_eof() {
        assert_eq!(ServerConfig::default().run_mode, RunMode::UntilEof);
    }
}
