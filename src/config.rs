//! Site tree configuration: TOML file loading, explicit overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. Explicit overrides passed by the embedding application
//! 2. An explicit config file path
//! 3. `$SITE_TREE_CONFIG` environment variable (path to config file)
//! 4. Project-local `.site-tree.toml` in the current working directory
//! 5. Global `~/.config/site-tree/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

// ── Section configs ──────────────────────────────────────────────────────────

/// Rename workflow settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RenameConfig {
    /// Commit (rather than undo) a pending rename when the selection moves away.
    pub commit_on_deselect: Option<bool>,
    /// Publish `ItemRenamed` after a commit that changed the name.
    pub publish_renames: Option<bool>,
}

/// Selection settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SelectionConfig {
    /// Publish `SelectionChanged` whenever the selection moves.
    pub publish_changes: Option<bool>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level site tree configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    pub rename: RenameConfig,
    pub selection: SelectionConfig,
}

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SITE_TREE_CONFIG";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".site-tree.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("site-tree").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed.
fn load_file(path: &Path) -> Option<SiteConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<SiteConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse config file");
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl SiteConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &SiteConfig) -> SiteConfig {
        SiteConfig {
            rename: RenameConfig {
                commit_on_deselect: other
                    .rename
                    .commit_on_deselect
                    .or(self.rename.commit_on_deselect),
                publish_renames: other
                    .rename
                    .publish_renames
                    .or(self.rename.publish_renames),
            },
            selection: SelectionConfig {
                publish_changes: other
                    .selection
                    .publish_changes
                    .or(self.selection.publish_changes),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `config_path` is an explicit config file path; `overrides` are partial
    /// settings from the embedding application and win over every file.
    pub fn load(config_path: Option<&Path>, overrides: Option<&SiteConfig>) -> SiteConfig {
        let mut config = SiteConfig::default();

        // Lowest priority first so higher overwrites.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(path) = config_path {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn commit_on_deselect(&self) -> bool {
        self.rename.commit_on_deselect.unwrap_or(true)
    }

    pub fn publish_renames(&self) -> bool {
        self.rename.publish_renames.unwrap_or(true)
    }

    pub fn publish_selection_changes(&self) -> bool {
        self.selection.publish_changes.unwrap_or(true)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
