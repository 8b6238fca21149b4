//! Configuration file support for photo-curator.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/photo-curator/config.toml` (lowest priority)
//! - Project-local: `.photo-curator.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Burst clustering settings.
    pub clustering: ClusteringConfig,
    /// Face quality analysis settings.
    pub faces: FacesConfig,
    /// Perfect-moment planner settings.
    pub planner: PlannerSection,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// Burst clustering configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Temporal window in seconds for grouping a burst.
    pub time_window_secs: Option<i64>,
    /// Maximum normalized fingerprint distance within a cluster (0.0-1.0).
    pub similarity_threshold: Option<f64>,
}

/// Face quality analysis configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct FacesConfig {
    /// Smile intensity gain applied to lip curvature.
    pub smile_gain: Option<f32>,
    /// Smile quality below this flags a poor expression (0.0-1.0).
    pub poor_expression_threshold: Option<f32>,
    /// Face sharpness below this flags a blurred face (0.0-1.0).
    pub blur_threshold: Option<f32>,
    /// Capture quality below this flags an awkward pose (0.0-1.0).
    pub awkward_pose_threshold: Option<f32>,
}

/// Perfect-moment planner configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PlannerSection {
    /// Minimum cluster size eligible for planning.
    pub min_photos: Option<usize>,
    /// Improvement potential a person must show to become a candidate (0.0-1.0).
    pub potential_floor: Option<f32>,
    /// Minimum best-to-worst rank spread across a cluster (0.0-1.0).
    pub spread_floor: Option<f32>,
    /// Capture quality below which a photo is unusable (0.0-1.0).
    pub usability_floor: Option<f32>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/photo-curator/config.toml`
    /// 2. Project-local: `.photo-curator.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        if let Some(w) = self.clustering.time_window_secs {
            if w <= 0 {
                return Err(format!("clustering.time_window_secs must be > 0, got {w}"));
            }
        }
        if let Some(t) = self.clustering.similarity_threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(format!(
                    "clustering.similarity_threshold must be 0.0-1.0, got {t}"
                ));
            }
        }
        for (name, value) in [
            ("faces.poor_expression_threshold", self.faces.poor_expression_threshold),
            ("faces.blur_threshold", self.faces.blur_threshold),
            ("faces.awkward_pose_threshold", self.faces.awkward_pose_threshold),
            ("planner.potential_floor", self.planner.potential_floor),
            ("planner.spread_floor", self.planner.spread_floor),
            ("planner.usability_floor", self.planner.usability_floor),
        ] {
            if let Some(t) = value {
                if !(0.0..=1.0).contains(&t) {
                    return Err(format!("{name} must be 0.0-1.0, got {t}"));
                }
            }
        }
        if let Some(g) = self.faces.smile_gain {
            if g <= 0.0 {
                return Err(format!("faces.smile_gain must be > 0, got {g}"));
            }
        }
        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!("output.format must be 'json' or 'jsonl', got '{f}'"));
            }
        }
        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.clustering.time_window_secs = other
            .clustering
            .time_window_secs
            .or(self.clustering.time_window_secs);
        self.clustering.similarity_threshold = other
            .clustering
            .similarity_threshold
            .or(self.clustering.similarity_threshold);

        self.faces.smile_gain = other.faces.smile_gain.or(self.faces.smile_gain);
        self.faces.poor_expression_threshold = other
            .faces
            .poor_expression_threshold
            .or(self.faces.poor_expression_threshold);
        self.faces.blur_threshold = other.faces.blur_threshold.or(self.faces.blur_threshold);
        self.faces.awkward_pose_threshold = other
            .faces
            .awkward_pose_threshold
            .or(self.faces.awkward_pose_threshold);

        self.planner.min_photos = other.planner.min_photos.or(self.planner.min_photos);
        self.planner.potential_floor = other
            .planner
            .potential_floor
            .or(self.planner.potential_floor);
        self.planner.spread_floor = other.planner.spread_floor.or(self.planner.spread_floor);
        self.planner.usability_floor = other
            .planner
            .usability_floor
            .or(self.planner.usability_floor);

        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("photo-curator").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.photo-curator.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".photo-curator.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
