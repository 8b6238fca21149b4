//! Curate command - score, cluster and curate a photo collection.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::Result;
use clap::{Args, ValueEnum};
use photo_curator_adapters::ManifestSource;
use photo_curator_core::pipeline::{CurationPipeline, PhotoInput, PipelineConfig};
use photo_curator_core::ports::{CollectionSource, PersonMatcher, ProgressEvent, ProgressSink};
use tracing::{debug, info};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one cluster report per line)
    #[default]
    Jsonl,
    /// Single JSON document
    Json,
}

/// Parse and validate a threshold value (0.0-1.0).
fn parse_threshold(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0.0..=1.0"))
    }
}

/// Shared arguments for collection curation.
#[derive(Args, Clone)]
pub struct CurateArgs {
    /// Photo collection manifest (JSON)
    pub manifest: Option<PathBuf>,

    /// Burst time window in seconds
    #[arg(long, value_name = "SECS")]
    pub time_window: Option<i64>,

    /// Fingerprint similarity threshold (0.0-1.0)
    #[arg(long, value_parser = |s: &str| parse_threshold(s).map(f64::from))]
    pub similarity_threshold: Option<f64>,

    /// Improvement potential floor for planning candidates (0.0-1.0)
    #[arg(long, value_parser = parse_threshold)]
    pub potential_floor: Option<f32>,

    /// Skip perfect-moment planning
    #[arg(long)]
    pub no_planner: bool,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

impl CurateArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (core config `Default` impls)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        args.time_window = args.time_window.or(config.clustering.time_window_secs);
        args.similarity_threshold = args
            .similarity_threshold
            .or(config.clustering.similarity_threshold);
        args.potential_floor = args.potential_floor.or(config.planner.potential_floor);

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        args.config = Some(config.clone());
        args
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    /// Build the pipeline configuration from merged args.
    fn pipeline_config(&self) -> PipelineConfig {
        let mut pipeline = PipelineConfig::default();
        let config = self.config.as_ref();

        if let Some(window) = self.time_window {
            pipeline.cluster.time_window_secs = window;
        }
        if let Some(threshold) = self.similarity_threshold {
            pipeline.cluster.similarity_threshold = threshold;
        }

        if let Some(config) = config {
            if let Some(gain) = config.faces.smile_gain {
                pipeline.face.smile_gain = gain;
            }
            if let Some(t) = config.faces.poor_expression_threshold {
                pipeline.face.poor_expression_threshold = t;
            }
            if let Some(t) = config.faces.blur_threshold {
                pipeline.face.blur_threshold = t;
            }
            if let Some(t) = config.faces.awkward_pose_threshold {
                pipeline.face.awkward_pose_threshold = t;
            }
            if let Some(n) = config.planner.min_photos {
                pipeline.planner.min_photos = n;
            }
            if let Some(t) = config.planner.spread_floor {
                pipeline.planner.spread_floor = t;
            }
            if let Some(t) = config.planner.usability_floor {
                pipeline.planner.usability_floor = t;
            }
        }
        if let Some(t) = self.potential_floor {
            pipeline.planner.potential_floor = t;
        }

        pipeline
    }
}

/// Result of running the curate command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct CurateResult {
    /// Number of photos scored.
    pub scored: usize,
    /// Number of manifest records skipped.
    pub skipped: usize,
    /// Number of photos carrying face issues.
    pub with_issues: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the curate command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &CurateArgs) -> Result<CurateResult> {
    let Some(manifest_path) = args.manifest.as_deref() else {
        anyhow::bail!("No manifest specified");
    };
    info!("Curating collection from {}", manifest_path.display());

    let source = ManifestSource::from_path(manifest_path)?;
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    // Collect inputs, surfacing bad records as skips rather than aborting.
    let mut inputs: Vec<PhotoInput> = Vec::new();
    let mut skipped = 0usize;
    for (index, item) in source.photos().enumerate() {
        match item {
            Ok(input) => inputs.push(input),
            Err(e) => {
                progress_bar.on_event(ProgressEvent::Skipped {
                    asset_ref: format!("record {index}"),
                    reason: format!("{e:#}"),
                });
                skipped += 1;
            }
        }
    }

    // Planning always runs unless disabled; a manifest without person
    // labels identifies every face as unknown, which the planner turns
    // into per-cluster ineligibility rather than silence.
    let matcher = if args.no_planner {
        debug!("Perfect-moment planning disabled");
        None
    } else {
        Some(source.person_matcher())
    };

    let pipeline = CurationPipeline::new(args.pipeline_config());
    let cancel = AtomicBool::new(false);
    let report = pipeline.run(
        inputs,
        matcher.as_ref().map(|m| m as &dyn PersonMatcher),
        &progress_bar,
        &cancel,
    );
    progress_bar.on_event(ProgressEvent::Finished {
        scored: report.photos.len(),
        skipped,
        clusters: report.clusters.len(),
    });

    let output = JsonOutput::stdout();
    match args.format() {
        OutputFormat::Jsonl => {
            for cluster_report in &report.clusters {
                output.write(cluster_report)?;
            }
        }
        OutputFormat::Json => {
            output.write_report(&report, args.pretty)?;
        }
    }
    output.flush()?;

    let with_issues = report
        .photos
        .iter()
        .filter(|p| p.faces.iter().any(|f| !f.is_issue_free()))
        .count();

    let exit_code = if with_issues > 0 {
        ExitCode::IssuesFound
    } else {
        ExitCode::Success
    };

    Ok(CurateResult {
        scored: report.photos.len(),
        skipped,
        with_issues,
        exit_code,
    })
}
