//! Analyze a video and optionally export its clips.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;

use reelcut_common::config::{AppConfig, PatternSet};
use reelcut_processing_core::pipeline::HighlightPlan;
use reelcut_render_engine::ExportDispatcher;
use reelcut_vision::{analyze_video, TemplateClassifier, VideoAnalysis};

/// Options shared by `analyze` and `batch`. Unset values come from config.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Sampling interval in seconds
    #[arg(long)]
    pub interval: Option<u32>,

    /// Minimum play session length in seconds
    #[arg(long)]
    pub min_session: Option<u32>,

    /// Directory holding kill_image.png, death_image.png and win_image.png
    #[arg(long)]
    pub patterns: Option<PathBuf>,

    /// Skip frames that fail to decode instead of aborting
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Cut the planned clips with ffmpeg
    #[arg(long)]
    pub export: bool,

    /// Wait for every export to finish and report failures
    #[arg(long)]
    pub wait: bool,

    /// Maximum number of export processes running at once
    #[arg(long)]
    pub max_parallel_exports: Option<usize>,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,

    /// Print wall-clock start/end and elapsed time
    #[arg(long)]
    pub timing: bool,
}

impl AnalyzeOptions {
    /// Override config values with the flags that were given.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(interval) = self.interval {
            config.analysis.check_interval_secs = interval;
        }
        if let Some(min_session) = self.min_session {
            config.analysis.min_session_secs = min_session;
        }
        if let Some(dir) = &self.patterns {
            config.patterns = PatternSet::in_dir(dir);
        }
        if self.skip_unreadable {
            config.analysis.skip_unreadable_frames = true;
        }
        if self.wait {
            config.export.wait = true;
        }
        if let Some(n) = self.max_parallel_exports {
            config.export.max_parallel = Some(n);
        }
    }
}

pub fn run(video: PathBuf, options: AnalyzeOptions, mut config: AppConfig) -> anyhow::Result<()> {
    options.apply(&mut config);
    let classifier = load_classifier(&config)?;
    let plan = analyze_one(&video, &classifier, &config, &options)?;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    }
    Ok(())
}

/// Stream for human-readable progress. With `--json`, stdout carries only
/// the JSON document, so progress moves to stderr.
pub(crate) fn status_stream(json: bool) -> Box<dyn Write> {
    if json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    }
}

pub(crate) fn load_classifier(config: &AppConfig) -> anyhow::Result<TemplateClassifier> {
    TemplateClassifier::load(&config.patterns, &config.analysis)
        .context("Failed to load reference patterns")
}

/// Analyze one video with already loaded patterns, then export if asked.
///
/// The plan is returned rather than printed as JSON so callers decide how
/// many documents end up on stdout.
pub(crate) fn analyze_one(
    video: &Path,
    classifier: &TemplateClassifier,
    config: &AppConfig,
    options: &AnalyzeOptions,
) -> anyhow::Result<HighlightPlan> {
    let started_wall = chrono::Local::now();
    let started = Instant::now();
    let mut status = status_stream(options.json);

    let analysis = VideoAnalysis::with_classifier(video, classifier.clone(), config);
    let plan = analyze_video(&analysis)
        .with_context(|| format!("Failed to analyze {}", video.display()))?;

    if !options.json {
        write_plan(&mut status, &plan)?;
    }

    if options.export {
        export_plan(&mut status, &plan, config)?;
    }

    if options.timing {
        let finished_wall = chrono::Local::now();
        writeln!(
            status,
            "start: {}, end: {} : {:.3}s",
            started_wall.format("%Y%m%d%H%M%S"),
            finished_wall.format("%Y%m%d%H%M%S"),
            started.elapsed().as_secs_f64()
        )?;
    }

    Ok(plan)
}

fn export_plan(
    out: &mut dyn Write,
    plan: &HighlightPlan,
    config: &AppConfig,
) -> anyhow::Result<()> {
    if plan.requests.is_empty() {
        writeln!(out, "  Nothing to export.")?;
        return Ok(());
    }

    let mut dispatcher = ExportDispatcher::ffmpeg(config.export.max_parallel)?;
    let outputs = dispatcher.dispatch(&plan.requests)?;
    for output in &outputs {
        writeln!(out, "  -> {}", output.display())?;
    }

    if config.export.wait {
        let failures = dispatcher.wait_all();
        if failures > 0 {
            anyhow::bail!("{failures} of {} export(s) failed", outputs.len());
        }
        writeln!(out, "  {} clip(s) exported.", outputs.len())?;
    } else {
        let running = dispatcher.detach();
        writeln!(out, "  {running} export(s) running in the background.")?;
    }

    Ok(())
}

fn write_plan(out: &mut dyn Write, plan: &HighlightPlan) -> io::Result<()> {
    writeln!(out, "Video: {}", plan.source.display())?;
    writeln!(
        out,
        "  Sampled frames: {} ({} skipped)",
        plan.scan.sampled_frames, plan.scan.skipped_frames
    )?;
    writeln!(out, "  Transition runs: {}", plan.transition_runs.len())?;
    writeln!(
        out,
        "  Events: {} kills, {} deaths, {} wins",
        plan.events.kill.len(),
        plan.events.death.len(),
        plan.events.win.len()
    )?;

    writeln!(out, "  Sessions: {}", plan.sessions.len())?;
    for correlated in &plan.sessions {
        let s = correlated.session;
        writeln!(
            out,
            "    {:>6}s - {:>6}s  kills={} deaths={} wins={}",
            s.start_secs,
            s.end_secs,
            correlated.kill_secs.len(),
            correlated.death_secs.len(),
            correlated.win_secs.len()
        )?;
    }

    writeln!(out, "  Export requests: {}", plan.requests.len())?;
    for request in &plan.requests {
        writeln!(
            out,
            "    {:<9} {:>6}s - {:>6}s",
            request.label.as_str(),
            request.start_secs,
            request.end_secs
        )?;
    }
    Ok(())
}
