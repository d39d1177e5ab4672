//! Segment export: lossless trims of the source video.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use reelcut_common::error::{ReelcutError, ReelcutResult};
use reelcut_processing_core::planner::{ExportLabel, ExportRequest};

/// An export that has been started. The process, if any, is not waited on
/// unless [`SpawnedExport::wait`] is called.
#[derive(Debug)]
pub struct SpawnedExport {
    output: PathBuf,
    process: Option<Child>,
}

impl SpawnedExport {
    /// An export with a running exporter process.
    pub fn running(output: PathBuf, process: Child) -> Self {
        Self {
            output,
            process: Some(process),
        }
    }

    /// An export that completed synchronously.
    pub fn finished(output: PathBuf) -> Self {
        Self {
            output,
            process: None,
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Block until the exporter exits; a non-zero exit is an error.
    pub fn wait(self) -> ReelcutResult<PathBuf> {
        if let Some(mut child) = self.process {
            let status = child
                .wait()
                .map_err(|e| ReelcutError::export(format!("Failed to wait on ffmpeg: {e}")))?;
            if !status.success() {
                return Err(ReelcutError::export(format!(
                    "ffmpeg trim for {} failed (status {status})",
                    self.output.display()
                )));
            }
        }
        Ok(self.output)
    }
}

/// Trait for segment exporters.
pub trait SegmentExporter {
    /// Start exporting one request without waiting for it to finish.
    fn export(&self, request: &ExportRequest) -> ReelcutResult<SpawnedExport>;

    /// Check if this exporter can run on the system.
    fn is_available(&self) -> bool;

    /// Exporter name.
    fn name(&self) -> &str;
}

/// Output path for a clip: `<stem>_<label>_<start>_<end>.<ext>` next to the source.
pub fn output_path_for(
    source: &Path,
    label: ExportLabel,
    start_secs: u32,
    end_secs: u32,
) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{stem}_{label}_{start_secs}_{end_secs}");
    if let Some(ext) = source.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    source.with_file_name(name)
}

/// ffmpeg arguments for a stream-copy trim of `request` into `output`.
pub fn trim_args(request: &ExportRequest, output: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-ss".to_string(),
        request.start_secs.to_string(),
        "-i".to_string(),
        request.source.to_string_lossy().into_owned(),
        "-t".to_string(),
        request.duration_secs().to_string(),
        "-vcodec".to_string(),
        "copy".to_string(),
        "-acodec".to_string(),
        "copy".to_string(),
        output.to_string_lossy().into_owned(),
    ]
}

/// Lossless trimming through the `ffmpeg` binary.
#[derive(Debug, Default)]
pub struct FfmpegTrimExporter;

impl FfmpegTrimExporter {
    pub fn new() -> Self {
        Self
    }
}

impl SegmentExporter for FfmpegTrimExporter {
    fn export(&self, request: &ExportRequest) -> ReelcutResult<SpawnedExport> {
        let output = output_path_for(
            &request.source,
            request.label,
            request.start_secs,
            request.end_secs,
        );
        let args = trim_args(request, &output);
        tracing::debug!(?args, "Running ffmpeg");

        let child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ReelcutError::export(format!("Failed to start ffmpeg: {e}")))?;

        tracing::info!(
            pid = child.id(),
            label = %request.label,
            start = request.start_secs,
            end = request.end_secs,
            output = %output.display(),
            "Export started"
        );
        Ok(SpawnedExport::running(output, child))
    }

    fn is_available(&self) -> bool {
        command_exists("ffmpeg")
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

/// Dispatches export requests, optionally bounding how many run at once.
pub struct ExportDispatcher {
    exporter: Box<dyn SegmentExporter>,
    max_parallel: Option<usize>,
    in_flight: VecDeque<SpawnedExport>,
    failures: usize,
}

impl ExportDispatcher {
    pub fn new(exporter: Box<dyn SegmentExporter>, max_parallel: Option<usize>) -> Self {
        Self {
            exporter,
            max_parallel: max_parallel.map(|n| n.max(1)),
            in_flight: VecDeque::new(),
            failures: 0,
        }
    }

    /// Dispatch with the ffmpeg exporter, failing early if ffmpeg is missing.
    pub fn ffmpeg(max_parallel: Option<usize>) -> ReelcutResult<Self> {
        let exporter = FfmpegTrimExporter::new();
        if !exporter.is_available() {
            return Err(ReelcutError::unsupported(
                "No supported exporter found (expected ffmpeg in PATH)",
            ));
        }
        Ok(Self::new(Box::new(exporter), max_parallel))
    }

    /// Start every request, returning the output paths in request order.
    ///
    /// With a parallelism cap, the oldest export is waited for before a new
    /// one starts. A spawn failure stops dispatching.
    pub fn dispatch(&mut self, requests: &[ExportRequest]) -> ReelcutResult<Vec<PathBuf>> {
        let mut outputs = Vec::with_capacity(requests.len());
        for request in requests {
            if let Some(limit) = self.max_parallel {
                while self.in_flight.len() >= limit {
                    self.reap_oldest();
                }
            }
            let spawned = self.exporter.export(request)?;
            outputs.push(spawned.output().to_path_buf());
            self.in_flight.push_back(spawned);
        }
        Ok(outputs)
    }

    fn reap_oldest(&mut self) {
        if let Some(export) = self.in_flight.pop_front() {
            if let Err(e) = export.wait() {
                tracing::warn!(error = %e, "Export failed");
                self.failures += 1;
            }
        }
    }

    /// Wait for every export still running. Returns how many failed overall.
    pub fn wait_all(mut self) -> usize {
        while !self.in_flight.is_empty() {
            self.reap_oldest();
        }
        self.failures
    }

    /// Stop tracking running exports and leave them to finish on their own.
    pub fn detach(self) -> usize {
        let detached = self.in_flight.len();
        tracing::debug!(detached, "Detached running exports");
        detached
    }

    pub fn exporter_name(&self) -> &str {
        self.exporter.name()
    }
}

pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
