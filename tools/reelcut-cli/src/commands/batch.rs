//! Analyze every matching video under a folder.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use walkdir::WalkDir;

use reelcut_common::config::AppConfig;
use reelcut_processing_core::pipeline::HighlightPlan;

use super::analyze::{analyze_one, load_classifier, status_stream, AnalyzeOptions};

pub fn run(
    folder: PathBuf,
    name: String,
    options: AnalyzeOptions,
    mut config: AppConfig,
) -> anyhow::Result<()> {
    options.apply(&mut config);
    let mut status = status_stream(options.json);

    let videos = find_files(&folder, &name)?;
    writeln!(
        status,
        "Found {} file(s) matching '{}' in {}",
        videos.len(),
        name,
        folder.display()
    )?;

    let mut plans = Vec::with_capacity(videos.len());
    let mut failed = Vec::new();
    if !videos.is_empty() {
        let classifier = load_classifier(&config)?;
        for video in &videos {
            match analyze_one(video, &classifier, &config, &options) {
                Ok(plan) => plans.push(plan),
                Err(e) => {
                    tracing::error!(
                        video = %video.display(),
                        error = %format!("{e:#}"),
                        "Analysis failed"
                    );
                    failed.push(video);
                }
            }
            writeln!(status)?;
        }
    }

    if options.json {
        println!("{}", plans_json(&plans)?);
    }

    if !failed.is_empty() {
        for video in &failed {
            writeln!(status, "  failed: {}", video.display())?;
        }
        anyhow::bail!("{} of {} video(s) failed", failed.len(), videos.len());
    }

    writeln!(status, "Batch complete.")?;
    Ok(())
}

/// All plans of a batch as one JSON array.
fn plans_json(plans: &[HighlightPlan]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(plans)
}

/// Recursively find files under `folder` whose file name matches `name_glob`.
pub fn find_files(folder: &Path, name_glob: &str) -> anyhow::Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        anyhow::bail!("Not a directory: {}", folder.display());
    }
    let pattern = glob::Pattern::new(name_glob)
        .with_context(|| format!("Invalid file name pattern '{name_glob}'"))?;

    let mut found = Vec::new();
    for entry in WalkDir::new(folder).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable path");
                continue;
            }
        };
        if entry.file_type().is_file() && pattern.matches(&entry.file_name().to_string_lossy()) {
            found.push(entry.into_path());
        }
    }
    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::analyze::tests::sample_plan;

    #[test]
    fn test_find_files_recurses_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("2024").join("march");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("Segment_0001.mp4"), b"").unwrap();
        std::fs::write(nested.join("Segment_0002.mp4"), b"").unwrap();
        std::fs::write(nested.join("notes.txt"), b"").unwrap();
        std::fs::create_dir(dir.path().join("folder.mp4")).unwrap();

        let found = find_files(dir.path(), "*.mp4").unwrap();
        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("2024/march/Segment_0002.mp4"));
        assert!(found[1].ends_with("Segment_0001.mp4"));
    }

    #[test]
    fn test_find_files_exact_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Segment_0001.mp4"), b"").unwrap();
        std::fs::write(dir.path().join("Segment_0002.mp4"), b"").unwrap();

        let found = find_files(dir.path(), "Segment_0002.mp4").unwrap();
        assert_eq!(found, vec![dir.path().join("Segment_0002.mp4")]);
    }

    #[test]
    fn test_batch_json_is_a_single_array() {
        let plans = [
            sample_plan("/rec/Segment_0001.mp4"),
            sample_plan("/rec/Segment_0002.mp4"),
        ];
        let json = plans_json(&plans).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let array = parsed.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[1]["source"], "/rec/Segment_0002.mp4");
        assert_eq!(array[0]["requests"][1]["label"], "kill");
    }

    #[test]
    fn test_find_files_rejects_missing_folder() {
        assert!(find_files(Path::new("/no/such/folder"), "*.mp4").is_err());
    }

    #[test]
    fn test_find_files_rejects_bad_pattern() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_files(dir.path(), "[").is_err());
    }
}
