//! Check system tools and reference patterns.

use std::path::Path;

use reelcut_common::config::AppConfig;
use reelcut_render_engine::command_exists;

pub fn run(config: &AppConfig, config_path: &Path) -> anyhow::Result<()> {
    println!("reelcut System Check");
    println!("{}", "=".repeat(50));

    let mut all_ok = true;
    for binary in ["ffmpeg", "ffprobe"] {
        if command_exists(binary) {
            println!("[OK] {binary} found in PATH");
        } else {
            println!("[FAIL] {binary} not found in PATH");
            all_ok = false;
        }
    }

    println!();
    if config_path.exists() {
        println!("[OK] Config: {}", config_path.display());
    } else {
        println!("[INFO] No config at {} (using defaults)", config_path.display());
    }

    let missing = config.patterns.missing();
    for (name, path) in [
        ("kill", &config.patterns.kill),
        ("death", &config.patterns.death),
        ("win", &config.patterns.win),
    ] {
        if missing.contains(&path.as_path()) {
            println!("[FAIL] {name} pattern missing: {}", path.display());
        } else {
            println!("[OK] {name} pattern: {}", path.display());
        }
    }
    all_ok &= missing.is_empty();

    println!();
    if all_ok {
        println!("All requirements are available. reelcut is ready.");
    } else {
        println!("Some requirements are missing. See above for fixes.");
    }

    Ok(())
}
