//! xtask play - run the desktop player
//!
//! Builds and runs the `desktop_player` example with the `emulator`
//! feature. `--music-path` becomes `MUSIC_PATH` for the child, which is
//! where `LocalFileStorage` looks for the WAV file. With `--watch`, the
//! player is re-run every time a `.rs` or `.toml` file under the crates
//! changes.

use anyhow::{Context, Result};
use colored::Colorize;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use platform::config;
use std::path::Path;
use std::process::{Command, ExitStatus};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::{Duration, Instant};

const WATCH_PATHS: &[&str] = &[
    "crates/firmware/src",
    "crates/firmware/examples",
    "crates/firmware/Cargo.toml",
    "crates/platform/src",
    "crates/playback/src",
];

/// Quiet period after a change before re-running.
const DEBOUNCE: Duration = Duration::from_millis(500);

pub fn run(music_path: Option<&Path>, file: Option<&str>, watch: bool) -> Result<()> {
    print_banner();

    if let Some(path) = music_path {
        if !path.is_dir() {
            anyhow::bail!("music path {} is not a directory", path.display());
        }
    }

    let status = play_once(music_path, file)?;
    if !watch {
        if !status.success() {
            anyhow::bail!("player exited with {status}");
        }
        return Ok(());
    }

    let (tx, rx) = channel();
    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                let relevant = matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
                    && event.paths.iter().any(|p| {
                        p.extension().is_some_and(|ext| ext == "rs" || ext == "toml")
                    });
                if relevant {
                    let _ = tx.send(());
                }
            }
        },
        notify::Config::default(),
    )?;

    for path in WATCH_PATHS.iter().map(Path::new).filter(|p| p.exists()) {
        watcher
            .watch(path, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch path: {}", path.display()))?;
    }

    println!("{}", "Watching for changes (Ctrl+C to stop)".dimmed());

    let mut last_run = Instant::now();
    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(()) => {
                if last_run.elapsed() < DEBOUNCE {
                    continue;
                }
                std::thread::sleep(Duration::from_millis(200));
                while rx.try_recv().is_ok() {}
                last_run = Instant::now();

                println!();
                println!("{}", "Changes detected - replaying...".yellow().bold());
                match play_once(music_path, file) {
                    Ok(status) if status.success() => {}
                    Ok(status) => eprintln!("{}", format!("Player exited with {status}").red()),
                    Err(e) => eprintln!("{}", format!("Run failed: {e}").red().bold()),
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

fn play_once(music_path: Option<&Path>, file: Option<&str>) -> Result<ExitStatus> {
    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.args(["run", "-p", "firmware", "--example", "desktop_player", "--features", "emulator"]);
    if let Some(path) = music_path {
        cmd.env("MUSIC_PATH", path);
    }
    if let Some(file) = file {
        cmd.args(["--", file]);
    }
    // Default RUST_LOG so the player's tracing output is visible.
    if std::env::var_os("RUST_LOG").is_none() {
        cmd.env("RUST_LOG", "info");
    }

    let status = cmd.status().context("Failed to run cargo")?;
    println!(
        "{}",
        format!("Finished in {:.1}s", start.elapsed().as_secs_f64()).dimmed()
    );
    Ok(status)
}

fn print_banner() {
    println!("{}", "═════════════════════════════════════════════".cyan());
    println!("{}", format!("     {} - Desktop Player", config::APP_NAME).cyan().bold());
    println!("{}", "═════════════════════════════════════════════".cyan());
    println!();
}
