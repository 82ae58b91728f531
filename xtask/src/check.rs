use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

const EMBEDDED_TARGET: &str = "thumbv7em-none-eabihf";

/// One `cargo check` invocation that must pass.
struct Build {
    label: &'static str,
    args: &'static [&'static str],
}

const BUILDS: &[Build] = &[
    Build {
        label: "firmware (STM32H743, hardware)",
        args: &["check", "-p", "firmware", "--target", EMBEDDED_TARGET, "--features", "hardware"],
    },
    Build {
        label: "firmware (host, emulator)",
        args: &["check", "-p", "firmware", "--features", "emulator", "--examples"],
    },
    Build {
        label: "platform (no_std)",
        args: &["check", "-p", "platform", "--target", EMBEDDED_TARGET, "--no-default-features"],
    },
    Build {
        label: "playback (no_std)",
        args: &["check", "-p", "playback", "--target", EMBEDDED_TARGET, "--no-default-features"],
    },
];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking player builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    for build in BUILDS {
        println!("{}", format!("  Checking {}...", build.label).cyan());
        let start = Instant::now();

        let output = Command::new("cargo")
            .args(build.args)
            .output()
            .with_context(|| format!("Failed to check {}", build.label))?;

        if !output.status.success() {
            eprintln!("{}", format!("  ✗ {} failed", build.label).red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("Check failed: {}", build.label);
        }

        println!(
            "{}",
            format!("  ✓ {} passed in {:.2}s", build.label, start.elapsed().as_secs_f64()).green()
        );
        println!();
    }

    // Lints and formatting are reported but never fail the run.
    println!("{}", "  Running clippy lints...".cyan());
    let clippy = Command::new("cargo")
        .args(["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
        .output()
        .context("Failed to run clippy")?;
    if clippy.status.success() {
        println!("{}", "  ✓ Clippy passed".green());
    } else {
        eprintln!("{}", "  ⚠ Clippy warnings found".yellow().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&clippy.stderr));
    }
    println!();

    println!("{}", "  Checking code formatting...".cyan());
    let fmt = Command::new("cargo")
        .args(["fmt", "--all", "--check"])
        .output()
        .context("Failed to run cargo fmt")?;
    if fmt.status.success() {
        println!("{}", "  ✓ Formatting check passed".green());
    } else {
        eprintln!("{}", "  ⚠ Formatting issues found".yellow().bold());
        eprintln!("     Run 'cargo fmt --all' to fix");
    }
    println!();

    println!(
        "{}",
        format!("✓ All checks completed in {:.2}s", total_start.elapsed().as_secs_f64())
            .green()
            .bold()
    );
    println!();

    Ok(())
}
