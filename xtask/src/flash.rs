use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

use crate::cmd::TARGET;

pub fn run(release: bool, samples: Option<&Path>) -> Result<()> {
    let mode = if release { "release" } else { "debug" };

    println!();
    println!("{}", format!("🔨 Building firmware ({mode} mode)...").cyan().bold());
    match samples {
        Some(dir) => println!("   {}", format!("linking samples from {}", dir.display()).dimmed()),
        None => println!("   {}", "no sample directory given; the image carries no samples".dimmed()),
    }
    println!();

    let build_start = Instant::now();
    let mut build_cmd = Command::new("cargo");
    build_cmd.args(["build", "-p", "firmware", "--target", TARGET, "--features", "hardware"]);
    if release {
        build_cmd.arg("--release");
    }
    // build.rs embeds `<id>.wav` files from SAMPLE_DIR.
    match samples {
        Some(dir) => {
            let dir = dir
                .canonicalize()
                .with_context(|| format!("Sample directory {} not found", dir.display()))?;
            build_cmd.env("SAMPLE_DIR", dir);
        }
        None => {
            build_cmd.env_remove("SAMPLE_DIR");
        }
    }

    let build_output = build_cmd.output().context("Failed to run cargo build")?;
    if !build_output.status.success() {
        eprintln!("{}", "✗ Build failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&build_output.stderr));
        anyhow::bail!("Build failed");
    }
    println!(
        "{}",
        format!("✓ Build successful in {:.2}s", build_start.elapsed().as_secs_f64()).green()
    );
    println!();

    let binary = format!("target/{TARGET}/{mode}/firmware");
    show_binary_size(&binary);
    println!();

    println!("{}", "📡 Flashing to STM32H7...".cyan().bold());
    println!("   {}", "Connecting to probe...".dimmed());

    let flash_start = Instant::now();
    let flash_output = Command::new("probe-rs")
        .args(["download", &binary, "--chip", "STM32H743ZITx", "--probe-index", "0"])
        .output()
        .context("Failed to run probe-rs. Is probe-rs installed? (cargo install probe-rs-tools)")?;

    if !flash_output.status.success() {
        eprintln!("{}", "✗ Flash failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&flash_output.stderr));
        anyhow::bail!("Flash failed - check that the probe is connected and the board is powered");
    }
    println!(
        "{}",
        format!("✓ Flash successful in {:.2}s", flash_start.elapsed().as_secs_f64()).green()
    );
    println!();
    println!("{}", "Haptic bridge is running on hardware".bold());
    println!(
        "   {}",
        "Use 'probe-rs attach --chip STM32H743ZITx' to view RTT logs".dimmed()
    );
    println!();

    Ok(())
}

fn show_binary_size(binary: &str) {
    let Ok(out) = Command::new("rust-size").args([binary, "-A"]).output() else {
        return;
    };
    if out.status.success() {
        println!("{}", "📊 Binary size:".cyan());
        for line in String::from_utf8_lossy(&out.stdout).lines() {
            println!("   {}", line.dimmed());
        }
    }
}
