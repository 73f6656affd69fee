use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::cmd::{step, TARGET};

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking haptic bridge builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    step(
        "Hardware target (STM32H7)",
        &["check", "-p", "firmware", "--target", TARGET, "--features", "hardware"],
        true,
    )?;
    step(
        "Platform crate (no_std)",
        &["check", "-p", "platform", "--target", TARGET, "--no-default-features"],
        true,
    )?;
    step(
        "Protocol crate (no_std)",
        &["check", "-p", "protocol", "--target", TARGET, "--no-default-features"],
        true,
    )?;
    step("Host library with tracing", &["check", "-p", "firmware", "--features", "tracing"], true)?;

    // Lints and formatting are reported, not enforced.
    step("Clippy", &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"], false)?;
    step("Formatting", &["fmt", "--all", "--check"], false)?;

    println!(
        "{}",
        format!("✓ All checks completed in {:.2}s", total_start.elapsed().as_secs_f64())
            .green()
            .bold()
    );
    println!();

    Ok(())
}
