use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::cmd::step;

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running tests...".cyan().bold());
    println!();

    let total_start = Instant::now();

    if !integration_only {
        let output = step("Unit tests", &["test", "--lib", "--workspace"], true)?;
        println!("    {}", extract_test_summary(&String::from_utf8_lossy(&output.stdout)).dimmed());
    }

    if !unit_only {
        let output = step("Integration tests", &["test", "--workspace", "--test", "*"], true)?;
        println!("    {}", extract_test_summary(&String::from_utf8_lossy(&output.stdout)).dimmed());
    }

    // Doc tests are informative only.
    step("Doc tests", &["test", "--doc", "--workspace"], false)?;

    println!(
        "{}",
        format!("✓ All tests completed in {:.2}s", total_start.elapsed().as_secs_f64())
            .green()
            .bold()
    );
    println!();

    Ok(())
}

/// Add up every `test result:` line cargo printed (one per test binary).
fn extract_test_summary(output: &str) -> String {
    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut binaries = 0usize;
    for line in output.lines() {
        let Some(summary) = line.split("test result:").nth(1) else {
            continue;
        };
        binaries += 1;
        for part in summary.split(';') {
            let mut words = part.split_whitespace().rev();
            let (Some(kind), Some(count)) = (words.next(), words.next()) else {
                continue;
            };
            let Ok(count) = count.parse::<usize>() else {
                continue;
            };
            match kind {
                "passed" => passed += count,
                "failed" => failed += count,
                _ => {}
            }
        }
    }
    if binaries == 0 {
        return "(summary not available)".to_string();
    }
    format!("{passed} passed, {failed} failed across {binaries} test binaries")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_adds_up_every_binary() {
        let output = "\
running 3 tests
test result: ok. 3 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out; finished in 0.01s
running 2 tests
test result: ok. 2 passed; 0 failed; 1 ignored; 0 measured; 0 filtered out; finished in 0.20s
";
        assert_eq!(extract_test_summary(output), "5 passed, 0 failed across 2 test binaries");
    }

    #[test]
    fn missing_summary_is_reported() {
        assert_eq!(extract_test_summary("error: could not compile"), "(summary not available)");
    }
}
