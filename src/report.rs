//! Report module: per-run lines during the experiment and the final
//! fastest-operations summary. Purely observational — nothing here feeds
//! back into the experiment state.

use crate::fastest::Fastest;
use std::time::Duration;

/// Outcome of one strategy under one pragma combination. Failures carry the
/// rendered error message; nothing else about a failed run is kept.
#[derive(Debug, Clone)]
pub struct StrategyRun {
    pub strategy: &'static str,
    pub pragmas: Vec<String>,
    pub outcome: Result<Duration, String>,
}

/// A configuration whose setup (open, pragma application, reset, or close)
/// failed before or after its strategies could run.
#[derive(Debug, Clone)]
pub struct ConfigurationAbort {
    pub pragmas: Vec<String>,
    pub error: String,
}

/// Everything the driver observed, in execution order.
#[derive(Debug, Default)]
pub struct ExperimentLog {
    pub runs: Vec<StrategyRun>,
    pub aborted: Vec<ConfigurationAbort>,
}

fn ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn set_label(pragmas: &[String]) -> String {
    if pragmas.is_empty() {
        "(no pragmas)".to_string()
    } else {
        pragmas.join(", ")
    }
}

/// Header printed before a configuration's strategies run.
pub fn print_configuration(pragmas: &[String]) {
    let label = set_label(pragmas);
    let bar = "─".repeat(72usize.saturating_sub(label.len()));
    println!("\n── {label} {bar}");
}

/// One line per strategy run.
pub fn print_run(strategy: &str, outcome: &Result<Duration, String>) {
    match outcome {
        Ok(duration) => println!("  {:<46} {:>10.3} ms", strategy, ms(*duration)),
        Err(error) => println!("  {:<46} FAILED: {}", strategy, error),
    }
}

/// Final leaderboard plus a failures section when anything went wrong.
pub fn print_report(log: &ExperimentLog, fastest: &Fastest) {
    println!("\n{}", "=".repeat(80));
    println!("  Fastest operations");
    println!("{}", "=".repeat(80));

    for (strategy, best) in fastest.snapshot() {
        println!("\n  {:<46} {:>10.3} ms", strategy, ms(best.duration));
        for winner in &best.winners {
            if winner.is_empty() {
                println!("      (no pragmas)");
                continue;
            }
            // Sorted copy for stable display; application order lives in the log.
            let mut sorted = winner.clone();
            sorted.sort();
            for pragma in &sorted {
                println!("      {pragma}");
            }
        }
    }

    let failures: Vec<&StrategyRun> = log.runs.iter().filter(|r| r.outcome.is_err()).collect();
    if !failures.is_empty() || !log.aborted.is_empty() {
        println!("\n{}", "=".repeat(80));
        println!("  Failures");
        println!("{}", "=".repeat(80));
        for run in failures {
            if let Err(error) = &run.outcome {
                println!(
                    "  {} under [{}]: {}",
                    run.strategy,
                    set_label(&run.pragmas),
                    error
                );
            }
        }
        for abort in &log.aborted {
            println!(
                "  configuration [{}] aborted: {}",
                set_label(&abort.pragmas),
                abort.error
            );
        }
    }

    println!();
}
