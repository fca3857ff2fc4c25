/// Colored driver statistics report

use colored::*;
use shader_forge::forge::driver::DriverStats;

/// Build the report printed by `print_stats_report`
pub fn format_stats_report(stats: &DriverStats) -> String {
    let mut report = String::new();

    report.push_str(&format!("{}\n", "=== Shader Driver Report ===".bright_blue().bold()));
    report.push_str(&format!(
        "  {} {} created, {} deleted, {} alive\n",
        "Stages:".white().bold(),
        stats.stages_created,
        stats.stages_deleted,
        stats.live_stages()
    ));
    report.push_str(&format!(
        "  {} {} created, {} deleted, {} alive\n",
        "Programs:".white().bold(),
        stats.programs_created,
        stats.programs_deleted,
        stats.live_programs()
    ));
    if stats.compile_failures > 0 {
        report.push_str(&format!("  {} {}\n", "Compile failures:".red().bold(), stats.compile_failures));
    }
    if stats.link_failures > 0 {
        report.push_str(&format!("  {} {}\n", "Link failures:".red().bold(), stats.link_failures));
    }
    if stats.live_stages() > 0 {
        report.push_str(&format!("  {} {} stage object(s) never released\n", "⚠".yellow(), stats.live_stages()));
    }
    report.push_str(&format!("{}", "============================".bright_blue().bold()));

    report
}

/// Print driver statistics to stdout
pub fn print_stats_report(stats: &DriverStats) {
    println!("\n{}\n", format_stats_report(stats));
}

#[cfg(test)]
#[path = "gl_stats_tests.rs"]
mod tests;
