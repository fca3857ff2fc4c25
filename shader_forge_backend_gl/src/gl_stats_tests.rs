//! Unit tests for the stats report

use crate::gl_stats::format_stats_report;
use shader_forge::forge::driver::DriverStats;

#[test]
fn test_report_counts() {
    let stats = DriverStats {
        stages_created: 4,
        stages_deleted: 4,
        compile_failures: 0,
        programs_created: 2,
        programs_deleted: 1,
        link_failures: 0,
    };
    let report = format_stats_report(&stats);
    assert!(report.contains("4 created, 4 deleted, 0 alive"));
    assert!(report.contains("2 created, 1 deleted, 1 alive"));
    assert!(!report.contains("failures"));
    assert!(!report.contains("never released"));
}

#[test]
fn test_report_failures_and_leaks() {
    let stats = DriverStats {
        stages_created: 3,
        stages_deleted: 1,
        compile_failures: 1,
        programs_created: 1,
        programs_deleted: 1,
        link_failures: 2,
    };
    let report = format_stats_report(&stats);
    assert!(report.contains("Compile failures:"));
    assert!(report.contains("Link failures:"));
    assert!(report.contains("2 stage object(s) never released"));
}
