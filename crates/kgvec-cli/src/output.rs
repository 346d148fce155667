//! Terminal output formatting.

use colored::Colorize;

use kgvec_sync::{SnapshotMode, SyncReport};

/// Print one `label: value` line.
pub fn field(label: &str, value: &str) {
    println!("  {:<16} {}", format!("{}:", label).bold(), value);
}

/// Print the summary of a finished run.
pub fn print_report(report: &SyncReport, collection: &str, scan_limit: u32) {
    println!();
    if report.fetched == 0 {
        println!("{}", "Graph returned no entities; nothing to do.".dimmed());
        return;
    }

    let title = if report.has_failures() {
        "Sync finished with failures:".yellow().bold()
    } else {
        "Sync complete:".green().bold()
    };
    println!("{} {}", title, collection.cyan());

    if report.collection_created {
        println!("  {}", "Created collection".dimmed());
    }

    field("Entities", &report.fetched.to_string());
    field("New", &report.new.to_string().green().to_string());
    field("Changed", &report.changed.to_string().cyan().to_string());
    field("Unchanged", &report.unchanged.to_string().dimmed().to_string());
    field("No text", &report.skipped_empty.to_string());

    if report.duplicates > 0 {
        field("Merged records", &report.duplicates.to_string());
    }
    if report.malformed > 0 {
        field("Malformed rows", &report.malformed.to_string().yellow().to_string());
    }
    if report.failed > 0 {
        field("Failed", &report.failed.to_string().red().to_string());
    }

    field(
        "Written",
        &format!("{} point(s) in {} batch(es)", report.points_written, report.flushes),
    );

    let summary = snapshot_summary(report, scan_limit);
    let snapshot = match report.snapshot {
        SnapshotMode::Complete => summary.as_str().normal(),
        SnapshotMode::Truncated | SnapshotMode::Degraded => summary.as_str().yellow(),
    };
    field("Prior snapshot", &snapshot.to_string());
}

/// Plain description of how much stored state the run could compare against.
fn snapshot_summary(report: &SyncReport, scan_limit: u32) -> String {
    match report.snapshot {
        SnapshotMode::Complete => format!("{} stored point(s)", report.prior_points),
        SnapshotMode::Truncated => {
            format!("scan stopped at the {} point limit; raise scan_limit", scan_limit)
        }
        SnapshotMode::Degraded => "unreadable; everything was re-embedded".to_string(),
    }
}
