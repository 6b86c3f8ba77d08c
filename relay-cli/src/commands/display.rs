//! Terminal output for job status

use colored::*;
use relay_core::domain::job::JobHandle;
use relay_core::domain::status::{JobStatus, OverallResult, StageStatus};
use relay_poller::PollError;
use std::path::{Path, PathBuf};

/// Print a job header followed by one line per stage
pub fn print_status(label: &str, handle: &JobHandle, status: &JobStatus, result: OverallResult) {
    println!("{}", format!("{} {}", capitalize(label), handle).bold());
    println!("  Result: {}", colorize_result(result));

    if status.environments.is_empty() {
        println!("  {}", "No stages reported".dimmed());
        return;
    }

    for stage in &status.environments {
        let name = stage.name.as_deref().unwrap_or(label);
        println!("  {} {:<30} {}", "▸".cyan(), name, colorize_status(stage.status));
    }
}

/// Print the details attached to a poll error, when there are any
pub fn print_failure(label: &str, error: &PollError) {
    if let PollError::JobFailed { status, .. } = error {
        for stage in &status.environments {
            let name = stage.name.as_deref().unwrap_or(label);
            println!("  {} {:<30} {}", "▸".red(), name, colorize_status(stage.status));
        }
    }
}

/// Print a summary of an unpacked artifact
pub fn print_extracted(name: &str, destination: &Path, files: &[PathBuf]) {
    println!(
        "{} Extracted {} file(s) from '{}' into {}",
        "✓".green(),
        files.len(),
        name,
        destination.display()
    );
    for file in files {
        println!("  {}", file.display().to_string().dimmed());
    }
}

pub fn print_link(url: &str) {
    println!("  More details: {}", url.underline());
}

fn colorize_status(status: StageStatus) -> ColoredString {
    let text = status.as_str();
    match status {
        StageStatus::Succeeded => text.green(),
        StageStatus::PartiallySucceeded => text.yellow(),
        StageStatus::Failed | StageStatus::Rejected => text.red(),
        StageStatus::Canceled => text.dimmed(),
        StageStatus::InProgress => text.cyan(),
        StageStatus::Queued | StageStatus::Scheduled | StageStatus::NotStarted => text.yellow(),
        _ => text.normal(),
    }
}

fn colorize_result(result: OverallResult) -> ColoredString {
    let text = result.to_string();
    match result {
        OverallResult::Succeeded => text.green(),
        OverallResult::PartiallySucceeded | OverallResult::Pending => text.yellow(),
        OverallResult::Failed | OverallResult::Rejected => text.red(),
        _ => text.dimmed(),
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
