use crate::journal::{Journal, RunJournal, Step};
use crate::registration::{RegistrationRequest, RunSummary};
use crate::runner::ResolveReport;
use colored::Colorize;

/// Operator-facing summary of a resolve run.
pub fn print_resolution(report: &ResolveReport) {
    println!("\n{}", "--- Schedule Resolution ---".bold());
    println!(
        "Scraped {} courses; {} resolved, {} unresolved.",
        report.catalog.len(),
        report.resolution.resolved.len(),
        report.resolution.diagnostics.len()
    );

    for warning in &report.warnings {
        println!("{} {}", "⚠️  ignored".yellow(), warning);
    }

    for course in &report.resolution.resolved {
        let sections = course
            .components
            .iter()
            .map(|c| format!("{}/{}", c.component_id, c.section_id))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{} {} (instance {}: {})",
            "✅".green(),
            course.name.bold(),
            course.instance_id,
            sections
        );
    }

    for diagnostic in &report.resolution.diagnostics {
        println!("{} {}", "❌".red(), diagnostic);
        println!("   {} {}", "→".dimmed(), diagnostic.hint().dimmed());
    }
}

pub fn print_requests(requests: &[RegistrationRequest]) {
    println!("\n{}", "--- Dry Run: requests that would be sent ---".bold());
    for request in requests {
        println!("📤 {}", request.course_name.bold());
        for (key, value) in request.query() {
            println!("   {key}={value}");
        }
    }
}

pub fn print_summary(summary: &RunSummary) {
    println!("\n{}", "--- Registration Summary ---".bold());
    for result in &summary.results {
        if result.outcome.is_success() {
            println!("{} {}: {}", "✅".green(), result.course.bold(), result.outcome);
        } else {
            println!("{} {}: {}", "❌".red(), result.course.bold(), result.outcome.to_string().red());
        }
    }

    let line = format!(
        "Successfully registered for {} out of {} courses.",
        summary.succeeded(),
        summary.attempted()
    );
    if summary.succeeded() == summary.attempted() {
        println!("{}", line.green().bold());
    } else {
        println!("{}", line.yellow().bold());
    }
}

/// What the portal said about each course, in submission order.
pub fn print_course_log(journal: &RunJournal) {
    if journal.entries().is_empty() {
        return;
    }
    println!("\n{}", "--- Portal Exchanges ---".bold());
    for course in journal.courses() {
        println!("{}", course.bold());
        for entry in journal.for_course(course) {
            let label = format!("{:>8}", entry.step);
            match entry.step {
                Step::Outcome => println!("   {} {}", label.cyan(), entry.detail),
                Step::Cart | Step::Response => {
                    println!("   {} {}", label.dimmed(), entry.detail.dimmed())
                }
            }
        }
    }
}
