//! Console output for the final enrollment summary

use colored::Colorize;
use enroll_application::EnrollmentSummary;
use enroll_domain::{CourseTask, Outcome};

/// Formats the end-of-run summary table
pub struct SummaryFormatter;

impl SummaryFormatter {
    pub fn format(summary: &EnrollmentSummary) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Enrollment Summary"));
        output.push('\n');
        output.push_str(&format!(
            "{:<8}  {:>8}  {:>8}  {}\n",
            "Course".cyan().bold(),
            "Attempts".cyan().bold(),
            "Errors".cyan().bold(),
            "Verdict".cyan().bold()
        ));

        for task in &summary.tasks {
            output.push_str(&Self::row(task));
        }

        let registered = summary.registered().count();
        output.push('\n');
        output.push_str(&format!(
            "{} {}/{} registered\n",
            "Result:".bold(),
            registered,
            summary.tasks.len()
        ));
        if !summary.all_finished() {
            output.push_str(&format!(
                "{}\n",
                "Stopped before every course reached a final verdict".yellow()
            ));
        }

        output
    }

    fn row(task: &CourseTask) -> String {
        let verdict = match task.final_outcome() {
            Some(Outcome::Success) => Outcome::Success.verdict().green().bold(),
            Some(Outcome::ScheduleConflict) => Outcome::ScheduleConflict.verdict().red().bold(),
            Some(outcome) => outcome.verdict().normal(),
            None => "no verdict yet".dimmed(),
        };
        format!(
            "{:<8}  {:>8}  {:>8}  {}\n",
            task.code().as_str(),
            task.attempt_count(),
            task.failures(),
            verdict
        )
    }

    fn header(title: &str) -> String {
        format!("{}\n{}\n", title.bold(), "=".repeat(title.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enroll_domain::CourseCode;

    fn task(code: &str, outcomes: &[Outcome], failures: usize) -> CourseTask {
        let mut task = CourseTask::new(CourseCode::parse(code).unwrap());
        for _ in 0..failures {
            task.record_failure();
        }
        for outcome in outcomes {
            task.record_outcome(*outcome);
        }
        task
    }

    #[test]
    fn test_summary_lists_every_course() {
        let summary = EnrollmentSummary {
            tasks: vec![
                task("123456", &[Outcome::CapacityFull, Outcome::Success], 0),
                task("654321", &[Outcome::ScheduleConflict], 2),
            ],
        };

        let output = SummaryFormatter::format(&summary);
        let lines: Vec<&str> = output.lines().collect();

        let first = lines.iter().find(|l| l.starts_with("123456")).unwrap();
        assert!(first.contains("registered"));
        let second = lines.iter().find(|l| l.starts_with("654321")).unwrap();
        assert!(second.contains("class-time conflict"));
        assert!(output.contains("1/2 registered"));
        assert!(!output.contains("Stopped before"));
    }

    #[test]
    fn test_summary_flags_unfinished_runs() {
        let summary = EnrollmentSummary {
            tasks: vec![task("123456", &[Outcome::CapacityFull], 1), task("222222", &[], 0)],
        };

        let output = SummaryFormatter::format(&summary);
        assert!(output.contains("0/2 registered"));
        assert!(output.contains("no verdict yet"));
        assert!(output.contains("Stopped before every course reached a final verdict"));
    }

    #[test]
    fn test_summary_keeps_success_after_later_replies() {
        let summary = EnrollmentSummary {
            tasks: vec![task("123456", &[Outcome::Success, Outcome::Unknown], 0)],
        };

        let output = SummaryFormatter::format(&summary);
        let row = output.lines().find(|l| l.starts_with("123456")).unwrap();
        assert!(row.contains("registered"));
        assert!(!row.contains("unrecognised response"));
        assert!(output.contains("1/1 registered"));
        assert!(!output.contains("Stopped before"));
    }
}
