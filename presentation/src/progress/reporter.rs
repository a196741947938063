//! Attempt reporting for the retry loops

use colored::{ColoredString, Colorize};
use enroll_application::{AttemptNotifier, AttemptReport, Reauthentication};
use enroll_domain::{CourseCode, CourseTask, Outcome};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `sid:[..]  count:[..]  time:[..]: verdict` without colors
pub fn format_attempt_line(report: &AttemptReport) -> String {
    let mut line = format!(
        "sid:[{}]\tcount:[{}]\ttime:[{}]: {}",
        report.code,
        report.attempt,
        report.timestamp.format(TIME_FORMAT),
        report.outcome.verdict()
    );
    if let Reauthentication::Failed(reason) = &report.reauthentication {
        line.push_str(&format!(" (login failed: {})", reason));
    }
    line
}

fn paint(outcome: Outcome, text: &str) -> ColoredString {
    match outcome {
        Outcome::Success => text.green().bold(),
        Outcome::ScheduleConflict => text.red().bold(),
        Outcome::SessionExpired => text.yellow(),
        Outcome::Unknown => text.magenta(),
        Outcome::CapacityFull | Outcome::TimeWindowClosed | Outcome::NotAuthorized => {
            text.normal()
        }
    }
}

/// Prints one line per attempt, the way a terminal log reads
pub struct ConsoleReporter;

impl AttemptNotifier for ConsoleReporter {
    fn on_start(&self, codes: &[CourseCode]) {
        let list: Vec<&str> = codes.iter().map(CourseCode::as_str).collect();
        println!(
            "{} {} ({} courses)",
            "->".cyan(),
            "Registering".bold(),
            list.len()
        );
        println!("   {}", list.join(", "));
    }

    fn on_attempt(&self, report: &AttemptReport) {
        println!("{}", paint(report.outcome, &format_attempt_line(report)));
    }

    fn on_attempt_failed(&self, code: &CourseCode, attempt: u64, error: &str) {
        println!(
            "{} sid:[{}]\tcount:[{}]: {}",
            "x".red(),
            code,
            attempt,
            error
        );
    }

    fn on_authenticated(&self, generation: u64) {
        println!(
            "{} Logged in (session #{})",
            "v".green(),
            generation
        );
    }

    fn on_authentication_failed(&self, error: &str) {
        println!("{} Login failed: {}", "x".red(), error);
    }

    fn on_course_finished(&self, task: &CourseTask) {
        if let Some(outcome) = task.terminal_outcome() {
            println!(
                "{} {} stopped after {} attempt(s): {}",
                "->".cyan(),
                task.code(),
                task.attempt_count(),
                paint(outcome, outcome.verdict())
            );
        }
    }
}

/// One spinner per course, updated in place
pub struct SpinnerReporter {
    multi: MultiProgress,
    spinners: Mutex<HashMap<CourseCode, ProgressBar>>,
}

impl SpinnerReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            spinners: Mutex::new(HashMap::new()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap()
    }

    fn finished_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("  {prefix:.bold} {msg}")
            .unwrap()
    }

    fn update(&self, code: &CourseCode, message: String) {
        if let Ok(spinners) = self.spinners.lock()
            && let Some(spinner) = spinners.get(code)
        {
            spinner.set_message(message);
        }
    }
}

impl Default for SpinnerReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl AttemptNotifier for SpinnerReporter {
    fn on_start(&self, codes: &[CourseCode]) {
        let Ok(mut spinners) = self.spinners.lock() else {
            return;
        };
        for code in codes {
            let spinner = self.multi.add(ProgressBar::new_spinner());
            spinner.set_style(Self::spinner_style());
            spinner.set_prefix(code.to_string());
            spinner.set_message("waiting for a session...");
            spinner.enable_steady_tick(Duration::from_millis(120));
            spinners.insert(code.clone(), spinner);
        }
    }

    fn on_attempt(&self, report: &AttemptReport) {
        let verdict = paint(report.outcome, report.outcome.verdict());
        let message = match &report.reauthentication {
            Reauthentication::Failed(reason) => {
                format!("#{} {} (login failed: {})", report.attempt, verdict, reason)
            }
            _ => format!("#{} {}", report.attempt, verdict),
        };
        self.update(&report.code, message);
    }

    fn on_attempt_failed(&self, code: &CourseCode, attempt: u64, error: &str) {
        self.update(code, format!("#{} {} {}", attempt, "x".red(), error));
    }

    fn on_authenticated(&self, generation: u64) {
        let _ = self
            .multi
            .println(format!("{} Logged in (session #{})", "v".green(), generation));
    }

    fn on_authentication_failed(&self, error: &str) {
        let _ = self
            .multi
            .println(format!("{} Login failed: {}", "x".red(), error));
    }

    fn on_course_finished(&self, task: &CourseTask) {
        let Ok(spinners) = self.spinners.lock() else {
            return;
        };
        if let Some(spinner) = spinners.get(task.code()) {
            let verdict = task
                .final_outcome()
                .map(|outcome| paint(outcome, outcome.verdict()).to_string())
                .unwrap_or_default();
            spinner.set_style(Self::finished_style());
            spinner.finish_with_message(format!(
                "{} after {} attempt(s)",
                verdict,
                task.attempt_count()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn report(outcome: Outcome, reauthentication: Reauthentication) -> AttemptReport {
        AttemptReport {
            code: CourseCode::parse("123456").unwrap(),
            attempt: 7,
            outcome,
            timestamp: Local.with_ymd_and_hms(2026, 9, 1, 8, 30, 5).unwrap(),
            reauthentication,
            raw_body: None,
        }
    }

    #[test]
    fn test_format_attempt_line() {
        let line = format_attempt_line(&report(Outcome::CapacityFull, Reauthentication::NotNeeded));
        assert_eq!(
            line,
            "sid:[123456]\tcount:[7]\ttime:[2026-09-01 08:30:05]: course full, waiting for a seat"
        );
    }

    #[test]
    fn test_format_attempt_line_with_failed_login() {
        let line = format_attempt_line(&report(
            Outcome::SessionExpired,
            Reauthentication::Failed("Identity token not found on the portal page".to_string()),
        ));
        assert!(line.ends_with(
            "session expired, logging in again (login failed: Identity token not found on the portal page)"
        ));
    }

    #[test]
    fn test_spinner_reporter_tracks_started_courses() {
        let reporter = SpinnerReporter::new();
        let codes = vec![
            CourseCode::parse("123456").unwrap(),
            CourseCode::parse("654321").unwrap(),
        ];
        reporter.on_start(&codes);
        reporter.on_attempt(&report(Outcome::Success, Reauthentication::NotNeeded));

        let mut task = CourseTask::new(codes[0].clone());
        task.record_outcome(Outcome::Success);
        reporter.on_course_finished(&task);

        let spinners = reporter.spinners.lock().unwrap();
        assert_eq!(spinners.len(), 2);
        assert!(spinners[&codes[0]].is_finished());
        assert!(!spinners[&codes[1]].is_finished());
    }
}
