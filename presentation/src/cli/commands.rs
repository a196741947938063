//! CLI command definitions

use clap::Parser;
use enroll_application::TerminalPolicy;
use std::path::PathBuf;

/// CLI arguments for course-enroll
#[derive(Parser, Debug)]
#[command(name = "course-enroll")]
#[command(author, version, about = "Keep submitting course registrations until they go through")]
#[command(long_about = r#"
course-enroll logs into the UCAS portal and submits a registration for every
requested course, once per interval, until the course system accepts it or
reports a class-time conflict. When the portal drops the session it logs in
again transparently.

Input files (paths configurable under [files]):
  info.properties   userName=... and pwd=... (or ENROLL_USER_NAME / ENROLL_PWD)
  courseList.txt    one six-digit course code per line

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./enroll.toml       Project-level config
3. ~/.config/course-enroll/config.toml   Global config

Example:
  course-enroll
  course-enroll -c 200100 -c 200101 --interval-ms 500
  course-enroll --progress --attempt-log attempts.jsonl
"#)]
pub struct Cli {
    /// Course codes to register (can be specified multiple times, replaces the course list file)
    #[arg(short, long, value_name = "CODE")]
    pub course: Vec<String>,

    /// Path to the course list file
    #[arg(long, value_name = "PATH")]
    pub courses: Option<PathBuf>,

    /// Path to the credentials properties file
    #[arg(long, value_name = "PATH")]
    pub credentials: Option<PathBuf>,

    /// Delay between two attempts of the same course, in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,

    /// What to do after a course is registered or conflicts (halt, keep_retrying)
    #[arg(long, value_name = "POLICY")]
    pub terminal_policy: Option<TerminalPolicy>,

    /// Keep submitting after a course is registered or conflicts
    #[arg(long)]
    pub keep_retrying: bool,

    /// Show one spinner per course instead of a line per attempt
    #[arg(long)]
    pub progress: bool,

    /// Append one JSON line per attempt to this file
    #[arg(long, value_name = "PATH")]
    pub attempt_log: Option<PathBuf>,

    /// Also write diagnostic logs to daily files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress per-attempt output (the final summary is still printed)
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["course-enroll"]).unwrap();
        assert!(cli.course.is_empty());
        assert!(cli.courses.is_none());
        assert!(cli.interval_ms.is_none());
        assert!(!cli.keep_retrying);
        assert!(cli.terminal_policy.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_repeated_course_flags() {
        let cli = Cli::try_parse_from([
            "course-enroll",
            "-c",
            "123456",
            "--course",
            "654321",
            "--interval-ms",
            "250",
            "--keep-retrying",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.course, vec!["123456", "654321"]);
        assert_eq!(cli.interval_ms, Some(250));
        assert!(cli.keep_retrying);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_file_flags() {
        let cli = Cli::try_parse_from([
            "course-enroll",
            "--courses",
            "wanted.txt",
            "--credentials",
            "secret.properties",
            "--attempt-log",
            "logs/attempts.jsonl",
        ])
        .unwrap();
        assert_eq!(cli.courses, Some(PathBuf::from("wanted.txt")));
        assert_eq!(cli.credentials, Some(PathBuf::from("secret.properties")));
        assert_eq!(cli.attempt_log, Some(PathBuf::from("logs/attempts.jsonl")));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        assert!(Cli::try_parse_from(["course-enroll", "--interval-ms", "0"]).is_err());
    }

    #[test]
    fn test_terminal_policy_flag() {
        let cli =
            Cli::try_parse_from(["course-enroll", "--terminal-policy", "keep_retrying"]).unwrap();
        assert_eq!(cli.terminal_policy, Some(TerminalPolicy::KeepRetrying));

        let cli = Cli::try_parse_from(["course-enroll", "--terminal-policy", "halt"]).unwrap();
        assert_eq!(cli.terminal_policy, Some(TerminalPolicy::Halt));

        assert!(Cli::try_parse_from(["course-enroll", "--terminal-policy", "forever"]).is_err());
    }
}
