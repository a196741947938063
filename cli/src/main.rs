//! CLI entrypoint for course-enroll
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use enroll_application::{
    AttemptNotifier, NoNotifier, RetryScheduler, SessionManager, SubmissionGate, TerminalPolicy,
};
use enroll_domain::Session;
use enroll_infrastructure::{
    ConfigLoader, CourseListLoader, CredentialsLoader, JsonlAttemptLogger, ReqwestPortalClient,
};
use enroll_presentation::{Cli, ConsoleReporter, SpinnerReporter, SummaryFormatter};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the console subscriber and, with `--log-dir`, a daily log file.
///
/// The returned guard must live until exit so buffered file lines get written.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "course-enroll.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    info!("Starting course-enroll");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;

    // Inputs are checked before any request reaches the portal
    let credentials_path = cli
        .credentials
        .clone()
        .unwrap_or_else(|| config.files.credentials.clone());
    let credentials = CredentialsLoader::load(&credentials_path)?;

    let codes = if cli.course.is_empty() {
        let course_list = cli
            .courses
            .clone()
            .unwrap_or_else(|| config.files.course_list.clone());
        CourseListLoader::from_file(&course_list)?
    } else {
        CourseListLoader::from_arguments(&cli.course)?
    };

    let mut schedule = config.schedule_config();
    if let Some(interval_ms) = cli.interval_ms {
        schedule = schedule.with_interval(Duration::from_millis(interval_ms));
    }
    if let Some(policy) = cli.terminal_policy {
        schedule = schedule.with_terminal_policy(policy);
    }
    if cli.keep_retrying {
        schedule = schedule.with_terminal_policy(TerminalPolicy::KeepRetrying);
    }

    // === Dependency Injection ===
    // Create infrastructure adapter (portal transport)
    let client = Arc::new(ReqwestPortalClient::new(&config.portal)?);

    // One shared session behind the submission gate
    let session = Arc::new(Mutex::new(Session::new()));
    let manager = SessionManager::new(Arc::clone(&client), credentials);
    let gate = Arc::new(SubmissionGate::new(session, manager, client));

    let notifier: Arc<dyn AttemptNotifier> = if cli.quiet {
        Arc::new(NoNotifier)
    } else if cli.progress {
        Arc::new(SpinnerReporter::new())
    } else {
        Arc::new(ConsoleReporter)
    };

    let mut scheduler = RetryScheduler::new(gate, schedule).with_notifier(notifier);
    if let Some(path) = &cli.attempt_log {
        match JsonlAttemptLogger::new(path) {
            Some(logger) => {
                info!("Attempt log: {}", logger.path().display());
                scheduler = scheduler.with_logger(Arc::new(logger));
            }
            None => warn!("Attempt logging disabled"),
        }
    }

    // Ctrl-C stops every course loop at its next suspension point
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping course loops");
            on_interrupt.cancel();
        }
    });

    let summary = scheduler.run(codes, cancel).await;

    println!();
    println!("{}", SummaryFormatter::format(&summary));

    Ok(())
}
