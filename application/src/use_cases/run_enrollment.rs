//! Run Enrollment use case
//!
//! Spawns one retry loop per requested course and drives each through the
//! shared [`SubmissionGate`] until it halts or the run is cancelled.

use crate::config::{ScheduleConfig, TerminalPolicy};
use crate::ports::attempt_logger::{AttemptEvent, AttemptLogger, NoAttemptLogger};
use crate::ports::attempt_notifier::{AttemptNotifier, NoNotifier};
use crate::ports::portal_client::PortalClient;
use crate::use_cases::submit_course::SubmissionGate;
use enroll_domain::{CourseCode, CourseTask, Outcome};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Final state of every course loop
#[derive(Debug, Clone, Default)]
pub struct EnrollmentSummary {
    /// One entry per requested course, in request order
    pub tasks: Vec<CourseTask>,
}

impl EnrollmentSummary {
    /// Courses whose terminal verdict was `Success`
    pub fn registered(&self) -> impl Iterator<Item = &CourseTask> {
        self.tasks
            .iter()
            .filter(|t| t.terminal_outcome() == Some(Outcome::Success))
    }

    /// Whether every course reached a terminal verdict
    pub fn all_finished(&self) -> bool {
        self.tasks.iter().all(CourseTask::is_finished)
    }
}

/// Use case for running the per-course retry loops
pub struct RetryScheduler<C: PortalClient + 'static> {
    gate: Arc<SubmissionGate<C>>,
    config: ScheduleConfig,
    notifier: Arc<dyn AttemptNotifier>,
    logger: Arc<dyn AttemptLogger>,
}

impl<C: PortalClient + 'static> RetryScheduler<C> {
    pub fn new(gate: Arc<SubmissionGate<C>>, config: ScheduleConfig) -> Self {
        Self {
            gate,
            config,
            notifier: Arc::new(NoNotifier),
            logger: Arc::new(NoAttemptLogger),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn AttemptNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn AttemptLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Authenticate once, then run every course loop to completion.
    ///
    /// A failed startup handshake is not fatal: the session stays stale and
    /// the first attempt of any loop retries it. Returns when every loop has
    /// halted or `cancel` fires.
    pub async fn run(&self, codes: Vec<CourseCode>, cancel: CancellationToken) -> EnrollmentSummary {
        info!("Starting enrollment for {} courses", codes.len());
        self.notifier.on_start(&codes);

        self.startup_authentication(&cancel).await;

        let mut join_set = JoinSet::new();
        let mut slots: Vec<Option<CourseTask>> = Vec::with_capacity(codes.len());

        for (index, code) in codes.into_iter().enumerate() {
            slots.push(Some(CourseTask::new(code.clone())));

            let gate = Arc::clone(&self.gate);
            let config = self.config.clone();
            let notifier = Arc::clone(&self.notifier);
            let logger = Arc::clone(&self.logger);
            let cancel = cancel.clone();

            join_set.spawn(async move {
                let task = CourseTask::new(code);
                let task = Self::course_loop(&gate, &config, &*notifier, &*logger, task, &cancel)
                    .await;
                (index, task)
            });
        }

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((index, task)) => slots[index] = Some(task),
                Err(e) => warn!("Course loop join error: {}", e),
            }
        }

        EnrollmentSummary {
            tasks: slots.into_iter().flatten().collect(),
        }
    }

    async fn startup_authentication(&self, cancel: &CancellationToken) {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            result = self.gate.authenticate() => result,
        };

        match result {
            Ok(generation) => {
                self.notifier.on_authenticated(generation);
                self.logger.log(AttemptEvent::new(
                    "authenticated",
                    serde_json::json!({ "generation": generation }),
                ));
            }
            Err(e) => {
                warn!("Startup authentication failed, retrying on first attempt: {}", e);
                self.notifier.on_authentication_failed(&e.to_string());
                self.logger.log(AttemptEvent::new(
                    "authentication_failed",
                    serde_json::json!({ "error": e.to_string() }),
                ));
            }
        }
    }

    /// Retry loop for one course
    async fn course_loop(
        gate: &SubmissionGate<C>,
        config: &ScheduleConfig,
        notifier: &dyn AttemptNotifier,
        logger: &dyn AttemptLogger,
        mut task: CourseTask,
        cancel: &CancellationToken,
    ) -> CourseTask {
        loop {
            let attempt = task.attempt_count();

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                result = gate.submit(task.code(), attempt) => result,
            };

            match result {
                Ok(report) => {
                    task.record_outcome(report.outcome);
                    notifier.on_attempt(&report);
                    logger.log(AttemptEvent::attempt(&report));
                }
                Err(e) => {
                    warn!("sid:[{}] count:[{}] attempt failed: {}", task.code(), attempt, e);
                    task.record_failure();
                    notifier.on_attempt_failed(task.code(), attempt, &e.to_string());
                    logger.log(AttemptEvent::failure(task.code(), attempt, &e.to_string()));
                }
            }

            if task.is_finished() && config.terminal_policy == TerminalPolicy::Halt {
                info!(
                    "sid:[{}] finished after {} attempts: {}",
                    task.code(),
                    task.attempt_count(),
                    task.terminal_outcome().map(|o| o.verdict()).unwrap_or_default()
                );
                notifier.on_course_finished(&task);
                logger.log(AttemptEvent::finished(
                    task.code(),
                    task.attempt_count(),
                    task.terminal_outcome().map(|o| o.as_str()).unwrap_or_default(),
                ));
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(config.interval) => {}
            }
        }

        debug!("sid:[{}] loop exited", task.code());
        task
    }
}
