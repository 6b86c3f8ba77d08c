//! Remote job poller
//!
//! Triggers one remote job and polls its status on a fixed interval until
//! every stage is terminal, then classifies the outcome.
//!
//! The only suspension point is the wait between two status queries. It races
//! the interval timer against a `CancellationToken` and, when configured, an
//! overall deadline.

use relay_core::domain::definition::{DefinitionRef, DefinitionSelector};
use relay_core::domain::job::{JobHandle, Parameters};
use relay_core::domain::status::{JobStatus, Outcome, classify_outcome};
use std::path::{Path, PathBuf};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::artifact;
use crate::config::PollerConfig;
use crate::error::{ConfigurationError, PollError};
use crate::kind::JobKind;

/// A job that reached a terminal state without being classified as failed
#[derive(Debug, Clone)]
pub struct Completion {
    pub handle: JobHandle,
    pub status: JobStatus,
    pub outcome: Outcome,
    pub url: String,
}

/// Triggers and awaits jobs of one kind
pub struct RemoteJobPoller<K> {
    kind: K,
    config: PollerConfig,
}

impl<K: JobKind> RemoteJobPoller<K> {
    /// Creates a new poller
    pub fn new(kind: K, config: PollerConfig) -> Self {
        Self { kind, config }
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Triggers a job and waits for it, failing when the job fails
    ///
    /// On failure, timeout or cancellation the error carries the job's
    /// detail URL.
    pub async fn run(
        &self,
        selector: &DefinitionSelector,
        parameters: &Parameters,
        cancel: &CancellationToken,
    ) -> Result<Completion, PollError> {
        let handle = self.trigger(selector, parameters).await?;
        let status = self.await_completion(&handle, cancel).await?;
        self.conclude(handle, status)
    }

    /// Turns a complete status into a `Completion`, or `JobFailed` when
    /// every stage failed
    pub fn conclude(
        &self,
        handle: JobHandle,
        status: JobStatus,
    ) -> Result<Completion, PollError> {
        let url = self.kind.detail_url(&handle);

        match self.classify(&status) {
            Outcome::Failed => {
                error!("{} {} failed: {}", self.kind.label(), handle, url);
                Err(PollError::JobFailed {
                    kind: self.kind.label().to_string(),
                    id: handle.id,
                    result: status.overall_result(self.kind.vocabulary()),
                    status,
                    url,
                })
            }
            outcome => {
                info!("{} {} succeeded", self.kind.label(), handle);
                Ok(Completion {
                    handle,
                    status,
                    outcome,
                    url,
                })
            }
        }
    }

    /// Resolves the definition and starts one job from it
    ///
    /// The selector must match exactly one definition; otherwise nothing is
    /// started. Not idempotent: every successful call starts a new job.
    pub async fn trigger(
        &self,
        selector: &DefinitionSelector,
        parameters: &Parameters,
    ) -> Result<JobHandle, PollError> {
        let definition = self.resolve_definition(selector).await?;

        info!(
            "Triggering {} definition '{}' (#{})",
            self.kind.label(),
            definition.name,
            definition.id
        );

        let handle = self.kind.create(&definition, parameters).await?;

        info!(
            "Triggered {} {}. More details: {}",
            self.kind.label(),
            handle,
            self.kind.detail_url(&handle)
        );

        Ok(handle)
    }

    /// Polls until every stage of the job is terminal
    ///
    /// Returns the first complete status. Transient status-query failures are
    /// retried on the normal interval until `max_status_failures` consecutive
    /// queries have failed; any other failure surfaces at once. Cancellation
    /// and the deadline also interrupt a query that is still in flight.
    pub async fn await_completion(
        &self,
        handle: &JobHandle,
        cancel: &CancellationToken,
    ) -> Result<JobStatus, PollError> {
        let vocabulary = self.kind.vocabulary();
        let started = Instant::now();
        // A deadline too far out to represent is no deadline at all.
        let deadline = self
            .config
            .max_wait
            .and_then(|max_wait| started.checked_add(max_wait));
        let mut failures = 0u32;
        let mut polls = 0u32;

        loop {
            polls += 1;

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(self.cancelled(handle)),
                result = self.kind.fetch_status(handle) => result,
                _ = sleep_until(deadline) => return Err(self.timed_out(handle, started)),
            };

            match result {
                Ok(status) if status.is_complete(vocabulary) => {
                    info!(
                        "{} {} completed after {} poll(s): {}",
                        self.kind.label(),
                        handle,
                        polls,
                        status.overall_result(vocabulary)
                    );
                    return Ok(status);
                }
                Ok(status) => {
                    failures = 0;
                    debug!(
                        "{} {} still {} after {} poll(s)",
                        self.kind.label(),
                        handle,
                        status.overall_result(vocabulary),
                        polls
                    );
                }
                Err(e) if !e.is_transient() => {
                    error!(
                        "Failed to fetch status of {} {}: {}",
                        self.kind.label(),
                        handle,
                        e
                    );
                    return Err(PollError::RemoteCall(e));
                }
                Err(e) => {
                    failures += 1;
                    if failures >= self.config.max_status_failures {
                        error!(
                            "Giving up on {} {} after {} failed status queries",
                            self.kind.label(),
                            handle,
                            failures
                        );
                        return Err(PollError::RemoteCall(e));
                    }
                    warn!(
                        "Failed to fetch status of {} {} (attempt {}/{}): {}",
                        self.kind.label(),
                        handle,
                        failures,
                        self.config.max_status_failures,
                        e
                    );
                }
            }

            let now = Instant::now();
            if deadline.is_some_and(|deadline| now >= deadline) {
                return Err(self.timed_out(handle, started));
            }

            let next = now.checked_add(self.config.poll_interval);
            let wake_at = match (next, deadline) {
                (Some(next), Some(deadline)) => Some(next.min(deadline)),
                (next, deadline) => next.or(deadline),
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(self.cancelled(handle)),
                _ = sleep_until(wake_at) => {}
            }
        }
    }

    fn cancelled(&self, handle: &JobHandle) -> PollError {
        warn!("Stopped waiting for {} {}", self.kind.label(), handle);
        PollError::Cancelled {
            kind: self.kind.label().to_string(),
            id: handle.id,
            url: self.kind.detail_url(handle),
        }
    }

    fn timed_out(&self, handle: &JobHandle, started: Instant) -> PollError {
        let waited = started.elapsed();
        warn!(
            "{} {} still running after {:?}",
            self.kind.label(),
            handle,
            waited
        );
        PollError::Timeout {
            kind: self.kind.label().to_string(),
            id: handle.id,
            waited,
            url: self.kind.detail_url(handle),
        }
    }

    /// Classifies a status with this kind's failure set
    pub fn classify(&self, status: &JobStatus) -> Outcome {
        classify_outcome(status, self.kind.vocabulary())
    }

    /// Queries the status once, without waiting
    pub async fn current_status(&self, handle: &JobHandle) -> Result<JobStatus, PollError> {
        Ok(self.kind.fetch_status(handle).await?)
    }

    /// Downloads a named artifact of the job and unpacks it into `destination`
    ///
    /// Returns the paths of the extracted files.
    pub async fn fetch_artifact(
        &self,
        handle: &JobHandle,
        artifact_name: &str,
        destination: &Path,
    ) -> Result<Vec<PathBuf>, PollError> {
        let bytes = self.kind.download_artifact(handle, artifact_name).await?;
        let destination = destination.to_path_buf();

        let extracted =
            tokio::task::spawn_blocking(move || artifact::extract_zip(&bytes, &destination))
                .await
                .map_err(|e| PollError::Artifact(format!("extraction task failed: {}", e)))??;

        info!(
            "Extracted {} file(s) from artifact '{}'",
            extracted.len(),
            artifact_name
        );
        Ok(extracted)
    }

    /// Finds the single definition that exactly matches the selector
    async fn resolve_definition(
        &self,
        selector: &DefinitionSelector,
    ) -> Result<DefinitionRef, PollError> {
        let definitions = self.kind.find_definitions(selector).await?;

        let mut matches: Vec<DefinitionRef> = definitions
            .into_iter()
            .filter(|d| selector.matches(d))
            .collect();

        match matches.len() {
            0 => Err(ConfigurationError::DefinitionNotFound {
                kind: self.kind.label().to_string(),
                selector: selector.to_string(),
            }
            .into()),
            1 => Ok(matches.remove(0)),
            _ => Err(ConfigurationError::AmbiguousDefinition {
                kind: self.kind.label().to_string(),
                selector: selector.to_string(),
                ids: matches.iter().map(|d| d.id).collect(),
            }
            .into()),
        }
    }
}

/// Sleeps until `at`, or forever when there is no such instant
async fn sleep_until(at: Option<Instant>) {
    match at {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use relay_client::ClientError;
    use relay_core::domain::status::{Stage, StageStatus, StatusVocabulary};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Scripted job kind that records every call
    struct FakeKind {
        vocabulary: StatusVocabulary,
        definitions: Vec<DefinitionRef>,
        created_id: u64,
        hang_from: Option<usize>,
        statuses: Mutex<VecDeque<relay_client::Result<JobStatus>>>,
        lists: AtomicUsize,
        creates: AtomicUsize,
        queries: AtomicUsize,
    }

    impl FakeKind {
        fn new(vocabulary: StatusVocabulary) -> Self {
            Self {
                vocabulary,
                definitions: Vec::new(),
                created_id: 777,
                hang_from: None,
                statuses: Mutex::new(VecDeque::new()),
                lists: AtomicUsize::new(0),
                creates: AtomicUsize::new(0),
                queries: AtomicUsize::new(0),
            }
        }

        fn with_definition(mut self, id: u64, name: &str) -> Self {
            self.definitions.push(DefinitionRef {
                id,
                name: name.to_string(),
            });
            self
        }

        fn with_statuses(self, statuses: Vec<relay_client::Result<JobStatus>>) -> Self {
            *self.statuses.lock().unwrap() = statuses.into();
            self
        }

        /// Status queries from the `n`-th on (0-based) never answer
        fn hanging_from(mut self, n: usize) -> Self {
            self.hang_from = Some(n);
            self
        }

        fn queries(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }

        fn creates(&self) -> usize {
            self.creates.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobKind for FakeKind {
        fn label(&self) -> &'static str {
            "release"
        }

        fn vocabulary(&self) -> &StatusVocabulary {
            &self.vocabulary
        }

        async fn find_definitions(
            &self,
            _selector: &DefinitionSelector,
        ) -> relay_client::Result<Vec<DefinitionRef>> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            Ok(self.definitions.clone())
        }

        async fn create(
            &self,
            definition: &DefinitionRef,
            _parameters: &Parameters,
        ) -> relay_client::Result<JobHandle> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            Ok(JobHandle::new(self.created_id, definition.id))
        }

        async fn fetch_status(&self, _handle: &JobHandle) -> relay_client::Result<JobStatus> {
            let query = self.queries.fetch_add(1, Ordering::SeqCst);
            if self.hang_from.is_some_and(|n| query >= n) {
                std::future::pending::<()>().await;
            }
            self.statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(stages(&[StageStatus::InProgress])))
        }

        fn detail_url(&self, handle: &JobHandle) -> String {
            format!("https://example.test/release/{}", handle.id)
        }

        async fn download_artifact(
            &self,
            _handle: &JobHandle,
            _name: &str,
        ) -> relay_client::Result<Vec<u8>> {
            Err(ClientError::NotFound("artifact".to_string()))
        }
    }

    fn stages(statuses: &[StageStatus]) -> JobStatus {
        JobStatus::from_statuses(statuses.iter().copied())
    }

    fn pending() -> relay_client::Result<JobStatus> {
        Ok(stages(&[StageStatus::InProgress]))
    }

    fn unavailable() -> relay_client::Result<JobStatus> {
        Err(ClientError::api_error(503, "Service Unavailable"))
    }

    fn config() -> PollerConfig {
        PollerConfig::new().with_poll_interval(Duration::from_secs(30))
    }

    fn name(name: &str) -> DefinitionSelector {
        DefinitionSelector::Name(name.to_string())
    }

    #[tokio::test]
    async fn test_trigger_without_matching_definition() {
        let kind = FakeKind::new(StatusVocabulary::RELEASE).with_definition(1, "Other");
        let poller = RemoteJobPoller::new(kind, config());

        let err = poller.trigger(&name("X"), &Parameters::new()).await.unwrap_err();

        assert!(matches!(
            err,
            PollError::Configuration(ConfigurationError::DefinitionNotFound { .. })
        ));
        assert_eq!(poller.kind().creates(), 0);
    }

    #[tokio::test]
    async fn test_trigger_with_ambiguous_definition() {
        let kind = FakeKind::new(StatusVocabulary::RELEASE)
            .with_definition(3, "X")
            .with_definition(9, "X");
        let poller = RemoteJobPoller::new(kind, config());

        let err = poller.trigger(&name("X"), &Parameters::new()).await.unwrap_err();

        match err {
            PollError::Configuration(ConfigurationError::AmbiguousDefinition { ids, .. }) => {
                assert_eq!(ids, vec![3, 9]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(poller.kind().creates(), 0);
    }

    #[tokio::test]
    async fn test_trigger_ignores_near_matches() {
        let kind = FakeKind::new(StatusVocabulary::RELEASE)
            .with_definition(41, "X (old)")
            .with_definition(42, "X");
        let poller = RemoteJobPoller::new(kind, config());

        let handle = poller.trigger(&name("X"), &Parameters::new()).await.unwrap();

        assert_eq!(handle.id, 777);
        assert_eq!(handle.definition_id, 42);
        assert_eq!(poller.kind().creates(), 1);
    }

    #[tokio::test]
    async fn test_trigger_is_not_idempotent() {
        let kind = FakeKind::new(StatusVocabulary::BUILD).with_definition(42, "X");
        let poller = RemoteJobPoller::new(kind, config());

        poller.trigger(&DefinitionSelector::Id(42), &Parameters::new()).await.unwrap();
        poller.trigger(&DefinitionSelector::Id(42), &Parameters::new()).await.unwrap();

        assert_eq!(poller.kind().creates(), 2);
        assert_eq!(poller.kind().lists.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_query_per_cycle_and_fixed_waits() {
        let kind = FakeKind::new(StatusVocabulary::RELEASE).with_statuses(vec![
            pending(),
            pending(),
            Ok(stages(&[StageStatus::Succeeded])),
        ]);
        let poller = RemoteJobPoller::new(kind, config());
        let handle = JobHandle::new(777, 42);

        let started = Instant::now();
        let status = poller
            .await_completion(&handle, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(poller.kind().queries(), 3);
        // Two waits of 30 seconds each.
        assert_eq!(started.elapsed(), Duration::from_secs(60));
        assert!(status.is_complete(&StatusVocabulary::RELEASE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_to_end_succeeded_release() {
        let kind = FakeKind::new(StatusVocabulary::RELEASE)
            .with_definition(42, "X")
            .with_statuses(vec![
                pending(),
                pending(),
                Ok(stages(&[StageStatus::Succeeded])),
            ]);
        let poller = RemoteJobPoller::new(kind, config());

        let completion = poller
            .run(&name("X"), &Parameters::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(completion.handle.id, 777);
        assert_eq!(completion.handle.definition_id, 42);
        assert_eq!(completion.outcome, Outcome::Succeeded);
        assert_eq!(completion.url, "https://example.test/release/777");
        assert_eq!(poller.kind().queries(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_failed_stage_fails_immediately() {
        let kind = FakeKind::new(StatusVocabulary::BUILD)
            .with_definition(42, "X")
            .with_statuses(vec![Ok(stages(&[StageStatus::Failed]))]);
        let poller = RemoteJobPoller::new(kind, config());

        let started = Instant::now();
        let err = poller
            .run(&name("X"), &Parameters::new(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(poller.kind().queries(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(err.detail_url(), Some("https://example.test/release/777"));
        assert!(matches!(err, PollError::JobFailed { id: 777, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mixed_stage_outcome_is_reported_as_succeeded() {
        // Only a job whose stages all failed counts as failed.
        let kind = FakeKind::new(StatusVocabulary::BUILD)
            .with_definition(42, "X")
            .with_statuses(vec![Ok(JobStatus::new(vec![
                Stage::named("Linux", StageStatus::Failed),
                Stage::named("Mac", StageStatus::Succeeded),
            ]))]);
        let poller = RemoteJobPoller::new(kind, config());

        let completion = poller
            .run(&name("X"), &Parameters::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(completion.outcome, Outcome::Succeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_multi_stage_waits_for_every_stage() {
        let kind = FakeKind::new(StatusVocabulary::RELEASE).with_statuses(vec![
            Ok(stages(&[StageStatus::Succeeded, StageStatus::InProgress])),
            Ok(stages(&[StageStatus::Succeeded, StageStatus::Rejected])),
        ]);
        let poller = RemoteJobPoller::new(kind, config());

        let status = poller
            .await_completion(&JobHandle::new(777, 42), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(poller.kind().queries(), 2);
        assert_eq!(poller.classify(&status), Outcome::Succeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_distinct_from_failure() {
        let kind = FakeKind::new(StatusVocabulary::RELEASE);
        let poller = RemoteJobPoller::new(
            kind,
            config().with_max_wait(Some(Duration::from_secs(45))),
        );

        let started = Instant::now();
        let err = poller
            .await_completion(&JobHandle::new(777, 42), &CancellationToken::new())
            .await
            .unwrap_err();

        // Queries at 0s, 30s and at the 45s deadline.
        assert_eq!(poller.kind().queries(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(45));
        match err {
            PollError::Timeout { waited, url, .. } => {
                assert_eq!(waited, Duration::from_secs(45));
                assert_eq!(url, "https://example.test/release/777");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_first_wait() {
        let poller = RemoteJobPoller::new(FakeKind::new(StatusVocabulary::RELEASE), config());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = poller
            .await_completion(&JobHandle::new(777, 42), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, PollError::Cancelled { id: 777, .. }));
        assert_eq!(poller.kind().queries(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_wait() {
        let poller = RemoteJobPoller::new(FakeKind::new(StatusVocabulary::RELEASE), config());
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_secs(45)).await;
            canceller.cancel();
        });

        let started = Instant::now();
        let err = poller
            .await_completion(&JobHandle::new(777, 42), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, PollError::Cancelled { .. }));
        assert_eq!(started.elapsed(), Duration::from_secs(45));
        assert_eq!(poller.kind().queries(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_status_failures_are_retried() {
        let kind = FakeKind::new(StatusVocabulary::RELEASE).with_statuses(vec![
            unavailable(),
            unavailable(),
            pending(),
            unavailable(),
            Ok(stages(&[StageStatus::Succeeded])),
        ]);
        let poller = RemoteJobPoller::new(kind, config().with_max_status_failures(3));

        let status = poller
            .await_completion(&JobHandle::new(777, 42), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(poller.kind().queries(), 5);
        assert_eq!(poller.classify(&status), Outcome::Succeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_status_failures_surface() {
        let kind = FakeKind::new(StatusVocabulary::RELEASE).with_statuses(vec![
            unavailable(),
            unavailable(),
            unavailable(),
        ]);
        let poller = RemoteJobPoller::new(kind, config().with_max_status_failures(3));

        let started = Instant::now();
        let err = poller
            .await_completion(&JobHandle::new(777, 42), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PollError::RemoteCall(ClientError::ApiError { status: 503, .. })
        ));
        assert_eq!(poller.kind().queries(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_stalled_query() {
        let kind = FakeKind::new(StatusVocabulary::RELEASE).hanging_from(1);
        let poller = RemoteJobPoller::new(
            kind,
            config().with_max_wait(Some(Duration::from_secs(45))),
        );
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_secs(40)).await;
            canceller.cancel();
        });

        let started = Instant::now();
        let err = time::timeout(
            Duration::from_secs(3600),
            poller.await_completion(&JobHandle::new(777, 42), &cancel),
        )
        .await
        .expect("poller stayed blocked in a status query")
        .unwrap_err();

        assert!(matches!(err, PollError::Cancelled { id: 777, .. }));
        assert_eq!(started.elapsed(), Duration::from_secs(40));
        assert_eq!(poller.kind().queries(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_interrupts_stalled_query() {
        let kind = FakeKind::new(StatusVocabulary::RELEASE).hanging_from(1);
        let poller = RemoteJobPoller::new(
            kind,
            config().with_max_wait(Some(Duration::from_secs(45))),
        );

        let started = Instant::now();
        let err = time::timeout(
            Duration::from_secs(3600),
            poller.await_completion(&JobHandle::new(777, 42), &CancellationToken::new()),
        )
        .await
        .expect("poller stayed blocked in a status query")
        .unwrap_err();

        match err {
            PollError::Timeout { waited, .. } => assert_eq!(waited, Duration::from_secs(45)),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(started.elapsed(), Duration::from_secs(45));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_credentials_surface_immediately() {
        let kind = FakeKind::new(StatusVocabulary::RELEASE).with_statuses(vec![
            Err(ClientError::api_error(401, "Unauthorized")),
            Err(ClientError::api_error(401, "Unauthorized")),
        ]);
        let poller = RemoteJobPoller::new(kind, config());

        let started = Instant::now();
        let err = poller
            .await_completion(&JobHandle::new(777, 42), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PollError::RemoteCall(ClientError::ApiError { status: 401, .. })
        ));
        assert_eq!(poller.kind().queries(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_job_surfaces_immediately() {
        let kind = FakeKind::new(StatusVocabulary::BUILD)
            .with_statuses(vec![Err(ClientError::api_error(404, "Not Found"))]);
        let poller = RemoteJobPoller::new(kind, config());

        let err = poller
            .await_completion(&JobHandle::new(777, 42), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PollError::RemoteCall(_)));
        assert_eq!(poller.kind().queries(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttled_status_queries_are_retried() {
        let kind = FakeKind::new(StatusVocabulary::RELEASE).with_statuses(vec![
            Err(ClientError::api_error(429, "Too Many Requests")),
            Err(ClientError::api_error(429, "Too Many Requests")),
            Ok(stages(&[StageStatus::Succeeded])),
        ]);
        let poller = RemoteJobPoller::new(kind, config());

        let started = Instant::now();
        poller
            .await_completion(&JobHandle::new(777, 42), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(poller.kind().queries(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrepresentable_deadline_means_no_deadline() {
        let kind = FakeKind::new(StatusVocabulary::RELEASE)
            .with_statuses(vec![pending(), Ok(stages(&[StageStatus::Succeeded]))]);
        let poller = RemoteJobPoller::new(
            kind,
            config().with_max_wait(Some(Duration::from_secs(u64::MAX))),
        );

        let started = Instant::now();
        poller
            .await_completion(&JobHandle::new(777, 42), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(poller.kind().queries(), 2);
        assert_eq!(started.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrepresentable_interval_still_cancellable() {
        let poller = RemoteJobPoller::new(
            FakeKind::new(StatusVocabulary::RELEASE),
            config().with_poll_interval(Duration::from_secs(u64::MAX)),
        );
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_secs(10)).await;
            canceller.cancel();
        });

        let err = poller
            .await_completion(&JobHandle::new(777, 42), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, PollError::Cancelled { .. }));
        assert_eq!(poller.kind().queries(), 1);
    }

    #[tokio::test]
    async fn test_fetch_artifact_propagates_download_error() {
        let poller = RemoteJobPoller::new(FakeKind::new(StatusVocabulary::BUILD), config());
        let dir = tempfile::tempdir().unwrap();

        let err = poller
            .fetch_artifact(&JobHandle::new(777, 42), "drop", dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, PollError::RemoteCall(ClientError::NotFound(_))));
    }
}
