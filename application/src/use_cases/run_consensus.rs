//! Run Consensus use case
//!
//! Drives N independent agent extractions of one statement document,
//! compares their results and retries until the agents agree or the retry
//! budget runs out.
//!
//! ```text
//! Running(i) ──spawn N agents──▶ normalize ──▶ ConsensusRound::evaluate
//!     ▲                                              │
//!     └──── DISAGREE / AGENT_FAILURE, i < max ◀──────┤
//!                                                    ├── AGREE ──▶ Accepted
//!                                                    └── i == max ─▶ Failed
//! ```
//!
//! Agent and provider errors never leave this use case: they become
//! `AGENT_FAILURE` rounds. Only configuration errors and cancellation are
//! returned as [`RunConsensusError`].

use crate::config::ConsensusConfig;
use crate::ports::agent_gateway::{AgentError, AgentGateway, StatementAgent};
use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use crate::ports::progress::{AuditProgressNotifier, NoProgress};
use footing_domain::{
    AgentFailure, AgentProfile, AgentResult, AuditResult, AuditState, ConsensusRound, DocumentRef,
    FailureKind, RoundVerdict, SectionKind, StatementDocument, normalize,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Characters of a raw payload kept in debug logs
const PAYLOAD_PREVIEW_LEN: usize = 200;

/// Errors that can occur during a consensus audit
#[derive(Error, Debug)]
pub enum RunConsensusError {
    #[error("No agents configured")]
    NoAgents,

    #[error("Invalid consensus configuration: {0}")]
    InvalidConfig(String),

    #[error("Audit cancelled")]
    Cancelled,
}

impl RunConsensusError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunConsensusError::Cancelled)
    }
}

type AgentOutcome = Result<AgentResult, AgentFailure>;

/// Use case for auditing one statement document by consensus
pub struct RunConsensusUseCase<G: AgentGateway + 'static> {
    gateway: Arc<G>,
    config: Arc<ConsensusConfig>,
    logger: Arc<dyn AuditLogger>,
}

impl<G: AgentGateway + 'static> RunConsensusUseCase<G> {
    pub fn new(gateway: Arc<G>, config: ConsensusConfig) -> Self {
        Self {
            gateway,
            config: Arc::new(config),
            logger: Arc::new(NoAuditLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn AuditLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        document: &StatementDocument,
    ) -> Result<AuditResult, RunConsensusError> {
        self.execute_with_progress(document, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Execute the use case with progress callbacks and cancellation
    pub async fn execute_with_progress(
        &self,
        document: &StatementDocument,
        progress: &dyn AuditProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<AuditResult, RunConsensusError> {
        self.check_config()?;

        let profiles = self.config.agent_profiles();
        let doc_ref = document.reference();
        info!(
            "Auditing {} with {} agents (tolerance {}, max retries {})",
            doc_ref,
            profiles.len(),
            self.config.tolerance,
            self.config.max_retries
        );

        let mut state = AuditState::initial();
        let mut rounds: Vec<ConsensusRound> = Vec::new();

        while let Some(index) = state.round_index() {
            if index > 0 && !self.config.retry_delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(RunConsensusError::Cancelled),
                    _ = tokio::time::sleep(self.config.retry_delay) => {}
                }
            }

            let round = self
                .run_round(index, document, &profiles, progress, cancel)
                .await?;
            self.report_round(&doc_ref, &round, progress);

            state = state.advance(round.verdict(), self.config.max_retries);
            rounds.push(round);
        }

        let result = AuditResult::from_rounds(doc_ref, state, &rounds, self.config.policy);
        self.report_result(&result, progress);
        Ok(result)
    }

    fn check_config(&self) -> Result<(), RunConsensusError> {
        if self.config.agent_count == 0 {
            return Err(RunConsensusError::NoAgents);
        }
        let issues = self.config.validate();
        if ConsensusConfig::has_errors(&issues) {
            let messages: Vec<String> = issues
                .iter()
                .filter(|issue| issue.is_error())
                .map(|issue| issue.message.clone())
                .collect();
            return Err(RunConsensusError::InvalidConfig(messages.join("; ")));
        }
        Ok(())
    }

    /// One round: N fresh agents in parallel, results re-ordered by slot.
    async fn run_round(
        &self,
        index: usize,
        document: &StatementDocument,
        profiles: &[AgentProfile],
        progress: &dyn AuditProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<ConsensusRound, RunConsensusError> {
        let doc_ref = document.reference();
        info!("{} round {}: invoking {} agents", doc_ref, index + 1, profiles.len());
        progress.on_round_start(&doc_ref, index, profiles.len());
        self.logger.log(AuditEvent::new(
            "round_started",
            json!({
                "document": doc_ref.to_string(),
                "round": index,
                "agents": profiles.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            }),
        ));

        let mut join_set = JoinSet::new();
        for (slot, profile) in profiles.iter().enumerate() {
            let agent = self.gateway.create_agent(profile);
            let text = document.text.clone();
            let section = document.section;
            let timeout = self.config.agent_timeout;

            join_set.spawn(async move {
                let outcome = invoke_agent(agent, &text, section, timeout).await;
                (slot, outcome)
            });
        }

        let mut outcomes: Vec<Option<AgentOutcome>> = (0..profiles.len()).map(|_| None).collect();
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    join_set.abort_all();
                    warn!("{} round {}: cancelled", doc_ref, index + 1);
                    return Err(RunConsensusError::Cancelled);
                }
                joined = join_set.join_next() => match joined {
                    Some(Ok((slot, outcome))) => {
                        self.report_agent(&doc_ref, index, &outcome, progress);
                        outcomes[slot] = Some(outcome);
                    }
                    Some(Err(e)) => warn!("Agent task join error: {}", e),
                    None => break,
                }
            }
        }

        let mut results = Vec::with_capacity(profiles.len());
        let mut failures = Vec::new();
        for (profile, outcome) in profiles.iter().zip(outcomes) {
            match outcome {
                Some(Ok(result)) => results.push(result),
                Some(Err(failure)) => failures.push(failure),
                None => failures.push(AgentFailure::new(
                    profile.id.clone(),
                    FailureKind::Invocation,
                    "agent task did not complete",
                )),
            }
        }

        Ok(ConsensusRound::evaluate(
            index,
            results,
            failures,
            self.config.tolerance,
        ))
    }

    fn report_agent(
        &self,
        doc_ref: &DocumentRef,
        index: usize,
        outcome: &AgentOutcome,
        progress: &dyn AuditProgressNotifier,
    ) {
        match outcome {
            Ok(result) => {
                debug!(
                    "{} round {}: {} returned {} line items",
                    doc_ref,
                    index + 1,
                    result.agent_id(),
                    result.item_count()
                );
                for warning in result.warnings() {
                    debug!("{}: {}", result.agent_id(), warning);
                }
                progress.on_agent_complete(doc_ref, result.agent_id(), true);
                self.logger.log(AuditEvent::new(
                    "agent_completed",
                    json!({
                        "document": doc_ref.to_string(),
                        "round": index,
                        "agent": result.agent_id(),
                        "line_items": result.item_count(),
                        "warnings": result.warnings(),
                    }),
                ));
            }
            Err(failure) => {
                warn!(
                    "{} round {}: {} failed ({:?}): {}",
                    doc_ref,
                    index + 1,
                    failure.agent_id,
                    failure.kind,
                    failure.message
                );
                progress.on_agent_complete(doc_ref, &failure.agent_id, false);
                self.logger.log(AuditEvent::new(
                    "agent_failed",
                    json!({
                        "document": doc_ref.to_string(),
                        "round": index,
                        "agent": failure.agent_id,
                        "kind": failure.kind,
                        "error": failure.message,
                    }),
                ));
            }
        }
    }

    fn report_round(
        &self,
        doc_ref: &DocumentRef,
        round: &ConsensusRound,
        progress: &dyn AuditProgressNotifier,
    ) {
        let number = round.index() + 1;
        match round.verdict() {
            RoundVerdict::Agree => {
                info!("{} round {}: all agents agree", doc_ref, number);
            }
            RoundVerdict::Disagree => {
                let fields: Vec<&str> = round.disagreements().map(|f| f.name.as_str()).collect();
                warn!(
                    "{} round {}: {} field(s) disagree: {}",
                    doc_ref,
                    number,
                    fields.len(),
                    fields.join(", ")
                );
            }
            RoundVerdict::AgentFailure => {
                warn!(
                    "{} round {}: {} agent(s) failed",
                    doc_ref,
                    number,
                    round.failures().len()
                );
            }
        }

        progress.on_round_complete(doc_ref, round.index(), round.verdict());
        self.logger.log(AuditEvent::new(
            "round_completed",
            json!({
                "document": doc_ref.to_string(),
                "diagnostics": round.diagnostics(),
            }),
        ));
    }

    fn report_result(&self, result: &AuditResult, progress: &dyn AuditProgressNotifier) {
        let doc_ref = result.document();
        match result.exhaustion() {
            Some(exhausted) => warn!("{}: {}", doc_ref, exhausted),
            None => info!(
                "{}: accepted after {} round(s) ({})",
                doc_ref,
                result.rounds_attempted(),
                result.quality()
            ),
        }

        progress.on_document_complete(result);
        self.logger.log(AuditEvent::new(
            "audit_completed",
            json!({
                "document": doc_ref.to_string(),
                "state": result.state(),
                "consensus_quality": result.quality(),
                "rounds_attempted": result.rounds_attempted(),
                "total_retries": result.total_retries(),
                "balancing": result.balancing().status,
            }),
        ));
    }
}

/// Invoke one agent and normalize its payload.
async fn invoke_agent(
    agent: Box<dyn StatementAgent>,
    text: &str,
    section: SectionKind,
    timeout: Option<Duration>,
) -> AgentOutcome {
    let agent_id = agent.agent_id().to_string();
    let extraction = agent.extract(text, section);
    let response = match timeout {
        Some(limit) => tokio::time::timeout(limit, extraction)
            .await
            .unwrap_or(Err(AgentError::Timeout)),
        None => extraction.await,
    };

    let payload = response.map_err(|e| {
        let kind = match e {
            AgentError::Invocation(_) => FailureKind::Invocation,
            AgentError::Timeout => FailureKind::Timeout,
        };
        AgentFailure::new(agent_id.clone(), kind, e.to_string())
    })?;

    debug!("{} payload: {}", agent_id, payload.preview(PAYLOAD_PREVIEW_LEN));

    normalize(&agent_id, &payload, &[section]).map_err(|e| {
        AgentFailure::new(agent_id.clone(), FailureKind::Normalization, e.to_string())
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use footing_domain::{
        BalanceStatus, ConsensusQuality, RawPayload, SectionKind, StatementDocument,
    };
    use rust_decimal::Decimal;
    use serde_json::Value;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    pub(crate) enum Step {
        Respond(RawPayload),
        Fail(AgentError),
        Hang,
    }

    /// Gateway whose agents replay a per-agent script, one step per round.
    pub(crate) struct ScriptedGateway {
        scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    }

    impl ScriptedGateway {
        pub(crate) fn new() -> Self {
            Self {
                scripts: Mutex::new(HashMap::new()),
            }
        }

        pub(crate) fn script(self, agent_id: &str, steps: Vec<Step>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(agent_id.to_string(), steps.into());
            self
        }

        /// Every agent answers with the same payload for every round.
        pub(crate) fn unanimous(payload: Value, rounds: usize) -> Self {
            (1..=3).fold(Self::new(), |gateway, i| {
                gateway.script(
                    &format!("agent_{}", i),
                    (0..rounds)
                        .map(|_| Step::Respond(RawPayload::Structured(payload.clone())))
                        .collect(),
                )
            })
        }
    }

    struct ScriptedAgent {
        id: String,
        step: Mutex<Option<Step>>,
    }

    impl AgentGateway for ScriptedGateway {
        fn create_agent(&self, profile: &AgentProfile) -> Box<dyn StatementAgent> {
            let step = self
                .scripts
                .lock()
                .unwrap()
                .get_mut(&profile.id)
                .and_then(VecDeque::pop_front);
            Box::new(ScriptedAgent {
                id: profile.id.clone(),
                step: Mutex::new(step),
            })
        }

        fn provider_name(&self) -> &str {
            "scripted"
        }

        fn model_name(&self) -> &str {
            "script-1"
        }
    }

    #[async_trait]
    impl StatementAgent for ScriptedAgent {
        fn agent_id(&self) -> &str {
            &self.id
        }

        async fn extract(
            &self,
            _document_text: &str,
            _section: SectionKind,
        ) -> Result<RawPayload, AgentError> {
            let step = self.step.lock().unwrap().take();
            match step {
                Some(Step::Respond(payload)) => Ok(payload),
                Some(Step::Fail(error)) => Err(error),
                Some(Step::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(AgentError::Invocation("woke up".to_string()))
                }
                None => Err(AgentError::Invocation("script exhausted".to_string())),
            }
        }
    }

    pub(crate) fn balance_sheet(total: i64) -> Value {
        json!({
            "audit_footing_laporan_keuangan": {
                "laporan_posisi_keuangan": {
                    "aset": {
                        "total_aset": {"nilai_tercatat": total, "nilai_perhitungan": total}
                    },
                    "total_liabilitas_dan_ekuitas": {"nilai_tercatat": total, "nilai_perhitungan": total},
                    "balancing": {"status": "Seimbang"}
                }
            }
        })
    }

    fn respond(total: i64) -> Step {
        Step::Respond(RawPayload::Structured(balance_sheet(total)))
    }

    pub(crate) fn test_config() -> ConsensusConfig {
        ConsensusConfig::default().with_retry_delay(Duration::ZERO)
    }

    fn document() -> StatementDocument {
        StatementDocument::new("ADRO", SectionKind::BalanceSheet, "Total aset 1.000.000")
    }

    fn use_case(gateway: ScriptedGateway) -> RunConsensusUseCase<ScriptedGateway> {
        RunConsensusUseCase::new(Arc::new(gateway), test_config())
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_exact_match_is_perfect() {
        let result = use_case(ScriptedGateway::unanimous(balance_sheet(1_000_000), 1))
            .execute(&document())
            .await
            .unwrap();

        assert!(result.is_accepted());
        assert_eq!(result.quality(), ConsensusQuality::Perfect);
        assert_eq!(result.total_retries(), 0);
        assert_eq!(result.balancing().status, BalanceStatus::Balanced);

        let (_, total) = result
            .line_items()
            .find(|(_, item)| item.name == "total_aset")
            .unwrap();
        assert_eq!(total.reported, Decimal::new(1_000_000, 0));
        assert!(total.difference().is_zero());
    }

    #[tokio::test]
    async fn test_single_outlier_triggers_retry() {
        let gateway = ScriptedGateway::new()
            .script("agent_1", vec![respond(100), respond(100)])
            .script("agent_2", vec![respond(100), respond(100)])
            .script("agent_3", vec![respond(150), respond(100)]);
        let result = use_case(gateway).execute(&document()).await.unwrap();

        assert_eq!(result.quality(), ConsensusQuality::Retried);
        assert_eq!(result.total_retries(), 1);
        assert_eq!(result.diagnostics()[0].verdict, RoundVerdict::Disagree);
        assert_eq!(result.diagnostics()[1].verdict, RoundVerdict::Agree);
    }

    #[tokio::test]
    async fn test_budget_exhaustion() {
        let gateway = ScriptedGateway::new()
            .script("agent_1", vec![respond(100), respond(100), respond(100)])
            .script("agent_2", vec![respond(200), respond(200), respond(200)])
            .script("agent_3", vec![respond(100), respond(100), respond(100)]);
        let result = use_case(gateway).execute(&document()).await.unwrap();

        assert!(!result.is_accepted());
        assert_eq!(result.quality(), ConsensusQuality::Failed);
        assert_eq!(result.total_retries(), 2);

        let exhausted = result.exhaustion().unwrap();
        assert_eq!(exhausted.rounds, 3);
        let disagreement = exhausted
            .last_round
            .disagreements
            .iter()
            .find(|d| d.field == "laporan_posisi_keuangan.total_aset")
            .unwrap();
        assert_eq!(
            disagreement.reported,
            vec![
                Some(Decimal::new(100, 0)),
                Some(Decimal::new(200, 0)),
                Some(Decimal::new(100, 0))
            ]
        );
    }

    #[tokio::test]
    async fn test_agent_failure_then_agreement() {
        let gateway = ScriptedGateway::new()
            .script("agent_1", vec![respond(100), respond(100)])
            .script(
                "agent_2",
                vec![
                    Step::Fail(AgentError::Invocation("HTTP 503".to_string())),
                    respond(100),
                ],
            )
            .script("agent_3", vec![respond(100), respond(100)]);
        let result = use_case(gateway).execute(&document()).await.unwrap();

        assert_eq!(result.quality(), ConsensusQuality::Retried);
        let first = &result.diagnostics()[0];
        assert_eq!(first.verdict, RoundVerdict::AgentFailure);
        assert_eq!(first.failures[0].agent_id, "agent_2");
        assert_eq!(first.failures[0].kind, FailureKind::Invocation);
    }

    #[tokio::test]
    async fn test_normalization_error_is_agent_failure() {
        let gateway = ScriptedGateway::new()
            .script("agent_1", vec![respond(100), respond(100)])
            .script("agent_2", vec![respond(100), respond(100)])
            .script(
                "agent_3",
                vec![
                    Step::Respond(RawPayload::text("Maaf, saya tidak dapat membaca dokumen.")),
                    respond(100),
                ],
            );
        let result = use_case(gateway).execute(&document()).await.unwrap();

        let first = &result.diagnostics()[0];
        assert_eq!(first.failures[0].kind, FailureKind::Normalization);
        assert!(result.is_accepted());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_agent_failure() {
        let gateway = ScriptedGateway::new()
            .script("agent_1", vec![respond(100), respond(100)])
            .script("agent_2", vec![Step::Hang, respond(100)])
            .script("agent_3", vec![respond(100), respond(100)]);
        let config = test_config().with_agent_timeout(Some(Duration::from_secs(5)));
        let result = RunConsensusUseCase::new(Arc::new(gateway), config)
            .execute(&document())
            .await
            .unwrap();

        let first = &result.diagnostics()[0];
        assert_eq!(first.failures[0].kind, FailureKind::Timeout);
        assert_eq!(result.quality(), ConsensusQuality::Retried);
    }

    #[tokio::test]
    async fn test_presence_disagreement_is_not_accepted() {
        let partial = json!({
            "laporan_posisi_keuangan": {
                "total_aset": {"nilai_tercatat": 100, "nilai_perhitungan": 100}
            }
        });
        let gateway = ScriptedGateway::new()
            .script("agent_1", vec![respond(100)])
            .script("agent_2", vec![respond(100)])
            .script("agent_3", vec![Step::Respond(RawPayload::Structured(partial))]);
        let config = test_config().with_max_retries(0);
        let result = RunConsensusUseCase::new(Arc::new(gateway), config)
            .execute(&document())
            .await
            .unwrap();

        assert!(!result.is_accepted());
        let disagreement = &result.diagnostics()[0].disagreements[0];
        assert_eq!(disagreement.missing_in, vec!["agent_3".to_string()]);
    }

    #[tokio::test]
    async fn test_cancellation() {
        let gateway = ScriptedGateway::new()
            .script("agent_1", vec![Step::Hang])
            .script("agent_2", vec![Step::Hang])
            .script("agent_3", vec![Step::Hang]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let error = use_case(gateway)
            .execute_with_progress(&document(), &NoProgress, &cancel)
            .await
            .unwrap_err();
        assert!(error.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_during_invocation() {
        let gateway = ScriptedGateway::new()
            .script("agent_1", vec![respond(100)])
            .script("agent_2", vec![Step::Hang])
            .script("agent_3", vec![Step::Hang]);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            trigger.cancel();
        });

        let error = use_case(gateway)
            .execute_with_progress(&document(), &NoProgress, &cancel)
            .await
            .unwrap_err();
        assert!(error.is_cancelled());
    }

    #[tokio::test]
    async fn test_invalid_config() {
        let gateway = Arc::new(ScriptedGateway::new());
        let error = RunConsensusUseCase::new(Arc::clone(&gateway), test_config().with_agent_count(0))
            .execute(&document())
            .await
            .unwrap_err();
        assert!(matches!(error, RunConsensusError::NoAgents));

        let error = RunConsensusUseCase::new(gateway, test_config().with_agent_count(1))
            .execute(&document())
            .await
            .unwrap_err();
        assert!(matches!(error, RunConsensusError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_logger_receives_round_transcript() {
        struct Recorder(Mutex<Vec<&'static str>>);
        impl AuditLogger for Recorder {
            fn log(&self, event: AuditEvent) {
                self.0.lock().unwrap().push(event.event_type);
            }
        }

        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        use_case(ScriptedGateway::unanimous(balance_sheet(10), 1))
            .with_logger(recorder.clone())
            .execute(&document())
            .await
            .unwrap();

        let events = recorder.0.lock().unwrap().clone();
        assert_eq!(events.first(), Some(&"round_started"));
        assert_eq!(events.iter().filter(|e| **e == "agent_completed").count(), 3);
        assert_eq!(events.last(), Some(&"audit_completed"));
    }
}
