//! Session wiring and the submission coordinator.
//!
//! A session owns one traversal and performs the single outbound
//! submission when the traversal completes. The in-flight guard lives in
//! the traversal; this layer's job is to make exactly one backend call per
//! completed traversal, map its outcome back into traversal state, and
//! classify transport failures into the core error taxonomy. Idempotent
//! reads (questions, access check, report lookup) go through retry;
//! submissions do not.

use crate::api::retry::{retry_async, RetryConfig};
use crate::api::Backend;
use crate::error::CoreError;
use crate::logging::{json_log, log, obj, v_int, v_num, v_str, Domain, Level};
use crate::question::{PeerQuestion, Question};
use crate::report::ReportDocument;
use crate::traversal::{Retreat, Step, Traversal};

/// Where an access code leads.
#[derive(Debug)]
pub enum Entry {
    /// Fresh code: a loaded self-assessment session.
    Fresh(SelfSession),
    /// Already-used code: jump straight to its report.
    ExistingReport { report_id: String },
    /// Invalid code, with the backend's message for display.
    Denied { message: String },
}

/// Outcome of answering the current question.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStep {
    Next { position: usize },
    /// Self traversal completed; the report was created.
    Completed { report_id: String },
    /// Peer traversal completed; the report was updated out-of-band.
    PeerSubmitted,
    /// Dropped by the in-flight guard.
    Ignored,
}

/// Verify an access code and route accordingly.
pub async fn enter_with_code(
    backend: &(dyn Backend + Send + Sync),
    retry: &RetryConfig,
    code: &str,
) -> Result<Entry, CoreError> {
    let check = retry_async(retry, "verify_access_code", || {
        backend.verify_access_code(code)
    })
    .await
    .map_err(|e| CoreError::Load(e.to_string()))?;

    if !check.valid {
        return Ok(Entry::Denied {
            message: check
                .message
                .unwrap_or_else(|| "access code rejected".into()),
        });
    }
    if let Some(report_id) = check.report_id {
        return Ok(Entry::ExistingReport { report_id });
    }
    Ok(Entry::Fresh(SelfSession::load(backend, retry, code).await?))
}

/// Fetch a report by identity; an unresolved identity is fatal for that
/// navigation.
pub async fn load_report(
    backend: &(dyn Backend + Send + Sync),
    retry: &RetryConfig,
    id: &str,
) -> Result<ReportDocument, CoreError> {
    let report = retry_async(retry, "get_report_by_id", || backend.get_report_by_id(id))
        .await
        .map_err(|e| CoreError::Load(e.to_string()))?;
    report.ok_or_else(|| CoreError::NotFound(id.to_string()))
}

/// Self-assessment session: tagged questions, terminal call creates the
/// report.
#[derive(Debug)]
pub struct SelfSession {
    traversal: Traversal<Question>,
    access_code: String,
}

impl SelfSession {
    pub async fn load(
        backend: &(dyn Backend + Send + Sync),
        retry: &RetryConfig,
        access_code: &str,
    ) -> Result<Self, CoreError> {
        let questions = retry_async(retry, "fetch_questions", || backend.fetch_questions())
            .await
            .map_err(|e| CoreError::Load(e.to_string()))?;
        for question in &questions {
            question.validate()?;
        }
        let traversal = Traversal::new(questions)?;
        json_log(
            Domain::Traversal,
            "self_session_loaded",
            obj(&[("questions", v_int(traversal.len() as u64))]),
        );
        Ok(Self {
            traversal,
            access_code: access_code.to_string(),
        })
    }

    pub fn traversal(&self) -> &Traversal<Question> {
        &self.traversal
    }

    pub fn retreat(&mut self) -> Retreat {
        self.traversal.retreat()
    }

    /// Record the chosen option; on the last question, perform the one
    /// outbound `create_report` call and settle the traversal.
    pub async fn answer(
        &mut self,
        backend: &(dyn Backend + Send + Sync),
        option: usize,
    ) -> Result<SessionStep, CoreError> {
        let question_id = self.traversal.current().id;
        match self.traversal.advance(option)? {
            Step::Ignored => Ok(SessionStep::Ignored),
            Step::Advanced { position } => {
                log(
                    Level::Debug,
                    Domain::Traversal,
                    "advance",
                    obj(&[
                        ("question_id", v_int(u64::from(question_id))),
                        ("position", v_int(position as u64)),
                        ("progress", v_num(self.traversal.progress())),
                    ]),
                );
                Ok(SessionStep::Next { position })
            }
            Step::ReadyToSubmit { answers } => {
                match backend.create_report(&answers, &self.access_code).await {
                    Ok(handle) => {
                        self.traversal.submission_succeeded(Some(handle.id.clone()));
                        json_log(
                            Domain::Submission,
                            "report_created",
                            obj(&[
                                ("report_id", v_str(&handle.id)),
                                ("answers", v_int(answers.len() as u64)),
                            ]),
                        );
                        Ok(SessionStep::Completed { report_id: handle.id })
                    }
                    Err(err) => {
                        self.traversal.submission_failed();
                        log(
                            Level::Error,
                            Domain::Submission,
                            "create_report_failed",
                            obj(&[("error", v_str(&err.to_string()))]),
                        );
                        Err(CoreError::Submission(err.to_string()))
                    }
                }
            }
        }
    }
}

/// Peer-assessment session: two-option questions with direct values,
/// terminal call updates an existing report addressed by `token`.
#[derive(Debug)]
pub struct PeerSession {
    traversal: Traversal<PeerQuestion>,
    token: String,
}

impl PeerSession {
    pub async fn load(
        backend: &(dyn Backend + Send + Sync),
        retry: &RetryConfig,
        token: &str,
    ) -> Result<Self, CoreError> {
        let questions = retry_async(retry, "fetch_peer_questions", || {
            backend.fetch_peer_questions()
        })
        .await
        .map_err(|e| CoreError::Load(e.to_string()))?;
        let traversal = Traversal::new(questions)?;
        json_log(
            Domain::Traversal,
            "peer_session_loaded",
            obj(&[
                ("token", v_str(token)),
                ("questions", v_int(traversal.len() as u64)),
            ]),
        );
        Ok(Self {
            traversal,
            token: token.to_string(),
        })
    }

    pub fn traversal(&self) -> &Traversal<PeerQuestion> {
        &self.traversal
    }

    pub fn retreat(&mut self) -> Retreat {
        self.traversal.retreat()
    }

    pub async fn answer(
        &mut self,
        backend: &(dyn Backend + Send + Sync),
        option: usize,
    ) -> Result<SessionStep, CoreError> {
        match self.traversal.advance(option)? {
            Step::Ignored => Ok(SessionStep::Ignored),
            Step::Advanced { position } => Ok(SessionStep::Next { position }),
            Step::ReadyToSubmit { answers } => {
                match backend
                    .submit_peer_assessment(&self.token, &answers)
                    .await
                {
                    Ok(()) => {
                        self.traversal.submission_succeeded(None);
                        json_log(
                            Domain::Submission,
                            "peer_submitted",
                            obj(&[
                                ("token", v_str(&self.token)),
                                ("answers", v_int(answers.len() as u64)),
                            ]),
                        );
                        Ok(SessionStep::PeerSubmitted)
                    }
                    Err(err) => {
                        // back to the last question, prior answers intact
                        self.traversal.submission_failed();
                        log(
                            Level::Error,
                            Domain::Submission,
                            "peer_submit_failed",
                            obj(&[
                                ("token", v_str(&self.token)),
                                ("error", v_str(&err.to_string())),
                            ]),
                        );
                        Err(CoreError::Submission(err.to_string()))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::MemoryBackend;
    use crate::traversal::Phase;

    fn retry() -> RetryConfig {
        RetryConfig {
            max_retries: 0,
            base_delay_ms: 1,
            max_delay_ms: 1,
            jitter_factor: 0.0,
        }
    }

    #[tokio::test]
    async fn unknown_code_is_denied() {
        let backend = MemoryBackend::new();
        match enter_with_code(&backend, &retry(), "NOPE").await.unwrap() {
            Entry::Denied { message } => assert!(!message.is_empty()),
            other => panic!("expected Denied, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn fresh_code_loads_a_session() {
        let backend = MemoryBackend::new();
        backend.issue_code("FRESH");
        match enter_with_code(&backend, &retry(), "FRESH").await.unwrap() {
            Entry::Fresh(session) => assert_eq!(session.traversal().len(), 8),
            other => panic!("expected Fresh, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn used_code_routes_to_its_report() {
        let backend = MemoryBackend::new();
        backend.issue_code("USED");
        let mut session = SelfSession::load(&backend, &retry(), "USED").await.unwrap();
        let report_id = loop {
            match session.answer(&backend, 0).await.unwrap() {
                SessionStep::Completed { report_id } => break report_id,
                SessionStep::Next { .. } => continue,
                other => panic!("unexpected step {:?}", other),
            }
        };
        match enter_with_code(&backend, &retry(), "USED").await.unwrap() {
            Entry::ExistingReport { report_id: found } => assert_eq!(found, report_id),
            other => panic!("expected ExistingReport, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_report_maps_to_not_found() {
        let backend = MemoryBackend::new();
        let err = load_report(&backend, &retry(), "r-9999").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(id) if id == "r-9999"));
    }

    #[tokio::test]
    async fn failed_create_rolls_session_back() {
        let backend = MemoryBackend::new();
        backend.issue_code("ROLL");
        let mut session = SelfSession::load(&backend, &retry(), "ROLL").await.unwrap();
        for _ in 0..7 {
            session.answer(&backend, 0).await.unwrap();
        }
        backend.set_fail_create(true);
        let err = session.answer(&backend, 0).await.unwrap_err();
        assert!(matches!(err, CoreError::Submission(_)));
        assert_eq!(session.traversal().phase(), Phase::Active);
        assert_eq!(session.traversal().position(), 7);
        assert_eq!(session.traversal().ledger().len(), 8);

        backend.set_fail_create(false);
        let step = session.answer(&backend, 0).await.unwrap();
        assert!(matches!(step, SessionStep::Completed { .. }));
        assert_eq!(backend.create_report_calls(), 2);
    }
}
