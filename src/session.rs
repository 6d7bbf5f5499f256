// Listening session orchestrator. Tries remote AI analysis first for
// each transcript update and falls back to the local heuristic parser,
// publishing drafts last-write-wins until the caller finishes the
// session.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::ai::{EnhanceError, TaskEnhancer};
use crate::parser;
use crate::task::TaskDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Listening,
    /// A draft has been published; further transcript updates may still
    /// supersede it.
    Assembled,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not understand the reminder")]
    Incomplete,
}

struct AnalyzeJob {
    revision: u64,
    transcript: String,
}

struct AnalyzeReply {
    revision: u64,
    result: Result<TaskDraft, EnhanceError>,
}

/// One listening session: owns the in-flight draft and the analysis
/// worker thread. Exactly one writer (this session) and one reader (the
/// caller) per session; the worker only communicates over channels.
pub struct ListeningSession {
    state: SessionState,
    revision: u64,
    inflight: u64,
    transcript: String,
    draft: Option<TaskDraft>,
    job_tx: Option<mpsc::Sender<AnalyzeJob>>,
    reply_rx: Option<mpsc::Receiver<AnalyzeReply>>,
    worker: Option<JoinHandle<()>>,
}

impl ListeningSession {
    /// Start listening. With an enhancer, a named worker thread services
    /// remote analysis so transcript updates never block on the network.
    pub fn start(enhancer: Option<Arc<dyn TaskEnhancer>>) -> anyhow::Result<Self> {
        let mut session = Self {
            state: SessionState::Listening,
            revision: 0,
            inflight: 0,
            transcript: String::new(),
            draft: None,
            job_tx: None,
            reply_rx: None,
            worker: None,
        };

        if let Some(enhancer) = enhancer {
            let (job_tx, job_rx) = mpsc::channel::<AnalyzeJob>();
            let (reply_tx, reply_rx) = mpsc::channel::<AnalyzeReply>();
            let handle = std::thread::Builder::new()
                .name("ai-analysis".into())
                .spawn(move || {
                    for job in job_rx {
                        let result = enhancer.enhance(&job.transcript);
                        if reply_tx
                            .send(AnalyzeReply {
                                revision: job.revision,
                                result,
                            })
                            .is_err()
                        {
                            break;
                        }
                    }
                })?;
            session.job_tx = Some(job_tx);
            session.reply_rx = Some(reply_rx);
            session.worker = Some(handle);
        }

        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn current_draft(&self) -> Option<&TaskDraft> {
        self.draft.as_ref()
    }

    /// Feed the latest transcript for the utterance. Each update
    /// replaces the previous transcript (recognition overwrites, never
    /// appends). Returns the draft currently published, if any.
    pub fn update_transcript(&mut self, transcript: &str) -> Option<&TaskDraft> {
        self.revision += 1;
        self.transcript = transcript.to_string();

        if let Some(tx) = &self.job_tx {
            let job = AnalyzeJob {
                revision: self.revision,
                transcript: transcript.to_string(),
            };
            if tx.send(job).is_ok() {
                self.inflight += 1;
            } else {
                tracing::warn!("analysis worker is gone; continuing with local parsing only");
                self.job_tx = None;
            }
        }

        // Local pipeline runs synchronously on every update; a remote
        // success for the same revision supersedes it later.
        if let Some(draft) = parser::parse_transcript_today(transcript) {
            self.publish(draft);
        }

        self.poll_remote();
        self.draft.as_ref()
    }

    /// Apply any remote replies that have arrived. A reply answering
    /// anything but the latest transcript revision is discarded, so a
    /// slow response can never overwrite a newer result.
    pub fn poll_remote(&mut self) -> bool {
        let replies: Vec<AnalyzeReply> = match &self.reply_rx {
            Some(rx) => rx.try_iter().collect(),
            None => return false,
        };

        let mut applied = false;
        for reply in replies {
            self.inflight = self.inflight.saturating_sub(1);
            if reply.revision != self.revision {
                tracing::debug!(
                    answered = reply.revision,
                    current = self.revision,
                    "discarding stale analysis reply"
                );
                continue;
            }
            match reply.result {
                Ok(draft) if draft.is_usable() => {
                    tracing::debug!("remote analysis produced a draft");
                    self.publish(draft);
                    applied = true;
                }
                Ok(_) => {
                    tracing::debug!("remote draft unusable, keeping local result");
                }
                Err(e) => {
                    tracing::debug!("remote analysis failed, keeping local result: {}", e);
                }
            }
        }
        applied
    }

    /// End the session and return the final draft. Waits up to `grace`
    /// for an in-flight remote reply before settling on whatever was
    /// last published. An unusable (or absent) draft is the one error
    /// surfaced to the caller: "could not understand", prompting a retry.
    pub fn finish(&mut self, grace: Duration) -> Result<TaskDraft, SessionError> {
        self.drain_remote(grace);
        self.stop_worker();
        self.state = SessionState::Idle;
        match self.draft.take() {
            Some(draft) if draft.is_usable() => Ok(draft),
            _ => Err(SessionError::Incomplete),
        }
    }

    /// Abandon the session without producing a draft.
    pub fn cancel(&mut self) {
        self.stop_worker();
        self.draft = None;
        self.state = SessionState::Idle;
    }

    fn drain_remote(&mut self, grace: Duration) {
        let deadline = Instant::now() + grace;
        while self.inflight > 0 {
            let Some(rx) = &self.reply_rx else { break };
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::debug!("gave up waiting for in-flight analysis");
                break;
            }
            match rx.recv_timeout(remaining) {
                Ok(reply) => {
                    self.inflight = self.inflight.saturating_sub(1);
                    if reply.revision != self.revision {
                        continue;
                    }
                    if let Ok(draft) = reply.result {
                        if draft.is_usable() {
                            self.publish(draft);
                        }
                    }
                }
                Err(_) => break,
            }
        }
    }

    fn publish(&mut self, draft: TaskDraft) {
        // Last write wins; fields from successive drafts are never merged.
        self.state = SessionState::Assembled;
        self.draft = Some(draft);
    }

    fn stop_worker(&mut self) {
        // Dropping the sender ends the worker loop.
        self.job_tx.take();
        self.reply_rx.take();
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ListeningSession {
    fn drop(&mut self) {
        self.stop_worker();
    }
}
