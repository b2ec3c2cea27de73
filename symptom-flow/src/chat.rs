use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::{
    binder::{FollowupBinder, QuickReply},
    error::Result,
    models::{ChatExchange, ChatRequest, EngineReply, FollowupQuestion, SessionState},
    render::MessageRenderer,
    transport::ChatTransport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Bot,
}

/// One transcript entry. Turns are only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub text: String,
    pub author: Author,
    pub note: Option<String>,
    pub at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(text: impl Into<String>, author: Author, note: Option<String>) -> Self {
        Self {
            text: text.into(),
            author,
            note,
            at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Input was blank; nothing was sent and nothing changed.
    Declined,
    Applied(ChatUpdate),
}

/// What one completed round trip added to the view.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatUpdate {
    /// Turns appended by the engine's response, in order.
    pub turns: Vec<ChatTurn>,
    /// Quick replies rendered after the response was applied.
    pub quick_replies: Vec<QuickReply>,
    /// Follow-up that is pending once this response is applied.
    pub pending: Option<FollowupQuestion>,
}

#[derive(Debug, Default)]
struct ChatState {
    session_state: SessionState,
    binder: FollowupBinder,
    transcript: Vec<ChatTurn>,
}

/// A conversation with the diagnosis engine.
///
/// Cloning yields another handle to the same conversation, so a front end can
/// start a second request while the first is still in flight. The lock is
/// never held across the network call; each response is merged in its own
/// completion step.
#[derive(Clone)]
pub struct ChatSession {
    id: Uuid,
    transport: Arc<dyn ChatTransport>,
    inner: Arc<Mutex<ChatState>>,
}

impl ChatSession {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self::with_state(transport, SessionState::default())
    }

    pub fn with_state(transport: Arc<dyn ChatTransport>, session_state: SessionState) -> Self {
        let id = Uuid::new_v4();
        info!("Starting chat session {}", id);
        Self {
            id,
            transport,
            inner: Arc::new(Mutex::new(ChatState {
                session_state,
                ..ChatState::default()
            })),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Sends free text, answering the pending follow-up if there is one.
    pub async fn submit(&self, input: &str) -> Result<SubmitOutcome> {
        let qid = self.lock().binder.pending_qid().map(str::to_string);
        self.dispatch(input, qid).await
    }

    /// Sends a quick reply's label with the follow-up id it was rendered for,
    /// even if a newer follow-up has arrived since.
    pub async fn choose(&self, reply: &QuickReply) -> Result<SubmitOutcome> {
        self.dispatch(&reply.label, Some(reply.qid().to_string()))
            .await
    }

    async fn dispatch(&self, input: &str, qid: Option<String>) -> Result<SubmitOutcome> {
        let text = input.trim();
        if text.is_empty() {
            debug!("Declining blank chat input");
            return Ok(SubmitOutcome::Declined);
        }

        let request = {
            let mut state = self.lock();
            state.transcript.push(MessageRenderer::user(text));
            state.binder.clear_replies();
            ChatRequest {
                message: text.to_string(),
                state: state.session_state.clone(),
                qid: qid.clone(),
            }
        };

        let span = info_span!("chat_request", session_id = %self.id, qid = ?qid);
        let exchange = self.transport.send(request).instrument(span).await?;

        Ok(SubmitOutcome::Applied(self.apply(exchange, qid.as_deref())))
    }

    fn apply(&self, exchange: ChatExchange, answered: Option<&str>) -> ChatUpdate {
        let mut state = self.lock();
        let mut turns = Vec::new();

        if let Some(session_state) = exchange.state {
            debug!(
                "Session {} now tracks {} symptoms",
                self.id,
                session_state.symptoms.len()
            );
            state.session_state = session_state;
        }

        if !exchange.detected_symptoms.is_empty() {
            turns.push(MessageRenderer::noted(&exchange.detected_symptoms));
        }

        match exchange.reply {
            EngineReply::Followup(followup) => {
                info!("Session {} received follow-up {}", self.id, followup.id);
                turns.push(MessageRenderer::bot(followup.text.clone()));
                state.binder.bind(followup);
            }
            EngineReply::Terminal {
                reply,
                rules_triggered,
            } => {
                info!(
                    "Session {} received reply with {} rule traces",
                    self.id,
                    rules_triggered.len()
                );
                if !reply.is_empty() {
                    turns.push(MessageRenderer::bot(reply));
                }
                turns.extend(MessageRenderer::explanation(&rules_triggered));
                state.binder.release(answered);
            }
        }

        state.transcript.extend(turns.iter().cloned());

        ChatUpdate {
            turns,
            quick_replies: state.binder.replies().to_vec(),
            pending: state.binder.pending().cloned(),
        }
    }

    pub fn transcript(&self) -> Vec<ChatTurn> {
        self.lock().transcript.clone()
    }

    pub fn session_state(&self) -> SessionState {
        self.lock().session_state.clone()
    }

    pub fn pending_followup(&self) -> Option<FollowupQuestion> {
        self.lock().binder.pending().cloned()
    }

    pub fn quick_replies(&self) -> Vec<QuickReply> {
        self.lock().binder.replies().to_vec()
    }

    fn lock(&self) -> MutexGuard<'_, ChatState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
