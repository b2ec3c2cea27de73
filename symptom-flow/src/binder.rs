use serde::Serialize;
use tracing::debug;

use crate::models::FollowupQuestion;

/// A suggested reply together with the id of the follow-up it answers.
///
/// The id is captured when the reply is rendered and cannot be changed
/// afterwards, so a reply clicked late still answers its own question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickReply {
    pub label: String,
    qid: String,
}

impl QuickReply {
    pub fn qid(&self) -> &str {
        &self.qid
    }
}

/// Holds the pending follow-up and the quick replies rendered for it.
#[derive(Debug, Clone, Default)]
pub struct FollowupBinder {
    pending: Option<FollowupQuestion>,
    replies: Vec<QuickReply>,
}

impl FollowupBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `followup` the pending question and renders one reply per suggestion.
    /// Whatever was pending before is dropped.
    pub fn bind(&mut self, followup: FollowupQuestion) -> &[QuickReply] {
        self.replies = followup
            .suggestions
            .iter()
            .map(|label| QuickReply {
                label: label.clone(),
                qid: followup.id.clone(),
            })
            .collect();
        debug!(
            "Bound {} quick replies to follow-up {}",
            self.replies.len(),
            followup.id
        );
        self.pending = Some(followup);
        &self.replies
    }

    pub fn pending(&self) -> Option<&FollowupQuestion> {
        self.pending.as_ref()
    }

    pub fn pending_qid(&self) -> Option<&str> {
        self.pending.as_ref().map(|f| f.id.as_str())
    }

    pub fn replies(&self) -> &[QuickReply] {
        &self.replies
    }

    /// Removes the rendered replies; the pending follow-up stays.
    pub fn clear_replies(&mut self) {
        self.replies.clear();
    }

    /// Clears the pending follow-up, but only if it is the one `qid` answered.
    /// Returns true when something was cleared.
    pub fn release(&mut self, qid: Option<&str>) -> bool {
        match (qid, self.pending_qid()) {
            (Some(answered), Some(pending)) if answered == pending => {
                self.pending = None;
                self.replies.clear();
                true
            }
            _ => false,
        }
    }
}
