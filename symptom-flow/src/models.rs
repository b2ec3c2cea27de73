use serde::{Deserialize, Serialize};

use crate::answers::AnswerMap;

/// Accumulator the engine hands back on every chat turn.
///
/// The client never edits it; it is replaced wholesale by whatever the engine
/// returns and sent back untouched on the next request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub asked: Vec<String>,
}

/// Clarifying question emitted mid-conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowupQuestion {
    pub id: String,
    pub text: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Which facts made a rule fire for a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTrace {
    pub condition: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub rule: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCondition {
    pub condition: String,
    pub confidence: f64,
}

/// Final answer of the interview endpoint. `ranked` is already ordered by the
/// engine, most likely first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    #[serde(default)]
    pub ranked: Vec<RankedCondition>,
    #[serde(default)]
    pub advice: String,
    #[serde(default)]
    pub facts: Vec<String>,
    #[serde(default)]
    pub rules_triggered: Vec<RuleTrace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub state: SessionState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qid: Option<String>,
}

/// Conversational response exactly as it comes off the wire. Every field may
/// be missing; [`ChatExchange`] is the typed view the session works with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub state: Option<SessionState>,
    #[serde(rename = "detectedSymptoms", default)]
    pub detected_symptoms: Option<Vec<String>>,
    #[serde(default)]
    pub followup: Option<FollowupQuestion>,
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub rules_triggered: Option<Vec<RuleTrace>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineReply {
    /// The engine wants more information before answering.
    Followup(FollowupQuestion),
    /// The engine answered; the conversation may still continue.
    Terminal {
        reply: String,
        rules_triggered: Vec<RuleTrace>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatExchange {
    pub state: Option<SessionState>,
    pub detected_symptoms: Vec<String>,
    pub reply: EngineReply,
}

impl From<ChatResponse> for ChatExchange {
    fn from(response: ChatResponse) -> Self {
        // the engine sends an empty `reply` next to a follow-up; the follow-up wins
        let reply = match response.followup {
            Some(followup) => EngineReply::Followup(followup),
            None => EngineReply::Terminal {
                reply: response.reply.unwrap_or_default(),
                rules_triggered: response.rules_triggered.unwrap_or_default(),
            },
        };

        Self {
            state: response.state,
            detected_symptoms: response.detected_symptoms.unwrap_or_default(),
            reply,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnoseRequest {
    pub answers: AnswerMap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_followup_wins_over_empty_reply() {
        let response: ChatResponse = serde_json::from_value(json!({
            "reply": "",
            "followup": {
                "id": "cough_type",
                "text": "Which cough best describes yours?",
                "type": "choice",
                "suggestions": ["No cough", "Dry cough"]
            },
            "state": {"symptoms": ["fever"], "asked": ["cough_type"]},
            "detectedSymptoms": ["fever"]
        }))
        .unwrap();

        let exchange = ChatExchange::from(response);
        match exchange.reply {
            EngineReply::Followup(followup) => {
                assert_eq!(followup.id, "cough_type");
                assert_eq!(followup.kind.as_deref(), Some("choice"));
                assert_eq!(followup.suggestions.len(), 2);
            }
            other => panic!("expected follow-up, got {:?}", other),
        }
        assert_eq!(exchange.detected_symptoms, vec!["fever".to_string()]);
        assert_eq!(exchange.state.unwrap().asked, vec!["cough_type".to_string()]);
    }

    #[test]
    fn test_missing_fields_default() {
        let response: ChatResponse = serde_json::from_value(json!({})).unwrap();
        let exchange = ChatExchange::from(response);

        assert!(exchange.state.is_none());
        assert!(exchange.detected_symptoms.is_empty());
        assert_eq!(
            exchange.reply,
            EngineReply::Terminal {
                reply: String::new(),
                rules_triggered: Vec::new()
            }
        );
    }

    #[test]
    fn test_followup_without_suggestions() {
        let response: ChatResponse = serde_json::from_value(json!({
            "followup": {"id": "smoker", "text": "Do you currently smoke?"}
        }))
        .unwrap();

        match ChatExchange::from(response).reply {
            EngineReply::Followup(followup) => assert!(followup.suggestions.is_empty()),
            other => panic!("expected follow-up, got {:?}", other),
        }
    }

    #[test]
    fn test_chat_request_omits_missing_qid() {
        let request = ChatRequest {
            message: "I have a fever".to_string(),
            state: SessionState::default(),
            qid: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("qid").is_none());
        assert_eq!(value["state"], json!({"symptoms": [], "asked": []}));
    }

    #[test]
    fn test_ranked_result_tolerates_partial_body() {
        let result: RankedResult = serde_json::from_value(json!({
            "advice": "More information is needed."
        }))
        .unwrap();
        assert!(result.ranked.is_empty());
        assert!(result.facts.is_empty());
        assert_eq!(result.advice, "More information is needed.");
    }
}
