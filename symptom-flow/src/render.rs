//! View descriptions for the transcript and the result panel.
//!
//! Everything here is a pure function of its input: the session objects decide
//! *when* to render, these helpers decide *what* the user sees.

use serde::Serialize;
use std::fmt;

use crate::chat::{Author, ChatTurn};
use crate::models::{RankedResult, RuleTrace};

/// Fact ids use underscores; people read spaces.
pub fn humanize(token: &str) -> String {
    token.replace('_', " ")
}

/// One triggered rule as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleExplanation {
    pub condition: String,
    pub explanation: String,
    pub matched: Vec<String>,
}

impl From<&RuleTrace> for RuleExplanation {
    fn from(trace: &RuleTrace) -> Self {
        Self {
            condition: trace.condition.clone(),
            explanation: trace.explanation.clone(),
            matched: trace.rule.iter().map(|fact| humanize(fact)).collect(),
        }
    }
}

impl fmt::Display for RuleExplanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (matched: {})",
            self.condition,
            self.explanation,
            self.matched.join(", ")
        )
    }
}

pub struct MessageRenderer;

impl MessageRenderer {
    pub fn user(text: impl Into<String>) -> ChatTurn {
        ChatTurn::new(text, Author::User, None)
    }

    pub fn bot(text: impl Into<String>) -> ChatTurn {
        ChatTurn::new(text, Author::Bot, None)
    }

    pub fn noted(symptoms: &[String]) -> ChatTurn {
        let listed: Vec<String> = symptoms.iter().map(|s| humanize(s)).collect();
        Self::bot(format!("Noted: {}", listed.join(", ")))
    }

    /// Secondary turn that follows a terminal reply. `None` when no rule fired.
    pub fn explanation(rules: &[RuleTrace]) -> Option<ChatTurn> {
        if rules.is_empty() {
            return None;
        }
        let joined = rules
            .iter()
            .map(|rule| RuleExplanation::from(rule).to_string())
            .collect::<Vec<_>>()
            .join(" | ");
        Some(ChatTurn::new(
            format!("Explanation: {}", joined),
            Author::Bot,
            Some("Rules triggered".to_string()),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    pub condition: String,
    pub percent: u32,
}

impl RankedRow {
    pub fn probability_label(&self) -> String {
        format!("{}% probable", self.percent)
    }
}

/// Rendered interview result. Each render produces a fresh panel that
/// replaces the previous one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum ResultPanel {
    NoClearResult {
        advice: String,
        facts: String,
    },
    Ranked {
        rows: Vec<RankedRow>,
        advice: String,
        explanations: Vec<RuleExplanation>,
        facts: Vec<String>,
    },
}

impl ResultPanel {
    pub fn heading(&self) -> &'static str {
        match self {
            ResultPanel::NoClearResult { .. } => "No clear result",
            ResultPanel::Ranked { .. } => "Possible conditions",
        }
    }

    pub fn advice(&self) -> &str {
        match self {
            ResultPanel::NoClearResult { advice, .. } | ResultPanel::Ranked { advice, .. } => {
                advice
            }
        }
    }
}

pub struct ResultRenderer;

impl ResultRenderer {
    pub fn render(result: &RankedResult) -> ResultPanel {
        if result.ranked.is_empty() {
            let facts: Vec<String> = result.facts.iter().map(|f| humanize(f)).collect();
            return ResultPanel::NoClearResult {
                advice: result.advice.clone(),
                facts: facts.join(", "),
            };
        }

        // the engine orders `ranked`; keep it as is
        let rows = result
            .ranked
            .iter()
            .map(|entry| RankedRow {
                condition: entry.condition.clone(),
                percent: to_percent(entry.confidence),
            })
            .collect();

        ResultPanel::Ranked {
            rows,
            advice: result.advice.clone(),
            explanations: result.rules_triggered.iter().map(RuleExplanation::from).collect(),
            facts: result.facts.iter().map(|f| humanize(f)).collect(),
        }
    }
}

fn to_percent(confidence: f64) -> u32 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RankedCondition;

    fn trace(condition: &str, facts: &[&str]) -> RuleTrace {
        RuleTrace {
            condition: condition.to_string(),
            explanation: "Classic presentation.".to_string(),
            rule: facts.iter().map(|f| f.to_string()).collect(),
            weight: Some(0.2),
        }
    }

    #[test]
    fn test_empty_ranked_renders_advice_and_facts() {
        let result = RankedResult {
            ranked: Vec::new(),
            advice: "More information is needed.".to_string(),
            facts: vec!["sore_throat".to_string(), "fever".to_string()],
            rules_triggered: Vec::new(),
        };

        let panel = ResultRenderer::render(&result);
        assert_eq!(panel.heading(), "No clear result");
        assert_eq!(
            panel,
            ResultPanel::NoClearResult {
                advice: "More information is needed.".to_string(),
                facts: "sore throat, fever".to_string(),
            }
        );
    }

    #[test]
    fn test_ranked_order_and_percentages_preserved() {
        let result = RankedResult {
            ranked: vec![
                RankedCondition {
                    condition: "A".to_string(),
                    confidence: 0.9,
                },
                RankedCondition {
                    condition: "B".to_string(),
                    confidence: 0.4,
                },
            ],
            advice: "See a clinician.".to_string(),
            facts: vec!["night_sweats".to_string()],
            rules_triggered: vec![trace("A", &["night_sweats", "weight_loss"])],
        };

        let ResultPanel::Ranked {
            rows,
            advice,
            explanations,
            facts,
        } = ResultRenderer::render(&result)
        else {
            panic!("expected ranked panel");
        };

        assert_eq!(rows[0].condition, "A");
        assert_eq!(rows[0].probability_label(), "90% probable");
        assert_eq!(rows[1].condition, "B");
        assert_eq!(rows[1].probability_label(), "40% probable");
        assert_eq!(advice, "See a clinician.");
        assert_eq!(facts, vec!["night sweats".to_string()]);
        assert_eq!(
            explanations[0].to_string(),
            "A: Classic presentation. (matched: night sweats, weight loss)"
        );
    }

    #[test]
    fn test_lower_confidence_first_is_not_resorted() {
        let result = RankedResult {
            ranked: vec![
                RankedCondition {
                    condition: "Low".to_string(),
                    confidence: 0.1,
                },
                RankedCondition {
                    condition: "High".to_string(),
                    confidence: 0.8,
                },
            ],
            ..RankedResult::default()
        };

        match ResultRenderer::render(&result) {
            ResultPanel::Ranked { rows, .. } => {
                let order: Vec<_> = rows.iter().map(|r| r.condition.as_str()).collect();
                assert_eq!(order, vec!["Low", "High"]);
            }
            other => panic!("expected ranked panel, got {:?}", other),
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        let result = RankedResult {
            ranked: vec![RankedCondition {
                condition: "Acute bronchitis".to_string(),
                confidence: 0.555,
            }],
            ..RankedResult::default()
        };
        assert_eq!(ResultRenderer::render(&result), ResultRenderer::render(&result));
    }

    #[test]
    fn test_explanation_turn_humanizes_matches() {
        let turn = MessageRenderer::explanation(&[
            trace("Pneumonia", &["productive_cough"]),
            trace("Bronchitis", &["sore_throat"]),
        ])
        .unwrap();

        assert_eq!(turn.author, Author::Bot);
        assert_eq!(turn.note.as_deref(), Some("Rules triggered"));
        assert_eq!(
            turn.text,
            "Explanation: Pneumonia: Classic presentation. (matched: productive cough) | \
             Bronchitis: Classic presentation. (matched: sore throat)"
        );
        assert!(MessageRenderer::explanation(&[]).is_none());
    }

    #[test]
    fn test_noted_turn() {
        let turn = MessageRenderer::noted(&["fever".to_string(), "dry_cough".to_string()]);
        assert_eq!(turn.text, "Noted: fever, dry cough");
    }
}
