use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

use crate::catalog::{Question, QuestionKind};
use crate::input::InputControl;

/// A committed interview answer. Serialized untagged so the engine sees plain
/// JSON booleans, numbers and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Flag(bool),
    Number(f64),
    Choice(String),
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Flag(flag) => write!(f, "{}", flag),
            AnswerValue::Number(number) => write!(f, "{}", number),
            AnswerValue::Choice(value) => f.write_str(value),
        }
    }
}

/// Answers keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<String, AnswerValue>);

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.0.get(question_id)
    }

    pub fn insert(&mut self, question_id: impl Into<String>, value: AnswerValue) {
        self.0.insert(question_id.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    Committed(AnswerValue),
    /// Nothing selected (or "not sure"): any earlier answer stays as it was.
    Unchanged,
    /// The raw value could not be read as a number; any earlier answer stays.
    Rejected(String),
}

/// Reads the rendered control of the current step into the answer map.
pub struct AnswerCollector;

impl AnswerCollector {
    pub fn commit(
        question: &Question,
        control: &InputControl,
        answers: &mut AnswerMap,
    ) -> CommitOutcome {
        if control.name() != question.id {
            warn!(
                "Control '{}' does not belong to question '{}'",
                control.name(),
                question.id
            );
            return CommitOutcome::Unchanged;
        }

        let outcome = match control {
            InputControl::Radio { options, .. } => match options.iter().find(|o| o.checked) {
                None => CommitOutcome::Unchanged,
                Some(chosen) if question.kind == QuestionKind::Boolean => {
                    match chosen.value.as_str() {
                        "true" => CommitOutcome::Committed(AnswerValue::Flag(true)),
                        "false" => CommitOutcome::Committed(AnswerValue::Flag(false)),
                        _ => CommitOutcome::Unchanged,
                    }
                }
                Some(chosen) => CommitOutcome::Committed(AnswerValue::Choice(chosen.value.clone())),
            },
            InputControl::Number { value, .. } | InputControl::Slider { value, .. } => {
                coerce_number(question, value)
            }
        };

        match &outcome {
            CommitOutcome::Committed(value) => {
                debug!("Committing {} = {}", question.id, value);
                answers.insert(question.id.clone(), value.clone());
            }
            CommitOutcome::Rejected(reason) => {
                warn!("Not committing answer for {}: {}", question.id, reason);
            }
            CommitOutcome::Unchanged => {}
        }

        outcome
    }
}

/// Empty text commits nothing, non-numeric text is rejected and anything
/// outside the declared bounds is clamped into them.
fn coerce_number(question: &Question, raw: &str) -> CommitOutcome {
    let raw = raw.trim();
    if raw.is_empty() {
        return CommitOutcome::Unchanged;
    }

    match raw.parse::<f64>() {
        Ok(number) if number.is_finite() => {
            let (min, max) = question.bounds();
            CommitOutcome::Committed(AnswerValue::Number(number.max(min).min(max)))
        }
        _ => CommitOutcome::Rejected(format!("'{}' is not a number", raw)),
    }
}
