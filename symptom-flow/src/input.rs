use serde::{Deserialize, Serialize};

use crate::answers::{AnswerMap, AnswerValue};
use crate::catalog::{Question, QuestionKind};

const SCALE_DEFAULT: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioOption {
    pub value: String,
    pub label: String,
    pub checked: bool,
}

/// The rendered input of one interview step. The user edits it through
/// [`InputControl::select`] and [`InputControl::set_value`]; nothing reaches
/// the answer map until the stepper commits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "control", rename_all = "lowercase")]
pub enum InputControl {
    /// Mutually exclusive options (boolean and choice questions).
    Radio {
        name: String,
        options: Vec<RadioOption>,
    },
    Number {
        name: String,
        min: f64,
        max: f64,
        value: String,
    },
    Slider {
        name: String,
        min: f64,
        max: f64,
        value: String,
    },
}

impl InputControl {
    /// Id of the question this control is registered under.
    pub fn name(&self) -> &str {
        match self {
            InputControl::Radio { name, .. }
            | InputControl::Number { name, .. }
            | InputControl::Slider { name, .. } => name,
        }
    }

    /// Checks the option with `value` and unchecks the rest. Returns false
    /// when there is no such option or the control is not a radio group.
    pub fn select(&mut self, value: &str) -> bool {
        let InputControl::Radio { options, .. } = self else {
            return false;
        };
        if !options.iter().any(|o| o.value == value) {
            return false;
        }
        for option in options.iter_mut() {
            option.checked = option.value == value;
        }
        true
    }

    /// Replaces the raw value of a number or slider control.
    pub fn set_value(&mut self, raw: impl Into<String>) -> bool {
        match self {
            InputControl::Number { value, .. } | InputControl::Slider { value, .. } => {
                *value = raw.into();
                true
            }
            InputControl::Radio { .. } => false,
        }
    }

    /// Live readout shown next to a slider while it is dragged.
    pub fn readout(&self) -> Option<&str> {
        match self {
            InputControl::Slider { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn checked_value(&self) -> Option<&str> {
        match self {
            InputControl::Radio { options, .. } => options
                .iter()
                .find(|o| o.checked)
                .map(|o| o.value.as_str()),
            _ => None,
        }
    }
}

pub struct InputRenderer;

impl InputRenderer {
    /// Builds the control for `question`, pre-populated from its committed answer.
    pub fn render(question: &Question, answers: &AnswerMap) -> InputControl {
        let previous = answers.get(&question.id);
        let name = question.id.clone();

        match question.kind {
            QuestionKind::Boolean => {
                let flag = match previous {
                    Some(AnswerValue::Flag(flag)) => Some(*flag),
                    _ => None,
                };
                let options = [("true", "Yes"), ("false", "No"), ("unknown", "Not sure")]
                    .into_iter()
                    .map(|(value, label)| RadioOption {
                        value: value.to_string(),
                        label: label.to_string(),
                        checked: match flag {
                            Some(true) => value == "true",
                            Some(false) => value == "false",
                            None => false,
                        },
                    })
                    .collect();
                InputControl::Radio { name, options }
            }
            QuestionKind::Choice => {
                let options = question
                    .options
                    .iter()
                    .map(|option| RadioOption {
                        value: option.value.clone(),
                        label: option.label.clone(),
                        checked: matches!(previous, Some(AnswerValue::Choice(v)) if *v == option.value),
                    })
                    .collect();
                InputControl::Radio { name, options }
            }
            QuestionKind::Number => {
                let (min, max) = question.bounds();
                InputControl::Number {
                    name,
                    min,
                    max,
                    value: previous.map(|v| v.to_string()).unwrap_or_default(),
                }
            }
            QuestionKind::Scale => {
                let (min, max) = question.bounds();
                let value = match previous {
                    Some(answer) => answer.to_string(),
                    None => SCALE_DEFAULT.max(min).min(max).to_string(),
                };
                InputControl::Slider {
                    name,
                    min,
                    max,
                    value,
                }
            }
        }
    }
}
