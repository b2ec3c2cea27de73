use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::error::{FlowError, Result};

const BUILTIN_CATALOG: &str = include_str!("../catalog/questions.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Boolean,
    Choice,
    Number,
    Scale,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

/// One interview question as declared by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Question {
    /// Declared bounds, falling back to 0..100 for numbers and 0..10 for scales.
    pub fn bounds(&self) -> (f64, f64) {
        let default_max = match self.kind {
            QuestionKind::Scale => 10.0,
            _ => 100.0,
        };
        (self.min.unwrap_or(0.0), self.max.unwrap_or(default_max))
    }
}

/// Ordered, read-only list of interview questions.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        validate(&questions)?;
        Ok(Self { questions })
    }

    /// The lung-infection triage questionnaire bundled with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&raw)?;
        info!(
            "Loaded {} questions from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

fn validate(questions: &[Question]) -> Result<()> {
    if questions.is_empty() {
        return Err(FlowError::Catalog("catalog has no questions".to_string()));
    }

    let mut seen = HashSet::new();
    for question in questions {
        if !seen.insert(question.id.as_str()) {
            return Err(FlowError::Catalog(format!(
                "duplicate question id '{}'",
                question.id
            )));
        }
        if question.kind == QuestionKind::Choice && question.options.is_empty() {
            return Err(FlowError::Catalog(format!(
                "choice question '{}' has no options",
                question.id
            )));
        }
        let (min, max) = question.bounds();
        if min > max {
            return Err(FlowError::Catalog(format!(
                "question '{}' has min {} above max {}",
                question.id, min, max
            )));
        }
    }
    Ok(())
}
