use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    answers::{AnswerCollector, AnswerMap, CommitOutcome},
    catalog::{Question, QuestionCatalog},
    error::Result,
    input::{InputControl, InputRenderer},
    render::{ResultPanel, ResultRenderer},
    transport::DiagnosisTransport,
};

/// Which navigation buttons are visible. Exactly one of `next`/`finish` is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavButtons {
    pub prev: bool,
    pub next: bool,
    pub finish: bool,
}

impl NavButtons {
    pub fn at(index: usize, total: usize) -> Self {
        let last = index + 1 >= total;
        Self {
            prev: index > 0,
            next: !last,
            finish: last,
        }
    }
}

/// Everything the front end needs to draw the current step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub index: usize,
    pub total: usize,
    pub label: String,
    pub progress: u32,
    pub question: String,
    pub control: InputControl,
    pub buttons: NavButtons,
}

pub fn progress_percent(index: usize, total: usize) -> u32 {
    if total <= 1 {
        return 0;
    }
    ((index as f64 / (total - 1) as f64) * 100.0).round() as u32
}

/// Drives the guided interview over a fixed question catalog.
///
/// Every navigation first commits whatever is in the rendered control, then
/// renders the target step from the answer map.
pub struct StepperController {
    id: Uuid,
    catalog: Arc<QuestionCatalog>,
    index: usize,
    answers: AnswerMap,
    control: InputControl,
    last_commit: CommitOutcome,
    result: Option<ResultPanel>,
}

impl StepperController {
    /// Catalogs are never empty, so the first step always exists.
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        let answers = AnswerMap::new();
        let control = InputRenderer::render(&catalog.questions()[0], &answers);
        let id = Uuid::new_v4();
        info!(
            "Starting interview {} with {} questions",
            id,
            catalog.len()
        );
        Self {
            id,
            catalog,
            index: 0,
            answers,
            control,
            last_commit: CommitOutcome::Unchanged,
            result: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn question_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn current_question(&self) -> &Question {
        &self.catalog.questions()[self.index]
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn control(&self) -> &InputControl {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut InputControl {
        &mut self.control
    }

    pub fn result(&self) -> Option<&ResultPanel> {
        self.result.as_ref()
    }

    /// Outcome of the most recent commit, so a front end can tell the user
    /// why a value was not saved after navigating away from it.
    pub fn last_commit(&self) -> &CommitOutcome {
        &self.last_commit
    }

    pub fn view(&self) -> StepView {
        let total = self.catalog.len();
        StepView {
            index: self.index,
            total,
            label: format!("Step {} of {}", self.index + 1, total),
            progress: progress_percent(self.index, total),
            question: self.current_question().text.clone(),
            control: self.control.clone(),
            buttons: NavButtons::at(self.index, total),
        }
    }

    /// Writes the rendered control into the answer map. Safe to repeat.
    pub fn commit(&mut self) -> CommitOutcome {
        let question = &self.catalog.questions()[self.index];
        let outcome = AnswerCollector::commit(question, &self.control, &mut self.answers);
        self.last_commit = outcome.clone();
        outcome
    }

    /// Commits, then steps back. Returns false at the first step.
    pub fn prev(&mut self) -> bool {
        self.commit();
        if self.index == 0 {
            return false;
        }
        self.go_to(self.index - 1);
        true
    }

    /// Commits, then steps forward. Returns false at the last step.
    pub fn next(&mut self) -> bool {
        self.commit();
        if self.index + 1 >= self.catalog.len() {
            return false;
        }
        self.go_to(self.index + 1);
        true
    }

    /// Commits the current step, submits every answer and renders the result.
    /// The step index is left where it is.
    pub async fn finish(&mut self, transport: &dyn DiagnosisTransport) -> Result<&ResultPanel> {
        self.commit();
        info!(
            "Interview {} submitting {} answers",
            self.id,
            self.answers.len()
        );

        let result = transport.diagnose(&self.answers).await?;
        debug!(
            "Interview {} received {} ranked conditions",
            self.id,
            result.ranked.len()
        );

        Ok(&*self.result.insert(ResultRenderer::render(&result)))
    }

    fn go_to(&mut self, index: usize) {
        self.index = index;
        self.control = InputRenderer::render(&self.catalog.questions()[index], &self.answers);
        debug!("Interview {} at step {}", self.id, index);
    }
}
