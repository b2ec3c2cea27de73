pub mod answers;
pub mod binder;
pub mod catalog;
pub mod chat;
pub mod error;
pub mod input;
pub mod models;
pub mod render;
pub mod stepper;
pub mod transport;

// Re-export commonly used types
pub use answers::{AnswerCollector, AnswerMap, AnswerValue, CommitOutcome};
pub use binder::{FollowupBinder, QuickReply};
pub use catalog::{ChoiceOption, Question, QuestionCatalog, QuestionKind};
pub use chat::{Author, ChatSession, ChatTurn, ChatUpdate, SubmitOutcome};
pub use error::{FlowError, Result};
pub use input::{InputControl, InputRenderer, RadioOption};
pub use models::{
    ChatExchange, ChatRequest, ChatResponse, EngineReply, FollowupQuestion, RankedCondition,
    RankedResult, RuleTrace, SessionState,
};
pub use render::{
    MessageRenderer, RankedRow, ResultPanel, ResultRenderer, RuleExplanation, humanize,
};
pub use stepper::{NavButtons, StepView, StepperController, progress_percent};
pub use transport::{ChatTransport, DiagnosisTransport, EngineConfig, HttpEngineClient};
