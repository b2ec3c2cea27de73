use std::sync::Arc;
use symptom_flow::{
    ChatSession, ChatTransport, HttpEngineClient, InputControl, QuestionCatalog, QuickReply,
    StepperController, SubmitOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use crate::terminal;

/// A line that is the number of a listed quick reply picks that reply.
fn quick_reply_for(replies: &[QuickReply], line: &str) -> Option<QuickReply> {
    let n: usize = line.parse().ok()?;
    n.checked_sub(1).and_then(|i| replies.get(i)).cloned()
}

pub async fn run_chat(transport: Arc<dyn ChatTransport>) -> anyhow::Result<()> {
    let session = ChatSession::new(transport);
    info!("Chat session {} ready", session.id());
    terminal::print_chat_banner();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        terminal::prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line {
            "/quit" => break,
            "/state" => {
                println!("{}", serde_json::to_string_pretty(&session.session_state())?);
                continue;
            }
            _ => {}
        }

        let outcome = match quick_reply_for(&session.quick_replies(), line) {
            Some(reply) => session.choose(&reply).await,
            None => session.submit(line).await,
        };

        match outcome {
            Ok(SubmitOutcome::Applied(update)) => terminal::print_update(&update),
            Ok(SubmitOutcome::Declined) => {}
            Err(e) => {
                error!("Chat request failed: {}", e);
                eprintln!("The assistant could not be reached, please try again.");
            }
        }
    }

    info!("Chat session {} closed", session.id());
    Ok(())
}

/// Applies free input to the rendered control. For radio groups a number
/// picks the n-th option, anything else is matched against option values.
fn apply_input(control: &mut InputControl, input: &str) -> bool {
    let value = match control {
        InputControl::Radio { options, .. } => match input.parse::<usize>() {
            Ok(n) if n >= 1 && n <= options.len() => options[n - 1].value.clone(),
            _ => input.to_string(),
        },
        InputControl::Number { .. } | InputControl::Slider { .. } => {
            return control.set_value(input);
        }
    };
    control.select(&value)
}

fn report_commit(stepper: &StepperController) {
    if let Some(notice) = terminal::commit_notice(stepper.last_commit()) {
        println!("{}", notice);
    }
}

pub async fn run_interview(client: HttpEngineClient, catalog: QuestionCatalog) -> anyhow::Result<()> {
    let mut stepper = StepperController::new(Arc::new(catalog));
    terminal::print_step(&stepper.view());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        terminal::prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "" => {}
            "q" | "quit" => break,
            "n" | "next" => {
                let moved = stepper.next();
                report_commit(&stepper);
                if moved {
                    terminal::print_step(&stepper.view());
                } else {
                    println!("This is the last question, type 'f' to finish.");
                }
            }
            "p" | "prev" => {
                let moved = stepper.prev();
                report_commit(&stepper);
                if moved {
                    terminal::print_step(&stepper.view());
                } else {
                    println!("This is the first question.");
                }
            }
            "f" | "finish" => {
                if !stepper.view().buttons.finish {
                    println!("Finish is available on the last question.");
                    continue;
                }
                let submitted = stepper.finish(&client).await.map(|_| ());
                report_commit(&stepper);
                match submitted {
                    Ok(()) => {
                        if let Some(panel) = stepper.result() {
                            terminal::print_result(panel);
                        }
                        println!("Type 'p' to revise your answers or 'q' to quit.");
                    }
                    Err(e) => {
                        error!("Interview {} submission failed: {}", stepper.id(), e);
                        eprintln!("The diagnosis could not be retrieved, please try again.");
                    }
                }
            }
            input => {
                if apply_input(stepper.control_mut(), input) {
                    terminal::print_control(stepper.control());
                } else {
                    println!("'{}' is not one of the options.", input);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use symptom_flow::{
        AnswerMap, FollowupBinder, FollowupQuestion, InputRenderer, Question, QuestionKind,
    };

    fn boolean_question() -> Question {
        Question {
            id: "smoker".to_string(),
            text: "Do you smoke?".to_string(),
            kind: QuestionKind::Boolean,
            options: Vec::new(),
            min: None,
            max: None,
        }
    }

    #[test]
    fn test_apply_input_by_number_or_value() {
        let mut control = InputRenderer::render(&boolean_question(), &AnswerMap::new());

        assert!(apply_input(&mut control, "2"));
        assert_eq!(control.checked_value(), Some("false"));

        assert!(apply_input(&mut control, "unknown"));
        assert_eq!(control.checked_value(), Some("unknown"));

        assert!(!apply_input(&mut control, "7"));
        assert_eq!(control.checked_value(), Some("unknown"));
    }

    #[test]
    fn test_apply_input_sets_raw_value() {
        let question = Question {
            kind: QuestionKind::Scale,
            ..boolean_question()
        };
        let mut control = InputRenderer::render(&question, &AnswerMap::new());

        assert!(apply_input(&mut control, "9"));
        assert_eq!(control.readout(), Some("9"));
    }

    #[test]
    fn test_quick_reply_lookup_is_one_based() {
        let mut binder = FollowupBinder::new();
        let replies = binder
            .bind(FollowupQuestion {
                id: "cough_type".to_string(),
                text: "Which cough best describes yours?".to_string(),
                kind: Some("choice".to_string()),
                suggestions: vec!["Dry cough".to_string(), "Productive".to_string()],
            })
            .to_vec();

        let first = quick_reply_for(&replies, "1").unwrap();
        assert_eq!(first.label, "Dry cough");

        let second = quick_reply_for(&replies, "2").unwrap();
        assert_eq!(second.label, "Productive");
        assert_eq!(second.qid(), "cough_type");

        assert!(quick_reply_for(&replies, "0").is_none());
        assert!(quick_reply_for(&replies, "3").is_none());
        assert!(quick_reply_for(&replies, "dry").is_none());
        assert!(quick_reply_for(&[], "1").is_none());
    }
}
