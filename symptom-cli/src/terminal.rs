use std::io::Write;
use symptom_flow::{
    Author, ChatTurn, ChatUpdate, CommitOutcome, InputControl, ResultPanel, StepView,
};

const BAR_WIDTH: usize = 30;

pub fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}

pub fn print_chat_banner() {
    println!("Describe your symptoms. Type a number to pick a suggested reply.");
    println!("Commands: /state shows what the assistant has recorded, /quit leaves.");
}

pub fn print_turn(turn: &ChatTurn) {
    let who = match turn.author {
        Author::User => "you",
        Author::Bot => "assistant",
    };
    println!("{}: {}", who, turn.text);
    if let Some(note) = &turn.note {
        println!("    ({})", note);
    }
}

pub fn print_update(update: &ChatUpdate) {
    for turn in &update.turns {
        print_turn(turn);
    }
    for (i, reply) in update.quick_replies.iter().enumerate() {
        println!("  [{}] {}", i + 1, reply.label);
    }
}

pub fn progress_bar(percent: u32) -> String {
    let filled = (percent.min(100) as usize * BAR_WIDTH) / 100;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percent
    )
}

pub fn print_control(control: &InputControl) {
    match control {
        InputControl::Radio { options, .. } => {
            for (i, option) in options.iter().enumerate() {
                let mark = if option.checked { "x" } else { " " };
                println!("  ({}) [{}] {}", i + 1, mark, option.label);
            }
        }
        InputControl::Number { min, max, value, .. } => {
            let shown = if value.is_empty() { "-" } else { value.as_str() };
            println!("  number between {} and {}: {}", min, max, shown);
        }
        InputControl::Slider { min, max, value, .. } => {
            println!("  scale {}..{}: {}", min, max, value);
        }
    }
}

/// Message for an answer that was not saved when leaving a step.
pub fn commit_notice(outcome: &CommitOutcome) -> Option<String> {
    match outcome {
        CommitOutcome::Rejected(reason) => Some(format!(
            "{}, so it was not saved. Go back with 'p' to correct it.",
            reason
        )),
        CommitOutcome::Committed(_) | CommitOutcome::Unchanged => None,
    }
}

pub fn print_step(view: &StepView) {
    println!();
    println!("{}", progress_bar(view.progress));
    println!("{}", view.question);
    print_control(&view.control);
    println!("{}", view.label);

    let mut actions = Vec::new();
    if view.buttons.prev {
        actions.push("p = previous");
    }
    if view.buttons.next {
        actions.push("n = next");
    }
    if view.buttons.finish {
        actions.push("f = finish");
    }
    actions.push("q = quit");
    println!("{}", actions.join(", "));
}

pub fn print_result(panel: &ResultPanel) {
    println!();
    println!("== {} ==", panel.heading());
    match panel {
        ResultPanel::NoClearResult { advice, facts } => {
            println!("{}", advice);
            println!("Facts: {}", facts);
        }
        ResultPanel::Ranked {
            rows,
            advice,
            explanations,
            facts,
        } => {
            for row in rows {
                println!("  {:<45} {}", row.condition, row.probability_label());
            }
            println!();
            println!("{}", advice);
            for explanation in explanations {
                println!("  - {}", explanation);
            }
            if !facts.is_empty() {
                println!("Facts: {}", facts.join(" | "));
            }
        }
    }
}
