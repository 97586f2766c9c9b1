//! Canned content for every simulated job.
//!
//! A flow is played one segment at a time: each segment ends either with a
//! question (the reducer parks the flow until it is answered) or with the
//! `Done` phase.

use galley_core::flow::is_skip_answer;
use galley_core::flow::FlowKind;
use galley_core::flow::FlowPhase;
use galley_core::flow::FlowRequest;
use galley_core::model::Provider;
use galley_core::model::SessionId;
use galley_core::ChatRequest;
use galley_core::RuntimeAction;

use crate::contracts::ScriptStep;
use crate::contracts::SimTiming;

/// Percentage points a session advances per tick.
pub const SESSION_STEP: u8 = 10;

const COOK_QUESTIONS: &[&str] = &[
    "Who is this for, and what do they do today instead?",
    "Anything it should explicitly not do?",
];

const INTERVIEW_QUESTIONS: &[&str] = &[
    "What problem are you trying to solve?",
    "Who feels it most?",
    "What would success look like in a month?",
];

const SESSION_LINES: &[&str] = &[
    "Reading project files",
    "Mapping call sites",
    "Drafting changes",
    "Running the test suite",
    "Tightening error handling",
    "Summarizing the diff",
];

pub fn flow_script(request: &FlowRequest, timing: &SimTiming) -> Vec<ScriptStep> {
    match request.kind {
        FlowKind::Cook => {
            let questions: &[&str] = if request.interactive {
                COOK_QUESTIONS
            } else {
                &[]
            };
            questioned_segment(request, timing, questions, cook_intro, cook_body)
        }
        FlowKind::Interview => questioned_segment(
            request,
            timing,
            INTERVIEW_QUESTIONS,
            interview_intro,
            interview_body,
        ),
        FlowKind::Fix => fix_body(request)
            .into_iter()
            .map(|(phase, text)| step(request, timing, phase, text))
            .collect(),
    }
}

fn questioned_segment(
    request: &FlowRequest,
    timing: &SimTiming,
    questions: &[&str],
    intro: fn(&FlowRequest, bool) -> String,
    body: fn(&FlowRequest) -> Vec<(FlowPhase, String)>,
) -> Vec<ScriptStep> {
    let mut lines = Vec::new();
    if request.segment == 0 {
        lines.push((FlowPhase::Questions, intro(request, !questions.is_empty())));
    } else if let Some(answer) = request.answers.last() {
        lines.push((FlowPhase::Questions, acknowledge(answer)));
    }

    let mut steps: Vec<ScriptStep> = lines
        .into_iter()
        .map(|(phase, text)| step(request, timing, phase, text))
        .collect();

    match questions.get(request.segment) {
        Some(prompt) => steps.push(ScriptStep::after(
            timing.step_delay,
            RuntimeAction::FlowQuestion {
                kind: request.kind,
                run_id: request.run_id,
                prompt: (*prompt).to_string(),
            },
        )),
        None => steps.extend(
            body(request)
                .into_iter()
                .map(|(phase, text)| step(request, timing, phase, text)),
        ),
    }
    steps
}

fn step(request: &FlowRequest, timing: &SimTiming, phase: FlowPhase, text: String) -> ScriptStep {
    ScriptStep::after(
        timing.step_delay,
        RuntimeAction::FlowStep {
            kind: request.kind,
            run_id: request.run_id,
            phase,
            text,
        },
    )
}

fn acknowledge(answer: &str) -> String {
    if is_skip_answer(answer) {
        "No answer, moving on.".to_string()
    } else {
        format!("Noted: {answer}")
    }
}

fn cook_intro(request: &FlowRequest, asking: bool) -> String {
    if asking {
        format!("Let's cook \"{}\". A couple of questions first.", request.brief)
    } else {
        format!("Cooking \"{}\" straight from the brief.", request.brief)
    }
}

fn cook_body(request: &FlowRequest) -> Vec<(FlowPhase, String)> {
    let answered = request
        .answers
        .iter()
        .filter(|answer| !is_skip_answer(answer))
        .count();
    vec![
        (
            FlowPhase::Research,
            format!("Scanned the workspace with {answered} answer(s) as context"),
        ),
        (
            FlowPhase::Planning,
            "Split the work into research, implementation, tests and review".to_string(),
        ),
        (FlowPhase::Building, "Sketched the first implementation pass".to_string()),
        (FlowPhase::Testing, "Outlined the acceptance checks".to_string()),
        (FlowPhase::Review, "Reviewed the plan for gaps".to_string()),
        (
            FlowPhase::Done,
            format!("Draft plan for \"{}\" is on the board", request.brief),
        ),
    ]
}

fn interview_intro(request: &FlowRequest, _asking: bool) -> String {
    if request.brief.is_empty() {
        "Let's shape an idea together.".to_string()
    } else {
        format!("Let's shape \"{}\" together.", request.brief)
    }
}

fn interview_body(request: &FlowRequest) -> Vec<(FlowPhase, String)> {
    vec![
        (
            FlowPhase::Summary,
            format!(
                "Summarized {} answer(s)",
                request
                    .answers
                    .iter()
                    .filter(|answer| !is_skip_answer(answer))
                    .count()
            ),
        ),
        (FlowPhase::Done, "Notes saved to Brainstorm".to_string()),
    ]
}

fn fix_body(request: &FlowRequest) -> Vec<(FlowPhase, String)> {
    vec![
        (FlowPhase::Reproduce, format!("Reproducing: {}", request.brief)),
        (
            FlowPhase::Diagnose,
            "Traced the failure to a missing guard".to_string(),
        ),
        (FlowPhase::Patch, "Applied a minimal patch".to_string()),
        (FlowPhase::Verify, "Re-ran the failing case, it passes".to_string()),
        (FlowPhase::Done, "Fix verified".to_string()),
    ]
}

pub fn chat_script(request: &ChatRequest, timing: &SimTiming) -> Vec<ScriptStep> {
    vec![ScriptStep::after(
        timing.chat_delay,
        RuntimeAction::ChatReply {
            run_id: request.run_id,
            content: chat_reply(request),
        },
    )]
}

fn chat_reply(request: &ChatRequest) -> String {
    let mut reply = format!("{} here.", request.provider.label());
    if !request.files.is_empty() {
        reply.push_str(&format!(" I read {}.", request.files.join(", ")));
    }
    let topic: String = request.prompt.chars().take(60).collect();
    reply.push_str(&format!(
        " A first pass at \"{topic}\":\n\n```rust\nfn main() {{\n    println!(\"hello from galley\");\n}}\n```\n\nWant me to turn this into a plan?"
    ));
    reply
}

/// Ticks that carry a session from its current progress to 100.
pub fn session_script(
    session: &SessionId,
    provider: Provider,
    remaining: u8,
    timing: &SimTiming,
) -> Vec<ScriptStep> {
    let mut steps = Vec::new();
    let mut left = remaining.min(100);
    let mut index = 0usize;
    while left > 0 {
        let advance = left.min(SESSION_STEP);
        left -= advance;
        steps.push(ScriptStep::after(
            timing.session_tick,
            RuntimeAction::SessionTick {
                session: session.clone(),
                tokens: tick_tokens(provider, index),
                advance,
                line: SESSION_LINES[index % SESSION_LINES.len()].to_string(),
            },
        ));
        index += 1;
    }
    steps
}

fn tick_tokens(provider: Provider, index: usize) -> u64 {
    let base = match provider {
        Provider::Claude => 1_200,
        Provider::Codex => 1_000,
        Provider::Gemini => 1_400,
        Provider::Copilot => 800,
        Provider::Local => 600,
    };
    base + (index as u64 % 4) * 150
}
