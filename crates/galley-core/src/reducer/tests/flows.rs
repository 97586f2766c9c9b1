use super::*;
use crate::flow::FlowRequest;
use crate::flow::FlowSpeaker;
use pretty_assertions::assert_eq;

fn flow_request(effects: &[GalleyEffect]) -> FlowRequest {
    effects
        .iter()
        .find_map(|effect| match effect {
            GalleyEffect::RunFlow(request) => Some(request.clone()),
            _ => None,
        })
        .expect("flow request")
}

fn start(state: &mut AppState, kind: FlowKind, brief: &str, interactive: bool) -> FlowRequest {
    let effects = run_user(
        state,
        UserAction::StartFlow {
            kind,
            brief: brief.to_string(),
            interactive,
        },
    );
    flow_request(&effects)
}

fn step(state: &mut AppState, kind: FlowKind, run_id: u64, phase: FlowPhase) -> Vec<GalleyEffect> {
    run_runtime(
        state,
        RuntimeAction::FlowStep {
            kind,
            run_id,
            phase,
            text: format!("{} step", phase.label()),
        },
    )
}

#[test]
fn start_flow_resets_the_run_and_requests_segment_zero() {
    let mut state = state();
    let request = start(&mut state, FlowKind::Cook, "  Add dark mode ", true);

    assert_eq!(request.kind, FlowKind::Cook);
    assert_eq!(request.segment, 0);
    assert_eq!(request.brief, "Add dark mode");
    assert!(request.interactive);

    let flow = state.flows.get(FlowKind::Cook);
    assert_eq!(flow.status, FlowStatus::Running);
    assert_eq!(flow.run_id, request.run_id);
    assert_eq!(flow.phase, FlowPhase::Questions);
    assert_eq!(flow.transcript.len(), 1);
}

#[test]
fn cook_without_a_brief_is_rejected() {
    let mut state = state();
    let effects = run_user(
        &mut state,
        UserAction::StartFlow {
            kind: FlowKind::Cook,
            brief: "   ".to_string(),
            interactive: false,
        },
    );
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, GalleyEffect::RunFlow(_))));
    assert_eq!(state.flows.get(FlowKind::Cook).status, FlowStatus::Idle);
    assert_eq!(error_toasts(&state), vec!["Describe the feature first"]);
}

#[test]
fn steps_from_a_previous_run_are_ignored() {
    let mut state = state();
    let first = start(&mut state, FlowKind::Fix, "crash on login", false);
    let second = start(&mut state, FlowKind::Fix, "crash on logout", false);
    assert!(second.run_id > first.run_id);

    let effects = step(&mut state, FlowKind::Fix, first.run_id, FlowPhase::Diagnose);
    assert!(effects.is_empty());
    assert_eq!(state.flows.get(FlowKind::Fix).phase, FlowPhase::Reproduce);

    step(&mut state, FlowKind::Fix, second.run_id, FlowPhase::Diagnose);
    assert_eq!(state.flows.get(FlowKind::Fix).phase, FlowPhase::Diagnose);
}

#[test]
fn restarting_a_live_flow_cancels_its_job_first() {
    let mut state = state();
    start(&mut state, FlowKind::Fix, "one", false);
    let effects = run_user(
        &mut state,
        UserAction::StartFlow {
            kind: FlowKind::Fix,
            brief: "two".to_string(),
            interactive: false,
        },
    );
    assert_eq!(
        effects.first(),
        Some(&GalleyEffect::CancelJob(JobKey::Flow(FlowKind::Fix)))
    );
}

#[test]
fn questions_pause_until_answered() {
    let mut state = state();
    let request = start(&mut state, FlowKind::Cook, "Billing export", true);

    run_runtime(
        &mut state,
        RuntimeAction::FlowQuestion {
            kind: FlowKind::Cook,
            run_id: request.run_id,
            prompt: "Who is this for?".to_string(),
        },
    );
    let flow = state.flows.get(FlowKind::Cook);
    assert_eq!(flow.status, FlowStatus::AwaitingAnswer);
    assert_eq!(flow.awaiting.as_deref(), Some("Who is this for?"));

    let effects = step(&mut state, FlowKind::Cook, request.run_id, FlowPhase::Research);
    assert!(effects.is_empty());

    let effects = run_user(
        &mut state,
        UserAction::AnswerFlow {
            kind: FlowKind::Cook,
            answer: "finance team".to_string(),
        },
    );
    let next = flow_request(&effects);
    assert_eq!(next.run_id, request.run_id);
    assert_eq!(next.segment, 1);
    assert_eq!(next.answers, vec!["finance team"]);
    assert_eq!(state.flows.get(FlowKind::Cook).status, FlowStatus::Running);
}

#[test]
fn answer_without_a_question_is_ignored() {
    let mut state = state();
    start(&mut state, FlowKind::Cook, "Billing export", true);
    let effects = run_user(
        &mut state,
        UserAction::AnswerFlow {
            kind: FlowKind::Cook,
            answer: "early".to_string(),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn finished_cook_drafts_a_plan() {
    let mut state = state();
    let request = start(&mut state, FlowKind::Cook, "Team invites", false);
    for phase in FlowKind::Cook.phases().iter().skip(1) {
        step(&mut state, FlowKind::Cook, request.run_id, *phase);
    }

    assert_eq!(state.flows.get(FlowKind::Cook).status, FlowStatus::Done);
    let plan = state.plans.last().expect("drafted plan");
    assert_eq!(plan.title, "Team invites");
    assert_eq!(plan.status, PlanStatus::Draft);
    assert_eq!(plan.phases.len(), 4);
    assert!(state
        .toasts
        .iter()
        .any(|toast| toast.level == ToastLevel::Success));

    let effects = step(&mut state, FlowKind::Cook, request.run_id, FlowPhase::Done);
    assert!(effects.is_empty());
    assert_eq!(state.plans.len(), 1);
}

#[test]
fn finished_interview_files_its_answers_as_an_idea() {
    let mut state = state();
    let request = start(&mut state, FlowKind::Interview, "", true);
    run_runtime(
        &mut state,
        RuntimeAction::FlowQuestion {
            kind: FlowKind::Interview,
            run_id: request.run_id,
            prompt: "What should it do?".to_string(),
        },
    );
    run_user(
        &mut state,
        UserAction::AnswerFlow {
            kind: FlowKind::Interview,
            answer: "Track invoices".to_string(),
        },
    );
    step(&mut state, FlowKind::Interview, request.run_id, FlowPhase::Summary);
    step(&mut state, FlowKind::Interview, request.run_id, FlowPhase::Done);

    let idea = state.brainstorms.last().expect("idea");
    assert_eq!(idea.title, "Interview notes");
    assert_eq!(idea.content, "- Track invoices");
    assert_eq!(idea.tags, vec!["interview"]);
}

#[test]
fn cancel_marks_the_flow_and_stops_the_job() {
    let mut state = state();
    let request = start(&mut state, FlowKind::Fix, "slow query", false);

    let effects = run_user(&mut state, UserAction::CancelFlow(FlowKind::Fix));
    assert!(has_effect(
        &effects,
        &GalleyEffect::CancelJob(JobKey::Flow(FlowKind::Fix))
    ));
    assert_eq!(state.flows.get(FlowKind::Fix).status, FlowStatus::Cancelled);

    assert!(step(&mut state, FlowKind::Fix, request.run_id, FlowPhase::Patch).is_empty());

    let effects = run_user(&mut state, UserAction::CancelFlow(FlowKind::Fix));
    assert_eq!(effects, vec![GalleyEffect::RequestFrame]);
}

#[test]
fn reset_returns_the_flow_to_idle() {
    let mut state = state();
    start(&mut state, FlowKind::Fix, "slow query", false);
    run_user(&mut state, UserAction::ResetFlow(FlowKind::Fix));

    let flow = state.flows.get(FlowKind::Fix);
    assert_eq!(flow.status, FlowStatus::Idle);
    assert!(flow.transcript.is_empty());
    assert_eq!(flow.run_id, 0);
}

#[test]
fn leaving_the_hosting_screen_cancels_its_flow() {
    let mut state = state();
    run_user(&mut state, UserAction::SetActiveTab(Tab::Wizard));
    start(&mut state, FlowKind::Cook, "Search", true);
    start(&mut state, FlowKind::Fix, "Crash", false);

    let effects = run_user(&mut state, UserAction::SetActiveTab(Tab::Chat));
    assert!(has_effect(
        &effects,
        &GalleyEffect::CancelJob(JobKey::Flow(FlowKind::Cook))
    ));
    assert_eq!(state.flows.get(FlowKind::Cook).status, FlowStatus::Cancelled);
    // the fix flow was never on screen, so it keeps running
    assert_eq!(state.flows.get(FlowKind::Fix).status, FlowStatus::Running);
}

#[test]
fn reselecting_the_same_screen_keeps_the_flow() {
    let mut state = state();
    run_user(&mut state, UserAction::SetActiveTab(Tab::Wizard));
    start(&mut state, FlowKind::Cook, "Search", true);

    let effects = run_user(&mut state, UserAction::SetActiveTab(Tab::Wizard));
    assert_eq!(effects, vec![GalleyEffect::RequestFrame]);
    assert_eq!(state.flows.get(FlowKind::Cook).status, FlowStatus::Running);
}

#[test]
fn quick_cook_validates_then_starts_a_non_interactive_cook() {
    let mut state = state();
    run_user(&mut state, UserAction::OpenQuickCook);
    run_user(&mut state, UserAction::OverlayQueryPaste("  ".to_string()));
    run_user(&mut state, UserAction::OverlaySubmit);
    assert_eq!(
        state.interaction.overlay,
        Overlay::QuickCook {
            input: "  ".to_string(),
            error: Some("Describe the feature first".to_string()),
        }
    );

    run_user(&mut state, UserAction::OverlayQueryBackspace);
    assert!(matches!(
        state.interaction.overlay,
        Overlay::QuickCook { error: None, .. }
    ));

    run_user(&mut state, UserAction::OverlayQueryPaste("CSV export".to_string()));
    let effects = run_user(&mut state, UserAction::OverlaySubmit);
    let request = flow_request(&effects);
    assert_eq!(state.interaction.overlay, Overlay::None);
    assert_eq!(state.nav.tab, Tab::Wizard);
    assert_eq!(request.kind, FlowKind::Cook);
    assert!(!request.interactive);
    assert_eq!(request.brief, "CSV export");
}

#[test]
fn simple_mode_interview_screen_hosts_quick_cook_runs() {
    let mut state = state();
    run_user(&mut state, UserAction::SetUserMode(UserMode::Simple));
    run_user(&mut state, UserAction::OpenQuickCook);
    run_user(&mut state, UserAction::OverlayQueryPaste("CSV export".to_string()));
    run_user(&mut state, UserAction::OverlaySubmit);
    assert_eq!(state.screen(), Screen::Interview);

    let effects = run_user(&mut state, UserAction::SetActiveTab(Tab::Plans));
    assert!(has_effect(
        &effects,
        &GalleyEffect::CancelJob(JobKey::Flow(FlowKind::Cook))
    ));
}

#[test]
fn wizard_composer_starts_then_answers() {
    let mut state = state();
    run_user(&mut state, UserAction::SetActiveTab(Tab::Wizard));
    run_user(&mut state, UserAction::ComposerPaste("Audit log".to_string()));
    let effects = run_user(&mut state, UserAction::ComposerSubmit);
    let request = flow_request(&effects);
    assert!(request.interactive);

    run_runtime(
        &mut state,
        RuntimeAction::FlowQuestion {
            kind: FlowKind::Cook,
            run_id: request.run_id,
            prompt: "Retention?".to_string(),
        },
    );
    run_user(&mut state, UserAction::ComposerPaste("90 days".to_string()));
    let effects = run_user(&mut state, UserAction::ComposerSubmit);
    assert_eq!(flow_request(&effects).answers, vec!["90 days"]);
}

#[test]
fn empty_or_skip_composer_input_skips_the_pending_question() {
    let mut state = state();
    run_user(&mut state, UserAction::SetActiveTab(Tab::Wizard));
    run_user(&mut state, UserAction::ComposerPaste("Audit log".to_string()));
    let request = flow_request(&run_user(&mut state, UserAction::ComposerSubmit));
    let ask = |state: &mut AppState| {
        run_runtime(
            state,
            RuntimeAction::FlowQuestion {
                kind: FlowKind::Cook,
                run_id: request.run_id,
                prompt: "Retention?".to_string(),
            },
        );
    };

    ask(&mut state);
    let effects = run_user(&mut state, UserAction::ComposerSubmit);
    assert_eq!(flow_request(&effects).answers, vec![String::new()]);
    assert_eq!(state.flows.get(FlowKind::Cook).status, FlowStatus::Running);

    ask(&mut state);
    run_user(&mut state, UserAction::ComposerPaste(" Skip ".to_string()));
    let effects = run_user(&mut state, UserAction::ComposerSubmit);
    assert_eq!(
        flow_request(&effects).answers,
        vec![String::new(), String::new()]
    );
    let skipped = state
        .flows
        .get(FlowKind::Cook)
        .transcript
        .iter()
        .filter(|entry| entry.speaker == FlowSpeaker::User && entry.text == "(skipped)")
        .count();
    assert_eq!(skipped, 2);
}

#[test]
fn empty_composer_input_without_a_question_does_nothing() {
    let mut state = state();
    run_user(&mut state, UserAction::SetActiveTab(Tab::Wizard));
    assert!(run_user(&mut state, UserAction::ComposerSubmit).is_empty());
}
