use super::*;
use crate::model::SessionId;
use crate::model::SessionPatch;
use pretty_assertions::assert_eq;

fn new_session(state: &mut AppState, provider: Provider) -> SessionId {
    run_user(state, UserAction::AddSession(provider));
    state.sessions.last().expect("session").id.clone()
}

fn tick(state: &mut AppState, id: &SessionId, advance: u8) -> Vec<GalleyEffect> {
    run_runtime(
        state,
        RuntimeAction::SessionTick {
            session: id.clone(),
            tokens: 2_000,
            advance,
            line: "working".to_string(),
        },
    )
}

#[test]
fn add_session_starts_idle_and_empty() {
    let mut state = state();
    let id = new_session(&mut state, Provider::Gemini);
    let session = state.session(&id).expect("session");
    assert_eq!(session.status, SessionStatus::Idle);
    assert_eq!(session.provider, Provider::Gemini);
    assert_eq!(session.tokens, 0);
    assert_eq!(session.progress, 0);
}

#[test]
fn update_session_merges_and_ignores_unknown_ids() {
    let mut state = state();
    let id = new_session(&mut state, Provider::Codex);
    run_user(
        &mut state,
        UserAction::UpdateSession {
            id: id.clone(),
            patch: SessionPatch {
                status: Some(SessionStatus::Paused),
                tokens: Some(10),
                ..SessionPatch::default()
            },
        },
    );
    let session = state.session(&id).expect("session");
    assert_eq!(session.status, SessionStatus::Paused);
    assert_eq!(session.tokens, 10);

    let effects = run_user(
        &mut state,
        UserAction::UpdateSession {
            id: SessionId::new("sess-404"),
            patch: SessionPatch::default(),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn running_session_accumulates_until_completed() {
    let mut state = state();
    let id = new_session(&mut state, Provider::Claude);

    let effects = run_user(&mut state, UserAction::StartSession(id.clone()));
    assert!(has_effect(
        &effects,
        &GalleyEffect::RunSessionTicks {
            session: id.clone(),
            provider: Provider::Claude,
            remaining: 100,
        }
    ));

    tick(&mut state, &id, 60);
    let session = state.session(&id).expect("session");
    assert_eq!(session.status, SessionStatus::Running);
    assert_eq!(session.tokens, 2_000);
    assert!((session.cost_usd - 0.03).abs() < 1e-9);

    let effects = tick(&mut state, &id, 60);
    let session = state.session(&id).expect("session");
    assert_eq!(session.progress, 100);
    assert_eq!(session.status, SessionStatus::Completed);
    assert!(has_effect(
        &effects,
        &GalleyEffect::CancelJob(JobKey::Session(id.clone()))
    ));

    assert!(tick(&mut state, &id, 10).is_empty());
}

#[test]
fn pause_cancels_and_resume_continues_from_progress() {
    let mut state = state();
    let id = new_session(&mut state, Provider::Local);
    run_user(&mut state, UserAction::StartSession(id.clone()));
    tick(&mut state, &id, 30);

    let effects = run_user(&mut state, UserAction::PauseSession(id.clone()));
    assert!(has_effect(
        &effects,
        &GalleyEffect::CancelJob(JobKey::Session(id.clone()))
    ));
    assert!(tick(&mut state, &id, 30).is_empty());

    let effects = run_user(&mut state, UserAction::ResumeSession(id.clone()));
    assert!(has_effect(
        &effects,
        &GalleyEffect::RunSessionTicks {
            session: id.clone(),
            provider: Provider::Local,
            remaining: 70,
        }
    ));
    assert_eq!(
        state.session(&id).map(|session| session.cost_usd),
        Some(0.0)
    );
}

#[test]
fn starting_a_finished_idle_session_runs_the_whole_script() {
    let mut state = state();
    let id = new_session(&mut state, Provider::Codex);
    run_user(
        &mut state,
        UserAction::UpdateSession {
            id: id.clone(),
            patch: SessionPatch {
                progress: Some(100),
                ..SessionPatch::default()
            },
        },
    );

    let effects = run_user(&mut state, UserAction::StartSession(id.clone()));
    assert!(has_effect(
        &effects,
        &GalleyEffect::RunSessionTicks {
            session: id.clone(),
            provider: Provider::Codex,
            remaining: 100,
        }
    ));
    assert_eq!(state.session(&id).map(|session| session.progress), Some(0));

    tick(&mut state, &id, 100);
    assert_eq!(
        state.session(&id).map(|session| session.status),
        Some(SessionStatus::Completed)
    );
}

#[test]
fn resume_only_applies_to_paused_sessions() {
    let mut state = state();
    let id = new_session(&mut state, Provider::Claude);
    assert!(run_user(&mut state, UserAction::ResumeSession(id.clone())).is_empty());
    assert!(run_user(&mut state, UserAction::PauseSession(id.clone())).is_empty());
    assert!(run_user(&mut state, UserAction::StopSession(id)).is_empty());
}

#[test]
fn stop_returns_to_idle() {
    let mut state = state();
    let id = new_session(&mut state, Provider::Copilot);
    run_user(&mut state, UserAction::StartSession(id.clone()));
    run_user(&mut state, UserAction::StopSession(id.clone()));

    let session = state.session(&id).expect("session");
    assert_eq!(session.status, SessionStatus::Idle);
    assert_eq!(session.output.last().map(String::as_str), Some("Stopped"));
}

#[test]
fn output_keeps_only_the_most_recent_lines() {
    let mut state = state();
    let id = new_session(&mut state, Provider::Claude);
    run_user(&mut state, UserAction::StartSession(id.clone()));
    for _ in 0..(crate::reducer::SESSION_OUTPUT_LINES + 10) {
        tick(&mut state, &id, 0);
    }
    assert_eq!(
        state.session(&id).map(|session| session.output.len()),
        Some(crate::reducer::SESSION_OUTPUT_LINES)
    );
}

#[test]
fn sessions_screen_toggles_the_session_under_the_cursor() {
    let mut state = state();
    let id = new_session(&mut state, Provider::Claude);
    run_user(&mut state, UserAction::SetActiveTab(Tab::Sessions));

    run_user(&mut state, UserAction::ActivateSelection);
    assert_eq!(
        state.session(&id).map(|session| session.status),
        Some(SessionStatus::Running)
    );
    run_user(&mut state, UserAction::ActivateSelection);
    assert_eq!(
        state.session(&id).map(|session| session.status),
        Some(SessionStatus::Paused)
    );
}

#[test]
fn seeded_totals_sum_every_session() {
    let state = seeded();
    let tokens: u64 = state.sessions.iter().map(|session| session.tokens).sum();
    assert_eq!(state.total_tokens(), tokens);
    assert!(state.total_cost_usd() > 0.0);
}
