use super::*;
use pretty_assertions::assert_eq;

fn detail() -> AppState {
    let mut state = state();
    state.plans = vec![plan(
        "p",
        PlanStatus::InProgress,
        vec![PhaseStatus::Done, PhaseStatus::Pending],
    )];
    run_user(&mut state, UserAction::SetActiveTab(Tab::Plans));
    run_user(&mut state, UserAction::SetSelectedPlan(Some(PlanId::new("p"))));
    state
}

fn stored(state: &AppState) -> &Plan {
    state.plan(&PlanId::new("p")).expect("plan")
}

#[test]
fn toggles_do_not_touch_the_store_until_saved() {
    let mut state = detail();
    run_user(&mut state, UserAction::TogglePhase(1));
    run_user(&mut state, UserAction::TogglePhase(1));
    run_user(&mut state, UserAction::ToggleCriterion(0));

    assert_eq!(stored(&state).phases[1].status, PhaseStatus::Pending);
    assert!(!stored(&state).success_criteria[0].met);
    assert!(state.plan_draft.as_ref().map_or(false, |draft| draft.dirty));

    run_user(&mut state, UserAction::SavePlanDraft);
    let plan = stored(&state);
    assert_eq!(plan.phases[1].status, PhaseStatus::Done);
    assert!(plan.success_criteria[0].met);
    assert_eq!(plan.progress, 100);
    assert_eq!(plan.revision, 1);

    let draft = state.plan_draft.as_ref().expect("reopened draft");
    assert_eq!(draft.base_revision, 1);
    assert!(!draft.dirty);
}

#[test]
fn stale_draft_is_rejected_with_an_error_toast() {
    let mut state = detail();
    run_user(&mut state, UserAction::TogglePhase(1));
    state.plans[0].revision += 1;
    let before = stored(&state).clone();

    run_user(&mut state, UserAction::SavePlanDraft);
    assert_eq!(stored(&state), &before);
    assert_eq!(error_toasts(&state).len(), 1);
    assert!(error_toasts(&state)[0].contains("changed since the draft was opened"));
}

#[test]
fn empty_criterion_blocks_the_save() {
    let mut state = detail();
    run_user(&mut state, UserAction::AddCriterion("  ".to_string()));
    run_user(&mut state, UserAction::SavePlanDraft);

    assert_eq!(stored(&state).success_criteria.len(), 1);
    assert_eq!(error_toasts(&state), vec!["success criterion 1 is empty"]);
}

#[test]
fn two_active_phases_block_the_save() {
    let mut state = detail();
    // Done -> Pending -> Active
    run_user(&mut state, UserAction::TogglePhase(0));
    run_user(&mut state, UserAction::TogglePhase(0));
    // Pending -> Active
    run_user(&mut state, UserAction::TogglePhase(1));
    run_user(&mut state, UserAction::SavePlanDraft);

    assert_eq!(stored(&state).phases[0].status, PhaseStatus::Done);
    assert_eq!(
        error_toasts(&state),
        vec!["only one phase can be active at a time (2 are)"]
    );
}

#[test]
fn save_after_the_plan_disappears_reports_it() {
    let mut state = detail();
    state.plans.clear();
    run_user(&mut state, UserAction::SavePlanDraft);
    assert_eq!(error_toasts(&state), vec!["plan p no longer exists"]);
}

#[test]
fn discard_restores_the_stored_plan() {
    let mut state = detail();
    run_user(&mut state, UserAction::TogglePhase(1));
    run_user(&mut state, UserAction::AddCriterion("Docs updated".to_string()));
    run_user(&mut state, UserAction::DiscardPlanDraft);

    let draft = state.plan_draft.as_ref().expect("draft");
    assert_eq!(draft.phases, stored(&state).phases);
    assert_eq!(draft.criteria, stored(&state).success_criteria);
    assert!(!draft.dirty);
}

#[test]
fn detail_cursor_toggles_the_row_under_it() {
    let mut state = detail();
    run_user(&mut state, UserAction::MoveSelection(-1));
    run_user(&mut state, UserAction::ActivateSelection);
    let draft = state.plan_draft.as_ref().expect("draft");
    assert!(draft.criteria[0].met);
}

#[test]
fn composer_on_detail_adds_a_criterion() {
    let mut state = detail();
    run_user(&mut state, UserAction::ComposerPaste("Docs updated".to_string()));
    run_user(&mut state, UserAction::ComposerSubmit);
    run_user(&mut state, UserAction::SavePlanDraft);

    let texts: Vec<&str> = stored(&state)
        .success_criteria
        .iter()
        .map(|criterion| criterion.text.as_str())
        .collect();
    assert_eq!(texts, vec!["Ships", "Docs updated"]);
}

#[test]
fn open_selected_file_uses_the_phase_under_the_cursor() {
    let mut state = detail();
    let effects = run_user(&mut state, UserAction::OpenSelectedFile);
    assert!(has_effect(
        &effects,
        &GalleyEffect::OpenInIde {
            file: "src/p_0.rs".to_string(),
        }
    ));

    run_user(&mut state, UserAction::MoveSelection(2));
    run_user(&mut state, UserAction::OpenSelectedFile);
    assert_eq!(
        state.toasts.back().map(|toast| toast.text.as_str()),
        Some("No file to open here")
    );
}
