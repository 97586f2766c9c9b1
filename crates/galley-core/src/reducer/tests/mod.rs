use chrono::Utc;

pub(super) use super::reduce;
pub(super) use super::GalleyEffect;
pub(super) use super::JobKey;
pub(super) use crate::actions::filtered_palette_indices;
pub(super) use crate::actions::AppAction;
pub(super) use crate::actions::RuntimeAction;
pub(super) use crate::actions::UserAction;
pub(super) use crate::actions::PALETTE_ITEMS;
pub(super) use crate::flow::FlowKind;
pub(super) use crate::flow::FlowPhase;
pub(super) use crate::flow::FlowStatus;
pub(super) use crate::model::Criterion;
pub(super) use crate::model::NewBrainstormReport;
pub(super) use crate::model::NewMessage;
pub(super) use crate::model::Phase;
pub(super) use crate::model::PhaseId;
pub(super) use crate::model::PhaseStatus;
pub(super) use crate::model::Plan;
pub(super) use crate::model::PlanId;
pub(super) use crate::model::PlanStatus;
pub(super) use crate::model::Priority;
pub(super) use crate::model::Provider;
pub(super) use crate::model::ReportId;
pub(super) use crate::model::ReportStatus;
pub(super) use crate::model::Role;
pub(super) use crate::model::SessionStatus;
pub(super) use crate::router::Screen;
pub(super) use crate::router::Tab;
pub(super) use crate::router::UserMode;
pub(super) use crate::state::AppState;
pub(super) use crate::state::Overlay;
pub(super) use crate::state::StoreOptions;
pub(super) use crate::state::ToastLevel;

mod drafts;
mod flows;
mod palette;
mod sessions;
mod toasts;

fn state() -> AppState {
    AppState::new(StoreOptions {
        seed: false,
        ..StoreOptions::default()
    })
}

fn seeded() -> AppState {
    AppState::new(StoreOptions::default())
}

fn run_user(state: &mut AppState, action: UserAction) -> Vec<GalleyEffect> {
    reduce(state, AppAction::User(action))
}

fn run_runtime(state: &mut AppState, action: RuntimeAction) -> Vec<GalleyEffect> {
    reduce(state, AppAction::Runtime(action))
}

fn plan(id: &str, status: PlanStatus, phases: Vec<PhaseStatus>) -> Plan {
    Plan {
        id: PlanId::new(id),
        title: format!("Plan {id}"),
        status,
        priority: Priority::P2,
        progress: 0,
        phases: phases
            .into_iter()
            .enumerate()
            .map(|(idx, status)| Phase {
                id: PhaseId::new(format!("{id}-ph-{idx}")),
                name: format!("Phase {idx}"),
                status,
                file: Some(format!("src/{id}_{idx}.rs")),
            })
            .collect(),
        dependencies: Vec::new(),
        success_criteria: vec![Criterion {
            text: "Ships".to_string(),
            met: false,
        }],
        revision: 0,
        created_at: Utc::now(),
    }
}

fn report(title: &str) -> NewBrainstormReport {
    NewBrainstormReport {
        title: title.to_string(),
        content: format!("{title} details"),
        status: ReportStatus::New,
        tags: Vec::new(),
        annotations: Vec::new(),
    }
}

fn has_effect(effects: &[GalleyEffect], wanted: &GalleyEffect) -> bool {
    effects.iter().any(|effect| effect == wanted)
}

fn error_toasts(state: &AppState) -> Vec<String> {
    state
        .toasts
        .iter()
        .filter(|toast| toast.level == ToastLevel::Error)
        .map(|toast| toast.text.clone())
        .collect()
}
