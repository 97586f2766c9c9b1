use std::sync::OnceLock;

use chrono::Utc;
use regex::Regex;

use crate::actions::filtered_palette_indices;
use crate::actions::AppAction;
use crate::actions::PaletteCommand;
use crate::actions::RuntimeAction;
use crate::actions::SettingsRow;
use crate::actions::UserAction;
use crate::actions::PALETTE_ITEMS;
use crate::draft::commit_draft;
use crate::draft::PlanDraft;
use crate::error::DraftError;
use crate::export::export_plan_yaml;
use crate::flow::is_skip_answer;
use crate::flow::FlowEntry;
use crate::flow::FlowKind;
use crate::flow::FlowPhase;
use crate::flow::FlowRequest;
use crate::flow::FlowSpeaker;
use crate::flow::FlowState;
use crate::flow::FlowStatus;
use crate::kanban::clamp_cursor;
use crate::kanban::column_plans;
use crate::kanban::cursor_for;
use crate::kanban::plan_at;
use crate::kanban::BoardCursor;
use crate::kanban::DragState;
use crate::kanban::COLUMN_COUNT;
use crate::model::ActivityKind;
use crate::model::Annotation;
use crate::model::AnnotationId;
use crate::model::BrainstormReport;
use crate::model::Criterion;
use crate::model::Message;
use crate::model::MessageId;
use crate::model::NewBrainstormReport;
use crate::model::NewMessage;
use crate::model::Phase;
use crate::model::PhaseId;
use crate::model::PhaseStatus;
use crate::model::Plan;
use crate::model::PlanId;
use crate::model::PlanStatus;
use crate::model::Priority;
use crate::model::ProjectId;
use crate::model::Provider;
use crate::model::ReportId;
use crate::model::ReportStatus;
use crate::model::Role;
use crate::model::Session;
use crate::model::SessionId;
use crate::model::SessionStatus;
use crate::model::ToolCall;
use crate::model::ToolCallStatus;
use crate::router::Screen;
use crate::router::Tab;
use crate::router::UserMode;
use crate::state::now_ms;
use crate::state::AppState;
use crate::state::Focus;
use crate::state::Navigation;
use crate::state::Overlay;
use crate::state::PendingReply;
use crate::state::ToastLevel;
use crate::state::ONBOARDING_STEPS;

pub const SESSION_OUTPUT_LINES: usize = 50;
const PLAN_TITLE_CHARS: usize = 48;

/// Identifies one simulation job; at most one job per key runs at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobKey {
    Flow(FlowKind),
    Chat,
    Session(SessionId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub run_id: u64,
    pub prompt: String,
    pub provider: Provider,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleyEffect {
    RequestFrame,
    RunFlow(FlowRequest),
    RunChatReply(ChatRequest),
    RunSessionTicks {
        session: SessionId,
        provider: Provider,
        remaining: u8,
    },
    CancelJob(JobKey),
    PersistOnboarding(bool),
    CopyToClipboard(String),
    OpenInIde {
        file: String,
    },
    Quit,
}

pub fn reduce(state: &mut AppState, action: AppAction) -> Vec<GalleyEffect> {
    match action {
        AppAction::User(user) => reduce_user(state, user),
        AppAction::Runtime(runtime) => reduce_runtime(state, runtime),
    }
}

fn reduce_user(state: &mut AppState, action: UserAction) -> Vec<GalleyEffect> {
    match action {
        UserAction::SetActiveTab(tab) => set_active_tab(state, tab),
        UserAction::NextTab => {
            let tab = state.next_tab();
            set_active_tab(state, tab)
        }
        UserAction::PrevTab => {
            let tab = state.prev_tab();
            set_active_tab(state, tab)
        }
        UserAction::SetSelectedPlan(plan) => set_selected_plan(state, plan),
        UserAction::SetUserMode(mode) => set_user_mode(state, mode),
        UserAction::ToggleUserMode => {
            let mode = state.nav.mode.toggle();
            set_user_mode(state, mode)
        }
        UserAction::SetActiveProject(id) => set_active_project(state, &id),
        UserAction::MoveSelection(delta) => move_selection(state, delta),
        UserAction::ActivateSelection => activate_selection(state),

        UserAction::ToggleCommandPalette => {
            state.interaction.overlay = match state.interaction.overlay {
                Overlay::CommandPalette { .. } => Overlay::None,
                _ => Overlay::CommandPalette {
                    selected: 0,
                    query: String::new(),
                },
            };
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::ShowHelp => {
            state.interaction.overlay = match state.interaction.overlay {
                Overlay::Help => Overlay::None,
                _ => Overlay::Help,
            };
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::OpenQuickCook => {
            state.interaction.overlay = Overlay::QuickCook {
                input: String::new(),
                error: None,
            };
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::CloseOverlay => {
            if matches!(state.interaction.overlay, Overlay::Onboarding { .. }) {
                return complete_onboarding(state);
            }
            state.interaction.overlay = Overlay::None;
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::OverlayMoveUp => {
            if let Overlay::CommandPalette { selected, query } = &mut state.interaction.overlay {
                let filtered = filtered_palette_indices(query);
                if !filtered.is_empty() {
                    if *selected == 0 {
                        *selected = filtered.len().saturating_sub(1);
                    } else {
                        *selected -= 1;
                    }
                }
                return vec![GalleyEffect::RequestFrame];
            }
            Vec::new()
        }
        UserAction::OverlayMoveDown => {
            if let Overlay::CommandPalette { selected, query } = &mut state.interaction.overlay {
                let filtered = filtered_palette_indices(query);
                if !filtered.is_empty() {
                    *selected = (*selected + 1) % filtered.len();
                }
                return vec![GalleyEffect::RequestFrame];
            }
            Vec::new()
        }
        UserAction::OverlayQueryInput(ch) => edit_overlay_text(state, |text| text.push(ch)),
        UserAction::OverlayQueryBackspace => edit_overlay_text(state, |text| {
            text.pop();
        }),
        UserAction::OverlayQueryPaste(pasted) => {
            edit_overlay_text(state, |text| text.push_str(&pasted))
        }
        UserAction::OverlaySubmit => submit_overlay(state),

        UserAction::ShowOnboarding => {
            state.interaction.overlay = Overlay::Onboarding { step: 0 };
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::NextOnboardingStep => {
            let Overlay::Onboarding { step } = &mut state.interaction.overlay else {
                return Vec::new();
            };
            if *step + 1 >= ONBOARDING_STEPS {
                return complete_onboarding(state);
            }
            *step += 1;
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::PrevOnboardingStep => {
            if let Overlay::Onboarding { step } = &mut state.interaction.overlay {
                *step = step.saturating_sub(1);
                return vec![GalleyEffect::RequestFrame];
            }
            Vec::new()
        }
        UserAction::SkipOnboarding => complete_onboarding(state),
        UserAction::SetOnboardingComplete(complete) => {
            state.onboarding_complete = complete;
            if complete && matches!(state.interaction.overlay, Overlay::Onboarding { .. }) {
                state.interaction.overlay = Overlay::None;
            }
            vec![
                GalleyEffect::PersistOnboarding(complete),
                GalleyEffect::RequestFrame,
            ]
        }

        UserAction::SetFocus(focus) => {
            state.interaction.focus = focus;
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::ComposerInput(ch) => {
            state.interaction.composer.push(ch);
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::ComposerBackspace => {
            state.interaction.composer.pop();
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::ComposerPaste(text) => {
            state.interaction.composer.push_str(&text);
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::ComposerSubmit => submit_composer(state),

        UserAction::AddMessage(message) => {
            push_message(state, message);
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::SubmitChat(text) => submit_chat(state, text),
        UserAction::CycleChatProvider => {
            state.customization.chat_provider = state.customization.chat_provider.next();
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::CopySelectedMessage => copy_selected_message(state),

        UserAction::StartFlow {
            kind,
            brief,
            interactive,
        } => start_flow(state, kind, brief, interactive),
        UserAction::AnswerFlow { kind, answer } => answer_flow(state, kind, answer),
        UserAction::CancelFlow(kind) => {
            let mut effects = cancel_flow(state, kind, "cancelled by you");
            effects.push(GalleyEffect::RequestFrame);
            effects
        }
        UserAction::ResetFlow(kind) => {
            let mut effects = cancel_flow(state, kind, "reset");
            *state.flows.get_mut(kind) = FlowState::idle(kind);
            effects.push(GalleyEffect::RequestFrame);
            effects
        }
        UserAction::ToggleInteractiveCook => {
            state.customization.interactive_cook = !state.customization.interactive_cook;
            vec![GalleyEffect::RequestFrame]
        }

        UserAction::CreatePlan { title } => {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Vec::new();
            }
            create_plan(state, title, Vec::new(), Vec::new());
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::SetPlanStatus { plan, status } => {
            set_plan_status(state, &plan, status);
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::MoveBoardCursor { columns, rows } => {
            let cursor = state.board.cursor;
            let column = (cursor.column as isize + columns).clamp(0, COLUMN_COUNT as isize - 1);
            let column = column as usize;
            let len = column_plans(&state.plans, PlanStatus::from_column(column)).len();
            let row = if rows != 0 {
                wrap_index(cursor.row, rows, len)
            } else {
                cursor.row
            };
            state.board.cursor = clamp_cursor(&state.plans, BoardCursor { column, row });
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::BeginDrag => {
            let Some(plan) = plan_at(&state.plans, state.board.cursor) else {
                return Vec::new();
            };
            state.board.drag = Some(DragState {
                plan: plan.id.clone(),
                origin: plan.status,
                hover: plan.status.column(),
            });
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::DragLeft => {
            if let Some(drag) = state.board.drag.as_mut() {
                drag.hover = drag.hover.saturating_sub(1);
                return vec![GalleyEffect::RequestFrame];
            }
            Vec::new()
        }
        UserAction::DragRight => {
            if let Some(drag) = state.board.drag.as_mut() {
                drag.hover = (drag.hover + 1).min(COLUMN_COUNT - 1);
                return vec![GalleyEffect::RequestFrame];
            }
            Vec::new()
        }
        UserAction::Drop => drop_dragged_plan(state),
        UserAction::CancelDrag => {
            if state.board.drag.take().is_some() {
                return vec![GalleyEffect::RequestFrame];
            }
            Vec::new()
        }
        UserAction::ExportPlan(id) => match export_plan_yaml(&state.plans, &id) {
            Ok(yaml) => vec![
                GalleyEffect::CopyToClipboard(yaml),
                GalleyEffect::RequestFrame,
            ],
            Err(err) => {
                state.push_toast(ToastLevel::Error, err.to_string(), now_ms());
                vec![GalleyEffect::RequestFrame]
            }
        },

        UserAction::TogglePhase(idx) => {
            if let Some(draft) = state.plan_draft.as_mut() {
                if draft.toggle_phase(idx) {
                    return vec![GalleyEffect::RequestFrame];
                }
            }
            Vec::new()
        }
        UserAction::ToggleCriterion(idx) => {
            if let Some(draft) = state.plan_draft.as_mut() {
                if draft.toggle_criterion(idx) {
                    return vec![GalleyEffect::RequestFrame];
                }
            }
            Vec::new()
        }
        UserAction::AddCriterion(text) => {
            if let Some(draft) = state.plan_draft.as_mut() {
                draft.add_criterion(text);
                return vec![GalleyEffect::RequestFrame];
            }
            Vec::new()
        }
        UserAction::SavePlanDraft => save_plan_draft(state),
        UserAction::DiscardPlanDraft => {
            state.plan_draft = state.selected_plan().map(PlanDraft::open);
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::OpenSelectedFile => match selected_file(state) {
            Some(file) => open_in_ide(state, file),
            None => {
                state.push_toast(ToastLevel::Info, "No file to open here", now_ms());
                vec![GalleyEffect::RequestFrame]
            }
        },
        UserAction::OpenInIde { file } => open_in_ide(state, file),

        UserAction::AddSession(provider) => add_session(state, provider),
        UserAction::UpdateSession { id, patch } => {
            let Some(session) = state.session_mut(&id) else {
                return Vec::new();
            };
            session.apply(patch);
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::StartSession(id) => start_session(state, id, false),
        UserAction::ResumeSession(id) => start_session(state, id, true),
        UserAction::PauseSession(id) => {
            let Some(session) = state.session_mut(&id) else {
                return Vec::new();
            };
            if session.status != SessionStatus::Running {
                return Vec::new();
            }
            session.status = SessionStatus::Paused;
            push_session_line(session, "Paused".to_string());
            vec![
                GalleyEffect::CancelJob(JobKey::Session(id)),
                GalleyEffect::RequestFrame,
            ]
        }
        UserAction::StopSession(id) => {
            let Some(session) = state.session_mut(&id) else {
                return Vec::new();
            };
            if !matches!(
                session.status,
                SessionStatus::Running | SessionStatus::Paused
            ) {
                return Vec::new();
            }
            session.status = SessionStatus::Idle;
            push_session_line(session, "Stopped".to_string());
            let provider = session.provider;
            state.record_activity(
                ActivityKind::Session,
                format!("{} session {id} stopped", provider.label()),
            );
            vec![
                GalleyEffect::CancelJob(JobKey::Session(id)),
                GalleyEffect::RequestFrame,
            ]
        }

        UserAction::AddBrainstormReport(report) => {
            add_brainstorm_report(state, report);
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::UpdateBrainstormReport { id, patch } => {
            let Some(report) = state.report_mut(&id) else {
                return Vec::new();
            };
            report.apply(patch);
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::RequestDeleteReport(id) => {
            if state.report(&id).is_none() {
                return Vec::new();
            }
            state.interaction.overlay = Overlay::ConfirmDeleteReport { report: id };
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::DeleteBrainstormReport(id) => delete_brainstorm_report(state, &id),
        UserAction::SelectBrainstorm(selection) => {
            if let Some(id) = selection.as_ref() {
                let Some(idx) = state.brainstorms.iter().position(|report| &report.id == id) else {
                    return Vec::new();
                };
                state.selection.brainstorm_cursor = idx;
            }
            state.selection.selected_brainstorm = selection;
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::AnnotateBrainstorm { id, text } => annotate_brainstorm(state, &id, text),
        UserAction::AdvanceBrainstormStatus(id) => {
            let Some(report) = state.report_mut(&id) else {
                return Vec::new();
            };
            report.status = report.status.next();
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::PromoteBrainstormToPlan(id) => promote_brainstorm(state, &id),

        UserAction::SetTheme(theme) => {
            state.customization.theme = theme;
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::CycleTheme => {
            state.customization.theme = state.customization.theme.next();
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::SetKeymapPreset(preset) => {
            state.customization.keymap_preset = preset;
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::CycleKeymapPreset => {
            state.customization.keymap_preset = state.customization.keymap_preset.next();
            vec![GalleyEffect::RequestFrame]
        }
        UserAction::ToggleActivityRail => {
            state.customization.show_activity_rail = !state.customization.show_activity_rail;
            vec![GalleyEffect::RequestFrame]
        }

        UserAction::Quit => vec![GalleyEffect::Quit],
    }
}

fn reduce_runtime(state: &mut AppState, action: RuntimeAction) -> Vec<GalleyEffect> {
    match action {
        RuntimeAction::FlowStep {
            kind,
            run_id,
            phase,
            text,
        } => apply_flow_step(state, kind, run_id, phase, text),
        RuntimeAction::FlowQuestion {
            kind,
            run_id,
            prompt,
        } => {
            let flow = state.flows.get_mut(kind);
            if flow.run_id != run_id || flow.status != FlowStatus::Running {
                tracing::debug!(
                    flow = kind.label(),
                    run_id,
                    current = flow.run_id,
                    "dropping stale flow question"
                );
                return Vec::new();
            }
            flow.transcript.push(FlowEntry {
                speaker: FlowSpeaker::Agent,
                phase: flow.phase,
                text: prompt.clone(),
            });
            flow.awaiting = Some(prompt);
            flow.status = FlowStatus::AwaitingAnswer;
            vec![GalleyEffect::RequestFrame]
        }
        RuntimeAction::ChatReply { run_id, content } => {
            match state.interaction.pending_reply.as_ref() {
                Some(pending) if pending.run_id == run_id => {}
                _ => {
                    tracing::debug!(run_id, "dropping stale chat reply");
                    return Vec::new();
                }
            }
            let Some(pending) = state.interaction.pending_reply.take() else {
                return Vec::new();
            };
            let tool_calls = pending
                .tool_calls
                .into_iter()
                .map(|call| ToolCall {
                    status: ToolCallStatus::Done,
                    ..call
                })
                .collect();
            push_message(
                state,
                NewMessage {
                    role: Role::Assistant,
                    content,
                    provider: Some(pending.provider),
                    tool_calls,
                },
            );
            vec![GalleyEffect::RequestFrame]
        }
        RuntimeAction::SessionTick {
            session,
            tokens,
            advance,
            line,
        } => apply_session_tick(state, session, tokens, advance, line),
        RuntimeAction::AppendActivity { kind, message } => {
            state.record_activity(kind, message);
            vec![GalleyEffect::RequestFrame]
        }
        RuntimeAction::PushToast { level, text } => {
            state.push_toast(level, text, now_ms());
            vec![GalleyEffect::RequestFrame]
        }
        RuntimeAction::ExpireToasts { now_ms } => {
            let before = state.toasts.len();
            state.toasts.retain(|toast| toast.expires_at_ms > now_ms);
            if state.toasts.len() != before {
                return vec![GalleyEffect::RequestFrame];
            }
            Vec::new()
        }
    }
}

/// Applies a navigation change and cancels flows owned by a screen that is no
/// longer shown.
fn navigate(state: &mut AppState, change: impl FnOnce(&mut Navigation)) -> Vec<GalleyEffect> {
    let before = state.screen();
    change(&mut state.nav);
    let after = state.screen();

    let mut effects = Vec::new();
    if before != after {
        for kind in before.hosted_flows() {
            if !after.hosted_flows().contains(kind) {
                effects.extend(cancel_flow(state, *kind, "left the screen"));
            }
        }
    }
    effects.push(GalleyEffect::RequestFrame);
    effects
}

fn set_active_tab(state: &mut AppState, tab: Tab) -> Vec<GalleyEffect> {
    state.plan_draft = None;
    state.board.drag = None;
    navigate(state, |nav| {
        nav.tab = tab;
        nav.selected_plan = None;
    })
}

fn set_selected_plan(state: &mut AppState, plan: Option<PlanId>) -> Vec<GalleyEffect> {
    match plan {
        Some(id) => {
            let Some(draft) = state.plan(&id).map(PlanDraft::open) else {
                tracing::debug!(plan = %id, "ignoring selection of unknown plan");
                return Vec::new();
            };
            state.plan_draft = Some(draft);
            state.board.drag = None;
            navigate(state, |nav| nav.selected_plan = Some(id))
        }
        None => {
            state.plan_draft = None;
            navigate(state, |nav| nav.selected_plan = None)
        }
    }
}

fn set_user_mode(state: &mut AppState, mode: UserMode) -> Vec<GalleyEffect> {
    if state.nav.mode == mode {
        return vec![GalleyEffect::RequestFrame];
    }
    let effects = navigate(state, |nav| nav.mode = mode);
    state.record_activity(
        ActivityKind::System,
        format!("Switched to {} mode", mode.label()),
    );
    effects
}

fn set_active_project(state: &mut AppState, id: &ProjectId) -> Vec<GalleyEffect> {
    let Some(name) = state
        .projects
        .iter()
        .find(|project| &project.id == id)
        .map(|project| project.name.clone())
    else {
        return Vec::new();
    };
    for project in &mut state.projects {
        project.active = &project.id == id;
    }
    state.record_activity(ActivityKind::Project, format!("Switched to {name}"));
    vec![GalleyEffect::RequestFrame]
}

fn wrap_index(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as isize + delta).rem_euclid(len as isize) as usize
}

fn move_selection(state: &mut AppState, delta: isize) -> Vec<GalleyEffect> {
    match state.screen() {
        Screen::SimpleDashboard | Screen::Dashboard => {
            state.selection.project_cursor =
                wrap_index(state.selection.project_cursor, delta, state.projects.len());
        }
        Screen::Sessions => {
            state.selection.session_cursor =
                wrap_index(state.selection.session_cursor, delta, state.sessions.len());
        }
        Screen::Brainstorm => {
            state.selection.brainstorm_cursor = wrap_index(
                state.selection.brainstorm_cursor,
                delta,
                state.brainstorms.len(),
            );
        }
        Screen::Settings => {
            state.selection.settings_cursor =
                wrap_index(state.selection.settings_cursor, delta, SettingsRow::ALL.len());
        }
        Screen::SimpleChat | Screen::ChatWorkspace => {
            let len = state.messages.len();
            if len == 0 {
                return Vec::new();
            }
            state.selection.message_cursor = Some(match state.selection.message_cursor {
                Some(current) => wrap_index(current, delta, len),
                None => len - 1,
            });
        }
        Screen::PlanDetail => {
            if let Some(draft) = state.plan_draft.as_mut() {
                draft.move_cursor(delta);
            }
        }
        Screen::PlansBoard => {
            return reduce_user(state, UserAction::MoveBoardCursor { columns: 0, rows: delta });
        }
        Screen::Interview
        | Screen::CookWizard
        | Screen::FixFlow
        | Screen::Timeline
        | Screen::Activity => return Vec::new(),
    }
    vec![GalleyEffect::RequestFrame]
}

fn activate_selection(state: &mut AppState) -> Vec<GalleyEffect> {
    match state.screen() {
        Screen::SimpleDashboard | Screen::Dashboard => {
            let Some(id) = state
                .projects
                .get(state.selection.project_cursor)
                .map(|project| project.id.clone())
            else {
                return Vec::new();
            };
            set_active_project(state, &id)
        }
        Screen::Sessions => {
            let Some((id, status)) = state
                .sessions
                .get(state.selection.session_cursor)
                .map(|session| (session.id.clone(), session.status))
            else {
                return Vec::new();
            };
            match status {
                SessionStatus::Running => reduce_user(state, UserAction::PauseSession(id)),
                SessionStatus::Paused => start_session(state, id, true),
                SessionStatus::Idle | SessionStatus::Completed => start_session(state, id, false),
            }
        }
        Screen::Brainstorm => {
            let Some(id) = state
                .brainstorms
                .get(state.selection.brainstorm_cursor)
                .map(|report| report.id.clone())
            else {
                return Vec::new();
            };
            let selection = if state.selection.selected_brainstorm.as_ref() == Some(&id) {
                None
            } else {
                Some(id)
            };
            reduce_user(state, UserAction::SelectBrainstorm(selection))
        }
        Screen::PlanDetail => {
            if let Some(draft) = state.plan_draft.as_mut() {
                if draft.toggle_at_cursor() {
                    return vec![GalleyEffect::RequestFrame];
                }
            }
            Vec::new()
        }
        Screen::PlansBoard => {
            if state.board.drag.is_some() {
                return drop_dragged_plan(state);
            }
            let Some(id) = plan_at(&state.plans, state.board.cursor).map(|plan| plan.id.clone())
            else {
                return Vec::new();
            };
            set_selected_plan(state, Some(id))
        }
        Screen::Settings => {
            let Some(row) = SettingsRow::ALL.get(state.selection.settings_cursor).copied() else {
                return Vec::new();
            };
            apply_settings_row(state, row)
        }
        Screen::SimpleChat
        | Screen::ChatWorkspace
        | Screen::Interview
        | Screen::CookWizard
        | Screen::FixFlow
        | Screen::Timeline
        | Screen::Activity => Vec::new(),
    }
}

fn apply_settings_row(state: &mut AppState, row: SettingsRow) -> Vec<GalleyEffect> {
    let action = match row {
        SettingsRow::Mode => UserAction::ToggleUserMode,
        SettingsRow::Theme => UserAction::CycleTheme,
        SettingsRow::Keymap => UserAction::CycleKeymapPreset,
        SettingsRow::ActivityRail => UserAction::ToggleActivityRail,
        SettingsRow::ChatProvider => UserAction::CycleChatProvider,
        SettingsRow::InteractiveCook => UserAction::ToggleInteractiveCook,
        SettingsRow::Onboarding => UserAction::ShowOnboarding,
    };
    reduce_user(state, action)
}

fn edit_overlay_text(state: &mut AppState, edit: impl FnOnce(&mut String)) -> Vec<GalleyEffect> {
    match &mut state.interaction.overlay {
        Overlay::CommandPalette { selected, query } => {
            edit(query);
            *selected = 0;
            vec![GalleyEffect::RequestFrame]
        }
        Overlay::QuickCook { input, error } => {
            edit(input);
            *error = None;
            vec![GalleyEffect::RequestFrame]
        }
        _ => Vec::new(),
    }
}

fn submit_overlay(state: &mut AppState) -> Vec<GalleyEffect> {
    match state.interaction.overlay.clone() {
        Overlay::CommandPalette { selected, query } => {
            let filtered = filtered_palette_indices(&query);
            let Some(palette_idx) = filtered.get(selected).copied() else {
                return Vec::new();
            };
            let command = PALETTE_ITEMS[palette_idx].command;
            state.interaction.overlay = Overlay::None;
            let mut effects = run_palette_command(state, command);
            effects.push(GalleyEffect::RequestFrame);
            effects
        }
        Overlay::QuickCook { input, .. } => submit_quick_cook(state, input),
        Overlay::ConfirmDeleteReport { report } => {
            state.interaction.overlay = Overlay::None;
            delete_brainstorm_report(state, &report)
        }
        Overlay::Onboarding { .. } => reduce_user(state, UserAction::NextOnboardingStep),
        Overlay::Help => {
            state.interaction.overlay = Overlay::None;
            vec![GalleyEffect::RequestFrame]
        }
        Overlay::None => Vec::new(),
    }
}

fn run_palette_command(state: &mut AppState, command: PaletteCommand) -> Vec<GalleyEffect> {
    match command {
        PaletteCommand::QuickCook => {
            state.interaction.overlay = Overlay::QuickCook {
                input: String::new(),
                error: None,
            };
            Vec::new()
        }
        PaletteCommand::GoTo(tab) => set_active_tab(state, tab),
        PaletteCommand::SetUserMode(mode) => set_user_mode(state, mode),
        PaletteCommand::SetTheme(theme) => {
            state.customization.theme = theme;
            Vec::new()
        }
        PaletteCommand::CycleTheme => {
            state.customization.theme = state.customization.theme.next();
            Vec::new()
        }
        PaletteCommand::SetKeymapPreset(preset) => {
            state.customization.keymap_preset = preset;
            Vec::new()
        }
        PaletteCommand::ToggleActivityRail => {
            state.customization.show_activity_rail = !state.customization.show_activity_rail;
            Vec::new()
        }
        PaletteCommand::NewSession => {
            let provider = state.customization.chat_provider;
            add_session(state, provider)
        }
        PaletteCommand::NewBrainstorm => {
            let effects = set_active_tab(state, Tab::Brainstorm);
            state.selection.selected_brainstorm = None;
            state.interaction.focus = Focus::Composer;
            effects
        }
        PaletteCommand::CopySelectedMessage => copy_selected_message(state),
        PaletteCommand::ShowOnboarding => {
            state.interaction.overlay = Overlay::Onboarding { step: 0 };
            Vec::new()
        }
        PaletteCommand::ShowHelp => {
            state.interaction.overlay = Overlay::Help;
            Vec::new()
        }
        PaletteCommand::Quit => vec![GalleyEffect::Quit],
    }
}

fn complete_onboarding(state: &mut AppState) -> Vec<GalleyEffect> {
    if matches!(state.interaction.overlay, Overlay::Onboarding { .. }) {
        state.interaction.overlay = Overlay::None;
    }
    if !state.onboarding_complete {
        state.record_activity(ActivityKind::System, "Onboarding complete");
    }
    state.onboarding_complete = true;
    vec![
        GalleyEffect::PersistOnboarding(true),
        GalleyEffect::RequestFrame,
    ]
}

fn submit_quick_cook(state: &mut AppState, input: String) -> Vec<GalleyEffect> {
    if input.trim().is_empty() {
        state.interaction.overlay = Overlay::QuickCook {
            input,
            error: Some("Describe the feature first".to_string()),
        };
        return vec![GalleyEffect::RequestFrame];
    }
    state.interaction.overlay = Overlay::None;
    let mut effects = set_active_tab(state, Tab::Wizard);
    effects.extend(start_flow(state, FlowKind::Cook, input, false));
    effects
}

fn submit_composer(state: &mut AppState) -> Vec<GalleyEffect> {
    let text = std::mem::take(&mut state.interaction.composer);
    let trimmed = text.trim().to_string();
    if trimmed.is_empty() {
        return match flow_for_screen(state.screen()) {
            Some(kind) if state.flows.get(kind).status == FlowStatus::AwaitingAnswer => {
                answer_flow(state, kind, trimmed)
            }
            _ => Vec::new(),
        };
    }

    match state.screen() {
        Screen::SimpleChat | Screen::ChatWorkspace => {
            if state.chat_busy() {
                state.interaction.composer = text;
            }
            submit_chat(state, trimmed)
        }
        Screen::CookWizard => {
            let interactive = state.customization.interactive_cook;
            submit_flow_input(state, FlowKind::Cook, trimmed, interactive)
        }
        Screen::Interview => submit_flow_input(state, FlowKind::Interview, trimmed, true),
        Screen::FixFlow => submit_flow_input(state, FlowKind::Fix, trimmed, false),
        Screen::Brainstorm => match state.selection.selected_brainstorm.clone() {
            Some(id) => annotate_brainstorm(state, &id, trimmed),
            None => {
                let title = trimmed.lines().next().unwrap_or_default().to_string();
                let tags = trimmed
                    .split_whitespace()
                    .filter_map(|word| word.strip_prefix('#'))
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect();
                add_brainstorm_report(
                    state,
                    NewBrainstormReport {
                        title,
                        content: trimmed,
                        status: ReportStatus::New,
                        tags,
                        annotations: Vec::new(),
                    },
                );
                vec![GalleyEffect::RequestFrame]
            }
        },
        Screen::PlanDetail => reduce_user(state, UserAction::AddCriterion(trimmed)),
        Screen::PlansBoard => reduce_user(state, UserAction::CreatePlan { title: trimmed }),
        Screen::SimpleDashboard
        | Screen::Dashboard
        | Screen::Timeline
        | Screen::Sessions
        | Screen::Activity
        | Screen::Settings => vec![GalleyEffect::RequestFrame],
    }
}

fn flow_for_screen(screen: Screen) -> Option<FlowKind> {
    match screen {
        Screen::CookWizard => Some(FlowKind::Cook),
        Screen::Interview => Some(FlowKind::Interview),
        Screen::FixFlow => Some(FlowKind::Fix),
        _ => None,
    }
}

fn submit_flow_input(
    state: &mut AppState,
    kind: FlowKind,
    text: String,
    interactive: bool,
) -> Vec<GalleyEffect> {
    match state.flows.get(kind).status {
        FlowStatus::AwaitingAnswer => answer_flow(state, kind, text),
        FlowStatus::Running => {
            state.push_toast(
                ToastLevel::Info,
                format!("{} is still running", kind.label()),
                now_ms(),
            );
            vec![GalleyEffect::RequestFrame]
        }
        FlowStatus::Idle | FlowStatus::Done | FlowStatus::Cancelled => {
            start_flow(state, kind, text, interactive)
        }
    }
}

fn push_message(state: &mut AppState, message: NewMessage) -> MessageId {
    let id = MessageId::new(state.ids.next("msg"));
    state.messages.push(Message {
        id: id.clone(),
        role: message.role,
        content: message.content,
        provider: message.provider,
        timestamp: Utc::now().format("%H:%M:%S").to_string(),
        tool_calls: message.tool_calls,
    });
    id
}

fn file_mention_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"[A-Za-z0-9_./-]+\.(?:rs|toml|ts|tsx|js|jsx|py|go|md|json|ya?ml|sql|css|html)\b",
            )
            .ok()
        })
        .as_ref()
}

/// File paths mentioned in free text, in order of first mention.
pub fn mentioned_files(text: &str) -> Vec<String> {
    let Some(pattern) = file_mention_pattern() else {
        return Vec::new();
    };
    let mut files: Vec<String> = Vec::new();
    for found in pattern.find_iter(text) {
        let file = found.as_str().to_string();
        if !files.contains(&file) {
            files.push(file);
        }
    }
    files
}

fn submit_chat(state: &mut AppState, text: String) -> Vec<GalleyEffect> {
    let prompt = text.trim().to_string();
    if prompt.is_empty() {
        return Vec::new();
    }
    if state.chat_busy() {
        tracing::debug!("chat submit rejected while a reply is pending");
        state.push_toast(ToastLevel::Error, "Assistant is still replying", now_ms());
        return vec![GalleyEffect::RequestFrame];
    }

    let provider = state.customization.chat_provider;
    let files = mentioned_files(&prompt);
    push_message(state, NewMessage::user(prompt.clone()));

    let run_id = state.interaction.next_chat_run_id;
    state.interaction.next_chat_run_id = run_id.saturating_add(1);
    state.interaction.pending_reply = Some(PendingReply {
        run_id,
        provider,
        tool_calls: files
            .iter()
            .map(|file| ToolCall {
                name: "read_file".to_string(),
                status: ToolCallStatus::Running,
                file: Some(file.clone()),
            })
            .collect(),
    });
    state.selection.message_cursor = None;
    state.record_activity(ActivityKind::Chat, format!("Asked {}", provider.label()));

    vec![
        GalleyEffect::RunChatReply(ChatRequest {
            run_id,
            prompt,
            provider,
            files,
        }),
        GalleyEffect::RequestFrame,
    ]
}

fn copy_selected_message(state: &mut AppState) -> Vec<GalleyEffect> {
    let content = match state.selection.message_cursor {
        Some(idx) => state.messages.get(idx),
        None => state
            .messages
            .iter()
            .rev()
            .find(|message| message.role == Role::Assistant),
    }
    .map(|message| message.content.clone());

    match content {
        Some(content) => vec![
            GalleyEffect::CopyToClipboard(content),
            GalleyEffect::RequestFrame,
        ],
        None => {
            state.push_toast(ToastLevel::Info, "Nothing to copy", now_ms());
            vec![GalleyEffect::RequestFrame]
        }
    }
}

fn start_flow(
    state: &mut AppState,
    kind: FlowKind,
    brief: String,
    interactive: bool,
) -> Vec<GalleyEffect> {
    let brief = brief.trim().to_string();
    if brief.is_empty() && kind != FlowKind::Interview {
        let message = match kind {
            FlowKind::Fix => "Describe the bug first",
            _ => "Describe the feature first",
        };
        state.push_toast(ToastLevel::Error, message, now_ms());
        return vec![GalleyEffect::RequestFrame];
    }

    let mut effects = Vec::new();
    if state.flows.get(kind).status.is_live() {
        effects.push(GalleyEffect::CancelJob(JobKey::Flow(kind)));
    }

    let run_id = state.flows.allocate_run_id();
    let mut flow = FlowState::idle(kind);
    flow.run_id = run_id;
    flow.status = FlowStatus::Running;
    flow.interactive = interactive;
    if !brief.is_empty() {
        flow.transcript.push(FlowEntry {
            speaker: FlowSpeaker::User,
            phase: flow.phase,
            text: brief.clone(),
        });
    }
    flow.brief = brief;
    let request = flow.request();
    *state.flows.get_mut(kind) = flow;

    tracing::info!(flow = kind.label(), run_id, interactive, "flow started");
    state.record_activity(ActivityKind::Flow, format!("{} flow started", kind.label()));
    effects.push(GalleyEffect::RunFlow(request));
    effects.push(GalleyEffect::RequestFrame);
    effects
}

fn answer_flow(state: &mut AppState, kind: FlowKind, answer: String) -> Vec<GalleyEffect> {
    let flow = state.flows.get_mut(kind);
    if flow.status != FlowStatus::AwaitingAnswer {
        tracing::debug!(flow = kind.label(), "answer ignored, no question pending");
        return Vec::new();
    }
    let answer = if is_skip_answer(&answer) {
        String::new()
    } else {
        answer.trim().to_string()
    };
    flow.transcript.push(FlowEntry {
        speaker: FlowSpeaker::User,
        phase: flow.phase,
        text: if answer.is_empty() {
            "(skipped)".to_string()
        } else {
            answer.clone()
        },
    });
    flow.answers.push(answer);
    flow.awaiting = None;
    flow.segment += 1;
    flow.status = FlowStatus::Running;
    vec![
        GalleyEffect::RunFlow(flow.request()),
        GalleyEffect::RequestFrame,
    ]
}

fn cancel_flow(state: &mut AppState, kind: FlowKind, reason: &str) -> Vec<GalleyEffect> {
    let flow = state.flows.get_mut(kind);
    if !flow.status.is_live() {
        return Vec::new();
    }
    flow.status = FlowStatus::Cancelled;
    flow.awaiting = None;
    flow.transcript.push(FlowEntry {
        speaker: FlowSpeaker::System,
        phase: flow.phase,
        text: format!("Stopped: {reason}"),
    });
    tracing::info!(flow = kind.label(), run_id = flow.run_id, reason, "flow cancelled");
    state.record_activity(ActivityKind::Flow, format!("{} flow cancelled", kind.label()));
    vec![GalleyEffect::CancelJob(JobKey::Flow(kind))]
}

fn apply_flow_step(
    state: &mut AppState,
    kind: FlowKind,
    run_id: u64,
    phase: FlowPhase,
    text: String,
) -> Vec<GalleyEffect> {
    let flow = state.flows.get_mut(kind);
    if flow.run_id != run_id || flow.status != FlowStatus::Running {
        tracing::debug!(
            flow = kind.label(),
            run_id,
            current = flow.run_id,
            "dropping stale flow step"
        );
        return Vec::new();
    }
    flow.phase = phase;
    flow.transcript.push(FlowEntry {
        speaker: FlowSpeaker::Agent,
        phase,
        text,
    });
    if phase != FlowPhase::Done {
        return vec![GalleyEffect::RequestFrame];
    }

    flow.status = FlowStatus::Done;
    let brief = flow.brief.clone();
    let answers = flow.answers.clone();
    tracing::info!(flow = kind.label(), run_id, "flow finished");

    match kind {
        FlowKind::Cook => {
            let title = plan_title(&brief);
            let phases = ["Research notes", "Implementation", "Tests", "Review"]
                .into_iter()
                .map(|name| Phase {
                    id: PhaseId::new(state.ids.next("phase")),
                    name: name.to_string(),
                    status: PhaseStatus::Pending,
                    file: None,
                })
                .collect();
            let criteria = vec![Criterion {
                text: format!("{title} works end to end"),
                met: false,
            }];
            create_plan(state, title.clone(), phases, criteria);
            state.push_toast(
                ToastLevel::Success,
                format!("Draft plan ready: {title}"),
                now_ms(),
            );
        }
        FlowKind::Interview => {
            let content = answers
                .iter()
                .filter(|answer| !answer.is_empty())
                .map(|answer| format!("- {answer}"))
                .collect::<Vec<_>>()
                .join("\n");
            add_brainstorm_report(
                state,
                NewBrainstormReport {
                    title: "Interview notes".to_string(),
                    content,
                    status: ReportStatus::New,
                    tags: vec!["interview".to_string()],
                    annotations: Vec::new(),
                },
            );
            state.push_toast(
                ToastLevel::Success,
                "Interview saved to brainstorm",
                now_ms(),
            );
        }
        FlowKind::Fix => {
            state.push_toast(ToastLevel::Success, "Fix verified", now_ms());
        }
    }
    state.record_activity(ActivityKind::Flow, format!("{} flow finished", kind.label()));
    vec![GalleyEffect::RequestFrame]
}

fn plan_title(brief: &str) -> String {
    let line = brief.lines().next().unwrap_or_default().trim();
    let mut title: String = line.chars().take(PLAN_TITLE_CHARS).collect();
    if line.chars().count() > PLAN_TITLE_CHARS {
        title.push('…');
    }
    title
}

fn create_plan(
    state: &mut AppState,
    title: String,
    phases: Vec<Phase>,
    success_criteria: Vec<Criterion>,
) -> PlanId {
    let id = PlanId::new(state.ids.next("plan"));
    state.record_activity(ActivityKind::Plan, format!("Created plan {title}"));
    state.plans.push(Plan {
        id: id.clone(),
        title,
        status: PlanStatus::Draft,
        priority: Priority::P2,
        progress: 0,
        phases,
        dependencies: Vec::new(),
        success_criteria,
        revision: 0,
        created_at: Utc::now(),
    });
    id
}

fn set_plan_status(state: &mut AppState, id: &PlanId, status: PlanStatus) -> bool {
    let Some(plan) = state.plan_mut(id) else {
        return false;
    };
    if plan.status == status {
        return false;
    }
    plan.status = status;
    let title = plan.title.clone();
    // a moved card joins the end of its new column
    if let Some(idx) = state.plans.iter().position(|plan| &plan.id == id) {
        let moved = state.plans.remove(idx);
        state.plans.push(moved);
    }
    state.record_activity(
        ActivityKind::Plan,
        format!("{title} moved to {}", status.label()),
    );
    state.board.cursor = clamp_cursor(&state.plans, state.board.cursor);
    true
}

fn drop_dragged_plan(state: &mut AppState) -> Vec<GalleyEffect> {
    let Some(drag) = state.board.drag.take() else {
        return Vec::new();
    };
    let target = PlanStatus::from_column(drag.hover);
    if target != drag.origin {
        set_plan_status(state, &drag.plan, target);
    }
    if let Some(cursor) = cursor_for(&state.plans, &drag.plan) {
        state.board.cursor = cursor;
    }
    vec![GalleyEffect::RequestFrame]
}

fn save_plan_draft(state: &mut AppState) -> Vec<GalleyEffect> {
    let Some(draft) = state.plan_draft.clone() else {
        return Vec::new();
    };
    let result = match state.plan_mut(&draft.plan_id) {
        Some(plan) => commit_draft(plan, &draft).map(|()| plan.clone()),
        None => Err(DraftError::PlanMissing(draft.plan_id.clone())),
    };

    match result {
        Ok(plan) => {
            state.plan_draft = Some(PlanDraft {
                cursor: draft.cursor,
                ..PlanDraft::open(&plan)
            });
            state.record_activity(ActivityKind::Plan, format!("Saved {}", plan.title));
            state.push_toast(
                ToastLevel::Success,
                format!("Saved {}", plan.title),
                now_ms(),
            );
        }
        Err(err) => {
            tracing::debug!(plan = %draft.plan_id, error = %err, "plan draft rejected");
            state.push_toast(ToastLevel::Error, err.to_string(), now_ms());
        }
    }
    vec![GalleyEffect::RequestFrame]
}

fn selected_file(state: &AppState) -> Option<String> {
    match state.screen() {
        Screen::PlanDetail => {
            let draft = state.plan_draft.as_ref()?;
            draft.phases.get(draft.cursor)?.file.clone()
        }
        Screen::SimpleChat | Screen::ChatWorkspace => {
            let message = match state.selection.message_cursor {
                Some(idx) => state.messages.get(idx),
                None => state.messages.last(),
            }?;
            message.tool_calls.iter().find_map(|call| call.file.clone())
        }
        _ => None,
    }
}

fn open_in_ide(state: &mut AppState, file: String) -> Vec<GalleyEffect> {
    state.record_activity(ActivityKind::System, format!("Opened {file} in editor"));
    vec![GalleyEffect::OpenInIde { file }, GalleyEffect::RequestFrame]
}

fn add_session(state: &mut AppState, provider: Provider) -> Vec<GalleyEffect> {
    let id = SessionId::new(state.ids.next("sess"));
    state.sessions.push(Session {
        id: id.clone(),
        provider,
        status: SessionStatus::Idle,
        cost_usd: 0.0,
        tokens: 0,
        output: Vec::new(),
        progress: 0,
        plan: None,
    });
    state.selection.session_cursor = state.sessions.len() - 1;
    state.record_activity(
        ActivityKind::Session,
        format!("New {} session {id}", provider.label()),
    );
    vec![GalleyEffect::RequestFrame]
}

fn push_session_line(session: &mut Session, line: String) {
    session.output.push(line);
    if session.output.len() > SESSION_OUTPUT_LINES {
        let excess = session.output.len() - SESSION_OUTPUT_LINES;
        session.output.drain(..excess);
    }
}

fn start_session(state: &mut AppState, id: SessionId, resume: bool) -> Vec<GalleyEffect> {
    let Some(session) = state.session_mut(&id) else {
        return Vec::new();
    };
    match (session.status, resume) {
        (SessionStatus::Paused, true) => push_session_line(session, "Resumed".to_string()),
        (_, true) | (SessionStatus::Running, false) => return Vec::new(),
        (SessionStatus::Completed, false) => {
            session.progress = 0;
            push_session_line(session, "Restarted".to_string());
        }
        (SessionStatus::Idle | SessionStatus::Paused, false) => {
            push_session_line(session, "Started".to_string())
        }
    }
    // nothing left to tick through; run the whole script again
    if session.progress >= 100 {
        session.progress = 0;
    }
    session.status = SessionStatus::Running;
    let provider = session.provider;
    let remaining = 100u8.saturating_sub(session.progress);
    state.record_activity(
        ActivityKind::Session,
        format!("{} session {id} running", provider.label()),
    );
    vec![
        GalleyEffect::RunSessionTicks {
            session: id,
            provider,
            remaining,
        },
        GalleyEffect::RequestFrame,
    ]
}

fn apply_session_tick(
    state: &mut AppState,
    id: SessionId,
    tokens: u64,
    advance: u8,
    line: String,
) -> Vec<GalleyEffect> {
    let Some(session) = state.session_mut(&id) else {
        return Vec::new();
    };
    if session.status != SessionStatus::Running {
        tracing::debug!(session = %id, "dropping tick for a session that is not running");
        return Vec::new();
    }
    session.tokens = session.tokens.saturating_add(tokens);
    session.cost_usd += tokens as f64 / 1_000.0 * session.provider.cost_per_1k_tokens();
    session.progress = session.progress.saturating_add(advance).min(100);
    push_session_line(session, line);
    if session.progress < 100 {
        return vec![GalleyEffect::RequestFrame];
    }

    session.status = SessionStatus::Completed;
    let provider = session.provider;
    state.record_activity(
        ActivityKind::Session,
        format!("{} session {id} completed", provider.label()),
    );
    state.push_toast(
        ToastLevel::Success,
        format!("Session {id} completed"),
        now_ms(),
    );
    vec![
        GalleyEffect::CancelJob(JobKey::Session(id)),
        GalleyEffect::RequestFrame,
    ]
}

fn add_brainstorm_report(state: &mut AppState, report: NewBrainstormReport) -> ReportId {
    let id = ReportId::new(state.ids.next("idea"));
    state.record_activity(
        ActivityKind::Brainstorm,
        format!("New idea: {}", report.title),
    );
    state.brainstorms.push(BrainstormReport {
        id: id.clone(),
        title: report.title,
        content: report.content,
        status: report.status,
        tags: report.tags,
        annotations: report.annotations,
        created_at: Utc::now(),
        plan: None,
    });
    id
}

fn delete_brainstorm_report(state: &mut AppState, id: &ReportId) -> Vec<GalleyEffect> {
    let Some(idx) = state.brainstorms.iter().position(|report| &report.id == id) else {
        return Vec::new();
    };
    let removed = state.brainstorms.remove(idx);
    if state.selection.selected_brainstorm.as_ref() == Some(id) {
        state.selection.selected_brainstorm = None;
    }
    state.selection.brainstorm_cursor = state
        .selection
        .brainstorm_cursor
        .min(state.brainstorms.len().saturating_sub(1));
    state.record_activity(
        ActivityKind::Brainstorm,
        format!("Deleted idea: {}", removed.title),
    );
    vec![GalleyEffect::RequestFrame]
}

fn annotate_brainstorm(state: &mut AppState, id: &ReportId, text: String) -> Vec<GalleyEffect> {
    let text = text.trim().to_string();
    if text.is_empty() || state.report(id).is_none() {
        return Vec::new();
    }
    let annotation = Annotation {
        id: AnnotationId::new(state.ids.next("note")),
        text,
        created_at: Utc::now(),
    };
    if let Some(report) = state.report_mut(id) {
        report.annotations.push(annotation);
        if report.status == ReportStatus::New {
            report.status = ReportStatus::Refining;
        }
    }
    vec![GalleyEffect::RequestFrame]
}

fn promote_brainstorm(state: &mut AppState, id: &ReportId) -> Vec<GalleyEffect> {
    let Some(report) = state.report(id) else {
        return Vec::new();
    };
    if report.plan.is_some() {
        state.push_toast(ToastLevel::Info, "Already promoted to a plan", now_ms());
        return vec![GalleyEffect::RequestFrame];
    }
    let title = report.title.clone();
    let criteria = report
        .annotations
        .iter()
        .map(|annotation| Criterion {
            text: annotation.text.clone(),
            met: false,
        })
        .collect();

    let plan = create_plan(state, title.clone(), Vec::new(), criteria);
    if let Some(report) = state.report_mut(id) {
        report.status = ReportStatus::Converted;
        report.plan = Some(plan);
    }
    state.push_toast(
        ToastLevel::Success,
        format!("Promoted {title} to a plan"),
        now_ms(),
    );
    vec![GalleyEffect::RequestFrame]
}

#[cfg(test)]
mod tests;
