use std::collections::VecDeque;
use std::io;
use std::process::Command;
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseButton;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;
use crossterm::event;
use crossterm::execute;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use galley_core::flow::FlowKind;
use galley_core::kanban::plan_at;
use galley_core::router::Screen;
use galley_core::state::now_ms;
use galley_core::state::AppState;
use galley_core::state::Focus;
use galley_core::state::Overlay;
use galley_core::state::ToastLevel;
use galley_core::AppAction;
use galley_core::GalleyEffect;
use galley_core::PreferenceStore;
use galley_core::RuntimeAction;
use galley_core::UserAction;
use galley_exec::SimRunner;
use galley_exec::SimTiming;
use ratatui::backend::Backend;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::keymap::opens_palette;
use crate::view;

struct TuiGuard;

impl Drop for TuiGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste,
            crossterm::cursor::Show
        );
    }
}

/// Side-effect handlers the loop hands effects to.
struct Services {
    runner: SimRunner,
    prefs: PreferenceStore,
}

pub fn run(
    mut state: AppState,
    handle: Handle,
    timing: SimTiming,
    prefs: PreferenceStore,
) -> anyhow::Result<()> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste,
        crossterm::cursor::Hide
    )
    .context("entering the alternate screen")?;
    let _guard = TuiGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating the terminal")?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut services = Services {
        runner: SimRunner::new(handle, tx, timing),
        prefs,
    };
    tracing::info!(screen = ?state.screen(), "ui started");
    let result = run_app(&mut terminal, &mut state, &mut services, &mut rx);
    services.runner.cancel_all();
    tracing::info!("ui stopped");
    result
}

enum KeyHandlerResult {
    Continue(Vec<GalleyEffect>),
    Exit,
}

fn user(state: &mut AppState, action: UserAction) -> Vec<GalleyEffect> {
    galley_core::reduce(state, AppAction::User(action))
}

fn runtime(state: &mut AppState, action: RuntimeAction) -> Vec<GalleyEffect> {
    galley_core::reduce(state, AppAction::Runtime(action))
}

fn handle_palette_keys(key: KeyEvent, state: &mut AppState) -> KeyHandlerResult {
    if opens_palette(state.customization.keymap_preset, &key) {
        return KeyHandlerResult::Continue(user(state, UserAction::ToggleCommandPalette));
    }
    let effects = match key.code {
        KeyCode::Esc => user(state, UserAction::CloseOverlay),
        KeyCode::Up => user(state, UserAction::OverlayMoveUp),
        KeyCode::Down => user(state, UserAction::OverlayMoveDown),
        KeyCode::Enter => user(state, UserAction::OverlaySubmit),
        KeyCode::Backspace => user(state, UserAction::OverlayQueryBackspace),
        KeyCode::Char(c) => user(state, UserAction::OverlayQueryInput(c)),
        _ => Vec::new(),
    };
    KeyHandlerResult::Continue(effects)
}

fn handle_onboarding_keys(key: KeyEvent, state: &mut AppState) -> KeyHandlerResult {
    let effects = match key.code {
        KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('l') => {
            user(state, UserAction::NextOnboardingStep)
        }
        KeyCode::Left | KeyCode::Char('h') => user(state, UserAction::PrevOnboardingStep),
        KeyCode::Esc | KeyCode::Char('s') => user(state, UserAction::SkipOnboarding),
        _ => Vec::new(),
    };
    KeyHandlerResult::Continue(effects)
}

fn handle_quick_cook_keys(key: KeyEvent, state: &mut AppState) -> KeyHandlerResult {
    let effects = match key.code {
        KeyCode::Esc => user(state, UserAction::CloseOverlay),
        KeyCode::Enter => user(state, UserAction::OverlaySubmit),
        KeyCode::Backspace => user(state, UserAction::OverlayQueryBackspace),
        KeyCode::Char(c) => user(state, UserAction::OverlayQueryInput(c)),
        _ => Vec::new(),
    };
    KeyHandlerResult::Continue(effects)
}

fn handle_confirm_delete_keys(key: KeyEvent, state: &mut AppState) -> KeyHandlerResult {
    let effects = match key.code {
        KeyCode::Char('y') | KeyCode::Enter => user(state, UserAction::OverlaySubmit),
        KeyCode::Char('n') | KeyCode::Esc => user(state, UserAction::CloseOverlay),
        _ => Vec::new(),
    };
    KeyHandlerResult::Continue(effects)
}

fn handle_help_keys(key: KeyEvent, state: &mut AppState) -> KeyHandlerResult {
    let effects = match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            user(state, UserAction::CloseOverlay)
        }
        _ => Vec::new(),
    };
    KeyHandlerResult::Continue(effects)
}

fn handle_composer_keys(key: KeyEvent, state: &mut AppState) -> KeyHandlerResult {
    if opens_palette(state.customization.keymap_preset, &key) {
        return KeyHandlerResult::Continue(user(state, UserAction::ToggleCommandPalette));
    }
    let effects = match key.code {
        KeyCode::Esc => user(state, UserAction::SetFocus(Focus::Navigation)),
        KeyCode::Enter => user(state, UserAction::ComposerSubmit),
        KeyCode::Backspace => user(state, UserAction::ComposerBackspace),
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            user(state, UserAction::ComposerInput(c))
        }
        _ => Vec::new(),
    };
    KeyHandlerResult::Continue(effects)
}

fn selected_session(state: &AppState) -> Option<galley_core::model::SessionId> {
    state
        .sessions
        .get(state.selection.session_cursor)
        .map(|session| session.id.clone())
}

fn selected_report(state: &AppState) -> Option<galley_core::model::ReportId> {
    state
        .brainstorms
        .get(state.selection.brainstorm_cursor)
        .map(|report| report.id.clone())
}

/// Keys that only mean something on the current screen. `None` lets the key
/// fall through to the global bindings.
fn handle_screen_keys(key: KeyEvent, state: &mut AppState) -> Option<Vec<GalleyEffect>> {
    let screen = state.screen();
    let effects = match (screen, key.code) {
        (Screen::PlansBoard, KeyCode::Left | KeyCode::Char('h')) => {
            if state.board.drag.is_some() {
                user(state, UserAction::DragLeft)
            } else {
                user(state, UserAction::MoveBoardCursor { columns: -1, rows: 0 })
            }
        }
        (Screen::PlansBoard, KeyCode::Right | KeyCode::Char('l')) => {
            if state.board.drag.is_some() {
                user(state, UserAction::DragRight)
            } else {
                user(state, UserAction::MoveBoardCursor { columns: 1, rows: 0 })
            }
        }
        (Screen::PlansBoard, KeyCode::Char(' ')) => {
            if state.board.drag.is_some() {
                user(state, UserAction::Drop)
            } else {
                user(state, UserAction::BeginDrag)
            }
        }
        (Screen::PlansBoard, KeyCode::Esc) if state.board.drag.is_some() => {
            user(state, UserAction::CancelDrag)
        }
        (Screen::PlansBoard, KeyCode::Char('e')) => {
            let plan = plan_at(&state.plans, state.board.cursor).map(|plan| plan.id.clone())?;
            user(state, UserAction::ExportPlan(plan))
        }

        (Screen::PlanDetail, KeyCode::Char('s')) => user(state, UserAction::SavePlanDraft),
        (Screen::PlanDetail, KeyCode::Char('d')) => user(state, UserAction::DiscardPlanDraft),
        (Screen::PlanDetail, KeyCode::Char('o')) => user(state, UserAction::OpenSelectedFile),
        (Screen::PlanDetail, KeyCode::Char(' ')) => user(state, UserAction::ActivateSelection),
        (Screen::PlanDetail, KeyCode::Esc | KeyCode::Backspace) => {
            user(state, UserAction::SetSelectedPlan(None))
        }

        (Screen::Sessions, KeyCode::Char('n')) => {
            let provider = state.customization.chat_provider;
            user(state, UserAction::AddSession(provider))
        }
        (Screen::Sessions, KeyCode::Char('s')) => {
            let id = selected_session(state)?;
            user(state, UserAction::StartSession(id))
        }
        (Screen::Sessions, KeyCode::Char('p')) => {
            let id = selected_session(state)?;
            user(state, UserAction::PauseSession(id))
        }
        (Screen::Sessions, KeyCode::Char('r')) => {
            let id = selected_session(state)?;
            user(state, UserAction::ResumeSession(id))
        }
        (Screen::Sessions, KeyCode::Char('x')) => {
            let id = selected_session(state)?;
            user(state, UserAction::StopSession(id))
        }

        (Screen::Brainstorm, KeyCode::Char('n')) => {
            let mut effects = user(state, UserAction::SelectBrainstorm(None));
            effects.extend(user(state, UserAction::SetFocus(Focus::Composer)));
            effects
        }
        (Screen::Brainstorm, KeyCode::Char('r')) => {
            let id = selected_report(state)?;
            user(state, UserAction::AdvanceBrainstormStatus(id))
        }
        (Screen::Brainstorm, KeyCode::Char('p')) => {
            let id = selected_report(state)?;
            user(state, UserAction::PromoteBrainstormToPlan(id))
        }
        (Screen::Brainstorm, KeyCode::Delete) => {
            let id = selected_report(state)?;
            user(state, UserAction::RequestDeleteReport(id))
        }

        (Screen::SimpleChat | Screen::ChatWorkspace, KeyCode::Char('y')) => {
            user(state, UserAction::CopySelectedMessage)
        }
        (Screen::SimpleChat | Screen::ChatWorkspace, KeyCode::Char('p')) => {
            user(state, UserAction::CycleChatProvider)
        }
        (Screen::SimpleChat | Screen::ChatWorkspace, KeyCode::Char('o')) => {
            user(state, UserAction::OpenSelectedFile)
        }

        (Screen::CookWizard | Screen::FixFlow | Screen::Interview, KeyCode::Char('x')) => {
            let live: Vec<FlowKind> = screen
                .hosted_flows()
                .iter()
                .copied()
                .filter(|kind| state.flows.get(*kind).status.is_live())
                .collect();
            let mut effects = Vec::new();
            for kind in live {
                effects.extend(user(state, UserAction::CancelFlow(kind)));
            }
            effects
        }
        (Screen::CookWizard | Screen::FixFlow | Screen::Interview, KeyCode::Char('R')) => {
            let mut effects = Vec::new();
            for kind in screen.hosted_flows() {
                effects.extend(user(state, UserAction::ResetFlow(*kind)));
            }
            effects
        }
        (Screen::CookWizard, KeyCode::Char('o')) => user(state, UserAction::ToggleInteractiveCook),

        _ => return None,
    };
    Some(effects)
}

fn handle_global_keys(key: KeyEvent, state: &mut AppState) -> KeyHandlerResult {
    if opens_palette(state.customization.keymap_preset, &key) {
        return KeyHandlerResult::Continue(user(state, UserAction::ToggleCommandPalette));
    }
    if let Some(effects) = handle_screen_keys(key, state) {
        return KeyHandlerResult::Continue(effects);
    }

    let effects = match key.code {
        KeyCode::Char('q') => return KeyHandlerResult::Exit,
        KeyCode::Tab => user(state, UserAction::NextTab),
        KeyCode::BackTab => user(state, UserAction::PrevTab),
        KeyCode::Char(digit @ '0'..='9') => {
            let index = match digit.to_digit(10) {
                Some(0) => 9,
                Some(n) => n as usize - 1,
                None => return KeyHandlerResult::Continue(Vec::new()),
            };
            match state.visible_tabs().get(index).copied() {
                Some(tab) => user(state, UserAction::SetActiveTab(tab)),
                None => Vec::new(),
            }
        }
        KeyCode::Char('/') => user(state, UserAction::ToggleCommandPalette),
        KeyCode::Char('?') => user(state, UserAction::ShowHelp),
        KeyCode::Char('i') => {
            if view::composer_title(state).is_some() {
                user(state, UserAction::SetFocus(Focus::Composer))
            } else {
                Vec::new()
            }
        }
        KeyCode::Char('c') => user(state, UserAction::OpenQuickCook),
        KeyCode::Char('m') => user(state, UserAction::ToggleUserMode),
        KeyCode::Char('t') => user(state, UserAction::CycleTheme),
        KeyCode::Char('a') => user(state, UserAction::ToggleActivityRail),
        KeyCode::Up | KeyCode::Char('k') => user(state, UserAction::MoveSelection(-1)),
        KeyCode::Down | KeyCode::Char('j') => user(state, UserAction::MoveSelection(1)),
        KeyCode::Enter => user(state, UserAction::ActivateSelection),
        _ => Vec::new(),
    };
    KeyHandlerResult::Continue(effects)
}

fn handle_key_event(key: KeyEvent, state: &mut AppState) -> KeyHandlerResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyHandlerResult::Exit;
    }

    match &state.interaction.overlay {
        Overlay::CommandPalette { .. } => handle_palette_keys(key, state),
        Overlay::Onboarding { .. } => handle_onboarding_keys(key, state),
        Overlay::QuickCook { .. } => handle_quick_cook_keys(key, state),
        Overlay::ConfirmDeleteReport { .. } => handle_confirm_delete_keys(key, state),
        Overlay::Help => handle_help_keys(key, state),
        Overlay::None => match state.interaction.focus {
            Focus::Composer => handle_composer_keys(key, state),
            Focus::Navigation => handle_global_keys(key, state),
        },
    }
}

fn handle_mouse_event(mouse: MouseEvent, state: &mut AppState, area: Rect) -> Vec<GalleyEffect> {
    if state.interaction.overlay != Overlay::None {
        return Vec::new();
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => user(state, UserAction::MoveSelection(-1)),
        MouseEventKind::ScrollDown => user(state, UserAction::MoveSelection(1)),
        MouseEventKind::Down(MouseButton::Left) => {
            let layout = view::frame_layout(area, state);
            let tabs = layout.tabs;
            if mouse.row < tabs.y || mouse.row >= tabs.bottom() {
                return Vec::new();
            }
            match view::tab_at(state, tabs, mouse.column) {
                Some(tab) => user(state, UserAction::SetActiveTab(tab)),
                None => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}

fn handle_paste(text: String, state: &mut AppState) -> Vec<GalleyEffect> {
    match state.interaction.overlay {
        Overlay::CommandPalette { .. } | Overlay::QuickCook { .. } => {
            user(state, UserAction::OverlayQueryPaste(text))
        }
        Overlay::None if state.interaction.focus == Focus::Composer => {
            user(state, UserAction::ComposerPaste(text))
        }
        _ => Vec::new(),
    }
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
    services: &mut Services,
    rx: &mut UnboundedReceiver<RuntimeAction>,
) -> anyhow::Result<()> {
    loop {
        while let Ok(action) = rx.try_recv() {
            let effects = runtime(state, action);
            if execute_effects(state, services, effects) {
                return Ok(());
            }
        }
        runtime(state, RuntimeAction::ExpireToasts { now_ms: now_ms() });

        terminal.draw(|f| view::draw(f, state))?;

        if event::poll(Duration::from_millis(16))? {
            let effects = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match handle_key_event(key, state) {
                        KeyHandlerResult::Continue(effects) => effects,
                        KeyHandlerResult::Exit => return Ok(()),
                    }
                }
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    handle_mouse_event(mouse, state, Rect::new(0, 0, size.width, size.height))
                }
                Event::Paste(text) => handle_paste(text, state),
                _ => Vec::new(),
            };
            if execute_effects(state, services, effects) {
                return Ok(());
            }
        }
    }
}

/// Runs effects until the queue drains. Returns true when the app should exit.
fn execute_effects(
    state: &mut AppState,
    services: &mut Services,
    effects: Vec<GalleyEffect>,
) -> bool {
    let mut queue: VecDeque<GalleyEffect> = effects.into();
    while let Some(effect) = queue.pop_front() {
        match effect {
            GalleyEffect::RequestFrame => {}
            GalleyEffect::RunFlow(request) => services.runner.run_flow(request),
            GalleyEffect::RunChatReply(request) => services.runner.run_chat(request),
            GalleyEffect::RunSessionTicks {
                session,
                provider,
                remaining,
            } => services.runner.run_session(session, provider, remaining),
            GalleyEffect::CancelJob(key) => {
                services.runner.cancel(&key);
            }
            GalleyEffect::PersistOnboarding(complete) => {
                if let Err(err) = services.prefs.set_onboarding_complete(complete) {
                    tracing::warn!(error = %err, "saving onboarding progress failed");
                    queue.extend(toast(
                        state,
                        ToastLevel::Error,
                        format!("Could not save onboarding progress: {err}"),
                    ));
                }
            }
            GalleyEffect::CopyToClipboard(text) => {
                let followup = match copy_to_clipboard(text) {
                    Ok(()) => toast(state, ToastLevel::Success, "Copied to clipboard".to_string()),
                    Err(err) => {
                        tracing::warn!(error = %err, "clipboard unavailable");
                        toast(state, ToastLevel::Error, format!("Copy failed: {err}"))
                    }
                };
                queue.extend(followup);
            }
            GalleyEffect::OpenInIde { file } => {
                open_in_editor(&file);
                queue.extend(toast(
                    state,
                    ToastLevel::Info,
                    format!("Opening {file} in your editor"),
                ));
            }
            GalleyEffect::Quit => return true,
        }
    }
    false
}

fn toast(state: &mut AppState, level: ToastLevel, text: String) -> Vec<GalleyEffect> {
    runtime(state, RuntimeAction::PushToast { level, text })
}

fn copy_to_clipboard(text: String) -> Result<(), arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text)
}

fn open_in_editor(file: &str) {
    let spawned = Command::new("code")
        .arg("--goto")
        .arg(file)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    match spawned {
        Ok(_) => tracing::debug!(file, "editor launched"),
        Err(err) => tracing::debug!(file, error = %err, "no editor on PATH"),
    }
}

#[cfg(test)]
mod tests {
    use galley_core::model::PlanStatus;
    use galley_core::router::Tab;
    use galley_core::state::StoreOptions;
    use pretty_assertions::assert_eq;

    use super::*;

    fn state() -> AppState {
        AppState::new(StoreOptions::default())
    }

    fn press(state: &mut AppState, code: KeyCode) -> Vec<GalleyEffect> {
        press_with(state, code, KeyModifiers::NONE)
    }

    fn press_with(state: &mut AppState, code: KeyCode, modifiers: KeyModifiers) -> Vec<GalleyEffect> {
        match handle_key_event(KeyEvent::new(code, modifiers), state) {
            KeyHandlerResult::Continue(effects) => effects,
            KeyHandlerResult::Exit => panic!("unexpected exit"),
        }
    }

    #[test]
    fn ctrl_c_exits_from_anywhere() {
        let mut state = state();
        press(&mut state, KeyCode::Char('?'));
        assert!(matches!(
            handle_key_event(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                &mut state
            ),
            KeyHandlerResult::Exit
        ));
    }

    #[test]
    fn digits_jump_to_visible_tabs() {
        let mut state = state();
        press(&mut state, KeyCode::Char('3'));
        assert_eq!(state.nav.tab, Tab::Chat);
        press(&mut state, KeyCode::Char('0'));
        assert_eq!(state.nav.tab, Tab::Settings);
    }

    #[test]
    fn typing_q_in_the_composer_does_not_quit() {
        let mut state = state();
        press(&mut state, KeyCode::Char('3'));
        press(&mut state, KeyCode::Char('i'));
        assert_eq!(state.interaction.focus, Focus::Composer);
        press(&mut state, KeyCode::Char('q'));
        assert_eq!(state.interaction.composer, "q");
        press(&mut state, KeyCode::Esc);
        assert_eq!(state.interaction.focus, Focus::Navigation);
    }

    #[test]
    fn palette_chord_opens_and_closes() {
        let mut state = state();
        press_with(&mut state, KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert!(matches!(
            state.interaction.overlay,
            Overlay::CommandPalette { .. }
        ));
        press(&mut state, KeyCode::Char('x'));
        assert!(matches!(
            &state.interaction.overlay,
            Overlay::CommandPalette { query, .. } if query == "x"
        ));
        press(&mut state, KeyCode::Esc);
        assert_eq!(state.interaction.overlay, Overlay::None);
    }

    #[test]
    fn space_drags_a_card_across_the_board() {
        let mut state = state();
        press(&mut state, KeyCode::Char('4'));
        assert_eq!(state.screen(), Screen::PlansBoard);
        let plan = plan_at(&state.plans, state.board.cursor)
            .map(|plan| plan.id.clone())
            .expect("seeded plan under the cursor");
        let origin = state.plan(&plan).map(|plan| plan.status).expect("plan");

        press(&mut state, KeyCode::Char(' '));
        assert!(state.board.drag.is_some());
        press(&mut state, KeyCode::Right);
        press(&mut state, KeyCode::Char(' '));

        assert!(state.board.drag.is_none());
        let moved = state.plan(&plan).map(|plan| plan.status).expect("plan");
        assert_eq!(moved.column(), (origin.column() + 1).min(PlanStatus::ALL.len() - 1));
    }

    #[test]
    fn escape_leaves_plan_detail() {
        let mut state = state();
        press(&mut state, KeyCode::Char('4'));
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.screen(), Screen::PlanDetail);
        press(&mut state, KeyCode::Esc);
        assert_eq!(state.screen(), Screen::PlansBoard);
    }

    #[test]
    fn paste_goes_to_the_focused_input() {
        let mut state = state();
        handle_paste("ignored".to_string(), &mut state);
        assert_eq!(state.interaction.composer, "");

        press(&mut state, KeyCode::Char('3'));
        press(&mut state, KeyCode::Char('i'));
        handle_paste("hello @src/main.rs".to_string(), &mut state);
        assert_eq!(state.interaction.composer, "hello @src/main.rs");
    }

    #[test]
    fn clicking_a_tab_switches_to_it() {
        let mut state = state();
        let area = Rect::new(0, 0, 140, 40);
        let tabs = view::frame_layout(area, &state).tabs;
        let column = tabs.x + 1 + "1 Dashboard".len() as u16 + 3;
        handle_mouse_event(
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row: tabs.y + 1,
                modifiers: KeyModifiers::NONE,
            },
            &mut state,
            area,
        );
        assert_eq!(state.nav.tab, Tab::Wizard);
    }
}
