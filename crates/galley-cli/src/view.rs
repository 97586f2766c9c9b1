use galley_core::actions::filtered_palette_indices;
use galley_core::actions::SettingsRow;
use galley_core::actions::PALETTE_ITEMS;
use galley_core::flow::FlowKind;
use galley_core::flow::FlowSpeaker;
use galley_core::flow::FlowState;
use galley_core::flow::FlowStatus;
use galley_core::kanban::column_plans;
use galley_core::kanban::COLUMN_COUNT;
use galley_core::model::PhaseStatus;
use galley_core::model::Plan;
use galley_core::model::PlanStatus;
use galley_core::model::SessionStatus;
use galley_core::router::Screen;
use galley_core::router::Tab;
use galley_core::router::UserMode;
use galley_core::state::now_ms;
use galley_core::state::AppState;
use galley_core::state::Focus;
use galley_core::state::Overlay;
use galley_core::state::ToastLevel;
use galley_core::state::UiTheme;
use galley_core::state::ONBOARDING_STEPS;
use galley_core::timeline::layout_timeline;
use ratatui::layout::Alignment;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Gauge;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Tabs;
use ratatui::widgets::Wrap;
use ratatui::Frame;

use crate::highlight::message_lines;
use crate::keymap::help_rows;
use crate::keymap::palette_hint;

const RAIL_WIDTH: u16 = 34;
const TIMELINE_LABEL_WIDTH: u16 = 26;

const ONBOARDING_PAGES: [(&str, &str); ONBOARDING_STEPS] = [
    (
        "Welcome to Galley",
        "Galley is your cockpit for building software with AI assistants. Plans, \
         sessions, ideas and chats all live here.",
    ),
    (
        "Getting around",
        "Tab and Shift+Tab switch screens, the number keys jump straight to one, and \
         the command palette finds everything else.",
    ),
    (
        "Cook, fix, interview",
        "Describe a feature in the Wizard and Galley cooks a plan for it. The Fix \
         screen walks a bug from reproduction to verification.",
    ),
    (
        "Simple or advanced",
        "Simple mode keeps the essentials. Advanced mode adds the timeline, sessions, \
         fix flow and activity log. Press m to switch at any time.",
    ),
];

#[derive(Clone, Copy)]
pub struct UiPalette {
    pub accent: Color,
    pub accent_alt: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub muted: Color,
    pub border: Color,
    pub panel_bg: Color,
    pub selected_bg: Color,
}

pub fn palette_for(theme: UiTheme) -> UiPalette {
    match theme {
        UiTheme::Classic => UiPalette {
            accent: Color::Cyan,
            accent_alt: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
            muted: Color::DarkGray,
            border: Color::Gray,
            panel_bg: Color::Black,
            selected_bg: Color::DarkGray,
        },
        UiTheme::Cyberpunk => UiPalette {
            accent: Color::Magenta,
            accent_alt: Color::Cyan,
            success: Color::LightGreen,
            warning: Color::LightYellow,
            danger: Color::LightRed,
            muted: Color::Gray,
            border: Color::Magenta,
            panel_bg: Color::Black,
            selected_bg: Color::Rgb(58, 0, 58),
        },
        UiTheme::NeonNoir => UiPalette {
            accent: Color::LightBlue,
            accent_alt: Color::LightCyan,
            success: Color::LightGreen,
            warning: Color::Yellow,
            danger: Color::LightRed,
            muted: Color::Gray,
            border: Color::LightBlue,
            panel_bg: Color::Black,
            selected_bg: Color::Rgb(18, 28, 42),
        },
        UiTheme::SolarFlare => UiPalette {
            accent: Color::LightYellow,
            accent_alt: Color::LightRed,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
            muted: Color::Gray,
            border: Color::Yellow,
            panel_bg: Color::Black,
            selected_bg: Color::Rgb(42, 28, 0),
        },
        UiTheme::ForestZen => UiPalette {
            accent: Color::LightGreen,
            accent_alt: Color::Green,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
            muted: Color::Gray,
            border: Color::LightGreen,
            panel_bg: Color::Black,
            selected_bg: Color::Rgb(8, 32, 10),
        },
    }
}

pub struct FrameLayout {
    pub header: Rect,
    pub tabs: Rect,
    pub body: Rect,
    pub rail: Option<Rect>,
    pub composer: Option<Rect>,
    pub footer: Rect,
}

pub fn frame_layout(area: Rect, state: &AppState) -> FrameLayout {
    let composer_h = if composer_title(state).is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(composer_h),
            Constraint::Length(1),
        ])
        .split(area);

    let (body, rail) = if state.customization.show_activity_rail && chunks[2].width > RAIL_WIDTH * 2 {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(RAIL_WIDTH)])
            .split(chunks[2]);
        (cols[0], Some(cols[1]))
    } else {
        (chunks[2], None)
    };

    FrameLayout {
        header: chunks[0],
        tabs: chunks[1],
        body,
        rail,
        composer: (composer_h > 0).then_some(chunks[3]),
        footer: chunks[4],
    }
}

fn tab_title(index: usize, tab: Tab) -> String {
    format!("{} {}", (index + 1) % 10, tab.label())
}

/// Maps a click column inside the tab bar to the tab drawn there.
pub fn tab_at(state: &AppState, tabs_area: Rect, column: u16) -> Option<Tab> {
    // border, then " title " per tab, joined by a one-column divider
    let mut x = tabs_area.x.saturating_add(1);
    for (index, tab) in state.visible_tabs().iter().enumerate() {
        let width = tab_title(index, *tab).chars().count() as u16 + 2;
        if column >= x && column < x.saturating_add(width) {
            return Some(*tab);
        }
        x = x.saturating_add(width + 1);
    }
    None
}

/// Title of the composer box, or `None` when the screen takes no typed input.
pub fn composer_title(state: &AppState) -> Option<String> {
    let flow_title = |kind: FlowKind, idle: &str| {
        let flow = state.flows.get(kind);
        match flow.status {
            FlowStatus::AwaitingAnswer => "Your answer".to_string(),
            FlowStatus::Running => format!("{} is working…", kind.label()),
            _ => idle.to_string(),
        }
    };
    let title = match state.screen() {
        Screen::SimpleChat | Screen::ChatWorkspace => {
            if state.chat_busy() {
                "Waiting for the reply…".to_string()
            } else {
                format!("Message {}", state.customization.chat_provider.label())
            }
        }
        Screen::CookWizard => flow_title(FlowKind::Cook, "Describe a feature to cook"),
        Screen::Interview => flow_title(FlowKind::Interview, "What would you like to build?"),
        Screen::FixFlow => flow_title(FlowKind::Fix, "Describe the bug"),
        Screen::Brainstorm => match &state.selection.selected_brainstorm {
            Some(id) => format!("Annotate {id}"),
            None => "New idea (use #tags)".to_string(),
        },
        Screen::PlanDetail => "Add a success criterion".to_string(),
        Screen::PlansBoard => "New plan title".to_string(),
        Screen::SimpleDashboard
        | Screen::Dashboard
        | Screen::Timeline
        | Screen::Sessions
        | Screen::Activity
        | Screen::Settings => return None,
    };
    Some(title)
}

fn get_spinner() -> &'static str {
    let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let idx = (now_ms() / 100).rem_euclid(frames.len() as i64) as usize;
    frames[idx]
}

fn panel(title: impl Into<String>, palette: UiPalette) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.panel_bg))
        .title(title.into())
}

fn cursor_style(selected: bool, palette: UiPalette) -> Style {
    if selected {
        Style::default().fg(Color::Black).bg(palette.accent)
    } else {
        Style::default().fg(Color::White)
    }
}

fn text_bar(width: usize, percent: u8) -> String {
    let filled = (width * percent.min(100) as usize + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn draw(f: &mut Frame, state: &AppState) {
    let palette = palette_for(state.customization.theme);
    let layout = frame_layout(f.area(), state);

    render_header(f, layout.header, state, palette);
    render_tabs(f, layout.tabs, state, palette);
    render_screen(f, layout.body, state, palette);
    if let Some(rail) = layout.rail {
        render_activity_rail(f, rail, state, palette);
    }
    if let Some(area) = layout.composer {
        render_composer(f, area, state, palette);
    }
    render_footer(f, layout.footer, state, palette);

    render_overlay(f, state, palette);
    render_toasts(f, state, palette);
}

fn render_header(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    let project = state
        .active_project()
        .map(|project| project.name.as_str())
        .unwrap_or("no project");
    let activity = if let Some(kind) = state.live_flow() {
        format!("{} {} {}", get_spinner(), kind.label(), state.flows.get(kind).status.label())
    } else if state.chat_busy() {
        format!("{} replying", get_spinner())
    } else {
        "idle".to_string()
    };
    let text = format!(
        "Galley | {} | {} | {} mode | {} | ${:.2} · {} tokens | theme {} | {}",
        project,
        state.screen().title(),
        state.nav.mode.label(),
        state.customization.chat_provider.label(),
        state.total_cost_usd(),
        state.total_tokens(),
        state.customization.theme.label(),
        activity
    );
    let header = Paragraph::new(text)
        .style(Style::default().fg(palette.accent))
        .block(panel("Galley", palette));
    f.render_widget(header, area);
}

fn render_tabs(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    let visible = state.visible_tabs();
    let titles: Vec<Line> = visible
        .iter()
        .enumerate()
        .map(|(index, tab)| Line::from(tab_title(index, *tab)))
        .collect();
    let selected = visible.iter().position(|tab| *tab == state.nav.tab);
    let tabs = Tabs::new(titles)
        .block(panel("Navigate", palette))
        .select(selected.unwrap_or(0))
        .style(Style::default().fg(palette.muted))
        .highlight_style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn render_screen(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    match state.screen() {
        Screen::SimpleDashboard => render_simple_dashboard(f, area, state, palette),
        Screen::Dashboard => render_dashboard(f, area, state, palette),
        Screen::Interview => render_interview(f, area, state, palette),
        Screen::CookWizard => {
            let cook = state.flows.get(FlowKind::Cook);
            let mode = if state.customization.interactive_cook {
                "with questions"
            } else {
                "straight through"
            };
            render_flow(f, area, cook, &format!("Cook ({mode})"), palette);
        }
        Screen::FixFlow => render_flow(f, area, state.flows.get(FlowKind::Fix), "Fix", palette),
        Screen::SimpleChat => render_chat(f, area, state, palette),
        Screen::ChatWorkspace => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
                .split(area);
            render_chat(f, cols[0], state, palette);
            render_chat_context(f, cols[1], state, palette);
        }
        Screen::PlansBoard => render_board(f, area, state, palette),
        Screen::PlanDetail => render_plan_detail(f, area, state, palette),
        Screen::Timeline => render_timeline(f, area, state, palette),
        Screen::Sessions => render_sessions(f, area, state, palette),
        Screen::Brainstorm => render_brainstorm(f, area, state, palette),
        Screen::Activity => render_activity(f, area, state, palette),
        Screen::Settings => render_settings(f, area, state, palette),
    }
}

fn project_items<'a>(state: &'a AppState, palette: UiPalette) -> Vec<ListItem<'a>> {
    state
        .projects
        .iter()
        .enumerate()
        .map(|(idx, project)| {
            let marker = if project.active { "●" } else { "○" };
            ListItem::new(format!("{marker} {}  {}", project.name, project.path))
                .style(cursor_style(idx == state.selection.project_cursor, palette))
        })
        .collect()
}

fn plan_progress_lines(plans: &[Plan], palette: UiPalette) -> Vec<Line<'static>> {
    plans
        .iter()
        .map(|plan| {
            let percent = plan.progress_percent();
            Line::from(vec![
                Span::styled(
                    format!("{:<28}", truncate(&plan.title, 27)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(text_bar(16, percent), Style::default().fg(palette.success)),
                Span::styled(
                    format!(" {percent:>3}%  {}", plan.status.label()),
                    Style::default().fg(palette.muted),
                ),
            ])
        })
        .collect()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn render_simple_dashboard(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(state.projects.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(area);

    let welcome = vec![
        Line::from(Span::styled(
            "What are we building today?",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Press 2 for the guided interview, c for a quick cook, or 3 to chat.",
            Style::default().fg(palette.muted),
        )),
    ];
    f.render_widget(
        Paragraph::new(welcome)
            .wrap(Wrap { trim: true })
            .block(panel("Home", palette)),
        rows[0],
    );
    f.render_widget(
        List::new(project_items(state, palette)).block(panel("Projects (Enter to switch)", palette)),
        rows[1],
    );
    f.render_widget(
        Paragraph::new(plan_progress_lines(&state.plans, palette)).block(panel("Your plans", palette)),
        rows[2],
    );
}

fn render_dashboard(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(state.projects.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(cols[0]);

    f.render_widget(
        List::new(project_items(state, palette)).block(panel("Projects", palette)),
        left[0],
    );

    let running = state
        .sessions
        .iter()
        .filter(|session| session.status == SessionStatus::Running)
        .count();
    let mut stats: Vec<Line> = PlanStatus::ALL
        .iter()
        .map(|status| {
            let count = state.plans.iter().filter(|plan| plan.status == *status).count();
            Line::from(vec![
                Span::styled(format!("{:<12}", status.label()), Style::default().fg(palette.muted)),
                Span::styled(count.to_string(), Style::default().fg(palette.accent)),
            ])
        })
        .collect();
    stats.push(Line::from(""));
    stats.push(Line::from(format!(
        "Sessions      {} ({} running)",
        state.sessions.len(),
        running
    )));
    stats.push(Line::from(format!(
        "Spend         ${:.2} over {} tokens",
        state.total_cost_usd(),
        state.total_tokens()
    )));
    stats.push(Line::from(format!("Ideas         {}", state.brainstorms.len())));
    f.render_widget(Paragraph::new(stats).block(panel("Overview", palette)), left[1]);

    f.render_widget(
        Paragraph::new(plan_progress_lines(&state.plans, palette)).block(panel("Plan progress", palette)),
        cols[1],
    );
}

fn phase_stepper(flow: &FlowState, palette: UiPalette) -> Line<'static> {
    let current = flow.phase_index();
    let mut spans = Vec::new();
    for (idx, phase) in flow.kind.phases().iter().enumerate() {
        let (marker, color) = if flow.status == FlowStatus::Idle {
            ("○", palette.muted)
        } else if idx < current || flow.status == FlowStatus::Done {
            ("✓", palette.success)
        } else if idx == current {
            match flow.status {
                FlowStatus::Cancelled => ("✗", palette.danger),
                _ => ("●", palette.accent),
            }
        } else {
            ("○", palette.muted)
        };
        if idx > 0 {
            spans.push(Span::styled(" → ", Style::default().fg(palette.muted)));
        }
        spans.push(Span::styled(
            format!("{marker} {}", phase.label()),
            Style::default().fg(color),
        ));
    }
    Line::from(spans)
}

fn render_flow(f: &mut Frame, area: Rect, flow: &FlowState, title: &str, palette: UiPalette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let status_color = match flow.status {
        FlowStatus::Done => palette.success,
        FlowStatus::Cancelled => palette.danger,
        FlowStatus::AwaitingAnswer => palette.warning,
        FlowStatus::Running => palette.accent,
        FlowStatus::Idle => palette.muted,
    };
    let header = vec![
        phase_stepper(flow, palette),
        Line::from(vec![
            Span::styled("Status: ", Style::default().fg(palette.muted)),
            Span::styled(flow.status.label(), Style::default().fg(status_color)),
        ]),
    ];
    f.render_widget(Paragraph::new(header).block(panel(title.to_string(), palette)), rows[0]);

    let mut lines: Vec<Line> = flow
        .transcript
        .iter()
        .map(|entry| {
            let (who, color) = match entry.speaker {
                FlowSpeaker::Agent => ("galley", palette.success),
                FlowSpeaker::User => ("you", palette.accent),
                FlowSpeaker::System => ("system", palette.warning),
            };
            Line::from(vec![
                Span::styled(format!("[{}] ", entry.phase.label()), Style::default().fg(palette.muted)),
                Span::styled(format!("{who}: "), Style::default().fg(color)),
                Span::raw(entry.text.clone()),
            ])
        })
        .collect();
    if let Some(question) = &flow.awaiting {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("? {question}"),
            Style::default()
                .fg(palette.warning)
                .add_modifier(Modifier::BOLD),
        )));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Press i and describe what you need.",
            Style::default().fg(palette.muted),
        )));
    }
    let transcript = Paragraph::new(lines).wrap(Wrap { trim: false });
    let scroll = tail_scroll(&transcript, rows[1]);
    f.render_widget(
        transcript
            .scroll((scroll, 0))
            .block(panel("Transcript", palette)),
        rows[1],
    );
}

fn render_interview(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    let cook = state.flows.get(FlowKind::Cook);
    if cook.status == FlowStatus::Idle {
        render_flow(f, area, state.flows.get(FlowKind::Interview), "Guided interview", palette);
        return;
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    render_flow(f, rows[0], state.flows.get(FlowKind::Interview), "Guided interview", palette);
    render_flow(f, rows[1], cook, "Quick cook", palette);
}

fn render_chat(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    let theme = state.customization.theme;
    let mut lines = Vec::new();
    for (idx, message) in state.messages.iter().enumerate() {
        let selected = state.selection.message_cursor == Some(idx);
        lines.extend(message_lines(message, theme, palette, selected));
    }
    if let Some(pending) = &state.interaction.pending_reply {
        lines.push(Line::from(Span::styled(
            format!("  {} {} is typing…", get_spinner(), pending.provider.label()),
            Style::default().fg(palette.muted),
        )));
        for call in &pending.tool_calls {
            lines.push(Line::from(Span::styled(
                format!("  … {} {}", call.name, call.file.as_deref().unwrap_or("")),
                Style::default().fg(palette.warning),
            )));
        }
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No messages yet. Press i to start typing; mention files with @path.",
            Style::default().fg(palette.muted),
        )));
    }
    let chat = Paragraph::new(lines).wrap(Wrap { trim: false });
    let scroll = tail_scroll(&chat, area);
    f.render_widget(chat.scroll((scroll, 0)).block(panel("Chat", palette)), area);
}

/// Scroll offset that keeps the last wrapped row of `paragraph` inside a
/// bordered `area`.
fn tail_scroll(paragraph: &Paragraph, area: Rect) -> u16 {
    let rows = paragraph.line_count(area.width.saturating_sub(2));
    u16::try_from(rows)
        .unwrap_or(u16::MAX)
        .saturating_sub(area.height.saturating_sub(2))
}

fn render_chat_context(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Provider  ", Style::default().fg(palette.muted)),
            Span::styled(
                state.customization.chat_provider.label(),
                Style::default().fg(palette.accent),
            ),
        ]),
        Line::from(vec![
            Span::styled("Rate      ", Style::default().fg(palette.muted)),
            Span::raw(format!(
                "${:.3} / 1k tokens",
                state.customization.chat_provider.cost_per_1k_tokens()
            )),
        ]),
        Line::from(""),
        Line::from(Span::styled("Files in context", Style::default().fg(palette.muted))),
    ];
    let mut files: Vec<&str> = state
        .messages
        .iter()
        .flat_map(|message| message.tool_calls.iter())
        .filter_map(|call| call.file.as_deref())
        .collect();
    files.sort_unstable();
    files.dedup();
    if files.is_empty() {
        lines.push(Line::from("  none"));
    }
    for file in files {
        lines.push(Line::from(format!("  {file}")));
    }
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel("Context", palette)),
        area,
    );
}

fn render_board(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, COLUMN_COUNT as u32); COLUMN_COUNT])
        .split(area);
    let drag = state.board.drag.as_ref();

    for (column, status) in PlanStatus::ALL.iter().enumerate() {
        let plans = column_plans(&state.plans, *status);
        let mut items: Vec<ListItem> = plans
            .iter()
            .enumerate()
            .map(|(row, plan)| {
                let under_cursor = state.board.cursor.column == column && state.board.cursor.row == row;
                let lifted = drag.map_or(false, |drag| drag.plan == plan.id);
                let style = if lifted {
                    Style::default().fg(palette.muted).add_modifier(Modifier::DIM)
                } else {
                    cursor_style(under_cursor && drag.is_none(), palette)
                };
                ListItem::new(vec![
                    Line::from(format!("{} {}", plan.priority.label(), plan.title)),
                    Line::from(format!("  {} {}%", text_bar(10, plan.progress_percent()), plan.progress_percent())),
                ])
                .style(style)
            })
            .collect();

        let mut border = Style::default().fg(palette.border);
        if let Some(drag) = drag {
            if drag.hover == column {
                border = Style::default().fg(palette.warning);
                let title = state
                    .plan(&drag.plan)
                    .map(|plan| plan.title.as_str())
                    .unwrap_or("");
                items.push(ListItem::new(format!("⇣ drop {title} here")).style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(palette.warning),
                ));
            }
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .style(Style::default().bg(palette.panel_bg))
            .title(format!("{} ({})", status.label(), plans.len()));
        f.render_widget(List::new(items).block(block), cols[column]);
    }
}

fn render_plan_detail(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    let (Some(plan), Some(draft)) = (state.selected_plan(), state.plan_draft.as_ref()) else {
        f.render_widget(
            Paragraph::new("This plan no longer exists. Press Esc to go back.")
                .block(panel("Plan", palette)),
            area,
        );
        return;
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let dependencies: Vec<String> = plan
        .dependencies
        .iter()
        .map(|id| state.plan(id).map_or_else(|| id.to_string(), |dep| dep.title.clone()))
        .collect();
    let dirty = if draft.dirty { "  (unsaved changes: s to save, d to discard)" } else { "" };
    let summary = vec![
        Line::from(vec![
            Span::styled(
                plan.title.clone(),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(dirty, Style::default().fg(palette.warning)),
        ]),
        Line::from(format!(
            "{} · {} · revision {}",
            plan.status.label(),
            plan.priority.label(),
            plan.revision
        )),
        Line::from(format!(
            "Depends on: {}",
            if dependencies.is_empty() {
                "nothing".to_string()
            } else {
                dependencies.join(", ")
            }
        )),
    ];
    f.render_widget(Paragraph::new(summary).block(panel(format!("Plan {}", plan.id), palette)), rows[0]);

    let done = draft
        .phases
        .iter()
        .filter(|phase| phase.status == PhaseStatus::Done)
        .count();
    let percent = if draft.phases.is_empty() {
        plan.progress_percent()
    } else {
        ((done as f64 / draft.phases.len() as f64) * 100.0).round() as u8
    };
    let gauge = Gauge::default()
        .block(panel("Progress", palette))
        .gauge_style(Style::default().fg(palette.success).bg(palette.panel_bg))
        .percent(u16::from(percent));
    f.render_widget(gauge, rows[1]);

    let mut items = Vec::new();
    for (idx, phase) in draft.phases.iter().enumerate() {
        let marker = match phase.status {
            PhaseStatus::Pending => "[ ]",
            PhaseStatus::Active => "[~]",
            PhaseStatus::Done => "[x]",
        };
        let file = phase.file.as_deref().map(|file| format!("  {file}")).unwrap_or_default();
        items.push(
            ListItem::new(format!("{marker} {}{file}", phase.name))
                .style(cursor_style(draft.cursor == idx, palette)),
        );
    }
    for (idx, criterion) in draft.criteria.iter().enumerate() {
        let row = draft.phases.len() + idx;
        let marker = if criterion.met { "☑" } else { "☐" };
        let text = if criterion.text.trim().is_empty() {
            "(empty)"
        } else {
            criterion.text.as_str()
        };
        items.push(
            ListItem::new(format!("{marker} {text}")).style(cursor_style(draft.cursor == row, palette)),
        );
    }
    f.render_widget(
        List::new(items).block(panel("Phases and success criteria", palette)),
        rows[2],
    );
}

fn render_timeline(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    let bar_width = area.width.saturating_sub(TIMELINE_LABEL_WIDTH + 2);
    let bars = layout_timeline(&state.plans, bar_width);
    let lines: Vec<Line> = bars
        .iter()
        .filter_map(|bar| state.plan(&bar.plan).map(|plan| (plan, bar)))
        .map(|(plan, bar)| {
            let empty = bar.width.saturating_sub(bar.filled);
            Line::from(vec![
                Span::styled(
                    format!(
                        "{:<width$}",
                        truncate(&plan.title, TIMELINE_LABEL_WIDTH as usize - 1),
                        width = TIMELINE_LABEL_WIDTH as usize
                    ),
                    Style::default().fg(Color::White),
                ),
                Span::raw(" ".repeat(bar.offset as usize)),
                Span::styled("█".repeat(bar.filled as usize), Style::default().fg(palette.success)),
                Span::styled("▒".repeat(empty as usize), Style::default().fg(palette.accent_alt)),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines).block(panel("Timeline (one unit per phase)", palette)),
        area,
    );
}

fn render_sessions(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(state.sessions.len().max(1) as u16 + 2),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let items: Vec<ListItem> = state
        .sessions
        .iter()
        .enumerate()
        .map(|(idx, session)| {
            ListItem::new(format!(
                "{:<10} {:<8} {:<10} {:>3}%  {:>8} tok  ${:.3}",
                session.id.as_str(),
                session.provider.label(),
                session.status.label(),
                session.progress,
                session.tokens,
                session.cost_usd
            ))
            .style(cursor_style(idx == state.selection.session_cursor, palette))
        })
        .collect();
    let title = format!(
        "Sessions · ${:.2} total · n to add one",
        state.total_cost_usd()
    );
    f.render_widget(List::new(items).block(panel(title, palette)), rows[0]);

    let Some(session) = state.sessions.get(state.selection.session_cursor) else {
        return;
    };
    let color = match session.status {
        SessionStatus::Running => palette.accent,
        SessionStatus::Completed => palette.success,
        SessionStatus::Paused => palette.warning,
        SessionStatus::Idle => palette.muted,
    };
    let gauge = Gauge::default()
        .block(panel(format!("{} progress", session.id), palette))
        .gauge_style(Style::default().fg(color).bg(palette.panel_bg))
        .percent(u16::from(session.progress.min(100)));
    f.render_widget(gauge, rows[1]);

    let height = rows[2].height.saturating_sub(2) as usize;
    let start = session.output.len().saturating_sub(height);
    let lines: Vec<Line> = session.output[start..]
        .iter()
        .map(|line| Line::from(format!("› {line}")))
        .collect();
    f.render_widget(Paragraph::new(lines).block(panel("Output", palette)), rows[2]);
}

fn render_brainstorm(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
        .split(area);

    let items: Vec<ListItem> = state
        .brainstorms
        .iter()
        .enumerate()
        .map(|(idx, report)| {
            let pinned = state.selection.selected_brainstorm.as_ref() == Some(&report.id);
            let marker = if pinned { "✎" } else { " " };
            ListItem::new(format!("{marker} {} [{}]", report.title, report.status.label()))
                .style(cursor_style(idx == state.selection.brainstorm_cursor, palette))
        })
        .collect();
    f.render_widget(List::new(items).block(panel("Ideas", palette)), cols[0]);

    let Some(report) = state.brainstorms.get(state.selection.brainstorm_cursor) else {
        f.render_widget(
            Paragraph::new("No ideas yet. Press i and write one down.")
                .block(panel("Idea", palette)),
            cols[1],
        );
        return;
    };
    let mut lines = vec![
        Line::from(Span::styled(
            report.title.clone(),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "{} · {}",
            report.status.label(),
            if report.tags.is_empty() {
                "no tags".to_string()
            } else {
                report
                    .tags
                    .iter()
                    .map(|tag| format!("#{tag}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            }
        )),
    ];
    if let Some(plan) = report.plan.as_ref() {
        let title = state.plan(plan).map_or_else(|| plan.to_string(), |plan| plan.title.clone());
        lines.push(Line::from(Span::styled(
            format!("→ plan: {title}"),
            Style::default().fg(palette.success),
        )));
    }
    lines.push(Line::from(""));
    lines.extend(report.content.lines().map(|line| Line::from(line.to_string())));
    if !report.annotations.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Notes", Style::default().fg(palette.muted))));
        for note in &report.annotations {
            lines.push(Line::from(format!(
                "  {} {}",
                note.created_at.format("%b %d"),
                note.text
            )));
        }
    }
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(panel(format!("Idea {}", report.id), palette)),
        cols[1],
    );
}

fn activity_lines(state: &AppState, palette: UiPalette, limit: usize) -> Vec<Line<'static>> {
    state
        .activity
        .iter()
        .rev()
        .take(limit)
        .map(|item| {
            Line::from(vec![
                Span::styled(
                    format!("{} ", item.timestamp.format("%H:%M:%S")),
                    Style::default().fg(palette.muted),
                ),
                Span::styled(
                    format!("{:<10} ", item.kind.label()),
                    Style::default().fg(palette.accent_alt),
                ),
                Span::raw(item.message.clone()),
            ])
        })
        .collect()
}

fn render_activity(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    let lines = activity_lines(state, palette, area.height.saturating_sub(2) as usize);
    f.render_widget(
        Paragraph::new(lines).block(panel(format!("Activity ({})", state.activity.len()), palette)),
        area,
    );
}

fn render_activity_rail(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    let lines: Vec<Line> = state
        .activity
        .iter()
        .rev()
        .take(area.height.saturating_sub(2) as usize)
        .map(|item| {
            Line::from(vec![
                Span::styled(
                    format!("{} ", item.timestamp.format("%H:%M")),
                    Style::default().fg(palette.muted),
                ),
                Span::raw(item.message.clone()),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel("Recent", palette)),
        area,
    );
}

fn settings_value(state: &AppState, row: SettingsRow) -> String {
    let on_off = |flag: bool| String::from(if flag { "on" } else { "off" });
    match row {
        SettingsRow::Mode => state.nav.mode.label().to_string(),
        SettingsRow::Theme => state.customization.theme.label().to_string(),
        SettingsRow::Keymap => format!(
            "{} (palette: {})",
            state.customization.keymap_preset.label(),
            palette_hint(state.customization.keymap_preset)
        ),
        SettingsRow::ActivityRail => on_off(state.customization.show_activity_rail),
        SettingsRow::ChatProvider => state.customization.chat_provider.label().to_string(),
        SettingsRow::InteractiveCook => on_off(state.customization.interactive_cook),
        SettingsRow::Onboarding => {
            if state.onboarding_complete {
                "completed".to_string()
            } else {
                "not finished".to_string()
            }
        }
    }
}

fn render_settings(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    let items: Vec<ListItem> = SettingsRow::ALL
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            ListItem::new(format!("{:<20} {}", row.label(), settings_value(state, *row)))
                .style(cursor_style(idx == state.selection.settings_cursor, palette))
        })
        .collect();
    f.render_widget(
        List::new(items).block(panel("Settings (Enter to change)", palette)),
        area,
    );
}

fn render_composer(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    let focused = state.interaction.focus == Focus::Composer;
    let title = composer_title(state).unwrap_or_default();
    let border = if focused { palette.accent } else { palette.border };
    let text = if focused {
        format!("> {}█", state.interaction.composer)
    } else if state.interaction.composer.is_empty() {
        "press i to type".to_string()
    } else {
        format!("> {}", state.interaction.composer)
    };
    let style = if focused {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(palette.muted)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(palette.panel_bg))
        .title(title);
    f.render_widget(Paragraph::new(text).style(style).block(block), area);
}

fn render_footer(f: &mut Frame, area: Rect, state: &AppState, palette: UiPalette) {
    let hint = palette_hint(state.customization.keymap_preset);
    let mode_hint = match state.nav.mode {
        UserMode::Simple => "m advanced",
        UserMode::Advanced => "m simple",
    };
    let text = Line::from(vec![
        Span::styled(hint, Style::default().fg(palette.accent)),
        Span::styled(" palette  ", Style::default().fg(palette.muted)),
        Span::styled("i", Style::default().fg(palette.accent)),
        Span::styled(" type  ", Style::default().fg(palette.muted)),
        Span::styled("?", Style::default().fg(palette.accent)),
        Span::styled(" help  ", Style::default().fg(palette.muted)),
        Span::styled(mode_hint, Style::default().fg(palette.muted)),
        Span::styled("  q", Style::default().fg(palette.warning)),
        Span::styled(" quit", Style::default().fg(palette.muted)),
    ]);
    f.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

fn render_overlay(f: &mut Frame, state: &AppState, palette: UiPalette) {
    match &state.interaction.overlay {
        Overlay::None => {}
        Overlay::CommandPalette { selected, query } => {
            render_command_palette(f, selected, query, palette)
        }
        Overlay::Onboarding { step } => render_onboarding(f, *step, palette),
        Overlay::QuickCook { input, error } => {
            let area = centered_rect(60, 25, f.area());
            f.render_widget(Clear, area);
            let mut lines = vec![
                Line::from(Span::styled(
                    "Describe the feature and Galley will cook a plan.",
                    Style::default().fg(palette.muted),
                )),
                Line::from(""),
                Line::from(Span::styled(format!("> {input}█"), Style::default().fg(palette.accent))),
            ];
            if let Some(error) = error {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    error.clone(),
                    Style::default().fg(palette.danger),
                )));
            }
            f.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .block(panel("Quick cook (Enter to start, Esc to close)", palette)),
                area,
            );
        }
        Overlay::ConfirmDeleteReport { report } => {
            let area = centered_rect(50, 20, f.area());
            f.render_widget(Clear, area);
            let title = state
                .report(report)
                .map(|report| report.title.as_str())
                .unwrap_or("this idea");
            let text = vec![
                Line::from(format!("Delete \"{title}\"?")),
                Line::from(""),
                Line::from(Span::styled(
                    "y / Enter to delete, n / Esc to keep it",
                    Style::default().fg(palette.muted),
                )),
            ];
            f.render_widget(
                Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .block(panel("Confirm", palette).border_style(Style::default().fg(palette.danger))),
                area,
            );
        }
        Overlay::Help => {
            let area = centered_rect(70, 70, f.area());
            f.render_widget(Clear, area);
            let lines: Vec<Line> = help_rows(state.customization.keymap_preset)
                .into_iter()
                .map(|(keys, what)| {
                    Line::from(vec![
                        Span::styled(format!("{keys:<18}"), Style::default().fg(palette.accent)),
                        Span::raw(what),
                    ])
                })
                .collect();
            f.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .block(panel("Keyboard shortcuts", palette)),
                area,
            );
        }
    }
}

fn render_command_palette(f: &mut Frame, selected: &usize, query: &str, palette: UiPalette) {
    let area = centered_rect(60, 50, f.area());
    f.render_widget(Clear, area);

    let block = panel("Command palette", palette);
    f.render_widget(block.clone(), area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(block.inner(area));

    let input = Paragraph::new(format!("> {query}")).style(Style::default().fg(palette.accent));
    f.render_widget(input, layout[0]);

    let filtered_indices = filtered_palette_indices(query);
    if filtered_indices.is_empty() {
        f.render_widget(
            Paragraph::new("No matching commands").style(Style::default().fg(palette.muted)),
            layout[1],
        );
        return;
    }
    let visible = layout[1].height as usize;
    let first = selected.saturating_sub(visible.saturating_sub(1));
    let items: Vec<ListItem> = filtered_indices
        .iter()
        .enumerate()
        .skip(first)
        .map(|(i, &idx)| {
            let item = &PALETTE_ITEMS[idx];
            let style = cursor_style(i == *selected, palette);
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<34}", item.label)),
                Span::styled(item.category, Style::default().fg(palette.muted)),
            ]))
            .style(style)
        })
        .collect();
    f.render_widget(List::new(items), layout[1]);
}

fn render_onboarding(f: &mut Frame, step: usize, palette: UiPalette) {
    let area = centered_rect(60, 40, f.area());
    f.render_widget(Clear, area);
    let step = step.min(ONBOARDING_STEPS - 1);
    let (title, body) = ONBOARDING_PAGES[step];
    let dots: String = (0..ONBOARDING_STEPS)
        .map(|idx| if idx == step { '●' } else { '○' })
        .collect();
    let next = if step + 1 == ONBOARDING_STEPS { "finish" } else { "next" };
    let lines = vec![
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(body),
        Line::from(""),
        Line::from(Span::styled(dots, Style::default().fg(palette.accent_alt))),
        Line::from(Span::styled(
            format!("→ / Enter {next}   ← back   Esc skip"),
            Style::default().fg(palette.muted),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .block(panel(format!("Getting started {}/{}", step + 1, ONBOARDING_STEPS), palette)),
        area,
    );
}

fn render_toasts(f: &mut Frame, state: &AppState, palette: UiPalette) {
    let screen = f.area();
    let width = 44.min(screen.width);
    for (idx, toast) in state.toasts.iter().rev().enumerate() {
        let y = screen.y + 1 + (idx as u16) * 3;
        if y + 3 > screen.bottom() {
            break;
        }
        let area = Rect::new(screen.right().saturating_sub(width + 1), y, width, 3);
        let color = match toast.level {
            ToastLevel::Info => palette.accent,
            ToastLevel::Success => palette.success,
            ToastLevel::Error => palette.danger,
        };
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(toast.text.clone()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .style(Style::default().bg(palette.panel_bg)),
            ),
            area,
        );
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
