use std::collections::VecDeque;

use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::draft::PlanDraft;
use crate::flow::FlowKind;
use crate::flow::Flows;
use crate::kanban::BoardState;
use crate::model::ActivityId;
use crate::model::ActivityItem;
use crate::model::ActivityKind;
use crate::model::BrainstormReport;
use crate::model::Message;
use crate::model::Plan;
use crate::model::PlanId;
use crate::model::Project;
use crate::model::Provider;
use crate::model::ReportId;
use crate::model::Session;
use crate::model::SessionId;
use crate::model::ToolCall;
use crate::router::next_tab_from;
use crate::router::prev_tab_from;
use crate::router::resolve_screen;
use crate::router::Screen;
use crate::router::Tab;
use crate::router::UserMode;
use crate::seed;

pub const ONBOARDING_STEPS: usize = 4;
pub const MAX_TOASTS: usize = 4;
pub const ACTIVITY_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UiTheme {
    Classic,
    Cyberpunk,
    NeonNoir,
    SolarFlare,
    ForestZen,
}

impl UiTheme {
    pub fn label(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Cyberpunk => "cyberpunk",
            Self::NeonNoir => "neon-noir",
            Self::SolarFlare => "solar-flare",
            Self::ForestZen => "forest-zen",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Classic => Self::Cyberpunk,
            Self::Cyberpunk => Self::NeonNoir,
            Self::NeonNoir => Self::SolarFlare,
            Self::SolarFlare => Self::ForestZen,
            Self::ForestZen => Self::Classic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeymapPreset {
    Standard,
    Mac,
    Windows,
}

impl KeymapPreset {
    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Mac => "mac",
            Self::Windows => "windows",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Standard => Self::Mac,
            Self::Mac => Self::Windows,
            Self::Windows => Self::Standard,
        }
    }

    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::Mac
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Standard
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    CommandPalette { selected: usize, query: String },
    Onboarding { step: usize },
    QuickCook { input: String, error: Option<String> },
    ConfirmDeleteReport { report: ReportId },
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Navigation,
    Composer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub text: String,
    pub expires_at_ms: i64,
}

/// Assistant reply in flight; its tool calls render as running until it lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub run_id: u64,
    pub provider: Provider,
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone)]
pub struct Navigation {
    pub tab: Tab,
    pub selected_plan: Option<PlanId>,
    pub mode: UserMode,
}

#[derive(Debug, Clone)]
pub struct Interaction {
    pub overlay: Overlay,
    pub focus: Focus,
    pub composer: String,
    pub pending_reply: Option<PendingReply>,
    pub next_chat_run_id: u64,
}

#[derive(Debug, Clone)]
pub struct Customization {
    pub theme: UiTheme,
    pub keymap_preset: KeymapPreset,
    pub show_activity_rail: bool,
    pub chat_provider: Provider,
    pub interactive_cook: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub selected_brainstorm: Option<ReportId>,
    pub brainstorm_cursor: usize,
    pub session_cursor: usize,
    pub message_cursor: Option<usize>,
    pub project_cursor: usize,
    pub settings_cursor: usize,
}

#[derive(Debug, Clone)]
pub struct ActivityLog {
    cap: usize,
    buf: VecDeque<ActivityItem>,
}

impl ActivityLog {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            buf: VecDeque::with_capacity(cap),
        }
    }

    /// Appends `item`, evicting the oldest entries past the cap. A cap of
    /// zero keeps nothing.
    pub fn append(&mut self, item: ActivityItem) {
        if self.cap == 0 {
            return;
        }
        while self.buf.len() >= self.cap {
            self.buf.pop_front();
        }
        self.buf.push_back(item);
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ActivityItem> {
        self.buf.iter()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/// Monotonic id source; ids are never reused within one store.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdGenerator {
    pub fn next(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}-{}", self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub project_name: String,
    pub mode: UserMode,
    pub theme: UiTheme,
    pub keymap_preset: KeymapPreset,
    pub onboarding_complete: bool,
    pub toast_ttl_ms: i64,
    pub seed: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            project_name: "galley".to_string(),
            mode: UserMode::Advanced,
            theme: UiTheme::Classic,
            keymap_preset: KeymapPreset::platform_default(),
            onboarding_complete: true,
            toast_ttl_ms: 3_000,
            seed: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub nav: Navigation,
    pub interaction: Interaction,
    pub customization: Customization,
    pub selection: Selection,
    pub projects: Vec<Project>,
    pub plans: Vec<Plan>,
    pub sessions: Vec<Session>,
    pub messages: Vec<Message>,
    pub brainstorms: Vec<BrainstormReport>,
    pub activity: ActivityLog,
    pub flows: Flows,
    pub board: BoardState,
    pub plan_draft: Option<PlanDraft>,
    pub toasts: VecDeque<Toast>,
    pub onboarding_complete: bool,
    pub toast_ttl_ms: i64,
    pub ids: IdGenerator,
    next_toast_id: u64,
}

impl AppState {
    pub fn new(options: StoreOptions) -> Self {
        let mut state = Self {
            nav: Navigation {
                tab: Tab::Dashboard,
                selected_plan: None,
                mode: options.mode,
            },
            interaction: Interaction {
                overlay: if options.onboarding_complete {
                    Overlay::None
                } else {
                    Overlay::Onboarding { step: 0 }
                },
                focus: Focus::Navigation,
                composer: String::new(),
                pending_reply: None,
                next_chat_run_id: 1,
            },
            customization: Customization {
                theme: options.theme,
                keymap_preset: options.keymap_preset,
                show_activity_rail: true,
                chat_provider: Provider::Claude,
                interactive_cook: true,
            },
            selection: Selection::default(),
            projects: Vec::new(),
            plans: Vec::new(),
            sessions: Vec::new(),
            messages: Vec::new(),
            brainstorms: Vec::new(),
            activity: ActivityLog::new(ACTIVITY_CAPACITY),
            flows: Flows::default(),
            board: BoardState::default(),
            plan_draft: None,
            toasts: VecDeque::new(),
            onboarding_complete: options.onboarding_complete,
            toast_ttl_ms: options.toast_ttl_ms,
            ids: IdGenerator::default(),
            next_toast_id: 1,
        };
        if options.seed {
            seed::seed_workspace(&mut state, &options.project_name);
        }
        state
    }

    pub fn screen(&self) -> Screen {
        resolve_screen(self.nav.tab, self.nav.selected_plan.as_ref(), self.nav.mode)
    }

    pub fn visible_tabs(&self) -> &'static [Tab] {
        self.nav.mode.visible_tabs()
    }

    pub fn next_tab(&self) -> Tab {
        next_tab_from(self.nav.tab, self.visible_tabs())
    }

    pub fn prev_tab(&self) -> Tab {
        prev_tab_from(self.nav.tab, self.visible_tabs())
    }

    pub fn plan(&self, id: &PlanId) -> Option<&Plan> {
        self.plans.iter().find(|plan| &plan.id == id)
    }

    pub fn plan_mut(&mut self, id: &PlanId) -> Option<&mut Plan> {
        self.plans.iter_mut().find(|plan| &plan.id == id)
    }

    pub fn selected_plan(&self) -> Option<&Plan> {
        self.nav
            .selected_plan
            .as_ref()
            .and_then(|id| self.plan(id))
    }

    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|session| &session.id == id)
    }

    pub fn session_mut(&mut self, id: &SessionId) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|session| &session.id == id)
    }

    pub fn report(&self, id: &ReportId) -> Option<&BrainstormReport> {
        self.brainstorms.iter().find(|report| &report.id == id)
    }

    pub fn report_mut(&mut self, id: &ReportId) -> Option<&mut BrainstormReport> {
        self.brainstorms.iter_mut().find(|report| &report.id == id)
    }

    pub fn active_project(&self) -> Option<&Project> {
        self.projects.iter().find(|project| project.active)
    }

    pub fn chat_busy(&self) -> bool {
        self.interaction.pending_reply.is_some()
    }

    pub fn live_flow(&self) -> Option<FlowKind> {
        FlowKind::ALL
            .into_iter()
            .find(|kind| self.flows.get(*kind).status.is_live())
    }

    pub fn total_cost_usd(&self) -> f64 {
        self.sessions.iter().map(|session| session.cost_usd).sum()
    }

    pub fn total_tokens(&self) -> u64 {
        self.sessions.iter().map(|session| session.tokens).sum()
    }

    pub fn record_activity(&mut self, kind: ActivityKind, message: impl Into<String>) {
        let id = ActivityId::new(self.ids.next("act"));
        self.activity.append(ActivityItem {
            id,
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn push_toast(&mut self, level: ToastLevel, text: impl Into<String>, now_ms: i64) {
        let id = self.next_toast_id;
        self.next_toast_id = self.next_toast_id.saturating_add(1);
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            id,
            level,
            text: text.into(),
            expires_at_ms: now_ms.saturating_add(self.toast_ttl_ms),
        });
    }
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
