use crate::flow::FlowKind;
use crate::flow::FlowPhase;
use crate::model::ActivityKind;
use crate::model::BrainstormPatch;
use crate::model::NewBrainstormReport;
use crate::model::NewMessage;
use crate::model::PlanId;
use crate::model::PlanStatus;
use crate::model::ProjectId;
use crate::model::Provider;
use crate::model::ReportId;
use crate::model::SessionId;
use crate::model::SessionPatch;
use crate::router::Tab;
use crate::router::UserMode;
use crate::state::Focus;
use crate::state::KeymapPreset;
use crate::state::ToastLevel;
use crate::state::UiTheme;

#[derive(Debug, Clone)]
pub enum AppAction {
    User(UserAction),
    Runtime(RuntimeAction),
}

#[derive(Debug, Clone)]
pub enum UserAction {
    // navigation
    SetActiveTab(Tab),
    NextTab,
    PrevTab,
    SetSelectedPlan(Option<PlanId>),
    SetUserMode(UserMode),
    ToggleUserMode,
    SetActiveProject(ProjectId),
    MoveSelection(isize),
    ActivateSelection,

    // overlays
    ToggleCommandPalette,
    ShowHelp,
    OpenQuickCook,
    CloseOverlay,
    OverlayMoveUp,
    OverlayMoveDown,
    OverlayQueryInput(char),
    OverlayQueryBackspace,
    OverlayQueryPaste(String),
    OverlaySubmit,

    // onboarding
    ShowOnboarding,
    NextOnboardingStep,
    PrevOnboardingStep,
    SkipOnboarding,
    SetOnboardingComplete(bool),

    // composer
    SetFocus(Focus),
    ComposerInput(char),
    ComposerBackspace,
    ComposerPaste(String),
    ComposerSubmit,

    // chat
    AddMessage(NewMessage),
    SubmitChat(String),
    CycleChatProvider,
    CopySelectedMessage,

    // flows
    StartFlow {
        kind: FlowKind,
        brief: String,
        interactive: bool,
    },
    AnswerFlow {
        kind: FlowKind,
        answer: String,
    },
    CancelFlow(FlowKind),
    ResetFlow(FlowKind),
    ToggleInteractiveCook,

    // plans and board
    CreatePlan {
        title: String,
    },
    SetPlanStatus {
        plan: PlanId,
        status: PlanStatus,
    },
    MoveBoardCursor {
        columns: isize,
        rows: isize,
    },
    BeginDrag,
    DragLeft,
    DragRight,
    Drop,
    CancelDrag,
    ExportPlan(PlanId),

    // plan detail draft
    TogglePhase(usize),
    ToggleCriterion(usize),
    AddCriterion(String),
    SavePlanDraft,
    DiscardPlanDraft,
    OpenSelectedFile,
    OpenInIde {
        file: String,
    },

    // sessions
    AddSession(Provider),
    UpdateSession {
        id: SessionId,
        patch: SessionPatch,
    },
    StartSession(SessionId),
    PauseSession(SessionId),
    ResumeSession(SessionId),
    StopSession(SessionId),

    // brainstorm
    AddBrainstormReport(NewBrainstormReport),
    UpdateBrainstormReport {
        id: ReportId,
        patch: BrainstormPatch,
    },
    RequestDeleteReport(ReportId),
    DeleteBrainstormReport(ReportId),
    SelectBrainstorm(Option<ReportId>),
    AnnotateBrainstorm {
        id: ReportId,
        text: String,
    },
    AdvanceBrainstormStatus(ReportId),
    PromoteBrainstormToPlan(ReportId),

    // customization
    SetTheme(UiTheme),
    CycleTheme,
    SetKeymapPreset(KeymapPreset),
    CycleKeymapPreset,
    ToggleActivityRail,

    Quit,
}

#[derive(Debug, Clone)]
pub enum RuntimeAction {
    FlowStep {
        kind: FlowKind,
        run_id: u64,
        phase: FlowPhase,
        text: String,
    },
    FlowQuestion {
        kind: FlowKind,
        run_id: u64,
        prompt: String,
    },
    ChatReply {
        run_id: u64,
        content: String,
    },
    /// One step of a running session; `advance` is in percentage points.
    SessionTick {
        session: SessionId,
        tokens: u64,
        advance: u8,
        line: String,
    },
    AppendActivity {
        kind: ActivityKind,
        message: String,
    },
    PushToast {
        level: ToastLevel,
        text: String,
    },
    ExpireToasts {
        now_ms: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    Mode,
    Theme,
    Keymap,
    ActivityRail,
    ChatProvider,
    InteractiveCook,
    Onboarding,
}

impl SettingsRow {
    pub const ALL: [SettingsRow; 7] = [
        SettingsRow::Mode,
        SettingsRow::Theme,
        SettingsRow::Keymap,
        SettingsRow::ActivityRail,
        SettingsRow::ChatProvider,
        SettingsRow::InteractiveCook,
        SettingsRow::Onboarding,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Mode => "Mode",
            Self::Theme => "Theme",
            Self::Keymap => "Keymap",
            Self::ActivityRail => "Activity rail",
            Self::ChatProvider => "Chat provider",
            Self::InteractiveCook => "Interactive cook",
            Self::Onboarding => "Replay onboarding",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteCommand {
    QuickCook,
    GoTo(Tab),
    SetUserMode(UserMode),
    SetTheme(UiTheme),
    CycleTheme,
    SetKeymapPreset(KeymapPreset),
    ToggleActivityRail,
    NewSession,
    NewBrainstorm,
    CopySelectedMessage,
    ShowOnboarding,
    ShowHelp,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteItem {
    pub label: &'static str,
    pub category: &'static str,
    pub command: PaletteCommand,
}

pub const PALETTE_ITEMS: &[PaletteItem] = &[
    PaletteItem {
        label: "Quick cook",
        category: "Cook",
        command: PaletteCommand::QuickCook,
    },
    PaletteItem {
        label: "Open the wizard",
        category: "Cook",
        command: PaletteCommand::GoTo(Tab::Wizard),
    },
    PaletteItem {
        label: "Go to dashboard",
        category: "Navigation",
        command: PaletteCommand::GoTo(Tab::Dashboard),
    },
    PaletteItem {
        label: "Go to chat",
        category: "Navigation",
        command: PaletteCommand::GoTo(Tab::Chat),
    },
    PaletteItem {
        label: "Go to plans",
        category: "Navigation",
        command: PaletteCommand::GoTo(Tab::Plans),
    },
    PaletteItem {
        label: "Go to timeline",
        category: "Navigation",
        command: PaletteCommand::GoTo(Tab::Timeline),
    },
    PaletteItem {
        label: "Go to sessions",
        category: "Navigation",
        command: PaletteCommand::GoTo(Tab::Sessions),
    },
    PaletteItem {
        label: "Go to brainstorm",
        category: "Navigation",
        command: PaletteCommand::GoTo(Tab::Brainstorm),
    },
    PaletteItem {
        label: "Fix a bug",
        category: "Navigation",
        command: PaletteCommand::GoTo(Tab::Fix),
    },
    PaletteItem {
        label: "Go to activity",
        category: "Navigation",
        command: PaletteCommand::GoTo(Tab::Activity),
    },
    PaletteItem {
        label: "Go to settings",
        category: "Navigation",
        command: PaletteCommand::GoTo(Tab::Settings),
    },
    PaletteItem {
        label: "Simple mode",
        category: "Mode",
        command: PaletteCommand::SetUserMode(UserMode::Simple),
    },
    PaletteItem {
        label: "Advanced mode",
        category: "Mode",
        command: PaletteCommand::SetUserMode(UserMode::Advanced),
    },
    PaletteItem {
        label: "Theme: Classic",
        category: "Appearance",
        command: PaletteCommand::SetTheme(UiTheme::Classic),
    },
    PaletteItem {
        label: "Theme: Cyberpunk",
        category: "Appearance",
        command: PaletteCommand::SetTheme(UiTheme::Cyberpunk),
    },
    PaletteItem {
        label: "Theme: Neon Noir",
        category: "Appearance",
        command: PaletteCommand::SetTheme(UiTheme::NeonNoir),
    },
    PaletteItem {
        label: "Theme: Solar Flare",
        category: "Appearance",
        command: PaletteCommand::SetTheme(UiTheme::SolarFlare),
    },
    PaletteItem {
        label: "Theme: Forest Zen",
        category: "Appearance",
        command: PaletteCommand::SetTheme(UiTheme::ForestZen),
    },
    PaletteItem {
        label: "Switch theme",
        category: "Appearance",
        command: PaletteCommand::CycleTheme,
    },
    PaletteItem {
        label: "Toggle activity rail",
        category: "Appearance",
        command: PaletteCommand::ToggleActivityRail,
    },
    PaletteItem {
        label: "Keymap: Standard",
        category: "Keyboard",
        command: PaletteCommand::SetKeymapPreset(KeymapPreset::Standard),
    },
    PaletteItem {
        label: "Keymap: Mac",
        category: "Keyboard",
        command: PaletteCommand::SetKeymapPreset(KeymapPreset::Mac),
    },
    PaletteItem {
        label: "Keymap: Windows",
        category: "Keyboard",
        command: PaletteCommand::SetKeymapPreset(KeymapPreset::Windows),
    },
    PaletteItem {
        label: "New session",
        category: "Sessions",
        command: PaletteCommand::NewSession,
    },
    PaletteItem {
        label: "New idea",
        category: "Brainstorm",
        command: PaletteCommand::NewBrainstorm,
    },
    PaletteItem {
        label: "Copy selected message",
        category: "Chat",
        command: PaletteCommand::CopySelectedMessage,
    },
    PaletteItem {
        label: "Show onboarding guide",
        category: "Help",
        command: PaletteCommand::ShowOnboarding,
    },
    PaletteItem {
        label: "Keyboard shortcuts",
        category: "Help",
        command: PaletteCommand::ShowHelp,
    },
    PaletteItem {
        label: "Quit Galley",
        category: "App",
        command: PaletteCommand::Quit,
    },
];

/// Indices into [`PALETTE_ITEMS`] whose label or category contains `query`.
pub fn filtered_palette_indices(query: &str) -> Vec<usize> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return (0..PALETTE_ITEMS.len()).collect();
    }

    PALETTE_ITEMS
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            if item.label.to_lowercase().contains(&query)
                || item.category.to_lowercase().contains(&query)
            {
                Some(idx)
            } else {
                None
            }
        })
        .collect()
}
