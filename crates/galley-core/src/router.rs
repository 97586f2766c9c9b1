use serde::Deserialize;
use serde::Serialize;

use crate::flow::FlowKind;
use crate::model::PlanId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Dashboard,
    Wizard,
    Chat,
    Plans,
    Timeline,
    Sessions,
    Brainstorm,
    Fix,
    Activity,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 10] = [
        Tab::Dashboard,
        Tab::Wizard,
        Tab::Chat,
        Tab::Plans,
        Tab::Timeline,
        Tab::Sessions,
        Tab::Brainstorm,
        Tab::Fix,
        Tab::Activity,
        Tab::Settings,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Wizard => "wizard",
            Self::Chat => "chat",
            Self::Plans => "plans",
            Self::Timeline => "timeline",
            Self::Sessions => "sessions",
            Self::Brainstorm => "brainstorm",
            Self::Fix => "fix",
            Self::Activity => "activity",
            Self::Settings => "settings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Wizard => "Wizard",
            Self::Chat => "Chat",
            Self::Plans => "Plans",
            Self::Timeline => "Timeline",
            Self::Sessions => "Sessions",
            Self::Brainstorm => "Brainstorm",
            Self::Fix => "Fix",
            Self::Activity => "Activity",
            Self::Settings => "Settings",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|tab| tab.id() == needle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserMode {
    Simple,
    Advanced,
}

impl UserMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Advanced => "advanced",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Simple => Self::Advanced,
            Self::Advanced => Self::Simple,
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "simple" => Some(Self::Simple),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }

    pub fn visible_tabs(self) -> &'static [Tab] {
        match self {
            Self::Simple => SIMPLE_TAB_ORDER,
            Self::Advanced => ADVANCED_TAB_ORDER,
        }
    }
}

const SIMPLE_TAB_ORDER: &[Tab] = &[
    Tab::Dashboard,
    Tab::Wizard,
    Tab::Chat,
    Tab::Plans,
    Tab::Brainstorm,
    Tab::Settings,
];

const ADVANCED_TAB_ORDER: &[Tab] = &Tab::ALL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    SimpleDashboard,
    Dashboard,
    Interview,
    CookWizard,
    SimpleChat,
    ChatWorkspace,
    PlansBoard,
    PlanDetail,
    Timeline,
    Sessions,
    Brainstorm,
    FixFlow,
    Activity,
    Settings,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Self::SimpleDashboard => "Home",
            Self::Dashboard => "Dashboard",
            Self::Interview => "Guided interview",
            Self::CookWizard => "Cook",
            Self::SimpleChat => "Chat",
            Self::ChatWorkspace => "Chat workspace",
            Self::PlansBoard => "Plans",
            Self::PlanDetail => "Plan detail",
            Self::Timeline => "Timeline",
            Self::Sessions => "Sessions",
            Self::Brainstorm => "Brainstorm",
            Self::FixFlow => "Fix",
            Self::Activity => "Activity",
            Self::Settings => "Settings",
        }
    }

    /// Flows whose timers belong to this screen. The simple-mode interview
    /// also shows a quick-cook run, so it owns both.
    pub fn hosted_flows(self) -> &'static [FlowKind] {
        match self {
            Self::CookWizard => &[FlowKind::Cook],
            Self::Interview => &[FlowKind::Interview, FlowKind::Cook],
            Self::FixFlow => &[FlowKind::Fix],
            _ => &[],
        }
    }
}

struct RouteEntry {
    tab: Tab,
    simple: Screen,
    advanced: Screen,
}

const ROUTES: &[RouteEntry] = &[
    RouteEntry {
        tab: Tab::Dashboard,
        simple: Screen::SimpleDashboard,
        advanced: Screen::Dashboard,
    },
    RouteEntry {
        tab: Tab::Wizard,
        simple: Screen::Interview,
        advanced: Screen::CookWizard,
    },
    RouteEntry {
        tab: Tab::Chat,
        simple: Screen::SimpleChat,
        advanced: Screen::ChatWorkspace,
    },
    RouteEntry {
        tab: Tab::Plans,
        simple: Screen::PlansBoard,
        advanced: Screen::PlansBoard,
    },
    RouteEntry {
        tab: Tab::Timeline,
        simple: Screen::Timeline,
        advanced: Screen::Timeline,
    },
    RouteEntry {
        tab: Tab::Sessions,
        simple: Screen::Sessions,
        advanced: Screen::Sessions,
    },
    RouteEntry {
        tab: Tab::Brainstorm,
        simple: Screen::Brainstorm,
        advanced: Screen::Brainstorm,
    },
    RouteEntry {
        tab: Tab::Fix,
        simple: Screen::FixFlow,
        advanced: Screen::FixFlow,
    },
    RouteEntry {
        tab: Tab::Activity,
        simple: Screen::Activity,
        advanced: Screen::Activity,
    },
    RouteEntry {
        tab: Tab::Settings,
        simple: Screen::Settings,
        advanced: Screen::Settings,
    },
];

fn default_screen(mode: UserMode) -> Screen {
    match mode {
        UserMode::Simple => Screen::SimpleDashboard,
        UserMode::Advanced => Screen::Dashboard,
    }
}

pub fn resolve_screen(tab: Tab, selected_plan: Option<&PlanId>, mode: UserMode) -> Screen {
    if tab == Tab::Plans && selected_plan.is_some() {
        return Screen::PlanDetail;
    }

    ROUTES
        .iter()
        .find(|entry| entry.tab == tab)
        .map(|entry| match mode {
            UserMode::Simple => entry.simple,
            UserMode::Advanced => entry.advanced,
        })
        .unwrap_or_else(|| default_screen(mode))
}

/// Like [`resolve_screen`] for a textual tab id; unknown ids land on the dashboard.
pub fn resolve_screen_by_id(tab_id: &str, selected_plan: Option<&PlanId>, mode: UserMode) -> Screen {
    match Tab::parse(tab_id) {
        Some(tab) => resolve_screen(tab, selected_plan, mode),
        None => default_screen(mode),
    }
}

pub fn next_tab_from(current: Tab, order: &[Tab]) -> Tab {
    if order.is_empty() {
        return current;
    }

    if let Some(idx) = order.iter().position(|tab| *tab == current) {
        return order[(idx + 1) % order.len()];
    }

    order[0]
}

pub fn prev_tab_from(current: Tab, order: &[Tab]) -> Tab {
    if order.is_empty() {
        return current;
    }

    if let Some(idx) = order.iter().position(|tab| *tab == current) {
        if idx == 0 {
            return order[order.len().saturating_sub(1)];
        }
        return order[idx - 1];
    }

    order[0]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn selected_plan_on_plans_tab_routes_to_detail() {
        let plan = PlanId::new("5");
        for mode in [UserMode::Simple, UserMode::Advanced] {
            assert_eq!(
                resolve_screen(Tab::Plans, Some(&plan), mode),
                Screen::PlanDetail
            );
            assert_eq!(resolve_screen(Tab::Plans, None, mode), Screen::PlansBoard);
        }
    }

    #[test]
    fn selected_plan_is_ignored_off_the_plans_tab() {
        let plan = PlanId::new("5");
        assert_eq!(
            resolve_screen(Tab::Sessions, Some(&plan), UserMode::Advanced),
            Screen::Sessions
        );
    }

    #[test]
    fn mode_dependent_tabs_swap_screens() {
        let cases = [
            (Tab::Dashboard, Screen::SimpleDashboard, Screen::Dashboard),
            (Tab::Wizard, Screen::Interview, Screen::CookWizard),
            (Tab::Chat, Screen::SimpleChat, Screen::ChatWorkspace),
        ];
        for (tab, simple, advanced) in cases {
            assert_eq!(resolve_screen(tab, None, UserMode::Simple), simple);
            assert_eq!(resolve_screen(tab, None, UserMode::Advanced), advanced);
        }
    }

    #[test]
    fn fixed_tabs_ignore_mode() {
        for tab in [
            Tab::Timeline,
            Tab::Sessions,
            Tab::Brainstorm,
            Tab::Fix,
            Tab::Activity,
            Tab::Settings,
        ] {
            assert_eq!(
                resolve_screen(tab, None, UserMode::Simple),
                resolve_screen(tab, None, UserMode::Advanced)
            );
        }
    }

    #[test]
    fn every_tab_has_a_route() {
        for tab in Tab::ALL {
            assert!(ROUTES.iter().any(|entry| entry.tab == tab), "{tab:?}");
        }
    }

    #[test]
    fn unknown_tab_id_falls_back_to_dashboard() {
        assert_eq!(
            resolve_screen_by_id("nope", None, UserMode::Advanced),
            Screen::Dashboard
        );
        assert_eq!(
            resolve_screen_by_id("", None, UserMode::Simple),
            Screen::SimpleDashboard
        );
        assert_eq!(
            resolve_screen_by_id(" Plans ", Some(&PlanId::new("1")), UserMode::Simple),
            Screen::PlanDetail
        );
    }

    #[test]
    fn tab_cycling_wraps_within_visible_order() {
        let order = UserMode::Simple.visible_tabs();
        assert_eq!(next_tab_from(Tab::Settings, order), Tab::Dashboard);
        assert_eq!(prev_tab_from(Tab::Dashboard, order), Tab::Settings);
        assert_eq!(next_tab_from(Tab::Timeline, order), Tab::Dashboard);
    }
}
