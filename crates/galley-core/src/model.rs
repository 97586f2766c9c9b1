use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(ProjectId);
string_id!(PlanId);
string_id!(PhaseId);
string_id!(SessionId);
string_id!(MessageId);
string_id!(ReportId);
string_id!(AnnotationId);
string_id!(ActivityId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub path: String,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Draft,
    InProgress,
    Review,
    Done,
}

impl PlanStatus {
    pub const ALL: [PlanStatus; 4] = [
        PlanStatus::Draft,
        PlanStatus::InProgress,
        PlanStatus::Review,
        PlanStatus::Done,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::InProgress => "In progress",
            Self::Review => "Review",
            Self::Done => "Done",
        }
    }

    pub fn column(self) -> usize {
        match self {
            Self::Draft => 0,
            Self::InProgress => 1,
            Self::Review => 2,
            Self::Done => 3,
        }
    }

    pub fn from_column(column: usize) -> Self {
        Self::ALL[column.min(Self::ALL.len() - 1)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    P1,
    P2,
    P3,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Pending,
    Active,
    Done,
}

impl PhaseStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Done => "done",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            Self::Pending => Self::Active,
            Self::Active => Self::Done,
            Self::Done => Self::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub id: PhaseId,
    pub name: String,
    pub status: PhaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub text: String,
    pub met: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub title: String,
    pub status: PlanStatus,
    pub priority: Priority,
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phases: Vec<Phase>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<PlanId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub success_criteria: Vec<Criterion>,
    #[serde(skip)]
    pub revision: u64,
    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// Phase completion ratio when the plan has phases, the stored value otherwise.
    pub fn progress_percent(&self) -> u8 {
        if self.phases.is_empty() {
            return self.progress.min(100);
        }
        let done = self
            .phases
            .iter()
            .filter(|phase| phase.status == PhaseStatus::Done)
            .count();
        ((done as f64 / self.phases.len() as f64) * 100.0).round() as u8
    }

    pub fn active_phase(&self) -> Option<&Phase> {
        self.phases
            .iter()
            .find(|phase| phase.status == PhaseStatus::Active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Claude,
    Codex,
    Gemini,
    Copilot,
    Local,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::Claude,
        Provider::Codex,
        Provider::Gemini,
        Provider::Copilot,
        Provider::Local,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Claude => "Claude",
            Self::Codex => "Codex",
            Self::Gemini => "Gemini",
            Self::Copilot => "Copilot",
            Self::Local => "Local",
        }
    }

    /// Simulated price per thousand tokens.
    pub fn cost_per_1k_tokens(self) -> f64 {
        match self {
            Self::Claude => 0.015,
            Self::Codex => 0.012,
            Self::Gemini => 0.007,
            Self::Copilot => 0.010,
            Self::Local => 0.0,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Claude => Self::Codex,
            Self::Codex => Self::Gemini,
            Self::Gemini => Self::Copilot,
            Self::Copilot => Self::Local,
            Self::Local => Self::Claude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

impl SessionStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub provider: Provider,
    pub status: SessionStatus,
    pub cost_usd: f64,
    pub tokens: u64,
    pub output: Vec<String>,
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanId>,
}

/// Partial update merged into an existing session; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub status: Option<SessionStatus>,
    pub cost_usd: Option<f64>,
    pub tokens: Option<u64>,
    pub output: Option<Vec<String>>,
    pub progress: Option<u8>,
    pub plan: Option<Option<PlanId>>,
}

impl Session {
    pub fn apply(&mut self, patch: SessionPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(cost) = patch.cost_usd {
            self.cost_usd = cost.max(0.0);
        }
        if let Some(tokens) = patch.tokens {
            self.tokens = tokens;
        }
        if let Some(output) = patch.output {
            self.output = output;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress.min(100);
        }
        if let Some(plan) = patch.plan {
            self.plan = plan;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "you",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallStatus {
    Running,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub status: ToolCallStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub role: Role,
    pub content: String,
    pub provider: Option<Provider>,
    pub tool_calls: Vec<ToolCall>,
}

impl NewMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            provider: None,
            tool_calls: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>, provider: Provider) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            provider: Some(provider),
            tool_calls: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    New,
    Refining,
    Ready,
    Converted,
}

impl ReportStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Refining => "refining",
            Self::Ready => "ready",
            Self::Converted => "converted",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::New => Self::Refining,
            Self::Refining => Self::Ready,
            Self::Ready => Self::Ready,
            Self::Converted => Self::Converted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrainstormReport {
    pub id: ReportId,
    pub title: String,
    pub content: String,
    pub status: ReportStatus,
    pub tags: Vec<String>,
    pub annotations: Vec<Annotation>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBrainstormReport {
    pub title: String,
    pub content: String,
    pub status: ReportStatus,
    pub tags: Vec<String>,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrainstormPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<ReportStatus>,
    pub tags: Option<Vec<String>>,
    pub plan: Option<Option<PlanId>>,
}

impl BrainstormReport {
    pub fn apply(&mut self, patch: BrainstormPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(plan) = patch.plan {
            self.plan = plan;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Plan,
    Session,
    Chat,
    Brainstorm,
    Flow,
    Project,
    System,
}

impl ActivityKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Session => "session",
            Self::Chat => "chat",
            Self::Brainstorm => "brainstorm",
            Self::Flow => "flow",
            Self::Project => "project",
            Self::System => "system",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub id: ActivityId,
    pub kind: ActivityKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn phase(status: PhaseStatus) -> Phase {
        Phase {
            id: PhaseId::new("ph"),
            name: "phase".to_string(),
            status,
            file: None,
        }
    }

    fn plan(progress: u8, phases: Vec<Phase>) -> Plan {
        Plan {
            id: PlanId::new("plan-1"),
            title: "Plan".to_string(),
            status: PlanStatus::Draft,
            priority: Priority::P2,
            progress,
            phases,
            dependencies: Vec::new(),
            success_criteria: Vec::new(),
            revision: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn progress_uses_stored_value_without_phases() {
        assert_eq!(plan(42, Vec::new()).progress_percent(), 42);
        assert_eq!(plan(250, Vec::new()).progress_percent(), 100);
    }

    #[test]
    fn progress_derives_from_phase_completion() {
        let plan = plan(
            5,
            vec![
                phase(PhaseStatus::Done),
                phase(PhaseStatus::Active),
                phase(PhaseStatus::Pending),
            ],
        );
        assert_eq!(plan.progress_percent(), 33);
    }

    #[test]
    fn session_patch_merges_only_present_fields() {
        let mut session = Session {
            id: SessionId::new("s-1"),
            provider: Provider::Claude,
            status: SessionStatus::Idle,
            cost_usd: 1.0,
            tokens: 10,
            output: vec!["boot".to_string()],
            progress: 0,
            plan: None,
        };
        session.apply(SessionPatch {
            status: Some(SessionStatus::Running),
            progress: Some(180),
            ..SessionPatch::default()
        });

        assert_eq!(session.status, SessionStatus::Running);
        assert_eq!(session.progress, 100);
        assert_eq!(session.tokens, 10);
        assert_eq!(session.output, vec!["boot".to_string()]);
    }

    #[test]
    fn plan_status_columns_round_trip() {
        for status in PlanStatus::ALL {
            assert_eq!(PlanStatus::from_column(status.column()), status);
        }
        assert_eq!(PlanStatus::from_column(99), PlanStatus::Done);
    }
}
