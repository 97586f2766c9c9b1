//! Simulated multi-phase pipelines hosted by the wizard, interview and fix screens.
//!
//! The reducer only tracks where a flow is; the canned text and the timing
//! live in `galley-exec`, which answers a [`FlowRequest`] with a sequence of
//! steps delivered back as runtime actions.

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Cook,
    Fix,
    Interview,
}

impl FlowKind {
    pub const ALL: [FlowKind; 3] = [FlowKind::Cook, FlowKind::Fix, FlowKind::Interview];

    pub fn label(self) -> &'static str {
        match self {
            Self::Cook => "Cook",
            Self::Fix => "Fix",
            Self::Interview => "Interview",
        }
    }

    pub fn phases(self) -> &'static [FlowPhase] {
        match self {
            Self::Cook => COOK_PHASES,
            Self::Fix => FIX_PHASES,
            Self::Interview => INTERVIEW_PHASES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPhase {
    Questions,
    Research,
    Planning,
    Building,
    Testing,
    Review,
    Reproduce,
    Diagnose,
    Patch,
    Verify,
    Summary,
    Done,
}

impl FlowPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Questions => "Questions",
            Self::Research => "Research",
            Self::Planning => "Planning",
            Self::Building => "Building",
            Self::Testing => "Testing",
            Self::Review => "Review",
            Self::Reproduce => "Reproduce",
            Self::Diagnose => "Diagnose",
            Self::Patch => "Patch",
            Self::Verify => "Verify",
            Self::Summary => "Summary",
            Self::Done => "Done",
        }
    }
}

const COOK_PHASES: &[FlowPhase] = &[
    FlowPhase::Questions,
    FlowPhase::Research,
    FlowPhase::Planning,
    FlowPhase::Building,
    FlowPhase::Testing,
    FlowPhase::Review,
    FlowPhase::Done,
];

const FIX_PHASES: &[FlowPhase] = &[
    FlowPhase::Reproduce,
    FlowPhase::Diagnose,
    FlowPhase::Patch,
    FlowPhase::Verify,
    FlowPhase::Done,
];

const INTERVIEW_PHASES: &[FlowPhase] = &[FlowPhase::Questions, FlowPhase::Summary, FlowPhase::Done];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    Idle,
    Running,
    AwaitingAnswer,
    Done,
    Cancelled,
}

impl FlowStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::AwaitingAnswer => "waiting for you",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_live(self) -> bool {
        matches!(self, Self::Running | Self::AwaitingAnswer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowSpeaker {
    Agent,
    User,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEntry {
    pub speaker: FlowSpeaker,
    pub phase: FlowPhase,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowState {
    pub kind: FlowKind,
    pub run_id: u64,
    pub phase: FlowPhase,
    pub status: FlowStatus,
    pub brief: String,
    pub interactive: bool,
    pub answers: Vec<String>,
    pub awaiting: Option<String>,
    pub segment: usize,
    pub transcript: Vec<FlowEntry>,
}

impl FlowState {
    pub fn idle(kind: FlowKind) -> Self {
        Self {
            kind,
            run_id: 0,
            phase: kind.phases()[0],
            status: FlowStatus::Idle,
            brief: String::new(),
            interactive: false,
            answers: Vec::new(),
            awaiting: None,
            segment: 0,
            transcript: Vec::new(),
        }
    }

    /// Index of the current phase within the kind's phase sequence.
    pub fn phase_index(&self) -> usize {
        self.kind
            .phases()
            .iter()
            .position(|phase| *phase == self.phase)
            .unwrap_or(0)
    }

    pub fn request(&self) -> FlowRequest {
        FlowRequest {
            kind: self.kind,
            run_id: self.run_id,
            segment: self.segment,
            brief: self.brief.clone(),
            interactive: self.interactive,
            answers: self.answers.clone(),
        }
    }
}

/// Everything the simulation needs to produce the next segment of a flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRequest {
    pub kind: FlowKind,
    pub run_id: u64,
    pub segment: usize,
    pub brief: String,
    pub interactive: bool,
    pub answers: Vec<String>,
}

/// Empty input and a literal `skip` both take a question's default branch.
pub fn is_skip_answer(answer: &str) -> bool {
    let answer = answer.trim();
    answer.is_empty() || answer.eq_ignore_ascii_case("skip")
}

#[derive(Debug, Clone)]
pub struct Flows {
    pub cook: FlowState,
    pub fix: FlowState,
    pub interview: FlowState,
    pub next_run_id: u64,
}

impl Default for Flows {
    fn default() -> Self {
        Self {
            cook: FlowState::idle(FlowKind::Cook),
            fix: FlowState::idle(FlowKind::Fix),
            interview: FlowState::idle(FlowKind::Interview),
            next_run_id: 1,
        }
    }
}

impl Flows {
    pub fn get(&self, kind: FlowKind) -> &FlowState {
        match kind {
            FlowKind::Cook => &self.cook,
            FlowKind::Fix => &self.fix,
            FlowKind::Interview => &self.interview,
        }
    }

    pub fn get_mut(&mut self, kind: FlowKind) -> &mut FlowState {
        match kind {
            FlowKind::Cook => &mut self.cook,
            FlowKind::Fix => &mut self.fix,
            FlowKind::Interview => &mut self.interview,
        }
    }

    pub fn allocate_run_id(&mut self) -> u64 {
        let run_id = self.next_run_id;
        self.next_run_id = self.next_run_id.saturating_add(1);
        run_id
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cook_phase_order_is_stable() {
        let labels: Vec<&str> = FlowKind::Cook
            .phases()
            .iter()
            .map(|phase| phase.label())
            .collect();
        assert_eq!(
            labels,
            vec!["Questions", "Research", "Planning", "Building", "Testing", "Review", "Done"]
        );
    }

    #[test]
    fn every_flow_ends_in_done() {
        for kind in FlowKind::ALL {
            assert_eq!(kind.phases().last(), Some(&FlowPhase::Done));
        }
    }

    #[test]
    fn blank_and_skip_answers_are_skips() {
        for answer in ["", "   ", "skip", " SKIP ", "Skip"] {
            assert!(is_skip_answer(answer), "{answer:?}");
        }
        assert!(!is_skip_answer("skip the login page"));
        assert!(!is_skip_answer("Admins"));
    }

    #[test]
    fn run_ids_are_monotonic() {
        let mut flows = Flows::default();
        let first = flows.allocate_run_id();
        let second = flows.allocate_run_id();
        assert!(second > first);
    }
}
