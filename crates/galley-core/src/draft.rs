//! Staged edits for the plan detail screen.
//!
//! Toggles land in a [`PlanDraft`] first; nothing reaches the store until
//! [`commit_draft`] re-validates the draft against the current plan.

use crate::error::DraftError;
use crate::model::Criterion;
use crate::model::Phase;
use crate::model::PhaseStatus;
use crate::model::Plan;
use crate::model::PlanId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDraft {
    pub plan_id: PlanId,
    pub base_revision: u64,
    pub phases: Vec<Phase>,
    pub criteria: Vec<Criterion>,
    pub cursor: usize,
    pub dirty: bool,
}

impl PlanDraft {
    pub fn open(plan: &Plan) -> Self {
        Self {
            plan_id: plan.id.clone(),
            base_revision: plan.revision,
            phases: plan.phases.clone(),
            criteria: plan.success_criteria.clone(),
            cursor: 0,
            dirty: false,
        }
    }

    /// Phases first, then criteria; the cursor walks both lists.
    pub fn row_count(&self) -> usize {
        self.phases.len() + self.criteria.len()
    }

    pub fn toggle_at_cursor(&mut self) -> bool {
        let idx = self.cursor;
        if idx < self.phases.len() {
            self.toggle_phase(idx)
        } else {
            self.toggle_criterion(idx - self.phases.len())
        }
    }

    pub fn toggle_phase(&mut self, idx: usize) -> bool {
        let Some(phase) = self.phases.get_mut(idx) else {
            return false;
        };
        phase.status = phase.status.cycle();
        self.dirty = true;
        true
    }

    pub fn toggle_criterion(&mut self, idx: usize) -> bool {
        let Some(criterion) = self.criteria.get_mut(idx) else {
            return false;
        };
        criterion.met = !criterion.met;
        self.dirty = true;
        true
    }

    pub fn add_criterion(&mut self, text: String) {
        self.criteria.push(Criterion { text, met: false });
        self.dirty = true;
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let rows = self.row_count();
        if rows == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor as isize + delta).rem_euclid(rows as isize) as usize;
    }

    pub fn validate(&self, plan: Option<&Plan>) -> Result<(), DraftError> {
        let Some(plan) = plan else {
            return Err(DraftError::PlanMissing(self.plan_id.clone()));
        };
        if plan.revision != self.base_revision {
            return Err(DraftError::StaleRevision {
                plan: plan.id.clone(),
                draft: self.base_revision,
                store: plan.revision,
            });
        }
        if let Some(index) = self
            .criteria
            .iter()
            .position(|criterion| criterion.text.trim().is_empty())
        {
            return Err(DraftError::EmptyCriterion { index });
        }
        let active = self
            .phases
            .iter()
            .filter(|phase| phase.status == PhaseStatus::Active)
            .count();
        if active > 1 {
            return Err(DraftError::MultipleActivePhases { count: active });
        }
        Ok(())
    }
}

/// Merges a validated draft into `plan`, bumping its revision and stored progress.
pub fn commit_draft(plan: &mut Plan, draft: &PlanDraft) -> Result<(), DraftError> {
    draft.validate(Some(plan))?;
    plan.phases = draft.phases.clone();
    plan.success_criteria = draft
        .criteria
        .iter()
        .map(|criterion| Criterion {
            text: criterion.text.trim().to_string(),
            met: criterion.met,
        })
        .collect();
    plan.progress = plan.progress_percent();
    plan.revision = plan.revision.saturating_add(1);
    Ok(())
}
