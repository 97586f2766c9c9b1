use crate::model::Plan;
use crate::model::PlanId;
use crate::model::PlanStatus;

pub const COLUMN_COUNT: usize = PlanStatus::ALL.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardCursor {
    pub column: usize,
    pub row: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragState {
    pub plan: PlanId,
    pub origin: PlanStatus,
    pub hover: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    pub cursor: BoardCursor,
    pub drag: Option<DragState>,
}

/// Plans in one column, highest priority first; ties keep store order.
pub fn column_plans(plans: &[Plan], status: PlanStatus) -> Vec<&Plan> {
    let mut column: Vec<&Plan> = plans.iter().filter(|plan| plan.status == status).collect();
    column.sort_by_key(|plan| plan.priority);
    column
}

pub fn plan_at<'a>(plans: &'a [Plan], cursor: BoardCursor) -> Option<&'a Plan> {
    column_plans(plans, PlanStatus::from_column(cursor.column))
        .get(cursor.row)
        .copied()
}

pub fn clamp_cursor(plans: &[Plan], cursor: BoardCursor) -> BoardCursor {
    let column = cursor.column.min(COLUMN_COUNT - 1);
    let len = column_plans(plans, PlanStatus::from_column(column)).len();
    BoardCursor {
        column,
        row: cursor.row.min(len.saturating_sub(1)),
    }
}

/// Moves the cursor onto the card of `plan_id`, wherever its column is now.
pub fn cursor_for(plans: &[Plan], plan_id: &PlanId) -> Option<BoardCursor> {
    let plan = plans.iter().find(|plan| &plan.id == plan_id)?;
    let column = plan.status.column();
    let row = column_plans(plans, plan.status)
        .iter()
        .position(|candidate| &candidate.id == plan_id)?;
    Some(BoardCursor { column, row })
}
