//! Gantt layout for the timeline screen.
//!
//! A plan lasts one unit per phase (at least one). It starts when the last of
//! its dependencies ends. Units are scaled onto the available column width.

use std::collections::HashMap;

use crate::model::Plan;
use crate::model::PlanId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GanttBar {
    pub plan: PlanId,
    pub start_unit: usize,
    pub units: usize,
    pub offset: u16,
    pub width: u16,
    pub filled: u16,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done(usize),
}

fn plan_units(plan: &Plan) -> usize {
    plan.phases.len().max(1)
}

fn start_unit(
    plan: &Plan,
    by_id: &HashMap<&PlanId, &Plan>,
    visits: &mut HashMap<PlanId, Visit>,
) -> usize {
    match visits.get(&plan.id) {
        Some(Visit::Done(start)) => return *start,
        // back-edge of a dependency cycle
        Some(Visit::InProgress) => return 0,
        None => {}
    }
    visits.insert(plan.id.clone(), Visit::InProgress);

    let mut start = 0;
    for dependency in &plan.dependencies {
        let Some(dep) = by_id.get(dependency) else {
            continue;
        };
        if matches!(visits.get(&dep.id), Some(Visit::InProgress)) {
            continue;
        }
        let dep_end = start_unit(dep, by_id, visits) + plan_units(dep);
        start = start.max(dep_end);
    }

    visits.insert(plan.id.clone(), Visit::Done(start));
    start
}

pub fn layout_timeline(plans: &[Plan], width: u16) -> Vec<GanttBar> {
    let by_id: HashMap<&PlanId, &Plan> = plans.iter().map(|plan| (&plan.id, plan)).collect();
    let mut visits = HashMap::new();

    let spans: Vec<(usize, usize)> = plans
        .iter()
        .map(|plan| (start_unit(plan, &by_id, &mut visits), plan_units(plan)))
        .collect();
    let total_units = spans
        .iter()
        .map(|(start, units)| start + units)
        .max()
        .unwrap_or(0)
        .max(1);

    let scale = |units: usize| -> u16 {
        ((units as f64 * width as f64) / total_units as f64).round() as u16
    };

    plans
        .iter()
        .zip(spans)
        .map(|(plan, (start, units))| {
            let offset = scale(start).min(width.saturating_sub(1));
            let mut bar_width = scale(start + units).saturating_sub(offset);
            if width > 0 {
                bar_width = bar_width.clamp(1, width - offset);
            }
            let filled = ((bar_width as f64 * plan.progress_percent() as f64) / 100.0).round() as u16;
            GanttBar {
                plan: plan.id.clone(),
                start_unit: start,
                units,
                offset,
                width: bar_width,
                filled: filled.min(bar_width),
            }
        })
        .collect()
}
