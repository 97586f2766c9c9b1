use serde::Serialize;

use crate::error::ExportError;
use crate::model::Plan;
use crate::model::PlanId;

#[derive(Debug, Serialize)]
struct PlanExport<'a> {
    id: &'a str,
    title: &'a str,
    status: &'static str,
    priority: &'static str,
    progress: u8,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    depends_on: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    phases: Vec<PhaseExport<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    success_criteria: Vec<CriterionExport<'a>>,
}

#[derive(Debug, Serialize)]
struct PhaseExport<'a> {
    name: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CriterionExport<'a> {
    text: &'a str,
    met: bool,
}

/// Renders a plan as YAML; dependencies are listed by title when they resolve.
pub fn export_plan_yaml(plans: &[Plan], id: &PlanId) -> Result<String, ExportError> {
    let plan = plans
        .iter()
        .find(|plan| &plan.id == id)
        .ok_or_else(|| ExportError::PlanMissing(id.clone()))?;

    let export = PlanExport {
        id: plan.id.as_str(),
        title: &plan.title,
        status: plan.status.label(),
        priority: plan.priority.label(),
        progress: plan.progress_percent(),
        depends_on: plan
            .dependencies
            .iter()
            .map(|dep| {
                plans
                    .iter()
                    .find(|candidate| &candidate.id == dep)
                    .map(|candidate| candidate.title.as_str())
                    .unwrap_or(dep.as_str())
            })
            .collect(),
        phases: plan
            .phases
            .iter()
            .map(|phase| PhaseExport {
                name: &phase.name,
                status: phase.status.label(),
                file: phase.file.as_deref(),
            })
            .collect(),
        success_criteria: plan
            .success_criteria
            .iter()
            .map(|criterion| CriterionExport {
                text: &criterion.text,
                met: criterion.met,
            })
            .collect(),
    };
    Ok(serde_yaml::to_string(&export)?)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Criterion;
    use crate::model::Phase;
    use crate::model::PhaseId;
    use crate::model::PhaseStatus;
    use crate::model::PlanStatus;
    use crate::model::Priority;

    fn plan(id: &str, title: &str, dependencies: Vec<PlanId>) -> Plan {
        Plan {
            id: PlanId::new(id),
            title: title.to_string(),
            status: PlanStatus::InProgress,
            priority: Priority::P1,
            progress: 0,
            phases: vec![Phase {
                id: PhaseId::new("ph-1"),
                name: "Routes".to_string(),
                status: PhaseStatus::Done,
                file: Some("src/routes.rs".to_string()),
            }],
            dependencies,
            success_criteria: vec![Criterion {
                text: "Login works".to_string(),
                met: true,
            }],
            revision: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn export_names_dependencies_by_title() {
        let plans = vec![
            plan("plan-1", "Auth", Vec::new()),
            plan("plan-2", "Billing", vec![PlanId::new("plan-1"), PlanId::new("gone")]),
        ];
        let yaml = export_plan_yaml(&plans, &PlanId::new("plan-2")).expect("export");

        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).expect("yaml");
        assert_eq!(value["title"].as_str(), Some("Billing"));
        assert_eq!(value["progress"].as_u64(), Some(100));
        assert_eq!(value["depends_on"][0].as_str(), Some("Auth"));
        assert_eq!(value["depends_on"][1].as_str(), Some("gone"));
        assert_eq!(value["phases"][0]["file"].as_str(), Some("src/routes.rs"));
    }

    #[test]
    fn export_of_unknown_plan_fails() {
        let err = export_plan_yaml(&[], &PlanId::new("nope")).expect_err("missing");
        assert!(matches!(err, ExportError::PlanMissing(id) if id.as_str() == "nope"));
    }
}
