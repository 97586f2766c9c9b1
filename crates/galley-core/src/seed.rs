//! Demo workspace loaded into every new store unless seeding is turned off.

use chrono::Duration;
use chrono::Utc;

use crate::model::ActivityKind;
use crate::model::BrainstormReport;
use crate::model::Criterion;
use crate::model::Message;
use crate::model::MessageId;
use crate::model::Phase;
use crate::model::PhaseId;
use crate::model::PhaseStatus;
use crate::model::Plan;
use crate::model::PlanId;
use crate::model::PlanStatus;
use crate::model::Priority;
use crate::model::Project;
use crate::model::ProjectId;
use crate::model::Provider;
use crate::model::ReportId;
use crate::model::ReportStatus;
use crate::model::Role;
use crate::model::Session;
use crate::model::SessionId;
use crate::model::SessionStatus;
use crate::model::ToolCall;
use crate::model::ToolCallStatus;
use crate::state::AppState;

struct PlanSeed {
    title: &'static str,
    status: PlanStatus,
    priority: Priority,
    progress: u8,
    phases: &'static [(&'static str, PhaseStatus, Option<&'static str>)],
    depends_on: &'static [usize],
    criteria: &'static [&'static str],
}

const PLAN_SEEDS: &[PlanSeed] = &[
    PlanSeed {
        title: "User authentication",
        status: PlanStatus::InProgress,
        priority: Priority::P1,
        progress: 40,
        phases: &[
            ("Schema & migrations", PhaseStatus::Done, Some("migrations/0001_users.sql")),
            ("Session tokens", PhaseStatus::Done, Some("src/auth/token.rs")),
            ("Login routes", PhaseStatus::Active, Some("src/routes/login.rs")),
            ("Password reset", PhaseStatus::Pending, None),
            ("Audit logging", PhaseStatus::Pending, None),
        ],
        depends_on: &[],
        criteria: &["Users can sign in and out", "Tokens expire after 24h"],
    },
    PlanSeed {
        title: "Billing dashboard",
        status: PlanStatus::Draft,
        priority: Priority::P2,
        progress: 0,
        phases: &[
            ("Usage aggregation", PhaseStatus::Pending, Some("src/billing/usage.rs")),
            ("Invoice view", PhaseStatus::Pending, None),
        ],
        depends_on: &[0],
        criteria: &["Monthly totals match provider invoices"],
    },
    PlanSeed {
        title: "Dark mode",
        status: PlanStatus::Review,
        priority: Priority::P3,
        progress: 67,
        phases: &[
            ("Theme tokens", PhaseStatus::Done, Some("src/theme.rs")),
            ("Component audit", PhaseStatus::Done, None),
            ("Contrast review", PhaseStatus::Active, None),
        ],
        depends_on: &[],
        criteria: &["All screens pass contrast checks"],
    },
    PlanSeed {
        title: "Onboarding emails",
        status: PlanStatus::Done,
        priority: Priority::P2,
        progress: 100,
        phases: &[],
        depends_on: &[0],
        criteria: &[],
    },
    PlanSeed {
        title: "Search indexing",
        status: PlanStatus::Draft,
        priority: Priority::P1,
        progress: 0,
        phases: &[
            ("Pick engine", PhaseStatus::Pending, None),
            ("Index pipeline", PhaseStatus::Pending, Some("src/search/index.rs")),
            ("Query API", PhaseStatus::Pending, Some("src/search/query.rs")),
        ],
        depends_on: &[1],
        criteria: &["p95 query under 100ms"],
    },
];

pub fn seed_workspace(state: &mut AppState, project_name: &str) {
    let now = Utc::now();

    for (idx, (name, path)) in [
        (project_name, "."),
        ("marketing-site", "~/code/marketing-site"),
        ("mobile-app", "~/code/mobile-app"),
    ]
    .into_iter()
    .enumerate()
    {
        state.projects.push(Project {
            id: ProjectId::new(state.ids.next("proj")),
            name: name.to_string(),
            path: path.to_string(),
            active: idx == 0,
        });
    }

    let plan_ids: Vec<PlanId> = PLAN_SEEDS
        .iter()
        .map(|_| PlanId::new(state.ids.next("plan")))
        .collect();
    for (idx, seed) in PLAN_SEEDS.iter().enumerate() {
        let phases = seed
            .phases
            .iter()
            .map(|(name, status, file)| Phase {
                id: PhaseId::new(state.ids.next("phase")),
                name: name.to_string(),
                status: *status,
                file: file.map(str::to_string),
            })
            .collect();
        state.plans.push(Plan {
            id: plan_ids[idx].clone(),
            title: seed.title.to_string(),
            status: seed.status,
            priority: seed.priority,
            progress: seed.progress,
            phases,
            dependencies: seed
                .depends_on
                .iter()
                .map(|dep| plan_ids[*dep].clone())
                .collect(),
            success_criteria: seed
                .criteria
                .iter()
                .map(|text| Criterion {
                    text: text.to_string(),
                    met: seed.status == PlanStatus::Done,
                })
                .collect(),
            revision: 0,
            created_at: now - Duration::days((PLAN_SEEDS.len() - idx) as i64),
        });
    }

    state.sessions.push(Session {
        id: SessionId::new(state.ids.next("sess")),
        provider: Provider::Claude,
        status: SessionStatus::Paused,
        cost_usd: 1.84,
        tokens: 122_400,
        output: vec![
            "Reading src/routes/login.rs".to_string(),
            "Drafted handler for POST /login".to_string(),
        ],
        progress: 55,
        plan: Some(plan_ids[0].clone()),
    });
    state.sessions.push(Session {
        id: SessionId::new(state.ids.next("sess")),
        provider: Provider::Gemini,
        status: SessionStatus::Completed,
        cost_usd: 0.42,
        tokens: 58_900,
        output: vec!["Contrast audit finished: 3 issues".to_string()],
        progress: 100,
        plan: Some(plan_ids[2].clone()),
    });

    let stamp = now.format("%H:%M").to_string();
    state.messages.push(Message {
        id: MessageId::new(state.ids.next("msg")),
        role: Role::User,
        content: "How far along is the login work?".to_string(),
        provider: None,
        timestamp: stamp.clone(),
        tool_calls: Vec::new(),
    });
    state.messages.push(Message {
        id: MessageId::new(state.ids.next("msg")),
        role: Role::Assistant,
        content: "Schema and tokens are done. The login route is in progress; password reset is next.\n\n```rust\npub async fn login(form: LoginForm) -> Result<Session> {\n    let user = users::verify(&form.email, &form.password).await?;\n    Session::issue(user.id)\n}\n```".to_string(),
        provider: Some(Provider::Claude),
        timestamp: stamp,
        tool_calls: vec![ToolCall {
            name: "read_file".to_string(),
            status: ToolCallStatus::Done,
            file: Some("src/routes/login.rs".to_string()),
        }],
    });

    state.brainstorms.push(BrainstormReport {
        id: ReportId::new(state.ids.next("idea")),
        title: "Team workspaces".to_string(),
        content: "Let several users share plans and sessions, with per-seat cost limits.".to_string(),
        status: ReportStatus::Refining,
        tags: vec!["collab".to_string(), "billing".to_string()],
        annotations: Vec::new(),
        created_at: now - Duration::hours(5),
        plan: None,
    });

    state.record_activity(ActivityKind::Project, format!("Opened {project_name}"));
    state.record_activity(ActivityKind::Session, "Gemini session completed the contrast audit");
    state.record_activity(ActivityKind::Plan, "Dark mode moved to review");
}
