use std::collections::HashMap;

use galley_core::flow::FlowRequest;
use galley_core::model::Provider;
use galley_core::model::SessionId;
use galley_core::ChatRequest;
use galley_core::JobKey;
use galley_core::RuntimeAction;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::contracts::ScriptStep;
use crate::contracts::SimTiming;
use crate::script::chat_script;
use crate::script::flow_script;
use crate::script::session_script;

struct Job {
    token: CancellationToken,
    task: JoinHandle<()>,
}

/// Plays scripted jobs on a tokio runtime and feeds their actions back to the
/// UI loop. Starting a job under a key that is already running cancels the
/// older one first.
pub struct SimRunner {
    handle: Handle,
    tx: UnboundedSender<RuntimeAction>,
    timing: SimTiming,
    jobs: HashMap<JobKey, Job>,
}

impl SimRunner {
    pub fn new(handle: Handle, tx: UnboundedSender<RuntimeAction>, timing: SimTiming) -> Self {
        Self {
            handle,
            tx,
            timing,
            jobs: HashMap::new(),
        }
    }

    pub fn run_flow(&mut self, request: FlowRequest) {
        let steps = flow_script(&request, &self.timing);
        self.spawn(JobKey::Flow(request.kind), steps);
    }

    pub fn run_chat(&mut self, request: ChatRequest) {
        let steps = chat_script(&request, &self.timing);
        self.spawn(JobKey::Chat, steps);
    }

    pub fn run_session(&mut self, session: SessionId, provider: Provider, remaining: u8) {
        let steps = session_script(&session, provider, remaining, &self.timing);
        self.spawn(JobKey::Session(session), steps);
    }

    pub fn spawn(&mut self, key: JobKey, steps: Vec<ScriptStep>) {
        self.cancel(&key);
        let token = CancellationToken::new();
        let task = self.handle.spawn(play(
            key.clone(),
            steps,
            token.clone(),
            self.tx.clone(),
        ));
        tracing::debug!(job = ?key, "job spawned");
        self.jobs.insert(key, Job { token, task });
    }

    /// Returns whether a still-running job was stopped.
    pub fn cancel(&mut self, key: &JobKey) -> bool {
        let Some(job) = self.jobs.remove(key) else {
            return false;
        };
        let running = !job.task.is_finished();
        job.token.cancel();
        if running {
            tracing::debug!(job = ?key, "job cancelled");
        }
        running
    }

    pub fn cancel_all(&mut self) {
        for (_, job) in self.jobs.drain() {
            job.token.cancel();
        }
    }

    pub fn is_running(&self, key: &JobKey) -> bool {
        self.jobs
            .get(key)
            .map_or(false, |job| !job.task.is_finished())
    }

    pub fn running_jobs(&self) -> usize {
        self.jobs
            .values()
            .filter(|job| !job.task.is_finished())
            .count()
    }
}

impl Drop for SimRunner {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

async fn play(
    key: JobKey,
    steps: Vec<ScriptStep>,
    token: CancellationToken,
    tx: UnboundedSender<RuntimeAction>,
) {
    for step in steps {
        tokio::select! {
            _ = token.cancelled() => {
                tracing::trace!(job = ?key, "job stopped mid-script");
                return;
            }
            _ = tokio::time::sleep(step.delay) => {}
        }
        if token.is_cancelled() {
            return;
        }
        if tx.send(step.action).is_err() {
            tracing::debug!(job = ?key, "receiver gone, job dropped");
            return;
        }
    }
}
