use std::time::Duration;

use galley_core::config::SimulationConfig;
use galley_core::RuntimeAction;
use serde::Deserialize;
use serde::Serialize;

/// Pacing for every simulated job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTiming {
    pub step_delay: Duration,
    pub chat_delay: Duration,
    pub session_tick: Duration,
}

impl Default for SimTiming {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl SimTiming {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            step_delay: Duration::from_millis(config.step_delay_ms),
            chat_delay: Duration::from_millis(config.chat_delay_ms),
            session_tick: Duration::from_millis(config.session_tick_ms),
        }
    }
}

/// One scripted beat: wait `delay`, then hand `action` back to the reducer.
#[derive(Debug, Clone)]
pub struct ScriptStep {
    pub delay: Duration,
    pub action: RuntimeAction,
}

impl ScriptStep {
    pub fn after(delay: Duration, action: RuntimeAction) -> Self {
        Self { delay, action }
    }
}
