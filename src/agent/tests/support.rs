//! Test doubles shared by agent supervision tests.

use crate::AttributeMap;
use crate::agent::ports::{
    AgentHookError, AgentHookResult, Configurable, ManagedAgent, Startable, Stoppable,
};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

/// Clock whose time only moves when a test advances it.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2025, 1, 1, 9, 0, 0)
            .single()
            .unwrap_or_default();
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Agent exposing every lifecycle hook with switchable failures.
#[derive(Default)]
pub struct ScriptedAgent {
    pub starts: AtomicU32,
    pub stops: AtomicU32,
    pub fail_start: AtomicBool,
    pub fail_stop: AtomicBool,
    pub fail_config: AtomicBool,
    pub applied_configs: Mutex<Vec<AttributeMap>>,
}

impl ScriptedAgent {
    pub fn failing_start() -> Self {
        let agent = Self::default();
        agent.fail_start.store(true, Ordering::SeqCst);
        agent
    }

    pub fn start_calls(&self) -> u32 {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> u32 {
        self.stops.load(Ordering::SeqCst)
    }
}

impl ManagedAgent for ScriptedAgent {
    fn as_startable(&self) -> Option<&dyn Startable> {
        Some(self)
    }

    fn as_stoppable(&self) -> Option<&dyn Stoppable> {
        Some(self)
    }

    fn as_configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }
}

#[async_trait]
impl Startable for ScriptedAgent {
    async fn start(&self) -> AgentHookResult<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(AgentHookError::rejected("start refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl Stoppable for ScriptedAgent {
    async fn stop(&self) -> AgentHookResult<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if self.fail_stop.load(Ordering::SeqCst) {
            return Err(AgentHookError::runtime(std::io::Error::other(
                "worker did not exit",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Configurable for ScriptedAgent {
    async fn apply_config(&self, config: &AttributeMap) -> AgentHookResult<()> {
        if self.fail_config.load(Ordering::SeqCst) {
            return Err(AgentHookError::rejected("config rejected"));
        }
        self.applied_configs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(config.clone());
        Ok(())
    }
}

/// Agent with no optional hooks.
pub struct PassiveAgent;

impl ManagedAgent for PassiveAgent {}

pub fn attributes(value: serde_json::Value) -> AttributeMap {
    match value {
        serde_json::Value::Object(map) => map,
        _ => AttributeMap::new(),
    }
}
