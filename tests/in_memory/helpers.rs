//! Shared test helpers for in-memory integration tests.

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use warden::agent::{
    adapters::memory::InMemoryAgentRecordRepository,
    domain::AgentId,
    ports::{AgentHookError, AgentHookResult, ManagedAgent, Startable, Stoppable},
    services::AgentLifecycleService,
};

/// Lifecycle service wired to the in-memory repository.
pub type TestLifecycleService = AgentLifecycleService<InMemoryAgentRecordRepository, ManualClock>;

/// Clock whose time only moves when a test advances it.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock set to 2025-01-01 09:00 UTC.
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2025, 1, 1, 9, 0, 0)
            .single()
            .unwrap_or_default();
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward.
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

/// Provides a shared manual clock.
#[fixture]
pub fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new())
}

/// Provides a lifecycle service over a fresh repository.
#[fixture]
pub fn service(clock: Arc<ManualClock>) -> TestLifecycleService {
    AgentLifecycleService::new(Arc::new(InMemoryAgentRecordRepository::new()), clock)
}

/// Builds a validated agent identifier.
pub fn agent_id(value: &str) -> AgentId {
    AgentId::new(value).expect("valid agent id")
}

/// Agent with start and stop hooks whose start can be made to fail.
#[derive(Default)]
pub struct FlakyAgent {
    pub fail_start: AtomicBool,
    pub starts: AtomicU32,
    pub stops: AtomicU32,
}

impl FlakyAgent {
    /// Creates an agent whose start hook always fails.
    pub fn broken() -> Self {
        let agent = Self::default();
        agent.fail_start.store(true, Ordering::SeqCst);
        agent
    }
}

#[async_trait]
impl Startable for FlakyAgent {
    async fn start(&self) -> AgentHookResult<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(AgentHookError::rejected("port 8080 already bound"));
        }
        Ok(())
    }
}

#[async_trait]
impl Stoppable for FlakyAgent {
    async fn stop(&self) -> AgentHookResult<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl ManagedAgent for FlakyAgent {
    fn as_startable(&self) -> Option<&dyn Startable> {
        Some(self)
    }

    fn as_stoppable(&self) -> Option<&dyn Stoppable> {
        Some(self)
    }
}
