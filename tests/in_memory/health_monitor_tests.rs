//! Health monitor integration tests driven through lifecycle-managed agents.

use super::helpers::{FlakyAgent, TestLifecycleService, agent_id, service};
use async_trait::async_trait;
use rstest::rstest;
use std::sync::Arc;
use warden::agent::domain::AgentId;
use warden::health::{
    domain::{HealthStatus, MetricThresholds},
    ports::{HealthCheckable, ProbeError, ProbeResult, ProbeTarget, RunningProbe},
    services::HealthMonitor,
};
use warden::settings::SupervisorSettings;

/// Probe target reporting the lifecycle state of one managed agent.
struct LifecycleProbe<'a> {
    service: &'a TestLifecycleService,
    agent_id: AgentId,
}

#[async_trait]
impl RunningProbe for LifecycleProbe<'_> {
    async fn is_running(&self) -> ProbeResult<bool> {
        self.service
            .is_agent_running(&self.agent_id)
            .await
            .map_err(ProbeError::runtime)
    }
}

impl ProbeTarget for LifecycleProbe<'_> {
    fn as_running_probe(&self) -> Option<&dyn RunningProbe> {
        Some(self)
    }
}

/// Service that answers health checks with a fixed verdict.
struct StaticService(bool);

#[async_trait]
impl HealthCheckable for StaticService {
    async fn is_healthy(&self) -> ProbeResult<bool> {
        Ok(self.0)
    }
}

impl ProbeTarget for StaticService {
    fn display_name(&self) -> Option<String> {
        Some("Static service".to_owned())
    }

    fn as_health_checkable(&self) -> Option<&dyn HealthCheckable> {
        Some(self)
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lifecycle_state_feeds_agent_health(service: TestLifecycleService) {
    let monitor = HealthMonitor::new(Arc::new(mockable::DefaultClock));
    for name in ["svc-a", "svc-b", "svc-c", "svc-d", "svc-e"] {
        service
            .register_agent(agent_id(name), Arc::new(FlakyAgent::default()))
            .await
            .expect("registration should succeed");
    }
    for name in ["svc-a", "svc-b", "svc-c", "svc-d"] {
        service
            .start_agent(&agent_id(name))
            .await
            .expect("start should succeed");
    }

    for name in ["svc-a", "svc-b", "svc-c", "svc-d", "svc-e"] {
        let probe = LifecycleProbe {
            service: &service,
            agent_id: agent_id(name),
        };
        monitor.check_agent_health(name, &probe).await;
    }

    let snapshot = monitor.get_system_health();
    assert_eq!(snapshot.metrics.total_agents, 5);
    assert_eq!(snapshot.metrics.healthy_agents, 4);
    assert!(snapshot.status);
    assert_eq!(
        snapshot.agents.get("svc-e").map(|entry| entry.status()),
        Some(HealthStatus::Stopped)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn probing_an_unregistered_agent_records_an_error(service: TestLifecycleService) {
    let monitor = HealthMonitor::new(Arc::new(mockable::DefaultClock));
    let probe = LifecycleProbe {
        service: &service,
        agent_id: agent_id("ghost"),
    };

    let entry = monitor.check_agent_health("ghost", &probe).await;

    assert_eq!(entry.status(), HealthStatus::Error);
    assert!(
        entry
            .error()
            .is_some_and(|message| message.contains("not registered"))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn thresholds_from_settings_gate_health() {
    let settings = SupervisorSettings::from_json_str(
        r#"{"health": {"thresholds": {"response_time": 250.0}}}"#,
    )
    .expect("settings should parse");
    let monitor =
        HealthMonitor::with_thresholds(Arc::new(mockable::DefaultClock), settings.health.thresholds);
    monitor
        .check_service_health("api", &StaticService(true))
        .await;

    monitor.set_metric("response_time", 300.0);
    let snapshot = monitor.get_system_health();

    assert!(!snapshot.status);
    assert_ne!(snapshot.thresholds, MetricThresholds::default());
    assert_eq!(
        snapshot.services.get("api").map(|entry| entry.name().to_owned()),
        Some("Static service".to_owned())
    );
}
