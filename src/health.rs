//! Provider reachability aggregation.
//!
//! Partial connectivity is a valid success state: the check succeeds as
//! long as the embedding side is reachable, with the message describing
//! whatever is degraded.

use serde::Serialize;

use crate::provider::AiProvider;

/// Reachability of one provider capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReachStatus {
    Connected,
    Unreachable,
}

/// Aggregated health report. Every field is always present.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub success: bool,
    pub message: String,
    pub embedding_provider: ReachStatus,
    pub chat_provider: ReachStatus,
}

/// Probe the provider and fold the result into a [`HealthStatus`].
pub async fn check_health(provider: &dyn AiProvider) -> HealthStatus {
    let probe = provider.health_check().await;

    let embedding_provider = if probe.embedding_reachable {
        ReachStatus::Connected
    } else {
        ReachStatus::Unreachable
    };
    let chat_provider = if probe.chat_reachable {
        ReachStatus::Connected
    } else {
        ReachStatus::Unreachable
    };

    let success = probe.embedding_reachable;
    let message = if probe.embedding_reachable && probe.chat_reachable {
        probe.detail
    } else if probe.embedding_reachable {
        format!("Chat provider degraded: {}", probe.detail)
    } else {
        format!("Embedding provider unavailable: {}", probe.detail)
    };

    HealthStatus {
        success,
        message,
        embedding_provider,
        chat_provider,
    }
}
