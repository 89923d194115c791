//! Snapshot History
//!
//! Append-only record of readiness results, each tagged with the market
//! risk level that was active when it was computed.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AdvisorError, Result};
use crate::model::{Breakdown, MarketRiskLevel, ReadinessResult, ReadinessStatus};

pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Immutable copy of one readiness computation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReadinessSnapshot {
    pub id: Uuid,
    pub user_id: String,
    pub score: u8,
    pub status: ReadinessStatus,
    pub notes: String,
    pub market_risk_level: MarketRiskLevel,
    pub breakdown: Breakdown,
    pub created_at: DateTime<Utc>,
}

impl ReadinessSnapshot {
    pub fn new(
        user_id: impl Into<String>,
        result: &ReadinessResult,
        market_risk_level: MarketRiskLevel,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            score: result.score,
            status: result.status,
            notes: result.status_message.clone(),
            market_risk_level,
            breakdown: result.breakdown.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Storage backend for snapshots
pub trait SnapshotStore: Send + Sync {
    fn append(&self, snapshot: ReadinessSnapshot) -> Result<()>;

    /// Newest first, at most `limit` entries
    fn history(&self, user_id: &str, limit: usize) -> Result<Vec<ReadinessSnapshot>>;

    fn latest(&self, user_id: &str) -> Result<Option<ReadinessSnapshot>> {
        Ok(self.history(user_id, 1)?.into_iter().next())
    }
}

/// In-memory snapshot store (for development/testing)
#[derive(Default)]
pub struct MemorySnapshotStore {
    snapshots: RwLock<HashMap<String, Vec<ReadinessSnapshot>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> AdvisorError {
    AdvisorError::Storage("snapshot store lock poisoned".into())
}

impl SnapshotStore for MemorySnapshotStore {
    fn append(&self, snapshot: ReadinessSnapshot) -> Result<()> {
        let mut snapshots = self.snapshots.write().map_err(poisoned)?;
        tracing::debug!(user_id = %snapshot.user_id, score = snapshot.score, "Snapshot appended");
        snapshots
            .entry(snapshot.user_id.clone())
            .or_default()
            .push(snapshot);
        Ok(())
    }

    fn history(&self, user_id: &str, limit: usize) -> Result<Vec<ReadinessSnapshot>> {
        let snapshots = self.snapshots.read().map_err(poisoned)?;
        let Some(entries) = snapshots.get(user_id) else {
            return Ok(Vec::new());
        };

        // latest append wins a timestamp tie
        let mut result: Vec<_> = entries.iter().rev().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result.truncate(limit);
        Ok(result)
    }
}
