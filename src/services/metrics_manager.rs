use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::session_manager::Mood;

#[derive(Debug, Default, Clone, Serialize)]
pub struct MetricsData {
    pub replies: u64,
    pub fallback_replies: u64,
    pub relay_failures: u64,
    pub busy_rejections: u64,
    pub mood_usage: HashMap<String, u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Reply,
    Fallback,
    Failure,
    Busy,
}

#[derive(Debug, Clone)]
pub struct MetricsManager {
    inner: Arc<RwLock<MetricsData>>,
}

impl Default for MetricsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsManager {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MetricsData::default())),
        }
    }

    pub async fn record_outcome(&self, outcome: RelayOutcome) {
        let mut data = self.inner.write().await;
        match outcome {
            RelayOutcome::Reply => data.replies += 1,
            RelayOutcome::Fallback => {
                data.replies += 1;
                data.fallback_replies += 1;
            }
            RelayOutcome::Failure => data.relay_failures += 1,
            RelayOutcome::Busy => data.busy_rejections += 1,
        }
    }

    pub async fn increment_mood(&self, mood: Mood) {
        let mut data = self.inner.write().await;
        *data.mood_usage.entry(mood.to_string()).or_insert(0) += 1;
    }

    pub async fn get_metrics(&self) -> MetricsData {
        self.inner.read().await.clone()
    }
}
