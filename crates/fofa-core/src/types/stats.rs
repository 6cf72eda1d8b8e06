use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregation result from `search/stats`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResult {
    /// Distinct value counts per dimension (e.g. `ip`, `title`)
    #[serde(default)]
    pub distinct: HashMap<String, u64>,

    /// Bucketed aggregations keyed by dimension
    #[serde(default)]
    pub aggs: HashMap<String, Vec<AggBucket>>,

    /// When the aggregation data was last refreshed
    #[serde(default, rename = "lastupdatetime")]
    pub last_update_time: Option<String>,
}

impl StatsResult {
    /// Buckets for a dimension, empty if the server returned none
    #[must_use]
    pub fn buckets(&self, dimension: &str) -> &[AggBucket] {
        self.aggs.get(dimension).map_or(&[], Vec::as_slice)
    }

    /// Distinct count for a dimension
    #[must_use]
    pub fn distinct(&self, dimension: &str) -> Option<u64> {
        self.distinct.get(dimension).copied()
    }
}

/// One aggregation bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggBucket {
    /// Base64 query that selects this bucket
    #[serde(default)]
    pub code: String,

    /// Number of matches in the bucket
    #[serde(default)]
    pub count: u64,

    /// Display name of the bucket value
    #[serde(default)]
    pub name: String,

    /// Short code (country buckets carry ISO codes here)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_code: Option<String>,

    /// Nested buckets (country buckets carry regions)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<AggBucket>,
}
