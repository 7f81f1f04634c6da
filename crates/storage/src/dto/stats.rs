use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Distribution report over the full selection history. Shares are formatted
/// as "NN.NN%" strings, which is what the chart rendering parses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SelectionStats {
    pub total_selections: i64,
    pub user_distribution: BTreeMap<String, String>,
    pub record_distribution: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StatsParams {
    #[serde(default, deserialize_with = "super::common::flag")]
    pub my_stats_only: bool,
}
