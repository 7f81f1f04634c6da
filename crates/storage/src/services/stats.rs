use std::collections::BTreeMap;

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::dto::stats::SelectionStats;
use crate::error::Result;
use crate::repository::record::RecordRepository;
use crate::repository::selection::SelectionRepository;
use crate::repository::user::UserRepository;

/// Fold the selection history into per-user and per-record shares. An empty
/// ledger yields a zero report with empty maps, never an error.
pub async fn distribution(pool: &SqlitePool, initiated_by: Option<Uuid>) -> Result<SelectionStats> {
    let pairs = SelectionRepository::new(pool)
        .chosen_pairs(initiated_by)
        .await?;
    let total = pairs.len() as i64;

    if total == 0 {
        return Ok(SelectionStats {
            total_selections: 0,
            user_distribution: BTreeMap::new(),
            record_distribution: BTreeMap::new(),
        });
    }

    let usernames = UserRepository::new(pool).username_map().await?;
    let labels = RecordRepository::new(pool).label_map().await?;

    let mut user_counts: BTreeMap<String, i64> = BTreeMap::new();
    let mut record_counts: BTreeMap<String, i64> = BTreeMap::new();

    for (chosen_user_id, record_id) in pairs {
        let username = usernames
            .get(&chosen_user_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        *user_counts.entry(username).or_default() += 1;

        let label = labels
            .get(&record_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        *record_counts.entry(label).or_default() += 1;
    }

    Ok(SelectionStats {
        total_selections: total,
        user_distribution: into_shares(user_counts, total),
        record_distribution: into_shares(record_counts, total),
    })
}

fn into_shares(counts: BTreeMap<String, i64>, total: i64) -> BTreeMap<String, String> {
    counts
        .into_iter()
        .map(|(key, count)| (key, format_share(count, total)))
        .collect()
}

fn format_share(count: i64, total: i64) -> String {
    format!("{:.2}%", count as f64 * 100.0 / total as f64)
}
