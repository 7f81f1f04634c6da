use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::Database;
use crate::dto::selection::SelectionResult;
use crate::error::{Result, StorageError};
use crate::models::User;
use crate::repository::record::RecordRepository;
use crate::repository::selection::{NewSelection, SelectionRepository};
use crate::repository::user::UserRepository;

/// Fraction of the winner's weight removed and redistributed after a
/// selection. Half keeps the "richer get picked less" pressure strong without
/// ever zeroing a winner out.
pub const REBALANCE_FRACTION: f64 = 0.5;

/// Draw one candidate with probability proportional to weight. Weight zero
/// means zero probability; when every candidate is at zero the draw falls back
/// to uniform so the system cannot get stuck.
pub fn draw_winner(candidates: &[(Uuid, f64)], rng: &mut impl Rng) -> Option<Uuid> {
    if candidates.is_empty() {
        return None;
    }

    let total: f64 = candidates.iter().map(|(_, weight)| weight).sum();
    if total <= 0.0 {
        return Some(candidates[rng.gen_range(0..candidates.len())].0);
    }

    let mut draw = rng.gen_range(0.0..total);
    for (id, weight) in candidates {
        if *weight <= 0.0 {
            continue;
        }
        if draw < *weight {
            return Some(*id);
        }
        draw -= weight;
    }

    // Float rounding can step past the last bucket; hand the draw to the last
    // candidate that actually carried weight.
    candidates
        .iter()
        .rev()
        .find(|(_, weight)| *weight > 0.0)
        .map(|(id, _)| *id)
}

/// Recompute weights after a selection: the winner loses `fraction` of its
/// weight and the removed amount is split across the other participants in
/// proportion to their current weights (evenly when they hold none). The sum
/// of weights over `participants` is conserved.
pub fn rebalance(
    participants: &[(Uuid, f64)],
    winner: Uuid,
    fraction: f64,
) -> HashMap<Uuid, f64> {
    let winner_weight = participants
        .iter()
        .find(|(id, _)| *id == winner)
        .map(|(_, weight)| *weight)
        .unwrap_or(0.0);
    let removed = winner_weight * fraction;

    let others: Vec<&(Uuid, f64)> = participants.iter().filter(|(id, _)| *id != winner).collect();
    let others_total: f64 = others.iter().map(|(_, weight)| weight).sum();

    let mut updated = HashMap::with_capacity(participants.len());
    updated.insert(winner, winner_weight - removed);

    for (id, weight) in others.iter() {
        let share = if others_total > 0.0 {
            removed * weight / others_total
        } else {
            removed / others.len() as f64
        };
        updated.insert(*id, weight + share);
    }

    updated
}

/// Run one full selection as a single critical section: resolve participants,
/// draw a winner among those with unused records, claim one of the winner's
/// records, rebalance weights for every supplied participant and append the
/// outcome to the ledger.
///
/// `new_weights` in the result follows the order of `participant_ids` exactly.
pub async fn run_selection(
    db: &Database,
    participant_ids: &[Uuid],
    initiated_by: Uuid,
) -> Result<SelectionResult> {
    let _guard = db.selection_lock().lock().await;

    let mut distinct: Vec<Uuid> = Vec::new();
    for id in participant_ids {
        if !distinct.contains(id) {
            distinct.push(*id);
        }
    }
    if distinct.len() < 2 {
        return Err(StorageError::InsufficientParticipants);
    }

    let users = UserRepository::new(db.pool());
    let records = RecordRepository::new(db.pool());

    let by_id: HashMap<Uuid, User> = users
        .find_many(&distinct)
        .await?
        .into_iter()
        .map(|user| (user.user_id, user))
        .collect();

    for id in &distinct {
        match by_id.get(id) {
            Some(user) if user.is_active => {}
            _ => return Err(StorageError::UnknownUser(*id)),
        }
    }

    let mut eligible: Vec<(Uuid, f64)> = Vec::new();
    for id in &distinct {
        if records.has_unused(*id).await? {
            eligible.push((*id, by_id[id].weight));
        }
    }
    if eligible.is_empty() {
        return Err(StorageError::NoEligibleUsers);
    }

    let winner_id = {
        let mut rng = rand::thread_rng();
        draw_winner(&eligible, &mut rng)
    }
    .ok_or(StorageError::NoEligibleUsers)?;
    let winner = &by_id[&winner_id];

    // Claim, weight writes and the ledger append commit together; any failure
    // rolls all of them back, leaving the record unclaimed.
    let now = Utc::now().naive_utc();
    let mut tx = db.pool().begin().await?;

    let record = RecordRepository::claim_random_unused(&mut tx, winner_id, now)
        .await?
        .ok_or_else(|| StorageError::NoUnusedRecords(winner.username.clone()))?;

    let before: Vec<(Uuid, f64)> = distinct.iter().map(|id| (*id, by_id[id].weight)).collect();
    let updated = rebalance(&before, winner_id, REBALANCE_FRACTION);

    for (id, weight) in &updated {
        UserRepository::update_weight(&mut *tx, *id, *weight).await?;
    }

    let weights_before: BTreeMap<String, f64> = before
        .iter()
        .map(|(id, weight)| (id.to_string(), *weight))
        .collect();
    let weight_changes: BTreeMap<String, f64> = updated
        .iter()
        .map(|(id, weight)| (id.to_string(), *weight))
        .collect();

    SelectionRepository::append(
        &mut *tx,
        NewSelection {
            selection_id: Uuid::new_v4(),
            timestamp: now,
            chosen_user_id: winner_id,
            record_id: record.record_id,
            initiated_by: Some(initiated_by),
            participants: participant_ids
                .iter()
                .map(Uuid::to_string)
                .collect::<Vec<_>>()
                .join(","),
            weights_before: serde_json::to_string(&weights_before)?,
            weight_changes: serde_json::to_string(&weight_changes)?,
        },
    )
    .await?;

    tx.commit().await?;

    Ok(SelectionResult {
        chosen_username: winner.username.clone(),
        chosen_record: format!("{} - {}", record.artist, record.title),
        new_weights: participant_ids.iter().map(|id| updated[id]).collect(),
        timestamp: now,
    })
}
