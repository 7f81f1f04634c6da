mod common;

use chrono::NaiveDate;
use storage::error::StorageError;
use storage::repository::rating::RatingRepository;
use storage::repository::record::RecordRepository;
use storage::repository::selection::{NewSelection, SelectionRepository};
use storage::services::rating::rate;
use storage::services::selection::run_selection;
use storage::services::stats::distribution;
use uuid::Uuid;

use common::{add_records, create_user, setup_db};

/// Append a ledger entry directly, bypassing the draw, so tests can pin the
/// winner and the timestamp.
async fn append_selection(
    db: &storage::Database,
    chosen_user: Uuid,
    record: Uuid,
    initiated_by: Uuid,
    timestamp: chrono::NaiveDateTime,
) -> Uuid {
    let selection_id = Uuid::new_v4();
    SelectionRepository::append(
        db.pool(),
        NewSelection {
            selection_id,
            timestamp,
            chosen_user_id: chosen_user,
            record_id: record,
            initiated_by: Some(initiated_by),
            participants: format!("{chosen_user}"),
            weights_before: "{}".to_string(),
            weight_changes: "{}".to_string(),
        },
    )
    .await
    .expect("failed to append selection");
    selection_id
}

fn noon() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn rating_bounds_are_inclusive() {
    let db = setup_db("rating_bounds").await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;
    add_records(&db, &alice, 1).await;
    add_records(&db, &bob, 1).await;

    run_selection(&db, &[alice.user_id, bob.user_id], alice.user_id)
        .await
        .expect("selection failed");
    let selection_id = SelectionRepository::new(db.pool())
        .list_history(None, false, 0, 10)
        .await
        .unwrap()[0]
        .selection_id;

    for invalid in [-0.01, 10.01, -5.0, 42.0] {
        let err = rate(db.pool(), selection_id, alice.user_id, invalid)
            .await
            .expect_err("out-of-range rating accepted");
        assert!(matches!(err, StorageError::RatingOutOfRange(_)));
    }

    for valid in [0.0, 10.0, 7.25] {
        rate(db.pool(), selection_id, alice.user_id, valid)
            .await
            .expect("in-range rating rejected");
    }

    // Values are rounded to two decimals on write.
    rate(db.pool(), selection_id, bob.user_id, 7.333).await.unwrap();
    let stored = RatingRepository::new(db.pool())
        .list_for_selection(selection_id)
        .await
        .unwrap();
    let bobs = stored
        .iter()
        .find(|r| r.user_id == bob.user_id)
        .expect("rating missing");
    assert!((bobs.rating - 7.33).abs() < 1e-9, "stored {}", bobs.rating);
}

#[tokio::test]
async fn re_rating_overwrites_instead_of_duplicating() {
    let db = setup_db("rating_upsert").await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;
    add_records(&db, &alice, 1).await;
    add_records(&db, &bob, 1).await;

    run_selection(&db, &[alice.user_id, bob.user_id], alice.user_id)
        .await
        .expect("selection failed");
    let selection_id = SelectionRepository::new(db.pool())
        .list_history(None, false, 0, 10)
        .await
        .unwrap()[0]
        .selection_id;

    let ratings = RatingRepository::new(db.pool());

    rate(db.pool(), selection_id, alice.user_id, 3.0)
        .await
        .unwrap();
    rate(db.pool(), selection_id, alice.user_id, 8.5)
        .await
        .unwrap();

    let stored = ratings.list_for_selection(selection_id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert!((stored[0].rating - 8.5).abs() < 1e-9);

    rate(db.pool(), selection_id, bob.user_id, 4.5).await.unwrap();

    let stored = ratings.list_for_selection(selection_id).await.unwrap();
    assert_eq!(stored.len(), 2);

    let average = ratings
        .average_for_selection(selection_id)
        .await
        .unwrap()
        .expect("average missing");
    assert!((average - 6.5).abs() < 1e-9);
}

#[tokio::test]
async fn rating_unknown_selection_fails() {
    let db = setup_db("rating_unknown").await;
    let alice = create_user(&db, "alice").await;
    let ghost = Uuid::new_v4();

    let err = rate(db.pool(), ghost, alice.user_id, 5.0)
        .await
        .expect_err("rating a missing selection should fail");

    assert!(matches!(err, StorageError::SelectionNotFound(id) if id == ghost));
}

#[tokio::test]
async fn empty_ledger_yields_zero_report() {
    let db = setup_db("stats_empty").await;

    let stats = distribution(db.pool(), None).await.unwrap();

    assert_eq!(stats.total_selections, 0);
    assert!(stats.user_distribution.is_empty());
    assert!(stats.record_distribution.is_empty());
}

#[tokio::test]
async fn distribution_reports_two_decimal_shares() {
    let db = setup_db("stats_shares").await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;
    add_records(&db, &alice, 3).await;
    add_records(&db, &bob, 1).await;

    let alice_records = RecordRepository::new(db.pool())
        .list_by_owner(alice.user_id, 0, 10)
        .await
        .unwrap();
    let bob_records = RecordRepository::new(db.pool())
        .list_by_owner(bob.user_id, 0, 10)
        .await
        .unwrap();

    for record in &alice_records {
        append_selection(&db, alice.user_id, record.record_id, alice.user_id, noon()).await;
    }
    append_selection(&db, bob.user_id, bob_records[0].record_id, bob.user_id, noon()).await;

    let stats = distribution(db.pool(), None).await.unwrap();

    assert_eq!(stats.total_selections, 4);
    assert_eq!(stats.user_distribution["alice"], "75.00%");
    assert_eq!(stats.user_distribution["bob"], "25.00%");
    assert_eq!(stats.record_distribution.len(), 4);
    for share in stats.record_distribution.values() {
        assert_eq!(share, "25.00%");
    }

    // Filtered to bob's initiated selections only.
    let stats = distribution(db.pool(), Some(bob.user_id)).await.unwrap();
    assert_eq!(stats.total_selections, 1);
    assert_eq!(stats.user_distribution["bob"], "100.00%");
}

#[tokio::test]
async fn history_breaks_timestamp_ties_by_insertion_order() {
    let db = setup_db("history_ordering").await;
    let alice = create_user(&db, "alice").await;
    add_records(&db, &alice, 3).await;

    let records = RecordRepository::new(db.pool())
        .list_by_owner(alice.user_id, 0, 10)
        .await
        .unwrap();

    let mut appended = Vec::new();
    for record in &records {
        appended
            .push(append_selection(&db, alice.user_id, record.record_id, alice.user_id, noon()).await);
    }

    let history = SelectionRepository::new(db.pool())
        .list_history(None, false, 0, 10)
        .await
        .unwrap();

    // Identical timestamps: newest insertion first, deterministically.
    let listed: Vec<Uuid> = history.iter().map(|s| s.selection_id).collect();
    let expected: Vec<Uuid> = appended.iter().rev().copied().collect();
    assert_eq!(listed, expected);
}

#[tokio::test]
async fn history_sorted_by_rating_puts_unrated_last() {
    let db = setup_db("history_by_rating").await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;
    add_records(&db, &alice, 2).await;

    let records = RecordRepository::new(db.pool())
        .list_by_owner(alice.user_id, 0, 10)
        .await
        .unwrap();

    let low = append_selection(&db, alice.user_id, records[0].record_id, alice.user_id, noon()).await;
    let high = append_selection(&db, alice.user_id, records[1].record_id, alice.user_id, noon()).await;

    rate(db.pool(), high, bob.user_id, 9.0).await.unwrap();
    rate(db.pool(), low, bob.user_id, 2.0).await.unwrap();

    let history = SelectionRepository::new(db.pool())
        .list_history(None, true, 0, 10)
        .await
        .unwrap();

    assert_eq!(history[0].selection_id, high);
    assert!((history[0].average_rating.unwrap() - 9.0).abs() < 1e-9);
    assert_eq!(history[1].selection_id, low);

    // An unrated third entry sorts as rating zero, below both.
    add_records(&db, &bob, 1).await;
    let bob_records = RecordRepository::new(db.pool())
        .list_by_owner(bob.user_id, 0, 10)
        .await
        .unwrap();
    let unrated =
        append_selection(&db, bob.user_id, bob_records[0].record_id, bob.user_id, noon()).await;

    let history = SelectionRepository::new(db.pool())
        .list_history(None, true, 0, 10)
        .await
        .unwrap();
    assert_eq!(history[2].selection_id, unrated);
    assert!(history[2].average_rating.is_none());
}

#[tokio::test]
async fn history_filters_by_initiator() {
    let db = setup_db("history_initiator").await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;
    add_records(&db, &alice, 2).await;

    let records = RecordRepository::new(db.pool())
        .list_by_owner(alice.user_id, 0, 10)
        .await
        .unwrap();

    append_selection(&db, alice.user_id, records[0].record_id, alice.user_id, noon()).await;
    let bobs = append_selection(&db, alice.user_id, records[1].record_id, bob.user_id, noon()).await;

    let history = SelectionRepository::new(db.pool())
        .list_history(Some(bob.user_id), false, 0, 10)
        .await
        .unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].selection_id, bobs);
    assert_eq!(history[0].chosen_user.username, "alice");
    assert_eq!(history[0].record.record_id, records[1].record_id);
}
