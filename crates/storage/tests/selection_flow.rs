mod common;

use std::collections::HashSet;

use storage::error::StorageError;
use storage::repository::record::RecordRepository;
use storage::repository::selection::SelectionRepository;
use storage::services::selection::run_selection;
use uuid::Uuid;

use common::{add_records, create_user, current_weight, setup_db};

#[tokio::test]
async fn selection_claims_record_and_conserves_weights() {
    let db = setup_db("selection_basic").await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;
    add_records(&db, &alice, 2).await;
    add_records(&db, &bob, 1).await;

    let participants = vec![alice.user_id, bob.user_id];
    let result = run_selection(&db, &participants, alice.user_id)
        .await
        .expect("selection failed");

    assert_eq!(result.new_weights.len(), 2);
    let total: f64 = result.new_weights.iter().sum();
    assert!((total - 200.0).abs() < 1e-9, "total weight drifted: {total}");
    assert!(result.chosen_record.contains(" - "));

    // The claimed record belongs to the winner and is terminally used.
    let pairs = SelectionRepository::new(db.pool())
        .chosen_pairs(None)
        .await
        .unwrap();
    assert_eq!(pairs.len(), 1);
    let (winner_id, record_id) = pairs[0];
    let record = RecordRepository::new(db.pool())
        .find_by_id(record_id)
        .await
        .unwrap();
    assert_eq!(record.owner_id, winner_id);
    assert!(record.used);
    assert!(record.used_at.is_some());

    // Winner lost half its weight, the other participant gained it.
    let winner_index = if winner_id == alice.user_id { 0 } else { 1 };
    assert!((result.new_weights[winner_index] - 50.0).abs() < 1e-9);
    assert!((result.new_weights[1 - winner_index] - 150.0).abs() < 1e-9);

    // Persisted weights match the returned vector.
    let alice_weight = current_weight(&db, &alice).await;
    let bob_weight = current_weight(&db, &bob).await;
    assert!((alice_weight - result.new_weights[0]).abs() < 1e-9);
    assert!((bob_weight - result.new_weights[1]).abs() < 1e-9);
}

#[tokio::test]
async fn new_weights_follow_request_order() {
    let db = setup_db("selection_order").await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;
    let carol = create_user(&db, "carol").await;
    add_records(&db, &alice, 5).await;
    add_records(&db, &bob, 5).await;
    add_records(&db, &carol, 5).await;

    let participants = vec![carol.user_id, alice.user_id, bob.user_id];
    let result = run_selection(&db, &participants, alice.user_id)
        .await
        .expect("selection failed");

    let carol_weight = current_weight(&db, &carol).await;
    let alice_weight = current_weight(&db, &alice).await;
    let bob_weight = current_weight(&db, &bob).await;

    assert!((result.new_weights[0] - carol_weight).abs() < 1e-9);
    assert!((result.new_weights[1] - alice_weight).abs() < 1e-9);
    assert!((result.new_weights[2] - bob_weight).abs() < 1e-9);
}

#[tokio::test]
async fn participants_without_records_never_win_but_still_rebalance() {
    let db = setup_db("selection_ineligible").await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;
    let carol = create_user(&db, "carol").await;
    add_records(&db, &alice, 60).await;
    add_records(&db, &carol, 60).await;

    let participants = vec![alice.user_id, bob.user_id, carol.user_id];
    for _ in 0..50 {
        let result = run_selection(&db, &participants, alice.user_id)
            .await
            .expect("selection failed");
        assert_ne!(result.chosen_username, "bob");
    }

    // Bob owned no records but was present, so his weight moved anyway.
    let bob_weight = current_weight(&db, &bob).await;
    assert!(bob_weight > 100.0);

    let total = current_weight(&db, &alice).await
        + bob_weight
        + current_weight(&db, &carol).await;
    assert!((total - 300.0).abs() < 1e-6, "total weight drifted: {total}");
}

#[tokio::test]
async fn selection_fails_when_nobody_has_unused_records() {
    let db = setup_db("selection_no_eligible").await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;

    let err = run_selection(&db, &[alice.user_id, bob.user_id], alice.user_id)
        .await
        .expect_err("selection should fail");

    assert!(matches!(err, StorageError::NoEligibleUsers));
    assert!(
        err.to_string()
            .contains("None of the selected users have unused records")
    );
}

#[tokio::test]
async fn selection_requires_two_distinct_participants() {
    let db = setup_db("selection_insufficient").await;
    let alice = create_user(&db, "alice").await;
    add_records(&db, &alice, 1).await;

    let err = run_selection(&db, &[alice.user_id], alice.user_id)
        .await
        .expect_err("single participant should fail");
    assert!(matches!(err, StorageError::InsufficientParticipants));

    // Duplicates do not count as distinct participants.
    let err = run_selection(&db, &[alice.user_id, alice.user_id], alice.user_id)
        .await
        .expect_err("duplicated participant should fail");
    assert!(matches!(err, StorageError::InsufficientParticipants));
}

#[tokio::test]
async fn unknown_participant_is_rejected() {
    let db = setup_db("selection_unknown").await;
    let alice = create_user(&db, "alice").await;
    add_records(&db, &alice, 1).await;
    let ghost = Uuid::new_v4();

    let err = run_selection(&db, &[alice.user_id, ghost], alice.user_id)
        .await
        .expect_err("unknown participant should fail");

    match err {
        StorageError::UnknownUser(id) => assert_eq!(id, ghost),
        other => panic!("expected UnknownUser, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_selections_never_double_claim() {
    let db = setup_db("selection_concurrent").await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;
    add_records(&db, &alice, 3).await;
    add_records(&db, &bob, 3).await;

    let participants = vec![alice.user_id, bob.user_id];
    let mut handles = Vec::new();
    for _ in 0..20 {
        let db = db.clone();
        let participants = participants.clone();
        let initiator = alice.user_id;
        handles.push(tokio::spawn(async move {
            run_selection(&db, &participants, initiator).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => successes += 1,
            Err(StorageError::NoEligibleUsers) => {}
            Err(other) => panic!("unexpected selection error: {other:?}"),
        }
    }

    // Six records exist in total, so exactly six selections can succeed.
    assert_eq!(successes, 6);

    let pairs = SelectionRepository::new(db.pool())
        .chosen_pairs(None)
        .await
        .unwrap();
    assert_eq!(pairs.len(), 6);

    let claimed: HashSet<Uuid> = pairs.iter().map(|(_, record_id)| *record_id).collect();
    assert_eq!(claimed.len(), 6, "a record was claimed twice");

    let total = current_weight(&db, &alice).await + current_weight(&db, &bob).await;
    assert!((total - 200.0).abs() < 1e-6, "total weight drifted: {total}");
}
