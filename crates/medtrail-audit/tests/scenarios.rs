//! End-to-end behavior of the audit trail as seen by calling components.

mod common;

use std::sync::Arc;

use medtrail_audit::{AuditError, ErrorCode, EventId, Response};
use medtrail_core::{CallContext, Timestamp};
use medtrail_storage::{KvStore, MemoryKvStore};
use medtrail_test::{
    BLOCK_TIME, FailingKvStore, administrator, at, direct, patient, patient_identity, provider,
    provider_verification, record_access, setup_test_logging, unauthorized_contract,
};

use common::{test_trail, trail_over};

#[tokio::test]
async fn test_allow_listed_contract_records_event() {
    setup_test_logging("debug");
    let mut trail = test_trail().await;

    let id = trail
        .record(
            &at(provider(), patient_identity()),
            "REGISTER_PATIENT",
            "PATIENT123",
            patient(),
        )
        .await
        .unwrap();
    assert_eq!(id, EventId(0));

    let event = trail.fetch(&direct(administrator()), id).await.unwrap();
    assert_eq!(event.event_type, "REGISTER_PATIENT");
    assert_eq!(event.resource_id, "PATIENT123");
    assert_eq!(event.actor, patient());
    assert_eq!(event.timestamp, BLOCK_TIME);
    assert_eq!(event.detail, None);
}

#[tokio::test]
async fn test_detail_is_stored_verbatim() {
    let mut trail = test_trail().await;

    let id = trail
        .record_with_detail(
            &at(provider(), record_access()),
            "GRANT_ACCESS",
            "PATIENT123",
            provider(),
            "Access granted for annual checkup",
        )
        .await
        .unwrap();

    let event = trail.fetch(&direct(administrator()), id).await.unwrap();
    assert_eq!(
        event.detail.as_deref(),
        Some("Access granted for annual checkup")
    );
}

#[tokio::test]
async fn test_unauthorized_caller_is_rejected_without_state_change() {
    let mut trail = test_trail().await;

    let result = trail
        .record(
            &at(provider(), unauthorized_contract()),
            "REGISTER_PATIENT",
            "PATIENT123",
            patient(),
        )
        .await;
    let response = Response::from_result(result).unwrap();
    assert_eq!(response, Response::Err(ErrorCode::Unauthorized));
    assert_eq!(trail.event_count(), 0);

    // The next successful write still gets id 0.
    let id = trail
        .record(&direct(administrator()), "X", "R", patient())
        .await
        .unwrap();
    assert_eq!(id, EventId(0));
}

#[tokio::test]
async fn test_empty_event_type_is_invalid_input() {
    let mut trail = test_trail().await;

    let err = trail
        .record(&at(provider(), patient_identity()), "", "PATIENT123", patient())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidInput));
    assert_eq!(trail.event_count(), 0);
}

#[tokio::test]
async fn test_unauthorized_wins_over_invalid_input() {
    let mut trail = test_trail().await;

    let err = trail
        .record_with_detail(
            &at(patient(), unauthorized_contract()),
            "",
            "PATIENT123",
            patient(),
            "",
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Unauthorized));
    assert_eq!(trail.event_count(), 0);

    let id = trail
        .record_with_detail(
            &at(patient(), patient_identity()),
            "REGISTER_PATIENT",
            "PATIENT123",
            patient(),
            "",
        )
        .await
        .unwrap();
    assert_eq!(id, EventId(0));
}

#[tokio::test]
async fn test_ids_are_dense_across_writers() {
    let mut trail = test_trail().await;
    let writers = [
        at(patient(), patient_identity()),
        at(provider(), provider_verification()),
        at(provider(), record_access()),
        direct(administrator()),
    ];

    let mut ids = Vec::new();
    for (n, ctx) in writers.iter().enumerate() {
        // Interleave a rejected write between every accepted one.
        let rejected = trail
            .record(&at(provider(), unauthorized_contract()), "X", "R", patient())
            .await;
        assert!(matches!(rejected, Err(AuditError::Unauthorized)));

        // Alternate the plain and annotated writes.
        let resource = format!("R{n}");
        let id = if n.is_multiple_of(2) {
            trail.record(ctx, "EVENT", &resource, patient()).await
        } else {
            trail
                .record_with_detail(ctx, "EVENT", &resource, patient(), "annotated")
                .await
        }
        .unwrap();
        ids.push(id.0);
    }
    assert_eq!(ids, vec![0, 1, 2, 3]);
    assert_eq!(trail.event_count(), 4);

    let admin = direct(administrator());
    let plain = trail.fetch(&admin, EventId(2)).await.unwrap();
    assert_eq!(plain.resource_id, "R2");
    assert!(plain.detail.is_none());
    let annotated = trail.fetch(&admin, EventId(3)).await.unwrap();
    assert_eq!(annotated.resource_id, "R3");
    assert_eq!(annotated.detail.as_deref(), Some("annotated"));
}

#[tokio::test]
async fn test_trails_sharing_a_store_never_overwrite_events() {
    let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    let mut first = trail_over(Arc::clone(&kv)).await;
    let mut second = trail_over(Arc::clone(&kv)).await;

    let a = first
        .record(&at(provider(), patient_identity()), "FIRST", "R", patient())
        .await
        .unwrap();
    let b = second
        .record(&at(provider(), record_access()), "SECOND", "R", patient())
        .await
        .unwrap();
    assert_eq!(a, EventId(0));
    assert_eq!(b, EventId(1));

    let admin = direct(administrator());
    assert_eq!(first.fetch(&admin, a).await.unwrap().event_type, "FIRST");
    assert_eq!(first.fetch(&admin, b).await.unwrap().event_type, "SECOND");

    let c = first
        .record(&admin, "THIRD", "R", patient())
        .await
        .unwrap();
    assert_eq!(c, EventId(2));
    assert_eq!(second.fetch(&admin, a).await.unwrap().event_type, "FIRST");
}

#[tokio::test]
async fn test_only_administrator_reads() {
    let mut trail = test_trail().await;
    let id = trail
        .record(&at(provider(), patient_identity()), "X", "R", patient())
        .await
        .unwrap();

    for ctx in [
        direct(provider()),
        at(provider(), patient_identity()),
        direct(patient_identity()),
    ] {
        let err = trail.fetch(&ctx, id).await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Unauthorized));
    }

    // Non-admin probing a missing id learns nothing either.
    let err = trail
        .fetch(&direct(provider()), EventId(999))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Unauthorized));

    let err = trail
        .fetch(&direct(administrator()), EventId(999))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::NotFound));
}

#[tokio::test]
async fn test_timestamps_follow_block_time() {
    let mut trail = test_trail().await;
    let admin = administrator();

    let first = CallContext::direct(admin.clone(), Timestamp::from_secs(100));
    let second = CallContext::direct(admin.clone(), Timestamp::from_secs(200));
    let a = trail.record(&first, "A", "R", patient()).await.unwrap();
    let b = trail.record(&second, "B", "R", patient()).await.unwrap();

    let reader = direct(admin);
    assert_eq!(
        trail.fetch(&reader, a).await.unwrap().timestamp,
        Timestamp::from_secs(100)
    );
    assert_eq!(
        trail.fetch(&reader, b).await.unwrap().timestamp,
        Timestamp::from_secs(200)
    );
}

#[tokio::test]
async fn test_failed_commit_leaves_no_partial_state() {
    let store = Arc::new(FailingKvStore::new());
    let mut trail = trail_over(store.clone()).await;

    trail
        .record(&direct(administrator()), "A", "R", patient())
        .await
        .unwrap();

    store.fail_writes(true);
    let err = trail
        .record(&direct(administrator()), "B", "R", patient())
        .await
        .unwrap_err();
    assert!(matches!(err, AuditError::Storage(_)));
    assert_eq!(err.code(), None);
    assert_eq!(trail.event_count(), 1);
    assert_eq!(store.commits(), 1);

    store.fail_writes(false);
    let id = trail
        .record(&direct(administrator()), "C", "R", patient())
        .await
        .unwrap();
    assert_eq!(id, EventId(1));
    let event = trail.fetch(&direct(administrator()), id).await.unwrap();
    assert_eq!(event.event_type, "C");
}

#[tokio::test]
async fn test_read_failure_is_a_host_error() {
    let store = Arc::new(FailingKvStore::new());
    let mut trail = trail_over(store.clone()).await;
    let id = trail
        .record(&direct(administrator()), "A", "R", patient())
        .await
        .unwrap();

    store.fail_reads(true);
    let result = trail.fetch(&direct(administrator()), id).await;
    assert!(Response::from_result(result).is_err());
}
