//! Tests for the SQL account store.

use std::sync::Arc;

use futures_util::future::join_all;
use tempfile::TempDir;

use crate::sql::{DatabaseType, SqlStore, SqlStoreConfig};
use crate::store::{
    AccountId, AccountLedger, AccountPatch, AccountStore, CreditOutcome, LedgerConfig, NewAccount,
    OverdraftPolicy,
};
use crate::LedgerError;

/// Create a test SqlStore with in-memory SQLite.
async fn setup_test_db() -> SqlStore {
    let config = SqlStoreConfig::new("sqlite::memory:").max_connections(1);
    let store = SqlStore::connect(config).await.expect("Failed to connect");
    store.init_schema().await.expect("Failed to create schema");
    store
}

/// Create a file-backed SqlStore that hands out several connections, so
/// concurrent callers really run in separate transactions.
async fn setup_shared_db(dir: &TempDir) -> SqlStore {
    let url = format!("sqlite:{}?mode=rwc", dir.path().join("ledger.db").display());
    let store = SqlStore::connect(SqlStoreConfig::new(url).max_connections(8))
        .await
        .expect("Failed to connect");
    store.init_schema().await.expect("Failed to create schema");
    store
}

fn profile(subject: &str) -> NewAccount {
    NewAccount::new(subject, format!("{subject}@example.com"), subject).name("Test", "User")
}

#[tokio::test]
async fn test_database_type_detection() {
    assert_eq!(
        DatabaseType::from_url("postgres://localhost/db"),
        Some(DatabaseType::PostgreSQL)
    );
    assert_eq!(
        DatabaseType::from_url("postgresql://localhost/db"),
        Some(DatabaseType::PostgreSQL)
    );
    assert_eq!(
        DatabaseType::from_url("mysql://localhost/db"),
        Some(DatabaseType::MySQL)
    );
    assert_eq!(
        DatabaseType::from_url("mariadb://localhost/db"),
        Some(DatabaseType::MySQL)
    );
    assert_eq!(
        DatabaseType::from_url("sqlite::memory:"),
        Some(DatabaseType::SQLite)
    );
    assert_eq!(DatabaseType::from_url("invalid://localhost"), None);
}

#[tokio::test]
async fn test_connect_rejects_unknown_scheme() {
    let err = SqlStore::connect(SqlStoreConfig::new("redis://localhost"))
        .await
        .unwrap_err();
    assert!(!err.is_duplicate_key());
}

#[tokio::test]
async fn test_init_schema_is_idempotent() {
    let store = setup_test_db().await;
    assert_eq!(store.database_type(), DatabaseType::SQLite);
    store.init_schema().await.unwrap();
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_insert_and_find() {
    let store = setup_test_db().await;
    let created = store.insert(&profile("sub_1"), 1, 10).await.unwrap();
    assert_eq!(created.subject_id, "sub_1");
    assert_eq!(created.first_name, "Test");
    assert_eq!(created.credit_balance, 10);
    assert_eq!(created.plan_id, 1);

    let by_subject = store.find_by_subject("sub_1").await.unwrap().unwrap();
    let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_subject, created);
    assert_eq!(by_id, created);

    assert!(store.find_by_subject("sub_2").await.unwrap().is_none());
    assert!(store.find_by_id(AccountId::new(999)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_unique_violation_is_duplicate_key() {
    let store = setup_test_db().await;
    store.insert(&profile("sub_1"), 1, 10).await.unwrap();

    let err = store.insert(&profile("sub_1"), 1, 10).await.unwrap_err();
    assert!(err.is_duplicate_key(), "expected duplicate key, got {err:?}");
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_by_subject() {
    let store = setup_test_db().await;
    let created = store.insert(&profile("sub_1"), 1, 10).await.unwrap();

    let updated = store
        .update_by_subject(
            "sub_1",
            &AccountPatch::new().username("renamed").plan_id(2),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.username, "renamed");
    assert_eq!(updated.plan_id, 2);
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.credit_balance, 10);

    let unchanged = store
        .update_by_subject("sub_1", &AccountPatch::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.username, "renamed");

    assert!(
        store
            .update_by_subject("missing", &AccountPatch::new().username("x"))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_delete_by_id() {
    let store = setup_test_db().await;
    let created = store.insert(&profile("sub_1"), 1, 10).await.unwrap();

    let deleted = store.delete_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(deleted.subject_id, "sub_1");
    assert!(store.delete_by_id(created.id).await.unwrap().is_none());
    assert!(store.find_by_subject("sub_1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_increment_credits() {
    let store = setup_test_db().await;
    let id = store.insert(&profile("sub_1"), 1, 20).await.unwrap().id;

    match store.increment_credits(id, -15, None).await.unwrap() {
        CreditOutcome::Applied(acc) => assert_eq!(acc.credit_balance, 5),
        other => panic!("unexpected: {other:?}"),
    }
    match store.increment_credits(id, -10, None).await.unwrap() {
        CreditOutcome::Applied(acc) => assert_eq!(acc.credit_balance, -5),
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(
        store
            .increment_credits(AccountId::new(404), 1, None)
            .await
            .unwrap(),
        CreditOutcome::NotFound
    );
}

#[tokio::test]
async fn test_increment_credits_floor() {
    let store = setup_test_db().await;
    let id = store.insert(&profile("sub_1"), 1, 3).await.unwrap().id;

    assert_eq!(
        store.increment_credits(id, -4, Some(0)).await.unwrap(),
        CreditOutcome::Rejected { balance: 3 }
    );
    match store.increment_credits(id, -3, Some(0)).await.unwrap() {
        CreditOutcome::Applied(acc) => assert_eq!(acc.credit_balance, 0),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_ledger_over_sql() {
    let ledger = AccountLedger::new(
        setup_test_db().await,
        LedgerConfig::default()
            .default_credit_balance(20)
            .overdraft(OverdraftPolicy::Reject),
    );

    let account = ledger.get_or_create_account("user_abc123").await.unwrap();
    assert_eq!(account.email, "temp_r_abc123@imaginify.com");
    assert_eq!(account.username, "user_r_abc123");
    assert_eq!(account.photo, "https://img.clerk.com/preview.png");

    let again = ledger.get_or_create_account("user_abc123").await.unwrap();
    assert_eq!(again.id, account.id);

    assert_eq!(ledger.adjust_credits(account.id, -10).await.unwrap().credit_balance, 10);
    assert_eq!(ledger.adjust_credits(account.id, -10).await.unwrap().credit_balance, 0);
    assert!(matches!(
        ledger.adjust_credits(account.id, -10).await.unwrap_err(),
        LedgerError::InsufficientCredits { balance: 0, delta: -10 }
    ));

    let err = ledger
        .create_account(NewAccount::new("user_abc123", "x@example.com", "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Conflict(_)));

    ledger.delete_account("user_abc123").await.unwrap();
    assert!(ledger.list_accounts().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_get_or_create_over_sql() {
    let dir = TempDir::new().unwrap();
    let ledger = Arc::new(AccountLedger::new(
        setup_shared_db(&dir).await,
        LedgerConfig::default(),
    ));

    let tasks = (0..32).map(|_| {
        let ledger = Arc::clone(&ledger);
        tokio::spawn(async move { ledger.get_or_create_account("user_race0001").await })
    });
    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert!(results.iter().all(|a| a.id == results[0].id));
    assert_eq!(ledger.list_accounts().await.unwrap().len(), 1);
    ledger.store().close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adjustments_over_sql() {
    let dir = TempDir::new().unwrap();
    let ledger = Arc::new(AccountLedger::new(
        setup_shared_db(&dir).await,
        LedgerConfig::default(),
    ));
    let id = ledger.get_or_create_account("user_busy").await.unwrap().id;

    let tasks = (0..100i64).map(|i| {
        let ledger = Arc::clone(&ledger);
        let delta = if i % 2 == 0 { -3 } else { 2 };
        tokio::spawn(async move { ledger.adjust_credits(id, delta).await })
    });
    for joined in join_all(tasks).await {
        joined.unwrap().unwrap();
    }

    let account = ledger.get_account_by_id(id).await.unwrap().unwrap();
    assert_eq!(account.credit_balance, 10 - 50);
    ledger.store().close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deletes_over_sql() {
    let dir = TempDir::new().unwrap();
    let ledger = Arc::new(AccountLedger::new(
        setup_shared_db(&dir).await,
        LedgerConfig::default(),
    ));
    ledger.get_or_create_account("user_gone").await.unwrap();

    let tasks = (0..16).map(|_| {
        let ledger = Arc::clone(&ledger);
        tokio::spawn(async move { ledger.delete_account("user_gone").await })
    });
    let outcomes: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let deleted = outcomes.iter().filter(|r| matches!(r, Ok(Some(_)))).count();
    assert_eq!(deleted, 1, "outcomes: {outcomes:?}");
    // Losers either saw the row gone before looking (NotFound) or lost the
    // delete itself (None); the store never reports a lock failure.
    for outcome in &outcomes {
        assert!(
            matches!(outcome, Ok(_) | Err(LedgerError::NotFound(_))),
            "unexpected outcome: {outcome:?}"
        );
    }
    assert!(ledger.get_account_by_subject_id("user_gone").await.unwrap().is_none());
    ledger.store().close().await;
}

#[tokio::test]
async fn test_delete_missing_id_returns_none() {
    let dir = TempDir::new().unwrap();
    let store = setup_shared_db(&dir).await;
    assert!(store.delete_by_id(AccountId::new(42)).await.unwrap().is_none());
    store.close().await;
}
