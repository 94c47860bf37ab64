//! Allocator contract tests.
//!
//! These exercise the numbering engine's guarantees against the in-memory
//! backend: uniqueness under concurrency, gaplessness on the happy path,
//! independence across accounts and document classes, prefix snapshot
//! semantics, and failure isolation.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;

use arvekit_core::{AccountId, DocumentClass};
use arvekit_store::{AllocationError, MemStore, NumberAllocator, Store};

async fn provisioned_store() -> (Arc<MemStore>, AccountId) {
    let store = Arc::new(MemStore::new());
    let account = AccountId::generate();
    store.provision_counter(&account).await.unwrap();
    (store, account)
}

#[tokio::test]
async fn concurrent_allocations_are_unique() {
    let (store, account) = provisioned_store().await;

    const N: i64 = 300;
    let tasks = (0..N).map(|_| {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store
                .allocate(&account, DocumentClass::Invoice, "2026")
                .await
                .unwrap()
        })
    });

    let numbers: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let sequences: HashSet<i64> = numbers.iter().map(|n| n.sequence()).collect();
    assert_eq!(sequences.len() as i64, N, "duplicate sequence issued");
    assert_eq!(sequences, (1..=N).collect::<HashSet<_>>(), "gap in sequence");

    let counter = store.get_counter(&account).await.unwrap().unwrap();
    assert_eq!(counter.current_invoice_number, N);
}

#[tokio::test]
async fn sequential_allocations_are_gapless() {
    let (store, account) = provisioned_store().await;

    for expected in 1..=25 {
        let number = store
            .allocate(&account, DocumentClass::Quote, "HP")
            .await
            .unwrap();
        assert_eq!(number.sequence(), expected);
    }
    assert_eq!(
        store
            .get_counter(&account)
            .await
            .unwrap()
            .unwrap()
            .current_quote_number,
        25
    );
}

#[tokio::test]
async fn accounts_allocate_independently() {
    let store = Arc::new(MemStore::new());
    let account_a = AccountId::generate();
    let account_b = AccountId::generate();
    store.provision_counter(&account_a).await.unwrap();
    store.provision_counter(&account_b).await.unwrap();

    const N: i64 = 100;
    let tasks = (0..N * 2).map(|i| {
        let store = Arc::clone(&store);
        let account = if i % 2 == 0 { account_a } else { account_b };
        tokio::spawn(async move {
            store
                .allocate(&account, DocumentClass::Invoice, "2026")
                .await
                .unwrap()
        })
    });
    for joined in join_all(tasks).await {
        joined.unwrap();
    }

    // Each account saw its own full 1..=N run; neither observed the other's
    // values.
    for account in [account_a, account_b] {
        let counter = store.get_counter(&account).await.unwrap().unwrap();
        assert_eq!(counter.current_invoice_number, N);
    }
}

#[tokio::test]
async fn document_classes_are_independent() {
    let (store, account) = provisioned_store().await;

    for _ in 0..5 {
        store
            .allocate(&account, DocumentClass::Invoice, "2026")
            .await
            .unwrap();
    }
    let quote = store
        .allocate(&account, DocumentClass::Quote, "HP")
        .await
        .unwrap();
    assert_eq!(quote.to_string(), "HP-001");

    let counter = store.get_counter(&account).await.unwrap().unwrap();
    assert_eq!(counter.current_invoice_number, 5);
    assert_eq!(counter.current_quote_number, 1);
}

#[tokio::test]
async fn padding_applies_only_below_one_thousand() {
    let (store, account) = provisioned_store().await;

    for _ in 0..6 {
        store
            .allocate(&account, DocumentClass::Quote, "HP")
            .await
            .unwrap();
    }
    let seventh = store
        .allocate(&account, DocumentClass::Quote, "HP")
        .await
        .unwrap();
    assert_eq!(seventh.to_string(), "HP-007");

    for _ in 0..1492 {
        store
            .allocate(&account, DocumentClass::Invoice, "2026")
            .await
            .unwrap();
    }
    let next = store
        .allocate(&account, DocumentClass::Invoice, "2026")
        .await
        .unwrap();
    // 1493rd invoice; no truncation beyond the 3-digit minimum pad.
    assert_eq!(next.to_string(), "2026-1493");
}

#[tokio::test]
async fn prefix_change_does_not_touch_the_sequence() {
    let (store, account) = provisioned_store().await;

    let first = store
        .allocate(&account, DocumentClass::Quote, "HP")
        .await
        .unwrap();
    assert_eq!(first.to_string(), "HP-001");

    // The account reconfigures its prefix between allocations.
    let second = store
        .allocate(&account, DocumentClass::Quote, "PAKK")
        .await
        .unwrap();
    assert_eq!(second.to_string(), "PAKK-002");

    let counter = store.get_counter(&account).await.unwrap().unwrap();
    assert_eq!(counter.current_quote_number, 2);
}

#[tokio::test]
async fn failed_allocation_leaves_counter_unchanged() {
    let (store, account) = provisioned_store().await;

    store
        .allocate(&account, DocumentClass::Invoice, "2026")
        .await
        .unwrap();

    store.fail_allocations(true);
    let err = store
        .allocate(&account, DocumentClass::Invoice, "2026")
        .await
        .unwrap_err();
    assert!(matches!(err, AllocationError::Failed(_)));

    let counter = store.get_counter(&account).await.unwrap().unwrap();
    assert_eq!(counter.current_invoice_number, 1, "partial increment observed");

    // Once storage recovers, the sequence continues without a gap: the failed
    // call never consumed a value.
    store.fail_allocations(false);
    let next = store
        .allocate(&account, DocumentClass::Invoice, "2026")
        .await
        .unwrap();
    assert_eq!(next.sequence(), 2);
}

#[tokio::test]
async fn unprovisioned_account_is_rejected() {
    let store = MemStore::new();
    let err = store
        .allocate(&AccountId::generate(), DocumentClass::Quote, "HP")
        .await
        .unwrap_err();
    assert!(matches!(err, AllocationError::AccountNotProvisioned(_)));
}

#[tokio::test]
async fn empty_prefix_is_rejected() {
    let (store, account) = provisioned_store().await;
    let err = store
        .allocate(&account, DocumentClass::Quote, "")
        .await
        .unwrap_err();
    assert!(matches!(err, AllocationError::InvalidArgument(_)));

    // Validation happens before the increment.
    let counter = store.get_counter(&account).await.unwrap().unwrap();
    assert_eq!(counter.current_quote_number, 0);
}

#[tokio::test]
async fn three_concurrent_first_invoices() {
    // A fresh account issues its first three invoices at the same moment.
    let (store, account) = provisioned_store().await;

    let tasks = (0..3).map(|_| {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store
                .allocate(&account, DocumentClass::Invoice, "2026")
                .await
                .unwrap()
                .to_string()
        })
    });

    let mut numbers: Vec<String> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();
    numbers.sort();
    assert_eq!(numbers, ["2026-001", "2026-002", "2026-003"]);

    let counter = store.get_counter(&account).await.unwrap().unwrap();
    assert_eq!(counter.current_invoice_number, 3);
}
