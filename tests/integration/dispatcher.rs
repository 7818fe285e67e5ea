use std::sync::Arc;

use blockinspector::{
    dispatcher::ChainDispatcher,
    inspectors::FamilyInspector,
    models::{ChainFamily, TransactionStatus},
};

use crate::integration::mocks::{
    create_test_chain, create_test_result, create_test_validation, FakeInspector,
};

const HASH: &str = "0xfeed";

fn dispatcher(evm: &Arc<FakeInspector>, tron: &Arc<FakeInspector>) -> ChainDispatcher {
    let mut inspectors: Vec<Arc<dyn FamilyInspector>> = Vec::new();
    inspectors.push(evm.clone());
    inspectors.push(tron.clone());
    ChainDispatcher::new(inspectors)
}

async fn register(dispatcher: &ChainDispatcher, chains: &[(u64, ChainFamily)]) {
    for (id, family) in chains {
        assert!(dispatcher
            .add_chain(&create_test_chain(*id, *family, 18, 12))
            .await
            .unwrap());
    }
}

#[tokio::test]
async fn test_scan_tries_chains_in_registration_order() {
    let evm = Arc::new(FakeInspector::new(ChainFamily::Evm, vec![3]));
    let tron = Arc::new(FakeInspector::new(ChainFamily::Tron, vec![2]));
    let dispatcher = dispatcher(&evm, &tron);
    register(&dispatcher, &[(1, ChainFamily::Evm), (2, ChainFamily::Tron), (3, ChainFamily::Evm)]).await;

    let result = dispatcher.scan(9, HASH).await.unwrap().unwrap();

    assert_eq!(result.chain_in_id, 2);
    assert_eq!(result.id, 9);
    assert_eq!(*evm.scanned.lock().unwrap(), vec![1]);
    assert_eq!(*tron.scanned.lock().unwrap(), vec![2]);
}

#[tokio::test]
async fn test_scan_not_found_anywhere() {
    let evm = Arc::new(FakeInspector::new(ChainFamily::Evm, vec![]));
    let tron = Arc::new(FakeInspector::new(ChainFamily::Tron, vec![]));
    let dispatcher = dispatcher(&evm, &tron);
    register(&dispatcher, &[(1, ChainFamily::Evm), (2, ChainFamily::Tron), (3, ChainFamily::Evm)]).await;

    assert!(dispatcher.scan(9, HASH).await.unwrap().is_none());
    assert_eq!(*evm.scanned.lock().unwrap(), vec![1, 3]);
    assert_eq!(*tron.scanned.lock().unwrap(), vec![2]);
}

#[tokio::test]
async fn test_scan_without_chains() {
    let evm = Arc::new(FakeInspector::new(ChainFamily::Evm, vec![1]));
    let tron = Arc::new(FakeInspector::new(ChainFamily::Tron, vec![]));
    let dispatcher = dispatcher(&evm, &tron);

    assert!(dispatcher.scan(9, HASH).await.unwrap().is_none());
    assert!(evm.scanned.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_validate_routes_by_chain() {
    let evm = Arc::new(FakeInspector::new(ChainFamily::Evm, vec![]).with_validations(vec![Ok(Some(
        create_test_validation(TransactionStatus::Finished, 120, HASH),
    ))]));
    let tron = Arc::new(FakeInspector::new(ChainFamily::Tron, vec![]));
    let dispatcher = dispatcher(&evm, &tron);
    register(&dispatcher, &[(1, ChainFamily::Evm), (2, ChainFamily::Tron)]).await;

    let response = dispatcher
        .validate(&create_test_result(1, HASH, 100, None))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(response.status, TransactionStatus::Finished);
    assert_eq!(*evm.validated.lock().unwrap(), vec![1]);
    assert!(tron.validated.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_validate_unregistered_chain() {
    let evm = Arc::new(FakeInspector::new(ChainFamily::Evm, vec![]));
    let tron = Arc::new(FakeInspector::new(ChainFamily::Tron, vec![]));
    let dispatcher = dispatcher(&evm, &tron);
    register(&dispatcher, &[(1, ChainFamily::Evm)]).await;

    let response = dispatcher
        .validate(&create_test_result(42, HASH, 100, None))
        .await
        .unwrap();

    assert!(response.is_none());
    assert!(evm.validated.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_chain_is_idempotent() {
    let evm = Arc::new(FakeInspector::new(ChainFamily::Evm, vec![]));
    let tron = Arc::new(FakeInspector::new(ChainFamily::Tron, vec![]));
    let dispatcher = dispatcher(&evm, &tron);
    let chain = create_test_chain(56, ChainFamily::Evm, 18, 15);

    assert!(dispatcher.add_chain(&chain).await.unwrap());
    assert!(!dispatcher.add_chain(&chain).await.unwrap());

    assert_eq!(dispatcher.chain_ids().await, vec![56]);
    assert_eq!(*evm.registered.lock().unwrap(), vec![56]);
}

#[tokio::test]
async fn test_add_chain_without_family_inspector_is_ignored() {
    let evm = Arc::new(FakeInspector::new(ChainFamily::Evm, vec![]));
    let mut inspectors: Vec<Arc<dyn FamilyInspector>> = Vec::new();
    inspectors.push(evm.clone());
    let dispatcher = ChainDispatcher::new(inspectors);

    let added = dispatcher
        .add_chain(&create_test_chain(728126428, ChainFamily::Tron, 6, 19))
        .await
        .unwrap();

    assert!(!added);
    assert!(dispatcher.chain_ids().await.is_empty());
    assert!(evm.registered.lock().unwrap().is_empty());
}
