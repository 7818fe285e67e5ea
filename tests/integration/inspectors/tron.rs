use std::sync::Arc;

use blockinspector::{
    clients::tron::{TronContract, TronContractValue, TronParameter, TronRawData, TronRet},
    clients::{TronTransaction, TronTransactionInfo},
    inspectors::{tron::tron_inspector, FamilyInspector, RawTransaction, TronInspector},
    models::{ChainFamily, ContractKind, TransactionStatus, NATIVE_CURRENCY},
};

use crate::integration::mocks::{
    create_test_block, create_test_chain, create_test_contracts, create_test_registry,
    create_test_result, MockTronNodeClient, TRON_ID,
};

const USDT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";
const USDT_HEX: &str = "41a614f803b6fd780986a42c78ec9c7f77e6ded13c";
const OWNER_HEX: &str = "41228c3c67491d0e78f5b0a40caf83339806f25e4f";
const OWNER: &str = "TD7syM1xhh6EoPPP7MCU4FjMcjy621MCRa";
const RECIPIENT_HEX: &str = "419e62be7f4f103c36507cb2a753418791b1cdc182";
const RECIPIENT: &str = "TQQg4EL8o1BSeKJY4MJ8TB8XK7xufxFBvK";

fn hash() -> String {
    "c0".repeat(32)
}

fn inspector(client: MockTronNodeClient) -> TronInspector {
    let registry = create_test_registry(vec![create_test_chain(TRON_ID, ChainFamily::Tron, 6, 19)]);
    let contracts = create_test_contracts(vec![(USDT, TRON_ID, ContractKind::Token, 6)]);
    tron_inspector(Arc::new(client), registry, contracts)
}

fn transaction(contract_type: &str, value: TronContractValue, ret: Option<&str>) -> TronTransaction {
    TronTransaction {
        tx_id: hash(),
        raw_data: TronRawData {
            contract: vec![TronContract {
                contract_type: contract_type.to_string(),
                parameter: TronParameter { value },
            }],
        },
        ret: vec![TronRet {
            contract_ret: ret.map(str::to_string),
        }],
    }
}

fn native_transfer(ret: Option<&str>) -> TronTransaction {
    transaction(
        "TransferContract",
        TronContractValue {
            owner_address: Some(OWNER_HEX.to_string()),
            to_address: Some(RECIPIENT_HEX.to_string()),
            amount: Some(2_500_000),
            ..Default::default()
        },
        ret,
    )
}

fn token_transfer(contract: &str, amount: u64) -> TronTransaction {
    transaction(
        "TriggerSmartContract",
        TronContractValue {
            owner_address: Some(OWNER_HEX.to_string()),
            contract_address: Some(contract.to_string()),
            data: Some(format!(
                "a9059cbb{:0>64}{:064x}",
                &RECIPIENT_HEX[2..],
                amount
            )),
            ..Default::default()
        },
        Some("SUCCESS"),
    )
}

fn info(block_number: u64, fee: Option<u64>) -> TronTransactionInfo {
    TronTransactionInfo {
        id: hash(),
        fee,
        block_number,
    }
}

#[tokio::test]
async fn test_malformed_hash_makes_no_node_call() {
    let inspector = inspector(MockTronNodeClient::new());

    let prefixed = format!("0x{}", hash());
    let not_hex = "zz".repeat(32);
    for hash in [prefixed.as_str(), "c0c0", not_hex.as_str()] {
        assert!(inspector.scan(1, hash, TRON_ID).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_scan_native_transfer() {
    let mut client = MockTronNodeClient::new();
    client
        .expect_get_transaction()
        .times(1)
        .returning(|_, _| Ok(Some(native_transfer(Some("SUCCESS")))));
    client
        .expect_get_current_block()
        .returning(|_| Ok(create_test_block(1020)));
    client
        .expect_get_transaction_info()
        .times(1)
        .returning(|_, _| Ok(Some(info(1000, Some(1_100_000)))));

    let result = inspector(client).scan(3, &hash(), TRON_ID).await.unwrap().unwrap();

    assert_eq!(result.id, 3);
    assert_eq!(result.from, OWNER);
    assert_eq!(result.parse.to, RECIPIENT);
    assert_eq!(result.parse.amount, "2.5");
    assert_eq!(result.parse.currency_in, NATIVE_CURRENCY);
    assert_eq!(result.parse.contract_address, None);
    assert_eq!(result.network_fee, "1.1");
    assert_eq!(result.block_number, 1000);
    assert_eq!(result.status, TransactionStatus::Finished);
}

#[tokio::test]
async fn test_scan_failed_execution_is_rejected() {
    let mut client = MockTronNodeClient::new();
    client
        .expect_get_transaction()
        .times(1)
        .returning(|_, _| Ok(Some(native_transfer(Some("OUT_OF_ENERGY")))));
    client
        .expect_get_current_block()
        .returning(|_| Ok(create_test_block(1100)));
    client
        .expect_get_transaction_info()
        .times(1)
        .returning(|_, _| Ok(Some(info(1000, Some(500_000)))));

    let result = inspector(client).scan(3, &hash(), TRON_ID).await.unwrap().unwrap();

    assert_eq!(result.status, TransactionStatus::Rejected);
    assert_eq!(result.network_fee, "0.5");
}

#[tokio::test]
async fn test_scan_without_info_is_pending() {
    let mut client = MockTronNodeClient::new();
    client
        .expect_get_transaction()
        .times(1)
        .returning(|_, _| Ok(Some(native_transfer(None))));
    client
        .expect_get_current_block()
        .returning(|_| Ok(create_test_block(1000)));
    client
        .expect_get_transaction_info()
        .times(1)
        .returning(|_, _| Ok(None));

    let result = inspector(client).scan(3, &hash(), TRON_ID).await.unwrap().unwrap();

    assert_eq!(result.status, TransactionStatus::Pending);
    assert_eq!(result.network_fee, "0");
    assert_eq!(result.block_number, 0);
}

#[tokio::test]
async fn test_parse_token_transfer() {
    let inspector = inspector(MockTronNodeClient::new());

    for contract in [USDT_HEX, USDT] {
        let tx = RawTransaction {
            chain_id: TRON_ID,
            data: token_transfer(contract, 1_000_000),
        };
        let parse = inspector.parse(&tx).await.unwrap().unwrap();

        assert_eq!(parse.amount, "1");
        assert_eq!(parse.to, RECIPIENT);
        assert_eq!(parse.currency_in, USDT);
        assert_eq!(parse.currency_out, USDT);
        assert_eq!(parse.contract_address.as_deref(), Some(USDT));
    }
}

#[tokio::test]
async fn test_parse_rejects_other_shapes() {
    let inspector = inspector(MockTronNodeClient::new());

    let mut with_data = native_transfer(None);
    with_data.raw_data.contract[0].parameter.value.data = Some("00".to_string());

    let mut other_selector = token_transfer(USDT_HEX, 1_000_000);
    other_selector.raw_data.contract[0].parameter.value.data = Some(format!("095ea7b3{}", "00".repeat(64)));

    let unregistered = token_transfer("411111111111111111111111111111111111111111", 1_000_000);

    let mut truncated = token_transfer(USDT_HEX, 1_000_000);
    truncated.raw_data.contract[0].parameter.value.data = Some(format!("a9059cbb{}", "00".repeat(16)));

    let mut freeze = native_transfer(None);
    freeze.raw_data.contract[0].contract_type = "FreezeBalanceV2Contract".to_string();

    for data in [with_data, other_selector, unregistered, truncated, freeze] {
        let tx = RawTransaction { chain_id: TRON_ID, data };
        assert!(inspector.parse(&tx).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_validate_missing_info_past_window_is_rejected() {
    let mut client = MockTronNodeClient::new();
    client
        .expect_get_current_block()
        .times(1)
        .returning(|_| Ok(create_test_block(1051)));
    client
        .expect_get_transaction_info()
        .times(1)
        .returning(|_, _| Ok(None));

    let response = inspector(client)
        .validate(&create_test_result(TRON_ID, &hash(), 1000, None))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(response.status, TransactionStatus::Rejected);
    assert_eq!(response.network_fee, "0");
    assert_eq!(response.block_number, 0);
}

#[tokio::test]
async fn test_validate_missing_info_within_window_is_pending() {
    let mut client = MockTronNodeClient::new();
    client
        .expect_get_current_block()
        .times(1)
        .returning(|_| Ok(create_test_block(1050)));
    client
        .expect_get_transaction_info()
        .times(1)
        .returning(|_, _| Ok(None));

    let response = inspector(client)
        .validate(&create_test_result(TRON_ID, &hash(), 1000, None))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(response.status, TransactionStatus::Pending);
    assert_eq!(response.block_number, 0);
}

#[tokio::test]
async fn test_validate_confirmation_boundary() {
    for (height, expected) in [(1018, TransactionStatus::Pending), (1019, TransactionStatus::Finished)] {
        let mut client = MockTronNodeClient::new();
        client
            .expect_get_current_block()
            .times(1)
            .returning(move |_| Ok(create_test_block(height)));
        client
            .expect_get_transaction_info()
            .times(1)
            .returning(|_, _| Ok(Some(info(1000, None))));

        let response = inspector(client)
            .validate(&create_test_result(TRON_ID, &hash(), 990, None))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(response.status, expected);
        assert_eq!(response.network_fee, "0");
        assert_eq!(response.block_number, 1000);
    }
}

#[tokio::test]
async fn test_validate_token_result_requires_registered_token() {
    let inspector = inspector(MockTronNodeClient::new());

    let response = inspector
        .validate(&create_test_result(
            TRON_ID,
            &hash(),
            1000,
            Some("TBXSw8fM4jpQkGc6zZjsVABFpVN7UvXPdV"),
        ))
        .await
        .unwrap();
    assert!(response.is_none());
}

#[tokio::test]
async fn test_parse_requires_single_operation() {
    let inspector = inspector(MockTronNodeClient::new());

    let mut native = native_transfer(Some("SUCCESS"));
    let extra = native.raw_data.contract[0].clone();
    native.raw_data.contract.push(extra);

    let mut token = token_transfer(USDT_HEX, 1_000_000);
    let extra = token.raw_data.contract[0].clone();
    token.raw_data.contract.push(extra);

    let mut empty = native_transfer(Some("SUCCESS"));
    empty.raw_data.contract.clear();

    for data in [native, token, empty] {
        let tx = RawTransaction { chain_id: TRON_ID, data };
        assert!(inspector.parse(&tx).await.unwrap().is_none());
    }
}
