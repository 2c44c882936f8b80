//! Shared utilities for integration testing.
//!
//! Provides an in-process JSON-RPC node that mimics an Ethereum endpoint
//! with the registry contract deployed, plus a helper that boots the full
//! HTTP service against it. The node mines instantly: a raw transaction
//! is decoded, applied to an in-memory ledger and given a receipt in one
//! step. Failure toggles let tests withhold receipts or drop event logs.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use alloy::consensus::transaction::SignerRecoverable;
use alloy::consensus::{
    Eip658Value, Receipt, ReceiptEnvelope, ReceiptWithBloom, Transaction, TxEnvelope,
};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{keccak256, Address, Bloom, LogData, B256, U256};
use alloy::rpc::types::{Log, TransactionReceipt};
use alloy::sol_types::{Revert, SolCall, SolError, SolEvent, SolValue};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use model_registry::config::RegistryConfig;
use model_registry::contract::abi;
use model_registry::{HttpServer, RegistryClient, Shutdown};

pub const CHAIN_ID: u64 = 31337;
pub const CONTRACT_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// First two well-known Anvil developer keys. The contract forbids
/// self-validation, so validation tests need the second account.
pub const OWNER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const VALIDATOR_KEY: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

/// Checksummed account address for a developer key, as the API renders it.
pub fn address_of(private_key_hex: &str) -> String {
    use alloy::signers::local::PrivateKeySigner;

    let signer: PrivateKeySigner = private_key_hex.parse().unwrap();
    signer.address().to_checksum(None)
}

const GAS_PRICE: u128 = 1_000_000_000; // 1 gwei
const GAS_USED: u64 = 90_000;

struct StoredModel {
    name: String,
    version: String,
    metadata_uri: String,
    owner: Address,
    registered_at: u64,
    is_active: bool,
}

struct StoredValidation {
    validator: Address,
    timestamp: u64,
    is_valid: bool,
    comments: String,
}

#[derive(Default)]
struct Ledger {
    block_number: u64,
    models: HashMap<B256, StoredModel>,
    order: Vec<B256>,
    validations: HashMap<B256, Vec<StoredValidation>>,
    receipts: HashMap<B256, Value>,
    nonces: HashMap<Address, u64>,
    poisoned_reads: HashSet<B256>,
}

struct NodeState {
    contract: Address,
    ledger: Mutex<Ledger>,
    withhold_receipts: AtomicBool,
    omit_events: AtomicBool,
    // 0 answers honestly
    overstated_count: AtomicU64,
}

/// In-process mock Ethereum node with the registry contract "deployed".
pub struct MockChain {
    url: String,
    state: Arc<NodeState>,
}

impl MockChain {
    pub async fn start() -> Self {
        let state = Arc::new(NodeState {
            contract: CONTRACT_ADDRESS.parse().unwrap(),
            ledger: Mutex::new(Ledger {
                block_number: 1,
                ..Ledger::default()
            }),
            withhold_receipts: AtomicBool::new(false),
            omit_events: AtomicBool::new(false),
            overstated_count: AtomicU64::new(0),
        });

        let router = Router::new().route("/", post(rpc)).with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn contract_address(&self) -> String {
        CONTRACT_ADDRESS.to_string()
    }

    /// When on, `eth_getTransactionReceipt` answers null for every hash,
    /// as if no transaction ever got mined.
    pub fn withhold_receipts(&self, on: bool) {
        self.state.withhold_receipts.store(on, Ordering::SeqCst);
    }

    /// When on, mined transactions succeed but their receipts carry no
    /// event logs.
    pub fn omit_events(&self, on: bool) {
        self.state.omit_events.store(on, Ordering::SeqCst);
    }

    /// Make `getModel` revert for one identifier while the model stays
    /// listed, simulating a partially corrupt read path.
    pub fn poison_model_read(&self, id_hex: &str) {
        let id: B256 = id_hex.parse().unwrap();
        self.state.ledger.lock().unwrap().poisoned_reads.insert(id);
    }

    /// Make `getModelCount` answer `n` regardless of what is stored.
    /// Index reads past the real length keep reverting.
    pub fn overstate_model_count(&self, n: u64) {
        self.state.overstated_count.store(n, Ordering::SeqCst);
    }
}

async fn rpc(State(state): State<Arc<NodeState>>, Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let params = request["params"].clone();

    let response = match method.as_str() {
        "eth_chainId" => ok(&id, json!(format!("0x{:x}", CHAIN_ID))),
        "eth_blockNumber" => {
            let n = state.ledger.lock().unwrap().block_number;
            ok(&id, json!(format!("0x{:x}", n)))
        }
        "eth_gasPrice" => ok(&id, json!(format!("0x{:x}", GAS_PRICE))),
        "eth_getTransactionCount" => handle_nonce(&state, &id, &params),
        "eth_sendRawTransaction" => handle_send(&state, &id, &params),
        "eth_getTransactionReceipt" => handle_receipt(&state, &id, &params),
        "eth_call" => handle_call(&state, &id, &params),
        _ => rpc_error(&id, -32601, &format!("method {} not supported", method)),
    };
    Json(response)
}

fn ok(id: &Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

fn rpc_error(id: &Value, code: i64, message: &str) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
}

fn revert(id: &Value, reason: &str) -> Value {
    let encoded = Revert::from(reason).abi_encode();
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": 3,
            "message": format!("execution reverted: {}", reason),
            "data": alloy::hex::encode_prefixed(encoded),
        }
    })
}

fn handle_nonce(state: &NodeState, id: &Value, params: &Value) -> Value {
    let address: Address = match params[0].as_str().and_then(|s| s.parse().ok()) {
        Some(a) => a,
        None => return rpc_error(id, -32602, "invalid address"),
    };
    let nonce = *state
        .ledger
        .lock()
        .unwrap()
        .nonces
        .get(&address)
        .unwrap_or(&0);
    ok(id, json!(format!("0x{:x}", nonce)))
}

fn handle_send(state: &NodeState, id: &Value, params: &Value) -> Value {
    let raw = match params[0].as_str().and_then(|s| alloy::hex::decode(s).ok()) {
        Some(bytes) => bytes,
        None => return rpc_error(id, -32602, "invalid raw transaction"),
    };
    let tx_hash = keccak256(&raw);

    let envelope = match TxEnvelope::decode_2718(&mut raw.as_slice()) {
        Ok(e) => e,
        Err(_) => return rpc_error(id, -32602, "undecodable transaction"),
    };
    let from = match envelope.recover_signer() {
        Ok(a) => a,
        Err(_) => return rpc_error(id, -32602, "unrecoverable signature"),
    };
    let input = envelope.input().clone();

    let mut ledger = state.ledger.lock().unwrap();
    ledger.nonces.insert(from, envelope.nonce() + 1);
    ledger.block_number += 1;
    let block_number = ledger.block_number;
    let timestamp = 1_700_000_000 + block_number;

    let selector: [u8; 4] = match input.get(..4).and_then(|s| s.try_into().ok()) {
        Some(s) => s,
        None => return rpc_error(id, -32602, "calldata too short"),
    };

    let (success, logs) = if selector == abi::registerModelCall::SELECTOR {
        match abi::registerModelCall::abi_decode(&input) {
            Ok(call) => {
                apply_register(state, &mut ledger, from, call, tx_hash, block_number, timestamp)
            }
            Err(_) => (false, Vec::new()),
        }
    } else if selector == abi::validateModelCall::SELECTOR {
        match abi::validateModelCall::abi_decode(&input) {
            Ok(call) => {
                apply_validate(state, &mut ledger, from, call, tx_hash, block_number, timestamp)
            }
            Err(_) => (false, Vec::new()),
        }
    } else {
        (false, Vec::new())
    };

    let receipt = build_receipt(tx_hash, block_number, from, state.contract, success, logs);
    ledger
        .receipts
        .insert(tx_hash, serde_json::to_value(&receipt).unwrap());

    ok(id, json!(tx_hash.to_string()))
}

fn apply_register(
    state: &NodeState,
    ledger: &mut Ledger,
    from: Address,
    call: abi::registerModelCall,
    tx_hash: B256,
    block_number: u64,
    timestamp: u64,
) -> (bool, Vec<Log>) {
    let model_id = keccak256([call.name.as_bytes(), call.version.as_bytes()].concat());
    if ledger.models.contains_key(&model_id) {
        return (false, Vec::new());
    }

    ledger.models.insert(
        model_id,
        StoredModel {
            name: call.name.clone(),
            version: call.version.clone(),
            metadata_uri: call.metadataURI,
            owner: from,
            registered_at: timestamp,
            is_active: true,
        },
    );
    ledger.order.push(model_id);

    if state.omit_events.load(Ordering::SeqCst) {
        return (true, Vec::new());
    }

    let event = abi::ModelRegistered {
        modelId: model_id,
        name: call.name,
        version: call.version,
        owner: from,
    };
    let log = event_log(state.contract, event.encode_log_data(), tx_hash, block_number);
    (true, vec![log])
}

fn apply_validate(
    state: &NodeState,
    ledger: &mut Ledger,
    from: Address,
    call: abi::validateModelCall,
    tx_hash: B256,
    block_number: u64,
    timestamp: u64,
) -> (bool, Vec<Log>) {
    let owner = match ledger.models.get(&call.modelId) {
        Some(model) => model.owner,
        None => return (false, Vec::new()),
    };
    // Owner cannot validate own model
    if owner == from {
        return (false, Vec::new());
    }

    ledger
        .validations
        .entry(call.modelId)
        .or_default()
        .push(StoredValidation {
            validator: from,
            timestamp,
            is_valid: call.isValid,
            comments: call.comments.clone(),
        });

    if state.omit_events.load(Ordering::SeqCst) {
        return (true, Vec::new());
    }

    let event = abi::ModelValidated {
        modelId: call.modelId,
        validator: from,
        isValid: call.isValid,
        comments: call.comments,
    };
    let log = event_log(state.contract, event.encode_log_data(), tx_hash, block_number);
    (true, vec![log])
}

fn event_log(contract: Address, data: LogData, tx_hash: B256, block_number: u64) -> Log {
    Log {
        inner: alloy::primitives::Log {
            address: contract,
            data,
        },
        block_hash: Some(B256::repeat_byte(0x42)),
        block_number: Some(block_number),
        block_timestamp: None,
        transaction_hash: Some(tx_hash),
        transaction_index: Some(0),
        log_index: Some(0),
        removed: false,
    }
}

fn build_receipt(
    tx_hash: B256,
    block_number: u64,
    from: Address,
    to: Address,
    success: bool,
    logs: Vec<Log>,
) -> TransactionReceipt {
    TransactionReceipt {
        inner: ReceiptEnvelope::Legacy(ReceiptWithBloom {
            receipt: Receipt {
                status: Eip658Value::Eip658(success),
                cumulative_gas_used: GAS_USED,
                logs,
            },
            logs_bloom: Bloom::default(),
        }),
        transaction_hash: tx_hash,
        transaction_index: Some(0),
        block_hash: Some(B256::repeat_byte(0x42)),
        block_number: Some(block_number),
        gas_used: GAS_USED,
        effective_gas_price: GAS_PRICE,
        blob_gas_used: None,
        blob_gas_price: None,
        from,
        to: Some(to),
        contract_address: None,
    }
}

fn handle_receipt(state: &NodeState, id: &Value, params: &Value) -> Value {
    if state.withhold_receipts.load(Ordering::SeqCst) {
        return ok(id, Value::Null);
    }
    let hash: B256 = match params[0].as_str().and_then(|s| s.parse().ok()) {
        Some(h) => h,
        None => return rpc_error(id, -32602, "invalid transaction hash"),
    };
    let ledger = state.ledger.lock().unwrap();
    match ledger.receipts.get(&hash) {
        Some(receipt) => ok(id, receipt.clone()),
        None => ok(id, Value::Null),
    }
}

fn handle_call(state: &NodeState, id: &Value, params: &Value) -> Value {
    let request = &params[0];
    let input_hex = request["input"]
        .as_str()
        .or_else(|| request["data"].as_str())
        .unwrap_or_default();
    let input = match alloy::hex::decode(input_hex) {
        Ok(bytes) => bytes,
        Err(_) => return rpc_error(id, -32602, "invalid call data"),
    };
    let selector: [u8; 4] = match input.get(..4).and_then(|s| s.try_into().ok()) {
        Some(s) => s,
        None => return rpc_error(id, -32602, "calldata too short"),
    };

    let ledger = state.ledger.lock().unwrap();

    if selector == abi::getModelCall::SELECTOR {
        let call = match abi::getModelCall::abi_decode(&input) {
            Ok(c) => c,
            Err(_) => return rpc_error(id, -32602, "bad getModel calldata"),
        };
        if ledger.poisoned_reads.contains(&call.modelId) {
            return revert(id, "Model does not exist");
        }
        match ledger.models.get(&call.modelId) {
            Some(model) => {
                let data = (
                    model.name.clone(),
                    model.version.clone(),
                    model.metadata_uri.clone(),
                    model.owner,
                    U256::from(model.registered_at),
                    model.is_active,
                )
                    .abi_encode_params();
                ok(id, json!(alloy::hex::encode_prefixed(data)))
            }
            None => revert(id, "Model does not exist"),
        }
    } else if selector == abi::getModelValidationsCall::SELECTOR {
        let call = match abi::getModelValidationsCall::abi_decode(&input) {
            Ok(c) => c,
            Err(_) => return rpc_error(id, -32602, "bad getModelValidations calldata"),
        };
        if !ledger.models.contains_key(&call.modelId) {
            return revert(id, "Model does not exist");
        }
        let history: Vec<abi::Validation> = ledger
            .validations
            .get(&call.modelId)
            .map(|list| {
                list.iter()
                    .map(|v| abi::Validation {
                        validator: v.validator,
                        timestamp: U256::from(v.timestamp),
                        isValid: v.is_valid,
                        comments: v.comments.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        ok(id, json!(alloy::hex::encode_prefixed(history.abi_encode())))
    } else if selector == abi::getModelCountCall::SELECTOR {
        let overstated = state.overstated_count.load(Ordering::SeqCst);
        let count = if overstated > 0 {
            U256::from(overstated)
        } else {
            U256::from(ledger.order.len())
        };
        ok(id, json!(alloy::hex::encode_prefixed(count.abi_encode())))
    } else if selector == abi::getModelIdAtCall::SELECTOR {
        let call = match abi::getModelIdAtCall::abi_decode(&input) {
            Ok(c) => c,
            Err(_) => return rpc_error(id, -32602, "bad getModelIdAt calldata"),
        };
        let index = u64::try_from(call.index).unwrap_or(u64::MAX) as usize;
        if index == 0 || index > ledger.order.len() {
            return revert(id, "Index out of range");
        }
        ok(
            id,
            json!(alloy::hex::encode_prefixed(ledger.order[index - 1].abi_encode())),
        )
    } else {
        rpc_error(id, -32601, "unknown selector")
    }
}

/// A running service instance bound to an ephemeral port.
pub struct TestService {
    pub base_url: String,
    pub shutdown: Shutdown,
}

impl TestService {
    pub fn api(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }
}

/// Boot the full HTTP service against the given mock chain.
pub async fn spawn_service(chain: &MockChain) -> TestService {
    spawn_service_with(chain, |_| {}).await
}

/// Same as [`spawn_service`], with a hook to adjust the configuration
/// before startup.
pub async fn spawn_service_with(
    chain: &MockChain,
    tweak: impl FnOnce(&mut RegistryConfig),
) -> TestService {
    let mut config = RegistryConfig::default();
    config.server.bind_address = "127.0.0.1:0".to_string();
    config.chain.rpc_url = chain.url().to_string();
    config.chain.rpc_timeout_secs = 2;
    config.chain.confirmation_timeout_secs = 2;
    config.chain.confirmation_poll_ms = 25;
    config.contract.address = Some(chain.contract_address());
    tweak(&mut config);

    let registry = Arc::new(RegistryClient::connect(&config).await.unwrap());
    let listener = TcpListener::bind(&config.server.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_rx = shutdown.subscribe();
    let server = HttpServer::new(&config, registry);
    tokio::spawn(async move {
        let _ = server.run(listener, server_rx).await;
    });

    TestService {
        base_url: format!("http://{}", addr),
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
