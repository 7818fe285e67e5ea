//! Parameter decoding for contract calldata.
//!
//! Only static address/uint parameters are surfaced; anything else decodes
//! but is reported as a [`AppError::DecodeError`].

use num_bigint::BigInt;
use web3::ethabi::{self, ParamType, Token};

use crate::utils::error::{AppError, InspectorResult};

/// Method selector of `transfer(address,uint256)`, without `0x`.
pub const TRANSFER_SELECTOR: &str = "a9059cbb";

/// Parameter layout of `transfer(address,uint256)`.
pub fn transfer_params() -> [ParamType; 2] {
    [ParamType::Address, ParamType::Uint(256)]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Address(String),
    Uint(BigInt),
}

fn decode(types: &[ParamType], calldata: &str) -> InspectorResult<Vec<Token>> {
    let bytes = hex::decode(calldata.trim_start_matches("0x"))
        .map_err(|e| AppError::DecodeError(format!("Calldata is not hex: {}", e)))?;
    ethabi::decode(types, &bytes).map_err(|e| AppError::DecodeError(e.to_string()))
}

fn convert(token: Token, address_prefix: &str) -> InspectorResult<AbiValue> {
    match token {
        Token::Address(address) => Ok(AbiValue::Address(format!(
            "{}{}",
            address_prefix,
            hex::encode(address.as_bytes())
        ))),
        Token::Uint(value) => BigInt::parse_bytes(value.to_string().as_bytes(), 10)
            .map(AbiValue::Uint)
            .ok_or_else(|| AppError::DecodeError(format!("Invalid uint: {}", value))),
        other => Err(AppError::DecodeError(format!("Unsupported parameter: {:?}", other))),
    }
}

/// Decode EVM parameters (calldata without the selector). Addresses come
/// back as lower-case `0x` hex.
pub fn decode_evm_parameters(types: &[ParamType], calldata: &str) -> InspectorResult<Vec<AbiValue>> {
    decode(types, calldata)?
        .into_iter()
        .map(|token| convert(token, "0x"))
        .collect()
}

/// Decode Tron parameters (calldata without the selector). With
/// `address_mode` addresses carry the Tron `41` version prefix, ready for
/// base58 canonicalization; without it they look like EVM addresses.
pub fn decode_tron_parameters(
    types: &[ParamType],
    calldata: &str,
    address_mode: bool,
) -> InspectorResult<Vec<AbiValue>> {
    let prefix = if address_mode { "41" } else { "0x" };
    decode(types, calldata)?
        .into_iter()
        .map(|token| convert(token, prefix))
        .collect()
}
