use sha2::{Digest, Sha256};

use super::error::AppError;

/// Version byte of Tron mainnet-style addresses.
const ADDRESS_PREFIX: u8 = 0x41;

fn checksum(payload: &[u8]) -> [u8; 4] {
    let hash1 = Sha256::digest(payload);
    let hash2 = Sha256::digest(hash1);

    let mut checksum = [0u8; 4];
    checksum.copy_from_slice(&hash2[..4]);
    checksum
}

/// Convert a hex Tron address (`41`-prefixed, or a bare/`0x` 20-byte EVM form)
/// into its base58check form starting with `T`.
pub fn hex_to_tron_address(hex: &str) -> Result<String, AppError> {
    let clean = hex.trim_start_matches("0x");
    let body = match clean.len() {
        40 => clean,
        42 if clean.get(..2).is_some_and(|prefix| prefix.eq_ignore_ascii_case("41")) => &clean[2..],
        _ => {
            return Err(AppError::ParseError(format!(
                "Invalid Tron address length: {}",
                hex
            )))
        }
    };

    let mut decoded = vec![ADDRESS_PREFIX];
    decoded.extend_from_slice(&hex::decode(body).map_err(|e| AppError::ParseError(e.to_string()))?);

    let checksum = checksum(&decoded);
    decoded.extend_from_slice(&checksum);

    Ok(bs58::encode(decoded).into_string())
}

/// Canonical (base58check) form of any Tron address representation the node
/// or the ABI decoder may hand back.
pub fn canonicalize_address(address: &str) -> Result<String, AppError> {
    if address.len() == 34 && address.starts_with('T') {
        let decoded = bs58::decode(address)
            .into_vec()
            .map_err(|e| AppError::ParseError(format!("Invalid base58 address {}: {}", address, e)))?;
        if decoded.len() != 25 || decoded[0] != ADDRESS_PREFIX {
            return Err(AppError::ParseError(format!("Invalid Tron address: {}", address)));
        }
        if checksum(&decoded[..21]) != decoded[21..] {
            return Err(AppError::ParseError(format!(
                "Tron address checksum mismatch: {}",
                address
            )));
        }
        return Ok(address.to_string());
    }

    hex_to_tron_address(address)
}

/// Tron transaction ids are 32-byte hex strings without a `0x` prefix.
pub fn is_tron_txhash(hash: &str) -> bool {
    hash.len() == 64 && hash.chars().all(|c| c.is_ascii_hexdigit())
}
