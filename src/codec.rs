//! Account address codec: EVM hex form <-> bech32 text form.
//!
//! An EpixChain account is a 20-byte identifier with two textual encodings:
//! the `0x`-prefixed EVM hex form and the `epix1...` bech32 form. The codec
//! is a bijection between the two for well-formed inputs; callers are
//! expected to validate free-form user input with [`is_evm_address`] /
//! [`is_bech32_address`] before converting.

use bech32::{Bech32, Hrp};
use thiserror::Error;

/// Human-readable part of all EpixChain bech32 account addresses.
pub const BECH32_PREFIX: &str = "epix";

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed hex in address: {0}")]
    MalformedHex(String),
    #[error("account must be 20 bytes, got {0}")]
    BadLength(usize),
    #[error("invalid bech32 string: {0}")]
    Bech32(String),
    #[error("wrong bech32 prefix '{0}', expected '{BECH32_PREFIX}'")]
    WrongPrefix(String),
}

/// Convert a `0x`-prefixed 40-hex-character EVM address to its bech32 form.
pub fn evm_to_bech32(evm_address: &str) -> Result<String, CodecError> {
    let hex_part = evm_address.strip_prefix("0x").unwrap_or(evm_address);
    let bytes = hex::decode(hex_part).map_err(|e| CodecError::MalformedHex(e.to_string()))?;
    if bytes.len() != 20 {
        return Err(CodecError::BadLength(bytes.len()));
    }
    let hrp = Hrp::parse(BECH32_PREFIX).expect("valid hrp");
    Ok(bech32::encode::<Bech32>(hrp, &bytes).expect("valid encoding"))
}

/// Convert an `epix1...` bech32 address back to the EVM hex form.
///
/// Inverse of [`evm_to_bech32`]; rejects foreign prefixes and payloads
/// that are not exactly 20 bytes.
pub fn bech32_to_evm(bech32_address: &str) -> Result<String, CodecError> {
    let (hrp, bytes) =
        bech32::decode(bech32_address).map_err(|e| CodecError::Bech32(e.to_string()))?;
    if hrp.as_str() != BECH32_PREFIX {
        return Err(CodecError::WrongPrefix(hrp.to_string()));
    }
    if bytes.len() != 20 {
        return Err(CodecError::BadLength(bytes.len()));
    }
    Ok(format!("0x{}", hex::encode(bytes)))
}

/// True for a well-formed `0x` + 40 hex character EVM address.
pub fn is_evm_address(s: &str) -> bool {
    match s.strip_prefix("0x") {
        Some(hex_part) => hex_part.len() == 40 && hex_part.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// True for a checksummed `epix1...` bech32 account address.
pub fn is_bech32_address(s: &str) -> bool {
    bech32_to_evm(s).is_ok()
}

/// Shorten an address for display: `first(keep+2) + "..." + last(keep)`.
///
/// Never panics; inputs shorter than `2*keep + 5` produce a degenerate
/// (head and tail overlap) but stable result, matching the web UI.
pub fn truncate_address(addr: &str, keep: usize) -> String {
    let len = addr.chars().count();
    let head: String = addr.chars().take(keep + 2).collect();
    let tail: String = if len <= keep {
        addr.to_string()
    } else {
        addr.chars().skip(len - keep).collect()
    };
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    // Fixed vector for account 0x...01 under prefix "epix".
    const VECTOR_EVM: &str = "0x0000000000000000000000000000000000000001";
    const VECTOR_BECH32: &str = "epix1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqpm76la5";

    #[test]
    fn known_vector_encodes_exactly() {
        assert_eq!(evm_to_bech32(VECTOR_EVM).unwrap(), VECTOR_BECH32);
    }

    #[test]
    fn known_vector_round_trips() {
        assert_eq!(bech32_to_evm(VECTOR_BECH32).unwrap(), VECTOR_EVM);
    }

    #[test]
    fn round_trip_arbitrary_account() {
        let evm = "0xdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef";
        let b = evm_to_bech32(evm).unwrap();
        assert_eq!(b, "epix1m6kmam774klwlh4dhmhaatd7al02m0h05epj79");
        assert_eq!(bech32_to_evm(&b).unwrap(), evm);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(matches!(
            evm_to_bech32("0x123"),
            Err(CodecError::MalformedHex(_)) | Err(CodecError::BadLength(_))
        ));
        assert!(matches!(
            evm_to_bech32("0xzzadbeefdeadbeefdeadbeefdeadbeefdeadbeef"),
            Err(CodecError::MalformedHex(_))
        ));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            evm_to_bech32("0xdeadbeef"),
            Err(CodecError::BadLength(4))
        ));
    }

    #[test]
    fn rejects_foreign_prefix() {
        // Valid bech32, but not an epix address.
        assert!(matches!(
            bech32_to_evm("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"),
            Err(CodecError::WrongPrefix(_)) | Err(CodecError::Bech32(_)) | Err(CodecError::BadLength(_))
        ));
    }

    #[test]
    fn address_predicates() {
        assert!(is_evm_address(VECTOR_EVM));
        assert!(!is_evm_address("0x123"));
        assert!(!is_evm_address("deadbeef"));
        assert!(is_bech32_address(VECTOR_BECH32));
        assert!(!is_bech32_address("epix1notachecksum"));
    }

    #[test]
    fn truncate_shape_for_long_input() {
        let t = truncate_address(VECTOR_EVM, 6);
        // keep + 2 head chars, "...", keep tail chars
        assert_eq!(t.len(), 6 + 2 + 3 + 6);
        assert!(t.starts_with("0x000000"));
        assert!(t.ends_with("000001"));
        assert_eq!(t, "0x000000...000001");
    }

    #[test]
    fn truncate_preserves_ends() {
        let b = VECTOR_BECH32;
        let t = truncate_address(b, 4);
        assert!(t.starts_with(&b[..6]));
        assert!(t.ends_with(&b[b.len() - 4..]));
    }

    #[test]
    fn truncate_short_input_does_not_panic() {
        // Degenerate but stable, mirroring JS slice semantics.
        assert_eq!(truncate_address("abc", 6), "abc...abc");
        assert_eq!(truncate_address("", 6), "...");
    }
}
