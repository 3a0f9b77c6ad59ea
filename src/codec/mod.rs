//! Manual call encoding for the two supported token operations.
//!
//! The remote provider offers no typed abstraction: a call is a single
//! `0x`-prefixed hex string of a 4-byte function selector followed by one
//! 32-byte big-endian word per argument. This module is the only place that
//! wire format exists.

use alloy_primitives::{Address, U256, keccak256};

use crate::common::error::CodecError;

pub const BALANCE_OF_SIGNATURE: &str = "balanceOf(address)";
pub const TRANSFER_SIGNATURE: &str = "transfer(address,uint256)";

const WORD_BYTES: usize = 32;

/// A typed call against the token contract.
///
/// The set is closed on purpose: adding a third operation is a
/// compile-time-visible change, and every consumer matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionCall {
    BalanceOf { account: Address },
    Transfer { to: Address, amount: U256 },
}

/// Dynamically typed argument accepted at the [`FunctionCall::from_parts`]
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallArg {
    Address(Address),
    Uint(U256),
}

impl FunctionCall {
    /// Canonical signature the selector is derived from.
    pub fn signature(&self) -> &'static str {
        match self {
            FunctionCall::BalanceOf { .. } => BALANCE_OF_SIGNATURE,
            FunctionCall::Transfer { .. } => TRANSFER_SIGNATURE,
        }
    }

    /// First 4 bytes of the keccak-256 digest of the canonical signature.
    pub fn selector(&self) -> [u8; 4] {
        let digest = keccak256(self.signature().as_bytes());
        [digest[0], digest[1], digest[2], digest[3]]
    }

    /// Constructs a call from a dynamic name/argument pair.
    ///
    /// This is where untyped callers enter; anything other than the two
    /// supported shapes fails with [`CodecError::UnsupportedFunction`].
    pub fn from_parts(name: &str, args: &[CallArg]) -> Result<Self, CodecError> {
        match (name, args) {
            ("balanceOf", [CallArg::Address(account)]) => Ok(FunctionCall::BalanceOf {
                account: *account,
            }),
            ("transfer", [CallArg::Address(to), CallArg::Uint(amount)]) => {
                Ok(FunctionCall::Transfer {
                    to: *to,
                    amount: *amount,
                })
            }
            _ => Err(CodecError::UnsupportedFunction(name.to_string())),
        }
    }
}

/// Encodes a call into the raw hex payload the provider expects.
pub fn encode(call: &FunctionCall) -> String {
    let mut data = Vec::with_capacity(4 + 2 * WORD_BYTES);
    data.extend_from_slice(&call.selector());
    match call {
        FunctionCall::BalanceOf { account } => push_address(&mut data, account),
        FunctionCall::Transfer { to, amount } => {
            push_address(&mut data, to);
            push_uint(&mut data, amount);
        }
    }
    format!("0x{}", hex::encode(data))
}

/// Interprets a single 32-byte hex word as an unsigned integer.
pub fn decode_uint(payload: &str) -> Result<U256, CodecError> {
    let digits = payload.strip_prefix("0x").unwrap_or(payload);
    if digits.len() != 2 * WORD_BYTES {
        return Err(CodecError::MalformedPayload(format!(
            "expected exactly one 32-byte word, got {} hex digits",
            digits.len()
        )));
    }
    let bytes = hex::decode(digits).map_err(|e| CodecError::MalformedPayload(e.to_string()))?;
    Ok(U256::from_be_slice(&bytes))
}

// Addresses are right-aligned in their word: 12 zero bytes, then the 20
// address bytes.
fn push_address(buf: &mut Vec<u8>, address: &Address) {
    buf.extend_from_slice(&[0u8; 12]);
    buf.extend_from_slice(address.as_slice());
}

fn push_uint(buf: &mut Vec<u8>, value: &U256) {
    buf.extend_from_slice(&value.to_be_bytes::<WORD_BYTES>());
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPIENT: &str = "0x1111111111111111111111111111111111111111";

    fn recipient() -> Address {
        RECIPIENT.parse().unwrap()
    }

    #[test]
    fn balance_of_selector_matches_reference() {
        let call = FunctionCall::BalanceOf {
            account: recipient(),
        };
        assert_eq!(call.selector(), [0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn transfer_selector_matches_reference() {
        let call = FunctionCall::Transfer {
            to: recipient(),
            amount: U256::from(1u8),
        };
        assert_eq!(call.selector(), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn balance_of_payload_layout() {
        let payload = encode(&FunctionCall::BalanceOf {
            account: recipient(),
        });
        assert_eq!(payload.len(), 2 + 8 + 64);
        assert!(payload.starts_with("0x70a08231"));
        assert_eq!(
            &payload[10..],
            "0000000000000000000000001111111111111111111111111111111111111111"
        );
    }

    #[test]
    fn transfer_payload_layout() {
        let payload = encode(&FunctionCall::Transfer {
            to: recipient(),
            amount: U256::from(40_000_000u64),
        });
        assert_eq!(payload.len(), 2 + 8 + 128);
        assert!(payload.starts_with("0xa9059cbb"));
        // word 0: the recipient, right-aligned
        assert_eq!(
            &payload[10..74],
            "0000000000000000000000001111111111111111111111111111111111111111"
        );
        // word 1: the amount, left-zero-padded
        assert_eq!(
            &payload[74..],
            "0000000000000000000000000000000000000000000000000000000002625a00"
        );
    }

    #[test]
    fn transfer_amount_word_round_trips() {
        let amount = U256::from(40_000_000u64);
        let payload = encode(&FunctionCall::Transfer {
            to: recipient(),
            amount,
        });
        let amount_word = &payload[2 + 8 + 64..];
        assert_eq!(decode_uint(amount_word).unwrap(), amount);
    }

    #[test]
    fn decode_uint_accepts_prefixed_word() {
        let word = format!("0x{:064x}", 123u64);
        assert_eq!(decode_uint(&word).unwrap(), U256::from(123u64));
    }

    #[test]
    fn decode_uint_rejects_wrong_length() {
        assert!(matches!(
            decode_uint("0x1234"),
            Err(CodecError::MalformedPayload(_))
        ));
        let two_words = "00".repeat(64);
        assert!(matches!(
            decode_uint(&two_words),
            Err(CodecError::MalformedPayload(_))
        ));
    }

    #[test]
    fn decode_uint_rejects_non_hex() {
        let word = "zz".repeat(32);
        assert!(matches!(
            decode_uint(&word),
            Err(CodecError::MalformedPayload(_))
        ));
    }

    #[test]
    fn from_parts_builds_supported_calls() {
        let call = FunctionCall::from_parts("balanceOf", &[CallArg::Address(recipient())]).unwrap();
        assert_eq!(
            call,
            FunctionCall::BalanceOf {
                account: recipient()
            }
        );

        let call = FunctionCall::from_parts(
            "transfer",
            &[CallArg::Address(recipient()), CallArg::Uint(U256::from(5u8))],
        )
        .unwrap();
        assert_eq!(
            call,
            FunctionCall::Transfer {
                to: recipient(),
                amount: U256::from(5u8)
            }
        );
    }

    #[test]
    fn from_parts_rejects_unknown_shapes() {
        assert_eq!(
            FunctionCall::from_parts("approve", &[CallArg::Address(recipient())]),
            Err(CodecError::UnsupportedFunction("approve".to_string()))
        );
        // right name, wrong arity
        assert!(FunctionCall::from_parts("transfer", &[CallArg::Address(recipient())]).is_err());
    }
}
