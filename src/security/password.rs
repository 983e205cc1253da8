//! Reversible password encoding.
//!
//! # Responsibilities
//! - Encode plaintext secrets into a recognisable stored form
//! - Decode stored forms, including values written by the legacy Base64 encoder
//!
//! The stored form is `Encrypted ` followed by the lowercase hex rendering of
//! the password bytes XOR-ed with a fixed seed integer. This is obfuscation,
//! not cryptography: it keeps secrets out of plain sight in job definitions.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::variables::syntax::{is_variable, uses_variables};

/// Marker carried by every encoded value.
pub const PASSWORD_ENCRYPTED_PREFIX: &str = "Encrypted ";

/// Big-endian bytes of the seed integer 0933910847463829827159347601486730416058.
const SEED: [u8; 17] = [
    0x02, 0xbe, 0x98, 0xaf, 0xc8, 0x6a, 0xa7, 0xf2, 0xe4, 0xcb, 0x79, 0xce, 0x10, 0xbe, 0xf2, 0xcf,
    0xba,
];

/// Error type for decoding stored password forms.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("ciphertext is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("legacy value is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded password is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Two-way encoding of secret strings.
pub trait PasswordCodec: Send + Sync {
    /// Produce the stored form of a plaintext secret.
    fn encode(&self, plaintext: &str) -> String;

    /// Recover the plaintext from a stored form.
    fn decode(&self, stored: &str) -> String;
}

/// The default codec: seeded XOR with an `Encrypted ` marker, falling back to
/// legacy Base64 for unmarked values.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeededPasswordCodec;

impl PasswordCodec for SeededPasswordCodec {
    fn encode(&self, plaintext: &str) -> String {
        if uses_variables(plaintext) || plaintext.starts_with(PASSWORD_ENCRYPTED_PREFIX) {
            return plaintext.to_string();
        }
        format!("{}{}", PASSWORD_ENCRYPTED_PREFIX, encrypt_password(plaintext))
    }

    fn decode(&self, stored: &str) -> String {
        if let Some(cipher) = stored.strip_prefix(PASSWORD_ENCRYPTED_PREFIX) {
            return match decrypt_password(cipher) {
                Ok(plain) => plain,
                Err(e) => {
                    tracing::warn!(error = %e, "Could not decrypt password, keeping stored value");
                    stored.to_string()
                }
            };
        }
        if is_variable(stored) {
            return stored.to_string();
        }
        match decode_legacy(stored) {
            Ok(plain) => plain,
            Err(e) => {
                tracing::debug!(error = %e, "Value is not a legacy encoded password");
                stored.to_string()
            }
        }
    }
}

/// Hex ciphertext (without marker) for a plaintext password.
pub fn encrypt_password(plaintext: &str) -> String {
    if plaintext.is_empty() {
        return String::new();
    }
    let encoded = hex::encode(xor_with_seed(plaintext.as_bytes()));
    let trimmed = encoded.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Plaintext for a hex ciphertext (without marker).
pub fn decrypt_password(cipher: &str) -> Result<String, PasswordError> {
    let cipher = cipher.trim();
    if cipher.is_empty() {
        return Ok(String::new());
    }
    let bytes = if cipher.len() % 2 == 1 {
        hex::decode(format!("0{cipher}"))?
    } else {
        hex::decode(cipher)?
    };
    let plain = xor_with_seed(&bytes);
    let start = plain.iter().position(|b| *b != 0).unwrap_or(plain.len());
    Ok(String::from_utf8(plain[start..].to_vec())?)
}

/// Decode a value written by the legacy Base64 encoder.
pub fn decode_legacy(stored: &str) -> Result<String, PasswordError> {
    let bytes = STANDARD.decode(stored)?;
    Ok(String::from_utf8(bytes)?)
}

/// XOR two big-endian integers of arbitrary width.
fn xor_with_seed(value: &[u8]) -> Vec<u8> {
    let len = value.len().max(SEED.len());
    let mut out = vec![0u8; len];
    for (i, b) in value.iter().rev().enumerate() {
        out[len - 1 - i] ^= b;
    }
    for (i, b) in SEED.iter().rev().enumerate() {
        out[len - 1 - i] ^= b;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ciphertext() {
        let codec = SeededPasswordCodec;
        assert_eq!(
            codec.encode("password"),
            "Encrypted 2be98afc86aa7f2e4bb18bd63c99dbdde"
        );
        assert_eq!(
            codec.decode("Encrypted 2be98afc86aa7f2e4bb18bd63c99dbdde"),
            "password"
        );
    }

    #[test]
    fn test_round_trip() {
        let codec = SeededPasswordCodec;
        for plain in [
            "",
            "a",
            "s3cr3t!",
            "a much longer password than the seed is wide",
            "pässwörd",
            "dGVzdA==",
        ] {
            assert_eq!(codec.decode(&codec.encode(plain)), plain, "plain = {plain:?}");
        }
    }

    #[test]
    fn test_encode_is_idempotent() {
        let codec = SeededPasswordCodec;
        let once = codec.encode("hunter2");
        let twice = codec.encode(&once);
        assert_eq!(once, twice);
        assert_eq!(codec.decode(&twice), "hunter2");
    }

    #[test]
    fn test_variables_pass_through() {
        let codec = SeededPasswordCodec;
        assert_eq!(codec.encode("${HDFS_PASSWORD}"), "${HDFS_PASSWORD}");
        assert_eq!(codec.decode("${HDFS_PASSWORD}"), "${HDFS_PASSWORD}");
        assert_eq!(codec.encode("pre-${X}"), "pre-${X}");
    }

    #[test]
    fn test_legacy_base64_decode() {
        let codec = SeededPasswordCodec;
        assert_eq!(codec.decode("aHVudGVyMg=="), "hunter2");
    }

    #[test]
    fn test_undecodable_values_are_kept() {
        let codec = SeededPasswordCodec;
        assert_eq!(codec.decode("not base64!"), "not base64!");
        assert_eq!(codec.decode("Encrypted zz"), "Encrypted zz");
    }
}
