// ABOUTME: Reversible opaque identifier codec for externally visible record ids
// ABOUTME: Sqids-style encoding over a configurable permuted alphabet with minimum length padding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

//! # Opaque ID Codec
//!
//! Maps row identifiers to short tokens and back without any stored state.
//! The mapping is a pure function of [`IdCodecConfig`]: the same alphabet and
//! minimum length always produce the same token, and changing either
//! invalidates every token issued before the change.
//!
//! Tokens follow the Sqids layout. The first character selects a rotation of
//! the alphabet, each number is written in the base of the remaining
//! alphabet, numbers are joined by a separator character, and short tokens are
//! padded after a trailing separator. Decoding re-encodes its result and
//! rejects any token that does not round-trip exactly, so every identifier has
//! exactly one valid token.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::tokens::{
    DEFAULT_TOKEN_ALPHABET, DEFAULT_TOKEN_MIN_LENGTH, MAX_MIN_LENGTH, MIN_ALPHABET_LENGTH,
};
use crate::errors::TokenError;
use crate::models::RowId;

/// Codec configuration, fixed at process start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCodecConfig {
    /// Characters tokens are drawn from; order matters
    pub alphabet: String,
    /// Shortest token the codec emits
    pub min_length: usize,
}

impl Default for IdCodecConfig {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_TOKEN_ALPHABET.to_owned(),
            min_length: DEFAULT_TOKEN_MIN_LENGTH,
        }
    }
}

/// An encoded identifier as handed to API consumers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpaqueToken(String);

impl OpaqueToken {
    /// Borrow the token text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take ownership of the token text
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for OpaqueToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OpaqueToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<OpaqueToken> for String {
    fn from(token: OpaqueToken) -> Self {
        token.0
    }
}

/// Deterministic, reversible identifier codec.
///
/// Cheap to clone and free of interior mutability; share one instance behind
/// an `Arc` for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct IdCodec {
    alphabet: Vec<u8>,
    min_length: usize,
}

impl IdCodec {
    /// Build a codec from configuration
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InvalidAlphabet` when the alphabet is shorter than
    /// three characters, contains non-ASCII or repeated characters, and
    /// `TokenError::MinLengthTooLarge` when `min_length` exceeds 255.
    pub fn new(config: &IdCodecConfig) -> Result<Self, TokenError> {
        let alphabet = config.alphabet.as_bytes();

        if !config.alphabet.is_ascii() {
            return Err(TokenError::InvalidAlphabet {
                reason: "alphabet must contain only ASCII characters".to_owned(),
            });
        }
        if alphabet.len() < MIN_ALPHABET_LENGTH {
            return Err(TokenError::InvalidAlphabet {
                reason: format!("alphabet must have at least {MIN_ALPHABET_LENGTH} characters"),
            });
        }
        let mut seen = [false; 128];
        for &byte in alphabet {
            let slot = &mut seen[usize::from(byte)];
            if *slot {
                return Err(TokenError::InvalidAlphabet {
                    reason: format!("alphabet repeats the character '{}'", char::from(byte)),
                });
            }
            *slot = true;
        }
        if config.min_length > MAX_MIN_LENGTH {
            return Err(TokenError::MinLengthTooLarge {
                min_length: config.min_length,
                max: MAX_MIN_LENGTH,
            });
        }

        Ok(Self {
            alphabet: shuffle(alphabet),
            min_length: config.min_length,
        })
    }

    /// Shortest token this codec emits
    #[must_use]
    pub const fn min_length(&self) -> usize {
        self.min_length
    }

    /// True when `character` may appear in a token
    #[must_use]
    pub fn is_token_char(&self, character: char) -> bool {
        u8::try_from(character).is_ok_and(|byte| self.alphabet.contains(&byte))
    }

    /// Encode a non-empty sequence of numbers into a single token
    ///
    /// # Errors
    ///
    /// Returns `TokenError::EmptyInput` when `numbers` is empty.
    pub fn encode(&self, numbers: &[u64]) -> Result<OpaqueToken, TokenError> {
        if numbers.is_empty() {
            return Err(TokenError::EmptyInput);
        }
        let bytes = self.encode_bytes(numbers);
        // Every emitted byte comes from the validated ASCII alphabet
        String::from_utf8(bytes)
            .map(OpaqueToken)
            .map_err(|_| TokenError::InvalidAlphabet {
                reason: "alphabet produced non UTF-8 output".to_owned(),
            })
    }

    /// Encode a single row identifier
    ///
    /// # Errors
    ///
    /// Propagates encoding failures from [`Self::encode`].
    pub fn encode_row_id(&self, id: RowId) -> Result<OpaqueToken, TokenError> {
        self.encode(&[id.as_u64()])
    }

    /// Decode a token back into the numbers it was built from
    ///
    /// # Errors
    ///
    /// Returns `TokenError::EmptyToken` for an empty token,
    /// `TokenError::ForeignCharacter` when a character is outside the alphabet,
    /// `TokenError::Overflow` when a segment exceeds 64 bits, and
    /// `TokenError::NonCanonical` when the token was not produced by this codec.
    pub fn decode(&self, token: &str) -> Result<Vec<u64>, TokenError> {
        let Some(&prefix) = token.as_bytes().first() else {
            return Err(TokenError::EmptyToken);
        };
        for (position, character) in token.chars().enumerate() {
            if !self.is_token_char(character) {
                return Err(TokenError::ForeignCharacter {
                    character,
                    position,
                });
            }
        }

        let offset = self
            .alphabet
            .iter()
            .position(|&c| c == prefix)
            .ok_or(TokenError::NonCanonical)?;
        let mut alphabet = rotated(&self.alphabet, offset);
        alphabet.reverse();

        let mut numbers = Vec::new();
        let mut rest = &token.as_bytes()[1..];
        while !rest.is_empty() {
            let separator = alphabet[0];
            let (chunk, tail) = match rest.iter().position(|&c| c == separator) {
                Some(split) => (&rest[..split], Some(&rest[split + 1..])),
                None => (rest, None),
            };
            // An empty chunk marks the start of padding
            if chunk.is_empty() {
                break;
            }
            numbers.push(to_number(chunk, &alphabet[1..])?);

            match tail {
                Some(tail) => {
                    alphabet = shuffle(&alphabet);
                    rest = tail;
                }
                None => break,
            }
        }

        if numbers.is_empty() || self.encode_bytes(&numbers) != token.as_bytes() {
            return Err(TokenError::NonCanonical);
        }
        Ok(numbers)
    }

    /// Decode a token that must carry exactly one row identifier
    ///
    /// # Errors
    ///
    /// Propagates [`Self::decode`] failures, returns
    /// `TokenError::UnexpectedArity` when the token holds more than one number
    /// and `TokenError::NumberOutOfRange` when the number cannot be a row id.
    pub fn decode_row_id(&self, token: &str) -> Result<RowId, TokenError> {
        match self.decode(token)?.as_slice() {
            [single] => RowId::try_from(*single),
            numbers => Err(TokenError::UnexpectedArity {
                expected: 1,
                found: numbers.len(),
            }),
        }
    }

    fn encode_bytes(&self, numbers: &[u64]) -> Vec<u8> {
        let len = self.alphabet.len();
        let offset = numbers
            .iter()
            .enumerate()
            .fold(numbers.len(), |acc, (i, &number)| {
                usize::from(self.alphabet[digit_index(number, len)]) + i + acc
            })
            % len;

        let mut alphabet = rotated(&self.alphabet, offset);
        let mut token = vec![alphabet[0]];
        alphabet.reverse();

        for (i, &number) in numbers.iter().enumerate() {
            push_digits(&mut token, number, &alphabet[1..]);
            if i + 1 < numbers.len() {
                token.push(alphabet[0]);
                alphabet = shuffle(&alphabet);
            }
        }

        if token.len() < self.min_length {
            token.push(alphabet[0]);
            while token.len() < self.min_length {
                alphabet = shuffle(&alphabet);
                let take = (self.min_length - token.len()).min(len);
                token.extend_from_slice(&alphabet[..take]);
            }
        }

        token
    }
}

/// Deterministic permutation applied between segments
fn shuffle(alphabet: &[u8]) -> Vec<u8> {
    let mut chars = alphabet.to_vec();
    let len = chars.len();
    let mut i = 0;
    let mut j = len - 1;
    while j > 0 {
        let r = (i * j + usize::from(chars[i]) + usize::from(chars[j])) % len;
        chars.swap(i, r);
        i += 1;
        j -= 1;
    }
    chars
}

fn rotated(alphabet: &[u8], offset: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(alphabet.len());
    out.extend_from_slice(&alphabet[offset..]);
    out.extend_from_slice(&alphabet[..offset]);
    out
}

fn digit_index(number: u64, base: usize) -> usize {
    // base <= 128, so both conversions are lossless
    let base = u64::try_from(base).unwrap_or(u64::MAX);
    usize::try_from(number % base).unwrap_or(0)
}

fn push_digits(token: &mut Vec<u8>, number: u64, alphabet: &[u8]) {
    let start = token.len();
    let base = u64::try_from(alphabet.len()).unwrap_or(u64::MAX);
    let mut remaining = number;
    loop {
        token.push(alphabet[digit_index(remaining, alphabet.len())]);
        remaining /= base;
        if remaining == 0 {
            break;
        }
    }
    token[start..].reverse();
}

fn to_number(chunk: &[u8], alphabet: &[u8]) -> Result<u64, TokenError> {
    let base = u64::try_from(alphabet.len()).map_err(|_| TokenError::Overflow)?;
    chunk.iter().try_fold(0_u64, |acc, &c| {
        let digit = alphabet
            .iter()
            .position(|&a| a == c)
            .and_then(|index| u64::try_from(index).ok())
            .ok_or(TokenError::NonCanonical)?;
        acc.checked_mul(base)
            .and_then(|value| value.checked_add(digit))
            .ok_or(TokenError::Overflow)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQIDS_DEFAULT_ALPHABET: &str =
        "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    fn codec() -> IdCodec {
        IdCodec::new(&IdCodecConfig::default()).unwrap()
    }

    fn reference_codec(min_length: usize) -> IdCodec {
        IdCodec::new(&IdCodecConfig {
            alphabet: SQIDS_DEFAULT_ALPHABET.to_owned(),
            min_length,
        })
        .unwrap()
    }

    #[test]
    fn test_matches_reference_vectors() {
        let codec = reference_codec(0);
        assert_eq!(codec.encode(&[1, 2, 3]).unwrap().as_str(), "86Rf07");
        assert_eq!(codec.encode(&[0]).unwrap().as_str(), "bM");
        assert_eq!(codec.encode(&[1]).unwrap().as_str(), "Uk");
        assert_eq!(codec.encode(&[100]).unwrap().as_str(), "86u");
        assert_eq!(codec.decode("86Rf07").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_reference_padding() {
        let codec = reference_codec(SQIDS_DEFAULT_ALPHABET.len());
        let token = codec.encode(&[1, 2, 3]).unwrap();
        assert_eq!(
            token.as_str(),
            "86Rf07xd4zBmiJXQG6otHEbew02c3PWsUOLZxADhCpKj7aVFv9I8RquYrNlSTM"
        );
        assert_eq!(codec.decode(token.as_str()).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_row_id_round_trip() {
        let codec = codec();
        for raw in [1_i64, 7, 12, 1_000, 987_654_321, i64::MAX] {
            let id = RowId::try_from(raw).unwrap();
            let token = codec.encode_row_id(id).unwrap();
            assert!(token.as_str().len() >= DEFAULT_TOKEN_MIN_LENGTH);
            assert_eq!(codec.decode_row_id(token.as_str()).unwrap(), id);
        }
    }

    #[test]
    fn test_u64_extremes_round_trip() {
        let codec = codec();
        for number in [0, u64::MAX] {
            let token = codec.encode(&[number]).unwrap();
            assert_eq!(codec.decode(token.as_str()).unwrap(), vec![number]);
        }
    }

    #[test]
    fn test_sequential_ids_do_not_look_sequential() {
        let codec = codec();
        let a = codec.encode(&[41]).unwrap();
        let b = codec.encode(&[42]).unwrap();
        assert_ne!(a.as_str()[..3], b.as_str()[..3]);
    }

    #[test]
    fn test_encode_rejects_empty_input() {
        assert_eq!(codec().encode(&[]), Err(TokenError::EmptyInput));
    }

    #[test]
    fn test_decode_rejects_foreign_characters() {
        let err = codec().decode("not-a-real-token!!").unwrap_err();
        assert_eq!(
            err,
            TokenError::ForeignCharacter {
                character: '!',
                position: 16,
            }
        );
        assert!(err.is_decoding_error());
    }

    #[test]
    fn test_decode_rejects_empty_token() {
        assert_eq!(codec().decode(""), Err(TokenError::EmptyToken));
    }

    #[test]
    fn test_decode_rejects_tampered_token() {
        let codec = codec();
        let token = codec.encode(&[12]).unwrap().into_inner();
        let mut bytes = token.into_bytes();
        let last = bytes.len() - 1;
        bytes[last] = if bytes[last] == b'Y' { b'O' } else { b'Y' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(codec.decode(&tampered), Err(TokenError::NonCanonical));
    }

    #[test]
    fn test_decode_rejects_overflowing_segment() {
        let codec = reference_codec(0);
        let err = codec.decode(&"a".repeat(40)).unwrap_err();
        assert!(matches!(
            err,
            TokenError::Overflow | TokenError::NonCanonical
        ));
    }

    #[test]
    fn test_decode_row_id_requires_single_number() {
        let codec = codec();
        let token = codec.encode(&[3, 4]).unwrap();
        assert_eq!(
            codec.decode_row_id(token.as_str()),
            Err(TokenError::UnexpectedArity {
                expected: 1,
                found: 2,
            })
        );
    }

    #[test]
    fn test_decode_row_id_rejects_values_beyond_i64() {
        let codec = codec();
        let token = codec.encode(&[u64::MAX]).unwrap();
        assert!(matches!(
            codec.decode_row_id(token.as_str()),
            Err(TokenError::NumberOutOfRange { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let short = IdCodecConfig {
            alphabet: "ab".to_owned(),
            min_length: 0,
        };
        assert!(matches!(
            IdCodec::new(&short),
            Err(TokenError::InvalidAlphabet { .. })
        ));

        let repeated = IdCodecConfig {
            alphabet: "abca".to_owned(),
            min_length: 0,
        };
        assert!(matches!(
            IdCodec::new(&repeated),
            Err(TokenError::InvalidAlphabet { .. })
        ));

        let unicode = IdCodecConfig {
            alphabet: "abcé".to_owned(),
            min_length: 0,
        };
        assert!(matches!(
            IdCodec::new(&unicode),
            Err(TokenError::InvalidAlphabet { .. })
        ));

        let long = IdCodecConfig {
            min_length: 256,
            ..IdCodecConfig::default()
        };
        assert_eq!(
            IdCodec::new(&long).unwrap_err(),
            TokenError::MinLengthTooLarge {
                min_length: 256,
                max: 255,
            }
        );
    }

    #[test]
    fn test_default_alphabet_is_valid() {
        let alphabet = DEFAULT_TOKEN_ALPHABET;
        assert_eq!(alphabet.len(), 64);
        assert!(alphabet
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert!(IdCodec::new(&IdCodecConfig::default()).is_ok());
    }

    #[test]
    fn test_token_serializes_as_plain_string() {
        let token = codec().encode(&[5]).unwrap();
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json, serde_json::Value::String(token.to_string()));
    }
}
