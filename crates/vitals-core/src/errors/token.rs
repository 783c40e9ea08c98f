// ABOUTME: Opaque token codec error types
// ABOUTME: Covers codec construction, encoding, and decoding failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

/// Errors raised by the opaque identifier codec.
///
/// Construction errors (`InvalidAlphabet`, `MinLengthTooLarge`) only surface
/// at process start. `EmptyInput` and `NumberOutOfRange` are encoding errors;
/// every other variant is a decoding error.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The configured alphabet is unusable
    #[error("Invalid token alphabet: {reason}")]
    InvalidAlphabet {
        /// What is wrong with the alphabet
        reason: String,
    },

    /// The configured minimum length exceeds what the scheme supports
    #[error("Minimum token length {min_length} exceeds the maximum of {max}")]
    MinLengthTooLarge {
        /// Requested minimum length
        min_length: usize,
        /// Largest accepted minimum length
        max: usize,
    },

    /// Nothing to encode
    #[error("Cannot encode an empty identifier sequence")]
    EmptyInput,

    /// Identifier cannot be represented by the codec
    #[error("Identifier {value} is outside the encodable range")]
    NumberOutOfRange {
        /// Offending identifier value
        value: i128,
    },

    /// Nothing to decode
    #[error("Token is empty")]
    EmptyToken,

    /// Token contains a character that is not in the alphabet
    #[error("Token contains foreign character '{character}' at position {position}")]
    ForeignCharacter {
        /// The offending character
        character: char,
        /// Zero-based character position within the token
        position: usize,
    },

    /// A decoded segment does not fit in 64 bits
    #[error("Token segment overflows a 64-bit identifier")]
    Overflow,

    /// Token is made of alphabet characters but was not produced by this codec
    #[error("Token is not in canonical form")]
    NonCanonical,

    /// Token decoded to the wrong number of identifiers
    #[error("Token encodes {found} identifiers, expected {expected}")]
    UnexpectedArity {
        /// Number of identifiers required
        expected: usize,
        /// Number of identifiers decoded
        found: usize,
    },
}

impl TokenError {
    /// True for failures raised while turning identifiers into a token
    #[must_use]
    pub const fn is_encoding_error(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::NumberOutOfRange { .. })
    }

    /// True for failures raised while reading a token supplied by a caller
    #[must_use]
    pub const fn is_decoding_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyToken
                | Self::ForeignCharacter { .. }
                | Self::Overflow
                | Self::NonCanonical
                | Self::UnexpectedArity { .. }
        )
    }
}
