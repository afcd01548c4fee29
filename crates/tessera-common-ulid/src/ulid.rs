// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The identifier value and its Crockford base32 text form.
//!
//! Layout (most significant bit first):
//!
//! ```text
//!  0                   47 48                                  127
//! +----------------------+-------------------------------------+
//! |  unix time (ms, 48b) |           randomness (80b)          |
//! +----------------------+-------------------------------------+
//! ```
//!
//! The text form is 26 symbols of the Crockford alphabet
//! `0123456789ABCDEFGHJKMNPQRSTVWXYZ`. The first symbol carries only the top
//! three bits, so it is always in `0..=7`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of bits holding the millisecond timestamp.
pub const TIMESTAMP_BITS: u32 = 48;

/// Number of bits holding randomness.
pub const RANDOM_BITS: u32 = 80;

/// Largest representable timestamp (year 10889).
pub const MAX_TIMESTAMP_MS: u64 = (1 << TIMESTAMP_BITS) - 1;

/// Largest representable random component.
pub const MAX_RANDOM: u128 = (1 << RANDOM_BITS) - 1;

/// Length of the canonical text form.
pub const ENCODED_LEN: usize = 26;

const ENCODE_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// ASCII byte to 5-bit value, 255 for invalid. Accepts lower case and the
/// Crockford aliases (I/L read as 1, O reads as 0).
const DECODE_TABLE: [u8; 128] = {
	let mut table = [255u8; 128];
	let mut i = 0;
	while i < 32 {
		let upper = ENCODE_ALPHABET[i];
		table[upper as usize] = i as u8;
		if upper.is_ascii_uppercase() {
			table[upper.to_ascii_lowercase() as usize] = i as u8;
		}
		i += 1;
	}
	table[b'I' as usize] = 1;
	table[b'i' as usize] = 1;
	table[b'L' as usize] = 1;
	table[b'l' as usize] = 1;
	table[b'O' as usize] = 0;
	table[b'o' as usize] = 0;
	table
};

/// Errors produced when parsing the text form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UlidParseError {
	#[error("invalid length: expected {ENCODED_LEN} characters, got {0}")]
	InvalidLength(usize),

	#[error("invalid character {0:?}")]
	InvalidChar(char),

	#[error("value exceeds 128 bits")]
	Overflow,
}

/// A 128-bit, time-prefixed identifier.
///
/// Ordering is numeric, which is also creation-time order at millisecond
/// granularity and lexicographic order of the text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ulid(u128);

impl Ulid {
	/// The all-zero identifier.
	pub const fn nil() -> Self {
		Self(0)
	}

	/// Compose an identifier from a timestamp and a random component.
	///
	/// Bits beyond the 48-bit timestamp or the 80-bit random field are discarded.
	pub const fn from_parts(timestamp_ms: u64, random: u128) -> Self {
		let ts = (timestamp_ms & MAX_TIMESTAMP_MS) as u128;
		Self((ts << RANDOM_BITS) | (random & MAX_RANDOM))
	}

	pub const fn from_u128(value: u128) -> Self {
		Self(value)
	}

	pub const fn as_u128(&self) -> u128 {
		self.0
	}

	pub const fn from_bytes(bytes: [u8; 16]) -> Self {
		Self(u128::from_be_bytes(bytes))
	}

	pub const fn to_bytes(&self) -> [u8; 16] {
		self.0.to_be_bytes()
	}

	/// The millisecond timestamp component.
	pub const fn timestamp_ms(&self) -> u64 {
		(self.0 >> RANDOM_BITS) as u64
	}

	/// The 80-bit random component.
	pub const fn random(&self) -> u128 {
		self.0 & MAX_RANDOM
	}

	pub const fn is_nil(&self) -> bool {
		self.0 == 0
	}

	/// The creation time encoded in the identifier.
	pub fn datetime(&self) -> Option<DateTime<Utc>> {
		let ms = i64::try_from(self.timestamp_ms()).ok()?;
		Utc.timestamp_millis_opt(ms).single()
	}

	fn encode(&self) -> [u8; ENCODED_LEN] {
		let mut buf = [0u8; ENCODED_LEN];
		let mut value = self.0;
		for slot in buf.iter_mut().rev() {
			*slot = ENCODE_ALPHABET[(value & 0x1f) as usize];
			value >>= 5;
		}
		buf
	}
}

impl fmt::Display for Ulid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let buf = self.encode();
		// The alphabet is pure ASCII.
		let s = std::str::from_utf8(&buf).map_err(|_| fmt::Error)?;
		f.write_str(s)
	}
}

impl FromStr for Ulid {
	type Err = UlidParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let len = s.chars().count();
		if len != ENCODED_LEN {
			return Err(UlidParseError::InvalidLength(len));
		}

		let mut value: u128 = 0;
		for (i, c) in s.chars().enumerate() {
			let digit = if c.is_ascii() {
				DECODE_TABLE[c as usize]
			} else {
				255
			};
			if digit == 255 {
				return Err(UlidParseError::InvalidChar(c));
			}
			if i == 0 && digit > 7 {
				return Err(UlidParseError::Overflow);
			}
			value = (value << 5) | u128::from(digit);
		}

		Ok(Self(value))
	}
}

impl From<Ulid> for u128 {
	fn from(id: Ulid) -> Self {
		id.0
	}
}

impl From<u128> for Ulid {
	fn from(value: u128) -> Self {
		Self(value)
	}
}

impl Serialize for Ulid {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for Ulid {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(de::Error::custom)
	}
}
