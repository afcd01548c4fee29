// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Time-sortable 128-bit identifiers.
//!
//! An identifier packs a 48-bit millisecond timestamp above 80 bits of
//! randomness, so the numeric order (and the 26-character Crockford base32
//! text form) follows creation time.
//!
//! - [`Ulid`] - the identifier value and its text codec
//! - [`MonotonicGenerator`] - a single-owner generator that increments the
//!   random component within one millisecond
//! - [`UlidGenerator`] - a shareable pool of monotonic generators for
//!   concurrent callers
//! - [`Clock`] - the millisecond time source, injectable for tests
//!
//! # Usage
//!
//! ```ignore
//! use tessera_common_ulid::UlidGenerator;
//!
//! let ids = UlidGenerator::new();
//! let id = ids.new_id();
//! println!("{id}");
//! ```

pub mod clock;
pub mod generator;
pub mod pool;
pub mod ulid;

pub use clock::{Clock, ManualClock, SystemClock};
pub use generator::MonotonicGenerator;
pub use pool::UlidGenerator;
pub use ulid::{Ulid, UlidParseError};
