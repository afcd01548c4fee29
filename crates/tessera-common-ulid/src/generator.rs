// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Single-owner monotonic identifier generation.
//!
//! A [`MonotonicGenerator`] owns its entropy source outright; it takes
//! `&mut self` and is never shared. Within one millisecond it increments the
//! random component of the previous identifier instead of drawing a new one,
//! so identifiers from the same instance are strictly increasing.
//!
//! Edge cases:
//!
//! - **Random overflow**: incrementing past the 80-bit maximum carries into the
//!   timestamp. The generator then runs ahead of the wall clock and keeps
//!   issuing from its logical millisecond until the clock catches up.
//! - **Clock regression**: a timestamp older than the last one seen (and not
//!   explained by a carry) reseeds the entropy source and starts over from the
//!   new timestamp. Monotonicity is lost across that one step; uniqueness is not.

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::debug;

use crate::ulid::{Ulid, MAX_RANDOM, MAX_TIMESTAMP_MS};

/// A generator with private entropy that issues strictly increasing identifiers.
#[derive(Debug)]
pub struct MonotonicGenerator {
	rng: StdRng,
	last: Option<Ulid>,
	ahead_of_clock: bool,
}

impl Default for MonotonicGenerator {
	fn default() -> Self {
		Self::new()
	}
}

impl MonotonicGenerator {
	/// Create a generator seeded from the operating system.
	pub fn new() -> Self {
		Self::with_rng(StdRng::from_entropy())
	}

	/// Create a generator with a fixed seed, for reproducible tests.
	pub fn with_seed(seed: u64) -> Self {
		Self::with_rng(StdRng::seed_from_u64(seed))
	}

	fn with_rng(rng: StdRng) -> Self {
		Self {
			rng,
			last: None,
			ahead_of_clock: false,
		}
	}

	/// The most recently issued identifier, if any.
	pub fn last(&self) -> Option<Ulid> {
		self.last
	}

	/// Issue the next identifier for the given wall-clock time.
	pub fn generate(&mut self, now_ms: u64) -> Ulid {
		let now_ms = now_ms.min(MAX_TIMESTAMP_MS);

		let id = match self.last {
			None => self.fresh(now_ms),
			Some(last) => {
				let last_ms = last.timestamp_ms();
				let ts = if self.ahead_of_clock && now_ms < last_ms {
					last_ms
				} else {
					now_ms
				};

				match ts.cmp(&last_ms) {
					Ordering::Equal => self.increment(last),
					Ordering::Greater => {
						self.ahead_of_clock = false;
						self.fresh(ts)
					}
					Ordering::Less => {
						debug!(
							last_ms,
							now_ms = ts,
							"clock moved backwards, reseeding identifier generator"
						);
						self.rng = StdRng::from_entropy();
						self.ahead_of_clock = false;
						self.fresh(ts)
					}
				}
			}
		};

		self.last = Some(id);
		id
	}

	fn increment(&mut self, last: Ulid) -> Ulid {
		if last.random() < MAX_RANDOM {
			return Ulid::from_parts(last.timestamp_ms(), last.random() + 1);
		}

		let last_ms = last.timestamp_ms();
		if last_ms == MAX_TIMESTAMP_MS {
			// Nowhere left to carry; only reachable in the year 10889.
			return self.fresh(last_ms);
		}

		debug!(last_ms, "random component exhausted, carrying into timestamp");
		self.ahead_of_clock = true;
		// Start the carried millisecond in the lower half to leave headroom.
		Ulid::from_parts(last_ms + 1, self.draw() >> 1)
	}

	fn fresh(&mut self, ts: u64) -> Ulid {
		Ulid::from_parts(ts, self.draw())
	}

	/// Draw 80 random bits.
	fn draw(&mut self) -> u128 {
		let mut bytes = [0u8; 16];
		self.rng.fill_bytes(&mut bytes[6..]);
		u128::from_be_bytes(bytes)
	}
}
