// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! A shareable identifier generator backed by a pool of monotonic generators.
//!
//! Each call checks a [`MonotonicGenerator`] out of a LIFO free-list, issues an
//! identifier with it, and returns it. The lock only guards the free-list; the
//! identifier itself is computed on a generator the caller owns exclusively for
//! the duration of the call. Concurrent callers therefore never touch the same
//! entropy state, and a caller issuing identifiers sequentially keeps getting
//! the same generator back, which preserves per-instance monotonicity.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::generator::MonotonicGenerator;
use crate::ulid::Ulid;

/// Pooled, thread-safe identifier generator.
pub struct UlidGenerator {
	pool: Mutex<Vec<MonotonicGenerator>>,
	clock: Arc<dyn Clock>,
}

impl Default for UlidGenerator {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for UlidGenerator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("UlidGenerator")
			.field("idle_generators", &self.idle())
			.finish_non_exhaustive()
	}
}

impl UlidGenerator {
	/// Create a generator driven by the system clock.
	pub fn new() -> Self {
		Self::with_clock(Arc::new(SystemClock))
	}

	/// Create a generator driven by the given clock.
	pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
		Self {
			pool: Mutex::new(Vec::new()),
			clock,
		}
	}

	/// Issue a new identifier.
	pub fn new_id(&self) -> Ulid {
		let mut lease = self.checkout();
		let now_ms = self.clock.now_ms();
		lease.generator().generate(now_ms)
	}

	/// Number of generators currently parked in the pool.
	pub fn idle(&self) -> usize {
		self.pool.lock().len()
	}

	fn checkout(&self) -> Lease<'_> {
		let generator = self.pool.lock().pop().unwrap_or_default();
		Lease {
			owner: self,
			generator: Some(generator),
		}
	}
}

/// A generator checked out of the pool; returned on drop.
struct Lease<'a> {
	owner: &'a UlidGenerator,
	generator: Option<MonotonicGenerator>,
}

impl Lease<'_> {
	fn generator(&mut self) -> &mut MonotonicGenerator {
		self.generator.get_or_insert_with(MonotonicGenerator::new)
	}
}

impl Drop for Lease<'_> {
	fn drop(&mut self) {
		if let Some(generator) = self.generator.take() {
			self.owner.pool.lock().push(generator);
		}
	}
}
