// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Millisecond time sources for identifier generation.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// A source of Unix time in milliseconds.
pub trait Clock: Send + Sync {
	fn now_ms(&self) -> u64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now_ms(&self) -> u64 {
		// Clamp pre-epoch clocks to zero rather than wrapping.
		u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
	}
}

/// A clock that only moves when told to.
///
/// Useful for exercising same-millisecond bursts and clock regressions.
#[derive(Debug, Default)]
pub struct ManualClock {
	now_ms: AtomicU64,
}

impl ManualClock {
	pub fn new(now_ms: u64) -> Self {
		Self {
			now_ms: AtomicU64::new(now_ms),
		}
	}

	pub fn set(&self, now_ms: u64) {
		self.now_ms.store(now_ms, Ordering::SeqCst);
	}

	pub fn advance(&self, by_ms: u64) {
		self.now_ms.fetch_add(by_ms, Ordering::SeqCst);
	}
}

impl Clock for ManualClock {
	fn now_ms(&self) -> u64 {
		self.now_ms.load(Ordering::SeqCst)
	}
}
