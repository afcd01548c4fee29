// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for identity.
//!
//! - **ID newtypes**: type-safe wrappers around [`Ulid`] for each entity
//!   ([`UserId`], [`AccountId`], [`ResourceId`]) so they cannot be mixed up
//! - **Entities**: [`Account`], the tenant boundary, and [`User`], which
//!   belongs to exactly one account
//!
//! ID types serialize transparently as their 26-character text form.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tessera_common_ulid::{Ulid, UlidGenerator, UlidParseError};

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(
			Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
		)]
		#[serde(transparent)]
		pub struct $name(Ulid);

		impl $name {
			/// Wrap an existing identifier.
			pub fn new(id: Ulid) -> Self {
				Self(id)
			}

			/// Allocate a fresh identifier from the shared generator.
			pub fn generate(ids: &UlidGenerator) -> Self {
				Self(ids.new_id())
			}

			/// Get the inner identifier.
			pub fn into_inner(self) -> Ulid {
				self.0
			}

			/// Get a reference to the inner identifier.
			pub fn as_ulid(&self) -> &Ulid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl FromStr for $name {
			type Err = UlidParseError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				s.parse().map(Self)
			}
		}

		impl From<Ulid> for $name {
			fn from(id: Ulid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Ulid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(AccountId, "Unique identifier for an account (tenant).");
define_id_type!(ResourceId, "Unique identifier for a tenant-owned resource.");

// =============================================================================
// Entities
// =============================================================================

/// A tenant. Its name is the authorization domain for every member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
	pub id: AccountId,
	/// Unique, human-readable.
	pub name: String,
	pub created_at: DateTime<Utc>,
}

/// A user. Belongs to exactly one [`Account`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub id: UserId,
	/// Unique across all accounts; the authorization subject.
	pub username: String,
	/// Opaque to everything but the credential verifier. Never serialized.
	#[serde(skip_serializing, default)]
	pub credential_hash: String,
	pub account_id: AccountId,
	pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("User")
			.field("id", &self.id)
			.field("username", &self.username)
			.field("credential_hash", &"[REDACTED]")
			.field("account_id", &self.account_id)
			.field("created_at", &self.created_at)
			.finish()
	}
}
