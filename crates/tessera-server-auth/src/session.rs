// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session bag and identity resolution.
//!
//! The session store hands us an untyped key-value bag. [`resolve_identity`]
//! is the only way to turn it into an [`AuthenticatedIdentity`]: both
//! `user_id` and `account_id` must be present, must be JSON strings, and must
//! parse as identifiers. Anything less is [`Unauthenticated`]; there is no
//! partial identity.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tessera_common_ulid::Ulid;
use thiserror::Error;
use tracing::debug;

use crate::types::{AccountId, UserId};

/// Session key holding the user's identifier.
pub const SESSION_KEY_USER_ID: &str = "user_id";

/// Session key holding the account the session is bound to.
pub const SESSION_KEY_ACCOUNT_ID: &str = "account_id";

/// The raw session bag as held by the external session store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionRecord(HashMap<String, Value>);

impl SessionRecord {
	pub fn new() -> Self {
		Self::default()
	}

	/// A bag populated the way a successful login populates it.
	pub fn for_identity(user_id: UserId, account_id: AccountId) -> Self {
		let mut record = Self::new();
		record.insert(SESSION_KEY_USER_ID, Value::String(user_id.to_string()));
		record.insert(SESSION_KEY_ACCOUNT_ID, Value::String(account_id.to_string()));
		record
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
		self.0.insert(key.into(), value)
	}

	pub fn remove(&mut self, key: &str) -> Option<Value> {
		self.0.remove(key)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<HashMap<String, Value>> for SessionRecord {
	fn from(values: HashMap<String, Value>) -> Self {
		Self(values)
	}
}

impl<K: Into<String>> FromIterator<(K, Value)> for SessionRecord {
	fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
	}
}

/// A fully resolved caller identity.
///
/// Only [`resolve_identity`] constructs one, so holding a value means both
/// halves were present and well-typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AuthenticatedIdentity {
	user_id: UserId,
	account_id: AccountId,
}

impl AuthenticatedIdentity {
	pub fn user_id(&self) -> UserId {
		self.user_id
	}

	/// The account the session is bound to.
	pub fn account_id(&self) -> AccountId {
		self.account_id
	}
}

/// Why a session key failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedReason {
	Missing,
	WrongType,
	Malformed,
}

impl fmt::Display for UnauthenticatedReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Missing => write!(f, "missing"),
			Self::WrongType => write!(f, "not a string"),
			Self::Malformed => write!(f, "not a valid identifier"),
		}
	}
}

/// The session does not carry a usable identity.
///
/// `key` and `reason` are diagnostics for logs; callers should treat every
/// instance the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not authenticated: session key `{key}` is {reason}")]
pub struct Unauthenticated {
	pub key: &'static str,
	pub reason: UnauthenticatedReason,
}

/// Project a session bag onto a typed identity, failing closed.
pub fn resolve_identity(session: &SessionRecord) -> Result<AuthenticatedIdentity, Unauthenticated> {
	let resolved = read_id(session, SESSION_KEY_USER_ID).and_then(|user_id| {
		read_id(session, SESSION_KEY_ACCOUNT_ID).map(|account_id| AuthenticatedIdentity {
			user_id: UserId::new(user_id),
			account_id: AccountId::new(account_id),
		})
	});

	if let Err(err) = &resolved {
		debug!(key = err.key, reason = %err.reason, "session did not resolve to an identity");
	}
	resolved
}

fn read_id(session: &SessionRecord, key: &'static str) -> Result<Ulid, Unauthenticated> {
	let fail = |reason| Unauthenticated { key, reason };

	let value = session
		.get(key)
		.ok_or_else(|| fail(UnauthenticatedReason::Missing))?;
	let text = value
		.as_str()
		.ok_or_else(|| fail(UnauthenticatedReason::WrongType))?;
	text.parse()
		.map_err(|_| fail(UnauthenticatedReason::Malformed))
}
