// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-request authentication state.
//!
//! ```text
//! Request → session store → SessionRecord → resolve_identity → AuthContext
//!                                                 │
//!                                                 ├── both keys valid → authenticated
//!                                                 └── anything else  → unauthenticated
//! ```
//!
//! The transport layer builds an [`AuthContext`] once per request and passes
//! it explicitly to the gateway. There is no ambient request-scoped state.

use crate::session::{resolve_identity, AuthenticatedIdentity, SessionRecord};

/// Authentication context for request processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthContext {
	identity: Option<AuthenticatedIdentity>,
}

impl AuthContext {
	/// Create a new unauthenticated context.
	pub fn unauthenticated() -> Self {
		Self { identity: None }
	}

	/// Create a new authenticated context.
	pub fn authenticated(identity: AuthenticatedIdentity) -> Self {
		Self {
			identity: Some(identity),
		}
	}

	/// Resolve a session bag. A bag that does not resolve yields an
	/// unauthenticated context.
	pub fn from_session(session: &SessionRecord) -> Self {
		match resolve_identity(session) {
			Ok(identity) => Self::authenticated(identity),
			Err(_) => Self::unauthenticated(),
		}
	}

	pub fn is_authenticated(&self) -> bool {
		self.identity.is_some()
	}

	/// Get the identity, if authenticated.
	pub fn identity(&self) -> Option<&AuthenticatedIdentity> {
		self.identity.as_ref()
	}

	/// Require authentication, returning the identity or an error.
	pub fn require_identity(&self) -> Result<&AuthenticatedIdentity, AuthRequired> {
		self.identity.as_ref().ok_or(AuthRequired)
	}
}

impl From<AuthenticatedIdentity> for AuthContext {
	fn from(identity: AuthenticatedIdentity) -> Self {
		Self::authenticated(identity)
	}
}

/// Error returned when authentication is required but not present.
#[derive(Debug, Clone, Copy)]
pub struct AuthRequired;

impl std::fmt::Display for AuthRequired {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "authentication required")
	}
}

impl std::error::Error for AuthRequired {}
