// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity for Tessera.
//!
//! - [`types`]: typed identifiers and the [`Account`] / [`User`] entities
//! - [`session`]: the session bag and the resolver that turns it into an
//!   [`AuthenticatedIdentity`], failing closed on anything partial
//! - [`middleware`]: [`AuthContext`], the per-request auth state handed to the
//!   gateway
//! - [`credentials`]: the [`CredentialVerifier`] seam and its Argon2 implementation

mod argon2_config;
pub mod credentials;
pub mod middleware;
pub mod session;
pub mod types;

pub use credentials::{Argon2Credentials, CredentialError, CredentialVerifier};
pub use middleware::{AuthContext, AuthRequired};
pub use session::{
	resolve_identity, AuthenticatedIdentity, SessionRecord, Unauthenticated, UnauthenticatedReason,
	SESSION_KEY_ACCOUNT_ID, SESSION_KEY_USER_ID,
};
pub use types::{Account, AccountId, ResourceId, User, UserId};
