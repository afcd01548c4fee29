// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential hashing and verification.
//!
//! The hashing scheme is deployment policy; the rest of the system only sees
//! [`CredentialVerifier`]. [`Argon2Credentials`] is the shipped implementation
//! and stores PHC strings (`$argon2id$v=19$...`).

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use thiserror::Error;

use crate::argon2_config::argon2_instance;

#[derive(Debug, Error)]
pub enum CredentialError {
	#[error("failed to hash credential: {0}")]
	Hash(String),

	#[error("stored credential hash is malformed: {0}")]
	MalformedHash(String),
}

/// Hashes new credentials and checks presented ones.
///
/// `verify` returns `Ok(false)` for a wrong password; `Err` means the stored
/// hash itself is unusable.
pub trait CredentialVerifier: Send + Sync {
	fn hash(&self, password: &str) -> Result<String, CredentialError>;

	fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError>;
}

/// Argon2id password hashing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Credentials;

impl CredentialVerifier for Argon2Credentials {
	fn hash(&self, password: &str) -> Result<String, CredentialError> {
		let salt = SaltString::generate(&mut OsRng);
		argon2_instance()
			.hash_password(password.as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| CredentialError::Hash(e.to_string()))
	}

	fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
		let parsed = PasswordHash::new(hash).map_err(|e| CredentialError::MalformedHash(e.to_string()))?;
		// Parameters are read from the PHC string, so hashes made with other
		// cost settings still verify.
		Ok(argon2_instance()
			.verify_password(password.as_bytes(), &parsed)
			.is_ok())
	}
}
