// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Signup and login.

use std::sync::Arc;

use chrono::Utc;
use tessera_common_ulid::UlidGenerator;
use tessera_server_auth::{Account, AccountId, CredentialVerifier, SessionRecord, User, UserId};
use tessera_server_authz::WILDCARD;
use tessera_server_db::{DbError, SignupStore, UserStore};
use tracing::{debug, error, info, instrument};

use crate::error::GatewayError;

/// Creates accounts and authenticates their users.
#[derive(Clone)]
pub struct AccountService {
	signups: Arc<dyn SignupStore>,
	users: Arc<dyn UserStore>,
	credentials: Arc<dyn CredentialVerifier>,
	ids: Arc<UlidGenerator>,
	signups_disabled: bool,
}

impl AccountService {
	pub fn new(
		signups: Arc<dyn SignupStore>,
		users: Arc<dyn UserStore>,
		credentials: Arc<dyn CredentialVerifier>,
		ids: Arc<UlidGenerator>,
	) -> Self {
		Self {
			signups,
			users,
			credentials,
			ids,
			signups_disabled: false,
		}
	}

	pub fn with_signups_disabled(mut self, disabled: bool) -> Self {
		self.signups_disabled = disabled;
		self
	}

	/// Create an account and its first user. Both are persisted or neither is.
	#[instrument(skip(self, password))]
	pub async fn signup(
		&self,
		username: &str,
		password: &str,
		account_name: &str,
	) -> Result<(Account, User), GatewayError> {
		if self.signups_disabled {
			return Err(GatewayError::Forbidden("signups are disabled".to_string()));
		}
		if username.trim().is_empty() {
			return Err(GatewayError::InvalidInput("username must not be empty".to_string()));
		}
		if password.is_empty() {
			return Err(GatewayError::InvalidInput("password must not be empty".to_string()));
		}
		if account_name.trim().is_empty() {
			return Err(GatewayError::InvalidInput(
				"account name must not be empty".to_string(),
			));
		}
		// Usernames and account names are policy subjects and domains.
		if username.trim() == WILDCARD {
			return Err(GatewayError::InvalidInput(format!(
				"username must not be `{WILDCARD}`"
			)));
		}
		if account_name.trim() == WILDCARD {
			return Err(GatewayError::InvalidInput(format!(
				"account name must not be `{WILDCARD}`"
			)));
		}

		let credential_hash = self.credentials.hash(password).map_err(|e| {
			error!(error = %e, "failed to hash credential");
			GatewayError::Internal(e.to_string())
		})?;

		let now = Utc::now();
		let account = Account {
			id: AccountId::generate(&self.ids),
			name: account_name.to_string(),
			created_at: now,
		};
		let user = User {
			id: UserId::generate(&self.ids),
			username: username.to_string(),
			credential_hash,
			account_id: account.id,
			created_at: now,
		};

		self.signups
			.create_account_with_user(&account, &user)
			.await
			.map_err(|e| match e {
				DbError::Conflict(message) => GatewayError::Conflict(message),
				other => {
					error!(error = %other, "failed to persist signup");
					GatewayError::Internal(other.to_string())
				}
			})?;

		info!(account_id = %account.id, user_id = %user.id, "account created");
		Ok((account, user))
	}

	/// Check credentials and return the session bag a login populates.
	///
	/// An unknown username and a wrong password are indistinguishable.
	#[instrument(skip(self, password))]
	pub async fn login(&self, username: &str, password: &str) -> Result<SessionRecord, GatewayError> {
		let user = self
			.users
			.get_user_by_username(username)
			.await
			.map_err(|e| {
				error!(error = %e, "failed to load user for login");
				GatewayError::Internal(e.to_string())
			})?;

		let Some(user) = user else {
			debug!("login for unknown username");
			return Err(GatewayError::Unauthenticated);
		};

		let valid = self
			.credentials
			.verify(password, &user.credential_hash)
			.map_err(|e| {
				error!(error = %e, user_id = %user.id, "stored credential unusable");
				GatewayError::Internal(e.to_string())
			})?;

		if !valid {
			debug!(user_id = %user.id, "login with wrong password");
			return Err(GatewayError::Unauthenticated);
		}

		debug!(user_id = %user.id, account_id = %user.account_id, "login succeeded");
		Ok(SessionRecord::for_identity(user.id, user.account_id))
	}
}
