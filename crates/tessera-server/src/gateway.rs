// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resource gateway: authorize, then act.
//!
//! ```text
//! AuthContext ─► identity? ─► load user + account ─► is_authorized(username, account name, kind, action)
//!      │              │                │                          │
//!      ▼              ▼                ▼                          ▼
//! Unauthenticated  NotFound       Forbidden (mismatch)    Forbidden / PolicyFault
//!                                                                 │ allowed
//!                                                                 ▼
//!                                                     allocate id ─► storage ─► Completed | Internal
//! ```
//!
//! Nothing reaches storage before the authorization decision, so dropping the
//! future early never leaves a write behind.

use std::sync::Arc;

use chrono::Utc;
use tessera_common_ulid::UlidGenerator;
use tessera_server_auth::{Account, AuthContext, ResourceId, User};
use tessera_server_authz::Authorizer;
use tessera_server_db::{AccountStore, DbError, Resource, ResourceStore, UserStore};
use tracing::{debug, error, instrument, warn};

use crate::error::GatewayError;

pub const ACTION_CREATE: &str = "create";
pub const ACTION_READ: &str = "read";

/// Gateway over tenant-owned resources.
#[derive(Clone)]
pub struct ResourceGateway {
	users: Arc<dyn UserStore>,
	accounts: Arc<dyn AccountStore>,
	resources: Arc<dyn ResourceStore>,
	authorizer: Arc<dyn Authorizer>,
	ids: Arc<UlidGenerator>,
}

impl ResourceGateway {
	pub fn new(
		users: Arc<dyn UserStore>,
		accounts: Arc<dyn AccountStore>,
		resources: Arc<dyn ResourceStore>,
		authorizer: Arc<dyn Authorizer>,
		ids: Arc<UlidGenerator>,
	) -> Self {
		Self {
			users,
			accounts,
			resources,
			authorizer,
			ids,
		}
	}

	/// Create a resource of `kind` named `name` in the caller's account.
	///
	/// Performs exactly one storage write on success and none otherwise.
	#[instrument(skip(self, ctx))]
	pub async fn create_resource(
		&self,
		ctx: &AuthContext,
		kind: &str,
		name: &str,
	) -> Result<Resource, GatewayError> {
		ctx.require_identity()?;
		require_non_empty("resource kind", kind)?;
		require_non_empty("resource name", name)?;

		let (user, account) = self.identify(ctx).await?;
		self.authorize(&user, &account, kind, ACTION_CREATE)?;

		let resource = Resource {
			id: ResourceId::generate(&self.ids),
			account_id: account.id,
			kind: kind.to_string(),
			name: name.to_string(),
			created_at: Utc::now(),
		};

		self.resources
			.create_resource(&resource)
			.await
			.map_err(|e| storage_fault("create resource", e))?;

		debug!(resource_id = %resource.id, account = %account.name, "resource created");
		Ok(resource)
	}

	/// List the caller account's resources of `kind`, in creation order.
	#[instrument(skip(self, ctx))]
	pub async fn list_resources(
		&self,
		ctx: &AuthContext,
		kind: &str,
	) -> Result<Vec<Resource>, GatewayError> {
		ctx.require_identity()?;
		require_non_empty("resource kind", kind)?;

		let (user, account) = self.identify(ctx).await?;
		self.authorize(&user, &account, kind, ACTION_READ)?;

		self.resources
			.list_resources(&account.id, kind)
			.await
			.map_err(|e| storage_fault("list resources", e))
	}

	/// The account the caller's session is bound to.
	#[instrument(skip(self, ctx))]
	pub async fn current_account(&self, ctx: &AuthContext) -> Result<Account, GatewayError> {
		let (_, account) = self.identify(ctx).await?;
		Ok(account)
	}

	/// Resolve the session identity to stored entities. A user whose account
	/// differs from the session's is refused before any policy lookup.
	async fn identify(&self, ctx: &AuthContext) -> Result<(User, Account), GatewayError> {
		let identity = ctx.require_identity()?;

		let user = self
			.users
			.get_user_by_id(&identity.user_id())
			.await
			.map_err(|e| storage_fault("load user", e))?
			.ok_or(GatewayError::NotFound("user"))?;

		let account = self
			.accounts
			.get_account_by_id(&identity.account_id())
			.await
			.map_err(|e| storage_fault("load account", e))?
			.ok_or(GatewayError::NotFound("account"))?;

		if user.account_id != account.id {
			warn!(
				user_id = %user.id,
				user_account = %user.account_id,
				session_account = %account.id,
				"session account does not match user's account"
			);
			return Err(GatewayError::Forbidden(
				"session is not bound to the user's account".to_string(),
			));
		}

		Ok((user, account))
	}

	fn authorize(
		&self,
		user: &User,
		account: &Account,
		kind: &str,
		action: &str,
	) -> Result<(), GatewayError> {
		match self
			.authorizer
			.is_authorized(&user.username, &account.name, kind, action)
		{
			Ok(true) => Ok(()),
			Ok(false) => {
				debug!(
					username = %user.username,
					account = %account.name,
					kind,
					action,
					"authorization denied"
				);
				Err(GatewayError::Forbidden(format!(
					"not permitted to {action} {kind}"
				)))
			}
			Err(e) => {
				error!(
					error = %e,
					username = %user.username,
					account = %account.name,
					kind,
					action,
					"policy evaluation failed"
				);
				Err(GatewayError::PolicyFault(e.to_string()))
			}
		}
	}
}

fn require_non_empty(what: &str, value: &str) -> Result<(), GatewayError> {
	if value.trim().is_empty() {
		return Err(GatewayError::InvalidInput(format!("{what} must not be empty")));
	}
	Ok(())
}

fn storage_fault(operation: &'static str, e: DbError) -> GatewayError {
	error!(error = %e, operation, "storage operation failed");
	GatewayError::Internal(format!("{operation}: {e}"))
}
