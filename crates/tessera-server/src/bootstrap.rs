// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Startup wiring: policy, database, services.
//!
//! Policy is loaded before the database is touched; a bad model or fact table
//! is fatal and nothing else starts.

use std::sync::Arc;

use sqlx::sqlite::SqlitePool;
use tessera_common_ulid::UlidGenerator;
use tessera_server_auth::Argon2Credentials;
use tessera_server_authz::{PolicyEngine, PolicyLoadError};
use tessera_server_config::{PolicyConfig, ServerConfig};
use tessera_server_db::{
	create_pool, run_migrations, AccountRepository, DbError, ResourceRepository,
	SignupRepository, UserRepository,
};
use thiserror::Error;
use tracing::info;

use crate::accounts::AccountService;
use crate::gateway::ResourceGateway;

#[derive(Debug, Error)]
pub enum BootstrapError {
	#[error("failed to load policy: {0}")]
	Policy(#[from] PolicyLoadError),

	#[error("database error: {0}")]
	Database(#[from] DbError),
}

/// Load the authorization model and fact table named by the config.
pub fn load_policy(config: &PolicyConfig) -> Result<PolicyEngine, PolicyLoadError> {
	PolicyEngine::load(&config.model_path, &config.policy_path)
}

/// Everything a transport layer needs to serve requests.
#[derive(Clone)]
pub struct Services {
	pub gateway: ResourceGateway,
	pub accounts: AccountService,
	pub engine: Arc<PolicyEngine>,
	pub pool: SqlitePool,
}

impl Services {
	/// Wire the SQLite repositories, Argon2 credentials and a fresh
	/// identifier pool around an already loaded engine.
	pub fn new(pool: SqlitePool, engine: Arc<PolicyEngine>, signups_disabled: bool) -> Self {
		let ids = Arc::new(UlidGenerator::new());
		let users = Arc::new(UserRepository::new(pool.clone()));

		let gateway = ResourceGateway::new(
			users.clone(),
			Arc::new(AccountRepository::new(pool.clone())),
			Arc::new(ResourceRepository::new(pool.clone())),
			engine.clone(),
			ids.clone(),
		);
		let accounts = AccountService::new(
			Arc::new(SignupRepository::new(pool.clone())),
			users,
			Arc::new(Argon2Credentials),
			ids,
		)
		.with_signups_disabled(signups_disabled);

		Self {
			gateway,
			accounts,
			engine,
			pool,
		}
	}
}

/// Load policy, open and migrate the database, and wire the services.
pub async fn bootstrap(config: &ServerConfig) -> Result<Services, BootstrapError> {
	let engine = Arc::new(load_policy(&config.policy)?);
	info!(stats = %engine.stats(), "policy ready");

	let pool = create_pool(&config.database.url).await?;
	run_migrations(&pool).await?;

	Ok(Services::new(pool, engine, config.auth.signups_disabled))
}
