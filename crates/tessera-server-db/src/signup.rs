// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Atomic account + user creation.

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use tessera_server_auth::{Account, User};

use crate::error::{map_insert_error, DbError};

#[async_trait]
pub trait SignupStore: Send + Sync {
	/// Persist a new account and its first user. Both rows are written or
	/// neither is.
	async fn create_account_with_user(&self, account: &Account, user: &User) -> Result<(), DbError>;
}

#[derive(Clone)]
pub struct SignupRepository {
	pool: SqlitePool,
}

impl SignupRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert the account and user in one transaction.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the account name or username is taken,
	/// `DbError::Internal` if the user does not belong to the account.
	#[tracing::instrument(
		skip(self, account, user),
		fields(account_id = %account.id, account_name = %account.name, user_id = %user.id, username = %user.username)
	)]
	pub async fn create_account_with_user(
		&self,
		account: &Account,
		user: &User,
	) -> Result<(), DbError> {
		if user.account_id != account.id {
			return Err(DbError::Internal(
				"user does not belong to the account being created".to_string(),
			));
		}

		let mut tx = self.pool.begin().await?;

		sqlx::query(
			r#"
			INSERT INTO accounts (id, name, created_at)
			VALUES (?, ?, ?)
			"#,
		)
		.bind(account.id.to_string())
		.bind(&account.name)
		.bind(account.created_at.to_rfc3339())
		.execute(&mut *tx)
		.await
		.map_err(map_insert_error)?;

		sqlx::query(
			r#"
			INSERT INTO users (id, username, credential_hash, account_id, created_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(user.id.to_string())
		.bind(&user.username)
		.bind(&user.credential_hash)
		.bind(user.account_id.to_string())
		.bind(user.created_at.to_rfc3339())
		.execute(&mut *tx)
		.await
		.map_err(map_insert_error)?;

		tx.commit().await?;

		tracing::debug!("account and user created");
		Ok(())
	}
}

#[async_trait]
impl SignupStore for SignupRepository {
	async fn create_account_with_user(&self, account: &Account, user: &User) -> Result<(), DbError> {
		self.create_account_with_user(account, user).await
	}
}
