// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account repository for database operations.

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePool, Row};
use tessera_server_auth::{Account, AccountId};

use crate::error::DbError;
use crate::types::{parse_id, parse_timestamp};

#[async_trait]
pub trait AccountStore: Send + Sync {
	async fn get_account_by_id(&self, id: &AccountId) -> Result<Option<Account>, DbError>;
	async fn get_account_by_name(&self, name: &str) -> Result<Option<Account>, DbError>;
}

/// Repository for account lookups. Accounts are created by
/// [`SignupRepository`](crate::SignupRepository).
#[derive(Clone)]
pub struct AccountRepository {
	pool: SqlitePool,
}

impl AccountRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Get an account by ID.
	///
	/// # Returns
	/// `None` if no account exists with this ID.
	#[tracing::instrument(skip(self), fields(account_id = %id))]
	pub async fn get_account_by_id(&self, id: &AccountId) -> Result<Option<Account>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, created_at
			FROM accounts
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_account(&r)).transpose()
	}

	/// Get an account by its unique name.
	#[tracing::instrument(skip(self))]
	pub async fn get_account_by_name(&self, name: &str) -> Result<Option<Account>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, created_at
			FROM accounts
			WHERE name = ?
			"#,
		)
		.bind(name)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_account(&r)).transpose()
	}
}

pub(crate) fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<Account, DbError> {
	let id: String = row.get("id");
	let created_at: String = row.get("created_at");

	Ok(Account {
		id: parse_id(&id, "account ID")?,
		name: row.get("name"),
		created_at: parse_timestamp(&created_at)?,
	})
}

#[async_trait]
impl AccountStore for AccountRepository {
	async fn get_account_by_id(&self, id: &AccountId) -> Result<Option<Account>, DbError> {
		self.get_account_by_id(id).await
	}

	async fn get_account_by_name(&self, name: &str) -> Result<Option<Account>, DbError> {
		self.get_account_by_name(name).await
	}
}
