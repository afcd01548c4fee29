// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository for database operations.

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePool, Row};
use tessera_server_auth::{User, UserId};

use crate::error::DbError;
use crate::types::{parse_id, parse_timestamp};

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError>;
	async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError>;
}

/// Repository for user lookups. Users are created by
/// [`SignupRepository`](crate::SignupRepository).
#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Get a user by ID.
	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, username, credential_hash, account_id, created_at
			FROM users
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}

	/// Get a user by username. Usernames are unique across accounts.
	#[tracing::instrument(skip(self))]
	pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, username, credential_hash, account_id, created_at
			FROM users
			WHERE username = ?
			"#,
		)
		.bind(username)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, DbError> {
	let id: String = row.get("id");
	let account_id: String = row.get("account_id");
	let created_at: String = row.get("created_at");

	Ok(User {
		id: parse_id(&id, "user ID")?,
		username: row.get("username"),
		credential_hash: row.get("credential_hash"),
		account_id: parse_id(&account_id, "account ID")?,
		created_at: parse_timestamp(&created_at)?,
	})
}

#[async_trait]
impl UserStore for UserRepository {
	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		self.get_user_by_id(id).await
	}

	async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
		self.get_user_by_username(username).await
	}
}
