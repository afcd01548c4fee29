// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Internal: {0}")]
	Internal(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Map a failed insert, turning unique-constraint violations into
/// [`DbError::Conflict`] named after the violated column.
pub(crate) fn map_insert_error(e: sqlx::Error) -> DbError {
	match e {
		sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
			let message = db_err.message();
			let what = if message.contains("accounts.name") {
				"account name already taken"
			} else if message.contains("users.username") {
				"username already taken"
			} else {
				"record already exists"
			};
			DbError::Conflict(what.to_string())
		}
		_ => DbError::Sqlx(e),
	}
}
