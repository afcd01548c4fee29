// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schema migrations.
//!
//! Every statement is idempotent, so running the full list against an
//! up-to-date database is a no-op.

use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

const MIGRATIONS: &[(&str, &str)] = &[
	(
		"create_accounts",
		r#"
		CREATE TABLE IF NOT EXISTS accounts (
			id TEXT PRIMARY KEY,
			name TEXT NOT NULL UNIQUE,
			created_at TEXT NOT NULL
		)
		"#,
	),
	(
		"create_users",
		r#"
		CREATE TABLE IF NOT EXISTS users (
			id TEXT PRIMARY KEY,
			username TEXT NOT NULL UNIQUE,
			credential_hash TEXT NOT NULL,
			account_id TEXT NOT NULL REFERENCES accounts(id),
			created_at TEXT NOT NULL
		)
		"#,
	),
	(
		"create_users_account_index",
		"CREATE INDEX IF NOT EXISTS idx_users_account_id ON users(account_id)",
	),
	(
		"create_resources",
		r#"
		CREATE TABLE IF NOT EXISTS resources (
			id TEXT PRIMARY KEY,
			account_id TEXT NOT NULL REFERENCES accounts(id),
			kind TEXT NOT NULL,
			name TEXT NOT NULL,
			created_at TEXT NOT NULL
		)
		"#,
	),
	(
		"create_resources_account_kind_index",
		"CREATE INDEX IF NOT EXISTS idx_resources_account_kind ON resources(account_id, kind, id)",
	),
];

/// Apply all migrations in a single transaction.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	let mut tx = pool.begin().await?;
	for (name, sql) in MIGRATIONS {
		sqlx::query(sql).execute(&mut *tx).await.map_err(|e| {
			tracing::error!(migration = *name, error = %e, "migration failed");
			DbError::Sqlx(e)
		})?;
	}
	tx.commit().await?;

	tracing::info!(count = MIGRATIONS.len(), "database migrations applied");
	Ok(())
}
