// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resource repository for database operations.

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePool, Row};
use tessera_server_auth::AccountId;

use crate::error::{map_insert_error, DbError};
use crate::types::{parse_id, parse_timestamp, Resource};

#[async_trait]
pub trait ResourceStore: Send + Sync {
	async fn create_resource(&self, resource: &Resource) -> Result<(), DbError>;
	/// Resources of `kind` owned by `account_id`, in creation order.
	async fn list_resources(
		&self,
		account_id: &AccountId,
		kind: &str,
	) -> Result<Vec<Resource>, DbError>;
}

#[derive(Clone)]
pub struct ResourceRepository {
	pool: SqlitePool,
}

impl ResourceRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(
		skip(self, resource),
		fields(resource_id = %resource.id, account_id = %resource.account_id, kind = %resource.kind)
	)]
	pub async fn create_resource(&self, resource: &Resource) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO resources (id, account_id, kind, name, created_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(resource.id.to_string())
		.bind(resource.account_id.to_string())
		.bind(&resource.kind)
		.bind(&resource.name)
		.bind(resource.created_at.to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(map_insert_error)?;

		tracing::debug!("resource created");
		Ok(())
	}

	/// Identifiers sort in creation order, so ordering by `id` is creation order.
	#[tracing::instrument(skip(self), fields(account_id = %account_id))]
	pub async fn list_resources(
		&self,
		account_id: &AccountId,
		kind: &str,
	) -> Result<Vec<Resource>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, account_id, kind, name, created_at
			FROM resources
			WHERE account_id = ? AND kind = ?
			ORDER BY id
			"#,
		)
		.bind(account_id.to_string())
		.bind(kind)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_resource).collect()
	}
}

fn row_to_resource(row: &sqlx::sqlite::SqliteRow) -> Result<Resource, DbError> {
	let id: String = row.get("id");
	let account_id: String = row.get("account_id");
	let created_at: String = row.get("created_at");

	Ok(Resource {
		id: parse_id(&id, "resource ID")?,
		account_id: parse_id(&account_id, "account ID")?,
		kind: row.get("kind"),
		name: row.get("name"),
		created_at: parse_timestamp(&created_at)?,
	})
}

#[async_trait]
impl ResourceStore for ResourceRepository {
	async fn create_resource(&self, resource: &Resource) -> Result<(), DbError> {
		self.create_resource(resource).await
	}

	async fn list_resources(
		&self,
		account_id: &AccountId,
		kind: &str,
	) -> Result<Vec<Resource>, DbError> {
		self.list_resources(account_id, kind).await
	}
}
