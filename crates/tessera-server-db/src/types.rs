// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tessera_common_ulid::Ulid;
use tessera_server_auth::{AccountId, ResourceId};

use crate::error::DbError;

/// A tenant-owned record created through the resource gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
	pub id: ResourceId,
	pub account_id: AccountId,
	/// The resource kind used for authorization (e.g. `stack`).
	pub kind: String,
	pub name: String,
	pub created_at: DateTime<Utc>,
}

pub(crate) fn parse_id<T: From<Ulid>>(value: &str, what: &str) -> Result<T, DbError> {
	value
		.parse::<Ulid>()
		.map(T::from)
		.map_err(|e| DbError::Internal(format!("Invalid {what}: {e}")))
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid created_at: {e}")))
}
