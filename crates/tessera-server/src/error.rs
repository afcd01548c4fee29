// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error taxonomy for gateway and account operations.
//!
//! `Unauthenticated`, `NotFound`, `Forbidden`, `InvalidInput` and `Conflict`
//! are deterministic outcomes and surface verbatim. `PolicyFault` and
//! `Internal` carry internal detail for logs only; callers get a fixed
//! message from [`GatewayError::public_message`].

use http::StatusCode;
use tessera_server_auth::AuthRequired;
use thiserror::Error;

/// Public message for every fault that must not leak detail.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

#[derive(Debug, Error)]
pub enum GatewayError {
	#[error("not logged in")]
	Unauthenticated,

	#[error("{0} not found")]
	NotFound(&'static str),

	#[error("forbidden: {0}")]
	Forbidden(String),

	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("conflict: {0}")]
	Conflict(String),

	#[error("policy fault: {0}")]
	PolicyFault(String),

	#[error("internal error: {0}")]
	Internal(String),
}

impl GatewayError {
	/// Transport-neutral status classification.
	pub fn status_code(&self) -> StatusCode {
		match self {
			Self::Unauthenticated => StatusCode::UNAUTHORIZED,
			Self::NotFound(_) => StatusCode::NOT_FOUND,
			Self::Forbidden(_) => StatusCode::FORBIDDEN,
			Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
			Self::Conflict(_) => StatusCode::CONFLICT,
			Self::PolicyFault(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// The message safe to hand back across the transport boundary.
	pub fn public_message(&self) -> String {
		match self {
			Self::PolicyFault(_) | Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
			other => other.to_string(),
		}
	}

	/// True for faults that are the server's problem rather than the caller's.
	pub fn is_fault(&self) -> bool {
		matches!(self, Self::PolicyFault(_) | Self::Internal(_))
	}
}

impl From<AuthRequired> for GatewayError {
	fn from(_: AuthRequired) -> Self {
		Self::Unauthenticated
	}
}
