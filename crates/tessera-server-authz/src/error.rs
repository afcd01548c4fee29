// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while loading the policy model or fact table.
#[derive(Debug, Error)]
pub enum PolicyLoadError {
	#[error("failed to read policy {kind} from {path}: {source}")]
	Io {
		kind: &'static str,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid policy model at line {line}: {message}")]
	Model { line: usize, message: String },

	#[error("invalid policy model: missing [{0}] section")]
	MissingSection(&'static str),

	#[error("invalid policy fact at line {line}: {message}")]
	Facts { line: u64, message: String },
}

/// Faults raised by an authorizer that cannot evaluate a request.
///
/// A denied request is never an error; it is `Ok(false)`.
#[derive(Debug, Clone, Error)]
pub enum AuthzError {
	#[error("policy store unavailable: {0}")]
	Unavailable(String),
}
