// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization policy file locations.

use std::path::PathBuf;

use serde::Deserialize;

const DEFAULT_MODEL_PATH: &str = "rbac_with_domains_model.conf";
const DEFAULT_POLICY_PATH: &str = "rbac_with_domains_policy.csv";

/// Policy configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
	/// Model description (request shape and matcher).
	pub model_path: PathBuf,
	/// Fact table (`p` and `g` lines).
	pub policy_path: PathBuf,
}

impl Default for PolicyConfig {
	fn default() -> Self {
		Self {
			model_path: PathBuf::from(DEFAULT_MODEL_PATH),
			policy_path: PathBuf::from(DEFAULT_POLICY_PATH),
		}
	}
}

/// Policy configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfigLayer {
	#[serde(default)]
	pub model_path: Option<PathBuf>,
	#[serde(default)]
	pub policy_path: Option<PathBuf>,
}

impl PolicyConfigLayer {
	pub fn merge(&mut self, other: PolicyConfigLayer) {
		if other.model_path.is_some() {
			self.model_path = other.model_path;
		}
		if other.policy_path.is_some() {
			self.policy_path = other.policy_path;
		}
	}

	pub fn finalize(self) -> PolicyConfig {
		PolicyConfig {
			model_path: self
				.model_path
				.unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
			policy_path: self
				.policy_path
				.unwrap_or_else(|| PathBuf::from(DEFAULT_POLICY_PATH)),
		}
	}
}
