// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the Tessera server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`TESSERA_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use tessera_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("policy model at {}", config.policy.model_path.display());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, SYSTEM_CONFIG_PATH,
};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
	pub database: DatabaseConfig,
	pub policy: PolicyConfig,
	pub logging: LoggingConfig,
	pub auth: AuthConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`TESSERA_SERVER_*`)
/// 2. Config file (`/etc/tessera/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file in place of the system one.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Merge the given sources in precedence order and resolve the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Resolve the merged layer, applying section defaults.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let config = ServerConfig {
		database: layer.database.unwrap_or_default().finalize(),
		policy: layer.policy.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
		auth: layer.auth.unwrap_or_default().finalize(),
	};

	validate_config(&config)?;

	info!(
		database = %config.database.url,
		model_path = %config.policy.model_path.display(),
		policy_path = %config.policy.policy_path.display(),
		log_format = %config.logging.format,
		signups_disabled = config.auth.signups_disabled,
		"configuration resolved"
	);

	Ok(config)
}

/// Reject values no component can start with.
fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
	if config.database.url.trim().is_empty() {
		return Err(ConfigError::Validation("database.url must not be empty".to_string()));
	}
	if config.policy.model_path.as_os_str().is_empty() {
		return Err(ConfigError::Validation(
			"policy.model_path must not be empty".to_string(),
		));
	}
	if config.policy.policy_path.as_os_str().is_empty() {
		return Err(ConfigError::Validation(
			"policy.policy_path must not be empty".to_string(),
		));
	}
	if config.logging.level.trim().is_empty() {
		return Err(ConfigError::Validation("logging.level must not be empty".to_string()));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	struct FixedSource(&'static str, Precedence, ServerConfigLayer);

	impl ConfigSource for FixedSource {
		fn name(&self) -> &'static str {
			self.0
		}

		fn precedence(&self) -> Precedence {
			self.1
		}

		fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
			Ok(self.2.clone())
		}
	}

	fn database_layer(url: &str) -> ServerConfigLayer {
		ServerConfigLayer {
			database: Some(DatabaseConfigLayer {
				url: Some(url.to_string()),
			}),
			..Default::default()
		}
	}

	#[test]
	fn defaults_only() {
		let config = load_from_sources(vec![Box::new(DefaultsSource)]).unwrap();
		assert_eq!(config, ServerConfig::default());
	}

	#[test]
	fn environment_beats_file_regardless_of_order() {
		let config = load_from_sources(vec![
			Box::new(FixedSource("env", Precedence::Environment, database_layer("sqlite:env.db"))),
			Box::new(FixedSource("file", Precedence::ConfigFile, database_layer("sqlite:file.db"))),
			Box::new(DefaultsSource),
		])
		.unwrap();
		assert_eq!(config.database.url, "sqlite:env.db");
	}

	#[test]
	fn file_values_fill_in_over_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("server.toml");
		std::fs::write(
			&path,
			"[policy]\nmodel_path = \"/srv/model.conf\"\n\n[auth]\nsignups_disabled = true\n",
		)
		.unwrap();

		let config = load_from_sources(vec![
			Box::new(DefaultsSource),
			Box::new(TomlSource::new(&path)),
		])
		.unwrap();
		assert_eq!(config.policy.model_path, PathBuf::from("/srv/model.conf"));
		assert_eq!(config.policy.policy_path, PathBuf::from("rbac_with_domains_policy.csv"));
		assert!(config.auth.signups_disabled);
	}

	#[test]
	fn empty_policy_path_fails_validation() {
		let layer = ServerConfigLayer {
			policy: Some(PolicyConfigLayer {
				model_path: None,
				policy_path: Some(PathBuf::new()),
			}),
			..Default::default()
		};
		let err = load_from_sources(vec![Box::new(FixedSource(
			"file",
			Precedence::ConfigFile,
			layer,
		))])
		.unwrap_err();
		assert!(err.to_string().contains("policy.policy_path"));
	}
}
