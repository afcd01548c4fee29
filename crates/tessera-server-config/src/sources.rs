// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: defaults, TOML files and environment variables.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	AuthConfigLayer, DatabaseConfigLayer, LogFormat, LoggingConfigLayer, PolicyConfigLayer,
};

/// System-wide config file, read when no `--config` is given.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/tessera/server.toml";

/// Where a layer came from. Later (higher) sources win on merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// A producer of one configuration layer.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Contributes an empty layer; section defaults apply at finalize time.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!(path = %self.path.display(), "config file parsed");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: TESSERA_SERVER_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		layer_from_env(&|name| std::env::var(name).ok())
	}
}

type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn layer_from_env(lookup: Lookup<'_>) -> Result<ServerConfigLayer, ConfigError> {
	let env = Env(lookup);
	Ok(ServerConfigLayer {
		database: Some(DatabaseConfigLayer {
			url: env.var("TESSERA_SERVER_DATABASE_URL"),
		}),
		policy: Some(PolicyConfigLayer {
			model_path: env.var("TESSERA_SERVER_POLICY_MODEL_PATH").map(PathBuf::from),
			policy_path: env.var("TESSERA_SERVER_POLICY_PATH").map(PathBuf::from),
		}),
		logging: Some(LoggingConfigLayer {
			level: env.var("TESSERA_SERVER_LOG_LEVEL"),
			format: env.parsed::<LogFormat>("TESSERA_SERVER_LOG_FORMAT")?,
		}),
		auth: Some(AuthConfigLayer {
			signups_disabled: env.bool("TESSERA_SERVER_SIGNUPS_DISABLED")?,
		}),
	})
}

struct Env<'a>(Lookup<'a>);

impl Env<'_> {
	fn var(&self, name: &str) -> Option<String> {
		(self.0)(name).filter(|s| !s.is_empty())
	}

	fn bool(&self, name: &str) -> Result<Option<bool>, ConfigError> {
		match self.var(name) {
			Some(v) => match v.to_ascii_lowercase().as_str() {
				"true" | "1" | "yes" | "on" => Ok(Some(true)),
				"false" | "0" | "no" | "off" => Ok(Some(false)),
				_ => Err(ConfigError::InvalidValue {
					key: name.to_string(),
					message: format!("invalid boolean value '{v}'"),
				}),
			},
			None => Ok(None),
		}
	}

	fn parsed<T>(&self, name: &str) -> Result<Option<T>, ConfigError>
	where
		T: std::str::FromStr<Err = String>,
	{
		match self.var(name) {
			Some(v) => v.parse().map(Some).map_err(|message| ConfigError::InvalidValue {
				key: name.to_string(),
				message,
			}),
			None => Ok(None),
		}
	}
}
