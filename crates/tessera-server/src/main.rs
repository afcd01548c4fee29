// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tessera_server::load_policy;
use tessera_server_authz::Authorizer;
use tessera_server_config::{LogFormat, LoggingConfig, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Tessera server - tenant-scoped authorization core.
#[derive(Parser, Debug)]
#[command(
	name = "tessera-server",
	about = "Tenant-scoped resource gateway and policy tooling",
	version
)]
struct Args {
	/// Config file to read instead of /etc/tessera/server.toml
	#[arg(long, global = true, value_name = "PATH")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
	/// Apply database migrations
	Migrate,
	/// Inspect the authorization policy
	Policy {
		#[command(subcommand)]
		command: PolicyCommand,
	},
}

#[derive(Subcommand, Debug)]
enum PolicyCommand {
	/// Load the model and fact table and print index statistics
	Check,
	/// Evaluate a single request and print allow or deny
	Enforce {
		subject: String,
		domain: String,
		resource: String,
		action: String,
	},
	/// Print the roles a subject holds in a domain
	Roles { subject: String, domain: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Command::Version = args.command {
		println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => tessera_server_config::load_config_with_file(path)?,
		None => tessera_server_config::load_config()?,
	};
	init_tracing(&config.logging);

	match args.command {
		Command::Version => {}
		Command::Migrate => migrate(&config).await?,
		Command::Policy { command } => policy(&config, command)?,
	}

	Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| logging.level.clone().into());
	let registry = tracing_subscriber::registry().with(filter);

	match logging.format {
		LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
		LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
	}
}

async fn migrate(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
	tracing::info!(database = %config.database.url, "running migrations");
	let pool = tessera_server_db::create_pool(&config.database.url).await?;
	tessera_server_db::run_migrations(&pool).await?;
	println!("migrations applied");
	Ok(())
}

fn policy(config: &ServerConfig, command: PolicyCommand) -> Result<(), Box<dyn std::error::Error>> {
	let engine = load_policy(&config.policy)?;

	match command {
		PolicyCommand::Check => {
			println!("matcher: {}", engine.model().matcher());
			println!("{}", engine.stats());
		}
		PolicyCommand::Enforce {
			subject,
			domain,
			resource,
			action,
		} => {
			let allowed = engine.is_authorized(&subject, &domain, &resource, &action)?;
			println!("{}", if allowed { "allow" } else { "deny" });
		}
		PolicyCommand::Roles { subject, domain } => {
			for role in engine.roles_for(&subject, &domain) {
				println!("{role}");
			}
		}
	}

	Ok(())
}
