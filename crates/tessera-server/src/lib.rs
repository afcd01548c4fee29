// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tessera server core.
//!
//! The transport layer resolves a session into an
//! [`AuthContext`](tessera_server_auth::AuthContext) and calls into
//! [`ResourceGateway`] or [`AccountService`]; every outcome comes back as a
//! [`GatewayError`] it can classify without knowing the internals.

pub mod accounts;
pub mod bootstrap;
pub mod error;
pub mod gateway;

pub use accounts::AccountService;
pub use bootstrap::{bootstrap, load_policy, BootstrapError, Services};
pub use error::{GatewayError, INTERNAL_ERROR_MESSAGE};
pub use gateway::{ResourceGateway, ACTION_CREATE, ACTION_READ};
pub use tessera_server_config::ServerConfig;
