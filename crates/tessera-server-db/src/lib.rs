// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage for Tessera.
//!
//! Each store is an `async_trait` contract ([`AccountStore`], [`UserStore`],
//! [`ResourceStore`], [`SignupStore`]) with a SQLite repository behind it.
//! The gateway only depends on the traits.

pub mod account;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod resource;
pub mod signup;
pub mod testing;
pub mod types;
pub mod user;

pub use account::{AccountRepository, AccountStore};
pub use error::{DbError, Result};
pub use migrations::run_migrations;
pub use pool::create_pool;
pub use resource::{ResourceRepository, ResourceStore};
pub use signup::{SignupRepository, SignupStore};
pub use types::Resource;
pub use user::{UserRepository, UserStore};
