// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role-based access control with domains.
//!
//! Subjects hold roles per domain (grouping facts) and roles hold
//! `(resource, action)` permissions per domain (permission facts). The
//! authorization domain is the tenant: a fact recorded under one domain never
//! answers a question about another.
//!
//! Loading happens once at startup and is the only fallible, blocking step:
//!
//! ```text
//! model.conf ──► PolicyModel ─┐
//!                             ├─► PolicyEngine ──► is_authorized(sub, dom, res, act)
//! policy.csv ──► PolicyFact* ─► PolicyIndex
//! ```
//!
//! After that, evaluation is a pure in-memory lookup plus a transitive role
//! closure and needs no locking.

pub mod engine;
pub mod error;
pub mod facts;
pub mod index;
pub mod model;

pub use engine::{Authorizer, PolicyEngine};
pub use error::{AuthzError, PolicyLoadError};
pub use facts::{load_facts, parse_facts, PolicyFact};
pub use index::{DomainPolicy, Permission, PolicyIndex, PolicyStats, WILDCARD};
pub use model::PolicyModel;
