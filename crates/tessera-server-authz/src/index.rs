// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Domain-scoped policy index.
//!
//! Facts are bucketed by the domain they were recorded under. A bucket only
//! ever answers questions about its own domain; the one exception is the
//! wildcard bucket (domain `*`), which is consulted for every domain.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::facts::PolicyFact;

/// Matches any concrete value in any fact field.
pub const WILDCARD: &str = "*";

fn matches(pattern: &str, value: &str) -> bool {
	pattern == WILDCARD || pattern == value
}

/// A `(resource, action)` pair a role is granted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permission {
	pub resource: String,
	pub action: String,
}

impl Permission {
	pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
		Self {
			resource: resource.into(),
			action: action.into(),
		}
	}

	/// Whether this permission covers the concrete resource and action.
	pub fn covers(&self, resource: &str, action: &str) -> bool {
		matches(&self.resource, resource) && matches(&self.action, action)
	}
}

/// The facts recorded under one domain.
#[derive(Debug, Clone, Default)]
pub struct DomainPolicy {
	/// subject -> roles held directly
	grants: HashMap<String, BTreeSet<String>>,
	/// role -> permissions
	permissions: HashMap<String, HashSet<Permission>>,
}

impl DomainPolicy {
	/// Roles granted directly to `subject`, including grants to every subject.
	pub fn roles_of<'a>(&'a self, subject: &str) -> impl Iterator<Item = &'a str> + 'a {
		let direct = self.grants.get(subject);
		let everyone = if subject == WILDCARD {
			None
		} else {
			self.grants.get(WILDCARD)
		};
		direct
			.into_iter()
			.chain(everyone)
			.flat_map(|roles| roles.iter().map(String::as_str))
	}

	/// Whether `role` (or any role, via a `*` permission fact) may perform
	/// `action` on `resource`.
	pub fn permits(&self, role: &str, resource: &str, action: &str) -> bool {
		let granted = |r: &str| {
			self.permissions
				.get(r)
				.is_some_and(|perms| perms.iter().any(|p| p.covers(resource, action)))
		};
		granted(role) || (role != WILDCARD && granted(WILDCARD))
	}

	/// Whether any role at all may perform `action` on `resource`.
	pub fn permits_any_role(&self, resource: &str, action: &str) -> bool {
		self.permissions
			.values()
			.flatten()
			.any(|p| p.covers(resource, action))
	}

	fn grant(&mut self, subject: String, role: String) -> bool {
		self.grants.entry(subject).or_default().insert(role)
	}

	fn permit(&mut self, role: String, permission: Permission) -> bool {
		self.permissions.entry(role).or_default().insert(permission)
	}
}

/// Counts describing a built index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PolicyStats {
	pub domains: usize,
	pub permission_facts: usize,
	pub grouping_facts: usize,
}

impl fmt::Display for PolicyStats {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} domains, {} permission facts, {} grouping facts",
			self.domains, self.permission_facts, self.grouping_facts
		)
	}
}

/// Immutable index of all loaded facts, keyed by domain.
#[derive(Debug, Clone, Default)]
pub struct PolicyIndex {
	domains: HashMap<String, DomainPolicy>,
	stats: PolicyStats,
}

impl PolicyIndex {
	/// Build the index. Duplicate facts are counted once.
	pub fn build(facts: impl IntoIterator<Item = PolicyFact>) -> Self {
		let mut domains: HashMap<String, DomainPolicy> = HashMap::new();
		let mut stats = PolicyStats::default();

		for fact in facts {
			match fact {
				PolicyFact::Permission {
					role,
					domain,
					resource,
					action,
				} => {
					let bucket = domains.entry(domain).or_default();
					if bucket.permit(role, Permission { resource, action }) {
						stats.permission_facts += 1;
					}
				}
				PolicyFact::Grouping {
					subject,
					role,
					domain,
				} => {
					let bucket = domains.entry(domain).or_default();
					if bucket.grant(subject, role) {
						stats.grouping_facts += 1;
					}
				}
			}
		}

		stats.domains = domains.len();
		Self { domains, stats }
	}

	/// The bucket recorded under exactly `domain`.
	pub fn domain(&self, domain: &str) -> Option<&DomainPolicy> {
		self.domains.get(domain)
	}

	/// Buckets that apply to `domain`: its own, then the wildcard bucket.
	pub fn scopes<'a>(&'a self, domain: &str) -> impl Iterator<Item = &'a DomainPolicy> + 'a {
		let own = self.domains.get(domain);
		let wildcard = if domain == WILDCARD {
			None
		} else {
			self.domains.get(WILDCARD)
		};
		own.into_iter().chain(wildcard)
	}

	pub fn domain_names(&self) -> impl Iterator<Item = &str> {
		self.domains.keys().map(String::as_str)
	}

	pub fn stats(&self) -> PolicyStats {
		self.stats
	}
}
