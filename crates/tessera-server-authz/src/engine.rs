// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization decisions over a [`PolicyIndex`].
//!
//! A request `(subject, domain, resource, action)` is allowed iff some role
//! reachable from the subject through grouping facts *in that domain* holds a
//! permission fact *in that domain* covering the resource and action. The
//! subject itself counts as reachable, so permissions may name subjects
//! directly. With no matching fact the answer is deny.
//!
//! "In that domain" means the domain's own facts plus facts recorded under the
//! wildcard domain. Nothing recorded under another concrete domain is ever
//! consulted, which is what keeps tenants apart.

use std::collections::{HashSet, VecDeque};
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::error::{AuthzError, PolicyLoadError};
use crate::facts::{load_facts, parse_facts, PolicyFact};
use crate::index::{DomainPolicy, PolicyIndex, PolicyStats, WILDCARD};
use crate::model::PolicyModel;

/// Decides whether a subject may act on a resource within a domain.
///
/// A denial is `Ok(false)`. `Err` is reserved for an authorizer that cannot
/// evaluate at all.
pub trait Authorizer: Send + Sync {
	fn is_authorized(
		&self,
		subject: &str,
		domain: &str,
		resource: &str,
		action: &str,
	) -> Result<bool, AuthzError>;
}

/// In-memory RBAC-with-domains engine. Immutable once built.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
	model: PolicyModel,
	index: PolicyIndex,
}

impl PolicyEngine {
	pub fn new(model: PolicyModel, facts: impl IntoIterator<Item = PolicyFact>) -> Self {
		Self {
			model,
			index: PolicyIndex::build(facts),
		}
	}

	/// Build an engine from in-memory model and fact text.
	pub fn from_strs(model: &str, facts: &str) -> Result<Self, PolicyLoadError> {
		let model = PolicyModel::parse(model)?;
		let facts = parse_facts(facts)?;
		Ok(Self::new(model, facts))
	}

	/// Load the model and fact table from disk.
	#[instrument(skip_all, fields(model = %model_path.display(), policy = %policy_path.display()))]
	pub fn load(model_path: &Path, policy_path: &Path) -> Result<Self, PolicyLoadError> {
		let model = PolicyModel::load(model_path)?;
		let facts = load_facts(policy_path)?;
		let engine = Self::new(model, facts);

		let stats = engine.stats();
		info!(
			domains = stats.domains,
			permission_facts = stats.permission_facts,
			grouping_facts = stats.grouping_facts,
			"policy loaded"
		);
		Ok(engine)
	}

	pub fn model(&self) -> &PolicyModel {
		&self.model
	}

	pub fn stats(&self) -> PolicyStats {
		self.index.stats()
	}

	/// Roles reachable from `subject` in `domain`, sorted, excluding the
	/// subject itself.
	pub fn roles_for(&self, subject: &str, domain: &str) -> Vec<String> {
		let scopes: Vec<&DomainPolicy> = self.index.scopes(domain).collect();
		let mut roles: Vec<String> = reachable(&scopes, subject)
			.into_iter()
			.filter(|role| *role != subject)
			.map(str::to_string)
			.collect();
		roles.sort_unstable();
		roles
	}

	/// Evaluate a request. Pure and non-blocking.
	pub fn evaluate(&self, subject: &str, domain: &str, resource: &str, action: &str) -> bool {
		let scopes: Vec<&DomainPolicy> = self.index.scopes(domain).collect();
		if scopes.is_empty() {
			return false;
		}

		// A `*` role only counts when a grouping fact hands it out; a request
		// subject spelled `*` is just a name.
		let roles = reachable(&scopes, subject);
		if roles.contains(WILDCARD) {
			return scopes.iter().any(|s| s.permits_any_role(resource, action));
		}

		std::iter::once(subject)
			.chain(roles.iter().copied())
			.any(|role| scopes.iter().any(|s| s.permits(role, resource, action)))
	}
}

impl Authorizer for PolicyEngine {
	#[instrument(level = "debug", skip(self))]
	fn is_authorized(
		&self,
		subject: &str,
		domain: &str,
		resource: &str,
		action: &str,
	) -> Result<bool, AuthzError> {
		let allowed = self.evaluate(subject, domain, resource, action);
		debug!(allowed, "authorization decision");
		Ok(allowed)
	}
}

/// Breadth-first role closure over the given scopes. Cycle-safe.
///
/// Returns only roles reached through grouping facts; the start node is not
/// in the set unless a cycle leads back to it. A reached `*` role is not
/// expanded further.
fn reachable<'a>(scopes: &[&'a DomainPolicy], subject: &'a str) -> HashSet<&'a str> {
	let mut roles: HashSet<&str> = HashSet::new();
	let mut queue: VecDeque<&str> = VecDeque::from([subject]);

	while let Some(node) = queue.pop_front() {
		for scope in scopes {
			for role in scope.roles_of(node) {
				if roles.insert(role) && role != WILDCARD && role != subject {
					queue.push_back(role);
				}
			}
		}
	}

	roles
}
