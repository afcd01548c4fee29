// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The policy fact table.
//!
//! One fact per line, comma separated, whitespace around fields ignored:
//!
//! ```text
//! # permission: role, domain, resource, action
//! p, admin, acme, stack, create
//! # grouping: subject, role, domain
//! g, alice, admin, acme
//! ```
//!
//! `*` in any field is a wildcard.

use std::fmt;
use std::path::Path;

use crate::error::PolicyLoadError;

/// A single line of the fact table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PolicyFact {
	/// `role` may perform `action` on `resource` within `domain`.
	Permission {
		role: String,
		domain: String,
		resource: String,
		action: String,
	},
	/// `subject` holds `role` within `domain`.
	Grouping {
		subject: String,
		role: String,
		domain: String,
	},
}

impl PolicyFact {
	pub fn permission(
		role: impl Into<String>,
		domain: impl Into<String>,
		resource: impl Into<String>,
		action: impl Into<String>,
	) -> Self {
		Self::Permission {
			role: role.into(),
			domain: domain.into(),
			resource: resource.into(),
			action: action.into(),
		}
	}

	pub fn grouping(
		subject: impl Into<String>,
		role: impl Into<String>,
		domain: impl Into<String>,
	) -> Self {
		Self::Grouping {
			subject: subject.into(),
			role: role.into(),
			domain: domain.into(),
		}
	}

	/// The domain the fact is recorded under.
	pub fn domain(&self) -> &str {
		match self {
			Self::Permission { domain, .. } | Self::Grouping { domain, .. } => domain,
		}
	}
}

impl fmt::Display for PolicyFact {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Permission {
				role,
				domain,
				resource,
				action,
			} => write!(f, "p, {role}, {domain}, {resource}, {action}"),
			Self::Grouping {
				subject,
				role,
				domain,
			} => write!(f, "g, {subject}, {role}, {domain}"),
		}
	}
}

/// Read and parse a fact table file.
pub fn load_facts(path: impl AsRef<Path>) -> Result<Vec<PolicyFact>, PolicyLoadError> {
	let path = path.as_ref();
	let text = std::fs::read_to_string(path).map_err(|source| PolicyLoadError::Io {
		kind: "facts",
		path: path.to_path_buf(),
		source,
	})?;
	parse_facts(&text)
}

/// Parse a fact table.
pub fn parse_facts(text: &str) -> Result<Vec<PolicyFact>, PolicyLoadError> {
	let mut reader = csv::ReaderBuilder::new()
		.has_headers(false)
		.flexible(true)
		.trim(csv::Trim::All)
		.comment(Some(b'#'))
		.from_reader(text.as_bytes());

	let mut facts = Vec::new();
	for result in reader.records() {
		let record = result.map_err(|e| PolicyLoadError::Facts {
			line: e.position().map(|p| p.line()).unwrap_or_default(),
			message: e.to_string(),
		})?;
		let line = record.position().map(|p| p.line()).unwrap_or_default();

		// `comment` only catches `#` in the first byte; indented comments
		// arrive as a trimmed first field.
		if record.iter().all(str::is_empty) || record.get(0).is_some_and(|f| f.starts_with('#')) {
			continue;
		}

		let fields: Vec<&str> = record.iter().collect();
		if let Some(pos) = fields.iter().position(|f| f.is_empty()) {
			return Err(PolicyLoadError::Facts {
				line,
				message: format!("field {} is empty", pos + 1),
			});
		}

		let fact = match fields.as_slice() {
			["p", role, domain, resource, action] => {
				PolicyFact::permission(*role, *domain, *resource, *action)
			}
			["g", subject, role, domain] => PolicyFact::grouping(*subject, *role, *domain),
			["p", rest @ ..] => {
				return Err(PolicyLoadError::Facts {
					line,
					message: format!(
						"permission fact needs role, domain, resource, action; got {} fields",
						rest.len()
					),
				})
			}
			["g", rest @ ..] => {
				return Err(PolicyLoadError::Facts {
					line,
					message: format!(
						"grouping fact needs subject, role, domain; got {} fields",
						rest.len()
					),
				})
			}
			[other, ..] => {
				return Err(PolicyLoadError::Facts {
					line,
					message: format!("unknown fact type `{other}`"),
				})
			}
			[] => continue,
		};
		facts.push(fact);
	}

	Ok(facts)
}

#[cfg(test)]
pub(crate) const TEST_FACTS: &str = "\
p, admin, acme, stack, create
p, admin, acme, stack, read
g, alice, admin, acme
";
