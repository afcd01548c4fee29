// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The policy model description.
//!
//! The model declares the shape of a request and how it is matched. Only the
//! RBAC-with-domains shape is supported, so parsing is mostly validation:
//!
//! ```text
//! [request_definition]
//! r = sub, dom, obj, act
//!
//! [policy_definition]
//! p = sub, dom, obj, act
//!
//! [role_definition]
//! g = _, _, _
//!
//! [policy_effect]
//! e = some(where (p.eft == allow))
//!
//! [matchers]
//! m = g(r.sub, p.sub, r.dom) && r.dom == p.dom && r.obj == p.obj && r.act == p.act
//! ```
//!
//! Anything else (unknown sections, extra role definitions, other effects,
//! wrong arity) is rejected so a misconfigured deployment fails at startup
//! instead of silently evaluating something different.

use std::collections::HashMap;
use std::path::Path;

use crate::error::PolicyLoadError;

const REQUEST_SECTION: &str = "request_definition";
const POLICY_SECTION: &str = "policy_definition";
const ROLE_SECTION: &str = "role_definition";
const EFFECT_SECTION: &str = "policy_effect";
const MATCHER_SECTION: &str = "matchers";

/// Section name and the single key it may define.
const SECTIONS: [(&str, &str); 5] = [
	(REQUEST_SECTION, "r"),
	(POLICY_SECTION, "p"),
	(ROLE_SECTION, "g"),
	(EFFECT_SECTION, "e"),
	(MATCHER_SECTION, "m"),
];

/// Allow-override with default deny.
const ALLOW_OVERRIDE_EFFECT: &str = "some(where(p.eft==allow))";

/// A validated RBAC-with-domains model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyModel {
	request: Vec<String>,
	policy: Vec<String>,
	matcher: String,
}

impl PolicyModel {
	/// Read and validate a model file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, PolicyLoadError> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|source| PolicyLoadError::Io {
			kind: "model",
			path: path.to_path_buf(),
			source,
		})?;
		Self::parse(&text)
	}

	/// Validate a model description.
	pub fn parse(text: &str) -> Result<Self, PolicyLoadError> {
		let entries = read_sections(text)?;

		let (line, request) = entry(&entries, REQUEST_SECTION)?;
		let request = field_list(line, request, "request definition")?;

		let (line, policy) = entry(&entries, POLICY_SECTION)?;
		let policy = field_list(line, policy, "policy definition")?;

		let (line, roles) = entry(&entries, ROLE_SECTION)?;
		let placeholders: Vec<&str> = roles.split(',').map(str::trim).collect();
		if placeholders.len() != 3 || placeholders.iter().any(|p| *p != "_") {
			return Err(PolicyLoadError::Model {
				line,
				message: format!("role definition must be `_, _, _`, got `{roles}`"),
			});
		}

		let (line, effect) = entry(&entries, EFFECT_SECTION)?;
		let normalized: String = effect.chars().filter(|c| !c.is_whitespace()).collect();
		if normalized != ALLOW_OVERRIDE_EFFECT {
			return Err(PolicyLoadError::Model {
				line,
				message: format!("unsupported policy effect `{effect}`"),
			});
		}

		let (line, matcher) = entry(&entries, MATCHER_SECTION)?;
		if !matcher.contains("g(") {
			return Err(PolicyLoadError::Model {
				line,
				message: "matcher must resolve roles with g(...)".to_string(),
			});
		}
		for field in &request {
			if !matcher.contains(&format!("r.{field}")) {
				return Err(PolicyLoadError::Model {
					line,
					message: format!("matcher does not reference request field `r.{field}`"),
				});
			}
		}

		Ok(Self {
			request,
			policy,
			matcher: matcher.to_string(),
		})
	}

	/// Request field names, in order (subject, domain, resource, action).
	pub fn request_fields(&self) -> &[String] {
		&self.request
	}

	/// Permission fact field names, in order (role, domain, resource, action).
	pub fn policy_fields(&self) -> &[String] {
		&self.policy
	}

	pub fn matcher(&self) -> &str {
		&self.matcher
	}
}

fn read_sections(text: &str) -> Result<HashMap<&'static str, (usize, &str)>, PolicyLoadError> {
	let mut entries: HashMap<&'static str, (usize, &str)> = HashMap::new();
	let mut current: Option<(&'static str, &'static str)> = None;

	for (idx, raw) in text.lines().enumerate() {
		let line = idx + 1;
		let content = raw.split('#').next().unwrap_or_default().trim();
		if content.is_empty() {
			continue;
		}

		if let Some(name) = content
			.strip_prefix('[')
			.and_then(|rest| rest.strip_suffix(']'))
		{
			let name = name.trim();
			let section = SECTIONS
				.iter()
				.copied()
				.find(|(section, _)| *section == name)
				.ok_or_else(|| PolicyLoadError::Model {
					line,
					message: format!("unknown section [{name}]"),
				})?;
			if entries.contains_key(section.0) {
				return Err(PolicyLoadError::Model {
					line,
					message: format!("duplicate section [{name}]"),
				});
			}
			current = Some(section);
			continue;
		}

		let (section, expected_key) = current.ok_or_else(|| PolicyLoadError::Model {
			line,
			message: "definition outside of any section".to_string(),
		})?;

		let (key, value) = content
			.split_once('=')
			.ok_or_else(|| PolicyLoadError::Model {
				line,
				message: format!("expected `key = value`, got `{content}`"),
			})?;
		let key = key.trim();
		let value = value.trim();

		if key != expected_key {
			return Err(PolicyLoadError::Model {
				line,
				message: format!("unsupported key `{key}` in [{section}]"),
			});
		}
		if entries.insert(section, (line, value)).is_some() {
			return Err(PolicyLoadError::Model {
				line,
				message: format!("`{key}` defined twice in [{section}]"),
			});
		}
	}

	Ok(entries)
}

fn entry<'a>(
	entries: &HashMap<&'static str, (usize, &'a str)>,
	section: &'static str,
) -> Result<(usize, &'a str), PolicyLoadError> {
	entries
		.get(section)
		.copied()
		.ok_or(PolicyLoadError::MissingSection(section))
}

fn field_list(line: usize, value: &str, what: &str) -> Result<Vec<String>, PolicyLoadError> {
	let fields: Vec<String> = value.split(',').map(|f| f.trim().to_string()).collect();

	if fields.len() != 4 {
		return Err(PolicyLoadError::Model {
			line,
			message: format!(
				"{what} must declare subject, domain, resource and action, got {} fields",
				fields.len()
			),
		});
	}
	if let Some(bad) = fields
		.iter()
		.find(|f| f.is_empty() || !f.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
	{
		return Err(PolicyLoadError::Model {
			line,
			message: format!("invalid field name `{bad}` in {what}"),
		});
	}
	for (i, field) in fields.iter().enumerate() {
		if fields[..i].contains(field) {
			return Err(PolicyLoadError::Model {
				line,
				message: format!("duplicate field `{field}` in {what}"),
			});
		}
	}

	Ok(fields)
}

#[cfg(test)]
pub(crate) const TEST_MODEL: &str = r#"
[request_definition]
r = sub, dom, obj, act

[policy_definition]
p = sub, dom, obj, act

[role_definition]
g = _, _, _

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = g(r.sub, p.sub, r.dom) && r.dom == p.dom && r.obj == p.obj && r.act == p.act
"#;
