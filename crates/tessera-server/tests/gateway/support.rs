// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tessera_common_ulid::UlidGenerator;
use tessera_server::ResourceGateway;
use tessera_server_auth::{
	Account, AccountId, AuthContext, CredentialError, CredentialVerifier, SessionRecord, User,
	UserId,
};
use tessera_server_authz::{AuthzError, Authorizer, PolicyEngine};
use tessera_server_db::{AccountStore, DbError, Resource, ResourceStore, UserStore};

pub const MODEL: &str = "[request_definition]
r = sub, dom, obj, act

[policy_definition]
p = sub, dom, obj, act

[role_definition]
g = _, _, _

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = g(r.sub, p.sub, r.dom) && r.dom == p.dom && r.obj == p.obj && r.act == p.act
";

/// alice is admin in acme; admins may create and read stacks there.
pub const ACME_FACTS: &str = "
p, admin, acme, stack, create
p, admin, acme, stack, read
g, alice, admin, acme
";

pub fn engine(facts: &str) -> Arc<PolicyEngine> {
	Arc::new(PolicyEngine::from_strs(MODEL, facts).unwrap())
}

// =============================================================================
// Storage mocks
// =============================================================================

#[derive(Default)]
pub struct MockDirectory {
	users: Mutex<HashMap<UserId, User>>,
	accounts: Mutex<HashMap<AccountId, Account>>,
	pub fail_lookups: bool,
}

impl MockDirectory {
	/// Every lookup fails as if the database were unreachable.
	pub fn failing() -> Self {
		Self {
			fail_lookups: true,
			..Default::default()
		}
	}

	pub fn add_account(&self, ids: &UlidGenerator, name: &str) -> Account {
		let account = Account {
			id: AccountId::generate(ids),
			name: name.to_string(),
			created_at: Utc::now(),
		};
		self.accounts
			.lock()
			.unwrap()
			.insert(account.id, account.clone());
		account
	}

	pub fn add_user(&self, ids: &UlidGenerator, username: &str, account: &Account) -> User {
		let user = User {
			id: UserId::generate(ids),
			username: username.to_string(),
			credential_hash: format!("plain:{username}-password"),
			account_id: account.id,
			created_at: Utc::now(),
		};
		self.users.lock().unwrap().insert(user.id, user.clone());
		user
	}

	pub fn insert_user(&self, user: User) {
		self.users.lock().unwrap().insert(user.id, user);
	}

	fn fault(&self) -> Result<(), DbError> {
		if self.fail_lookups {
			return Err(DbError::Internal("connection reset".to_string()));
		}
		Ok(())
	}
}

#[async_trait]
impl UserStore for MockDirectory {
	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		self.fault()?;
		Ok(self.users.lock().unwrap().get(id).cloned())
	}

	async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
		self.fault()?;
		Ok(self
			.users
			.lock()
			.unwrap()
			.values()
			.find(|u| u.username == username)
			.cloned())
	}
}

#[async_trait]
impl AccountStore for MockDirectory {
	async fn get_account_by_id(&self, id: &AccountId) -> Result<Option<Account>, DbError> {
		self.fault()?;
		Ok(self.accounts.lock().unwrap().get(id).cloned())
	}

	async fn get_account_by_name(&self, name: &str) -> Result<Option<Account>, DbError> {
		self.fault()?;
		Ok(self
			.accounts
			.lock()
			.unwrap()
			.values()
			.find(|a| a.name == name)
			.cloned())
	}
}

#[derive(Default)]
pub struct MockResources {
	stored: Mutex<Vec<Resource>>,
	writes: AtomicUsize,
	reads: AtomicUsize,
	pub fail_writes: bool,
}

impl MockResources {
	/// Every write fails; reads still work.
	pub fn failing_writes() -> Self {
		Self {
			fail_writes: true,
			..Default::default()
		}
	}

	pub fn writes(&self) -> usize {
		self.writes.load(Ordering::SeqCst)
	}

	pub fn reads(&self) -> usize {
		self.reads.load(Ordering::SeqCst)
	}

	pub fn seed(&self, resource: Resource) {
		self.stored.lock().unwrap().push(resource);
	}

	pub fn stored(&self) -> Vec<Resource> {
		self.stored.lock().unwrap().clone()
	}
}

#[async_trait]
impl ResourceStore for MockResources {
	async fn create_resource(&self, resource: &Resource) -> Result<(), DbError> {
		self.writes.fetch_add(1, Ordering::SeqCst);
		if self.fail_writes {
			return Err(DbError::Internal("disk I/O error".to_string()));
		}
		self.stored.lock().unwrap().push(resource.clone());
		Ok(())
	}

	async fn list_resources(
		&self,
		account_id: &AccountId,
		kind: &str,
	) -> Result<Vec<Resource>, DbError> {
		self.reads.fetch_add(1, Ordering::SeqCst);
		let mut found: Vec<Resource> = self
			.stored
			.lock()
			.unwrap()
			.iter()
			.filter(|r| &r.account_id == account_id && r.kind == kind)
			.cloned()
			.collect();
		found.sort_by_key(|r| r.id);
		Ok(found)
	}
}

// =============================================================================
// Authorizer and credential fakes
// =============================================================================

/// An engine whose backing store is gone.
pub struct BrokenAuthorizer;

impl Authorizer for BrokenAuthorizer {
	fn is_authorized(
		&self,
		_subject: &str,
		_domain: &str,
		_resource: &str,
		_action: &str,
	) -> Result<bool, AuthzError> {
		Err(AuthzError::Unavailable("policy index not loaded".to_string()))
	}
}

/// Stores passwords as `plain:<password>`. Tests only.
pub struct PlainCredentials;

impl CredentialVerifier for PlainCredentials {
	fn hash(&self, password: &str) -> Result<String, CredentialError> {
		Ok(format!("plain:{password}"))
	}

	fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
		match hash.strip_prefix("plain:") {
			Some(stored) => Ok(stored == password),
			None => Err(CredentialError::MalformedHash(hash.to_string())),
		}
	}
}

// =============================================================================
// Fixture
// =============================================================================

pub struct Fixture {
	pub ids: Arc<UlidGenerator>,
	pub directory: Arc<MockDirectory>,
	pub resources: Arc<MockResources>,
}

impl Fixture {
	pub fn new() -> Self {
		Self::with(MockDirectory::default(), MockResources::default())
	}

	pub fn with(directory: MockDirectory, resources: MockResources) -> Self {
		Self {
			ids: Arc::new(UlidGenerator::new()),
			directory: Arc::new(directory),
			resources: Arc::new(resources),
		}
	}

	pub fn gateway(&self, authorizer: Arc<dyn Authorizer>) -> ResourceGateway {
		ResourceGateway::new(
			self.directory.clone(),
			self.directory.clone(),
			self.resources.clone(),
			authorizer,
			self.ids.clone(),
		)
	}
}

pub fn session_for(user: &User, account: &Account) -> AuthContext {
	AuthContext::from_session(&SessionRecord::for_identity(user.id, account.id))
}
