// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use tessera_common_ulid::UlidGenerator;
use tessera_server::{AccountService, GatewayError, ResourceGateway};
use tessera_server_auth::{resolve_identity, AuthContext, SESSION_KEY_USER_ID};
use tessera_server_db::testing::create_test_pool;
use tessera_server_db::{AccountRepository, ResourceRepository, SignupRepository, UserRepository};

use super::support::*;

async fn sqlite_service() -> (AccountService, sqlx::SqlitePool) {
	let pool = create_test_pool().await;
	let service = AccountService::new(
		Arc::new(SignupRepository::new(pool.clone())),
		Arc::new(UserRepository::new(pool.clone())),
		Arc::new(PlainCredentials),
		Arc::new(UlidGenerator::new()),
	);
	(service, pool)
}

mod signup {
	use super::*;

	#[tokio::test]
	async fn creates_account_and_user() {
		let (service, pool) = sqlite_service().await;

		let (account, user) = service.signup("alice", "s3cret", "acme").await.unwrap();

		assert_eq!(account.name, "acme");
		assert_eq!(user.username, "alice");
		assert_eq!(user.account_id, account.id);
		assert_eq!(user.credential_hash, "plain:s3cret");
		let stored = AccountRepository::new(pool)
			.get_account_by_name("acme")
			.await
			.unwrap()
			.unwrap();
		assert_eq!(stored.id, account.id);
	}

	#[tokio::test]
	async fn duplicate_username_is_conflict_without_orphan() {
		let (service, pool) = sqlite_service().await;
		service.signup("alice", "pw", "acme").await.unwrap();

		let err = service.signup("alice", "pw", "globex").await.unwrap_err();

		assert!(matches!(err, GatewayError::Conflict(_)));
		assert_eq!(err.status_code().as_u16(), 409);
		assert!(AccountRepository::new(pool)
			.get_account_by_name("globex")
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn duplicate_account_name_is_conflict() {
		let (service, _pool) = sqlite_service().await;
		service.signup("alice", "pw", "acme").await.unwrap();

		let err = service.signup("bob", "pw", "acme").await.unwrap_err();
		assert!(matches!(err, GatewayError::Conflict(ref m) if m == "account name already taken"));
	}

	#[tokio::test]
	async fn empty_fields_are_invalid_input() {
		let (service, _pool) = sqlite_service().await;

		for (username, password, account) in [("", "pw", "acme"), ("alice", "", "acme"), ("alice", "pw", " ")] {
			let err = service.signup(username, password, account).await.unwrap_err();
			assert!(matches!(err, GatewayError::InvalidInput(_)));
		}
	}

	#[tokio::test]
	async fn wildcard_names_are_rejected() {
		let (service, pool) = sqlite_service().await;

		for (username, account) in [("*", "newco"), (" * ", "newco"), ("alice", "*")] {
			let err = service.signup(username, "pw", account).await.unwrap_err();
			assert!(matches!(err, GatewayError::InvalidInput(_)), "{username:?} {account:?}");
		}
		assert!(AccountRepository::new(pool)
			.get_account_by_name("newco")
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn disabled_signups_are_forbidden() {
		let (service, _pool) = sqlite_service().await;
		let service = service.with_signups_disabled(true);

		let err = service.signup("alice", "pw", "acme").await.unwrap_err();
		assert!(matches!(err, GatewayError::Forbidden(_)));
	}
}

mod login {
	use super::*;

	#[tokio::test]
	async fn valid_credentials_yield_resolvable_session() {
		let (service, _pool) = sqlite_service().await;
		let (account, user) = service.signup("alice", "s3cret", "acme").await.unwrap();

		let session = service.login("alice", "s3cret").await.unwrap();
		let identity = resolve_identity(&session).unwrap();

		assert_eq!(identity.user_id(), user.id);
		assert_eq!(identity.account_id(), account.id);
		assert!(session.get(SESSION_KEY_USER_ID).unwrap().is_string());
	}

	#[tokio::test]
	async fn wrong_password_and_unknown_user_look_the_same() {
		let (service, _pool) = sqlite_service().await;
		service.signup("alice", "s3cret", "acme").await.unwrap();

		let wrong = service.login("alice", "guess").await.unwrap_err();
		let unknown = service.login("mallory", "s3cret").await.unwrap_err();

		assert!(matches!(wrong, GatewayError::Unauthenticated));
		assert!(matches!(unknown, GatewayError::Unauthenticated));
		assert_eq!(wrong.public_message(), unknown.public_message());
	}

	#[tokio::test]
	async fn lookup_fault_is_internal() {
		let directory = Arc::new(MockDirectory::failing());
		let service = AccountService::new(
			Arc::new(SignupRepository::new(create_test_pool().await)),
			directory,
			Arc::new(PlainCredentials),
			Arc::new(UlidGenerator::new()),
		);

		let err = service.login("alice", "pw").await.unwrap_err();
		assert!(matches!(err, GatewayError::Internal(_)));
	}

	#[tokio::test]
	async fn unusable_stored_hash_is_internal() {
		let ids = UlidGenerator::new();
		let directory = MockDirectory::default();
		let acme = directory.add_account(&ids, "acme");
		let mut alice = directory.add_user(&ids, "alice", &acme);
		alice.credential_hash = "$argon2id$garbage".to_string();
		directory.insert_user(alice);
		let directory = Arc::new(directory);

		let service = AccountService::new(
			Arc::new(SignupRepository::new(create_test_pool().await)),
			directory,
			Arc::new(PlainCredentials),
			Arc::new(UlidGenerator::new()),
		);

		let err = service.login("alice", "pw").await.unwrap_err();
		assert!(matches!(err, GatewayError::Internal(_)));
	}
}

mod end_to_end {
	use super::*;

	#[tokio::test]
	async fn signup_login_create_list_on_sqlite() {
		let (service, pool) = sqlite_service().await;
		let ids = Arc::new(UlidGenerator::new());
		let gateway = ResourceGateway::new(
			Arc::new(UserRepository::new(pool.clone())),
			Arc::new(AccountRepository::new(pool.clone())),
			Arc::new(ResourceRepository::new(pool.clone())),
			engine(ACME_FACTS),
			ids,
		);

		let (acme, _) = service.signup("alice", "s3cret", "acme").await.unwrap();
		service.signup("bob", "hunter2", "globex").await.unwrap();

		let alice = AuthContext::from_session(&service.login("alice", "s3cret").await.unwrap());
		let bob = AuthContext::from_session(&service.login("bob", "hunter2").await.unwrap());

		let prod = gateway.create_resource(&alice, "stack", "prod").await.unwrap();
		let staging = gateway.create_resource(&alice, "stack", "staging").await.unwrap();
		assert_eq!(prod.account_id, acme.id);

		assert_eq!(
			gateway.list_resources(&alice, "stack").await.unwrap(),
			vec![prod, staging]
		);
		assert!(matches!(
			gateway.list_resources(&bob, "stack").await,
			Err(GatewayError::Forbidden(_))
		));
		assert_eq!(gateway.current_account(&alice).await.unwrap(), acme);
	}
}
