// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use chrono::Utc;
use tessera_server::{GatewayError, ACTION_CREATE};
use tessera_server_auth::{AuthContext, ResourceId, SessionRecord};
use tessera_server_db::Resource;

use super::support::*;

mod scenarios {
	use super::*;

	#[tokio::test]
	async fn admin_creates_stack_in_own_account() {
		let fx = Fixture::new();
		let acme = fx.directory.add_account(&fx.ids, "acme");
		let alice = fx.directory.add_user(&fx.ids, "alice", &acme);
		let gateway = fx.gateway(engine(ACME_FACTS));

		let resource = gateway
			.create_resource(&session_for(&alice, &acme), "stack", "prod")
			.await
			.unwrap();

		assert_eq!(resource.account_id, acme.id);
		assert_eq!(resource.kind, "stack");
		assert_eq!(resource.name, "prod");
		assert_eq!(resource.id.to_string().len(), 26);
		assert_eq!(resource.id.to_string().parse::<ResourceId>().unwrap(), resource.id);
		assert_eq!(fx.resources.writes(), 1);
		assert_eq!(fx.resources.stored(), vec![resource]);
	}

	#[tokio::test]
	async fn session_bound_to_foreign_account_is_forbidden() {
		let fx = Fixture::new();
		let acme = fx.directory.add_account(&fx.ids, "acme");
		let other = fx.directory.add_account(&fx.ids, "other-corp");
		let alice = fx.directory.add_user(&fx.ids, "alice", &acme);
		let gateway = fx.gateway(engine(ACME_FACTS));

		let err = gateway
			.create_resource(&session_for(&alice, &other), "stack", "prod")
			.await
			.unwrap_err();

		assert!(matches!(err, GatewayError::Forbidden(_)));
		assert_eq!(fx.resources.writes(), 0);
	}

	#[tokio::test]
	async fn grant_in_another_domain_does_not_apply() {
		let fx = Fixture::new();
		let other = fx.directory.add_account(&fx.ids, "other-corp");
		let alice = fx.directory.add_user(&fx.ids, "alice", &other);
		let gateway = fx.gateway(engine(ACME_FACTS));

		let err = gateway
			.create_resource(&session_for(&alice, &other), "stack", "prod")
			.await
			.unwrap_err();

		assert!(matches!(err, GatewayError::Forbidden(_)));
		assert_eq!(err.status_code().as_u16(), 403);
		assert_eq!(fx.resources.writes(), 0);
	}

	#[tokio::test]
	async fn user_named_wildcard_gets_no_implicit_roles() {
		let fx = Fixture::new();
		let newco = fx.directory.add_account(&fx.ids, "newco");
		let star = fx.directory.add_user(&fx.ids, "*", &newco);
		let gateway = fx.gateway(engine(
			"p, admin, newco, stack, create\np, operator, *, *, read\n",
		));
		let ctx = session_for(&star, &newco);

		assert!(matches!(
			gateway.create_resource(&ctx, "stack", "prod").await,
			Err(GatewayError::Forbidden(_))
		));
		assert!(matches!(
			gateway.list_resources(&ctx, "stack").await,
			Err(GatewayError::Forbidden(_))
		));
		assert_eq!(fx.resources.writes(), 0);
	}

	#[tokio::test]
	async fn create_without_read_cannot_list() {
		let fx = Fixture::new();
		let acme = fx.directory.add_account(&fx.ids, "acme");
		let alice = fx.directory.add_user(&fx.ids, "alice", &acme);
		let gateway = fx.gateway(engine(
			"p, admin, acme, stack, create\ng, alice, admin, acme\n",
		));
		let ctx = session_for(&alice, &acme);

		gateway.create_resource(&ctx, "stack", "prod").await.unwrap();
		let err = gateway.list_resources(&ctx, "stack").await.unwrap_err();

		assert!(matches!(err, GatewayError::Forbidden(_)));
		assert_eq!(fx.resources.reads(), 0);
	}
}

mod identity {
	use super::*;

	#[tokio::test]
	async fn unauthenticated_context_touches_nothing() {
		let fx = Fixture::new();
		let gateway = fx.gateway(engine(ACME_FACTS));
		let ctx = AuthContext::unauthenticated();

		assert!(matches!(
			gateway.create_resource(&ctx, "stack", "prod").await,
			Err(GatewayError::Unauthenticated)
		));
		assert!(matches!(
			gateway.list_resources(&ctx, "stack").await,
			Err(GatewayError::Unauthenticated)
		));
		assert!(matches!(
			gateway.current_account(&ctx).await,
			Err(GatewayError::Unauthenticated)
		));
		assert_eq!(fx.resources.writes(), 0);
		assert_eq!(fx.resources.reads(), 0);
	}

	#[tokio::test]
	async fn partial_session_is_unauthenticated() {
		let fx = Fixture::new();
		let acme = fx.directory.add_account(&fx.ids, "acme");
		let alice = fx.directory.add_user(&fx.ids, "alice", &acme);
		let gateway = fx.gateway(engine(ACME_FACTS));

		let mut session = SessionRecord::for_identity(alice.id, acme.id);
		session.remove("account_id");
		let err = gateway
			.create_resource(&AuthContext::from_session(&session), "stack", "prod")
			.await
			.unwrap_err();

		assert!(matches!(err, GatewayError::Unauthenticated));
		assert_eq!(err.status_code().as_u16(), 401);
	}

	#[tokio::test]
	async fn unknown_user_is_not_found() {
		let fx = Fixture::new();
		let acme = fx.directory.add_account(&fx.ids, "acme");
		let ghost = Fixture::new().directory.add_user(&fx.ids, "ghost", &acme);
		let gateway = fx.gateway(engine(ACME_FACTS));

		let err = gateway
			.create_resource(&session_for(&ghost, &acme), "stack", "prod")
			.await
			.unwrap_err();
		assert!(matches!(err, GatewayError::NotFound("user")));
	}

	#[tokio::test]
	async fn unknown_account_is_not_found() {
		let fx = Fixture::new();
		let acme = fx.directory.add_account(&fx.ids, "acme");
		let alice = fx.directory.add_user(&fx.ids, "alice", &acme);
		let gone = Fixture::new().directory.add_account(&fx.ids, "gone");
		let gateway = fx.gateway(engine(ACME_FACTS));

		let err = gateway
			.list_resources(&session_for(&alice, &gone), "stack")
			.await
			.unwrap_err();
		assert!(matches!(err, GatewayError::NotFound("account")));
	}

	#[tokio::test]
	async fn lookup_fault_is_internal() {
		let fx = Fixture::with(MockDirectory::failing(), Default::default());
		let acme = fx.directory.add_account(&fx.ids, "acme");
		let alice = fx.directory.add_user(&fx.ids, "alice", &acme);
		let gateway = fx.gateway(engine(ACME_FACTS));

		let err = gateway
			.create_resource(&session_for(&alice, &acme), "stack", "prod")
			.await
			.unwrap_err();
		assert!(matches!(err, GatewayError::Internal(_)));
		assert_eq!(err.public_message(), "internal server error");
	}

	#[tokio::test]
	async fn current_account_returns_session_account() {
		let fx = Fixture::new();
		let acme = fx.directory.add_account(&fx.ids, "acme");
		let alice = fx.directory.add_user(&fx.ids, "alice", &acme);
		let gateway = fx.gateway(engine(""));

		let account = gateway
			.current_account(&session_for(&alice, &acme))
			.await
			.unwrap();
		assert_eq!(account, acme);
	}
}

mod failures {
	use super::*;

	#[tokio::test]
	async fn policy_fault_performs_no_write() {
		let fx = Fixture::new();
		let acme = fx.directory.add_account(&fx.ids, "acme");
		let alice = fx.directory.add_user(&fx.ids, "alice", &acme);
		let gateway = fx.gateway(Arc::new(BrokenAuthorizer));

		let err = gateway
			.create_resource(&session_for(&alice, &acme), "stack", "prod")
			.await
			.unwrap_err();

		assert!(matches!(err, GatewayError::PolicyFault(_)));
		assert_eq!(err.status_code().as_u16(), 500);
		assert_eq!(err.public_message(), "internal server error");
		assert_eq!(fx.resources.writes(), 0);
	}

	#[tokio::test]
	async fn write_failure_is_internal_and_returns_nothing() {
		let fx = Fixture::with(Default::default(), MockResources::failing_writes());
		let acme = fx.directory.add_account(&fx.ids, "acme");
		let alice = fx.directory.add_user(&fx.ids, "alice", &acme);
		let gateway = fx.gateway(engine(ACME_FACTS));

		let err = gateway
			.create_resource(&session_for(&alice, &acme), "stack", "prod")
			.await
			.unwrap_err();

		assert!(matches!(err, GatewayError::Internal(_)));
		assert!(!err.public_message().contains("disk"));
		assert_eq!(fx.resources.writes(), 1);
		assert!(fx.resources.stored().is_empty());
	}

	#[tokio::test]
	async fn empty_kind_or_name_is_invalid_input() {
		let fx = Fixture::new();
		let acme = fx.directory.add_account(&fx.ids, "acme");
		let alice = fx.directory.add_user(&fx.ids, "alice", &acme);
		let gateway = fx.gateway(engine(ACME_FACTS));
		let ctx = session_for(&alice, &acme);

		for (kind, name) in [("", "prod"), ("stack", ""), ("stack", "   ")] {
			let err = gateway.create_resource(&ctx, kind, name).await.unwrap_err();
			assert!(matches!(err, GatewayError::InvalidInput(_)), "{kind:?} {name:?}");
			assert_eq!(err.status_code().as_u16(), 400);
		}
		assert!(matches!(
			gateway.list_resources(&ctx, "").await,
			Err(GatewayError::InvalidInput(_))
		));
		assert_eq!(fx.resources.writes(), 0);
	}

	#[tokio::test]
	async fn denied_action_is_named_in_message() {
		let fx = Fixture::new();
		let acme = fx.directory.add_account(&fx.ids, "acme");
		let bob = fx.directory.add_user(&fx.ids, "bob", &acme);
		let gateway = fx.gateway(engine(ACME_FACTS));

		let err = gateway
			.create_resource(&session_for(&bob, &acme), "stack", "prod")
			.await
			.unwrap_err();
		assert!(err.public_message().contains(ACTION_CREATE));
	}
}

mod listing {
	use super::*;

	#[tokio::test]
	async fn lists_own_account_in_creation_order() {
		let fx = Fixture::new();
		let acme = fx.directory.add_account(&fx.ids, "acme");
		let globex = fx.directory.add_account(&fx.ids, "globex");
		let alice = fx.directory.add_user(&fx.ids, "alice", &acme);
		let gateway = fx.gateway(engine(ACME_FACTS));
		let ctx = session_for(&alice, &acme);

		fx.resources.seed(Resource {
			id: ResourceId::generate(&fx.ids),
			account_id: globex.id,
			kind: "stack".to_string(),
			name: "not-yours".to_string(),
			created_at: Utc::now(),
		});

		let mut created = Vec::new();
		for name in ["prod", "staging", "dev"] {
			created.push(gateway.create_resource(&ctx, "stack", name).await.unwrap());
		}

		let listed = gateway.list_resources(&ctx, "stack").await.unwrap();
		assert_eq!(listed, created);
		assert_eq!(fx.resources.writes(), 3);
	}

	#[tokio::test]
	async fn wildcard_domain_grant_applies_everywhere() {
		let fx = Fixture::new();
		let globex = fx.directory.add_account(&fx.ids, "globex");
		let root = fx.directory.add_user(&fx.ids, "root", &globex);
		let gateway = fx.gateway(engine("p, operator, *, *, read\ng, root, operator, *\n"));

		let listed = gateway
			.list_resources(&session_for(&root, &globex), "stack")
			.await
			.unwrap();
		assert!(listed.is_empty());
		assert_eq!(fx.resources.reads(), 1);
	}
}
