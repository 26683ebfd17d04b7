//! End-to-end signup/signin flows through the auth service
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::TimeDelta;
use credential_backend::{
    auth::{AuthError, AuthService, DefaultAuth, TokenError},
    config::Settings,
    storage::{EmailCase, FlatFileUserStore, MemoryUserStore, UserStore},
};
use credential_common::AuthRequest;
use futures_util::future::join_all;
use tempfile::TempDir;

use crate::test_utils::{test_issuer, ManualClock, TestEnv};

#[tokio::test]
async fn test_documented_example_flow() {
    let env = TestEnv::new(&Settings::default());
    let auth = &env.state.auth;

    let first = auth
        .signup(AuthRequest::new("a@x.com", "secret1"))
        .await
        .unwrap();
    let first_claims = env.state.tokens.verify(&first.access_token).unwrap();
    assert_eq!(first_claims.email, "a@x.com");

    let again = auth.signup(AuthRequest::new("a@x.com", "another")).await;
    assert!(matches!(again, Err(AuthError::CredentialsExist)));

    let wrong = auth.signin(AuthRequest::new("a@x.com", "wrong")).await;
    assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));

    let ok = auth
        .signin(AuthRequest::new("a@x.com", "secret1"))
        .await
        .unwrap();
    let ok_claims = env.state.tokens.verify(&ok.access_token).unwrap();
    assert_eq!(ok_claims.sub, first_claims.sub);
    assert_eq!(ok_claims.principal().unwrap().email, "a@x.com");

    assert_eq!(env.store.len(), 1);
}

#[tokio::test]
async fn test_signin_never_mutates_store() {
    let env = TestEnv::new(&Settings::default());
    env.state
        .auth
        .signup(AuthRequest::new("a@x.com", "secret1"))
        .await
        .unwrap();
    let before = env.store.find_by_email("a@x.com").await.unwrap().unwrap();

    for password in ["wrong", "secret1", "Secret1"] {
        let _ = env
            .state
            .auth
            .signin(AuthRequest::new("a@x.com", password))
            .await;
    }
    let _ = env
        .state
        .auth
        .signin(AuthRequest::new("nobody@x.com", "secret1"))
        .await;

    let after = env.store.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(env.store.len(), 1);
    assert_eq!(before.id, after.id);
    assert_eq!(before.password_hash, after.password_hash);
}

#[tokio::test]
async fn test_unknown_email_outcome_follows_policy() {
    let env = TestEnv::new(&Settings::default());
    assert!(matches!(
        env.state
            .auth
            .signin(AuthRequest::new("nobody@x.com", "secret1"))
            .await,
        Err(AuthError::UnknownEmail)
    ));

    let mut settings = Settings::default();
    settings.auth.unify_signin_errors = true;
    let env = TestEnv::new(&settings);
    assert!(matches!(
        env.state
            .auth
            .signin(AuthRequest::new("nobody@x.com", "secret1"))
            .await,
        Err(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_unknown_email_costs_a_password_verify() {
    let mut settings = Settings::default();
    settings.auth.unify_signin_errors = true;
    let env = TestEnv::new(&settings);
    let auth = &env.state.auth;
    auth.signup(AuthRequest::new("a@x.com", "secret1"))
        .await
        .unwrap();
    // First unknown-email signin builds the placeholder hash
    let _ = auth.signin(AuthRequest::new("nobody@x.com", "secret1")).await;

    let mut unknown = Duration::ZERO;
    let mut wrong = Duration::ZERO;
    for _ in 0..3 {
        let started = Instant::now();
        let outcome = auth.signin(AuthRequest::new("nobody@x.com", "secret1")).await;
        unknown += started.elapsed();
        assert!(matches!(outcome, Err(AuthError::InvalidCredentials)));

        let started = Instant::now();
        let outcome = auth.signin(AuthRequest::new("a@x.com", "wrong")).await;
        wrong += started.elapsed();
        assert!(matches!(outcome, Err(AuthError::InvalidCredentials)));
    }

    assert!(
        unknown * 10 >= wrong,
        "unknown email took {unknown:?}, wrong password took {wrong:?}"
    );
}

#[tokio::test]
async fn test_issued_token_expires_after_fifteen_minutes() {
    let env = TestEnv::new(&Settings::default());
    let token = env
        .state
        .auth
        .signup(AuthRequest::new("a@x.com", "secret1"))
        .await
        .unwrap();

    env.clock.advance(TimeDelta::minutes(15) - TimeDelta::seconds(1));
    assert!(env.state.tokens.verify(&token.access_token).is_ok());

    env.clock.advance(TimeDelta::seconds(1));
    assert!(matches!(
        env.state.tokens.verify(&token.access_token),
        Err(TokenError::Expired)
    ));
}

#[tokio::test]
async fn test_case_insensitive_store_policy() {
    let mut settings = Settings::default();
    settings.storage.email_case = EmailCase::Insensitive;
    let env = TestEnv::new(&settings);

    env.state
        .auth
        .signup(AuthRequest::new("Alice@X.com", "secret1"))
        .await
        .unwrap();

    assert!(matches!(
        env.state
            .auth
            .signup(AuthRequest::new("alice@x.com", "secret1"))
            .await,
        Err(AuthError::CredentialsExist)
    ));
    let token = env
        .state
        .auth
        .signin(AuthRequest::new("ALICE@x.com", "secret1"))
        .await
        .unwrap();
    let claims = env.state.tokens.verify(&token.access_token).unwrap();
    assert_eq!(claims.email, "Alice@X.com");
}

async fn concurrent_signups<S: UserStore + 'static>(store: Arc<S>) -> usize {
    let auth = Arc::new(DefaultAuth::new(store, test_issuer(ManualClock::new())));

    let attempts = (0..8).map(|i| {
        let auth = auth.clone();
        tokio::spawn(async move {
            auth.signup(AuthRequest::new("same@x.com", format!("password-{i}")))
                .await
        })
    });

    let outcomes: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    for outcome in &outcomes {
        assert!(matches!(outcome, Ok(_) | Err(AuthError::CredentialsExist)));
    }
    outcomes.iter().filter(|o| o.is_ok()).count()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_signups_create_one_record_in_memory() {
    let store = Arc::new(MemoryUserStore::default());
    assert_eq!(concurrent_signups(store.clone()).await, 1);
    assert_eq!(store.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_signups_create_one_record_on_disk() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FlatFileUserStore::new(dir.path(), EmailCase::Sensitive).unwrap());
    assert_eq!(concurrent_signups(store.clone()).await, 1);

    let record = store.find_by_email("same@x.com").await.unwrap();
    assert!(record.is_some());
}

#[tokio::test]
async fn test_flat_file_accounts_survive_restart() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new();

    let id = {
        let store = Arc::new(FlatFileUserStore::new(dir.path(), EmailCase::Sensitive).unwrap());
        let auth = DefaultAuth::new(store, test_issuer(clock.clone()));
        let token = auth
            .signup(AuthRequest::new("a@x.com", "secret1"))
            .await
            .unwrap();
        test_issuer(clock.clone())
            .verify(&token.access_token)
            .unwrap()
            .sub
    };

    let store = Arc::new(FlatFileUserStore::new(dir.path(), EmailCase::Sensitive).unwrap());
    let issuer = test_issuer(clock);
    let auth = DefaultAuth::new(store, issuer.clone());
    let token = auth
        .signin(AuthRequest::new("a@x.com", "secret1"))
        .await
        .unwrap();
    assert_eq!(issuer.verify(&token.access_token).unwrap().sub, id);
}
