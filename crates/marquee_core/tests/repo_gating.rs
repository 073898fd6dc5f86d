mod common;

use common::{auth_payload, movie, profile, push, set, user, FakeGateway};
use marquee_core::api::{ApiError, ImageUpload};
use marquee_core::model::auth::{LoginRequest, RegisterRequest};
use marquee_core::model::movie::NewMovie;
use marquee_core::model::user::DEFAULT_USER_ROLE;
use marquee_core::repo::admin_repo::AdminRepository;
use marquee_core::repo::auth_repo::AuthRepository;
use marquee_core::repo::movie_repo::MovieRepository;
use marquee_core::repo::profile_repo::ProfileRepository;
use marquee_core::session::SessionStore;
use std::sync::Arc;

fn upload() -> ImageUpload {
    ImageUpload {
        field_name: "avatar".to_string(),
        file_name: "profile.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
        bytes: vec![0xFF, 0xD8, 0xFF],
    }
}

fn new_movie() -> NewMovie {
    NewMovie {
        title: "Alien".to_string(),
        director: "Ridley Scott".to_string(),
        year: 1979,
        duration_minutes: 117,
        genre: "Sci-Fi".to_string(),
        image_url: None,
        thumbnail_url: None,
    }
}

#[tokio::test]
async fn authenticated_operations_fail_without_token_and_never_call_gateway() {
    let gateway = FakeGateway::new();
    let store = common::memory_store();
    let movies = MovieRepository::new(gateway.clone(), store.clone());
    let profiles = ProfileRepository::new(gateway.clone(), store.clone());
    let admin = AdminRepository::new(gateway.clone(), store.clone());
    let auth = AuthRepository::new(gateway.clone(), store.clone());

    assert_eq!(movies.movies().await.unwrap_err(), ApiError::Unauthenticated);
    assert_eq!(
        movies.movie_by_id("m1").await.unwrap_err(),
        ApiError::Unauthenticated
    );
    assert_eq!(
        profiles.my_profile().await.unwrap_err(),
        ApiError::Unauthenticated
    );
    assert_eq!(
        profiles.update_my_profile(&profile("Ana")).await.unwrap_err(),
        ApiError::Unauthenticated
    );
    assert_eq!(
        profiles.upload_avatar(upload()).await.unwrap_err(),
        ApiError::Unauthenticated
    );
    assert_eq!(admin.list_users().await.unwrap_err(), ApiError::Unauthenticated);
    assert_eq!(
        admin.create_movie(&new_movie()).await.unwrap_err(),
        ApiError::Unauthenticated
    );
    assert_eq!(
        auth.current_user().await.unwrap_err(),
        ApiError::Unauthenticated
    );

    assert_eq!(gateway.total_calls(), 0);
    assert_eq!(
        ApiError::Unauthenticated.user_message(),
        "User not authenticated"
    );
}

#[tokio::test]
async fn empty_token_is_treated_as_absent() {
    let gateway = FakeGateway::new();
    let store = common::signed_in_store("", "USUARIO");
    let movies = MovieRepository::new(gateway.clone(), store);

    assert_eq!(movies.movies().await.unwrap_err(), ApiError::Unauthenticated);
    assert_eq!(gateway.total_calls(), 0);
}

#[tokio::test]
async fn each_authenticated_call_carries_bearer_header_once() {
    let gateway = FakeGateway::new();
    set(&gateway.movies, Ok(vec![movie("m1", "Alpha", "X")]));
    set(&gateway.movie_by_id, Ok(movie("m1", "Alpha", "X")));
    set(&gateway.users, Ok(vec![user("u1", "ADMIN")]));
    set(&gateway.create_movie, Ok(movie("m2", "Alien", "Ridley Scott")));
    set(&gateway.my_profile, Ok(profile("Ana")));

    let store = common::signed_in_store("T", "ADMIN");
    let movies = MovieRepository::new(gateway.clone(), store.clone());
    let admin = AdminRepository::new(gateway.clone(), store.clone());
    let profiles = ProfileRepository::new(gateway.clone(), store.clone());

    movies.movies().await.unwrap();
    movies.movie_by_id("m1").await.unwrap();
    admin.list_users().await.unwrap();
    admin.create_movie(&new_movie()).await.unwrap();
    profiles.my_profile().await.unwrap();

    let calls = gateway.calls();
    assert_eq!(calls.len(), 5);
    assert!(calls
        .iter()
        .all(|call| call.auth.as_deref() == Some("Bearer T")));
    assert_eq!(gateway.sent(|sent| sent.movie_ids.clone()), vec!["m1"]);
}

#[tokio::test]
async fn token_is_read_per_call_not_cached() {
    let gateway = FakeGateway::new();
    let store = common::signed_in_store("T1", "USUARIO");
    let movies = MovieRepository::new(gateway.clone(), store.clone());

    movies.movies().await.unwrap();
    store.save_session("T2", "USUARIO").unwrap();
    movies.movies().await.unwrap();
    store.clear_session().unwrap();
    assert_eq!(movies.movies().await.unwrap_err(), ApiError::Unauthenticated);

    let headers: Vec<_> = gateway.calls().into_iter().map(|call| call.auth).collect();
    assert_eq!(
        headers,
        vec![Some("Bearer T1".to_string()), Some("Bearer T2".to_string())]
    );
}

#[tokio::test]
async fn login_returns_session_without_touching_the_store() {
    let gateway = FakeGateway::new();
    set(&gateway.login, Ok(auth_payload("T", "ADMIN")));
    let store = common::memory_store();
    let auth = AuthRepository::new(gateway.clone(), store.clone());

    let session = auth
        .login(&LoginRequest {
            email: "a@b.co".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(session.access_token, "T");
    assert_eq!(session.user.role, "ADMIN");
    assert!(store.snapshot().token.is_none());
    assert_eq!(gateway.calls()[0].auth, None);
}

#[tokio::test]
async fn register_sends_default_role() {
    let gateway = FakeGateway::new();
    set(&gateway.register, Ok(auth_payload("T", DEFAULT_USER_ROLE)));
    let auth = AuthRepository::new(gateway.clone(), common::memory_store());

    auth.register(&RegisterRequest::new("Ana", "ana@example.com", "secret1"))
        .await
        .unwrap();

    let sent = gateway.sent(|sent| sent.register.clone());
    assert_eq!(sent[0].role, DEFAULT_USER_ROLE);
}

#[tokio::test]
async fn auth_payload_without_user_is_a_decode_error() {
    let gateway = FakeGateway::new();
    let mut payload = auth_payload("T", "USUARIO");
    payload.user = None;
    push(&gateway.login, Ok(payload), None);
    let auth = AuthRepository::new(gateway.clone(), common::memory_store());

    let err = auth
        .login(&LoginRequest {
            email: "a@b.co".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn server_rejection_is_passed_through() {
    let gateway = FakeGateway::new();
    set(
        &gateway.users,
        Err(ApiError::Rejected {
            status: 403,
            message: Some("Forbidden resource".to_string()),
        }),
    );
    let admin = AdminRepository::new(gateway.clone(), common::signed_in_store("T", "USUARIO"));

    let err = admin.list_users().await.unwrap_err();
    assert_eq!(err.user_message(), "Forbidden resource");
    assert_eq!(gateway.calls_to("users"), 1);
}

#[tokio::test]
async fn repositories_share_one_store() {
    let gateway = FakeGateway::new();
    let store = common::memory_store();
    let dyn_store: Arc<dyn SessionStore> = store.clone();
    let movies = MovieRepository::new(gateway.clone(), dyn_store.clone());
    let admin = AdminRepository::new(gateway.clone(), dyn_store);

    store.save_session("T", "ADMIN").unwrap();
    movies.movies().await.unwrap();
    admin.list_users().await.unwrap();
    assert_eq!(gateway.total_calls(), 2);
}
