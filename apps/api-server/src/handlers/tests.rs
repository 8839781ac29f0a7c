use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};

use blog_shared::dto::{LoginResponse, PostResponse, UserResponse};

use super::configure_routes;
use crate::state::AppState;

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn register_body(username: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "s3cret-pass",
        "password2": "s3cret-pass",
    })
}

macro_rules! call {
    ($app:expr, $req:expr $(,)?) => {
        test::call_service(&$app, $req.to_request()).await
    };
}

/// Register `$username` and log in, returning the token.
macro_rules! signup {
    ($app:expr, $username:expr) => {{
        let resp = call!(
            $app,
            test::TestRequest::post()
                .uri("/register/")
                .set_json(register_body($username))
        );
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = call!(
            $app,
            test::TestRequest::post()
                .uri("/login/")
                .set_json(json!({"username": $username, "password": "s3cret-pass"}))
        );
        assert_eq!(resp.status(), StatusCode::OK);
        let body: LoginResponse = test::read_body_json(resp).await;
        body.token
    }};
}

macro_rules! create_post {
    ($app:expr, $token:expr, $title:expr) => {{
        let resp = call!(
            $app,
            test::TestRequest::post()
                .uri("/blogs/")
                .insert_header(auth($token))
                .set_json(json!({"title": $title, "content": "Body"}))
        );
        assert_eq!(resp.status(), StatusCode::CREATED);
        let post: PostResponse = test::read_body_json(resp).await;
        post
    }};
}

fn auth(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Token {token}"))
}

#[actix_web::test]
async fn test_health_reports_storage() {
    let app = app!(AppState::in_memory());

    let resp = call!(app, test::TestRequest::get().uri("/health"));

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[actix_web::test]
async fn test_register_returns_public_fields() {
    let app = app!(AppState::in_memory());

    let resp = call!(
        app,
        test::TestRequest::post()
            .uri("/register/")
            .set_json(register_body("alice")),
    );

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[actix_web::test]
async fn test_register_password_mismatch() {
    let app = app!(AppState::in_memory());

    let resp = call!(
        app,
        test::TestRequest::post().uri("/register/").set_json(json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "one",
            "password2": "two",
        })),
    );

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["password"][0], "Password fields didn't match.");
}

#[actix_web::test]
async fn test_register_reports_missing_fields() {
    let app = app!(AppState::in_memory());

    let resp = call!(
        app,
        test::TestRequest::post()
            .uri("/register/")
            .set_json(json!({"username": "alice"})),
    );

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    for field in ["email", "password", "password2"] {
        assert!(body.get(field).is_some(), "missing error for {field}");
    }
}

#[actix_web::test]
async fn test_register_duplicate_email() {
    let state = AppState::in_memory();
    let app = app!(state);
    signup!(app, "alice");

    let resp = call!(
        app,
        test::TestRequest::post().uri("/register/").set_json(json!({
            "username": "alice2",
            "email": "alice@example.com",
            "password": "pw",
            "password2": "pw",
        })),
    );

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body.get("email").is_some());
}

#[actix_web::test]
async fn test_login_twice_returns_same_token() {
    let app = app!(AppState::in_memory());

    let first = signup!(app, "alice");
    let resp = call!(
        app,
        test::TestRequest::post()
            .uri("/login/")
            .set_json(json!({"username": "alice", "password": "s3cret-pass"})),
    );
    let second: LoginResponse = test::read_body_json(resp).await;

    assert_eq!(first.len(), 40);
    assert_eq!(first, second.token);
    assert_eq!(second.user.username, "alice");
}

#[actix_web::test]
async fn test_login_failures_are_indistinguishable() {
    let app = app!(AppState::in_memory());
    signup!(app, "alice");

    for (username, password) in [("alice", "wrong"), ("nobody", "s3cret-pass")] {
        let resp = call!(
        app,
            test::TestRequest::post()
                .uri("/login/")
                .set_json(json!({"username": username, "password": password})),
        );

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["non_field_errors"][0],
            "Unable to log in with provided credentials."
        );
    }
}

#[actix_web::test]
async fn test_login_requires_fields() {
    let app = app!(AppState::in_memory());

    let resp = call!(
        app,
        test::TestRequest::post().uri("/login/").set_json(json!({})),
    );

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"][0], "This field is required.");
    assert_eq!(body["password"][0], "This field is required.");
}

#[actix_web::test]
async fn test_current_user() {
    let app = app!(AppState::in_memory());
    let token = signup!(app, "alice");

    let anonymous = call!(app, test::TestRequest::get().uri("/user/"));
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    assert!(anonymous.headers().contains_key("www-authenticate"));

    let resp = call!(
        app,
        test::TestRequest::get().uri("/user/").insert_header(auth(&token)),
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let user: UserResponse = test::read_body_json(resp).await;
    assert_eq!(user.username, "alice");
}

#[actix_web::test]
async fn test_bearer_keyword_is_accepted() {
    let app = app!(AppState::in_memory());
    let token = signup!(app, "alice");

    let resp = call!(
        app,
        test::TestRequest::get()
            .uri("/user/")
            .insert_header(("Authorization", format!("Bearer {token}"))),
    );

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_anonymous_reads_are_allowed() {
    let app = app!(AppState::in_memory());
    let token = signup!(app, "alice");
    let post = create_post!(app, &token, "Hello");

    let list = call!(app, test::TestRequest::get().uri("/blogs/"));
    assert_eq!(list.status(), StatusCode::OK);
    let posts: Vec<PostResponse> = test::read_body_json(list).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].author.username, "alice");

    let detail = call!(
        app,
        test::TestRequest::get().uri(&format!("/blogs/{}/", post.id)),
    );
    assert_eq!(detail.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_anonymous_create_is_rejected() {
    let app = app!(AppState::in_memory());

    let resp = call!(
        app,
        test::TestRequest::post()
            .uri("/blogs/")
            .set_json(json!({"title": "t", "content": "c"})),
    );

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let list = call!(app, test::TestRequest::get().uri("/blogs/"));
    let posts: Vec<PostResponse> = test::read_body_json(list).await;
    assert!(posts.is_empty());
}

#[actix_web::test]
async fn test_invalid_token_is_rejected_on_reads() {
    let app = app!(AppState::in_memory());

    let resp = call!(
        app,
        test::TestRequest::get()
            .uri("/blogs/")
            .insert_header(auth("not-a-real-token")),
    );

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Invalid token.");
}

#[actix_web::test]
async fn test_author_is_taken_from_token() {
    let app = app!(AppState::in_memory());
    let token = signup!(app, "alice");
    signup!(app, "bob");

    let resp = call!(
        app,
        test::TestRequest::post()
            .uri("/blogs/")
            .insert_header(auth(&token))
            .set_json(json!({"title": "t", "content": "c", "author": {"username": "bob"}})),
    );

    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: PostResponse = test::read_body_json(resp).await;
    assert_eq!(post.author.username, "alice");
}

#[actix_web::test]
async fn test_non_owner_cannot_modify() {
    let app = app!(AppState::in_memory());
    let alice = signup!(app, "alice");
    let bob = signup!(app, "bob");
    let post = create_post!(app, &alice, "Hello");
    let uri = format!("/blogs/{}/", post.id);

    let put = call!(
        app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(auth(&bob))
            .set_json(json!({"title": "Hacked", "content": "x"})),
    );
    assert_eq!(put.status(), StatusCode::FORBIDDEN);

    let delete = call!(
        app,
        test::TestRequest::delete().uri(&uri).insert_header(auth(&bob)),
    );
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);

    let detail = call!(app, test::TestRequest::get().uri(&uri));
    let unchanged: PostResponse = test::read_body_json(detail).await;
    assert_eq!(unchanged.title, "Hello");
}

#[actix_web::test]
async fn test_owner_can_update_and_delete() {
    let app = app!(AppState::in_memory());
    let alice = signup!(app, "alice");
    let post = create_post!(app, &alice, "Hello");
    let uri = format!("/blogs/{}/", post.id);

    let patch = call!(
        app,
        test::TestRequest::patch()
            .uri(&uri)
            .insert_header(auth(&alice))
            .set_json(json!({"title": "Renamed"})),
    );
    assert_eq!(patch.status(), StatusCode::OK);
    let patched: PostResponse = test::read_body_json(patch).await;
    assert_eq!(patched.title, "Renamed");
    assert_eq!(patched.content, "Body");
    assert_eq!(patched.created_at, post.created_at);

    let put = call!(
        app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(auth(&alice))
            .set_json(json!({"title": "Only title"})),
    );
    assert_eq!(put.status(), StatusCode::BAD_REQUEST);

    let delete = call!(
        app,
        test::TestRequest::delete().uri(&uri).insert_header(auth(&alice)),
    );
    assert_eq!(delete.status(), StatusCode::NO_CONTENT);

    let gone = call!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_unknown_and_malformed_ids_are_not_found() {
    let app = app!(AppState::in_memory());

    let unknown = call!(
        app,
        test::TestRequest::get().uri(&format!("/blogs/{}/", uuid::Uuid::new_v4())),
    );
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let malformed = call!(app, test::TestRequest::get().uri("/blogs/not-a-uuid/"));
    assert_eq!(malformed.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let app = app!(AppState::in_memory());

    let resp = call!(
        app,
        test::TestRequest::post()
            .uri("/register/")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json"),
    );

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_login_trims_username_like_registration() {
    let app = app!(AppState::in_memory());

    let resp = call!(
        app,
        test::TestRequest::post().uri("/register/").set_json(json!({
            "username": " bob ",
            "email": "bob@example.com",
            "password": "pw",
            "password2": "pw",
        })),
    );
    assert_eq!(resp.status(), StatusCode::CREATED);
    let user: UserResponse = test::read_body_json(resp).await;
    assert_eq!(user.username, "bob");

    let resp = call!(
        app,
        test::TestRequest::post()
            .uri("/login/")
            .set_json(json!({"username": " bob ", "password": "pw"})),
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let body: LoginResponse = test::read_body_json(resp).await;
    assert_eq!(body.user.id, user.id);
}

#[actix_web::test]
async fn test_login_blank_username_is_required() {
    let app = app!(AppState::in_memory());

    let resp = call!(
        app,
        test::TestRequest::post()
            .uri("/login/")
            .set_json(json!({"username": "   ", "password": "pw"})),
    );

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"][0], "This field is required.");
    assert!(body.get("password").is_none());
}

#[actix_web::test]
async fn test_anonymous_create_with_bad_body_is_unauthenticated() {
    let app = app!(AppState::in_memory());

    let no_body = call!(app, test::TestRequest::post().uri("/blogs/"));
    assert_eq!(no_body.status(), StatusCode::UNAUTHORIZED);

    let mistyped = call!(
        app,
        test::TestRequest::post()
            .uri("/blogs/")
            .set_json(json!({"title": 5})),
    );
    assert_eq!(mistyped.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_authenticated_create_with_bad_body_is_bad_request() {
    let app = app!(AppState::in_memory());
    let token = signup!(app, "alice");

    let resp = call!(
        app,
        test::TestRequest::post()
            .uri("/blogs/")
            .insert_header(auth(&token))
            .set_json(json!({"title": 5})),
    );

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_anonymous_writes_to_existing_post_are_unauthenticated() {
    let app = app!(AppState::in_memory());
    let alice = signup!(app, "alice");
    let post = create_post!(app, &alice, "Hello");
    let uri = format!("/blogs/{}/", post.id);

    let put = call!(
        app,
        test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({"title": "t", "content": "c"})),
    );
    assert_eq!(put.status(), StatusCode::UNAUTHORIZED);

    let patch = call!(
        app,
        test::TestRequest::patch()
            .uri(&uri)
            .set_json(json!({"title": "t"})),
    );
    assert_eq!(patch.status(), StatusCode::UNAUTHORIZED);

    let delete = call!(app, test::TestRequest::delete().uri(&uri));
    assert_eq!(delete.status(), StatusCode::UNAUTHORIZED);
    assert!(delete.headers().contains_key("www-authenticate"));

    let detail = call!(app, test::TestRequest::get().uri(&uri));
    let unchanged: PostResponse = test::read_body_json(detail).await;
    assert_eq!(unchanged.title, "Hello");
}

#[actix_web::test]
async fn test_non_owner_cannot_patch() {
    let app = app!(AppState::in_memory());
    let alice = signup!(app, "alice");
    let bob = signup!(app, "bob");
    let post = create_post!(app, &alice, "Hello");

    let resp = call!(
        app,
        test::TestRequest::patch()
            .uri(&format!("/blogs/{}/", post.id))
            .insert_header(auth(&bob))
            .set_json(json!({"title": "Hacked"})),
    );

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
