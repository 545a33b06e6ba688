use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};
use uuid::Uuid;

use blog_core::domain::NewUser;
use blog_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

use super::{configure_routes, unknown_endpoint};
use crate::state::AppState;

fn test_state() -> AppState {
    let tokens = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "handler-test-secret".to_string(),
        ..JwtConfig::default()
    }));
    let passwords = Arc::new(Argon2PasswordService::with_params(1024, 1, 1).unwrap());
    AppState::in_memory(tokens, passwords)
}

macro_rules! test_app {
    ($state:expr) => {
        test_app!($state, None)
    };
    ($state:expr, $limiter:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes($limiter))
                .default_service(web::to(unknown_endpoint)),
        )
        .await
    };
}

/// Register a user straight through the service and return a bearer header.
async fn signed_in(state: &AppState, username: &str) -> (Uuid, String) {
    let user = state
        .accounts
        .register(NewUser {
            username: username.to_string(),
            name: format!("{username} name"),
            password: "sekret".to_string(),
        })
        .await
        .unwrap();
    let session = state.accounts.login(username, "sekret").await.unwrap();
    (user.id, format!("Bearer {}", session.token))
}

fn react_patterns() -> Value {
    json!({
        "title": "React patterns",
        "author": "Michael Chan",
        "url": "https://reactpatterns.com/",
        "likes": 7
    })
}

#[actix_rt::test]
async fn test_register_then_login() {
    let state = test_state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({ "username": "mluukkai", "name": "Matti", "password": "salainen" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "mluukkai");
    assert_eq!(body["posts"], json!([]));
    assert!(body.get("password_hash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "username": "mluukkai", "password": "salainen" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Matti");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[actix_rt::test]
async fn test_register_rejects_bad_input() {
    let state = test_state();
    signed_in(&state, "root").await;
    let app = test_app!(state);

    let cases = [
        (
            json!({ "username": "root", "name": "Again", "password": "sekret" }),
            "expected `username` to be unique",
        ),
        (
            json!({ "username": "ab", "name": "Short", "password": "sekret" }),
            "Username too short",
        ),
        (
            json!({ "username": "valid", "name": "Short", "password": "pw" }),
            "Password too short",
        ),
        (json!({ "name": "Nobody", "password": "sekret" }), "Username required"),
    ];

    for (payload, message) in cases {
        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": message }));
    }
}

#[actix_rt::test]
async fn test_login_with_wrong_password() {
    let state = test_state();
    signed_in(&state, "root").await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "username": "root", "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid username or password");
}

#[actix_rt::test]
async fn test_create_post_requires_token() {
    let state = test_state();
    let app = test_app!(state);

    for auth in [None, Some("Bearer not-a-jwt"), Some("Basic abc")] {
        let mut req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(react_patterns());
        if let Some(auth) = auth {
            req = req.insert_header(("Authorization", auth));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "token missing or invalid");
    }

    assert!(state.posts.list_posts().await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_token_for_missing_user() {
    let state = test_state();
    let token = state
        .tokens
        .generate_token(Uuid::new_v4(), "ghost")
        .unwrap();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(react_patterns())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "userId missing or not valid");
}

#[actix_rt::test]
async fn test_create_and_list_posts() {
    let state = test_state();
    let (user_id, auth) = signed_in(&state, "root").await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("Authorization", auth.as_str()))
        .set_json(react_patterns())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["likes"], 7);
    assert_eq!(created["user"]["username"], "root");
    assert!(created.get("liked_by").is_none());

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("Authorization", auth.as_str()))
        .set_json(json!({
            "title": "Type wars",
            "author": "Robert C. Martin",
            "url": "http://blog.cleancoder.com/uncle-bob/2016/05/01/TypeWars.html"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let second: Value = test::read_body_json(resp).await;
    assert_eq!(second["likes"], 0);

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let posts: Value = test::call_and_read_body_json(&app, req).await;
    let titles: Vec<&str> = posts
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["title"].as_str())
        .collect();
    assert_eq!(titles, ["React patterns", "Type wars"]);

    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{user_id}"))
        .to_request();
    let user: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(user["posts"].as_array().unwrap().len(), 2);
    assert_eq!(user["posts"][0], created["id"]);
}

#[actix_rt::test]
async fn test_create_post_validation() {
    let state = test_state();
    let (_, auth) = signed_in(&state, "root").await;
    let app = test_app!(state);

    let cases = [
        (json!({ "author": "Michael Chan", "url": "https://a.b/c" }), "Title required"),
        (
            json!({ "title": "ab", "author": "Michael Chan", "url": "https://a.b/c" }),
            "Title too short",
        ),
        (
            json!({ "title": "x".repeat(101), "author": "Michael Chan", "url": "https://a.b/c" }),
            "Title too long",
        ),
    ];

    for (payload, message) in cases {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", auth.as_str()))
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], message);
    }
}

#[actix_rt::test]
async fn test_duplicate_post_returns_existing() {
    let state = test_state();
    let (_, root) = signed_in(&state, "root").await;
    let (_, other) = signed_in(&state, "hellas").await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("Authorization", root.as_str()))
        .set_json(react_patterns())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("Authorization", other.as_str()))
        .set_json(react_patterns())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Post React patterns By: Michael Chan already exists");
    assert_eq!(body["post"]["id"], created["id"]);
    assert_eq!(body["post"]["user"]["username"], "root");
}

#[actix_rt::test]
async fn test_put_likes_and_ownership() {
    let state = test_state();
    let (_, owner) = signed_in(&state, "root").await;
    let (_, reader) = signed_in(&state, "hellas").await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("Authorization", owner.as_str()))
        .set_json(react_patterns())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/posts/{}", created["id"].as_str().unwrap());

    // A plain edit by someone else is refused.
    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(("Authorization", reader.as_str()))
        .set_json(json!({ "title": "Hijacked" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "only the creator can update");

    // Raising likes is a like, open to anyone once.
    let like = json!({ "likes": 8, "user": created["user"].clone() });
    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(("Authorization", reader.as_str()))
        .set_json(like.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["likes"], 8);
    assert_eq!(body["title"], "React patterns");

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(("Authorization", reader.as_str()))
        .set_json(json!({ "likes": 9 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "You have already liked this post");

    // The owner can still edit.
    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(("Authorization", owner.as_str()))
        .set_json(json!({ "url": "https://reactpatterns.com/new" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["url"], "https://reactpatterns.com/new");
    assert_eq!(body["likes"], 8);
}

#[actix_rt::test]
async fn test_like_route_counts_once_per_user() {
    let state = test_state();
    let (_, owner) = signed_in(&state, "root").await;
    let (_, reader) = signed_in(&state, "hellas").await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("Authorization", owner.as_str()))
        .set_json(react_patterns())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/posts/{}/like", created["id"].as_str().unwrap());

    let mut statuses = Vec::new();
    for auth in [&owner, &reader, &reader] {
        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(("Authorization", auth.as_str()))
            .to_request();
        statuses.push(test::call_service(&app, req).await.status());
    }
    assert_eq!(
        statuses,
        [StatusCode::OK, StatusCode::OK, StatusCode::BAD_REQUEST]
    );

    let details = state
        .posts
        .get_post(created["id"].as_str().unwrap().parse().unwrap())
        .await
        .unwrap();
    assert_eq!(details.post.likes, 9);
    assert_eq!(details.post.liked_by.len(), 2);
}

#[actix_rt::test]
async fn test_delete_post() {
    let state = test_state();
    let (_, owner) = signed_in(&state, "root").await;
    let (_, reader) = signed_in(&state, "hellas").await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("Authorization", owner.as_str()))
        .set_json(react_patterns())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/posts/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(("Authorization", reader.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "only the creator can delete");

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(("Authorization", owner.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(("Authorization", owner.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Post not found");

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_posts_listed_most_liked_first() {
    let state = test_state();
    let (_, auth) = signed_in(&state, "root").await;
    let app = test_app!(state);

    for (title, likes) in [("Zero likes", 0), ("Two likes", 2), ("One like", 1)] {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", auth.as_str()))
            .set_json(json!({
                "title": title,
                "author": "Edsger W. Dijkstra",
                "url": "https://example.com/post",
                "likes": likes
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let posts: Value = test::call_and_read_body_json(&app, req).await;
    let likes: Vec<i64> = posts
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["likes"].as_i64())
        .collect();
    assert_eq!(likes, [2, 1, 0]);
}

#[actix_rt::test]
async fn test_malformatted_id_and_unknown_endpoint() {
    let state = test_state();
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/posts/12345").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "malformatted id" }));

    let req = test::TestRequest::get().uri("/api/nothing-here").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "unknown endpoint" }));
}

#[actix_rt::test]
async fn test_stats() {
    let state = test_state();
    let (_, auth) = signed_in(&state, "root").await;
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/posts/stats").to_request();
    let empty: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(empty["total_likes"], 0);
    assert!(empty["favorite"].is_null());

    for (title, author, likes) in [
        ("Go To Statement Considered Harmful", "Edsger W. Dijkstra", 5),
        ("Canonical string reduction", "Edsger W. Dijkstra", 12),
        ("First class tests", "Robert C. Martin", 10),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", auth.as_str()))
            .set_json(json!({
                "title": title,
                "author": author,
                "url": "https://example.com/post",
                "likes": likes
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/api/posts/stats").to_request();
    let stats: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats["total_likes"], 27);
    assert_eq!(stats["favorite"]["title"], "Canonical string reduction");
    assert_eq!(
        stats["most_posts"],
        json!({ "author": "Edsger W. Dijkstra", "posts": 2 })
    );
}

#[actix_rt::test]
async fn test_health() {
    let state = test_state();
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "in-memory");
}

#[cfg(feature = "rate-limit")]
#[actix_rt::test]
async fn test_login_is_rate_limited() {
    use blog_core::ports::RateLimiter;
    use blog_infra::{InMemoryRateLimiter, RateLimitConfig};
    use std::time::Duration;

    let state = test_state();
    let limiter: Arc<dyn RateLimiter> = Arc::new(
        InMemoryRateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_secs(60),
        })
        .unwrap(),
    );
    let app = test_app!(state, Some(limiter));

    let login = || {
        test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "username": "nobody", "password": "whatever" }))
            .to_request()
    };

    let resp = test::call_service(&app, login()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(&app, login()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key("retry-after"));

    // Reads are not throttled.
    for _ in 0..3 {
        let req = test::TestRequest::get().uri("/api/users").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
    let req = test::TestRequest::get().uri("/api/posts").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}
