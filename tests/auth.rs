mod common;

use std::net::SocketAddr;

use actix_web::{http::StatusCode, test};
use cs_coursework::utils::jwt::REFRESH_COOKIE;
use serde_json::{Value, json};

fn peer(last_octet: u8) -> SocketAddr {
    SocketAddr::from(([10, 0, 0, last_octet], 40000))
}

#[actix_web::test]
async fn test_login_then_refresh() {
    let storage = common::storage().await;
    let cache = common::cache();
    let tom = common::ta(&storage, "tom").await;
    let app = app!(storage, cache);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .peer_addr(peer(1))
        .set_json(json!({ "username": "tom", "password": common::PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == REFRESH_COOKIE)
        .expect("refresh cookie")
        .into_owned();
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user_type"], "TA");
    assert_eq!(body["data"]["user"]["id"], tom.id);
    assert!(body["data"]["user"].get("password_hash").is_none());
    assert!(body["data"]["access_token"].as_str().is_some());

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .peer_addr(peer(1))
        .cookie(cookie)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"]["access_token"].as_str().is_some());

    let last_login = storage.get_user_by_id(tom.id).await.unwrap().unwrap().last_login;
    assert!(last_login.is_some());
}

#[actix_web::test]
async fn test_login_rejects_wrong_password() {
    let storage = common::storage().await;
    let cache = common::cache();
    common::student(&storage, "alice").await;
    let app = app!(storage, cache);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .peer_addr(peer(2))
        .set_json(json!({ "username": "alice", "password": "not-the-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .peer_addr(peer(2))
        .set_json(json!({ "username": "nobody", "password": common::PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_login_is_rate_limited() {
    let storage = common::storage().await;
    let cache = common::cache();
    let app = app!(storage, cache);

    let mut statuses = Vec::new();
    for _ in 0..6 {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .peer_addr(peer(3))
            .set_json(json!({ "username": "ghost", "password": "whatever" }))
            .to_request();
        statuses.push(test::call_service(&app, req).await.status());
    }
    assert!(statuses[..5].iter().all(|s| *s == StatusCode::UNAUTHORIZED));
    assert_eq!(statuses[5], StatusCode::TOO_MANY_REQUESTS);
}

#[actix_web::test]
async fn test_whoami_classifies_every_role() {
    let storage = common::storage().await;
    let cache = common::cache();
    let admin = common::admin(&storage).await;
    let alice = common::student(&storage, "alice").await;
    let tom = common::ta(&storage, "tom").await;
    let oscar = common::other(&storage, "oscar").await;
    let app = app!(storage, cache);

    let req = test::TestRequest::get().uri("/api/v1/auth/whoami").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["user_type"], "AnonymousUser");
    assert!(body["data"]["user"].is_null());

    for (user, expected) in [
        (&admin, "Admin"),
        (&alice, "Student"),
        (&tom, "TA"),
        (&oscar, "Other"),
    ] {
        let req = test::TestRequest::get()
            .uri("/api/v1/auth/whoami")
            .insert_header(common::bearer(user))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["user_type"], expected, "user {}", user.username);
    }

    // 无效 token 视为匿名
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/whoami")
        .insert_header(("Authorization", "Bearer not-a-token"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["user_type"], "AnonymousUser");
}

#[actix_web::test]
async fn test_admin_creates_users_with_groups() {
    let storage = common::storage().await;
    let cache = common::cache();
    let admin = common::admin(&storage).await;
    let tom = common::ta(&storage, "tom").await;
    let app = app!(storage, cache);

    let payload = json!({
        "username": "newstudent",
        "email": "newstudent@example.edu",
        "password": "Coursework#2025",
        "display_name": "New Student",
        "groups": ["Students"]
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .insert_header(common::bearer(&tom))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .insert_header(common::bearer(&admin))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user_type"], "Student");
    assert_eq!(body["data"]["user"]["groups"], json!(["Students"]));

    // 重名
    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .insert_header(common::bearer(&admin))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // 未知用户组
    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .insert_header(common::bearer(&admin))
        .set_json(json!({
            "username": "intruder",
            "email": "intruder@example.edu",
            "password": "Coursework#2025",
            "groups": ["Wizards"]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
