mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

#[actix_web::test]
async fn test_list_reports_is_due_from_deadline() {
    let storage = common::storage().await;
    let cache = common::cache();
    let alice = common::student(&storage, "alice").await;
    let past = common::past_assignment(&storage, "Lab 1", 10).await;
    let future = common::future_assignment(&storage, "Lab 2", 10).await;
    let app = app!(storage, cache);

    let req = test::TestRequest::get()
        .uri("/api/v1/assignments")
        .insert_header(common::bearer(&alice))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], past.id);
    assert_eq!(items[0]["is_due"], true);
    assert_eq!(items[1]["id"], future.id);
    assert_eq!(items[1]["is_due"], false);
}

#[actix_web::test]
async fn test_list_requires_authentication() {
    let storage = common::storage().await;
    let cache = common::cache();
    let app = app!(storage, cache);

    let req = test::TestRequest::get()
        .uri("/api/v1/assignments")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_only_admin_creates_assignments() {
    let storage = common::storage().await;
    let cache = common::cache();
    let admin = common::admin(&storage).await;
    let tom = common::ta(&storage, "tom").await;
    let app = app!(storage, cache);

    let payload = json!({
        "title": "Project proposal",
        "description": "One page",
        "deadline": "2030-01-24T12:00:00Z",
        "weight": 15,
        "points": 100
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(common::bearer(&tom))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(common::bearer(&admin))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["title"], "Project proposal");
    assert_eq!(body["data"]["weight"], 15);

    assert_eq!(storage.list_assignments().await.unwrap().len(), 1);
}

#[actix_web::test]
async fn test_create_rejects_blank_title() {
    let storage = common::storage().await;
    let cache = common::cache();
    let admin = common::admin(&storage).await;
    let app = app!(storage, cache);

    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(common::bearer(&admin))
        .set_json(json!({
            "title": "   ",
            "deadline": "2030-01-24T12:00:00Z",
            "weight": 15,
            "points": 100
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_detail_payload_depends_on_role() {
    let storage = common::storage().await;
    let cache = common::cache();
    let alice = common::student(&storage, "alice").await;
    let bob = common::student(&storage, "bob").await;
    let tom = common::ta(&storage, "tom").await;
    let lab = common::past_assignment(&storage, "Lab 1", 10).await;
    common::submission(&storage, &lab, &alice, Some(&tom), Some(88.0)).await;
    let app = app!(storage, cache);

    // 助教看到统计
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/assignments/{}", lab.id))
        .insert_header(common::bearer(&tom))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["user_type"], "TA");
    assert_eq!(body["data"]["stats"]["total_submissions"], 1);
    assert_eq!(body["data"]["stats"]["ta_assignments"], 1);
    assert_eq!(body["data"]["stats"]["total_students"], 2);

    // 学生看到自己的提交
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/assignments/{}", lab.id))
        .insert_header(common::bearer(&alice))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["user_type"], "Student");
    assert_eq!(body["data"]["submission"]["is_graded"], true);
    assert_eq!(body["data"]["submission"]["is_past_due"], true);
    assert_eq!(body["data"]["submission"]["score"], 88.0);

    // 没交过的学生得到 null
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/assignments/{}", lab.id))
        .insert_header(common::bearer(&bob))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"]["submission"].is_null());
    assert!(body["data"].get("stats").is_none() || body["data"]["stats"].is_null());
}

#[actix_web::test]
async fn test_detail_unknown_assignment_is_not_found() {
    let storage = common::storage().await;
    let cache = common::cache();
    let alice = common::student(&storage, "alice").await;
    let app = app!(storage, cache);

    let req = test::TestRequest::get()
        .uri("/api/v1/assignments/999")
        .insert_header(common::bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/v1/assignments/abc")
        .insert_header(common::bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
