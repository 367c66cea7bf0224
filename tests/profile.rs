mod common;

use actix_web::{http::StatusCode, test};
use cs_coursework::utils::password::verify_password;
use serde_json::{Value, json};

#[actix_web::test]
async fn test_student_profile_statuses_and_final_grade() {
    let storage = common::storage().await;
    let cache = common::cache();
    let alice = common::student(&storage, "alice").await;
    let tom = common::ta(&storage, "tom").await;
    let a = common::past_assignment(&storage, "Essay", 40).await;
    let b = common::past_assignment(&storage, "Midterm", 60).await;
    let c = common::past_assignment(&storage, "Quiz", 5).await;
    let d = common::past_assignment(&storage, "Lab", 10).await;
    let e = common::future_assignment(&storage, "Final", 20).await;
    common::submission(&storage, &a, &alice, Some(&tom), Some(90.0)).await;
    common::submission(&storage, &b, &alice, Some(&tom), Some(70.0)).await;
    common::submission(&storage, &c, &alice, Some(&tom), None).await;
    let app = app!(storage, cache);

    let req = test::TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header(common::bearer(&alice))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["user_type"], "Student");
    assert_eq!(body["data"]["final_grade"], 78.0);

    let statuses: Vec<(i64, &str)> = body["data"]["assignments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| (row["assignment_id"].as_i64().unwrap(), row["status"].as_str().unwrap()))
        .collect();
    assert_eq!(
        statuses,
        vec![
            (a.id, "90.0%"),
            (b.id, "70.0%"),
            (c.id, "Ungraded"),
            (d.id, "Missing"),
            (e.id, "Not Due"),
        ]
    );
}

#[actix_web::test]
async fn test_final_grade_absent_without_graded_work() {
    let storage = common::storage().await;
    let cache = common::cache();
    let bob = common::student(&storage, "bob").await;
    common::future_assignment(&storage, "Final", 20).await;
    let app = app!(storage, cache);

    let req = test::TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header(common::bearer(&bob))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"]["final_grade"].is_null());
    assert_eq!(body["data"]["assignments"][0]["status"], "Not Due");
}

#[actix_web::test]
async fn test_staff_profiles_show_progress() {
    let storage = common::storage().await;
    let cache = common::cache();
    let admin = common::admin(&storage).await;
    let alice = common::student(&storage, "alice").await;
    let bob = common::student(&storage, "bob").await;
    let carol = common::student(&storage, "carol").await;
    let tom = common::ta(&storage, "tom").await;
    let uma = common::ta(&storage, "uma").await;
    let oscar = common::other(&storage, "oscar").await;
    let lab = common::past_assignment(&storage, "Lab", 10).await;
    let fin = common::future_assignment(&storage, "Final", 20).await;
    common::submission(&storage, &lab, &alice, Some(&tom), Some(80.0)).await;
    common::submission(&storage, &lab, &bob, Some(&tom), None).await;
    common::submission(&storage, &lab, &carol, Some(&uma), Some(75.0)).await;
    common::submission(&storage, &fin, &alice, Some(&uma), None).await;
    let app = app!(storage, cache);

    let req = test::TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header(common::bearer(&tom))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let rows = body["data"]["assignments"].as_array().unwrap();
    assert_eq!(rows[0]["status"], "1 / 2");
    assert_eq!(rows[0]["total"], 2);
    assert_eq!(rows[1]["status"], "Not due");
    assert_eq!(rows[1]["total"], 0);
    assert!(body["data"].get("final_grade").is_none() || body["data"]["final_grade"].is_null());

    let req = test::TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header(common::bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let rows = body["data"]["assignments"].as_array().unwrap();
    assert_eq!(rows[0]["status"], "2 / 3");
    assert_eq!(rows[1]["status"], "Not due");
    assert_eq!(rows[1]["total"], 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header(common::bearer(&oscar))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["user_type"], "Other");
    assert_eq!(body["data"]["assignments"], json!([]));
}

#[actix_web::test]
async fn test_hypothesized_grade() {
    let storage = common::storage().await;
    let cache = common::cache();
    let alice = common::student(&storage, "alice").await;
    let tom = common::ta(&storage, "tom").await;
    let a = common::past_assignment(&storage, "Essay", 40).await;
    let b = common::past_assignment(&storage, "Midterm", 60).await;
    common::past_assignment(&storage, "Lab", 10).await;
    let fin = common::future_assignment(&storage, "Final", 20).await;
    let bonus = common::future_assignment(&storage, "Bonus", 50).await;
    common::submission(&storage, &a, &alice, Some(&tom), Some(90.0)).await;
    common::submission(&storage, &b, &alice, Some(&tom), Some(70.0)).await;
    let app = app!(storage, cache);

    // Essay 36 + Midterm 42 + Lab 0 + Final 20，Bonus 没填不计入
    let req = test::TestRequest::post()
        .uri("/api/v1/profile/hypothesize")
        .insert_header(common::bearer(&alice))
        .set_json(json!({ "scores": { fin.id.to_string(): 100 } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["hypothesized_grade"], 75.38);
    assert_eq!(body["data"]["ignored_assignment_ids"], json!([]));

    // 已批改的 Essay、超出范围的 Bonus、不存在的作业都不采用
    let req = test::TestRequest::post()
        .uri("/api/v1/profile/hypothesize")
        .insert_header(common::bearer(&alice))
        .set_json(json!({ "scores": {
            fin.id.to_string(): 100,
            a.id.to_string(): 10,
            bonus.id.to_string(): 150,
            "9999": 80,
        } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["hypothesized_grade"], 75.38);
    assert_eq!(
        body["data"]["ignored_assignment_ids"],
        json!([a.id, bonus.id, 9999])
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/profile/hypothesize")
        .insert_header(common::bearer(&tom))
        .set_json(json!({ "scores": {} }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_update_profile() {
    let storage = common::storage().await;
    let cache = common::cache();
    let alice = common::student(&storage, "alice").await;
    common::student(&storage, "bob").await;
    let app = app!(storage, cache);

    // 邮箱已被占用
    let req = test::TestRequest::put()
        .uri("/api/v1/profile")
        .insert_header(common::bearer(&alice))
        .set_json(json!({ "email": "bob@example.edu" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // 弱密码
    let req = test::TestRequest::put()
        .uri("/api/v1/profile")
        .insert_header(common::bearer(&alice))
        .set_json(json!({ "password": "short" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri("/api/v1/profile")
        .insert_header(common::bearer(&alice))
        .set_json(json!({
            "email": "alice.new@example.edu",
            "display_name": "Alice A.",
            "password": "Fresh#Passw0rd"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["user"]["email"], "alice.new@example.edu");
    assert_eq!(body["data"]["user"]["display_name"], "Alice A.");
    assert_eq!(body["data"]["user"]["groups"], json!(["Students"]));

    let stored = storage.get_user_by_id(alice.id).await.unwrap().unwrap();
    assert!(verify_password("Fresh#Passw0rd", &stored.password_hash));

    // 缓存已失效，重新读取得到新资料
    let req = test::TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header(common::bearer(&alice))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["user"]["email"], "alice.new@example.edu");
}
