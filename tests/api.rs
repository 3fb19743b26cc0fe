use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use studysync::auth::AuthService;
use studysync::{AppServices, MIGRATOR};

async fn test_pool() -> SqlitePool {
    // One connection: every connection to `sqlite::memory:` is its own database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    pool
}

macro_rules! app {
    ($pool:expr) => {{
        let pool = $pool;
        let services = AppServices::new(pool.clone(), AuthService::new(pool, "test-secret").with_hash_cost(4));
        test::init_service(App::new().configure(move |cfg| services.configure(cfg))).await
    }};
}

/// Registers `$email` (optionally with a role) and logs in, yielding
/// `(user_id, token)`.
macro_rules! register_and_login {
    ($app:expr, $email:expr) => {
        register_and_login!($app, $email, "student")
    };
    ($app:expr, $email:expr, $role:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(json!({ "name": "Student", "email": $email, "password": "hunter22", "role": $role }))
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/users/login")
            .set_json(json!({ "email": $email, "password": "hunter22" }))
            .to_request();
        let body: Value = test::call_and_read_body_json($app, req).await;
        assert_eq!(body["message"], "Login successful.");
        (
            body["user"]["id"].as_i64().unwrap(),
            body["token"].as_str().unwrap().to_string(),
        )
    }};
}

#[actix_web::test]
async fn root_banner() {
    let app = app!(test_pool().await);
    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, web::Bytes::from_static(b"StudySync backend running."));
}

#[actix_web::test]
async fn register_validates_and_rejects_duplicates() {
    let app = app!(test_pool().await);

    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({ "email": "a@b.c" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Please fill all fields.");

    register_and_login!(&app, "dup@example.com");
    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({ "name": "Again", "email": "dup@example.com", "password": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Email already exists.");
}

#[actix_web::test]
async fn login_returns_public_user_and_token() {
    let app = app!(test_pool().await);
    let (id, token) = register_and_login!(&app, "ada@example.com");

    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["id"], id);
    assert_eq!(me["role"], "student");
    assert!(me.get("password").is_none());

    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(json!({ "email": "ada@example.com", "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn todo_defaults_and_lifecycle() {
    let app = app!(test_pool().await);

    let req = test::TestRequest::post()
        .uri("/api/todo")
        .set_json(json!({ "user_id": 5, "text": "Revise chapter 4" }))
        .to_request();
    let todo: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(todo["priority"], "Medium");
    assert_eq!(todo["due_date"], Value::Null);
    assert_eq!(todo["notes"], Value::Null);
    assert_eq!(todo["completed"], false);
    let id = todo["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri("/api/todo")
        .set_json(json!({ "id": id, "completed": true }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Task updated");

    let req = test::TestRequest::get().uri("/api/todo?userId=5").to_request();
    let todos: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(todos.as_array().unwrap().len(), 1);
    assert_eq!(todos[0]["completed"], true);
    assert_eq!(todos[0]["text"], "Revise chapter 4");

    let req = test::TestRequest::delete().uri(&format!("/api/todo/{}", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    let req = test::TestRequest::delete().uri(&format!("/api/todo/{}", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn todo_update_clears_nullable_fields() {
    let app = app!(test_pool().await);

    let req = test::TestRequest::post()
        .uri("/api/todo")
        .set_json(json!({
            "user_id": 5, "text": "Lab report", "priority": "High", "dueDate": "2025-03-01", "notes": "n"
        }))
        .to_request();
    let todo: Value = test::call_and_read_body_json(&app, req).await;
    let id = todo["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri("/api/todo")
        .set_json(json!({ "id": id, "dueDate": null, "notes": null }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/todo?userId=5").to_request();
    let todos: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(todos[0]["due_date"], Value::Null);
    assert_eq!(todos[0]["notes"], Value::Null);
    assert_eq!(todos[0]["priority"], "High");
    assert_eq!(todos[0]["text"], "Lab report");

    let req = test::TestRequest::put()
        .uri("/api/todo")
        .set_json(json!({ "id": id + 100, "completed": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Task not found");
}

#[actix_web::test]
async fn todo_requires_user_and_text() {
    let app = app!(test_pool().await);

    let req = test::TestRequest::get().uri("/api/todo").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "User ID is required");

    let req = test::TestRequest::post()
        .uri("/api/todo")
        .set_json(json!({ "user_id": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn token_holders_cannot_read_other_users_todos() {
    let app = app!(test_pool().await);
    let (id, token) = register_and_login!(&app, "owner@example.com");

    let req = test::TestRequest::get()
        .uri(&format!("/api/todo?userId={}", id + 1))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri(&format!("/api/todo?userId={}", id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/todo?userId=1")
        .insert_header(("Authorization", "Bearer not-a-token"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn token_holders_cannot_change_other_users_data() {
    let app = app!(test_pool().await);
    let (owner, owner_token) = register_and_login!(&app, "owner@example.com");
    let (_, other_token) = register_and_login!(&app, "other@example.com");
    let (_, admin_token) = register_and_login!(&app, "admin@example.com", "admin");

    let req = test::TestRequest::post()
        .uri("/api/todo")
        .insert_header(("Authorization", format!("Bearer {}", owner_token)))
        .set_json(json!({ "user_id": owner, "text": "Flashcards" }))
        .to_request();
    let todo: Value = test::call_and_read_body_json(&app, req).await;
    let id = todo["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri("/api/todo")
        .insert_header(("Authorization", format!("Bearer {}", other_token)))
        .set_json(json!({ "id": id, "completed": true }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/todo/{}", id))
        .insert_header(("Authorization", format!("Bearer {}", other_token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/pomodoro")
        .insert_header(("Authorization", format!("Bearer {}", other_token)))
        .set_json(json!({
            "user_id": owner, "mode": "work", "start_time": "2025-01-06T09:00:00Z",
            "end_time": "2025-01-06T09:25:00Z", "duration_seconds": 1500
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    // A bad token is rejected before the task lookup.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/todo/{}", id + 100))
        .insert_header(("Authorization", "Bearer not-a-token"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::put()
        .uri("/api/todo")
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .set_json(json!({ "id": id, "completed": true }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/todo?userId={}", owner))
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    let todos: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(todos[0]["completed"], true);
}

#[actix_web::test]
async fn password_hashing_failure_is_a_server_error() {
    let pool = test_pool().await;
    let services = AppServices::new(pool.clone(), AuthService::new(pool, "test-secret").with_hash_cost(3));
    let app = test::init_service(App::new().configure(move |cfg| services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({ "name": "Ada", "email": "ada@example.com", "password": "hunter22" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Could not process password.");
}

#[actix_web::test]
async fn pomodoro_sessions_are_logged_and_listed_newest_first() {
    let app = app!(test_pool().await);

    for (mode, start, end, secs) in [
        ("work", "2025-01-06T09:00:00Z", "2025-01-06T09:25:00Z", 1500),
        ("short", "2025-01-06T09:25:00Z", "2025-01-06T09:30:00Z", 300),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/pomodoro")
            .set_json(json!({
                "user_id": 9, "mode": mode, "start_time": start, "end_time": end, "duration_seconds": secs
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Pomodoro session logged");
    }

    let req = test::TestRequest::get().uri("/api/pomodoro?userId=9").to_request();
    let sessions: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(sessions.as_array().unwrap().len(), 2);
    assert_eq!(sessions[0]["mode"], "short");
    assert_eq!(sessions[1]["duration_seconds"], 1500);

    let req = test::TestRequest::get().uri("/api/pomodoro/summary?userId=9").to_request();
    let summary: Value = test::call_and_read_body_json(&app, req).await;
    let work = summary
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["mode"] == "work")
        .unwrap();
    assert_eq!(work["sessions"], 1);
    assert_eq!(work["total_seconds"], 1500);

    let req = test::TestRequest::get().uri("/api/pomodoro").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn pomodoro_rejects_missing_fields() {
    let app = app!(test_pool().await);
    let req = test::TestRequest::post()
        .uri("/api/pomodoro")
        .set_json(json!({ "user_id": 9, "mode": "work" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn resources_create_fetch_filter_delete() {
    let app = app!(test_pool().await);

    for (title, kind) in [("Rust Book", "book"), ("SQL in 10 minutes", "video")] {
        let req = test::TestRequest::post()
            .uri("/api/resources")
            .set_json(json!({
                "title": title,
                "description": "study material",
                "subject": "CS",
                "resource_url": "https://example.com",
                "resource_type": kind
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/api/resources").to_request();
    let all: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
    assert_eq!(all[0]["title"], "SQL in 10 minutes");

    let req = test::TestRequest::get().uri("/api/resources?type=book").to_request();
    let books: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(books.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get().uri("/api/resources?search=_").to_request();
    let none: Value = test::call_and_read_body_json(&app, req).await;
    assert!(none.as_array().unwrap().is_empty());

    let req = test::TestRequest::get().uri("/api/resources?search=sql").to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    let id = found[0]["id"].as_i64().unwrap();

    let req = test::TestRequest::get().uri(&format!("/api/resources/{}", id)).to_request();
    let one: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(one["resource_type"], "video");

    let req = test::TestRequest::delete().uri(&format!("/api/resources/{}", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri(&format!("/api/resources/{}", id)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Resource not found");
}

#[actix_web::test]
async fn study_groups_create_search_delete() {
    let app = app!(test_pool().await);

    let req = test::TestRequest::post()
        .uri("/api/studygroups")
        .set_json(json!({ "name": "Algorithms Circle", "description": "weekly problems", "subject": "CS" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let group: Value = test::read_body_json(resp).await;
    let id = group["id"].as_i64().unwrap();

    let req = test::TestRequest::get().uri("/api/studygroups?search=algo").to_request();
    let groups: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(groups.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get().uri("/api/studygroups?search=biology").to_request();
    let groups: Value = test::call_and_read_body_json(&app, req).await;
    assert!(groups.as_array().unwrap().is_empty());

    let req = test::TestRequest::get().uri(&format!("/api/studygroups/{}", id)).to_request();
    let one: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(one["name"], "Algorithms Circle");
    assert_eq!(one["subject"], "CS");

    let req = test::TestRequest::delete().uri(&format!("/api/studygroups/{}", id)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Study group deleted");

    let req = test::TestRequest::delete().uri(&format!("/api/studygroups/{}", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri(&format!("/api/studygroups/{}", id)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Study group not found");
}

#[actix_web::test]
async fn quiz_generate_and_score() {
    let app = app!(test_pool().await);

    let req = test::TestRequest::post()
        .uri("/api/quiz/generate")
        .set_json(json!({ "quiz_type": "fitb", "content": "SQL basics" }))
        .to_request();
    let generated: Value = test::call_and_read_body_json(&app, req).await;
    let questions = generated["questions"].clone();
    assert_eq!(questions.as_array().unwrap().len(), 5);
    assert_eq!(questions[0]["type"], "fill_in_the_blank");

    let req = test::TestRequest::post()
        .uri("/api/quiz/score")
        .set_json(json!({
            "questions": questions,
            "answers": [
                { "type": "text", "value": "where" },
                { "type": "text", "value": "Normalization" },
                { "type": "text", "value": "index" }
            ],
            "confidence": [5, null, 2]
        }))
        .to_request();
    let results: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(results["score"], 2);
    assert_eq!(results["total"], 5);
    assert_eq!(results["review"][0]["confidence"], 5);
    assert_eq!(results["review"][2]["correct"], false);

    let req = test::TestRequest::post()
        .uri("/api/quiz/score")
        .set_json(json!({
            "questions": questions,
            "answers": [{ "type": "text", "value": "where" }, null, { "type": "text", "value": "index" }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Question 2 is not answered");
}
