mod common;

use actix_web::{http::StatusCode, test};
use common::{TestContext, test_data};
use serde_json::{Value, json};

macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        let json: Value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, json)
    }};
}

#[actix_web::test]
async fn test_create_then_get_user() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;

    let (status, body) = send!(
        app,
        test::TestRequest::post().uri("/user").set_json(test_data::alice())
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["id"], 1);

    let (status, body) = send!(app, test::TestRequest::get().uri("/user/1"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "username": "alice", "email": "a@x.com"}));
}

#[actix_web::test]
async fn test_list_users_hides_passwords() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;

    let (status, body) = send!(app, test::TestRequest::get().uri("/user"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"users": []}));

    for (name, email) in [("alice", "a@x.com"), ("bob", "b@x.com")] {
        let (status, _) = send!(
            app,
            test::TestRequest::post()
                .uri("/user")
                .set_json(test_data::user_with_email(name, email))
        );
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send!(app, test::TestRequest::get().uri("/user"));
    assert_eq!(status, StatusCode::OK);
    let users = body["users"].as_array().expect("users array");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "alice");
    assert_eq!(users[1]["email"], "b@x.com");
    assert!(users.iter().all(|u| u.get("password").is_none()));
}

#[actix_web::test]
async fn test_duplicate_email_is_rejected() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;

    let (status, _) = send!(
        app,
        test::TestRequest::post().uri("/user").set_json(test_data::alice())
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/user")
            .set_json(test_data::user_with_email("alice2", "a@x.com"))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already in use");
    assert_eq!(body["code"], "EMAIL_IN_USE");

    assert_eq!(ctx.store().count().await.unwrap(), 1);
}

#[actix_web::test]
async fn test_email_domain_case_and_empty_labels() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/user")
            .set_json(test_data::user_with_email("alice", "a@x..com"))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["kind"], "invalid_email");

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/user")
            .set_json(test_data::user_with_email("bob", "b@x.com"))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/user")
            .set_json(test_data::user_with_email("bobby", "b@X.COM"))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMAIL_IN_USE");

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/user")
            .set_json(test_data::user_with_email("carol", "c@Example.COM"))
    );
    assert_eq!(status, StatusCode::CREATED);
    let users = ctx.store().list().await.unwrap();
    let emails: Vec<_> = users.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, ["b@x.com", "c@example.com"]);
}

#[actix_web::test]
async fn test_create_validation_failures() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;

    let cases = [
        (json!({"username": "al", "email": "a@x.com", "password": "secret1"}), "username"),
        (
            json!({"username": "a".repeat(151), "email": "a@x.com", "password": "secret1"}),
            "username",
        ),
        (json!({"username": "alice", "email": "a@x.com", "password": "12345"}), "password"),
        (json!({"username": "alice", "email": "not-an-email", "password": "secret1"}), "email"),
        (json!({"username": "alice", "password": "secret1"}), "email"),
    ];

    for (payload, field) in cases {
        let (status, body) = send!(app, test::TestRequest::post().uri("/user").set_json(&payload));
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"][0]["field"], field, "payload {payload}");
    }

    assert_eq!(ctx.store().count().await.unwrap(), 0);
}

#[actix_web::test]
async fn test_create_rejects_unknown_fields_and_bad_json() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;

    let (status, body) = send!(
        app,
        test::TestRequest::post().uri("/user").set_json(json!({
            "username": "alice",
            "email": "a@x.com",
            "password": "secret1",
            "is_admin": true
        }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"][0]["field"], "is_admin");
    assert_eq!(body["details"][0]["kind"], "unknown_field");

    // wrong types and unknown keys are reported next to the length rules
    let (status, body) = send!(
        app,
        test::TestRequest::post().uri("/user").set_json(json!({
            "username": 123,
            "email": "a@x.com",
            "password": "123",
            "role": "x"
        }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    let details = body["details"].as_array().expect("details array");
    let kinds: Vec<(&str, &str)> = details
        .iter()
        .map(|d| (d["field"].as_str().unwrap(), d["kind"].as_str().unwrap()))
        .collect();
    assert_eq!(
        kinds,
        [
            ("username", "invalid_type"),
            ("role", "unknown_field"),
            ("password", "too_short")
        ]
    );

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/user")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");

    assert_eq!(ctx.store().count().await.unwrap(), 0);
}

#[actix_web::test]
async fn test_get_missing_user_is_not_found() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;

    let (status, body) = send!(app, test::TestRequest::get().uri("/user/42"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let req = test::TestRequest::get().uri("/user/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_partial_update_keeps_other_fields() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;

    send!(app, test::TestRequest::post().uri("/user").set_json(test_data::alice()));

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri("/user/1")
            .set_json(json!({"username": "alicia"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User updated successfully");

    let stored = ctx.store().find(1).await.unwrap().expect("user 1");
    assert_eq!(stored.username, "alicia");
    assert_eq!(stored.email, "a@x.com");
    assert_eq!(stored.password, "secret1");
}

#[actix_web::test]
async fn test_update_email_conflicts() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;

    send!(app, test::TestRequest::post().uri("/user").set_json(test_data::alice()));
    send!(
        app,
        test::TestRequest::post()
            .uri("/user")
            .set_json(test_data::user_with_email("bob", "b@x.com"))
    );

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri("/user/2")
            .set_json(json!({"email": "a@x.com", "username": "robert"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMAIL_IN_USE");

    // rejected update must not have touched the row
    let bob = ctx.store().find(2).await.unwrap().expect("user 2");
    assert_eq!(bob.username, "bob");
    assert_eq!(bob.email, "b@x.com");

    // re-submitting one's own email is not a conflict
    let (status, _) = send!(
        app,
        test::TestRequest::put()
            .uri("/user/2")
            .set_json(json!({"email": "b@x.com", "password": "newpass1"}))
    );
    assert_eq!(status, StatusCode::OK);
    let bob = ctx.store().find(2).await.unwrap().expect("user 2");
    assert_eq!(bob.password, "newpass1");
}

#[actix_web::test]
async fn test_update_validation_and_missing_user() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;

    // validation runs before the lookup
    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri("/user/7")
            .set_json(json!({"password": "short"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "password");

    let (status, _) = send!(
        app,
        test::TestRequest::put()
            .uri("/user/7")
            .set_json(json!({"username": "ghost"}))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri("/user/7")
            .set_json(json!({"role": "admin"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"][0]["kind"], "unknown_field");
}

#[actix_web::test]
async fn test_empty_update_is_a_no_op() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;

    send!(app, test::TestRequest::post().uri("/user").set_json(test_data::alice()));

    let (status, _) = send!(app, test::TestRequest::put().uri("/user/1").set_json(json!({})));
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send!(app, test::TestRequest::get().uri("/user/1"));
    assert_eq!(body, json!({"id": 1, "username": "alice", "email": "a@x.com"}));
}

#[actix_web::test]
async fn test_delete_then_get_is_not_found() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;

    send!(app, test::TestRequest::post().uri("/user").set_json(test_data::alice()));

    let (status, body) = send!(app, test::TestRequest::delete().uri("/user/1"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let (status, _) = send!(app, test::TestRequest::get().uri("/user/1"));
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send!(app, test::TestRequest::delete().uri("/user/1"));
    assert_eq!(status, StatusCode::NOT_FOUND);

    // the freed email can be registered again
    let (status, _) = send!(
        app,
        test::TestRequest::post().uri("/user").set_json(test_data::alice())
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ctx.store().count().await.unwrap(), 1);
}
