mod common;

use axum::{body::Body, http::StatusCode};
use chrono::{Duration, Utc};
use common::{PASSWORD, SESSION_COOKIE, TestApp, empty, json_request, with_json};
use serde_json::json;

#[tokio::test]
async fn token_login_issues_a_bearer_that_verifies_and_authorizes_writes() {
    let app = TestApp::new();

    let login = app
        .send(with_json(
            json_request("POST", "/api/admin/login"),
            &json!({ "password": PASSWORD }),
        ))
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["success"], true);
    assert_eq!(login.body["tokenType"], "Bearer");
    assert_eq!(login.body["expiresIn"], 24 * 60 * 60);
    let token = login.body["token"].as_str().unwrap().to_string();
    assert!(login.set_cookie().is_none());

    let verify = app
        .send(
            empty("GET", "/api/admin/verify")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(verify.status, StatusCode::OK);
    assert_eq!(verify.body, json!({ "valid": true }));

    let create = app
        .send(with_json(
            json_request("POST", "/api/posts").header("authorization", format!("Bearer {token}")),
            &json!({ "title": "t", "content": "c", "author": "a" }),
        ))
        .await;
    assert_eq!(create.status, StatusCode::CREATED);
    assert_eq!(app.posts.len().await, 1);
}

#[tokio::test]
async fn token_login_with_wrong_password_is_rejected() {
    let app = TestApp::new();

    for body in [json!({ "password": "admin123" }), json!({})] {
        let res = app
            .send(with_json(json_request("POST", "/api/admin/login"), &body))
            .await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
        assert_eq!(res.body["error"], "كلمة مرور خاطئة");
        assert!(res.body.get("token").is_none());
    }
}

#[tokio::test]
async fn verify_distinguishes_missing_and_bad_tokens() {
    let app = TestApp::new();

    let missing = app
        .send(empty("GET", "/api/admin/verify").body(Body::empty()).unwrap())
        .await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["valid"], false);
    assert_eq!(missing.body["error"], "رمز التفويض مفقود");

    let stale = app
        .auth
        .tokens()
        .issue_at(Utc::now() - Duration::hours(25))
        .unwrap();
    let expired = app
        .send(
            empty("GET", "/api/admin/verify")
                .header("authorization", format!("Bearer {stale}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(expired.status, StatusCode::UNAUTHORIZED);
    assert_eq!(expired.body["valid"], false);
    assert_eq!(expired.body["error"], "رمز غير صحيح أو منتهي الصلاحية");
}

#[tokio::test]
async fn expired_bearer_still_passes_with_a_valid_session_cookie() {
    let app = TestApp::new();
    let stale = app
        .auth
        .tokens()
        .issue_at(Utc::now() - Duration::hours(30))
        .unwrap();
    let body = json!({ "title": "t", "content": "c", "author": "a" });

    let without_cookie = app
        .send(with_json(
            json_request("POST", "/api/posts").header("authorization", format!("Bearer {stale}")),
            &body,
        ))
        .await;
    assert_eq!(without_cookie.status, StatusCode::UNAUTHORIZED);
    assert!(app.posts.is_empty().await);

    let with_cookie = app
        .send(with_json(
            json_request("POST", "/api/posts")
                .header("authorization", format!("Bearer {stale}"))
                .header("cookie", SESSION_COOKIE),
            &body,
        ))
        .await;
    assert_eq!(with_cookie.status, StatusCode::CREATED);
    assert_eq!(app.posts.len().await, 1);
}

#[tokio::test]
async fn session_login_sets_an_http_only_cookie_that_authorizes_writes() {
    let app = TestApp::new();

    let login = app
        .send(with_json(
            json_request("POST", "/api/auth/login"),
            &json!({ "password": PASSWORD }),
        ))
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body, json!({ "success": true }));

    let cookie = login.set_cookie().unwrap();
    assert!(cookie.starts_with("admin-auth=true"), "{cookie}");
    assert!(cookie.contains("HttpOnly"), "{cookie}");
    assert!(cookie.contains("Path=/"), "{cookie}");
    assert!(cookie.contains("Max-Age=86400"), "{cookie}");
    assert!(!cookie.contains("Secure"), "{cookie}");

    let pair = cookie.split(';').next().unwrap().to_string();
    let create = app
        .send(with_json(
            json_request("POST", "/api/posts").header("cookie", pair),
            &json!({ "title": "t", "content": "c", "author": "a" }),
        ))
        .await;
    assert_eq!(create.status, StatusCode::CREATED);
}

#[tokio::test]
async fn session_login_with_wrong_password_sets_no_cookie() {
    let app = TestApp::new();

    let res = app
        .send(with_json(
            json_request("POST", "/api/auth/login"),
            &json!({ "password": "wrong" }),
        ))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "Invalid password");
    assert!(res.set_cookie().is_none());
}

#[tokio::test]
async fn logout_expires_the_cookie() {
    let app = TestApp::new();

    let res = app
        .send(
            empty("POST", "/api/auth/logout")
                .header("cookie", SESSION_COOKIE)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "success": true }));

    let cookie = res.set_cookie().unwrap();
    assert!(cookie.starts_with("admin-auth="), "{cookie}");
    assert!(!cookie.starts_with("admin-auth=true"), "{cookie}");
    assert!(cookie.contains("Max-Age=0"), "{cookie}");
    assert!(cookie.contains("SameSite=Strict"), "{cookie}");
}

#[tokio::test]
async fn check_reports_session_state() {
    let app = TestApp::new();

    let signed_in = app
        .send(
            empty("GET", "/api/auth/check")
                .header("cookie", SESSION_COOKIE)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(signed_in.status, StatusCode::OK);
    assert_eq!(signed_in.body, json!({ "authenticated": true }));

    let signed_out = app
        .send(empty("GET", "/api/auth/check").body(Body::empty()).unwrap())
        .await;
    assert_eq!(signed_out.status, StatusCode::UNAUTHORIZED);
    assert_eq!(signed_out.body, json!({ "authenticated": false }));
}
