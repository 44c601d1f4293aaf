mod common;

use axum::http::StatusCode;
use models::user::Role;
use serde_json::json;
use uuid::Uuid;

use common::{json_request, try_app};

#[tokio::test]
async fn admin_crud_and_self_protection() {
    let Some(app) = try_app().await else {
        eprintln!("skip: database unreachable");
        return;
    };
    let (admin, token) = app.user_with_token(Role::Admin).await;

    // create
    let email = format!("crud-{}@example.com", Uuid::new_v4());
    let (status, created) = app
        .send(json_request(
            "POST",
            "/users",
            Some(&token),
            Some(json!({
                "email": email,
                "username": "creado",
                "password": "una-clave-larga",
                "role": "viewer"
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert!(created.get("password_hash").is_none(), "hash must never serialize");
    let user_id = created["id"].as_str().unwrap().to_string();

    // duplicate email
    let (status, _) = app
        .send(json_request(
            "POST",
            "/users",
            Some(&token),
            Some(json!({
                "email": email,
                "username": "repetido",
                "password": "una-clave-larga",
                "role": "viewer"
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // promote the new user
    let (status, updated) = app
        .send(json_request(
            "PUT",
            &format!("/users/{user_id}"),
            Some(&token),
            Some(json!({ "role": "editor" })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["role"], "editor");

    // toggle their status off and on
    let (status, toggled) = app
        .send(json_request("PUT", &format!("/users/{user_id}/toggle-status"), Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["is_active"], false);

    // the admin cannot touch their own role, status or row
    let (status, _) = app
        .send(json_request(
            "PUT",
            &format!("/users/{}", admin.id),
            Some(&token),
            Some(json!({ "role": "viewer" })),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(json_request("PUT", &format!("/users/{}/toggle-status", admin.id), Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(json_request("DELETE", &format!("/users/{}", admin.id), Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["msg"].as_str().is_some());

    // stats reflect the rows
    let (status, stats) = app.send(json_request("GET", "/users/stats", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(stats["total"].as_u64().unwrap() >= 2);
    assert!(stats["admins"].as_u64().unwrap() >= 1);
    assert!(stats["inactive"].as_u64().unwrap() >= 1);

    // deleting someone else works
    let (status, _) = app
        .send(json_request("DELETE", &format!("/users/{user_id}"), Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .send(json_request("GET", &format!("/users/{user_id}"), Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deactivated_accounts_cannot_log_in() {
    let Some(app) = try_app().await else {
        eprintln!("skip: database unreachable");
        return;
    };
    let (_admin, admin_token) = app.user_with_token(Role::Admin).await;
    let (user, _) = app.user_with_token(Role::Viewer).await;

    let (status, body) = app
        .send(json_request("PUT", &format!("/users/{}/toggle-status", user.id), Some(&admin_token), None))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, _) = app
        .send(json_request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": user.email, "password": "integration-pass" })),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_management_is_admin_only() {
    let Some(app) = try_app().await else {
        eprintln!("skip: database unreachable");
        return;
    };
    let (_editor, token) = app.user_with_token(Role::Editor).await;

    let (status, _) = app.send(json_request("GET", "/users", Some(&token), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(json_request("GET", "/users/stats", Some(&token), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
