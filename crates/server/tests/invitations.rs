mod common;

use axum::http::StatusCode;
use models::user::Role;
use serde_json::json;
use uuid::Uuid;

use common::{json_request, try_app};

#[tokio::test]
async fn duplicate_pending_invitation_conflicts() {
    let Some(app) = try_app().await else {
        eprintln!("skip: database unreachable");
        return;
    };
    let (_admin, token) = app.user_with_token(Role::Admin).await;
    let email = format!("pend-{}@example.com", Uuid::new_v4());

    let (status, first) = app
        .send(json_request(
            "POST",
            "/invitations/send",
            Some(&token),
            Some(json!({ "email": email, "role": "viewer" })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{first}");

    let (status, body) = app
        .send(json_request(
            "POST",
            "/invitations/send",
            Some(&token),
            Some(json!({ "email": email, "role": "viewer" })),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["msg"].as_str().unwrap().contains("resend"));

    // cleanup
    let id = first["id"].as_str().unwrap();
    let (status, _) = app
        .send(json_request("DELETE", &format!("/invitations/{id}"), Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn revoked_invitation_stops_validating() {
    let Some(app) = try_app().await else {
        eprintln!("skip: database unreachable");
        return;
    };
    let (_admin, token) = app.user_with_token(Role::Admin).await;
    let email = format!("rev-{}@example.com", Uuid::new_v4());

    let (_, created) = app
        .send(json_request(
            "POST",
            "/invitations/send",
            Some(&token),
            Some(json!({ "email": email, "role": "editor" })),
        ))
        .await;
    let id = Uuid::parse_str(created["id"].as_str().unwrap()).unwrap();
    let code = models::invitation::find_by_id(&app.db, id).await.unwrap().unwrap().code;

    let (status, _) = app
        .send(json_request("GET", &format!("/invitations/validate/{code}"), None, None))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(json_request("DELETE", &format!("/invitations/{id}"), Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .send(json_request("GET", &format!("/invitations/validate/{code}"), None, None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // revoking twice is a 404
    let (status, _) = app
        .send(json_request("DELETE", &format!("/invitations/{id}"), Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invitation_management_requires_admin() {
    let Some(app) = try_app().await else {
        eprintln!("skip: database unreachable");
        return;
    };
    let (_editor, token) = app.user_with_token(Role::Editor).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/invitations/send",
            Some(&token),
            Some(json!({ "email": "x@example.com", "role": "viewer" })),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["msg"].as_str().is_some());

    let (status, _) = app.send(json_request("GET", "/invitations", Some(&token), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn inviting_an_existing_user_conflicts() {
    let Some(app) = try_app().await else {
        eprintln!("skip: database unreachable");
        return;
    };
    let (admin, token) = app.user_with_token(Role::Admin).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/invitations/send",
            Some(&token),
            Some(json!({ "email": admin.email, "role": "viewer" })),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["msg"].as_str().unwrap().contains("already exists"));
}
