mod common;

use axum::http::StatusCode;
use models::user::Role;
use serde_json::json;
use uuid::Uuid;

use common::{json_request, multipart_request, try_app};

#[tokio::test]
async fn sector_delete_cascades_through_the_tree() {
    let Some(app) = try_app().await else {
        eprintln!("skip: database unreachable");
        return;
    };
    let (_admin, token) = app.user_with_token(Role::Admin).await;

    let (status, sector) = app
        .send(json_request(
            "POST",
            "/sectores",
            Some(&token),
            Some(json!({ "nombre": format!("Sector {}", Uuid::new_v4()) })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{sector}");
    let sector_id = sector["id"].as_str().unwrap().to_string();

    let (status, subsector) = app
        .send(json_request(
            "POST",
            "/subsectores",
            Some(&token),
            Some(json!({ "nombre": "Norte", "sector_id": sector_id })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{subsector}");
    let subsector_id = subsector["id"].as_str().unwrap().to_string();

    let (status, indiciado) = app
        .send(multipart_request(
            "POST",
            "/indiciados",
            &token,
            &[
                ("nombres", None, b"Carlos"),
                ("apellidos", None, b"Mendoza"),
                ("cedula", None, b"800123"),
                ("subsector_id", None, subsector_id.as_bytes()),
                ("foto", Some("rostro.png"), b"fake-png-bytes"),
            ],
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{indiciado}");
    let indiciado_id = indiciado["id"].as_str().unwrap().to_string();
    assert!(indiciado["foto_url"].as_str().unwrap().starts_with("/uploads/"));

    let (status, vehiculo) = app
        .send(json_request(
            "POST",
            "/vehiculos",
            Some(&token),
            Some(json!({
                "subsector_id": subsector_id,
                "placa": "xyz-111",
                "marca": "Ford",
                "modelo": "Ranger"
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{vehiculo}");
    assert_eq!(vehiculo["placa"], "XYZ-111");

    let (status, documento) = app
        .send(multipart_request(
            "POST",
            &format!("/documentos/indiciado/{indiciado_id}"),
            &token,
            &[("file", Some("expediente.pdf"), b"pdf-bytes")],
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{documento}");

    // sector detail counts the children
    let (status, detail) = app
        .send(json_request("GET", &format!("/sectores/{sector_id}"), Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["subsectores"][0]["indiciados"], 1);
    assert_eq!(detail["subsectores"][0]["vehiculos"], 1);

    // the cascade removes everything underneath in one call
    let (status, report) = app
        .send(json_request("DELETE", &format!("/sectores/{sector_id}"), Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::OK, "{report}");
    assert_eq!(report["subsectores"], 1);
    assert_eq!(report["indiciados"], 1);
    assert_eq!(report["vehiculos"], 1);
    assert_eq!(report["documentos"], 1);

    for uri in [
        format!("/sectores/{sector_id}"),
        format!("/subsectores/{subsector_id}"),
        format!("/indiciados/{indiciado_id}"),
    ] {
        let (status, _) = app.send(json_request("GET", &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn duplicate_names_conflict_within_scope() {
    let Some(app) = try_app().await else {
        eprintln!("skip: database unreachable");
        return;
    };
    let (_admin, token) = app.user_with_token(Role::Admin).await;

    let nombre = format!("Sector {}", Uuid::new_v4());
    let (status, sector) = app
        .send(json_request("POST", "/sectores", Some(&token), Some(json!({ "nombre": nombre }))))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let sector_id = sector["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .send(json_request("POST", "/sectores", Some(&token), Some(json!({ "nombre": nombre }))))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["msg"].as_str().is_some());

    for _ in 0..2 {
        let (status, _) = app
            .send(json_request(
                "POST",
                "/subsectores",
                Some(&token),
                Some(json!({ "nombre": "Centro", "sector_id": sector_id })),
            ))
            .await;
        // second attempt hits the per-sector unique name
        if status == StatusCode::CONFLICT {
            break;
        }
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = app
        .send(json_request("DELETE", &format!("/sectores/{sector_id}"), Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn viewers_cannot_modify_records() {
    let Some(app) = try_app().await else {
        eprintln!("skip: database unreachable");
        return;
    };
    let (_viewer, token) = app.user_with_token(Role::Viewer).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/sectores",
            Some(&token),
            Some(json!({ "nombre": format!("Sector {}", Uuid::new_v4()) })),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["msg"].as_str().is_some());

    // reading stays allowed
    let (status, _) = app.send(json_request("GET", "/sectores", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn soft_deleted_indiciado_disappears_but_files_survive() {
    let Some(app) = try_app().await else {
        eprintln!("skip: database unreachable");
        return;
    };
    let (_admin, token) = app.user_with_token(Role::Admin).await;

    let (_, sector) = app
        .send(json_request(
            "POST",
            "/sectores",
            Some(&token),
            Some(json!({ "nombre": format!("Sector {}", Uuid::new_v4()) })),
        ))
        .await;
    let sector_id = sector["id"].as_str().unwrap().to_string();
    let (_, subsector) = app
        .send(json_request(
            "POST",
            "/subsectores",
            Some(&token),
            Some(json!({ "nombre": "Sur", "sector_id": sector_id })),
        ))
        .await;
    let subsector_id = subsector["id"].as_str().unwrap().to_string();

    let (_, indiciado) = app
        .send(multipart_request(
            "POST",
            "/indiciados",
            &token,
            &[
                ("nombres", None, b"Rosa"),
                ("apellidos", None, b"Vargas"),
                ("cedula", None, b"700456"),
                ("alias", None, b"La Gata"),
                ("subsector_id", None, subsector_id.as_bytes()),
            ],
        ))
        .await;
    let indiciado_id = indiciado["id"].as_str().unwrap().to_string();

    // search finds the alias, case-insensitively
    let (status, results) = app
        .send(json_request("GET", "/indiciados/search?q=gata", Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(results.as_array().unwrap().iter().any(|r| r["id"] == indiciado_id.as_str()));

    let (status, _) = app
        .send(json_request("DELETE", &format!("/indiciados/{indiciado_id}"), Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .send(json_request("GET", &format!("/indiciados/{indiciado_id}"), Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, results) = app
        .send(json_request("GET", "/indiciados/search?q=gata", Some(&token), None))
        .await;
    assert!(!results.as_array().unwrap().iter().any(|r| r["id"] == indiciado_id.as_str()));

    let (status, _) = app
        .send(json_request("DELETE", &format!("/sectores/{sector_id}"), Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::OK);
}
