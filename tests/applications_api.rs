//! Application catalog API integration tests

#![cfg(feature = "ssr")]

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{count_rows, create_test_user, TestApp};

#[tokio::test]
async fn test_add_list_and_dedup() {
    let app = TestApp::new().await;
    let a = create_test_user(&app.pool, "operador1").await;
    let b = create_test_user(&app.pool, "operador2").await;
    let portal = json!({ "nombre": " Portal B2B ", "url": "https://portal.example.com" });

    let (status, body) = app.post("/api/aplicativos", &a.token, portal.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created"], true);
    assert_eq!(body["item"]["nombre"], "Portal B2B");
    let id = body["item"]["id"].as_i64().unwrap();

    let (status, body) = app.post("/api/aplicativos", &a.token, portal.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], false);

    let (status, body) = app.post("/api/aplicativos", &b.token, portal).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["item"]["id"], id);
    assert_eq!(count_rows(&app.pool, "aplicativos_base").await, 1);

    let (status, catalog) = app.get("/api/aplicativos/catalog", &a.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(catalog[0]["users"], 2);

    let (_, list) = app.get("/api/aplicativos", &b.token).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_rejects_bad_url() {
    let app = TestApp::new().await;
    let user = create_test_user(&app.pool, "operador1").await;

    let response = app
        .post(
            "/api/aplicativos",
            &user.token,
            json!({ "nombre": "Intranet", "url": "intranet.local" }),
        )
        .await;
    assert_api_error!(response, StatusCode::BAD_REQUEST, "url");
}

#[tokio::test]
async fn test_link_existing_entry() {
    let app = TestApp::new().await;
    let a = create_test_user(&app.pool, "operador1").await;
    let b = create_test_user(&app.pool, "operador2").await;

    let (_, body) = app
        .post(
            "/api/aplicativos",
            &a.token,
            json!({ "nombre": "NOC", "url": "https://noc.example.com" }),
        )
        .await;
    let id = body["item"]["id"].as_i64().unwrap();

    let (status, _) = app
        .post(&format!("/api/aplicativos/{}/link", id), &b.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post(&format!("/api/aplicativos/{}/link", id), &b.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_api_error!(
        app.post("/api/aplicativos/9999/link", &b.token, json!({})).await,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_delete_cleans_up_orphans() {
    let app = TestApp::new().await;
    let a = create_test_user(&app.pool, "operador1").await;
    let b = create_test_user(&app.pool, "operador2").await;
    let noc = json!({ "nombre": "NOC", "url": "https://noc.example.com" });

    let (_, body) = app.post("/api/aplicativos", &a.token, noc.clone()).await;
    let id = body["item"]["id"].as_i64().unwrap();
    app.post("/api/aplicativos", &b.token, noc).await;
    let uri = format!("/api/aplicativos/{}", id);

    let (status, body) = app.delete(&uri, &a.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "removed": true, "base_deleted": false }));

    assert_api_error!(app.delete(&uri, &a.token).await, StatusCode::NOT_FOUND);

    let (_, body) = app.delete(&uri, &b.token).await;
    assert_eq!(body["base_deleted"], true);
    assert_eq!(count_rows(&app.pool, "aplicativos_base").await, 0);
}

#[tokio::test]
async fn test_requires_token() {
    let app = TestApp::new().await;
    assert_api_error!(
        app.request(axum::http::Method::GET, "/api/aplicativos", None, None).await,
        StatusCode::UNAUTHORIZED
    );
}
