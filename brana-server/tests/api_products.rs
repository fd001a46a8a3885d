//! Catalog endpoints through the full router

mod common;

use std::path::Path;
use std::time::Duration;

use brana_server::services::ImageStore;
use common::TestApp;
use http::{Method, StatusCode};
use serde_json::json;

fn romper() -> serde_json::Value {
    json!({
        "name": "Cotton Romper",
        "category": "Babies",
        "price": 4500,
        "stock": 10,
        "images": [{"url": "https://cdn.brana.kids/romper.jpg"}],
        "tags": ["cotton"]
    })
}

#[tokio::test]
async fn test_public_listing_without_token() {
    let app = TestApp::spawn().await;
    let (status, body) = app.get("/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_requires_token() {
    let app = TestApp::spawn().await;
    let (status, _) = app.post("/api/products", None, romper()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_fetch() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let product = app.create_product(&token, romper()).await;
    assert_eq!(product["name"], "Cotton Romper");
    assert_eq!(product["status"], "in-stock");
    let id = product["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("product:"));

    let (status, fetched) = app.get(&format!("/api/products/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["price"], 4500.0);
}

#[tokio::test]
async fn test_zero_stock_is_out_of_stock() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let mut body = romper();
    body["stock"] = json!(0);
    let product = app.create_product(&token, body).await;
    assert_eq!(product["status"], "out-of-stock");
}

#[tokio::test]
async fn test_duplicate_name_rejected() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    app.create_product(&token, romper()).await;
    let (status, body) = app.post("/api/products", Some(&token), romper()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6004);
}

#[tokio::test]
async fn test_too_many_images_rejected() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let mut body = romper();
    body["images"] = json!([
        {"url": "https://cdn.brana.kids/1.jpg"},
        {"url": "https://cdn.brana.kids/2.jpg"},
        {"url": "https://cdn.brana.kids/3.jpg"},
        {"url": "https://cdn.brana.kids/4.jpg"}
    ]);
    let (status, body) = app.post("/api/products", Some(&token), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6005);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .post("/api/products", Some(&token), json!({"name": 42}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_update_restock_flips_status() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let mut body = romper();
    body["stock"] = json!(0);
    let product = app.create_product(&token, body).await;
    let id = product["id"].as_str().unwrap();

    let (status, updated) = app
        .send(
            Method::PATCH,
            &format!("/api/products/{}", id),
            Some(&token),
            Some(json!({"stock": "7"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["stock"], 7);
    assert_eq!(updated["status"], "in-stock");
}

#[tokio::test]
async fn test_delete_removes_from_listing() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let product = app.create_product(&token, romper()).await;
    let id = product["id"].as_str().unwrap();

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/products/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = app.get("/api/products", None).await;
    assert_eq!(list, json!([]));

    let (status, _) = app.get(&format!("/api/products/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generate_variants() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let (status, variants) = app
        .post(
            "/api/products/variants",
            Some(&token),
            json!({
                "attributes": [
                    {"name": "Size", "options": ["S", "M"]},
                    {"name": "Color", "options": ["Pink", "Blue"]}
                ],
                "basePrice": 4000,
                "baseStock": 2
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{variants}");
    let variants = variants.as_array().unwrap();
    assert_eq!(variants.len(), 4);
    assert_eq!(variants[0]["price"], 4000.0);
}

#[tokio::test]
async fn test_seed_populates_catalog() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .post("/api/admin/seed-data", Some(&token), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let seeded = body["data"]["products"].as_u64().unwrap();
    assert!(seeded > 0);

    let (_, list) = app.get("/api/products", None).await;
    assert_eq!(list.as_array().unwrap().len() as u64, seeded);
}

#[tokio::test]
async fn test_seed_requires_system_permission() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    // 经理拿到全部可配置权限也不能重置数据
    let (status, manager) = app
        .post(
            "/api/admin/users",
            Some(&token),
            json!({
                "name": "Mia",
                "email": "mia@brana.kids",
                "password": "password123",
                "role": "manager",
                "permissions": [
                    "products:manage", "categories:manage", "banners:manage",
                    "orders:view", "orders:manage", "customers:view",
                    "inventory:view", "upload:images", "users:manage"
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{manager}");
    let manager_token = app.token_for(&manager);

    let (status, _) = app
        .post("/api/admin/seed-data", Some(&manager_token), json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            "/api/admin/users",
            Some(&token),
            json!({"name": "Old", "email": "old@brana.kids", "password": "password123",
                   "role": "manager", "permissions": ["seed:run"]}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Store bytes through the app's image store, returning the public url
async fn upload(app: &TestApp, key: &str) -> String {
    let stored = app
        .state()
        .image_store()
        .put(key, vec![0xFF, 0xD8, 0xFF], "image/jpeg")
        .await
        .unwrap();
    assert!(app.images_dir().join(key).exists());
    stored.url
}

/// Cleanup runs in a background task
async fn wait_until_gone(path: &Path) -> bool {
    for _ in 0..100 {
        if !path.exists() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

async fn delete_product(app: &TestApp, token: &str, product: &serde_json::Value) {
    let id = product["id"].as_str().unwrap();
    let (status, _) = app
        .send(Method::DELETE, &format!("/api/products/{}", id), Some(token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_removes_local_image_file() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let cover = upload(&app, "cover.jpg").await;
    let swatch = upload(&app, "swatch.jpg").await;
    let mut body = romper();
    body["images"] = json!([{"url": cover}]);
    body["variants"] = json!([{"name": "Red", "price": 4500, "stock": 1, "images": [{"url": swatch}]}]);
    let product = app.create_product(&token, body).await;

    delete_product(&app, &token, &product).await;
    assert!(wait_until_gone(&app.images_dir().join("cover.jpg")).await);
    assert!(wait_until_gone(&app.images_dir().join("swatch.jpg")).await);
}

#[tokio::test]
async fn test_shared_image_kept_until_last_reference() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let file = app.images_dir().join("shared.jpg");

    // 相同内容上传两次得到同一个 key
    let url = upload(&app, "shared.jpg").await;
    assert_eq!(upload(&app, "shared.jpg").await, url);

    let mut first = romper();
    first["images"] = json!([{"url": url}]);
    let first = app.create_product(&token, first).await;
    let mut second = romper();
    second["name"] = json!("Linen Romper");
    second["images"] = json!([{"url": url}]);
    let second = app.create_product(&token, second).await;

    delete_product(&app, &token, &first).await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(file.exists(), "image still used by another product was deleted");

    delete_product(&app, &token, &second).await;
    assert!(wait_until_gone(&file).await);
}

#[tokio::test]
async fn test_banner_image_survives_product_delete() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let file = app.images_dir().join("hero.jpg");

    let url = upload(&app, "hero.jpg").await;
    let (status, banner) = app
        .post(
            "/api/banners",
            Some(&token),
            json!({"title": "Back to school", "image": url}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{banner}");

    let mut body = romper();
    body["images"] = json!([{"url": url}]);
    let product = app.create_product(&token, body).await;

    delete_product(&app, &token, &product).await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(file.exists());
}
