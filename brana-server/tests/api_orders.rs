//! Storefront checkout, cart quotes and the customer view

mod common;

use common::TestApp;
use http::{Method, StatusCode};
use serde_json::{Value, json};

fn order(name: &str, phone: &str, price: f64, quantity: i64) -> Value {
    json!({
        "name": name,
        "phone": phone,
        "items": [{"name": "Party Dress", "price": price, "quantity": quantity}]
    })
}

#[tokio::test]
async fn test_checkout_returns_whatsapp_link() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/api/orders",
            None,
            json!({
                "name": "Chioma",
                "phone": "0803 123 4567",
                "note": "Deliver after 5pm",
                "items": [
                    {"name": "Party Dress", "price": "12000", "quantity": 1},
                    {"name": "Sandals", "price": 3500, "quantity": 2}
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let url = body["whatsappUrl"].as_str().unwrap();
    assert!(url.starts_with("https://wa.me/2348000000000?text="));
    assert!(body["message"].as_str().unwrap().contains("Chioma"));
    assert_eq!(body["order"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["order"]["items"][0]["status"], "pending");
}

#[tokio::test]
async fn test_checkout_rejects_empty_cart() {
    let app = TestApp::spawn().await;
    let (status, _) = app
        .post(
            "/api/orders",
            None,
            json!({"name": "Chioma", "phone": "08031234567", "items": []}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/orders", None, order("", "08031234567", 1000.0, 1))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_listing_is_protected() {
    let app = TestApp::spawn().await;
    let (status, _) = app.get("/api/orders", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_order_lifecycle() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let (_, created) = app
        .post("/api/orders", None, order("Chioma", "08031234567", 5000.0, 2))
        .await;
    let id = created["order"]["id"].as_str().unwrap().to_string();

    let (status, list) = app.get("/api/orders?phone=0803-123-4567", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, updated) = app
        .send(
            Method::PATCH,
            &format!("/api/orders/{}", id),
            Some(&token),
            Some(json!({"status": "delivered"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["items"][0]["status"], "delivered");

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/orders/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/orders/{}", id), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_customers_group_by_phone() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    app.post("/api/orders", None, order("Chioma", "0803 123 4567", 30000.0, 1))
        .await;
    app.post("/api/orders", None, order("Chioma A.", "08031234567", 25000.0, 1))
        .await;
    app.post("/api/orders", None, order("Tunde", "08099999999", 1000.0, 1))
        .await;

    let (status, customers) = app.get("/api/admin/customers", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let customers = customers.as_array().unwrap();
    assert_eq!(customers.len(), 2);
    // 按累计消费降序
    assert_eq!(customers[0]["orderCount"], 2);
    assert_eq!(customers[0]["totalSpent"], 55000.0);
    assert_eq!(customers[0]["tier"], "Silver");
    assert_eq!(customers[0]["isReturning"], true);
    assert_eq!(customers[1]["tier"], "Bronze");

    let (status, silver) = app
        .get("/api/admin/customers?tier=silver", Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(silver.as_array().unwrap().len(), 1);

    let (status, detail) = app
        .get("/api/admin/customers/08031234567", Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["orders"].as_array().unwrap().len(), 2);

    let (status, _) = app
        .get("/api/admin/customers/08000000000", Some(&token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cart_quote_marks_missing_products() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let product = app
        .create_product(
            &token,
            json!({
                "name": "Sun Hat",
                "category": "Accessories",
                "price": 3000,
                "stock": 2,
                "isDeal": true,
                "dealPrice": 2500
            }),
        )
        .await;
    let id = product["id"].as_str().unwrap();

    let (status, quote) = app
        .post(
            "/api/cart/quote",
            None,
            json!([
                {"productId": id, "quantity": 2},
                {"productId": "product:missing", "quantity": 1}
            ]),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{quote}");
    assert_eq!(quote["lines"][0]["available"], true);
    assert_eq!(quote["lines"][0]["unitPrice"], 2500.0);
    assert_eq!(quote["lines"][1]["available"], false);
    assert_eq!(quote["total"], 5000.0);
    assert_eq!(quote["itemCount"], 2);

    let (status, quote) = app
        .post(
            "/api/cart/quote",
            None,
            json!([{"productId": id, "quantity": 3}]),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["lines"][0]["available"], false);
    assert_eq!(quote["total"], 0.0);
}

#[tokio::test]
async fn test_whatsapp_link_without_saving() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let (status, link) = app
        .post(
            "/api/checkout/whatsapp",
            None,
            order("Chioma", "08031234567", 4000.0, 3),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{link}");
    assert_eq!(link["total"], 12000.0);
    assert!(
        link["whatsappUrl"]
            .as_str()
            .unwrap()
            .starts_with("https://wa.me/2348000000000?text=")
    );

    let (_, orders) = app.get("/api/orders", Some(&token)).await;
    assert_eq!(orders, json!([]));
}

#[tokio::test]
async fn test_dashboard_counts() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    app.create_product(
        &token,
        json!({"name": "Bib", "category": "Babies", "price": 900, "stock": 0}),
    )
    .await;
    app.post("/api/orders", None, order("Chioma", "08031234567", 900.0, 1))
        .await;

    let (status, dash) = app.get("/api/admin/dashboard", Some(&token)).await;
    assert_eq!(status, StatusCode::OK, "{dash}");
    assert_eq!(dash["productCount"], 1);
    assert_eq!(dash["outOfStockCount"], 1);
    assert_eq!(dash["orderCount"], 1);
    assert_eq!(dash["customerCount"], 1);
    assert_eq!(dash["revenue"], 900.0);

    let (status, inventory) = app.get("/api/admin/inventory", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inventory["threshold"], 5);
    assert_eq!(inventory["outOfStockCount"], 1);
}

#[tokio::test]
async fn test_oversized_order_rejected_before_saving() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    for body in [
        order("Chioma", "08031234567", 1e20, i64::MAX),
        order("Chioma", "08031234567", 1e20, 1),
        order("Chioma", "08031234567", 10.0, 100_001),
    ] {
        let (status, err) = app.post("/api/orders", None, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{err}");
    }

    // 什么都没写入，后台视图照常可用
    let (_, orders) = app.get("/api/orders", Some(&token)).await;
    assert_eq!(orders, json!([]));
    let (status, dash) = app.get("/api/admin/dashboard", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dash["orderCount"], 0);
    let (status, _) = app.get("/api/admin/customers", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_oversized_quote_rejected() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let (status, _) = app
        .post(
            "/api/products",
            Some(&token),
            json!({"name": "Gold Crib", "category": "Babies", "price": 1e20, "stock": 1}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let product = app
        .create_product(
            &token,
            json!({"name": "Crib", "category": "Babies", "price": 1e9, "stock": 1}),
        )
        .await;
    let id = product["id"].as_str().unwrap();

    let (status, err) = app
        .post(
            "/api/cart/quote",
            None,
            json!([{"productId": id, "quantity": i64::MAX}]),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], 8);

    // 上限内的大额报价正常返回
    let (status, quote) = app
        .post(
            "/api/cart/quote",
            None,
            json!([{"productId": id, "quantity": 100_000}]),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{quote}");
    assert_eq!(quote["lines"][0]["available"], false);
    assert_eq!(quote["lines"][0]["subtotal"], 1e14);
}
