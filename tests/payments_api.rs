mod common;

use std::sync::atomic::Ordering;

use axum::http::StatusCode;
use common::{FakeGateway, TestApp};
use serde_json::{Value, json};
use uuid::Uuid;

async fn add_to_cart(app: &TestApp, email: &str, name: &str, price: &str) -> String {
    let (status, body) = app
        .send(
            "POST",
            "/carts",
            None,
            Some(json!({
                "email": email,
                "menuId": Uuid::new_v4(),
                "name": name,
                "image": null,
                "price": price,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["id"].as_str().unwrap().to_string()
}

fn payment_body(email: &str, cart_ids: &[String], key: Uuid) -> Value {
    json!({
        "email": email,
        "amount": "26.50",
        "transactionId": "pi_test_2650",
        "cartIds": cart_ids,
        "menuItemIds": [Uuid::new_v4()],
        "idempotencyKey": key,
        "status": "pending",
    })
}

#[tokio::test]
async fn create_intent_returns_client_secret() {
    let app = TestApp::new();
    let (status, body) = app
        .send("POST", "/create-payment-intent", None, Some(json!({ "price": "19.99" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["clientSecret"], "pi_test_1999_secret_abc");
    assert_eq!(app.gateway.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn create_intent_rejects_invalid_price_without_calling_gateway() {
    let app = TestApp::new();
    for price in ["0", "-5", "1.005"] {
        let (status, _) = app
            .send("POST", "/create-payment-intent", None, Some(json!({ "price": price })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "price {price}");
    }
    assert_eq!(app.gateway.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn gateway_failure_is_bad_gateway() {
    let app = TestApp::with_gateway(FakeGateway {
        decline: true,
        ..Default::default()
    });
    let (status, body) = app
        .send("POST", "/create-payment-intent", None, Some(json!({ "price": "12.00" })))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    // Gateway detail is not echoed to the client.
    assert!(!body.to_string().contains("declined"));
}

#[tokio::test]
async fn finalize_records_payment_and_clears_paid_items() {
    let app = TestApp::new();
    let email = "diner@bistro.test";
    let first = add_to_cart(&app, email, "Roast Duck", "14.50").await;
    let second = add_to_cart(&app, email, "Lava Cake", "12.00").await;
    let kept = add_to_cart(&app, email, "Lemonade", "4.50").await;

    let key = Uuid::new_v4();
    let (status, body) = app
        .send(
            "POST",
            "/payments",
            None,
            Some(payment_body(email, &[first, second], key)),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["paymentResult"]["insertedId"].is_string());
    assert_eq!(body["data"]["paymentResult"]["created"], true);
    assert_eq!(body["data"]["deleteResult"]["deletedCount"], 2);
    assert!(body["data"].get("cleanupError").is_none());

    let (_, cart) = app
        .send("GET", &format!("/carts?email={email}"), None, None)
        .await;
    let remaining: Vec<&str> = cart["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(remaining, vec![kept.as_str()]);
}

#[tokio::test]
async fn replayed_finalize_records_one_payment() {
    let app = TestApp::new();
    let email = "diner@bistro.test";
    let item = add_to_cart(&app, email, "Roast Duck", "14.50").await;
    let key = Uuid::new_v4();
    let body = payment_body(email, &[item], key);

    let (_, first) = app.send("POST", "/payments", None, Some(body.clone())).await;
    let (status, second) = app.send("POST", "/payments", None, Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        first["data"]["paymentResult"]["insertedId"],
        second["data"]["paymentResult"]["insertedId"]
    );
    assert_eq!(second["data"]["paymentResult"]["created"], false);
    assert_eq!(second["data"]["deleteResult"]["deletedCount"], 0);
    assert_eq!(app.store.payment_count().await, 1);
}

#[tokio::test]
async fn finalize_never_deletes_another_users_cart() {
    let app = TestApp::new();
    let theirs = add_to_cart(&app, "other@bistro.test", "Margherita", "11.00").await;

    let (status, body) = app
        .send(
            "POST",
            "/payments",
            None,
            Some(payment_body("diner@bistro.test", &[theirs], Uuid::new_v4())),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleteResult"]["deletedCount"], 0);

    let (_, cart) = app
        .send("GET", "/carts?email=other@bistro.test", None, None)
        .await;
    assert_eq!(cart["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn finalize_without_key_still_records() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            "POST",
            "/payments",
            None,
            Some(json!({ "email": "diner@bistro.test", "amount": "9.00" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleteResult"]["deletedCount"], 0);
    assert_eq!(app.store.payment_count().await, 1);
}

#[tokio::test]
async fn payment_history_is_scoped_to_the_caller() {
    let app = TestApp::new();
    let email = "diner@bistro.test";
    for _ in 0..2 {
        app.send(
            "POST",
            "/payments",
            None,
            Some(payment_body(email, &[], Uuid::new_v4())),
        )
        .await;
    }

    let token = app.token_for(email);
    let (status, body) = app
        .send("GET", &format!("/paymentHistory/{email}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, _) = app
        .send("GET", "/paymentHistory/other@bistro.test", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send("GET", &format!("/paymentHistory/{email}"), None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn padded_cart_email_is_listed_and_cleared_by_payment() {
    let app = TestApp::new();
    let item = add_to_cart(&app, "  diner@bistro.test ", "Roast Duck", "14.50").await;

    let (_, cart) = app
        .send("GET", "/carts?email=diner@bistro.test", None, None)
        .await;
    assert_eq!(cart["data"][0]["email"], "diner@bistro.test");

    let (status, body) = app
        .send(
            "POST",
            "/payments",
            None,
            Some(payment_body(" diner@bistro.test", &[item], Uuid::new_v4())),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleteResult"]["deletedCount"], 1);
}

#[tokio::test]
async fn finalize_rejects_amounts_the_ledger_cannot_hold() {
    let app = TestApp::new();
    for amount in ["26.505", "100000000", "-1"] {
        let (status, _) = app
            .send(
                "POST",
                "/payments",
                None,
                Some(json!({ "email": "diner@bistro.test", "amount": amount })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "amount {amount}");
    }
    assert_eq!(app.store.payment_count().await, 0);
}

#[tokio::test]
async fn failed_cleanup_keeps_the_payment() {
    let app = TestApp::with_cleanup_outage();
    let email = "diner@bistro.test";
    let item = add_to_cart(&app, email, "Roast Duck", "14.50").await;

    let (status, body) = app
        .send(
            "POST",
            "/payments",
            None,
            Some(payment_body(email, &[item], Uuid::new_v4())),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["paymentResult"]["insertedId"].is_string());
    assert_eq!(body["data"]["deleteResult"]["deletedCount"], 0);
    assert_eq!(
        body["data"]["cleanupError"],
        "store unavailable: cart collection offline"
    );
    assert_eq!(app.store.payment_count().await, 1);

    // The failed cleanup leaves the item in the cart.
    let (_, cart) = app
        .send("GET", &format!("/carts?email={email}"), None, None)
        .await;
    assert_eq!(cart["data"].as_array().unwrap().len(), 1);
}
