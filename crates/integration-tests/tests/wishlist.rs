//! Integration tests for wishlist toggling.
//!
//! These tests require a running API server and database:
//! cargo test -p clementine-integration-tests -- --ignored

use reqwest::Client;
use serde_json::{Value, json};

use clementine_integration_tests::{base_url, client, sign_up, unique};

/// Create a product as admin and return its ID.
async fn create_product(client: &Client, admin_token: &str, name: &str) -> String {
    let resp = client
        .post(format!("{}/api/products", base_url()))
        .bearer_auth(admin_token)
        .json(&json!({
            "name": name,
            "price": 4999,
            "quantity": 3,
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), 201);

    let resp = client
        .get(format!("{}/api/products", base_url()))
        .query(&[("search", name)])
        .send()
        .await
        .expect("Failed to search products");
    let body: Value = resp.json().await.expect("body");

    body["products"]
        .as_array()
        .expect("products array")
        .iter()
        .find(|p| p["name"] == json!(name))
        .expect("product should be found")["id"]
        .as_str()
        .expect("id")
        .to_owned()
}

/// The product IDs currently on a user's wishlist.
async fn wishlist_ids(client: &Client, token: &str, user_id: &str) -> Vec<String> {
    let resp = client
        .get(format!("{}/api/users/{user_id}/wishlist", base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to get wishlist");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("body");

    body["wishlist"]
        .as_array()
        .expect("wishlist array")
        .iter()
        .map(|p| p["id"].as_str().expect("id").to_owned())
        .collect()
}

/// Toggle and return the response message.
async fn toggle(client: &Client, token: &str, product_id: &str) -> String {
    let resp = client
        .post(format!("{}/api/products/{product_id}/wishlist", base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to toggle wishlist");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("body");

    body["message"].as_str().expect("message").to_owned()
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_toggle_twice_restores_original_state() {
    let client = client();
    let admin = sign_up(&client, &unique("root"), "correct-horse-battery", true).await;
    let token = sign_up(&client, &unique("fan"), "correct-horse-battery", false).await;
    let user_id = clementine_integration_tests::token_subject(&token);

    let product_id = create_product(&client, &admin, &unique("gadget")).await;

    assert!(wishlist_ids(&client, &token, &user_id).await.is_empty());

    let message = toggle(&client, &token, &product_id).await;
    assert_eq!(message, "Product successfully added to wishlist");
    assert_eq!(
        wishlist_ids(&client, &token, &user_id).await,
        vec![product_id.clone()]
    );

    let message = toggle(&client, &token, &product_id).await;
    assert_eq!(message, "Product successfully removed from wishlist");
    assert!(wishlist_ids(&client, &token, &user_id).await.is_empty());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_wishlists_are_per_user() {
    let client = client();
    let admin = sign_up(&client, &unique("root"), "correct-horse-battery", true).await;
    let alice = sign_up(&client, &unique("alice"), "correct-horse-battery", false).await;
    let bob = sign_up(&client, &unique("bob"), "correct-horse-battery", false).await;
    let alice_id = clementine_integration_tests::token_subject(&alice);
    let bob_id = clementine_integration_tests::token_subject(&bob);

    let product_id = create_product(&client, &admin, &unique("gizmo")).await;

    toggle(&client, &alice, &product_id).await;

    assert_eq!(
        wishlist_ids(&client, &alice, &alice_id).await,
        vec![product_id]
    );
    assert!(wishlist_ids(&client, &bob, &bob_id).await.is_empty());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_toggle_requires_authentication() {
    let client = client();
    let admin = sign_up(&client, &unique("root"), "correct-horse-battery", true).await;
    let product_id = create_product(&client, &admin, &unique("thing")).await;

    let resp = client
        .post(format!("{}/api/products/{product_id}/wishlist", base_url()))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_wishlist_read_is_self_only() {
    let client = client();
    let alice = sign_up(&client, &unique("alice"), "correct-horse-battery", false).await;
    let bob = sign_up(&client, &unique("bob"), "correct-horse-battery", false).await;
    let bob_id = clementine_integration_tests::token_subject(&bob);

    let resp = client
        .get(format!("{}/api/users/{bob_id}/wishlist", base_url()))
        .bearer_auth(&alice)
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 401);
}
