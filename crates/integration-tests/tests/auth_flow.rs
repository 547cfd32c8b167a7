//! Integration tests for sign-up, sign-in, and self-access authorization.
//!
//! These tests require a running API server and database:
//! cargo test -p clementine-integration-tests -- --ignored

use std::time::Duration;

use serde_json::{Value, json};

use clementine_integration_tests::{base_url, claim, client, sign_up, token_subject, unique};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_signup_then_signin_same_subject() {
    let client = client();
    let base_url = base_url();
    let username = unique("alice");
    let password = "correct-horse-battery";

    let t1 = sign_up(&client, &username, password, false).await;

    // Make sure the second token gets a later issued-at
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let resp = client
        .post(format!("{base_url}/api/users/signin"))
        .json(&json!({
            "email": format!("{username}@example.com"),
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to sign in");
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.expect("Failed to read signin response");
    let t2 = body["access_token"]
        .as_str()
        .expect("signin should carry access_token")
        .to_owned();

    // A fresh token, but the same identity
    assert_ne!(t1, t2);
    assert_eq!(token_subject(&t1), token_subject(&t2));
    assert_eq!(claim(&t1, "role"), json!("user"));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_admin_signup_carries_admin_role() {
    let client = client();
    let token = sign_up(&client, &unique("root"), "correct-horse-battery", true).await;

    assert_eq!(claim(&token, "role"), json!("admin"));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_signin_failure_is_generic() {
    let client = client();
    let base_url = base_url();
    let username = unique("carol");
    sign_up(&client, &username, "correct-horse-battery", false).await;

    // Wrong password and unknown email must be indistinguishable
    let wrong_password = client
        .post(format!("{base_url}/api/users/signin"))
        .json(&json!({
            "email": format!("{username}@example.com"),
            "password": "not-the-password",
        }))
        .send()
        .await
        .expect("Failed to send signin");

    let unknown_email = client
        .post(format!("{base_url}/api/users/signin"))
        .json(&json!({
            "email": format!("{}@example.com", unique("nobody")),
            "password": "not-the-password",
        }))
        .send()
        .await
        .expect("Failed to send signin");

    assert_eq!(wrong_password.status(), 401);
    assert_eq!(unknown_email.status(), 401);

    let a: Value = wrong_password.json().await.expect("body");
    let b: Value = unknown_email.json().await.expect("body");
    assert_eq!(a["error"], b["error"]);
    assert_eq!(a["error"], json!("Invalid email or password"));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_self_access_enforced() {
    let client = client();
    let base_url = base_url();

    let alice_token = sign_up(&client, &unique("alice"), "correct-horse-battery", false).await;
    let bob_token = sign_up(&client, &unique("bob"), "correct-horse-battery", false).await;
    let alice_id = token_subject(&alice_token);
    let bob_id = token_subject(&bob_token);

    // Alice may update herself
    let new_name = unique("alice2");
    let resp = client
        .patch(format!("{base_url}/api/users/{alice_id}"))
        .bearer_auth(&alice_token)
        .json(&json!({
            "username": new_name,
            "email": format!("{new_name}@example.com"),
        }))
        .send()
        .await
        .expect("Failed to patch self");
    assert_eq!(resp.status(), 200);

    // ...but not Bob, no matter how valid her token is
    let resp = client
        .patch(format!("{base_url}/api/users/{bob_id}"))
        .bearer_auth(&alice_token)
        .json(&json!({
            "username": unique("mallory"),
            "email": "mallory@example.com",
        }))
        .send()
        .await
        .expect("Failed to patch other");
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_missing_and_garbage_tokens_rejected() {
    let client = client();
    let base_url = base_url();
    let token = sign_up(&client, &unique("dave"), "correct-horse-battery", false).await;
    let id = token_subject(&token);

    let missing = client
        .get(format!("{base_url}/api/users/{id}"))
        .send()
        .await
        .expect("request");
    assert_eq!(missing.status(), 401);

    let garbage = client
        .get(format!("{base_url}/api/users/{id}"))
        .bearer_auth("not.a.token")
        .send()
        .await
        .expect("request");
    assert_eq!(garbage.status(), 401);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_password_change_rejects_reuse() {
    let client = client();
    let base_url = base_url();
    let password = "correct-horse-battery";
    let token = sign_up(&client, &unique("erin"), password, false).await;
    let id = token_subject(&token);

    // Same password again is a 400
    let resp = client
        .patch(format!("{base_url}/api/users/{id}/password"))
        .bearer_auth(&token)
        .json(&json!({ "password": password }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 400);

    // A genuinely new password succeeds
    let resp = client
        .patch(format!("{base_url}/api/users/{id}/password"))
        .bearer_auth(&token)
        .json(&json!({ "password": "battery-staple-horse" }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);
}
