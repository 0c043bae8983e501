//! Example demonstrating reads, publishes and error handling.
//!
//! This example shows how to:
//! - Create a client with an access token
//! - Read an object and one of its connections
//! - Publish to a feed
//! - Tell connection, HTTP and decode failures apart
//!
//! Run with: `FB_TOKEN=... cargo run --example graph_fetch`

use fbgraph::{error::BoxError, Error, FacebookClient, HookEvent};
use serde_json::json;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("fbgraph=debug,graph_fetch=info")
        .init();

    let token = std::env::var("FB_TOKEN").unwrap_or_default();

    let client = FacebookClient::builder(token)
        .timeout(Duration::from_secs(20))
        .post_hook(|event: &HookEvent<'_>| -> Result<(), BoxError> {
            println!(
                "  [hook] {} {} -> {:?} in {:?}",
                event.method, event.url, event.status, event.latency
            );
            Ok(())
        })
        .build()?;

    println!("=== Reading an object ===");
    match client
        .get("SproutSocialInc", &[("fields", "id,name,likes")])
        .await
    {
        Ok(page) => println!("Page: {}", page),
        Err(e) => println!("Read failed: {}", e),
    }
    println!();

    println!("=== Reading a connection ===");
    match client
        .get_connection("me", Some("friends"), &[("limit", "5")])
        .await
    {
        Ok(friends) => println!("Friends: {}", friends["data"]),
        Err(e) => println!("Read failed: {}", e),
    }
    println!();

    println!("=== Publishing ===");
    match client
        .post("me/feed", &json!({"message": "Posted from fbgraph"}))
        .await
    {
        Ok(post) => println!("Created post {}", post["id"]),
        Err(Error::Http(payload)) => {
            println!("Graph refused the publish!");
            println!("  Status: {:?}", payload.code);
            println!("  Message: {:?}", payload.message());
            println!("  Type: {:?}", payload.error_type());
            println!("  Code/subcode: {:?}/{:?}", payload.error_code(), payload.error_subcode());
        }
        Err(Error::Decode {
            raw_response,
            reason,
        }) => {
            println!("Unreadable response: {}", reason);
            println!(
                "  Raw response (first 200 chars): {}",
                raw_response.chars().take(200).collect::<String>()
            );
        }
        Err(Error::Connection { message, .. }) => println!("No response: {}", message),
        Err(e) => println!("Other error: {}", e),
    }

    Ok(())
}
