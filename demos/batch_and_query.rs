//! Example demonstrating batched requests and structured queries.
//!
//! Run with: `FB_TOKEN=... cargo run --example batch_and_query`

use fbgraph::{BatchItem, FacebookClient, RetryStrategy};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), fbgraph::Error> {
    tracing_subscriber::fmt()
        .with_env_filter("fbgraph=info")
        .init();

    let token = std::env::var("FB_TOKEN").unwrap_or_default();
    let client = FacebookClient::builder(token)
        .retry_strategy(RetryStrategy::Linear {
            delay: Duration::from_millis(250),
            max_retries: 2,
        })
        .build()?;

    println!("=== Batch ===");
    let items = vec![
        BatchItem::get("me").with_param("name", "me"),
        BatchItem::get("SproutSocialInc?fields=name,likes"),
        BatchItem::get("me/friends?limit=3"),
    ];

    // One bad sub-request does not fail the others.
    for (item, response) in items.iter().zip(client.batch(&items).await?) {
        println!(
            "{} -> {} {}",
            item.relative_url, response["code"], response["body"]
        );
    }
    println!();

    println!("=== Query ===");
    let result = client
        .query_client()
        .query("SELECT uid, name FROM user WHERE uid = me()")
        .await?;
    println!("Rows: {}", result["data"]);
    println!("Took {}s", result["query_time"]);

    Ok(())
}
