//! Ping server - Check that masternodes are reachable
//!
//! Run: RUST_LOG=xian_kit=debug cargo run --example ping_server

use xian_kit::*;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let xian = Xian::from_env()?;

    // One request per configured host, each to a freshly drawn host
    for _ in 0..xian.rpc().hosts().len() {
        match xian.ping_server().await {
            Ok(status) => println!("ping: {status}"),
            Err(e) => println!("ping failed: {e}"),
        }
    }

    let info = xian.get_node_info().await?;
    println!(
        "latest height: {}",
        info["result"]["sync_info"]["latest_block_height"]
    );

    Ok(())
}
