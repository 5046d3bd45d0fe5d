//! Contract methods - Inspect a deployed contract
//!
//! Covers: contract existence, exported methods, declared variables, balances
//!
//! Run: cargo run --example contract_methods -- currency
//!
//! Uses the public testnet unless configured through the environment:
//!   XIAN_CHAIN_ID=xian-testnet-1
//!   XIAN_MASTERNODE_HOSTS=https://testnet.xian.org
//!   XIAN_ACCOUNT_VK=<verifying key to look up>

use xian_kit::*;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let contract = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "currency".to_string());

    let xian = Xian::from_env()?;
    println!("Connected to {} ({})\n", xian.chain_id(), xian.network_type());

    if !xian.contract_exists(&contract).await? {
        println!("Contract {contract} is not deployed");
        return Ok(());
    }

    let methods = xian.get_contract_methods(&contract).await?;
    println!("=== Methods of {contract} ===");
    for method in methods.as_array().into_iter().flatten() {
        let arguments: Vec<String> = method["arguments"]
            .as_array()
            .into_iter()
            .flatten()
            .map(|arg| format!("{}: {}", arg["name"], arg["type"]))
            .collect();
        println!("  {}({})", method["name"], arguments.join(", "));
    }

    let variables = xian.get_contract_variables(&contract).await?;
    println!("\n=== Variables of {contract} ===");
    println!("{}", serde_json::to_string_pretty(&variables)?);

    if let Ok(vk) = std::env::var("XIAN_ACCOUNT_VK") {
        let balance = xian.get_currency_balance(&vk).await?;
        let nonce = xian.get_nonce(&vk).await?;
        println!("\n{vk}: balance {balance}, next nonce {nonce}");
    }

    Ok(())
}
