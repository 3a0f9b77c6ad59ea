//! token-wallet demo application.
//!
//! This demonstrates how to wire the SDK together with environment
//! variables: an HTTP provider, an in-memory balance slot, and a console
//! subscriber.

#![warn(clippy::all, clippy::pedantic)]

use std::env;
use std::sync::Arc;

use token_wallet::{
    BalanceCache, BalanceStore, EventBus, HttpProvider, MemoryStore, TransferClient,
    WalletConfigBuilder, WalletSession,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let rpc_url = env::var("RPC_URL")?;
    let token_address = env::var("TOKEN_ADDRESS")?;
    let wallet_address = env::var("WALLET_ADDRESS")?;

    println!("Initializing token-wallet...");
    println!("RPC URL: {rpc_url}");
    println!("Token: {token_address}");
    println!("Account: {wallet_address}");

    let config = WalletConfigBuilder::new()
        .with_token(token_address)
        .with_refresh_timeout(10) // Give up on a balance query after 10 seconds
        .with_submit_timeout(30)
        .build()?;

    println!("Configuration validated successfully!");

    let provider = Arc::new(HttpProvider::new(rpc_url));
    let session = WalletSession::connected(wallet_address.parse()?, provider);
    let bus = Arc::new(EventBus::new());
    let store = BalanceStore::new(Arc::new(MemoryStore::new()), config.balance_key.clone());

    let subscription = bus.subscribe(|amount| println!("balance changed: {amount}"));

    let cache = Arc::new(BalanceCache::new(config, store, bus.clone(), session));
    let _transfers = TransferClient::new(cache.clone());

    println!("\nRefreshing balance...");
    match cache.refresh().await {
        Ok(amount) => println!("Balance: {amount}"),
        Err(e) => println!("Refresh failed ({e}); still showing {}", cache.current()),
    }

    bus.unsubscribe(subscription);
    Ok(())
}
