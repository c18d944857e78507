//! Handshake Demo
//!
//! A host sets up before anyone joins. When the guest's channel and media
//! arrive, each side re-sends what it owns, so both tables match without
//! replaying history.
//!
//! Run with: cargo run --example handshake_demo

use riftlink_sdk::game::{MightChange, MightSlot};
use riftlink_sdk::{Client, ClientConfig, ClientConfigBuilder, MemoryRendezvous};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Handshake Demo ===\n");

    let rendezvous = MemoryRendezvous::new();
    let host = Client::new(rendezvous.clone(), ClientConfig::default())
        .create_room()
        .await?;
    println!("Host opened room {} ({:?})", host.room(), host.state());

    // === Phase 1: Host prepares alone ===
    host.adjust_score(3).await?;
    host.adjust_might(MightSlot::OwnFieldOwnCounter, MightChange::Absolute(4))
        .await?;
    println!("Host sets score 3 and 4 might while waiting\n");

    // === Phase 2: Guest joins ===
    let guest = Client::new(rendezvous.clone(), ClientConfig::default())
        .join_room(&format!("  {}  ", host.room()))
        .await?;
    guest.adjust_score(1).await?;
    println!("Guest joins and scores 1 before the channel opens");

    host.pump().await;
    guest.pump().await;
    host.pump().await;
    println!("Host state: {:?}, guest state: {:?}", host.state(), guest.state());
    println!("Guest sees host score {}", guest.snapshot().their_score);
    println!("Host sees guest score {}\n", host.snapshot().their_score);

    // === Phase 3: A room without video ===
    println!("=== Phase 3: Data channel only ===\n");
    let no_media = MemoryRendezvous::new().without_media();
    let config = ClientConfigBuilder::new().require_media(false).build();
    let host = Client::new(no_media.clone(), config.clone())
        .create_room()
        .await?;
    let guest = Client::new(no_media, config)
        .join_room(host.room().as_str())
        .await?;
    host.pump().await;
    guest.pump().await;
    println!(
        "Without media and require_media = false: host {:?}, guest {:?}",
        host.state(),
        guest.state()
    );

    Ok(())
}
