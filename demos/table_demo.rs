//! Table Demo
//!
//! Two players share a table: scores, might counters and battlefields
//! travel between the seats, and display callbacks fire on every change.
//!
//! Run with: cargo run --example table_demo

use riftlink_sdk::client::quick;
use riftlink_sdk::game::{DisplaySlot, DisplayValue, MightChange, MightSlot, Side};
use riftlink_sdk::{CardCatalog, ClientConfig, SessionEvent};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Table Demo ===\n");

    let (host, guest) =
        quick::connected_pair(ClientConfig::default(), ClientConfig::default()).await?;
    println!("Room {}: host and guest connected\n", host.room());

    // The guest's screen shows the opponent's score as it arrives
    guest.bind_display(
        DisplaySlot::Score(Side::Theirs),
        Box::new(|value| {
            if let DisplayValue::Count(score) = value {
                println!("  [guest display] opponent score = {}", score);
            }
        }),
    )?;
    guest.bind_display(
        DisplaySlot::Winning(Side::Theirs),
        Box::new(|value| {
            if let DisplayValue::Highlight(true) = value {
                println!("  [guest display] opponent score highlighted");
            }
        }),
    )?;
    let mut guest_events = guest.subscribe();

    // === Phase 1: Battlefields ===
    println!("=== Phase 1: Battlefields ===\n");
    let catalog = CardCatalog::sample();
    if let Some(card) = catalog.battlefields("monastery").first() {
        host.claim_battlefield(&card.image_ref).await?;
        println!("Host claims {}", card.name);
    }
    if let Some(card) = catalog.battlefields("void").first() {
        guest.claim_battlefield(&card.image_ref).await?;
        println!("Guest claims {}", card.name);
    }
    quick::settle(&host, &guest).await;
    println!(
        "Guest sees host battlefield: {:?}\n",
        guest.snapshot().their_battlefield
    );

    // === Phase 2: Might ===
    println!("=== Phase 2: Might ===\n");
    host.adjust_might(MightSlot::OwnFieldOwnCounter, MightChange::Delta(6))
        .await?;
    host.adjust_might(MightSlot::RemoteFieldOwnCounter, MightChange::Delta(2))
        .await?;
    quick::settle(&host, &guest).await;
    let view = guest.snapshot();
    println!(
        "Guest board: host might on host field = {}, host might on guest field = {}\n",
        view.might(MightSlot::RemoteFieldRemoteCounter),
        view.might(MightSlot::OwnFieldRemoteCounter)
    );

    // === Phase 3: Scoring ===
    println!("=== Phase 3: Scoring ===\n");
    for _ in 0..4 {
        host.adjust_score(2).await?;
        quick::settle(&host, &guest).await;
    }

    while let Ok(event) = guest_events.try_recv() {
        if let SessionEvent::WinnerDeclared { winner, .. } = event {
            println!("\nGuest is told: {} wins", winner);
        }
    }

    println!("\nFinal host view:  {:?}", host.snapshot());
    println!("Final guest view: {:?}", guest.snapshot());
    Ok(())
}
