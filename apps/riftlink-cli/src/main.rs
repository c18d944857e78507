//! # Riftlink CLI
//!
//! Plays both seats of a Riftlink game in one process. A host and a guest
//! session are paired through the in-memory rendezvous, so every score,
//! threshold, might and battlefield change travels through the same codec
//! and dispatch path a browser session uses.
//!
//! ```text
//! host ──adjust_score──▶ store ──outbox──▶ codec ──frame──▶ guest store
//! ```

use std::io::{self, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::*;
use rand::Rng;
use riftlink_sdk::cards::CardCatalog;
use riftlink_sdk::client::quick;
use riftlink_sdk::game::{GameSnapshot, MightChange, MightSlot};
use riftlink_sdk::{ClientConfigBuilder, MemoryTransport, Session, SessionEvent};
use tokio::sync::broadcast;

type Seat = Arc<Session<MemoryTransport>>;

// ─── CLI ───────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "riftlink")]
#[command(about = "Two-player scoreboard sync over a simulated peer connection")]
#[command(version)]
struct Cli {
    /// Log SDK internals (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scripted game: host scores to the threshold, both sides agree on the winner
    Demo,
    /// Both players score random points until someone wins
    Race {
        /// Play to 9 instead of 8
        #[arg(long)]
        extended: bool,
        /// Seed for reproducible games
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Interactive REPL for manual experimentation
    Interactive,
}

// ─── Pretty printing ──────────────────────────────────────────────────────

fn header(text: &str) {
    let bar = "═".repeat(60);
    println!("\n{}", bar.bright_cyan());
    println!("  {}", text.bold().bright_white());
    println!("{}", bar.bright_cyan());
}

fn section(text: &str) {
    println!("\n{} {}", "▸".bright_yellow(), text.bold());
}

fn step(text: &str) {
    println!("  {} {}", "•".bright_green(), text);
}

fn warn(text: &str) {
    println!("  {} {}", "!".bright_red(), text);
}

fn show_view(label: &str, view: &GameSnapshot) {
    let border = "─".repeat(44);
    let score = |value: u16, winning: bool| {
        if winning {
            value.to_string().bright_green().bold().to_string()
        } else {
            value.to_string()
        }
    };

    println!("  ┌{}┐", border);
    println!(
        "  │ {:^42} │",
        format!("{} view (first to {})", label, view.win_threshold)
            .bright_yellow()
            .to_string()
    );
    println!("  ├{}┤", border);
    println!(
        "  │ You {:>3}   Opponent {:>3}",
        score(view.my_score, view.i_am_winning),
        score(view.their_score, view.they_are_winning)
    );
    println!(
        "  │ might  own field {}/{}   their field {}/{}",
        view.might(MightSlot::OwnFieldOwnCounter),
        view.might(MightSlot::OwnFieldRemoteCounter),
        view.might(MightSlot::RemoteFieldOwnCounter),
        view.might(MightSlot::RemoteFieldRemoteCounter),
    );
    println!(
        "  │ battlefields  {} / {}",
        view.my_battlefield.as_deref().unwrap_or("-"),
        view.their_battlefield.as_deref().unwrap_or("-")
    );
    println!("  └{}┘", border);
}

fn show_both(host: &Seat, guest: &Seat) {
    show_view("Host", &host.snapshot());
    show_view("Guest", &guest.snapshot());
}

/// Both views describe the same game from opposite seats.
fn mirrored(host: &GameSnapshot, guest: &GameSnapshot) -> bool {
    host.my_score == guest.their_score
        && host.their_score == guest.my_score
        && host.win_threshold == guest.win_threshold
        && MightSlot::ALL
            .iter()
            .all(|slot| host.might(*slot) == guest.might(slot.counterpart()))
        && host.my_battlefield == guest.their_battlefield
        && host.their_battlefield == guest.my_battlefield
}

fn convergence_result(host: &Seat, guest: &Seat) -> bool {
    let converged = mirrored(&host.snapshot(), &guest.snapshot());
    if converged {
        println!(
            "\n  {} {}",
            "✓".bright_green().bold(),
            "BOTH SEATS AGREE".bright_green().bold()
        );
    } else {
        println!(
            "\n  {} {}",
            "✗".bright_red().bold(),
            "DIVERGENCE DETECTED".bright_red().bold()
        );
    }
    converged
}

fn report_events(label: &str, events: &mut broadcast::Receiver<SessionEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            SessionEvent::WinnerDeclared { winner, .. } => println!(
                "  {} {} sees {} win!",
                "★".bright_yellow().bold(),
                label,
                winner.to_string().bold()
            ),
            SessionEvent::OpponentReset => step(&format!("{}: opponent reset the game", label)),
            SessionEvent::MessageDropped { reason } => {
                warn(&format!("{} dropped a frame: {}", label, reason))
            }
            SessionEvent::TransportNotice(message) => warn(&format!("{}: {}", label, message)),
            SessionEvent::Disconnected => warn(&format!("{} disconnected", label)),
            _ => {}
        }
    }
}

async fn connect(extended: bool) -> Option<(Seat, Seat)> {
    let host_config = ClientConfigBuilder::new()
        .player_name("Host")
        .extended_win_by_default(extended)
        .build();
    let guest_config = ClientConfigBuilder::new()
        .player_name("Guest")
        .extended_win_by_default(extended)
        .build();

    match quick::connected_pair(host_config, guest_config).await {
        Ok(pair) => Some(pair),
        Err(e) => {
            warn(&format!("Could not connect: {}", e));
            None
        }
    }
}

// ─── Demo ──────────────────────────────────────────────────────────────────

async fn run_demo() {
    header("DEMO — Host Scores to the Threshold");

    section("Phase 1: Host creates a room, guest joins");
    let Some((host, guest)) = connect(false).await else {
        return;
    };
    let mut host_events = host.subscribe();
    let mut guest_events = guest.subscribe();
    step(&format!("room {}", host.room().to_string().bright_magenta()));
    step(&format!("host: {:?}, guest: {:?}", host.state(), guest.state()));

    section("Phase 2: Setup");
    let catalog = CardCatalog::sample();
    if let Some(card) = catalog.battlefields("grove").first() {
        if let Err(e) = host.claim_battlefield(&card.image_ref).await {
            warn(&e.to_string());
        }
        step(&format!("host claims {}", card.name));
    }
    if let Some(card) = catalog.battlefields("plaza").first() {
        if let Err(e) = guest.claim_battlefield(&card.image_ref).await {
            warn(&e.to_string());
        }
        step(&format!("guest claims {}", card.name));
    }
    let _ = host
        .adjust_might(MightSlot::OwnFieldOwnCounter, MightChange::Absolute(5))
        .await;
    step("host: 5 might on own field");
    quick::settle(&host, &guest).await;
    show_both(&host, &guest);

    section("Phase 3: Host scores 8");
    for _ in 0..8 {
        let _ = host.adjust_score(1).await;
        quick::settle(&host, &guest).await;
    }
    report_events("Host", &mut host_events);
    report_events("Guest", &mut guest_events);
    show_both(&host, &guest);

    section("Final check");
    convergence_result(&host, &guest);
    step(&format!(
        "winner per host: {:?}, per guest: {:?}",
        host.snapshot().winner(),
        guest.snapshot().winner()
    ));
}

// ─── Race ──────────────────────────────────────────────────────────────────

async fn run_race(extended: bool, seed: Option<u64>) {
    use rand::SeedableRng;

    header("RACE — Random Scoring Until Someone Wins");
    let mut rng = match seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    };

    let Some((host, guest)) = connect(extended).await else {
        return;
    };
    let mut host_events = host.subscribe();
    let mut guest_events = guest.subscribe();

    let mut round = 0;
    while host.snapshot().winner().is_none() && round < 100 {
        round += 1;
        section(&format!("Round {}", round));

        for (label, seat) in [("host", &host), ("guest", &guest)] {
            let delta = rng.gen_range(-1..=3);
            if let Ok(score) = seat.adjust_score(delta).await {
                step(&format!("{} {:+} → {}", label, delta, score));
            }
        }
        quick::settle(&host, &guest).await;

        let view = host.snapshot();
        step(&format!(
            "host sees {}:{}, guest sees {}:{}",
            view.my_score,
            view.their_score,
            guest.snapshot().their_score,
            guest.snapshot().my_score
        ));
        if !mirrored(&view, &guest.snapshot()) {
            warn("views differ");
        }
    }

    report_events("Host", &mut host_events);
    report_events("Guest", &mut guest_events);
    show_both(&host, &guest);
    convergence_result(&host, &guest);
}

// ─── Interactive REPL ──────────────────────────────────────────────────────

fn print_help() {
    println!();
    println!("  {}", "Commands:".bold().underline());
    println!(
        "    {} score <+n|-n>            Change a score",
        "<seat>".bright_cyan()
    );
    println!(
        "    {} might <own|remote> <n>   Change a might counter",
        "<seat>".bright_cyan()
    );
    println!(
        "    {} battlefield <name>       Claim a battlefield card",
        "<seat>".bright_cyan()
    );
    println!(
        "    {} extended <on|off>        Toggle Aspirant's Climb",
        "<seat>".bright_cyan()
    );
    println!(
        "    {} reset                    Reset the game",
        "<seat>".bright_cyan()
    );
    println!("    {}                         Show both views", "state".bright_cyan());
    println!("    {}                          Host snapshot as JSON", "json".bright_cyan());
    println!("    {}                          Host leaves the room", "drop".bright_cyan());
    println!("    {}                          Exit", "quit".bright_cyan());
    println!("  {} is {} or {}", "<seat>".bright_cyan(), "host".bold(), "guest".bold());
    println!();
}

async fn run_interactive() {
    header("INTERACTIVE REPL — Riftlink Two-Seat Table");

    let Some((host, guest)) = connect(false).await else {
        return;
    };
    let mut host_events = host.subscribe();
    let mut guest_events = guest.subscribe();
    let catalog = CardCatalog::sample();
    step(&format!("room {} connected", host.room()));
    print_help();

    loop {
        print!("{}", "riftlink> ".bright_cyan().bold());
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() || input.is_empty() {
            break;
        }
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            continue;
        };

        match command {
            "quit" | "q" | "exit" => break,
            "help" | "h" => print_help(),
            "state" | "s" => {
                show_both(&host, &guest);
                continue;
            }
            "json" => {
                match serde_json::to_string_pretty(&host.snapshot()) {
                    Ok(json) => println!("{}", json),
                    Err(e) => warn(&e.to_string()),
                }
                continue;
            }
            "drop" => {
                if let Err(e) = host.leave().await {
                    warn(&e.to_string());
                }
            }
            "host" | "guest" => {
                let seat = if command == "host" { &host } else { &guest };
                if let Err(message) = seat_command(seat, &parts[1..], &catalog).await {
                    warn(&message);
                    continue;
                }
            }
            other => {
                println!(
                    "  {} Unknown command '{}' — type 'help'",
                    "?".bright_yellow(),
                    other
                );
                continue;
            }
        }

        quick::settle(&host, &guest).await;
        report_events("Host", &mut host_events);
        report_events("Guest", &mut guest_events);
        show_both(&host, &guest);
    }
}

async fn seat_command(seat: &Seat, args: &[&str], catalog: &CardCatalog) -> Result<(), String> {
    let number = |index: usize| -> Result<i32, String> {
        args.get(index)
            .ok_or_else(|| "missing number".to_string())?
            .trim_start_matches('+')
            .parse::<i32>()
            .map_err(|e| e.to_string())
    };

    match args.first().copied() {
        Some("score") => {
            let score = seat
                .adjust_score(number(1)?)
                .await
                .map_err(|e| e.to_string())?;
            step(&format!("{} score → {}", seat.role(), score));
        }
        Some("might") => {
            let slot = match args.get(1).copied() {
                Some("own") => MightSlot::OwnFieldOwnCounter,
                Some("remote") => MightSlot::RemoteFieldOwnCounter,
                _ => return Err("usage: might <own|remote> <n>".to_string()),
            };
            let value = seat
                .adjust_might(slot, MightChange::Delta(number(2)?))
                .await
                .map_err(|e| e.to_string())?;
            step(&format!("{} {} → {}", seat.role(), slot, value));
        }
        Some("battlefield") => {
            let query = args[1..].join(" ");
            let card = catalog
                .battlefields(&query)
                .into_iter()
                .next()
                .ok_or_else(|| format!("no battlefield matches '{}'", query))?;
            seat.claim_battlefield(&card.image_ref)
                .await
                .map_err(|e| e.to_string())?;
            step(&format!("{} claims {}", seat.role(), card.name));
        }
        Some("extended") => {
            let extended = matches!(args.get(1).copied(), Some("on") | Some("true"));
            let threshold = seat
                .set_win_condition(extended)
                .await
                .map_err(|e| e.to_string())?;
            step(&format!("first to {}", threshold.points()));
        }
        Some("reset") => {
            seat.reset().await.map_err(|e| e.to_string())?;
            step(&format!("{} reset the game", seat.role()));
        }
        _ => return Err("usage: <host|guest> <score|might|battlefield|extended|reset> ...".into()),
    }
    Ok(())
}

// ─── Entry point ───────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Demo => run_demo().await,
        Commands::Race { extended, seed } => run_race(extended, seed).await,
        Commands::Interactive => run_interactive().await,
    }
}
