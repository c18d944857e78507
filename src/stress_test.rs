use async_stream::stream;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use futures::stream::Stream;
use futures::stream::StreamExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use riftlink_sdk::client::quick;
use riftlink_sdk::game::{GameSnapshot, MightChange, MightSlot, Role};
use riftlink_sdk::{ClientConfig, MemoryTransport, Session};
use std::sync::Arc;
use std::time::{Duration, Instant};

type Seat = Arc<Session<MemoryTransport>>;

const BATTLEFIELDS: [&str; 3] = [
    "https://cards.riftlink.dev/battlefields/grove-of-the-god-willow.png",
    "https://cards.riftlink.dev/battlefields/monastery-of-hirana.png",
    "https://cards.riftlink.dev/battlefields/void-gate.png",
];

/// Statistics collected during stress testing
#[derive(Clone, Debug)]
pub struct StressTestStats {
    pub started_at: DateTime<Utc>,
    pub num_games: usize,
    pub operations_per_game: usize,
    pub frames_delivered: usize,
    pub rejected_operations: usize,
    pub converged_games: usize,
    pub total_time: Duration,
    pub ops_per_second: f64,
}

impl StressTestStats {
    pub fn all_converged(&self) -> bool {
        self.converged_games == self.num_games
    }

    pub fn print(&self) {
        println!("\n╔════════════════════════════════════════════════════════════╗");
        println!("║              Stress Test Statistics                         ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║  Started:                   {:>38} ║", self.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
        println!("║  Games:                     {:>38} ║", self.num_games);
        println!("║  Operations per Game:       {:>38} ║", self.operations_per_game);
        println!("║  Frames Delivered:          {:>38} ║", self.frames_delivered);
        println!("║  Rejected Operations:       {:>38} ║", self.rejected_operations);
        println!("║  Converged Games:           {:>38} ║", format!("{}/{}", self.converged_games, self.num_games));
        println!("║  Total Time:                {:>39}s ║", format!("{:.3}", self.total_time.as_secs_f64()));
        println!("║  Operations/Second:         {:>38.0} ║", self.ops_per_second);
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

/// A local action taken by one seat.
#[derive(Clone, Copy, Debug)]
enum LocalOp {
    Score(i32),
    Might(MightSlot, i32),
    Battlefield(usize),
    /// Shared fields; issued only once both queues are empty.
    Threshold(bool),
    Reset,
}

impl LocalOp {
    fn is_barrier(&self) -> bool {
        matches!(self, LocalOp::Threshold(_) | LocalOp::Reset)
    }
}

/// Generator that yields which seat acts, what it does, and how much of
/// the inbound backlog is delivered afterwards.
fn game_op_generator(seed: u64, num_ops: usize) -> impl Stream<Item = (Role, LocalOp, Delivery)> {
    stream! {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..num_ops {
            let seat = if rng.gen_bool(0.5) { Role::Host } else { Role::Guest };
            let op = match rng.gen_range(0..100) {
                0..=54 => LocalOp::Score(rng.gen_range(-2..=3)),
                55..=84 => {
                    let slot = MightSlot::OWNED[rng.gen_range(0..MightSlot::OWNED.len())];
                    LocalOp::Might(slot, rng.gen_range(-5..=10))
                }
                85..=92 => LocalOp::Battlefield(rng.gen_range(0..BATTLEFIELDS.len())),
                93..=97 => LocalOp::Threshold(rng.gen_bool(0.5)),
                _ => LocalOp::Reset,
            };
            let delivery = match rng.gen_range(0..4) {
                0 => Delivery::None,
                1 => Delivery::Host,
                2 => Delivery::Guest,
                _ => Delivery::Both,
            };
            yield (seat, op, delivery);
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Delivery {
    None,
    Host,
    Guest,
    Both,
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

/// Winners agree unless both are over the line, where each seat reports
/// itself.
fn winners_agree(host: &GameSnapshot, guest: &GameSnapshot) -> bool {
    let both_over = host.i_am_winning && host.they_are_winning;
    both_over || host.winner() == guest.winner()
}

struct GameResult {
    frames: usize,
    rejected: usize,
    converged: bool,
}

async fn apply(seat: &Seat, op: LocalOp) -> bool {
    let result = match op {
        LocalOp::Score(delta) => seat.adjust_score(delta).await.map(|_| ()),
        LocalOp::Might(slot, delta) => seat
            .adjust_might(slot, MightChange::Delta(delta))
            .await
            .map(|_| ()),
        LocalOp::Battlefield(index) => seat.claim_battlefield(BATTLEFIELDS[index]).await,
        LocalOp::Threshold(extended) => seat.set_win_condition(extended).await.map(|_| ()),
        LocalOp::Reset => seat.reset().await,
    };
    result.is_ok()
}

/// One game between a host and a guest with random interleavings of local
/// actions and partial deliveries.
async fn play_game(seed: u64, num_ops: usize) -> Option<GameResult> {
    let (host, guest) =
        quick::connected_pair(ClientConfig::default(), ClientConfig::default())
            .await
            .ok()?;

    let mut frames = 0;
    let mut rejected = 0;
    let mut ops = Box::pin(game_op_generator(seed, num_ops));

    while let Some((role, op, delivery)) = ops.next().await {
        let seat = if role == Role::Host { &host } else { &guest };

        if op.is_barrier() {
            frames += quick::settle(&host, &guest).await;
        }
        if !apply(seat, op).await {
            rejected += 1;
        }
        if op.is_barrier() {
            frames += quick::settle(&host, &guest).await;
            continue;
        }

        frames += match delivery {
            Delivery::None => 0,
            Delivery::Host => host.pump().await,
            Delivery::Guest => guest.pump().await,
            Delivery::Both => host.pump().await + guest.pump().await,
        };
    }

    frames += quick::settle(&host, &guest).await;
    let (host_view, guest_view) = (host.snapshot(), guest.snapshot());

    Some(GameResult {
        frames,
        rejected,
        converged: mirrored(&host_view, &guest_view) && winners_agree(&host_view, &guest_view),
    })
}

/// Play `num_games` games side by side on the current task.
pub async fn stress_test_games(num_games: usize, ops_per_game: usize) -> StressTestStats {
    println!("\n╔════════════════════════════════════════════════════════════╗");
    println!("║        Two-Seat Convergence Stress Test (Async)            ║");
    println!("║  Games: {} | Ops/Game: {} ║", num_games, ops_per_game);
    println!("╚════════════════════════════════════════════════════════════╝");

    let started_at = Utc::now();
    let start = Instant::now();
    let mut seeds = StdRng::from_entropy();

    println!("\n[Phase 1/2] Playing games...");
    let games = (0..num_games).map(|_| play_game(seeds.gen(), ops_per_game));
    let results = join_all(games).await;
    println!("[Phase 1/2] ✓ Completed");

    println!("[Phase 2/2] Checking convergence...");
    let mut frames_delivered = 0;
    let mut rejected_operations = 0;
    let mut converged_games = 0;
    for result in results.iter().flatten() {
        frames_delivered += result.frames;
        rejected_operations += result.rejected;
        if result.converged {
            converged_games += 1;
        }
    }
    println!("[Phase 2/2] ✓ Completed");

    let total_time = start.elapsed();
    let total_operations = num_games * ops_per_game + frames_delivered;
    let ops_per_second = total_operations as f64 / total_time.as_secs_f64().max(f64::EPSILON);

    StressTestStats {
        started_at,
        num_games,
        operations_per_game: ops_per_game,
        frames_delivered,
        rejected_operations,
        converged_games,
        total_time,
        ops_per_second,
    }
}

/// Stress test at increasing game counts
pub async fn stress_test_scaling(max_games: usize, step_size: usize) {
    println!("\n╔════════════════════════════════════════════════════════════╗");
    println!("║      Scaling Analysis - Games Played Side by Side          ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    let mut current_games = step_size;
    while current_games <= max_games {
        let stats = stress_test_games(current_games, 200).await;
        stats.print();
        current_games += step_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_random_games_converge() {
        let stats = stress_test_games(8, 150).await;
        assert_eq!(stats.converged_games, 8);
        assert!(stats.frames_delivered > 0);
    }

    #[tokio::test]
    async fn test_seeded_game_is_reproducible() {
        let first = play_game(7, 100).await.unwrap();
        let second = play_game(7, 100).await.unwrap();
        assert!(first.converged && second.converged);
        assert_eq!(first.rejected, second.rejected);
    }
}
