use stress_test::{stress_test_games, stress_test_scaling};
pub mod stress_test;

fn main() {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };
    let converged = rt.block_on(async_main());
    if !converged {
        std::process::exit(1);
    }
}

async fn async_main() -> bool {
    let mut converged = true;

    println!("\n\n╔════════════════════════════════════════════════════════════╗");
    println!("║            ASYNC STRESS TESTS                               ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    // Test 1: a few short games
    let stats = stress_test_games(4, 100).await;
    stats.print();
    converged &= stats.all_converged();

    // Test 2: many long games
    let stats = stress_test_games(50, 1000).await;
    stats.print();
    converged &= stats.all_converged();

    // Test 3: Scaling analysis
    stress_test_scaling(40, 10).await;

    if converged {
        println!("\n✓ All stress tests completed successfully!");
    } else {
        println!("\n✗ Some games diverged");
    }
    converged
}
