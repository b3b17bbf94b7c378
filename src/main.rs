// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use std::env;
use std::time::Instant;
use the_wayfarer::config::{load_and_validate_config, RuntimeBuilder};
use the_wayfarer::engine::RunStatus;
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <scenario1.yaml> [scenario2.yaml ...]", args[0]);
        eprintln!("Example: {} configs/linear-walk.yaml", args[0]);
        eprintln!("Example: RUST_LOG=the_wayfarer=debug {} configs/find-b.yaml configs/friends.yaml", args[0]);
        std::process::exit(1);
    }

    println!("🧭 Wayfarer Walker Runs");
    println!("═══════════════════════");
    println!();

    let mut failures = 0;
    for (i, config_file) in args[1..].iter().enumerate() {
        if i > 0 {
            println!("\n{}", "─".repeat(80));
        }

        match run_scenario(config_file).await {
            Ok(true) => {}
            Ok(false) => failures += 1,
            Err(e) => {
                failures += 1;
                eprintln!("❌ Failed to run {}: {:#}", config_file, e);
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}

/// Run one scenario file. Returns whether the walker run succeeded.
async fn run_scenario(config_file: &str) -> anyhow::Result<bool> {
    let start_time = Instant::now();

    let config = load_and_validate_config(config_file)
        .with_context(|| format!("loading {}", config_file))?;
    let runtime = RuntimeBuilder::from_config(&config)?;

    println!("📋 Scenario: {}", config_file);
    println!("🔧 Dispatch Order: {:?}", config.engine.dispatch_order);
    if let Some(timeout) = config.engine.timeout() {
        println!("⏳ Timeout: {:?}", timeout);
    }
    println!(
        "🗺️  Graph: {} nodes, {} edges",
        runtime.scheduler.graph().node_count(),
        runtime.scheduler.graph().edge_count()
    );

    let Some(result) = runtime.run_spawn().await? else {
        println!("ℹ️  No spawn section, nothing to run");
        return Ok(true);
    };

    let icon = match result.status {
        RunStatus::Completed => "✅",
        RunStatus::Disengaged => "🛑",
        RunStatus::Failed => "❌",
        RunStatus::Cancelled => "⏹️",
    };
    println!("\n📊 Run Results:");
    println!("{} Walker '{}' {:?}", icon, result.walker_type, result.status);
    println!("👣 Steps: {}", result.steps);
    println!("⏱️  Run Time: {:?}", result.duration);
    if let Some(error) = &result.error {
        println!("⚠️  Error: {}", error);
    }

    println!("\n📝 Reports ({}):", result.reports.len());
    for (i, report) in result.reports.as_slice().iter().enumerate() {
        println!("  {}. {}", i + 1, report);
    }
    println!("\n🎒 Final Fields: {}", serde_json::Value::Object(result.final_fields.clone()));

    println!("\n⏱️  Total Time (including config load): {:?}", start_time.elapsed());

    Ok(result.is_success())
}
