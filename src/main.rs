// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context};
use serde_json::Value;
use std::env;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use the_handoff::config::RuntimeBuilder;
use the_handoff::types::{RequestId, WorkflowEvent, WorkflowEvents};
use tracing_subscriber::EnvFilter;

/// Parse a CLI argument as JSON, falling back to a plain string.
fn parse_input(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Print each event and collect the requests that need an answer.
fn report(events: WorkflowEvents) -> Vec<(RequestId, Value)> {
    let mut requests = Vec::new();
    for event in events {
        match event {
            WorkflowEvent::Output {
                source_executor_id,
                data,
            } => {
                println!("🎯 Output from {}: {}", source_executor_id, data);
            }
            WorkflowEvent::Status { state } => {
                println!("📍 Status: {}", state);
            }
            WorkflowEvent::RequestInfo {
                request_id,
                source_executor_id,
                request_type,
                data,
            } => {
                println!(
                    "❓ {} asks '{}' (request {})",
                    source_executor_id, request_type, request_id
                );
                requests.push((request_id, data));
            }
        }
    }
    requests
}

/// Prompt on stdin for each request. The prompt text comes from `data.prompt` when present.
fn ask(requests: &[(RequestId, Value)]) -> anyhow::Result<Vec<(RequestId, Value)>> {
    let stdin = io::stdin();
    let mut answers = Vec::with_capacity(requests.len());

    for (request_id, data) in requests {
        let prompt = data
            .get("prompt")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| data.to_string());
        print!("   {} > ", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            bail!("stdin closed with {} request(s) unanswered", requests.len() - answers.len());
        }
        answers.push((request_id.clone(), parse_input(line.trim())));
    }
    Ok(answers)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("the_handoff=info,warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <workflow.yaml|workflow.toml> [input]", args[0]);
        eprintln!("Example: {} configs/guessing-game.yaml", args[0]);
        eprintln!("Example: {} configs/approval-relay.toml \"deploy to prod\"", args[0]);
        std::process::exit(1);
    }

    let config_file = &args[1];
    let input = args.get(2).map(|raw| parse_input(raw)).unwrap_or(Value::Null);

    let start_time = Instant::now();
    let runtime = RuntimeBuilder::from_file(config_file)
        .with_context(|| format!("failed to load workflow from {}", config_file))?;

    println!("🤝 The Handoff");
    println!("═══════════════════════════════════");
    println!("📋 Configuration: {}", config_file);
    println!("🚪 Start: {} ({})", runtime.workflow().start_executor(), runtime.input_type());
    println!("⚙️  Status Reporting: {:?}", runtime.run_options().status_reporting);
    println!();

    let mut run = runtime.new_run();
    let events = run.start(runtime.input_type(), input).await?;
    let mut requests = report(events);
    let mut rounds = 0usize;

    while !requests.is_empty() {
        let answers = ask(&requests)?;
        let outcome = run.resume(answers).await?;
        for rejected in &outcome.rejected {
            eprintln!("⚠️  {}", rejected);
        }
        requests = report(outcome.events);
        rounds += 1;
    }

    println!();
    println!("🏁 Final State: {}", run.state());
    println!("🔁 Resume Rounds: {}", rounds);
    println!("🔢 Supersteps: {}", run.superstep());
    println!("⏱️  Total Time: {:?}", start_time.elapsed());

    Ok(())
}
