//! Effect Router demo - a terminal front end for the demo registry
//!
//! Reads commands from stdin, prints the rendered state after every
//! dispatch, and logs as JSON to stderr.

use effect_router::config::RuntimeConfig;
use effect_router::demo::{self, Command, DemoApp, DemoExecutor};
use effect_router::error::RuntimeError;
use effect_router::runtime::{EngineRuntime, RuntimeHandle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "effect_router=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = RuntimeConfig::from_env();
    tracing::info!(
        channel_capacity = config.channel_capacity,
        effect_delay_ms = u64::try_from(config.effect_delay.as_millis()).unwrap_or(u64::MAX),
        "Configuration loaded"
    );

    let (runtime, handle) =
        EngineRuntime::<DemoApp, _>::new(&config, DemoExecutor::new(config.effect_delay));
    let runtime = runtime.with_observer(|state| println!("\n{}\n", demo::view(state)));

    println!("{}", demo::HELP);
    let input = tokio::spawn(read_commands(handle));

    let state = runtime.run().await;
    input.await??;

    tracing::info!(
        counter = state.counter.value,
        pending_numbers = state.number_picker.len(),
        pending_colors = state.color_picker.len(),
        "Exiting"
    );
    Ok(())
}

/// Forward stdin commands until `quit` or end of input, then stop the runtime
async fn read_commands(handle: RuntimeHandle<demo::AppMsg>) -> Result<(), RuntimeError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match demo::parse_command(&line) {
            Some(Command::Send(msg)) => handle.send(msg).await?,
            Some(Command::Help) => println!("{}", demo::HELP),
            Some(Command::Quit) => break,
            None => println!("unrecognized command: {}", line.trim()),
        }
    }

    handle.shutdown();
    Ok(())
}
