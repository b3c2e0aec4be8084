mod core;

use clap::Parser;

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::counter::action::{qualify, CounterAction};
use crate::core::counter::selector::SELECT_COUNT;
use crate::core::store::{get_store_config, Dispatched, Store, StoreError};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Starting value of the counter
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    initial: i64,
    /// Delay before `incrementAsync` dispatches, in milliseconds
    #[arg(short, long, default_value_t = 1000)]
    delay_ms: u64,
    #[arg(long, default_value = "./logs")]
    log_dir: PathBuf,
    /// Actions to dispatch in order, as `name`, `name=amount` or a JSON
    /// action (e.g. `increment incrementByAmount=5 incrementAsync=10`)
    #[arg(allow_negative_numbers = true)]
    actions: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_command_line_args();

    let _guard = init_tracing(&args.log_dir)?;

    let mut config = get_store_config();
    config.initial_value = args.initial;
    config.async_delay = Duration::from_millis(args.delay_ms);
    let store = Store::new(config);

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };
    run_actions(&store, &args.actions, interrupt).await?;

    let state = store.state().await;
    println!("{}", serde_json::to_string_pretty(&state)?);
    println!("count: {}", store.select_named(SELECT_COUNT).await?);

    Ok(())
}

fn parse_command_line_args() -> Args {
    Args::parse()
}

fn init_tracing(log_dir: &std::path::Path) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let app_name = concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION")).to_string();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_appender = tracing_appender::rolling::daily(log_dir, "trace.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let bunyan_formatting_layer = BunyanFormattingLayer::new(app_name, non_blocking);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(bunyan_formatting_layer)
        .try_init()?;

    Ok(guard)
}

/// Dispatches every action in order, then waits for the delayed ones.
/// Delayed dispatches still pending when `interrupt` completes are cancelled.
async fn run_actions(
    store: &Store,
    actions: &[String],
    interrupt: impl Future<Output = ()>,
) -> Result<(), StoreError> {
    let mut pending = Vec::new();

    for arg in actions {
        let (name, payload) = parse_action_arg(arg)?;
        match store.dispatch_named(&name, payload).await? {
            Dispatched::Applied(counter) => tracing::debug!("{} -> {}", name, counter.value),
            Dispatched::Scheduled(delayed) => pending.push(delayed),
        }
    }

    tokio::pin!(interrupt);
    let mut interrupted = false;
    for delayed in pending.iter_mut() {
        tokio::select! {
            result = delayed.wait() => {
                result?;
            }
            _ = &mut interrupt => {
                interrupted = true;
            }
        }
        if interrupted {
            break;
        }
    }

    if interrupted {
        let unfinished = pending.iter().filter(|delayed| !delayed.is_finished()).count();
        tracing::info!("Interrupted, cancelling {} pending dispatches", unfinished);
        for delayed in &pending {
            delayed.abort();
        }
    }
    Ok(())
}

/// Splits `name=amount` into a qualified action name and its payload.
/// Arguments starting with `{` are read as a JSON action.
pub(crate) fn parse_action_arg(arg: &str) -> Result<(String, Option<i64>), StoreError> {
    if arg.trim_start().starts_with('{') {
        let action = CounterAction::from_json(arg)?;
        return Ok((action.name().to_string(), action.payload()));
    }
    match arg.split_once('=') {
        None => Ok((qualify(arg), None)),
        Some((name, value)) => {
            let name = qualify(name);
            let amount = value.trim().parse::<i64>().map_err(|_| StoreError::InvalidPayload {
                name: name.clone(),
                value: value.to_string(),
            })?;
            Ok((name, Some(amount)))
        }
    }
}
