//! main - replays a decoded GTP-C call flow and prints each node's sessions and bearers

use anyhow::{Result, anyhow, ensure};
use bearer_flow::{Config, DeleteSessionPolicy, NodeState, ReplayEngine};
use clap::Parser;
use gtpc::{CallFlowMessage, NodeId};
use slog::{Drain, Logger, info, o};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Decoded call flow to replay.  A JSON array of messages if the name ends in .json,
    /// otherwise TOML with one [[message]] table per message.
    #[arg(long)]
    trace: String,

    /// TOML file of replay options.  Options not in the file take their defaults.
    #[arg(long)]
    config: Option<String>,

    /// Remove sessions on the Delete Session Request rather than waiting for the Response.
    #[arg(long)]
    eager_session_delete: bool,

    /// Never pair pending bearers with Response bearers by position alone.
    #[arg(long)]
    no_positional_fallback: bool,

    /// Print only the state after this many messages.  0 is the empty initial state.
    #[arg(long)]
    step: Option<usize>,

    /// Print only this node's sessions.
    #[arg(long)]
    node: Option<String>,

    /// Print JSON rather than text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    exit_on_panic();
    let logger = init_logging();
    let args = Args::parse();

    let mut config = match args.config {
        Some(ref filename) => bearer_flow::load_config_file(filename, &logger)?,
        None => Config::default(),
    };
    if args.eager_session_delete {
        config.delete_session_policy = DeleteSessionPolicy::Eager;
    }
    if args.no_positional_fallback {
        config.positional_fallback = false;
    }
    let messages = bearer_flow::load_trace_file(&args.trace, &logger)?;
    let node = args.node.as_deref().map(NodeId::from);
    if let Some(ref node) = node {
        check_node(node, &messages)?;
    }

    let history = ReplayEngine::new(config, logger.clone()).replay(&messages);
    info!(logger, "Replayed {} steps", history.len());

    let steps = match args.step {
        Some(step) => step..=step,
        None => 0..=history.len(),
    };
    for step in steps {
        let state = history.at_step(step).ok_or_else(|| {
            anyhow!(
                "Step {step} is beyond the end of the call flow ({} messages)",
                history.len()
            )
        })?;
        let heading = match step.checked_sub(1).and_then(|i| messages.get(i)) {
            Some(cf) => format!(
                "Step {step}: #{} {} {} -> {}",
                cf.id, cf.procedure, cf.src_node, cf.dst_node
            ),
            None => format!("Step {step}: initial state"),
        };
        if args.json {
            println!("{}", to_json(state, node.as_ref())?);
        } else {
            println!("{heading}");
            print_state(state, node.as_ref());
        }
    }
    Ok(())
}

fn to_json(state: &NodeState, node: Option<&NodeId>) -> Result<String> {
    Ok(match node {
        Some(node) => serde_json::to_string_pretty(&state.sessions(node).collect::<Vec<_>>())?,
        None => serde_json::to_string_pretty(state)?,
    })
}

fn print_state(state: &NodeState, node: Option<&NodeId>) {
    let Some(node) = node else {
        print!("{state}");
        return;
    };
    println!("{} ({:?})", node, state.node_role(node));
    for session in state.sessions(node) {
        println!("  LBI {}", session.lbi);
        for bearer in session.bearers() {
            println!("    {bearer}");
        }
    }
}

fn check_node(node: &NodeId, messages: &[CallFlowMessage]) -> Result<()> {
    ensure!(
        messages.iter().any(|cf| cf.nodes().any(|n| n == node)),
        "Node {node} does not appear in the call flow"
    );
    Ok(())
}

fn init_logging() -> Logger {
    // Use info level logging by default
    if std::env::var("RUST_LOG").is_err() {
        unsafe { std::env::set_var("RUST_LOG", "info") }
    }
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = slog_envlogger::new(drain);
    slog::Logger::root(drain, o!())
}

fn exit_on_panic() {
    let orig_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        orig_hook(panic_info);
        std::process::exit(1);
    }));
}
