//! statetree CLI
//!
//! Opens a state store, runs one command against it and saves the result
//! when a save path is given. Responses go to stdout as JSON, logs to stderr.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use statetree::dispatch::internalctl;
use statetree::ops::SetPayload;
use statetree::protocol::Response;
use statetree::{Config, Dispatcher, StateStore};
use tracing_subscriber::{fmt, EnvFilter};

/// statetree CLI
#[derive(Parser, Debug)]
#[command(name = "statetree-ctl")]
#[command(about = "Query and update a hierarchical state tree")]
#[command(version)]
struct Args {
    /// JSON snapshot to initialize from
    #[arg(long)]
    config_file_load: Option<PathBuf>,

    /// JSON snapshot to save to after a mutating command
    #[arg(long)]
    config_file_save: Option<PathBuf>,

    /// Directory for tree dumps (created on startup)
    #[arg(long)]
    debug_to_dir: Option<PathBuf>,

    /// Description stored at /this/desc
    #[arg(long, default_value = "")]
    desc: String,

    /// Diagnostic verbosity (0-3)
    #[arg(short, long, default_value = "0")]
    verbosity: u8,

    /// Extra launch parameter stored under /this/args (repeatable)
    #[arg(long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    args: Vec<(String, String)>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read a leaf or directory
    Get {
        /// Tree path
        var: String,
    },

    /// Write a value, or merge a JSON object
    Set {
        /// Tree path
        var: String,

        /// Value or JSON object
        value: String,

        /// Always store the value as a single leaf
        #[arg(long)]
        scalar: bool,
    },

    /// Replace every leaf equal to TARGET ("ENV" reads %TARGET% from the environment)
    Replace {
        /// Value to search for
        target: String,

        /// Replacement value
        value: String,
    },

    /// Answer newline-delimited JSON requests from stdin
    Batch,

    /// Copy the tree onto disk under the debug directory
    Dump,
}

fn main() {
    let args = Args::parse();

    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(args.verbosity)));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(io::stderr)
        .init();

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(2);
        }
    }
}

/// Run the command; `Ok(false)` when the request itself failed
fn run(args: Args) -> statetree::Result<bool> {
    let mut builder = Config::builder()
        .version(statetree::VERSION)
        .desc(&args.desc)
        .verbosity(args.verbosity);
    if let Some(path) = &args.config_file_load {
        builder = builder.config_file_load(path);
    }
    if let Some(path) = &args.config_file_save {
        builder = builder.config_file_save(path);
    }
    if let Some(path) = &args.debug_to_dir {
        builder = builder.debug_to_dir(path);
    }
    for (key, value) in &args.args {
        builder = builder.arg(key, value);
    }

    let store = Arc::new(StateStore::open(builder.build())?);
    let dispatcher = Dispatcher::new(Arc::clone(&store));

    let (ok, mutated) = match args.command {
        Commands::Get { var } => {
            let response = dispatcher.process(&meta_request(&var, "get", Value::String("value".into())));
            (print_response(&response)?, false)
        }
        Commands::Set { var, value, scalar } => {
            let response = if scalar {
                match store.set(&var, &SetPayload::Scalar(value)) {
                    Ok(ret) => Response::ok(Value::Object(ret)),
                    Err(e) => {
                        tracing::warn!("set on {} failed: {}", var, e);
                        Response::failed()
                    }
                }
            } else {
                dispatcher.process(&meta_request(&var, "set", Value::String(value)))
            };
            (print_response(&response)?, true)
        }
        Commands::Replace { target, value } => {
            let response =
                dispatcher.process(&meta_request(&target, "valueReplace", Value::String(value)));
            (print_response(&response)?, true)
        }
        Commands::Batch => (run_batch(&dispatcher)?, true),
        Commands::Dump => match store.dump_debug()? {
            Some((dir, written)) => {
                println!("{} leaves written to {}", written, dir.display());
                (true, false)
            }
            None => {
                tracing::warn!("No debug directory configured, nothing dumped");
                (false, false)
            }
        },
    };

    if mutated {
        store.save_configured()?;
    }

    Ok(ok)
}

/// Answer one request per stdin line; `false` if any request failed
fn run_batch(dispatcher: &Dispatcher) -> statetree::Result<bool> {
    let stdin = io::stdin();
    let mut all_ok = true;

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(line) {
            Ok(request) => dispatcher.process(&request),
            Err(e) => {
                tracing::warn!("Skipping unparsable request: {}", e);
                Response::failed()
            }
        };
        all_ok &= print_response(&response)?;
    }

    Ok(all_ok)
}

fn meta_request(var: &str, operator: &str, value: Value) -> Value {
    let mut meta = Map::new();
    meta.insert("var".to_string(), Value::String(var.to_string()));
    meta.insert(operator.to_string(), value);
    internalctl(meta)
}

fn print_response(response: &Response) -> statetree::Result<bool> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &response.to_json())?;
    writeln!(stdout)?;
    Ok(response.status)
}

fn level_for(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,statetree={}", level)
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", raw))
}
