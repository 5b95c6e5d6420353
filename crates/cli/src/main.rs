// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `brr`: a diagnostic CLI for the Bundle Runtime Router. Exercises the
//! router, loader, and dispatcher in-process against fake backends — no
//! network, no real CRDT engine — for local inspection and debugging.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod exit_error;
mod output;
mod session;

use clap::{Parser, Subcommand};
use exit_error::ExitError;
use output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brr", about = "Diagnostic CLI for the Bundle Runtime Router", version)]
struct Cli {
    #[arg(long, value_enum, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a request path the way the router would.
    Route {
        path: String,
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        websocket: bool,
        #[arg(long)]
        serve_local: bool,
        #[arg(long, default_value = "http://localhost:4001")]
        dev_proxy_base: String,
    },
    /// Parse a manifest file and print the defaults the loader would derive.
    Manifest { file: PathBuf },
    /// Load a manifest-only fake bundle, then dispatch one message against it.
    Dispatch {
        /// Path to a JSON file containing `{ rootId, entrypoints, networkUris }`.
        manifest: PathBuf,
        #[arg(long)]
        launcher_bundle_id: String,
        #[arg(long)]
        ws_url: Option<String>,
        /// The operation to dispatch, e.g. `{"type":"readFile","path":"/a"}`.
        op: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    if let Err(err) = run().await {
        if let Some(exit_error) = err.downcast_ref::<ExitError>() {
            eprintln!("error: {}", exit_error.message);
            std::process::exit(exit_error.code);
        }
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Route { path, query, websocket, serve_local, dev_proxy_base } => {
            commands::route::handle(&path, &query, websocket, serve_local, &dev_proxy_base, cli.format)
        }
        Command::Manifest { file } => commands::manifest::handle(&file, cli.format),
        Command::Dispatch { manifest, launcher_bundle_id, ws_url, op } => {
            commands::dispatch::handle(&manifest, &launcher_bundle_id, ws_url.as_deref(), &op, cli.format).await
        }
    }
}
