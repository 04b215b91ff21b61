// Terminal scan station
//
// A keyboard-wedge barcode scanner types the decoded text and a newline,
// exactly like a keyboard, so reading stdin line by line is the whole
// input driver. Each line is one scan event fed to the workflow; two
// slash-commands inspect and clear the local history.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use server_core::domains::scanning::{ScanWorkflow, SessionStore, Status};
use server_core::kernel::{FileStore, HcMailAdapter, TerminalBell};
use server_core::Config;

#[derive(Parser)]
#[command(name = "scan_station", about = "Scan letters and mark them mailed")]
struct Args {
    /// Upstream mail API base URL (overrides UPSTREAM_URL)
    #[arg(long)]
    upstream: Option<String>,

    /// Directory for the persisted API key and history (overrides DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// API key to use for this session (also accepted as a scanned
    /// credential once running)
    #[arg(long)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let store = match args.data_dir.or(config.data_dir) {
        Some(dir) => FileStore::open(dir)?,
        None => FileStore::open_default()?,
    };
    let session = Arc::new(SessionStore::load(store));
    if let Some(api_key) = args.api_key {
        session.set_api_key(&api_key).await;
    }

    let upstream = args.upstream.unwrap_or(config.upstream_url);
    let client = hcmail::MailApiClient::new(upstream.as_str())
        .with_context(|| format!("invalid upstream URL {upstream}"))?;
    let workflow = ScanWorkflow::new(
        Arc::clone(&session),
        Arc::new(HcMailAdapter::new(Arc::new(client))),
        Arc::new(TerminalBell),
    );

    if !session.has_api_key().await {
        println!("No API key stored. Scan one or pass --api-key.");
    }
    println!("Ready to scan. Commands: /history, /clear, /quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        match line.as_str() {
            "/quit" => break,
            "/clear" => {
                session.clear_history().await;
                println!("History cleared.");
            }
            "/history" => print_history(&session).await,
            _ => match workflow.handle_scan(&line).await {
                Some(transition) => {
                    let id = transition
                        .letter_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "--".to_string());
                    println!("[{}] {}  {}", status_label(transition.status), id, transition.message);
                }
                None => println!("(scan dropped, still processing the previous one)"),
            },
        }
    }

    Ok(())
}

async fn print_history(session: &SessionStore) {
    let snapshot = session.snapshot().await;
    if snapshot.history.is_empty() {
        println!("No scans recorded.");
        return;
    }
    // Most recent first.
    for entry in snapshot.history.iter().rev() {
        println!(
            "{}  {}  {:<9}  {}",
            entry.ts.format("%Y-%m-%d %H:%M:%S"),
            entry.id,
            format!("{:?}", entry.status).to_lowercase(),
            entry.message
        );
    }
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Idle => "idle",
        Status::Processing => "processing",
        Status::Success => "success",
        Status::Error => "error",
        Status::Duplicate => "duplicate",
        Status::CredentialUpdated => "key updated",
    }
}
