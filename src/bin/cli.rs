//! Terminal client for a running DraftDesk server.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use draftdesk::docs;
use draftdesk::fields::{FieldSet, FlatFields};
use draftdesk::handoff::{DocSession, FileStore, Handoff, MemoryStore, StoreError};
use draftdesk::preview::{HttpPreviewClient, PreviewError, PreviewPump};
use draftdesk::render;
use draftdesk::session::{ConversationSession, TurnOutcome, welcome_text};
use draftdesk::transport::{HttpChatTransport, TransportError};

const HANDOFF_DIR: &str = ".draftdesk";
const DEFAULT_EXPORT_FILE: &str = "draftdesk-export.html";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("preview error: {0}")]
    Preview(#[from] PreviewError),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown document type '{0}' (run `draftdesk-cli doctypes`)")]
    UnknownDocType(String),
    #[error("invalid --field '{0}' (expected key=value)")]
    InvalidField(String),
    #[error("no saved session found; draft a document first")]
    NoSavedSession,
}

#[derive(Parser, Debug)]
#[command(name = "draftdesk-cli", about = "DraftDesk drafting assistant CLI")]
struct Cli {
    #[arg(long, env = "DRAFTDESK_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the supported document types.
    Doctypes,
    /// Interactive drafting session against the server.
    Chat {
        /// Document type key, or "unknown" to let the assistant identify it.
        #[arg(long, default_value = docs::UNKNOWN)]
        doc_type: String,
    },
    /// Render a document to HTML from explicit field values.
    Preview {
        #[arg(long)]
        doc_type: String,
        /// Field values as key=value, repeatable.
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render the saved hand-off snapshot to HTML.
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Doctypes => doctypes(),
        Command::Chat { doc_type } => chat(&cli.base_url, doc_type).await,
        Command::Preview { doc_type, fields, out } => preview(&doc_type, &fields, out.as_deref()),
        Command::Export { out } => export(out.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn doctypes() -> Result<(), CliError> {
    for config in docs::supported() {
        println!("{:<18} {:<34} {}", config.key, config.name, config.description);
    }
    Ok(())
}

async fn chat(base_url: &str, doc_type: String) -> Result<(), CliError> {
    if !docs::is_undetermined(&doc_type) && docs::config(&doc_type).is_none() {
        return Err(CliError::UnknownDocType(doc_type));
    }

    let transport = HttpChatTransport::new(base_url)?;
    let pump = PreviewPump::spawn(Arc::new(HttpPreviewClient::new(base_url)?));
    let mut session = ConversationSession::new(doc_type).with_preview(pump.handle());

    println!("{}", welcome_text(session.doc_type()));
    println!("Commands: /preview, /export, /quit\n");

    let opening = session.start(&transport).await;
    report_turn(&session, opening);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt(&session);
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "" => {}
            "/quit" => break,
            "/preview" => println!("{}", pump.state().borrow().markup()),
            "/export" => {
                if try_export(&session)? {
                    break;
                }
            }
            text => {
                let doc_type_before = session.doc_type().to_string();
                let outcome = session.send(text, &transport).await;
                report_turn(&session, outcome);
                if session.doc_type() != doc_type_before {
                    println!("[document identified: {}]", docs::display_name(session.doc_type()));
                }
            }
        }
    }
    Ok(())
}

fn print_prompt(session: &ConversationSession) {
    println!("[{}] you> ", docs::display_name(session.doc_type()));
}

fn report_turn(session: &ConversationSession, outcome: TurnOutcome) {
    match outcome {
        TurnOutcome::Completed | TurnOutcome::Failed => {
            if let Some(reply) = session.messages().last() {
                println!("assistant> {}\n", reply.content);
            }
        }
        TurnOutcome::Ignored => {}
    }
}

/// Export gate: refuse while required fields are missing, otherwise save
/// the hand-off snapshot and write the rendered document.
fn try_export(session: &ConversationSession) -> Result<bool, CliError> {
    let missing = docs::missing_required(session.doc_type(), session.fields());
    if !missing.is_empty() {
        println!("Cannot export yet; missing required fields:");
        for field in missing {
            println!("  - {field}");
        }
        return Ok(false);
    }

    handoff_store().save(&DocSession {
        doc_type: session.doc_type().to_string(),
        fields: session.fields().to_flat(),
    })?;

    let html = render::render_html(session.doc_type(), session.fields());
    std::fs::write(DEFAULT_EXPORT_FILE, html)?;
    println!("Saved session and wrote {DEFAULT_EXPORT_FILE}");
    Ok(true)
}

fn preview(doc_type: &str, raw_fields: &[String], out: Option<&std::path::Path>) -> Result<(), CliError> {
    let mut flat = FlatFields::new();
    for raw in raw_fields {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| CliError::InvalidField(raw.clone()))?;
        flat.insert(key.to_string(), value.to_string());
    }

    let html = render::render_html(doc_type, &FieldSet::from_flat(&flat));
    write_output(&html, out)
}

fn export(out: Option<&std::path::Path>) -> Result<(), CliError> {
    let session = handoff_store().load().ok_or(CliError::NoSavedSession)?;
    let html = render::render_html(&session.doc_type, &FieldSet::from_flat(&session.fields));
    write_output(&html, out)
}

fn handoff_store() -> Handoff {
    Handoff::new(Box::new(FileStore::new(HANDOFF_DIR)), Some(Box::new(MemoryStore::new())))
}

fn write_output(html: &str, out: Option<&std::path::Path>) -> Result<(), CliError> {
    match out {
        Some(path) => {
            std::fs::write(path, html)?;
            println!("Wrote {}", path.display());
        }
        None => println!("{html}"),
    }
    Ok(())
}
