//! Command line front end for the photo-transform form engine
//!
//! Restores a form from stored transform data, prints it as HTML or as the
//! encoded request body, and talks to the web app (submit, login, logout).
//! Logs go to stderr; results go to stdout.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use photo_transform_client::{
    ClientConfig, FormErrors, FormFields, Outcome, PageAction, PhotoClient, SubmitTarget,
};
use photo_transform_core::{PhotoTransform, SchemaStore, TransData};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const BASE_URI_ENV: &str = "PHOTO_TRANSFORM_BASE_URI";

#[derive(Parser)]
#[command(name = "photo-transform", version, about)]
struct Cli {
    /// Client configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the restored form as HTML
    Render {
        /// Stored transform data (JSON); overrides `trans_data_path`
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Print the encoded body of the restored form
    Body {
        #[arg(long)]
        data: Option<PathBuf>,
        /// Extra stored values
        #[arg(long = "set", value_name = "QUALIFIER=ENCODED")]
        set: Vec<String>,
    },
    /// Submit the restored form to `action`
    Submit {
        #[arg(long)]
        action: String,
        /// Update an existing transformed photo (PUT)
        #[arg(long)]
        update: bool,
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Post the login form
    Login {
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
    Logout,
}

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries the command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Render { data } => {
            let engine = restore(&config, data.as_deref(), &[])?;
            println!("{}", engine.to_html());
        }
        Command::Body { data, set } => {
            let engine = restore(&config, data.as_deref(), &set)?;
            let body = engine.create_body()?;
            println!("{}", body.to_json_string()?);
        }
        Command::Submit {
            action,
            update,
            data,
        } => {
            let mut engine = restore(&config, data.as_deref(), &[])?;
            let client = PhotoClient::from_config(&config)?;
            let target = if update {
                SubmitTarget::update(action)
            } else {
                SubmitTarget::create(action)
            };
            let mut sink = FormErrors::default();
            let outcome = client.submit_transform(&mut engine, &target, &mut sink).await;
            report(&outcome, &sink);
        }
        Command::Login { fields } => {
            let fields = parse_pairs(&fields)?.into_iter().collect::<FormFields>();
            let client = PhotoClient::from_config(&config)?;
            let mut sink = FormErrors::default();
            let outcome = client.login(&fields, &mut sink).await;
            report(&outcome, &sink);
        }
        Command::Logout => {
            let client = PhotoClient::from_config(&config)?;
            let mut sink = FormErrors::default();
            let outcome = client.logout(&mut sink).await;
            report(&outcome, &sink);
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ClientConfig> {
    let mut config = match path {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    if let Ok(base_uri) = std::env::var(BASE_URI_ENV) {
        tracing::info!("Using base URI from {BASE_URI_ENV}");
        config.base_uri = base_uri;
    }
    Ok(config.validated()?)
}

/// Builds the form from the schema and the stored data, plus `extra` values.
fn restore(
    config: &ClientConfig,
    data: Option<&Path>,
    extra: &[String],
) -> anyhow::Result<PhotoTransform> {
    let schema = SchemaStore::new(&config.schema_path)
        .get()
        .with_context(|| format!("loading schema {}", config.schema_path.display()))?;

    let mut trans_data = match data.or(config.trans_data_path.as_deref()) {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            TransData::from_json_str(&text)?
        }
        None => TransData::new(),
    };
    for (qualifier, encoded) in parse_pairs(extra)? {
        trans_data.insert(qualifier, encoded);
    }

    let mut engine = PhotoTransform::new(schema, trans_data);
    engine.setup()?;
    Ok(engine)
}

fn parse_pairs(pairs: &[String]) -> anyhow::Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
            _ => bail!("expected NAME=VALUE, got '{pair}'"),
        })
        .collect()
}

fn report(outcome: &Outcome, sink: &FormErrors) {
    for alert in &outcome.alerts {
        println!("alert: {alert}");
    }
    for (field, message) in sink.errors() {
        println!("error [{field}]: {message}");
    }
    if let Some(file_url) = &outcome.file_url {
        println!("file: {file_url}");
    }
    if let Some(qr_url) = &outcome.qr_url {
        println!("qr: {qr_url}");
    }
    match &outcome.action {
        PageAction::Stay => {}
        PageAction::Navigate(url) => println!("navigate: {url}"),
        PageAction::Reload => println!("reload"),
    }
}
