// Command line interface.
// Startup tasks (asset sync, temp cleanup) and translation diagnostics.

use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use serde::Serialize;

use backend_helpers::assets::{AssetSync, RawContentClient};
use backend_helpers::i18n::{LocaleStore, Translator, substitute};
use backend_helpers::storage;
use backend_helpers::{Config, Error, Result};

#[derive(Debug, Parser)]
#[command(
    name = "backend-helpers",
    about = "Locale, static asset and temp directory helpers for the scanner backend",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download missing static files (or all with --force).
    #[command(name = "sync-assets")]
    SyncAssets {
        /// Re-download every file even if present locally.
        #[arg(long)]
        force: bool,
    },

    /// Remove everything inside the temp directory.
    #[command(name = "clean-temp")]
    CleanTemp {
        /// Directory to clean instead of the configured one.
        dir: Option<PathBuf>,
    },

    /// Translate a key.
    Translate(TranslateArgs),

    /// Show which language a request would be served in.
    #[command(name = "pick-lang")]
    PickLang {
        /// Raw query string, e.g. "lang=de".
        #[arg(long)]
        query: Option<String>,
        /// Accept-Language header value.
        #[arg(long)]
        accept_language: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct TranslateArgs {
    pub key: String,

    #[arg(long)]
    pub lang: Option<String>,

    /// Placeholder value as name=value; repeatable.
    #[arg(long = "var", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,
}

fn parse_var(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got {:?}", raw))
}

/// Run a parsed command. Returns whether it succeeded.
pub async fn run(cli: Cli, config: Config) -> Result<bool> {
    match cli.command {
        Commands::SyncAssets { force } => {
            let base = config.raw_base()?;
            let client = RawContentClient::new(config.github_token.as_deref())?;
            let sync = AssetSync::new(client, base);
            let report = sync.ensure_local(&config.manifest, force).await;
            print_json(&report)?;
            Ok(report.is_success())
        }
        Commands::CleanTemp { dir } => {
            let dir = dir
                .or_else(|| config.temp_dir.clone())
                .ok_or_else(|| Error::Config("no temp directory configured".to_string()))?;
            let report = storage::clean(&dir);
            print_json(&report)?;
            Ok(true)
        }
        Commands::Translate(args) => {
            println!("{}", translate_text(&config, &args));
            Ok(true)
        }
        Commands::PickLang {
            query,
            accept_language,
        } => {
            let mut headers = HeaderMap::new();
            if let Some(value) = accept_language {
                let value = HeaderValue::from_str(&value)
                    .map_err(|e| Error::Config(format!("invalid Accept-Language: {}", e)))?;
                headers.insert(ACCEPT_LANGUAGE, value);
            }
            let lang = config.language_picker().pick_from_request(
                query.as_deref(),
                &headers,
                Some(config.content_language.as_str()),
            );
            println!("{}", lang);
            Ok(true)
        }
    }
}

/// Locale tables always fall back to English; CONTENT_LANGUAGE only picks the request language.
fn translator(config: &Config) -> Translator {
    let store = LocaleStore::with_roots(config.locale_roots());
    Translator::new(Arc::new(store))
}

/// Untranslated keys render as the key and are only logged.
fn translate_text(config: &Config, args: &TranslateArgs) -> String {
    let translator = translator(config);
    let lang = args.lang.as_deref().unwrap_or(&config.content_language);
    let values: Vec<(&str, &dyn Display)> = args
        .vars
        .iter()
        .map(|(name, value)| (name.as_str(), value as &dyn Display))
        .collect();
    let lookup = translator.lookup(&args.key, lang);
    if !lookup.is_found() {
        tracing::warn!(key = %args.key, lang, "untranslated key");
    }
    substitute(lookup.into_text(), &values)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
