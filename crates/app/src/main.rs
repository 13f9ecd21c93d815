use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, HttpAuthProvider, HttpRemoteStore};
use ui::{App, AppContext};

const DEFAULT_DB_URL: &str = "sqlite://dscode.sqlite3";
const DEFAULT_SYNC_URL: &str = "https://api.dscode.app/sync";
const DEFAULT_AUTH_URL: &str = "https://api.dscode.app/auth";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    MissingFile { command: &'static str },
    NotConfirmed,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::MissingFile { command } => {
                write!(f, "{command} requires a file path argument")
            }
            ArgsError::NotConfirmed => {
                write!(f, "reset erases all progress; pass --yes to confirm")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  dscode [ui]            launch the desktop app (default)");
    eprintln!("  dscode stats           print completion stats");
    eprintln!("  dscode export [FILE]   write the progress export (stdout by default)");
    eprintln!("  dscode import FILE     replace progress with an exported file");
    eprintln!("  dscode reset --yes     erase all progress");
    eprintln!();
    eprintln!("Common flags:");
    eprintln!("  --db <sqlite_url>      default: {DEFAULT_DB_URL}");
    eprintln!("  --sync-url <url>       default: {DEFAULT_SYNC_URL}");
    eprintln!("  --auth-url <url>       default: {DEFAULT_AUTH_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DSCODE_DB_URL, DSCODE_SYNC_URL, DSCODE_AUTH_URL");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Stats,
    Export,
    Import,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "stats" => Some(Self::Stats),
            "export" => Some(Self::Export),
            "import" => Some(Self::Import),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    sync_url: String,
    auth_url: String,
    file: Option<String>,
    confirmed: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("DSCODE_DB_URL")
            .ok()
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut sync_url =
            std::env::var("DSCODE_SYNC_URL").unwrap_or_else(|_| DEFAULT_SYNC_URL.into());
        let mut auth_url =
            std::env::var("DSCODE_AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.into());
        let mut file = None;
        let mut confirmed = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--sync-url" => sync_url = require_value(args, "--sync-url")?,
                "--auth-url" => auth_url = require_value(args, "--auth-url")?,
                "--yes" => confirmed = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ if file.is_none() => file = Some(arg),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            sync_url,
            auth_url,
            file,
            confirmed,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") || raw.starts_with("sqlite:file:") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means launching the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. The binary owns this glue so the
    // library crates stay path-agnostic.
    prepare_sqlite_file(&parsed.db_url)?;
    let remote = Arc::new(HttpRemoteStore::new(parsed.sync_url.clone()));
    let auth = Arc::new(HttpAuthProvider::new(parsed.auth_url.clone()));
    let services = AppServices::sqlite(&parsed.db_url, remote, auth).await?;

    match cmd {
        Command::Ui => {
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("DSCode")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(AppContext::new(services))
                .launch(App);
            Ok(())
        }
        Command::Stats => {
            let breakdown = services.progress.breakdown();
            println!(
                "Overall: {}/{} ({}%)",
                breakdown.global.completed, breakdown.global.total, breakdown.global.percentage
            );
            for slice in &breakdown.by_difficulty {
                println!(
                    "  {:<8} {}/{} ({}%)",
                    slice.difficulty.label(),
                    slice.stats.completed,
                    slice.stats.total,
                    slice.stats.percentage
                );
            }
            println!();
            for slice in &breakdown.by_topic {
                println!(
                    "  {:<28} {}/{} ({}%)",
                    slice.name, slice.stats.completed, slice.stats.total, slice.stats.percentage
                );
            }
            Ok(())
        }
        Command::Export => {
            let json = services.progress.export_json();
            match parsed.file {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    eprintln!("exported progress to {path}");
                }
                None => println!("{json}"),
            }
            Ok(())
        }
        Command::Import => {
            let path = parsed
                .file
                .ok_or(ArgsError::MissingFile { command: "import" })?;
            let payload = std::fs::read_to_string(&path)?;
            services.progress.import_json(&payload).await?;
            eprintln!(
                "imported {} completed problems from {path}",
                services.progress.completed_count()
            );
            Ok(())
        }
        Command::Reset => {
            if !parsed.confirmed {
                return Err(ArgsError::NotConfirmed.into());
            }
            services.progress.reset().await;
            eprintln!("all progress erased");
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" || db_url.starts_with("sqlite:file:") {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dioxus::logger::initialize_default();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
