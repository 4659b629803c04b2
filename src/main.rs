//! MATKA — operator desk binary.
//!
//! Loads configuration, initialises structured logging, opens the JSON
//! book and runs one desk command against it.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing::info;

use matka::ank::panel::{digit_panel, jodi_grid, AnkPanel};
use matka::classify::PattiKind;
use matka::config::AppConfig;
use matka::desk::OperatorDesk;
use matka::exposure::{CategoryExposure, ExposureReport};
use matka::round::RoundStateEngine;
use matka::storage::JsonBookStore;
use matka::types::{GameType, Round, Session};

#[derive(Parser, Debug)]
#[command(name = "matka")]
#[command(about = "Matka operator desk: exposure reports, previews and result declaration", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new round in the book
    NewRound {
        #[arg(long)]
        id: String,
        #[arg(long)]
        market: String,
        /// Draw date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// Exposure per category and key
    Report {
        #[arg(long)]
        round: String,
        /// Restrict to one session (open|close)
        #[arg(long)]
        session: Option<Session>,
    },
    /// Ank panels for the patti categories, single digits and jodi
    Panels {
        #[arg(long)]
        round: String,
        #[arg(long)]
        session: Option<Session>,
    },
    /// What is at stake if NUMBER is declared for SESSION
    Preview {
        #[arg(long)]
        round: String,
        #[arg(long)]
        session: Session,
        #[arg(long)]
        number: String,
    },
    /// Declare the opening pana
    DeclareOpen {
        #[arg(long)]
        round: String,
        #[arg(long)]
        number: String,
    },
    /// Declare the closing pana
    DeclareClose {
        #[arg(long)]
        round: String,
        #[arg(long)]
        number: String,
    },
    /// Clear both declarations
    Clear {
        #[arg(long)]
        round: String,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    init_logging();

    let cfg = if Path::new(&cli.config).exists() {
        AppConfig::load(&cli.config)?
    } else {
        info!(path = %cli.config, "No config file, using defaults");
        AppConfig::default()
    };

    info!(
        desk = %cfg.desk.name,
        store = %cfg.desk.store_path,
        require_open_before_close = cfg.rounds.require_open_before_close,
        "MATKA desk starting"
    );

    let mut store = JsonBookStore::open(&cfg.desk.store_path)
        .with_context(|| format!("Failed to open book {}", cfg.desk.store_path))?;

    if let Command::NewRound { id, market, date } = &cli.command {
        let round = Round::new(id, market, *date);
        store.insert_round(round.clone())?;
        return print_round(&round, cli.json);
    }

    let mut desk = OperatorDesk::new(store, RoundStateEngine::new(cfg.round_policy()));

    match cli.command {
        Command::NewRound { .. } => Ok(()),
        Command::Report { round, session } => {
            let report = desk.report(&round, session)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, cfg.exposure.top_n, &cfg.desk.currency);
            }
            Ok(())
        }
        Command::Panels { round, session } => {
            let report = desk.report(&round, session)?;
            print_panels(&report, cli.json)
        }
        Command::Preview { round, session, number } => {
            let summary = desk.preview(&round, session, &number)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{summary}");
                for hit in &summary.hits {
                    println!(
                        "  {:<12} {:<8} {:>12.2} {} {:>4} wagers {:>4} bettors",
                        hit.category.to_string(),
                        hit.key,
                        hit.amount,
                        cfg.desk.currency,
                        hit.count,
                        hit.bettor_count,
                    );
                }
            }
            Ok(())
        }
        Command::DeclareOpen { round, number } => {
            let r = desk.declare_open(&round, &number)?;
            print_round(&r, cli.json)
        }
        Command::DeclareClose { round, number } => {
            let r = desk.declare_close(&round, &number)?;
            print_round(&r, cli.json)
        }
        Command::Clear { round } => {
            let r = desk.clear_result(&round)?;
            print_round(&r, cli.json)
        }
    }
}

fn print_round(round: &Round, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(round)?);
    } else {
        println!("{round}");
    }
    Ok(())
}

/// Human-readable exposure summary with the hottest keys per category.
fn print_report(report: &ExposureReport, top_n: usize, currency: &str) {
    println!("{report}");
    for game in GameType::ALL {
        let Some(cat) = report.category(*game).filter(|c| !c.is_empty()) else {
            continue;
        };
        println!(
            "{:<14} {:>12.2} {currency} {:>6} wagers {:>5} bettors",
            game.to_string(),
            cat.total_amount,
            cat.total_count,
            cat.bettor_count(),
        );
        for (key, item) in report.top_items(*game, top_n) {
            println!(
                "    {:<9} {:>12.2} {:>6} {:>5}",
                key,
                item.amount,
                item.count,
                item.bettor_count()
            );
        }
    }
    if report.excluded.count > 0 {
        println!(
            "excluded: {} wagers, {:.2} {currency}",
            report.excluded.count, report.excluded.amount
        );
        for (reason, n) in &report.excluded.by_reason {
            println!("    {reason}: {n}");
        }
    }
}

fn print_panels(report: &ExposureReport, json: bool) -> Result<()> {
    let empty = CategoryExposure::default();
    let cat = |g: GameType| report.category(g).unwrap_or(&empty);

    let sp = AnkPanel::build(PattiKind::Single, cat(GameType::SinglePatti));
    let dp = AnkPanel::build(PattiKind::Double, cat(GameType::DoublePatti));
    let tp = AnkPanel::build(PattiKind::Triple, cat(GameType::TriplePatti));
    let digits = digit_panel(cat(GameType::SingleDigit));
    let jodi = jodi_grid(cat(GameType::Jodi));

    if json {
        let out = serde_json::json!({
            "single_digit": digits,
            "jodi": jodi,
            "single_patti": sp,
            "double_patti": dp,
            "triple_patti": tp,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Single Digit");
    let row: Vec<String> = digits
        .iter()
        .map(|c| format!("{}:{:.0}", c.number, c.amount))
        .collect();
    println!("    {}", row.join("  "));

    println!("Jodi");
    for jodi_row in &jodi {
        let row: Vec<String> = jodi_row
            .iter()
            .map(|c| format!("{}:{:.0}", c.number, c.amount))
            .collect();
        println!("    {}", row.join(" "));
    }

    for panel in [&sp, &dp, &tp] {
        println!("{}", panel.kind);
        for group in &panel.groups {
            let cells: Vec<String> = group
                .cells
                .iter()
                .map(|c| format!("{}:{:.0}", c.number, c.amount))
                .collect();
            println!("  [{}] {:>10.2}  {}", group.ank, group.total_amount, cells.join(" "));
            if !group.overflow.is_empty() {
                let extra: Vec<String> = group
                    .overflow
                    .iter()
                    .map(|c| format!("{}:{:.0}", c.number, c.amount))
                    .collect();
                println!("       overflow    {}", extra.join(" "));
            }
        }
    }
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("matka=info"));

    let json_logging = std::env::var("MATKA_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
