use adjust_moment::app_core::AppCore;
use adjust_moment::catalog::Catalog;
use adjust_moment::mode::AdMode;
use adjust_moment::simulate::{self, SimulationOptions};
use adjust_moment::snooze::SnoozeDelay;
use adjust_moment::store::{JsonFileStorage, MemoryStorage, StoreHandle};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Parser)]
#[command(name = "adjustmoment", about = "Ad snooze / ad debt playback core CLI")]
struct Cli {
    /// Load the video catalog from a JSON file instead of the builtin data
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Use in-memory storage (nothing persisted)
    #[arg(long, global = true)]
    ephemeral: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show mode and debt status
    Status,
    /// List the video catalog
    Videos,
    /// Show one video, including its ad schedule
    Video { id: String },
    /// Ad-handling mode (snooze vs. debt)
    Mode {
        #[command(subcommand)]
        action: ModeCmd,
    },
    /// The debt queue of deferred ads
    Debt {
        #[command(subcommand)]
        action: DebtCmd,
    },
    /// Clear all debt and return to mode selection
    Reset,
    /// Run a headless playback session over virtual time
    Simulate {
        /// Video id to play
        id: String,
        /// Override the persisted mode for this run
        #[arg(long)]
        mode: Option<String>,
        /// Press "Pay Later" at every countdown (debt mode)
        #[arg(long)]
        defer: bool,
        /// Snooze once at the first countdown, e.g. --snooze 2:30
        #[arg(long)]
        snooze: Option<String>,
        /// Press "pay now" when the main video reaches this position (ms)
        #[arg(long)]
        pay_now_at: Option<u64>,
        /// Virtual length of the main video in ms
        #[arg(long, default_value_t = 60_000)]
        main_duration: u64,
        /// Virtual length of each ad in ms
        #[arg(long, default_value_t = 8_000)]
        ad_duration: u64,
        /// Virtual ms between position updates
        #[arg(long, default_value_t = 250)]
        tick: u64,
    },
}

#[derive(Subcommand)]
enum ModeCmd {
    /// Show the current mode
    Show,
    /// Set the mode: snooze | debt
    Set { mode: String },
}

#[derive(Subcommand)]
enum DebtCmd {
    /// List the owed ads
    Show,
    /// Forgive all debt
    Clear,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let storage: StoreHandle = if cli.ephemeral {
        Rc::new(MemoryStorage::new())
    } else {
        match JsonFileStorage::default_location() {
            Ok(s) => Rc::new(s),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    };

    let catalog = match &cli.catalog {
        Some(path) => match Catalog::from_json_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: cannot load catalog: {}", e);
                std::process::exit(1);
            }
        },
        None => Catalog::builtin(),
    };

    let mut core = AppCore::new(storage, catalog);

    match cli.command {
        Commands::Status => {
            let (owed, cap) = core.debt_summary();
            println!("Mode: {}", core.mode());
            println!("Debt: {} / {}", owed, cap);
            println!("Videos: {}", core.videos().len());
        }
        Commands::Videos => {
            println!("{:<6} {:<36} {:<20} {:>4}", "ID", "Title", "Channel", "Ads");
            println!("{}", "-".repeat(70));
            for video in core.videos() {
                println!(
                    "{:<6} {:<36} {:<20} {:>4}",
                    video.id,
                    truncate(&video.title, 35),
                    truncate(&video.channel_name, 19),
                    video.ads.len()
                );
            }
        }
        Commands::Video { id } => {
            let video = match core.video(&id) {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            println!("{} — {}", video.id, video.title);
            println!("Channel: {}", video.channel_name);
            println!("URI: {}", video.uri);
            if video.ads.is_empty() {
                println!("No scheduled ads.");
            } else {
                println!("Ad schedule:");
                for spot in &video.ads {
                    println!("  {:>8} ms  {}", spot.insert_at, spot.uri);
                }
            }
        }
        Commands::Mode { action } => match action {
            ModeCmd::Show => println!("Mode: {}", core.mode()),
            ModeCmd::Set { mode } => match mode.parse::<AdMode>() {
                Ok(mode) => {
                    core.set_mode(mode);
                    println!("Mode set to '{}'.", mode);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            },
        },
        Commands::Debt { action } => match action {
            DebtCmd::Show => {
                let (owed, cap) = core.debt_summary();
                println!("Debt: {} / {}", owed, cap);
                for (i, uri) in core.debt.entries().enumerate() {
                    println!("  {}. {}", i + 1, uri);
                }
            }
            DebtCmd::Clear => {
                core.debt.clear();
                println!("Debt cleared.");
            }
        },
        Commands::Reset => {
            core.reset();
            println!("Debt cleared. Pick a mode with 'mode set <snooze|debt>'.");
        }
        Commands::Simulate {
            id,
            mode,
            defer,
            snooze,
            pay_now_at,
            main_duration,
            ad_duration,
            tick,
        } => {
            if let Some(mode) = mode {
                match mode.parse::<AdMode>() {
                    Ok(mode) => core.set_mode(mode),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            }

            let snooze = match snooze.as_deref().map(str::parse::<SnoozeDelay>) {
                Some(Ok(delay)) => Some(delay),
                Some(Err(e)) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
                None => None,
            };

            let mut session = match core.open_session(&id) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            let opts = SimulationOptions {
                tick_millis: tick,
                main_duration_millis: main_duration,
                ad_duration_millis: ad_duration,
                defer_countdowns: defer,
                snooze,
                pay_now_at,
                ..SimulationOptions::default()
            };

            println!(
                "Simulating '{}' in {} mode ({} scheduled ads)...",
                id,
                session.mode(),
                session.schedule().len()
            );
            let report = simulate::run(&mut session, &mut core.debt, &opts);
            for line in &report.log {
                println!("{}", line);
            }
            println!();
            println!("Ads played: {}", report.ads_played.len());
            println!("Ads deferred: {}", report.ads_deferred.len());
            println!("Snoozes: {}", report.snoozes);
            let (owed, cap) = core.debt_summary();
            println!("Debt: {} / {}", owed, cap);
            if !report.main_finished {
                println!("Stopped at the tick cap before the video ended.");
            }
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{}…", cut)
    } else {
        s.to_string()
    }
}
