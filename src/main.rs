use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pairing_engine::calculate::standings_table;
use pairing_engine::config::AppConfig;
use pairing_engine::models::{Competitor, CompetitorId, GameResult, MatchId};
use pairing_engine::pairing::{PairingSystem, PairingWarning};
use pairing_engine::parse_date;
use pairing_engine::schedule::team_round_robin;
use pairing_engine::storage::{StorageConfig, SubmissionLog, TournamentStore};
use pairing_engine::tournament::Tournament;

#[derive(Parser)]
#[command(name = "pairing-engine")]
#[command(about = "Round pairing and standings for multi-round tournaments")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides config
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Tournament file name inside the data directory
    #[arg(long, default_value = "tournament")]
    tournament: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new, empty tournament
    Init {
        #[arg(long)]
        name: String,

        /// Tournament date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        venue: Option<String>,

        /// Replace an existing tournament file
        #[arg(long)]
        force: bool,
    },

    /// Register a competitor (before round 1 is paired)
    Register {
        name: String,

        #[arg(long, default_value = "0")]
        rating: i32,

        #[arg(long)]
        team: Option<String>,

        #[arg(long)]
        country: Option<String>,

        /// Seat within the team (1-based)
        #[arg(long, default_value = "1")]
        player_number: u32,
    },

    /// Pair the next round
    Pair {
        /// round-robin, random, king-of-the-hill, australian, lagged-australian
        #[arg(long)]
        system: Option<String>,

        /// Round Robin only: number of rounds to commit (default: all)
        #[arg(long)]
        rounds: Option<usize>,

        /// RNG seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Remove the most recent round and its results
    Unpair {
        /// Round to remove (default: last round)
        #[arg(long)]
        round: Option<u32>,
    },

    /// Record or correct a result, e.g. `result R1-M2 400 350`
    Result {
        match_id: String,

        #[arg(allow_hyphen_values = true)]
        score1: String,

        #[arg(allow_hyphen_values = true)]
        score2: String,
    },

    /// Print current standings
    Standings {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the pairings of a round
    Pairings {
        /// Round to show (default: last round)
        #[arg(long)]
        round: Option<u32>,
    },

    /// Print a competitor's scorecard
    Scorecard { name: String },

    /// Preview a team round robin (not committed)
    TeamSchedule {
        #[arg(long, default_value = "2")]
        team_size: usize,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the result submission journal
    Journal {
        /// Only submissions for this match (e.g. R2-M1)
        #[arg(long)]
        match_id: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    // Initialize tracing
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Starting pairing-engine v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(
        cli.data_dir.clone().unwrap_or_else(|| config.data_dir.clone()),
        cli.tournament.clone(),
    );
    storage.validate()?;
    let store = TournamentStore::from_config(&storage);

    match cli.command {
        Commands::Init {
            name,
            date,
            venue,
            force,
        } => {
            if store.exists() && !force {
                bail!(
                    "{} already exists (use --force to replace it)",
                    store.path().display()
                );
            }
            let date = match date {
                Some(s) => parse_date(&s)
                    .with_context(|| format!("Invalid --date (expected YYYY-MM-DD): {}", s))?,
                None => chrono::Local::now().date_naive(),
            };

            let mut tournament = Tournament::new(name, date);
            if let Some(venue) = venue {
                tournament = tournament.with_venue(venue);
            }
            store.save(&tournament)?;
            println!("Created {} ({}) at {}", tournament.name, tournament.id, store.path().display());
        }

        Commands::Register {
            name,
            rating,
            team,
            country,
            player_number,
        } => {
            let mut tournament = store.load()?;
            let mut competitor = Competitor::new(name.trim(), rating);
            competitor.team = team;
            competitor.country = country;
            competitor.player_number = player_number;

            tournament.register(competitor)?;
            store.save(&tournament)?;
            println!("Registered {} ({} competitors)", name.trim(), tournament.roster.len());
        }

        Commands::Pair { system, rounds, seed } => {
            let mut tournament = store.load()?;
            let system: PairingSystem = match system {
                Some(s) => s.parse()?,
                None => config.pairing.default_system,
            };
            let mut options = config.pairing.to_options();
            options.round_robin_rounds = rounds;

            let mut rng = make_rng(seed.or(config.pairing.seed));
            let report = tournament.pair_next_round(system, &options, &mut rng)?;
            store.save(&tournament)?;

            for (round, pairings) in report.round_numbers().zip(report.rounds.iter()) {
                println!("\n=== Round {} ({}) ===", round, system.label());
                for (idx, pairing) in pairings.iter().enumerate() {
                    println!("{:<8} {}", MatchId::new(round, idx + 1).to_string(), pairing);
                }
            }
            print_warnings(&report.warnings);
        }

        Commands::Unpair { round } => {
            let mut tournament = store.load()?;
            let round = round.unwrap_or_else(|| tournament.history.last_round());
            let removed = tournament.unpair_round(round)?;
            store.save(&tournament)?;
            println!("Removed round {} ({} pairings)", round, removed.len());
        }

        Commands::Result {
            match_id,
            score1,
            score2,
        } => {
            let mut tournament = store.load()?;
            let match_id: MatchId = match_id.parse()?;
            let result = GameResult::parse(&score1, &score2)?;

            let previous = tournament.record_result(match_id.round, match_id.board, result)?;
            store.save(&tournament)?;
            SubmissionLog::from_config(&storage).record(match_id, &result)?;

            match previous {
                Some(old) => println!("{}: {} (was {})", match_id, result, old),
                None => println!("{}: {}", match_id, result),
            }
        }

        Commands::Standings { json } => {
            let tournament = store.load()?;
            let rows = standings_table(&tournament.roster);

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("\n=== {} after round {} ===", tournament.name, tournament.history.last_round());
                println!(
                    "{:<4} {:<24} {:>6} {:>6} {:>7}  Last",
                    "#", "Name", "W", "L", "Spread"
                );
                for row in rows {
                    println!(
                        "{:<4} {:<24} {:>6} {:>6} {:>+7}  {}",
                        row.position,
                        row.competitor.to_string(),
                        row.wins,
                        row.losses,
                        row.spread,
                        row.last_result
                    );
                }
            }
        }

        Commands::Pairings { round } => {
            let tournament = store.load()?;
            let round = round.unwrap_or_else(|| tournament.history.last_round());
            let Some(pairings) = tournament.history.pairings(round) else {
                bail!("Round {} has not been paired", round);
            };

            println!("\n=== Round {} ({:?}) ===", round, tournament.round_status(round));
            for (idx, pairing) in pairings.iter().enumerate() {
                let result = tournament
                    .history
                    .result(round, idx + 1)
                    .map(|r| r.to_string())
                    .unwrap_or_default();
                println!("{:<8} {:<48} {}", MatchId::new(round, idx + 1).to_string(), pairing.to_string(), result);
            }
        }

        Commands::Scorecard { name } => {
            let tournament = store.load()?;
            let id = CompetitorId::from(name.trim());
            let Some(competitor) = tournament.competitor(&id) else {
                bail!("No competitor named '{}'", id);
            };

            println!(
                "\n=== {} ({} W, {} L, spread {:+}) ===",
                competitor.id, competitor.record.wins, competitor.record.losses, competitor.record.spread
            );
            for entry in &competitor.record.scorecard {
                println!(
                    "R{:<4} vs {:<24} {:<14} {:>+7}",
                    entry.round,
                    entry.opponent.to_string(),
                    entry.outcome.to_string(),
                    entry.cumulative_spread
                );
            }
        }

        Commands::TeamSchedule { team_size, seed } => {
            let tournament = store.load()?;
            let mut rng = make_rng(seed.or(config.pairing.seed));
            let schedule = team_round_robin(&tournament.roster, team_size, &mut rng)?;

            for (idx, round) in schedule.rounds.iter().enumerate() {
                println!("\n=== Team round {} ===", idx + 1);
                for team_match in round {
                    match &team_match.opponent {
                        Some(opponent) => println!(
                            "{} vs {} ({} starts {})",
                            team_match.team.team, opponent.team, team_match.team.team, team_match.starting
                        ),
                        None => println!("{} has a bye", team_match.team.team),
                    }
                    for (a, b) in &team_match.boards {
                        println!("    {} vs {}", a, b);
                    }
                }
            }
            for warning in &schedule.warnings {
                println!("warning: {}", warning);
            }
        }

        Commands::Journal { match_id } => {
            let log = SubmissionLog::from_config(&storage);
            let entries = match match_id {
                Some(s) => log.for_match(s.parse()?)?,
                None => log.read_all()?,
            };

            for entry in entries {
                println!(
                    "{}  {:<8} {}-{}",
                    entry.submitted_at.to_rfc3339(),
                    entry.match_id,
                    entry.score1,
                    entry.score2
                );
            }
        }
    }

    Ok(())
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            tracing::debug!("Using seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

fn print_warnings(warnings: &[PairingWarning]) {
    for warning in warnings {
        println!("warning: {}", warning);
    }
}
