use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{DiningIndex, WaiterId, parse_clock_time};
use llm_client::{DisabledGenerator, SharedGenerator};
use server::{FloorOrchestrator, LlmConfig, ServerConfig, WaiterAssignment};
use tracing::debug;

/// Laudure - table assignment and guest briefings for French Laudure
#[derive(Parser)]
#[command(name = "laudure")]
#[command(about = "Assign tonight's reservations to the waiters on duty", long_about = None)]
struct Cli {
    /// Path to the fine-dining dataset JSON
    #[arg(short, long, env = "FL_DATASET", default_value = "fine-dining-dataset.json")]
    dataset: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "FL_BIND", default_value = "0.0.0.0:8000")]
        bind: std::net::SocketAddr,

        #[arg(long, env = "FL_CORS_ORIGIN", default_value = "http://localhost:3000")]
        cors_origin: String,

        #[command(flatten)]
        llm: LlmConfig,
    },

    /// Print a one-off table assignment
    Assign {
        /// Waiter ids on duty, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        waiters: Vec<WaiterId>,

        /// Skip text generation and deal tables round-robin
        #[arg(long)]
        offline: bool,

        #[command(flatten)]
        llm: LlmConfig,
    },

    /// Show dataset totals
    Stats,

    /// Show one diner's reservations and history
    Diner {
        /// Exact diner name
        #[arg(long)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    server::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            cors_origin,
            llm,
        } => {
            let config = ServerConfig {
                bind,
                dataset: cli.dataset,
                cors_origin,
                llm,
            };
            server::run(config).await?
        }
        Commands::Assign {
            waiters,
            offline,
            llm,
        } => handle_assign(load(&cli.dataset)?, waiters, offline, &llm).await?,
        Commands::Stats => handle_stats(&load(&cli.dataset)?),
        Commands::Diner { name } => handle_diner(&load(&cli.dataset)?, &name)?,
    }

    Ok(())
}

fn load(path: &Path) -> Result<DiningIndex> {
    println!("Loading dataset from {}...", path.display());
    let start = Instant::now();
    let index = DiningIndex::load_from_file(path).context("Failed to load dining dataset")?;
    println!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());
    Ok(index)
}

/// Handle the 'assign' command
async fn handle_assign(
    index: DiningIndex,
    waiters: Vec<WaiterId>,
    offline: bool,
    llm: &LlmConfig,
) -> Result<()> {
    let generator: SharedGenerator = if offline {
        Arc::new(DisabledGenerator)
    } else {
        llm.build_generator()
    };
    let orchestrator = FloorOrchestrator::new(index, generator, llm.temperature);

    let start = Instant::now();
    orchestrator
        .set_attendance(waiters)
        .await
        .map_err(|e| anyhow!("Assignment failed: {e}"))?;
    let attendance = orchestrator.get_attendance().await;
    debug!("Assignment and briefings took {:?}", start.elapsed());

    match orchestrator.plan_source().await {
        Some(source) if source.is_fallback() => {
            println!("{}", "Planned round-robin (generation unavailable)".yellow())
        }
        Some(_) => println!("{}", "Planned by the generation service".green()),
        None => {}
    }

    if attendance.assignments.is_empty() {
        println!("{}", "No waiters on duty.".yellow());
    }
    for assignment in &attendance.assignments {
        print_assignment(assignment);
    }
    Ok(())
}

fn print_assignment(assignment: &WaiterAssignment) {
    println!();
    println!(
        "{}",
        format!("{} (#{})", assignment.waiter_name, assignment.waiter_id)
            .bold()
            .blue()
    );
    if let Some(summary) = &assignment.summary {
        println!("  {}", summary.italic());
    }
    for table in &assignment.tables {
        println!(
            "{}{:>8}  {} (party of {})",
            "• ".green(),
            table.start_time,
            table.diner_name,
            table.number_of_people
        );
    }
}

/// Handle the 'stats' command
fn handle_stats(index: &DiningIndex) {
    let counts = index.counts();
    let extraction = index.extract_reservations();

    println!("{}", "Dataset".bold().blue());
    println!("{}Diners: {}", "• ".cyan(), counts.diners);
    println!("{}Reservations: {}", "• ".cyan(), counts.reservations);
    println!("{}Guests: {}", "• ".cyan(), counts.guests);
    println!("{}Assignable reservations: {}", "• ".cyan(), extraction.records.len());
    if extraction.skipped > 0 {
        println!(
            "{}",
            format!("  {} reservations skipped (bad time or empty party)", extraction.skipped).yellow()
        );
    }
}

/// Handle the 'diner' command
fn handle_diner(index: &DiningIndex, name: &str) -> Result<()> {
    let diner = index
        .get_diner(name)
        .ok_or_else(|| anyhow!("Diner '{}' not found", name))?;

    println!("{}", diner.name.bold().blue());

    println!("Reservations:");
    for reservation in &diner.reservations {
        let time = match parse_clock_time(&reservation.start_time) {
            Ok(time) => time.to_12_hour(),
            Err(_) => format!("{} (unreadable)", reservation.start_time).red().to_string(),
        };
        println!("{}{} for {}", "• ".green(), time, reservation.number_of_people);
        for order in &reservation.orders {
            if order.dietary_tags.is_empty() {
                println!("    - {} ({:.2})", order.item, order.price);
            } else {
                println!(
                    "    - {} ({:.2}) [{}]",
                    order.item,
                    order.price,
                    order.dietary_tags.join(", ")
                );
            }
        }
    }

    let tags = diner.dietary_tags();
    if !tags.is_empty() {
        println!("Dietary tags: {}", tags.join(", "));
    }
    println!("{}Emails: {}", "• ".cyan(), diner.emails.len());
    println!("{}Reviews: {}", "• ".cyan(), diner.reviews.len());
    Ok(())
}
