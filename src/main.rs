use clap::Parser;
use goldrates::application::refresh::RunSummary;
use goldrates::cli::commands::{Cli, Commands};
use goldrates::config::{ApiConfig, Config};
use goldrates::domain::values::city::CityName;
use goldrates::domain::values::fetch_plan::{FetchPlan, FetchWhen};
use goldrates::GoldRates;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let api = if cli.command.needs_api() {
        match ApiConfig::from_env() {
            Ok(api) => Some(api),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    let config = Config {
        data_dir: cli.data_dir,
        cities_path: cli.cities,
        retention_days: cli.retention,
        api,
    };

    let gr = match GoldRates::new(config) {
        Ok(gr) => gr,
        Err(e) => {
            eprintln!("Error initializing goldrates: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(gr, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(gr: GoldRates, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Today { batch } => {
            let summary = gr
                .refresh(FetchPlan::Today, &batch.selection(), batch.pacing()?)
                .await?;
            print_summary(&summary);
        }
        Commands::Update { batch } => {
            let summary = gr
                .refresh(FetchPlan::TodayAndYesterday, &batch.selection(), batch.pacing()?)
                .await?;
            print_summary(&summary);
        }
        Commands::Backfill { days, batch } => {
            let summary = gr
                .refresh(FetchPlan::LastDays(days), &batch.selection(), batch.pacing()?)
                .await?;
            print_summary(&summary);
        }
        Commands::Fetch { city, date } => {
            let city = CityName::new(&city)?;
            let when = match date {
                Some(d) => FetchWhen::On(parse_date(&d)?),
                None => FetchWhen::Today,
            };
            let record = gr.fetch_one(&city, when).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Trim => {
            let summary = gr.trim_all()?;
            println!(
                "Trimmed {}/{} files ({} records dropped)",
                summary.trimmed, summary.files, summary.records_dropped
            );
            if !summary.failed.is_empty() {
                println!("Skipped: {}", summary.failed.join(", "));
            }
            if summary.unreadable_records > 0 {
                println!(
                    "Unreadable records: {} (files left unchanged)",
                    summary.unreadable_records
                );
            }
        }
        Commands::Show { city, last } => {
            let city = CityName::new(&city)?;
            let records = gr.history(&city, last)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("\n=== SUMMARY ===");
    println!("Plan: {}", summary.plan);
    println!(
        "Cities: {} (ok {}, failed {})",
        summary.cities_total, summary.cities_ok, summary.cities_failed
    );
    println!(
        "Records: {} fetched, {} missed, {} requests",
        summary.records_fetched, summary.misses, summary.requests
    );
    if summary.unreadable_records > 0 {
        println!(
            "Unreadable stored records dropped: {}",
            summary.unreadable_records
        );
    }
    if !summary.failed_cities.is_empty() {
        println!("Failed: {}", summary.failed_cities.join(", "));
    }
    println!("Elapsed: {:.1}s", summary.elapsed_secs);
}

fn parse_date(s: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format: {s}. Use YYYY-MM-DD"))
}
