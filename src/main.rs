//! healthlog
//!
//! Command-line front end for logging and reviewing health metrics.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use healthlog::build_info;
use healthlog::config::AppPaths;
use healthlog::db::Database;
use healthlog::health::{display_bmi, Bmi, EntryForm, BMI_PLACEHOLDER};
use healthlog::models::{format_timestamp, Mood};
use healthlog::settings::Settings;
use healthlog::tools::{entries, exchange};

#[derive(Parser, Debug)]
#[command(name = "healthlog", version, about = "Log weight, blood sugar, sleep and mood")]
struct Cli {
    /// Directory holding the database and settings
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record one entry
    Add {
        /// Weight in kg
        #[arg(long)]
        weight: String,
        /// Blood sugar in mg/dL
        #[arg(long)]
        sugar: String,
        /// Hours slept
        #[arg(long)]
        sleep: String,
        /// Gut, Mittel or Schlecht (good, fair, poor)
        #[arg(long, default_value = "Gut")]
        mood: Mood,
        #[arg(long, default_value = "")]
        notes: String,
        /// "YYYY-MM-DD HH:MM", defaults to now
        #[arg(long)]
        timestamp: Option<String>,
        /// Height in cm, remembered for BMI
        #[arg(long)]
        height: Option<String>,
    },
    /// Show all entries, oldest first
    List,
    /// BMI for a weight, using the saved height unless one is given
    Bmi {
        weight: String,
        #[arg(long)]
        height: Option<String>,
    },
    /// Averages over the most recent day
    Average,
    /// Write all entries to a CSV file
    ExportCsv { path: PathBuf },
    /// Add entries from a CSV file
    ImportCsv { path: PathBuf },
    /// Write all entries to a PDF file
    ExportPdf {
        path: PathBuf,
        /// Append a trend chart page
        #[arg(long)]
        with_chart: bool,
    },
    /// Render the trend chart to a PNG file
    Chart {
        path: PathBuf,
        #[arg(long, default_value_t = 1000)]
        width: u32,
        #[arg(long, default_value_t = 900)]
        height: u32,
    },
    /// Show version and build information
    Version,
}

fn print_json<T: Serialize>(value: &T) -> healthlog::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> healthlog::Result<()> {
    if let Command::Version = cli.command {
        if cli.json {
            return print_json(&build_info::BuildInfo::current());
        }
        build_info::print_banner();
        return Ok(());
    }

    let paths = AppPaths::resolve(cli.data_dir);
    let db = Database::new(&paths.database)?;
    db.initialize()?;
    let mut settings = Settings::load_from(&paths.settings)?;

    match cli.command {
        Command::Add {
            weight,
            sugar,
            sleep,
            mood,
            notes,
            timestamp,
            height,
        } => {
            let form = EntryForm {
                timestamp: timestamp
                    .unwrap_or_else(|| format_timestamp(&chrono::Local::now().naive_local())),
                weight,
                blood_sugar: sugar,
                sleep_hours: sleep,
                mood,
                notes,
                height_cm: height.unwrap_or_default(),
            };
            let saved = entries::save_entry(&db, &mut settings, &paths.settings, &form)?;
            if cli.json {
                return print_json(&saved);
            }
            println!(
                "Saved entry #{} at {} (BMI {})",
                saved.entry.id,
                format_timestamp(&saved.entry.timestamp),
                saved.bmi_display
            );
        }

        Command::List => {
            let listed = entries::list_entries(&db, &settings)?;
            if cli.json {
                return print_json(&listed);
            }
            println!(
                "{:<16}  {:>7}  {:>6}  {:>5}  {:<8}  {:<16}  {}",
                "Date", "Weight", "Sugar", "Sleep", "Mood", "BMI", "Notes"
            );
            for row in &listed.entries {
                let e = &row.entry;
                println!(
                    "{:<16}  {:>7}  {:>6}  {:>5}  {:<8}  {:<16}  {}",
                    format_timestamp(&e.timestamp),
                    e.weight,
                    e.blood_sugar,
                    e.sleep_hours,
                    e.mood.as_str(),
                    display_bmi(row.bmi.as_ref()),
                    e.notes
                );
            }
            println!("{} entries", listed.total);
        }

        Command::Bmi { weight, height } => {
            let preview = match height {
                Some(h) => entries::bmi_preview(&weight, &h),
                None => {
                    let h = settings.height_cm.map(|h| h.to_string()).unwrap_or_default();
                    entries::bmi_preview(&weight, &h)
                }
            };
            if cli.json {
                return print_json(&preview);
            }
            println!("{}", preview.display);
        }

        Command::Average => {
            let avg = entries::daily_average(&db)?;
            if cli.json {
                return print_json(&avg);
            }
            if let Some(avg) = avg {
                let bmi = settings
                    .height_cm
                    .and_then(|h| Bmi::new(avg.weight, h))
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| BMI_PLACEHOLDER.to_string());
                println!("Averages for {} ({} entries)", avg.date, avg.count);
                println!("  Weight: {:.2} kg", avg.weight);
                println!("  Sugar:  {:.2} mg/dL", avg.blood_sugar);
                println!("  Sleep:  {:.2} h", avg.sleep_hours);
                println!("  BMI:    {}", bmi);
            }
        }

        Command::ExportCsv { path } => {
            let response = exchange::export_csv(&db, &path)?;
            if cli.json {
                return print_json(&response);
            }
            println!("Exported {} entries to {}", response.entries, response.file_path);
        }

        Command::ImportCsv { path } => {
            let response = exchange::import_csv(&db, &path)?;
            if cli.json {
                return print_json(&response);
            }
            println!("Imported {} entries from {}", response.imported, response.file_path);
        }

        Command::ExportPdf { path, with_chart } => {
            let response = exchange::export_pdf(&db, &settings, &path, with_chart)?;
            if cli.json {
                return print_json(&response);
            }
            println!("Exported {} entries to {}", response.entries, response.file_path);
            if with_chart && !response.chart_included {
                println!("Chart could not be rendered and was left out");
            }
        }

        Command::Chart { path, width, height } => {
            let response = exchange::render_chart(&db, &settings, &path, width, height)?;
            if cli.json {
                return print_json(&response);
            }
            println!("Wrote chart of {} entries to {}", response.entries, response.file_path);
        }

        Command::Version => {}
    }

    Ok(())
}

fn main() -> ExitCode {
    // Logs go to stderr so they never mix with command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("healthlog=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
