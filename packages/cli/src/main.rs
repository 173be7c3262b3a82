#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the arrest predictor.
//!
//! ```text
//! arrest_predictor predict --year 2023 --month 6 --hour 14 --district 5 \
//!     --ward NARCOTICS --community-area STREET
//! arrest_predictor categories [ward|community-area]
//! arrest_predictor inspect-model
//! ```
//!
//! Running with no subcommand opens the interactive input form.

use std::path::PathBuf;

use arrest_predictor::IncidentInput;
use arrest_predictor_cli::config::Config;
use arrest_predictor_cli::{
    format_model_summary, format_table, load_predictor, render_prediction,
};
use arrest_predictor_encoding::{all_tables, community_area_table, ward_table};
use arrest_predictor_incident_models::{
    DISTRICT_BOUNDS, FieldBounds, HOUR_BOUNDS, MONTH_BOUNDS, YEAR_BOUNDS,
};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "arrest_predictor",
    about = "Predict arrest likelihood for a crime incident"
)]
struct Cli {
    /// Path to the model JSON file (overrides the config file)
    #[arg(long, global = true)]
    model: Option<PathBuf>,
    /// Path to the TOML config file (default: `arrest_predictor.toml` if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict whether an arrest is likely for one incident
    Predict {
        /// Year of the incident (2001-2024)
        #[arg(long, value_parser = bounded(YEAR_BOUNDS))]
        year: u16,
        /// Month of the incident (1-12)
        #[arg(long, value_parser = bounded(MONTH_BOUNDS))]
        month: u16,
        /// Hour of the incident (0-23)
        #[arg(long, value_parser = bounded(HOUR_BOUNDS))]
        hour: u16,
        /// Police district number (1-25)
        #[arg(long, value_parser = bounded(DISTRICT_BOUNDS))]
        district: u16,
        /// Offense type, exactly as listed by `categories ward`
        #[arg(long)]
        ward: String,
        /// Location description, exactly as listed by `categories community-area`
        #[arg(long)]
        community_area: String,
        /// Print the result (or error) as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the accepted category names and their codes
    Categories {
        /// Only list this table
        #[arg(value_enum)]
        table: Option<TableArg>,
    },
    /// Show a summary of the loaded model
    InspectModel,
}

#[derive(Clone, Copy, ValueEnum)]
enum TableArg {
    Ward,
    CommunityArea,
}

fn bounded(bounds: FieldBounds) -> clap::builder::RangedI64ValueParser<u16> {
    clap::value_parser!(u16).range(i64::from(bounds.min)..=i64::from(bounds.max))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let model_path = config.resolve_model_path(cli.model);

    let Some(command) = cli.command else {
        let predictor = load_predictor(&model_path)?;
        return arrest_predictor_cli::interactive::run(&predictor);
    };

    match command {
        Commands::Predict {
            year,
            month,
            hour,
            district,
            ward,
            community_area,
            json,
        } => {
            let predictor = load_predictor(&model_path)?;
            let input = IncidentInput {
                year,
                month: u8::try_from(month)?,
                hour: u8::try_from(hour)?,
                district: u8::try_from(district)?,
                ward,
                community_area,
            };

            let rendered = render_prediction(&predictor, &input, json)?;
            if rendered.is_error {
                if json {
                    println!("{}", rendered.text);
                } else {
                    eprintln!("{}", rendered.text);
                }
                std::process::exit(1);
            }
            println!("{}", rendered.text);
        }
        Commands::Categories { table } => {
            let tables = match table {
                Some(TableArg::Ward) => vec![ward_table()],
                Some(TableArg::CommunityArea) => vec![community_area_table()],
                None => all_tables().to_vec(),
            };
            for (i, table) in tables.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print!("{}", format_table(table));
            }
        }
        Commands::InspectModel => {
            let predictor = load_predictor(&model_path)?;
            print!("{}", format_model_summary(&model_path, predictor.model()));
        }
    }

    Ok(())
}
