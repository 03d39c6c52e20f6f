#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for property risk assessment.
//!
//! ```text
//! property_risk_cli serve [--bind-addr 0.0.0.0] [--port 8080]
//! property_risk_cli assess --address "350 5th Ave, New York" --property-type business --fenced
//! ```
//!
//! `GOOGLE_MAPS_API_KEY` and `GEOCODER_USER_AGENT` are read from the
//! environment for both subcommands.

use clap::{Parser, Subcommand};
use property_risk_assessment::RiskAssessor;
use property_risk_geocoder::GeocoderConfig;
use property_risk_server::{ServerConfig, assessment_response, run_server};
use property_risk_server_models::AssessmentRequest;

#[derive(Parser)]
#[command(
    name = "property_risk_cli",
    about = "Score the security risk of a property from its address"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Interface to bind
        #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1")]
        bind_addr: String,
        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Run a single assessment and print the JSON result
    Assess {
        /// Property address
        #[arg(long)]
        address: String,
        /// One of: home, rental, "vacation home", business
        #[arg(long, default_value = "home")]
        property_type: String,
        /// The property has a perimeter fence
        #[arg(long)]
        fenced: bool,
        /// The property has a gated entry
        #[arg(long)]
        gated: bool,
        /// Operating hours, e.g. "24/7"
        #[arg(long)]
        operating_hours: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();
    let geocoder = GeocoderConfig::from_env();

    match cli.command {
        Commands::Serve { bind_addr, port } => {
            run_server(ServerConfig { bind_addr, port }, &geocoder).await?;
        }
        Commands::Assess {
            address,
            property_type,
            fenced,
            gated,
            operating_hours,
            notes,
        } => {
            let input = AssessmentRequest {
                address,
                property_type,
                fenced,
                gated,
                operating_hours,
                notes,
            }
            .validate()?;

            let assessor = RiskAssessor::from_config(&geocoder)?;
            let assessment = assessor.assess(&input).await?;
            log::debug!(
                "Sources: crime={} geo={}",
                assessment.crime.source,
                assessment.geo.source
            );

            let response = assessment_response(input, assessment);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
