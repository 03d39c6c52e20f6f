#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Property risk API server binary.
//!
//! Configured entirely from the environment: `BIND_ADDR`, `PORT`,
//! `GOOGLE_MAPS_API_KEY`, `GEOCODER_USER_AGENT` and `RUST_LOG`.

use property_risk_geocoder::GeocoderConfig;
use property_risk_server::{ServerConfig, run_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    run_server(ServerConfig::from_env(), &GeocoderConfig::from_env()).await
}
