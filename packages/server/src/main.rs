#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Binary entry point for the Cidade Alerta API server.

#[actix_web::main]
async fn main() -> Result<(), cidade_alerta_server::ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    cidade_alerta_server::run_server().await.inspect_err(|e| {
        log::error!("{e}");
    })
}
