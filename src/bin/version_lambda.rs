//! Version function entry point for AWS Lambda

use cms_functions::config::Config;
use cms_functions::handler::VersionHandler;
use cms_functions::store::ParameterBackend;
use cms_functions::{lambda, logger};
use lambda_http::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cfg = Config::load()?;
    logger::init(&cfg.logging)?;
    if let Err(reason) = cfg.version.validate() {
        logger::log_warning(&format!("Version lookups will fail: {reason}"));
    }
    logger::log_function_start("version", &cfg);

    let store = ParameterBackend::from_config(&cfg.version).await;
    let handler = VersionHandler::from_config(store, &cfg.version);

    lambda::run(handler, cfg.logging).await
}
