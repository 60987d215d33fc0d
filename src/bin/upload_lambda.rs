//! Upload function entry point for AWS Lambda

use cms_functions::config::{Config, RuntimeIdentity};
use cms_functions::handler::UploadHandler;
use cms_functions::store::LocalFileStore;
use cms_functions::{lambda, logger};
use lambda_http::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cfg = Config::load()?;
    logger::init(&cfg.logging)?;
    logger::log_function_start("upload", &cfg);

    let handler = UploadHandler::new(
        LocalFileStore::from_config(&cfg.upload),
        RuntimeIdentity::current(),
    );

    lambda::run(handler, cfg.logging).await
}
