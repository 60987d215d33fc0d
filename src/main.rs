use cms_functions::config::{Config, RuntimeIdentity};
use cms_functions::handler::{UploadHandler, VersionHandler};
use cms_functions::logger;
use cms_functions::server::{self, LocalRouter};
use cms_functions::store::{LocalFileStore, ParameterBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg.logging)?;

    let addr = cfg.get_socket_addr()?;

    let upload = UploadHandler::new(
        LocalFileStore::from_config(&cfg.upload),
        RuntimeIdentity::current(),
    );

    if let Err(reason) = cfg.version.validate() {
        logger::log_warning(&format!("Version lookups will fail: {reason}"));
    }
    let store = ParameterBackend::from_config(&cfg.version).await;
    let version = VersionHandler::from_config(store, &cfg.version);

    let router = LocalRouter::new(upload, version, cfg.server.version_path.clone());
    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    server::run(listener, router, &cfg).await?;
    Ok(())
}
