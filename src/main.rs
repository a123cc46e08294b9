use fluxgen::{logger, AppConfig, FluxClient};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(logger::LoggerConfig::from_env())?;
    if dotenv_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::debug!("No .env file found, using process environment");
    }

    // Nothing binds a port until the configuration is known to be usable.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {}", e);
            log::error!("Set FLUX_API_URL and HUGGINGFACE_AUTH_TOKEN before starting.");
            return Err(e.into());
        }
    };
    logger::log_config_info(&config);

    let pipeline = FluxClient::new(&config)?.into_pipeline();

    logger::log_startup_info(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        &config.host,
        config.port,
    );
    fluxgen::server::run(&config, pipeline).await?;

    log::info!("👋 Server stopped");
    Ok(())
}
