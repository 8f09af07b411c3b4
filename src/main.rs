pub mod config;
pub mod prober;
pub mod server;

use config::app_config::load_config;
use prober::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = load_config();

    let prober = Prober::new(config.probe.clone()).expect("Failed to create HTTP client");

    if let Err(err) = server::serve(&config.listen_addr, prober).await {
        log::error!("Server failed: {err}");
        std::process::exit(1);
    }
}
