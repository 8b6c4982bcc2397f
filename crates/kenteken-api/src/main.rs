//! Kenteken API - Entry point.

use kenteken_api::{config::Config, startup, StartupError};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let server = match start().await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    match server.local_addr() {
        Ok(addr) => println!("API running on {}", addr),
        Err(_) => println!("API running"),
    }
    info!("Accepting requests");

    // Run server
    if let Err(e) = server.run().await {
        error!("Server error: {}", e);
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn start() -> Result<startup::Server, StartupError> {
    let config = Config::load()?;
    startup::bootstrap(&config).await
}
