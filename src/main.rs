use dotenvy::dotenv;
use reels::config::Config;
use reels::error::ApplicationError;
use reels::{api, logger};

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    dotenv().ok();

    let config = Config::from_env()?;

    let _guard = logger::init(&config)?;

    api::serve(&config).await
}
