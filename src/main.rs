use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use rachas::config::ServerConfig;
use rachas::db::{self, AppState};
use rachas::routes;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  dotenvy::dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rachas=info,tower_http=info")),
    )
    .init();

  let config = ServerConfig::from_env();

  let pool = db::connect(&config.database_url).await?;
  tracing::info!(database_url = %config.database_url, "database ready");

  let state = Arc::new(AppState { db: pool });
  let app = routes::router(state);

  let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
  tracing::info!(addr = %config.bind_addr, "listening");
  axum::serve(listener, app).await?;

  Ok(())
}
