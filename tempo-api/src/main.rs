mod app_state;
mod auth;
mod config;
mod domain;
mod repositories;
mod router;
mod routes;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tempo_api=debug,tower_http=debug")),
        )
        .init();

    let settings = config::read_config().expect("Failed to read configuration");

    let connection_pool = PgPoolOptions::new()
        .max_connections(16)
        .connect_with(settings.database.with_db())
        .await
        .expect("Failed to connect to Postgres");

    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to run database migrations");

    let address = format!(
        "{}:{}",
        settings.application.host, settings.application.port
    );
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .expect("Failed to bind address");
    tracing::info!("listening on {}", address);

    let app = router::create(connection_pool, settings);
    axum::serve(listener, app).await.expect("Server error");
}
