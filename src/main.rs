use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use medisched::config::Config;
use medisched::db;
use medisched::routes;
use medisched::services::clock::SystemClock;
use medisched::services::otp_sender::LogOtpSender;
use medisched::services::otp_service::OtpService;
use medisched::utils::jwt::TokenIssuer;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("medisched=info,actix_web=info")),
        )
        .init();

    let config = Config::from_env().map_err(|e| std::io::Error::other(e.to_string()))?;

    tracing::info!("Connecting to database...");
    let db = db::establish_connection(&config.database)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to connect to database: {}", e)))?;

    let issuer = web::Data::new(TokenIssuer::from_config(&config.jwt));
    let otp = web::Data::new(OtpService::new(
        db.clone(),
        Arc::new(SystemClock),
        Arc::new(LogOtpSender),
    ));
    let db_data = web::Data::new(db.clone());

    let bind = (config.server.host.clone(), config.server.port);
    tracing::info!("Starting server on http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(db_data.clone())
            .app_data(issuer.clone())
            .app_data(otp.clone())
            .configure(routes::configure_routes)
    })
        .bind(bind)?
        .run()
        .await?;

    db::shutdown(db)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))
}
