// (Re)crée toutes les tables et insère l'utilisateur admin.
// DESTRUCTIF : à lancer une seule fois à l'installation.

use medisched::config::Config;
use medisched::db;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let connection = db::establish_connection(&config.database).await?;

    let result = db::schema::init_tables(&connection).await;
    db::shutdown(connection).await?;

    if let Err(e) = result {
        tracing::error!(error = %e, "Error creating tables or inserting data");
        return Err(e.into());
    }
    Ok(())
}
