use chrono::Utc;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::db::schema;
use crate::models::users;
use crate::services::identity_service::{IdentityService, NewRegistration};

/// Base SQLite en mémoire avec toutes les tables. Une seule connexion :
/// chaque connexion SQLite :memory: aurait sa propre base.
pub async fn memory_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    schema::create_tables(&db).await.unwrap();
    db
}

pub async fn register(db: &DatabaseConnection, email: &str, number: &str, mobile: &str) -> users::Model {
    IdentityService::create_user_with_identification(
        db,
        NewRegistration {
            email: email.to_string(),
            phone: mobile.to_string(),
            identification_type: None,
            identification_number: number.to_string(),
        },
        Utc::now(),
    )
    .await
    .unwrap()
}
