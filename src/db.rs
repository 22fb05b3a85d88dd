// connexion BD

pub mod schema;

use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, DbErr,
    QueryResult, Statement, TransactionError, TransactionTrait, Value,
};

use crate::config::DatabaseConfig;

/// Ouvre le pool de connexions partagé par tout le processus
pub async fn establish_connection(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .connect_timeout(config.connect_timeout)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    tracing::info!(max_connections = config.max_connections, "Database pool ready");
    Ok(db)
}

/// Ferme le pool à l'arrêt du serveur
pub async fn shutdown(db: DatabaseConnection) -> Result<(), DbErr> {
    db.close().await?;
    tracing::info!("Database pool closed");
    Ok(())
}

/// Exécute une requête paramétrée et retourne les lignes brutes
pub async fn execute<C>(conn: &C, sql: &str, values: Vec<Value>) -> Result<Vec<QueryResult>, DbErr>
where
    C: ConnectionTrait,
{
    let backend = conn.get_database_backend();
    let started = Instant::now();

    let result = conn
        .query_all(Statement::from_sql_and_values(backend, sql, values))
        .await;

    match &result {
        Ok(rows) => tracing::debug!(
            sql,
            rows = rows.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "query executed"
        ),
        Err(e) => tracing::error!(sql, error = %e, "query failed"),
    }

    result
}

/// Exécute `callback` sur une seule connexion dans une transaction :
/// commit si Ok, rollback si Err
pub async fn with_transaction<F, T>(db: &DatabaseConnection, callback: F) -> Result<T, DbErr>
where
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, DbErr>> + Send + 'c>>
        + Send,
    T: Send,
{
    db.transaction::<F, T, DbErr>(callback)
        .await
        .map_err(|e| match e {
            TransactionError::Connection(e) | TransactionError::Transaction(e) => e,
        })
}
