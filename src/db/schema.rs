// ============================================================================
// INITIALISATION DES TABLES
// ============================================================================
//
// Description:
//   (Re)crée toutes les tables à partir des entités SeaORM, dans une seule
//   transaction, puis insère les données initiales :
//     - rôles admin / physician / patient
//     - utilisateur admin@example.com avec l'identification A1234567A
//     - vérification placeholder déjà expirée (aucun code valide avant
//       un vrai POST /otp/send)
//
// Points d'attention:
//   - DESTRUCTIF : les tables existantes sont supprimées
//   - Appelé uniquement par le binaire init_tables (jamais par le serveur)
//
// ============================================================================

use chrono::{Duration, Utc};
use sea_orm::sea_query::{Table, TableCreateStatement, TableDropStatement};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    Schema, Set,
};

use crate::models::{
    appointment, billing, identification, module, patient, physician, role, user_role, users,
    verification,
};
use crate::services::otp_service::generate_code;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PHONE: &str = "+6512345678";
pub const ADMIN_IDENTIFICATION_NUMBER: &str = "A1234567A";

/// Tables dans l'ordre de création (dépendances d'abord)
fn create_statements(schema: &Schema) -> Vec<TableCreateStatement> {
    vec![
        schema.create_table_from_entity(role::Entity),
        schema.create_table_from_entity(users::Entity),
        schema.create_table_from_entity(identification::Entity),
        schema.create_table_from_entity(verification::Entity),
        schema.create_table_from_entity(user_role::Entity),
        schema.create_table_from_entity(physician::Entity),
        schema.create_table_from_entity(patient::Entity),
        schema.create_table_from_entity(appointment::Entity),
        schema.create_table_from_entity(billing::Entity),
        schema.create_table_from_entity(module::Entity),
    ]
}

fn drop_statement<E: EntityTrait>(entity: E) -> TableDropStatement {
    Table::drop().table(entity).if_exists().to_owned()
}

/// Tables dans l'ordre de suppression (dépendants d'abord)
fn drop_statements() -> Vec<TableDropStatement> {
    vec![
        drop_statement(module::Entity),
        drop_statement(billing::Entity),
        drop_statement(appointment::Entity),
        drop_statement(patient::Entity),
        drop_statement(physician::Entity),
        drop_statement(user_role::Entity),
        drop_statement(verification::Entity),
        drop_statement(identification::Entity),
        drop_statement(users::Entity),
        drop_statement(role::Entity),
    ]
}

/// Crée les tables manquantes sans rien supprimer (utilisé par les tests)
pub async fn create_tables<C: ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);

    for mut statement in create_statements(&schema) {
        statement.if_not_exists();
        conn.execute(backend.build(&statement)).await?;
    }
    Ok(())
}

/// Supprime puis recrée toutes les tables et insère l'admin
pub async fn init_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    crate::db::with_transaction(db, |txn| {
        Box::pin(async move {
            let backend = txn.get_database_backend();
            for statement in drop_statements() {
                txn.execute(backend.build(&statement)).await?;
            }
            create_tables(txn).await?;
            seed(txn).await?;
            Ok(())
        })
    })
    .await?;

    tracing::info!("All tables created and admin user inserted successfully");
    Ok(())
}

async fn seed(txn: &DatabaseTransaction) -> Result<(), DbErr> {
    let now = Utc::now();

    let mut admin_role_id = None;
    for name in ["admin", "physician", "patient"] {
        let inserted = role::ActiveModel {
            role_name: Set(name.to_string()),
            created_at: Set(Some(now.naive_utc())),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        if name == "admin" {
            admin_role_id = Some(inserted.role_id);
        }
    }
    let admin_role_id = admin_role_id.ok_or_else(|| DbErr::Custom("admin role not seeded".to_string()))?;

    let admin = users::ActiveModel {
        email: Set(ADMIN_EMAIL.to_string()),
        phone: Set(Some(ADMIN_PHONE.to_string())),
        created_at: Set(Some(now.naive_utc())),
        updated_at: Set(Some(now.naive_utc())),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    let admin_identification = identification::ActiveModel {
        user_id: Set(admin.user_id),
        id_type: Set(Some("nric".to_string())),
        number: Set(ADMIN_IDENTIFICATION_NUMBER.to_string()),
        mobile_number: Set(ADMIN_PHONE.to_string()),
        created_at: Set(Some(now.naive_utc())),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    verification::ActiveModel {
        user_id: Set(admin.user_id),
        identification_id: Set(admin_identification.identification_id),
        otp_code: Set(generate_code()),
        otp_sent_at: Set(now),
        otp_expiry: Set(now - Duration::seconds(1)),
        verified: Set(false),
        verified_at: Set(None),
        created_at: Set(Some(now.naive_utc())),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    user_role::ActiveModel {
        user_id: Set(admin.user_id),
        role_id: Set(admin_role_id),
        created_at: Set(Some(now.naive_utc())),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    Ok(())
}
