// ============================================================================
// MODÈLE : IDENTIFICATION
// ============================================================================
//
// Description:
//   Pièce d'identité enregistrée par un utilisateur. Le numéro (number) est
//   la clé utilisée pour démarrer la vérification OTP.
//
// Colonnes:
//   - identification_id (SERIAL, PK)
//   - user_id (FK vers "User")
//   - type (VARCHAR) - 'national_id' par défaut, 'nric', 'passport'...
//   - number (VARCHAR, UNIQUE)
//   - mobile_number (VARCHAR) - destinataire des codes OTP
//   - issued_date / expiry_date (DATE, optionnels)
//   - created_at (TIMESTAMP)
//
// ============================================================================

use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "identification")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub identification_id: i32,
    pub user_id: i32,
    #[serde(rename = "type")]
    #[sea_orm(column_name = "type")]
    pub id_type: Option<String>,
    #[sea_orm(unique)]
    pub number: String,
    pub mobile_number: String,
    pub issued_date: Option<Date>,
    pub expiry_date: Option<Date>,
    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::UserId"
    )]
    User,

    #[sea_orm(has_one = "super::verification::Entity")]
    Verification,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::verification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Verification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
