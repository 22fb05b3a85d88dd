// ============================================================================
// MODÈLE : VERIFICATION
// ============================================================================
//
// Description:
//   Code OTP courant d'une identification. Une seule ligne par
//   identification : chaque demande d'OTP écrase le code, les dates et le
//   flag verified au lieu d'insérer une nouvelle ligne.
//
// Colonnes:
//   - verification_id (SERIAL, PK)
//   - user_id (FK vers "User")
//   - identification_id (FK vers identification, UNIQUE)
//   - otp_code (VARCHAR(6))
//   - otp_sent_at (TIMESTAMPTZ)
//   - otp_expiry (TIMESTAMPTZ) - otp_sent_at + 5 minutes
//   - verified (BOOLEAN)
//   - verified_at (TIMESTAMPTZ, NULL tant que non vérifié)
//   - created_at (TIMESTAMP)
//
// Points d'attention:
//   - Jamais supprimée dans le flux normal
//   - Créée avec un code aléatoire déjà expiré lors de l'inscription
//
// ============================================================================

use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "verification")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub verification_id: i32,
    pub user_id: i32,
    #[sea_orm(unique)]
    pub identification_id: i32,
    #[serde(skip_serializing)]
    #[sea_orm(column_type = "String(StringLen::N(6))")]
    pub otp_code: String,
    pub otp_sent_at: DateTimeUtc,
    pub otp_expiry: DateTimeUtc,
    pub verified: bool,
    pub verified_at: Option<DateTimeUtc>,
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

    #[sea_orm(
        belongs_to = "super::identification::Entity",
        from = "Column::IdentificationId",
        to = "super::identification::Column::IdentificationId"
    )]
    Identification,
}

impl Related<super::identification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Identification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
