// ============================================================================
// SERVICE : OTP
// ============================================================================
//
// Workflow:
//   1. POST /otp/send : on retrouve l'identification par son numéro
//   2. Génération d'un code 6 chiffres (100000-999999) via OsRng
//   3. La ligne verification de l'identification est écrasée :
//      code, otp_sent_at = now, otp_expiry = now + 5 min, verified = false
//   4. Envoi du code au mobile (OtpSender, journalisé pour l'instant)
//   5. POST /otp/verify : identification → verification, puis contrôles
//      expiré → code différent → déjà utilisé
//   6. Succès : verified = true, verified_at = now, on retourne le user_id
//
// Points d'attention:
//   - Un seul code courant par identification (dernier écrit gagnant)
//   - Comparaison exacte du code (pas de trim)
//   - Même horloge pour l'émission et la validation
//   - Pas de compteur de tentatives ni de verrouillage
//
// ============================================================================

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::Rng;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use thiserror::Error;

use crate::db;
use crate::models::verification::{self, ActiveModel as VerificationActiveModel, Column as VerificationColumn, Entity as Verification};
use crate::services::clock::Clock;
use crate::services::identity_service::IdentityService;
use crate::services::otp_sender::OtpSender;

pub const OTP_TTL_MINUTES: i64 = 5;
const OTP_MIN: u32 = 100_000;
const OTP_MAX: u32 = 999_999;

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("Identification number {0} not found.")]
    NotFound(String),

    #[error("OTP has expired. Please request a new one.")]
    Expired,

    #[error("Invalid OTP.")]
    Mismatch,

    #[error("OTP has already been used. Please request a new one.")]
    AlreadyUsed,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Failed to send OTP: {0}")]
    Delivery(String),
}

/// Résultat d'un envoi d'OTP
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedCode {
    pub user_id: i32,
    pub mobile_number: String,
}

/// Génère un code OTP à 6 chiffres depuis le générateur du système
pub fn generate_code() -> String {
    OsRng.gen_range(OTP_MIN..=OTP_MAX).to_string()
}

#[derive(Clone)]
pub struct OtpService {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
    sender: Arc<dyn OtpSender>,
}

impl OtpService {
    pub fn new(db: DatabaseConnection, clock: Arc<dyn Clock>, sender: Arc<dyn OtpSender>) -> Self {
        OtpService { db, clock, sender }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Émet un nouveau code pour l'identification et l'envoie au mobile associé
    pub async fn issue_code(&self, identification_number: &str) -> Result<IssuedCode, OtpError> {
        let identification = IdentityService::find_identification_by_number(&self.db, identification_number)
            .await?
            .ok_or_else(|| OtpError::NotFound(identification_number.to_string()))?;

        let code = generate_code();
        let now = self.clock.now();
        let expiry = now + Duration::minutes(OTP_TTL_MINUTES);
        let user_id = identification.user_id;
        let identification_id = identification.identification_id;
        let stored_code = code.clone();

        db::with_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let updated = Verification::update_many()
                    .col_expr(VerificationColumn::OtpCode, Expr::value(stored_code.clone()))
                    .col_expr(VerificationColumn::OtpSentAt, Expr::value(now))
                    .col_expr(VerificationColumn::OtpExpiry, Expr::value(expiry))
                    .col_expr(VerificationColumn::Verified, Expr::value(false))
                    .col_expr(VerificationColumn::VerifiedAt, Expr::value(Option::<DateTime<Utc>>::None))
                    .filter(VerificationColumn::IdentificationId.eq(identification_id))
                    .exec(txn)
                    .await?;

                // Identification sans ligne verification : on la crée
                if updated.rows_affected == 0 {
                    VerificationActiveModel {
                        user_id: Set(user_id),
                        identification_id: Set(identification_id),
                        otp_code: Set(stored_code),
                        otp_sent_at: Set(now),
                        otp_expiry: Set(expiry),
                        verified: Set(false),
                        verified_at: Set(None),
                        created_at: Set(Some(now.naive_utc())),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                }
                Ok(())
            })
        })
        .await?;

        self.sender
            .send(&identification.mobile_number, &code)
            .await
            .map_err(OtpError::Delivery)?;

        tracing::info!(user_id, identification_id, "OTP issued");

        Ok(IssuedCode {
            user_id,
            mobile_number: identification.mobile_number,
        })
    }

    /// Valide le code soumis et retourne le user_id propriétaire
    pub async fn validate_code(&self, identification_number: &str, submitted_code: &str) -> Result<i32, OtpError> {
        let identification = IdentityService::find_identification_by_number(&self.db, identification_number)
            .await?
            .ok_or_else(|| OtpError::NotFound(identification_number.to_string()))?;

        let record = Verification::find()
            .filter(VerificationColumn::IdentificationId.eq(identification.identification_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| OtpError::NotFound(identification_number.to_string()))?;

        let now = self.clock.now();
        check_code(&record, submitted_code, now)?;

        // Ne passe à verified que si la ligne n'a pas bougé depuis la lecture
        let result = Verification::update_many()
            .col_expr(VerificationColumn::Verified, Expr::value(true))
            .col_expr(VerificationColumn::VerifiedAt, Expr::value(Some(now)))
            .filter(VerificationColumn::VerificationId.eq(record.verification_id))
            .filter(VerificationColumn::Verified.eq(false))
            .filter(VerificationColumn::OtpCode.eq(submitted_code))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(OtpError::AlreadyUsed);
        }

        tracing::info!(user_id = identification.user_id, "OTP verified");
        Ok(identification.user_id)
    }
}

fn check_code(record: &verification::Model, submitted_code: &str, now: DateTime<Utc>) -> Result<(), OtpError> {
    if now > record.otp_expiry {
        return Err(OtpError::Expired);
    }
    if record.otp_code != submitted_code {
        return Err(OtpError::Mismatch);
    }
    if record.verified {
        return Err(OtpError::AlreadyUsed);
    }
    Ok(())
}
