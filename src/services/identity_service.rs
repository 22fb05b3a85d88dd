use chrono::{DateTime, Duration, Utc};
use sea_orm::*;

use crate::db;
use crate::models::{appointment, billing, identification, patient, user_role, users, verification};
use crate::services::otp_service::generate_code;

pub const DEFAULT_IDENTIFICATION_TYPE: &str = "national_id";

/// Données d'inscription (déjà validées par le handler)
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub email: String,
    pub phone: String,
    pub identification_type: Option<String>,
    pub identification_number: String,
}

pub struct IdentityService;

impl IdentityService {
    /// Recherche un utilisateur par email (pré-contrôle d'unicité)
    pub async fn find_user_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await
    }

    pub async fn find_user_by_id(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(user_id).one(db).await
    }

    pub async fn find_identification_by_number(
        db: &DatabaseConnection,
        number: &str,
    ) -> Result<Option<identification::Model>, DbErr> {
        identification::Entity::find()
            .filter(identification::Column::Number.eq(number))
            .one(db)
            .await
    }

    /// Crée User + Identification + Verification dans une seule transaction.
    /// Le code placeholder expire dès sa création : il faut passer par
    /// POST /otp/send pour obtenir un code valide.
    pub async fn create_user_with_identification(
        db: &DatabaseConnection,
        registration: NewRegistration,
        now: DateTime<Utc>,
    ) -> Result<users::Model, DbErr> {
        db::with_transaction(db, move |txn| {
            Box::pin(async move {
                let user = users::ActiveModel {
                    email: Set(registration.email),
                    phone: Set(Some(registration.phone.clone())),
                    created_at: Set(Some(now.naive_utc())),
                    updated_at: Set(Some(now.naive_utc())),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                let identification = identification::ActiveModel {
                    user_id: Set(user.user_id),
                    id_type: Set(Some(
                        registration
                            .identification_type
                            .filter(|t| !t.is_empty())
                            .unwrap_or_else(|| DEFAULT_IDENTIFICATION_TYPE.to_string()),
                    )),
                    number: Set(registration.identification_number),
                    mobile_number: Set(registration.phone),
                    created_at: Set(Some(now.naive_utc())),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                verification::ActiveModel {
                    user_id: Set(user.user_id),
                    identification_id: Set(identification.identification_id),
                    otp_code: Set(generate_code()),
                    otp_sent_at: Set(now),
                    // déjà expiré : aucun code valide avant un vrai envoi
                    otp_expiry: Set(now - Duration::seconds(1)),
                    verified: Set(false),
                    verified_at: Set(None),
                    created_at: Set(Some(now.naive_utc())),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                Ok(user)
            })
        })
        .await
    }

    /// Premier rôle attribué à l'utilisateur, porté dans le token
    pub async fn primary_role_id(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Option<i32>, DbErr> {
        let assignment = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .order_by_asc(user_role::Column::UserRoleId)
            .one(db)
            .await?;

        Ok(assignment.map(|a| a.role_id))
    }

    async fn patient_ids(db: &DatabaseConnection, user_id: i32) -> Result<Vec<i32>, DbErr> {
        let patients = patient::Entity::find()
            .filter(patient::Column::UserId.eq(user_id))
            .all(db)
            .await?;

        Ok(patients.into_iter().map(|p| p.patient_id).collect())
    }

    /// Rendez-vous des dossiers patients de l'utilisateur, du plus ancien au plus récent
    pub async fn appointments_for_user(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<appointment::Model>, DbErr> {
        let patient_ids = Self::patient_ids(db, user_id).await?;
        if patient_ids.is_empty() {
            return Ok(Vec::new());
        }

        appointment::Entity::find()
            .filter(appointment::Column::PatientId.is_in(patient_ids))
            .order_by_asc(appointment::Column::DateTime)
            .order_by_asc(appointment::Column::ApptId)
            .all(db)
            .await
    }

    pub async fn billings_for_user(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<billing::Model>, DbErr> {
        let patient_ids = Self::patient_ids(db, user_id).await?;
        if patient_ids.is_empty() {
            return Ok(Vec::new());
        }

        billing::Entity::find()
            .filter(billing::Column::PatientId.is_in(patient_ids))
            .order_by_asc(billing::Column::BillId)
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::physician;
    use crate::test_support::{memory_db, register};
    use sea_orm::prelude::Decimal;

    #[tokio::test]
    async fn test_create_user_with_identification() {
        let db = memory_db().await;
        let user = register(&db, "a@x.com", "S1111111A", "+6580000000").await;

        let found = IdentityService::find_user_by_email(&db, "a@x.com").await.unwrap().unwrap();
        assert_eq!(found, user);
        assert_eq!(found.phone.as_deref(), Some("+6580000000"));

        let identification = IdentityService::find_identification_by_number(&db, "S1111111A")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(identification.user_id, user.user_id);
        assert_eq!(identification.id_type.as_deref(), Some(DEFAULT_IDENTIFICATION_TYPE));
        assert_eq!(identification.mobile_number, "+6580000000");

        let verification = verification::Entity::find().one(&db).await.unwrap().unwrap();
        assert_eq!(verification.identification_id, identification.identification_id);
        assert!(!verification.verified);
        assert_eq!(verification.otp_expiry, verification.otp_sent_at);
    }

    #[tokio::test]
    async fn test_duplicate_email_rolls_back() {
        let db = memory_db().await;
        register(&db, "a@x.com", "S1111111A", "+6580000000").await;

        let result = IdentityService::create_user_with_identification(
            &db,
            NewRegistration {
                email: "a@x.com".to_string(),
                phone: "+6580000001".to_string(),
                identification_type: Some("passport".to_string()),
                identification_number: "E2222222".to_string(),
            },
            Utc::now(),
        )
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))));
        assert_eq!(users::Entity::find().count(&db).await.unwrap(), 1);
        assert!(IdentityService::find_identification_by_number(&db, "E2222222")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_unknown_lookups() {
        let db = memory_db().await;

        assert!(IdentityService::find_user_by_email(&db, "nobody@x.com").await.unwrap().is_none());
        assert!(IdentityService::find_user_by_id(&db, 42).await.unwrap().is_none());
        assert!(IdentityService::primary_role_id(&db, 42).await.unwrap().is_none());
        assert!(IdentityService::appointments_for_user(&db, 42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_appointments_and_billings() {
        let db = memory_db().await;
        let doctor = register(&db, "dr@x.com", "S3333333C", "+6581111111").await;
        let user = register(&db, "p@x.com", "S4444444D", "+6582222222").await;
        let now = Utc::now().naive_utc();

        let physician = physician::ActiveModel {
            user_id: Set(doctor.user_id),
            first_name: Set(Some("Mei".to_string())),
            last_name: Set(Some("Tan".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let patient = patient::ActiveModel {
            user_id: Set(user.user_id),
            first_name: Set(Some("Ali".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let later = appointment::ActiveModel {
            physician_id: Set(physician.physician_id),
            patient_id: Set(patient.patient_id),
            date_time: Set(now + chrono::Duration::days(2)),
            status: Set(Some("scheduled".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let sooner = appointment::ActiveModel {
            physician_id: Set(physician.physician_id),
            patient_id: Set(patient.patient_id),
            date_time: Set(now + chrono::Duration::days(1)),
            status: Set(Some("scheduled".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        billing::ActiveModel {
            patient_id: Set(patient.patient_id),
            appt_id: Set(sooner.appt_id),
            amount: Set(Decimal::new(4550, 2)),
            status: Set(Some("pending".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let appointments = IdentityService::appointments_for_user(&db, user.user_id).await.unwrap();
        let ids: Vec<i32> = appointments.iter().map(|a| a.appt_id).collect();
        assert_eq!(ids, vec![sooner.appt_id, later.appt_id]);

        let billings = IdentityService::billings_for_user(&db, user.user_id).await.unwrap();
        assert_eq!(billings.len(), 1);
        assert_eq!(billings[0].amount, Decimal::new(4550, 2));

        assert!(IdentityService::appointments_for_user(&db, doctor.user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_primary_role_id() {
        let db = memory_db().await;
        let user = register(&db, "a@x.com", "S1111111A", "+6580000000").await;
        let role = crate::models::role::ActiveModel {
            role_name: Set("patient".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        user_role::ActiveModel {
            user_id: Set(user.user_id),
            role_id: Set(role.role_id),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        assert_eq!(
            IdentityService::primary_role_id(&db, user.user_id).await.unwrap(),
            Some(role.role_id)
        );
    }
}
