use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::dto::{RegisterRequest, TokenResponse};
use crate::services::identity_service::{IdentityService, NewRegistration};
use crate::services::otp_service::OtpService;
use crate::utils::jwt::TokenIssuer;

/// Émet le token de session d'un utilisateur vérifié (avec son rôle s'il en a un)
pub async fn issue_session_token(
    db: &DatabaseConnection,
    issuer: &TokenIssuer,
    user_id: i32,
) -> AppResult<String> {
    let role_id = IdentityService::primary_role_id(db, user_id).await?;
    let token = issuer.issue(user_id, None, role_id)?;
    Ok(token)
}

/// POST /register - Créer un compte + identification (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
    issuer: web::Data<TokenIssuer>,
    otp: web::Data<OtpService>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let body = body.into_inner();
    let email = body.email.unwrap_or_default();
    let number = body.identification_number.unwrap_or_default();

    // 1. Vérifier si l'email existe déjà
    if IdentityService::find_user_by_email(db.get_ref(), &email).await?.is_some() {
        return Err(AppError::Conflict(
            "Email already exists. Please try another email.".to_string(),
        ));
    }

    // 2. Le numéro d'identification est la clé OTP : il doit être unique
    if IdentityService::find_identification_by_number(db.get_ref(), &number).await?.is_some() {
        return Err(AppError::Conflict(
            "Identification number already registered.".to_string(),
        ));
    }

    // 3. Créer User + Identification + Verification
    let user = IdentityService::create_user_with_identification(
        db.get_ref(),
        NewRegistration {
            email: email.clone(),
            phone: body.phone.unwrap_or_default(),
            identification_type: body.identification_type,
            identification_number: number,
        },
        otp.now(),
    )
    .await
    .map_err(|e| AppError::from_db_conflict(e, "Email or identification number already registered."))?;

    tracing::info!(user_id = user.user_id, "A registration was made");

    // 4. Générer le JWT
    let token = issue_session_token(db.get_ref(), issuer.get_ref(), user.user_id).await?;

    Ok(HttpResponse::Ok().json(TokenResponse {
        message: format!("User {} successfully created.", email),
        token,
    }))
}

/// GET /me - Profil de l'utilisateur connecté (PROTÉGÉE)
#[get("/me")]
pub async fn me(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let user = IdentityService::find_user_by_id(db.get_ref(), auth_user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("User with ID {} does not exist.", auth_user.user_id))
        })?;

    Ok(HttpResponse::Ok().json(user))
}

/// GET /me/appointments - Rendez-vous de l'utilisateur connecté (PROTÉGÉE)
#[get("/me/appointments")]
pub async fn my_appointments(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let appointments = IdentityService::appointments_for_user(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(appointments))
}

/// GET /me/billings - Factures de l'utilisateur connecté (PROTÉGÉE)
#[get("/me/billings")]
pub async fn my_billings(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let billings = IdentityService::billings_for_user(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(billings))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(me)
        .service(my_appointments)
        .service(my_billings);
}
