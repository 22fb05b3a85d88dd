use actix_web::{post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::errors::AppResult;
use crate::models::dto::{MessageResponse, SendOtpRequest, TokenResponse, VerifyOtpRequest};
use crate::routes::auth::issue_session_token;
use crate::services::otp_service::OtpService;
use crate::utils::jwt::TokenIssuer;

/// POST /otp/send - Envoyer un code OTP au mobile de l'identification (PUBLIC)
#[post("/send")]
pub async fn send_otp(
    body: web::Json<SendOtpRequest>,
    otp: web::Data<OtpService>,
) -> AppResult<HttpResponse> {
    tracing::info!("Request to send OTP");
    body.validate()?;

    let number = body.identification_number.as_deref().unwrap_or_default();
    let issued = otp.issue_code(number).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: format!("OTP sent to {}.", issued.mobile_number),
    }))
}

/// POST /otp/verify - Vérifier le code et émettre le token (PUBLIC)
#[post("/verify")]
pub async fn verify_otp(
    body: web::Json<VerifyOtpRequest>,
    otp: web::Data<OtpService>,
    issuer: web::Data<TokenIssuer>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    tracing::info!("Request to verify OTP");
    body.validate()?;

    let number = body.identification_number.as_deref().unwrap_or_default();
    let code = body.otp.as_deref().unwrap_or_default();

    // 1. Vérifier le code
    let user_id = otp.validate_code(number, code).await?;

    // 2. Générer le JWT
    let token = issue_session_token(db.get_ref(), issuer.get_ref(), user_id).await?;

    Ok(HttpResponse::Ok().json(TokenResponse {
        message: "Token successfully issued.".to_string(),
        token,
    }))
}

pub fn otp_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/otp")
            .service(send_otp)
            .service(verify_otp)
    );
}
