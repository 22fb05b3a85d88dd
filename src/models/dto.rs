// DTOs des requêtes et réponses API
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SendOtpRequest {
    #[validate(
        required(message = "Missing identification number."),
        length(min = 1, message = "Missing identification number.")
    )]
    pub identification_number: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(
        required(message = "Missing identification number or OTP."),
        length(min = 1, message = "Missing identification number or OTP.")
    )]
    pub identification_number: Option<String>,
    #[validate(
        required(message = "Missing identification number or OTP."),
        length(min = 1, message = "Missing identification number or OTP.")
    )]
    pub otp: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(required(message = "Missing email."), length(min = 1, message = "Missing email."))]
    pub email: Option<String>,
    #[validate(required(message = "Missing phone."), length(min = 1, message = "Missing phone."))]
    pub phone: Option<String>,
    pub identification_type: Option<String>, // 'national_id' par défaut
    #[validate(
        required(message = "Missing identification number."),
        length(min = 1, message = "Missing identification number.")
    )]
    pub identification_number: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateModuleRequest {
    #[validate(length(min = 1, max = 20, message = "Module code must be 1-20 characters."))]
    pub mod_code: String,
    #[validate(length(min = 1, message = "Missing module name."))]
    pub mod_name: String,
    #[validate(range(min = 0, message = "Credit cannot be negative."))]
    pub credit: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateModuleRequest {
    #[validate(range(min = 0, message = "Credit cannot be negative."))]
    pub credit: i32,
}

// GET /modules?codes=A,B
#[derive(Debug, Deserialize)]
pub struct ModuleListQuery {
    pub codes: Option<String>,
}

impl ModuleListQuery {
    /// Codes séparés par des virgules, vides ignorés
    pub fn code_list(&self) -> Option<Vec<String>> {
        self.codes.as_ref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

// Réponse après vérification OTP / inscription
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
