pub mod auth;
pub mod health;
pub mod modules;
pub mod otp;

use actix_web::web;

use crate::errors::AppError;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // corps JSON illisible → 400 au même format que les autres erreurs
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into());

    cfg.app_data(json_config)
        .service(health::health_check)
        .configure(otp::otp_routes)
        .configure(auth::auth_routes)
        .configure(modules::module_routes);
}
