use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::dto::{CreateModuleRequest, MessageResponse, ModuleListQuery, UpdateModuleRequest};
use crate::services::module_service::ModuleService;

fn not_found(code: &str) -> AppError {
    AppError::NotFound(format!("Module {} not found!", code))
}

/// POST /modules - Créer un module (PROTÉGÉE)
#[post("")]
pub async fn create_module(
    _auth_user: AuthUser,
    body: web::Json<CreateModuleRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    body.validate()?;

    let duplicate = || AppError::Conflict(format!("Module {} already exists! Cannot create duplicate.", body.mod_code));

    let created = ModuleService::create(db.get_ref(), &body.mod_code, &body.mod_name, body.credit)
        .await
        .map_err(|e| AppError::from_db_conflict(e, "Module already exists! Cannot create duplicate."))?
        .ok_or_else(duplicate)?;

    Ok(HttpResponse::Created().json(created))
}

/// GET /modules - Lister les modules (PROTÉGÉE)
/// Avec ?codes=A,B : seulement ces modules, indexés par code
#[get("")]
pub async fn list_modules(
    _auth_user: AuthUser,
    query: web::Query<ModuleListQuery>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    match query.code_list() {
        Some(codes) => {
            let modules = ModuleService::find_by_codes(db.get_ref(), &codes).await?;
            Ok(HttpResponse::Ok().json(modules))
        }
        None => {
            let modules = ModuleService::find_all(db.get_ref()).await?;
            Ok(HttpResponse::Ok().json(modules))
        }
    }
}

/// GET /modules/{code} - Lire un module (PROTÉGÉE)
#[get("/{code}")]
pub async fn get_module(
    _auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let code = path.into_inner();
    let module = ModuleService::find_by_code(db.get_ref(), &code)
        .await?
        .ok_or_else(|| not_found(&code))?;

    Ok(HttpResponse::Ok().json(module))
}

/// PUT /modules/{code} - Modifier les crédits d'un module (PROTÉGÉE)
#[put("/{code}")]
pub async fn update_module(
    _auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<UpdateModuleRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let code = path.into_inner();

    let module = ModuleService::update_credit(db.get_ref(), &code, body.credit)
        .await?
        .ok_or_else(|| not_found(&code))?;

    Ok(HttpResponse::Ok().json(module))
}

/// DELETE /modules/{code} - Supprimer un module (PROTÉGÉE)
#[delete("/{code}")]
pub async fn delete_module(
    _auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let code = path.into_inner();

    if !ModuleService::delete(db.get_ref(), &code).await? {
        return Err(not_found(&code));
    }

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: format!("Module {} deleted.", code),
    }))
}

pub fn module_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/modules")
            .service(create_module)
            .service(list_modules)
            .service(get_module)
            .service(update_module)
            .service(delete_module)
    );
}
