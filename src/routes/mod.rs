pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{error::InternalError, web, HttpRequest};

use crate::error::AppError;

/// Mounts the API routes. The caller nests this under `/api`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::login)
            .service(auth::register),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}

/// Makes extractor failures (bad JSON, non-UUID ids, bad query strings) answer with the
/// standard error envelope instead of actix's plain-text defaults.
pub fn json_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        let app_err = AppError::BadRequest(format!("Invalid JSON body: {}", err));
        InternalError::from_response(err, actix_web::ResponseError::error_response(&app_err))
            .into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
        let app_err = AppError::NotFound("Task not found".into());
        InternalError::from_response(err, actix_web::ResponseError::error_response(&app_err))
            .into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        let app_err = AppError::BadRequest(format!("Invalid query string: {}", err));
        InternalError::from_response(err, actix_web::ResponseError::error_response(&app_err))
            .into()
    }));
}
