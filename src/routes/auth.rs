use crate::{
    auth::{AuthService, LoginRequest, RegisterRequest},
    error::AppError,
    response::ApiResponse,
};
use actix_web::{http::StatusCode, post, web, HttpResponse};

/// Register a new user
///
/// Creates a new account and returns a bearer token with the public user view.
/// 201 on success, 400 on invalid input, 409 when the email is taken.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let response = auth.register(register_data.into_inner()).await?;
    Ok(ApiResponse::success(StatusCode::CREATED, response, "Registration successful").into_response())
}

/// Login user
///
/// Authenticates a user and returns a fresh bearer token.
/// 200 on success, 400 when a field is missing, 401 on bad credentials.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    login_data: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = auth.login(login_data.into_inner()).await?;
    Ok(ApiResponse::success(StatusCode::OK, response, "Login successful").into_response())
}
