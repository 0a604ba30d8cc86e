use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::TokenCodec;
use crate::error::AppError;

/// Resolves the caller's user id from an `Authorization` header value.
///
/// Only the `Bearer <token>` scheme is accepted. The check is stateless: the token's
/// signature and expiry are verified, the user store is never consulted.
pub fn authenticate(authorization: Option<&str>, codec: &TokenCodec) -> Result<i32, AppError> {
    let token = authorization
        .and_then(|value| value.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("Bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;

    codec.verify(token).map_err(AppError::from)
}

/// The authenticated caller, resolved from the request's bearer token.
///
/// Handlers take this as an argument and pass the id on to the services explicitly;
/// nothing is stashed in request extensions. Extraction fails with 401 when the header
/// is missing or the token is invalid or expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUserId(pub i32);

impl FromRequest for AuthenticatedUserId {
    type Error = ActixError; // AppError will be converted into ActixError via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let codec = match req.app_data::<web::Data<TokenCodec>>() {
            Some(codec) => codec,
            None => {
                let err = AppError::InternalServerError(
                    "TokenCodec is not registered as app data".into(),
                );
                return ready(Err(err.into()));
            }
        };

        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let result = authenticate(authorization, codec).map(AuthenticatedUserId);
        if let Err(err) = &result {
            log::warn!("Rejected request to {}: {}", req.path(), err);
        }
        ready(result.map_err(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use chrono::{Duration, Utc};

    fn codec() -> TokenCodec {
        TokenCodec::new("extractor-secret").unwrap()
    }

    #[test]
    fn test_authenticate_header_parsing() {
        let codec = codec();
        let token = codec.mint(5).unwrap();

        let bearer = format!("Bearer {}", token);
        let lowercase = format!("bearer {}", token);
        assert_eq!(authenticate(Some(bearer.as_str()), &codec).unwrap(), 5);
        assert_eq!(authenticate(Some(lowercase.as_str()), &codec).unwrap(), 5);

        for header in [None, Some(""), Some("Bearer"), Some("Bearer   "), Some("Basic abc")] {
            match authenticate(header, &codec) {
                Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Missing token"),
                other => panic!("expected Unauthorized for {:?}, got {:?}", header, other),
            }
        }

        let raw = authenticate(Some(token.as_str()), &codec);
        assert!(matches!(raw, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_authenticate_rejects_bad_tokens() {
        let codec = codec();
        let expired = codec.mint_at(5, Utc::now() - Duration::hours(2)).unwrap();

        let bearer = format!("Bearer {}", expired);
        match authenticate(Some(bearer.as_str()), &codec) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Token expired"),
            other => panic!("unexpected {:?}", other),
        }
        match authenticate(Some("Bearer garbage"), &codec) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_authenticated_user_id_extractor_success() {
        let codec = codec();
        let token = codec.mint(123).unwrap();
        let req = TestRequest::default()
            .app_data(web::Data::new(codec))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        let mut payload = Payload::None;
        let extracted_id = AuthenticatedUserId::from_request(&req, &mut payload).await;
        assert_eq!(extracted_id.unwrap(), AuthenticatedUserId(123));
    }

    #[actix_rt::test]
    async fn test_authenticated_user_id_extractor_failure() {
        let req = TestRequest::default()
            .app_data(web::Data::new(codec()))
            .to_http_request();

        let mut payload = Payload::None;
        let err = AuthenticatedUserId::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_extractor_without_codec_is_server_error() {
        let req = TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let err = AuthenticatedUserId::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
