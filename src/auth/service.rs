//! Registration and login.
//!
//! Both flows end by minting a bearer token and returning it with the redacted user
//! view. Login failures are indistinguishable to the caller: an unknown email and a
//! wrong password produce the same error, and an unknown email still pays for one
//! bcrypt verification so the two cases take comparable time.

use std::sync::Arc;

use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenCodec;
use crate::auth::{AuthResponse, LoginRequest, RegisterRequest, INVALID_CREDENTIALS};
use crate::error::{AppError, DUPLICATE_EMAIL_MESSAGE};
use crate::models::{normalize_email, NewUser, PublicUser};
use crate::store::UserStore;

pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenCodec,
    /// Verified against when the email is unknown.
    dummy_digest: String,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        tokens: TokenCodec,
    ) -> Result<Self, AppError> {
        let dummy_digest = hasher.hash("timing-equalizer")?;
        Ok(Self {
            users,
            hasher,
            tokens,
            dummy_digest,
        })
    }

    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }

    /// Creates an account and signs the new user in.
    ///
    /// Nothing is hashed or written unless validation passes and the email is free.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        request.validate_fields()?;

        let email = normalize_email(&request.email);
        if self.users.find_user_by_email(&email).await?.is_some() {
            log::info!("Registration rejected: email already in use");
            return Err(AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.into()));
        }

        let password_hash = self.hasher.hash_blocking(request.password).await?;
        let user = self
            .users
            .insert_user(NewUser {
                name: request.name.trim().to_string(),
                email,
                password_hash,
            })
            .await?;

        let token = self.tokens.mint(user.id)?;
        log::info!("Registered user {}", user.id);

        Ok(AuthResponse {
            token,
            user: PublicUser::from(&user),
        })
    }

    /// Checks credentials and issues a fresh token. Never mutates state.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        request.validate_fields()?;

        let email = normalize_email(&request.email);
        let user = self.users.find_user_by_email(&email).await?;

        let digest = user
            .as_ref()
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| self.dummy_digest.clone());
        let password_ok = self.hasher.verify_blocking(request.password, digest).await?;

        let user = match user {
            Some(user) if password_ok => user,
            _ => {
                log::warn!("Failed login attempt");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
            }
        };

        let token = self.tokens.mint(user.id)?;
        log::info!("User {} logged in", user.id);

        Ok(AuthResponse {
            token,
            user: PublicUser::from(&user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn service() -> (AuthService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = AuthService::new(
            store.clone(),
            PasswordHasher::new(4),
            TokenCodec::new("service-secret").unwrap(),
        )
        .unwrap();
        (service, store)
    }

    fn register_request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_register_then_login() {
        let (service, _) = service();

        let registered = service
            .register(register_request("Alice", "alice@x.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(
            registered.user,
            PublicUser {
                id: 1,
                name: "Alice".to_string(),
                email: "alice@x.com".to_string(),
            }
        );
        assert_eq!(service.tokens().verify(&registered.token), Ok(1));

        let logged_in = service
            .login(login_request("alice@x.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(logged_in.user, registered.user);
        assert_eq!(service.tokens().verify(&logged_in.token), Ok(1));
    }

    #[actix_rt::test]
    async fn test_duplicate_registration_conflicts_without_second_user() {
        let (service, store) = service();
        service
            .register(register_request("Alice", "alice@x.com", "secret1"))
            .await
            .unwrap();

        let again = service
            .register(register_request("Alice 2", "alice@x.com", "another1"))
            .await;
        assert!(matches!(again, Err(AppError::Conflict(_))));

        let differently_cased = service
            .register(register_request("Alice 3", "ALICE@X.com", "another1"))
            .await;
        assert!(matches!(differently_cased, Err(AppError::Conflict(_))));
        assert_eq!(store.user_count(), 1);
    }

    #[actix_rt::test]
    async fn test_register_validation_order() {
        let (service, store) = service();
        let cases = [
            (register_request("", "bad", "1"), "Name, email, and password are required"),
            (register_request("A", "", "secret1"), "Name, email, and password are required"),
            (register_request("A", "a@x.com", ""), "Name, email, and password are required"),
            (register_request("A", "not-an-email", "1"), "Please provide a valid email address"),
            (register_request("A", "a@x", "secret1"), "Please provide a valid email address"),
            (register_request("A", "a@x.com", "12345"), "Password must be at least 6 characters long"),
        ];

        for (request, expected) in cases {
            match service.register(request).await {
                Err(AppError::ValidationError(msg)) => assert_eq!(msg, expected),
                other => panic!("expected validation error {:?}, got {:?}", expected, other.err()),
            }
        }
        assert_eq!(store.user_count(), 0);
    }

    #[actix_rt::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _) = service();
        service
            .register(register_request("Alice", "alice@x.com", "secret1"))
            .await
            .unwrap();

        let wrong_password = service
            .login(login_request("alice@x.com", "wrong-password"))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(login_request("nobody@x.com", "secret1"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, AppError::Unauthorized(ref m) if m == INVALID_CREDENTIALS));
    }

    #[actix_rt::test]
    async fn test_login_requires_both_fields() {
        let (service, _) = service();
        for request in [login_request("", "secret1"), login_request("a@x.com", "")] {
            match service.login(request).await {
                Err(AppError::ValidationError(msg)) => {
                    assert_eq!(msg, "Email and password are required")
                }
                other => panic!("unexpected {:?}", other.err()),
            }
        }
    }

    #[actix_rt::test]
    async fn test_login_is_case_insensitive_on_email() {
        let (service, _) = service();
        service
            .register(register_request("Alice", "Alice@X.com", "secret1"))
            .await
            .unwrap();

        let logged_in = service
            .login(login_request("ALICE@x.COM", "secret1"))
            .await
            .unwrap();
        assert_eq!(logged_in.user.email, "alice@x.com");
    }
}
