use crate::error::AppError;

/// bcrypt's default work factor; tens of milliseconds per hash on current hardware.
pub const DEFAULT_COST: u32 = 10;

/// Salted one-way password hashing.
///
/// Every digest embeds its own random salt, so hashing the same password twice gives
/// two different digests that both verify.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    /// Constant-time comparison against `digest`. A malformed digest verifies as `false`.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        match bcrypt::verify(password, digest) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("Stored password digest could not be parsed: {}", e);
                false
            }
        }
    }

    /// Runs `hash` on the blocking thread pool.
    pub async fn hash_blocking(&self, password: String) -> Result<String, AppError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::InternalServerError(format!("Hashing task failed: {}", e)))?
    }

    /// Runs `verify` on the blocking thread pool.
    pub async fn verify_blocking(&self, password: String, digest: String) -> Result<bool, AppError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| AppError::InternalServerError(format!("Verification task failed: {}", e)))
    }
}
