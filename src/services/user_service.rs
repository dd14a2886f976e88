use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::database::models::User;
use crate::store::{Store, StoreError};
use crate::validation::ValidationErrors;

use super::{ServiceError, ServiceResult};

const HASH_SCHEME: &str = "sha256";

/// Registration payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Registration {
    #[validate(
        email(message = "This value is not a valid email address."),
        length(max = 180, message = "This value is not a valid email address.")
    )]
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Registration {
    /// Emails are compared and stored trimmed and lowercased
    fn normalized(mut self) -> Self {
        self.email = self.email.map(|email| email.trim().to_lowercase());
        self
    }
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
    password_min_length: usize,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, password_min_length: usize) -> Self {
        Self { store, password_min_length }
    }

    /// Create an account keyed by a unique email address
    pub async fn register(&self, registration: Registration) -> ServiceResult<User> {
        let registration = registration.normalized();
        let mut errors = ValidationErrors::new();
        errors.require("email", registration.email.as_ref());
        errors.require("password", registration.password.as_ref());
        if let Err(invalid) = registration.validate() {
            errors.merge(invalid);
        }

        let email = registration.email.unwrap_or_default();
        let password = registration.password.unwrap_or_default();
        if password.chars().count() < self.password_min_length {
            errors.add(
                "password",
                format!(
                    "This value is too short. It should have {} characters or more.",
                    self.password_min_length
                ),
            );
        }
        errors.into_result()?;

        if self.store.find_user_by_email(&email).await?.is_some() {
            warn!("Registration rejected, {} already exists", email);
            return Err(ServiceError::Conflict("User already exists".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            password_hash: hash_password(&password, &Uuid::new_v4().simple().to_string()),
            email,
            created_at: Utc::now(),
        };

        match self.store.insert_user(&user).await {
            Ok(()) => {}
            Err(StoreError::Conflict(_)) => {
                return Err(ServiceError::Conflict("User already exists".to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        info!("Registered user {}", user.email);
        Ok(user)
    }
}

/// Salted digest in the form `sha256$<salt>$<hex>`
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{}${}${}", HASH_SCHEME, salt, to_hex(&hasher.finalize()))
}

/// Check a candidate password against a stored digest
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(HASH_SCHEME), Some(salt), Some(_)) => hash_password(password, salt) == stored,
        _ => false,
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
