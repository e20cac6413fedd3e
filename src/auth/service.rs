//! Registration, login and password reset

use chrono::Duration;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidateEmail;

use super::mailer::Mailer;
use super::password::{MIN_PASSWORD_LEN, hash_password, verify_password};
use super::reset;
use super::token::TokenService;
use crate::account::validation::{generate_account_number, normalize_email};
use crate::account::{Account, AccountProfile, Gender, Identifier, NewAccount, ValidationError};
use crate::clock::Clock;
use crate::store::{StoreError, WalletStore};
use crate::wallet::WalletError;

/// Account-number collisions are retried this many times before giving up.
const ACCOUNT_NUMBER_ATTEMPTS: usize = 5;

/// Registration input, already deserialized from the request body
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub dob: Option<String>,
    pub gender: Option<String>,
}

/// Authenticated session: profile plus bearer token
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthSession {
    pub user: AccountProfile,
    pub token: String,
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::Missing { field })
    } else {
        Ok(value)
    }
}

fn check_password(password: &str) -> Result<(), WalletError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(WalletError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

pub struct AuthService {
    store: Arc<dyn WalletStore>,
    tokens: TokenService,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    reset_ttl: Duration,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn WalletStore>,
        tokens: TokenService,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
        reset_ttl: Duration,
    ) -> Self {
        Self {
            store,
            tokens,
            mailer,
            clock,
            reset_ttl,
        }
    }

    fn session(&self, account: &Account) -> Result<AuthSession, WalletError> {
        let token = self.tokens.issue(account.id).map_err(|e| {
            tracing::error!(error = %e, "Failed to issue token");
            WalletError::Internal
        })?;
        Ok(AuthSession {
            user: account.profile(),
            token,
        })
    }

    async fn lookup(&self, identifier: &str) -> Result<Account, WalletError> {
        let ident = Identifier::parse(identifier)?;
        self.store
            .find_by_identifier(&ident)
            .await?
            .ok_or(WalletError::NotFound("User"))
    }

    /// Create an account with zero balance and a fresh account number.
    pub async fn register(&self, reg: Registration) -> Result<AuthSession, WalletError> {
        let firstname = required("firstname", &reg.firstname)?;
        let lastname = required("lastname", &reg.lastname)?;
        let email = normalize_email(required("email", &reg.email)?);
        let phone = required("phone", &reg.phone)?;
        required("password", &reg.password)?;

        if !email.validate_email() {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                value: email,
                expected: "email address",
            }
            .into());
        }
        check_password(&reg.password)?;

        let gender = reg
            .gender
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(Gender::from_str)
            .transpose()
            .map_err(WalletError::Validation)?;
        let dob = reg
            .dob
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let password_hash = hash_password(&reg.password).map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            WalletError::Internal
        })?;

        let mut attempt = 0;
        let account = loop {
            attempt += 1;
            let new = NewAccount {
                firstname: firstname.to_string(),
                lastname: lastname.to_string(),
                email: email.clone(),
                phone: phone.to_string(),
                password_hash: password_hash.clone(),
                dob: dob.clone(),
                gender,
                account_number: generate_account_number(),
            };
            match self.store.create_account(new).await {
                Ok(account) => break account,
                Err(StoreError::Duplicate {
                    field: "account_number",
                }) if attempt < ACCOUNT_NUMBER_ATTEMPTS => {
                    tracing::warn!(attempt, "Account number collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        };

        tracing::info!(
            account_id = %account.id,
            account_number = %account.account_number,
            "Account registered"
        );
        self.session(&account)
    }

    pub async fn login(&self, identifier: &str, password: &str) -> Result<AuthSession, WalletError> {
        let account = match self.lookup(identifier).await {
            Err(WalletError::NotFound(_)) => {
                return Err(WalletError::Validation("User not found".into()));
            }
            other => other?,
        };
        if !verify_password(password, &account.password_hash) {
            tracing::warn!(account_id = %account.id, "Login with wrong password");
            return Err(WalletError::Validation("Invalid password".into()));
        }
        if !account.is_active {
            return Err(WalletError::InvalidOperation("Account is inactive"));
        }
        tracing::info!(account_id = %account.id, "Login");
        self.session(&account)
    }

    /// Issue a new reset code, replacing any pending one.
    ///
    /// Returns true when the code was emailed.
    pub async fn forgot_password(&self, identifier: &str) -> Result<bool, WalletError> {
        let ident = Identifier::parse(identifier)?;
        let account = self
            .store
            .find_by_identifier(&ident)
            .await?
            .ok_or(WalletError::NotFound("User"))?;

        let code = reset::issue(self.clock.now(), self.reset_ttl);
        self.store.set_reset_code(account.id, code.clone()).await?;
        tracing::info!(account_id = %account.id, expires_at = %code.expires_at, "Reset code issued");

        if !ident.is_email() {
            return Ok(false);
        }
        self.mailer
            .send_reset_code(
                &account.email,
                &account.firstname,
                &code.code,
                self.reset_ttl.num_minutes(),
            )
            .await
            .map_err(|e| {
                tracing::error!(account_id = %account.id, error = %e, "Reset email failed");
                WalletError::Internal
            })?;
        Ok(true)
    }

    pub async fn verify_code(&self, identifier: &str, code: &str) -> Result<(), WalletError> {
        required("code", code)?;
        let account = self.lookup(identifier).await?;
        reset::check(account.reset.as_ref(), code, self.clock.now())
    }

    /// Verify `code` and replace the password, clearing the code.
    pub async fn reset_password(
        &self,
        identifier: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), WalletError> {
        required("code", code)?;
        required("newPassword", new_password)?;
        check_password(new_password)?;

        let account = self.lookup(identifier).await?;
        let now = self.clock.now();
        reset::check(account.reset.as_ref(), code, now)?;

        let hash = hash_password(new_password).map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            WalletError::Internal
        })?;
        // The store re-checks the code atomically; a concurrent reset or a
        // newly issued code makes this fail with InvalidCode.
        self.store
            .complete_password_reset(account.id, code.trim(), now, hash)
            .await?;
        tracing::info!(account_id = %account.id, "Password reset");
        Ok(())
    }

    /// Resolve a bearer token to the account id it was issued for.
    pub fn authenticate(&self, token: &str) -> Result<Uuid, WalletError> {
        let claims = self.tokens.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            WalletError::Unauthorized
        })?;
        claims.account_id().ok_or(WalletError::Unauthorized)
    }
}
