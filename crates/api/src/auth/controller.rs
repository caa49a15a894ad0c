//! Session/auth controller: credential checks for both portal roles.
//!
//! The controller is an explicit context object built per request from the
//! store and the configured [`AuthPolicy`]. It never issues tokens; the
//! handlers do that once a check has passed.

use helpdesk_core::credentials::{validate_ps_number, AdminCredentials, PasswordChangeForm};
use helpdesk_core::error::AuthError;
use helpdesk_db::models::admin::AdminCredentialRecord;
use helpdesk_db::models::user::EmployeeAccount;
use helpdesk_db::repositories::{AdminCredentialRepo, UserRepo};
use helpdesk_db::DocumentStore;

use crate::auth::password::{hash_password, verify_password};
use crate::config::AuthPolicy;
use crate::error::{AppError, AppResult};

pub struct AuthController<'a> {
    store: &'a dyn DocumentStore,
    policy: &'a AuthPolicy,
}

impl<'a> AuthController<'a> {
    pub fn new(store: &'a dyn DocumentStore, policy: &'a AuthPolicy) -> Self {
        Self { store, policy }
    }

    // -----------------------------------------------------------------------
    // Admin
    // -----------------------------------------------------------------------

    /// Return the stored admin credential pair, seeding it from the policy
    /// defaults when none exists yet.
    pub async fn ensure_admin_seeded(&self) -> AppResult<AdminCredentialRecord> {
        if let Some(record) = AdminCredentialRepo::get(self.store).await? {
            return Ok(record);
        }

        let hash = hash(&self.policy.admin_default_password)?;
        let record =
            AdminCredentialRepo::put(self.store, &self.policy.admin_username, &hash).await?;
        tracing::info!(username = %record.username, "Seeded admin credentials");
        Ok(record)
    }

    /// Check a candidate pair against the stored admin credentials.
    ///
    /// Both the username and the password must match.
    pub async fn login_admin(&self, candidate: &AdminCredentials) -> AppResult<()> {
        let record = self.ensure_admin_seeded().await?;
        let password_ok = verify(&candidate.password, &record.password_hash)?;

        if candidate.username != record.username || !password_ok {
            tracing::info!(username = %candidate.username, "Admin login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }
        Ok(())
    }

    /// Replace the admin password after verifying the current one.
    pub async fn change_admin_password(&self, form: &PasswordChangeForm) -> AppResult<()> {
        form.validate()?;

        let record = self.ensure_admin_seeded().await?;
        if !verify(&form.current_password, &record.password_hash)? {
            return Err(AuthError::WrongPassword.into());
        }

        let hash = hash(&form.new_password)?;
        AdminCredentialRepo::put(self.store, &record.username, &hash).await?;
        tracing::info!(username = %record.username, "Admin password changed");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Employees
    // -----------------------------------------------------------------------

    /// Authenticate an employee by PS number.
    ///
    /// An existing record must match the password. Without a record, the
    /// account is provisioned when auto-provisioning is enabled and the
    /// default password was presented.
    pub async fn login_user(&self, ps_number: &str, password: &str) -> AppResult<EmployeeAccount> {
        validate_ps_number(ps_number)?;
        let ps_number = ps_number.trim();

        match UserRepo::find(self.store, ps_number).await? {
            Some(account) => {
                if !verify(password, &account.password_hash)? {
                    tracing::info!(ps_number, "Employee login rejected");
                    return Err(AuthError::InvalidPassword.into());
                }
                Ok(account)
            }
            None if self.policy.user_auto_provision
                && password == self.policy.user_default_password =>
            {
                let account = UserRepo::create(self.store, ps_number, &hash(password)?).await?;
                tracing::info!(ps_number, "Provisioned employee account on first login");
                Ok(account)
            }
            None => Err(AuthError::UserNotFound.into()),
        }
    }

    /// Replace an employee's password.
    ///
    /// The current password is checked when the policy requires it.
    pub async fn change_user_password(
        &self,
        ps_number: &str,
        form: &PasswordChangeForm,
    ) -> AppResult<()> {
        form.validate()?;

        let account = UserRepo::find(self.store, ps_number)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if self.policy.user_change_requires_current
            && !verify(&form.current_password, &account.password_hash)?
        {
            return Err(AuthError::WrongPassword.into());
        }

        UserRepo::update_password(self.store, ps_number, &hash(&form.new_password)?).await?;
        tracing::info!(ps_number, "Employee password changed");
        Ok(())
    }
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

fn verify(password: &str, hash: &str) -> AppResult<bool> {
    verify_password(password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))
}
