//! Shared mock port implementations for handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::account::{Account, PasswordResetToken};
use crate::domain::foundation::{
    AccountId, AppointmentId, DomainError, EmailAddress, ErrorCode, TokenId,
};
use crate::domain::scheduling::Appointment;
use crate::ports::{
    AccountRepository, AppointmentRepository, CreateOutcome, IdentityStore, Mailer, NewIdentity,
    ResetTokenRepository,
};

// ════════════════════════════════════════════════════════════════════════════
// Accounts
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockAccountRepository {
    accounts: Mutex<Vec<Account>>,
    fail_create_profile: bool,
    fail_update: bool,
    lose_create_race: bool,
}

impl MockAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(account: Account) -> Self {
        Self {
            accounts: Mutex::new(vec![account]),
            ..Self::default()
        }
    }

    /// A repository whose profile phase always fails, for exercising
    /// compensation paths.
    pub fn failing_profile() -> Self {
        Self {
            fail_create_profile: true,
            ..Self::default()
        }
    }

    /// A repository whose update always fails.
    pub fn failing_update(account: Account) -> Self {
        Self {
            accounts: Mutex::new(vec![account]),
            fail_update: true,
            ..Self::default()
        }
    }

    /// A repository that always loses the create race: lookups see no
    /// account, creates hit a concurrent writer's unique email.
    pub fn losing_create_race() -> Self {
        Self {
            lose_create_race: true,
            ..Self::default()
        }
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.accounts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn create(&self, account: &Account) -> Result<CreateOutcome, DomainError> {
        let mut accounts = self.accounts.lock().unwrap();
        if self.lose_create_race || accounts.iter().any(|a| a.email == account.email) {
            return Ok(CreateOutcome::DuplicateEmail);
        }
        accounts.push(account.clone());
        Ok(CreateOutcome::Created)
    }

    async fn create_profile(&self, account: &Account) -> Result<(), DomainError> {
        if self.fail_create_profile {
            return Err(DomainError::database("profile insert failed"));
        }
        self.accounts.lock().unwrap().push(account.clone());
        Ok(())
    }

    async fn update(&self, account: &Account) -> Result<(), DomainError> {
        if self.fail_update {
            return Err(DomainError::database("update failed"));
        }
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.iter_mut().find(|a| a.id == account.id) {
            Some(existing) => {
                *existing = account.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::AccountNotFound,
                "account not found",
            )),
        }
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| &a.email == email).cloned())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| &a.id == id).cloned())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Identities
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct StoredIdentity {
    pub id: AccountId,
    pub email: EmailAddress,
    pub password_hash: String,
}

pub struct MockIdentityStore {
    identities: Mutex<Vec<StoredIdentity>>,
    deleted: Mutex<Vec<AccountId>>,
    duplicate: bool,
}

impl MockIdentityStore {
    pub fn new() -> Self {
        Self {
            identities: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            duplicate: false,
        }
    }

    /// A store that reports every email as already registered.
    pub fn with_duplicate() -> Self {
        Self {
            identities: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            duplicate: true,
        }
    }

    pub fn identities(&self) -> Vec<StoredIdentity> {
        self.identities.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<AccountId> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityStore for MockIdentityStore {
    async fn create_identity(&self, identity: &NewIdentity) -> Result<AccountId, DomainError> {
        if self.duplicate {
            return Err(DomainError::new(
                ErrorCode::DuplicateAccount,
                "email already registered",
            ));
        }
        let id = AccountId::new();
        self.identities.lock().unwrap().push(StoredIdentity {
            id,
            email: identity.email.clone(),
            password_hash: identity.password_hash.clone(),
        });
        Ok(id)
    }

    async fn delete_identity(&self, id: &AccountId) -> Result<(), DomainError> {
        self.identities.lock().unwrap().retain(|i| &i.id != id);
        self.deleted.lock().unwrap().push(*id);
        Ok(())
    }

    async fn update_identity(
        &self,
        id: &AccountId,
        email: Option<&EmailAddress>,
        password_hash: Option<&str>,
    ) -> Result<(), DomainError> {
        let mut identities = self.identities.lock().unwrap();
        let identity = identities
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or_else(|| DomainError::new(ErrorCode::AccountNotFound, "identity not found"))?;
        if let Some(email) = email {
            identity.email = email.clone();
        }
        if let Some(hash) = password_hash {
            identity.password_hash = hash.to_string();
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Reset tokens
// ════════════════════════════════════════════════════════════════════════════

pub struct MockResetTokenRepository {
    tokens: Mutex<Vec<PasswordResetToken>>,
    applied: Mutex<Vec<(TokenId, AccountId, String)>>,
}

impl MockResetTokenRepository {
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(Vec::new()),
            applied: Mutex::new(Vec::new()),
        }
    }

    pub fn with_token(token: PasswordResetToken) -> Self {
        Self {
            tokens: Mutex::new(vec![token]),
            applied: Mutex::new(Vec::new()),
        }
    }

    pub fn tokens(&self) -> Vec<PasswordResetToken> {
        self.tokens.lock().unwrap().clone()
    }

    /// The (token, account, new hash) triples applied so far.
    pub fn applied(&self) -> Vec<(TokenId, AccountId, String)> {
        self.applied.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResetTokenRepository for MockResetTokenRepository {
    async fn save(&self, token: &PasswordResetToken) -> Result<(), DomainError> {
        self.tokens.lock().unwrap().push(token.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<PasswordResetToken>, DomainError> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens.iter().find(|t| t.token == token).cloned())
    }

    async fn consume_and_apply(
        &self,
        token_id: &TokenId,
        account_id: &AccountId,
        new_password_hash: &str,
    ) -> Result<(), DomainError> {
        let mut tokens = self.tokens.lock().unwrap();
        let token = tokens
            .iter_mut()
            .find(|t| &t.id == token_id && !t.used)
            .ok_or_else(|| DomainError::new(ErrorCode::TokenInvalid, "token already consumed"))?;
        token.used = true;
        self.applied.lock().unwrap().push((
            *token_id,
            *account_id,
            new_password_hash.to_string(),
        ));
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Appointments
// ════════════════════════════════════════════════════════════════════════════

pub struct MockAppointmentRepository {
    appointments: Mutex<Vec<Appointment>>,
}

impl MockAppointmentRepository {
    pub fn new() -> Self {
        Self {
            appointments: Mutex::new(Vec::new()),
        }
    }

    pub fn with_appointments(appointments: Vec<Appointment>) -> Self {
        Self {
            appointments: Mutex::new(appointments),
        }
    }

    pub fn appointments(&self) -> Vec<Appointment> {
        self.appointments.lock().unwrap().clone()
    }
}

#[async_trait]
impl AppointmentRepository for MockAppointmentRepository {
    async fn find_scheduled_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, DomainError> {
        let appointments = self.appointments.lock().unwrap();
        Ok(appointments
            .iter()
            .filter(|a| a.needs_reminder() && a.scheduled_at.as_datetime().date_naive() == date)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &AppointmentId) -> Result<Option<Appointment>, DomainError> {
        let appointments = self.appointments.lock().unwrap();
        Ok(appointments.iter().find(|a| &a.id == id).cloned())
    }

    async fn mark_reminder_sent(&self, id: &AppointmentId) -> Result<(), DomainError> {
        let mut appointments = self.appointments.lock().unwrap();
        let appointment = appointments.iter_mut().find(|a| &a.id == id).ok_or_else(|| {
            DomainError::new(ErrorCode::AppointmentNotFound, "appointment not found")
        })?;
        appointment.reminder_sent = true;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Mailer
// ════════════════════════════════════════════════════════════════════════════

/// A record of one message handed to the mock mailer.
#[derive(Debug, Clone, PartialEq)]
pub enum SentMail {
    Welcome {
        to: String,
        temp_password: String,
    },
    PasswordReset {
        to: String,
        reset_link: String,
    },
    Reminder {
        appointment_id: AppointmentId,
        to: String,
    },
}

pub struct MockMailer {
    sent: Mutex<Vec<SentMail>>,
    fail: bool,
    /// Patient emails the mock refuses to deliver to (partial failure).
    refuse: Vec<String>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
            refuse: Vec::new(),
        }
    }

    /// A mailer whose every send fails.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
            refuse: Vec::new(),
        }
    }

    /// A mailer that fails only for the given recipient addresses.
    pub fn refusing(addresses: Vec<String>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
            refuse: addresses,
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_welcome_credentials(
        &self,
        to: &EmailAddress,
        _display_name: &str,
        temp_password: &str,
    ) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::mail("smtp relay unavailable"));
        }
        self.sent.lock().unwrap().push(SentMail::Welcome {
            to: to.to_string(),
            temp_password: temp_password.to_string(),
        });
        Ok(())
    }

    async fn send_password_reset(
        &self,
        to: &EmailAddress,
        _display_name: &str,
        reset_link: &str,
    ) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::mail("smtp relay unavailable"));
        }
        self.sent.lock().unwrap().push(SentMail::PasswordReset {
            to: to.to_string(),
            reset_link: reset_link.to_string(),
        });
        Ok(())
    }

    async fn send_appointment_reminder(
        &self,
        appointment: &Appointment,
    ) -> Result<(), DomainError> {
        if self.fail || self.refuse.contains(&appointment.patient_email) {
            return Err(DomainError::mail("smtp relay unavailable"));
        }
        self.sent.lock().unwrap().push(SentMail::Reminder {
            appointment_id: appointment.id,
            to: appointment.patient_email.clone(),
        });
        Ok(())
    }
}
