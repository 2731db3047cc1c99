//! RequestPasswordResetHandler - Command handler for reset link requests.
//!
//! Anti-enumeration: the caller gets the same generic acknowledgement
//! whether the email is malformed, unknown, or belongs to an account.
//! Only the account owner learns anything, via their inbox.

use std::sync::Arc;

use crate::domain::account::PasswordResetToken;
use crate::domain::foundation::{DomainError, EmailAddress, Timestamp};
use crate::ports::{AccountRepository, Mailer, ResetTokenRepository};

/// Generic acknowledgement, returned for every request shape.
const GENERIC_MESSAGE: &str =
    "Se o email estiver cadastrado, enviaremos um link para redefinir a senha.";

/// Command to request a password reset link.
#[derive(Debug, Clone)]
pub struct RequestPasswordResetCommand {
    pub email: String,
}

/// Result of a reset request. Identical for known and unknown emails.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPasswordResetResult {
    pub message: String,
}

/// Handler for password reset requests.
pub struct RequestPasswordResetHandler {
    accounts: Arc<dyn AccountRepository>,
    tokens: Arc<dyn ResetTokenRepository>,
    mailer: Arc<dyn Mailer>,
    /// Public origin used to build reset links, e.g. `https://app.amparo.com.br`.
    public_base_url: String,
}

impl RequestPasswordResetHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        tokens: Arc<dyn ResetTokenRepository>,
        mailer: Arc<dyn Mailer>,
        public_base_url: String,
    ) -> Self {
        Self {
            accounts,
            tokens,
            mailer,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn handle(
        &self,
        cmd: RequestPasswordResetCommand,
    ) -> Result<RequestPasswordResetResult, DomainError> {
        let generic = RequestPasswordResetResult {
            message: GENERIC_MESSAGE.to_string(),
        };

        // A malformed address can't belong to an account. Same answer.
        let Ok(email) = EmailAddress::new(&cmd.email) else {
            return Ok(generic);
        };

        let Some(account) = self.accounts.find_by_email(&email).await? else {
            tracing::debug!("reset requested for unknown email");
            return Ok(generic);
        };

        let token = PasswordResetToken::issue(account.id, Timestamp::now());
        self.tokens.save(&token).await?;

        let reset_link = format!(
            "{}/redefinir-senha?token={}",
            self.public_base_url, token.token
        );

        if let Err(e) = self
            .mailer
            .send_password_reset(&account.email, &account.display_name, &reset_link)
            .await
        {
            // The response stays generic; the failure is for operators.
            tracing::error!(account_id = %account.id, error = %e, "failed to send reset email");
        }

        Ok(generic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::mocks::{
        MockAccountRepository, MockMailer, MockResetTokenRepository, SentMail,
    };
    use crate::domain::account::Account;
    use crate::domain::foundation::AccountId;

    const BASE_URL: &str = "https://app.amparo.com.br";

    fn account(email: &str) -> Account {
        Account::new(
            AccountId::new(),
            EmailAddress::new(email).unwrap(),
            "Maria".to_string(),
            None,
            "$argon2id$x".to_string(),
            Timestamp::now(),
        )
    }

    fn handler(
        accounts: Arc<MockAccountRepository>,
        tokens: Arc<MockResetTokenRepository>,
        mailer: Arc<MockMailer>,
    ) -> RequestPasswordResetHandler {
        RequestPasswordResetHandler::new(accounts, tokens, mailer, BASE_URL.to_string())
    }

    #[tokio::test]
    async fn known_email_gets_token_and_reset_link() {
        let accounts = Arc::new(MockAccountRepository::with_account(account(
            "maria@example.com",
        )));
        let tokens = Arc::new(MockResetTokenRepository::new());
        let mailer = Arc::new(MockMailer::new());
        let h = handler(accounts, tokens.clone(), mailer.clone());

        h.handle(RequestPasswordResetCommand {
            email: "maria@example.com".to_string(),
        })
        .await
        .unwrap();

        let saved = tokens.tokens();
        assert_eq!(saved.len(), 1);

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        match &sent[0] {
            SentMail::PasswordReset { to, reset_link } => {
                assert_eq!(to, "maria@example.com");
                assert_eq!(
                    reset_link,
                    &format!("{}/redefinir-senha?token={}", BASE_URL, saved[0].token)
                );
            }
            other => panic!("unexpected mail: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_email_gets_identical_response_and_no_mail() {
        let accounts = Arc::new(MockAccountRepository::with_account(account(
            "maria@example.com",
        )));
        let tokens = Arc::new(MockResetTokenRepository::new());
        let mailer = Arc::new(MockMailer::new());
        let h = handler(accounts, tokens.clone(), mailer.clone());

        let known = h
            .handle(RequestPasswordResetCommand {
                email: "maria@example.com".to_string(),
            })
            .await
            .unwrap();
        let unknown = h
            .handle(RequestPasswordResetCommand {
                email: "desconhecida@example.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(known, unknown);
        assert_eq!(tokens.tokens().len(), 1);
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn malformed_email_gets_identical_response() {
        let tokens = Arc::new(MockResetTokenRepository::new());
        let mailer = Arc::new(MockMailer::new());
        let h = handler(
            Arc::new(MockAccountRepository::new()),
            tokens.clone(),
            mailer.clone(),
        );

        let result = h
            .handle(RequestPasswordResetCommand {
                email: "nao-e-email".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.message, GENERIC_MESSAGE);
        assert!(tokens.tokens().is_empty());
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn mail_failure_still_returns_generic_ok() {
        let accounts = Arc::new(MockAccountRepository::with_account(account(
            "maria@example.com",
        )));
        let tokens = Arc::new(MockResetTokenRepository::new());
        let h = handler(accounts, tokens.clone(), Arc::new(MockMailer::failing()));

        let result = h
            .handle(RequestPasswordResetCommand {
                email: "maria@example.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.message, GENERIC_MESSAGE);
        // Token stays issued; the user can retry and the link may still arrive.
        assert_eq!(tokens.tokens().len(), 1);
    }

    #[tokio::test]
    async fn repeated_requests_issue_independent_tokens() {
        let accounts = Arc::new(MockAccountRepository::with_account(account(
            "maria@example.com",
        )));
        let tokens = Arc::new(MockResetTokenRepository::new());
        let mailer = Arc::new(MockMailer::new());
        let h = handler(accounts, tokens.clone(), mailer);

        for _ in 0..3 {
            h.handle(RequestPasswordResetCommand {
                email: "maria@example.com".to_string(),
            })
            .await
            .unwrap();
        }

        let saved = tokens.tokens();
        assert_eq!(saved.len(), 3);
        assert!(saved.iter().all(|t| !t.used));
    }
}
