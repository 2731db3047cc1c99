//! Account domain: the account aggregate, credential handling and
//! password reset tokens.

mod account;
mod credential;
mod reset_token;

pub use account::Account;
pub use credential::{
    generate_temp_password, validate_password_policy, CredentialError, CredentialHasher,
    MIN_PASSWORD_LEN, TEMP_PASSWORD_LEN,
};
pub use reset_token::{PasswordResetToken, TokenStatus, RESET_TOKEN_TTL_SECS};
