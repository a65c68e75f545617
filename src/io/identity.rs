use crate::model::session::Identity;

use super::remote::RemoteError;

/// Length of the hex uid derived from an email
const UID_LEN: usize = 16;

/// Turns a sign-in hint into an identity
pub trait IdentityProvider {
    fn sign_in(&self, email: &str) -> Result<Identity, RemoteError>;
}

/// Offline provider: the uid is a stable digest of the normalized email, so
/// the same address always maps to the same remote document.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalIdentityProvider;

impl IdentityProvider for LocalIdentityProvider {
    fn sign_in(&self, email: &str) -> Result<Identity, RemoteError> {
        let email = email.trim();
        let valid = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
        if !valid {
            return Err(RemoteError::SignIn(format!(
                "\"{}\" is not a valid email address.",
                email
            )));
        }
        let normalized = email.to_lowercase();
        let digest = blake3::hash(normalized.as_bytes()).to_hex();
        Ok(Identity {
            uid: digest.as_str()[..UID_LEN].to_string(),
            email: email.to_string(),
        })
    }
}
