//! Setup-time credential validation
//!
//! Before an account is accepted, one live login is attempted. The outcome is
//! mapped to the two failures an operator can act on: wrong credentials, or a
//! portal that could not be reached at all.

use crate::error::{AuthError, SetupError};
use crate::portal::{Credentials, PortalClient};
use tracing::{error, info};

pub async fn validate_credentials(
    client: &PortalClient,
    credentials: &Credentials,
) -> Result<(), SetupError> {
    match client.authenticate(credentials).await {
        Ok(_) => {
            info!("Credentials accepted by {}", client.base_url());
            Ok(())
        }
        Err(AuthError::InvalidCredentials) | Err(AuthError::TokenMissing) => {
            Err(SetupError::InvalidAuth)
        }
        Err(AuthError::PageUnavailable(reason)) => {
            error!("Connection error: {}", reason);
            Err(SetupError::CannotConnect(reason))
        }
    }
}
