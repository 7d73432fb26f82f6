//! Admin passcode commands.
//!
//! # Usage
//!
//! ```bash
//! # Store the hash of a new passcode
//! wl-cli passcode set <passcode>
//!
//! # Check a passcode (exit code 1 if it does not match)
//! wl-cli passcode verify <passcode>
//! ```

use std::sync::Arc;

use widelist_catalogue::PasscodeGate;

use super::{CliError, connect};

/// Hash a passcode and store it, replacing any previous one.
pub async fn set(passcode: &str) -> Result<(), CliError> {
    let (_, service) = connect()?;
    let gate = PasscodeGate::new(Arc::clone(service.store()));

    gate.set(passcode).await?;

    tracing::info!("Admin passcode updated");
    Ok(())
}

/// Check a passcode against the stored hash.
pub async fn verify(passcode: &str) -> Result<(), CliError> {
    let (_, service) = connect()?;
    let gate = PasscodeGate::new(Arc::clone(service.store()));

    if gate.verify(passcode).await? {
        tracing::info!("Passcode is correct");
        Ok(())
    } else {
        Err(CliError::IncorrectPasscode)
    }
}
