//! # Challenge Authentication
//!
//! Establishes the owner address of a request.
//!
//! | Request carries | Outcome |
//! |-----------------|---------|
//! | challenge + signature | owner = recovered signer, authenticated |
//! | challenge only | `MissingSignature` |
//! | no challenge, unauthenticated mode off | `UnauthenticatedNotAllowed` |
//! | no challenge, no `ownerAddress` | `OwnerAddressMissing` |
//! | no challenge, `ownerAddress` | owner = that address, not authenticated |
//!
//! A challenge is fresh at `now` iff
//! `now − tolerance ≤ nonce ≤ now` and `nonce + ttl > now` (milliseconds),
//! and its text embeds the nonce instant.

use std::sync::Arc;

use attest_core::{Address, Challenge, Timestamp, ValidationRequest};
use attest_crypto::{PersonalMessage, Signature, SignerRecovery};

use crate::error::TerminalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengePolicy {
    pub ttl_ms: u64,
    pub tolerance_ms: u64,
    pub allow_unauthenticated: bool,
}

impl ChallengePolicy {
    /// Check freshness of `challenge` at `now`.
    ///
    /// # Errors
    ///
    /// [`TerminalError::StaleChallengeResponse`] naming the failed rule.
    pub fn check_fresh(&self, challenge: &Challenge, now: Timestamp) -> Result<(), TerminalError> {
        let stale = |reason: &str| TerminalError::StaleChallengeResponse(reason.to_string());

        let issued = challenge
            .issued_at()
            .ok_or_else(|| stale("nonce is not a millisecond timestamp"))?;
        let nonce = i128::from(issued.unix_millis());
        let now = i128::from(now.unix_millis());

        if nonce > now {
            return Err(stale("challenge issued in the future"));
        }
        if nonce < now - i128::from(self.tolerance_ms) {
            return Err(stale("challenge issued too long ago"));
        }
        if nonce + i128::from(self.ttl_ms) <= now {
            return Err(stale("challenge expired"));
        }
        if !challenge.embeds_nonce() {
            return Err(stale("challenge text does not embed its nonce"));
        }
        Ok(())
    }
}

/// The established owner of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated {
    pub owner: Address,
    pub is_authenticated: bool,
}

/// Derives the request owner using a signature-recovery oracle.
pub struct ChallengeAuthenticator<R> {
    recovery: Arc<R>,
    policy: ChallengePolicy,
}

impl<R> Clone for ChallengeAuthenticator<R> {
    fn clone(&self) -> Self {
        Self {
            recovery: Arc::clone(&self.recovery),
            policy: self.policy,
        }
    }
}

impl<R: SignerRecovery> ChallengeAuthenticator<R> {
    pub fn new(recovery: Arc<R>, policy: ChallengePolicy) -> Self {
        Self { recovery, policy }
    }

    pub fn recovery(&self) -> &R {
        &self.recovery
    }

    /// Establish the owner of `request` at `now`.
    pub fn authenticate(
        &self,
        request: &ValidationRequest,
        now: Timestamp,
    ) -> Result<Authenticated, TerminalError> {
        match (&request.challenge, &request.signature) {
            (Some(_), None) => Err(TerminalError::MissingSignature),
            (Some(challenge), Some(signature)) => {
                let owner = self.recover_challenge_signer(challenge, signature, now)?;
                if let Some(claimed) = &request.owner_address {
                    if Address::new(claimed.as_str()).ok().as_ref() != Some(&owner) {
                        return Err(TerminalError::StaleChallengeResponse(
                            "ownerAddress does not match the challenge signer".to_string(),
                        ));
                    }
                }
                Ok(Authenticated {
                    owner,
                    is_authenticated: true,
                })
            }
            (None, _) => {
                if !self.policy.allow_unauthenticated {
                    return Err(TerminalError::UnauthenticatedNotAllowed);
                }
                let raw = request
                    .owner_address
                    .as_deref()
                    .ok_or(TerminalError::OwnerAddressMissing(None))?;
                let owner = Address::new(raw)
                    .map_err(|e| TerminalError::OwnerAddressMissing(Some(e.to_string())))?;
                Ok(Authenticated {
                    owner,
                    is_authenticated: false,
                })
            }
        }
    }

    fn recover_challenge_signer(
        &self,
        challenge: &Challenge,
        signature: &str,
        now: Timestamp,
    ) -> Result<Address, TerminalError> {
        self.policy.check_fresh(challenge, now)?;
        let signature = Signature::from_hex(signature)
            .map_err(|e| TerminalError::StaleChallengeResponse(e.to_string()))?;
        self.recovery
            .recover(&PersonalMessage::new(&challenge.text), &signature)
            .map_err(|e| TerminalError::StaleChallengeResponse(e.to_string()))
    }
}
