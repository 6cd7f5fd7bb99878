//! # Challenge
//!
//! A time-bound message a wallet signs to prove control of an address.
//! The `nonce` is the issuance instant in milliseconds since the Unix epoch,
//! as decimal text, and the `text` ends with that instant rendered in
//! ISO 8601 UTC. The binding between the two is what
//! [`Challenge::embeds_nonce`] checks: a caller cannot pair a fresh nonce
//! with text signed for a different instant.

use serde::{Deserialize, Serialize};

use crate::temporal::Timestamp;

/// The human-readable preamble of issued challenges.
pub const CHALLENGE_PREAMBLE: &str = "Please sign to prove you own this account.\n\nTime: ";

/// A signed-challenge pair as sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Issuance instant, decimal milliseconds.
    pub nonce: String,
    /// The exact text the wallet signed.
    pub text: String,
}

impl Challenge {
    /// Issue a challenge for the instant `now`.
    pub fn issue(now: Timestamp) -> Self {
        Self {
            nonce: now.unix_millis().to_string(),
            text: format!("{CHALLENGE_PREAMBLE}{}", now.to_iso8601()),
        }
    }

    /// Parse the nonce as an issuance instant.
    ///
    /// Returns `None` when the nonce is not a decimal integer or is outside
    /// the representable range.
    pub fn issued_at(&self) -> Option<Timestamp> {
        let millis: i64 = self.nonce.trim().parse().ok()?;
        Timestamp::from_unix_millis(millis).ok()
    }

    /// Whether `text` ends with the nonce instant in ISO 8601 form.
    pub fn embeds_nonce(&self) -> bool {
        self.issued_at()
            .map(|ts| self.text.ends_with(&ts.to_iso8601()))
            .unwrap_or(false)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    // 1970 through 2100.
    const MAX_MS: i64 = 4_102_444_800_000;

    proptest! {
        #[test]
        fn issued_challenges_bind_their_nonce(ms in 0i64..MAX_MS) {
            let c = Challenge::issue(Timestamp::from_unix_millis(ms).unwrap());
            prop_assert!(c.embeds_nonce());
            prop_assert_eq!(c.issued_at().map(|t| t.unix_millis()), Some(ms));
        }

        #[test]
        fn nonce_from_another_second_is_not_bound(ms in 0i64..MAX_MS, shift in 1_000i64..86_400_000) {
            let mut c = Challenge::issue(Timestamp::from_unix_millis(ms).unwrap());
            c.nonce = (ms + shift).to_string();
            prop_assert!(!c.embeds_nonce());
        }
    }
}
