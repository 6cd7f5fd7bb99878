//! # Challenge CLI
//!
//! `attest challenge` prints a freshly issued challenge as JSON, the same
//! shape a client embeds in a validation request.

use anyhow::Result;
use attest_core::{Challenge, Timestamp};
use clap::Args;

#[derive(Args, Debug)]
pub struct ChallengeArgs {
    /// Issue for this instant (milliseconds since the epoch) instead of now.
    #[arg(long)]
    pub at_ms: Option<i64>,
}

pub fn run_challenge(args: &ChallengeArgs) -> Result<u8> {
    let challenge = issue(args)?;
    println!("{}", serde_json::to_string_pretty(&challenge)?);
    Ok(0)
}

fn issue(args: &ChallengeArgs) -> Result<Challenge> {
    let at = match args.at_ms {
        Some(ms) => Timestamp::from_unix_millis(ms)?,
        None => Timestamp::now(),
    };
    tracing::debug!(nonce = at.unix_millis(), "issuing challenge");
    Ok(Challenge::issue(at))
}
