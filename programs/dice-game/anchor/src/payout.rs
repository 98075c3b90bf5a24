use anchor_lang::prelude::*;
use solana_sha256_hasher::hash;

use crate::state::Bet;
use crate::DiceError;

/// House commission taken from every winning payout, in basis points (1.5%)
pub const HOUSE_EDGE_BPS: u64 = 150;
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Outcomes fall in 0..OUTCOME_RANGE
pub const OUTCOME_RANGE: u128 = 100;

/// Reduce a house signature to an outcome in 0..=99.
///
/// SHA-256 of the signature, read as two little-endian u128 halves that are
/// added together and taken modulo 100. Same bytes in, same outcome out.
pub fn extract_outcome(sig: &[u8; 64]) -> u8 {
    let digest = hash(sig).to_bytes();

    let mut lower = [0u8; 16];
    let mut upper = [0u8; 16];
    lower.copy_from_slice(&digest[..16]);
    upper.copy_from_slice(&digest[16..]);

    let value = u128::from_le_bytes(lower).wrapping_add(u128::from_le_bytes(upper));
    (value % OUTCOME_RANGE) as u8
}

pub fn is_win(outcome: u8, roll: u8) -> bool {
    outcome <= roll
}

/// Gross lamports returned to a winning player, stake included.
///
/// The fair multiplier is 100 / (roll + 1) because the player wins on
/// `roll + 1` of the 100 outcomes. The commission is deducted from the whole
/// payout before flooring:
///
/// payout = amount * (10_000 - HOUSE_EDGE_BPS) / (100 * (roll + 1))
///
/// Strictly decreasing in `roll`; capped at 49.25x the wager for roll = 1.
pub fn payout(amount: u64, roll: u8) -> Result<u64> {
    require!(
        (Bet::MIN_ROLL..=Bet::MAX_ROLL).contains(&roll),
        DiceError::InvalidRoll
    );

    let numerator = (amount as u128)
        .checked_mul((BPS_DENOMINATOR - HOUSE_EDGE_BPS) as u128)
        .ok_or(DiceError::Overflow)?;
    let denominator = OUTCOME_RANGE
        .checked_mul(roll as u128 + 1)
        .ok_or(DiceError::Overflow)?;
    let gross = numerator
        .checked_div(denominator)
        .ok_or(DiceError::Overflow)?;

    u64::try_from(gross).map_err(|_| error!(DiceError::Overflow))
}

/// Reserve the worst-case payout of a new bet against the vault.
///
/// `available` is the vault's free balance with the wager already deposited.
/// Returns the vault's new liability.
pub fn reserve(available: u64, liability: u64, amount: u64, roll: u8) -> Result<u64> {
    let max_payout = payout(amount, roll)?;
    let liability = liability
        .checked_add(max_payout)
        .ok_or(DiceError::Overflow)?;

    require!(available >= liability, DiceError::InsufficientVaultBalance);

    Ok(liability)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub outcome: u8,
    pub won: bool,
    /// Lamports to move from the vault to the player
    pub payout: u64,
    /// Vault liability once this bet's reservation is released
    pub liability: u64,
}

/// Decide a bet given its outcome and release its reservation.
///
/// A house win moves nothing; the wager already sits in the vault.
pub fn settle(outcome: u8, roll: u8, amount: u64, available: u64, liability: u64) -> Result<Settlement> {
    let reserved = payout(amount, roll)?;
    let liability = liability
        .checked_sub(reserved)
        .ok_or(DiceError::Overflow)?;

    let won = is_win(outcome, roll);
    let paid = if won { reserved } else { 0 };

    require!(available >= paid, DiceError::InsufficientVaultBalance);

    Ok(Settlement {
        outcome,
        won,
        payout: paid,
        liability,
    })
}
