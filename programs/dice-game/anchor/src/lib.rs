use anchor_lang::prelude::*;

declare_id!("8jR5GeNzeweq35Uo84kGP3v1NcBaZWH5u62k7PxN4T2y");

pub mod attestation;
pub mod instructions;
pub mod payout;
pub mod pda;
pub mod state;

pub use instructions::*;
pub use state::*;

#[program]
pub mod dice_game {
    use super::*;

    /// Create the house vault and fund it with `amount` lamports
    pub fn initialize(ctx: Context<Initialize>, amount: u64) -> Result<()> {
        instructions::initialize(ctx, amount)
    }

    /// * `seed` - Caller-chosen nonce, unique per open bet under the vault
    /// * `roll` - Win threshold in 1..=99, the player wins when the outcome is at or below it
    /// * `amount` - Wager in lamports, moved into the vault immediately
    pub fn place_bet(ctx: Context<PlaceBet>, seed: u128, roll: u8, amount: u64) -> Result<()> {
        instructions::place_bet(ctx, seed, roll, amount)
    }

    /// Settle a bet using the house's Ed25519 signature over the bet account data.
    ///
    /// The transaction must carry the matching Ed25519 program instruction
    /// directly before this one.
    pub fn resolve_bet(ctx: Context<ResolveBet>, sig: Vec<u8>) -> Result<()> {
        instructions::resolve_bet(ctx, sig)
    }
}

#[error_code]
pub enum DiceError {
    #[msg("Vault is already initialized")]
    AlreadyInitialized,
    #[msg("Amount must be greater than zero")]
    InvalidAmount,
    #[msg("Insufficient funds")]
    InsufficientFunds,
    #[msg("Roll must be between 1 and 99")]
    InvalidRoll,
    #[msg("Wager must be greater than zero")]
    InvalidWager,
    #[msg("Seed is already used by an open bet")]
    SeedAlreadyUsed,
    #[msg("Signed message does not match the bet account")]
    MessageMismatch,
    #[msg("Signature was not produced by the vault's house")]
    SignerMismatch,
    #[msg("Ed25519 signature verification failed")]
    SignatureVerificationFailed,
    #[msg("Integer overflow detected")]
    Overflow,
    #[msg("Vault balance cannot cover the payout")]
    InsufficientVaultBalance,
}
