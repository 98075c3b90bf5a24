use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions::ID as INSTRUCTIONS_SYSVAR_ID;
use anchor_lang::system_program::{self, Transfer};
use crate::attestation::{self, SIGNATURE_LEN};
use crate::payout;
use crate::state::{Bet, BetEvent, VaultState};
use crate::DiceError;

/// Settle a bet from the house's signature over the bet account.
///
/// The signature is the only source of randomness. Before it is trusted, the
/// preceding Ed25519 program instruction must show that the vault's house
/// signed exactly the live bet data with exactly these signature bytes.
///
/// A winning player is paid out of the vault. Either way the bet's reservation
/// is released and the bet account is closed to the player, so the same bet
/// cannot be resolved twice.
pub fn resolve_bet(ctx: Context<ResolveBet>, sig: Vec<u8>) -> Result<()> {
    let signature: [u8; SIGNATURE_LEN] = sig
        .as_slice()
        .try_into()
        .map_err(|_| error!(DiceError::SignatureVerificationFailed))?;

    // live account data, minus the discriminator
    let bet_info = ctx.accounts.bet.to_account_info();
    let message = bet_info
        .try_borrow_data()?
        .get(8..Bet::LEN)
        .map(<[u8]>::to_vec)
        .ok_or(DiceError::MessageMismatch)?;

    let ix = attestation::load_preceding_instruction(&ctx.accounts.instruction_sysvar)?;
    attestation::verify(&ix, &ctx.accounts.state.house, &message, &signature)?;

    let outcome = payout::extract_outcome(&signature);

    let rent = Rent::get()?;
    let available = VaultState::free_balance(ctx.accounts.vault.lamports(), &rent);
    let bet = &ctx.accounts.bet;
    let settlement = payout::settle(
        outcome,
        bet.roll,
        bet.amount,
        available,
        ctx.accounts.state.liability,
    )?;

    msg!("Bet outcome: {} (roll {})", outcome, bet.roll);

    if settlement.won {
        let house = ctx.accounts.house.key();
        let signer_seeds: &[&[u8]] = &[
            VaultState::VAULT_SEED,
            house.as_ref(),
            &[ctx.accounts.state.vault_bump],
        ];

        system_program::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.system_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.vault.to_account_info(),
                    to: ctx.accounts.player.to_account_info(),
                },
                &[signer_seeds],
            ),
            settlement.payout,
        )?;
        msg!("Player won {} lamports", settlement.payout);
    } else {
        msg!("House won, wager stays in the vault");
    }

    let event = BetEvent {
        outcome,
        player: bet.player,
        seed: bet.seed,
        roll: bet.roll,
        amount: bet.amount,
        payout: settlement.payout,
        won: settlement.won,
    };

    ctx.accounts.state.liability = settlement.liability;

    emit!(event);

    Ok(())
}

#[derive(Accounts)]
pub struct ResolveBet<'info> {
    /// Receives the payout and the bet account's rent
    #[account(mut)]
    pub player: SystemAccount<'info>,

    pub house: SystemAccount<'info>,

    #[account(
        mut,
        seeds = [VaultState::VAULT_SEED, house.key().as_ref()],
        bump = state.vault_bump
    )]
    pub vault: SystemAccount<'info>,

    #[account(
        mut,
        seeds = [VaultState::SEED, house.key().as_ref()],
        bump = state.bump,
        has_one = house
    )]
    pub state: Account<'info, VaultState>,

    #[account(
        mut,
        close = player,
        seeds = [Bet::SEED, vault.key().as_ref(), bet.seed.to_le_bytes().as_ref()],
        bump = bet.bump,
        has_one = player
    )]
    pub bet: Account<'info, Bet>,

    /// CHECK: address-checked instructions sysvar, read for the Ed25519 instruction
    #[account(address = INSTRUCTIONS_SYSVAR_ID)]
    pub instruction_sysvar: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}
