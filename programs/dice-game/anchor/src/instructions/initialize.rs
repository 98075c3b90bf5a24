use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};
use crate::pda;
use crate::state::VaultState;
use crate::DiceError;

/// Create the house vault and move the opening liquidity into it.
///
/// The vault is a plain system account derived from the house key, so each
/// house has exactly one and its balance is exactly the lamports sent to it.
/// Its accounting lives in a separate state PDA paid for by the house. There is
/// no top-up path: a second call finds the state account and fails with
/// `AlreadyInitialized`.
pub fn initialize(ctx: Context<Initialize>, amount: u64) -> Result<()> {
    let state_info = ctx.accounts.state.to_account_info();
    require!(pda::is_vacant(&state_info), DiceError::AlreadyInitialized);
    require!(amount > 0, DiceError::InvalidAmount);

    let rent = Rent::get()?;
    let vault_lamports = ctx
        .accounts
        .vault
        .lamports()
        .checked_add(amount)
        .ok_or(DiceError::Overflow)?;
    require!(
        vault_lamports >= rent.minimum_balance(0),
        DiceError::InvalidAmount
    );

    let cost = amount
        .checked_add(rent.minimum_balance(VaultState::LEN))
        .ok_or(DiceError::Overflow)?;
    require!(
        ctx.accounts.house.lamports() >= cost,
        DiceError::InsufficientFunds
    );

    let house = ctx.accounts.house.key();
    pda::create_account(
        &ctx.accounts.house.to_account_info(),
        &state_info,
        &ctx.accounts.system_program.to_account_info(),
        VaultState::LEN,
        &rent,
        &[VaultState::SEED, house.as_ref(), &[ctx.bumps.state]],
    )?;

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.house.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
            },
        ),
        amount,
    )?;

    pda::write(
        &state_info,
        &VaultState {
            house,
            vault_bump: ctx.bumps.vault,
            bump: ctx.bumps.state,
            liability: 0,
        },
    )?;

    msg!("Vault {} initialized for house: {}", ctx.accounts.vault.key(), house);
    msg!("Funded with {} lamports", amount);

    Ok(())
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub house: Signer<'info>,

    /// Holds lamports only; the first transfer into it creates it
    #[account(
        mut,
        seeds = [VaultState::VAULT_SEED, house.key().as_ref()],
        bump
    )]
    pub vault: SystemAccount<'info>,

    /// CHECK: created by the handler once the house is known to afford it, so
    /// an existing state reports `AlreadyInitialized` and a short house reports
    /// `InsufficientFunds` instead of a system program error
    #[account(
        mut,
        seeds = [VaultState::SEED, house.key().as_ref()],
        bump
    )]
    pub state: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}
