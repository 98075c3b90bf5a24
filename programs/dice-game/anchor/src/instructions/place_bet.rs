use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};
use crate::payout;
use crate::pda;
use crate::state::{Bet, VaultState};
use crate::DiceError;

/// Open a bet and move the wager into the vault.
///
/// The bet PDA is derived from the vault and the player's seed, so a seed can
/// back only one open bet per vault. The wager joins the vault immediately and
/// the bet's worst-case payout is reserved against the vault's free balance.
pub fn place_bet(ctx: Context<PlaceBet>, seed: u128, roll: u8, amount: u64) -> Result<()> {
    require!(
        (Bet::MIN_ROLL..=Bet::MAX_ROLL).contains(&roll),
        DiceError::InvalidRoll
    );
    require!(amount > 0, DiceError::InvalidWager);

    let bet_info = ctx.accounts.bet.to_account_info();
    require!(pda::is_vacant(&bet_info), DiceError::SeedAlreadyUsed);

    let rent = Rent::get()?;
    let cost = amount
        .checked_add(rent.minimum_balance(Bet::LEN))
        .ok_or(DiceError::Overflow)?;
    require!(
        ctx.accounts.player.lamports() >= cost,
        DiceError::InsufficientFunds
    );

    // free balance as it will be once the wager lands
    let vault_lamports = ctx
        .accounts
        .vault
        .lamports()
        .checked_add(amount)
        .ok_or(DiceError::Overflow)?;
    let available = VaultState::free_balance(vault_lamports, &rent);
    let liability = payout::reserve(available, ctx.accounts.state.liability, amount, roll)?;

    let vault = ctx.accounts.vault.key();
    pda::create_account(
        &ctx.accounts.player.to_account_info(),
        &bet_info,
        &ctx.accounts.system_program.to_account_info(),
        Bet::LEN,
        &rent,
        &[
            Bet::SEED,
            vault.as_ref(),
            &seed.to_le_bytes(),
            &[ctx.bumps.bet],
        ],
    )?;

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.player.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
            },
        ),
        amount,
    )?;

    let bet = Bet {
        player: ctx.accounts.player.key(),
        seed,
        slot: Clock::get()?.slot,
        amount,
        roll,
        bump: ctx.bumps.bet,
    };
    pda::write(&bet_info, &bet)?;

    ctx.accounts.state.liability = liability;

    msg!("Bet placed by {} at slot {}", bet.player, bet.slot);
    msg!("Roll: {}, wager: {} lamports", roll, amount);
    msg!("Vault liability: {}", liability);

    Ok(())
}

#[derive(Accounts)]
#[instruction(seed: u128)]
pub struct PlaceBet<'info> {
    #[account(mut)]
    pub player: Signer<'info>,

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

    /// CHECK: created by the handler after the funds check; an occupied
    /// address is an open bet under the same seed and fails with `SeedAlreadyUsed`
    #[account(
        mut,
        seeds = [Bet::SEED, vault.key().as_ref(), seed.to_le_bytes().as_ref()],
        bump
    )]
    pub bet: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}
