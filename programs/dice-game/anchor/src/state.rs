use anchor_lang::prelude::*;

/// House accounting for one vault
///
/// PDA seeds: [b"state", house]. The vault itself is a data-less system
/// account at [b"vault", house] holding nothing but lamports, so its balance is
/// exactly what was paid into it. Every open bet reserves its worst-case payout
/// in `liability`, so the vault never owes more than it can pay.
#[account]
pub struct VaultState {
    /// House identity; the only key whose signatures can settle bets
    pub house: Pubkey,
    pub vault_bump: u8,
    pub bump: u8,
    /// Sum of the maximum payouts of all open bets
    pub liability: u64,
}

impl VaultState {
    pub const SEED: &'static [u8] = b"state";
    pub const VAULT_SEED: &'static [u8] = b"vault";

    pub const LEN: usize = 8 + // discriminator
        32 + // house
        1 + // vault_bump
        1 + // bump
        8; // liability

    /// Lamports the vault can pay out and still stay rent exempt
    pub fn free_balance(lamports: u64, rent: &Rent) -> u64 {
        lamports.saturating_sub(rent.minimum_balance(0))
    }
}

/// A pending wager. The account existing is the pending state; resolving closes it.
///
/// PDA seeds: [b"bet", vault, seed.to_le_bytes()]
#[account]
pub struct Bet {
    pub player: Pubkey,
    pub seed: u128,
    /// Slot the bet was placed in
    pub slot: u64,
    pub amount: u64,
    pub roll: u8,
    pub bump: u8,
}

impl Bet {
    pub const SEED: &'static [u8] = b"bet";

    pub const LEN: usize = 8 + 32 + 16 + 8 + 8 + 1 + 1; // discriminator + pubkey + u128 + u64 + u64 + u8 + u8

    pub const MIN_ROLL: u8 = 1;
    pub const MAX_ROLL: u8 = 99;

    /// Account data after the discriminator. This is the message the house signs.
    pub fn to_slice(&self) -> Vec<u8> {
        let mut info = self.player.to_bytes().to_vec();

        info.extend_from_slice(&self.seed.to_le_bytes());
        info.extend_from_slice(&self.slot.to_le_bytes());
        info.extend_from_slice(&self.amount.to_le_bytes());
        info.extend_from_slice(&[self.roll, self.bump]);

        info
    }
}

/// Emitted once per resolved bet
#[event]
pub struct BetEvent {
    /// Randomness-derived value in 0..=99
    pub outcome: u8,
    pub player: Pubkey,
    pub seed: u128,
    pub roll: u8,
    pub amount: u64,
    /// Lamports paid to the player, zero when the house wins
    pub payout: u64,
    pub won: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bet() -> Bet {
        Bet {
            player: Pubkey::new_from_array([7; 32]),
            seed: 0x0102_0304_0506_0708_090a_0b0c_0d0e_0f10,
            slot: 42,
            amount: 10_000_000,
            roll: 50,
            bump: 254,
        }
    }

    #[test]
    fn to_slice_matches_account_data() {
        let bet = sample_bet();
        let mut data = Vec::new();
        bet.try_serialize(&mut data).unwrap();

        assert_eq!(data.len(), Bet::LEN);
        assert_eq!(&data[8..], bet.to_slice().as_slice());
    }

    #[test]
    fn to_slice_changes_with_every_field() {
        let base = sample_bet().to_slice();

        let mut bet = sample_bet();
        bet.roll = 51;
        assert_ne!(bet.to_slice(), base);

        let mut bet = sample_bet();
        bet.seed += 1;
        assert_ne!(bet.to_slice(), base);

        let mut bet = sample_bet();
        bet.slot += 1;
        assert_ne!(bet.to_slice(), base);
    }

    #[test]
    fn vault_state_len_matches_serialized_size() {
        let state = VaultState {
            house: Pubkey::new_from_array([3; 32]),
            vault_bump: 255,
            bump: 254,
            liability: 0,
        };
        let mut data = Vec::new();
        state.try_serialize(&mut data).unwrap();

        assert_eq!(data.len(), VaultState::LEN);
    }

    #[test]
    fn free_balance_keeps_vault_rent_exempt() {
        let rent = Rent::default();
        let reserve = rent.minimum_balance(0);

        assert_eq!(VaultState::free_balance(reserve + 100, &rent), 100);
        assert_eq!(VaultState::free_balance(reserve, &rent), 0);
        assert_eq!(VaultState::free_balance(reserve / 2, &rent), 0);
    }
}
