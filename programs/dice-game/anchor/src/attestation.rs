use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    instruction::Instruction,
    sysvar::instructions::{load_current_index_checked, load_instruction_at_checked},
};
use solana_sdk_ids::ed25519_program;

use crate::DiceError;

pub const PUBKEY_LEN: usize = 32;
pub const SIGNATURE_LEN: usize = 64;

/// num_signatures (u8) + padding (u8)
const OFFSETS_START: usize = 2;
/// Seven u16 fields per signature
const OFFSETS_LEN: usize = 14;
const DATA_START: usize = OFFSETS_START + OFFSETS_LEN;

/// Instruction index meaning "this same instruction"
const SELF_INSTRUCTION: u16 = u16::MAX;

/// The single signature an Ed25519 program instruction attests to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Attestation<'a> {
    pub signer: &'a [u8],
    pub signature: &'a [u8],
    pub message: &'a [u8],
}

/// Build the Ed25519 program instruction a client places before `resolve_bet`.
///
/// Same layout as web3.js `Ed25519Program.createInstructionWithPublicKey`:
/// header, offsets, public key, signature, message. Fails when the message
/// is too long for its size to fit the u16 offsets table.
pub fn new_ed25519_instruction(
    signer: &[u8; PUBKEY_LEN],
    signature: &[u8; SIGNATURE_LEN],
    message: &[u8],
) -> Result<Instruction> {
    let public_key_offset = DATA_START;
    let signature_offset = public_key_offset + PUBKEY_LEN;
    let message_offset = signature_offset + SIGNATURE_LEN;

    let mut data = Vec::with_capacity(message_offset + message.len());
    data.push(1);
    data.push(0);
    for offset in [
        to_u16(signature_offset)?,
        SELF_INSTRUCTION,
        to_u16(public_key_offset)?,
        SELF_INSTRUCTION,
        to_u16(message_offset)?,
        to_u16(message.len())?,
        SELF_INSTRUCTION,
    ] {
        data.extend_from_slice(&offset.to_le_bytes());
    }
    data.extend_from_slice(signer);
    data.extend_from_slice(signature);
    data.extend_from_slice(message);

    Ok(Instruction {
        program_id: ed25519_program::ID,
        accounts: vec![],
        data,
    })
}

/// Read the signer, signature and message out of an Ed25519 program instruction.
///
/// Only single-signature instructions whose offsets all point into the
/// instruction's own data are accepted, so nothing can be borrowed from
/// another instruction in the transaction.
pub fn parse_ed25519_instruction(ix: &Instruction) -> Result<Ed25519Attestation<'_>> {
    require_keys_eq!(
        ix.program_id,
        ed25519_program::ID,
        DiceError::SignatureVerificationFailed
    );
    require!(ix.accounts.is_empty(), DiceError::SignatureVerificationFailed);

    let data = ix.data.as_slice();
    require!(
        data.len() >= DATA_START && data[0] == 1 && data[1] == 0,
        DiceError::SignatureVerificationFailed
    );

    let signature_offset = read_u16(data, OFFSETS_START)?;
    let signature_ix = read_u16(data, OFFSETS_START + 2)?;
    let public_key_offset = read_u16(data, OFFSETS_START + 4)?;
    let public_key_ix = read_u16(data, OFFSETS_START + 6)?;
    let message_offset = read_u16(data, OFFSETS_START + 8)?;
    let message_size = read_u16(data, OFFSETS_START + 10)?;
    let message_ix = read_u16(data, OFFSETS_START + 12)?;

    require!(
        signature_ix == SELF_INSTRUCTION
            && public_key_ix == SELF_INSTRUCTION
            && message_ix == SELF_INSTRUCTION,
        DiceError::SignatureVerificationFailed
    );

    Ok(Ed25519Attestation {
        signer: field(data, public_key_offset as usize, PUBKEY_LEN)?,
        signature: field(data, signature_offset as usize, SIGNATURE_LEN)?,
        message: field(data, message_offset as usize, message_size as usize)?,
    })
}

/// Check that `ix` attests `signature` by `house` over exactly `message`.
///
/// The signer is checked before the message so a foreign key is always
/// reported as such. The cryptographic check itself is done by the Ed25519
/// program; a bad signature aborts the transaction before we run.
pub fn verify(ix: &Instruction, house: &Pubkey, message: &[u8], signature: &[u8]) -> Result<()> {
    let attestation = parse_ed25519_instruction(ix)?;

    require!(
        attestation.signer == house.to_bytes().as_slice(),
        DiceError::SignerMismatch
    );
    require!(attestation.message == message, DiceError::MessageMismatch);
    require!(
        attestation.signature == signature,
        DiceError::SignatureVerificationFailed
    );

    Ok(())
}

/// Load the instruction executed right before the current one
pub fn load_preceding_instruction(instructions_sysvar: &AccountInfo) -> Result<Instruction> {
    let current = load_current_index_checked(instructions_sysvar)?;
    let index = current
        .checked_sub(1)
        .ok_or(DiceError::SignatureVerificationFailed)?;

    Ok(load_instruction_at_checked(index as usize, instructions_sysvar)?)
}

fn to_u16(value: usize) -> Result<u16> {
    u16::try_from(value).map_err(|_| error!(DiceError::SignatureVerificationFailed))
}

fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    let bytes = field(data, offset, 2)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn field(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = offset
        .checked_add(len)
        .ok_or(DiceError::SignatureVerificationFailed)?;
    data.get(offset..end)
        .ok_or_else(|| error!(DiceError::SignatureVerificationFailed))
}
