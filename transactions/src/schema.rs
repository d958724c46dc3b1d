//! Structural validation of transaction data.
//!
//! Runs the rules every transaction shares (version fields, network byte,
//! vendor field length, signature list shape), then the kind's own rules.
//! Each failure is a [`CodecError::TransactionSchema`] naming the rule.

use crate::kinds::TransactionKind;
use crate::{CodecError, TransactionData};
use dpos_config::Milestone;
use dpos_crypto::validate_address;
use dpos_types::{Address, BigNumber};
use std::collections::HashSet;

/// Longest delegate username.
pub const MAX_USERNAME_LENGTH: usize = 20;

pub struct SchemaContext<'a> {
    /// Milestone in force at the height the transaction is validated for.
    pub milestone: &'a Milestone,
    /// The network's address byte.
    pub network: u8,
    /// Genesis transactions skip the minimum amount and fee rules.
    pub genesis: bool,
    /// Reject transactions without a signature or participant signatures.
    pub require_signature: bool,
}

pub fn validate(
    data: &TransactionData,
    kind: &dyn TransactionKind,
    ctx: &SchemaContext<'_>,
) -> Result<(), CodecError> {
    match data.version {
        1 if data.timestamp.is_none() => {
            return Err(CodecError::schema("version 1 transaction requires timestamp"))
        }
        2 if data.nonce.is_none() => {
            return Err(CodecError::schema("version 2 transaction requires nonce"))
        }
        1 | 2 => {}
        other => return Err(CodecError::TransactionVersion(other)),
    }

    if let Some(network) = data.network {
        if network != ctx.network {
            return Err(CodecError::schema(format!(
                "network byte {network} does not match {}",
                ctx.network
            )));
        }
    }

    if data.fee.is_negative() || data.amount.is_negative() {
        return Err(CodecError::schema("amount and fee must not be negative"));
    }

    if let Some(vendor_field) = &data.vendor_field {
        if !kind.has_vendor_field() {
            return Err(CodecError::schema(format!(
                "{} transaction cannot carry a vendorField",
                kind.key()
            )));
        }
        let max = ctx.milestone.vendor_field_length;
        if vendor_field.len() > max {
            return Err(CodecError::schema(format!(
                "vendorField is {} bytes, limit is {max}",
                vendor_field.len()
            )));
        }
    }

    if let Some(recipient) = &data.recipient_id {
        address(recipient, ctx)?;
    }

    if let Some(signatures) = &data.signatures {
        if signatures.is_empty() || signatures.len() > 16 {
            return Err(CodecError::schema("signatures must hold 1 to 16 entries"));
        }
        if data.version >= 2 {
            if signatures.iter().any(|s| s.len() != 65) {
                return Err(CodecError::schema(
                    "participant signatures must be 65 bytes (index + schnorr)",
                ));
            }
            let unique: HashSet<_> = signatures.iter().collect();
            if unique.len() != signatures.len() {
                return Err(CodecError::schema("participant signatures must be unique"));
            }
        }
    }

    if ctx.require_signature && data.signature.is_none() && !data.has_multi_signatures() {
        return Err(CodecError::schema("transaction is not signed"));
    }

    kind.validate(data, ctx)
}

// ── Rule helpers for kinds ─────────────────────────────────────────────

pub(crate) fn address(address: &Address, ctx: &SchemaContext<'_>) -> Result<(), CodecError> {
    if validate_address(address, ctx.network) {
        Ok(())
    } else {
        Err(CodecError::schema(format!(
            "{address} is not a valid address on network {}",
            ctx.network
        )))
    }
}

pub(crate) fn require_recipient(
    data: &TransactionData,
    ctx: &SchemaContext<'_>,
) -> Result<(), CodecError> {
    match &data.recipient_id {
        Some(recipient) => address(recipient, ctx),
        None => Err(CodecError::schema("recipientId is required")),
    }
}

pub(crate) fn min_amount(
    data: &TransactionData,
    min: u64,
    ctx: &SchemaContext<'_>,
) -> Result<(), CodecError> {
    if !ctx.genesis && data.amount < BigNumber::from(min) {
        return Err(CodecError::schema(format!("amount must be at least {min}")));
    }
    Ok(())
}

pub(crate) fn min_fee(
    data: &TransactionData,
    min: u64,
    ctx: &SchemaContext<'_>,
) -> Result<(), CodecError> {
    if !ctx.genesis && data.fee < BigNumber::from(min) {
        return Err(CodecError::schema(format!("fee must be at least {min}")));
    }
    Ok(())
}

pub(crate) fn zero_amount(data: &TransactionData) -> Result<(), CodecError> {
    if !data.amount.is_zero() {
        return Err(CodecError::schema("amount must be 0"));
    }
    Ok(())
}

pub(crate) fn zero_fee(data: &TransactionData) -> Result<(), CodecError> {
    if !data.fee.is_zero() {
        return Err(CodecError::schema("fee must be 0"));
    }
    Ok(())
}

/// Lowercase alphanumerics and `!@$&_.`, 1 to 20 characters.
pub fn delegate_username(username: &str) -> Result<(), CodecError> {
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "!@$&_.".contains(c));
    if username.is_empty() || username.len() > MAX_USERNAME_LENGTH || !valid_chars {
        return Err(CodecError::schema(format!("invalid delegate username \"{username}\"")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames() {
        assert!(delegate_username("genesis_1").is_ok());
        assert!(delegate_username("a.b!c@d$e&f").is_ok());
        assert!(delegate_username("").is_err());
        assert!(delegate_username("UPPER").is_err());
        assert!(delegate_username("with space").is_err());
        assert!(delegate_username("abcdefghijklmnopqrstu").is_err());
    }
}
