use super::{missing_asset, TransactionKind};
use crate::bytes::{ByteReader, ByteWriter};
use crate::data::{Asset, Vote, VoteAction};
use crate::schema::{self, SchemaContext};
use crate::types::CoreType;
use crate::{CodecError, TransactionData};
use dpos_types::PublicKey;

/// `count:u8`, then per vote `0x01|0x00` followed by the delegate key.
#[derive(Debug, Default)]
pub struct VoteKind;

impl TransactionKind for VoteKind {
    fn type_id(&self) -> u16 {
        CoreType::Vote.as_u16()
    }

    fn versions(&self) -> &'static [u8] {
        &[1, 2]
    }

    fn key(&self) -> &'static str {
        CoreType::Vote.key()
    }

    fn write_asset(&self, data: &TransactionData, w: &mut ByteWriter) -> Result<(), CodecError> {
        let Some(Asset::Votes(votes)) = &data.asset else {
            return Err(missing_asset(self.key()));
        };
        let count =
            u8::try_from(votes.len()).map_err(|_| CodecError::schema("too many votes"))?;
        w.write_u8(count);
        for vote in votes {
            w.write_u8(match vote.action {
                VoteAction::Vote => 1,
                VoteAction::Unvote => 0,
            });
            w.write_bytes(&vote.delegate.0);
        }
        Ok(())
    }

    fn read_asset(
        &self,
        data: &mut TransactionData,
        r: &mut ByteReader<'_>,
    ) -> Result<(), CodecError> {
        let count = r.read_u8()?;
        let mut votes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let action = match r.read_u8()? {
                1 => VoteAction::Vote,
                0 => VoteAction::Unvote,
                other => {
                    return Err(CodecError::InvalidTransactionBytes(format!(
                        "unknown vote marker {other:#04x}"
                    )))
                }
            };
            votes.push(Vote {
                action,
                delegate: PublicKey(r.read_array()?),
            });
        }
        data.asset = Some(Asset::Votes(votes));
        Ok(())
    }

    fn validate(&self, data: &TransactionData, ctx: &SchemaContext<'_>) -> Result<(), CodecError> {
        let Some(Asset::Votes(votes)) = &data.asset else {
            return Err(missing_asset(self.key()));
        };
        if votes.is_empty() {
            return Err(CodecError::schema("vote transaction requires at least one vote"));
        }
        // Several votes in one version 1 transaction are gated by the handler.
        if data.version >= 2 && votes.len() != 1 {
            return Err(CodecError::schema("vote transaction must carry exactly one vote"));
        }
        if let Some(recipient) = &data.recipient_id {
            schema::address(recipient, ctx)?;
        }
        schema::zero_amount(data)?;
        schema::min_fee(data, 1, ctx)
    }
}
