//! Height-indexed protocol parameters.
//!
//! Each milestone entry in a network document is partial: it lists only the keys
//! that change at its height. The effective milestone at a height is the deep
//! merge of every entry at or below it, taken in height order.

use crate::ConfigError;
use dpos_types::BigNumber;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// The fully merged parameter set in force from `height` on.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub height: u32,

    #[serde(default)]
    pub reward: BigNumber,

    #[serde(default = "default_active_delegates")]
    pub active_delegates: u32,

    /// Seconds per slot.
    #[serde(default = "default_blocktime")]
    pub blocktime: u32,

    #[serde(default = "default_vendor_field_length")]
    pub vendor_field_length: usize,

    #[serde(default = "default_multi_payment_limit")]
    pub multi_payment_limit: usize,

    /// Version 2 transactions, nonces, Schnorr multi-signatures.
    #[serde(default)]
    pub aip11: bool,

    /// Several votes in one version 1 vote transaction.
    #[serde(default)]
    pub aip37: bool,

    #[serde(default)]
    pub htlc_enabled: bool,

    #[serde(default)]
    pub ignore_invalid_second_signature_field: bool,

    #[serde(default)]
    pub block: BlockConstants,

    #[serde(default)]
    pub fees: Fees,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockConstants {
    #[serde(default)]
    pub version: u32,

    #[serde(default = "default_max_transactions")]
    pub max_transactions: usize,

    #[serde(default = "default_max_payload")]
    pub max_payload: usize,

    /// Block ids are the full SHA-256 hex instead of a decimal `u64`.
    #[serde(default)]
    pub id_full_sha256: bool,
}

impl Default for BlockConstants {
    fn default() -> Self {
        Self {
            version: 0,
            max_transactions: default_max_transactions(),
            max_payload: default_max_payload(),
            id_full_sha256: false,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fees {
    /// Static fee per transaction key (`transfer`, `vote`, ...).
    #[serde(default)]
    pub static_fees: HashMap<String, u64>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_active_delegates() -> u32 {
    51
}

fn default_blocktime() -> u32 {
    8
}

fn default_vendor_field_length() -> usize {
    64
}

fn default_multi_payment_limit() -> usize {
    256
}

fn default_max_transactions() -> usize {
    150
}

fn default_max_payload() -> usize {
    2_097_152
}

// ── Impl ───────────────────────────────────────────────────────────────

impl Milestone {
    pub fn static_fee(&self, key: &str) -> Option<u64> {
        self.fees.static_fees.get(key).copied()
    }
}

/// Merge raw milestone entries into effective milestones, one per entry,
/// sorted by height.
pub fn merge_milestones(raw: &[Value]) -> Result<Vec<Milestone>, ConfigError> {
    if raw.is_empty() {
        return Err(ConfigError::NoMilestones);
    }

    let mut entries = Vec::with_capacity(raw.len());
    for (index, entry) in raw.iter().enumerate() {
        if !entry.is_object() {
            return Err(ConfigError::InvalidMilestone {
                index,
                reason: "not an object".into(),
            });
        }
        let height = entry
            .get("height")
            .and_then(Value::as_u64)
            .ok_or_else(|| ConfigError::InvalidMilestone {
                index,
                reason: "missing height".into(),
            })?;
        entries.push((index, height, entry));
    }
    entries.sort_by_key(|(_, height, _)| *height);

    let mut merged = Value::Object(Map::new());
    let mut milestones = Vec::with_capacity(entries.len());
    for (index, _, entry) in entries {
        deep_merge(&mut merged, entry);
        let milestone: Milestone =
            serde_json::from_value(merged.clone()).map_err(|e| ConfigError::InvalidMilestone {
                index,
                reason: e.to_string(),
            })?;
        milestones.push(milestone);
    }
    Ok(milestones)
}

fn deep_merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        deep_merge(existing, value)
                    }
                    _ => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn later_entries_override_only_their_keys() {
        let raw = vec![
            json!({ "height": 1, "reward": 0, "block": { "version": 0, "maxTransactions": 50 } }),
            json!({ "height": 10, "reward": 200000000 }),
            json!({ "height": 20, "block": { "idFullSha256": true } }),
        ];
        let merged = merge_milestones(&raw).unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[1].reward, BigNumber::from(200_000_000u64));
        assert_eq!(merged[1].block.max_transactions, 50);
        assert!(merged[2].block.id_full_sha256);
        assert_eq!(merged[2].block.max_transactions, 50);
        assert_eq!(merged[2].reward, BigNumber::from(200_000_000u64));
    }

    #[test]
    fn entries_are_sorted_by_height() {
        let raw = vec![
            json!({ "height": 100, "aip11": true }),
            json!({ "height": 1, "aip11": false, "activeDelegates": 5 }),
        ];
        let merged = merge_milestones(&raw).unwrap();
        assert_eq!(merged[0].height, 1);
        assert!(!merged[0].aip11);
        assert_eq!(merged[1].height, 100);
        assert!(merged[1].aip11);
        assert_eq!(merged[1].active_delegates, 5);
    }

    #[test]
    fn rejects_entries_without_height() {
        let raw = vec![json!({ "reward": 1 })];
        assert!(matches!(
            merge_milestones(&raw),
            Err(ConfigError::InvalidMilestone { index: 0, .. })
        ));
        assert!(matches!(merge_milestones(&[]), Err(ConfigError::NoMilestones)));
    }

    #[test]
    fn fills_defaults() {
        let merged = merge_milestones(&[json!({ "height": 1 })]).unwrap();
        let m = &merged[0];
        assert_eq!(m.vendor_field_length, 64);
        assert_eq!(m.multi_payment_limit, 256);
        assert_eq!(m.block.max_payload, 2_097_152);
        assert_eq!(m.static_fee("transfer"), None);
    }
}
