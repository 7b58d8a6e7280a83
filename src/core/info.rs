use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::payloads::Payload;
use super::waas::{Activity, AddressInfo, KeyShareHolderGroup, MpcProject, MpcVault, OrgInfo, Transaction, TssRequest, WalletInfo};

/// `null`, `{}` and `[]` all mean the platform sent nothing for the field, so an
/// empty nested value is never a populated field: `Some(vec![])` or an all-absent
/// object comes back from a round trip as `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
{
    let value = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(map)) if map.is_empty() => return Ok(None),
        Some(Value::Array(items)) if items.is_empty() => return Ok(None),
        Some(value) => value,
    };
    serde_json::from_value(value).map(Some).map_err(D::Error::custom)
}

/// Platform context for a key generation, carried in `extra_info`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct KeyGenRequestInfo {
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub org: Option<OrgInfo>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub project: Option<MpcProject>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub vault: Option<MpcVault>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub target_key_share_holder_group: Option<KeyShareHolderGroup>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub tss_request: Option<TssRequest>,
}

impl Payload for KeyGenRequestInfo {}

/// Platform context for a signing round: who signs, from where, for what.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct KeySignRequestInfo {
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub org: Option<OrgInfo>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub project: Option<MpcProject>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub vault: Option<MpcVault>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub wallet: Option<WalletInfo>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub signer_key_share_holder_group: Option<KeyShareHolderGroup>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub source_addresses: Option<Vec<AddressInfo>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Transaction>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub staking_activity: Option<Activity>,
}

impl Payload for KeySignRequestInfo {}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct KeyReshareRequestInfo {
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub org: Option<OrgInfo>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub project: Option<MpcProject>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub vault: Option<MpcVault>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub source_key_share_holder_group: Option<KeyShareHolderGroup>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub target_key_share_holder_group: Option<KeyShareHolderGroup>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub tss_request: Option<TssRequest>,
}

impl Payload for KeyReshareRequestInfo {}
