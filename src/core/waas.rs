//! Value objects supplied by the custody platform in `extra_info`.
//!
//! Only identifying fields are typed. Every other key is kept in `extra` so an
//! object encodes back to what was received.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Extra = Map<String, Value>;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct OrgInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct MpcProject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<i64>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct MpcVault {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub vault_type: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WalletInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_subtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// One participant holding a key share.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct KeyShareHolder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub holder_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tss_node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct KeyShareHolderGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_share_holder_group_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub group_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_share_holders: Vec<KeyShareHolder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl KeyShareHolderGroup {
    /// TSS node ids of every holder that names one.
    pub fn tss_node_ids(&self) -> Vec<&str> {
        self.key_share_holders
            .iter()
            .filter_map(|h| h.tss_node_id.as_deref())
            .collect()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AddressInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pubkey: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TransferOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TransactionDestination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_type: Option<String>,
    /// Contract or message-sign target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_output: Option<TransferOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utxo_outputs: Option<Vec<TransferOutput>>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// The platform's record of the transaction a signing request belongs to.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Transaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<TransactionDestination>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Transaction {
    /// Every address funds or calls are sent to, in payload order.
    pub fn destination_addresses(&self) -> Vec<String> {
        let mut addresses = Vec::new();
        let destination = match &self.destination {
            Some(destination) => destination,
            None => return addresses,
        };
        if let Some(address) = &destination.address {
            addresses.push(address.clone());
        }
        if let Some(address) = destination.account_output.as_ref().and_then(|o| o.address.as_ref()) {
            addresses.push(address.clone());
        }
        for output in destination.utxo_outputs.iter().flatten() {
            if let Some(address) = &output.address {
                addresses.push(address.clone());
            }
        }
        addresses
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TssRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tss_request_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_key_share_holder_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Staking activity a signing request may belong to instead of a transfer.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Activity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let raw = json!({
            "vault_id": "v-1",
            "type": "Org-Controlled",
            "root_pubkeys": [{"pubkey": "xpub", "mpc_algorithm": "ECDSA"}],
            "create_timestamp": 1700000000000i64,
        });
        let vault: MpcVault = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(vault.vault_id.as_deref(), Some("v-1"));
        assert_eq!(vault.vault_type.as_deref(), Some("Org-Controlled"));
        assert_eq!(vault.extra.len(), 2);
        assert_eq!(serde_json::to_value(&vault).unwrap(), raw);
    }

    #[test]
    fn test_destination_addresses() {
        let tx: Transaction = serde_json::from_value(json!({
            "transaction_id": "tx-1",
            "token_id": "ETH",
            "destination": {
                "destination_type": "Address",
                "account_output": {"address": "0xabc", "amount": "1.5"},
                "utxo_outputs": [{"address": "bc1q1", "amount": "0.1"}, {"amount": "0.2"}]
            }
        })).unwrap();
        assert_eq!(tx.destination_addresses(), vec!["0xabc".to_owned(), "bc1q1".to_owned()]);

        let contract: Transaction = serde_json::from_value(json!({
            "destination": {"destination_type": "EVM_Contract", "address": "0xdef", "value": "0"}
        })).unwrap();
        assert_eq!(contract.destination_addresses(), vec!["0xdef".to_owned()]);

        assert!(Transaction::default().destination_addresses().is_empty());
    }

    #[test]
    fn test_holder_group_node_ids() {
        let group: KeyShareHolderGroup = serde_json::from_value(json!({
            "key_share_holder_group_id": "g-1",
            "type": "SigningGroup",
            "threshold": 2,
            "participants": 3,
            "key_share_holders": [
                {"name": "a", "tss_node_id": "node-a", "signer": true},
                {"name": "b", "tss_node_id": "node-b", "online": false},
                {"name": "c"}
            ]
        })).unwrap();
        assert_eq!(group.tss_node_ids(), vec!["node-a", "node-b"]);
        assert_eq!(group.threshold, Some(2));
    }
}
