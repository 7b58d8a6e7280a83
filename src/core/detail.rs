use serde::{Deserialize, Serialize};

use super::payloads::Payload;
use super::types::{CurveType, SignatureType, TssProtocol};

/// Parameters of a key generation, carried in `request_detail`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct KeyGenDetail {
    pub threshold: u32,
    pub curve: CurveType,
    pub node_ids: Vec<String>,
    pub task_id: String,
    pub biz_task_id: String,
}

impl Payload for KeyGenDetail {}

/// Parameters of a signing round.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct KeySignDetail {
    pub group_id: String,
    pub root_pub_key: String,
    pub used_node_ids: Vec<String>,
    pub bip32_path_list: Vec<String>,
    pub msg_hash_list: Vec<String>,
    pub tweak_list: Vec<String>,
    pub signature_type: SignatureType,
    pub tss_protocol: TssProtocol,
    pub task_id: String,
    pub biz_task_id: String,
}

impl Payload for KeySignDetail {}

/// Parameters of a reshare from `old_group_id` to a new node set.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct KeyReshareDetail {
    pub old_group_id: String,
    pub root_pub_key: String,
    pub curve: CurveType,
    pub used_node_ids: Vec<String>,
    pub old_threshold: u32,
    pub new_threshold: u32,
    pub new_node_ids: Vec<String>,
    pub task_id: String,
    pub biz_task_id: String,
}

impl Payload for KeyReshareDetail {}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::core::DecodeMode;

    use super::*;

    fn sign_detail() -> KeySignDetail {
        KeySignDetail {
            group_id: "grp-1".to_owned(),
            root_pub_key: "03a1b2".to_owned(),
            used_node_ids: vec!["node-a".to_owned(), "node-b".to_owned()],
            bip32_path_list: vec!["m/44/60/0/0/0".to_owned()],
            msg_hash_list: vec!["9f86d081884c7d65".to_owned()],
            tweak_list: vec![],
            signature_type: SignatureType::Ecdsa,
            tss_protocol: TssProtocol::Gg18,
            task_id: "task-1".to_owned(),
            biz_task_id: "biz-1".to_owned(),
        }
    }

    #[test]
    fn test_empty_and_malformed_decode_to_default() {
        for text in ["", "{not json"] {
            assert_eq!(KeyGenDetail::decode_or_default(text), KeyGenDetail::default());
            assert_eq!(KeySignDetail::decode_or_default(text), KeySignDetail::default());
            assert_eq!(KeyReshareDetail::decode_or_default(text), KeyReshareDetail::default());
        }
        assert!(KeySignDetail::decode_strict("{not json").is_err());
    }

    #[test]
    fn test_defaults() {
        let d = KeySignDetail::default();
        assert_eq!(d.signature_type, SignatureType::Unknown);
        assert_eq!(d.tss_protocol, TssProtocol::Unknown);
        assert_eq!(KeyReshareDetail::default().curve, CurveType::Secp256k1);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let d = KeyGenDetail::decode_strict(r#"{"threshold": 2, "node_ids": ["a", "b", "c"]}"#).unwrap();
        assert_eq!(d.threshold, 2);
        assert_eq!(d.curve, CurveType::Secp256k1);
        assert_eq!(d.node_ids.len(), 3);
        assert!(d.task_id.is_empty());
    }

    #[test]
    fn test_unknown_enum_code() {
        let text = json!({"threshold": 2, "curve": 1}).to_string();
        assert!(KeyGenDetail::decode_strict(&text).is_err());
        assert_eq!(KeyGenDetail::decode_or_default(&text), KeyGenDetail::default());
        assert!(KeyGenDetail::decode(&text, DecodeMode::OrDefault).is_err());
        assert!(KeyGenDetail::decode(r#"{"threshold": "two"}"#, DecodeMode::OrDefault).is_err());
    }

    #[test]
    fn test_round_trip() {
        let d = sign_detail();
        assert_eq!(KeySignDetail::decode_strict(&d.encode()).unwrap(), d);

        let g = KeyGenDetail {
            threshold: 2,
            curve: CurveType::Ed25519,
            node_ids: vec!["n1".to_owned(), "n2".to_owned(), "n3".to_owned()],
            task_id: "t".to_owned(),
            biz_task_id: "b".to_owned(),
        };
        assert_eq!(KeyGenDetail::decode_strict(&g.encode()).unwrap(), g);

        let r = KeyReshareDetail {
            old_group_id: "old".to_owned(),
            root_pub_key: "02ff".to_owned(),
            curve: CurveType::Secp256k1,
            used_node_ids: vec!["n1".to_owned(), "n2".to_owned()],
            old_threshold: 2,
            new_threshold: 3,
            new_node_ids: vec!["n1".to_owned(), "n2".to_owned(), "n4".to_owned(), "n5".to_owned()],
            task_id: "t".to_owned(),
            biz_task_id: "b".to_owned(),
        };
        assert_eq!(KeyReshareDetail::decode_strict(&r.encode()).unwrap(), r);
    }

    #[test]
    fn test_encode_emits_wire_names_and_codes() {
        let v: serde_json::Value = serde_json::from_str(&sign_detail().encode()).unwrap();
        assert_eq!(v["signature_type"], json!(1));
        assert_eq!(v["tss_protocol"], json!(1));
        assert_eq!(v["tweak_list"], json!([]));
        assert_eq!(v["bip32_path_list"], json!(["m/44/60/0/0/0"]));
    }
}
