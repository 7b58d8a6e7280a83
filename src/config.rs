use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::DecodeMode;
use crate::verifier::{AllowAll, DenyAll, DestinationWhitelist, KeyGenPolicy, KeyResharePolicy, KeySignPolicy, PolicySet, TssVerifier};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {}", .path.display(), .source)]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config file {}: {}", .path.display(), .source)]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("key_sign is bound to destination_whitelist but address_whitelist is empty")]
    EmptyWhitelist,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PolicyBinding {
    AllowAll,
    DenyAll,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeySignBinding {
    AllowAll,
    DenyAll,
    DestinationWhitelist,
}

/// Policy for each operation kind. Every key is required.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    pub key_gen: PolicyBinding,
    pub key_sign: KeySignBinding,
    pub key_reshare: PolicyBinding,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default)]
    pub decode_mode: DecodeMode,
    #[serde(default)]
    pub address_whitelist: Vec<String>,
    pub policy: PolicyConfig,
}

fn default_service_name() -> String {
    "mpc-callback-server".to_owned()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse { path: path.to_owned(), source })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn policies(&self) -> Result<PolicySet, ConfigError> {
        let key_gen: Box<dyn KeyGenPolicy> = match self.policy.key_gen {
            PolicyBinding::AllowAll => Box::new(AllowAll),
            PolicyBinding::DenyAll => Box::new(DenyAll),
        };
        let key_sign: Box<dyn KeySignPolicy> = match self.policy.key_sign {
            KeySignBinding::AllowAll => Box::new(AllowAll),
            KeySignBinding::DenyAll => Box::new(DenyAll),
            KeySignBinding::DestinationWhitelist => {
                let whitelist = DestinationWhitelist::new(self.address_whitelist.iter().cloned());
                if whitelist.is_empty() {
                    return Err(ConfigError::EmptyWhitelist);
                }
                Box::new(whitelist)
            }
        };
        let key_reshare: Box<dyn KeyResharePolicy> = match self.policy.key_reshare {
            PolicyBinding::AllowAll => Box::new(AllowAll),
            PolicyBinding::DenyAll => Box::new(DenyAll),
        };
        Ok(PolicySet { key_gen, key_sign, key_reshare })
    }

    pub fn verifier(&self) -> Result<TssVerifier, ConfigError> {
        Ok(TssVerifier::new(self.policies()?).with_decode_mode(self.decode_mode))
    }
}

#[cfg(test)]
mod tests {
    use crate::api::Request;
    use crate::verifier::{RequestScope, Verifier};

    use super::*;

    const FULL: &str = r#"
service_name = "treasury-callback"
decode_mode = "strict"
address_whitelist = ["0xsafe", "bc1qsafe"]

[policy]
key_gen = "allow_all"
key_sign = "destination_whitelist"
key_reshare = "deny_all"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml(FULL).unwrap();
        assert_eq!(config.service_name, "treasury-callback");
        assert_eq!(config.decode_mode, DecodeMode::Strict);
        assert_eq!(config.address_whitelist.len(), 2);
        assert_eq!(config.policy.key_sign, KeySignBinding::DestinationWhitelist);
        assert_eq!(config.policy.key_reshare, PolicyBinding::DenyAll);
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("[policy]\nkey_gen = \"deny_all\"\nkey_sign = \"deny_all\"\nkey_reshare = \"deny_all\"\n").unwrap();
        assert_eq!(config.service_name, "mpc-callback-server");
        assert_eq!(config.decode_mode, DecodeMode::OrDefault);
        assert!(config.address_whitelist.is_empty());
    }

    #[test]
    fn test_policy_table_is_required() {
        assert!(Config::from_toml("service_name = \"x\"\n").is_err());
        assert!(Config::from_toml("[policy]\nkey_gen = \"allow_all\"\nkey_sign = \"allow_all\"\n").is_err());
        assert!(Config::from_toml("[policy]\nkey_gen = \"maybe\"\nkey_sign = \"allow_all\"\nkey_reshare = \"allow_all\"\n").is_err());
        assert!(Config::from_toml("[policy]\nkey_gen = \"destination_whitelist\"\nkey_sign = \"allow_all\"\nkey_reshare = \"allow_all\"\n").is_err());
    }

    #[test]
    fn test_whitelist_binding_needs_addresses() {
        let config = Config::from_toml("[policy]\nkey_gen = \"allow_all\"\nkey_sign = \"destination_whitelist\"\nkey_reshare = \"allow_all\"\n").unwrap();
        assert!(matches!(config.policies(), Err(ConfigError::EmptyWhitelist)));
    }

    #[test]
    fn test_verifier_uses_bindings() {
        let verifier = Config::from_toml(FULL).unwrap().verifier().unwrap();
        let reshare = Request {
            request_id: "rs-1".to_owned(),
            request_type: Some(3),
            request_detail: "{}".to_owned(),
            extra_info: "{}".to_owned(),
        };
        assert!(verifier.verify(&reshare, &RequestScope::new("rs-1")).is_err());

        let keygen = Request { request_type: Some(1), ..reshare };
        assert!(verifier.verify(&keygen, &RequestScope::new("rs-1")).is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/callback-server.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/callback-server.toml"));
    }
}
