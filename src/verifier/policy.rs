use kv_log_macro as log;
use thiserror::Error;

use crate::core::{KeyGenDetail, KeyGenRequestInfo, KeyReshareDetail, KeyReshareRequestInfo, KeySignDetail, KeySignRequestInfo, RequestType};

use super::RequestScope;

#[derive(Debug, Error)]
pub enum PolicyError {
    /// The request is well formed but must not proceed.
    #[error("{0}")]
    Rejected(String),
    /// The policy could not reach a decision.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub trait KeyGenPolicy: Send + Sync {
    fn evaluate(&self, detail: &KeyGenDetail, info: &KeyGenRequestInfo, scope: &RequestScope) -> Result<(), PolicyError>;
}

pub trait KeySignPolicy: Send + Sync {
    fn evaluate(&self, detail: &KeySignDetail, info: &KeySignRequestInfo, scope: &RequestScope) -> Result<(), PolicyError>;
}

pub trait KeyResharePolicy: Send + Sync {
    fn evaluate(&self, detail: &KeyReshareDetail, info: &KeyReshareRequestInfo, scope: &RequestScope) -> Result<(), PolicyError>;
}

/// Approves every structurally valid request.
///
/// This is a placeholder, not a secure default: it performs no authorization at
/// all and says so in the log on every approval.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl AllowAll {
    fn approve(kind: RequestType, scope: &RequestScope) -> Result<(), PolicyError> {
        log::warn!("Approved without policy checks", {
            request_id: scope.request_id(),
            request_type: kind.to_string(),
        });
        Ok(())
    }
}

impl KeyGenPolicy for AllowAll {
    fn evaluate(&self, _: &KeyGenDetail, _: &KeyGenRequestInfo, scope: &RequestScope) -> Result<(), PolicyError> {
        Self::approve(RequestType::KeyGen, scope)
    }
}

impl KeySignPolicy for AllowAll {
    fn evaluate(&self, _: &KeySignDetail, _: &KeySignRequestInfo, scope: &RequestScope) -> Result<(), PolicyError> {
        Self::approve(RequestType::KeySign, scope)
    }
}

impl KeyResharePolicy for AllowAll {
    fn evaluate(&self, _: &KeyReshareDetail, _: &KeyReshareRequestInfo, scope: &RequestScope) -> Result<(), PolicyError> {
        Self::approve(RequestType::KeyReshare, scope)
    }
}

/// Refuses every request of the kinds it is bound to.
#[derive(Clone, Copy, Debug, Default)]
pub struct DenyAll;

impl DenyAll {
    fn reject(kind: RequestType) -> Result<(), PolicyError> {
        Err(PolicyError::Rejected(format!("{} requests are disabled", kind.phrase())))
    }
}

impl KeyGenPolicy for DenyAll {
    fn evaluate(&self, _: &KeyGenDetail, _: &KeyGenRequestInfo, _: &RequestScope) -> Result<(), PolicyError> {
        Self::reject(RequestType::KeyGen)
    }
}

impl KeySignPolicy for DenyAll {
    fn evaluate(&self, _: &KeySignDetail, _: &KeySignRequestInfo, _: &RequestScope) -> Result<(), PolicyError> {
        Self::reject(RequestType::KeySign)
    }
}

impl KeyResharePolicy for DenyAll {
    fn evaluate(&self, _: &KeyReshareDetail, _: &KeyReshareRequestInfo, _: &RequestScope) -> Result<(), PolicyError> {
        Self::reject(RequestType::KeyReshare)
    }
}

/// One policy per operation kind. Deliberately has no `Default`.
pub struct PolicySet {
    pub key_gen: Box<dyn KeyGenPolicy>,
    pub key_sign: Box<dyn KeySignPolicy>,
    pub key_reshare: Box<dyn KeyResharePolicy>,
}

impl PolicySet {
    pub fn new<G, S, R>(key_gen: G, key_sign: S, key_reshare: R) -> Self
        where
            G: KeyGenPolicy + 'static,
            S: KeySignPolicy + 'static,
            R: KeyResharePolicy + 'static,
    {
        Self {
            key_gen: Box::new(key_gen),
            key_sign: Box::new(key_sign),
            key_reshare: Box::new(key_reshare),
        }
    }

    /// Explicit opt-in to the placeholder policy for every kind.
    pub fn allow_all() -> Self {
        Self::new(AllowAll, AllowAll, AllowAll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all_approves() {
        let scope = RequestScope::new("r-1");
        let set = PolicySet::allow_all();
        assert!(set.key_gen.evaluate(&KeyGenDetail::default(), &KeyGenRequestInfo::default(), &scope).is_ok());
        assert!(set.key_sign.evaluate(&KeySignDetail::default(), &KeySignRequestInfo::default(), &scope).is_ok());
        assert!(set.key_reshare.evaluate(&KeyReshareDetail::default(), &KeyReshareRequestInfo::default(), &scope).is_ok());
    }

    #[test]
    fn test_deny_all_rejects_with_reason() {
        let scope = RequestScope::new("r-1");
        let detail = KeyReshareDetail::default();
        let err = KeyResharePolicy::evaluate(&DenyAll, &detail, &KeyReshareRequestInfo::default(), &scope).unwrap_err();
        match err {
            PolicyError::Rejected(reason) => assert_eq!(reason, "key reshare requests are disabled"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
