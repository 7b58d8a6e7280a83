//! Decides whether a TSS request may proceed.
//!
//! `TssVerifier` classifies the request, decodes its payloads into the typed
//! model and hands them to the policy bound for that operation kind. Every
//! failure comes back as a `VerifyError`; nothing escapes as a panic.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use kv_log_macro as log;
use thiserror::Error;

use crate::api::{Request, Status};
use crate::core::{DecodeError, DecodeMode, KeyGenDetail, KeyGenRequestInfo, KeyReshareDetail, KeyReshareRequestInfo, KeySignDetail, KeySignRequestInfo, Payload, RequestType};

pub use policy::*;
pub use scope::RequestScope;
pub use whitelist::DestinationWhitelist;

mod policy;
mod scope;
mod whitelist;

/// Which of the two payload texts a decode error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadPart {
    Detail,
    RequestInfo,
}

impl fmt::Display for PayloadPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadPart::Detail => f.write_str("detail"),
            PayloadPart::RequestInfo => f.write_str("request info"),
        }
    }
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("request is nil")]
    MissingRequest,
    #[error("failed to parse raw request: {0}")]
    MalformedRequest(String),
    #[error("request type is missing")]
    MissingRequestType,
    #[error("not support to process request type {0}")]
    UnsupportedRequestType(i64),
    #[error("request detail or extra info is empty")]
    MissingPayload,
    #[error("failed to parse {} {}: {}", .kind.phrase(), .part, .source)]
    MalformedPayload {
        kind: RequestType,
        part: PayloadPart,
        source: DecodeError,
    },
    #[error("{} rejected by policy: {}", .kind.phrase(), .reason)]
    PolicyRejected {
        kind: RequestType,
        reason: String,
    },
    #[error("failed to handle {context}: {reason}")]
    InternalFault {
        context: String,
        reason: String,
    },
}

impl VerifyError {
    pub fn status(&self) -> Status {
        match self {
            VerifyError::MissingRequest
            | VerifyError::MalformedRequest(_)
            | VerifyError::MissingRequestType
            | VerifyError::UnsupportedRequestType(_)
            | VerifyError::MissingPayload
            | VerifyError::MalformedPayload { .. }
            | VerifyError::PolicyRejected { .. } => Status::InvalidRequest,
            VerifyError::InternalFault { .. } => Status::InternalError,
        }
    }
}

pub trait Verifier: Send + Sync {
    /// `Ok(())` means approve. Implementations must not panic.
    fn verify(&self, request: &Request, scope: &RequestScope) -> Result<(), VerifyError>;
}

pub struct TssVerifier {
    policies: PolicySet,
    decode_mode: DecodeMode,
}

impl TssVerifier {
    pub fn new(policies: PolicySet) -> Self {
        Self { policies, decode_mode: DecodeMode::default() }
    }

    pub fn with_decode_mode(mut self, decode_mode: DecodeMode) -> Self {
        self.decode_mode = decode_mode;
        self
    }

    pub fn decode_mode(&self) -> DecodeMode {
        self.decode_mode
    }

    fn dispatch(&self, request: &Request, scope: &RequestScope) -> Result<(), VerifyError> {
        let code = request.request_type.ok_or(VerifyError::MissingRequestType)?;
        let kind = RequestType::classify(code).map_err(|e| VerifyError::UnsupportedRequestType(e.code))?;
        log::debug!("Verifying request", { request_id: scope.request_id(), request_type: kind.to_string() });

        match kind {
            RequestType::Ping => {
                log::info!("Got ping request", { request_id: scope.request_id() });
                Ok(())
            }
            RequestType::KeyGen => self.handle_key_gen(&request.request_detail, &request.extra_info, scope),
            RequestType::KeySign => self.handle_key_sign(&request.request_detail, &request.extra_info, scope),
            RequestType::KeyReshare => self.handle_key_reshare(&request.request_detail, &request.extra_info, scope),
        }
    }

    fn handle_key_gen(&self, detail: &str, info: &str, scope: &RequestScope) -> Result<(), VerifyError> {
        self.handle(RequestType::KeyGen, detail, info, scope, |detail: &KeyGenDetail, info: &KeyGenRequestInfo| {
            log::debug!("Key gen request", {
                request_id: scope.request_id(),
                threshold: detail.threshold,
                node_ids: detail.node_ids.join(","),
            });
            self.policies.key_gen.evaluate(detail, info, scope)
        })
    }

    fn handle_key_sign(&self, detail: &str, info: &str, scope: &RequestScope) -> Result<(), VerifyError> {
        self.handle(RequestType::KeySign, detail, info, scope, |detail: &KeySignDetail, info: &KeySignRequestInfo| {
            log::debug!("Key sign request", {
                request_id: scope.request_id(),
                group_id: detail.group_id.as_str(),
                messages: detail.msg_hash_list.len(),
            });
            self.policies.key_sign.evaluate(detail, info, scope)
        })
    }

    fn handle_key_reshare(&self, detail: &str, info: &str, scope: &RequestScope) -> Result<(), VerifyError> {
        self.handle(RequestType::KeyReshare, detail, info, scope, |detail: &KeyReshareDetail, info: &KeyReshareRequestInfo| {
            log::debug!("Key reshare request", {
                request_id: scope.request_id(),
                old_group_id: detail.old_group_id.as_str(),
                new_threshold: detail.new_threshold,
            });
            self.policies.key_reshare.evaluate(detail, info, scope)
        })
    }

    fn handle<D, I, F>(&self, kind: RequestType, detail: &str, info: &str, scope: &RequestScope, check: F) -> Result<(), VerifyError>
        where
            D: Payload,
            I: Payload,
            F: FnOnce(&D, &I) -> Result<(), PolicyError>,
    {
        if detail.is_empty() || info.is_empty() {
            return Err(VerifyError::MissingPayload);
        }
        let detail: D = self.decode(kind, PayloadPart::Detail, detail, scope)?;
        let info: I = self.decode(kind, PayloadPart::RequestInfo, info, scope)?;

        check(&detail, &info).map_err(|e| match e {
            PolicyError::Rejected(reason) => VerifyError::PolicyRejected { kind, reason },
            PolicyError::Internal(err) => VerifyError::InternalFault {
                context: kind.phrase().to_owned(),
                reason: format!("{:#}", err),
            },
        })
    }

    fn decode<T: Payload>(&self, kind: RequestType, part: PayloadPart, text: &str, scope: &RequestScope) -> Result<T, VerifyError> {
        match T::decode_strict(text) {
            Ok(value) => Ok(value),
            Err(source) if self.decode_mode == DecodeMode::OrDefault && source.is_syntax() => {
                log::warn!("Unparseable payload replaced by default", {
                    request_id: scope.request_id(),
                    request_type: kind.to_string(),
                    part: part.to_string(),
                    error: source.to_string(),
                });
                Ok(T::default())
            }
            Err(source) => Err(VerifyError::MalformedPayload { kind, part, source }),
        }
    }
}

impl Verifier for TssVerifier {
    fn verify(&self, request: &Request, scope: &RequestScope) -> Result<(), VerifyError> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(request, scope))) {
            Ok(verdict) => verdict,
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                log::error!("Verification panicked", { request_id: scope.request_id(), error: reason.as_str() });
                Err(VerifyError::InternalFault { context: "request".to_owned(), reason })
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_owned()
    }
}
