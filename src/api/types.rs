use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Inbound envelope sent by the TSS node.
///
/// `request_detail` and `extra_info` stay as text here; their schema depends on
/// `request_type` and they are decoded by the verifier.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Request {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub request_detail: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub extra_info: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Error)]
#[error("unknown status code {0}")]
pub struct UnknownStatus(i32);

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(try_from = "i32", into = "i32")]
pub enum Status {
    Ok,
    InvalidRequest,
    InvalidToken,
    InternalError,
}

impl Status {
    pub fn code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::InvalidRequest => 10,
            Status::InvalidToken => 20,
            Status::InternalError => 30,
        }
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl TryFrom<i32> for Status {
    type Error = UnknownStatus;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Status::Ok),
            10 => Ok(Status::InvalidRequest),
            20 => Ok(Status::InvalidToken),
            30 => Ok(Status::InternalError),
            other => Err(UnknownStatus(other)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Approve,
    Reject,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Approve => f.write_str("APPROVE"),
            Action::Reject => f.write_str("REJECT"),
        }
    }
}

/// Decision returned to the TSS node.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub err_str: Option<String>,
}

impl Response {
    pub fn approve(request_id: &str) -> Self {
        Self {
            status: Status::Ok,
            request_id: echo_request_id(request_id),
            action: Some(Action::Approve),
            err_str: None,
        }
    }

    /// A rejection never carries `Status::Ok`; an `Ok` status is promoted to
    /// `InvalidRequest`.
    pub fn reject(request_id: &str, status: Status, err_str: impl Into<String>) -> Self {
        let status = match status {
            Status::Ok => Status::InvalidRequest,
            other => other,
        };
        Self {
            status,
            request_id: echo_request_id(request_id),
            action: Some(Action::Reject),
            err_str: Some(err_str.into()),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == Status::Ok && self.action == Some(Action::Approve)
    }
}

fn echo_request_id(request_id: &str) -> Option<String> {
    if request_id.is_empty() {
        None
    } else {
        Some(request_id.to_owned())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Status: {}, RequestID: {}, Action: {}, ErrStr: {}",
            self.status.code(),
            self.request_id.as_deref().unwrap_or(""),
            self.action.map(|a| a.to_string()).unwrap_or_default(),
            self.err_str.as_deref().unwrap_or(""),
        )
    }
}

/// Claims of the (already verified) JWT wrapping a request.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PackageDataClaim {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

impl PackageDataClaim {
    /// Bytes of the serialized `Request`, `None` when the claim carries none.
    ///
    /// `package_data` is either the request JSON itself or its base64 form;
    /// `{` is outside the base64 alphabet so the two cannot be confused.
    pub fn request_bytes(&self) -> Result<Option<Vec<u8>>, base64::DecodeError> {
        let data = match self.package_data.as_deref().map(str::trim) {
            Some(data) if !data.is_empty() => data,
            _ => return Ok(None),
        };
        if data.starts_with('{') {
            return Ok(Some(data.as_bytes().to_vec()));
        }
        base64::decode(data).map(Some)
    }
}
