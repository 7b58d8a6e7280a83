use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unknown {kind} code {code}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: i64,
}

/// Integer-coded wire enumerations. Unknown codes are errors, never a default.
macro_rules! code_enum {
    ($(#[$meta:meta])* $name:ident, $label:literal { $($variant:ident = $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[serde(try_from = "i64", into = "i64")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn code(self) -> i64 {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.code()
            }
        }

        impl TryFrom<i64> for $name {
            type Error = UnknownCode;

            fn try_from(code: i64) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok($name::$variant),)+
                    other => Err(UnknownCode { kind: $label, code: other }),
                }
            }
        }
    };
}

code_enum! {
    /// Kind of operation the TSS node asks permission for.
    RequestType, "request type" {
        Ping = 0,
        KeyGen = 1,
        KeySign = 2,
        KeyReshare = 3,
    }
}

impl RequestType {
    pub fn classify(code: i64) -> Result<Self, UnknownCode> {
        Self::try_from(code)
    }

    /// Lower-case phrase used in error messages, e.g. "key sign".
    pub fn phrase(self) -> &'static str {
        match self {
            RequestType::Ping => "ping",
            RequestType::KeyGen => "key gen",
            RequestType::KeySign => "key sign",
            RequestType::KeyReshare => "key reshare",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestType::Ping => "Ping",
            RequestType::KeyGen => "KeyGen",
            RequestType::KeySign => "KeySign",
            RequestType::KeyReshare => "KeyReshare",
        };
        f.write_str(name)
    }
}

code_enum! {
    CurveType, "curve type" {
        Secp256k1 = 0,
        Ed25519 = 2,
    }
}

impl Default for CurveType {
    fn default() -> Self {
        CurveType::Secp256k1
    }
}

code_enum! {
    SignatureType, "signature type" {
        Unknown = 0,
        Ecdsa = 1,
        Eddsa = 2,
        Schnorr = 3,
    }
}

impl Default for SignatureType {
    fn default() -> Self {
        SignatureType::Unknown
    }
}

code_enum! {
    TssProtocol, "tss protocol" {
        Unknown = 0,
        Gg18 = 1,
        Lindell = 2,
        EddsaTss = 3,
    }
}

impl Default for TssProtocol {
    fn default() -> Self {
        TssProtocol::Unknown
    }
}
