use kv_log_macro as log;

use crate::core::{KeySignDetail, KeySignRequestInfo};
use crate::utils;

use super::{KeySignPolicy, PolicyError, RequestScope};

/// Key sign policy that only lets funds go to known addresses.
///
/// With an empty whitelist every request passes. Otherwise the request must
/// carry a transaction, the transaction must name at least one destination, and
/// every destination must be whitelisted. Addresses compare as exact strings.
#[derive(Clone, Debug, Default)]
pub struct DestinationWhitelist {
    addresses: Vec<String>,
}

impl DestinationWhitelist {
    pub fn new<I, S>(addresses: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
    {
        let addresses = addresses
            .into_iter()
            .map(Into::into)
            .map(|a: String| a.trim().to_owned())
            .filter(|a| !a.is_empty())
            .collect();
        Self { addresses }
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

impl KeySignPolicy for DestinationWhitelist {
    fn evaluate(&self, _: &KeySignDetail, info: &KeySignRequestInfo, scope: &RequestScope) -> Result<(), PolicyError> {
        if self.addresses.is_empty() {
            return Ok(());
        }
        let transaction = info
            .transaction
            .as_ref()
            .ok_or_else(|| PolicyError::Rejected("transaction is absent".to_owned()))?;
        let destinations = transaction.destination_addresses();
        if destinations.is_empty() {
            return Err(PolicyError::Rejected("transaction has no destination address".to_owned()));
        }
        let missing = utils::missing_from(&destinations, &self.addresses);
        if !missing.is_empty() {
            let missing: Vec<&str> = missing.into_iter().map(String::as_str).collect();
            return Err(PolicyError::Rejected(format!(
                "destination address not in whitelist: {}",
                missing.join(", ")
            )));
        }
        log::debug!("Destinations whitelisted", {
            request_id: scope.request_id(),
            destinations: destinations.join(","),
        });
        Ok(())
    }
}
