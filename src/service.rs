use kv_log_macro as log;

use crate::api::{PackageDataClaim, Request, Response, Status};
use crate::prom;
use crate::verifier::{RequestScope, Verifier, VerifyError};

/// Turns raw callback requests into responses.
///
/// Every input produces exactly one `Response`; decoding failures, policy
/// rejections and internal faults all become rejections with an error string.
pub struct CallbackService {
    verifier: Box<dyn Verifier>,
}

impl CallbackService {
    pub fn new(verifier: impl Verifier + 'static) -> Self {
        Self { verifier: Box::new(verifier) }
    }

    /// `raw` is the JSON text of a `Request`.
    pub fn handle_request(&self, raw: &[u8]) -> Response {
        let request: Request = match serde_json::from_slice(raw) {
            Ok(request) => request,
            Err(e) => return self.respond(&RequestScope::default(), Err(VerifyError::MalformedRequest(e.to_string()))),
        };
        let scope = RequestScope::new(request.request_id.as_str());
        log::info!("Received request", {
            request_id: scope.request_id(),
            request_type: request.request_type.map(|t| t.to_string()).unwrap_or_default(),
        });
        let verdict = self.verifier.verify(&request, &scope);
        self.respond(&scope, verdict)
    }

    /// Entry point for the claims of an already verified token.
    pub fn handle_claim(&self, claim: &PackageDataClaim) -> Response {
        match claim.request_bytes() {
            Ok(Some(raw)) => self.handle_request(&raw),
            Ok(None) => self.respond(&RequestScope::default(), Err(VerifyError::MissingRequest)),
            Err(e) => self.respond(
                &RequestScope::default(),
                Err(VerifyError::MalformedRequest(format!("package data is not base64: {}", e))),
            ),
        }
    }

    fn respond(&self, scope: &RequestScope, verdict: Result<(), VerifyError>) -> Response {
        prom::COUNTER_REQUESTS_RECEIVED.inc();
        match verdict {
            Ok(()) => {
                prom::COUNTER_REQUESTS_APPROVED.inc();
                let response = Response::approve(scope.request_id());
                log::info!("Request approved", { request_id: scope.request_id(), response: response.to_string() });
                response
            }
            Err(e) => {
                let status = e.status();
                match status {
                    Status::InternalError => prom::COUNTER_REQUESTS_INTERNAL_ERROR.inc(),
                    _ => prom::COUNTER_REQUESTS_REJECTED.inc(),
                }
                let response = Response::reject(scope.request_id(), status, e.to_string());
                log::error!("Request rejected", { request_id: scope.request_id(), response: response.to_string() });
                response
            }
        }
    }
}
