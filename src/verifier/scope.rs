/// Logging context for one request.
///
/// Created by the caller of `Verifier::verify` and handed down to every policy,
/// so log lines carry the request they belong to without process-wide state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestScope {
    request_id: String,
}

impl RequestScope {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self { request_id: request_id.into() }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}
