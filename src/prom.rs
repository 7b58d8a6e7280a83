use anyhow::{Context, Result};
use prometheus::{self, Encoder, IntCounter, TextEncoder};

use prometheus::register_int_counter;
use structopt::lazy_static::lazy_static;

lazy_static! {
    pub static ref COUNTER_REQUESTS_RECEIVED: IntCounter =
        register_int_counter!("callback_requests_received", "Number of callback requests received").unwrap();
    pub static ref COUNTER_REQUESTS_APPROVED: IntCounter =
        register_int_counter!("callback_requests_approved", "Number of callback requests approved").unwrap();
    pub static ref COUNTER_REQUESTS_REJECTED: IntCounter =
        register_int_counter!("callback_requests_rejected", "Number of callback requests rejected as invalid").unwrap();
    pub static ref COUNTER_REQUESTS_INTERNAL_ERROR: IntCounter =
        register_int_counter!("callback_requests_internal_error", "Number of callback requests that failed internally").unwrap();
}

/// Current values of every registered metric in the text exposition format.
pub fn render() -> Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&prometheus::gather(), &mut buffer)
        .context("Encode metrics.")?;
    String::from_utf8(buffer).context("Metrics are not valid UTF-8.")
}
