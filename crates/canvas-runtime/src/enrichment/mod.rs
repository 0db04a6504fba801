//! C6: Enrichment Gateway (§4.6).

mod backoff;
mod client;
mod gateway;

pub use backoff::{delay_for_attempt, retry_with_backoff, MAX_ATTEMPTS};
pub use client::LlmClient;
pub use gateway::{implementation_status_for, Gateway};

#[cfg(test)]
pub use client::fixtures;
