/// Credential scrubbing for captured subprocess output
pub mod credential_scrubber;

pub use credential_scrubber::{redact_values, scrub_credentials};
