//! Credential provider.
//!
//! A cached token is reused while the platform still accepts it; otherwise
//! the OAuth device authorization grant runs and its token is cached.

mod cache;
mod clock;
mod device_flow;
mod error;
mod provider;

pub use cache::{Credential, TokenCache};
pub use clock::{Clock, SystemClock};
pub use device_flow::{
    parse_device_authorization, parse_token_response, print_verification_prompt,
    DeviceAuthorization, DeviceFlow, TokenPoll, DEFAULT_EXPIRES_IN_SECS, DEFAULT_INTERVAL_SECS,
    DEVICE_GRANT_TYPE,
};
pub use error::AuthError;
pub use provider::{validate_token, CredentialProvider, CredentialState};
