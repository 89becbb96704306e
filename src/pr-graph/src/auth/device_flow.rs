//! OAuth device authorization grant.
//!
//! The operator is shown a verification URI and a short user code, and the
//! token endpoint is polled until they finish authorizing in a browser.

use super::clock::Clock;
use super::error::AuthError;
use super::Credential;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, Instrument};

/// Grant type sent while polling the token endpoint.
pub const DEVICE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Poll interval used when the platform does not specify one.
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Device code lifetime used when the platform does not specify one.
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 900;

/// Extra wait added after each `slow_down` response.
const SLOW_DOWN_STEP: Duration = Duration::from_secs(5);

/// Response of the device-authorization endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAuthorization {
    /// Opaque code identifying this authorization attempt.
    pub device_code: String,
    /// Short code the operator types at the verification URI.
    pub user_code: String,
    /// Where the operator completes authorization.
    pub verification_uri: String,
    /// Seconds to wait between polls.
    pub interval: u64,
    /// Seconds until the device code expires.
    pub expires_in: u64,
}

/// Outcome of a single token poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenPoll {
    /// The operator has not finished yet.
    Pending,
    /// Polling too fast; wait longer before the next attempt.
    SlowDown,
    /// Authorization completed.
    Granted(String),
    /// Authorization ended with any other named error.
    Failed {
        error: String,
        description: Option<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
struct RawDeviceAuthorization {
    device_code: Option<String>,
    user_code: Option<String>,
    verification_uri: Option<String>,
    interval: Option<u64>,
    expires_in: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Serialize)]
struct DeviceCodeRequest<'a> {
    client_id: &'a str,
    scope: &'a str,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    device_code: &'a str,
    grant_type: &'static str,
}

/// Parses a device-authorization response body, JSON or form-encoded.
///
/// `interval` and `expires_in` fall back to 5 and 900 seconds.
///
/// # Errors
///
/// Returns [`AuthError::MalformedResponse`] if the body cannot be parsed or
/// lacks the device code, user code or verification URI.
pub fn parse_device_authorization(body: &str) -> Result<DeviceAuthorization, AuthError> {
    let malformed = |message: String| AuthError::MalformedResponse {
        endpoint: "device code",
        message,
    };

    let raw = if is_json(body) {
        serde_json::from_str::<RawDeviceAuthorization>(body).map_err(|e| malformed(e.to_string()))?
    } else {
        let mut raw = RawDeviceAuthorization::default();
        for (key, value) in url::form_urlencoded::parse(body.trim().as_bytes()) {
            match key.as_ref() {
                "device_code" => raw.device_code = Some(value.into_owned()),
                "user_code" => raw.user_code = Some(value.into_owned()),
                "verification_uri" => raw.verification_uri = Some(value.into_owned()),
                "interval" => raw.interval = Some(parse_seconds("interval", &value)?),
                "expires_in" => raw.expires_in = Some(parse_seconds("expires_in", &value)?),
                _ => {}
            }
        }
        raw
    };

    let require = |field: Option<String>, name: &str| {
        field
            .filter(|v| !v.is_empty())
            .ok_or_else(|| malformed(format!("missing {name}")))
    };

    Ok(DeviceAuthorization {
        device_code: require(raw.device_code, "device_code")?,
        user_code: require(raw.user_code, "user_code")?,
        verification_uri: require(raw.verification_uri, "verification_uri")?,
        interval: raw.interval.unwrap_or(DEFAULT_INTERVAL_SECS),
        expires_in: raw.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS),
    })
}

/// Classifies a token endpoint response body, JSON or form-encoded.
///
/// # Errors
///
/// Returns [`AuthError::MalformedResponse`] if the body carries neither an
/// access token nor an error.
pub fn parse_token_response(body: &str) -> Result<TokenPoll, AuthError> {
    let malformed = |message: String| AuthError::MalformedResponse {
        endpoint: "token",
        message,
    };

    let raw = if is_json(body) {
        serde_json::from_str::<RawTokenResponse>(body).map_err(|e| malformed(e.to_string()))?
    } else {
        let mut raw = RawTokenResponse::default();
        for (key, value) in url::form_urlencoded::parse(body.trim().as_bytes()) {
            match key.as_ref() {
                "access_token" => raw.access_token = Some(value.into_owned()),
                "error" => raw.error = Some(value.into_owned()),
                "error_description" => raw.error_description = Some(value.into_owned()),
                _ => {}
            }
        }
        raw
    };

    match (raw.error, raw.access_token) {
        (Some(error), _) => Ok(match error.as_str() {
            "authorization_pending" => TokenPoll::Pending,
            "slow_down" => TokenPoll::SlowDown,
            _ => TokenPoll::Failed {
                error,
                description: raw.error_description,
            },
        }),
        (None, Some(token)) if !token.is_empty() => Ok(TokenPoll::Granted(token)),
        _ => Err(malformed("neither access_token nor error present".to_string())),
    }
}

fn is_json(body: &str) -> bool {
    body.trim_start().starts_with('{')
}

fn parse_seconds(field: &'static str, value: &str) -> Result<u64, AuthError> {
    value.trim().parse().map_err(|_| AuthError::MalformedResponse {
        endpoint: "device code",
        message: format!("{field} is not a number: {value}"),
    })
}

/// Prints the verification URI and user code for the operator.
pub fn print_verification_prompt(authorization: &DeviceAuthorization) {
    println!("-----------------------------------------------------");
    println!(" Open the following URL in a browser and sign in:");
    println!("    {}", authorization.verification_uri);
    println!(" User code: {}", authorization.user_code);
    println!("-----------------------------------------------------");
}

/// Device authorization client for one pair of OAuth endpoints.
pub struct DeviceFlow {
    http: reqwest::Client,
    device_code_url: String,
    token_url: String,
    clock: Arc<dyn Clock>,
}

impl DeviceFlow {
    /// Creates a flow against the given endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Http`] if the HTTP client cannot be built.
    pub fn new(
        device_code_url: impl Into<String>,
        token_url: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            device_code_url: device_code_url.into(),
            token_url: token_url.into(),
            clock,
        })
    }

    /// Runs the whole grant and returns the issued credential.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if either endpoint fails, the platform rejects
    /// the request, or the device code expires first.
    pub async fn authorize(&self, client_id: &str, scope: &str) -> Result<Credential, AuthError> {
        let span = info_span!("device_flow", client_id, scope);

        async {
            info!("Starting device authorization");
            let authorization = self.request_device_code(client_id, scope).await?;
            print_verification_prompt(&authorization);

            let token = self.poll_for_token(client_id, &authorization).await?;
            info!("Device authorization complete");
            Ok(Credential::new(token))
        }
        .instrument(span)
        .await
    }

    /// Requests a device code and user code.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] on a non-success status or malformed body.
    pub async fn request_device_code(
        &self,
        client_id: &str,
        scope: &str,
    ) -> Result<DeviceAuthorization, AuthError> {
        let response = self
            .http
            .post(&self.device_code_url)
            .header(ACCEPT, "application/json")
            .json(&DeviceCodeRequest { client_id, scope })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::DeviceCodeRequestFailed {
                status: status.as_u16(),
            });
        }

        let authorization = parse_device_authorization(&response.text().await?)?;
        debug!(
            interval = authorization.interval,
            expires_in = authorization.expires_in,
            "Received device code"
        );
        Ok(authorization)
    }

    /// Polls the token endpoint until a token is issued, the platform
    /// reports an error, or `expires_in` seconds have elapsed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TimedOut`] once the device code has expired, or
    /// any other [`AuthError`] the token endpoint produces.
    pub async fn poll_for_token(
        &self,
        client_id: &str,
        authorization: &DeviceAuthorization,
    ) -> Result<String, AuthError> {
        let started = self.clock.now();
        let budget = Duration::from_secs(authorization.expires_in);
        let mut interval = Duration::from_secs(authorization.interval);

        loop {
            self.clock.sleep(interval).await;
            if self.clock.now().duration_since(started) > budget {
                return Err(AuthError::TimedOut {
                    expires_in: authorization.expires_in,
                });
            }

            match self.poll_once(client_id, &authorization.device_code).await? {
                TokenPoll::Pending => debug!("Authorization pending"),
                TokenPoll::SlowDown => {
                    interval += SLOW_DOWN_STEP;
                    info!(interval_secs = interval.as_secs(), "slow_down received, increasing poll interval");
                }
                TokenPoll::Granted(token) => return Ok(token),
                TokenPoll::Failed { error, description } => {
                    return Err(AuthError::Rejected { error, description });
                }
            }
        }
    }

    async fn poll_once(&self, client_id: &str, device_code: &str) -> Result<TokenPoll, AuthError> {
        let response = self
            .http
            .post(&self.token_url)
            .header(ACCEPT, "application/json")
            .json(&TokenRequest {
                client_id,
                device_code,
                grant_type: DEVICE_GRANT_TYPE,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::TokenRequestFailed {
                status: status.as_u16(),
            });
        }

        parse_token_response(&response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::clock::manual::ManualClock;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CLIENT_ID: &str = "Iv1.test";

    fn flow(server: &MockServer, clock: Arc<ManualClock>) -> DeviceFlow {
        DeviceFlow::new(
            format!("{}/login/device/code", server.uri()),
            format!("{}/login/oauth/access_token", server.uri()),
            clock,
        )
        .unwrap()
    }

    fn authorization(interval: u64, expires_in: u64) -> DeviceAuthorization {
        DeviceAuthorization {
            device_code: "dev-123".to_string(),
            user_code: "ABCD-1234".to_string(),
            verification_uri: "https://github.com/login/device".to_string(),
            interval,
            expires_in,
        }
    }

    async fn mount_pending(server: &MockServer, times: u64) {
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"error": "authorization_pending"})),
            )
            .up_to_n_times(times)
            .with_priority(1)
            .mount(server)
            .await;
    }

    #[test]
    fn can_parse_form_encoded_authorization() {
        let parsed = parse_device_authorization(
            "device_code=3584d83530557fdd1f46af8289938c8ef79f9dc5&expires_in=899&interval=5\
             &user_code=WDJB-MJHT&verification_uri=https%3A%2F%2Fgithub.com%2Flogin%2Fdevice",
        )
        .unwrap();

        assert_eq!(parsed.device_code, "3584d83530557fdd1f46af8289938c8ef79f9dc5");
        assert_eq!(parsed.user_code, "WDJB-MJHT");
        assert_eq!(parsed.verification_uri, "https://github.com/login/device");
        assert_eq!(parsed.interval, 5);
        assert_eq!(parsed.expires_in, 899);
    }

    #[test]
    fn can_parse_json_authorization_with_defaults() {
        let parsed = parse_device_authorization(
            r#"{"device_code":"dc","user_code":"UC","verification_uri":"https://example.com/device"}"#,
        )
        .unwrap();

        assert_eq!(parsed.interval, DEFAULT_INTERVAL_SECS);
        assert_eq!(parsed.expires_in, DEFAULT_EXPIRES_IN_SECS);
    }

    #[test]
    fn parse_authorization_rejects_missing_fields() {
        let result = parse_device_authorization("user_code=UC&verification_uri=https%3A%2F%2Fx");
        assert!(matches!(result, Err(AuthError::MalformedResponse { .. })));

        let result = parse_device_authorization("device_code=dc&user_code=UC&verification_uri=x&interval=soon");
        assert!(matches!(result, Err(AuthError::MalformedResponse { .. })));
    }

    #[test]
    fn classifies_token_responses() {
        assert_eq!(
            parse_token_response(r#"{"error":"authorization_pending"}"#).unwrap(),
            TokenPoll::Pending
        );
        assert_eq!(
            parse_token_response("error=slow_down&interval=10").unwrap(),
            TokenPoll::SlowDown
        );
        assert_eq!(
            parse_token_response(r#"{"access_token":"gho_x","token_type":"bearer","scope":"repo"}"#)
                .unwrap(),
            TokenPoll::Granted("gho_x".to_string())
        );
        assert_eq!(
            parse_token_response(r#"{"error":"access_denied","error_description":"denied"}"#)
                .unwrap(),
            TokenPoll::Failed {
                error: "access_denied".to_string(),
                description: Some("denied".to_string()),
            }
        );
        assert!(parse_token_response("{}").is_err());
    }

    #[tokio::test]
    async fn can_request_device_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/device/code"))
            .and(body_partial_json(json!({"client_id": CLIENT_ID, "scope": "repo"})))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "device_code=dc&user_code=WDJB-MJHT&verification_uri=https%3A%2F%2Fgithub.com%2Flogin%2Fdevice",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let authorization = flow(&server, Arc::new(ManualClock::new()))
            .request_device_code(CLIENT_ID, "repo")
            .await
            .unwrap();

        assert_eq!(authorization.device_code, "dc");
        assert_eq!(authorization.interval, DEFAULT_INTERVAL_SECS);
    }

    #[tokio::test]
    async fn device_code_failure_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/device/code"))
            .respond_with(ResponseTemplate::new(422))
            .mount(&server)
            .await;

        let result = flow(&server, Arc::new(ManualClock::new()))
            .authorize(CLIENT_ID, "repo")
            .await;

        assert!(matches!(
            result,
            Err(AuthError::DeviceCodeRequestFailed { status: 422 })
        ));
    }

    #[tokio::test]
    async fn poll_returns_token_after_pending_responses() {
        let server = MockServer::start().await;
        mount_pending(&server, 3).await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .and(body_partial_json(json!({
                "client_id": CLIENT_ID,
                "device_code": "dev-123",
                "grant_type": DEVICE_GRANT_TYPE,
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "gho_granted", "token_type": "bearer"})),
            )
            .with_priority(2)
            .expect(1)
            .mount(&server)
            .await;

        let clock = Arc::new(ManualClock::new());
        let token = flow(&server, clock.clone())
            .poll_for_token(CLIENT_ID, &authorization(5, 900))
            .await
            .unwrap();

        assert_eq!(token, "gho_granted");
        assert!(clock.elapsed() >= Duration::from_secs(3 * 5));
    }

    #[tokio::test]
    async fn poll_times_out_while_pending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"error": "authorization_pending"})),
            )
            .expect(2)
            .mount(&server)
            .await;

        let clock = Arc::new(ManualClock::new());
        let result = flow(&server, clock.clone())
            .poll_for_token(CLIENT_ID, &authorization(5, 12))
            .await;

        assert!(matches!(result, Err(AuthError::TimedOut { expires_in: 12 })));
        assert!(clock.elapsed() > Duration::from_secs(12));
    }

    #[tokio::test]
    async fn slow_down_increases_interval() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "slow_down"})))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "gho_slow"})))
            .with_priority(2)
            .mount(&server)
            .await;

        let clock = Arc::new(ManualClock::new());
        let token = flow(&server, clock.clone())
            .poll_for_token(CLIENT_ID, &authorization(5, 900))
            .await
            .unwrap();

        assert_eq!(token, "gho_slow");
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(5), Duration::from_secs(10)]
        );
    }

    #[tokio::test]
    async fn named_error_aborts_flow() {
        let server = MockServer::start().await;
        mount_pending(&server, 1).await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"error": "expired_token"})),
            )
            .with_priority(2)
            .expect(1)
            .mount(&server)
            .await;

        let result = flow(&server, Arc::new(ManualClock::new()))
            .poll_for_token(CLIENT_ID, &authorization(5, 900))
            .await;

        match result {
            Err(AuthError::Rejected { error, .. }) => assert_eq!(error, "expired_token"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn token_endpoint_failure_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let result = flow(&server, Arc::new(ManualClock::new()))
            .poll_for_token(CLIENT_ID, &authorization(5, 900))
            .await;

        assert!(matches!(
            result,
            Err(AuthError::TokenRequestFailed { status: 500 })
        ));
    }
}
