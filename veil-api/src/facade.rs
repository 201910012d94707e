//! Normalization façade: every remote call resolves to [`Outcome`], never a
//! panic, never a raw transport error. Callers above this layer only ever see
//! the envelope.

use crate::client::ApiClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use veil_shared::{ApiEnvelope, ApiError, Outcome};

/// Map a transport-layer failure onto the taxonomy.
fn transport_error(error: &reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::transport("request timeout, please try again")
    } else if error.is_connect() || error.is_request() {
        ApiError::transport("network error, please check your connection")
    } else {
        ApiError::unknown(error.to_string())
    }
}

/// Build the error for a non-2xx reply: the server often still answers with
/// its envelope, so mine it for a message before falling back.
fn protocol_error(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body) {
        Ok(envelope) if envelope.message.is_some() || envelope.error.is_some() => {
            ApiError::protocol(status, envelope.failure_message())
        }
        _ => ApiError::protocol(status, format!("server error: {status}")),
    }
}

/// Collapse a decoded envelope into an outcome.
fn normalize<T>(envelope: ApiEnvelope<T>) -> Outcome<T> {
    if envelope.is_success() {
        match envelope.data {
            Some(data) => Outcome::Success(data),
            // A success without a payload is a contract violation the caller
            // cannot act on.
            None => Outcome::Failure(ApiError::business(envelope.failure_message())),
        }
    } else if envelope.is_business_failure() {
        Outcome::Failure(ApiError::business(envelope.failure_message()))
    } else {
        Outcome::Failure(ApiError::unknown(envelope.failure_message()))
    }
}

/// Like [`normalize`] but for endpoints whose payload we discard; a missing
/// `data` on success is fine here.
fn normalize_void<T>(envelope: ApiEnvelope<T>) -> Outcome<()> {
    if envelope.is_success() {
        Outcome::Success(())
    } else if envelope.is_business_failure() {
        Outcome::Failure(ApiError::business(envelope.failure_message()))
    } else {
        Outcome::Failure(ApiError::unknown(envelope.failure_message()))
    }
}

async fn read_body(
    endpoint: &str,
    response: Result<reqwest::Response, reqwest::Error>,
) -> Result<String, ApiError> {
    let response = response.map_err(|error| {
        warn!(endpoint, %error, "transport failure");
        transport_error(&error)
    })?;
    let status = response.status().as_u16();
    let body = response.text().await.map_err(|error| {
        warn!(endpoint, %error, "failed to read response body");
        transport_error(&error)
    })?;
    if !(200..300).contains(&status) {
        let error = protocol_error(status, &body);
        warn!(endpoint, status, message = %error.message, "http failure");
        return Err(error);
    }
    Ok(body)
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|error| {
        warn!(endpoint, %error, "failed to decode response");
        ApiError::unknown(error.to_string())
    })
}

impl ApiClient {
    pub(crate) async fn get_enveloped<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Outcome<T> {
        match read_body(endpoint, self.get(endpoint, query).await).await {
            Ok(body) => match decode::<ApiEnvelope<T>>(endpoint, &body) {
                Ok(envelope) => log_failure(endpoint, normalize(envelope)),
                Err(error) => Outcome::Failure(error),
            },
            Err(error) => Outcome::Failure(error),
        }
    }

    pub(crate) async fn post_enveloped<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        request: &B,
    ) -> Outcome<T> {
        match read_body(endpoint, self.post_json(endpoint, request).await).await {
            Ok(body) => match decode::<ApiEnvelope<T>>(endpoint, &body) {
                Ok(envelope) => log_failure(endpoint, normalize(envelope)),
                Err(error) => Outcome::Failure(error),
            },
            Err(error) => Outcome::Failure(error),
        }
    }

    pub(crate) async fn post_void<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        request: &B,
    ) -> Outcome<()> {
        match read_body(endpoint, self.post_json(endpoint, request).await).await {
            Ok(body) => match decode::<ApiEnvelope<serde_json::Value>>(endpoint, &body) {
                Ok(envelope) => log_failure(endpoint, normalize_void(envelope)),
                Err(error) => Outcome::Failure(error),
            },
            Err(error) => Outcome::Failure(error),
        }
    }

    /// For endpoints that answer a raw payload instead of the envelope.
    pub(crate) async fn post_direct<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        request: &B,
    ) -> Outcome<T> {
        match read_body(endpoint, self.post_json(endpoint, request).await).await {
            Ok(body) => match decode::<T>(endpoint, &body) {
                Ok(value) => Outcome::Success(value),
                Err(error) => Outcome::Failure(error),
            },
            Err(error) => Outcome::Failure(error),
        }
    }

    /// Raw text document from an absolute URL.
    pub(crate) async fn get_direct_text(&self, url: &str) -> Outcome<String> {
        match read_body(url, self.get_absolute(url).await).await {
            Ok(body) => Outcome::Success(body),
            Err(error) => Outcome::Failure(error),
        }
    }
}

fn log_failure<T>(endpoint: &str, outcome: Outcome<T>) -> Outcome<T> {
    outcome.on_failure(|error| {
        warn!(endpoint, code = error.code, message = %error.message, "call rejected");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_shared::ErrorKind;

    fn envelope(json: &str) -> ApiEnvelope<String> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn success_with_data_passes_through() {
        let outcome = normalize(envelope(r#"{"status":"success","data":"T123"}"#));
        assert_eq!(outcome.ok().as_deref(), Some("T123"));
    }

    #[test]
    fn business_rejection_keeps_the_zero_sentinel() {
        let outcome = normalize(envelope(
            r#"{"status":"fail","message":"order not found"}"#,
        ));
        let error = outcome.err().unwrap();
        assert_eq!(error.kind, ErrorKind::Business);
        assert_eq!(error.code, 0);
        assert_eq!(error.message, "order not found");
    }

    #[test]
    fn success_without_data_is_a_failure() {
        let outcome = normalize(envelope(r#"{"status":"success"}"#));
        assert!(outcome.is_failure());
    }

    #[test]
    fn void_variant_tolerates_missing_data() {
        let outcome = normalize_void(envelope(r#"{"status":"success"}"#));
        assert!(outcome.is_success());

        let outcome = normalize_void(envelope(r#"{"status":"fail","error":"too late"}"#));
        assert_eq!(outcome.err().unwrap().message, "too late");
    }

    #[test]
    fn protocol_error_mines_the_body_for_a_message() {
        let error = protocol_error(422, r#"{"status":"fail","message":"coupon expired"}"#);
        assert_eq!(error.kind, ErrorKind::Protocol);
        assert_eq!(error.code, 422);
        assert_eq!(error.message, "coupon expired");
    }

    #[test]
    fn protocol_error_falls_back_when_the_body_is_opaque() {
        let error = protocol_error(502, "<html>bad gateway</html>");
        assert_eq!(error.code, 502);
        assert_eq!(error.message, "server error: 502");
    }
}
