use serde::Deserialize;

/// The service's standard response wrapper.
///
/// Every field is optional on the wire; error replies frequently omit `data`
/// and success replies omit `error`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: Option<String>,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    pub fn is_business_failure(&self) -> bool {
        self.status.as_deref() == Some("fail")
    }

    /// Best available human-readable failure text.
    pub fn failure_message(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

/// Raw checkout reply. This endpoint bypasses the standard envelope and
/// answers `{type, data}` directly; the payload's meaning depends on `type`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutReply {
    #[serde(rename = "type")]
    pub kind: Option<i32>,
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub trade_no: Option<String>,
}
