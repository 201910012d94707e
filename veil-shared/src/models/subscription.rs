use serde::{Deserialize, Serialize};

/// Subscription snapshot from `user/getSubscribe`.
///
/// Also serialized into the local cache verbatim; the cached copy is a resume
/// hint only and never overrides a fresh server read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscribeInfo {
    #[serde(default)]
    pub plan_id: Option<i32>,
    pub token: String,
    pub subscribe_url: String,
    /// Profile identity on the network engine side.
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub expired_at: Option<i64>,
    #[serde(default)]
    pub device_limit: Option<i32>,
    #[serde(default)]
    pub transfer_enable: Option<i64>,
    #[serde(default)]
    pub upload: Option<i64>,
    #[serde(default)]
    pub download: Option<i64>,
}
