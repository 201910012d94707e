use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Everything needed to create a profile bound to a subscription source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSpec {
    pub uuid: Uuid,
    pub name: String,
    pub source_url: String,
}

/// A profile known to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileHandle {
    pub uuid: Uuid,
    pub name: String,
    pub source_url: String,
}

#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("engine is not running")]
    NotRunning,

    #[error("profile not found: {0}")]
    ProfileNotFound(Uuid),

    #[error("engine operation failed: {0}")]
    Failed(String),
}

/// The external VPN/proxy engine this client drives but does not implement.
///
/// Activation treats every failure here as non-fatal: errors are logged and
/// the purchase flow proceeds regardless.
#[async_trait]
pub trait NetworkEngine: Send + Sync {
    async fn find_profile(&self, uuid: Uuid) -> Result<Option<ProfileHandle>, EngineError>;

    /// Create a profile from a subscription source and fetch its initial
    /// configuration.
    async fn import_profile(&self, spec: ProfileSpec) -> Result<ProfileHandle, EngineError>;

    /// Re-fetch the configuration of an existing profile from its source.
    async fn refresh_profile(&self, uuid: Uuid) -> Result<(), EngineError>;

    /// Mark the profile as the active/selected one.
    async fn select_profile(&self, uuid: Uuid) -> Result<(), EngineError>;

    /// Node names in the currently selectable proxy group.
    async fn active_group(&self) -> Result<Vec<String>, EngineError>;

    /// Point the selectable group at the given node.
    async fn patch_selection(&self, node: &str) -> Result<(), EngineError>;
}
