//! Synchronization settings.

/// Configuration for session synchronization.
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Wait for the opponent's media stream as well as the data channel
    /// before treating the session as connected.
    pub require_media: bool,
    /// Depth of the session event broadcast channel.
    pub event_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            require_media: true,
            event_capacity: 100,
        }
    }
}

/// Builder for sync configuration.
pub struct SyncConfigBuilder {
    config: SyncConfig,
}

impl SyncConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SyncConfig::default(),
        }
    }

    pub fn require_media(mut self, required: bool) -> Self {
        self.config.require_media = required;
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity.max(1);
        self
    }

    pub fn build(self) -> SyncConfig {
        self.config
    }
}

impl From<SyncConfig> for SyncConfigBuilder {
    fn from(config: SyncConfig) -> Self {
        Self { config }
    }
}

impl Default for SyncConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_config_builder() {
        let config = SyncConfigBuilder::new()
            .require_media(false)
            .event_capacity(0)
            .build();

        assert!(!config.require_media);
        assert_eq!(config.event_capacity, 1);
    }

    #[test]
    fn test_sync_config_defaults() {
        let config = SyncConfig::default();
        assert!(config.require_media);
        assert_eq!(config.event_capacity, 100);
    }
}
