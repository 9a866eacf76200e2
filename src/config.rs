//! Engine configuration module
//!
//! Provides configuration types for the sync engine.

use thiserror::Error;

/// Default number of messages fetched per history page.
pub const DEFAULT_HISTORY_PAGE_SIZE: usize = 50;

/// Sync engine configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Messages per history page when the caller does not pass a limit
    pub history_page_size: usize,
    /// Capacity of the engine event broadcast channel
    pub event_capacity: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_page_size: DEFAULT_HISTORY_PAGE_SIZE,
            event_capacity: 256,
        }
    }
}

impl ChatConfig {
    /// Create a new ChatConfigBuilder
    pub fn builder() -> ChatConfigBuilder {
        ChatConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_page_size == 0 {
            return Err(ConfigError::InvalidValue("history_page_size"));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::InvalidValue("event_capacity"));
        }
        Ok(())
    }
}

/// Builder for ChatConfig
#[derive(Debug, Default)]
pub struct ChatConfigBuilder {
    history_page_size: Option<usize>,
    event_capacity: Option<usize>,
}

impl ChatConfigBuilder {
    /// Set the history page size
    pub fn history_page_size(mut self, size: usize) -> Self {
        self.history_page_size = Some(size);
        self
    }

    /// Set the event broadcast channel capacity
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ChatConfig, ConfigError> {
        let defaults = ChatConfig::default();
        let config = ChatConfig {
            history_page_size: self.history_page_size.unwrap_or(defaults.history_page_size),
            event_capacity: self.event_capacity.unwrap_or(defaults.event_capacity),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
}
