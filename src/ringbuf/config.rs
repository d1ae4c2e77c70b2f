//! Ring buffer configuration

use crate::error::{RingError, Result};

/// Configuration for an owned ring buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingBufferConfig {
    /// Name used to tag log events from this ring
    pub name: String,
    /// Size of the data area in bytes
    pub capacity: usize,
}

impl Default for RingBufferConfig {
    fn default() -> Self {
        Self {
            name: crate::config::DEFAULT_RING_NAME.to_string(),
            capacity: crate::config::DEFAULT_RING_CAPACITY,
        }
    }
}

impl RingBufferConfig {
    /// Create a new configuration with custom name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(RingError::invalid_parameter(
                "capacity",
                "Capacity must be greater than 0",
            ));
        }

        if self.name.is_empty() {
            return Err(RingError::invalid_parameter(
                "name",
                "Name cannot be empty",
            ));
        }

        Ok(())
    }
}

/// Builder pattern for ring buffer configuration
pub struct RingBufferConfigBuilder {
    config: RingBufferConfig,
}

impl RingBufferConfigBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: RingBufferConfig::new(name),
        }
    }

    /// Set capacity
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<RingBufferConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
