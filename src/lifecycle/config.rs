use thiserror::Error;

/// Environment variable that overrides [`SystemConfig::buffer_size`].
pub const BUFFER_SIZE_ENV: &str = "CLIENTBOOK_BUFFER_SIZE";

const DEFAULT_BUFFER_SIZE: usize = 32;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CLIENTBOOK_BUFFER_SIZE must be a positive integer, got {0:?}")]
    InvalidBufferSize(String),
}

/// Runtime settings for a [`StoreSystem`](super::StoreSystem).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemConfig {
    /// Capacity of the actor's request channel.
    pub buffer_size: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl SystemConfig {
    /// Defaults, with any override found in the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(BUFFER_SIZE_ENV) {
            config.buffer_size = match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => return Err(ConfigError::InvalidBufferSize(raw)),
            };
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_override() {
        let config = SystemConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.buffer_size, 32);
    }

    #[test]
    fn reads_buffer_size_override() {
        let config = SystemConfig::from_lookup(|_| Some(" 8 ".to_string())).unwrap();
        assert_eq!(config.buffer_size, 8);
    }

    #[test]
    fn rejects_zero_and_garbage() {
        for raw in ["0", "-1", "lots"] {
            assert_eq!(
                SystemConfig::from_lookup(|_| Some(raw.to_string())),
                Err(ConfigError::InvalidBufferSize(raw.to_string()))
            );
        }
    }
}
