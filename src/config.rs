//! Runtime configuration for the key tool.

use clap::{Parser, Subcommand};

/// Achain private key tool
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate fresh random keys
    Generate {
        /// Number of keys to generate
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Number of worker threads (default: number of CPU cores)
        #[arg(short = 'w', long)]
        workers: Option<usize>,

        /// Progress report interval in seconds
        #[arg(short = 'r', long, default_value = "5")]
        report_interval: u64,
    },

    /// Decode an encoded private key string and show its derived values
    Inspect {
        /// Base58Check private key string
        key: String,
    },

    /// Build a private key from a hex scalar and show its derived values
    FromHex {
        /// 32-byte scalar as 64 hex characters
        hex: String,
    },
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        match &self.command {
            Command::Generate { workers, count, .. } => {
                workers.unwrap_or_else(num_cpus::get).min(*count).max(1)
            }
            _ => 1,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.command {
            Command::Generate { count, workers, .. } => {
                if *count == 0 {
                    return Err(ConfigError::InvalidArgument(
                        "Count must be at least 1".into(),
                    ));
                }
                if *workers == Some(0) {
                    return Err(ConfigError::InvalidArgument(
                        "Workers must be at least 1".into(),
                    ));
                }
            }
            Command::Inspect { key } => {
                if key.trim().is_empty() {
                    return Err(ConfigError::InvalidArgument("Key cannot be empty".into()));
                }
            }
            Command::FromHex { hex } => {
                let hex = normalize_hex(hex);
                if hex.len() != 64 {
                    return Err(ConfigError::InvalidArgument(
                        "Hex scalar must be exactly 64 characters (32 bytes)".into(),
                    ));
                }
                if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(ConfigError::InvalidArgument(
                        "Hex scalar must contain only hex characters (0-9, a-f)".into(),
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Strips an optional 0x prefix from a hex argument.
pub fn normalize_hex(hex: &str) -> &str {
    let hex = hex.trim();
    hex.strip_prefix("0x").unwrap_or(hex)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_config(count: usize, workers: Option<usize>) -> Config {
        Config {
            command: Command::Generate {
                count,
                workers,
                report_interval: 5,
            },
        }
    }

    fn from_hex_config(hex: &str) -> Config {
        Config {
            command: Command::FromHex { hex: hex.into() },
        }
    }

    #[test]
    fn test_valid_generate() {
        let config = generate_config(10, Some(4));
        assert!(config.validate().is_ok());
        assert_eq!(config.worker_count(), 4);
    }

    #[test]
    fn test_workers_capped_by_count() {
        assert_eq!(generate_config(2, Some(8)).worker_count(), 2);
    }

    #[test]
    fn test_invalid_generate() {
        assert!(generate_config(0, None).validate().is_err());
        assert!(generate_config(1, Some(0)).validate().is_err());
    }

    #[test]
    fn test_from_hex_validation() {
        let valid = format!("0x{}", "ab".repeat(32));
        assert!(from_hex_config(&valid).validate().is_ok());
        assert!(from_hex_config("abcd").validate().is_err());
        assert!(from_hex_config(&"zz".repeat(32)).validate().is_err());
    }

    #[test]
    fn test_parse_args() {
        let config = Config::try_parse_from(["act-key", "generate", "-n", "3"]).unwrap();
        assert!(matches!(config.command, Command::Generate { count: 3, .. }));

        let config = Config::try_parse_from(["act-key", "inspect", "5Hp"]).unwrap();
        assert!(matches!(config.command, Command::Inspect { .. }));
    }
}
