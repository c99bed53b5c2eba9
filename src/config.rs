use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::ranking::TiePolicy;

/// Configuration for the leaderboard service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Key-value store configuration
    pub store: StoreConfig,
    /// CORS and request limits
    pub security: SecurityConfig,
    /// Ranking configuration
    pub leaderboard: RankingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// PostgreSQL connection string (postgres backend only)
    pub postgres_url: Option<String>,
    pub max_connections: u32,
    /// Upper bound for every store call
    pub timeout_ms: u64,
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Allowed CORS origins; empty means any origin
    pub allowed_origins: Vec<String>,
    /// Maximum request body size in bytes
    pub max_request_size: usize,
}

impl SecurityConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Window size when the request does not name one
    pub default_top_n: usize,
    /// Largest window a request may ask for
    pub max_top_n: usize,
    pub tie_policy: TiePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Enable request/response span logging
    pub log_requests: bool,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                postgres_url: None,
                max_connections: 10,
                timeout_ms: 2000,
            },
            security: SecurityConfig {
                allowed_origins: Vec::new(),
                max_request_size: 64 * 1024, // 64KB
            },
            leaderboard: RankingConfig {
                default_top_n: 10,
                max_top_n: 100,
                tie_policy: TiePolicy::default(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                log_requests: false,
            },
        }
    }
}

impl LeaderboardConfig {
    /// Load configuration from environment variables and validate it
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Server configuration
        if let Ok(host) = env::var("LEADERBOARD_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = env::var("PORT") {
            config.server.port = port.parse().context("Invalid PORT value")?;
        }

        // Store configuration
        if let Ok(backend) = env::var("LEADERBOARD_STORE") {
            config.store.backend = match backend.to_lowercase().as_str() {
                "memory" => StoreBackend::Memory,
                "postgres" | "postgresql" => StoreBackend::Postgres,
                other => return Err(anyhow::anyhow!("Invalid LEADERBOARD_STORE value: {}", other)),
            };
        }

        if let Ok(url) = env::var("DATABASE_URL") {
            config.store.postgres_url = Some(url);
        }

        if let Ok(max) = env::var("LEADERBOARD_STORE_MAX_CONNECTIONS") {
            config.store.max_connections = max
                .parse()
                .context("Invalid LEADERBOARD_STORE_MAX_CONNECTIONS value")?;
        }

        if let Ok(timeout) = env::var("LEADERBOARD_STORE_TIMEOUT_MS") {
            config.store.timeout_ms = timeout
                .parse()
                .context("Invalid LEADERBOARD_STORE_TIMEOUT_MS value")?;
        }

        // Security configuration
        // Logging is not up yet; main reports the CORS mode once it is.
        if let Ok(origins) = env::var("ALLOWED_ORIGINS") {
            config.security.allowed_origins = parse_origins(&origins);
        }

        if let Ok(size) = env::var("LEADERBOARD_MAX_REQUEST_SIZE") {
            config.security.max_request_size = size
                .parse()
                .context("Invalid LEADERBOARD_MAX_REQUEST_SIZE value")?;
        }

        // Ranking configuration
        if let Ok(top_n) = env::var("LEADERBOARD_TOP_N") {
            config.leaderboard.default_top_n =
                top_n.parse().context("Invalid LEADERBOARD_TOP_N value")?;
        }

        if let Ok(max) = env::var("LEADERBOARD_MAX_TOP_N") {
            config.leaderboard.max_top_n =
                max.parse().context("Invalid LEADERBOARD_MAX_TOP_N value")?;
        }

        if let Ok(policy) = env::var("LEADERBOARD_TIE_POLICY") {
            config.leaderboard.tie_policy = policy
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid LEADERBOARD_TIE_POLICY value: {}", e))?;
        }

        // Logging configuration
        if let Ok(level) = env::var("LEADERBOARD_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(log_requests) = env::var("LEADERBOARD_LOG_REQUESTS") {
            config.logging.log_requests = log_requests
                .parse()
                .context("Invalid LEADERBOARD_LOG_REQUESTS value")?;
        }

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            return Err(anyhow::anyhow!("Server host cannot be empty"));
        }

        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port must be non-zero"));
        }

        if self.store.timeout_ms == 0 {
            return Err(anyhow::anyhow!("Store timeout must be non-zero"));
        }

        if self.store.backend == StoreBackend::Postgres {
            match self.store.postgres_url.as_deref() {
                Some(url) if !url.is_empty() => {}
                _ => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL is required when LEADERBOARD_STORE=postgres"
                    ));
                }
            }

            if self.store.max_connections == 0 {
                return Err(anyhow::anyhow!("Store max connections must be non-zero"));
            }
        }

        if self.leaderboard.max_top_n == 0 {
            return Err(anyhow::anyhow!("Maximum leaderboard size must be non-zero"));
        }

        if self.leaderboard.default_top_n > self.leaderboard.max_top_n {
            return Err(anyhow::anyhow!(
                "Default leaderboard size {} exceeds maximum {}",
                self.leaderboard.default_top_n,
                self.leaderboard.max_top_n
            ));
        }

        Ok(())
    }

    /// Clamp a requested window to the configured bounds
    pub fn resolve_top_n(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.leaderboard.default_top_n)
            .min(self.leaderboard.max_top_n)
    }
}

/// Split a comma-separated origin list. `*` means any origin.
pub fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(|o| o.to_string())
        .collect();

    if origins.iter().any(|o| o == "*") {
        return Vec::new();
    }
    origins
}
