use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub protection: ProtectionConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory holding the pre-built frontend bundle (served in production only)
    pub frontend_dist: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectionConfig {
    pub enabled: bool,
    /// Rules report but never deny
    pub dry_run: bool,
    #[serde(skip_serializing)]
    pub key: String,
    /// Origin of the decision gateway; required when protection is enabled
    pub url: String,
    pub timeout_ms: u64,
    pub characteristics: Vec<String>,
    pub allowed_bots: Vec<String>,
    pub refill_rate: u32,
    pub interval_secs: u32,
    pub capacity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Empty means permissive CORS
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = env::var("APP_ENV")
            .or_else(|_| env::var("NODE_ENV"))
            .map(|v| Environment::parse(&v))
            .unwrap_or(Environment::Development);

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("FRONTEND_DIST") {
            self.server.frontend_dist = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Protection overrides
        if let Ok(v) = env::var("PROTECT_ENABLED") {
            self.protection.enabled = v.parse().unwrap_or(self.protection.enabled);
        }
        if let Ok(v) = env::var("PROTECT_MODE") {
            self.protection.dry_run = parse_dry_run(&v);
        }
        if let Ok(v) = env::var("PROTECT_KEY") {
            self.protection.key = v.trim().to_string();
        }
        if let Ok(v) = env::var("PROTECT_URL") {
            self.protection.url = v.trim().to_string();
        }
        if let Ok(v) = env::var("PROTECT_TIMEOUT_MS") {
            self.protection.timeout_ms = v.parse().unwrap_or(self.protection.timeout_ms);
        }
        if let Ok(v) = env::var("PROTECT_REFILL_RATE") {
            self.protection.refill_rate = v.parse().unwrap_or(self.protection.refill_rate);
        }
        if let Ok(v) = env::var("PROTECT_INTERVAL_SECS") {
            self.protection.interval_secs = v.parse().unwrap_or(self.protection.interval_secs);
        }
        if let Ok(v) = env::var("PROTECT_CAPACITY") {
            self.protection.capacity = v.parse().unwrap_or(self.protection.capacity);
        }
        if let Ok(v) = env::var("PROTECT_ALLOWED_BOTS") {
            self.protection.allowed_bots = split_list(&v);
        }

        // Security overrides
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                frontend_dist: "frontend/dist".to_string(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            protection: ProtectionConfig::defaults(),
            security: SecurityConfig {
                cors_origins: Vec::new(),
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                frontend_dist: "frontend/dist".to_string(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            protection: ProtectionConfig::defaults(),
            security: SecurityConfig {
                cors_origins: Vec::new(),
            },
        }
    }
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl ProtectionConfig {
    /// shield + search-engine bot allowance + token bucket of 5 tokens / 10s, capacity 10
    fn defaults() -> Self {
        Self {
            enabled: true,
            dry_run: false,
            key: String::new(),
            url: String::new(),
            timeout_ms: 1000,
            characteristics: vec!["ip.src".to_string()],
            allowed_bots: vec!["CATEGORY:SEARCH_ENGINE".to_string()],
            refill_rate: 5,
            interval_secs: 10,
            capacity: 10,
        }
    }
}

fn parse_dry_run(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "dry_run" | "dry-run" | "dryrun"
    )
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
