use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // Database
    pub database_url: String,
    pub database_max_connections: u32,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Work extractor AI service
    pub extractor_service_url: String,
    pub extractor_service_token: String,
    pub extractor_timeout_seconds: u64,

    // CWICR catalog search service
    pub catalog_service_url: String,
    pub catalog_service_token: String,
    pub catalog_timeout_seconds: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // Database
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        // CORS
        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Work extractor AI service
        let extractor_service_url = env::var("EXTRACTOR_SERVICE_URL")
            .unwrap_or_else(|_| "http://extractor-service:8000".to_string());
        let extractor_service_token =
            env::var("EXTRACTOR_SERVICE_TOKEN").context("EXTRACTOR_SERVICE_TOKEN must be set")?;
        let extractor_timeout_seconds = env::var("EXTRACTOR_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(120); // 2 minutes default for LLM calls

        // CWICR catalog search service
        let catalog_service_url = env::var("CATALOG_SERVICE_URL")
            .unwrap_or_else(|_| "http://catalog-service:8100".to_string());
        let catalog_service_token =
            env::var("CATALOG_SERVICE_TOKEN").context("CATALOG_SERVICE_TOKEN must be set")?;
        let catalog_timeout_seconds = env::var("CATALOG_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Settings {
            env,
            server_addr,
            database_url,
            database_max_connections,
            cors_allow_origins,
            extractor_service_url,
            extractor_service_token,
            extractor_timeout_seconds,
            catalog_service_url,
            catalog_service_token,
            catalog_timeout_seconds,
        })
    }
}
