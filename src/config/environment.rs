//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Las variables ausentes
//! toman valores por defecto; las mal formadas son un error de arranque.

use anyhow::{anyhow, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub log_level: tracing::Level,
    pub cors_origins: Vec<String>,
    pub transcription_latency_ms: u64,
    pub transcription_jitter_ms: u64,
    pub optimizer_latency_ms: u64,
    pub collaborator_timeout_ms: u64,
    /// Si está definido se usa el optimizador HTTP en lugar del mock
    pub optimizer_url: Option<String>,
    pub event_buffer: usize,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            log_level: tracing::Level::INFO,
            cors_origins: Vec::new(),
            transcription_latency_ms: 2000,
            transcription_jitter_ms: 0,
            optimizer_latency_ms: 3000,
            collaborator_timeout_ms: 10_000,
            optimizer_url: None,
            event_buffer: 64,
        }
    }
}

impl EnvironmentConfig {
    /// Cargar la configuración desde el entorno
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Cargar la configuración desde una función de búsqueda arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let cors_origins = value("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        let config = Self {
            environment: value("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_or(value("PORT"), "PORT", defaults.port)?,
            host: value("HOST").unwrap_or(defaults.host),
            log_level: parse_or(value("LOG_LEVEL"), "LOG_LEVEL", defaults.log_level)?,
            cors_origins,
            transcription_latency_ms: parse_or(
                value("TRANSCRIPTION_LATENCY_MS"),
                "TRANSCRIPTION_LATENCY_MS",
                defaults.transcription_latency_ms,
            )?,
            transcription_jitter_ms: parse_or(
                value("TRANSCRIPTION_JITTER_MS"),
                "TRANSCRIPTION_JITTER_MS",
                defaults.transcription_jitter_ms,
            )?,
            optimizer_latency_ms: parse_or(
                value("OPTIMIZER_LATENCY_MS"),
                "OPTIMIZER_LATENCY_MS",
                defaults.optimizer_latency_ms,
            )?,
            collaborator_timeout_ms: parse_or(
                value("COLLABORATOR_TIMEOUT_MS"),
                "COLLABORATOR_TIMEOUT_MS",
                defaults.collaborator_timeout_ms,
            )?,
            optimizer_url: value("OPTIMIZER_URL"),
            event_buffer: parse_or(value("EVENT_BUFFER"), "EVENT_BUFFER", defaults.event_buffer)?,
        };

        if config.event_buffer == 0 {
            return Err(anyhow!("EVENT_BUFFER must be greater than zero"));
        }

        Ok(config)
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_millis(self.collaborator_timeout_ms)
    }

    pub fn transcription_latency(&self) -> Duration {
        Duration::from_millis(self.transcription_latency_ms)
    }

    pub fn optimizer_latency(&self) -> Duration {
        Duration::from_millis(self.optimizer_latency_ms)
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow!("{} must be valid ({}): {}", key, raw, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<EnvironmentConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvironmentConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn missing_variables_fall_back_to_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.is_development());
        assert!(config.optimizer_url.is_none());
        assert_eq!(config.collaborator_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn variables_override_defaults() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("ENVIRONMENT", "production"),
            ("LOG_LEVEL", "debug"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
            ("OPTIMIZER_URL", "http://optimizer.local/solve"),
            ("COLLABORATOR_TIMEOUT_MS", "250"),
        ])
        .unwrap();

        assert_eq!(config.server_url(), "0.0.0.0:8080");
        assert!(!config.is_development());
        assert_eq!(config.log_level, tracing::Level::DEBUG);
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.optimizer_url.as_deref(), Some("http://optimizer.local/solve"));
        assert_eq!(config.collaborator_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("LOG_LEVEL", "loud")]).is_err());
        assert!(config_from(&[("EVENT_BUFFER", "0")]).is_err());
    }
}
