use std::env;

/// Production rendering API. Parameters are appended as `&key=value`.
pub const DEFAULT_API_ENDPOINT: &str =
    "https://61fuj0h54e.execute-api.us-east-1.amazonaws.com/default/rackdiagram?";

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub frontend_dir: String,
    pub api_endpoint: String,
    pub staging_api_endpoint: String,
    pub reference_data_path: String,
    pub render_timeout_secs: u64,
    pub builder_session_ttl_secs: i64,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            listen_addr: get_env("LISTEN_ADDR", "0.0.0.0:8080"),
            frontend_dir: get_env("FRONTEND_DIR", "/app/frontend"),
            api_endpoint: get_env("RENDER_API_ENDPOINT", DEFAULT_API_ENDPOINT),
            staging_api_endpoint: get_env("RENDER_API_STAGING_ENDPOINT", ""),
            reference_data_path: get_env("REFERENCE_DATA_PATH", ""),
            render_timeout_secs: get_env("RENDER_TIMEOUT_SECS", "30")
                .parse()
                .unwrap_or(30),
            builder_session_ttl_secs: get_env("BUILDER_SESSION_TTL_SECS", "3600")
                .parse()
                .unwrap_or(3600),
        }
    }

    /// Resolve the API base endpoint for the selected environment.
    /// Returns None when staging is selected but not configured.
    pub fn endpoint_for(&self, environment: Environment) -> Option<&str> {
        match environment {
            Environment::Prod => Some(self.api_endpoint.as_str()),
            Environment::Staging if self.staging_api_endpoint.is_empty() => None,
            Environment::Staging => Some(self.staging_api_endpoint.as_str()),
        }
    }
}

/// Which deployment of the rendering API to talk to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Prod,
    Staging,
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            listen_addr: "127.0.0.1:0".to_string(),
            frontend_dir: "/tmp".to_string(),
            api_endpoint: "https://prod.example/rackdiagram?".to_string(),
            staging_api_endpoint: String::new(),
            reference_data_path: String::new(),
            render_timeout_secs: 30,
            builder_session_ttl_secs: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_for_prod() {
        let cfg = Config::for_tests();
        assert_eq!(
            cfg.endpoint_for(Environment::Prod),
            Some("https://prod.example/rackdiagram?")
        );
    }

    #[test]
    fn test_staging_unconfigured() {
        let mut cfg = Config::for_tests();
        assert_eq!(cfg.endpoint_for(Environment::Staging), None);

        cfg.staging_api_endpoint = "https://staging.example/rackdiagram?".to_string();
        assert_eq!(
            cfg.endpoint_for(Environment::Staging),
            Some("https://staging.example/rackdiagram?")
        );
    }

    #[test]
    fn test_environment_default_is_prod() {
        let env: Environment = serde_json::from_str("\"staging\"").unwrap();
        assert_eq!(env, Environment::Staging);
        assert_eq!(Environment::default(), Environment::Prod);
    }
}
