use std::env;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const MONGODB_DATABASE: &str = "travel_planner";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub mongo_uri: Option<String>,
    pub mongo_database: String,
    pub bcrypt_cost: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("MONGODB_URI must be set when STORE_BACKEND=mongo")]
    MissingMongoUri,
    #[error("unknown STORE_BACKEND `{0}` (expected `mongo` or `memory`)")]
    UnknownBackend(String),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            store_backend: StoreBackend::Mongo,
            mongo_uri: None,
            mongo_database: MONGODB_DATABASE.to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to
    /// defaults for anything absent or unparsable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let store_backend = match lookup("STORE_BACKEND")
            .map(|s| s.trim().to_lowercase())
            .as_deref()
        {
            None | Some("") | Some("mongo") | Some("mongodb") => StoreBackend::Mongo,
            Some("memory") => StoreBackend::Memory,
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        let mongo_uri = lookup("MONGODB_URI").filter(|uri| !uri.trim().is_empty());
        if store_backend == StoreBackend::Mongo && mongo_uri.is_none() {
            return Err(ConfigError::MissingMongoUri);
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            store_backend,
            mongo_uri,
            mongo_database: lookup("MONGODB_DATABASE").unwrap_or(defaults.mongo_database),
            bcrypt_cost: lookup("BCRYPT_COST")
                .and_then(|s| s.parse::<u32>().ok())
                .map(|cost| cost.clamp(4, 31))
                .unwrap_or(defaults.bcrypt_cost),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_memory_backend_uses_defaults() {
        let config = Config::from_lookup(lookup_from(&[("STORE_BACKEND", "memory")])).unwrap();
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.mongo_database, "travel_planner");
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn test_mongo_backend_requires_uri() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingMongoUri)));
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("PORT", "not-a-port"),
            ("BCRYPT_COST", "2"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bcrypt_cost, 4);
        assert_eq!(config.store_backend, StoreBackend::Mongo);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let result = Config::from_lookup(lookup_from(&[("STORE_BACKEND", "sqlite")]));
        assert!(matches!(result, Err(ConfigError::UnknownBackend(_))));
    }
}
