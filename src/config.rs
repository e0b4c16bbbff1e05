use std::env;

pub const API_ADDR_VAR: &str = "MASTERBLOG_API_ADDR";
pub const DEFAULT_API_ADDR: &str = "0.0.0.0:5002";

pub const FRONTEND_ADDR_VAR: &str = "MASTERBLOG_FRONTEND_ADDR";
pub const DEFAULT_FRONTEND_ADDR: &str = "0.0.0.0:5001";

/// Listen addresses of both servers. Unset or blank variables fall back
/// to the defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub api_addr: String,
    pub frontend_addr: String,
}

impl Config {
    pub fn from_env() -> Config {
        Config::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = |name: &str, default: &str| {
            lookup(name)
                .filter(|addr| !addr.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Config {
            api_addr: addr(API_ADDR_VAR, DEFAULT_API_ADDR),
            frontend_addr: addr(FRONTEND_ADDR_VAR, DEFAULT_FRONTEND_ADDR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.api_addr, DEFAULT_API_ADDR);
        assert_eq!(config.frontend_addr, DEFAULT_FRONTEND_ADDR);
    }

    #[test]
    fn defaults_when_blank() {
        let config = Config::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config.api_addr, DEFAULT_API_ADDR);
        assert_eq!(config.frontend_addr, DEFAULT_FRONTEND_ADDR);
    }

    #[test]
    fn reads_each_address_from_its_variable() {
        let config = Config::from_lookup(|name| match name {
            API_ADDR_VAR => Some("127.0.0.1:8080".to_string()),
            FRONTEND_ADDR_VAR => Some("127.0.0.1:8081".to_string()),
            _ => None,
        });
        assert_eq!(config.api_addr, "127.0.0.1:8080");
        assert_eq!(config.frontend_addr, "127.0.0.1:8081");
    }

    #[test]
    fn addresses_are_independent() {
        let config = Config::from_lookup(|name| {
            if name == FRONTEND_ADDR_VAR {
                Some("localhost:9000".to_string())
            } else {
                None
            }
        });
        assert_eq!(config.api_addr, DEFAULT_API_ADDR);
        assert_eq!(config.frontend_addr, "localhost:9000");
    }
}
