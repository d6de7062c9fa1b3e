//! Server configuration from the environment
//!
//! Two knobs, both optional: `DATABASE_URL` and `BIND_ADDR`. Anything more
//! elaborate (per-season targets, auth) lives in the database or upstream.

pub const DEFAULT_DATABASE_URL: &str = "sqlite://rachas.db?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub database_url: String,
  pub bind_addr: String,
}

impl ServerConfig {
  pub fn from_env() -> Self {
    Self {
      database_url: std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
      bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn test_defaults_when_env_is_unset() {
    temp_env::with_vars_unset(["DATABASE_URL", "BIND_ADDR"], || {
      let config = ServerConfig::from_env();
      assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
      assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    });
  }

  #[test]
  #[serial]
  fn test_env_overrides_defaults() {
    temp_env::with_vars(
      [
        ("DATABASE_URL", Some("sqlite::memory:")),
        ("BIND_ADDR", Some("0.0.0.0:9000")),
      ],
      || {
        let config = ServerConfig::from_env();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
      },
    );
  }
}
