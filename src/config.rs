// Application configuration loaded from the environment
// JWT signing secrets are mandatory: startup fails closed without them

use std::env;

/// How the auth gate treats a syntactically valid access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMode {
    /// Trust the self-contained claims; no I/O per request
    Fast,
    /// Additionally re-check that the account still exists in the store
    Strict,
}

impl GateMode {
    fn parse(value: &str) -> Self {
        match value {
            "strict" => GateMode::Strict,
            _ => GateMode::Fast,
        }
    }
}

/// Runtime configuration for the planner API
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: String,
    pub database_url: String,
    pub access_secret: String,
    pub refresh_secret: String,
    pub gate_mode: GateMode,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// `DATABASE_URL`, `JWT_ACCESS_SECRET` and `JWT_REFRESH_SECRET` are
    /// required. There is deliberately no fallback secret: a deployment
    /// without explicit secrets must not start.
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;
        let access_secret =
            env::var("JWT_ACCESS_SECRET").map_err(|_| "JWT_ACCESS_SECRET must be set".to_string())?;
        let refresh_secret = env::var("JWT_REFRESH_SECRET")
            .map_err(|_| "JWT_REFRESH_SECRET must be set".to_string())?;

        // Access and refresh tokens must not be forgeable from one another
        if access_secret == refresh_secret {
            return Err("JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must differ".to_string());
        }

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let gate_mode = GateMode::parse(
            &env::var("AUTH_GATE_MODE").unwrap_or_else(|_| "fast".to_string()),
        );

        Ok(Self {
            host,
            port,
            database_url,
            access_secret,
            refresh_secret,
            gate_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_mode_parsing() {
        assert_eq!(GateMode::parse("strict"), GateMode::Strict);
        assert_eq!(GateMode::parse("fast"), GateMode::Fast);
        // Unknown values fall back to the no-I/O mode
        assert_eq!(GateMode::parse("anything"), GateMode::Fast);
    }
}
