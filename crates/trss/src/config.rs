//! Client configuration.
//!
//! Built once, then owned immutably by [`crate::TrssClient`].

use serde::{Deserialize, Serialize};

use crate::actions::Endpoint;

/// Base URL of the public TRSS test server.
pub const DEFAULT_BASE_URL: &str = "http://trsstest.crystalcloud.xyz/game-dev/TRSSDatabase/";

/// URLs of the two server endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub users: String,
    pub skins: String,
}

impl Endpoints {
    /// Derives `users.php` and `skins.php` from a base URL. A missing
    /// trailing `/` is added.
    pub fn from_base(base: &str) -> Self {
        let base = if base.ends_with('/') {
            base.to_owned()
        } else {
            format!("{base}/")
        };
        Self {
            users: format!("{base}users.php"),
            skins: format!("{base}skins.php"),
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Users => &self.users,
            Endpoint::Skins => &self.skins,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_base(DEFAULT_BASE_URL)
    }
}

/// Everything the client needs besides its transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl ApiConfig {
    pub fn with_base_url(base: &str) -> Self {
        Self {
            endpoints: Endpoints::from_base(base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoints_point_at_the_public_server() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.users,
            "http://trsstest.crystalcloud.xyz/game-dev/TRSSDatabase/users.php"
        );
        assert_eq!(
            endpoints.url(Endpoint::Skins),
            "http://trsstest.crystalcloud.xyz/game-dev/TRSSDatabase/skins.php"
        );
    }

    #[test]
    fn base_url_gains_a_trailing_slash() {
        let config = ApiConfig::with_base_url("http://localhost:8080/trss");
        assert_eq!(config.endpoints.users, "http://localhost:8080/trss/users.php");
        assert_eq!(config.endpoints.skins, "http://localhost:8080/trss/skins.php");
    }

    #[test]
    fn missing_endpoints_deserialize_to_defaults() {
        let config: ApiConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ApiConfig::default());
    }
}
