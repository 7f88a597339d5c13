//! Run configuration.
//!
//! Credentials come from CLI flags with `LIBRE_*` environment variables as
//! fallbacks (see `cli`). Nothing is read from or written to disk apart
//! from an optional `.env` file loaded in `main`.

use thiserror::Error;

/// Region used when neither `--region` nor `LIBRE_REGION` is set
pub const DEFAULT_REGION: &str = "eu";

/// Regional API host. `{region}` is replaced with the region code.
pub const BASE_URL_TEMPLATE: &str = "https://api-{region}.libreview.io";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Email and password are required (via args or environment)")]
    MissingCredentials,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub region: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

impl Credentials {
    /// Build credentials, treating empty strings as missing.
    pub fn resolve(
        email: Option<String>,
        password: Option<String>,
        region: Option<String>,
    ) -> Result<Self, ConfigError> {
        let email = email.filter(|e| !e.trim().is_empty());
        let password = password.filter(|p| !p.is_empty());
        match (email, password) {
            (Some(email), Some(password)) => Ok(Self {
                email: email.trim().to_string(),
                password,
                region: region
                    .map(|r| r.trim().to_lowercase())
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            }),
            _ => Err(ConfigError::MissingCredentials),
        }
    }
}

/// Substitute a region code into a base URL template.
pub fn base_url_for(template: &str, region: &str) -> String {
    template.replace("{region}", region)
}

/// Resolve a login redirect target: absolute URLs are used as given,
/// anything else is treated as a region code.
pub fn resolve_redirect(template: &str, region: &str) -> String {
    if region.starts_with("http") {
        region.trim_end_matches('/').to_string()
    } else {
        base_url_for(template, region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_requires_email_and_password() {
        assert_eq!(
            Credentials::resolve(None, Some("pw".to_string()), None),
            Err(ConfigError::MissingCredentials)
        );
        assert_eq!(
            Credentials::resolve(Some("a@b.c".to_string()), None, None),
            Err(ConfigError::MissingCredentials)
        );
        assert_eq!(
            Credentials::resolve(Some("  ".to_string()), Some("pw".to_string()), None),
            Err(ConfigError::MissingCredentials)
        );
    }

    #[test]
    fn test_resolve_defaults_region() {
        let creds = Credentials::resolve(
            Some("a@b.c".to_string()),
            Some("pw".to_string()),
            None,
        )
        .expect("credentials should resolve");
        assert_eq!(creds.region, "eu");
        assert_eq!(
            base_url_for(BASE_URL_TEMPLATE, &creds.region),
            "https://api-eu.libreview.io"
        );

        let creds = Credentials::resolve(
            Some("a@b.c".to_string()),
            Some("pw".to_string()),
            Some("US".to_string()),
        )
        .expect("credentials should resolve");
        assert_eq!(creds.region, "us");
    }

    #[test]
    fn test_resolve_redirect() {
        assert_eq!(
            resolve_redirect(BASE_URL_TEMPLATE, "us"),
            "https://api-us.libreview.io"
        );
        assert_eq!(
            resolve_redirect(BASE_URL_TEMPLATE, "https://api-de.libreview.io/"),
            "https://api-de.libreview.io"
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::resolve(
            Some("a@b.c".to_string()),
            Some("hunter2".to_string()),
            None,
        )
        .expect("credentials should resolve");
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
