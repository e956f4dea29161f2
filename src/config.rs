use std::path::Path;
use std::time::Duration;

use crate::error::{ExportError, Result};

pub const DEFAULT_API_VERSION: &str = "2025-07";
/// Largest page the products listing endpoint accepts.
pub const PAGE_LIMIT: u32 = 250;

const SHOP_VAR: &str = "SHOP";
const TOKEN_VAR: &str = "SHOPIFY_ADMIN_TOKEN";
const API_VERSION_VAR: &str = "SHOPIFY_API_VERSION";
const TIMEOUT_VAR: &str = "SHOPIFY_HTTP_TIMEOUT_SECS";

/// Connection settings for one shop's Admin API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopifyConfig {
    /// Shop host, e.g. `my-store.myshopify.com`.
    pub shop: String,
    pub token: String,
    pub api_version: String,
    /// `None` waits on the shop indefinitely.
    pub timeout: Option<Duration>,
}

impl ShopifyConfig {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the settings from an arbitrary key lookup.
    ///
    /// Values are trimmed and a blank value counts as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let shop = read(SHOP_VAR).ok_or(ExportError::MissingSetting(SHOP_VAR))?;
        let token = read(TOKEN_VAR).ok_or(ExportError::MissingSetting(TOKEN_VAR))?;
        let api_version = read(API_VERSION_VAR).unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let timeout = match read(TIMEOUT_VAR) {
            None => None,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ExportError::InvalidSetting {
                        name: TIMEOUT_VAR,
                        value: raw,
                    });
                }
            },
        };

        Ok(ShopifyConfig {
            shop,
            token,
            api_version,
            timeout,
        })
    }

    pub fn rest_products_url(&self) -> String {
        format!(
            "https://{}/admin/api/{}/products.json?limit={}",
            self.shop, self.api_version, PAGE_LIMIT
        )
    }

    pub fn graphql_url(&self) -> String {
        format!("https://{}/admin/api/{}/graphql.json", self.shop, self.api_version)
    }
}

/// Prepares the output directory, creating missing parents.
pub fn initialize(output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir).map_err(|e| ExportError::io(output_dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_reads_credentials_and_defaults() {
        let config = ShopifyConfig::from_lookup(lookup(&[
            ("SHOP", " demo.myshopify.com "),
            ("SHOPIFY_ADMIN_TOKEN", "shpat_123"),
        ]))
        .unwrap();

        assert_eq!(config.shop, "demo.myshopify.com");
        assert_eq!(config.token, "shpat_123");
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.timeout, None);
        assert_eq!(
            config.rest_products_url(),
            "https://demo.myshopify.com/admin/api/2025-07/products.json?limit=250"
        );
        assert_eq!(
            config.graphql_url(),
            "https://demo.myshopify.com/admin/api/2025-07/graphql.json"
        );
    }

    #[test]
    fn test_blank_token_is_missing() {
        let err = ShopifyConfig::from_lookup(lookup(&[
            ("SHOP", "demo.myshopify.com"),
            ("SHOPIFY_ADMIN_TOKEN", "   "),
        ]))
        .unwrap_err();

        assert!(matches!(err, ExportError::MissingSetting("SHOPIFY_ADMIN_TOKEN")));
    }

    #[test]
    fn test_missing_shop() {
        let err = ShopifyConfig::from_lookup(lookup(&[("SHOPIFY_ADMIN_TOKEN", "t")])).unwrap_err();
        assert!(matches!(err, ExportError::MissingSetting("SHOP")));
    }

    #[test]
    fn test_timeout_and_version_overrides() {
        let config = ShopifyConfig::from_lookup(lookup(&[
            ("SHOP", "demo.myshopify.com"),
            ("SHOPIFY_ADMIN_TOKEN", "t"),
            ("SHOPIFY_API_VERSION", "2024-10"),
            ("SHOPIFY_HTTP_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.api_version, "2024-10");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = ShopifyConfig::from_lookup(lookup(&[
            ("SHOP", "demo.myshopify.com"),
            ("SHOPIFY_ADMIN_TOKEN", "t"),
            ("SHOPIFY_HTTP_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ExportError::InvalidSetting { .. }));
    }

    #[test]
    fn test_initialize_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a").join("output");
        initialize(&out).unwrap();
        assert!(out.is_dir());
        // second call is a no-op
        initialize(&out).unwrap();
    }
}
