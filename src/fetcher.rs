use log::info;
use reqwest::blocking::{Client, Response};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, LINK};
use serde_json::Value;

use crate::config::ShopifyConfig;
use crate::error::{ExportError, Result};

const ACCESS_TOKEN_HEADER: &str = "x-shopify-access-token";

/// One decoded response from a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub body: Value,
    /// Raw `Link` header, if the shop sent one.
    pub link: Option<String>,
}

/// The two calls the exporter makes against a shop.
pub trait HttpTransport {
    fn get(&self, url: &str) -> Result<Page>;
    fn post_json(&self, url: &str, body: &Value) -> Result<Value>;
}

/// Blocking Admin API client authenticated with a private app token.
pub struct ShopifyClient {
    client: Client,
}

impl ShopifyClient {
    pub fn new(config: &ShopifyConfig) -> Result<Self> {
        let mut token =
            HeaderValue::from_str(&config.token).map_err(|_| ExportError::InvalidSetting {
                name: "SHOPIFY_ADMIN_TOKEN",
                value: "<redacted>".to_string(),
            })?;
        token.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_TOKEN_HEADER, token);

        // the blocking builder defaults to 30s; `None` switches that off
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(ExportError::Client)?;

        Ok(ShopifyClient { client })
    }

    fn check(url: &str, result: reqwest::Result<Response>) -> Result<Response> {
        let response = result.map_err(|source| ExportError::Http {
            url: url.to_string(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    fn decode(url: &str, response: Response) -> Result<Value> {
        response.json().map_err(|source| ExportError::Http {
            url: url.to_string(),
            source,
        })
    }
}

impl HttpTransport for ShopifyClient {
    fn get(&self, url: &str) -> Result<Page> {
        let response = Self::check(
            url,
            self.client
                .get(url)
                .header(CONTENT_TYPE, "application/json")
                .send(),
        )?;

        let link = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = Self::decode(url, response)?;

        Ok(Page { body, link })
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let response = Self::check(
            url,
            self.client.post(url).json(body).send(),
        )?;
        Self::decode(url, response)
    }
}

/// Extracts the `rel="next"` target from a `Link` header.
///
/// The header is a comma separated list of `<url>; rel="..."` entries.
pub fn next_page_url(link: &str) -> Option<String> {
    link.split(',')
        .map(str::trim)
        .find(|part| part.contains(r#"rel="next""#))
        .and_then(|part| {
            let start = part.find('<')? + 1;
            let end = part.find('>')?;
            (start <= end).then(|| part[start..end].to_string())
        })
}

/// Walks the products listing from `start_url` until no next page is
/// advertised, returning every product exactly as received.
///
/// Any failed page aborts the walk; nothing fetched so far is returned.
pub fn fetch_all_products<T: HttpTransport + ?Sized>(
    transport: &T,
    start_url: &str,
) -> Result<Vec<Value>> {
    let mut products = Vec::new();
    let mut url = Some(start_url.to_string());

    while let Some(current) = url {
        info!("GET {current}");
        let page = transport.get(&current)?;

        if let Some(Value::Array(items)) = page.body.get("products") {
            products.extend(items.iter().cloned());
        }

        url = page.link.as_deref().and_then(next_page_url);
    }

    Ok(products)
}
