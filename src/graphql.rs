//! Raw product snapshot through the Admin GraphQL API.
//!
//! The response is stored as received and never flattened.

use log::warn;
use serde_json::{Value, json};

use crate::error::Result;
use crate::fetcher::HttpTransport;

/// First 10 products with up to 5 variants each.
pub const QUERY: &str = r#"
{
  products(first: 10) {
    edges {
      node {
        id
        title
        variants(first: 5) {
          edges {
            node {
              id
              sku
              price
              inventoryQuantity
            }
          }
        }
      }
    }
  }
}
"#;

pub fn request_body() -> Value {
    json!({ "query": QUERY })
}

/// Posts [`QUERY`] once and returns the decoded response untouched.
pub fn fetch_products<T: HttpTransport + ?Sized>(transport: &T, url: &str) -> Result<Value> {
    let response = transport.post_json(url, &request_body())?;

    // GraphQL reports query problems with a 200 status
    if let Some(errors) = response.get("errors") {
        warn!("GraphQL response from {url} carries errors: {errors}");
    }

    Ok(response)
}
