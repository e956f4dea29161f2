use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;

/// A shop identifier: numeric on the REST API, a `gid://` string on GraphQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Num(u64),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Num(n) => write!(f, "{n}"),
            Id::Text(s) => f.write_str(s),
        }
    }
}

/// A product as returned by the products listing endpoint.
///
/// Only the fields the export needs are kept; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub id: Option<Id>,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub title: String,
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Variant {
    pub id: Option<Id>,
    #[serde(default, deserialize_with = "loose_text")]
    pub sku: Option<String>,
    /// Decimal as text, e.g. `"19.99"`.
    #[serde(default, deserialize_with = "loose_text")]
    pub price: Option<String>,
    pub inventory_quantity: Option<i64>,
}

/// One row of output: a single product/variant pair.
///
/// `sku` and `price` are never absent; `inventory_quantity` keeps the
/// shop's null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub product_id: Option<Id>,
    pub title: String,
    pub variant_id: Option<Id>,
    pub sku: String,
    pub price: String,
    pub inventory_quantity: Option<i64>,
    pub created_at: Option<String>,
}

/// Types raw listing entries, keeping the input order.
pub fn parse_products(raw: &[Value]) -> Result<Vec<Product>> {
    raw.iter()
        .map(|value| Product::deserialize(value).map_err(Into::into))
        .collect()
}

/// Reads a text field the way a falsy check would: null, `false`, `0`,
/// `""` and empty containers become `None`. Numbers and `true` keep their
/// text form; non-empty arrays and objects are dropped. Never fails.
fn loose_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    })
}

fn text_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose_text(deserializer)?.unwrap_or_default())
}

fn list_or_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Variant>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Variant>>::deserialize(deserializer)?.unwrap_or_default())
}
