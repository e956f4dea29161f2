use std::path::{Path, PathBuf};

use log::info;
use serde_json::Value;

use crate::archiver::{self, GRAPHQL_SNAPSHOT, REST_SNAPSHOT};
use crate::config::ShopifyConfig;
use crate::error::Result;
use crate::export;
use crate::fetcher::{self, HttpTransport};
use crate::graphql;
use crate::models::parse_products;
use crate::normalize::{FieldSet, normalize};

/// What a single run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub products: usize,
    pub records: usize,
    pub written: Vec<PathBuf>,
}

/// Fetches every product over REST, keeps the raw listing and writes the
/// flattened exports including `created_at`.
pub fn run_rest<T: HttpTransport + ?Sized>(
    config: &ShopifyConfig,
    transport: &T,
    output_dir: &Path,
) -> Result<RunSummary> {
    info!("SHOP: {}", config.shop);
    info!("Fetching products...");
    let raw = fetcher::fetch_all_products(transport, &config.rest_products_url())?;

    let snapshot = output_dir.join(REST_SNAPSHOT);
    archiver::save_json(&snapshot, &raw)?;

    let products = parse_products(&raw)?;
    let records = normalize(&products, FieldSet::WithCreatedAt);
    let mut written = vec![snapshot];
    written.extend(export::save_transformed(output_dir, &records, FieldSet::WithCreatedAt)?);

    info!(
        "Done. Found {} variants across {} products.",
        records.len(),
        products.len()
    );
    Ok(RunSummary {
        products: products.len(),
        records: records.len(),
        written,
    })
}

/// Re-exports a saved REST snapshot without `created_at`.
///
/// `input` defaults to the snapshot [`run_rest`] leaves in `output_dir`.
pub fn run_transform(input: Option<&Path>, output_dir: &Path) -> Result<RunSummary> {
    let input = input
        .map(Path::to_path_buf)
        .unwrap_or_else(|| output_dir.join(REST_SNAPSHOT));

    let raw: Vec<Value> = archiver::load_json(&input)?;
    let products = parse_products(&raw)?;
    let records = normalize(&products, FieldSet::Core);
    let written = export::save_transformed(output_dir, &records, FieldSet::Core)?;

    info!("Transformation complete: {} variants processed.", records.len());
    Ok(RunSummary {
        products: products.len(),
        records: records.len(),
        written,
    })
}

/// Saves the raw GraphQL product snapshot.
pub fn run_graphql<T: HttpTransport + ?Sized>(
    config: &ShopifyConfig,
    transport: &T,
    output_dir: &Path,
) -> Result<RunSummary> {
    let data = graphql::fetch_products(transport, &config.graphql_url())?;

    let path = output_dir.join(GRAPHQL_SNAPSHOT);
    archiver::save_json(&path, &data)?;

    let products = data
        .pointer("/data/products/edges")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    info!("GraphQL fetch complete, saved to {}", path.display());
    Ok(RunSummary {
        products,
        records: 0,
        written: vec![path],
    })
}
