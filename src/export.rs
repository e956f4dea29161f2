//! Flat record renderers: JSON, CSV and SQL insert statements.

use std::path::{Path, PathBuf};

use log::info;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::archiver::write_text;
use crate::error::{ExportError, Result};
use crate::models::{FlatRecord, Id};
use crate::normalize::FieldSet;

pub const JSON_FILE: &str = "products_transformed.json";
pub const CSV_FILE: &str = "products_transformed.csv";
pub const SQL_FILE: &str = "products_transformed.sql";

const SQL_COLUMNS: &str = "product_id, variant_id, title, sku, price, inventory_quantity";

/// A record serialized with exactly the columns of a field set, in order.
struct RecordView<'a> {
    record: &'a FlatRecord,
    fields: FieldSet,
}

impl Serialize for RecordView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let r = self.record;
        let mut map = serializer.serialize_map(Some(self.fields.columns().len()))?;
        map.serialize_entry("product_id", &r.product_id)?;
        map.serialize_entry("title", &r.title)?;
        map.serialize_entry("variant_id", &r.variant_id)?;
        map.serialize_entry("sku", &r.sku)?;
        map.serialize_entry("price", &r.price)?;
        map.serialize_entry("inventory_quantity", &r.inventory_quantity)?;
        if self.fields.includes_created_at() {
            map.serialize_entry("created_at", &r.created_at)?;
        }
        map.end()
    }
}

pub fn render_json(records: &[FlatRecord], fields: FieldSet) -> Result<String> {
    let views: Vec<RecordView<'_>> = records
        .iter()
        .map(|record| RecordView { record, fields })
        .collect();
    Ok(serde_json::to_string_pretty(&views)?)
}

fn id_cell(id: &Option<Id>) -> String {
    id.as_ref().map(Id::to_string).unwrap_or_default()
}

pub fn render_csv(records: &[FlatRecord], fields: FieldSet) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(fields.columns())?;

    for r in records {
        let mut row = vec![
            id_cell(&r.product_id),
            r.title.clone(),
            id_cell(&r.variant_id),
            r.sku.clone(),
            r.price.clone(),
            r.inventory_quantity.map(|q| q.to_string()).unwrap_or_default(),
        ];
        if fields.includes_created_at() {
            row.push(r.created_at.clone().unwrap_or_default());
        }
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    String::from_utf8(bytes).map_err(|e| {
        ExportError::Csv(std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
    })
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn sql_id(id: &Option<Id>) -> String {
    match id {
        Some(Id::Num(n)) => n.to_string(),
        Some(Id::Text(s)) => quote(s),
        None => "NULL".to_string(),
    }
}

/// One `INSERT INTO products_erp` line.
///
/// Price is written bare, so a blank price leaves an empty slot
/// (`'', , NULL`).
pub fn insert_statement(r: &FlatRecord) -> String {
    let qty = r
        .inventory_quantity
        .map(|q| q.to_string())
        .unwrap_or_else(|| "NULL".to_string());
    format!(
        "INSERT INTO products_erp ({SQL_COLUMNS}) VALUES ({}, {}, {}, {}, {}, {});",
        sql_id(&r.product_id),
        sql_id(&r.variant_id),
        quote(&r.title),
        quote(&r.sku),
        r.price,
        qty
    )
}

pub fn render_sql(records: &[FlatRecord]) -> String {
    records
        .iter()
        .map(insert_statement)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes the JSON, CSV and SQL renderings into `output_dir`.
///
/// Files are written one after another; a failure part way leaves the
/// earlier files updated and the later ones as they were.
pub fn save_transformed(
    output_dir: &Path,
    records: &[FlatRecord],
    fields: FieldSet,
) -> Result<Vec<PathBuf>> {
    let outputs = [
        (JSON_FILE, render_json(records, fields)?),
        (CSV_FILE, render_csv(records, fields)?),
        (SQL_FILE, render_sql(records)),
    ];

    let mut written = Vec::with_capacity(outputs.len());
    for (name, text) in outputs {
        let path = output_dir.join(name);
        write_text(&path, &text)?;
        written.push(path);
    }

    info!("Saved transformed files to {}", output_dir.display());
    Ok(written)
}
