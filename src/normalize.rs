use crate::models::{FlatRecord, Product};

/// Which columns a flat export carries.
///
/// The REST fetch keeps each product's creation timestamp; the standalone
/// transform of a saved snapshot leaves it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSet {
    WithCreatedAt,
    Core,
}

const CORE_COLUMNS: &[&str] = &[
    "product_id",
    "title",
    "variant_id",
    "sku",
    "price",
    "inventory_quantity",
];

const REST_COLUMNS: &[&str] = &[
    "product_id",
    "title",
    "variant_id",
    "sku",
    "price",
    "inventory_quantity",
    "created_at",
];

impl FieldSet {
    /// Column names in canonical output order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            FieldSet::WithCreatedAt => REST_COLUMNS,
            FieldSet::Core => CORE_COLUMNS,
        }
    }

    pub fn includes_created_at(self) -> bool {
        matches!(self, FieldSet::WithCreatedAt)
    }
}

/// Flattens products into one record per variant.
///
/// Products without variants produce nothing. A blank or missing SKU or
/// price becomes the empty string.
pub fn normalize(products: &[Product], fields: FieldSet) -> Vec<FlatRecord> {
    products
        .iter()
        .flat_map(|product| {
            product.variants.iter().map(move |variant| FlatRecord {
                product_id: product.id.clone(),
                title: product.title.clone(),
                variant_id: variant.id.clone(),
                sku: variant.sku.clone().unwrap_or_default(),
                price: variant.price.clone().unwrap_or_default(),
                inventory_quantity: variant.inventory_quantity,
                created_at: if fields.includes_created_at() {
                    product.created_at.clone()
                } else {
                    None
                },
            })
        })
        .collect()
}
