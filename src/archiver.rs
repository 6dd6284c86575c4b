use std::fs::File;
use std::path::Path;
use anyhow::{Context, Result};
use crate::models::Product;

/// Writes `Product,Price` rows to `path`, replacing any previous file.
/// Returns the number of rows written.
pub fn save_to_csv(products: &[Product], path: &Path) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    // Written by hand so an empty run still produces the header line.
    writer.write_record(["Product", "Price"])?;
    for product in products {
        writer.serialize(product)?;
    }
    writer.flush()?;
    Ok(products.len())
}
