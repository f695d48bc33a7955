//! File sink for the result set: CSV (tabular, uniform columns) or JSON.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::OutputConfig;
use crate::models::ProductRecord;

/// CSV column headers, matching the serde renames on `ProductRecord`.
const HEADERS: [&str; 5] = [
    "Product Name",
    "Product Price",
    "Sale Discount",
    "Best Seller Rating",
    "Images",
];

/// Separator used to flatten the image URL list into one CSV cell. Empty
/// entries (images with no `src`) are preserved as empty segments.
const IMAGE_SEPARATOR: &str = "|";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Resolve the output path from config: explicit path wins, otherwise
/// dir/basename with the format's extension.
pub fn resolve_path(cfg: &OutputConfig) -> PathBuf {
    match &cfg.path {
        Some(p) => p.clone(),
        None => cfg
            .dir
            .join(format!("{}.{}", cfg.basename, cfg.format.extension())),
    }
}

/// Write the full result set to one file. An empty set still produces a
/// well-formed artifact (header-only CSV, empty JSON array).
pub fn write_records(
    records: &[ProductRecord],
    format: OutputFormat,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Could not create dir {:?}", parent))?;
    }

    if records.is_empty() {
        info!("No records gathered; writing empty {:?}", path);
    }

    match format {
        OutputFormat::Csv => write_csv(records, path),
        OutputFormat::Json => write_json(records, path),
    }
    .with_context(|| format!("Failed to write {:?}", path))?;

    info!("Wrote {} records to {:?}", records.len(), path);
    Ok(())
}

fn write_csv(records: &[ProductRecord], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(HEADERS)?;

    for r in records {
        let images = r.images.join(IMAGE_SEPARATOR);
        wtr.write_record([&r.name, &r.price, &r.discount, &r.rating, &images])?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_json(records: &[ProductRecord], path: &Path) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, records)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NOT_AVAILABLE;

    fn tmp(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bs-etl-{}-{}", std::process::id(), name))
    }

    fn sample() -> Vec<ProductRecord> {
        vec![
            ProductRecord {
                name: "Kettle".to_string(),
                price: "₹1,299".to_string(),
                discount: NOT_AVAILABLE.to_string(),
                rating: "4.3 out of 5 stars".to_string(),
                images: vec!["https://img.test/k.jpg".to_string(), String::new()],
            },
            ProductRecord::named("Toaster"),
        ]
    }

    #[test]
    fn csv_has_uniform_columns_and_joined_images() {
        let path = tmp("out.csv");
        write_records(&sample(), OutputFormat::Csv, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Product Name,Product Price,Sale Discount,Best Seller Rating,Images"
        );
        let first = lines.next().unwrap();
        assert!(first.contains("https://img.test/k.jpg|"));
        let second = lines.next().unwrap();
        assert!(second.contains("Not available"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn json_round_trips_records() {
        let path = tmp("out.json");
        let records = sample();
        write_records(&records, OutputFormat::Json, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: Vec<ProductRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, records);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn empty_set_still_writes_well_formed_files() {
        let csv_path = tmp("empty.csv");
        write_records(&[], OutputFormat::Csv, &csv_path).unwrap();
        let text = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(text.lines().count(), 1);

        let json_path = tmp("empty.json");
        write_records(&[], OutputFormat::Json, &json_path).unwrap();
        let back: Vec<ProductRecord> =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert!(back.is_empty());

        std::fs::remove_file(&csv_path).ok();
        std::fs::remove_file(&json_path).ok();
    }

    #[test]
    fn resolve_path_prefers_explicit_override() {
        let mut cfg = crate::config::AppConfig::default().output;
        assert_eq!(resolve_path(&cfg), PathBuf::from("data/best_sellers.csv"));

        cfg.format = OutputFormat::Json;
        assert_eq!(resolve_path(&cfg), PathBuf::from("data/best_sellers.json"));

        cfg.path = Some(PathBuf::from("/tmp/custom.csv"));
        assert_eq!(resolve_path(&cfg), PathBuf::from("/tmp/custom.csv"));
    }
}
