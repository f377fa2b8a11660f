//! Writes a deterministic demo dataset to `sales_data.csv` and
//! `sales_data.parquet` in the working directory.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;

use sales_dashboard::SalesRecord;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

const REGIONS: [&str; 4] = ["East", "West", "Central", "South"];
const SEGMENTS: [&str; 3] = ["Consumer", "Corporate", "Home Office"];
const YEARS: [i64; 4] = [2020, 2021, 2022, 2023];
const DISCOUNTS: [f64; 5] = [0.0, 0.05, 0.1, 0.2, 0.3];
const SHIPPING: [&str; 4] = ["Standard Class", "Second Class", "First Class", "Same Day"];

/// (category, products, typical unit price)
const CATALOG: [(&str, [&str; 3], f64); 3] = [
    ("Technology", ["Phones", "Laptops", "Accessories"], 420.0),
    ("Furniture", ["Chairs", "Tables", "Bookcases"], 310.0),
    ("Office Supplies", ["Paper", "Binders", "Storage"], 45.0),
];

fn generate(rows: usize, rng: &mut SimpleRng) -> Vec<SalesRecord> {
    (0..rows)
        .map(|_| {
            let (category, products, price) = *rng.pick(&CATALOG);
            let year = *rng.pick(&YEARS);
            // Gentle year-over-year growth so the trend chart has a slope.
            let growth = 1.0 + 0.08 * (year - YEARS[0]) as f64;
            let discount = *rng.pick(&DISCOUNTS);
            let quantity = (1.0 + rng.next_f64() * 6.0).floor();
            let sales = (price * quantity * growth * rng.uniform(0.7, 1.3) * (1.0 - discount) * 100.0)
                .round()
                / 100.0;
            let margin = rng.uniform(0.05, 0.3) - discount * 1.2;

            SalesRecord {
                region: rng.pick(&REGIONS).to_string(),
                segment: rng.pick(&SEGMENTS).to_string(),
                year,
                sales,
                profit: (sales * margin * 100.0).round() / 100.0,
                discount,
                category: category.to_string(),
                product: rng.pick(&products).to_string(),
                shipping_mode: rng.pick(&SHIPPING).to_string(),
            }
        })
        .collect()
}

fn write_csv(path: &str, records: &[SalesRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for rec in records {
        writer.serialize(rec).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn build_batch(records: &[SalesRecord]) -> Result<RecordBatch> {
    let text = |f: fn(&SalesRecord) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(records.iter().map(f).collect::<Vec<_>>()))
    };
    let float = |f: fn(&SalesRecord) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(records.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("Region", DataType::Utf8, false),
        Field::new("Segment", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, false),
        Field::new("Sales", DataType::Float64, false),
        Field::new("Profit", DataType::Float64, false),
        Field::new("Discount", DataType::Float64, false),
        Field::new("Category", DataType::Utf8, false),
        Field::new("Product", DataType::Utf8, false),
        Field::new("Shipping_Mode", DataType::Utf8, false),
    ]));

    RecordBatch::try_new(
        schema,
        vec![
            text(|r| &r.region),
            text(|r| &r.segment),
            Arc::new(Int64Array::from(records.iter().map(|r| r.year).collect::<Vec<_>>())),
            float(|r| r.sales),
            float(|r| r.profit),
            float(|r| r.discount),
            text(|r| &r.category),
            text(|r| &r.product),
            text(|r| &r.shipping_mode),
        ],
    )
    .context("building record batch")
}

fn write_parquet(path: &str, batch: &RecordBatch) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let records = generate(2_000, &mut rng);

    write_csv("sales_data.csv", &records)?;
    let batch = build_batch(&records)?;
    write_parquet("sales_data.parquet", &batch)?;

    let preview = pretty_format_batches(&[batch.slice(0, batch.num_rows().min(5))])
        .context("formatting preview")?;
    println!("{preview}");

    println!(
        "Wrote {} sales records to sales_data.csv and sales_data.parquet",
        records.len()
    );
    Ok(())
}
