use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float32Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use sales_dashboard::{
    apply_filters, compute_kpis, compute_summary, load_file, DashboardData, DataLoadError,
    DatasetCache, Dimension, DimensionValue, FilterSet, FilteredView,
};

const SALES_CSV: &str = "\
Region,Segment,Year,Sales,Profit,Discount,Category,Product,Shipping_Mode,Order_ID
East,Consumer,2020,100,10,0.1,Tech,A,Air,1
West,Consumer,2021,200,20,0.2,Tech,B,Ground,2
East,Corporate,2021,50.5,-5,0,Office,C,Ground,3
Central,Home Office,2022,75.25,7.5,0.1,Office,A,Air,4
West,Corporate,2022,300,60,0.3,Furniture,D,Express,5
";

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sales_dashboard_it_{}_{name}", std::process::id()))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn test_load_filter_aggregate_round_trip() {
    let path = temp_path("round_trip.csv");
    fs::write(&path, SALES_CSV).unwrap();

    let dataset = load_file(&path).expect("Failed to load CSV");
    assert_eq!(dataset.len(), 5);

    // Empty filters leave the dataset untouched.
    let view = apply_filters(&dataset, &FilterSet::default());
    assert_eq!(view, FilteredView::all(&dataset));

    let via_filter = compute_kpis(&view);
    let direct = compute_kpis(&FilteredView::all(&dataset));
    assert_eq!(via_filter, direct);
    assert!(close(direct.total_sales, 725.75));
    assert!(close(direct.total_profit, 92.5));
    assert!(close(direct.avg_discount.unwrap(), 0.14));

    for d in Dimension::ALL {
        assert!(close(compute_summary(&view, d).total(), direct.total_sales), "{d}");
    }

    let _ = fs::remove_file(path);
}

#[test]
fn test_filtered_dashboard() {
    let path = temp_path("filtered.csv");
    fs::write(&path, SALES_CSV).unwrap();
    let dataset = load_file(&path).unwrap();

    let filters = FilterSet {
        regions: ["East".to_string(), "West".to_string()].into_iter().collect(),
        years: [2021].into_iter().collect(),
        ..FilterSet::default()
    };
    let view = apply_filters(&dataset, &filters);
    assert_eq!(view.len(), 2);
    assert_eq!(view.refine(&filters), view);

    let data = DashboardData::compute(&view);
    assert!(close(data.kpis.total_sales, 250.5));
    let shipping = data.summary(Dimension::ShippingAnalysis).unwrap();
    assert_eq!(shipping.len(), 1);
    assert!(close(
        shipping.get(&DimensionValue::Text("Ground".into())).unwrap(),
        250.5
    ));
    let category = data.summary(Dimension::CategoryPerformance).unwrap();
    assert_eq!(category.get(&DimensionValue::Text("Tech".into())), Some(200.0));
    assert_eq!(category.get(&DimensionValue::Text("Office".into())), Some(50.5));

    let _ = fs::remove_file(path);
}

#[test]
fn test_excluding_filters_give_empty_dashboard() {
    let path = temp_path("excluded.csv");
    fs::write(&path, SALES_CSV).unwrap();
    let dataset = load_file(&path).unwrap();

    let filters = FilterSet {
        segments: ["Consumer".to_string()].into_iter().collect(),
        years: [2022].into_iter().collect(),
        ..FilterSet::default()
    };
    let data = DashboardData::compute(&apply_filters(&dataset, &filters));
    assert!(data.is_empty_view());
    assert_eq!(data.kpis.total_sales, 0.0);
    assert_eq!(data.kpis.total_profit, 0.0);
    assert_eq!(data.kpis.avg_discount, None);
    assert!(data.summaries.iter().all(|s| s.is_empty()));

    let _ = fs::remove_file(path);
}

#[test]
fn test_bad_row_never_yields_partial_dataset() {
    let path = temp_path("bad_row.csv");
    let contents = SALES_CSV.replace("75.25", "seventy");
    fs::write(&path, contents).unwrap();

    let mut cache = DatasetCache::new();
    match cache.load(&path) {
        Err(DataLoadError::Row { source, .. }) => {
            assert_eq!(source.row, 4);
            assert_eq!(source.column, "Sales");
        }
        other => panic!("expected row error, got {other:?}"),
    }
    assert!(cache.is_empty());

    let _ = fs::remove_file(path);
}

#[test]
fn test_parquet_matches_csv() {
    let csv_path = temp_path("same.csv");
    fs::write(&csv_path, SALES_CSV).unwrap();
    let from_csv = load_file(&csv_path).unwrap();

    // Narrower physical types than the loader's targets: Int32 years, Float32 money.
    let records = from_csv.records();
    let text = |f: fn(&sales_dashboard::SalesRecord) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(records.iter().map(f).collect::<Vec<_>>()))
    };
    let schema = Arc::new(Schema::new(vec![
        Field::new("Shipping_Mode", DataType::Utf8, false),
        Field::new("Region", DataType::Utf8, false),
        Field::new("Segment", DataType::Utf8, false),
        Field::new("Year", DataType::Int32, false),
        Field::new("Sales", DataType::Float32, false),
        Field::new("Profit", DataType::Float32, false),
        Field::new("Discount", DataType::Float32, false),
        Field::new("Category", DataType::Utf8, false),
        Field::new("Product", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| &r.shipping_mode),
            text(|r| &r.region),
            text(|r| &r.segment),
            Arc::new(Int32Array::from(
                records.iter().map(|r| r.year as i32).collect::<Vec<_>>(),
            )),
            Arc::new(Float32Array::from(
                records.iter().map(|r| r.sales as f32).collect::<Vec<_>>(),
            )),
            Arc::new(Float32Array::from(
                records.iter().map(|r| r.profit as f32).collect::<Vec<_>>(),
            )),
            Arc::new(Float32Array::from(
                records.iter().map(|r| r.discount as f32).collect::<Vec<_>>(),
            )),
            text(|r| &r.category),
            text(|r| &r.product),
        ],
    )
    .unwrap();

    let pq_path = temp_path("same.parquet");
    let file = fs::File::create(&pq_path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let from_parquet = load_file(&pq_path).expect("Failed to load parquet");
    assert_eq!(from_parquet.len(), from_csv.len());
    for (a, b) in from_parquet.records().iter().zip(from_csv.records()) {
        assert_eq!(a.region, b.region);
        assert_eq!(a.year, b.year);
        assert_eq!(a.shipping_mode, b.shipping_mode);
        assert!((a.sales - b.sales).abs() < 1e-3);
    }

    let _ = fs::remove_file(csv_path);
    let _ = fs::remove_file(pq_path);
}
