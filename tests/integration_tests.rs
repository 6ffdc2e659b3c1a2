//! Integration tests over temporary CSV files
//!
//! Tests the full end-to-end flow: config → discover → read → JSON/Parquet output

use arrow::array::{Array, Float64Array, Int64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, TimeUnit};
use chrono::{TimeZone, Utc};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use solidafy_smart_csv::convert::{DeclaredTypes, TypedValue};
use solidafy_smart_csv::output::ParquetWriterConfig;
use solidafy_smart_csv::schema::{FieldSchema, FieldType, JsonType, StreamSchema};
use solidafy_smart_csv::sync::{
    file_for, read_stream, select_streams, write_stream_parquet, MessageSink,
};
use solidafy_smart_csv::{
    discover, discover_concurrent, load_config, raw_record, Catalog, Error, PrimitiveType,
    RowConverter, TapConfig,
};
use std::fs::{self, File};
use std::path::Path;
use tempfile::TempDir;

fn write_config(dir: &Path, body: &str) -> TapConfig {
    let path = dir.join("tap.yml");
    fs::write(&path, body).unwrap();
    load_config(&path).unwrap()
}

/// Two order files, one customers file with a `;` delimiter
fn fixture() -> (TempDir, TapConfig) {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();

    fs::write(
        data.join("orders_2024_01.csv"),
        "id,total,status,note\n1,10,open,\n2,12.5,closed,\"late, again\"\n",
    )
    .unwrap();
    fs::write(
        data.join("orders_2024_02.csv"),
        "id,total,status,note\n3,7,open,\n",
    )
    .unwrap();
    fs::write(
        data.join("customers.csv"),
        "code;name\nA1;Ann\nB2;\"Bo \"\"B\"\" Smith\"\n",
    )
    .unwrap();

    let config = write_config(
        dir.path(),
        &format!(
            r#"
sample_rate: 1
max_sampled_rows: 100
files:
  - table_name: orders
    path: {data}
    pattern: "^orders_.*\\.csv$"
    key_properties: [id]
  - table_name: customers
    path: {data}
    pattern: "^customers\\.csv$"
    delimiter: ";"
    key_properties: [code, missing]
"#,
            data = data.display()
        ),
    );
    (dir, config)
}

// ============================================================================
// Discovery
// ============================================================================

#[test]
fn test_discover_builds_catalog() {
    let (_dir, config) = fixture();

    let catalog = discover(&config).unwrap();

    assert_eq!(catalog.stream_names(), vec!["orders", "customers"]);

    let orders = catalog.require_stream("orders").unwrap();
    assert_eq!(orders.tap_stream_id, "orders");
    assert_eq!(orders.key_properties, vec!["id".to_string()]);
    assert_eq!(
        serde_json::to_value(&orders.schema).unwrap(),
        json!({
            "type": "object",
            "properties": {
                "id": {"type": ["null", "integer"]},
                "note": {"type": ["null", "string"]},
                "status": {"type": ["null", "string"]},
                "total": {"type": ["null", "number"]}
            }
        })
    );

    // Unknown key properties are dropped
    let customers = catalog.require_stream("customers").unwrap();
    assert_eq!(customers.key_properties, vec!["code".to_string()]);
}

#[tokio::test]
async fn test_concurrent_discovery_matches_sequential() {
    let (_dir, config) = fixture();

    let sequential = discover(&config).unwrap();
    let concurrent = discover_concurrent(&config).await.unwrap();

    assert_eq!(concurrent, sequential);
}

#[test]
fn test_catalog_file_roundtrip() {
    let (dir, config) = fixture();
    let catalog = discover(&config).unwrap();

    let path = dir.path().join("catalog.json");
    fs::write(&path, serde_json::to_string_pretty(&catalog).unwrap()).unwrap();
    let loaded: Catalog = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(loaded, catalog);
}

// ============================================================================
// Reading
// ============================================================================

#[test]
fn test_read_emits_messages() {
    let (_dir, config) = fixture();
    let catalog = discover(&config).unwrap();
    let extracted = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    let mut sink = MessageSink::with_extracted(Vec::new(), extracted);
    for entry in select_streams(&catalog, None).unwrap() {
        let rows = read_stream(file_for(&config, entry).unwrap(), entry).unwrap();
        sink.write_stream(entry, rows).unwrap();
    }
    let out = String::from_utf8(sink.finish().unwrap()).unwrap();

    let messages: Vec<Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let kinds: Vec<&str> = messages
        .iter()
        .map(|m| m["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["SCHEMA", "RECORD", "RECORD", "RECORD", "SCHEMA", "RECORD", "RECORD", "STATE"]
    );

    assert_eq!(messages[0]["stream"], "orders");
    assert_eq!(messages[0]["key_properties"], json!(["id"]));
    assert_eq!(
        messages[1]["record"],
        json!({"id": 1, "note": null, "status": "open", "total": 10.0})
    );
    assert_eq!(
        messages[2]["record"],
        json!({"id": 2, "note": "late, again", "status": "closed", "total": 12.5})
    );
    assert_eq!(messages[1]["time_extracted"], "2024-03-01T12:00:00+00:00");
    assert_eq!(
        messages[6]["record"],
        json!({"code": "B2", "name": "Bo \"B\" Smith"})
    );
    assert_eq!(
        messages[7]["value"],
        json!({"bookmarks": {"customers": {"rows_read": 2}, "orders": {"rows_read": 3}}})
    );
}

#[test]
fn test_read_selected_streams_only() {
    let (_dir, config) = fixture();
    let catalog = discover(&config).unwrap();

    let selected = select_streams(&catalog, Some("customers")).unwrap();
    assert_eq!(selected.len(), 1);

    let err = select_streams(&catalog, Some("customers,unknown")).unwrap_err();
    assert!(matches!(err, Error::StreamNotFound { .. }));
}

#[test]
fn test_read_with_stale_catalog_fails_loudly() {
    let (_dir, config) = fixture();
    let mut catalog = discover(&config).unwrap();

    // Drop a column the files still carry
    let orders = catalog
        .streams
        .iter_mut()
        .find(|s| s.stream == "orders")
        .unwrap();
    let properties: FieldSchema = orders
        .schema
        .properties
        .iter()
        .filter(|(name, _)| name.as_str() != "note")
        .map(|(name, field)| (name.clone(), field.clone()))
        .collect();
    orders.schema = StreamSchema::from(properties);

    let entry = catalog.require_stream("orders").unwrap();
    let err = read_stream(file_for(&config, entry).unwrap(), entry).unwrap_err();

    assert!(matches!(err, Error::FieldNotInSchema { ref field } if field == "note"));
}

#[test]
fn test_hand_written_schema_with_timestamp() {
    let mut schema = FieldSchema::default();
    schema.insert("at", FieldType::nullable(JsonType::String).with_format("date-time"));
    schema.insert("n", FieldType::nullable(JsonType::Integer));

    assert_eq!(
        schema.get("at").unwrap().declared_types(),
        DeclaredTypes::nullable(PrimitiveType::Timestamp)
    );

    let converter = RowConverter::new(&schema);
    let row = converter
        .convert(&raw_record([("at", "2023-01-01T00:00:00"), ("n", "x7")]))
        .unwrap();

    assert_eq!(row["at"].to_json(), json!("2023-01-01T00:00:00+00:00"));
    assert_eq!(row["n"], TypedValue::String("x7".into()));
}

// ============================================================================
// Parquet Output
// ============================================================================

#[test]
fn test_read_to_parquet() {
    let (dir, config) = fixture();
    let catalog = discover(&config).unwrap();
    let entry = catalog.require_stream("orders").unwrap();
    let rows = read_stream(file_for(&config, entry).unwrap(), entry).unwrap();

    let out_dir = dir.path().join("out");
    let path = write_stream_parquet(&out_dir, entry, &rows, &ParquetWriterConfig::new()).unwrap();
    assert_eq!(path, out_dir.join("orders.parquet"));

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.map(Result::unwrap).collect();
    let total: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(total, 3);

    let batch = &batches[0];
    let ids = batch
        .column_by_name("id")
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(ids.value(0), 1);

    let totals = batch
        .column_by_name("total")
        .unwrap()
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert_eq!(totals.value(1), 12.5);

    let notes = batch
        .column_by_name("note")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert!(notes.is_null(0));
    assert_eq!(notes.value(1), "late, again");
}

#[test]
fn test_timestamp_column_to_parquet() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("events.csv"), "at\n2024-01-02T03:04:05Z\n\n").unwrap();

    let config = write_config(
        dir.path(),
        &format!(
            "files:\n  - table_name: events\n    path: {}\n",
            data.display()
        ),
    );
    let mut catalog = discover(&config).unwrap();

    // Timestamps are never inferred; declare the column explicitly
    let events = &mut catalog.streams[0];
    let mut properties = events.schema.properties.clone();
    properties.insert(
        "at",
        FieldType::nullable(JsonType::String).with_format("date-time"),
    );
    events.schema = StreamSchema::from(properties);

    let entry = catalog.require_stream("events").unwrap();
    let rows = read_stream(file_for(&config, entry).unwrap(), entry).unwrap();
    let path = write_stream_parquet(
        dir.path(),
        entry,
        &rows,
        &ParquetWriterConfig::new().uncompressed(),
    )
    .unwrap();

    let mut reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let batch = reader.next().unwrap().unwrap();
    let column = batch.column_by_name("at").unwrap();
    assert_eq!(
        column.data_type(),
        &DataType::Timestamp(TimeUnit::Microsecond, Some("+00:00".into()))
    );

    let values = column
        .as_any()
        .downcast_ref::<TimestampMicrosecondArray>()
        .unwrap();
    let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(values.value(0), expected.timestamp_micros());
}
