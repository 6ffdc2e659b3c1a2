//! Tests for decoder module

use super::*;
use crate::error::Error;
use crate::types::raw_record;
use pretty_assertions::assert_eq;

// ============================================================================
// CSV Decoder Tests
// ============================================================================

#[test]
fn test_csv_decoder_basic() {
    let decoder = CsvDecoder::new();
    let body = "id,name,amount\n1,Alice,10.5\n2,Bob,\n";

    let records = decoder.decode(body).unwrap();

    assert_eq!(
        records,
        vec![
            raw_record([("id", "1"), ("name", "Alice"), ("amount", "10.5")]),
            raw_record([("id", "2"), ("name", "Bob"), ("amount", "")]),
        ]
    );
}

#[test]
fn test_csv_decoder_keeps_whitespace() {
    let decoder = CsvDecoder::new();
    let records = decoder.decode("a,b\n 1 ,x \n").unwrap();

    assert_eq!(records[0]["a"].as_deref(), Some(" 1 "));
    assert_eq!(records[0]["b"].as_deref(), Some("x "));
}

#[test]
fn test_csv_decoder_quoted_fields() {
    let decoder = CsvDecoder::new();
    let body = "name,quote\n\"Smith, John\",\"He said \"\"hi\"\"\"\n";

    let records = decoder.decode(body).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"].as_deref(), Some("Smith, John"));
    assert_eq!(records[0]["quote"].as_deref(), Some("He said \"hi\""));
}

#[test]
fn test_csv_decoder_quoted_newline() {
    let decoder = CsvDecoder::new();
    let body = "id,note\n1,\"line one\nline two\"\n2,plain\n";

    let records = decoder.decode(body).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["note"].as_deref(), Some("line one\nline two"));
    assert_eq!(records[1]["id"].as_deref(), Some("2"));
}

#[test]
fn test_csv_decoder_custom_delimiter() {
    let decoder = CsvDecoder::with_options('\t', true);
    assert_eq!(decoder.delimiter(), '\t');

    let records = decoder.decode("a\tb\n1\t2,3\n").unwrap();

    assert_eq!(records, vec![raw_record([("a", "1"), ("b", "2,3")])]);
}

#[test]
fn test_csv_decoder_no_header() {
    let decoder = CsvDecoder::with_options(',', false);
    let records = decoder.decode("1,x\n2,y\n").unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["column_0"].as_deref(), Some("1"));
    assert_eq!(records[1]["column_1"].as_deref(), Some("y"));
}

#[test]
fn test_csv_decoder_short_row_leaves_fields_absent() {
    let decoder = CsvDecoder::new();
    let records = decoder.decode("a,b,c\n1\n").unwrap();

    assert_eq!(records[0]["a"].as_deref(), Some("1"));
    assert_eq!(records[0]["b"], None);
    assert_eq!(records[0]["c"], None);
}

#[test]
fn test_csv_decoder_long_row_drops_extra_cells() {
    let decoder = CsvDecoder::new();
    let records = decoder.decode("a,b\n1,2,3,4\n").unwrap();

    assert_eq!(records, vec![raw_record([("a", "1"), ("b", "2")])]);
}

#[test]
fn test_csv_decoder_duplicate_headers_keep_every_column() {
    let decoder = CsvDecoder::new();
    let records = decoder.decode("id,val,val,val_2\n1,x,y,z\n").unwrap();

    assert_eq!(
        records,
        vec![raw_record([
            ("id", "1"),
            ("val", "x"),
            ("val_2", "y"),
            ("val_2_2", "z"),
        ])]
    );
}

#[test]
fn test_csv_decoder_crlf_and_blank_lines() {
    let decoder = CsvDecoder::new();
    let records = decoder.decode("a,b\r\n1,2\r\n\r\n3,4").unwrap();

    assert_eq!(
        records,
        vec![
            raw_record([("a", "1"), ("b", "2")]),
            raw_record([("a", "3"), ("b", "4")]),
        ]
    );
}

#[test]
fn test_csv_decoder_strips_bom_and_header_padding() {
    let decoder = CsvDecoder::new();
    let records = decoder.decode("\u{feff}id , name\n1,x\n").unwrap();

    assert!(records[0].contains_key("id"));
    assert!(records[0].contains_key("name"));
}

#[test]
fn test_csv_decoder_empty_body() {
    let decoder = CsvDecoder::new();
    assert!(decoder.decode("").unwrap().is_empty());
    assert!(decoder.decode("a,b\n").unwrap().is_empty());
    assert!(CsvDecoder::with_options(',', false)
        .decode("")
        .unwrap()
        .is_empty());
}

#[test]
fn test_csv_decoder_unterminated_quote() {
    let decoder = CsvDecoder::new();
    let err = decoder.decode("a,b\n1,2\n3,\"open\n").unwrap_err();

    assert!(matches!(err, Error::CsvParse { line: 3, .. }));
}
