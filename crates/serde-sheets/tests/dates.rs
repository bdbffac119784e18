//! Excel serial dates through the mapper

use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_sheets::prelude::*;
use serde_sheets::schema::ColumnType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Shift {
    worker: String,
    day: ExcelDate,
    #[serde(with = "serde_sheets::excel_datetime")]
    started: NaiveDateTime,
    #[serde(default, with = "serde_sheets::excel_date::option")]
    approved: Option<NaiveDate>,
}

impl DataGrid for Shift {}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn shifts() -> Vec<Shift> {
    vec![
        Shift {
            worker: "Ana".into(),
            day: ExcelDate(date(2024, 1, 15)),
            started: date(2024, 1, 15).and_hms_opt(12, 0, 0).unwrap(),
            approved: Some(date(2024, 1, 16)),
        },
        Shift {
            worker: "Ben".into(),
            day: ExcelDate(date(1900, 2, 28)),
            started: date(1900, 3, 1).and_hms_opt(6, 0, 0).unwrap(),
            approved: None,
        },
    ]
}

#[test]
fn test_date_columns() {
    let schema = SpreadsheetMapper::new().sheet_schema_for::<Shift>().unwrap();
    let types: Vec<ColumnType> = schema.iter().map(|c| c.value_type()).collect();
    assert_eq!(
        types,
        vec![
            ColumnType::Text,
            ColumnType::Date,
            ColumnType::DateTime,
            ColumnType::Date,
        ]
    );
}

#[test]
fn test_serials_1900() {
    let mapper = SpreadsheetMapper::new();
    let mut sheet = Worksheet::new("Shifts");
    mapper.write_values_to_sheet(&mut sheet, &shifts()).unwrap();

    assert_eq!(sheet.get_value_at(1, 1), CellValue::Number(45306.0));
    assert_eq!(sheet.get_value_at(1, 2), CellValue::Number(45306.5));
    assert_eq!(sheet.get_value_at(2, 1), CellValue::Number(59.0));
    assert_eq!(sheet.get_value_at(2, 2), CellValue::Number(61.25));
    assert_eq!(sheet.get_value_at(2, 3), CellValue::Empty);

    let back: Vec<Shift> = mapper.read_values_from_sheet(&sheet).unwrap();
    assert_eq!(back, shifts());
}

#[test]
fn test_roundtrip_1904() {
    let mapper = SpreadsheetMapper::new();
    let writer = mapper
        .sheet_writer_for::<Shift>()
        .unwrap()
        .with_date_1904(true);
    let bytes = writer.write_value_as_bytes(&shifts()[..1]).unwrap();

    let package = serde_sheets::XlsxPackage::from_bytes(bytes.clone()).unwrap();
    assert!(package.is_date_1904());

    let back: Vec<Shift> = mapper.read_values(bytes).unwrap();
    assert_eq!(back, shifts()[..1].to_vec());
}

#[test]
fn test_write_into_1904_workbook() {
    let mut workbook = Workbook::empty();
    workbook.set_date_1904(true);
    let mapper = SpreadsheetMapper::new();
    mapper
        .write_values_to_workbook(&mut workbook, "Shifts", &shifts()[..1])
        .unwrap();

    let sheet = workbook.worksheet_by_name("Shifts").unwrap();
    assert_eq!(sheet.get_value_at(1, 1), CellValue::Number(43844.0));
    assert_eq!(sheet.get_value_at(1, 2), CellValue::Number(43844.5));
    assert_eq!(sheet.get_value_at(1, 3), CellValue::Number(43845.0));

    let bytes = {
        let mut buf = std::io::Cursor::new(Vec::new());
        serde_sheets::XlsxWriter::write(&workbook, &mut buf).unwrap();
        buf.into_inner()
    };
    let back: Vec<Shift> = mapper.read_values(bytes).unwrap();
    assert_eq!(back, shifts()[..1].to_vec());
}

#[test]
fn test_dates_from_text_cells() {
    let mut sheet = Worksheet::new("Shifts");
    for (col, header) in ["worker", "day", "started", "approved"].iter().enumerate() {
        sheet.set_cell_value_at(0, col as u16, *header).unwrap();
    }
    sheet.set_cell_value_at(1, 0, "Cy").unwrap();
    sheet.set_cell_value_at(1, 1, "2023-07-01").unwrap();
    sheet.set_cell_value_at(1, 2, "2023-07-01 08:15:00").unwrap();

    let back: Option<Shift> = SpreadsheetMapper::new()
        .read_value_from_sheet(&sheet)
        .unwrap();
    assert_eq!(
        back,
        Some(Shift {
            worker: "Cy".into(),
            day: ExcelDate(date(2023, 7, 1)),
            started: date(2023, 7, 1).and_hms_opt(8, 15, 0).unwrap(),
            approved: None,
        })
    );
}
