//! Schema generation through the mapper

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_sheets::prelude::*;
use serde_sheets::schema::{AnnotatedNameResolver, ColumnPointer, ColumnProperty, ColumnType};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Line {
    sku: String,
    qty: u32,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Order {
    number: i64,
    customer: String,
    total: f64,
    lines: Vec<Line>,
}

impl DataGrid for Order {}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Product {
    code: String,
    name: String,
    price: f64,
    stock: u32,
}

impl DataGrid for Product {
    fn grid() -> GridOptions {
        GridOptions::new().auto_size_column(true).min_column_width(8)
    }

    fn column(pointer: &ColumnPointer) -> ColumnOptions {
        match pointer.to_string().as_str() {
            "code" => ColumnOptions::named("Code").auto_size(false).width(10),
            "price" => ColumnOptions::named("Unit price"),
            _ => ColumnOptions::new(),
        }
    }
}

fn products() -> Vec<Product> {
    vec![
        Product {
            code: "P-1".into(),
            name: "Hex key set, metric".into(),
            price: 12.5,
            stock: 1200,
        },
        Product {
            code: "P-2".into(),
            name: "Saw".into(),
            price: 30.0,
            stock: 7,
        },
    ]
}

#[test]
fn test_nested_sequence_columns() {
    let schema = SpreadsheetMapper::new().sheet_schema_for::<Order>().unwrap();
    let pointers: Vec<String> = schema.iter().map(|c| c.pointer().to_string()).collect();
    assert_eq!(
        pointers,
        vec!["number", "customer", "total", "lines/[]/sku", "lines/[]/qty"]
    );
    let types: Vec<ColumnType> = schema.iter().map(|c| c.value_type()).collect();
    assert_eq!(
        types,
        vec![
            ColumnType::Integer,
            ColumnType::Text,
            ColumnType::Float,
            ColumnType::Text,
            ColumnType::Integer,
        ]
    );
    assert_eq!(schema.schema_type(), "spreadsheet");
    assert_eq!(schema.data_row(), 1);
}

#[test]
fn test_nested_sequence_rows() {
    let order = Order {
        number: 7,
        customer: "ACME".into(),
        total: 42.0,
        lines: vec![
            Line {
                sku: "A".into(),
                qty: 1,
            },
            Line {
                sku: "B".into(),
                qty: 2,
            },
        ],
    };
    let mut sheet = Worksheet::new("Orders");
    SpreadsheetMapper::new()
        .write_values_to_sheet(&mut sheet, &[order])
        .unwrap();

    assert_eq!(sheet.get_value_at(1, 0), CellValue::Number(7.0));
    assert_eq!(sheet.get_value_at(1, 3), CellValue::string("A"));
    assert_eq!(sheet.get_value_at(2, 3), CellValue::string("B"));
    assert_eq!(sheet.get_value_at(2, 4), CellValue::Number(2.0));
    assert_eq!(sheet.get_value_at(2, 0), CellValue::Empty);
}

#[test]
fn test_options_and_widths() {
    let mapper = SpreadsheetMapper::new();
    let mut sheet = Worksheet::new("Products");
    mapper.write_values_to_sheet(&mut sheet, &products()).unwrap();

    assert_eq!(sheet.get_value_at(0, 0), CellValue::string("Code"));
    assert_eq!(sheet.get_value_at(0, 2), CellValue::string("Unit price"));

    // explicit width
    assert_eq!(sheet.column_width(0), 10.0);
    // widest text plus padding
    assert_eq!(sheet.column_width(1), 21.0);
    // header "stock" plus padding is below the minimum
    assert_eq!(sheet.column_width(3), 8.0);

    let back: Vec<Product> = mapper.read_values_from_sheet(&sheet).unwrap();
    assert_eq!(back, products());
}

#[test]
fn test_simple_styles() {
    let mapper = SpreadsheetMapper::builder()
        .styles_builder(StylesBuilder::simple())
        .build();
    let mut sheet = Worksheet::new("Products");
    mapper.write_values_to_sheet(&mut sheet, &products()).unwrap();

    let format = |row: u32, col: u16| {
        sheet
            .cell_style_at(row, col)
            .map(|s| s.number_format.format_code().to_string())
    };
    assert_eq!(format(1, 2).as_deref(), Some("#,##0.00"));
    assert_eq!(format(2, 3).as_deref(), Some("#,##0"));
    assert_eq!(format(1, 1).as_deref(), Some("@"));
}

#[test]
fn test_closure_resolver() {
    let mapper = SpreadsheetMapper::builder()
        .column_name_resolver(|p: &ColumnProperty| match p.value_type {
            ColumnType::Float => Some(format!("{} (EUR)", p.name)),
            _ => None,
        })
        .build();
    let schema = mapper.sheet_schema_for::<Product>().unwrap();
    let names: Vec<String> = schema.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Code", "name", "price (EUR)", "stock"]);
}

#[derive(Clone, Copy)]
enum Label {
    Code,
    Name,
}

#[test]
fn test_annotated_resolver() {
    let lookup = |p: &ColumnProperty| match p.name.as_str() {
        "code" => Some(Label::Code),
        "name" | "price" | "stock" => Some(Label::Name),
        _ => None,
    };
    let mapper = SpreadsheetMapper::builder()
        .column_name_resolver(AnnotatedNameResolver::new("Label", lookup, |l: Label| {
            match l {
                Label::Code => "Code".to_string(),
                Label::Name => "Name".to_string(),
            }
        }))
        .build();
    let schema = mapper.sheet_schema_for::<Product>().unwrap();
    assert_eq!(schema.column(0).unwrap().name(), "Code");
    assert_eq!(schema.column(3).unwrap().name(), "Name");

    let err = mapper.sheet_schema_for::<Order>().unwrap_err();
    let message = err.to_string();
    assert!(
        message.starts_with("Failed to generate schema of type 'spreadsheet' for `"),
        "{}",
        message
    );
    assert!(
        message.ends_with("problem: Annotation `Label` must not be null for property 'number'"),
        "{}",
        message
    );
}

#[test]
fn test_map_fields_are_rejected() {
    #[derive(Deserialize)]
    #[allow(dead_code)]
    struct Tagged {
        id: u32,
        tags: HashMap<String, String>,
    }

    impl DataGrid for Tagged {}

    let err = SpreadsheetMapper::new()
        .sheet_schema_for::<Tagged>()
        .unwrap_err();
    assert!(
        err.to_string().ends_with("problem: Unsupported type: map"),
        "{}",
        err
    );
}
