//! Loading packages and options from JSON
#![cfg(feature = "serde")]

use pretty_assertions::assert_eq;
use tablecloth::{
    compile, CompileOptions, ErrorStyle, FieldType, Mode, Package, Platform, Value,
};

const PACKAGE: &str = r#"{
    "resources": [
        {
            "name": "samples",
            "fields": [
                {
                    "name": "id",
                    "type": "integer",
                    "description": "Sample number",
                    "constraints": { "required": true, "unique": true, "minimum": 1 }
                },
                {
                    "name": "site",
                    "type": "string",
                    "constraints": { "enum": ["north", "south"], "maxLength": 5 }
                },
                { "name": "parent", "type": "integer" }
            ],
            "foreignKeys": [
                { "fields": ["parent"], "reference": { "resource": "", "fields": ["id"] } }
            ]
        }
    ]
}"#;

#[test]
fn test_package_from_json() {
    let package: Package = serde_json::from_str(PACKAGE).unwrap();
    let table = &package.tables[0];

    assert_eq!(table.fields[0].field_type, FieldType::Integer);
    assert_eq!(table.fields[0].constraints.minimum, Some(1.0));
    assert_eq!(table.fields[1].constraints.max_length, Some(5));
    assert_eq!(
        table.fields[1].constraints.enumeration,
        Some(vec![Value::from("north"), Value::from("south")])
    );
    assert_eq!(table.foreign_keys[0].reference.table_or("samples"), "samples");

    let compiled = compile(&package, &CompileOptions::default()).unwrap();
    assert_eq!(compiled.order, vec!["samples"]);
}

#[test]
fn test_options_from_json() {
    let options: CompileOptions = serde_json::from_str(
        r#"{
            "platform": "google-sheets",
            "mode": "best-effort",
            "dataRows": 200,
            "headerComments": { "samples": { "site": "Where it was collected" } },
            "errorStyle": "warning"
        }"#,
    )
    .unwrap();

    assert_eq!(options.platform, Platform::GoogleSheets);
    assert_eq!(options.mode, Mode::BestEffort);
    assert_eq!(options.data_rows, 200);
    assert_eq!(options.error_style, ErrorStyle::Warning);
    assert_eq!(options.header_comment("samples", "site"), Some("Where it was collected"));
    // Unset keys keep their defaults
    assert!(options.freeze_header);
    assert_eq!(options.enum_sheet, "lists");
}
