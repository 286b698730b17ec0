use sheetdiff_recon::{
    compare, CellValue, ColumnMapping, ComparisonResult, KeyedRecord, Table,
};

// 8-column layout: code, description, incoming, outgoing, remaining, unit, price, warehouse
fn header() -> Vec<String> {
    ["Code", "Name", "Incoming", "Outgoing", "Remaining", "Unit", "Price", "Warehouse"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn product(code: &str, name: &str, incoming: i64, outgoing: i64, remaining: i64) -> Vec<CellValue> {
    vec![
        code.into(),
        name.into(),
        incoming.into(),
        outgoing.into(),
        remaining.into(),
        "pcs".into(),
        CellValue::number(2.5),
        "Main".into(),
    ]
}

fn table(name: &str, rows: Vec<Vec<CellValue>>) -> Table {
    Table::from_records(name, header(), rows).unwrap()
}

fn mapping() -> ColumnMapping {
    ColumnMapping::new(0, 1).with_detailed(2, 3, 4)
}

fn run(a: &Table, b: &Table, m: &ColumnMapping, detailed: bool) -> ComparisonResult {
    compare(a, b, m, detailed).unwrap()
}

// -------------------------------------------------------------------------
// Scenarios
// -------------------------------------------------------------------------

#[test]
fn record_missing_from_second_table() {
    let a = table("File 1", vec![product("001", "Widget", 10, 5, 5)]);
    let b = table("File 2", vec![]);
    let result = run(&a, &b, &mapping(), false);

    assert_eq!(result.count_a, 1);
    assert_eq!(result.count_b, 0);
    assert_eq!(
        result.only_in_a,
        vec![KeyedRecord { key: "001".into(), description: "Widget".into() }]
    );
    assert!(result.only_in_b.is_empty());
    assert!(result.differences.is_empty());
}

#[test]
fn identical_records_produce_nothing() {
    let a = table("File 1", vec![product("001", "Widget", 10, 5, 5)]);
    let b = table("File 2", vec![product("001", "Widget", 10, 5, 5)]);
    let result = run(&a, &b, &mapping(), true);

    assert!(result.only_in_a.is_empty());
    assert!(result.only_in_b.is_empty());
    assert!(result.differences.is_empty());
    assert!(result.is_identical());
}

#[test]
fn incoming_change_is_reported() {
    let a = table("File 1", vec![product("001", "Widget", 10, 5, 5)]);
    let b = table("File 2", vec![product("001", "Widget", 12, 5, 5)]);
    let result = run(&a, &b, &mapping(), true);

    assert_eq!(result.differences.len(), 1);
    let diff = &result.differences[0];
    assert_eq!(diff.key, CellValue::from("001"));
    assert_eq!(diff.description, CellValue::from("Widget"));
    assert_eq!(diff.fields.len(), 1);
    let change = diff.field("Incoming").unwrap();
    assert_eq!(change.value_a, CellValue::from(10));
    assert_eq!(change.value_b, CellValue::from(12));
}

#[test]
fn custom_field_beyond_columns_is_ignored() {
    let a = table("File 1", vec![product("001", "Widget", 10, 5, 5)]);
    let b = table("File 2", vec![product("001", "Widget", 12, 5, 5)]);
    let m = mapping().with_custom("Region", 9);
    let result = compare(&a, &b, &m, true).expect("bad custom index must not fail");

    assert_eq!(result.differences.len(), 1);
    for diff in &result.differences {
        assert!(diff.field("Region").is_none());
    }
}

// -------------------------------------------------------------------------
// Mixed datasets
// -------------------------------------------------------------------------

fn stock_a() -> Table {
    table(
        "File 1",
        vec![
            product("004", "Bolt", 100, 20, 80),
            product("001", "Widget", 10, 5, 5),
            product("002", "Gadget", 3, 1, 2),
            product("005", "Nut", 50, 50, 0),
        ],
    )
}

fn stock_b() -> Table {
    table(
        "File 2",
        vec![
            product("002", "Gadget", 3, 2, 1),
            product("001", "Widget", 10, 5, 5),
            product("003", "Sprocket", 7, 0, 7),
            product("005", "Nut", 50, 50, 0),
        ],
    )
}

#[test]
fn mixed_dataset_partitions_keys() {
    let result = run(&stock_a(), &stock_b(), &mapping(), true);

    assert_eq!(result.count_a, 4);
    assert_eq!(result.count_b, 4);
    assert_eq!(result.only_in_a.len(), 1);
    assert_eq!(result.only_in_a[0].key, CellValue::from("004"));
    assert_eq!(result.only_in_a[0].description, CellValue::from("Bolt"));
    assert_eq!(result.only_in_b.len(), 1);
    assert_eq!(result.only_in_b[0].key, CellValue::from("003"));
    assert_eq!(result.only_in_b[0].description, CellValue::from("Sprocket"));

    assert_eq!(result.differences.len(), 1);
    let diff = &result.differences[0];
    assert_eq!(diff.key, CellValue::from("002"));
    let names: Vec<&str> = diff.fields.iter().map(|c| c.field.as_str()).collect();
    assert_eq!(names, vec!["Outgoing", "Remaining"]);
}

#[test]
fn results_are_sorted_by_key() {
    let a = table(
        "File 1",
        vec![
            product("c", "C", 1, 0, 1),
            product("a", "A", 1, 0, 1),
            product("b", "B", 1, 0, 1),
        ],
    );
    let b = table("File 2", vec![]);
    let result = run(&a, &b, &mapping(), false);
    let keys: Vec<String> = result.only_in_a.iter().map(|r| r.key.to_string()).collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
}

#[test]
fn repeated_comparison_is_identical() {
    let m = mapping().with_custom("Price", 6).with_custom("Warehouse", 7);
    let first = run(&stock_a(), &stock_b(), &m, true);
    let second = run(&stock_a(), &stock_b(), &m, true);
    assert_eq!(first, second);
}

#[test]
fn without_detailed_flag_only_custom_fields_compared() {
    let m = ColumnMapping::new(0, 1).with_custom("Remaining", 4);
    let result = run(&stock_a(), &stock_b(), &m, false);
    assert_eq!(result.differences.len(), 1);
    let diff = &result.differences[0];
    assert_eq!(diff.fields.len(), 1);
    assert!(diff.field("Outgoing").is_none());
    assert_eq!(diff.field("Remaining").unwrap().value_a, CellValue::from(2));
}

#[test]
fn empty_values_compare_equal() {
    let mut row_a = product("001", "Widget", 1, 1, 0);
    let mut row_b = product("001", "Widget", 1, 1, 0);
    row_a[7] = CellValue::Empty;
    row_b[7] = CellValue::Empty;
    let a = table("File 1", vec![row_a]);
    let b = table("File 2", vec![row_b]);
    let m = mapping().with_custom("Warehouse", 7);
    assert!(run(&a, &b, &m, true).differences.is_empty());
}

#[test]
fn empty_versus_value_is_a_difference() {
    let mut row_b = product("001", "Widget", 1, 1, 0);
    row_b[7] = CellValue::Empty;
    let a = table("File 1", vec![product("001", "Widget", 1, 1, 0)]);
    let b = table("File 2", vec![row_b]);
    let m = ColumnMapping::new(0, 1).with_custom("Warehouse", 7);
    let result = run(&a, &b, &m, false);
    let change = result.differences[0].field("Warehouse").unwrap();
    assert_eq!(change.value_a, CellValue::from("Main"));
    assert!(change.value_b.is_empty());
}

#[test]
fn result_serializes_to_json() {
    let result = run(&stock_a(), &stock_b(), &mapping(), true);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["count_a"], 4);
    assert_eq!(json["only_in_a"][0]["key"], "004");
    assert_eq!(json["only_in_b"][0]["description"], "Sprocket");
    assert_eq!(json["differences"][0]["fields"]["Outgoing"], serde_json::json!([1.0, 2.0]));
}
