use action_print_layout::{
    ActionTable, CustomizationStore, ExcelReport, LayoutValues, MemoryWorkbook, PlanId,
    ReportInput, ReportLabels, ReportMetadata, XlsxWorkbook, write_action_summaries,
};
use chrono::NaiveDate;
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// 250 seven-character words and a full stop, 2000 characters in all
fn long_description() -> String {
    let words: Vec<String> = (0..250).map(|i| format!("word{i:03}")).collect();
    format!("{}.", words.join(" "))
}

fn actions(description: &str) -> ActionTable {
    ActionTable::new(["ID", "Name", "Description"])
        .with_field_label("identifier", "ID")
        .with_field_label("name", "Name")
        .with_field_label("description", "Description")
        .add_row([Some("1"), Some("Bike lanes"), Some(description)])
}

fn tight_values() -> LayoutValues {
    LayoutValues {
        max_columns: Some(4),
        approximate_chars_per_line: Some(80),
        approximate_lines_per_page: Some(10),
        min_split_chars: Some(20),
        width_needed: Some(json!([[20, 1], [40, 2], [100, 3]])),
    }
}

fn store() -> CustomizationStore {
    CustomizationStore::from_json(
        r#"[
            {"max_columns": 4, "approximate_chars_per_line": 80,
             "approximate_lines_per_page": 60, "min_split_chars": 20,
             "width_needed": [[20, 1], [40, 2], [100, 3]]},
            {"plan": "tampere", "approximate_lines_per_page": 10}
        ]"#,
    )
    .unwrap()
}

fn input(plan: &str, table: ActionTable) -> ReportInput {
    ReportInput {
        plan: PlanId::new(plan),
        metadata: ReportMetadata {
            plan_name: "Climate plan".to_string(),
            report_type_name: "Yearly report".to_string(),
            report_name: "2024".to_string(),
            is_complete: true,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            updated_at: NaiveDate::from_ymd_opt(2025, 1, 15)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        },
        actions: table,
        print_layout: true,
    }
}

#[test]
fn long_description_splits_at_whitespace() {
    init_tracing();
    let description = long_description();
    assert_eq!(description.chars().count(), 2000);

    let mut workbook = MemoryWorkbook::new();
    let paginated = write_action_summaries(
        &mut workbook,
        &actions(&description),
        &tight_values(),
        &ReportLabels::default(),
    )
    .unwrap()
    .unwrap();

    assert!(paginated.page_breaks.len() >= 2);
    let sheet = workbook.sheet("Paginated actions").unwrap();
    assert_eq!(sheet.page_breaks, paginated.page_breaks);
    assert_eq!(sheet.row_texts(0)[0], "1 [Page 1/3]");
    assert_eq!(sheet.row_texts(0)[2], "Bike lanes");

    // every page is a header, the label and a part of the value
    let pages = paginated.pages();
    let parts: Vec<&str> = pages.iter().map(|page| page[2][0].text()).collect();
    for page in &pages {
        assert_eq!(page[1][0].text(), "Description");
    }
    for part in &parts[..parts.len() - 1] {
        assert!(part.ends_with(' '), "split inside a word: {part:?}");
    }
    assert_eq!(parts.concat(), description);
}

#[test]
fn missing_width_table_skips_paginated_sheet() {
    init_tracing();
    let store = CustomizationStore::from_json(
        r#"[{"max_columns": 4, "approximate_chars_per_line": 80,
             "approximate_lines_per_page": 10, "min_split_chars": 20}]"#,
    )
    .unwrap();

    let mut workbook = MemoryWorkbook::new();
    let summary = ExcelReport::default()
        .generate(&mut workbook, &input("tampere", actions("Short")), &store)
        .unwrap();

    assert_eq!(summary.sheets, vec!["Lead", "Actions"]);
    assert!(summary.paginated.is_none());
    assert_eq!(workbook.sheet_names(), vec!["Lead", "Actions"]);
}

#[test]
fn plan_override_falls_back_per_field() {
    let store = store();
    let tampere = PlanId::new("tampere");
    let lines = store
        .get_plan_variable_with_fallback(Some(&tampere), "approximate_lines_per_page")
        .unwrap();
    assert_eq!(lines, Some(json!(10)));
    let columns = store
        .get_plan_variable_with_fallback(Some(&tampere), "max_columns")
        .unwrap();
    assert_eq!(columns, Some(json!(4)));

    let description = long_description();
    let report = ExcelReport::default();

    let mut workbook = MemoryWorkbook::new();
    let tight = report
        .generate(&mut workbook, &input("tampere", actions(&description)), &store)
        .unwrap();
    let mut workbook = MemoryWorkbook::new();
    let roomy = report
        .generate(&mut workbook, &input("oulu", actions(&description)), &store)
        .unwrap();

    assert_eq!(tight.paginated.unwrap().page_count(), 3);
    // a header line and 25 value lines fit in 60
    assert_eq!(roomy.paginated.unwrap().page_count(), 1);
}

#[test]
fn disabled_print_layout_writes_two_sheets() {
    let mut input = input("tampere", actions("Short"));
    input.print_layout = false;

    let mut workbook = MemoryWorkbook::new();
    let summary = ExcelReport::default()
        .generate(&mut workbook, &input, &store())
        .unwrap();
    assert_eq!(summary.sheets, vec!["Lead", "Actions"]);
}

#[test]
fn xlsx_report() {
    init_tracing();
    let mut workbook = XlsxWorkbook::new();
    let summary = ExcelReport::default()
        .generate(
            &mut workbook,
            &input("tampere", actions(&long_description())),
            &store(),
        )
        .unwrap();
    assert_eq!(summary.sheets, vec!["Lead", "Actions", "Paginated actions"]);

    let bytes = workbook.save_to_buffer().unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn xlsx_report_with_more_pages_than_excel_breaks() {
    init_tracing();
    let mut table = ActionTable::new(["ID", "Name", "Description"])
        .with_field_label("identifier", "ID")
        .with_field_label("name", "Name")
        .with_field_label("description", "Description");
    for i in 0..1100 {
        let id = format!("{i}");
        table = table.add_row([Some(id.as_str()), Some("Action"), Some("One line")]);
    }

    let mut workbook = XlsxWorkbook::new();
    let summary = ExcelReport::default()
        .generate(&mut workbook, &input("oulu", table), &store())
        .unwrap();

    // one page per action
    assert_eq!(summary.paginated.unwrap().page_breaks.len(), 1099);
    assert_eq!(summary.sheets, vec!["Lead", "Actions", "Paginated actions"]);
    assert!(workbook.save_to_buffer().is_ok());
}

#[test]
fn malformed_plan_width_table_skips_paginated_sheet() {
    init_tracing();
    let store = CustomizationStore::from_json(
        r#"[
            {"max_columns": 4, "approximate_chars_per_line": 80,
             "approximate_lines_per_page": 60, "min_split_chars": 20,
             "width_needed": [[20, 1], [40, 2]]},
            {"plan": "espoo", "width_needed": "garbage"}
        ]"#,
    )
    .unwrap();

    let mut workbook = MemoryWorkbook::new();
    let summary = ExcelReport::default()
        .generate(&mut workbook, &input("espoo", actions("Short")), &store)
        .unwrap();

    assert!(summary.paginated.is_none());
    assert_eq!(workbook.sheet_names(), vec!["Lead", "Actions"]);
}

#[cfg(feature = "pdf")]
#[test]
fn print_preview_matches_sheet_pages() {
    use action_print_layout::{PreviewStyle, render_print_preview};

    let mut workbook = MemoryWorkbook::new();
    let paginated = write_action_summaries(
        &mut workbook,
        &actions(&long_description()),
        &tight_values(),
        &ReportLabels::default(),
    )
    .unwrap()
    .unwrap();

    let doc = render_print_preview(&paginated, &PreviewStyle::default()).unwrap();
    assert_eq!(doc.get_pages().len(), paginated.page_count());
}
