use dashboard_core::layout::rows_are_consecutive;
use dashboard_core::render::{resolve_render_order, sort_modules, RenderPlan};
use dashboard_core::{
    paginate, ChartRegistry, DashboardValidator, LayoutError, ModuleConfig, ValidationError,
};
use serde_json::{json, Value};

fn validator() -> DashboardValidator {
    DashboardValidator::new(ChartRegistry::builtin())
}

fn module(name: &str, width: Value, row: Option<i64>) -> Value {
    let mut module = json!({
        "name": name,
        "guid": format!("{name}-0-0-0-0"),
        "family": "C3",
        "type": "bar",
        "width": width,
        "height": 240,
        "dataSource": format!("/data/{name}")
    });
    if let Some(row) = row {
        module["row"] = json!(row);
    }
    module
}

fn dashboard(layout: &str, modules: Vec<Value>) -> Value {
    json!({
        "id": "4f1a2b3c-1111-2222-3333-444455556666",
        "name": "Capacity",
        "layout": layout,
        "modules": modules
    })
}

#[test]
fn valid_grid_renders_two_rows() {
    let raw = dashboard(
        "grid",
        vec![
            module("cpu", json!("col-6"), Some(1)),
            module("mem", json!("col-6"), Some(1)),
            module("disk", json!("col-12"), Some(2)),
        ],
    );
    let document = validator().validate_value(&raw).unwrap();

    match resolve_render_order(&document) {
        RenderPlan::Rows(rows) => {
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].len(), 2);
            assert_eq!(rows[1].len(), 1);
            assert_eq!(rows[1][0].name, "disk");
        }
        other => panic!("expected row buckets, got {other:?}"),
    }
}

#[test]
fn freeform_with_row_is_a_layout_mismatch() {
    let raw = dashboard("freeform", vec![module("cpu", json!(300), Some(1))]);
    match validator().validate_value(&raw).unwrap_err() {
        ValidationError::Layout(errors) => {
            assert!(matches!(errors[0], LayoutError::RowInFreeform { index: 0, .. }));
        }
        other => panic!("expected layout error, got {other:?}"),
    }
}

#[test]
fn validated_documents_revalidate_unchanged() {
    let validator = validator();
    for raw in [
        dashboard("freeform", vec![module("cpu", json!("300"), None)]),
        dashboard(
            "grid",
            vec![
                module("cpu", json!("col-4"), Some(1)),
                module("mem", json!("col-8"), Some(2)),
            ],
        ),
        json!({"name": "bare", "modules": []}),
    ] {
        let first = validator.validate_value(&raw).unwrap();
        let again = validator
            .validate_value(&serde_json::to_value(&first).unwrap())
            .unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn width_forms_belong_to_exactly_one_layout() {
    let validator = validator();

    let pixels_freeform = dashboard("freeform", vec![module("a", json!(5), None)]);
    let pixels_grid = dashboard("grid", vec![module("a", json!(5), Some(1))]);
    assert!(validator.validate_value(&pixels_freeform).is_ok());
    assert!(validator.validate_value(&pixels_grid).is_err());

    let columns_freeform = dashboard("freeform", vec![module("a", json!("col-5"), None)]);
    let columns_grid = dashboard("grid", vec![module("a", json!("col-5"), Some(1))]);
    assert!(validator.validate_value(&columns_freeform).is_err());
    assert!(validator.validate_value(&columns_grid).is_ok());
}

#[test]
fn every_missing_field_is_reported() {
    let mut incomplete = module("cpu", json!(300), None);
    let object = incomplete.as_object_mut().unwrap();
    object.remove("dataSource");
    object.remove("height");

    let err = validator()
        .validate_value(&dashboard("freeform", vec![incomplete]))
        .unwrap_err();
    let fields: Vec<String> = err.field_messages().into_iter().map(|m| m.field).collect();
    assert!(fields.contains(&"modules.0.dataSource".to_string()));
    assert!(fields.contains(&"modules.0.height".to_string()));
}

#[test]
fn row_runs() {
    assert!(rows_are_consecutive(&[1, 2, 3]));
    assert!(rows_are_consecutive(&[1, 1, 2, 2, 3]));
    assert!(!rows_are_consecutive(&[1, 2, 4]));
    assert!(rows_are_consecutive(&[]));
}

#[test]
#[should_panic]
fn row_zero_is_an_internal_error() {
    let _ = rows_are_consecutive(&[0, 1]);
}

#[test]
fn missing_order_sorts_first() {
    let modules: Vec<ModuleConfig> = serde_json::from_value(json!([
        {"name": "two", "order": 2},
        {"name": "none"},
        {"name": "one", "order": 1}
    ]))
    .unwrap();
    let names: Vec<&str> = sort_modules(&modules)
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, vec!["none", "one", "two"]);
}

#[test]
fn pagination_boundaries() {
    let first = paginate(1000, Some(1), Some(30), 25);
    assert_eq!((first.skip, first.next_offset), (0, 30));

    assert!(paginate(0, Some(1), Some(30), 25).page_numbers.is_empty());
    assert_eq!(paginate(10, Some(1), Some(1), 25).per_page, 2);
}
