//! Incremental recalculation, cycles, and removal

use pretty_assertions::assert_eq;
use sheetcalc::{
    CellAddress, CellOutcome, ErrorKind, EvaluationOptions, MissingCellPolicy, RecalcReport, Sheet,
    Value,
};

fn get(sheet: &Sheet, id: &str) -> CellOutcome {
    sheet.get_cell(id).unwrap()
}

fn number(n: f64) -> CellOutcome {
    CellOutcome {
        value: Value::Number(n),
        error: None,
    }
}

fn failed(kind: ErrorKind) -> CellOutcome {
    CellOutcome {
        value: Value::Null,
        error: Some(kind),
    }
}

fn addr(id: &str) -> CellAddress {
    id.parse().unwrap()
}

#[test]
fn test_reference_is_evaluated() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "10").unwrap();
    sheet.set_cell("B1", "=A1*2").unwrap();

    assert_eq!(get(&sheet, "B1"), number(20.0));
}

#[test]
fn test_mutual_reference_is_circular() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "=B1").unwrap();
    let report = sheet.set_cell("B1", "=A1").unwrap();

    assert_eq!(get(&sheet, "A1"), failed(ErrorKind::Ref));
    assert_eq!(get(&sheet, "B1"), failed(ErrorKind::Ref));
    assert_eq!(report.circular, [addr("A1"), addr("B1")]);
}

#[test]
fn test_division_by_zero() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "=1/0").unwrap();

    assert_eq!(get(&sheet, "A1"), failed(ErrorKind::DivZero));
}

#[test]
fn test_dependent_is_recalculated() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "5").unwrap();
    sheet.set_cell("B1", "=A1+1").unwrap();
    sheet.set_cell("A1", "7").unwrap();

    assert_eq!(get(&sheet, "B1").value, Value::Number(8.0));
}

#[test]
fn test_range_dependents_are_recalculated() {
    let mut sheet = Sheet::new();
    sheet.set_cell("B1", "1").unwrap();
    sheet.set_cell("B2", "2").unwrap();
    sheet.set_cell("B3", "3").unwrap();
    sheet.set_cell("A1", "=SUM(B1:B3)").unwrap();
    assert_eq!(get(&sheet, "A1").value, Value::Number(6.0));

    sheet.set_cell("B2", "10").unwrap();
    assert_eq!(get(&sheet, "A1").value, Value::Number(14.0));
}

#[test]
fn test_formula_set_before_its_inputs() {
    let mut sheet = Sheet::new();
    sheet.set_cell("C1", "=A1+B1").unwrap();
    assert_eq!(get(&sheet, "C1"), number(0.0));

    sheet.set_cell("A1", "2").unwrap();
    sheet.set_cell("B1", "3").unwrap();
    assert_eq!(get(&sheet, "C1"), number(5.0));
}

#[test]
fn test_chain_is_refreshed_in_order() {
    // D1 reads both the root and a cell further down the chain, so
    // evaluating it before C1 would read a stale value
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "1").unwrap();
    sheet.set_cell("B1", "=A1+1").unwrap();
    sheet.set_cell("C1", "=B1*10").unwrap();
    sheet.set_cell("D1", "=A1+C1").unwrap();
    assert_eq!(get(&sheet, "D1"), number(21.0));

    let report = sheet.set_cell("A1", "2").unwrap();
    assert_eq!(get(&sheet, "D1"), number(32.0));
    assert_eq!(report.evaluated, 3);
}

#[test]
fn test_errors_propagate_and_recover() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "0").unwrap();
    sheet.set_cell("B1", "=10/A1").unwrap();
    sheet.set_cell("C1", "=B1+1").unwrap();
    assert_eq!(get(&sheet, "C1"), failed(ErrorKind::DivZero));

    sheet.set_cell("A1", "5").unwrap();
    assert_eq!(get(&sheet, "B1"), number(2.0));
    assert_eq!(get(&sheet, "C1"), number(3.0));
}

#[test]
fn test_self_reference() {
    let mut sheet = Sheet::new();
    let report = sheet.set_cell("A1", "=A1+1").unwrap();

    assert_eq!(get(&sheet, "A1"), failed(ErrorKind::Ref));
    assert_eq!(report.circular, [addr("A1")]);
}

#[test]
fn test_longer_cycle_marks_every_member() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "=B1+1").unwrap();
    sheet.set_cell("B1", "=C1+1").unwrap();
    sheet.set_cell("C1", "=A1+1").unwrap();

    for id in ["A1", "B1", "C1"] {
        assert_eq!(get(&sheet, id), failed(ErrorKind::Ref), "{id}");
    }
}

#[test]
fn test_cells_downstream_of_a_cycle_see_ref() {
    let mut sheet = Sheet::new();
    sheet.set_cell("D1", "=A1*2").unwrap();
    sheet.set_cell("A1", "=B1").unwrap();
    sheet.set_cell("B1", "=A1").unwrap();

    assert_eq!(get(&sheet, "D1"), failed(ErrorKind::Ref));
}

#[test]
fn test_breaking_a_cycle_recovers() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "=B1").unwrap();
    sheet.set_cell("B1", "=A1").unwrap();
    sheet.set_cell("C1", "=A1+1").unwrap();

    sheet.set_cell("B1", "4").unwrap();
    assert_eq!(get(&sheet, "A1"), number(4.0));
    assert_eq!(get(&sheet, "B1"), number(4.0));
    assert_eq!(get(&sheet, "C1"), number(5.0));
}

#[test]
fn test_unrelated_cells_untouched_by_cycle() {
    let mut sheet = Sheet::new();
    sheet.set_cell("X1", "1").unwrap();
    sheet.set_cell("X2", "=X1+1").unwrap();
    sheet.set_cell("A1", "=B1").unwrap();
    sheet.set_cell("B1", "=A1").unwrap();

    assert_eq!(get(&sheet, "X2"), number(2.0));
}

#[test]
fn test_removed_cell_becomes_ref_for_readers() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "3").unwrap();
    sheet.set_cell("B1", "=A1*2").unwrap();
    sheet.set_cell("C1", "=B1+1").unwrap();

    let report = sheet.remove_cell("A1").unwrap();
    assert_eq!(get(&sheet, "A1"), CellOutcome::default());
    assert_eq!(get(&sheet, "B1"), failed(ErrorKind::Ref));
    assert_eq!(get(&sheet, "C1"), failed(ErrorKind::Ref));
    assert_eq!(report.errors, 2);

    sheet.set_cell("A1", "4").unwrap();
    assert_eq!(get(&sheet, "C1"), number(9.0));
}

#[test]
fn test_removed_cell_nobody_reads_is_forgotten() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "3").unwrap();
    sheet.remove_cell("A1").unwrap();

    sheet.set_cell("B1", "=A1+1").unwrap();
    assert_eq!(get(&sheet, "B1"), number(1.0));
}

#[test]
fn test_removed_cell_forgotten_once_last_reader_moves_on() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "3").unwrap();
    sheet.set_cell("B1", "=A1*2").unwrap();
    sheet.remove_cell("A1").unwrap();

    // B1 still reads A1, so a new reader sees the removal too
    sheet.set_cell("C1", "=A1").unwrap();
    assert_eq!(get(&sheet, "C1"), failed(ErrorKind::Ref));

    sheet.set_cell("B1", "5").unwrap();
    sheet.set_cell("C1", "6").unwrap();
    sheet.set_cell("D1", "=A1+1").unwrap();
    assert_eq!(get(&sheet, "D1"), number(1.0));

    let before = sheet.snapshot();
    sheet.recalculate_all();
    assert_eq!(sheet.snapshot(), before);
}

#[test]
fn test_removing_unknown_cell_is_noop() {
    let mut sheet = Sheet::new();
    let report = sheet.remove_cell("Z9").unwrap();
    assert_eq!(report, RecalcReport::default());
}

#[test]
fn test_edited_formula_drops_stale_edges() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "1").unwrap();
    sheet.set_cell("A2", "2").unwrap();
    sheet.set_cell("B1", "=A1").unwrap();
    sheet.set_cell("B1", "=A2").unwrap();

    let report = sheet.set_cell("A1", "100").unwrap();
    assert_eq!(report.evaluated, 0);
    assert_eq!(get(&sheet, "B1"), number(2.0));

    let snapshot = sheet.snapshot();
    let b1 = snapshot.iter().find(|cell| cell.id == "B1").unwrap();
    assert_eq!(b1.dependencies, ["A2"]);
}

#[test]
fn test_not_available_policy() {
    let options = EvaluationOptions {
        missing_cells: MissingCellPolicy::NotAvailable,
        ..EvaluationOptions::default()
    };
    let mut sheet = Sheet::new().with_options(options);
    sheet.set_cell("B1", "=A1+1").unwrap();
    assert_eq!(get(&sheet, "B1"), failed(ErrorKind::NotAvailable));

    sheet.set_cell("A1", "1").unwrap();
    assert_eq!(get(&sheet, "B1"), number(2.0));
}

#[test]
fn test_provider_supplies_unmanaged_cells() {
    let mut sheet = Sheet::new().with_provider(|row: u32, col: u16| match (row, col) {
        (0, 0) => Some(Value::text("41")),
        _ => None,
    });
    sheet.set_cell("B1", "=A1+1").unwrap();
    assert_eq!(get(&sheet, "B1"), number(42.0));

    // A cell the sheet holds wins over the provider
    sheet.set_cell("A1", "1").unwrap();
    assert_eq!(get(&sheet, "B1"), number(2.0));
}

#[test]
fn test_recalculate_all_matches_incremental() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "2").unwrap();
    sheet.set_cell("A2", "=A1^2").unwrap();
    sheet.set_cell("A3", "=SUM(A1:A2)").unwrap();
    sheet.set_cell("B1", "=B2").unwrap();
    sheet.set_cell("B2", "=B1").unwrap();
    let before = sheet.snapshot();

    let report = sheet.recalculate_all();
    assert_eq!(sheet.snapshot(), before);
    assert_eq!(report.evaluated, 2);
    assert_eq!(report.circular, [addr("B1"), addr("B2")]);
}

#[test]
fn test_recalculation_is_idempotent() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "3").unwrap();
    sheet.set_cell("B1", "=A1*A1").unwrap();
    let first = get(&sheet, "B1");

    sheet.set_cell("A1", "3").unwrap();
    assert_eq!(get(&sheet, "B1"), first);
}
