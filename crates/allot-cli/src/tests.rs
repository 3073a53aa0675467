//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use allot_core::catalog::ids;
use allot_core::{BudgetConfig, BudgetLedger, CategoryCatalog};
use tempfile::TempDir;

use crate::commands::{self, money, truncate, Workspace};

fn setup_workspace() -> (TempDir, Workspace) {
    let dir = TempDir::new().unwrap();
    let ws = Workspace::new(
        &dir.path().join("allot.json"),
        BudgetConfig::default(),
        CategoryCatalog::builtin().unwrap(),
    );
    (dir, ws)
}

fn setup_with_plan(income: f64) -> (TempDir, Workspace) {
    let (dir, ws) = setup_workspace();
    commands::cmd_plan(&ws, income, true).unwrap();
    (dir, ws)
}

fn ledger(ws: &Workspace) -> BudgetLedger {
    ws.open_ledger().unwrap()
}

// ========== Plan Command Tests ==========

#[test]
fn test_cmd_plan_without_save() {
    let (_dir, ws) = setup_workspace();
    commands::cmd_plan(&ws, 5_000.0, false).unwrap();
    assert!(!ws.ledger_path.exists());
}

#[test]
fn test_cmd_plan_save() {
    let (_dir, ws) = setup_with_plan(5_000.0);

    let ledger = ledger(&ws);
    assert_eq!(ledger.income(), 5_000.0);
    assert!(ledger.contains(ids::HOUSING));
    assert!(ledger.total_allocated() <= 4_500.0 + 1e-6);
}

#[test]
fn test_cmd_plan_rejects_invalid_income() {
    let (_dir, ws) = setup_workspace();
    assert!(commands::cmd_plan(&ws, -100.0, true).is_err());
    assert!(commands::cmd_plan(&ws, f64::NAN, true).is_err());
    assert!(!ws.ledger_path.exists());
}

// ========== Optimize Command Tests ==========

#[test]
fn test_cmd_optimize_requires_ledger() {
    let (_dir, ws) = setup_workspace();
    let err = commands::cmd_optimize(&ws, &[], false).unwrap_err();
    assert!(err.to_string().contains("No ledger"));
}

#[test]
fn test_cmd_optimize_list_only_leaves_ledger() {
    let (_dir, ws) = setup_with_plan(5_000.0);
    let before = ledger(&ws);

    commands::cmd_optimize(&ws, &[], false).unwrap();
    assert_eq!(ledger(&ws), before);
}

#[test]
fn test_cmd_optimize_apply_selected() {
    let (_dir, ws) = setup_with_plan(5_000.0);

    // First suggestion is the emergency savings increase
    commands::cmd_optimize(&ws, &[1], false).unwrap();

    let ledger = ledger(&ws);
    assert_eq!(ledger.get(ids::EMERGENCY_SAVINGS).unwrap().allocated_amount, 600.0);
    assert!(!ledger.contains(ids::ENTERTAINMENT));
}

#[test]
fn test_cmd_optimize_apply_all_twice() {
    let (_dir, ws) = setup_with_plan(5_000.0);

    commands::cmd_optimize(&ws, &[], true).unwrap();
    let once = ledger(&ws);
    assert!(once.contains(ids::ENTERTAINMENT));
    assert!(once.contains(ids::GIFTS));

    commands::cmd_optimize(&ws, &[], true).unwrap();
    let twice = ledger(&ws);
    assert!(twice.contains(ids::VACATION));
    assert_eq!(
        twice.get(ids::EMERGENCY_SAVINGS).unwrap().allocated_amount,
        once.get(ids::EMERGENCY_SAVINGS).unwrap().allocated_amount
    );
}

#[test]
fn test_cmd_optimize_bad_number() {
    let (_dir, ws) = setup_with_plan(5_000.0);
    let before = ledger(&ws);

    assert!(commands::cmd_optimize(&ws, &[9], false).is_err());
    assert!(commands::cmd_optimize(&ws, &[0], false).is_err());
    assert_eq!(ledger(&ws), before);
}

#[test]
fn test_select_marks_numbers() {
    let catalog = CategoryCatalog::builtin().unwrap();
    let suggestions = allot_core::OptimizationEngine::default().generate_optimizations(
        &[],
        3_000.0,
        &catalog,
    );

    let selected = commands::select(suggestions.clone(), &[2, 4], false).unwrap();
    let flags: Vec<bool> = selected.iter().map(|s| s.selected).collect();
    assert_eq!(flags, vec![false, true, false, true, false]);

    let all = commands::select(suggestions, &[], true).unwrap();
    assert!(all.iter().all(|s| s.selected));
}

// ========== Ledger Command Tests ==========

#[test]
fn test_cmd_ledger_show() {
    let (_dir, ws) = setup_with_plan(4_000.0);
    assert!(commands::cmd_ledger_show(&ws, false).is_ok());
    assert!(commands::cmd_ledger_show(&ws, true).is_ok());
}

#[test]
fn test_cmd_ledger_toggle_round_trip() {
    let (_dir, ws) = setup_with_plan(5_000.0);
    let amount = ledger(&ws).get(ids::GROCERIES).unwrap().allocated_amount;

    commands::cmd_ledger_toggle(&ws, ids::GROCERIES).unwrap();
    assert!(!ledger(&ws).get(ids::GROCERIES).unwrap().is_active);

    commands::cmd_ledger_toggle(&ws, ids::GROCERIES).unwrap();
    let groceries = ledger(&ws).get(ids::GROCERIES).unwrap().clone();
    assert!(groceries.is_active);
    assert_eq!(groceries.allocated_amount, amount);
}

#[test]
fn test_cmd_ledger_set_and_spent() {
    let (_dir, ws) = setup_with_plan(5_000.0);

    commands::cmd_ledger_set(&ws, ids::GROCERIES, 640.0).unwrap();
    commands::cmd_ledger_spent(&ws, ids::GROCERIES, 700.0).unwrap();

    let groceries = ledger(&ws).get(ids::GROCERIES).unwrap().clone();
    assert_eq!(groceries.allocated_amount, 640.0);
    assert_eq!(groceries.remaining(), -60.0);
}

#[test]
fn test_cmd_ledger_set_invalid() {
    let (_dir, ws) = setup_with_plan(5_000.0);
    assert!(commands::cmd_ledger_set(&ws, ids::GROCERIES, -5.0).is_err());
    assert!(commands::cmd_ledger_set(&ws, "no_such_category", 5.0).is_err());
}

#[test]
fn test_cmd_ledger_add_and_delete_custom() {
    let (_dir, ws) = setup_with_plan(5_000.0);

    commands::cmd_ledger_add(&ws, "Pet Care", 150.0, "family").unwrap();
    let added = ledger(&ws);
    let pets = added.get("custom_pet_care").unwrap();
    assert_eq!(pets.allocated_amount, 150.0);
    assert_eq!(
        added.custom_category("custom_pet_care").unwrap().allocation_percentage,
        0.03
    );

    commands::cmd_ledger_delete(&ws, "custom_pet_care").unwrap();
    assert!(!ledger(&ws).contains("custom_pet_care"));
}

#[test]
fn test_cmd_ledger_add_unknown_type() {
    let (_dir, ws) = setup_with_plan(5_000.0);
    assert!(commands::cmd_ledger_add(&ws, "Boat", 100.0, "yachts").is_err());
}

#[test]
fn test_cmd_ledger_delete_essential_refused() {
    let (_dir, ws) = setup_with_plan(5_000.0);

    let err = commands::cmd_ledger_delete(&ws, ids::HOUSING).unwrap_err();
    assert!(err.to_string().contains("Essential"));
    assert!(ledger(&ws).contains(ids::HOUSING));
}

#[test]
fn test_cmd_ledger_income() {
    let (_dir, ws) = setup_with_plan(5_000.0);

    commands::cmd_ledger_income(&ws, 6_000.0).unwrap();
    assert_eq!(ledger(&ws).income(), 6_000.0);
    assert!(commands::cmd_ledger_income(&ws, f64::INFINITY).is_err());
}

#[test]
fn test_corrupt_ledger_file() {
    let (_dir, ws) = setup_workspace();
    std::fs::write(&ws.ledger_path, "{ not json").unwrap();

    let err = commands::cmd_ledger_show(&ws, false).unwrap_err();
    assert!(err.to_string().contains("Failed to parse ledger"));
}

// ========== Afford Command Tests ==========

#[test]
fn test_cmd_afford_with_income() {
    let (_dir, ws) = setup_workspace();
    assert!(commands::cmd_afford(&ws, ids::HOME, Some(8_000.0), None).is_ok());
    assert!(commands::cmd_afford(&ws, "car", Some(5_000.0), Some(400.0)).is_ok());
}

#[test]
fn test_cmd_afford_uses_ledger_income() {
    let (_dir, ws) = setup_with_plan(5_000.0);
    assert!(commands::cmd_afford(&ws, ids::GROCERIES, None, None).is_ok());
}

#[test]
fn test_cmd_afford_custom_category_from_ledger() {
    let (_dir, ws) = setup_with_plan(5_000.0);
    commands::cmd_ledger_add(&ws, "Pet Care", 150.0, "family").unwrap();
    assert!(commands::cmd_afford(&ws, "custom_pet_care", None, None).is_ok());
}

#[test]
fn test_cmd_afford_errors() {
    let (_dir, ws) = setup_workspace();
    assert!(commands::cmd_afford(&ws, ids::HOME, None, None).is_err());
    assert!(commands::cmd_afford(&ws, "spaceship", Some(5_000.0), None).is_err());
    assert!(commands::cmd_afford(&ws, ids::HOME, Some(-1.0), None).is_err());
}

// ========== Debt Command Tests ==========

#[test]
fn test_cmd_debt_fixed_payment() {
    let (_dir, ws) = setup_workspace();
    assert!(commands::cmd_debt(&ws, 10_000.0, 18.0, Some(300.0), None, true).is_ok());
}

#[test]
fn test_cmd_debt_never_pays_off() {
    let (_dir, ws) = setup_workspace();
    assert!(commands::cmd_debt(&ws, 10_000.0, 18.0, Some(100.0), None, false).is_ok());
}

#[test]
fn test_cmd_debt_target_date() {
    let (_dir, ws) = setup_workspace();
    assert!(commands::cmd_debt(&ws, 5_000.0, 0.0, None, Some("2030-01-01"), false).is_ok());
}

#[test]
fn test_cmd_debt_invalid_input() {
    let (_dir, ws) = setup_workspace();
    assert!(commands::cmd_debt(&ws, 5_000.0, 5.0, None, None, false).is_err());
    assert!(commands::cmd_debt(&ws, 5_000.0, 5.0, None, Some("01/02/2030"), false).is_err());
    assert!(commands::cmd_debt(&ws, -5.0, 5.0, Some(100.0), None, false).is_err());
}

// ========== Helper Tests ==========

#[test]
fn test_parse_date() {
    let date = commands::parse_date("2027-03-31").unwrap();
    assert_eq!(date, chrono::NaiveDate::from_ymd_opt(2027, 3, 31).unwrap());
    assert!(commands::parse_date("2027-02-30").is_err());
}

#[test]
fn test_validate_amount() {
    assert_eq!(commands::validate_amount("x", 12.5).unwrap(), 12.5);
    assert!(commands::validate_amount("x", -0.01).is_err());
    assert!(commands::validate_amount("x", f64::NAN).is_err());
}

#[test]
fn test_money() {
    assert_eq!(money(0.0), "$0.00");
    assert_eq!(money(1_234.5), "$1,234.50");
    assert_eq!(money(1_000_000.0), "$1,000,000.00");
    assert_eq!(money(-60.0), "-$60.00");
    assert_eq!(money(999.999), "$1,000.00");
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a much longer name", 10), "a much ...");
    assert_eq!(truncate("émergency fund", 5), "ém...");
}
