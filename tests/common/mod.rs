// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use expense_tracker::ExpenseService;
use tempfile::TempDir;

/// Helper to create a test service backed by a file in a temporary directory
pub fn test_service() -> Result<(ExpenseService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = ExpenseService::open(temp_dir.path().join("data.json"));
    Ok((service, temp_dir))
}

/// Path of the expense file used by `test_service`
pub fn data_file(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("data.json")
}

/// Raw contents of the expense file
pub fn read_data(temp_dir: &TempDir) -> Result<String> {
    Ok(fs::read_to_string(data_file(temp_dir))?)
}

/// Test fixture: the three expenses used by the monthly summary examples
pub fn add_winter_expenses(service: &ExpenseService) -> Result<()> {
    service.add("groceries", 1000, "2024-01-15")?;
    service.add("rent share", 2000, "2024-02-01")?;
    service.add("snacks", 500, "2024-02-29")?;
    Ok(())
}
