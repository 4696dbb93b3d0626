use anyhow::Result;

use crate::{CliTest, run};

#[test]
fn test_list_conditions() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;

    let out = run(test.command().args(["list", "conditions"]))?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    let lines: Vec<&str> = out.stdout.lines().collect();
    assert_eq!(lines.len(), 10);
    assert!(lines[0].starts_with("db.is.h2 "));
    assert!(lines[0].ends_with("izpack/conditions.xml:7"));
    assert_eq!(lines[9], "9 conditions defined");
    Ok(())
}

#[test]
fn test_list_strings_skips_entries_without_text() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;

    let out = run(test.command().args(["list", "strings"]))?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("some.string.3"));
    assert!(!out.stdout.contains("incomplete.string"));
    assert!(out.stdout.ends_with("6 strings defined\n"));
    Ok(())
}

#[test]
fn test_list_variables_includes_dynamic() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;

    let out = run(test.command().args(["list", "variables"]))?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("izpack/dynamic_variables.xml:3"));
    assert!(out.stdout.ends_with("4 variables defined\n"));
    Ok(())
}

#[test]
fn test_list_classes() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;

    let out = run(test.command().args(["list", "classes"]))?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("com.sample.installer.Foo"));
    assert!(out.stdout.ends_with("2 classes defined\n"));
    Ok(())
}
