use std::fs;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, run};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let out = run(test.command().arg("init"))?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("Created .izverifyrc.json"));

    let content = test.read_file(".izverifyrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    for field in ["specsPath", "resourcesPath", "pom", "sources", "langpack", "whiteList"] {
        assert!(parsed.get(field).is_some(), "Config should have '{}' field", field);
    }
    assert!(content.contains("\n  \"specsPath\""), "2-space indentation");
    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".izverifyrc.json", "{}")?;

    let out = run(test.command().arg("init"))?;

    assert_eq!(out.code, Some(1));
    assert!(out.stderr.contains(".izverifyrc.json already exists"));
    assert_eq!(test.read_file(".izverifyrc.json")?, "{}");
    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;
    fs::remove_file(test.root().join(".izverifyrc.json"))?;

    let out = run(test.command().arg("init"))?;
    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("sources: src"));

    let out = run(test.check_command().arg("unused"))?;
    assert_eq!(
        out.code,
        Some(0),
        "check should work with the generated config. stderr: {}",
        out.stderr
    );
    assert!(out.stdout.contains("unused-variable"));
    Ok(())
}
