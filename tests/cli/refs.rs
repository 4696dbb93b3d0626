use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::{CliTest, run};

#[test]
fn test_refs_undefined_condition() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;

    let out = run(test.command().args(["refs", "some.condition.2"]))?;

    assert_eq!(out.code, Some(0), "stdout: {}", out.stdout);
    assert!(out.stdout.contains("condition \"some.condition.2\" (undefined)"));
    assert!(out.stdout.contains("--> resources/userInputSpec.xml:9:"));
    assert!(out.stdout.contains("[spec]"));
    assert!(out.stdout.contains("Found 1 reference to \"some.condition.2\""));
    Ok(())
}

#[test]
fn test_refs_defined_string_from_code() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;

    let out = run(
        test.command()
            .args(["refs", "some.string.1", "--kind", "strings"]),
    )?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains(
        "string \"some.string.1\" (defined at resources/langpacks/CustomLangPack.xml:3)"
    ));
    assert!(out.stdout.contains("--> src/com/sample/installer/Foo.java:14:"));
    assert!(out.stdout.contains("[code]"));
    assert!(!out.stdout.contains("condition \""));
    Ok(())
}

#[test]
fn test_refs_unknown_id() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;

    let out = run(test.command().args(["refs", "no.such.key"]))?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("No references to \"no.such.key\" found"));
    Ok(())
}

#[test]
fn test_refs_condition_from_code() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;

    assert_cmd_snapshot!(test.command().args(["refs", "some.condition.1"]));

    Ok(())
}
