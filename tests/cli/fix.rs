use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::{CliTest, run};

const LANGPACK: &str = "resources/langpacks/CustomLangPack.xml";
const VARIABLES: &str = "izpack/variables.xml";

#[test]
fn test_fix_dry_run_changes_nothing() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;
    let langpack_before = test.read_file(LANGPACK)?;
    let variables_before = test.read_file(VARIABLES)?;

    assert_cmd_snapshot!(test.fix_command());

    assert_eq!(test.read_file(LANGPACK)?, langpack_before);
    assert_eq!(test.read_file(VARIABLES)?, variables_before);
    Ok(())
}

#[test]
fn test_fix_apply_inserts_stubs() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;

    let out = run(test.fix_command().arg("--apply"))?;

    assert_eq!(out.code, Some(0), "stdout: {}\nstderr: {}", out.stdout, out.stderr);
    assert!(out.stdout.contains("Inserted"));

    let langpack = test.read_file(LANGPACK)?;
    assert!(langpack.contains("  <str id=\"some.string.4\" txt=\"some.string.4\"/>\n"));
    assert!(langpack.trim_end().ends_with("</langpack>"));

    let variables = test.read_file(VARIABLES)?;
    assert!(variables.contains("  <variable name=\"some.other.undefined.var\" value=\"\"/>\n"));

    // The inserted stubs define every key that was missing.
    let out = run(test.check_command().args(["strings", "variables"]))?;
    assert_eq!(out.code, Some(0), "stdout: {}", out.stdout);
    assert!(out.stdout.contains("no issues found"));

    // Nothing left to do.
    let out = run(&mut test.fix_command())?;
    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("No undefined strings or variables"));
    Ok(())
}

#[test]
fn test_fix_refuses_malformed_specs() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;
    test.write_file(LANGPACK, "<langpack>\n  <str id=\"a\" txt=\"A\">\n</langpack>\n")?;

    let out = run(test.fix_command().arg("--apply"))?;

    assert_eq!(out.code, Some(2));
    assert!(out.stdout.contains("parse-error"));
    assert_eq!(
        test.read_file(LANGPACK)?,
        "<langpack>\n  <str id=\"a\" txt=\"A\">\n</langpack>\n"
    );
    Ok(())
}
