use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::{CliTest, minimal_installer, run};

#[test]
fn test_sample_installer_reports_errors() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_check_conditions_only() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;

    let out = run(test.check_command().arg("conditions"))?;

    assert_eq!(out.code, Some(1));
    for key in [
        "some.condition.1",
        "some.condition.2",
        "myinstallerclass.condition",
    ] {
        assert!(
            out.stdout
                .contains(&format!("error: \"{}\"  undefined-condition", key)),
            "missing {} in:\n{}",
            key,
            out.stdout
        );
    }
    assert!(!out.stdout.contains("undefined-string"));
    assert!(out.stdout.contains("3 problems (3 errors, 0 warnings)"));
    Ok(())
}

#[test]
fn test_check_dependencies() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;

    assert_cmd_snapshot!(test.check_command().arg("dependencies"));

    Ok(())
}

#[test]
fn test_check_unused_is_warning_only() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;

    let out = run(test.check_command().arg("unused"))?;

    assert_eq!(out.code, Some(0), "warnings alone must not fail the check");
    assert!(out.stdout.contains("warning: \"unused.condition\"  unused-condition"));
    assert!(out.stdout.contains("warning: \"db.driver\"  unused-variable"));
    assert!(out.stdout.contains("2 problems (0 errors, 2 warnings)"));
    Ok(())
}

#[test]
fn test_clean_installer() -> Result<()> {
    let test = CliTest::new()?;
    minimal_installer(
        &test,
        r#"<conditions>
  <condition type="java" id="is.unix">
    <java><class>com.izforge.izpack.util.OsVersion</class><field>IS_UNIX</field></java>
    <returnvalue type="boolean">true</returnvalue>
  </condition>
</conditions>
"#,
        r#"<langpack>
  <str id="title" txt="Title"/>
</langpack>
"#,
    )?;

    let out = run(test.check_command().args(["conditions", "strings", "dependencies"]))?;

    assert_eq!(out.code, Some(0), "stdout: {}", out.stdout);
    assert!(out.stdout.contains("no issues found"));
    Ok(())
}

#[test]
fn test_malformed_spec_is_parse_error() -> Result<()> {
    let test = CliTest::new()?;
    minimal_installer(
        &test,
        "<conditions>\n  <condition id=\"broken\">\n</conditions>\n",
        "<langpack>\n</langpack>\n",
    )?;

    let out = run(test.check_command().arg("conditions"))?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("parse-error"));
    assert!(out.stdout.contains("--> izpack/conditions.xml"));
    assert!(out.stderr.contains("could not be parsed"));
    Ok(())
}

#[test]
fn test_missing_install_spec_is_internal_error() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("izpack/conditions.xml", "<conditions/>")?;

    let out = run(&mut test.check_command())?;

    assert_eq!(out.code, Some(2));
    assert!(out.stderr.starts_with("Error: "));
    assert!(out.stderr.contains("install.xml"));
    Ok(())
}

#[test]
fn test_specs_path_argument() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;
    std::fs::rename(test.root().join("izpack"), test.root().join("specs"))?;

    let out = run(&mut test.check_command())?;
    assert_eq!(out.code, Some(2));

    let out = run(test.check_command().args(["conditions", "--specs-path", "specs"]))?;
    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("--> specs/"));
    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let out = run(test.command().arg("--help"))?;

    assert_eq!(out.code, Some(0));
    for command in ["check", "refs", "list", "fix", "init"] {
        assert!(out.stdout.contains(command));
    }
    Ok(())
}

#[test]
fn test_config_found_from_subdirectory() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;

    let mut cmd = test.check_command();
    cmd.arg("conditions").current_dir(test.root().join("izpack"));
    let out = run(&mut cmd)?;

    assert_eq!(out.code, Some(1), "stderr: {}", out.stderr);
    let mut settings = insta::Settings::clone_current();
    settings.add_filter(&regex::escape(&test.root().display().to_string()), "[ROOT]");
    settings.bind(|| insta::assert_snapshot!(out.stdout));
    Ok(())
}

#[test]
fn test_blank_source_argument() -> Result<()> {
    let test = CliTest::with_fixture("sample_installer")?;

    let out = run(test.check_command().args(["--source", ""]))?;

    assert_eq!(out.code, Some(2));
    assert_eq!(
        out.stderr,
        "Error: invalid arguments: --source must name a directory\n"
    );
    Ok(())
}
