use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;
use walkdir::WalkDir;

mod check;
mod fix;
mod init;
mod list;
mod refs;

const BIN_NAME: &str = "izverify";

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    /// Copy of `tests/fixtures/<name>` in a fresh temp directory.
    pub fn with_fixture(name: &str) -> Result<Self> {
        let test = Self::new()?;
        let fixture = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name);

        for entry in WalkDir::new(&fixture) {
            let entry = entry?;
            let relative = entry.path().strip_prefix(&fixture)?;
            let target = test.project_dir.join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                fs::copy(entry.path(), &target)
                    .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
            }
        }
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn check_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("check");
        cmd
    }

    pub fn fix_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("fix");
        cmd
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }
}

/// Exit code and stdout/stderr of a finished command.
pub struct Run {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

pub fn run(cmd: &mut Command) -> Result<Run> {
    let Output {
        status,
        stdout,
        stderr,
    } = cmd.output()?;
    Ok(Run {
        code: status.code(),
        stdout: String::from_utf8(stdout)?,
        stderr: String::from_utf8(stderr)?,
    })
}

/// Minimal installer: install.xml, a langpack and the given conditions.
pub fn minimal_installer(test: &CliTest, conditions: &str, langpack: &str) -> Result<()> {
    test.write_file(
        "izpack/install.xml",
        r#"<installation version="5.0">
  <conditions>
    <xi:include xmlns:xi="http://www.w3.org/2001/XInclude" href="conditions.xml"/>
  </conditions>
  <resources>
    <xi:include xmlns:xi="http://www.w3.org/2001/XInclude" href="resources.xml"/>
  </resources>
</installation>
"#,
    )?;
    test.write_file(
        "izpack/resources.xml",
        r#"<xfragment>
  <res id="CustomLangPack.xml_eng" src="langpacks/eng.xml"/>
</xfragment>
"#,
    )?;
    test.write_file("izpack/conditions.xml", conditions)?;
    test.write_file("resources/langpacks/eng.xml", langpack)?;
    Ok(())
}
