use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Result};
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;
use walkdir::WalkDir;

mod errors;
mod generate;

const BIN_NAME: &str = "span";

/// The worked example: three sizes, two modes, and a width/height pair bound
/// together, twelve files in all.
pub const SIMULATION_TOML: &str = r#"id = 42
size = [5, 10, 200]
width = [640, 800]
height = [480, 600]

[simulation]
mode = ["normal", "crazy"]

[output]
dir = "data/{width}x{height}_{size|%03d}_{simulation.mode}{id}.dat"
"#;

pub const SIMULATION_OUTPUT: &str = "out/{simulation.mode}/{width}x{height}_{size|%03d}.toml";

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

    pub fn with_file(path: &str, content: &str) -> Result<Self> {
        let test = Self::new()?;
        test.write_file(path, content)?;
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

    /// Run the binary with `args`, returning its captured output.
    pub fn run(&self, args: &[&str]) -> Result<Output> {
        self.command()
            .args(args)
            .output()
            .context("Failed to run span")
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }

    /// Relative paths of every file under `dir`, sorted.
    pub fn list_files(&self, dir: &str) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(self.project_dir.join(dir))
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|e| e.file_type().is_file())
        {
            let relative = entry.path().strip_prefix(&self.project_dir)?;
            files.push(relative.to_string_lossy().replace('\\', "/"));
        }
        files.sort();
        Ok(files)
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
