//! Native toolchain invocation.
//!
//! Configuration comes from the environment:
//!
//! | Variable       | Meaning                                           |
//! |----------------|---------------------------------------------------|
//! | `SEMI_CC`      | C compiler executable (default `cc`)              |
//! | `SEMI_CC_ARGS` | extra whitespace-separated compiler arguments     |
//! | `SEMI_KEEP_C`  | truthy: keep a copy of the C source as `<out>.c`  |

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

/// Builds emitted C into a native executable.
pub trait Toolchain {
    /// Build `c_source` into `output`, returning the toolchain's exit status.
    fn build(&self, c_source: &str, output: &Path) -> Result<i32>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainConfig {
    pub cc: OsString,
    pub cc_args: Vec<String>,
    pub keep_c: bool,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            cc: OsString::from("cc"),
            cc_args: Vec::new(),
            keep_c: false,
        }
    }
}

impl ToolchainConfig {
    pub fn from_env() -> Self {
        let cc = std::env::var_os("SEMI_CC").unwrap_or_else(|| OsString::from("cc"));
        let cc_args = std::env::var("SEMI_CC_ARGS")
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let keep_c = std::env::var("SEMI_KEEP_C")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);
        Self { cc, cc_args, keep_c }
    }
}

fn is_truthy(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    !(v.is_empty() || v == "0" || v == "false" || v == "no" || v == "off")
}

/// The system C compiler.
#[derive(Debug, Clone, Default)]
pub struct CcToolchain {
    pub config: ToolchainConfig,
}

impl CcToolchain {
    pub fn new(config: ToolchainConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(ToolchainConfig::from_env())
    }

    /// Where the C source is kept for `output`, if keeping is enabled.
    pub fn kept_source_path(&self, output: &Path) -> Option<PathBuf> {
        self.config.keep_c.then(|| {
            let mut name = output.as_os_str().to_os_string();
            name.push(".c");
            PathBuf::from(name)
        })
    }

    /// The command line used to build `source` into `output`.
    pub fn command(&self, source: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.config.cc);
        cmd.arg("-std=c99");
        cmd.arg(source);
        cmd.arg("-o");
        cmd.arg(output);
        cmd.args(&self.config.cc_args);
        cmd
    }
}

impl Toolchain for CcToolchain {
    fn build(&self, c_source: &str, output: &Path) -> Result<i32> {
        let dir = tempfile::Builder::new()
            .prefix("semic-")
            .tempdir()
            .context("create temp dir")?;
        let source = dir.path().join("main.c");
        std::fs::write(&source, c_source)
            .with_context(|| format!("write C source: {}", source.display()))?;

        if let Some(kept) = self.kept_source_path(output) {
            std::fs::write(&kept, c_source)
                .with_context(|| format!("write C source: {}", kept.display()))?;
        }

        let status = self
            .command(&source, output)
            .status()
            .with_context(|| format!("invoke cc: {:?}", self.config.cc))?;
        Ok(status.code().unwrap_or(1))
    }
}
