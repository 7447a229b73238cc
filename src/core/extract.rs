//! Drawing/BOM text extraction through an external program
//!
//! Extraction is delegated to a command-line tool (by default `pdftotext`).
//! The input path is passed as a separate argument, never through a shell.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Errors raised by external collaborators
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Input file not found: {0}")]
    MissingInput(PathBuf),

    #[error("Extraction command is empty")]
    EmptyCommand,

    #[error("'{program}' is not installed or not in PATH")]
    NotInstalled { program: String },

    #[error("Text extraction failed: {message}")]
    Failed { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can turn a drawing or BOM file into plain text
pub trait TextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ServiceError>;
}

/// Runs an external program and captures its stdout
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    program: String,
    args: Vec<String>,
}

impl CommandExtractor {
    /// Build from a command template such as `pdftotext -layout {file} -`
    ///
    /// `{file}` marks where the input path goes; without it the path is
    /// appended as the last argument.
    pub fn from_template(template: &str) -> Result<Self, ServiceError> {
        let mut parts = template.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(ServiceError::EmptyCommand)?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for a given input path
    fn args_for(&self, path: &Path) -> Vec<String> {
        let file = path.display().to_string();
        let mut substituted = false;
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                if arg.contains("{file}") {
                    substituted = true;
                    arg.replace("{file}", &file)
                } else {
                    arg.clone()
                }
            })
            .collect();
        if !substituted {
            args.push(file);
        }
        args
    }
}

impl TextExtractor for CommandExtractor {
    fn extract(&self, path: &Path) -> Result<String, ServiceError> {
        if !path.is_file() {
            return Err(ServiceError::MissingInput(path.to_path_buf()));
        }

        let args = self.args_for(path);
        tracing::debug!(program = %self.program, ?args, "running text extractor");

        let output = Command::new(&self.program).args(&args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ServiceError::NotInstalled {
                    program: self.program.clone(),
                }
            } else {
                ServiceError::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                match output.status.code() {
                    Some(code) => format!("{} exited with status {}", self.program, code),
                    None => format!("{} was terminated by a signal", self.program),
                }
            } else {
                stderr
            };
            return Err(ServiceError::Failed { message });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_template_substitution() {
        let extractor = CommandExtractor::from_template("pdftotext -layout {file} -").unwrap();
        assert_eq!(extractor.program(), "pdftotext");
        assert_eq!(
            extractor.args_for(Path::new("drawing.pdf")),
            vec!["-layout", "drawing.pdf", "-"]
        );
    }

    #[test]
    fn test_template_without_placeholder_appends_path() {
        let extractor = CommandExtractor::from_template("cat").unwrap();
        assert_eq!(extractor.args_for(Path::new("bom.txt")), vec!["bom.txt"]);
    }

    #[test]
    fn test_empty_template() {
        assert!(matches!(
            CommandExtractor::from_template("   "),
            Err(ServiceError::EmptyCommand)
        ));
    }

    #[test]
    fn test_missing_input() {
        let extractor = CommandExtractor::from_template("cat").unwrap();
        let err = extractor.extract(Path::new("/no/such/drawing.pdf")).unwrap_err();
        assert!(matches!(err, ServiceError::MissingInput(_)));
    }

    #[test]
    fn test_missing_program() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("bom.txt");
        std::fs::write(&file, "x").unwrap();

        let extractor = CommandExtractor::from_template("plateq-no-such-extractor-tool").unwrap();
        let err = extractor.extract(&file).unwrap_err();
        assert!(matches!(err, ServiceError::NotInstalled { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_with_cat() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("bom.txt");
        std::fs::write(&file, "QTY 100 BRACKET, AL 6061").unwrap();

        let extractor = CommandExtractor::from_template("cat {file}").unwrap();
        let text = extractor.extract(&file).unwrap();
        assert_eq!(text, "QTY 100 BRACKET, AL 6061");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_reports_failure() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("bom.txt");
        std::fs::write(&file, "x").unwrap();

        let extractor = CommandExtractor::from_template("false").unwrap();
        let err = extractor.extract(&file).unwrap_err();
        assert!(matches!(err, ServiceError::Failed { .. }));
    }
}
