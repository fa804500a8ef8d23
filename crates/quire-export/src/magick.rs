//! Document assembly through the ImageMagick command line.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;
use quire_core::{EngineError, ExportError};

use crate::document::DocumentAssembler;

/// Assembles pages by running `magick <pages...> -units PixelsPerInch
/// -density <ppi> <output>`. The output format follows the output file's
/// extension.
#[derive(Debug, Clone)]
pub struct MagickAssembler {
    /// Program to run
    pub program: PathBuf,
}

impl Default for MagickAssembler {
    fn default() -> Self {
        Self {
            program: PathBuf::from("magick"),
        }
    }
}

impl MagickAssembler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments passed to the program, in order.
    pub fn arguments(&self, pages: &[PathBuf], resolution: u32, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = pages.iter().map(|p| p.clone().into_os_string()).collect();
        args.extend(
            ["-units", "PixelsPerInch", "-density"]
                .into_iter()
                .map(OsString::from),
        );
        args.push(resolution.to_string().into());
        args.push(output.as_os_str().to_owned());
        args
    }
}

impl DocumentAssembler for MagickAssembler {
    fn assemble(
        &self,
        pages: &[PathBuf],
        resolution: u32,
        output: &Path,
    ) -> Result<(), ExportError> {
        let args = self.arguments(pages, resolution, output);
        debug!("running {} with {} pages", self.program.display(), pages.len());

        let result = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(EngineError::Io)?;
        if !result.status.success() {
            return Err(EngineError::ToolFailed {
                tool: self.program.display().to_string(),
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments() {
        let pages = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
        let args = MagickAssembler::default().arguments(&pages, 300, Path::new("out.pdf"));
        assert_eq!(
            args,
            ["a.png", "b.png", "-units", "PixelsPerInch", "-density", "300", "out.pdf"]
                .map(OsString::from)
                .to_vec()
        );
    }

    #[test]
    fn test_missing_program_fails() {
        let assembler = MagickAssembler::new("quire-no-such-program");
        let result = assembler.assemble(&[], 72, Path::new("out.pdf"));
        assert!(matches!(
            result,
            Err(ExportError::Assembly(EngineError::Io(_)))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_fatal() {
        let assembler = MagickAssembler::new("false");
        let result = assembler.assemble(&[], 72, Path::new("out.pdf"));
        assert!(matches!(
            result,
            Err(ExportError::Assembly(EngineError::ToolFailed { .. }))
        ));
    }
}
