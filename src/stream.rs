//! Per-input driver: read everything, resolve once, write the result
//!
//! This is the only part of the engine that touches I/O. Output is always
//! fully computed before anything is written, so an in-place rewrite never
//! leaves a half-transformed file behind.

use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::SubstError;
use crate::placeholder::{PlaceholderResolver, Resolution};
use crate::report::SubstitutionReport;

/// An input to substitute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Standard input (`-` on the command line)
    Stdin,
    File(PathBuf),
}

impl Target {
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            Target::Stdin
        } else {
            Target::File(PathBuf::from(arg))
        }
    }

    /// Path used in reports and error messages
    pub fn path(&self) -> &Path {
        match self {
            Target::Stdin => Path::new("<stdin>"),
            Target::File(path) => path,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}

/// Result of processing one target
#[derive(Debug)]
pub struct TargetOutcome {
    pub target: Target,
    pub report: SubstitutionReport,
    /// Strict-mode failure, raised after the output was written
    pub error: Option<SubstError>,
}

impl TargetOutcome {
    pub fn into_result(self) -> Result<SubstitutionReport, SubstError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.report),
        }
    }
}

/// Drives placeholder resolution over whole inputs
#[derive(Debug, Clone, Copy)]
pub struct StreamSubstitutor<'a> {
    resolver: PlaceholderResolver<'a>,
}

impl<'a> StreamSubstitutor<'a> {
    pub fn new(resolver: PlaceholderResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Read all of `input`, resolve it and write the result to `output`
    ///
    /// `source` names the input in read errors.
    pub fn substitute_stream<R: Read, W: Write>(
        &self,
        mut input: R,
        source: &Path,
        output: &mut W,
    ) -> Result<Resolution, SubstError> {
        let mut buf = Vec::new();
        input
            .read_to_end(&mut buf)
            .map_err(|e| SubstError::read(source, e))?;

        let resolution = self.resolver.resolve(&buf);
        output.write_all(&resolution.output)?;
        Ok(resolution)
    }

    /// Process one target, writing either back to the file or to `stdout`
    pub fn process_target<W: Write>(
        &self,
        target: &Target,
        in_place: bool,
        stdout: &mut W,
    ) -> Result<TargetOutcome, SubstError> {
        let resolution = match (target, in_place) {
            (Target::Stdin, true) => return Err(SubstError::StdinInPlace),
            (Target::Stdin, false) => {
                self.substitute_stream(io::stdin().lock(), target.path(), stdout)?
            }
            (Target::File(path), in_place) => {
                let file = fs::File::open(path).map_err(|e| SubstError::read(path, e))?;
                let input = io::BufReader::new(file);
                if in_place {
                    let mut rewritten = Vec::new();
                    let resolution = self.substitute_stream(input, path, &mut rewritten)?;
                    fs::write(path, rewritten).map_err(|e| SubstError::write(path, e))?;
                    resolution
                } else {
                    self.substitute_stream(input, path, stdout)?
                }
            }
        };

        info!(
            input = %target,
            replaced = resolution.report.len(),
            missing = resolution.missing.len(),
            "processed"
        );

        Ok(TargetOutcome {
            target: target.clone(),
            report: resolution.report,
            error: resolution.error,
        })
    }
}
