//! Artifact probing.
//!
//! After a case runs, the toolchain is expected to have left two files
//! behind: an assembly listing under the assembly root and an interpreter
//! transcript under the interpreter root. The probe reports presence only;
//! content and freshness are out of scope, and a missing file is a normal
//! `false`, never an error. The strict [`ArtifactProbe::assert_present`]
//! variant exists for automated checks that want absence to fail loudly.

use std::path::{Path, PathBuf};

use crate::interfaces::{ExistenceChecker, HarnessError};

/// Presence flags for the two artifacts a case is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactPresence {
    pub assembly: bool,
    pub interpreter: bool,
}

/// Locates and checks the artifacts the toolchain should write for a case.
#[derive(Debug, Clone)]
pub struct ArtifactProbe {
    asm_root: PathBuf,
    interp_root: PathBuf,
}

impl ArtifactProbe {
    pub fn new(asm_root: impl Into<PathBuf>, interp_root: impl Into<PathBuf>) -> Self {
        Self {
            asm_root: asm_root.into(),
            interp_root: interp_root.into(),
        }
    }

    pub fn roots(&self) -> (&Path, &Path) {
        (&self.asm_root, &self.interp_root)
    }

    /// Candidate paths for a base name:
    /// `<asmRoot>/<base>.s` and `<interpRoot>/<base>_output.txt`.
    pub fn expected_paths(&self, base: &str) -> (PathBuf, PathBuf) {
        (
            self.asm_root.join(format!("{base}.s")),
            self.interp_root.join(format!("{base}_output.txt")),
        )
    }

    /// Check existence of both expected artifacts.
    pub fn probe(&self, checker: &dyn ExistenceChecker, base: &str) -> ArtifactPresence {
        let (asm, interp) = self.expected_paths(base);
        ArtifactPresence {
            assembly: checker.exists(&asm),
            interpreter: checker.exists(&interp),
        }
    }

    /// Strict variant: errors on the first absent artifact instead of
    /// reporting it as an informational omission.
    pub fn assert_present(
        &self,
        checker: &dyn ExistenceChecker,
        base: &str,
    ) -> Result<(), HarnessError> {
        let (asm, interp) = self.expected_paths(base);
        if !checker.exists(&asm) {
            return Err(HarnessError::MissingArtifact(asm));
        }
        if !checker.exists(&interp) {
            return Err(HarnessError::MissingArtifact(interp));
        }
        Ok(())
    }
}
