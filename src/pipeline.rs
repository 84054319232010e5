//! Pipeline orchestrator.
//!
//! ```text
//! Init -> DepsChecked -> SourcesVerified -> TreeStaged -> Built
//!   \________\_______________\________________\______-> Aborted
//! ```
//!
//! Each call to [`Pipeline::advance`] runs exactly one stage. The current
//! state is swapped out for `Aborted` before the stage runs, so a failing
//! stage leaves the pipeline aborted without any extra bookkeeping.

use std::path::{Path, PathBuf};

use crate::artifact::{self, BuildArtifact, PackageBackend};
use crate::descriptor::PackageDescriptor;
use crate::error::Result;
use crate::manifest::FileManifestEntry;
use crate::preflight::{self, ToolProvider};
use crate::stage::{self, StagedTree};
use crate::timing::Timer;

/// Where the pipeline is.
#[derive(Debug)]
pub enum PipelineState {
    Init,
    DepsChecked,
    SourcesVerified,
    TreeStaged(StagedTree),
    Built(BuildArtifact),
    Aborted,
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::DepsChecked => "deps-checked",
            Self::SourcesVerified => "sources-verified",
            Self::TreeStaged(_) => "tree-staged",
            Self::Built(_) => "built",
            Self::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Built(_) | Self::Aborted)
    }
}

/// One packaging run.
pub struct Pipeline<'a> {
    base_dir: PathBuf,
    descriptor: PackageDescriptor,
    manifest: Vec<FileManifestEntry>,
    tools: &'a dyn ToolProvider,
    backend: &'a dyn PackageBackend,
    state: PipelineState,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        base_dir: &Path,
        descriptor: PackageDescriptor,
        manifest: Vec<FileManifestEntry>,
        tools: &'a dyn ToolProvider,
        backend: &'a dyn PackageBackend,
    ) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            descriptor,
            manifest,
            tools,
            backend,
            state: PipelineState::Init,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Run the next stage. Terminal states are left untouched.
    pub fn advance(&mut self) -> Result<&PipelineState> {
        let current = std::mem::replace(&mut self.state, PipelineState::Aborted);
        let next = match current {
            PipelineState::Init => {
                println!("=== Checking dependencies ===");
                let t = Timer::start("Dependencies");
                preflight::ensure(self.tools, &[self.backend.program()])?;
                t.finish();
                PipelineState::DepsChecked
            }
            PipelineState::DepsChecked => {
                let t = Timer::start("Sources");
                preflight::verify(&self.base_dir, &self.manifest)?;
                t.finish();
                PipelineState::SourcesVerified
            }
            PipelineState::SourcesVerified => {
                println!("\n=== Staging package tree ===");
                let t = Timer::start("Stage");
                let tree = stage::stage(&self.base_dir, &self.descriptor, &self.manifest)?;
                t.finish();
                PipelineState::TreeStaged(tree)
            }
            PipelineState::TreeStaged(tree) => {
                println!("\n=== Building package ===");
                let t = Timer::start("Build");
                let artifact = artifact::build(self.backend, &tree)?;
                t.finish();
                PipelineState::Built(artifact)
            }
            terminal @ (PipelineState::Built(_) | PipelineState::Aborted) => terminal,
        };

        tracing::debug!(state = next.name(), "pipeline advanced");
        self.state = next;
        Ok(&self.state)
    }

    /// Run every remaining stage and print the summary.
    pub fn run(mut self) -> Result<BuildArtifact> {
        println!(
            "Packaging {} {} ({})\n",
            self.descriptor.name, self.descriptor.version, self.descriptor.arch
        );

        loop {
            self.advance()?;
            if let PipelineState::Built(artifact) = self.state {
                print_summary(&artifact);
                return Ok(artifact);
            }
        }
    }
}

fn print_summary(artifact: &BuildArtifact) {
    println!("\n=== Package Build Complete ===");
    println!("  Output: {}", artifact.path.display());
    println!("  Size: {} KB", artifact.size.div_ceil(1024));
    println!("  SHA256: {}", artifact.sha256);
}
