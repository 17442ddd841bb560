// SPDX-FileCopyrightText: 2025 Maciej Borzecki <maciek.borzecki@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror;

use crate::revision::{self, GitCommandScope, GitRunner, RevisionDescriptor, RevisionError};
use crate::template::Template;

/// Wraps stamping errors.
#[derive(thiserror::Error, Debug)]
pub enum StampError {
    #[error("cannot describe revision: {0}")]
    Revision(#[from] RevisionError),
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Describes what a stamping run did to the target file.
#[derive(Debug, Clone, PartialEq)]
pub enum StampOutcome {
    /// Target did not exist and was written.
    Created,
    /// Target had different content and was overwritten.
    Updated,
    /// Target already had the expected content.
    Unchanged,
}

/// Where the revision descriptor comes from.
pub enum RevisionSource<R>
where
    R: GitRunner,
{
    /// Query git.
    Git {
        runner: R,
        scope: GitCommandScope,
        abbrev: u32,
    },
    /// Use a fixed descriptor.
    Fixed(RevisionDescriptor),
}

impl<R> RevisionSource<R>
where
    R: GitRunner,
{
    fn obtain(&mut self) -> Result<RevisionDescriptor, RevisionError> {
        match self {
            RevisionSource::Git {
                runner,
                scope,
                abbrev,
            } => revision::describe(runner, scope, *abbrev),
            RevisionSource::Fixed(desc) => Ok(desc.clone()),
        }
    }
}

/// Stamps the current revision into a generated source file.
pub struct Stamper<'a, R>
where
    R: GitRunner,
{
    source: RevisionSource<R>,
    template: Template<'a>,
    target: PathBuf,
}

/// Returns the current raw content of the file, or None if it does not exist.
fn read_existing(path: &Path) -> Result<Option<Vec<u8>>, StampError> {
    match fs::read(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StampError::Read {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

impl<'a, R> Stamper<'a, R>
where
    R: GitRunner,
{
    pub fn new(source: RevisionSource<R>, template: Template<'a>, target: PathBuf) -> Self {
        Self {
            source,
            template,
            target,
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    // Consume self and return the revision source. Only useful for tests to
    // inspect calls seen by the mock runner.
    #[cfg(test)]
    fn test_into_source(self) -> RevisionSource<R> {
        self.source
    }

    /// Render the current revision into the target file, writing it only when
    /// its content changes. Returns the outcome and the descriptor used.
    pub fn run(&mut self) -> Result<(StampOutcome, RevisionDescriptor), StampError> {
        let desc = self.source.obtain()?;
        let content = self.template.render(&desc);

        let existing = read_existing(&self.target)?;
        if existing.is_none() {
            println!("Creating {}", self.target.display());
        }

        if existing.as_deref().unwrap_or_default() == content.as_bytes() {
            log::debug!("{} is up to date", self.target.display());
            return Ok((StampOutcome::Unchanged, desc));
        }

        println!("genversion: creating {} {}", self.target.display(), desc);

        fs::write(&self.target, &content).map_err(|e| StampError::Write {
            path: self.target.clone(),
            source: e,
        })?;

        let outcome = if existing.is_some() {
            StampOutcome::Updated
        } else {
            StampOutcome::Created
        };
        log::debug!("{:?} {}", outcome, self.target.display());

        Ok((outcome, desc))
    }
}
