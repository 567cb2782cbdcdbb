use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AliasError>;

/// Everything that aborts an alias run. None of these are retried.
#[derive(Error, Debug)]
pub enum AliasError {
    #[error("alias `{0}` has no `;` between import path and package name")]
    MissingSeparator(String),

    #[error("alias `{0}` has an empty import path")]
    EmptyImportPath(String),

    #[error("canonical file `{0}` is not in the descriptor pool")]
    UnknownCanonical(String),

    #[error("dependency `{dependency}` of `{file}` is not in the request")]
    UnresolvedDependency { file: String, dependency: String },

    #[error("generator error: {0}")]
    Generator(String),

    #[error("generated file `{name}` is outside module root `{root}`")]
    OutsideRoot { name: String, root: String },

    #[error("failed to decode descriptor set: {0}")]
    DescriptorSet(#[from] prost_reflect::DescriptorError),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AliasError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AliasError::Io {
            path: path.into(),
            source,
        }
    }
}
