// Alias table: which legacy package paths forward to which canonical files.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use prost_reflect::{DescriptorPool, FileDescriptor};

use crate::error::{AliasError, Result};

/// Legacy packages forwarded by default, as (`go_package`, canonical path).
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    (
        "github.com/golang/protobuf/protoc-gen-go/descriptor;descriptor",
        "google/protobuf/descriptor.proto",
    ),
    (
        "github.com/golang/protobuf/protoc-gen-go/plugin;plugin_go",
        "google/protobuf/compiler/plugin.proto",
    ),
    (
        "github.com/golang/protobuf/ptypes/any;any",
        "google/protobuf/any.proto",
    ),
    (
        "github.com/golang/protobuf/ptypes/duration;duration",
        "google/protobuf/duration.proto",
    ),
    (
        "github.com/golang/protobuf/ptypes/timestamp;timestamp",
        "google/protobuf/timestamp.proto",
    ),
    (
        "github.com/golang/protobuf/ptypes/wrappers;wrappers",
        "google/protobuf/wrappers.proto",
    ),
    (
        "github.com/golang/protobuf/ptypes/struct;structpb",
        "google/protobuf/struct.proto",
    ),
    (
        "github.com/golang/protobuf/ptypes/empty;empty",
        "google/protobuf/empty.proto",
    ),
];

/// An alias before its canonical file has been looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasSource {
    pub legacy_package: String,
    pub canonical_path: String,
}

impl AliasSource {
    pub fn new(legacy_package: impl Into<String>, canonical_path: impl Into<String>) -> Self {
        Self {
            legacy_package: legacy_package.into(),
            canonical_path: canonical_path.into(),
        }
    }

    pub fn defaults() -> Vec<AliasSource> {
        DEFAULT_ALIASES
            .iter()
            .map(|&(legacy, canonical)| AliasSource::new(legacy, canonical))
            .collect()
    }
}

/// Parses `LEGACY=CANONICAL`, splitting on the first `=`.
impl FromStr for AliasSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let Some((legacy, canonical)) = s.split_once('=') else {
            return Err(format!("expected LEGACY=CANONICAL, got `{s}`"));
        };
        if legacy.is_empty() || canonical.is_empty() {
            return Err(format!("empty side in alias `{s}`"));
        }
        Ok(AliasSource::new(legacy, canonical))
    }
}

#[derive(Debug, Clone)]
pub struct AliasEntry {
    /// `<import path>;<package name>`, copied verbatim into `go_package`.
    pub legacy_package: String,
    pub canonical: FileDescriptor,
}

/// Ordered, immutable set of aliases. Output follows this order.
#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    pub fn new(entries: Vec<AliasEntry>) -> Self {
        Self { entries }
    }

    /// Look up every canonical path in `pool`.
    pub fn resolve(sources: &[AliasSource], pool: &DescriptorPool) -> Result<Self> {
        let entries = sources
            .iter()
            .map(|source| {
                let canonical = pool
                    .get_file_by_name(&source.canonical_path)
                    .ok_or_else(|| AliasError::UnknownCanonical(source.canonical_path.clone()))?;
                Ok(AliasEntry {
                    legacy_package: source.legacy_package.clone(),
                    canonical,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load canonical descriptors from an encoded `FileDescriptorSet`, `-` meaning
/// stdin. Without a path the global pool (well-known types) is used.
pub fn load_pool(descriptor_set: Option<&Path>) -> Result<DescriptorPool> {
    load_pool_from(descriptor_set, &mut io::stdin())
}

fn load_pool_from(descriptor_set: Option<&Path>, stdin: &mut dyn Read) -> Result<DescriptorPool> {
    let Some(path) = descriptor_set else {
        return Ok(DescriptorPool::global());
    };

    let bytes = if path == Path::new("-") {
        let mut buf = Vec::new();
        stdin
            .read_to_end(&mut buf)
            .map_err(|e| AliasError::io(path, e))?;
        buf
    } else {
        fs::read(path).map_err(|e| AliasError::io(path, e))?
    };

    tracing::debug!(
        "read descriptor set {} ({} bytes)",
        path.display(),
        bytes.len()
    );
    Ok(DescriptorPool::decode(bytes.as_slice())?)
}
