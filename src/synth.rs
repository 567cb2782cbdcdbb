// Synthesizes the proxy descriptors that public-import canonical files.

use std::collections::HashSet;

use prost_types::compiler::CodeGeneratorRequest;
use prost_types::{FileDescriptorProto, FileOptions};

use crate::alias::{AliasEntry, AliasTable};
use crate::error::{AliasError, Result};

/// Split `<import path>;<package name>` and return the import path with any
/// trailing `/` removed.
pub fn import_path(legacy_package: &str) -> Result<&str> {
    let Some((path, _)) = legacy_package.split_once(';') else {
        return Err(AliasError::MissingSeparator(legacy_package.to_string()));
    };
    let path = path.trim_end_matches('/');
    if path.is_empty() {
        return Err(AliasError::EmptyImportPath(legacy_package.to_string()));
    }
    Ok(path)
}

/// `a/b/c` -> `a/b/c/c.proto`
pub fn proxy_file_name(import_path: &str) -> String {
    let base = import_path.rsplit('/').next().unwrap_or(import_path);
    format!("{import_path}/{base}.proto")
}

/// Build the file that stands in for `entry.legacy_package`. Its only content
/// is a public import of the canonical file.
pub fn synthesize(entry: &AliasEntry) -> Result<FileDescriptorProto> {
    let path = import_path(&entry.legacy_package)?;
    let canonical = entry.canonical.file_descriptor_proto();

    Ok(FileDescriptorProto {
        name: Some(proxy_file_name(path)),
        syntax: Some(
            canonical
                .syntax
                .clone()
                .unwrap_or_else(|| "proto2".to_string()),
        ),
        dependency: vec![entry.canonical.name().to_string()],
        public_dependency: vec![0],
        options: Some(FileOptions {
            go_package: Some(entry.legacy_package.clone()),
            ..Default::default()
        }),
        ..Default::default()
    })
}

/// Canonical file then proxy, per entry; only proxies are generated.
pub fn build_request(table: &AliasTable, parameter: Option<&str>) -> Result<CodeGeneratorRequest> {
    let mut request = CodeGeneratorRequest {
        parameter: parameter.map(str::to_string),
        ..Default::default()
    };
    let mut known = HashSet::new();

    for entry in table.entries() {
        let canonical = entry.canonical.file_descriptor_proto().clone();
        known.insert(entry.canonical.name().to_string());
        request.proto_file.push(canonical);

        let proxy = synthesize(entry)?;
        for dependency in &proxy.dependency {
            if !known.contains(dependency) {
                return Err(AliasError::UnresolvedDependency {
                    file: proxy.name().to_string(),
                    dependency: dependency.clone(),
                });
            }
        }
        tracing::debug!(
            "synthesized {} -> {}",
            proxy.name(),
            entry.canonical.name()
        );
        known.insert(proxy.name().to_string());
        request.file_to_generate.push(proxy.name().to_string());
        request.proto_file.push(proxy);
    }

    Ok(request)
}
