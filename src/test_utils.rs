//! Fixtures shared by the unit tests.

use std::path::Path;

use prost::Message;
use prost_reflect::DescriptorPool;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse, code_generator_response};
use prost_types::{DescriptorProto, EnumDescriptorProto, FileDescriptorProto, FileDescriptorSet};

use crate::alias::{AliasSource, AliasTable};
use crate::codegen::Generator;

fn message(name: &str) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

/// Minimal stand-ins for a few well-known files: names, packages and
/// top-level types only.
pub fn fixture_files() -> Vec<FileDescriptorProto> {
    vec![
        FileDescriptorProto {
            name: Some("google/protobuf/any.proto".to_string()),
            package: Some("google.protobuf".to_string()),
            syntax: Some("proto3".to_string()),
            message_type: vec![message("Any")],
            ..Default::default()
        },
        FileDescriptorProto {
            name: Some("google/protobuf/empty.proto".to_string()),
            package: Some("google.protobuf".to_string()),
            syntax: Some("proto3".to_string()),
            message_type: vec![message("Empty")],
            ..Default::default()
        },
        FileDescriptorProto {
            name: Some("google/protobuf/struct.proto".to_string()),
            package: Some("google.protobuf".to_string()),
            syntax: Some("proto3".to_string()),
            message_type: vec![message("Struct"), message("Value"), message("ListValue")],
            enum_type: vec![EnumDescriptorProto {
                name: Some("NullValue".to_string()),
                value: vec![prost_types::EnumValueDescriptorProto {
                    name: Some("NULL_VALUE".to_string()),
                    number: Some(0),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        },
        FileDescriptorProto {
            name: Some("legacy/old.proto".to_string()),
            package: Some("legacy".to_string()),
            message_type: vec![message("Old")],
            ..Default::default()
        },
    ]
}

pub fn fixture_pool() -> DescriptorPool {
    DescriptorPool::from_file_descriptor_set(FileDescriptorSet {
        file: fixture_files(),
    })
    .expect("fixture descriptors should be valid")
}

pub fn write_descriptor_set(path: &Path) {
    let set = FileDescriptorSet {
        file: fixture_files(),
    };
    std::fs::write(path, set.encode_to_vec()).expect("descriptor set should be written");
}

pub fn fixture_table(sources: &[(&str, &str)]) -> AliasTable {
    let sources: Vec<_> = sources
        .iter()
        .map(|&(legacy, canonical)| AliasSource::new(legacy, canonical))
        .collect();
    AliasTable::resolve(&sources, &fixture_pool()).expect("fixture aliases should resolve")
}

/// Generator that answers every target with a fixed body and records nothing.
pub struct StubGenerator {
    pub error: Option<String>,
}

impl Generator for StubGenerator {
    fn generate(&self, request: &CodeGeneratorRequest) -> anyhow::Result<CodeGeneratorResponse> {
        if let Some(error) = &self.error {
            return Ok(CodeGeneratorResponse {
                error: Some(error.clone()),
                ..Default::default()
            });
        }
        let file = request
            .file_to_generate
            .iter()
            .map(|name| code_generator_response::File {
                name: Some(name.replace(".proto", ".pc.rs")),
                content: Some(format!("// shim for {name}\n")),
                ..Default::default()
            })
            .collect();
        Ok(CodeGeneratorResponse {
            file,
            ..Default::default()
        })
    }
}
