// protocrap-alias codegen module
//
// The generator is a collaborator with a fixed contract: a
// CodeGeneratorRequest in, a CodeGeneratorResponse out. The built-in
// ShimGenerator writes Rust re-export modules; PluginGenerator hands the
// request to any protoc plugin binary.

use std::collections::HashMap;

use anyhow::{Context, Result, anyhow, bail};
use proc_macro2::TokenStream;
use prost_types::FileDescriptorProto;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse, code_generator_response};
use quote::{format_ident, quote};

use crate::error::AliasError;

pub mod names;
mod plugin;

pub use plugin::PluginGenerator;

pub trait Generator {
    fn generate(&self, request: &CodeGeneratorRequest) -> Result<CodeGeneratorResponse>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub content: String,
}

/// Run `generator` and unpack its response. Transport failures and a
/// reported `error` both abort; nothing is retried.
pub fn invoke(
    generator: &dyn Generator,
    request: &CodeGeneratorRequest,
) -> crate::Result<Vec<GeneratedFile>> {
    let response = generator
        .generate(request)
        .map_err(|e| AliasError::Generator(format!("{e:#}")))?;
    if let Some(error) = response.error {
        return Err(AliasError::Generator(error));
    }
    Ok(response
        .file
        .into_iter()
        .map(|file| GeneratedFile {
            name: file.name.unwrap_or_default(),
            content: file.content.unwrap_or_default(),
        })
        .collect())
}

/// Emits one Rust module per target that `pub use`s every top-level message
/// and enum of the target's public imports.
#[derive(Debug, Clone)]
pub struct ShimGenerator {
    /// Path the canonical packages live under, e.g. `crate` or `::protocrap`.
    pub crate_root: String,
}

impl Default for ShimGenerator {
    fn default() -> Self {
        Self {
            crate_root: "crate".to_string(),
        }
    }
}

impl Generator for ShimGenerator {
    fn generate(&self, request: &CodeGeneratorRequest) -> Result<CodeGeneratorResponse> {
        // Problems with the input belong in the response, as for any plugin.
        match self.generate_files(request) {
            Ok(file) => Ok(CodeGeneratorResponse {
                file,
                ..Default::default()
            }),
            Err(e) => Ok(CodeGeneratorResponse {
                error: Some(format!("{e:#}")),
                ..Default::default()
            }),
        }
    }
}

impl ShimGenerator {
    fn crate_root_for(&self, parameter: &str) -> Result<String> {
        let mut root = self.crate_root.clone();
        for part in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('=') {
                Some(("root", value)) if !value.is_empty() => root = value.to_string(),
                _ => bail!("unknown generator parameter `{part}`"),
            }
        }
        Ok(root)
    }

    fn generate_files(
        &self,
        request: &CodeGeneratorRequest,
    ) -> Result<Vec<code_generator_response::File>> {
        let root = names::crate_root_tokens(&self.crate_root_for(request.parameter())?)?;
        let by_name: HashMap<&str, &FileDescriptorProto> = request
            .proto_file
            .iter()
            .map(|file| (file.name(), file))
            .collect();

        request
            .file_to_generate
            .iter()
            .map(|name| {
                let file = by_name
                    .get(name.as_str())
                    .ok_or_else(|| anyhow!("{name}: not found in request"))?;
                let content = generate_shim(file, &by_name, &root)
                    .with_context(|| format!("generating {name}"))?;
                Ok(code_generator_response::File {
                    name: Some(names::output_file_name(name)),
                    content: Some(content),
                    ..Default::default()
                })
            })
            .collect()
    }
}

fn generate_shim(
    file: &FileDescriptorProto,
    by_name: &HashMap<&str, &FileDescriptorProto>,
    root: &TokenStream,
) -> Result<String> {
    let mut items = Vec::new();
    let mut sources = Vec::new();

    for &index in &file.public_dependency {
        let dep_name = usize::try_from(index)
            .ok()
            .and_then(|i| file.dependency.get(i))
            .ok_or_else(|| anyhow!("public dependency index {index} out of range"))?;
        let dep = by_name
            .get(dep_name.as_str())
            .ok_or_else(|| anyhow!("public import `{dep_name}` not found in request"))?;
        sources.push(dep_name.as_str());

        let package = names::package_path_tokens(dep.package());
        let prefix = if package.is_empty() {
            quote! { #root }
        } else {
            quote! { #root::#package }
        };
        let symbols = dep
            .message_type
            .iter()
            .map(|m| m.name())
            .chain(dep.enum_type.iter().map(|e| e.name()));
        for symbol in symbols {
            let ident = format_ident!("{}", symbol);
            items.push(quote! { pub use #prefix::#ident; });
        }
    }

    let doc = format!(" Forwards to `{}`.", sources.join("`, `"));
    let tokens = quote! {
        #![doc = #doc]
        #(#items)*
    };
    let syntax_tree = syn::parse2(tokens)?;
    Ok(format!(
        "// Code generated by protocrap-alias. DO NOT EDIT.\n// source: {}\n\n{}",
        file.name(),
        prettyplease::unparse(&syntax_tree)
    ))
}
