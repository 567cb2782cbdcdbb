// Rust naming for generated shims.

use anyhow::{Result, anyhow, bail};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use", "where",
    "while", "async", "await", "dyn",
];

/// Sanitize a module name by appending underscore for keywords
/// (can't use r# prefix for modules, especially with leading underscores)
pub fn sanitize_module_name(name: &str) -> String {
    if RUST_KEYWORDS.contains(&name) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}

/// Module path for a proto package: "google.protobuf" -> google::protobuf
pub fn package_path_tokens(package: &str) -> TokenStream {
    let parts = package
        .split('.')
        .filter(|s| !s.is_empty())
        .map(|s| format_ident!("{}", sanitize_module_name(s)));
    quote! { #(#parts)::* }
}

/// Crate root a shim re-exports from: "crate", "protocrap", "::protocrap" or
/// a longer path like "my_crate::pb". Anything that is not a plain path is
/// rejected.
pub fn crate_root_tokens(root: &str) -> Result<TokenStream> {
    let path: syn::Path = syn::parse_str(root)
        .map_err(|e| anyhow!("crate root `{root}` is not a Rust path: {e}"))?;
    if path.segments.iter().any(|s| !s.arguments.is_none()) {
        bail!("crate root `{root}` must not have generic arguments");
    }
    Ok(quote! { #path })
}

/// "pkg/any/any.proto" -> "pkg/any/any.pc.rs"
pub fn output_file_name(proto_name: &str) -> String {
    let stem = proto_name.strip_suffix(".proto").unwrap_or(proto_name);
    format!("{stem}.pc.rs")
}
