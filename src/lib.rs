//! Forwarding shims for legacy protobuf package paths.
//!
//! For every alias a proxy `.proto` descriptor is synthesized that publicly
//! imports the canonical file and carries the legacy `go_package`. The
//! proxies are handed to a [`codegen::Generator`] and the resulting files are
//! written or diffed by [`reconcile`].

pub mod alias;
pub mod codegen;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod synth;

#[cfg(test)]
pub(crate) mod test_utils;

use std::io::Write;

pub use alias::{AliasEntry, AliasSource, AliasTable};
pub use codegen::{GeneratedFile, Generator, PluginGenerator, ShimGenerator};
pub use config::{Config, Mode};
pub use error::{AliasError, Result};

/// Synthesize, generate and reconcile every alias in `table`.
pub fn run(
    table: &AliasTable,
    generator: &dyn Generator,
    parameter: Option<&str>,
    config: &Config,
    out: &mut dyn Write,
) -> Result<()> {
    let request = synth::build_request(table, parameter)?;
    tracing::debug!(
        "generating {} files from {} descriptors",
        request.file_to_generate.len(),
        request.proto_file.len()
    );
    let files = codegen::invoke(generator, &request)?;
    reconcile::reconcile(config, &files, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{StubGenerator, fixture_table};
    use std::fs;
    use std::path::PathBuf;

    fn table() -> AliasTable {
        fixture_table(&[
            ("example.com/legacy/ptypes/any;any", "google/protobuf/any.proto"),
            ("example.com/legacy/ptypes/struct;structpb", "google/protobuf/struct.proto"),
        ])
    }

    fn config(dir: &std::path::Path, mode: Mode) -> Config {
        Config {
            mode,
            module_root: PathBuf::from("example.com/legacy"),
            out_dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn test_run_with_shim_generator() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        run(
            &table(),
            &ShimGenerator::default(),
            Some("root=::protocrap"),
            &config(dir.path(), Mode::Execute),
            &mut out,
        )
        .unwrap();

        let any = fs::read_to_string(dir.path().join("ptypes/any/any.pc.rs")).unwrap();
        assert!(any.contains("// source: example.com/legacy/ptypes/any/any.proto"));
        assert!(any.contains("pub use ::protocrap::google::protobuf::Any;"));
        assert!(dir.path().join("ptypes/struct/struct.pc.rs").exists());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# ptypes/any/any.pc.rs\n# ptypes/struct/struct.pc.rs\n"
        );
    }

    #[test]
    fn test_run_generator_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let generator = StubGenerator {
            error: Some("boom".to_string()),
        };
        let err = run(
            &table(),
            &generator,
            None,
            &config(dir.path(), Mode::Execute),
            &mut Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "generator error: boom");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_run_twice_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), Mode::Execute);
        let dest = dir.path().join("ptypes/struct/struct.pc.rs");

        run(&table(), &ShimGenerator::default(), None, &config, &mut Vec::new()).unwrap();
        let first = fs::read(&dest).unwrap();
        run(&table(), &ShimGenerator::default(), None, &config, &mut Vec::new()).unwrap();
        assert_eq!(first, fs::read(&dest).unwrap());
    }
}
