// Adapter for external protoc plugins (protoc-gen-*).

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use prost::Message;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};

use super::Generator;

/// Speaks the protoc plugin protocol: encoded request on stdin, encoded
/// response on stdout.
#[derive(Debug, Clone)]
pub struct PluginGenerator {
    pub program: PathBuf,
}

impl PluginGenerator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Generator for PluginGenerator {
    fn generate(&self, request: &CodeGeneratorRequest) -> Result<CodeGeneratorResponse> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to run plugin {}", self.program.display()))?;

        let input = request.encode_to_vec();
        tracing::debug!(
            "sending {} byte request to {}",
            input.len(),
            self.program.display()
        );
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&input)
                .context("failed to write plugin request")?;
        }

        let output = child
            .wait_with_output()
            .context("failed to read plugin response")?;
        if !output.status.success() {
            bail!("plugin {} exited with {}", self.program.display(), output.status);
        }

        CodeGeneratorResponse::decode(output.stdout.as_slice())
            .context("invalid CodeGeneratorResponse from plugin")
    }
}
