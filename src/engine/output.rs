//! Result sink: turns a (path, digest) pair into one output line.

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::HashResult;

/// Output layouts. `json` is an alias of `json-hex`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `<hex>  <path>`
    #[default]
    Hex,
    /// `<base64>  <path>`
    Base64,
    /// `{"path":..,"hash":"<hex>"}`
    JsonHex,
    /// `{"path":..,"hash":"<base64>"}`
    JsonBase64,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    path: &'a str,
    hash: &'a str,
}

impl OutputFormat {
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Hex => "hex",
            OutputFormat::Base64 => "base64",
            OutputFormat::JsonHex => "json-hex",
            OutputFormat::JsonBase64 => "json-base64",
        }
    }

    /// Encode raw digest bytes the way this format prints them.
    pub fn encode_digest(self, digest: &[u8]) -> String {
        match self {
            OutputFormat::Hex | OutputFormat::JsonHex => hex::encode(digest),
            OutputFormat::Base64 | OutputFormat::JsonBase64 => STANDARD.encode(digest),
        }
    }

    /// Full output line, newline included.
    pub fn render_line(self, path: &str, digest: &[u8]) -> Result<String> {
        let hash = self.encode_digest(digest);
        let mut line = match self {
            OutputFormat::Hex | OutputFormat::Base64 => format!("{hash}  {path}"),
            OutputFormat::JsonHex | OutputFormat::JsonBase64 => {
                serde_json::to_string(&JsonLine { path, hash: &hash })
                    .context("serialize json line")?
            }
        };
        line.push('\n');
        Ok(line)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hex" => Ok(OutputFormat::Hex),
            "base64" => Ok(OutputFormat::Base64),
            "json" | "json-hex" => Ok(OutputFormat::JsonHex),
            "json-base64" => Ok(OutputFormat::JsonBase64),
            _ => anyhow::bail!(
                "output format not supported: {s} (options: hex, base64, json, json-hex, json-base64)"
            ),
        }
    }
}

/// Writes one line per result. Each line goes out in a single `write_all`.
pub struct ResultSink<W: Write> {
    format: OutputFormat,
    out: W,
}

impl<W: Write> ResultSink<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self { format, out }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn print(&mut self, result: &HashResult) -> Result<()> {
        let line = self.format.render_line(&result.path, &result.digest)?;
        self.out
            .write_all(line.as_bytes())
            .context("write result line")
    }

    /// Flush and hand back the writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.out.flush().context("flush output")?;
        Ok(self.out)
    }
}
