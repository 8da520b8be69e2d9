//! File export for compiled meshes
//!
//! [`export_geometry`] turns a [`Mesh`] into the bytes of an `.stl` or `.obj`
//! file, together with the extension, MIME type and a sanitized filename.
//! [`ExportEnvelope`] wraps such a file, base64-encoded, with the compile
//! statistics for JSON consumers.

use crate::mesh::Mesh;
use crate::recipe::pipeline::CompileStats;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use regex::Regex;
use serde::Serialize;
use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::LazyLock;

pub mod obj;
pub mod stl;

/// Name used when a recipe has none, or an empty one.
pub const DEFAULT_NAME: &str = "model";

static UNSAFE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9._-]+").expect("filename pattern is valid"));

/// Generic I/O and format-conversion errors.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("std::io::Error: {0}")]
    StdIo(#[from] std::io::Error),

    #[error("Feature is not implemented: {0}")]
    Unimplemented(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ExportFormat {
    /// ASCII STL
    #[default]
    #[serde(rename = "stl")]
    Stl,
    #[serde(rename = "stl-binary")]
    StlBinary,
    /// Wavefront OBJ
    #[serde(rename = "obj")]
    Obj,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Stl, ExportFormat::StlBinary, ExportFormat::Obj];

    pub const fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Stl => "stl",
            ExportFormat::StlBinary => "stl-binary",
            ExportFormat::Obj => "obj",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            ExportFormat::Stl | ExportFormat::StlBinary => "stl",
            ExportFormat::Obj => "obj",
        }
    }

    pub const fn mime(self) -> &'static str {
        match self {
            ExportFormat::Stl | ExportFormat::StlBinary => "model/stl",
            ExportFormat::Obj => "model/obj",
        }
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| format!("unknown export format `{s}`, expected one of stl, stl-binary, obj"))
    }
}

/// An exported file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub extension: &'static str,
    pub mime: &'static str,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Replace every run of characters outside `[a-zA-Z0-9._-]` with `_`.
///
/// Missing and empty names become [`DEFAULT_NAME`].
pub fn sanitize_name(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => UNSAFE_RUN.replace_all(name, "_").into_owned(),
        _ => DEFAULT_NAME.to_string(),
    }
}

/// Serialize `mesh` in `format`.
///
/// The sanitized `name` becomes the file stem and, for ASCII STL and OBJ, the model name inside the file.
pub fn export_geometry(
    mesh: &Mesh,
    format: ExportFormat,
    name: Option<&str>,
) -> Result<ExportedFile, IoError> {
    let safe_name = sanitize_name(name);
    let bytes = match format {
        ExportFormat::Stl => stl::to_stl_ascii(mesh, &safe_name).into_bytes(),
        ExportFormat::StlBinary => stl::to_stl_binary(mesh)?,
        ExportFormat::Obj => obj::to_obj(mesh, &safe_name).into_bytes(),
    };
    tracing::debug!(%format, filename = %safe_name, len = bytes.len(), "exported mesh");

    Ok(ExportedFile {
        extension: format.extension(),
        mime: format.mime(),
        filename: format!("{safe_name}.{}", format.extension()),
        bytes,
    })
}

/// JSON response describing one export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub ok: bool,
    pub format: ExportFormat,
    pub filename: String,
    pub mime: &'static str,
    pub bytes_base64: String,
    pub stats: CompileStats,
}

impl ExportEnvelope {
    pub fn new(format: ExportFormat, file: &ExportedFile, stats: CompileStats) -> Self {
        ExportEnvelope {
            ok: true,
            format,
            filename: file.filename.clone(),
            mime: file.mime,
            bytes_base64: BASE64_ENGINE.encode(&file.bytes),
            stats,
        }
    }
}
