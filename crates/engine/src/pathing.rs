// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output path resolution
//!
//! Jobs that do not name an output file get
//! `<output_dir>/<sanitized-stem>_restored_<utc-stamp>.mp4`. A requested
//! path that points at a directory gets the default file name inside it.

use chrono::Utc;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        "result".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Default output file for an input, stamped with the current UTC time
pub fn default_output_path(input_path: &str, output_dir: &Path) -> PathBuf {
    let stem = Path::new(input_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("result");
    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    output_dir.join(format!("{}_restored_{}.mp4", sanitize_stem(stem), stamp))
}

/// Resolve the effective output path for a request, creating directories
/// as needed. A trailing slash or an existing directory selects the
/// default file name inside that directory.
pub fn resolve_output_path(
    input_path: &str,
    requested: Option<&str>,
    output_dir: &Path,
) -> io::Result<PathBuf> {
    let Some(raw) = requested else {
        fs::create_dir_all(output_dir)?;
        return Ok(default_output_path(input_path, output_dir));
    };
    let requested = Path::new(raw);
    if raw.ends_with('/') || requested.is_dir() {
        fs::create_dir_all(requested)?;
        return Ok(default_output_path(input_path, requested));
    }
    if let Some(parent) = requested.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(requested.to_path_buf())
}

#[cfg(test)]
#[path = "pathing_tests.rs"]
mod tests;
