//! Reading review sources and their sidecar annotation files.
//!
//! Annotations for `src/main.rs` live next to it in `src/main.rs.review.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::Annotation;

const SIDECAR_SUFFIX: &str = ".review.toml";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse annotations at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize annotations: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Sidecar {
    #[serde(default)]
    annotations: Vec<Annotation>,
}

/// Path of the annotation file that belongs to `source`
pub fn sidecar_path(source: &Path) -> PathBuf {
    let mut name = source.as_os_str().to_os_string();
    name.push(SIDECAR_SUFFIX);
    PathBuf::from(name)
}

/// Read a source file under review
pub fn read_source(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Write a source file, creating parent directories as needed
pub fn write_source(path: &Path, content: &str) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }
    fs::write(path, content).map_err(IoError::Io)
}

/// Load the annotations stored beside `source`. A missing sidecar means no
/// annotations yet.
pub fn load_annotations(source: &Path) -> Result<Vec<Annotation>, IoError> {
    let path = sidecar_path(source);
    if !path.exists() {
        log::debug!("no sidecar at {}", path.display());
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path)?;
    let sidecar: Sidecar = toml::from_str(&content).map_err(|source| IoError::Parse {
        path: path.clone(),
        source,
    })?;
    log::info!(
        "loaded {} annotation(s) from {}",
        sidecar.annotations.len(),
        path.display()
    );
    Ok(sidecar.annotations)
}

/// Replace the sidecar of `source` with `annotations`
pub fn save_annotations(source: &Path, annotations: &[Annotation]) -> Result<(), IoError> {
    let path = sidecar_path(source);
    let sidecar = Sidecar {
        annotations: annotations.to_vec(),
    };
    let content = toml::to_string_pretty(&sidecar)?;
    fs::write(&path, content)?;
    log::info!("saved {} annotation(s) to {}", annotations.len(), path.display());
    Ok(())
}
