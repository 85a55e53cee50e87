use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{error::IoError, model::RopeTextModel, uri::ResourceUri};

/// Read a prompt file and return its content
pub fn read_prompt_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(IoError::Io)?;
    String::from_utf8(bytes).map_err(|_| IoError::InvalidUtf8(path.to_path_buf()))
}

/// The `file://` locator of `path`, made absolute against the working directory.
pub fn file_uri(path: &Path) -> Result<ResourceUri, IoError> {
    let absolute = std::path::absolute(path).map_err(IoError::Io)?;
    Ok(ResourceUri::file(&absolute.to_string_lossy()))
}

/// Load a prompt file into a text model addressed by its `file://` locator.
pub fn load_prompt_model(path: &Path) -> Result<RopeTextModel, IoError> {
    let text = read_prompt_file(path)?;
    Ok(RopeTextModel::new(file_uri(path)?, &text))
}

/// Recursively collect files under `root` accepted by `is_prompt`, sorted.
pub fn scan_prompt_files(
    root: &Path,
    is_prompt: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>, IoError> {
    validate_prompts_dir(root)?;

    let mut files = Vec::new();
    scan_directory_recursive(root, &is_prompt, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(
    dir: &Path,
    is_prompt: &dyn Fn(&Path) -> bool,
    files: &mut Vec<PathBuf>,
) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, is_prompt, files)?;
        } else if is_prompt(&path) {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_prompts_dir(path: &Path) -> Result<(), IoError> {
    if !path.is_dir() {
        return Err(IoError::InvalidRoot(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}
