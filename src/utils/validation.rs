use crate::utils::error::{PayrollError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_path(field_name: &str, path: &Path) -> Result<()> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(PayrollError::config(format!(
            "{}: path cannot be empty",
            field_name
        )));
    }
    if text.contains('\0') {
        return Err(PayrollError::config(format!(
            "{}: path contains null bytes",
            field_name
        )));
    }
    Ok(())
}

pub fn validate_file_extension(
    field_name: &str,
    path: &Path,
    allowed_extensions: &[&str],
) -> Result<()> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(extension) if allowed_extensions.contains(&extension.to_lowercase().as_str()) => {
            Ok(())
        }
        Some(extension) => Err(PayrollError::config(format!(
            "{}: unsupported file extension '{}'. Allowed extensions: {}",
            field_name,
            extension,
            allowed_extensions.join(", ")
        ))),
        None => Err(PayrollError::config(format!(
            "{}: file has no extension or invalid filename",
            field_name
        ))),
    }
}
