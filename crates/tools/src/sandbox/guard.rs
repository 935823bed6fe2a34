use crate::error::ToolError;

const MAX_ARGUMENT_LEN: usize = 4096;
const OPTION_CHARS: &[char] = &[',', '.', '_', '-', '/', ':'];

/// Checks on caller-supplied values before they are placed on a container
/// command line. Arguments are passed as a vector, never through a shell,
/// so the concerns are option injection, control characters, and escaping
/// a mounted directory.
pub struct ArgumentGuard;

impl ArgumentGuard {
    /// A target (URL, host, domain). Returned trimmed.
    pub fn target(field: &str, value: &str) -> Result<String, ToolError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ToolError::validation(format!("{field} must not be empty")));
        }
        Self::common(field, value)?;
        Ok(value.to_string())
    }

    /// A file name resolved inside a mounted directory.
    pub fn file_name(field: &str, value: &str) -> Result<String, ToolError> {
        let value = Self::target(field, value)?;

        if value.contains('/') || value.contains('\\') {
            return Err(ToolError::validation(format!(
                "{field} must be a file name, not a path: {value}"
            )));
        }
        if value.contains("..") || value.starts_with('.') {
            return Err(ToolError::validation(format!(
                "{field} escapes its directory: {value}"
            )));
        }

        Ok(value)
    }

    /// A relative path such as a template directory. Must stay below the
    /// directory it is resolved against.
    pub fn relative_path(field: &str, value: &str) -> Result<String, ToolError> {
        let value = Self::option(field, value)?;

        if value.starts_with('/') || value.split('/').any(|segment| segment == "..") {
            return Err(ToolError::validation(format!(
                "{field} escapes its directory: {value}"
            )));
        }

        Ok(value)
    }

    /// A short option value such as a port list, severity list or scan type.
    pub fn option(field: &str, value: &str) -> Result<String, ToolError> {
        let value = Self::target(field, value)?;

        if let Some(bad) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !OPTION_CHARS.contains(c))
        {
            return Err(ToolError::validation(format!(
                "{field} contains unsupported character {bad:?}"
            )));
        }

        Ok(value)
    }

    fn common(field: &str, value: &str) -> Result<(), ToolError> {
        if value.len() > MAX_ARGUMENT_LEN {
            return Err(ToolError::validation(format!("{field} is too long")));
        }

        // Leading dash would be read as a flag by the scanner.
        if value.starts_with('-') {
            return Err(ToolError::validation(format!(
                "{field} must not start with '-': {value}"
            )));
        }

        if value.chars().any(|c| c.is_control()) {
            return Err(ToolError::validation(format!(
                "{field} contains control characters"
            )));
        }

        Ok(())
    }
}
