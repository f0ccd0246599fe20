pub mod market;
pub mod payoff;
pub mod portfolio;

use serde::de::DeserializeOwned;

use crate::input;

/// Resolve a command's typed input: `--input` file first, then inline flags,
/// then piped stdin JSON. Stdin is only touched when the first two are absent.
pub fn resolve_input<T: DeserializeOwned>(
    path: Option<&str>,
    from_flags: Option<T>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return input::file::read_input(path);
    }
    if let Some(value) = from_flags {
        return Ok(value);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    Err(format!("--input <file.json>, flags, or stdin required for {}", what).into())
}
