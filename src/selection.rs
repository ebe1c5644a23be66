//! Validating a user's component choice against the catalog.
//!
//! These are pure functions; prompting lives in [`crate::cli::Console`].

use thiserror::Error;

/// Why a component choice was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Nothing was entered.
    #[error("Please enter a selection")]
    Empty,

    /// Part of the input was not a number.
    #[error("Please enter valid numbers separated by commas")]
    NotANumber(String),

    /// A number was outside the menu.
    #[error("Please enter numbers between 1 and {max}")]
    OutOfRange { value: usize, max: usize },

    /// A named component is not in the catalog.
    #[error("Component '{name}' not found")]
    UnknownComponent { name: String },

    /// The catalog has nothing to choose from.
    #[error("No components available")]
    NoComponents,
}

/// Render the numbered component menu with the trailing "all" entry.
pub fn render_menu(components: &[String]) -> String {
    let rule = "=".repeat(60);
    let mut out = format!("\n{}\nAVAILABLE COMPONENTS:\n{}\n", rule, rule);
    for (i, comp) in components.iter().enumerate() {
        out.push_str(&format!("{:2}. {}\n", i + 1, comp));
    }
    out.push_str(&format!("\n{:2}. ALL COMPONENTS\n{}", components.len() + 1, rule));
    out
}

/// Menu prompt text.
pub fn menu_prompt(components: &[String]) -> String {
    format!(
        "Select components (1-{}) or comma-separated numbers: ",
        components.len() + 1
    )
}

/// Parse a menu answer such as `3` or `1, 4, 7`.
///
/// `n + 1` on its own selects every component. Picks keep input order.
pub fn parse_menu_choice(input: &str, components: &[String]) -> Result<Vec<String>, SelectionError> {
    if components.is_empty() {
        return Err(SelectionError::NoComponents);
    }

    let input = input.trim();
    if input.is_empty() {
        return Err(SelectionError::Empty);
    }

    let all = components.len() + 1;
    if input == all.to_string() {
        return Ok(components.to_vec());
    }

    let mut picks = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        let n: usize = part
            .parse()
            .map_err(|_| SelectionError::NotANumber(part.to_string()))?;
        if n < 1 || n > components.len() {
            return Err(SelectionError::OutOfRange { value: n, max: all });
        }
        picks.push(components[n - 1].clone());
    }
    Ok(picks)
}

/// Match requested names case-insensitively against the catalog.
///
/// Returns the catalog's spelling of each name, in request order.
pub fn resolve_named(requested: &[String], components: &[String]) -> Result<Vec<String>, SelectionError> {
    requested
        .iter()
        .map(|name| {
            components
                .iter()
                .find(|c| c.to_lowercase() == name.to_lowercase())
                .cloned()
                .ok_or_else(|| SelectionError::UnknownComponent { name: name.clone() })
        })
        .collect()
}

/// Whether a confirmation answer means yes.
pub fn is_confirmation(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
