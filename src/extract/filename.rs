//! Output file naming.

use super::query::ComponentSelection;

/// Selections larger than this collapse to a generic name.
const MAX_NAMED_COMPONENTS: usize = 3;

/// Lower-case a component name and replace spaces and slashes with `_`.
pub fn safe_name(component: &str) -> String {
    component.to_lowercase().replace([' ', '/'], "_")
}

/// File name for a single component.
pub fn single_component_filename(project: &str, component: &str) -> String {
    format!("{}_{}_issues.csv", project.to_lowercase(), safe_name(component))
}

/// Derive the CSV file name for a selection.
///
/// Up to three components are named in order; four or more become
/// `<project>_multiple_components_issues.csv`.
pub fn output_filename(components: &ComponentSelection, project: &str) -> String {
    let project = project.to_lowercase();

    if components.len() > MAX_NAMED_COMPONENTS {
        return format!("{}_multiple_components_issues.csv", project);
    }

    let combined: Vec<String> = components.iter().map(safe_name).collect();
    format!("{}_{}_issues.csv", project, combined.join("_"))
}
