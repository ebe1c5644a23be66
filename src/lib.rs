//! jira-extract - pull JIRA issues by component into CSV files.
//!
//! The core is the [`extract`] pipeline: build JQL for a project and component
//! selection, fetch one bounded page from the search API, normalize the text
//! fields and write them as CSV. [`app`] wires it to the command line.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod report;
pub mod selection;
