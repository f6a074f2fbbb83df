//! CLI domain: parse, route, output, and presentation only.
//! No domain logic; the route table dispatches to workspace operations.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{
    format_commit_list_json, format_commit_list_text, format_commit_outcome,
    format_rollback_report,
};
pub use route::RunContext;
