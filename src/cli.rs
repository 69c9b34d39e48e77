//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; a single route table dispatches to the engine.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_section_heading, OutputFormat};
pub use route::{command_name, RunContext};
