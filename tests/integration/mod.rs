//! Integration tests for the differential update engine

mod blacklist_rules;
mod cli_commands;
mod config_layering;
mod custom_matchers;
