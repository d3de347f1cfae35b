//! # Shared Command Utilities
//!
//! Argument validation, parsing and request helpers used by the command handlers.

use std::future::Future;

use handled::Handle;
use serde_json::{Map, Value};

use crate::commands::errors::{UserError, format_cli_error};
use crate::{DocumentId, cli_utils};

/// Prints the error with its hint and exits.
pub fn exit_with_handled_error<E>(error: &E) -> !
where
    E: Handle<UserError> + std::fmt::Display,
{
    eprintln!("{}", format_cli_error(error));
    std::process::exit(1);
}

/// Awaits a client operation, exiting with a formatted error on failure.
pub async fn execute_or_exit<T, E, Fut>(operation: Fut) -> T
where
    Fut: Future<Output = Result<T, E>>,
    E: Handle<UserError> + std::fmt::Display,
{
    match operation.await {
        Ok(value) => value,
        Err(e) => exit_with_handled_error(&e),
    }
}

/// Validates and parses a document ID, exiting with a hint if it is malformed.
pub fn parse_id_or_exit(id_str: &str) -> DocumentId {
    id_str
        .parse()
        .unwrap_or_else(|e| exit_with_handled_error(&e))
}

/// Parses a command-line argument as a JSON object, exiting if it is not one.
pub fn parse_fields_or_exit(json: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => cli_utils::exit_with_error(&format!(
            "Expected a JSON object of fields, got {}",
            other
        )),
        Err(e) => exit_with_handled_error(&e),
    }
}

/// Validates both minimum and maximum argument counts.
///
/// # Arguments
/// * `args` - The command arguments array
/// * `min_count` - The minimum number of arguments required (including subcommand)
/// * `max_count` - The maximum number of arguments allowed (including subcommand)
/// * `command` - The command name for error message
/// * `usage` - The usage string to display
pub fn validate_args_count_or_exit(
    args: &[String],
    min_count: usize,
    max_count: usize,
    command: &str,
    usage: &str,
) {
    if args.len() < min_count {
        cli_utils::exit_with_usage_error(
            &format!("{} command requires more arguments", command),
            usage,
        );
    }
    if args.len() > max_count {
        cli_utils::exit_with_usage_error(
            &format!("{} command has too many arguments", command),
            usage,
        );
    }
}

/// Macro to generate command dispatcher boilerplate.
macro_rules! dispatch_command {
    ($command_name:expr, $usage:expr, $args:expr, $client:expr, $output_format:expr, {
        $($subcommand:expr => $handler:expr),* $(,)?
    }) => {
        if $args.is_empty() {
            crate::cli_utils::exit_with_usage_error(
                &format!("{} command requires a subcommand", $command_name),
                $usage,
            );
        }

        match $args[0].as_str() {
            $(
                $subcommand => $handler($args, $client, $output_format).await,
            )*
            _ => {
                let available_subcommands = vec![$($subcommand),*];
                crate::cli_utils::exit_with_error(&format!(
                    "Unknown {} subcommand '{}'. Available subcommands: {}",
                    $command_name,
                    $args[0],
                    available_subcommands.join(", ")
                ));
            }
        }
    };
}

pub(crate) use dispatch_command;
