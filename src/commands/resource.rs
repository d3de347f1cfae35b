//! # Resource Command Handler
//!
//! `shelfctl books ...` and `shelfctl users ...` share one set of handlers, generic over the
//! [`Resource`] the collection holds.

use crate::collection::Document;
use crate::commands::shared::{
    dispatch_command, execute_or_exit, parse_fields_or_exit, parse_id_or_exit,
    validate_args_count_or_exit,
};
use crate::schema::Resource;
use crate::{cli_utils, http_utils};

fn usage<R: Resource>() -> String {
    format!(
        "Usage: shelfctl {} <list|get|create|update|delete> [args...]",
        R::COLLECTION
    )
}

/// Handles all commands for the collection holding `R`.
///
/// # Arguments
/// * `args` - Command arguments (first element is the subcommand)
/// * `client` - HTTP client for API communication
/// * `output_format` - Output format for printed documents
pub async fn handle_resource_command<R: Resource>(
    args: &[String],
    client: &http_utils::BookshelfClient,
    output_format: cli_utils::OutputFormat,
) {
    dispatch_command!(R::COLLECTION, &usage::<R>(), args, client, output_format, {
        "list" => handle_list::<R>,
        "get" => handle_get::<R>,
        "create" => handle_create::<R>,
        "update" => handle_update::<R>,
        "delete" => handle_delete::<R>,
    });
}

async fn handle_list<R: Resource>(
    args: &[String],
    client: &http_utils::BookshelfClient,
    output_format: cli_utils::OutputFormat,
) {
    let usage = format!("Usage: shelfctl {} list", R::COLLECTION);
    validate_args_count_or_exit(args, 1, 1, "list", &usage);

    let documents: Vec<Document<R>> = execute_or_exit(client.get(R::COLLECTION)).await;
    if documents.is_empty() {
        println!("No {} found", R::COLLECTION);
    } else {
        cli_utils::print_formatted_or_exit(&documents, output_format, R::COLLECTION);
    }
}

async fn handle_get<R: Resource>(
    args: &[String],
    client: &http_utils::BookshelfClient,
    output_format: cli_utils::OutputFormat,
) {
    let usage = format!("Usage: shelfctl {} get <id>", R::COLLECTION);
    validate_args_count_or_exit(args, 2, 2, "get", &usage);
    let id = parse_id_or_exit(&args[1]);

    let path = format!("{}/{}", R::COLLECTION, id);
    let document: Document<R> = execute_or_exit(client.get(&path)).await;
    cli_utils::print_formatted_or_exit(&document, output_format, R::NAME);
}

async fn handle_create<R: Resource>(
    args: &[String],
    client: &http_utils::BookshelfClient,
    output_format: cli_utils::OutputFormat,
) {
    let usage = format!("Usage: shelfctl {} create <json-fields>", R::COLLECTION);
    validate_args_count_or_exit(args, 2, 2, "create", &usage);
    let fields = parse_fields_or_exit(&args[1]);

    let document: Document<R> = execute_or_exit(client.post(R::COLLECTION, &fields)).await;
    println!("Created {}: {}", R::NAME.to_lowercase(), document.id);
    cli_utils::print_formatted_or_exit(&document, output_format, R::NAME);
}

async fn handle_update<R: Resource>(
    args: &[String],
    client: &http_utils::BookshelfClient,
    output_format: cli_utils::OutputFormat,
) {
    let usage = format!("Usage: shelfctl {} update <id> <json-fields>", R::COLLECTION);
    validate_args_count_or_exit(args, 3, 3, "update", &usage);
    let id = parse_id_or_exit(&args[1]);
    let fields = parse_fields_or_exit(&args[2]);

    let path = format!("{}/{}", R::COLLECTION, id);
    let document: Document<R> = execute_or_exit(client.put(&path, &fields)).await;
    println!("Updated {}: {}", R::NAME.to_lowercase(), document.id);
    cli_utils::print_formatted_or_exit(&document, output_format, R::NAME);
}

async fn handle_delete<R: Resource>(
    args: &[String],
    client: &http_utils::BookshelfClient,
    _output_format: cli_utils::OutputFormat,
) {
    let usage = format!("Usage: shelfctl {} delete <id>", R::COLLECTION);
    validate_args_count_or_exit(args, 2, 2, "delete", &usage);
    let id = parse_id_or_exit(&args[1]);

    let path = format!("{}/{}", R::COLLECTION, id);
    execute_or_exit(client.delete(&path)).await;
    println!("Deleted {}: {}", R::NAME.to_lowercase(), id);
}
