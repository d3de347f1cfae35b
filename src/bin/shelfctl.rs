use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use bookshelf::{
    Book, User,
    cli_utils::{self, OutputFormat},
    commands::handle_resource_command,
    http_utils,
};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Options {
    #[arrrg(optional, "Base URL of the bookshelf API server")]
    base_url: String,
    #[arrrg(optional, "Output format for printed documents: json or yaml (default: json)")]
    output: OutputFormat,
}

const USAGE: &str = r#"Usage: shelfctl [options] <command> [args...]

Options:
  --base-url <url>     Base URL of the bookshelf API server (default: http://localhost:3000)
  --output <format>    Output format for printed documents: json or yaml (default: json)

Commands:
  books list                        List all books
  books get <id>                    Get a book by ID
  books create <json>               Create a book, e.g. '{"title":"1984","author":"Orwell"}'
  books update <id> <json>          Replace a book
  books delete <id>                 Delete a book
  users list                        List all users
  users get <id>                    Get a user by ID
  users create <json>               Create a user, e.g. '{"name":"Jane","email":"jane@example.com"}'
  users update <id> <json>          Replace a user
  users delete <id>                 Delete a user"#;

#[tokio::main]
async fn main() {
    let (options, free) = Options::from_command_line_relaxed("USAGE: shelfctl <command> [args...]");

    if free.is_empty() {
        cli_utils::exit_with_usage_error("No command specified", USAGE);
    }

    let base_url = if options.base_url.is_empty() {
        "http://localhost:3000".to_string()
    } else {
        options.base_url
    };

    let client = http_utils::BookshelfClient::new(base_url);

    match free[0].as_str() {
        "books" => handle_resource_command::<Book>(&free[1..], &client, options.output).await,
        "users" => handle_resource_command::<User>(&free[1..], &client, options.output).await,
        "help" => println!("{}", USAGE),
        _ => {
            cli_utils::exit_with_error(&format!(
                "Unknown command '{}'. Available commands: books, users",
                free[0]
            ));
        }
    }
}
