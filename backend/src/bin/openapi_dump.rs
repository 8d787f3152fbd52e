//! Print the OpenAPI document as JSON.

use clap::Parser;
use room_booker::doc::ApiDoc;
use utoipa::OpenApi;

/// Dump the room booker OpenAPI document to stdout.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump", version, about)]
struct Cli {
    /// Indent the output for humans.
    #[arg(long)]
    pretty: bool,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let doc = ApiDoc::openapi();
    let rendered = if cli.pretty {
        doc.to_pretty_json()
    } else {
        doc.to_json()
    };
    match rendered {
        Ok(json) => {
            println!("{json}");
            std::process::ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to serialise OpenAPI document: {err}");
            std::process::ExitCode::FAILURE
        }
    }
}
