mod cli;
mod fulltext_cmd;
mod highlights_cmd;
mod parse_cmd;
mod shared;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        cli::Commands::Parse {
            ref file,
            ref pages,
            compact,
            truncate_span,
            byte_budget,
            pretty,
        } => parse_cmd::run(
            file,
            pages.as_deref(),
            compact,
            truncate_span,
            byte_budget,
            pretty,
        ),
        cli::Commands::Highlights {
            ref file,
            ref format,
            pretty,
        } => highlights_cmd::run(file, format, pretty),
        cli::Commands::Fulltext {
            ref file,
            ref format,
            pretty,
        } => fulltext_cmd::run(file, format, pretty),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
