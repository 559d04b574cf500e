use anyhow::Result;
use clap::Parser;
use engine::{Engine, IndexResult, SearchResult};
use std::io::{self, BufRead, Write};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "shell")]
#[command(about = "Interactive full-text retrieval over a directory tree", long_about = None)]
struct Args {
    /// Number of worker threads per directory level
    #[arg(long, default_value_t = 1)]
    workers: usize,
    /// Print results as JSON instead of prose
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let engine = Engine::new(args.workers);
    tracing::info!(workers = args.workers, "engine ready");

    println!("Enter commands ('index <path>', 'search <term1> <term2> ...', 'quit'):");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        stdout.flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        if !dispatch(&engine, line.trim(), args.json) {
            break;
        }
    }
    Ok(())
}

/// Run one command line; returns false when the session should end.
fn dispatch(engine: &Engine, line: &str, json: bool) -> bool {
    match parse_command(line) {
        Command::Quit => {
            println!("Ending the program");
            return false;
        }
        Command::Index(path) => match engine.index_files(path.as_ref()) {
            Ok(result) => print_index_result(&result, json),
            Err(err) => println!("Indexing failed: {err}"),
        },
        Command::Search(terms) => match engine.search_files(&terms) {
            Ok(result) => print_search_result(&result, json),
            Err(err) => println!("Search failed: {err}"),
        },
        Command::Empty => {}
        Command::MissingSearchTerms => println!("Please provide search terms."),
        Command::Unrecognized => println!("unrecognized command!"),
    }
    true
}

enum Command {
    Index(String),
    Search(Vec<String>),
    Quit,
    Empty,
    MissingSearchTerms,
    Unrecognized,
}

fn parse_command(line: &str) -> Command {
    if line.is_empty() {
        return Command::Empty;
    }
    if line == "quit" {
        return Command::Quit;
    }
    if let Some(path) = line.strip_prefix("index ") {
        let path = path.trim();
        if path.is_empty() {
            return Command::Unrecognized;
        }
        return Command::Index(path.to_string());
    }
    if let Some(rest) = line.strip_prefix("search ") {
        let terms: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
        if terms.is_empty() {
            return Command::MissingSearchTerms;
        }
        return Command::Search(terms);
    }
    if line == "search" {
        return Command::MissingSearchTerms;
    }
    Command::Unrecognized
}

fn print_index_result(result: &IndexResult, json: bool) {
    if json {
        let payload = serde_json::json!({
            "took_s": result.elapsed.as_secs_f64(),
            "total_bytes_read": result.total_bytes_read,
        });
        println!("{payload}");
    } else {
        println!("Time taken to index: {:.3} seconds", result.elapsed.as_secs_f64());
        println!("Total bytes read: {}", result.total_bytes_read);
    }
}

fn print_search_result(result: &SearchResult, json: bool) {
    if json {
        let payload = serde_json::json!({
            "took_s": result.elapsed.as_secs_f64(),
            "total_hits": result.hits.len(),
            "results": result.hits,
        });
        println!("{payload}");
        return;
    }
    println!("Search completed in {:.3} seconds", result.elapsed.as_secs_f64());
    if result.hits.is_empty() {
        println!("No documents found for the search query.");
        return;
    }
    println!("Top results with highest frequency:");
    for hit in &result.hits {
        println!("{}: {}", hit.path.display(), hit.frequency);
    }
}
