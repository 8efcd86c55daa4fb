//! Marmot CLI
//!
//! Fetch a page from an HTTP/1.1 server, parse local HTML, or run the
//! fixture server.

mod logger;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use marmot_browser::{LoadedDocument, load_document, load_file, parse_html_string};
use marmot_html::format_tree;
use marmot_net::{DEFAULT_DOCUMENT, DEFAULT_PORT, FixtureServer, Request, Response};
use owo_colors::OwoColorize;

/// Marmot: fetch chunked HTTP responses and turn them into styled DOM trees
#[derive(Parser, Debug)]
#[command(name = "marmot")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Serve the built-in page on port 8088
    marmot serve

    # Fetch it and print the styled DOM tree
    marmot fetch --port 8088

    # POST form fields and show the response headers
    marmot fetch --method POST -d name=marmot --headers

    # Parse inline HTML and print the tokens and rules
    marmot parse --html '<style>p { color: red }</style><p>Hi</p>' --tokens --css
"#)]
struct Cli {
    /// Print debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Request a page and print the response as a styled DOM tree
    Fetch(FetchArgs),
    /// Parse a local HTML file or string
    Parse(ParseArgs),
    /// Serve one HTML document with chunked framing
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Host to connect to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to connect to
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Request target
    #[arg(long, default_value = "/")]
    path: String,

    /// Request method
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Extra header, as 'Name: Value' (repeatable)
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Body field, as key=value (repeatable)
    #[arg(short = 'd', long = "data", value_name = "KEY=VALUE", value_parser = parse_field)]
    fields: Vec<(String, String)>,

    /// Print the DOM as JSON instead of an outline
    #[arg(long)]
    json: bool,

    /// Print the response headers
    #[arg(long = "headers")]
    show_headers: bool,
}

#[derive(Args, Debug)]
struct ParseArgs {
    /// HTML file to parse
    #[arg(value_name = "FILE", conflicts_with = "html")]
    path: Option<PathBuf>,

    /// HTML string to parse
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Print the DOM as JSON instead of an outline
    #[arg(long)]
    json: bool,

    /// Print the token stream
    #[arg(long)]
    tokens: bool,

    /// Print the collected style rules
    #[arg(long)]
    css: bool,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Document to serve instead of the built-in page
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected 'Name: Value', got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in '{raw}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    Ok((key.to_string(), value.to_string()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match (&cli.command, cli.verbose) {
        (_, true) => LevelFilter::Debug,
        (Command::Serve(_), false) => LevelFilter::Info,
        _ => LevelFilter::Warn,
    };
    logger::init(level).map_err(|err| anyhow!("failed to install logger: {err}"))?;

    match cli.command {
        Command::Fetch(args) => fetch(&args),
        Command::Parse(args) => parse(&args),
        Command::Serve(args) => serve(&args),
    }
}

fn fetch(args: &FetchArgs) -> Result<()> {
    let mut builder = Request::builder(args.host.as_str())
        .port(args.port)
        .path(args.path.as_str())
        .method(args.method.as_str());
    for (name, value) in &args.headers {
        builder = builder.header(name, value);
    }
    for (key, value) in &args.fields {
        builder = builder.field(key.as_str(), value.as_str());
    }
    let request = builder.build();

    let doc = load_document(&request)
        .with_context(|| format!("failed to load http://{}:{}{}", args.host, args.port, args.path))?;

    if let Some(response) = &doc.response {
        print_status(response);
        if args.show_headers {
            for (name, value) in response.headers.iter() {
                println!("{}: {value}", name.cyan());
            }
        }
        println!();
    }
    print_dom(&doc, args.json)
}

fn parse(args: &ParseArgs) -> Result<()> {
    let doc = if let Some(html) = &args.html {
        parse_html_string(html)?
    } else if let Some(path) = &args.path {
        load_file(path)?
    } else {
        bail!("parse requires a FILE or --html")
    };

    if args.tokens {
        println!("{}", "=== Tokens ===".bold());
        for token in doc.tokens() {
            println!("{token}");
        }
        println!();
    }

    if args.css {
        println!("{}", "=== Style Rules ===".bold());
        for rule in &doc.rules {
            let declarations: Vec<String> = rule
                .declarations
                .iter()
                .map(|d| format!("{}: {}", d.property, d.value))
                .collect();
            let selectors: Vec<&str> = rule.selectors.iter().map(|s| s.text.as_str()).collect();
            let specificity = rule
                .selector()
                .map(|s| s.specificity().to_string())
                .unwrap_or_default();
            println!(
                "{} {{ {} }} {}",
                selectors.join(", "),
                declarations.join("; "),
                specificity.dimmed()
            );
        }
        println!();
    }

    print_dom(&doc, args.json)
}

fn serve(args: &ServeArgs) -> Result<()> {
    let document = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?,
        None => DEFAULT_DOCUMENT.to_string(),
    };
    let server = FixtureServer::bind((args.bind.as_str(), args.port), document)
        .with_context(|| format!("failed to bind {}:{}", args.bind, args.port))?;
    println!("{} http://{}", "Serving on".green(), server.local_addr()?);
    server.serve()?;
    Ok(())
}

fn print_status(response: &Response) {
    match response.status_code {
        Some(code) if response.is_success() => {
            println!("{} {}", code.green().bold(), response.status_text);
        }
        Some(code) => println!("{} {}", code.yellow().bold(), response.status_text),
        None => println!("{}", "malformed status line".red()),
    }
}

fn print_dom(doc: &LoadedDocument, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(&doc.dom.view(doc.dom.root()))?;
        println!("{out}");
        return Ok(());
    }

    println!("{}", "=== DOM Tree ===".bold());
    print!("{}", format_tree(&doc.dom, doc.dom.root()));

    println!("\n{}", "=== Summary ===".bold());
    println!("{} nodes", doc.dom.len());
    println!("{} style rules", doc.rules.len());
    println!("{} elements laid out", doc.layout_order.len());
    Ok(())
}
