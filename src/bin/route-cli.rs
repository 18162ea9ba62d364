use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use indexmap::IndexMap;
use serde_json::Value;

use route_client::config::loader::load_config;
use route_client::observability::logging;
use route_client::route::template::placeholder_name;
use route_client::{Client, RequestOptions, Route};

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Issue requests against templated API routes", long_about = None)]
struct Cli {
    /// Base URI the route template is appended to.
    #[arg(short, long)]
    base_uri: Option<String>,

    /// Client configuration file (TOML). Overrides --base-uri.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a GET request
    Get(RequestArgs),
    /// Send a POST request
    Post(RequestArgs),
    /// Send a PUT request
    Put(RequestArgs),
    /// Send a DELETE request
    Delete(RequestArgs),
    /// Send a request with an arbitrary method
    Request {
        #[arg(short, long)]
        method: String,

        #[command(flatten)]
        args: RequestArgs,
    },
}

#[derive(Args)]
struct RequestArgs {
    /// Path template, e.g. "bar/${barId}/status"
    #[arg(short, long)]
    path: String,

    /// Placeholder values, e.g. --bind barId=5 (repeatable)
    #[arg(long = "bind", value_name = "NAME=VALUE")]
    bindings: Vec<String>,

    /// Header overrides (repeatable)
    #[arg(long = "header", value_name = "NAME=VALUE")]
    headers: Vec<String>,

    /// Query parameters (repeatable)
    #[arg(long = "param", value_name = "NAME=VALUE")]
    params: Vec<String>,

    /// JSON request body
    #[arg(long)]
    data: Option<String>,

    /// Append a trailing slash to the terminal route URL
    #[arg(long)]
    trailing_slash: bool,

    /// Request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let cli = Cli::parse();

    let mut client = match (&cli.config, &cli.base_uri) {
        (Some(path), _) => Client::from_config(&load_config(path)?)?,
        (None, Some(base_uri)) => Client::new(base_uri.clone()),
        (None, None) => return Err("either --config or --base-uri is required".into()),
    };

    let (method, args) = match &cli.command {
        Commands::Get(args) => ("GET".to_string(), args),
        Commands::Post(args) => ("POST".to_string(), args),
        Commands::Put(args) => ("PUT".to_string(), args),
        Commands::Delete(args) => ("DELETE".to_string(), args),
        Commands::Request { method, args } => (method.to_uppercase(), args),
    };

    let route = resolve(&mut client, args)?;
    let options = build_options(args)?;

    let response = route.request(&method, &options)?;

    println!("Status: {}", response.status);
    match serde_json::from_str::<Value>(&response.body) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", response.body),
    }

    Ok(())
}

/// Register the path template and walk it, binding placeholder values as
/// they appear.
fn resolve(client: &mut Client, args: &RequestArgs) -> Result<Route, Box<dyn std::error::Error>> {
    let bindings = parse_pairs(&args.bindings)?;

    client.add_route_with(&args.path, args.trailing_slash)?;

    let segments: Vec<&str> = args.path.split('/').filter(|s| !s.is_empty()).collect();
    let first = segments
        .first()
        .ok_or("path template has no segments")?;

    let mut current = client
        .route(first)
        .ok_or_else(|| format!("route \"{first}\" is not registered"))?
        .clone();

    for segment in &segments[1..] {
        current = match placeholder_name(segment) {
            Some(name) => {
                let value = bindings
                    .get(name)
                    .ok_or_else(|| format!("missing --bind {name}=<value>"))?;
                current.bind(name, value)?
            }
            None => current
                .child(segment)
                .ok_or_else(|| format!("unknown segment \"{segment}\""))?
                .clone(),
        };
    }

    Ok(current)
}

fn build_options(args: &RequestArgs) -> Result<RequestOptions, Box<dyn std::error::Error>> {
    let mut options = RequestOptions::new();

    for (name, value) in parse_pairs(&args.headers)? {
        options = options.header(name, value);
    }
    for (name, value) in parse_pairs(&args.params)? {
        options = options.param(name, value);
    }
    if let Some(data) = &args.data {
        options = options.body(serde_json::from_str(data)?);
    }
    if let Some(ms) = args.timeout_ms {
        options = options.option("timeout_ms", Value::from(ms));
    }

    Ok(options)
}

fn parse_pairs(pairs: &[String]) -> Result<IndexMap<String, String>, Box<dyn std::error::Error>> {
    let mut parsed = IndexMap::new();
    for pair in pairs {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=VALUE, got \"{pair}\""))?;
        parsed.insert(name.to_string(), value.to_string());
    }
    Ok(parsed)
}
