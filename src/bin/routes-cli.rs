use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use minimal_routes::config::load_config;
use minimal_routes::dispatch::decode_path;
use minimal_routes::routing::{match_route, ParamValue, Params, QueryMap, RouteTable};

#[derive(Parser)]
#[command(name = "routes-cli")]
#[command(about = "Inspect the route table of a minimal-routes config", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List routes in resolution order
    List,
    /// Resolve a path to a page
    Match {
        /// Request path, percent-encoded as on the wire
        path: String,
    },
    /// Build the URLs for a named route
    Reverse {
        name: String,
        /// Route parameters as key=value; repeat a key for list values
        #[arg(value_parser = parse_pair)]
        params: Vec<(String, String)>,
        /// Query parameters as key=value
        #[arg(short, long, value_parser = parse_pair)]
        query: Vec<(String, String)>,
        /// Fragment appended to the public URL
        #[arg(long, default_value = "")]
        hash: String,
    },
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{s}'"))
}

fn collect(pairs: Vec<(String, String)>) -> Params {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in pairs {
        grouped.entry(key).or_default().push(value);
    }
    grouped
        .into_iter()
        .map(|(key, mut values)| {
            let value = if values.len() == 1 {
                ParamValue::One(values.remove(0))
            } else {
                ParamValue::Many(values)
            };
            (key, value)
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let table = RouteTable::from_declarations(&config.routes)?;

    let output = match cli.command {
        Commands::List => {
            let routes: Vec<_> = table
                .iter()
                .map(|(name, route)| {
                    json!({
                        "name": name,
                        "page": route.page(),
                        "pattern": route.pattern(),
                        "meta": route.meta(),
                    })
                })
                .collect();
            json!(routes)
        }
        Commands::Match { path } => {
            let decoded = decode_path(&path)?;
            match match_route(table.routes(), &decoded) {
                Some(found) => json!({
                    "page": found.route.page(),
                    "pattern": found.route.pattern(),
                    "params": found.params,
                }),
                None => serde_json::Value::Null,
            }
        }
        Commands::Reverse {
            name,
            params,
            query,
            hash,
        } => {
            let params = collect(params);
            let query: QueryMap = collect(query);
            let urls = table.urls(&name, &params, &query, &hash)?;
            json!({
                "internal": urls.internal,
                "public": urls.public,
                "href": urls.internal.to_string(),
                "as": urls.public.to_string(),
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
