use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;

use spec_harness_router::config::load_or_default;
use spec_harness_router::routing::{harness_routes, MatchResult, Params, RouteTable, Target};
use spec_harness_router::HarnessOptions;

#[derive(Parser)]
#[command(name = "routes-cli")]
#[command(about = "Inspect the spec harness route table", long_about = None)]
struct Cli {
    /// TOML configuration file used to decide optional mounts.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Mount the spec runner regardless of configuration.
    #[arg(long)]
    with_spec_runner: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every route in registration order
    List,
    /// Resolve a request against the table
    Match { method: String, path: String },
    /// Build the path of a named route
    Path {
        name: String,
        /// Parameters as key=value
        #[arg(value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
    /// Fetch the route listing from a running server
    Remote {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,

        #[arg(short, long, default_value = "/_harness/routes")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let Cli {
        config,
        with_spec_runner,
        command,
    } = Cli::parse();
    let table = || build_table(config.as_deref(), with_spec_runner);

    match command {
        Commands::Remote { url, path } => {
            let res = reqwest::get(format!("{url}{path}")).await?;
            return print_response(res).await;
        }
        Commands::List => {
            for info in table()?.describe() {
                println!("{info}");
            }
        }
        Commands::Match { method, path } => {
            return Ok(match resolve(&table()?, &method, &path) {
                Ok(lines) => {
                    println!("{lines}");
                    ExitCode::SUCCESS
                }
                Err(miss) => {
                    eprintln!("{miss}");
                    ExitCode::FAILURE
                }
            });
        }
        Commands::Path { name, params } => {
            let params: Params = params.into_iter().collect();
            println!("{}", table()?.path_for(&name, &params)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn build_table(
    config: Option<&Path>,
    with_spec_runner: bool,
) -> Result<RouteTable, Box<dyn std::error::Error>> {
    let config = load_or_default(config)?;
    let mut options = config.harness_options();
    if with_spec_runner && options.spec_runner.is_none() {
        options = HarnessOptions::with_spec_runner();
    }
    Ok(harness_routes(&options)?)
}

/// Describe how `method path` resolves, or why it does not.
fn resolve(table: &RouteTable, method: &str, path: &str) -> Result<String, String> {
    let m = match table.match_str(method, path) {
        MatchResult::Matched(m) => m,
        MatchResult::NotFound => {
            return Err(format!(
                "No route matches {} {}",
                method.to_ascii_uppercase(),
                path
            ))
        }
    };

    let mut lines = match &m.target {
        Target::Action { controller, action } => format!("{controller}#{action}"),
        Target::Mounted { app, script_name, path_info } => {
            format!("{app} (mounted at {script_name}, path {path_info})")
        }
    };
    for (key, value) in m.params.iter() {
        lines.push_str(&format!("\n  {key} = {value}"));
    }
    lines.push_str(&format!("\n  via {}", m.route));
    Ok(lines)
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{s}`"))
}

async fn print_response(res: reqwest::Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(ExitCode::FAILURE);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        harness_routes(&HarnessOptions::default()).unwrap()
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(parse_key_val("format=json"), Ok(("format".into(), "json".into())));
        assert_eq!(parse_key_val("q=a=b"), Ok(("q".into(), "a=b".into())));
        assert_eq!(parse_key_val("empty="), Ok(("empty".into(), String::new())));
        assert!(parse_key_val("format").is_err());
    }

    #[test]
    fn test_resolve_match() {
        let lines = resolve(&table(), "get", "/method_test/foo").unwrap();
        assert_eq!(
            lines,
            "method_test#foo\n  action = foo\n  via GET /method_test/:action(.:format)"
        );
    }

    #[test]
    fn test_resolve_miss() {
        assert_eq!(
            resolve(&table(), "post", "/css_test/bar"),
            Err("No route matches POST /css_test/bar".to_string())
        );
    }

    #[test]
    fn test_build_table_with_spec_runner() {
        assert_eq!(build_table(None, false).unwrap().len(), 11);
        assert_eq!(build_table(None, true).unwrap().len(), 12);
    }
}
