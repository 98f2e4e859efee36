mod debug_report;

use aperto::parse_rules;
use chrono::NaiveDateTime;
use std::io::{self, IsTerminal, Read};

fn main() {
    env_logger::init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    match parse_rules(&config.input) {
        Ok(rules) => {
            debug_report::print_rules(&config.input, &rules, config.color);
            if let Some(when) = config.at {
                debug_report::print_status(when, rules.status_at_datetime(when), config.color);
            }
        }
        Err(err) => {
            debug_report::print_error(&config.input, &err, config.color);
            std::process::exit(1);
        }
    }
}

struct CliConfig {
    input: String,
    at: Option<NaiveDateTime>,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut at = None;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("aperto {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--at" => {
                let value = args.next().ok_or_else(|| "error: --at expects a value".to_string())?;
                at = Some(parse_instant(&value)?);
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--at=") => {
                let value = arg.trim_start_matches("--at=");
                at = Some(parse_instant(value)?);
            }
            _ if arg.starts_with("--input=") => {
                let value = arg.trim_start_matches("--input=");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value.to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input: input.trim_end_matches(['\n', '\r']).to_string(), at, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn parse_instant(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .map_err(|_| format!("error: invalid --at '{value}' (expected YYYY-MM-DDTHH:MM[:SS])"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "aperto {version}

Opening-hours style availability parser CLI.

Usage:
  aperto [OPTIONS] [--] <rules...>
  aperto [OPTIONS] --input <rules>

Options:
  -i, --input <rules>        Availability expression to parse. If omitted,
                             reads remaining args or stdin when no args are
                             provided.
  --at <timestamp>           Also evaluate the rules at this instant,
                             YYYY-MM-DDTHH:MM[:SS].
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  The expression did not parse.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
