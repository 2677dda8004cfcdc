//! Command-line interface for the grammar engine
//! Tokenizes and parses expressions against the built-in authorization grammar or a grammar file.
//!
//! Usage:
//!   grammar tokenize `<expr>` [--grammar `<file>`]                       - Print one token per line
//!   grammar parse `<expr>` [--grammar `<file>`] [--format `<format>`]    - Print the parse tree
//!   grammar check [--grammar `<file>`]                                 - Validate and describe a grammar

use clap::{Arg, ArgAction, ArgMatches, Command};
use grammar_engine::engine::config::{GrammarConfig, Loader};
use grammar_engine::engine::formats::{self, OutputFormat};
use grammar_engine::engine::token::MatchRule;
use grammar_engine::Grammar;
use tracing_subscriber::EnvFilter;

fn main() {
    let grammar_arg = Arg::new("grammar")
        .long("grammar")
        .short('g')
        .value_name("FILE")
        .help("Grammar file (TOML); defaults to the built-in authorization grammar");

    let matches = Command::new("grammar")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tokenize and parse expressions with a declarative operator grammar")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true)
                .help("Increase logging verbosity (-v: debug, -vv+: trace)"),
        )
        .subcommand(
            Command::new("tokenize")
                .about("Print the tokens of an expression")
                .arg(
                    Arg::new("expr")
                        .help("Expression to tokenize")
                        .required(true)
                        .index(1),
                )
                .arg(grammar_arg.clone()),
        )
        .subcommand(
            Command::new("parse")
                .about("Print the parse tree of an expression")
                .arg(
                    Arg::new("expr")
                        .help("Expression to parse")
                        .required(true)
                        .index(1),
                )
                .arg(grammar_arg.clone())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (treeviz, sexp, json, yaml)")
                        .default_value("treeviz"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Validate a grammar and list its tokens and elements")
                .arg(grammar_arg),
        )
        .get_matches();

    init_tracing(matches.get_count("verbose"));

    let result = match matches.subcommand() {
        Some(("tokenize", sub)) => handle_tokenize_command(sub),
        Some(("parse", sub)) => handle_parse_command(sub),
        Some(("check", sub)) => handle_check_command(sub),
        _ => unreachable!(),
    };

    match result {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_directive = directive_for_verbosity(verbose);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "grammar_engine=warn",
        1 => "grammar_engine=debug",
        _ => "grammar_engine=trace",
    }
}

fn load_config(matches: &ArgMatches) -> Result<GrammarConfig, String> {
    let loader = match matches.get_one::<String>("grammar") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::with_defaults(),
    };
    loader.load().map_err(|e| e.to_string())
}

fn load_grammar(matches: &ArgMatches) -> Result<Grammar, String> {
    load_config(matches)?.build().map_err(|e| e.to_string())
}

fn expression(matches: &ArgMatches) -> &str {
    matches
        .get_one::<String>("expr")
        .map(String::as_str)
        .unwrap_or_default()
}

/// Handle the tokenize command
fn handle_tokenize_command(matches: &ArgMatches) -> Result<String, String> {
    let grammar = load_grammar(matches)?;
    let tokens = grammar
        .tokenize(expression(matches))
        .map_err(|e| e.to_string())?;
    Ok(tokens.iter().map(|token| format!("{}\n", token)).collect())
}

/// Handle the parse command
fn handle_parse_command(matches: &ArgMatches) -> Result<String, String> {
    let format: OutputFormat = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("treeviz")
        .parse()?;
    let grammar = load_grammar(matches)?;
    let root = grammar
        .parse_str(expression(matches))
        .map_err(|e| e.to_string())?;
    let mut output = formats::render(&root, format)?;
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

/// Handle the check command
fn handle_check_command(matches: &ArgMatches) -> Result<String, String> {
    let config = load_config(matches)?;
    let grammar = config.build().map_err(|e| e.to_string())?;

    let mut output = format!(
        "Grammar {} is valid\n\nTokens (lexer order):\n",
        config.name.as_deref().unwrap_or("<unnamed>")
    );
    for token in grammar.tokens() {
        let rule = match token.rule() {
            MatchRule::Literal(literal) => format!("literal {:?}", literal),
            MatchRule::Pattern(regex) => format!("pattern /{}/", regex.as_str()),
        };
        let ignored = if grammar.ignored().iter().any(|ignored| ignored.name() == token.name()) {
            " (ignored)"
        } else {
            ""
        };
        output.push_str(&format!("  {} {}{}\n", token, rule, ignored));
    }

    output.push_str("\nElements (priority order):\n");
    for element in grammar.elements_by_priority() {
        output.push_str(&format!("  {}\n", element));
    }
    Ok(output)
}
