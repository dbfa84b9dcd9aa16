use clap::{ArgAction, Parser, Subcommand};
use crossterm::style::Stylize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use rtttl_gcode::note::{Pitch, Tune};
use rtttl_gcode::{Dialect, RenderOptions, library, parse, render, to_text};

#[derive(Parser)]
#[command(name = "rtttl-gcode", about = "Convert RTTTL ring tones to printer beep commands")]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a tune and display its notes
    Parse {
        /// RTTTL string, or @name for a built-in tune
        tune: String,

        /// Print the parsed tune as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a tune to a command stream
    Render {
        /// RTTTL string, or @name for a built-in tune
        tune: String,

        /// Start with a comment line carrying the tune name
        #[arg(long)]
        annotate: bool,

        /// Directive templates to use instead of Marlin G-code
        #[arg(long)]
        dialect: Option<PathBuf>,

        /// Print the commands as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the built-in tunes
    Library,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Parse { tune, json } => {
            let tune = parse_input(&resolve_tune(&tune));
            if json {
                print_json(&tune);
            } else {
                print_tune(&tune);
            }
        }
        Command::Render {
            tune,
            annotate,
            dialect,
            json,
        } => {
            let tune = parse_input(&resolve_tune(&tune));
            let commands = render(
                &tune,
                &RenderOptions {
                    include_name_annotation: annotate,
                },
            );
            if json {
                print_json(&commands);
            } else {
                let dialect = match dialect {
                    Some(path) => load_dialect(&path),
                    None => Dialect::default(),
                };
                print!("{}", to_text(&commands, &dialect));
            }
        }
        Command::Library => {
            for entry in library::all() {
                println!("@{:<12} {}", entry.key, entry.rtttl);
            }
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "error:".red().bold(), message);
    std::process::exit(1);
}

/// `@name` picks a built-in tune; anything else is taken literally
fn resolve_tune(arg: &str) -> String {
    match arg.strip_prefix('@') {
        Some(key) => match library::find(key) {
            Some(entry) => {
                tracing::info!(key = entry.key, "using built-in tune");
                entry.rtttl.to_string()
            }
            None => fail(format!("no built-in tune named '{}'", key)),
        },
        None => arg.to_string(),
    }
}

fn parse_input(input: &str) -> Tune {
    parse(input).unwrap_or_else(|e| fail(format!("parse error: {}", e)))
}

fn load_dialect(path: &Path) -> Dialect {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("reading {}: {}", path.display(), e)));
    content
        .parse()
        .unwrap_or_else(|e| fail(format!("{}: {}", path.display(), e)))
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(format!("serializing: {}", e)),
    }
}

fn print_tune(tune: &Tune) {
    let settings = tune.settings();
    if tune.name().is_empty() {
        println!("Name: {}", "(none)".dim());
    } else {
        println!("Name: {}", tune.name().bold());
    }
    println!(
        "Settings: d={} o={} b={} (whole note {:.1} ms)",
        settings.duration.code(),
        settings.octave.get(),
        settings.bpm.get(),
        settings.whole_note_ms()
    );
    println!(
        "Notes: {} ({} ms total)",
        tune.notes().len(),
        tune.total_duration_ms()
    );
    println!();
    for note in tune.notes() {
        let dot = if note.dotted() { "." } else { "" };
        match note.pitch() {
            Pitch::Rest => {
                println!(
                    "  {:<4} 1/{:<3} {:>10} {:>6} ms",
                    format!("P{}", dot),
                    note.duration().code(),
                    "-",
                    note.duration_ms()
                );
            }
            Pitch::Tone { name, octave } => {
                println!(
                    "  {:<4} 1/{:<3} {:>7.2} Hz {:>6} ms",
                    format!("{}{}{}", name.symbol(), octave.get(), dot),
                    note.duration().code(),
                    note.frequency_hz(),
                    note.duration_ms()
                );
            }
        }
    }
}
