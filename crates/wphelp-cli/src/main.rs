//! `wphelp` CLI — run the wphelp helpers from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Keyed JSON to XML (stdin → stdout)
//! echo '{"order":{"@attributes":{"id":"5"},"total":"9.99"}}' | wphelp xml
//!
//! # With declaration and indentation, file to file
//! wphelp xml --declaration --indent 2 -i orders.json -o orders.xml
//!
//! # XML back to keyed JSON
//! wphelp parse -i orders.xml
//!
//! # Text helpers
//! echo 'A very long product title' | wphelp text truncate --length 10
//! wphelp text sanitize 'zero‍width'
//!
//! # Numbers and codes
//! wphelp size 2M
//! wphelp human 1500
//! wphelp country USA
//!
//! # Order line items (JSON array of items on stdin)
//! wphelp line-items -i items.json
//! ```
//!
//! Logging goes to stderr. `-v` enables debug output for the helpers;
//! `RUST_LOG` overrides the filter entirely.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wphelp_core::commerce::{convert_country_code, format_line_items, OrderItem};
use wphelp_core::numbers::{human_number, parse_size};
use wphelp_core::text::{self, DEFAULT_EXCERPT_LENGTH, DEFAULT_OMISSION};
use wphelp_core::{SequenceDetection, WriterConfig};

#[derive(Parser)]
#[command(
    name = "wphelp",
    version,
    about = "Plugin development helpers: JSON to XML, text sanitizing, sizes and numbers"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serialize a keyed JSON document (`@attributes`, `@value`) to XML
    Xml {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// JSON file with writer options (declaration, indent, sequence_detection)
        #[arg(long)]
        config: Option<String>,
        /// Write an XML declaration first
        #[arg(long)]
        declaration: bool,
        /// Indent nested elements by N spaces
        #[arg(long)]
        indent: Option<usize>,
        /// Treat only JSON arrays as repeated elements (no numeric-key detection)
        #[arg(long)]
        arrays_only: bool,
    },
    /// Parse XML into keyed JSON
    Parse {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Text normalization helpers
    Text {
        #[command(subcommand)]
        op: TextOp,
    },
    /// Convert a size string like 2M or 512k to bytes
    Size {
        #[arg(allow_negative_numbers = true)]
        value: String,
    },
    /// Abbreviate a number (1500 → 1.5K)
    Human {
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Convert between ISO 3166 alpha-2 and alpha-3 country codes
    Country { code: String },
    /// Format order items (JSON array) into display-ready line items
    LineItems {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

#[derive(Subcommand)]
enum TextOp {
    /// Truncate to a character length, ending with an omission marker
    Truncate {
        /// Text to process (reads from stdin if omitted)
        text: Option<String>,
        #[arg(short, long)]
        length: usize,
        #[arg(long, default_value = DEFAULT_OMISSION)]
        omission: String,
    },
    /// Keep only printable ASCII characters
    Ascii {
        /// Text to process (reads from stdin if omitted)
        text: Option<String>,
    },
    /// Remove invisible and unusual Unicode characters
    Sanitize {
        /// Text to process (reads from stdin if omitted)
        text: Option<String>,
    },
    /// Plain-text excerpt of HTML, cut at a word boundary
    Excerpt {
        /// Text to process (reads from stdin if omitted)
        text: Option<String>,
        #[arg(short, long, default_value_t = DEFAULT_EXCERPT_LENGTH)]
        length: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Xml {
            input,
            output,
            config,
            declaration,
            indent,
            arrays_only,
        } => {
            let mut writer_config = load_config(config.as_deref())?;
            if declaration {
                writer_config.declaration = true;
            }
            if indent.is_some() {
                writer_config.indent = indent;
            }
            if arrays_only {
                writer_config.sequence_detection = SequenceDetection::ArraysOnly;
            }
            debug!(?writer_config, "serializing keyed JSON");

            let json = read_input(input.as_deref())?;
            let xml = wphelp_core::keyed_to_xml(&json, &writer_config)
                .context("Failed to serialize JSON to XML")?;
            write_output(output.as_deref(), &xml)?;
        }
        Commands::Parse { input, output } => {
            let xml = read_input(input.as_deref())?;
            let value = wphelp_core::parse_to_keyed(&xml).context("Failed to parse XML")?;
            let pretty = serde_json::to_string_pretty(&value)?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Text { op } => {
            let out = match op {
                TextOp::Truncate {
                    text: t,
                    length,
                    omission,
                } => text::truncate(&text_arg(t)?, length, &omission),
                TextOp::Ascii { text: t } => text::to_ascii(&text_arg(t)?),
                TextOp::Sanitize { text: t } => text::sanitize_utf8(&text_arg(t)?),
                TextOp::Excerpt { text: t, length } => text::excerpt(&text_arg(t)?, length),
            };
            println!("{}", out);
        }
        Commands::Size { value } => {
            let bytes = parse_size(&value).context("Failed to parse size")?;
            println!("{}", bytes);
        }
        Commands::Human { value } => {
            println!("{}", human_number(value));
        }
        Commands::Country { code } => {
            println!("{}", convert_country_code(code.trim()));
        }
        Commands::LineItems { input } => {
            let json = read_input(input.as_deref())?;
            let items: Vec<OrderItem> =
                serde_json::from_str(&json).context("Failed to read order items")?;
            let lines = format_line_items(&items);
            println!("{}", serde_json::to_string_pretty(&lines)?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "wphelp_core=debug,wphelp=debug"
    } else {
        "wphelp_core=warn,wphelp=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Load writer options from a JSON file, or defaults when no file is given.
fn load_config(path: Option<&str>) -> Result<WriterConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            serde_json::from_str(&raw).with_context(|| format!("Invalid config file: {}", path))
        }
        None => Ok(WriterConfig::default()),
    }
}

/// Use the positional text if given, otherwise stdin without its final newline.
fn text_arg(text: Option<String>) -> Result<String> {
    match text {
        Some(t) => Ok(t),
        None => {
            let mut buf = read_input(None)?;
            if buf.ends_with('\n') {
                buf.pop();
                if buf.ends_with('\r') {
                    buf.pop();
                }
            }
            Ok(buf)
        }
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
