use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};

use clap::Parser;
use jsonview::{MapKind, NullRepr, ParseOptions, Value};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jsonview", version, about = "Parse JSON and print it, or one value by pointer")]
struct Args {
    /// Input file path. Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Print only the value at this JSON pointer (e.g. /items/0/name), read lazily.
    #[arg(long, value_name = "pointer")]
    get: Option<String>,

    /// Pretty-print with two-space indentation.
    #[arg(long)]
    pretty: bool,

    /// Sort object keys.
    #[arg(long)]
    sorted: bool,

    /// Represent null as the missing marker (printed as null).
    #[arg(long)]
    missing: bool,

    /// Keep every number as its source text.
    #[arg(long = "number-as-raw", conflicts_with = "bignum_as_raw")]
    number_as_raw: bool,

    /// Keep numbers that do not fit i64/u64/f64 as source text.
    #[arg(long = "bignum-as-raw")]
    bignum_as_raw: bool,

    /// Allow // and /* */ comments.
    #[arg(long = "allow-comments")]
    allow_comments: bool,

    /// Allow one trailing comma before ] or }.
    #[arg(long = "allow-trailing-commas")]
    allow_trailing_commas: bool,

    /// Allow NaN and Infinity literals.
    #[arg(long = "allow-nan-inf")]
    allow_nan_inf: bool,

    /// Replace invalid UTF-8 in strings instead of failing.
    #[arg(long = "allow-invalid-unicode")]
    allow_invalid_unicode: bool,

    /// Enable every --allow-* extension.
    #[arg(long)]
    permissive: bool,

    /// Ignore anything after the first complete value.
    #[arg(long = "stop-when-done")]
    stop_when_done: bool,

    /// Unescape strings inside the input buffer.
    #[arg(long = "in-place")]
    in_place: bool,

    /// Maximum container nesting when materializing.
    #[arg(long = "max-depth", value_name = "number", default_value_t = jsonview::options::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl Args {
    fn parse_options(&self) -> ParseOptions {
        let base = if self.permissive {
            ParseOptions::permissive()
        } else {
            ParseOptions::new()
                .with_allow_comments(self.allow_comments)
                .with_allow_trailing_commas(self.allow_trailing_commas)
                .with_allow_nan_inf(self.allow_nan_inf)
                .with_allow_invalid_unicode(self.allow_invalid_unicode)
        };
        base.with_map_kind(if self.sorted {
            MapKind::Sorted
        } else {
            MapKind::Ordered
        })
        .with_null(if self.missing {
            NullRepr::Missing
        } else {
            NullRepr::Null
        })
        .with_number_as_raw(self.number_as_raw)
        .with_bignum_as_raw(self.bignum_as_raw)
        .with_stop_at_first_value(self.stop_when_done)
        .with_in_place(self.in_place)
        .with_max_depth(self.max_depth)
    }
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let options = args.parse_options();
    let input = read_input(args.input.as_deref())?;

    let value = match args.get.as_deref() {
        Some(pointer) => lookup(input, pointer, &options)?,
        None => jsonview::parse_vec_with_options(input, &options)?,
    };

    with_output_writer(args.output.as_deref(), |writer| {
        write_json(writer, &value, args.pretty)
    })
}

/// Resolve `pointer` through a lazy view, materializing only the hit.
fn lookup(input: Vec<u8>, pointer: &str, options: &ParseOptions) -> Result<Value, Box<dyn Error>> {
    jsonview::with_lazy_vec(input, options, |root| match root.pointer(pointer)? {
        Some(hit) => Ok(hit.to_value()?),
        None => Err(format!("no value at pointer {pointer:?}").into()),
    })
}

fn read_input(input: Option<&str>) -> Result<Vec<u8>, Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(fs::read(path)?),
    }
}

fn with_output_writer<F>(path: Option<&str>, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn Error>>,
{
    match path {
        Some(path) if path != "-" => {
            let mut file = fs::File::create(path)?;
            f(&mut file)
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            f(&mut handle)
        }
    }
}

fn write_json(writer: &mut dyn Write, value: &Value, pretty: bool) -> Result<(), Box<dyn Error>> {
    if !pretty {
        serde_json::to_writer(writer, value)?;
        return Ok(());
    }
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    value.serialize(&mut serializer)?;
    Ok(())
}
