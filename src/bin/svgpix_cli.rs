//! svgpix CLI - render an SVG file to a PNG bitmap
//!
//! Reads SVG markup from a file or stdin, writes PNG to a file or stdout.
//! Returns non-zero on any failure, with a message on stderr.

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;

use svgpix::{Document, Loader, RenderError};

#[derive(Parser)]
#[command(name = "svgpix")]
#[command(version)]
#[command(about = "Render an SVG document to a PNG bitmap")]
struct Cli {
    /// Input filename, or - for stdin
    input: String,

    /// Output filename, or - for stdout
    output: String,

    /// Output width in pixels (negative or omitted: derive from the document)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    width: i32,

    /// Output height in pixels (negative or omitted: derive from the document)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    height: i32,

    /// Background color in RRGGBBAA hex
    #[arg(long, default_value = "00000000", value_parser = parse_hex_color)]
    background: u32,
}

fn parse_hex_color(s: &str) -> Result<u32, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u32::from_str_radix(digits, 16).map_err(|_| format!("'{s}' is not a valid RRGGBBAA hex color"))
}

fn load_input(loader: &mut Loader, input: &str) -> Result<Document, RenderError> {
    if input == "-" {
        let mut data = Vec::new();
        std::io::stdin().lock().read_to_end(&mut data)?;
        loader.load_from_data(&data)
    } else {
        loader.load_from_file(input)
    }
}

fn run(cli: &Cli) -> Result<(), RenderError> {
    let mut loader = Loader::new();
    loader.load_system_fonts();

    let document = load_input(&mut loader, &cli.input)?;
    let bitmap = document.render_to_bitmap(cli.width, cli.height, cli.background)?;

    if cli.output == "-" {
        bitmap.write_to_png_stream(&mut std::io::stdout().lock())?;
    } else {
        bitmap.write_to_png(&cli.output)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(RenderError::Io(e)) => {
            eprintln!("svgpix: {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("svgpix: {e}");
            ExitCode::from(2)
        }
    }
}
