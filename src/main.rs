use anyhow::{bail, Result};
use kelvin2csv::{process_rows, ConvertOptions, INPUT_FILE_NAME, OUTPUT_FILE_NAME, TEMPERATURE_COLUMN};
use std::io::Write;
use std::path::PathBuf;
use structopt::StructOpt;

const BANNER: &str = "===============================================";

#[derive(StructOpt)]
#[structopt(about = "Convert a Kelvin column of a CSV file to Fahrenheit")]
struct Opt {
    /// Input CSV file
    #[structopt(short, long, parse(from_os_str))]
    input: Option<PathBuf>,
    /// Output CSV file
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
    /// Zero-based index of the Kelvin column
    #[structopt(short, long)]
    column: Option<usize>,
    /// Field delimiter, a single ASCII character
    #[structopt(short, long, default_value = ",")]
    delimiter: char,
}

impl Opt {
    fn options(&self) -> Result<ConvertOptions> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter must be a single ASCII character, got {:?}", self.delimiter);
        }
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            bail!("{:?} can't be used as a delimiter", self.delimiter);
        }

        Ok(ConvertOptions {
            delimiter: self.delimiter as u8,
            column: self.column.unwrap_or(TEMPERATURE_COLUMN),
        })
    }
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(buf, "{} - {} - {}", buf.timestamp(), record.level(), record.args())
        })
        .init();
}

fn run(opt: Opt) -> Result<()> {
    let options = opt.options()?;
    let input = opt.input.unwrap_or_else(|| INPUT_FILE_NAME.into());
    let output = opt.output.unwrap_or_else(|| OUTPUT_FILE_NAME.into());

    log::info!("{}", BANNER);
    log::info!("Starting Kelvin to Fahrenheit conversion.");
    process_rows(&input, &output, &options);
    log::info!("Processing complete! Check for new file.");
    log::info!("{}", BANNER);
    Ok(())
}

fn main() {
    init_logger();

    if let Err(err) = run(Opt::from_args()) {
        log::error!("An error occurred: {:#}", err);
    }
}

#[cfg(test)]
fn with_delimiter(delimiter: char) -> Opt {
    Opt {
        input: None,
        output: None,
        column: None,
        delimiter,
    }
}

#[test]
fn delimiter_options() {
    assert_eq!(
        with_delimiter(';').options().unwrap(),
        ConvertOptions {
            delimiter: b';',
            column: TEMPERATURE_COLUMN,
        }
    );
    assert!(with_delimiter('\t').options().is_ok());

    for bad in &['"', '\n', '\r', '§'] {
        assert!(with_delimiter(*bad).options().is_err(), "{:?}", bad);
    }
}
