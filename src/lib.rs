mod error;

pub use crate::error::{ConvertError, ErrorKind, Result};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const INPUT_FILE_NAME: &str = "batchfile_2_kelvin.csv";
pub const OUTPUT_FILE_NAME: &str = "batchfile_3_fahrenheit.csv";
pub const TEMPERATURE_COLUMN: usize = 1;

const KELVIN_OFFSET: f64 = 273.15;

/// `(K - 273.15) * 9 / 5 + 32`, evaluated left to right.
pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    (kelvin - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub delimiter: u8,
    /// Zero-based index of the Kelvin column.
    pub column: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            column: TEMPERATURE_COLUMN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Data rows written, header excluded.
    pub rows: usize,
}

fn convert_record(
    record: &StringRecord,
    options: &ConvertOptions,
) -> Result<StringRecord> {
    let line = record.position().map_or(0, |pos| pos.line());

    let field = record.get(options.column).ok_or(ConvertError::Shape {
        line,
        column: options.column,
        fields: record.len(),
    })?;

    let kelvin: f64 = field.trim().parse().map_err(|source| ConvertError::Parse {
        line,
        value: field.into(),
        source,
    })?;
    let fahrenheit = format!("{:?}", kelvin_to_fahrenheit(kelvin));
    log::debug!("line {}: {} K -> {} F", line, field, fahrenheit);

    Ok(record
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            if idx == options.column {
                fahrenheit.as_str()
            } else {
                value
            }
        })
        .collect())
}

fn quoted_newlines(record: &StringRecord) -> u64 {
    record
        .iter()
        .map(|field| field.matches('\n').count() as u64)
        .sum()
}

/// Copy the header of `input` to `output`, then every data row with the
/// temperature column converted. Stops at the first bad row; rows already
/// written stay written.
pub fn convert_records(
    input: impl Read,
    output: impl Write,
    options: &ConvertOptions,
) -> Result<Summary> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(input);
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .delimiter(options.delimiter)
        .from_writer(output);

    let mut header = StringRecord::new();
    if !reader.read_record(&mut header)? {
        return Err(ConvertError::EmptyInput);
    }
    writer.write_record(&header)?;

    let mut record = StringRecord::new();
    let mut last_line = reader.position().line();
    let mut rows = 0;
    while reader.read_record(&mut record)? {
        let line = reader.position().line();
        // csv drops blank lines; any newline beyond the row's own terminator
        // and its quoted ones means one was skipped.
        if line - last_line > 1 + quoted_newlines(&record) {
            return Err(ConvertError::Shape {
                line: last_line,
                column: options.column,
                fields: 0,
            });
        }
        last_line = line;

        let record = convert_record(&record, options)?;
        writer.write_record(&record)?;
        rows += 1;
    }

    writer.flush()?;
    Ok(Summary { rows })
}

/// Open `input`, create `output` and run [`convert_records`] over them.
///
/// The input is opened first, so a missing input never leaves an output
/// file behind.
pub fn convert_file(input: &Path, output: &Path, options: &ConvertOptions) -> Result<Summary> {
    log::debug!("Start convert {} -> {}", input.display(), output.display());

    let input_file = File::open(input).map_err(|source| ConvertError::Open {
        path: input.into(),
        source,
    })?;
    let output_file = File::create(output).map_err(|source| ConvertError::Create {
        path: output.into(),
        source,
    })?;

    convert_records(input_file, output_file, options)
}

/// Run [`convert_file`] and report the outcome through the `log` facade
/// instead of returning the error.
pub fn process_rows(input: &Path, output: &Path, options: &ConvertOptions) -> Option<Summary> {
    match convert_file(input, output, options) {
        Ok(summary) => {
            log::info!(
                "Conversion complete. Results written to {}",
                output.display()
            );
            Some(summary)
        }
        Err(err) => {
            log::error!("An error occurred: {}", err);
            None
        }
    }
}

#[cfg(test)]
fn convert_str(input: &str, options: &ConvertOptions) -> (Result<Summary>, String) {
    let mut out = Vec::new();
    let ret = convert_records(input.as_bytes(), &mut out, options);
    (ret, String::from_utf8(out).unwrap())
}

#[test]
fn fixed_points() {
    assert_eq!(kelvin_to_fahrenheit(273.15), 32.0);
    assert_eq!(kelvin_to_fahrenheit(373.15), 212.0);
    assert!((kelvin_to_fahrenheit(0.0) - -459.67).abs() < 1e-9);
    assert_eq!(kelvin_to_fahrenheit(300.0), (300.0 - 273.15) * 9.0 / 5.0 + 32.0);
}

#[test]
fn non_finite_passes_through() {
    assert!(kelvin_to_fahrenheit(f64::NAN).is_nan());
    assert_eq!(kelvin_to_fahrenheit(f64::INFINITY), f64::INFINITY);
}

#[test]
fn converts_rows() {
    let (ret, out) = convert_str("id,temp_k\n1,273.15\n2,373.15\n", &Default::default());
    assert_eq!(ret.unwrap(), Summary { rows: 2 });
    assert_eq!(out, "id,temp_k\n1,32.0\n2,212.0\n");
}

#[test]
fn keeps_other_fields() {
    let (ret, out) = convert_str(
        "city,temp_k,note\n\"Oslo, NO\",273.15,cold\n",
        &Default::default(),
    );
    assert_eq!(ret.unwrap().rows, 1);
    assert_eq!(out, "city,temp_k,note\n\"Oslo, NO\",32.0,cold\n");
}

#[test]
fn custom_delimiter_and_column() {
    let options = ConvertOptions {
        delimiter: b';',
        column: 0,
    };
    let (ret, out) = convert_str("k;name\n373.15;boil\n", &options);
    assert_eq!(ret.unwrap().rows, 1);
    assert_eq!(out, "k;name\n212.0;boil\n");
}

#[test]
fn stops_at_bad_value() {
    let (ret, out) = convert_str("id,temp_k\n1,273.15\n2,abc\n3,373.15\n", &Default::default());
    let err = ret.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    match err {
        ConvertError::Parse { line, value, .. } => {
            assert_eq!(line, 3);
            assert_eq!(value, "abc");
        }
        err => panic!("unexpected error: {:?}", err),
    }
    assert_eq!(out, "id,temp_k\n1,32.0\n");
}

#[test]
fn short_row() {
    let (ret, _) = convert_str("id,temp_k\n1\n", &Default::default());
    let err = ret.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);
    assert!(matches!(
        err,
        ConvertError::Shape {
            line: 2,
            column: 1,
            fields: 1
        }
    ));
}

#[test]
fn blank_line() {
    let (ret, out) = convert_str("id,temp_k\n1,273.15\n\n2,373.15\n", &Default::default());
    let err = ret.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);
    assert!(matches!(
        err,
        ConvertError::Shape {
            line: 3,
            column: 1,
            fields: 0
        }
    ));
    assert_eq!(out, "id,temp_k\n1,32.0\n");
}

#[test]
fn blank_line_crlf() {
    let (ret, out) = convert_str(
        "id,temp_k\r\n1,273.15\r\n\r\n2,373.15\r\n",
        &Default::default(),
    );
    assert_eq!(ret.unwrap_err().kind(), ErrorKind::Shape);
    assert_eq!(out, "id,temp_k\n1,32.0\n");
}

#[test]
fn crlf_rows() {
    let (ret, out) = convert_str("id,temp_k\r\n1,273.15\r\n2,373.15\r\n", &Default::default());
    assert_eq!(ret.unwrap().rows, 2);
    assert_eq!(out, "id,temp_k\n1,32.0\n2,212.0\n");
}

#[test]
fn multiline_quoted_field() {
    let (ret, out) = convert_str(
        "id,temp_k,note\n1,273.15,\"two\nlines\"\n2,373.15,x\n",
        &Default::default(),
    );
    assert_eq!(ret.unwrap().rows, 2);
    assert_eq!(out, "id,temp_k,note\n1,32.0,\"two\nlines\"\n2,212.0,x\n");
}

#[test]
fn empty_input() {
    let (ret, out) = convert_str("", &Default::default());
    assert!(matches!(ret, Err(ConvertError::EmptyInput)));
    assert!(out.is_empty());
}

#[test]
fn header_only() {
    let (ret, out) = convert_str("id,temp_k\n", &Default::default());
    assert_eq!(ret.unwrap().rows, 0);
    assert_eq!(out, "id,temp_k\n");
}
