use kelvin2csv::{convert_file, process_rows, ConvertError, ErrorKind, Summary};
use std::fs;
use tempfile::TempDir;

fn write_input(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("kelvin.csv");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn converts_file() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "id,temp_k\n1,273.15\n2,373.15\n");
    let output = dir.path().join("fahrenheit.csv");

    let summary = convert_file(&input, &output, &Default::default()).unwrap();

    assert_eq!(summary, Summary { rows: 2 });
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "id,temp_k\n1,32.0\n2,212.0\n"
    );
}

#[test]
fn preserves_rows_and_fields() {
    let dir = TempDir::new().unwrap();
    let input = "station,temp_k,date\nA,0,2024-01-01\nB,300,2024-01-02\nC,250.5,2024-01-03\n";
    let input_path = write_input(&dir, input);
    let output = dir.path().join("fahrenheit.csv");

    convert_file(&input_path, &output, &Default::default()).unwrap();
    let written = fs::read_to_string(&output).unwrap();

    let in_lines: Vec<&str> = input.lines().collect();
    let out_lines: Vec<&str> = written.lines().collect();
    assert_eq!(in_lines.len(), out_lines.len());
    assert_eq!(in_lines[0], out_lines[0]);

    for (src, dst) in in_lines.iter().zip(&out_lines).skip(1) {
        let src: Vec<&str> = src.split(',').collect();
        let dst: Vec<&str> = dst.split(',').collect();
        assert_eq!(src[0], dst[0]);
        assert_eq!(src[2], dst[2]);

        let kelvin: f64 = src[1].parse().unwrap();
        let fahrenheit: f64 = dst[1].parse().unwrap();
        assert_eq!(fahrenheit, (kelvin - 273.15) * 9.0 / 5.0 + 32.0);
    }
}

#[test]
fn missing_input_creates_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("missing.csv");
    let output = dir.path().join("fahrenheit.csv");

    let err = convert_file(&input, &output, &Default::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resource);
    assert!(matches!(err, ConvertError::Open { .. }));
    assert!(!output.exists());

    assert_eq!(process_rows(&input, &output, &Default::default()), None);
    assert!(!output.exists());
}

#[test]
fn unwritable_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "id,temp_k\n1,273.15\n");
    let output = dir.path().join("no-such-dir").join("fahrenheit.csv");

    let err = convert_file(&input, &output, &Default::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resource);
    assert!(matches!(err, ConvertError::Create { .. }));
}

#[test]
fn bad_temperature_keeps_earlier_rows() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "id,temp_k\n1,273.15\n2,abc\n3,373.15\n");
    let output = dir.path().join("fahrenheit.csv");

    let err = convert_file(&input, &output, &Default::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.to_string().contains("abc"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "id,temp_k\n1,32.0\n");
}
