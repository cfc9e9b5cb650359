use crate::{
    errors::{CsvError, CsvResult},
    schemas::{CompensationRow, COMPENSATION_CSV_HEADERS},
};
use csv::Reader;
use std::fs::File;
use std::path::Path;

/// Read and validate a compensation CSV file.
///
/// Headers are validated against the schema; zero data rows is valid (an
/// empty override list).
pub fn read_compensation_csv<P: AsRef<Path>>(path: P) -> CsvResult<Vec<CompensationRow>> {
    let file = File::open(path)?;
    let mut rdr = Reader::from_reader(file);

    let headers = rdr.headers()?;
    validate_headers(headers.iter(), COMPENSATION_CSV_HEADERS)?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: CompensationRow = result?;
        rows.push(row);
    }

    Ok(rows)
}

/// Write a compensation CSV with schema headers.
///
/// The header row is written explicitly so a zero-row file still carries
/// it and reads back as a valid empty override list.
pub fn write_compensation_csv<P: AsRef<Path>>(path: P, rows: &[CompensationRow]) -> CsvResult<()> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    wtr.write_record(COMPENSATION_CSV_HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}

fn validate_headers<'a>(
    actual: impl Iterator<Item = &'a str>,
    expected: &[&str],
) -> CsvResult<()> {
    let actual: Vec<&str> = actual.collect();

    if actual.len() != expected.len() {
        return Err(CsvError::InvalidFormat(format!(
            "compensation.csv: expected {} columns {:?}, found {}",
            expected.len(),
            expected,
            actual.len()
        )));
    }

    for (want, got) in expected.iter().zip(actual.iter()) {
        if want != got {
            return Err(CsvError::MissingHeader((*want).to_string()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use std::io::Write as _;

    fn sample_rows() -> Vec<CompensationRow> {
        vec![
            CompensationRow {
                wallet: address!("00000000000000000000000000000000000000aa"),
                tier: 0,
            },
            CompensationRow {
                wallet: address!("00000000000000000000000000000000000000bb"),
                tier: 3,
            },
        ]
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compensation.csv");

        write_compensation_csv(&path, &sample_rows()).unwrap();
        let rows = read_compensation_csv(&path).unwrap();

        assert_eq!(rows, sample_rows());
    }

    #[test]
    fn empty_list_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compensation.csv");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "wallet,tier").unwrap();
        drop(file);

        let rows = read_compensation_csv(&path).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn writing_zero_rows_still_produces_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compensation.csv");

        write_compensation_csv(&path, &[]).unwrap();
        assert!(read_compensation_csv(&path).unwrap().is_empty());
    }

    #[test]
    fn wrong_headers_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compensation.csv");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "address,level").unwrap();
        writeln!(file, "0x00000000000000000000000000000000000000aa,1").unwrap();
        drop(file);

        assert!(read_compensation_csv(&path).is_err());
    }

    #[test]
    fn malformed_address_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compensation.csv");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "wallet,tier").unwrap();
        writeln!(file, "not-an-address,1").unwrap();
        drop(file);

        assert!(read_compensation_csv(&path).is_err());
    }
}
