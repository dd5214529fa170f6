use crate::core::models::method::{Method, UnknownMethodCode};
use crate::core::models::region::QuantumRegion;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

/// The format version this library reads and writes.
const FORMAT_VERSION: u32 = 0;

#[derive(Debug, Error)]
pub enum RegionFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse region file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to encode region file: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("Unsupported region format version {version} (this library understands version 0)")]
    UnsupportedVersion { version: u32 },
    #[error(transparent)]
    UnknownMethod(#[from] UnknownMethodCode),
}

/// The on-disk shape of a persisted region descriptor.
///
/// The particle-index and atomic-number lists are stored as sequences of
/// single-field child records, positionally corresponding between the two
/// lists. The `version` field gates deserialization: any value other than
/// the current version is rejected outright.
#[derive(Debug, Serialize, Deserialize)]
struct RegionRecord {
    version: u32,
    method: i32,
    charge: f64,
    multiplicity: u32,
    periodic: bool,
    #[serde(default)]
    indices: Vec<IndexRecord>,
    #[serde(default)]
    numbers: Vec<NumberRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct IndexRecord {
    index: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct NumberRecord {
    number: u8,
}

impl From<&QuantumRegion> for RegionRecord {
    fn from(region: &QuantumRegion) -> Self {
        Self {
            version: FORMAT_VERSION,
            method: region.method().code(),
            charge: region.charge(),
            multiplicity: region.multiplicity(),
            periodic: region.uses_periodic_boundary_conditions(),
            indices: region
                .particle_indices()
                .iter()
                .map(|&index| IndexRecord { index })
                .collect(),
            numbers: region
                .atomic_numbers()
                .iter()
                .map(|&number| NumberRecord { number })
                .collect(),
        }
    }
}

impl TryFrom<RegionRecord> for QuantumRegion {
    type Error = RegionFileError;

    fn try_from(record: RegionRecord) -> Result<Self, Self::Error> {
        if record.version != FORMAT_VERSION {
            return Err(RegionFileError::UnsupportedVersion {
                version: record.version,
            });
        }
        let method = Method::try_from(record.method)?;
        Ok(QuantumRegion::new(
            method,
            record.charge,
            record.multiplicity,
            record.periodic,
            record.indices.into_iter().map(|r| r.index).collect(),
            record.numbers.into_iter().map(|r| r.number).collect(),
        ))
    }
}

/// Writes a region descriptor to a writer in the versioned format.
///
/// # Errors
///
/// Returns an error if encoding fails or the writer reports an I/O error.
pub fn write_region_to(
    region: &QuantumRegion,
    writer: &mut impl Write,
) -> Result<(), RegionFileError> {
    let text = toml::to_string(&RegionRecord::from(region))?;
    writer.write_all(text.as_bytes())?;
    Ok(())
}

/// Reads a region descriptor from a buffered reader.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, declares an
/// unsupported format version, or names an unknown method code.
pub fn read_region_from(reader: &mut impl BufRead) -> Result<QuantumRegion, RegionFileError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let record: RegionRecord = toml::from_str(&text)?;
    QuantumRegion::try_from(record)
}

/// Writes a region descriptor to a file path.
///
/// # Errors
///
/// Returns an error if the file cannot be created or writing fails.
pub fn write_region_to_path<P: AsRef<Path>>(
    region: &QuantumRegion,
    path: P,
) -> Result<(), RegionFileError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_region_to(region, &mut writer)
}

/// Reads a region descriptor from a file path.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsing fails.
pub fn read_region_from_path<P: AsRef<Path>>(path: P) -> Result<QuantumRegion, RegionFileError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    read_region_from(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_region() -> QuantumRegion {
        QuantumRegion::new(
            Method::Gfn2Xtb,
            1.0,
            3,
            true,
            vec![0, 1, 2],
            vec![8, 1, 1],
        )
    }

    #[test]
    fn round_trip_preserves_every_field_and_list_order() {
        let region = sample_region();
        let mut buffer = Vec::new();
        write_region_to(&region, &mut buffer).unwrap();

        let restored = read_region_from(&mut buffer.as_slice()).unwrap();
        assert_eq!(restored, region);
    }

    #[test]
    fn round_trip_preserves_an_empty_region() {
        let region = QuantumRegion::new(Method::Gfn1Xtb, 0.0, 1, false, vec![], vec![]);
        let mut buffer = Vec::new();
        write_region_to(&region, &mut buffer).unwrap();

        let restored = read_region_from(&mut buffer.as_slice()).unwrap();
        assert_eq!(restored, region);
    }

    #[test]
    fn round_trip_through_a_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("region.toml");

        let region = sample_region();
        write_region_to_path(&region, &path).unwrap();
        let restored = read_region_from_path(&path).unwrap();
        assert_eq!(restored, region);
    }

    #[test]
    fn written_form_uses_single_field_child_records() {
        let mut buffer = Vec::new();
        write_region_to(&sample_region(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("version = 0"));
        assert!(text.contains("method = 1"));
        assert!(text.contains("[[indices]]"));
        assert!(text.contains("index = 2"));
        assert!(text.contains("[[numbers]]"));
        assert!(text.contains("number = 8"));
    }

    #[test]
    fn rejects_unsupported_format_version() {
        let text = "version = 1\nmethod = 0\ncharge = 0.0\nmultiplicity = 1\nperiodic = false\n";
        let result = read_region_from(&mut text.as_bytes());
        assert!(matches!(
            result,
            Err(RegionFileError::UnsupportedVersion { version: 1 })
        ));
    }

    #[test]
    fn rejects_unknown_method_code() {
        let text = "version = 0\nmethod = 7\ncharge = 0.0\nmultiplicity = 1\nperiodic = false\n";
        let result = read_region_from(&mut text.as_bytes());
        assert!(matches!(
            result,
            Err(RegionFileError::UnknownMethod(UnknownMethodCode(7)))
        ));
    }

    #[test]
    fn rejects_malformed_input() {
        let text = "version = \"zero\"";
        let result = read_region_from(&mut text.as_bytes());
        assert!(matches!(result, Err(RegionFileError::Parse(_))));
    }
}
