use std::{collections::HashMap, fs::File, io::{BufReader, BufWriter}, path::Path, str::FromStr};

use crate::{CodecError, Result};

/// Metadata written next to a compressed binary.
///
/// The binary carries no header, so its exact bit length and the names of the files that
/// belong to it are kept here.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionProperties {
    /// Number of symbols encoded.
    pub symbols: usize,
    /// Length of the encoded stream in bits, before padding.
    pub bits: usize,
    /// Number of bytes in the packed binary.
    pub bytes: usize,
    /// Seed of the initial shuffle.
    pub seed: u64,
    /// File name of the final code table, relative to the properties file.
    pub table: String,
    /// File name of the packed binary, relative to the properties file.
    pub binary: String,
}

impl Default for SessionProperties {
    fn default() -> Self {
        Self {
            symbols: 0,
            bits: 0,
            bytes: 0,
            seed: 0,
            table: "code_table.txt".to_owned(),
            binary: "encoded_text.bin".to_owned(),
        }
    }
}

fn required<'a>(value: &'a HashMap<String, String>, key: &str) -> Result<&'a String> {
    value.get(key).ok_or_else(|| CodecError::MissingProperty(key.to_owned()))
}

fn parsed<T: FromStr>(value: &HashMap<String, String>, key: &str) -> Result<T> {
    let raw = required(value, key)?;
    raw.trim().parse().map_err(|_| CodecError::MalformedProperty { key: key.to_owned(), value: raw.clone() })
}

impl TryFrom<HashMap<String, String>> for SessionProperties {
    type Error = CodecError;

    fn try_from(value: HashMap<String, String>) -> Result<Self> {
        let mut props = SessionProperties {
            symbols: parsed(&value, "symbols")?,
            bits: parsed(&value, "bits")?,
            bytes: parsed(&value, "bytes")?,
            seed: parsed(&value, "seed")?,
            ..Default::default()
        };

        if let Some(table) = value.get("table") {
            props.table = table.clone();
        }
        if let Some(binary) = value.get("binary") {
            props.binary = binary.clone();
        }

        Ok(props)
    }
}

impl From<&SessionProperties> for HashMap<String, String> {
    fn from(props: &SessionProperties) -> Self {
        HashMap::from([
            ("symbols".to_owned(), props.symbols.to_string()),
            ("bits".to_owned(), props.bits.to_string()),
            ("bytes".to_owned(), props.bytes.to_string()),
            ("seed".to_owned(), props.seed.to_string()),
            ("table".to_owned(), props.table.clone()),
            ("binary".to_owned(), props.binary.clone()),
        ])
    }
}

impl SessionProperties {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let map = java_properties::read(BufReader::new(file))?;
        Self::try_from(map)
    }

    pub fn store<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        java_properties::write(BufWriter::new(file), &HashMap::from(self))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;

    fn sample() -> SessionProperties {
        SessionProperties {
            symbols: 12,
            bits: 37,
            bytes: 5,
            seed: 987654321,
            table: "out.table".to_owned(),
            binary: "out.bin".to_owned(),
        }
    }

    #[test]
    fn test_store_and_load() {
        let path = env::temp_dir().join(format!("adaptive_prefix_props_{}.properties", process::id()));
        sample().store(&path).unwrap();
        assert_eq!(SessionProperties::load(&path).unwrap(), sample());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_defaults_for_file_names() {
        let mut map = HashMap::from(&sample());
        map.remove("table");
        map.remove("binary");

        let props = SessionProperties::try_from(map).unwrap();
        assert_eq!(props.table, "code_table.txt");
        assert_eq!(props.binary, "encoded_text.bin");
    }

    #[test]
    fn test_missing_and_malformed() {
        let mut map = HashMap::from(&sample());
        map.remove("bits");
        assert!(matches!(SessionProperties::try_from(map), Err(CodecError::MissingProperty(key)) if key == "bits"));

        let mut map = HashMap::from(&sample());
        map.insert("seed".to_owned(), "abc".to_owned());
        assert!(matches!(SessionProperties::try_from(map), Err(CodecError::MalformedProperty { .. })));
    }
}
