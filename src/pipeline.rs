use std::{fs::{self, File}, io::BufWriter, path::{Path, PathBuf}, time::Instant};

use log::{error, info, trace, warn};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::{
    alphabet::Alphabet,
    bitstreams::{pack, padding_len, unpack, BitString},
    decoder::{decode_forward, AdaptiveDecoder},
    encoder::AdaptiveEncoder,
    properties::SessionProperties,
    storage::{read_code_table, BinaryFile, BinarySink, CodeTableFile, CodeTableSink, TextSource},
    symbol_table::{CodeTableEntry, SymbolTable},
    CodecError, Result,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompressionStats {
    pub symbols: usize,
    pub encoded_bits: usize,
    pub packed_bytes: usize,
    pub padding_bits: usize,
    pub bits_per_symbol: f64,
    pub encode_ns: u128,
    pub decode_ns: u128,
    /// Whether the backward decode reproduced the input exactly.
    pub verified: bool,
}

#[derive(Clone, Debug)]
pub struct CompressionOutput {
    pub stats: CompressionStats,
    pub stream: BitString,
    pub packed: Vec<u8>,
    pub decoded: String,
}

/// Reads everything from `source`. A failed read is logged and treated as no input.
pub fn read_source<S: TextSource + ?Sized>(source: &mut S) -> Option<String> {
    match source.read_all() {
        Ok(text) => Some(text),
        Err(err) => {
            error!("An error occurred while reading the input: {}", err);
            None
        }
    }
}

/// Encodes `input` symbol by symbol, then decodes the whole stream back and packs it.
///
/// `initial_sink` receives the table before any symbol is processed, `table_sink` receives a
/// full dump after every symbol. `None` input is encoded as empty text.
pub fn compress<I, T, B>(
    input: Option<&str>,
    table: SymbolTable,
    initial_sink: &mut I,
    table_sink: &mut T,
    binary_sink: &mut B,
) -> Result<CompressionOutput>
where
    I: CodeTableSink + ?Sized,
    T: CodeTableSink + ?Sized,
    B: BinarySink + ?Sized,
{
    let input = input.unwrap_or_default();
    table.alphabet().check(input)?;

    table.dump_to(initial_sink)?;

    let mut encoder = AdaptiveEncoder::new(table);

    let encode_time = Instant::now();
    for symbol in input.chars() {
        let codeword = encoder.encode(symbol)?;

        let check = decode_forward(encoder.table(), &codeword);
        trace!("Decompressed Symbol: {:?}", check);
        if check.chars().ne(std::iter::once(symbol)) {
            warn!("codeword {} of {:?} decodes to {:?}", codeword, symbol, check);
        }

        encoder.table().dump_to(table_sink)?;
    }
    if encoder.encoded_symbols() == 0 {
        encoder.table().dump_to(table_sink)?;
    }
    let encode_ns = encode_time.elapsed().as_nanos();

    let symbols = encoder.encoded_symbols();
    let (table, stream) = encoder.finish();

    let decode_time = Instant::now();
    let mut decoder = AdaptiveDecoder::new(table);
    let decoded = decoder.decode_stream(&stream);
    let decode_ns = decode_time.elapsed().as_nanos();

    let verified = decoded == input;
    if !verified {
        warn!("backward decode does not match the input ({} bits dropped)", decoder.dropped_bits());
    }

    let packed = pack(&stream);
    binary_sink.write_bytes(&packed)?;

    let stats = CompressionStats {
        symbols,
        encoded_bits: stream.len(),
        packed_bytes: packed.len(),
        padding_bits: padding_len(stream.len()),
        bits_per_symbol: if symbols == 0 { 0.0 } else { stream.len() as f64 / symbols as f64 },
        encode_ns,
        decode_ns,
        verified,
    };
    info!(
        "encoded {} symbols into {} bits ({} bytes) in {}ns",
        stats.symbols, stats.encoded_bits, stats.packed_bytes, stats.encode_ns
    );

    Ok(CompressionOutput { stats, stream, packed, decoded })
}

/// Decodes a packed binary given the final code table and the session metadata.
///
/// The table is rebuilt from the persisted frequencies; the persisted codewords must agree
/// with the rebuilt assignment.
pub fn decompress(props: &SessionProperties, entries: &[CodeTableEntry], bytes: &[u8]) -> Result<String> {
    if props.symbols == 0 {
        return Ok(String::new());
    }

    let table = SymbolTable::with_frequencies(
        Alphabet::default(),
        entries.iter().map(|e| (e.symbol(), e.frequency())),
    )?;

    if table.len() != entries.len() {
        return Err(CodecError::MalformedTable {
            line: entries.len(),
            reason: format!("expected {} entries", table.len()),
        });
    }
    for (i, entry) in entries.iter().enumerate() {
        if table.codeword_of(entry.symbol()) != Some(entry.codeword()) {
            return Err(CodecError::MalformedTable {
                line: i + 1,
                reason: format!("codeword {} does not match the frequencies", entry.codeword()),
            });
        }
    }
    if table.total_frequency() != props.symbols {
        return Err(CodecError::MalformedProperty { key: "symbols".to_owned(), value: props.symbols.to_string() });
    }

    let stream = unpack(bytes, props.bits)?;
    let mut decoder = AdaptiveDecoder::new(table);
    let decoded = decoder.decode_stream(&stream);

    if decoder.dropped_bits() > 0 {
        warn!("dropped {} unmatched bits", decoder.dropped_bits());
    }
    Ok(decoded)
}

/// The files one compression run produces.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionFiles {
    pub initial_table: PathBuf,
    pub table: PathBuf,
    pub binary: PathBuf,
    pub properties: PathBuf,
    pub stats: PathBuf,
}

impl SessionFiles {
    /// `<basename>.initial.table`, `<basename>.table`, `<basename>.bin`,
    /// `<basename>.properties` and `<basename>.stats.json`.
    pub fn for_basename(basename: &str) -> Self {
        Self {
            initial_table: PathBuf::from(format!("{}.initial.table", basename)),
            table: PathBuf::from(format!("{}.table", basename)),
            binary: PathBuf::from(format!("{}.bin", basename)),
            properties: PathBuf::from(format!("{}.properties", basename)),
            stats: PathBuf::from(format!("{}.stats.json", basename)),
        }
    }

    /// The fixed file names of the interactive program, inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            initial_table: dir.join("initial_code_table.txt"),
            table: dir.join("code_table.txt"),
            binary: dir.join("encoded_text.bin"),
            properties: dir.join("encoded_text.properties"),
            stats: dir.join("encoded_text.stats.json"),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Runs [`compress`] with a table shuffled by `seed`, writing every artifact to `files`.
pub fn compress_to_files(input: Option<&str>, seed: u64, files: &SessionFiles) -> Result<CompressionOutput> {
    let table = SymbolTable::initialize(Alphabet::default(), &mut StdRng::seed_from_u64(seed));

    let output = compress(
        input,
        table,
        &mut CodeTableFile::new(&files.initial_table),
        &mut CodeTableFile::new(&files.table),
        &mut BinaryFile::new(&files.binary),
    )?;

    let props = SessionProperties {
        symbols: output.stats.symbols,
        bits: output.stats.encoded_bits,
        bytes: output.stats.packed_bytes,
        seed,
        table: file_name(&files.table),
        binary: file_name(&files.binary),
    };
    props.store(&files.properties)?;

    serde_json::to_writer_pretty(BufWriter::new(File::create(&files.stats)?), &output.stats)?;

    Ok(output)
}

/// Reads a properties file and the table and binary it names, and decodes the binary.
pub fn decompress_from_files<P: AsRef<Path>>(properties: P) -> Result<String> {
    let properties = properties.as_ref();
    let dir = properties.parent().unwrap_or_else(|| Path::new(""));

    let props = SessionProperties::load(properties)?;
    let entries = read_code_table(dir.join(&props.table))?;
    let bytes = fs::read(dir.join(&props.binary))?;

    if bytes.len() != props.bytes {
        warn!("expected {} bytes in {}, found {}", props.bytes, props.binary, bytes.len());
    }

    decompress(&props, &entries, &bytes)
}
