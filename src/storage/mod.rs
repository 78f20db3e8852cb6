use std::{fs::{self, File}, io::{self, BufRead, BufWriter, Write}, path::{Path, PathBuf}};

use crate::{bitstreams::BitString, symbol_table::CodeTableEntry, CodecError, Result};

/// Where the text to compress comes from.
pub trait TextSource {
    fn read_all(&mut self) -> io::Result<String>;
}

/// Receives full code-table dumps, one line per entry.
pub trait CodeTableSink {
    /// Called before the first line of every dump.
    fn begin_table(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn write_line(&mut self, symbol: char, frequency: usize, codeword: &BitString) -> io::Result<()>;

    /// Called after the last line of every dump.
    fn end_table(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Receives the final packed stream.
pub trait BinarySink {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl TextSource for FileSource {
    fn read_all(&mut self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }
}

/// Reads a single line, e.g. from stdin, without its line terminator.
pub struct LineSource<R: BufRead> {
    reader: R,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> TextSource for LineSource<R> {
    fn read_all(&mut self) -> io::Result<String> {
        let mut line = String::new();
        self.reader.read_line(&mut line)?;

        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}

impl TextSource for String {
    fn read_all(&mut self) -> io::Result<String> {
        Ok(self.clone())
    }
}

/// A code table file, rewritten from scratch on every dump.
pub struct CodeTableFile {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl CodeTableFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf(), writer: None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CodeTableSink for CodeTableFile {
    fn begin_table(&mut self) -> io::Result<()> {
        self.end_table()?;
        self.writer = Some(BufWriter::new(File::create(&self.path)?));
        Ok(())
    }

    fn write_line(&mut self, symbol: char, frequency: usize, codeword: &BitString) -> io::Result<()> {
        if self.writer.is_none() {
            self.begin_table()?;
        }

        match self.writer.as_mut() {
            Some(writer) => writeln!(writer, "{}", format_table_line(symbol, frequency, codeword)),
            None => Err(io::Error::new(io::ErrorKind::Other, "code table file is not open")),
        }
    }

    fn end_table(&mut self) -> io::Result<()> {
        match self.writer.take() {
            Some(mut writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

/// Keeps the lines of the latest dump in memory.
impl CodeTableSink for Vec<String> {
    fn begin_table(&mut self) -> io::Result<()> {
        self.clear();
        Ok(())
    }

    fn write_line(&mut self, symbol: char, frequency: usize, codeword: &BitString) -> io::Result<()> {
        self.push(format_table_line(symbol, frequency, codeword));
        Ok(())
    }
}

pub struct BinaryFile {
    path: PathBuf,
}

impl BinaryFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl BinarySink for BinaryFile {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        fs::write(&self.path, bytes)
    }
}

impl BinarySink for Vec<u8> {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

fn escape_symbol(symbol: char) -> String {
    match symbol {
        '\r' => "\\r".to_owned(),
        '\n' => "\\n".to_owned(),
        '\\' => "\\\\".to_owned(),
        c => c.to_string(),
    }
}

fn unescape_symbol(field: &str) -> Option<char> {
    match field {
        "\\r" => Some('\r'),
        "\\n" => Some('\n'),
        "\\\\" => Some('\\'),
        _ => {
            let mut chars = field.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c != '\\' => Some(c),
                _ => None,
            }
        }
    }
}

/// `<symbol> <frequency> <codeword>`, with CR, LF and backslash escaped so that every
/// entry stays on its own line.
pub fn format_table_line(symbol: char, frequency: usize, codeword: &BitString) -> String {
    format!("{} {} {}", escape_symbol(symbol), frequency, codeword)
}

/// Parses one code table line. `line_number` is 1-based and only used for errors.
pub fn parse_table_line(line: &str, line_number: usize) -> Result<CodeTableEntry> {
    let malformed = |reason: &str| CodecError::MalformedTable { line: line_number, reason: reason.to_owned() };

    // Split from the right: the symbol itself may be a space.
    let mut fields = line.rsplitn(3, ' ');
    let codeword = fields.next().ok_or_else(|| malformed("missing codeword"))?;
    let frequency = fields.next().ok_or_else(|| malformed("missing frequency"))?;
    let symbol = fields.next().ok_or_else(|| malformed("missing symbol"))?;

    let symbol = unescape_symbol(symbol).ok_or_else(|| malformed("symbol must be a single character"))?;
    let frequency = frequency.parse().map_err(|_| malformed("frequency is not a non-negative integer"))?;
    let codeword = codeword.parse().map_err(|_| malformed("codeword must consist of 0 and 1"))?;

    Ok(CodeTableEntry::new(symbol, frequency, codeword))
}

pub fn parse_code_table(text: &str) -> Result<Vec<CodeTableEntry>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| parse_table_line(line, i + 1))
        .collect()
}

pub fn read_code_table<P: AsRef<Path>>(path: P) -> Result<Vec<CodeTableEntry>> {
    parse_code_table(&fs::read_to_string(path)?)
}
