use log::trace;

use crate::{bitstreams::BitString, symbol_table::{Delta, SymbolTable}, Result};

/// Encodes one symbol at a time, re-ranking the table after each one.
///
/// Every codeword is appended to the stream bit-reversed. Read from the end, the stream then
/// presents the most recent codeword first, in its original bit order, which is what
/// [`crate::decoder::AdaptiveDecoder::decode_stream`] relies on.
#[derive(Clone, Debug)]
pub struct AdaptiveEncoder {
    table: SymbolTable,
    stream: BitString,
    encoded_symbols: usize,
}

impl AdaptiveEncoder {
    pub fn new(table: SymbolTable) -> Self {
        Self { table, stream: BitString::new(), encoded_symbols: 0 }
    }

    /// Counts `symbol`, re-ranks, and appends its new codeword to the stream.
    ///
    /// Returns the codeword in its original (non-reversed) bit order. Symbols outside the
    /// alphabet are rejected and leave both the table and the stream untouched.
    pub fn encode(&mut self, symbol: char) -> Result<BitString> {
        self.table.bump(symbol, Delta::Increment)?;

        let codeword = self
            .table
            .codeword_of(symbol)
            .cloned()
            .unwrap_or_default();
        self.stream.append_reversed(&codeword);
        self.encoded_symbols += 1;

        trace!("Symbol: {:?}, Current Code: {}", symbol, codeword);
        Ok(codeword)
    }

    /// Encodes all of `text`, stopping at the first symbol outside the alphabet.
    pub fn encode_str(&mut self, text: &str) -> Result<()> {
        for symbol in text.chars() {
            self.encode(symbol)?;
        }
        Ok(())
    }

    pub fn stream(&self) -> &BitString {
        &self.stream
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn encoded_symbols(&self) -> usize {
        self.encoded_symbols
    }

    /// Hands the table, in its final state, and the stream over for decoding.
    pub fn finish(self) -> (SymbolTable, BitString) {
        (self.table, self.stream)
    }
}
