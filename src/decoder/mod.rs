use std::collections::VecDeque;

use log::{debug, trace, warn};

use crate::{bitstreams::BitString, symbol_table::{CodeTrie, Delta, SymbolTable}};

/// Inverts [`crate::encoder::AdaptiveEncoder`] given the table in the state the encoder left it.
#[derive(Clone, Debug)]
pub struct AdaptiveDecoder {
    table: SymbolTable,
    dropped_bits: usize,
}

impl AdaptiveDecoder {
    pub fn new(table: SymbolTable) -> Self {
        Self { table, dropped_bits: 0 }
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    /// Number of bits [`AdaptiveDecoder::decode_stream`] skipped because they matched no codeword.
    pub fn dropped_bits(&self) -> usize {
        self.dropped_bits
    }

    pub fn into_table(self) -> SymbolTable {
        self.table
    }

    /// Decodes concatenated, non-reversed codewords against the current table, without
    /// touching any frequency.
    ///
    /// This is the check run right after each encode step, on the codeword just emitted.
    /// Bits that never complete a codeword are dropped.
    pub fn decode_forward(&self, bits: &BitString) -> String {
        decode_forward(&self.table, bits)
    }

    /// Decodes a whole encoded stream from its last bit backwards.
    ///
    /// Each match is prepended to the output, and the matched symbol's frequency is decremented
    /// before the next match, so every codeword is looked up in the table state that produced
    /// it. When no codeword can be completed from the cursor, one bit is dropped.
    ///
    /// The worst case is quadratic in the stream length.
    pub fn decode_stream(&mut self, stream: &BitString) -> String {
        let bits = stream.as_slice();
        let mut decoded = VecDeque::new();
        let mut end = bits.len();

        while end > 0 {
            match self.match_backward(&bits[..end]) {
                Some((start, symbol)) => {
                    decoded.push_front(symbol);
                    if let Err(err) = self.table.bump(symbol, Delta::Decrement) {
                        warn!("{}", err);
                    }
                    end = start;
                }
                None => {
                    end -= 1;
                    self.dropped_bits += 1;
                    debug!("no codeword ends at bit {}, dropping it", end);
                }
            }
        }

        decoded.into_iter().collect()
    }

    /// Finds the codeword whose first bit is the last bit of `bits` and whose following bits
    /// run backwards from there. Returns where the match starts and the matched symbol.
    fn match_backward(&self, bits: &[bool]) -> Option<(usize, char)> {
        let trie = self.table.trie();
        let mut node = CodeTrie::ROOT;

        for i in (0..bits.len()).rev() {
            // Leaving the trie means no longer candidate can match either.
            node = trie.next(node, bits[i])?;
            if let Some(symbol) = trie.symbol_at(node) {
                return Some((i, symbol));
            }
        }

        None
    }
}

/// Greedy prefix decode of `bits` against `table`.
pub fn decode_forward(table: &SymbolTable, bits: &BitString) -> String {
    let trie = table.trie();
    let mut decoded = String::new();
    let mut node = Some(CodeTrie::ROOT);

    for bit in bits.iter() {
        // Once off the trie the prefix can only grow, so nothing else matches.
        node = node.and_then(|n| trie.next(n, bit));

        if let Some(symbol) = node.and_then(|n| trie.symbol_at(n)) {
            decoded.push(symbol);
            node = Some(CodeTrie::ROOT);
        }
    }

    trace!("forward decoded {:?}", decoded);
    decoded
}
