mod trie;

use std::collections::HashMap;

use log::{trace, warn};
use rand::{seq::SliceRandom, Rng};
use serde::{Serialize, Deserialize};

use crate::{alphabet::Alphabet, bitstreams::BitString, storage::CodeTableSink, utils::code_pool, CodecError, Result};

pub use trie::{CodeTrie, NodeId};

/// Direction of a frequency update.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Delta {
    Increment,
    Decrement,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CodeTableEntry {
    symbol: char,
    frequency: usize,
    codeword: BitString,
}

impl CodeTableEntry {
    pub fn new(symbol: char, frequency: usize, codeword: BitString) -> Self {
        Self { symbol, frequency, codeword }
    }

    #[inline(always)]
    pub fn symbol(&self) -> char {
        self.symbol
    }

    #[inline(always)]
    pub fn frequency(&self) -> usize {
        self.frequency
    }

    #[inline(always)]
    pub fn codeword(&self) -> &BitString {
        &self.codeword
    }
}

/// The adaptive symbol to codeword mapping.
///
/// Entries are kept in the order their codewords were assigned: entry `i` holds pool
/// codeword `i`, whose length is `i + 1`. After the first [`SymbolTable::rerank`] this is the
/// rank order (descending frequency, ties broken by ascending symbol), and the whole table is
/// a pure function of the frequencies.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    alphabet: Alphabet,
    entries: Vec<CodeTableEntry>,
    positions: HashMap<char, usize>,
    pool: Vec<BitString>,
    trie: CodeTrie,
}

impl PartialEq for SymbolTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries && self.pool == other.pool
    }
}

impl Eq for SymbolTable {}

impl SymbolTable {
    /// Builds the initial table: the alphabet is shuffled with `rng` and the i-th shuffled
    /// symbol gets the codeword of rank `i + 1`. Every frequency starts at zero.
    pub fn initialize<R: Rng + ?Sized>(alphabet: Alphabet, rng: &mut R) -> Self {
        let mut order = alphabet.symbols().to_vec();
        order.shuffle(rng);

        Self::from_order(alphabet, order)
    }

    /// Restores the table that a sequence of bumps leading to `frequencies` produced.
    ///
    /// Symbols missing from `frequencies` count zero.
    pub fn with_frequencies<I>(alphabet: Alphabet, frequencies: I) -> Result<Self>
    where
        I: IntoIterator<Item = (char, usize)>,
    {
        let order = alphabet.symbols().to_vec();
        let mut table = Self::from_order(alphabet, order);

        for (symbol, frequency) in frequencies {
            let pos = table.position(symbol)?;
            table.entries[pos].frequency = frequency;
        }

        table.rerank();
        Ok(table)
    }

    fn from_order(alphabet: Alphabet, order: Vec<char>) -> Self {
        let pool = code_pool(order.len());
        let entries = order
            .into_iter()
            .zip(pool.iter())
            .map(|(symbol, codeword)| CodeTableEntry { symbol, frequency: 0, codeword: codeword.clone() })
            .collect();

        let mut table = Self {
            alphabet,
            entries,
            positions: HashMap::new(),
            pool,
            trie: CodeTrie::new(),
        };
        table.reindex();
        table
    }

    fn reindex(&mut self) {
        self.positions = self.entries.iter().enumerate().map(|(i, e)| (e.symbol, i)).collect();
        self.trie = CodeTrie::from_codes(self.entries.iter().map(|e| (e.symbol, &e.codeword)));
    }

    #[inline(always)]
    fn position(&self, symbol: char) -> Result<usize> {
        self.positions.get(&symbol).copied().ok_or(CodecError::OutOfAlphabet(symbol))
    }

    /// Re-sorts the entries by rank and hands out the pool codewords again, in order.
    pub fn rerank(&mut self) {
        self.entries.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.symbol.cmp(&b.symbol)));

        for (entry, codeword) in self.entries.iter_mut().zip(self.pool.iter()) {
            entry.codeword = codeword.clone();
        }

        self.reindex();
        trace!("reranked, top symbol {:?}", self.entries.first().map(|e| e.symbol));
    }

    /// Adjusts the frequency of `symbol` by one, then re-ranks.
    pub fn bump(&mut self, symbol: char, delta: Delta) -> Result<()> {
        let pos = self.position(symbol)?;
        let entry = &mut self.entries[pos];

        match delta {
            Delta::Increment => entry.frequency += 1,
            Delta::Decrement => {
                if entry.frequency == 0 {
                    warn!("frequency of {:?} is already zero, not decrementing", symbol);
                } else {
                    entry.frequency -= 1;
                }
            }
        }

        self.rerank();
        Ok(())
    }

    pub fn codeword_of(&self, symbol: char) -> Option<&BitString> {
        self.positions.get(&symbol).map(|&pos| &self.entries[pos].codeword)
    }

    pub fn frequency_of(&self, symbol: char) -> Option<usize> {
        self.positions.get(&symbol).map(|&pos| self.entries[pos].frequency)
    }

    /// 1-based position of `symbol` in the current assignment.
    pub fn rank_of(&self, symbol: char) -> Option<usize> {
        self.positions.get(&symbol).map(|&pos| pos + 1)
    }

    pub fn symbol_for_codeword(&self, codeword: &BitString) -> Option<char> {
        self.trie.get(codeword)
    }

    /// The reverse-lookup trie for the current assignment. Rebuilt on every re-rank.
    #[inline(always)]
    pub fn trie(&self) -> &CodeTrie {
        &self.trie
    }

    pub fn entries(&self) -> impl Iterator<Item = &CodeTableEntry> {
        self.entries.iter()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn pool(&self) -> &[BitString] {
        &self.pool
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all frequencies, i.e. the number of symbols encoded and not yet decoded.
    pub fn total_frequency(&self) -> usize {
        self.entries.iter().map(|e| e.frequency).sum()
    }

    /// Writes every entry, in the current order, to `sink`.
    pub fn dump_to<S: CodeTableSink + ?Sized>(&self, sink: &mut S) -> std::io::Result<()> {
        sink.begin_table()?;
        for entry in self.entries.iter() {
            sink.write_line(entry.symbol, entry.frequency, &entry.codeword)?;
        }
        sink.end_table()
    }
}

#[cfg(test)]
mod tests;
