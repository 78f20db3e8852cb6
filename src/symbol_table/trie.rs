use crate::bitstreams::BitString;

/// Index of a node inside a [`CodeTrie`].
pub type NodeId = usize;

#[derive(Clone, Debug, Default)]
struct CodeTreeNode {
    symbol: Option<char>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

/// Binary trie from codewords to symbols. A `0` bit walks left, a `1` bit walks right.
///
/// Lookups can be driven one bit at a time with [`CodeTrie::next`], which lets a decoder stop
/// scanning as soon as the accumulated bits are no longer a prefix of any codeword.
#[derive(Clone, Debug)]
pub struct CodeTrie {
    nodes: Vec<CodeTreeNode>,
}

impl Default for CodeTrie {
    fn default() -> Self {
        Self { nodes: vec![CodeTreeNode::default()] }
    }
}

impl CodeTrie {
    pub const ROOT: NodeId = 0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_codes<'a, I>(codes: I) -> Self
    where
        I: IntoIterator<Item = (char, &'a BitString)>,
    {
        let mut trie = Self::new();
        for (symbol, codeword) in codes {
            trie.add_to_code_tree(symbol, codeword);
        }
        trie
    }

    pub fn add_to_code_tree(&mut self, symbol: char, codeword: &BitString) {
        let mut current = Self::ROOT;

        for bit in codeword.iter() {
            let child = if bit { self.nodes[current].right } else { self.nodes[current].left };

            current = match child {
                Some(next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(CodeTreeNode::default());
                    if bit {
                        self.nodes[current].right = Some(next);
                    } else {
                        self.nodes[current].left = Some(next);
                    }
                    next
                }
            };
        }

        debug_assert!(self.nodes[current].symbol.is_none(), "Codeword {} assigned twice", codeword);
        self.nodes[current].symbol = Some(symbol);
    }

    /// Follows one bit from `node`, `None` when no codeword continues that way.
    #[inline(always)]
    pub fn next(&self, node: NodeId, bit: bool) -> Option<NodeId> {
        let node = &self.nodes[node];
        if bit { node.right } else { node.left }
    }

    #[inline(always)]
    pub fn symbol_at(&self, node: NodeId) -> Option<char> {
        self.nodes[node].symbol
    }

    pub fn get(&self, codeword: &BitString) -> Option<char> {
        let mut current = Self::ROOT;
        for bit in codeword.iter() {
            current = self.next(current, bit)?;
        }
        self.symbol_at(current)
    }
}
