pub mod encodings;

pub use encodings::{code_pool, codeword_for_rank, RankCode, UnaryRankCode};
