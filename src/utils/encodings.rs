use crate::bitstreams::BitString;

/// A code mapping 1-based rank positions onto prefix-free codewords.
pub trait RankCode {
    fn codeword(rank: usize) -> BitString;
    /// Inverse of [`RankCode::codeword`], `None` when `codeword` is not in the code.
    fn rank_of(codeword: &BitString) -> Option<usize>;
}

/// Rank 1 is `0`, rank `r > 1` is `r - 1` ones followed by a single zero.
///
/// The codeword for rank `r` is exactly `r` bits long, so shorter codes go to the
/// better-ranked symbols.
pub struct UnaryRankCode;

impl RankCode for UnaryRankCode {
    #[inline(always)]
    fn codeword(rank: usize) -> BitString {
        assert!(rank >= 1, "Ranks start from 1");

        let mut code = BitString::with_capacity(rank);
        for _ in 0..rank - 1 {
            code.push(true);
        }
        code.push(false);
        code
    }

    #[inline(always)]
    fn rank_of(codeword: &BitString) -> Option<usize> {
        let ones = codeword.leading_ones();
        if codeword.len() == ones + 1 {
            Some(ones + 1)
        } else {
            None
        }
    }
}

#[inline(always)]
pub fn codeword_for_rank(rank: usize) -> BitString {
    UnaryRankCode::codeword(rank)
}

/// Pre-generates the codewords for ranks `1..=size`, in rank order.
pub fn code_pool(size: usize) -> Vec<BitString> {
    (1..=size).map(codeword_for_rank).collect()
}
