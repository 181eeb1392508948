use crate::buffer::Buffer;
use crate::error::{BparcError, Result};

/// Maximum number of data bytes in one block.
pub const BLOCK_SIZE_LIMIT: usize = 16384;

/// Maximum number of replacement rules in one block (the rule count is a
/// single byte on the wire).
pub const MAX_RULES: usize = 255;

/// Limit on the number of distinct byte values in an uncompressed block,
/// reserving at least 32 spare codes for replacement rules.
pub const DISTINCT_BYTE_LIMIT: usize = 224;

/// Minimum number of occurrences of a pair before a rule is worth creating.
pub const REPLACEMENT_THRESHOLD: usize = 3;

/// Rule for replacing a pair of bytes with a single-byte code.
///
/// Within one block's rule list no two rules share a `code`, and at the
/// moment a rule is created its code does not appear as literal data in the
/// block, so substitution is unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// One-byte code standing in for the two-byte sequence.
    pub code: u8,
    /// The pair of bytes the code replaces.
    pub first: u8,
    pub second: u8,
}

/// One independently compressed chunk of a file.
///
/// `data` shrinks in place as the compressor applies substitutions and
/// grows back during decompression; `rules` records the substitutions in
/// creation order.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub data: Vec<u8>,
    pub rules: Vec<Rule>,
}

impl Block {
    /// Build a block from a contiguous slice of raw bytes.
    ///
    /// Callers are responsible for keeping `bytes` within
    /// `BLOCK_SIZE_LIMIT`; the file splitter in [`crate::codec`] guarantees
    /// this for whole-file compression.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            data: bytes.to_vec(),
            rules: Vec::new(),
        }
    }

    /// Serialize this block to `out` in the wire format:
    /// `u16 LE` data length, the data bytes, `u8` rule count, then
    /// `(code, first, second)` per rule in creation order.
    ///
    /// An empty block serializes to nothing.
    pub fn serialize_into(&self, out: &mut Buffer) {
        if self.data.is_empty() {
            return;
        }
        let len = self.data.len() as u16;
        out.append_bytes(&len.to_le_bytes());
        out.append_bytes(&self.data);
        out.append_byte(self.rules.len() as u8);
        for rule in &self.rules {
            out.append_byte(rule.code);
            out.append_byte(rule.first);
            out.append_byte(rule.second);
        }
    }

    /// Deserialize one block from the cursor position of `src`.
    ///
    /// Fails if the declared data length or rule count would read past the
    /// end of the source, or if the declared length exceeds the block bound.
    pub fn deserialize_from(src: &mut Buffer) -> Result<Self> {
        let mut len_bytes = [0u8; 2];
        if !src.read_exact(&mut len_bytes) {
            return Err(BparcError::Corrupt("truncated block length".into()));
        }
        let len = u16::from_le_bytes(len_bytes) as usize;
        if len > BLOCK_SIZE_LIMIT {
            return Err(BparcError::Corrupt(format!(
                "block length {len} exceeds the {BLOCK_SIZE_LIMIT}-byte limit"
            )));
        }
        let data = src
            .read_slice(len)
            .ok_or_else(|| BparcError::Corrupt("truncated block data".into()))?
            .to_vec();
        let count = src
            .read_byte()
            .ok_or_else(|| BparcError::Corrupt("missing block rule count".into()))?;
        let mut rules = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mut rule_bytes = [0u8; 3];
            if !src.read_exact(&mut rule_bytes) {
                return Err(BparcError::Corrupt("truncated block rule list".into()));
            }
            rules.push(Rule {
                code: rule_bytes[0],
                first: rule_bytes[1],
                second: rule_bytes[2],
            });
        }
        Ok(Self { data, rules })
    }
}
