//! Greedy byte-pair-encoding codec.
//!
//! Compression repeatedly finds the most frequent adjacent byte pair in a
//! block and replaces it with an unused byte value, recording a [`Rule`]
//! for each substitution. Decompression
//! replays the rules in reverse. Whole files are split into bounded blocks
//! that compress independently, so the wire payload for a file is just the
//! concatenation of its serialized blocks.

use log::{debug, trace};

use crate::block::{
    Block, Rule, BLOCK_SIZE_LIMIT, DISTINCT_BYTE_LIMIT, MAX_RULES, REPLACEMENT_THRESHOLD,
};
use crate::buffer::Buffer;
use crate::error::{BparcError, Result};

/// Compress `block` in place by greedy byte-pair substitution.
///
/// Each round scans every adjacent pair in the current data (overlapping
/// occurrences all count), picks the pair with the highest count, breaking
/// ties toward the pair whose bytes pack to the numerically smallest
/// big-endian 16-bit value, and replaces its non-overlapping occurrences left to
/// right with the lowest unused byte value. Rounds stop when the best
/// count falls below [`REPLACEMENT_THRESHOLD`], the rule list is full, or
/// no unused byte value remains.
///
/// A byte value counts as used once it has appeared in the block's data or
/// been assigned as a code; it is never reclaimed, even if substitutions
/// remove its last literal occurrence.
pub fn compress_block(block: &mut Block) {
    let original_len = block.data.len();
    let mut used = [false; 256];
    for &b in &block.data {
        used[b as usize] = true;
    }
    let mut counts = vec![0u32; 1 << 16];
    loop {
        counts.fill(0);
        for pair in block.data.windows(2) {
            counts[(pair[0] as usize) << 8 | pair[1] as usize] += 1;
        }

        // Ascending scan with a strict `>` keeps the smallest pair on ties.
        let mut best_pair = 0usize;
        let mut best_count = 0u32;
        for (pair, &count) in counts.iter().enumerate() {
            if count > best_count {
                best_count = count;
                best_pair = pair;
            }
        }

        if (best_count as usize) < REPLACEMENT_THRESHOLD || block.rules.len() == MAX_RULES {
            break;
        }

        let Some(code) = (0..=255u8).find(|&c| !used[c as usize]) else {
            break; // the whole code space is spoken for
        };
        used[code as usize] = true;

        let first = (best_pair >> 8) as u8;
        let second = (best_pair & 0xFF) as u8;
        block.rules.push(Rule { code, first, second });
        trace!(
            "rule {:#04x} <- ({:#04x}, {:#04x}), {} occurrences",
            code,
            first,
            second,
            best_count
        );

        // Replace non-overlapping occurrences left to right.
        let mut packed = Vec::with_capacity(block.data.len());
        let mut i = 0;
        while i < block.data.len() {
            if i + 1 < block.data.len() && block.data[i] == first && block.data[i + 1] == second {
                packed.push(code);
                i += 2;
            } else {
                packed.push(block.data[i]);
                i += 1;
            }
        }
        block.data = packed;
    }
    debug!(
        "block compressed: {} -> {} bytes, {} rules",
        original_len,
        block.data.len(),
        block.rules.len()
    );
}

/// Restore `block.data` to its pre-compression form by replaying the rules
/// in reverse creation order.
///
/// Fails if an expansion would push the block past [`BLOCK_SIZE_LIMIT`],
/// which only happens on corrupted or malicious input.
pub fn decompress_block(block: &mut Block) -> Result<()> {
    for idx in (0..block.rules.len()).rev() {
        let rule = block.rules[idx];
        let mut expanded = Vec::with_capacity(block.data.len());
        let mut len = block.data.len();
        for &b in &block.data {
            if b == rule.code {
                if len + 1 > BLOCK_SIZE_LIMIT {
                    return Err(BparcError::BlockOverflow);
                }
                len += 1;
                expanded.push(rule.first);
                expanded.push(rule.second);
            } else {
                expanded.push(b);
            }
        }
        block.data = expanded;
    }
    Ok(())
}

/// Compress a whole file's raw bytes into a payload of serialized blocks.
///
/// Raw bytes accumulate into a block until appending the next byte would
/// push the block past [`BLOCK_SIZE_LIMIT`] data bytes or past
/// [`DISTINCT_BYTE_LIMIT`] distinct byte values; each completed block is
/// compressed and serialized, and the serialized blocks are concatenated.
/// Empty input produces an empty payload.
pub fn compress(raw: &[u8]) -> Buffer {
    let mut out = Buffer::new();
    let mut block = Block::default();
    let mut seen = [false; 256];
    let mut distinct = 0usize;

    for &b in raw {
        let grows_distinct = !seen[b as usize];
        if block.data.len() == BLOCK_SIZE_LIMIT
            || (grows_distinct && distinct == DISTINCT_BYTE_LIMIT)
        {
            flush_block(&mut block, &mut out);
            seen = [false; 256];
            distinct = 0;
        }
        block.data.push(b);
        if !seen[b as usize] {
            seen[b as usize] = true;
            distinct += 1;
        }
    }
    flush_block(&mut block, &mut out);
    out
}

fn flush_block(block: &mut Block, out: &mut Buffer) {
    if block.data.is_empty() {
        return;
    }
    compress_block(block);
    block.serialize_into(out);
    block.data.clear();
    block.rules.clear();
}

/// Decompress a payload of serialized blocks, reading from the cursor of
/// `src` until it is exhausted, and concatenate the restored block data.
///
/// Any truncated or malformed trailing bytes fail the whole call.
pub fn decompress(src: &mut Buffer) -> Result<Buffer> {
    let mut out = Buffer::new();
    while src.remaining() > 0 {
        let mut block = Block::deserialize_from(src)?;
        decompress_block(&mut block)?;
        out.append_bytes(&block.data);
    }
    Ok(out)
}
