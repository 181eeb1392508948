pub mod archive;
pub mod block;
pub mod buffer;
pub mod codec;
pub mod error;

pub use archive::{Archive, FileEntry};
pub use block::{Block, Rule, BLOCK_SIZE_LIMIT, MAX_RULES};
pub use buffer::Buffer;
pub use error::{BparcError, Result};
