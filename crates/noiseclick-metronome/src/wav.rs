//! Deterministic WAV file writer.
//!
//! Writes mono 16-bit PCM WAV files with no timestamps or variable metadata,
//! so identical renders produce identical bytes. The BLAKE3 hash of the PCM
//! data identifies a render independently of the header.

mod format;
mod result;
mod writer;

pub use format::WavFormat;
pub use result::WavResult;
pub use writer::{samples_to_pcm16, wav_header, write_wav, write_wav_to_vec, WAV_HEADER_LEN};
