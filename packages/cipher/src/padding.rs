//! Block padding for the legacy mode.

use crate::{CipherError, BLOCK_SIZE};

/// Pad to a whole number of blocks.
///
/// Adds `16 - (len % 16)` bytes, each equal to the pad length, so aligned
/// input gains a full block.
pub fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_SIZE - (data.len() % BLOCK_SIZE);
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad_len, pad_len as u8);
    padded
}

/// Strip padding added by [`pad`].
///
/// Only the final byte is inspected; a pad length above the block size is
/// rejected. The padding bytes themselves are not checked, which keeps data
/// from older firmware readable.
pub fn unpad(mut data: Vec<u8>) -> Result<Vec<u8>, CipherError> {
    let Some(&last) = data.last() else {
        return Err(CipherError::EmptyCiphertext);
    };
    let pad_len = last as usize;
    if pad_len > BLOCK_SIZE || pad_len > data.len() {
        return Err(CipherError::InvalidPadding { value: last });
    }
    data.truncate(data.len() - pad_len);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_lengths() {
        assert_eq!(pad(b"").len(), 16);
        assert_eq!(pad(&[0u8; 15]).len(), 16);
        assert_eq!(pad(&[0u8; 16]).len(), 32);
        assert_eq!(pad(&[0u8; 17]).len(), 32);
    }

    #[test]
    fn pad_bytes_equal_pad_length() {
        let padded = pad(b"abc");
        assert_eq!(&padded[..3], b"abc");
        assert!(padded[3..].iter().all(|&b| b == 13));

        let full = pad(&[7u8; 16]);
        assert!(full[16..].iter().all(|&b| b == 16));
    }

    #[test]
    fn unpad_reverses_pad() {
        for len in 0..40 {
            let data: Vec<u8> = (0..len as u8).collect();
            assert_eq!(unpad(pad(&data)).unwrap(), data);
        }
    }

    #[test]
    fn unpad_rejects_oversized_pad() {
        let mut block = vec![0u8; 16];
        block[15] = 17;
        assert_eq!(
            unpad(block).unwrap_err(),
            CipherError::InvalidPadding { value: 17 }
        );
    }

    #[test]
    fn unpad_rejects_empty() {
        assert_eq!(unpad(Vec::new()).unwrap_err(), CipherError::EmptyCiphertext);
    }
}
