//! Derivation of independent random streams from the session seed.

use sha2::{Digest, Sha256};

pub(crate) const STREAM_SPAWNING: &str = "spawning";
pub(crate) const STREAM_COLLISION: &str = "collision";

pub(crate) fn stream_seed(session_seed: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(session_seed.to_le_bytes());
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_split_streams() {
        assert_ne!(
            stream_seed(7, STREAM_SPAWNING),
            stream_seed(7, STREAM_COLLISION)
        );
        assert_eq!(stream_seed(7, STREAM_SPAWNING), stream_seed(7, STREAM_SPAWNING));
        assert_ne!(stream_seed(7, STREAM_SPAWNING), stream_seed(8, STREAM_SPAWNING));
    }
}
