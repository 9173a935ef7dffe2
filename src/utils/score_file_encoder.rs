//! Score payload scrambling
//!
//! The embedded score payload is XORed with a byte stream from a linear
//! congruential generator that restarts every [`ScoreFileEncoder::RESET_LIMIT`]
//! bytes. Applying the transform twice restores the input.

pub struct ScoreFileEncoder;

impl ScoreFileEncoder {
    /// Generator seed. Must not change.
    pub const INITIAL_STATE: u32 = 0x28006D45;
    /// Block size after which the generator restarts. Must not change.
    pub const RESET_LIMIT: usize = 0x20000;

    /// Scramble or unscramble `buffer` in place with the standard seed.
    pub fn encode_decode(buffer: &mut [u8]) {
        Self::encode_decode_with_state(buffer, Self::INITIAL_STATE);
    }

    pub fn encode_decode_with_state(buffer: &mut [u8], initial_state: u32) {
        let mut state = initial_state;
        for (i, byte) in buffer.iter_mut().enumerate() {
            if i % Self::RESET_LIMIT == 0 {
                state = initial_state;
            }
            state = state.wrapping_mul(0x41C6_4E6D).wrapping_add(0x3039);
            let upper = state >> 16;
            let mask = (upper + upper / 255) as u8;
            *byte ^= mask;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 % 251) as u8).collect()
    }

    #[test]
    fn test_known_mask_prefix() {
        let mut buffer = vec![0u8; 4];
        ScoreFileEncoder::encode_decode(&mut buffer);
        assert_eq!(buffer, vec![0x09, 0x5C, 0x5B, 0xA9]);
    }

    #[test]
    fn test_twice_is_identity() {
        let lengths = [
            0,
            1,
            ScoreFileEncoder::RESET_LIMIT,
            ScoreFileEncoder::RESET_LIMIT * 3 + 1234,
        ];
        for len in lengths {
            let original = sample(len);
            let mut buffer = original.clone();
            ScoreFileEncoder::encode_decode(&mut buffer);
            if len > 0 {
                assert_ne!(buffer, original, "length {} was not scrambled", len);
            }
            ScoreFileEncoder::encode_decode(&mut buffer);
            assert_eq!(buffer, original, "length {} did not round trip", len);
        }
    }

    #[test]
    fn test_state_resets_each_block() {
        let mut buffer = vec![0u8; ScoreFileEncoder::RESET_LIMIT + 4];
        ScoreFileEncoder::encode_decode(&mut buffer);
        assert_eq!(&buffer[..4], &buffer[ScoreFileEncoder::RESET_LIMIT..]);
    }
}
