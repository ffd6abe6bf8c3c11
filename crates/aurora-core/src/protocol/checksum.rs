/// One's complement of the byte sum modulo 256.
pub fn checksum8(bytes: &[u8]) -> u8 {
    !bytes.iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte))
}
