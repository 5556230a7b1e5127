/// Returns `bytes` without any carriage return, so that CRLF and LF line endings compare equal.
pub fn filter_carriage(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().copied().filter(|b| *b != b'\r').collect()
}
