/// Decodes plain-text bytes. UTF-8 first; any byte sequence that is not
/// valid UTF-8 falls back to Latin-1, where every byte maps to the code
/// point of the same value. The fallback is total, so this extractor never
/// fails, including on empty input.
pub fn extract_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&byte| char::from(byte)).collect(),
    }
}
