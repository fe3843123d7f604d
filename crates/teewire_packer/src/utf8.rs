//! UTF-8 helpers shared by the packer and unpacker.

/// Decodes `bytes` one code point at a time, stopping at the first NUL.
///
/// Invalid sequences decode to U+FFFD, one replacement per maximal invalid
/// subpart.
pub fn lossy_chars(bytes: &[u8]) -> impl Iterator<Item = char> + '_ {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    bytes[..end].utf8_chunks().flat_map(|chunk| {
        let replacement = (!chunk.invalid().is_empty()).then_some(char::REPLACEMENT_CHARACTER);
        chunk.valid().chars().chain(replacement)
    })
}

/// Replaces control bytes other than `\t`, `\n` and `\r` with spaces.
pub fn sanitize(bytes: &mut [u8]) {
    for byte in bytes.iter_mut() {
        if *byte < 0x20 && !matches!(*byte, b'\t' | b'\n' | b'\r') {
            *byte = b' ';
        }
    }
}

/// Replaces every control byte below 0x20 with a space.
pub fn sanitize_cc(bytes: &mut [u8]) {
    for byte in bytes.iter_mut() {
        if *byte < 0x20 {
            *byte = b' ';
        }
    }
}

/// Whitespace as far as names and chat are concerned.
///
/// Wider than [`char::is_whitespace`]: it also covers control characters,
/// invisible fillers and variation selectors that render as nothing.
#[must_use]
pub const fn is_space(c: char) -> bool {
    matches!(
        c as u32,
        0..=0x20
            | 0x85
            | 0xA0
            | 0x34F
            | 0x115F
            | 0x1160
            | 0x1680
            | 0x180E
            | 0x2000..=0x200F
            | 0x2028..=0x202F
            | 0x205F..=0x2064
            | 0x206A..=0x206F
            | 0x2800
            | 0x3000
            | 0x3164
            | 0xFE00..=0xFE0F
            | 0xFEFF
            | 0xFFA0
            | 0xFFF0..=0xFFF8
    )
}

/// `text` without its leading [`is_space`] code points.
#[must_use]
pub fn skip_whitespaces(text: &str) -> &str {
    text.trim_start_matches(is_space)
}
