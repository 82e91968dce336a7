//! Transcoding between host-side UTF-8 and engine-side UTF-16.

use crate::error::EncodingError;

/// Encodes `s` as null-terminated UTF-16.
pub fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Decodes UTF-16 up to the first null unit (or the end of the slice).
///
/// Unpaired surrogates are rejected rather than replaced.
pub fn from_wide(wide: &[u16]) -> Result<String, EncodingError> {
    let len = wide.iter().position(|&unit| unit == 0).unwrap_or(wide.len());
    let units = &wide[..len];

    let mut out = String::with_capacity(len);
    let mut index = 0;
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(c) => {
                index += c.len_utf16();
                out.push(c);
            }
            Err(_) => return Err(EncodingError::InvalidUtf16 { index }),
        }
    }
    Ok(out)
}
