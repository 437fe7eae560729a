//! Decoding helpers for access keys and secret keys, which operators may paste
//! in hex, base64, or base64url form.

use data_encoding::{BASE64, BASE64_NOPAD, BASE64URL, BASE64URL_NOPAD, DecodeError, HEXLOWER, HEXUPPER};

/// Attempt to decode `encoded_value` into bytes, trying every supported
/// encoding until one succeeds. The error returned is from the last attempt
/// (hex lower failing on a base64-only alphabet is the common case).
pub fn try_decode(encoded_value: &str) -> Result<Vec<u8>, DecodeError> {
    HEXLOWER
        .decode(encoded_value.as_bytes())
        .or_else(|_| HEXUPPER.decode(encoded_value.as_bytes()))
        .or_else(|_| BASE64URL.decode(encoded_value.as_bytes()))
        .or_else(|_| BASE64URL_NOPAD.decode(encoded_value.as_bytes()))
        .or_else(|_| BASE64.decode(encoded_value.as_bytes()))
        .or_else(|_| BASE64_NOPAD.decode(encoded_value.as_bytes()))
}
