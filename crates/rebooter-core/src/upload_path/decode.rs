//! File name decoding.

use percent_encoding::percent_decode_str;
use std::ffi::OsString;

/// URL-decodes a raw path segment into the on-disk file name bytes.
///
/// `+` becomes a space and `%XX` escapes are decoded. The bytes are kept as
/// is, so names that are not UTF-8 still match their files.
pub fn decode_file_name(raw: &str) -> Vec<u8> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).collect()
}

#[cfg(unix)]
pub fn os_file_name(bytes: Vec<u8>) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(bytes)
}

#[cfg(not(unix))]
pub fn os_file_name(bytes: Vec<u8>) -> OsString {
    String::from_utf8_lossy(&bytes).into_owned().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(decode_file_name("photo.jpg"), b"photo.jpg");
    }

    #[test]
    fn percent_escapes() {
        assert_eq!(decode_file_name("my%20file.png"), b"my file.png");
        assert_eq!(decode_file_name("caf%C3%A9.jpg"), "café.jpg".as_bytes());
        assert_eq!(decode_file_name("100%25.gif"), b"100%.gif");
    }

    #[test]
    fn non_utf8_bytes_are_kept() {
        assert_eq!(decode_file_name("caf%E9.jpg"), b"caf\xe9.jpg");
    }

    #[test]
    fn plus_is_space_but_encoded_plus_is_plus() {
        assert_eq!(decode_file_name("a+b.jpg"), b"a b.jpg");
        assert_eq!(decode_file_name("a%2Bb.jpg"), b"a+b.jpg");
    }

    #[cfg(unix)]
    #[test]
    fn os_file_name_keeps_raw_bytes() {
        use std::os::unix::ffi::OsStrExt;
        let name = os_file_name(b"caf\xe9.jpg".to_vec());
        assert_eq!(name.as_bytes(), b"caf\xe9.jpg");
    }
}
