//! Content-type detection for raw request bodies.

const SIGNATURES: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1F\x8B\x08", "application/x-gzip"),
];

const HTML_TAGS: &[&[u8]] = &[
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<BODY",
    b"<SCRIPT",
    b"<DIV",
    b"<P",
];

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Guesses a MIME type from the leading bytes of `data`.
pub fn content_type(data: &[u8]) -> &'static str {
    if let Some((_, mime)) = SIGNATURES.iter().find(|(magic, _)| data.starts_with(magic)) {
        return *mime;
    }

    let text = data.trim_ascii_start();
    if HTML_TAGS.iter().any(|tag| starts_with_tag(text, tag)) {
        return "text/html; charset=utf-8";
    }
    if text.starts_with(b"<?xml") {
        return "text/xml; charset=utf-8";
    }

    if data.iter().any(|&b| is_binary_byte(b)) || std::str::from_utf8(data).is_err() {
        OCTET_STREAM
    } else {
        TEXT_PLAIN
    }
}

/// Case-insensitive tag match followed by a space or `>`.
fn starts_with_tag(data: &[u8], tag: &[u8]) -> bool {
    data.len() > tag.len()
        && data[..tag.len()].eq_ignore_ascii_case(tag)
        && matches!(data[tag.len()], b' ' | b'>')
}

fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_and_json_sniff_as_text() {
        assert_eq!(content_type(b"hello world\n"), TEXT_PLAIN);
        assert_eq!(content_type(b"[1, 2, 3]"), TEXT_PLAIN);
    }

    #[test]
    fn magic_numbers_win() {
        assert_eq!(content_type(b"%PDF-1.7 ..."), "application/pdf");
        assert_eq!(content_type(b"\x89PNG\r\n\x1a\n\0\0"), "image/png");
        assert_eq!(content_type(b"\x1f\x8b\x08\0"), "application/x-gzip");
    }

    #[test]
    fn markup_is_recognised_after_leading_whitespace() {
        assert_eq!(
            content_type(b"  <html><body></body></html>"),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            content_type(b"<?xml version=\"1.0\"?><a/>"),
            "text/xml; charset=utf-8"
        );
    }

    #[test]
    fn control_bytes_sniff_as_binary() {
        assert_eq!(content_type(&[0x00, 0x01, 0x02]), OCTET_STREAM);
        assert_eq!(content_type(&[0xC3, 0x28]), OCTET_STREAM);
    }
}
