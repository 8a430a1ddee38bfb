//! Content-type detection from payload bytes.

/// Returned when the payload matches no known signature.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Sniff a MIME type from magic bytes. Filenames are never consulted; media
/// routes carry raw bytes and the staged artifact's name is a generated one.
pub fn detect(bytes: &[u8]) -> String {
    infer::get(bytes)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| FALLBACK_MIME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0];

    #[test]
    fn detects_png_from_magic_bytes() {
        assert_eq!(detect(PNG_HEADER), "image/png");
    }

    #[test]
    fn detects_pdf_from_magic_bytes() {
        assert_eq!(detect(b"%PDF-1.7 rest of file"), "application/pdf");
    }

    #[test]
    fn unknown_bytes_fall_back_to_octet_stream() {
        assert_eq!(detect(b"just some text"), FALLBACK_MIME);
        assert_eq!(detect(&[]), FALLBACK_MIME);
    }
}
