//! MIME Type Detection Utilities
//!
//! Detects MIME types for uploaded supporting documents, using magic number
//! detection (via the `infer` crate) with extension-based fallback for the
//! document formats common in certification submissions.

/// Guess MIME by inspecting bytes (magic numbers)
pub fn guess_mime_from_bytes(bytes: &[u8]) -> Option<String> {
    infer::get(bytes).map(|k| k.mime_type().to_string())
}

/// Guess MIME by file name (extension-based)
pub fn guess_mime_from_name(name: &str) -> Option<String> {
    let extension = name.rsplit('.').next()?.to_lowercase();

    let mime = match extension.as_str() {
        // Documents
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "odt" => "application/vnd.oasis.opendocument.text",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",

        // Plans and building models
        "ifc" => "model/ifc",
        "dwg" => "image/vnd.dwg",
        "dxf" => "image/vnd.dxf",

        // Images (site photos, scanned evidence)
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",

        // Text
        "txt" => "text/plain",
        "csv" => "text/csv",
        "md" => "text/markdown",
        "json" => "application/json",
        "xml" => "application/xml",

        // Archives
        "zip" => "application/zip",

        _ => return None,
    };
    Some(mime.to_string())
}

/// Guess MIME from bytes first, then fall back to the file name.
pub fn guess_mime(name: &str, bytes: &[u8]) -> String {
    guess_mime_from_bytes(bytes)
        .or_else(|| guess_mime_from_name(name))
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_magic_bytes() {
        let bytes = b"%PDF-1.7 rest of file";
        assert_eq!(guess_mime_from_bytes(bytes), Some("application/pdf".into()));
    }

    #[test]
    fn extension_fallback() {
        assert_eq!(
            guess_mime_from_name("energy-report.xlsx"),
            Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".into())
        );
        assert_eq!(guess_mime_from_name("model.ifc"), Some("model/ifc".into()));
        assert_eq!(guess_mime_from_name("unknown.xyz"), None);
    }

    #[test]
    fn combined_guess_defaults_to_octet_stream() {
        assert_eq!(guess_mime("blob.xyz", b"\x00\x01\x02"), "application/octet-stream");
    }

    #[test]
    fn combined_guess_prefers_magic_bytes() {
        // PNG magic, misleading extension
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert_eq!(guess_mime("photo.pdf", &png), "image/png");
    }
}
