/// 检查上传内容的魔术字节是否与扩展名一致
///
/// `extension` 包含点号，如 ".pdf"；大小写不敏感。
/// 未知扩展名一律拒绝。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        ".pdf" => data.starts_with(b"%PDF-"),
        // OOXML / zip 打包的作业
        ".zip" | ".docx" => data.starts_with(&[0x50, 0x4B, 0x03, 0x04]),
        ".png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        ".jpg" | ".jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        // 纯文本：不能含 NUL
        ".txt" | ".md" => !data.contains(&0),
        _ => false,
    }
}

/// 取文件名的扩展名（小写，含点号）
pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_magic() {
        assert!(validate_magic_bytes(b"%PDF-1.7\n%\xe2\xe3", ".pdf"));
        assert!(validate_magic_bytes(b"%PDF-1.4", ".PDF"));
        assert!(!validate_magic_bytes(b"PK\x03\x04", ".pdf"));
        assert!(!validate_magic_bytes(b"", ".pdf"));
    }

    #[test]
    fn test_zip_based() {
        let zip = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert!(validate_magic_bytes(&zip, ".zip"));
        assert!(validate_magic_bytes(&zip, ".docx"));
        assert!(!validate_magic_bytes(&zip, ".png"));
    }

    #[test]
    fn test_text_rejects_binary() {
        assert!(validate_magic_bytes(b"# Homework 1\n", ".md"));
        assert!(!validate_magic_bytes(b"abc\0def", ".txt"));
    }

    #[test]
    fn test_unknown_extension() {
        assert!(!validate_magic_bytes(b"MZ\x90\x00", ".exe"));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("hw1.PDF").as_deref(), Some(".pdf"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some(".gz"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(".hidden"), None);
    }
}
