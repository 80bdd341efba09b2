/// 扩展名对应的文件头签名（偏移, 字节）
const SIGNATURES: &[(&[&str], usize, &[u8])] = &[
    // 图片格式
    (&["png"], 0, &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
    (&["jpg", "jpeg"], 0, &[0xFF, 0xD8, 0xFF]),
    (&["gif"], 0, b"GIF8"),
    (&["bmp"], 0, b"BM"),
    // 文档格式
    (&["pdf"], 0, b"%PDF"),
    // MS Office 旧格式 (OLE Compound Document)
    (
        &["doc", "xls", "ppt"],
        0,
        &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1],
    ),
    // ZIP 容器（OOXML 新格式也是 ZIP）
    (&["docx", "xlsx", "pptx", "zip"], 0, &[0x50, 0x4B, 0x03, 0x04]),
    // 压缩格式
    (&["rar"], 0, b"Rar!"),
    (&["7z"], 0, &[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C]),
    (&["gz"], 0, &[0x1F, 0x8B]),
    (&["tar"], 257, b"ustar"),
];

/// 不校验文件头的纯文本类扩展名
const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "json", "xml", "html", "css", "js", "ts", "csv", "py", "rs", "java", "c", "cpp",
];

/// 检查文件内容是否与扩展名（小写、不含点号）相符
///
/// 附件存储在落盘前调用；未知扩展名一律拒绝，空文件一律拒绝。
pub fn content_matches_extension(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    let extension = extension.trim_start_matches('.').to_ascii_lowercase();
    if TEXT_EXTENSIONS.contains(&extension.as_str()) {
        return std::str::from_utf8(data).is_ok();
    }

    SIGNATURES
        .iter()
        .find(|(exts, _, _)| exts.contains(&extension.as_str()))
        .map(|(_, offset, magic)| {
            data.len() >= offset + magic.len() && &data[*offset..offset + magic.len()] == *magic
        })
        .unwrap_or(false)
}
