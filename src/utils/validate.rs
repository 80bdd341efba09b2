use once_cell::sync::Lazy;
use regex::Regex;

static ACADEMIC_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{4}$").expect("Invalid academic year regex"));

static EXTENSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]{1,16}$").expect("Invalid extension regex"));

pub const REMARKS_MAX_CHARS: usize = 1000;
pub const TITLE_MAX_CHARS: usize = 255;

pub fn validate_academic_year(year: &str) -> Result<(), &'static str> {
    // 学年格式校验：YYYY-YYYY
    if !ACADEMIC_YEAR_RE.is_match(year) {
        return Err("Academic year must match YYYY-YYYY");
    }
    Ok(())
}

pub fn validate_remarks(remarks: &str) -> Result<(), &'static str> {
    if remarks.chars().count() > REMARKS_MAX_CHARS {
        return Err("Remarks must be at most 1000 characters");
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), &'static str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("Title must not be empty");
    }
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        return Err("Title must be at most 255 characters");
    }
    Ok(())
}

/// 规范化逗号分隔的扩展名白名单：去空白、去点号、转小写、去重
///
/// 返回 `Ok(None)` 表示不限制类型。
pub fn normalize_extension_list(raw: &str) -> Result<Option<String>, String> {
    let mut extensions: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let ext = part.trim().trim_start_matches('.').to_ascii_lowercase();
        if ext.is_empty() {
            continue;
        }
        if !EXTENSION_RE.is_match(&ext) {
            return Err(format!("Invalid file extension: '{}'", part.trim()));
        }
        if !extensions.contains(&ext) {
            extensions.push(ext);
        }
    }

    if extensions.is_empty() {
        Ok(None)
    } else {
        Ok(Some(extensions.join(",")))
    }
}

/// 取文件名的扩展名（小写、不含点号）
pub fn file_extension(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
