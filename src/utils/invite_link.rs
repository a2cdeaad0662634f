use once_cell::sync::Lazy;
use regex::Regex;

static JOIN_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^/\s]+/join/([A-Za-z0-9]{8})/?$").expect("Invalid join link regex")
});

static BARE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{8}$").expect("Invalid bare code regex"));

/// 构建邀请链接：`https://<host>/join/<CODE>`
pub fn build_invite_link(host: &str, code: &str) -> String {
    format!("https://{host}/join/{code}")
}

/// 从用户输入中提取邀请码
///
/// 接受裸码或完整邀请链接；大小写不敏感，统一转为大写返回。
pub fn extract_invite_code(input: &str) -> Option<String> {
    let input = input.trim();

    if BARE_CODE_RE.is_match(input) {
        return Some(input.to_ascii_uppercase());
    }

    JOIN_LINK_RE
        .captures(input)
        .map(|captures| captures[1].to_ascii_uppercase())
}
