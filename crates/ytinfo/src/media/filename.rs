use regex::Regex;
use std::sync::LazyLock;

const MAX_FILENAME_CHARS: usize = 200;

// Characters rejected by NTFS plus a few that break shells and URLs
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*#%\x00-\x1F\x7F]"#).unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Turn a video title into something usable as a file name.
///
/// Returns `None` when nothing printable is left.
pub fn safe_filename(title: &str) -> Option<String> {
    let stripped = UNSAFE_CHARS.replace_all(title, "");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    let truncated: String = collapsed.trim().chars().take(MAX_FILENAME_CHARS).collect();
    // trailing dots and spaces are dropped by Windows
    let name = truncated.trim_end_matches(['.', ' ']).trim_start();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
