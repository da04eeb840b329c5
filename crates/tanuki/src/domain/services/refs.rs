//! Git reference helpers

/// Length of an abbreviated commit hash
pub const SHORT_SHA_LEN: usize = 8;

/// Strip `refs/heads/` or `refs/tags/` from a reference name
pub fn parse_ref(reference: &str) -> &str {
    ["refs/heads/", "refs/tags/"]
        .iter()
        .find_map(|prefix| reference.strip_prefix(prefix))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(reference)
}

/// First eight characters of a commit hash; shorter input is returned whole
pub fn truncate_sha(sha: &str) -> &str {
    match sha.char_indices().nth(SHORT_SHA_LEN) {
        Some((end, _)) => &sha[..end],
        None => sha,
    }
}

/// Whether `sha` is the all-zero sentinel GitLab sends for a missing revision
pub fn is_zero_sha(sha: &str) -> bool {
    !sha.is_empty() && sha.chars().all(|c| c == '0')
}

/// First line of a commit message without trailing whitespace
pub fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("").trim_end()
}

/// First line of a commit message, with `...` when more lines follow
pub fn summary_line(message: &str) -> String {
    let trimmed = message.trim_end();
    let first = first_line(trimmed);
    if trimmed.len() > first.len() {
        format!("{first}...")
    } else {
        first.to_string()
    }
}
