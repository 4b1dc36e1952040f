use std::sync::OnceLock;

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

static MAX_AMBIGUOUS_TRIES: OnceLock<usize> = OnceLock::new();

/// Cap on ambiguous-cell combinations tried before giving up
pub(crate) fn max_ambiguous_tries() -> usize {
    *MAX_AMBIGUOUS_TRIES
        .get_or_init(|| parse_env_usize("PDF417_MAX_AMBIGUOUS_TRIES", 100).clamp(1, 1000))
}

static MAX_NEARBY_ROWS: OnceLock<usize> = OnceLock::new();

/// Search distance (in image rows) for the nearest codeword in a column
pub(crate) fn max_nearby_rows() -> usize {
    *MAX_NEARBY_ROWS.get_or_init(|| parse_env_usize("PDF417_MAX_NEARBY_ROWS", 5).clamp(1, 16))
}
