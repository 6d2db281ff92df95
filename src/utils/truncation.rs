const MAX_ERROR_LENGTH: usize = 2_000;

/// Cap upstream error bodies before they are embedded in error messages.
pub fn truncate_error(error: &str) -> String {
    if error.len() <= MAX_ERROR_LENGTH {
        return error.to_string();
    }
    let mut end = MAX_ERROR_LENGTH;
    while !error.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &error[..end])
}
