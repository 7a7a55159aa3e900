/// Report file name for an uploaded file: `analysis_{sanitized_name}.txt`.
pub fn report_filename(source_name: &str) -> String {
    format!("analysis_{}.txt", sanitize_name(source_name))
}

fn sanitize_name(input: &str) -> String {
    // Only the last path component is meaningful.
    let base = input.rsplit(['/', '\\']).next().unwrap_or(input);
    let cleaned: String = base
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]);

    // Collapse multiple underscores
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    if compacted.is_empty() {
        return "upload".to_string();
    }
    if compacted.len() > 120 {
        let mut end = 120;
        while !compacted.is_char_boundary(end) {
            end -= 1;
        }
        compacted.truncate(end);
    }
    compacted
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}
