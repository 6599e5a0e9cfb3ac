/// New sequence with `gap` zeros between consecutive values of `values`.
pub fn interleave_delays(values: &[f64], gap: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len() + values.len().saturating_sub(1) * gap);
    for (index, &value) in values.iter().enumerate() {
        if index > 0 {
            out.extend(std::iter::repeat_n(0.0, gap));
        }
        out.push(value);
    }
    out
}

/// Parse comma-separated non-negative integers. Any malformed entry yields an
/// empty sequence.
pub fn parse_numbers(text: &str) -> Vec<f64> {
    text.split(',')
        .map(|part| {
            let part = part.trim();
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            part.parse::<u64>().ok().map(|n| n as f64)
        })
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default()
}
