/// Shown in place of a statistic that has no data yet.
pub const PLACEHOLDER: &str = "—";

/// Render milliseconds as `m:ss.cc`.
///
/// Minutes are unpadded and never roll over into hours. Centiseconds are
/// truncated, so 12345 ms reads `0:12.34`.
pub fn format_duration(ms: f64) -> String {
    let total_seconds = (ms / 1000.0).floor() as u64;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    let centis = ((ms % 1000.0) / 10.0).floor() as u64;

    format!("{minutes}:{seconds:02}.{centis:02}")
}

pub fn format_optional(ms: Option<f64>) -> String {
    ms.map_or_else(|| PLACEHOLDER.to_string(), format_duration)
}

/// One line of the solve log, `solve_number` is 1-based.
pub fn format_log_entry(solve_number: usize, ms: f64) -> String {
    format!("{solve_number}. {}", format_duration(ms))
}
