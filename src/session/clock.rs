use std::time::Duration;

/// Format an elapsed duration as two-digit `mm:ss`
///
/// Minutes wrap at one hour; the hard cap on capture duration keeps real
/// sessions well below that.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let minutes = (total / 60) % 60;
    let seconds = total % 60;
    format!("{:02}:{:02}", minutes, seconds)
}
