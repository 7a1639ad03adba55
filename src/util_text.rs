/// Format an aepix base-unit amount in whole EPIX (18 decimals).
/// Examples: "1 EPIX", "0.5 EPIX", "2500 EPIX"
pub fn format_epix(aepix: u128) -> String {
    const ONE: u128 = 1_000_000_000_000_000_000;
    if aepix == 0 {
        return "0 EPIX".to_string();
    }
    let whole = aepix / ONE;
    let frac = aepix % ONE;
    if frac == 0 {
        return format!("{whole} EPIX");
    }
    // Keep four fractional digits, trimming trailing zeros.
    let frac4 = frac / (ONE / 10_000);
    let s = format!("{whole}.{frac4:04}");
    format!("{} EPIX", s.trim_end_matches('0').trim_end_matches('.'))
}

/// First line of an error payload, for display. Provider errors often
/// arrive as multi-line dumps; only the head is user-relevant.
pub fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}
