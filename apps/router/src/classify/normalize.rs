//! Label normalization shared by the routing table and the type resolver.

/// Lowercases `text`, collapses every run of non-alphanumeric characters into a
/// single space and trims the ends. Only ASCII letters and digits survive.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }

    out
}

/// Absent input normalizes to the empty string.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "Senior PCB Designer",
        "  Lead Product Manager — Hardware!! ",
        "GD&T / tolerance stack-up",
        "C++__firmware\t\n(RTOS)",
        "Ünïcödé Façade",
        "---",
        "a",
    ];

    #[test]
    fn test_lowercases_and_collapses() {
        assert_eq!(
            normalize("  Lead Product Manager — Hardware!! "),
            "lead product manager hardware"
        );
        assert_eq!(normalize("PCB   Design\tEngineer"), "pcb design engineer");
        assert_eq!(normalize("C++__firmware"), "c firmware");
    }

    #[test]
    fn test_is_idempotent() {
        for s in SAMPLES {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_empty_and_absent_yield_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!! ---"), "");
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize_opt(Some("")), "");
    }

    #[test]
    fn test_no_leading_or_trailing_space() {
        for s in SAMPLES {
            let n = normalize(s);
            assert_eq!(n.trim(), n);
            assert!(!n.contains("  "));
        }
    }
}
