//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Collapse whitespace so a multi-line payload preview fits on one log line.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("total_aset", 20), "total_aset");
        assert_eq!(truncate("laporan_posisi_keuangan", 10), "laporan...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // 'é' is 2 bytes: "Résumé" = 8 bytes
        assert_eq!(truncate("Résumé", 8), "Résumé");
        // max_len=6 -> target=3 -> 'é' spans bytes 1..3, boundary at 3 -> "Ré..."
        assert_eq!(truncate("Résumé", 6), "Ré...");
        // max_len=5 -> target=2 -> inside 'é', back to 1 -> "R..."
        assert_eq!(truncate("Résumé", 5), "R...");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("{\n  \"a\": 1,\n\t\"b\": 2\n}"), "{ \"a\": 1, \"b\": 2 }");
    }
}
