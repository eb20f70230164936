//! Line-level config patching. Target files like locale.gen ship with the
//! interesting entries commented out; activation means removing the leading
//! `#` from exactly the matching lines.
//!
//! Contract: a line matches when, after stripping the comment marker and
//! surrounding whitespace, `pred` accepts it. Matching lines are rewritten
//! without the marker; everything else is passed through byte-for-byte.
//! Already-active lines no longer match `#`-stripping, so applying the same
//! patch twice returns the first result unchanged. A content with no match
//! is returned untouched with a count of 0 — the caller decides whether
//! silence is acceptable.

/// Uncomments every line accepted by `pred`. Returns the new content and the
/// number of lines changed.
pub fn uncomment_matching<F>(content: &str, pred: F) -> (String, usize)
where
    F: Fn(&str) -> bool,
{
    let mut out = String::with_capacity(content.len());
    let mut changed = 0;

    for line in content.lines() {
        let trimmed = line.trim_start();
        let uncommented = trimmed
            .strip_prefix('#')
            .map(str::trim_start)
            .filter(|rest| pred(rest));

        match uncommented {
            Some(rest) => {
                out.push_str(rest);
                changed += 1;
            }
            None => out.push_str(line),
        }
        out.push('\n');
    }

    (out, changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncomments_matching_line() {
        let input = "#en_US.UTF-8 UTF-8\n#de_DE.UTF-8 UTF-8\n";
        let (out, n) = uncomment_matching(input, |l| l.starts_with("en_US.UTF-8"));
        assert_eq!(out, "en_US.UTF-8 UTF-8\n#de_DE.UTF-8 UTF-8\n");
        assert_eq!(n, 1);
    }

    #[test]
    fn second_application_is_byte_identical() {
        let input = "#en_US.UTF-8 UTF-8\nja_JP.UTF-8 UTF-8\n";
        let (once, n1) = uncomment_matching(input, |l| l.contains("UTF-8"));
        let (twice, n2) = uncomment_matching(&once, |l| l.contains("UTF-8"));
        assert_eq!(once, twice);
        assert_eq!(n1, 1);
        assert_eq!(n2, 0);
    }

    #[test]
    fn no_match_returns_content_unchanged() {
        let input = "#en_US.UTF-8 UTF-8\n";
        let (out, n) = uncomment_matching(input, |l| l.starts_with("xx_XX"));
        assert_eq!(out, input);
        assert_eq!(n, 0);
    }

    #[test]
    fn non_commented_lines_pass_through() {
        let input = "[core]\nInclude = /etc/pacman.d/mirrorlist\n";
        let (out, n) = uncomment_matching(input, |_| true);
        assert_eq!(out, input);
        assert_eq!(n, 0);
    }
}
