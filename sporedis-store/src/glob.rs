//! Redis-style glob matching for key scans.
//!
//! Supports `*`, `?`, `[abc]`, `[^abc]`, `[a-z]` and `\` escapes. An
//! unterminated `[` class runs to the end of the pattern.
//!
//! Matching is iterative: a `*` remembers where it was seen and, on a later
//! mismatch, retries with the star absorbing one more character. Only the
//! most recent star is ever retried, so the cost is bounded by
//! `pattern.len() * text.len()`.

/// Returns true when `text` matches `pattern`.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();

    let (mut pi, mut ti) = (0, 0);
    // Pattern position after the last star, and the text position it resumes from.
    let mut star: Option<(usize, usize)> = None;

    loop {
        if pi < p.len() && p[pi] == '*' {
            while pi < p.len() && p[pi] == '*' {
                pi += 1;
            }
            star = Some((pi, ti));
            continue;
        }
        if ti < t.len() {
            if let Some(next) = match_one(&p, pi, t[ti]) {
                pi = next;
                ti += 1;
                continue;
            }
        } else if pi == p.len() {
            return true;
        }
        match star {
            Some((resume_p, resume_t)) if resume_t < t.len() => {
                star = Some((resume_p, resume_t + 1));
                pi = resume_p;
                ti = resume_t + 1;
            }
            _ => return false,
        }
    }
}

/// Matches the single-character token at `p[pi]` against `c`. Returns the
/// position after the token, or `None` on mismatch or end of pattern.
fn match_one(p: &[char], pi: usize, c: char) -> Option<usize> {
    let head = *p.get(pi)?;
    match head {
        '?' => Some(pi + 1),
        '[' => {
            let (matched, next) = match_class(p, pi + 1, c);
            matched.then_some(next)
        }
        '\\' if pi + 1 < p.len() => (p[pi + 1] == c).then_some(pi + 2),
        lit => (lit == c).then_some(pi + 1),
    }
}

/// Matches `c` against the class body starting at `p[i]` (just after `[`).
/// Returns the result and the position after the closing `]`.
fn match_class(p: &[char], mut i: usize, c: char) -> (bool, usize) {
    let negate = p.get(i) == Some(&'^');
    if negate {
        i += 1;
    }

    let mut matched = false;
    while i < p.len() {
        match &p[i..] {
            [']', ..] => {
                i += 1;
                break;
            }
            ['\\', lit, ..] => {
                matched |= *lit == c;
                i += 2;
            }
            [lo, '-', hi, ..] if *hi != ']' => {
                let (lo, hi) = if lo <= hi { (*lo, *hi) } else { (*hi, *lo) };
                matched |= lo <= c && c <= hi;
                i += 3;
            }
            [lit, ..] => {
                matched |= *lit == c;
                i += 1;
            }
            [] => break,
        }
    }
    (matched != negate, i)
}
