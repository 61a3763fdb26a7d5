use std::borrow::Cow;

/// Scrubs credential tokens out of error text before it is logged or shown.
/// Covers `Authorization: Bearer <token>` echoes and `token=` query/body
/// fragments that transport errors sometimes include verbatim.
pub fn redact_bearer_token(input: &str) -> Cow<'_, str> {
    let mut redacted = input.to_string();

    for marker in ["bearer ", "token="] {
        let mut out = String::with_capacity(redacted.len());
        let mut rest = redacted.as_str();
        while let Some(idx) = find_ascii_case_insensitive(rest, marker) {
            let end = idx + marker.len();
            out.push_str(&rest[..end]);
            rest = &rest[end..];

            let mut consumed = 0;
            for ch in rest.chars() {
                if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' || ch == '.' {
                    consumed += ch.len_utf8();
                } else {
                    break;
                }
            }
            if consumed > 0 {
                out.push_str("REDACTED");
                rest = &rest[consumed..];
            }
        }
        out.push_str(rest);
        redacted = out;
    }

    if redacted == input {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(redacted)
    }
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let nee = needle.as_bytes();
    if nee.is_empty() {
        return Some(0);
    }
    if nee.len() > hay.len() {
        return None;
    }

    for i in 0..=hay.len() - nee.len() {
        let mut matches = true;
        for j in 0..nee.len() {
            if hay[i + j].to_ascii_lowercase() != nee[j].to_ascii_lowercase() {
                matches = false;
                break;
            }
        }
        if matches {
            return Some(i);
        }
    }
    None
}
