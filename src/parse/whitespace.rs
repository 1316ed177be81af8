use std::{borrow::Cow, sync::OnceLock};

use regex::Regex;

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("regex should be valid"))
}

/// Trims `s` and replaces every inner run of whitespace (including newlines and
/// `&nbsp;`) with a single space. Borrows when nothing had to change.
pub fn collapse_whitespace(s: &str) -> Cow<'_, str> {
    let s = s.trim();
    let re = whitespace_run();
    // a lone ascii space is already collapsed
    if !re.find_iter(s).any(|m| m.as_str() != " ") {
        return Cow::Borrowed(s);
    }
    re.replace_all(s, " ")
}

/// Splits `s` on its first whitespace run into the leading word and the trimmed rest.
/// The rest is empty when `s` holds a single word.
pub fn split_first_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    whitespace_run()
        .find(s)
        .map_or((s, ""), |m| (&s[..m.start()], s[m.end()..].trim()))
}
