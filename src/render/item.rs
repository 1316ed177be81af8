use crate::parse::MenuItem;

/// Length as the message renderer counts it, in UTF-16 code units.
pub fn display_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Renders an item as `{symbol} **{number}.** {name}` with its additions in italics on a
/// second line. The second line is left out when there are no additions.
pub fn render_item(item: &MenuItem) -> String {
    let mut out = format!("{} **{}.** {}", item.symbol(), item.number(), item.name());
    if !item.additions().is_empty() {
        out.push_str("\n*");
        out.push_str(&item.additions().join(", "));
        out.push('*');
    }
    out
}

/// Splits `s` on char boundaries into pieces of at most `limit` code units.
pub fn split_to_fit(s: &str, limit: usize) -> Vec<&str> {
    if display_len(s) <= limit {
        return vec![s];
    }
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut len = 0;
    for (i, c) in s.char_indices() {
        let c_len = c.len_utf16();
        if len + c_len > limit && i > start {
            pieces.push(&s[start..i]);
            start = i;
            len = 0;
        }
        len += c_len;
    }
    if start < s.len() {
        pieces.push(&s[start..]);
    }
    pieces
}
