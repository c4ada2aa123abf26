/// Inserts `delimiter` before every ASCII uppercase letter, dropping a
/// delimiter that would lead the string.
///
/// ```
/// assert_eq!(std_util::str::delimit_upper("FooBarBaz", '_'), "Foo_Bar_Baz");
/// ```
pub fn delimit_upper(value: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(value.len() + value.len() / 2);

    for ch in value.chars() {
        if ch.is_ascii_uppercase() && !out.is_empty() {
            out.push(delimiter);
        }
        out.push(ch);
    }

    out
}

/// Lower-cases the first character only.
pub fn lower_first(value: &str) -> String {
    let mut chars = value.chars();

    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strips `suffix` from the end of `value` at most `times` times.
pub fn strip_suffix_n<'a>(mut value: &'a str, suffix: &str, times: usize) -> &'a str {
    for _ in 0..times {
        match value.strip_suffix(suffix) {
            Some(stripped) => value = stripped,
            None => break,
        }
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimit_upper_skips_leading_delimiter() {
        assert_eq!(delimit_upper("Order", '_'), "Order");
        assert_eq!(delimit_upper("orderLine", '_'), "order_Line");
        assert_eq!(delimit_upper("", '_'), "");
    }

    #[test]
    fn delimit_upper_marks_every_capital() {
        assert_eq!(delimit_upper("HTTPServer", '-'), "H-T-T-P-Server");
    }

    #[test]
    fn lower_first_only_touches_first_char() {
        assert_eq!(lower_first("RowUpdated"), "rowUpdated");
        assert_eq!(lower_first("X"), "x");
        assert_eq!(lower_first(""), "");
    }

    #[test]
    fn strip_suffix_n_is_bounded() {
        assert_eq!(strip_suffix_n("CustomerEntityEntity", "Entity", 2), "Customer");
        assert_eq!(strip_suffix_n("EntityEntityEntity", "Entity", 2), "Entity");
        assert_eq!(strip_suffix_n("Order", "Entity", 2), "Order");
    }
}
