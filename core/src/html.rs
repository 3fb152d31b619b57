//! HTML serialization helpers shared by string rendering and [`VNode`](crate::VNode).

use core::fmt::Write;

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Returns `true` for elements serialized without a closing tag.
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(tag))
}

/// Appends `text` escaped for use as element content.
pub fn escape_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Appends `value` escaped for use inside a double-quoted attribute.
pub fn escape_attribute(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Appends ` name="value"`, or ` name` when the value is empty.
pub fn write_attribute(out: &mut String, name: &str, value: &str) {
    if value.is_empty() {
        write_flag(out, name);
        return;
    }
    let _ = write!(out, " {name}=\"");
    escape_attribute(out, value);
    out.push('"');
}

/// Appends ` name` for boolean attributes.
pub fn write_flag(out: &mut String, name: &str) {
    out.push(' ');
    out.push_str(name);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_in_text() {
        let mut out = String::new();
        escape_text(&mut out, "a < b && \"c\"");
        assert_eq!(out, "a &lt; b &amp;&amp; \"c\"");
    }

    #[test]
    fn escapes_quotes_in_attributes() {
        let mut out = String::new();
        write_attribute(&mut out, "title", "say \"hi\"");
        assert_eq!(out, " title=\"say &quot;hi&quot;\"");

        let mut flag = String::new();
        write_attribute(&mut flag, "disabled", "");
        assert_eq!(flag, " disabled");
    }

    #[test]
    fn void_elements_are_case_insensitive() {
        assert!(is_void_element("input"));
        assert!(is_void_element("BR"));
        assert!(!is_void_element("div"));
    }
}
