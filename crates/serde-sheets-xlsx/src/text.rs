//! Text helpers shared by the reader and writer

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode characters XML cannot carry:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '_' {
            result.push(c);
            continue;
        }

        let mut hex_chars = String::new();
        let mut consumed_x = false;
        let mut decoded = None;

        if chars.peek() == Some(&'x') {
            chars.next();
            consumed_x = true;

            while hex_chars.len() < 4 {
                match chars.peek() {
                    Some(&ch) if ch.is_ascii_hexdigit() => {
                        hex_chars.push(ch);
                        chars.next();
                    }
                    _ => break,
                }
            }

            if hex_chars.len() == 4 && chars.peek() == Some(&'_') {
                chars.next();
                decoded = u32::from_str_radix(&hex_chars, 16)
                    .ok()
                    .and_then(char::from_u32);
            }
        }

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                // Not an escape; keep what was consumed
                result.push('_');
                if consumed_x {
                    result.push('x');
                }
                result.push_str(&hex_chars);
            }
        }
    }

    result
}

/// Encode a string so that [`decode_excel_escapes`] gives it back unchanged.
///
/// A literal `_xHHHH_` gets its underscore written as `_x005F_`, and control
/// characters other than tab and line feed become `_x00HH_`.
pub(crate) fn encode_excel_escapes(s: &str) -> String {
    if !s.chars().any(|c| c == '_' || needs_escape(c)) {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len() + 8);
    for (i, c) in s.char_indices() {
        if c == '_' && starts_escape(&s[i..]) {
            result.push_str("_x005F_");
        } else if needs_escape(c) {
            result.push_str(&format!("_x{:04X}_", u32::from(c)));
        } else {
            result.push(c);
        }
    }
    result
}

fn needs_escape(c: char) -> bool {
    c.is_control() && c != '\t' && c != '\n' && u32::from(c) < 0x80
}

/// Whether `s` begins with `_x` followed by four hex digits and `_`
fn starts_escape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 7
        && bytes[1] == b'x'
        && bytes[2..6].iter().all(u8::is_ascii_hexdigit)
        && bytes[6] == b'_'
}

/// Escape text for XML element content and attribute values
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Whether `<t>` needs `xml:space="preserve"` to keep the text intact
pub(crate) fn needs_space_preserve(s: &str) -> bool {
    s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace) || s.contains('\n')
}
