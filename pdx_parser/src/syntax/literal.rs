use super::error::UnquoteError;
use std::str::Chars;

/// Strip the surrounding double quotes from a QUOTED_STRING value and
/// process backslash escapes.
///
/// Supported escapes: `\a \b \f \n \r \t \v \\ \"`, `\xHH`, `\uHHHH`,
/// `\UHHHHHHHH` and three-digit octal `\ooo`. `\'` is only valid in
/// single-quoted literals and is rejected here. Byte escapes (`\x`, octal)
/// must be below 0x80, since a lone high byte is not valid UTF-8.
pub fn unquote(raw: &str) -> Result<String, UnquoteError> {
    let inner = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or(UnquoteError::NotQuoted)?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => return Err(UnquoteError::BareQuote),
            '\\' => out.push(unescape(&mut chars)?),
            _ => out.push(c),
        }
    }

    Ok(out)
}

fn unescape(chars: &mut Chars<'_>) -> Result<char, UnquoteError> {
    let escape = chars.next().ok_or(UnquoteError::TrailingBackslash)?;
    let c = match escape {
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{0B}',
        '\\' | '"' => escape,
        'x' => ascii_byte(hex_digits(chars, 'x', 2)?)?,
        'u' => code_point(hex_digits(chars, 'u', 4)?)?,
        'U' => code_point(hex_digits(chars, 'U', 8)?)?,
        '0'..='7' => {
            let mut value = escape.to_digit(8).ok_or(UnquoteError::InvalidOctal)?;
            for _ in 0..2 {
                let digit = chars
                    .next()
                    .and_then(|d| d.to_digit(8))
                    .ok_or(UnquoteError::InvalidOctal)?;
                value = value * 8 + digit;
            }
            if value > 0xFF {
                return Err(UnquoteError::InvalidOctal);
            }
            ascii_byte(value)?
        }
        other => return Err(UnquoteError::UnknownEscape(other)),
    };
    Ok(c)
}

fn hex_digits(chars: &mut Chars<'_>, prefix: char, expected: usize) -> Result<u32, UnquoteError> {
    let mut value: u32 = 0;
    for _ in 0..expected {
        let digit = chars
            .next()
            .and_then(|d| d.to_digit(16))
            .ok_or(UnquoteError::ShortHexEscape { prefix, expected })?;
        value = value
            .checked_mul(16)
            .and_then(|v| v.checked_add(digit))
            .ok_or(UnquoteError::InvalidCodePoint(u32::MAX))?;
    }
    Ok(value)
}

fn ascii_byte(value: u32) -> Result<char, UnquoteError> {
    if value >= 0x80 {
        return Err(UnquoteError::HighByte(value));
    }
    code_point(value)
}

fn code_point(value: u32) -> Result<char, UnquoteError> {
    char::from_u32(value).ok_or(UnquoteError::InvalidCodePoint(value))
}
