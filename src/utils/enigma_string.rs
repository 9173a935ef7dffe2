//! Enigma text commands
//!
//! Enigma strings embed formatting commands inline: `^font(Times,4096)`,
//! `^size(12)`, `^nfx(3)`, `^flat()` and so on. A literal caret is written
//! as `^^`. These helpers detect, split and strip those commands.

use crate::dom::{Document, FontInfo};
use crate::error::{MusxError, Result};

const FONT_COMMANDS: &[&str] = &[
    "^font", "^fontid", "^Font", "^fontMus", "^fontTxt", "^fontNum", "^size", "^nfx",
];

const ACCIDENTAL_TAGS: &[(&str, &str)] = &[
    ("^flat()", "\u{266D}"),
    ("^natural()", "\u{266E}"),
    ("^sharp()", "\u{266F}"),
];

/// True if `text` begins with a command that changes the font.
pub fn starts_with_font_command(text: &str) -> bool {
    FONT_COMMANDS.iter().any(|cmd| text.starts_with(cmd))
}

/// Split a single command into its name and parameters.
///
/// `^font(Times,4096)` gives `["font", "Times", "4096"]`, `^^` gives `["^"]`.
/// Commas inside nested parentheses do not split. Returns an empty vector
/// for anything that is not a well-formed command.
pub fn parse_components(input: &str) -> Vec<String> {
    let bytes = input.as_bytes();
    if bytes.first() != Some(&b'^') {
        return Vec::new();
    }
    if input == "^^" {
        return vec!["^".to_string()];
    }

    let name_end = 1 + bytes[1..].iter().take_while(|b| b.is_ascii_alphabetic()).count();
    if name_end == 1 {
        return Vec::new();
    }

    let mut components = vec![input[1..name_end].to_string()];
    if bytes.get(name_end) != Some(&b'(') {
        return components;
    }

    let params_start = name_end + 1;
    let params_end = match matching_paren(bytes, name_end) {
        Some(close) => close,
        None => return Vec::new(),
    };

    let params = &input[params_start..params_end];
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in params.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                if i > start {
                    components.push(params[start..i].to_string());
                }
                start = i + 1;
            }
            _ => {}
        }
    }
    if params.len() > start {
        components.push(params[start..].to_string());
    }
    components
}

/// Byte length of the command at the start of `text`, through the `)` that
/// closes its parameter list. `None` if the list never closes.
pub fn command_len(text: &str) -> Option<usize> {
    let open = text.find('(')?;
    matching_paren(text.as_bytes(), open).map(|close| close + 1)
}

/// Index of the `)` that closes the `(` at `open`.
fn matching_paren(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_int<T: std::str::FromStr>(value: &str, tag: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| MusxError::invalid_argument(format!("invalid number \"{}\" in {}", value, tag)))
}

/// Apply one font command to `font_info`.
///
/// Returns `Ok(false)` when `tag` is not a font command. A font named by
/// name must exist among the document's font definitions.
pub fn parse_font_command(tag: &str, font_info: &mut FontInfo, document: &Document) -> Result<bool> {
    let components = parse_components(tag);
    if components.len() < 2 {
        return Ok(false);
    }
    let param = components[1].as_str();
    match components[0].as_str() {
        "fontid" => font_info.font_id = parse_int(param, tag)?,
        "font" | "fontMus" | "fontTxt" | "fontNum" => {
            if let Some(id) = param.strip_prefix("Font") {
                font_info.font_id = parse_int(id, tag)?;
            } else {
                font_info.set_font_id_by_name(param, document)?;
            }
        }
        "nfx" => font_info.set_enigma_styles(parse_int(param, tag)?),
        "size" => font_info.font_size = parse_int(param, tag)?,
        _ => return Ok(false),
    }
    Ok(true)
}

/// Remove every command from `text`, keeping `^^` as a literal caret.
pub fn trim_tags(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut result = String::with_capacity(text.len());
    let mut i = 0;
    let mut plain_start = 0;
    while i < bytes.len() {
        if bytes[i] != b'^' {
            i += 1;
            continue;
        }
        result.push_str(&text[plain_start..i]);
        if bytes.get(i + 1) == Some(&b'^') {
            result.push('^');
            i += 2;
        } else {
            let name_len = bytes[i + 1..].iter().take_while(|b| b.is_ascii_alphabetic()).count();
            if name_len == 0 {
                result.push('^');
                i += 1;
            } else {
                i += 1 + name_len;
                if bytes.get(i) == Some(&b'(') {
                    i = matching_paren(bytes, i).map_or(bytes.len(), |close| close + 1);
                }
            }
        }
        plain_start = i;
    }
    result.push_str(&text[plain_start..]);
    result
}

/// Replace `^flat()`, `^natural()` and `^sharp()` with their Unicode symbols.
pub fn replace_accidental_tags(text: &str) -> String {
    ACCIDENTAL_TAGS
        .iter()
        .fold(text.to_string(), |acc, (tag, symbol)| acc.replace(tag, symbol))
}
