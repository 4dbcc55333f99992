use std::io::{self, BufRead, Write};

/// Prompts on `out` and reads one line, `None` once the input is closed.
pub fn input(
    prompt: &str,
    reader: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<Option<String>> {
    let mut line = String::new();
    write!(out, "{prompt}")?;
    out.flush()?;
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

pub fn str_to_bool(mut str: String) -> Option<bool> {
    str.make_ascii_lowercase();
    match str.trim() {
        "y" | "yes" | "yeah" | "yea" | "true" | "on" => Some(true),
        "n" | "no" | "nope" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// Splits `key=value` options off the end of a command, returning the remaining words.
pub fn split_options<'a>(parts: impl Iterator<Item = &'a str>) -> (Vec<&'a str>, Vec<(&'a str, &'a str)>) {
    let mut words = Vec::new();
    let mut options = Vec::new();
    for part in parts {
        match part.split_once('=') {
            Some((key, value)) if !key.is_empty() => options.push((key, value)),
            _ => words.push(part),
        }
    }
    (words, options)
}
