use std::io::{self, Write};

/// Prints `prompt` and reads one line, without its line ending. `None` at end of input.
pub fn input(prompt: &str) -> io::Result<Option<String>> {
    let mut line = String::new();
    print!("{prompt}");
    io::stdout().flush()?;
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(len);
    Ok(Some(line))
}

/// Line a user types to empty a field while editing.
pub const CLEAR_ENTRY: &str = "-";

/// Applies one typed line to a field: empty keeps the value, [`CLEAR_ENTRY`] empties it,
/// anything else replaces it.
pub fn apply_entry(value: &mut String, line: &str) {
    match line.trim() {
        "" => {}
        CLEAR_ENTRY => value.clear(),
        _ => *value = line.to_owned(),
    }
}

pub fn str_to_bool(mut str: String) -> Option<bool> {
    str.make_ascii_lowercase();
    match str.trim() {
        "y" | "yes" | "yeah" | "yea" | "true" | "on" => Some(true),
        "n" | "no" | "nope" | "false" | "off" => Some(false),
        _ => None,
    }
}
