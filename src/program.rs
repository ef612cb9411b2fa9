use crate::Word;

/// Parses an assembly listing (or a resolved-trace file, which shares the
/// same line format) into cleaned instruction lines: comments starting with
/// `#` are stripped, and blank lines are dropped.
pub fn parse_lines(source: &str) -> Vec<String> {
    source
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Parses a memory image file: one signed decimal word per line, `#`
/// comments and blank lines ignored.
pub fn parse_words(source: &str) -> Result<Vec<Word>, std::num::ParseIntError> {
    parse_lines(source)
        .iter()
        .map(|line| line.parse::<i32>().map(|v| v as Word))
        .collect()
}
