//! Line-level scanning of request-script source text
//!
//! Tracks triple-quoted block strings across lines and counts structural
//! delimiters outside of strings and comments. Shared by the payload
//! extractor and the executors' indentation handling.

const TRIPLE_DOUBLE: &[u8] = b"\"\"\"";
const TRIPLE_SINGLE: &[u8] = b"'''";

/// Open block-string delimiter carried from one line to the next
pub type BlockState = Option<&'static [u8]>;

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Scan one line, updating the block-string state, and return the net
/// change in `{ [ (` nesting contributed by the line.
pub fn scan_line(line: &str, block: &mut BlockState) -> i32 {
    let bytes = line.as_bytes();
    let mut i = 0;
    let mut delta = 0;

    while i < bytes.len() {
        if let Some(delim) = *block {
            match find_bytes(&bytes[i..], delim) {
                Some(pos) => {
                    i += pos + delim.len();
                    *block = None;
                }
                None => break,
            }
            continue;
        }

        let rest = &bytes[i..];
        if rest.starts_with(TRIPLE_DOUBLE) {
            *block = Some(TRIPLE_DOUBLE);
            i += 3;
            continue;
        }
        if rest.starts_with(TRIPLE_SINGLE) {
            *block = Some(TRIPLE_SINGLE);
            i += 3;
            continue;
        }

        match bytes[i] {
            b'#' => break,
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    i += if bytes[i] == b'\\' { 2 } else { 1 };
                }
                i += 1;
            }
            b'{' | b'[' | b'(' => {
                delta += 1;
                i += 1;
            }
            b'}' | b']' | b')' => {
                delta -= 1;
                i += 1;
            }
            _ => i += 1,
        }
    }

    delta
}

/// Each line paired with whether it begins inside a block string
pub fn annotate(text: &str) -> Vec<(&str, bool)> {
    let mut block: BlockState = None;
    text.split('\n')
        .map(|line| {
            let inside = block.is_some();
            scan_line(line, &mut block);
            (line, inside)
        })
        .collect()
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn strip_chars(line: &str, count: usize) -> &str {
    match line.char_indices().nth(count) {
        Some((idx, _)) => &line[idx..],
        None => "",
    }
}

/// Remove the common leading whitespace of all lines that start outside a
/// block string. Block-string content is left exactly as written.
pub fn dedent(text: &str) -> String {
    let lines = annotate(text);
    let width = lines
        .iter()
        .filter(|(line, inside)| !inside && !line.trim().is_empty())
        .map(|(line, _)| indent_width(line))
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|&(line, inside)| {
            if inside {
                line
            } else if line.trim().is_empty() {
                ""
            } else {
                strip_chars(line, width)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip all leading whitespace from every line that starts outside a block string.
///
/// Lines inside a block-string body are left untouched so the string's value
/// survives the retry byte for byte.
pub fn flatten(text: &str) -> String {
    annotate(text)
        .iter()
        .map(|&(line, inside)| if inside { line } else { line.trim_start() })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whole-word occurrence of an identifier
pub fn contains_word(text: &str, word: &str) -> bool {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    text.match_indices(word).any(|(idx, _)| {
        let before = text[..idx].chars().next_back();
        let after = text[idx + word.len()..].chars().next();
        !before.is_some_and(is_word) && !after.is_some_and(is_word)
    })
}
