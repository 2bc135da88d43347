//! Structural checks and best-effort repair for path-data strings.
//!
//! Paths produced by the native tracer are well formed by construction; these
//! routines guard strings coming from alternate backends or callers.

use std::fmt;

use crate::layer::ColorLayer;

/// Path command letters accepted by the validator.
const COMMAND_LETTERS: &str = "MLHVCSQTAZ";

/// Number of leading characters quoted in a diagnostic.
const PREVIEW_CHARS: usize = 30;

/// Origin move inserted when a path has no move command at all.
const DEFAULT_MOVE: &str = "M 0 0 ";

/// What is wrong with a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathIssue {
    MissingMove,
    NotClosed,
    UnknownCommand(String),
    ConsecutiveMoves,
}

/// A single validation finding, tagged with the start of the offending path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathDiagnostic {
    pub issue: PathIssue,
    pub preview: String,
}

impl fmt::Display for PathDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.issue {
            PathIssue::MissingMove => write!(
                f,
                "path does not start with a move command: {}...",
                self.preview
            ),
            PathIssue::NotClosed => write!(f, "path is not closed: {}...", self.preview),
            PathIssue::UnknownCommand(cmd) => write!(
                f,
                "path contains unknown command \"{cmd}\": {}...",
                self.preview
            ),
            PathIssue::ConsecutiveMoves => write!(
                f,
                "path contains consecutive move commands: {}...",
                self.preview
            ),
        }
    }
}

fn is_move(c: char) -> bool {
    c == 'M' || c == 'm'
}

fn is_close(c: char) -> bool {
    c == 'Z' || c == 'z'
}

fn is_command_letter(word: &str) -> bool {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => COMMAND_LETTERS.contains(c.to_ascii_uppercase()),
        _ => false,
    }
}

/// Maximal runs of ASCII letters, skipping exponent markers inside numbers.
fn letter_words(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut words = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_alphabetic() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
            i += 1;
        }
        let word = &path[start..i];
        let after_number = start > 0 && (bytes[start - 1].is_ascii_digit() || bytes[start - 1] == b'.');
        let before_number = i < bytes.len()
            && (bytes[i].is_ascii_digit() || bytes[i] == b'-' || bytes[i] == b'+');
        if word.eq_ignore_ascii_case("e") && after_number && before_number {
            continue;
        }
        words.push(word);
    }
    words
}

fn preview(path: &str) -> String {
    path.chars().take(PREVIEW_CHARS).collect()
}

/// Check every path and return all findings; an empty list means every path is valid.
pub fn validate_paths<S: AsRef<str>>(paths: &[S]) -> Vec<PathDiagnostic> {
    let mut diagnostics = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let mut report = |issue: PathIssue| {
            diagnostics.push(PathDiagnostic {
                issue,
                preview: preview(path),
            });
        };

        if !path.trim_start().starts_with(is_move) {
            report(PathIssue::MissingMove);
        }
        if !path.contains(is_close) {
            report(PathIssue::NotClosed);
        }

        let words = letter_words(path);
        for word in &words {
            if !is_command_letter(word) {
                report(PathIssue::UnknownCommand((*word).to_string()));
            }
        }

        let mut previous_was_move = false;
        for word in words.iter().filter(|w| is_command_letter(w)) {
            let current_is_move = word.starts_with(is_move);
            if current_is_move && previous_was_move {
                report(PathIssue::ConsecutiveMoves);
                break;
            }
            previous_was_move = current_is_move;
        }
    }

    diagnostics
}

fn is_numeric_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == '-')
}

/// Whether the letter at `i` is an exponent marker inside a number such as `1e-3`.
fn is_exponent_marker(chars: &[char], i: usize) -> bool {
    let after_number = i > 0 && (chars[i - 1].is_ascii_digit() || chars[i - 1] == '.');
    let before_number = chars
        .get(i + 1)
        .is_some_and(|&c| c.is_ascii_digit() || c == '-' || c == '+');
    (chars[i] == 'e' || chars[i] == 'E') && after_number && before_number
}

/// Insert a space between a command letter and a directly following number.
fn split_letters_from_numbers(path: &str) -> String {
    let chars: Vec<char> = path.chars().collect();
    let mut out = String::with_capacity(path.len() + 8);
    for (i, &c) in chars.iter().enumerate() {
        let starts_number = c.is_ascii_digit() || c == '.' || c == '-';
        if starts_number && i > 0 {
            let previous = chars[i - 1];
            if previous.is_ascii_alphabetic() && !is_exponent_marker(&chars, i - 1) {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out
}

/// Collapse every run of four identical numeric tokens to two.
fn collapse_repeats(tokens: Vec<&str>) -> Vec<&str> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        let mut run = 1;
        while i + run < tokens.len() && tokens[i + run] == token {
            run += 1;
        }
        let kept = if is_numeric_token(token) {
            (run / 4) * 2 + run % 4
        } else {
            run
        };
        out.extend(std::iter::repeat_n(token, kept));
        i += run;
    }
    out
}

/// Best-effort repair of a single path string.
///
/// Leading junk before the first move command is cut (or an origin move is
/// prepended when none exists), a close command is appended when missing,
/// `NaN` becomes `0`, letters are split from numbers, runs of four identical
/// numbers shrink to two and whitespace is normalized. The result is not
/// guaranteed to validate cleanly.
pub fn repair_path(path: &str) -> String {
    let trimmed = path.trim_start();
    let mut fixed = if trimmed.starts_with(is_move) {
        trimmed.to_string()
    } else {
        match trimmed.find(is_move) {
            Some(idx) => trimmed[idx..].to_string(),
            None => format!("{DEFAULT_MOVE}{trimmed}"),
        }
    };

    if !fixed.contains(is_close) {
        fixed.push_str(" Z");
    }

    let fixed = split_letters_from_numbers(&fixed.replace("NaN", "0"));
    collapse_repeats(fixed.split_whitespace().collect()).join(" ")
}

/// Repair every path of every layer.
pub fn repair_every_path(layers: &mut [ColorLayer]) {
    for path in layers.iter_mut().flat_map(|layer| layer.paths.iter_mut()) {
        *path = repair_path(path);
    }
}

/// Validate all paths of a run and, when anything is reported, repair every
/// path of every layer.
///
/// Returns the diagnostics found before repair.
pub fn repair_if_invalid(layers: &mut [ColorLayer]) -> Vec<PathDiagnostic> {
    let diagnostics: Vec<PathDiagnostic> = layers
        .iter()
        .flat_map(|layer| validate_paths(&layer.paths))
        .collect();
    if !diagnostics.is_empty() {
        repair_every_path(layers);
    }
    diagnostics
}
