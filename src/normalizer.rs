//! Filename normalization for audio tracks.
//!
//! Turns a raw filename such as `"Artist - Song (Live) [Remastered].ogg"` into
//! the canonical base name `"artist - song"`. Normalization is total: every
//! input string maps to some `"<artist> - <title>"` value.
//!
//! # Examples
//!
//! ```
//! use tracknorm::normalizer::normalize;
//!
//! assert_eq!(normalize("Artist - Song (Live) [Remastered].ogg"), "artist - song");
//! assert_eq!(normalize("NA - Untitled.ogg"), "unknown - untitled");
//! assert_eq!(normalize("justtitle.ogg"), "unknown - justtitle");
//! ```
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Artist/title separator in canonical names.
pub const SEPARATOR: &str = " - ";

/// Placeholder used when the artist or the whole name is missing.
pub const UNKNOWN: &str = "unknown";

/// Artist token that stands for "not available".
const NOT_AVAILABLE: &str = "na";

/// One or more dashes, optionally surrounded by whitespace.
static DASH_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*-+\s*").unwrap());

/// Normalizes a filename into its canonical `"artist - title"` base name.
///
/// The extension is stripped, the name lowercased, bracketed text removed and
/// whitespace collapsed. Dash runs split the name into an artist (first
/// fragment) and a title (the rest). Names without a separator get
/// `"unknown"` as artist. The result is NFC-normalized.
pub fn normalize(filename: &str) -> String {
    let name = strip_extension(filename).to_lowercase();
    let name = collapse_whitespace(&strip_brackets(&name));

    let fragments: Vec<&str> = DASH_RUN
        .split(&name)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect();

    let canonical = match fragments.as_slice() {
        [] => format!("{UNKNOWN}{SEPARATOR}{UNKNOWN}"),
        [title] => format!("{UNKNOWN}{SEPARATOR}{title}"),
        [artist, title @ ..] => {
            let artist = if *artist == NOT_AVAILABLE {
                UNKNOWN
            } else {
                *artist
            };
            format!("{artist}{SEPARATOR}{}", title.join(" "))
        }
    };

    collapse_whitespace(&canonical).nfc().collect()
}

/// Returns the full target filename: the normalized base plus `extension`.
///
/// `extension` is appended verbatim and should carry its leading dot.
pub fn normalized_file_name(filename: &str, extension: &str) -> String {
    format!("{}{}", normalize(filename), extension)
}

/// Strips the last extension. Leading dots are part of the stem, so
/// `".ogg"` has no extension while `"a.b.ogg"` becomes `"a.b"`.
pub fn strip_extension(filename: &str) -> &str {
    let leading_dots = filename.len() - filename.trim_start_matches('.').len();
    match filename[leading_dots..].rfind('.') {
        Some(index) => &filename[..leading_dots + index],
        None => filename,
    }
}

/// Removes `( ... )` and `[ ... ]` groups, including nested ones.
///
/// A closer that does not match the innermost open group closes the nearest
/// enclosing group of its kind. Unmatched closers are dropped. An opener that
/// is never closed is dropped but the text after it is kept.
fn strip_brackets(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    // (expected closer, output length when the group opened)
    let mut open_groups: Vec<(char, usize)> = Vec::new();

    for ch in input.chars() {
        match ch {
            '(' => open_groups.push((')', output.len())),
            '[' => open_groups.push((']', output.len())),
            ')' | ']' => {
                if let Some(depth) = open_groups.iter().rposition(|(closer, _)| *closer == ch) {
                    let (_, start) = open_groups[depth];
                    output.truncate(start);
                    open_groups.truncate(depth);
                }
            }
            _ => output.push(ch),
        }
    }

    output
}

/// Collapses whitespace runs into single spaces and trims both ends.
fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_bracketed_text() {
        assert_eq!(
            normalize("Artist - Song (Live) [Remastered].ogg"),
            "artist - song"
        );
    }

    #[test]
    fn test_na_artist_becomes_unknown() {
        assert_eq!(normalize("NA - Untitled.ogg"), "unknown - untitled");
        // Only the exact token is replaced
        assert_eq!(normalize("Nas - Halftime.ogg"), "nas - halftime");
    }

    #[test]
    fn test_missing_separator_uses_unknown_artist() {
        assert_eq!(normalize("justtitle.ogg"), "unknown - justtitle");
        assert_eq!(normalize("Just A Title.ogg"), "unknown - just a title");
    }

    #[test]
    fn test_only_brackets_and_dashes() {
        assert_eq!(normalize("(intro) - [bonus] --.ogg"), "unknown - unknown");
        assert_eq!(normalize(".ogg"), "unknown - .ogg");
        assert_eq!(normalize(""), "unknown - unknown");
    }

    #[test]
    fn test_dash_runs_and_spacing() {
        assert_eq!(normalize("Artist--Song.ogg"), "artist - song");
        assert_eq!(normalize("  Artist   -   Song   .ogg"), "artist - song");
        assert_eq!(normalize("Artist - Album - Song.ogg"), "artist - album song");
        assert_eq!(normalize("- Artist - Song -.ogg"), "artist - song");
    }

    #[test]
    fn test_hyphenated_words_are_split() {
        assert_eq!(normalize("Jay-Z - Encore.ogg"), "jay - z encore");
    }

    #[test]
    fn test_nested_brackets_fully_removed() {
        assert_eq!(normalize("Artist - Song (Live (2001)) x.ogg"), "artist - song x");
        assert_eq!(normalize("Artist - Song [a (b] c).ogg"), "artist - song c");
    }

    #[test]
    fn test_unbalanced_brackets_leave_no_bracket_chars() {
        assert_eq!(normalize("Artist - Song (Live.ogg"), "artist - song live");
        assert_eq!(normalize("Artist - Song) x].ogg"), "artist - song x");
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("a - b.ogg"), "a - b");
        assert_eq!(strip_extension("a.b.ogg"), "a.b");
        assert_eq!(strip_extension("noext"), "noext");
        assert_eq!(strip_extension(".ogg"), ".ogg");
        assert_eq!(strip_extension("..hidden.ogg"), "..hidden");
    }

    #[test]
    fn test_nfc_composition() {
        // "e" followed by a combining acute accent composes to "é"
        let decomposed = "Artist - Caf\u{0065}\u{0301}.ogg";
        assert_eq!(normalize(decomposed), "artist - caf\u{00e9}");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "Artist - Song (Live) [Remastered].ogg",
            "NA - Untitled.ogg",
            "justtitle.ogg",
            "A -- B - C [x].ogg",
            "(only) [brackets].ogg",
            "Ünïcödé - Tïtle.ogg",
            "a.b - c.d.ogg",
        ];

        for input in inputs {
            let once = normalize(input);
            let twice = normalize(&format!("{once}.ogg"));
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_output_has_no_brackets_or_double_spaces() {
        let inputs = [
            "((a)) - b.ogg",
            "a ) ( b - [c.ogg",
            "x]]] - [[[y.ogg",
            "tab\there - new\nline.ogg",
            "a  -  (b)  c.ogg",
        ];

        for input in inputs {
            let output = normalize(input);
            assert!(
                !output.contains(['(', ')', '[', ']']),
                "brackets left in {output:?}"
            );
            assert!(!output.contains("  "), "double space in {output:?}");
            assert!(output.contains(SEPARATOR));
        }
    }

    #[test]
    fn test_normalized_file_name() {
        assert_eq!(
            normalized_file_name("NA - Untitled.OGG", ".ogg"),
            "unknown - untitled.ogg"
        );
    }
}
