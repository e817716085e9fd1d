//! Syntax highlighting for editor rows.
//!
//! Highlighting is a single left-to-right pass over a row's rendered text.
//! The only state carried between rows is whether the row ends inside an
//! unterminated block comment; [`EditorBuffer`](crate::editor::EditorBuffer)
//! feeds that flag forward and re-runs rows until it stabilizes.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Trailing marker on a keyword that puts it in the secondary class.
pub const SECONDARY_KEYWORD_MARKER: char = '|';

const SEPARATORS: &str = ",.()+-/*=~%<>[]{}:;";
const QUOTES: [char; 3] = ['"', '\'', '`'];
const BOOLEANS: [&str; 2] = ["true", "false"];

/// Highlight class of a single rendered character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Highlight {
    #[default]
    Normal,
    Comment,
    MlComment,
    Keyword1,
    Keyword2,
    String,
    Number,
    Boolean,
    Match,
}

impl Highlight {
    /// Every tag, in palette order.
    pub const ALL: [Self; 9] = [
        Self::Normal,
        Self::Comment,
        Self::MlComment,
        Self::Keyword1,
        Self::Keyword2,
        Self::String,
        Self::Number,
        Self::Boolean,
        Self::Match,
    ];

    /// Key used for this tag in the `color_palette` config section.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Comment => "comment",
            Self::MlComment => "ml_comment",
            Self::Keyword1 => "keyword1",
            Self::Keyword2 => "keyword2",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Match => "match",
        }
    }
}

/// Per-filetype toggles for the optional token classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxFlags {
    pub highlight_numbers: bool,
    pub highlight_strings: bool,
    pub highlight_booleans: bool,
}

/// A filetype definition as read from `syntax.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Syntax {
    /// Display name shown in the status bar.
    pub filetype: String,
    /// Extensions (leading `.`) or filename substrings.
    pub filematch: Vec<String>,
    /// Keywords; a trailing `|` marks the secondary class.
    pub keywords: Vec<String>,
    /// Single-line comment start.
    pub scs: String,
    /// Block comment start.
    pub mcs: String,
    /// Block comment end.
    pub mce: String,
    pub flags: SyntaxFlags,
}

impl Syntax {
    /// Keywords with the class marker stripped, in authored order.
    ///
    /// Empty keywords are skipped; they would match at every separator.
    pub fn keyword_tokens(&self) -> impl Iterator<Item = (&str, Highlight)> {
        self.keywords.iter().filter_map(|kw| {
            let (token, class) = match kw.strip_suffix(SECONDARY_KEYWORD_MARKER) {
                Some(token) => (token, Highlight::Keyword2),
                None => (kw.as_str(), Highlight::Keyword1),
            };
            (!token.is_empty()).then_some((token, class))
        })
    }

    /// Whether `filename` is claimed by one of this definition's patterns.
    pub fn matches_filename(&self, filename: &str) -> bool {
        let ext = extension_of(filename);
        self.filematch.iter().any(|pattern| {
            if pattern.starts_with('.') {
                ext == Some(pattern.as_str())
            } else {
                !pattern.is_empty() && filename.contains(pattern.as_str())
            }
        })
    }

    fn has_block_comments(&self) -> bool {
        !self.mcs.is_empty() && !self.mce.is_empty()
    }
}

/// Pick the first definition (in list order) claiming `filename`.
pub fn select_syntax(filename: &str, syntaxes: &[Arc<Syntax>]) -> Option<Arc<Syntax>> {
    if filename.is_empty() {
        return None;
    }
    syntaxes
        .iter()
        .find(|syntax| syntax.matches_filename(filename))
        .cloned()
}

/// Extension of the last path component, including the leading dot.
fn extension_of(filename: &str) -> Option<&str> {
    let name = Path::new(filename).file_name()?.to_str()?;
    name.rfind('.').map(|idx| &name[idx..])
}

/// Whitespace or one of the tokenizer punctuation characters.
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || SEPARATORS.contains(c)
}

/// Result of highlighting one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineHighlight {
    /// One tag per rendered character.
    pub tags: Vec<Highlight>,
    /// The row ends inside an unterminated block comment.
    pub open_comment: bool,
}

/// Tag every character of `render`.
///
/// `starts_in_comment` is the predecessor row's carried block-comment state.
/// Without a syntax every character is [`Highlight::Normal`] and nothing is
/// carried.
pub fn highlight_line(
    render: &str,
    syntax: Option<&Syntax>,
    starts_in_comment: bool,
) -> LineHighlight {
    let chars: Vec<char> = render.chars().collect();
    let mut tags = vec![Highlight::Normal; chars.len()];
    let Some(syntax) = syntax else {
        return LineHighlight {
            tags,
            open_comment: false,
        };
    };

    let mut prev_sep = true;
    let mut quote: Option<char> = None;
    let mut in_comment = starts_in_comment;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let prev_hl = if i > 0 { tags[i - 1] } else { Highlight::Normal };

        if !syntax.scs.is_empty()
            && quote.is_none()
            && !in_comment
            && match_at(&chars, i, &syntax.scs).is_some()
        {
            tags[i..].fill(Highlight::Comment);
            break;
        }

        if syntax.has_block_comments() && quote.is_none() {
            if in_comment {
                if let Some(end) = match_at(&chars, i, &syntax.mce) {
                    tags[i..end].fill(Highlight::MlComment);
                    i = end;
                    in_comment = false;
                    prev_sep = true;
                } else {
                    tags[i] = Highlight::MlComment;
                    i += 1;
                }
                continue;
            }
            if let Some(end) = match_at(&chars, i, &syntax.mcs) {
                tags[i..end].fill(Highlight::MlComment);
                i = end;
                in_comment = true;
                continue;
            }
        }

        if syntax.flags.highlight_strings {
            if let Some(open) = quote {
                tags[i] = Highlight::String;
                if c == '\\' && i + 1 < chars.len() {
                    tags[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == open {
                    quote = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            }
            if QUOTES.contains(&c) {
                quote = Some(c);
                tags[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if syntax.flags.highlight_numbers
            && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (c == '.' && prev_hl == Highlight::Number))
        {
            tags[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        if syntax.flags.highlight_booleans
            && prev_sep
            && let Some(end) = BOOLEANS
                .iter()
                .find_map(|word| match_token_ignore_case(&chars, i, word))
        {
            tags[i..end].fill(Highlight::Boolean);
            i = end;
            prev_sep = false;
            continue;
        }

        if prev_sep
            && let Some((end, class)) = syntax
                .keyword_tokens()
                .find_map(|(kw, class)| match_token(&chars, i, kw).map(|end| (end, class)))
        {
            tags[i..end].fill(class);
            i = end;
            prev_sep = false;
            continue;
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    LineHighlight {
        tags,
        open_comment: in_comment,
    }
}

/// End index if `needle` occurs verbatim at `at`.
fn match_at(chars: &[char], at: usize, needle: &str) -> Option<usize> {
    let mut end = at;
    for expected in needle.chars() {
        if chars.get(end) != Some(&expected) {
            return None;
        }
        end += 1;
    }
    Some(end)
}

/// Like [`match_at`], but also requires a separator (or row end) after the match.
fn match_token(chars: &[char], at: usize, token: &str) -> Option<usize> {
    match_at(chars, at, token).filter(|&end| followed_by_separator(chars, end))
}

fn match_token_ignore_case(chars: &[char], at: usize, token: &str) -> Option<usize> {
    let mut end = at;
    for expected in token.chars() {
        match chars.get(end) {
            Some(c) if c.to_ascii_lowercase() == expected => end += 1,
            _ => return None,
        }
    }
    followed_by_separator(chars, end).then_some(end)
}

fn followed_by_separator(chars: &[char], end: usize) -> bool {
    chars.get(end).is_none_or(|&c| is_separator(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use super::Highlight::{
        Boolean, Comment, Keyword1, Keyword2, MlComment, Normal, Number, String as Str,
    };

    fn c_syntax() -> Syntax {
        Syntax {
            filetype: "c".to_string(),
            filematch: vec![".c".to_string(), ".h".to_string(), "Makefile".to_string()],
            keywords: vec![
                "if".to_string(),
                "return".to_string(),
                "int|".to_string(),
                "char|".to_string(),
            ],
            scs: "//".to_string(),
            mcs: "/*".to_string(),
            mce: "*/".to_string(),
            flags: SyntaxFlags {
                highlight_numbers: true,
                highlight_strings: true,
                highlight_booleans: true,
            },
        }
    }

    fn tags(render: &str) -> Vec<Highlight> {
        highlight_line(render, Some(&c_syntax()), false).tags
    }

    #[test]
    fn test_no_syntax_is_all_normal() {
        let line = highlight_line("int x = 1; /*", None, true);
        assert_eq!(line.tags, vec![Normal; 13]);
        assert!(!line.open_comment);
    }

    #[test]
    fn test_tag_count_matches_char_count_for_wide_text() {
        let render = "int 日本 = \"é\";";
        assert_eq!(tags(render).len(), render.chars().count());
    }

    #[test]
    fn test_keyword_requires_separators_on_both_sides() {
        assert_eq!(tags("intx"), vec![Normal; 4]);
        assert_eq!(tags("xint"), vec![Normal; 4]);
        assert_eq!(tags("(int)")[1..4], [Keyword2; 3]);
        assert_eq!(tags("int"), vec![Keyword2; 3]);
    }

    #[test]
    fn test_primary_and_secondary_keywords() {
        let t = tags("if return int");
        assert_eq!(t[0..2], [Keyword1; 2]);
        assert_eq!(t[3..9], [Keyword1; 6]);
        assert_eq!(t[10..13], [Keyword2; 3]);
    }

    #[test]
    fn test_single_line_comment_tags_rest_of_row() {
        let t = tags("x = 1; // int");
        assert_eq!(t[7..], [Comment; 6]);
        assert_eq!(t[4], Number);
    }

    #[test]
    fn test_comment_marker_inside_string_is_string() {
        let t = tags("\"//\" x");
        assert_eq!(t[0..4], [Str; 4]);
        assert_eq!(t[5], Normal);
    }

    #[test]
    fn test_string_escape_does_not_close() {
        let t = tags(r#""a\"b" c"#);
        assert_eq!(t[0..6], [Str; 6]);
        assert_eq!(t[7], Normal);
    }

    #[test]
    fn test_string_closes_only_on_same_quote() {
        let t = tags("'a\"b' x");
        assert_eq!(t[0..5], [Str; 5]);
        assert_eq!(t[6], Normal);
    }

    #[test]
    fn test_unterminated_string_runs_to_row_end() {
        let t = tags("`abc");
        assert_eq!(t, vec![Str; 4]);
    }

    #[test]
    fn test_numbers_and_decimals() {
        let t = tags("x = 3.14;");
        assert_eq!(t[4..8], [Number; 4]);
        assert_eq!(t[8], Normal);
    }

    #[test]
    fn test_digit_after_identifier_is_not_number() {
        assert_eq!(tags("x1"), vec![Normal; 2]);
    }

    #[test]
    fn test_booleans_case_insensitive_with_boundaries() {
        let t = tags("TRUE false");
        assert_eq!(t[0..4], [Boolean; 4]);
        assert_eq!(t[5..10], [Boolean; 5]);
        assert_eq!(tags("trueish"), vec![Normal; 7]);
        assert_eq!(tags("untrue"), vec![Normal; 6]);
    }

    #[test]
    fn test_block_comment_within_row() {
        let line = highlight_line("a /* b */ c", Some(&c_syntax()), false);
        assert_eq!(line.tags[2..9], [MlComment; 7]);
        assert_eq!(line.tags[10], Normal);
        assert!(!line.open_comment);
    }

    #[test]
    fn test_unterminated_block_comment_is_carried() {
        let line = highlight_line("x /* open", Some(&c_syntax()), false);
        assert!(line.open_comment);
        assert_eq!(line.tags[2..], [MlComment; 7]);
    }

    #[test]
    fn test_carried_comment_closes_and_resumes_tokens() {
        let line = highlight_line("still */ int", Some(&c_syntax()), true);
        assert_eq!(line.tags[0..8], [MlComment; 8]);
        assert_eq!(line.tags[9..12], [Keyword2; 3]);
        assert!(!line.open_comment);
    }

    #[test]
    fn test_line_comment_ignored_inside_block_comment() {
        let line = highlight_line("// not a line comment", Some(&c_syntax()), true);
        assert!(line.tags.iter().all(|&t| t == MlComment));
        assert!(line.open_comment);
    }

    #[test]
    fn test_empty_keyword_is_ignored() {
        let mut syntax = c_syntax();
        syntax.keywords.push(String::new());
        syntax.keywords.push("|".to_string());
        let line = highlight_line("a b", Some(&syntax), false);
        assert_eq!(line.tags, vec![Normal; 3]);
    }

    #[test]
    fn test_first_listed_keyword_wins() {
        let mut syntax = c_syntax();
        syntax.keywords = vec!["for".to_string(), "for|".to_string()];
        let line = highlight_line("for", Some(&syntax), false);
        assert_eq!(line.tags, vec![Keyword1; 3]);
    }

    #[test]
    fn test_separator_set() {
        for c in ",.()+-/*=~%<>[]{}:; \t".chars() {
            assert!(is_separator(c), "{c:?} should separate");
        }
        for c in "a_1\"'`!".chars() {
            assert!(!is_separator(c), "{c:?} should not separate");
        }
    }

    #[test]
    fn test_select_syntax_by_extension_and_substring() {
        let c = Arc::new(c_syntax());
        let rust = Arc::new(Syntax {
            filetype: "rust".to_string(),
            filematch: vec![".rs".to_string()],
            ..Syntax::default()
        });
        let list = vec![rust.clone(), c.clone()];
        assert_eq!(select_syntax("src/main.rs", &list), Some(rust));
        assert_eq!(select_syntax("hello.c", &list), Some(c.clone()));
        assert_eq!(select_syntax("Makefile", &list), Some(c));
        assert_eq!(select_syntax("notes.txt", &list), None);
        assert_eq!(select_syntax("", &list), None);
    }

    #[test]
    fn test_extension_must_match_exactly() {
        let c = c_syntax();
        assert!(!c.matches_filename("file.cpp"));
        assert!(c.matches_filename("dir.x/file.h"));
    }

    #[test]
    fn test_syntax_deserializes_from_config_record() {
        let json = r#"{
            "filetype": "go",
            "filematch": [".go"],
            "keywords": ["func", "int|"],
            "scs": "//",
            "mcs": "/*",
            "mce": "*/",
            "flags": {"highlight_numbers": true, "highlight_strings": true}
        }"#;
        let syntax: Syntax = serde_json::from_str(json).unwrap();
        assert_eq!(syntax.filetype, "go");
        assert!(syntax.flags.highlight_numbers);
        assert!(!syntax.flags.highlight_booleans);
        let kws: Vec<_> = syntax.keyword_tokens().collect();
        assert_eq!(kws, vec![("func", Keyword1), ("int", Keyword2)]);
    }

    proptest! {
        #[test]
        fn prop_tags_cover_every_char(render in "[ a-z0-9/*\"'`.()\\\\]{0,40}", open in any::<bool>()) {
            let line = highlight_line(&render, Some(&c_syntax()), open);
            prop_assert_eq!(line.tags.len(), render.chars().count());
        }

        #[test]
        fn prop_highlight_is_idempotent(render in "[ a-z0-9/*\"'.]{0,40}", open in any::<bool>()) {
            let first = highlight_line(&render, Some(&c_syntax()), open);
            let second = highlight_line(&render, Some(&c_syntax()), open);
            prop_assert_eq!(first, second);
        }
    }
}
