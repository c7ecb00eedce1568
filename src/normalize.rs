//! Text cleanup applied before lexicon matching.
//!
//! The scorer looks for `" token "`, so the text must end up with single
//! spaces between words, a space on both ends and emoticons split off from
//! whatever they were glued to.

use std::sync::LazyLock;

use regex::Regex;

/// Emoticon grammar, in match priority order:
/// `:named:` emoji, `<3` hearts (also `</3`, `<\3`), reversed faces such as
/// `(:` or `D-:`, and faces such as `:)`, `;-P` or `8|`.
/// Group 1 is the emoticon; the trailing group is its required follower
/// (whitespace, `!`, `.`, `?` or end of text).
static EMOTICON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(:\w+:|<[/\\]?3|[()\\D|*$][-^]?[:;=]|[:;=B8][-^]?[3DOPp@$*\\)(/|])(?:\s|[!.?]|$)",
    )
    .expect("emoticon pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Full normalization: emoticon padding, whitespace collapse, lowercasing and
/// one space of padding on each side.
///
/// # Example
/// ```
/// use text_sentiment::normalize;
/// assert_eq!(normalize("Nice:)  Really\tNICE"), " nice :) really nice ");
/// assert_eq!(normalize(""), "  ");
/// ```
pub fn normalize(text: &str) -> String {
    let padded = pad_emoticons(text);
    let collapsed = WHITESPACE.replace_all(&padded, " ");
    format!(" {} ", collapsed.to_lowercase())
}

/// Inserts one space before and after every emoticon. Nothing is removed.
///
/// The follower character is consumed by the match but copied back
/// unchanged. None of the followers can start an emoticon, so consuming it
/// never hides the next match.
pub fn pad_emoticons(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut last = 0;
    for caps in EMOTICON.captures_iter(text) {
        let Some(emoticon) = caps.get(1) else {
            continue;
        };
        out.push_str(&text[last..emoticon.start()]);
        out.push(' ');
        out.push_str(emoticon.as_str());
        out.push(' ');
        last = emoticon.end();
    }
    out.push_str(&text[last..]);
    out
}
