// ABOUTME: Fixed tables, CSS matchers and patterns that identify Word export artifacts.
// ABOUTME: Pure predicates over class tokens and text; never mutates the document.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::RangeInclusive;

use crate::dom::Matcher;

/// Generator style classes that carry no meaning once exported.
pub const UNWANTED_CLASSES: &[&str] = &[
    "MsoNormal",
    "MsoBodyText",
    "NormalBold",
    "MsoTitle",
    "MsoHeader",
    "Templatehelp",
    "TOCEntry",
    "Indent1",
    "MsoCaption",
    "MsoListParagraph",
    "MsoNormalTable",
    "MsoTableGrid",
    "MsoTableClassic1",
    "MsoListParagraphCxSpFirst",
    "MsoListParagraphCxSpMiddle",
    "MsoListParagraphCxSpLast",
    "MsoCommentText",
    "msocomtxt",
    "msocomoff",
    "MsoEndnoteText",
    "MsoFootnoteText",
];

/// Section wrapper classes.
pub const SECTION_CLASSES: &[&str] = &[
    "WordSection1",
    "WordSection2",
    "WordSection3",
    "WordSection4",
    "WordSection5",
    "WordSection6",
    "WordSection7",
    "WordSection8",
];

/// TOC entry classes are this prefix followed by the level digit.
pub const TOC_CLASS_PREFIX: &str = "MsoToc";

/// Class of the entry that starts the table of contents.
pub const TOC_FIRST_CLASS: &str = "MsoToc1";

/// Levels whose link text gets page numbers stripped before the rebuild.
pub const TOC_PAGE_NUMBER_LEVELS: RangeInclusive<u8> = 1..=4;

pub const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Tags a trailing `<br>` is redundant after.
pub const BLOCK_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "p", "div", "table"];

/// A non-breaking space, and what a UTF-8 one becomes after a lossy round trip.
pub const NBSP_ARTIFACTS: &[char] = &['\u{a0}', '\u{c2a0}'];

fn class_selector<I, S>(classes: I) -> String
where
    I: IntoIterator<Item = S>,
    S: std::fmt::Display,
{
    classes
        .into_iter()
        .map(|class| format!(".{}", class))
        .collect::<Vec<_>>()
        .join(", ")
}

fn compile(css: &str) -> Matcher {
    Matcher::new(css).unwrap()
}

/// Elements carrying any generator class.
pub static UNWANTED_CLASS_MATCHER: Lazy<Matcher> =
    Lazy::new(|| compile(&class_selector(UNWANTED_CLASSES)));

pub static SECTION_MATCHER: Lazy<Matcher> = Lazy::new(|| compile(&class_selector(SECTION_CLASSES)));

/// Every TOC entry, levels 1 to 9.
pub static TOC_ENTRY_MATCHER: Lazy<Matcher> = Lazy::new(|| {
    compile(&class_selector(
        (1..=9).map(|level| format!("{}{}", TOC_CLASS_PREFIX, level)),
    ))
});

pub static TOC_FIRST_MATCHER: Lazy<Matcher> = Lazy::new(|| compile(&format!(".{}", TOC_FIRST_CLASS)));

/// Links inside the TOC levels that carry page numbers.
pub static TOC_LINK_MATCHER: Lazy<Matcher> = Lazy::new(|| {
    let css = TOC_PAGE_NUMBER_LEVELS
        .map(|level| format!(".{}{} a", TOC_CLASS_PREFIX, level))
        .collect::<Vec<_>>()
        .join(", ");
    compile(&css)
});

pub static HEADING_MATCHER: Lazy<Matcher> = Lazy::new(|| compile(&HEADING_TAGS.join(", ")));

/// `<br>` directly after a block element.
pub static BLOCK_BREAK_MATCHER: Lazy<Matcher> = Lazy::new(|| {
    let css = BLOCK_TAGS
        .iter()
        .map(|tag| format!("{} + br", tag))
        .collect::<Vec<_>>()
        .join(", ");
    compile(&css)
});

// Heading outline numbers such as "1.", "2.3 " or "4.1.2" plus trailing nbsp runs,
// raw or as the serializer writes them
static NUMBERING_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\s*\d+\.?)+(?:[\x{A0}\x{C2A0}]|&nbsp;)*").unwrap());

static TOC_OUTLINE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\d+\.)+").unwrap());

static TOC_TRAILING_PAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\d+$").unwrap());

static TOC_LEADING_PAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+").unwrap());

/// True for the `name` of `<meta name="Generator">`.
pub fn is_generator_name(name: &str) -> bool {
    name.eq_ignore_ascii_case("generator")
}

/// Level encoded by a single class token, e.g. `MsoToc3` -> 3.
///
/// Only the character right after the prefix is read. Tokens too short to
/// hold it, or with a non-digit there (`MsoTocHeading`), have no level.
pub fn toc_level_of_token(token: &str) -> Option<u8> {
    let rest = token.strip_prefix(TOC_CLASS_PREFIX)?;
    let digit = rest.chars().next()?.to_digit(10)?;
    u8::try_from(digit).ok().filter(|&level| level > 0)
}

/// TOC level of a `class` attribute: the first token that encodes one.
pub fn toc_level(class: &str) -> Option<u8> {
    class.split_whitespace().find_map(toc_level_of_token)
}

/// Removes a leading outline number from heading content and trims it.
pub fn strip_numbering_prefix(html: &str) -> String {
    NUMBERING_PREFIX_RE.replace(html, "").trim().to_string()
}

/// Cleans TOC link text: drops the outline number and the trailing page number.
pub fn strip_toc_link_text(text: &str) -> String {
    let without_outline = TOC_OUTLINE_NUMBER_RE.replace(text, "");
    TOC_TRAILING_PAGE_RE
        .replace(&without_outline, "")
        .trim()
        .to_string()
}

/// Drops a leading page number left over in TOC link content.
pub fn strip_leading_page_number(html: &str) -> String {
    TOC_LEADING_PAGE_RE.replace(html, "").trim().to_string()
}

/// Heading id derived from a Word bookmark name: the first `_Toc` becomes `Toc`.
pub fn toc_anchor_id(name: &str) -> String {
    name.replacen("_Toc", "Toc", 1)
}

/// Rewrites a `#_Toc...` link target to match ids from [`toc_anchor_id`].
pub fn rewrite_toc_href(href: &str) -> Option<String> {
    href.strip_prefix("#_Toc")
        .map(|rest| format!("#Toc{}", rest))
}

/// Link targets that reach the bookmark `name`: `#name`, plus the
/// [`rewrite_toc_href`] form for `_Toc` bookmarks.
pub fn bookmark_hrefs(name: &str) -> Vec<String> {
    let direct = format!("#{}", name);
    let rewritten = rewrite_toc_href(&direct);
    std::iter::once(direct).chain(rewritten).collect()
}

/// Text with every non-breaking-space artifact removed.
pub fn strip_nbsp_artifacts(text: &str) -> String {
    text.chars().filter(|c| !NBSP_ARTIFACTS.contains(c)).collect()
}
