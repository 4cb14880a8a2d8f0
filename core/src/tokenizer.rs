use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Words shorter than this (in characters) are never indexed.
pub const MIN_WORD_LEN: usize = 3;

lazy_static! {
    // Liberal URL matcher (daringfireball "improved regex for matching URLs").
    static ref URL_RE: Regex = Regex::new(
        r#"\b((?:[a-z][\w-]+:(?:/{1,3}|[a-z0-9%])|www\d{0,3}[.]|[a-z0-9.\-]+[.][a-z]{2,4}/)(?:[^\s()<>]+|\(([^\s()<>]+|(\([^\s()<>]+\)))*\))+(?:\(([^\s()<>]+|(\([^\s()<>]+\)))*\)|[^\s`!()\[\]{};:'".,<>?«»“”‘’]))"#
    ).expect("valid url regex");
    // Letters, digits and underscore only. Combining marks and joiners split words.
    static ref NON_WORD_RE: Regex = Regex::new(r"[^\p{L}\p{N}_]").expect("valid regex");
    // Low value words in register description text. Common enough to bloat
    // the index, never meaningful enough to search for.
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "the","and","you","that","was","for","are","with",
            "his","they","one","have","this","from","had","not",
            "word","but","what","some","can","out","other","were",
            "all","there","when","use","your","how","she","which",
            "their","will","way","about","many","then","them","would",
            "like","these","her","make","him","has","could","come",
            "did","than","who","may","been","now","its",
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// True if `word` passes the length and stop-word filters.
pub fn is_indexable(word: &str) -> bool {
    word.chars().count() >= MIN_WORD_LEN && !is_stopword(word)
}

/// Lowercase, blank out anything that looks like a URL, then replace every
/// character that is not a letter, digit or underscore with a space.
///
/// Total and idempotent: the output only contains those characters and spaces.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_urls = URL_RE.replace_all(&lowered, " ");
    NON_WORD_RE.replace_all(&without_urls, " ").into_owned()
}

/// Split already-normalized text into words, followed by the underscore
/// segments of any compound word. Filtered words are dropped.
pub fn words(normalized: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for word in normalized.split_whitespace() {
        if is_indexable(word) {
            out.push(word);
        }
        if word.contains('_') {
            out.extend(word.split('_').filter(|w| is_indexable(w)));
        }
    }
    out
}

/// Normalize and split `text` into the words that would be indexed for it.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = normalize_text(text);
    words(&normalized).into_iter().map(str::to_owned).collect()
}
