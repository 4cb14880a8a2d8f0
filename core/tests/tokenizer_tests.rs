use regdoc_core::tokenizer::{normalize_text, tokenize};

#[test]
fn it_normalizes_and_splits_identifiers() {
    let words = tokenize("Writes to CTRL_REG.Enable clear the IRQ_STATUS (see www.example.com/spec)");
    assert!(words.contains(&"ctrl_reg".to_string()));
    assert!(words.contains(&"ctrl".to_string()));
    assert!(words.contains(&"enable".to_string()));
    assert!(words.contains(&"irq_status".to_string()));
    assert!(words.contains(&"status".to_string()));
    assert!(!words.iter().any(|w| w.contains("example")));
}

#[test]
fn it_filters_stopwords() {
    let words = tokenize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert!(words.contains(&"quick".to_string()));
}

#[test]
fn empty_and_punctuation_only_text_has_no_words() {
    assert!(tokenize("").is_empty());
    assert!(tokenize("... -- !!").is_empty());
    assert_eq!(normalize_text("a-b"), "a b");
}
