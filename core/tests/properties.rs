use proptest::prelude::*;
use regdoc_core::bucket::bucketize;
use regdoc_core::shard::plan_shards;
use regdoc_core::tokenizer::{is_stopword, normalize_text};
use regdoc_core::InvertedIndex;

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_ .:/()%\\-ÄÖÜéßΣ]{0,80}"
}

fn index_of(texts: &[String]) -> InvertedIndex {
    let mut idx = InvertedIndex::new();
    for (page, t) in texts.iter().enumerate() {
        idx.add_text(t, page as u32, (page % 8) as u32);
    }
    idx
}

proptest! {
    #[test]
    fn normalize_is_idempotent(t in text()) {
        let once = normalize_text(&t);
        prop_assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn short_and_stop_words_never_indexed(texts in prop::collection::vec(text(), 0..8)) {
        let idx = index_of(&texts);
        for word in idx.words() {
            prop_assert!(word.chars().count() >= 3);
            prop_assert!(!is_stopword(word));
        }
    }

    #[test]
    fn occurrences_have_set_semantics(word in "[a-z]{3,12}", page in 0u32..100, loc in 0u32..64) {
        prop_assume!(!is_stopword(&word));
        let mut idx = InvertedIndex::new();
        idx.add_word(&word, page, loc);
        let before = idx.get(&word).map(|s| s.len());
        idx.add_word(&word, page, loc);
        prop_assert!(idx.get(&word).unwrap().iter().any(|o| o.page_id == page && o.location == loc));
        prop_assert_eq!(idx.get(&word).map(|s| s.len()), before);
    }

    #[test]
    fn bucketing_is_a_lossless_partition(texts in prop::collection::vec(text(), 0..8)) {
        let idx = index_of(&texts);
        let mut expected: Vec<String> = idx.words().map(str::to_owned).collect();
        expected.sort();

        let buckets = bucketize(idx);
        let mut words: Vec<String> = Vec::new();
        for b in &buckets {
            for e in &b.entries {
                prop_assert!(e.word.starts_with(&b.prefix));
                words.push(e.word.clone());
            }
        }
        // already sorted: buckets follow the global word order
        prop_assert_eq!(&words, &expected);
        words.sort();
        prop_assert_eq!(words, expected);
    }

    #[test]
    fn shards_cover_every_word_once(texts in prop::collection::vec(text(), 0..8), threshold in 1usize..20) {
        let idx = index_of(&texts);
        let total = idx.len();
        let plan = plan_shards(bucketize(idx), threshold);

        let mut seen: Vec<String> = plan
            .shards
            .iter()
            .flat_map(|s| s.buckets.iter().flat_map(|b| b.entries.iter().map(|e| e.word.clone())))
            .collect();
        prop_assert_eq!(seen.len(), total);
        seen.sort();
        seen.dedup();
        prop_assert_eq!(seen.len(), total);

        let manifest = plan.manifest();
        prop_assert_eq!(manifest.len(), plan.shards.len());
        prop_assert!(manifest.windows(2).all(|w| w[0] <= w[1]));
    }
}
