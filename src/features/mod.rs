//! Feature generation for mentions and relations.
//!
//! This module holds the building blocks shared by the two generators:
//! substring enumeration, sequence/window/ngram features, dictionary
//! indicators, and the renderings of dependency paths. Feature strings are
//! a stable wire format parsed and hashed by the downstream learner
//! (`WORD_SEQ_[a b c]`, `LENGTH_5`, `KW_IND_[people]`, ...); payload
//! layout must not change.

mod mention;
mod relation;

pub use mention::mention_features;
pub use relation::relation_features;

use std::collections::HashSet;
use std::ops::Range;

use crate::deppath::{min_path_between_spans, DependencyEdge};
use crate::dict::DictionaryStore;
use crate::sentence::{Sentence, Span};

/// Maximum token length of keyword substrings matched against dictionaries.
pub const MAX_KEYWORD_LEN: usize = 3;
/// Maximum window width on each side of a span.
pub const MAX_WINDOW: usize = 3;
/// Maximum token length of span sub-ranges tested for dictionary membership.
pub const MAX_DICT_PHRASE_LEN: usize = 3;
/// Maximum n-gram width between relation mentions.
pub const MAX_NGRAM: usize = 3;

/// Placeholder substituted for window lemmas that parse as numeric literals.
const NUMBER_PLACEHOLDER: &str = "_NUMBER";

/// Every (start, end) pair with `start < end <= min(len, start + max_len)`,
/// longer substrings first for a fixed start.
pub(crate) fn substring_indices(
    len: usize,
    max_len: usize,
) -> impl Iterator<Item = (usize, usize)> {
    (0..len).flat_map(move |start| {
        (start + 1..=len.min(start + max_len))
            .rev()
            .map(move |end| (start, end))
    })
}

fn window_lemma(lemma: &str) -> String {
    if lemma.parse::<f64>().is_ok() {
        NUMBER_PLACEHOLDER.to_string()
    } else {
        lemma.to_string()
    }
}

/// The four sequence features over a (possibly empty) token range.
pub(crate) fn seq_features(sentence: &Sentence, range: Range<usize>) -> Vec<String> {
    vec![
        format!("WORD_SEQ_[{}]", sentence.join_range(range.clone(), |t| &t.word)),
        format!("LEMMA_SEQ_[{}]", sentence.join_range(range.clone(), |t| &t.lemma)),
        format!("NER_SEQ_[{}]", sentence.join_range(range.clone(), |t| &t.ner)),
        format!("POS_SEQ_[{}]", sentence.join_range(range, |t| &t.pos)),
    ]
}

/// Window features around a non-empty token range: isolated per-side
/// features (when `isolated`) followed by all left/right width
/// combinations. Widths run 1..=3 on each side, clipped at the sentence
/// bounds; a side with no neighbors contributes nothing.
pub(crate) fn window_features(
    sentence: &Sentence,
    range: Range<usize>,
    isolated: bool,
) -> Vec<String> {
    let left_start = range.start.saturating_sub(MAX_WINDOW);
    let right_end = sentence.len().min(range.end + MAX_WINDOW);

    let left = &sentence.tokens()[left_start..range.start];
    let right = &sentence.tokens()[range.end..right_end];
    let left_lemmas: Vec<String> = left.iter().map(|t| window_lemma(&t.lemma)).collect();
    let left_ners: Vec<&str> = left.iter().map(|t| t.ner.as_str()).collect();
    let right_lemmas: Vec<String> = right.iter().map(|t| window_lemma(&t.lemma)).collect();
    let right_ners: Vec<&str> = right.iter().map(|t| t.ner.as_str()).collect();

    let mut out = Vec::new();
    if isolated {
        for i in 0..left.len() {
            out.push(format!(
                "LEFT_{}_[{}]",
                i + 1,
                left_lemmas[left.len() - i - 1..].join(" ")
            ));
            out.push(format!(
                "LEFT_NER_{}_[{}]",
                i + 1,
                left_ners[left.len() - i - 1..].join(" ")
            ));
        }
        for i in 0..right.len() {
            out.push(format!("RIGHT_{}_[{}]", i + 1, right_lemmas[..i + 1].join(" ")));
            out.push(format!("RIGHT_NER_{}_[{}]", i + 1, right_ners[..i + 1].join(" ")));
        }
    }
    for i in 0..left.len() {
        let curr_left_lemmas = left_lemmas[left.len() - i - 1..].join(" ");
        let curr_left_ners = left_ners[left.len() - i - 1..].join(" ");
        for j in 0..right.len() {
            out.push(format!(
                "LEMMA_L_{}_R_{}_[{}]_[{}]",
                i + 1,
                j + 1,
                curr_left_lemmas,
                right_lemmas[..j + 1].join(" ")
            ));
            out.push(format!(
                "NER_L_{}_R_{}_[{}]_[{}]",
                i + 1,
                j + 1,
                curr_left_ners,
                right_ners[..j + 1].join(" ")
            ));
        }
    }
    out
}

/// Lemma n-grams of width 1..=3 inside a (possibly empty) token range.
pub(crate) fn ngram_features(sentence: &Sentence, range: Range<usize>) -> Vec<String> {
    let mut out = Vec::new();
    for i in range.clone() {
        for width in 1..=MAX_NGRAM {
            if i + width <= range.end {
                out.push(format!(
                    "NGRAM_{}_[{}]",
                    width,
                    sentence.join_range(i..i + width, |t| &t.lemma)
                ));
            }
        }
    }
    out
}

/// Ids of every dictionary matched by some lemma sub-range of the span
/// (width up to 3), deduplicated, in store enumeration order.
pub(crate) fn dictionary_indicator_ids<'a>(
    sentence: &Sentence,
    span: Span,
    dicts: &'a DictionaryStore,
) -> Vec<&'a str> {
    let mut matched: HashSet<&str> = HashSet::new();
    for width in 1..=MAX_DICT_PHRASE_LEN.min(span.length()) {
        for start in span.begin()..=span.end() - width {
            let phrase = sentence.join_range(start..start + width, |t| &t.lemma);
            for id in dicts.matching_ids(&phrase) {
                matched.insert(id);
            }
        }
    }
    dicts.ids().filter(|id| matched.contains(id)).collect()
}

/// Label-only and interleaved label/lemma renderings of a path. Lemmas are
/// those of each step's target token; the interleaved form drops its final
/// element, so it ends on the last label rather than the far endpoint's
/// own lemma.
pub(crate) fn path_renderings(
    sentence: &Sentence,
    path: &[DependencyEdge],
) -> (Vec<String>, Vec<String>) {
    let mut labels = Vec::with_capacity(path.len());
    let mut interleaved = Vec::with_capacity(path.len() * 2);
    for edge in path {
        labels.push(edge.label.clone());
        interleaved.push(edge.label.clone());
        interleaved.push(sentence.token(edge.target).lemma.clone());
    }
    interleaved.pop();
    (labels, interleaved)
}

/// Replace each lemma of an interleaved rendering by `DICT_<id>` of the
/// first dictionary containing it. Labels sit at even positions and are
/// left alone.
pub(crate) fn substitute_dictionary_lemmas(interleaved: &mut [String], dicts: &DictionaryStore) {
    let mut idx = 1;
    while idx < interleaved.len() {
        if let Some(id) = dicts.first_match(&interleaved[idx]) {
            interleaved[idx] = format!("DICT_{}", id);
        }
        idx += 2;
    }
}

/// The three dependency-path features between two spans: interleaved,
/// label-only, and dictionary-substituted. Empty when no token pair is
/// connected (or the spans share a token, leaving an empty path).
pub(crate) fn min_path_features(
    sentence: &Sentence,
    a: Span,
    b: Span,
    prefix: &str,
    dicts: &DictionaryStore,
) -> Vec<String> {
    let Some(path) = min_path_between_spans(sentence, a, b) else {
        return Vec::new();
    };
    if path.is_empty() {
        return Vec::new();
    }
    let (labels, mut interleaved) = path_renderings(sentence, &path);
    let raw = format!("{}_[{}]", prefix, interleaved.join(" "));
    let label_only = format!("{}_L_[{}]", prefix, labels.join(" "));
    substitute_dictionary_lemmas(&mut interleaved, dicts);
    let substituted = format!("{}_D_[{}]", prefix, interleaved.join(" "));
    vec![raw, label_only, substituted]
}

pub(crate) fn starts_with_capital(sentence: &Sentence, span: Span) -> bool {
    sentence
        .token(span.begin())
        .word
        .chars()
        .next()
        .is_some_and(char::is_uppercase)
}

/// Character length of the space-joined surface text of a span.
pub(crate) fn surface_char_len(sentence: &Sentence, span: Span) -> usize {
    sentence.span_words(span).chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::testutil::sentence_from_words;

    fn dicts_from(entries: &[(&str, &[&str])]) -> DictionaryStore {
        let mut store = DictionaryStore::new();
        for (id, phrases) in entries {
            store
                .load_reader_with(phrases.join("\n").as_bytes(), Some(id), |l| l.to_string())
                .unwrap();
        }
        store
    }

    #[test]
    fn test_substring_indices_longer_first() {
        let indices: Vec<(usize, usize)> = substring_indices(3, 2).collect();
        assert_eq!(indices, vec![(0, 2), (0, 1), (1, 3), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_substring_indices_clipped_at_len() {
        let indices: Vec<(usize, usize)> = substring_indices(2, 5).collect();
        assert_eq!(indices, vec![(0, 2), (0, 1), (1, 2)]);
    }

    #[test]
    fn test_seq_features_payloads() {
        let sentence = sentence_from_words(&["John", "loves", "Mary"]);
        let feats = seq_features(&sentence, 0..2);
        assert_eq!(
            feats,
            vec![
                "WORD_SEQ_[John loves]",
                "LEMMA_SEQ_[john loves]",
                "NER_SEQ_[O O]",
                "POS_SEQ_[NN NN]",
            ]
        );
    }

    #[test]
    fn test_seq_features_empty_range() {
        let sentence = sentence_from_words(&["a"]);
        let feats = seq_features(&sentence, 0..0);
        assert_eq!(feats[0], "WORD_SEQ_[]");
    }

    #[test]
    fn test_window_features_isolated_and_combined() {
        let sentence = sentence_from_words(&["a", "b", "X", "c", "d"]);
        let feats = window_features(&sentence, 2..3, true);
        // Two left neighbors, two right neighbors: 4 isolated per side kind,
        // then 2x2 combinations of lemma+ner.
        assert!(feats.contains(&"LEFT_1_[b]".to_string()));
        assert!(feats.contains(&"LEFT_2_[a b]".to_string()));
        assert!(feats.contains(&"RIGHT_1_[c]".to_string()));
        assert!(feats.contains(&"RIGHT_2_[c d]".to_string()));
        assert!(feats.contains(&"LEFT_NER_2_[O O]".to_string()));
        assert!(feats.contains(&"LEMMA_L_1_R_2_[b]_[c d]".to_string()));
        assert!(feats.contains(&"NER_L_2_R_1_[O O]_[O]".to_string()));
        assert_eq!(feats.len(), 8 + 8);
    }

    #[test]
    fn test_window_features_clipped_at_sentence_start() {
        let sentence = sentence_from_words(&["X", "a", "b"]);
        let feats = window_features(&sentence, 0..1, true);
        // No left side at all: no LEFT features and no combinations.
        assert!(feats.iter().all(|f| !f.starts_with("LEFT")));
        assert!(feats.iter().all(|f| !f.contains("_L_")));
        assert!(feats.contains(&"RIGHT_2_[a b]".to_string()));
    }

    #[test]
    fn test_window_features_numeric_lemma_replaced() {
        let sentence = sentence_from_words(&["X", "42"]);
        let feats = window_features(&sentence, 0..1, true);
        assert!(feats.contains(&"RIGHT_1_[_NUMBER]".to_string()));
        // NER windows are untouched by the substitution
        assert!(feats.contains(&"RIGHT_NER_1_[O]".to_string()));
    }

    #[test]
    fn test_window_features_combinations_only() {
        let sentence = sentence_from_words(&["a", "X", "b"]);
        let feats = window_features(&sentence, 1..2, false);
        assert_eq!(
            feats,
            vec!["LEMMA_L_1_R_1_[a]_[b]", "NER_L_1_R_1_[O]_[O]"]
        );
    }

    #[test]
    fn test_ngram_features_widths() {
        let sentence = sentence_from_words(&["a", "b", "c"]);
        let feats = ngram_features(&sentence, 0..3);
        assert_eq!(
            feats,
            vec![
                "NGRAM_1_[a]",
                "NGRAM_2_[a b]",
                "NGRAM_3_[a b c]",
                "NGRAM_1_[b]",
                "NGRAM_2_[b c]",
                "NGRAM_1_[c]",
            ]
        );
    }

    #[test]
    fn test_dictionary_indicator_ids_store_order_dedup() {
        let sentence = sentence_from_words(&["New", "York", "City"]);
        let dicts = dicts_from(&[
            ("cities", &["new york", "new york city"]),
            ("words", &["city", "york"]),
            ("unrelated", &["boston"]),
        ]);
        let span = Span::new(0, 3).unwrap();
        let ids = dictionary_indicator_ids(&sentence, span, &dicts);
        assert_eq!(ids, vec!["cities", "words"]);
    }

    #[test]
    fn test_dictionary_indicator_ids_respects_span() {
        let sentence = sentence_from_words(&["john", "smith", "runs"]);
        let dicts = dicts_from(&[("verbs", &["run", "runs"])]);
        let span = Span::new(0, 2).unwrap();
        assert!(dictionary_indicator_ids(&sentence, span, &dicts).is_empty());
    }

    #[test]
    fn test_path_renderings_drop_endpoint_lemma() {
        let n = 3;
        let words: Vec<String> = ["John", "loves", "Mary"].iter().map(|s| s.to_string()).collect();
        let lemmas: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let sentence = Sentence::from_arrays(
            &vec![0; n],
            &vec![0; n],
            &words,
            &lemmas,
            &vec!["NN".to_string(); n],
            &vec!["O".to_string(); n],
            &[
                "nsubj(loves-2, John-1)".to_string(),
                "root(ROOT-0, loves-2)".to_string(),
                "dobj(loves-2, Mary-3)".to_string(),
            ],
        )
        .unwrap();
        let path = crate::deppath::path_between_tokens(&sentence, 0, 2).unwrap();
        let (labels, interleaved) = path_renderings(&sentence, &path);
        assert_eq!(labels, vec!["nsubj", "dobj"]);
        // Targets along the walk are "loves" then "Mary"; the final lemma
        // (the endpoint itself) is dropped.
        assert_eq!(interleaved, vec!["nsubj", "loves", "dobj"]);
    }

    #[test]
    fn test_substitute_dictionary_lemmas_first_match() {
        let dicts = dicts_from(&[("a", &["loves"]), ("b", &["loves", "hates"])]);
        let mut interleaved = vec![
            "nsubj".to_string(),
            "loves".to_string(),
            "dobj".to_string(),
        ];
        substitute_dictionary_lemmas(&mut interleaved, &dicts);
        assert_eq!(interleaved, vec!["nsubj", "DICT_a", "dobj"]);
    }

    #[test]
    fn test_starts_with_capital() {
        let sentence = sentence_from_words(&["John", "runs"]);
        assert!(starts_with_capital(&sentence, Span::new(0, 1).unwrap()));
        assert!(!starts_with_capital(&sentence, Span::new(1, 1).unwrap()));
    }

    #[test]
    fn test_surface_char_len_counts_joined_text() {
        let sentence = sentence_from_words(&["John", "loves", "Mary"]);
        let span = Span::new(0, 3).unwrap();
        assert_eq!(surface_char_len(&sentence, span), "John loves Mary".len());
    }
}
