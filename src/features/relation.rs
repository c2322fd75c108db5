//! Feature generation for a pair of mentions.

use crate::deppath::min_path_between_spans;
use crate::dict::DictionaryStore;
use crate::error::Result;
use crate::sentence::{Sentence, Span};

use super::{
    dictionary_indicator_ids, min_path_features, ngram_features, path_renderings, seq_features,
    starts_with_capital, substitute_dictionary_lemmas, substring_indices, surface_char_len,
    window_features, MAX_KEYWORD_LEN,
};

/// Generate the features for a pair of mention spans.
///
/// If `span2` starts strictly before `span1` the relation is inverted:
/// a standalone `IS_INVERTED` feature is emitted and every other feature
/// carries an `INV_` prefix. All range and path computations use the spans
/// in textual order, so apart from the inversion tag the output does not
/// depend on the order the caller supplied the spans in.
///
/// Emission order: inversion marker, sequence features over the
/// between-span, window combinations over the covering span, between-span
/// n-grams, dictionary indicator pairs, direct dependency-path features,
/// keyword features, capitalization, lengths.
pub fn relation_features<'a>(
    sentence: &'a Sentence,
    span1: Span,
    span2: Span,
    dicts: &'a DictionaryStore,
) -> Result<impl Iterator<Item = String> + 'a> {
    span1.check(sentence)?;
    span2.check(sentence)?;

    let inverted = span2.begin() < span1.begin();
    let prefix = if inverted { "INV_" } else { "" };
    let (first, second) = if inverted { (span2, span1) } else { (span1, span2) };

    let mut bounds = [span1.begin(), span1.end(), span2.begin(), span2.end()];
    bounds.sort_unstable();
    let [begin, betw_begin, betw_end, end] = bounds;
    let between = betw_begin..betw_end;
    let covering = begin..end;

    let marker = inverted.then(|| "IS_INVERTED".to_string());
    let seq = seq_features(sentence, between.clone())
        .into_iter()
        .map(move |f| format!("{}{}", prefix, f));
    let windows = window_features(sentence, covering, false)
        .into_iter()
        .map(move |f| format!("{}{}", prefix, f));
    let ngrams = ngram_features(sentence, between)
        .into_iter()
        .map(move |f| format!("{}{}", prefix, f));

    // Dictionary indicators of the two mentions, combined pairwise. An
    // empty side is reported as _NONE rather than dropping the pairing;
    // nothing is emitted when neither mention matched.
    let ids1 = dictionary_indicator_ids(sentence, first, dicts);
    let ids2 = dictionary_indicator_ids(sentence, second, dicts);
    let mut indicator_pairs = Vec::new();
    match (ids1.is_empty(), ids2.is_empty()) {
        (false, false) => {
            for id1 in &ids1 {
                for id2 in &ids2 {
                    indicator_pairs.push(format!("{}IN_DICT_[{}]_[{}]", prefix, id1, id2));
                }
            }
        }
        (false, true) => {
            for id1 in &ids1 {
                indicator_pairs.push(format!("{}IN_DICT_[{}]_[_NONE]", prefix, id1));
            }
        }
        (true, false) => {
            for id2 in &ids2 {
                indicator_pairs.push(format!("{}IN_DICT_[_NONE]_[{}]", prefix, id2));
            }
        }
        (true, true) => {}
    }

    let between_paths = min_path_features(sentence, first, second, &format!("{}BETW", prefix), dicts);

    // Keyword substrings overlapping neither mention: an indicator for the
    // first dictionary containing the phrase, then joint path features
    // pairing the keyword's paths to both mentions.
    let keywords = substring_indices(sentence.len(), MAX_KEYWORD_LEN)
        .filter(move |&(start, end)| {
            !first.overlaps(start, end) && !second.overlaps(start, end)
        })
        .flat_map(move |(start, end)| {
            let phrase = sentence.join_range(start..end, |t| &t.lemma);
            let Some(id) = dicts.first_match(&phrase) else {
                return Vec::new();
            };
            let mut out = vec![format!("{}KW_IND_[{}]", prefix, id)];
            let keyword = Span::from_range(start..end);
            let path1 = min_path_between_spans(sentence, first, keyword);
            let path2 = min_path_between_spans(sentence, second, keyword);
            let (Some(path1), Some(path2)) = (path1, path2) else {
                return out;
            };
            if path1.is_empty() || path2.is_empty() {
                return out;
            }
            let (labels1, mut inter1) = path_renderings(sentence, &path1);
            let (labels2, mut inter2) = path_renderings(sentence, &path2);
            out.push(format!(
                "{}KW_[{}]_[{}]",
                prefix,
                inter1.join(" "),
                inter2.join(" ")
            ));
            out.push(format!(
                "{}KW_L_[{}]_[{}]",
                prefix,
                labels1.join(" "),
                labels2.join(" ")
            ));
            substitute_dictionary_lemmas(&mut inter1, dicts);
            substitute_dictionary_lemmas(&mut inter2, dicts);
            out.push(format!(
                "{}KW_D_[{}]_[{}]",
                prefix,
                inter1.join(" "),
                inter2.join(" ")
            ));
            out
        });

    let capital = format!(
        "{}STARTS_WITH_CAPITAL_[{}_{}]",
        prefix,
        starts_with_capital(sentence, first),
        starts_with_capital(sentence, second)
    );
    let lengths = format!(
        "{}LENGTHS_[{}_{}]",
        prefix,
        surface_char_len(sentence, first),
        surface_char_len(sentence, second)
    );

    Ok(marker
        .into_iter()
        .chain(seq)
        .chain(windows)
        .chain(ngrams)
        .chain(indicator_pairs)
        .chain(between_paths)
        .chain(keywords)
        .chain(std::iter::once(capital))
        .chain(std::iter::once(lengths)))
}
