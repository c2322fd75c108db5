//! Feature generation for a single mention.

use crate::dict::DictionaryStore;
use crate::error::Result;
use crate::sentence::{Sentence, Span};

use super::{
    dictionary_indicator_ids, min_path_features, seq_features, starts_with_capital,
    substring_indices, surface_char_len, window_features, MAX_KEYWORD_LEN,
};

/// Generate the features for one mention span.
///
/// The returned iterator is lazy, order-stable, and not deduplicated;
/// collect into a set for set semantics. Emission order: sequence
/// features, window features, dictionary indicators, keyword features,
/// capitalization, length.
///
/// Fails with a `Bounds` error if the span does not fit the sentence.
pub fn mention_features<'a>(
    sentence: &'a Sentence,
    span: Span,
    dicts: &'a DictionaryStore,
) -> Result<impl Iterator<Item = String> + 'a> {
    span.check(sentence)?;

    let seq = seq_features(sentence, span.range());
    let windows = window_features(sentence, span.range(), true);
    let indicators: Vec<String> = dictionary_indicator_ids(sentence, span, dicts)
        .into_iter()
        .map(|id| format!("IN_DICT_[{}]", id))
        .collect();

    // Keyword substrings anywhere in the sentence that avoid the mention:
    // an indicator for the first dictionary containing the phrase, then
    // the dependency-path features from mention to keyword.
    let keywords = substring_indices(sentence.len(), MAX_KEYWORD_LEN)
        .filter(move |&(start, end)| !span.overlaps(start, end))
        .flat_map(move |(start, end)| {
            let phrase = sentence.join_range(start..end, |t| &t.lemma);
            let Some(id) = dicts.first_match(&phrase) else {
                return Vec::new();
            };
            let mut out = vec![format!("KW_IND_[{}]", id)];
            let keyword = Span::from_range(start..end);
            out.extend(min_path_features(sentence, span, keyword, "KW", dicts));
            out
        });

    let capital = starts_with_capital(sentence, span).then(|| "STARTS_WITH_CAPITAL".to_string());
    let length = format!("LENGTH_{}", surface_char_len(sentence, span));

    Ok(seq
        .into_iter()
        .chain(windows)
        .chain(indicators)
        .chain(keywords)
        .chain(capital)
        .chain(std::iter::once(length)))
}
