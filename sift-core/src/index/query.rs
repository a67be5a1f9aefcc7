//! Query parsing: plus/minus term extraction and validation.

use crate::analyzer::split_words;
use crate::index::api::is_valid_word;
use crate::index::types::Sift;
use sift_types::SearchError;
use std::collections::BTreeSet;

struct QueryWord<'a> {
    word: &'a str,
    is_minus: bool,
    is_stop: bool,
}

/// A parsed query with deduplicated, ordered term sets.
pub(crate) struct Query<'a> {
    pub plus_words: BTreeSet<&'a str>,
    pub minus_words: BTreeSet<&'a str>,
}

/// Parallel-path variant: terms in encounter order, duplicates retained.
///
/// Skipping the up-front set construction keeps the per-term work freely
/// splittable; deduplication happens after matching instead.
pub(crate) struct UnsortedQuery<'a> {
    pub plus_words: Vec<&'a str>,
    pub minus_words: Vec<&'a str>,
}

impl Sift {
    /// Classifies one token. Tokens from the splitter are never empty, so
    /// only the post-strip shape needs checking.
    fn parse_query_word<'a>(&self, token: &'a str) -> Result<QueryWord<'a>, SearchError> {
        let (word, is_minus) = match token.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (token, false),
        };
        if word.is_empty() || word.starts_with('-') || !is_valid_word(word) {
            return Err(SearchError::MalformedQueryWord(token.to_string()));
        }
        Ok(QueryWord {
            word,
            is_minus,
            is_stop: self.is_stop_word(word),
        })
    }

    pub(crate) fn parse_query<'a>(&self, text: &'a str) -> Result<Query<'a>, SearchError> {
        let mut query = Query {
            plus_words: BTreeSet::new(),
            minus_words: BTreeSet::new(),
        };
        for token in split_words(text) {
            let parsed = self.parse_query_word(token)?;
            if parsed.is_stop {
                continue;
            }
            if parsed.is_minus {
                query.minus_words.insert(parsed.word);
            } else {
                query.plus_words.insert(parsed.word);
            }
        }
        Ok(query)
    }

    pub(crate) fn parse_query_unsorted<'a>(
        &self,
        text: &'a str,
    ) -> Result<UnsortedQuery<'a>, SearchError> {
        let mut query = UnsortedQuery {
            plus_words: Vec::new(),
            minus_words: Vec::new(),
        };
        for token in split_words(text) {
            let parsed = self.parse_query_word(token)?;
            if parsed.is_stop {
                continue;
            }
            if parsed.is_minus {
                query.minus_words.push(parsed.word);
            } else {
                query.plus_words.push(parsed.word);
            }
        }
        Ok(query)
    }
}
