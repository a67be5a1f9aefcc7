//! The ranked-retrieval engine.
//!
//! Structure:
//! - `types`: the [`Sift`] struct, constructors and tuning constants
//! - `api`: document lifecycle (add, remove, lookups)
//! - `query`: plus/minus term parsing and validation
//! - `search`: ranking, top-K selection, per-document matching
//! - `scoring`: inverse document frequency and the ranking comparator
//!
//! Invariant: the inverted and forward indices are mirror images. A
//! (word, document, tf) triple exists in one iff it exists in the other,
//! and only `add_document`/`remove_document` write to either.

mod api;
mod query;
mod scoring;
mod search;
mod types;

pub use types::{Sift, MAX_RESULT_COUNT, RELEVANCE_EPSILON};

#[cfg(test)]
mod tests {
    use super::*;
    use sift_types::{DocId, DocumentStatus, ExecutionPolicy, SearchError};

    const RATINGS: &[i32] = &[1, 2, 3];

    fn add(engine: &mut Sift, id: DocId, text: &str) {
        engine
            .add_document(id, text, DocumentStatus::Active, RATINGS)
            .expect("should add doc");
    }

    /// The four-document corpus used throughout the ranking tests.
    fn ranked_corpus() -> Sift {
        let mut engine = Sift::new();
        add(&mut engine, 43, "cat in the");
        add(&mut engine, 44, "cat in");
        add(&mut engine, 42, "cat in the city");
        add(&mut engine, 45, "cat");
        engine
    }

    #[test]
    fn stop_words_excluded_from_documents() {
        let mut engine = Sift::new();
        add(&mut engine, 42, "cat in the city");
        let found = engine.find_top_documents("in").expect("valid query");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 42);

        let mut engine = Sift::with_stop_words_text("in the").expect("valid stop words");
        add(&mut engine, 42, "cat in the city");
        assert!(
            engine.find_top_documents("in").expect("valid query").is_empty(),
            "stop words must be excluded from documents"
        );
    }

    #[test]
    fn added_document_is_searchable() {
        let mut engine = Sift::new();
        add(&mut engine, 42, "cat in the city");
        let found = engine
            .find_top_documents("cat in the city")
            .expect("valid query");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn minus_words_exclude_documents() {
        let mut engine = Sift::new();
        add(&mut engine, 42, "cat in the city");
        assert!(engine
            .find_top_documents("-cat in the city")
            .expect("valid query")
            .is_empty());

        let mut engine = Sift::with_stop_words_text("in the").expect("valid stop words");
        add(&mut engine, 42, "cat in the city");
        // "-in" and "-the" strip to stop words and drop out entirely.
        assert_eq!(
            engine
                .find_top_documents("cat -in -the city")
                .expect("valid query")
                .len(),
            1
        );
    }

    #[test]
    fn same_word_as_plus_and_minus_excludes() {
        let mut engine = Sift::new();
        add(&mut engine, 42, "cat in the city");
        assert!(engine
            .find_top_documents("cat -cat")
            .expect("valid query")
            .is_empty());
    }

    #[test]
    fn match_document_reports_plus_words_sorted() {
        let mut engine = Sift::new();
        add(&mut engine, 42, "cat in the city");

        let (words, status) = engine
            .match_document(ExecutionPolicy::Sequential, "city dog cat", 42)
            .expect("valid query");
        assert_eq!(words, ["cat", "city"]);
        assert_eq!(status, DocumentStatus::Active);
    }

    #[test]
    fn match_document_minus_word_short_circuits() {
        let mut engine = Sift::new();
        add(&mut engine, 42, "cat in the city");

        let (words, _) = engine
            .match_document(ExecutionPolicy::Sequential, "-cat city", 42)
            .expect("valid query");
        assert!(words.is_empty());
    }

    #[test]
    fn match_document_rejects_negative_id() {
        let engine = Sift::new();
        assert_eq!(
            engine.match_document(ExecutionPolicy::Sequential, "cat", -1),
            Err(SearchError::InvalidDocumentId(-1))
        );
    }

    #[test]
    fn ranking_orders_by_relevance() {
        let engine = ranked_corpus();
        let found = engine
            .find_top_documents("cat in the city")
            .expect("valid query");
        let ids: Vec<DocId> = found.iter().map(|doc| doc.id).collect();
        assert_eq!(ids, [42, 43, 44, 45]);
    }

    #[test]
    fn relevance_matches_closed_form() {
        let engine = ranked_corpus();

        // "cat" occurs in all four documents, so its idf is ln(1) = 0.
        let found = engine.find_top_documents("cat").expect("valid query");
        assert_eq!(found.len(), 4);
        assert!((found[0].relevance - 0.25 * (4.0f64 / 4.0).ln()).abs() < RELEVANCE_EPSILON);
        assert!((found[1].relevance - (1.0 / 3.0) * (4.0f64 / 4.0).ln()).abs() < RELEVANCE_EPSILON);

        let found = engine.find_top_documents("city").expect("valid query");
        assert_eq!(found.len(), 1);
        assert!((found[0].relevance - 0.25 * 4.0f64.ln()).abs() < RELEVANCE_EPSILON);

        assert!(engine.find_top_documents("dog").expect("valid query").is_empty());
    }

    #[test]
    fn relevance_is_idempotent_across_queries() {
        let engine = ranked_corpus();
        let first = engine
            .find_top_documents("cat in the city")
            .expect("valid query");
        let second = engine
            .find_top_documents("cat in the city")
            .expect("valid query");
        assert_eq!(first, second);
    }

    #[test]
    fn rating_is_truncating_average() {
        let mut engine = Sift::new();
        engine
            .add_document(42, "cat in the city", DocumentStatus::Active, &[])
            .expect("should add doc");
        engine
            .add_document(43, "dog in the town", DocumentStatus::Active, RATINGS)
            .expect("should add doc");

        let found = engine.find_top_documents("cat").expect("valid query");
        assert_eq!(found[0].rating, 0, "empty ratings average to 0");

        let found = engine.find_top_documents("dog").expect("valid query");
        assert_eq!(found[0].rating, (1 + 2 + 3) / 3);
    }

    #[test]
    fn near_tie_broken_by_rating() {
        let mut engine = Sift::new();
        engine
            .add_document(1, "cat", DocumentStatus::Active, &[1])
            .expect("should add doc");
        engine
            .add_document(2, "cat", DocumentStatus::Active, &[5, 5, 5])
            .expect("should add doc");

        let found = engine.find_top_documents("cat").expect("valid query");
        assert_eq!(found[0].id, 2, "equal relevance must rank by rating");
        assert_eq!(found[1].id, 1);
    }

    #[test]
    fn full_tie_broken_by_ascending_id() {
        let mut engine = Sift::new();
        add(&mut engine, 9, "cat");
        add(&mut engine, 3, "cat");
        add(&mut engine, 6, "cat");

        let found = engine.find_top_documents("cat").expect("valid query");
        let ids: Vec<DocId> = found.iter().map(|doc| doc.id).collect();
        assert_eq!(ids, [3, 6, 9]);
    }

    #[test]
    fn result_count_capped_at_five() {
        let mut engine = Sift::new();
        for id in 0..8 {
            add(&mut engine, id, "cat nearby");
        }
        let found = engine.find_top_documents("cat").expect("valid query");
        assert_eq!(found.len(), MAX_RESULT_COUNT);
    }

    #[test]
    fn status_filter_selects_only_that_status() {
        let mut engine = Sift::new();
        engine
            .add_document(42, "cat in the city", DocumentStatus::Banned, RATINGS)
            .expect("should add doc");

        assert!(engine
            .find_top_documents("cat in the city")
            .expect("valid query")
            .is_empty());

        let found = engine
            .find_top_documents_by_status(
                ExecutionPolicy::Sequential,
                "cat in the city",
                DocumentStatus::Banned,
            )
            .expect("valid query");
        assert_eq!(found[0].id, 42);
    }

    #[test]
    fn predicate_filter_sees_id_status_and_rating() {
        let mut engine = Sift::new();
        engine
            .add_document(42, "cat in the city", DocumentStatus::Banned, RATINGS)
            .expect("should add doc");

        let found = engine
            .find_top_documents_with(
                ExecutionPolicy::Sequential,
                "cat in the city",
                |id, status, rating| id == 42 && status == DocumentStatus::Banned && rating >= 2,
            )
            .expect("valid query");
        assert_eq!(found[0].id, 42);

        let found = engine
            .find_top_documents_with(
                ExecutionPolicy::Sequential,
                "cat in the city",
                |id, status, rating| id != 42 || status != DocumentStatus::Banned || rating < 2,
            )
            .expect("valid query");
        assert!(found.is_empty());
    }

    #[test]
    fn term_frequencies_sum_to_one() {
        let mut engine = Sift::new();
        add(&mut engine, 42, "cat in the city cat");

        let freqs = engine.word_frequencies(42).expect("valid id");
        let total: f64 = freqs.values().sum();
        assert!((total - 1.0).abs() < RELEVANCE_EPSILON);
        assert!((freqs["cat"] - 0.4).abs() < RELEVANCE_EPSILON);
        assert!((freqs["city"] - 0.2).abs() < RELEVANCE_EPSILON);
    }

    #[test]
    fn word_frequencies_contract() {
        let mut engine = Sift::new();
        add(&mut engine, 42, "cat");

        assert!(
            engine.word_frequencies(7).expect("valid id").is_empty(),
            "absent id yields an empty map, not an error"
        );
        assert_eq!(
            engine.word_frequencies(-3).unwrap_err(),
            SearchError::InvalidDocumentId(-3)
        );
    }

    #[test]
    fn add_rejects_invalid_input_without_mutation() {
        let mut engine = Sift::new();
        add(&mut engine, 42, "cat");

        assert_eq!(
            engine.add_document(-1, "dog", DocumentStatus::Active, RATINGS),
            Err(SearchError::InvalidDocumentId(-1))
        );
        assert_eq!(
            engine.add_document(42, "dog", DocumentStatus::Active, RATINGS),
            Err(SearchError::DuplicateDocumentId(42))
        );
        assert!(matches!(
            engine.add_document(43, "good \u{1}bad", DocumentStatus::Active, RATINGS),
            Err(SearchError::InvalidWord(_))
        ));

        assert_eq!(engine.document_count(), 1);
        assert!(
            engine.find_top_documents("good").expect("valid query").is_empty(),
            "no partial insert on failure"
        );
    }

    #[test]
    fn malformed_queries_rejected() {
        let mut engine = Sift::new();
        add(&mut engine, 42, "cat");

        for raw in ["-", "--cat", "cat -", "cat\u{1}dog"] {
            assert!(
                matches!(
                    engine.find_top_documents(raw),
                    Err(SearchError::MalformedQueryWord(_))
                ),
                "query {raw:?} must be rejected"
            );
        }
    }

    #[test]
    fn invalid_stop_words_rejected() {
        assert!(matches!(
            Sift::with_stop_words(["in", "bad\u{1}word"]),
            Err(SearchError::InvalidStopWord(_))
        ));
    }

    #[test]
    fn document_ids_iterate_ascending() {
        let mut engine = Sift::new();
        for id in [44, 42, 45, 43] {
            add(&mut engine, id, "cat");
        }
        let ids: Vec<DocId> = engine.document_ids().collect();
        assert_eq!(ids, [42, 43, 44, 45]);
        assert_eq!(engine.document_count(), 4);
    }

    #[test]
    fn removal_purges_both_indices() {
        let mut engine = Sift::new();
        add(&mut engine, 42, "cat in the city");
        add(&mut engine, 43, "dog in the town");

        engine.remove_document(ExecutionPolicy::Sequential, 42);

        assert_eq!(engine.document_count(), 1);
        assert!(engine.word_frequencies(42).expect("valid id").is_empty());
        assert!(!engine.inverted.contains_doc_anywhere(42));
        assert!(engine.find_top_documents("cat").expect("valid query").is_empty());

        // The surviving document is untouched.
        let found = engine.find_top_documents("dog").expect("valid query");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 43);
    }

    #[test]
    fn removal_releases_words_still_unused_elsewhere() {
        let mut engine = Sift::new();
        add(&mut engine, 1, "cat city");
        add(&mut engine, 2, "cat town");

        engine.remove_document(ExecutionPolicy::Sequential, 1);

        // "city" was only referenced by document 1; "cat" survives in 2.
        assert_eq!(engine.pool.len(), 2);
        assert!(engine.inverted.contains("cat", 2));
        assert!(!engine.inverted.contains_doc_anywhere(1));
    }

    #[test]
    #[should_panic(expected = "removal of unknown document id")]
    fn removal_of_unknown_id_is_a_precondition_violation() {
        let mut engine = Sift::new();
        engine.remove_document(ExecutionPolicy::Sequential, 7);
    }

    #[test]
    fn parallel_removal_matches_sequential() {
        let mut sequential = Sift::new();
        let mut parallel = Sift::new();
        for engine in [&mut sequential, &mut parallel] {
            for id in 0..20 {
                add(engine, id, "shared words plus unique");
                add(engine, 100 + id, &format!("word{id} shared"));
            }
        }

        sequential.remove_document(ExecutionPolicy::Sequential, 5);
        parallel.remove_document(ExecutionPolicy::Parallel, 5);

        assert_eq!(sequential.document_count(), parallel.document_count());
        assert!(!parallel.inverted.contains_doc_anywhere(5));
        assert_eq!(
            sequential.find_top_documents("shared").expect("valid query"),
            parallel.find_top_documents("shared").expect("valid query")
        );
    }

    #[test]
    fn parallel_ranking_matches_sequential() {
        let mut engine = Sift::with_stop_words_text("a the").expect("valid stop words");
        for id in 0..30 {
            let status = if id % 3 == 0 {
                DocumentStatus::Banned
            } else {
                DocumentStatus::Active
            };
            engine
                .add_document(
                    id,
                    &format!("cat word{} city the common", id % 7),
                    status,
                    &[id, id + 1],
                )
                .expect("should add doc");
        }

        for raw in ["cat city", "word3 -word5 cat", "common -city"] {
            let sequential = engine
                .find_top_documents_by_status(
                    ExecutionPolicy::Sequential,
                    raw,
                    DocumentStatus::Active,
                )
                .expect("valid query");
            let parallel = engine
                .find_top_documents_by_status(
                    ExecutionPolicy::Parallel,
                    raw,
                    DocumentStatus::Active,
                )
                .expect("valid query");

            assert_eq!(sequential.len(), parallel.len(), "query {raw:?}");
            for (s, p) in sequential.iter().zip(&parallel) {
                assert_eq!(s.id, p.id, "query {raw:?}");
                assert!((s.relevance - p.relevance).abs() < RELEVANCE_EPSILON);
                assert_eq!(s.rating, p.rating);
            }
        }
    }

    #[test]
    fn parallel_matching_matches_sequential() {
        let mut engine = Sift::new();
        add(&mut engine, 42, "cat in the city");

        let sequential = engine
            .match_document(ExecutionPolicy::Sequential, "city cat cat dog", 42)
            .expect("valid query");
        let parallel = engine
            .match_document(ExecutionPolicy::Parallel, "city cat cat dog", 42)
            .expect("valid query");
        assert_eq!(sequential, parallel);

        let parallel = engine
            .match_document(ExecutionPolicy::Parallel, "-cat city", 42)
            .expect("valid query");
        assert!(parallel.0.is_empty());
    }
}
