use std::collections::BTreeSet;

use tempfile::Builder;

use quill::{DocId, Index};

fn documents() -> Vec<(DocId, &'static str)> {
    vec![
        (1, "The quick brown fox jumps over the lazy dog"),
        (2, "A quick brown dog outpaces a quick fox"),
        (3, "Lazy afternoons with a brown dog"),
        (4, "Foxes and dogs are not the same animal"),
        (5, "quick quick quick"),
    ]
}

/// Reference answer: documents whose analyzed terms contain every query term.
fn brute_force(docs: &[(DocId, &str)], query: &[&str]) -> Vec<DocId> {
    docs.iter()
        .filter(|(_, text)| {
            let terms: BTreeSet<String> = text
                .split(|c: char| !c.is_alphanumeric())
                .filter(|t| !t.is_empty())
                .map(str::to_lowercase)
                .collect();
            query.iter().all(|q| terms.contains(*q))
        })
        .map(|(id, _)| *id)
        .collect()
}

#[test]
fn test_concrete_scenario() {
    let index = Index::in_memory();
    index.add(1, "first document");
    index.add(2, "second document");
    index.add(3, "third document");

    assert_eq!(index.search("document").unwrap(), vec![1, 2, 3]);
    assert_eq!(index.search("first").unwrap(), vec![1]);
    assert_eq!(index.search("document first").unwrap(), vec![1]);
    assert_eq!(index.search("nonexistent").unwrap(), Vec::<DocId>::new());
}

#[test]
fn test_and_matches_set_intersection() {
    let docs = documents();
    let index = Index::in_memory();
    for (id, text) in &docs {
        index.add(*id, text);
    }

    let queries: &[&[&str]] = &[
        &["quick"],
        &["quick", "brown"],
        &["brown", "dog"],
        &["lazy", "dog", "brown"],
        &["fox", "dog"],
        &["quick", "missing"],
        &["foxes", "dogs", "animal"],
    ];

    for query in queries {
        let expected = brute_force(&docs, query);
        let found = index.search(&query.join(" ")).unwrap();
        assert_eq!(found, expected, "query {query:?}");
    }
}

#[test]
fn test_and_holds_across_saved_and_unsaved_documents() {
    let dir = Builder::new().prefix("test_and").tempdir().unwrap();
    let path = dir.path().join("index.seg");
    let docs = documents();

    let index = Index::open(&path).unwrap();
    for (id, text) in &docs[..3] {
        index.add(*id, text);
    }
    index.save().unwrap();
    for (id, text) in &docs[3..] {
        index.add(*id, text);
    }

    for query in [&["quick", "brown"][..], &["dog"], &["quick", "fox"]] {
        let expected = brute_force(&docs, query);
        assert_eq!(index.search(&query.join(" ")).unwrap(), expected, "query {query:?}");
    }
}

#[test]
fn test_results_are_sorted_and_unique() {
    let index = Index::in_memory();
    for id in [42, 7, 99, 7, 1, 42] {
        index.add(id, "repeat repeat");
    }

    assert_eq!(index.search("repeat").unwrap(), vec![1, 7, 42, 99]);
    assert_eq!(index.search("repeat repeat").unwrap(), vec![1, 7, 42, 99]);
}

#[test]
fn test_stop_words_and_punctuation() {
    let index = Index::in_memory();
    index.add(1, "To be, or not to be: that is the question.");

    assert_eq!(index.search("question").unwrap(), vec![1]);
    assert_eq!(index.search("QUESTION?").unwrap(), vec![1]);
    // Only stop words: no query terms, so no matches
    assert!(index.search("to be or not").unwrap().is_empty());
    assert!(index.search("").unwrap().is_empty());
}

#[test]
fn test_unicode_terms() {
    let index = Index::in_memory();
    index.add(1, "Crème Brûlée");
    index.add(2, "Straße und Brücke");

    assert_eq!(index.search("crème").unwrap(), vec![1]);
    assert_eq!(index.search("BRÛLÉE crème").unwrap(), vec![1]);
    assert_eq!(index.search("brücke").unwrap(), vec![2]);
}
