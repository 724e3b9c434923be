use std::collections::BTreeSet;
use std::fs;

use tempfile::Builder;

use quill::analysis::analyzer::{Analyzer, StandardAnalyzer};
use quill::{Index, IndexConfig};

#[test]
fn test_reopen_recovers_all_terms() {
    let dir = Builder::new().prefix("test_reopen").tempdir().unwrap();
    let path = dir.path().join("index.seg");
    let texts = [
        (1, "first document about rust"),
        (2, "second document about storage"),
        (3, "third document about rust storage engines"),
    ];

    let index = Index::open(&path).unwrap();
    index.add(texts[0].0, texts[0].1);
    index.add(texts[1].0, texts[1].1);
    index.save().unwrap();
    index.add(texts[2].0, texts[2].1);
    index.save().unwrap();

    let analyzer = StandardAnalyzer::new().unwrap();
    let distinct: BTreeSet<String> = texts
        .iter()
        .flat_map(|(_, text)| analyzer.terms(text))
        .collect();

    let reopened = Index::open(&path).unwrap();
    assert_eq!(reopened.disk_term_count(), distinct.len());
    assert_eq!(index.disk_term_count(), distinct.len());

    for term in &distinct {
        assert_eq!(
            reopened.search(term).unwrap(),
            index.search(term).unwrap(),
            "term {term}"
        );
    }
    for query in ["document about", "rust storage", "third engines", "missing"] {
        assert_eq!(reopened.search(query).unwrap(), index.search(query).unwrap());
    }
}

#[test]
fn test_union_after_save() {
    let dir = Builder::new().prefix("test_union").tempdir().unwrap();
    let path = dir.path().join("index.seg");

    let index = Index::open(&path).unwrap();
    index.add(10, "apple");
    index.add(2, "apple pie");
    index.save().unwrap();

    index.add(5, "apple");
    index.add(10, "apple");
    assert_eq!(index.search("apple").unwrap(), vec![2, 5, 10]);

    index.save().unwrap();
    let reopened = Index::open(&path).unwrap();
    assert_eq!(reopened.search("apple").unwrap(), vec![2, 5, 10]);
    assert_eq!(reopened.search("apple pie").unwrap(), vec![2]);
}

#[test]
fn test_second_save_is_noop() {
    let dir = Builder::new().prefix("test_noop").tempdir().unwrap();
    let path = dir.path().join("index.seg");

    let index = Index::open(&path).unwrap();
    index.add(1, "content");
    index.save().unwrap();
    let first = fs::read(&path).unwrap();

    // Remove the file: a real rewrite would recreate it
    fs::remove_file(&path).unwrap();
    index.save().unwrap();
    assert!(!path.exists());

    fs::write(&path, &first).unwrap();
    assert_eq!(index.search("content").unwrap(), vec![1]);
}

#[test]
fn test_saved_bytes_are_deterministic() {
    let dir = Builder::new().prefix("test_bytes").tempdir().unwrap();
    let a = dir.path().join("a.seg");
    let b = dir.path().join("b.seg");

    let first = Index::open(&a).unwrap();
    first.add(1, "zeta alpha");
    first.add(2, "mid alpha");
    first.save().unwrap();

    let second = Index::open(&b).unwrap();
    second.add(2, "mid alpha");
    second.add(1, "alpha zeta");
    second.save().unwrap();

    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
}

#[test]
fn test_no_temp_file_after_save() {
    let dir = Builder::new().prefix("test_temp").tempdir().unwrap();
    let path = dir.path().join("index.seg");

    let index = Index::open(&path).unwrap();
    index.add(1, "one");
    index.save().unwrap();
    index.add(2, "two");
    index.save().unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["index.seg".to_string()]);
}

#[test]
fn test_missing_directory_is_created() {
    let dir = Builder::new().prefix("test_nested").tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("index.seg");

    let index = Index::open(&path).unwrap();
    assert!(!dir.path().join("nested").exists());

    index.add(1, "nested");
    index.save().unwrap();

    assert!(path.exists());
    assert_eq!(Index::open(&path).unwrap().search("nested").unwrap(), vec![1]);
}

#[test]
fn test_open_with_config() {
    let dir = Builder::new().prefix("test_config").tempdir().unwrap();
    let path = dir.path().join("index.seg");

    let mut config = IndexConfig::default();
    config.storage.sync_writes = true;
    config.storage.buffer_size = 128;

    let index = Index::open_with_config(&path, config.clone()).unwrap();
    for id in 0..200 {
        index.add(id, &format!("common term{id}"));
    }
    index.save().unwrap();

    let reopened = Index::open_with_config(&path, config).unwrap();
    assert_eq!(reopened.search("common").unwrap().len(), 200);
    assert_eq!(reopened.search("common term150").unwrap(), vec![150]);
    assert_eq!(reopened.disk_term_count(), 201);
}
