//! Search engine behavior across presets and concurrent re-indexing.

mod common;

use std::thread;

use pretty_assertions::assert_eq;

use common::fixtures::searchable_term;
use devindex_core::search::highlight_html;
use devindex_core::{SearchEngine, SearchPrecision, Term};

fn corpus() -> Vec<Term> {
    vec![
        searchable_term("1", "Docker", None, "どっかー", "コンテナ仮想化ツール", &["container", "devops"]),
        searchable_term("2", "Kubernetes", None, "くばねてぃす", "コンテナオーケストレーション", &["container", "k8s"]),
        searchable_term("3", "React", None, "りあくと", "UIライブラリ", &["frontend"]),
        searchable_term("4", "React Native", None, "りあくとねいてぃぶ", "モバイルアプリ開発フレームワーク", &["mobile"]),
        searchable_term("5", "依存性注入", Some("Dependency Injection"), "いぞんせいちゅうにゅう", "DI", &["design"]),
    ]
}

fn ids(terms: &[Term]) -> Vec<&str> {
    terms.iter().map(|t| t.id.as_str()).collect()
}

#[test]
fn short_queries_return_corpus_in_order() {
    let engine = SearchEngine::new();
    engine.initialize_with_precision(corpus(), SearchPrecision::Balanced);

    for query in ["", "R", "  d  "] {
        assert_eq!(ids(&engine.search(query)), vec!["1", "2", "3", "4", "5"]);
    }
}

#[test]
fn exact_name_ranks_first_under_every_preset() {
    let engine = SearchEngine::new();
    engine.initialize_with_precision(corpus(), SearchPrecision::Strict);

    for precision in SearchPrecision::ALL {
        engine.set_precision(precision);
        assert_eq!(engine.precision(), Some(precision));
        for (query, expected) in [("Docker", "1"), ("kubernetes", "2"), ("React", "3")] {
            let results = engine.search(query);
            assert_eq!(results.first().map(|t| t.id.as_str()), Some(expected), "{query} {precision:?}");
        }
    }
}

#[test]
fn matches_secondary_fields() {
    let engine = SearchEngine::new();
    engine.initialize_with_precision(corpus(), SearchPrecision::Balanced);

    let by_reading = engine.search("りあくと");
    assert_eq!(&ids(&by_reading)[..2], &["3", "4"]);

    let by_english = engine.search("dependency");
    assert_eq!(by_english.first().map(|t| t.id.as_str()), Some("5"));

    let tagged = engine.search("container");
    let by_tag = ids(&tagged);
    assert!(by_tag.contains(&"1"));
    assert!(by_tag.contains(&"2"));
}

#[test]
fn highlight_offsets_render_as_marks() {
    let engine = SearchEngine::new();
    engine.initialize_with_precision(corpus(), SearchPrecision::Balanced);

    let results = engine.search_with_highlight("native");
    let top = &results[0];
    assert_eq!(top.term.id, "4");
    let name = top.matches.iter().find(|m| m.key == "term").unwrap();
    assert_eq!(highlight_html(&name.value, &name.indices), "React <mark>Native</mark>");
}

#[test]
fn searches_during_reindex_see_a_complete_index() {
    let engine = SearchEngine::new();
    engine.initialize_with_precision(corpus(), SearchPrecision::Balanced);

    thread::scope(|scope| {
        scope.spawn(|| {
            for i in 0..50 {
                engine.set_precision(SearchPrecision::ALL[i % 3]);
            }
        });
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..50 {
                    let results = engine.search("Docker");
                    assert_eq!(results.first().map(|t| t.id.as_str()), Some("1"));
                    assert_eq!(engine.terms().len(), 5);
                }
            });
        }
    });
}
