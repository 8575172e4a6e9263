use super::*;
use fishls_common::LspDocument;

fn analyzer_with(files: &[(&str, &str)]) -> Analyzer {
    let mut analyzer = Analyzer::new();
    for (uri, text) in files {
        analyzer.analyze(LspDocument::new(*uri, *text));
    }
    analyzer
}

#[test]
fn results_rank_exact_before_prefix_before_substring() {
    let analyzer = analyzer_with(&[(
        "file:///fish/config.fish",
        "function prompt\nend\nfunction prompt_helper\nend\nfunction my_prompt\nend\n",
    )]);
    let provider = WorkspaceSymbolsProvider::new(&analyzer);
    let results = provider.find_symbols("prompt", &CancellationToken::new());
    let names: Vec<&str> = results.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["prompt", "prompt_helper", "my_prompt"]);
}

#[test]
fn matching_is_case_insensitive() {
    let analyzer = analyzer_with(&[("file:///fish/config.fish", "set -g EDITOR vim\n")]);
    let provider = WorkspaceSymbolsProvider::new(&analyzer);
    assert_eq!(
        provider
            .find_symbols("editor", &CancellationToken::new())
            .len(),
        1
    );
}

#[test]
fn empty_queries_return_nothing() {
    let analyzer = analyzer_with(&[("file:///fish/config.fish", "set -g x 1\n")]);
    let provider = WorkspaceSymbolsProvider::new(&analyzer);
    assert!(
        provider
            .find_symbols("", &CancellationToken::new())
            .is_empty()
    );
}

#[test]
fn cancellation_discards_partial_results() {
    let analyzer = analyzer_with(&[("file:///fish/config.fish", "set -g x 1\n")]);
    let provider = WorkspaceSymbolsProvider::new(&analyzer);
    let token = CancellationToken::new();
    token.cancel();
    assert!(provider.find_symbols("x", &token).is_empty());
}

#[test]
fn result_count_is_capped() {
    let mut source = String::new();
    for i in 0..150 {
        source.push_str(&format!("set -g option_{i} {i}\n"));
    }
    let analyzer = analyzer_with(&[("file:///fish/config.fish", source.as_str())]);
    let provider = WorkspaceSymbolsProvider::new(&analyzer);
    let results = provider.find_symbols("option_", &CancellationToken::new());
    assert_eq!(results.len(), 100);
}

#[test]
fn find_collects_definitions_across_documents() {
    let analyzer = analyzer_with(&[
        ("file:///a.fish", "set -g shared 1\n"),
        ("file:///b.fish", "set -g shared 2\n"),
    ]);
    let provider = WorkspaceSymbolsProvider::new(&analyzer);
    let found = provider.find("shared");
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].uri, "file:///a.fish");
    assert_eq!(found[1].uri, "file:///b.fish");
}

#[test]
fn find_definition_at_delegates_to_the_resolver() {
    let uri = "file:///fish/functions/f.fish";
    let analyzer = analyzer_with(&[(uri, "function f\n    set -l x 1\n    echo $x\nend\n")]);
    let provider = WorkspaceSymbolsProvider::new(&analyzer);
    let found = provider
        .find_definition_at(uri, fishls_common::Position::new(2, 10))
        .unwrap();
    assert_eq!(found.symbol(&analyzer).unwrap().name, "x");
}

#[test]
fn search_results_serialize_in_lsp_shape() {
    let analyzer = analyzer_with(&[("file:///fish/config.fish", "function f\nend\n")]);
    let provider = WorkspaceSymbolsProvider::new(&analyzer);
    let results = provider.find_symbols("f", &CancellationToken::new());
    let value = serde_json::to_value(&results[0]).unwrap();
    assert_eq!(value["kind"], "function");
    assert!(value["location"]["range"]["start"]["line"].is_number());
}
