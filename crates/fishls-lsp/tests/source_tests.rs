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
fn relative_source_arguments_resolve_against_the_file() {
    let analyzer = analyzer_with(&[
        ("file:///tmp/lib.fish", "function helper\nend\n"),
        ("file:///tmp/main.fish", "source ./lib.fish\nhelper\n"),
    ]);
    let resources = collect_source_resources(&analyzer, "file:///tmp/main.fish");
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].from, "file:///tmp/main.fish");
    assert_eq!(resources[0].to, "file:///tmp/lib.fish");
}

#[test]
fn bare_names_fall_back_to_a_unique_suffix_match() {
    let analyzer = analyzer_with(&[
        ("file:///fish/conf.d/colors.fish", "set -g tint blue\n"),
        ("file:///tmp/main.fish", ". colors.fish\n"),
    ]);
    let resources = collect_source_resources(&analyzer, "file:///tmp/main.fish");
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].to, "file:///fish/conf.d/colors.fish");
}

#[test]
fn dynamic_and_stdin_arguments_make_no_edge() {
    let analyzer = analyzer_with(&[
        ("file:///tmp/lib.fish", "set -g x 1\n"),
        (
            "file:///tmp/main.fish",
            "source -\nsource $config_file\nsource *.fish\n",
        ),
    ]);
    assert!(collect_source_resources(&analyzer, "file:///tmp/main.fish").is_empty());
}

#[test]
fn exports_cover_root_level_and_escaped_globals_only() {
    let analyzer = analyzer_with(&[
        (
            "file:///tmp/lib.fish",
            "function outer\n    function inner\n    end\n    set -g escaped 1\n    set -l hidden 1\nend\n",
        ),
        ("file:///tmp/main.fish", "source ./lib.fish\n"),
    ]);
    let resources = collect_source_resources(&analyzer, "file:///tmp/main.fish");
    let exported = symbols_from_resource(&analyzer, &resources[0]);
    let index = analyzer.index("file:///tmp/lib.fish").unwrap();
    let names: Vec<&str> = exported.iter().map(|&id| index.symbol(id).name.as_str()).collect();
    assert!(names.contains(&"outer"));
    assert!(names.contains(&"escaped"));
    assert!(!names.contains(&"inner"));
    assert!(!names.contains(&"hidden"));
    // Export law: everything crossing the edge is root-level or global.
    for &id in &exported {
        let symbol = index.symbol(id);
        assert!(symbol.is_root_level() || symbol.is_global());
    }
}

#[test]
fn reachability_is_transitive_and_cycle_safe() {
    let analyzer = analyzer_with(&[
        ("file:///tmp/a.fish", "source ./b.fish\n"),
        ("file:///tmp/b.fish", "source ./c.fish\nsource ./a.fish\n"),
        ("file:///tmp/c.fish", "set -l end 1\n"),
    ]);
    assert_eq!(
        reachable_sources(&analyzer, "file:///tmp/a.fish"),
        ["file:///tmp/b.fish", "file:///tmp/c.fish"]
    );
    let sourcing = sourcing_documents(&analyzer, "file:///tmp/c.fish");
    assert_eq!(sourcing, ["file:///tmp/a.fish", "file:///tmp/b.fish"]);
}

#[test]
fn references_resolve_through_a_source_edge() {
    let analyzer = analyzer_with(&[
        ("file:///tmp/lib.fish", "function helper\nend\n"),
        ("file:///tmp/main.fish", "source ./lib.fish\nhelper\n"),
    ]);
    let found = crate::resolver::Resolver::new(&analyzer)
        .resolve("file:///tmp/main.fish", fishls_common::Position::new(1, 0))
        .unwrap();
    assert_eq!(found.uri, "file:///tmp/lib.fish");
    assert_eq!(found.symbol(&analyzer).unwrap().name, "helper");
}

#[test]
fn parent_directory_segments_fold() {
    let analyzer = analyzer_with(&[
        ("file:///proj/lib/util.fish", "set -g u 1\n"),
        (
            "file:///proj/scripts/run.fish",
            "source ../lib/util.fish\n",
        ),
    ]);
    let resources = collect_source_resources(&analyzer, "file:///proj/scripts/run.fish");
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].to, "file:///proj/lib/util.fish");
}

#[test]
fn edges_record_the_scope_they_run_in() {
    let analyzer = analyzer_with(&[
        ("file:///tmp/lib.fish", "set -g x 1\n"),
        (
            "file:///tmp/main.fish",
            "source ./lib.fish\nfunction wrapper\n    source ./lib.fish\nend\n",
        ),
    ]);
    let resources = collect_source_resources(&analyzer, "file:///tmp/main.fish");
    assert_eq!(resources.len(), 2);
    assert!(resources[0].root_level);
    assert!(!resources[1].root_level);
    // The nested edge is visible inside `wrapper` and nowhere else.
    assert!(resources[1].visible_at(Position::new(2, 0)));
    assert!(!resources[1].visible_at(Position::new(4, 0)));
    // The top-level edge covers everything from its own line onward.
    assert!(resources[0].visible_at(Position::new(0, 0)));
    assert!(resources[0].visible_at(Position::new(3, 0)));
}
