use super::*;
use fishls_common::{LspDocument, Range};

fn analyzer_with(files: &[(&str, &str)]) -> Analyzer {
    let mut analyzer = Analyzer::new();
    for (uri, text) in files {
        analyzer.analyze(LspDocument::new(*uri, *text));
    }
    analyzer
}

fn range(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> Range {
    Range::new(
        Position::new(start_line, start_char),
        Position::new(end_line, end_char),
    )
}

#[test]
fn references_include_the_definition_and_every_use() {
    let uri = "file:///fish/functions/f.fish";
    let analyzer = analyzer_with(&[(
        uri,
        "function f\n    set -l x 1\n    echo $x\n    echo $x\nend\n",
    )]);
    let locations = FindReferences::new(&analyzer)
        .find_references(uri, Position::new(2, 10))
        .unwrap();
    let ranges: Vec<Range> = locations.iter().map(|l| l.range).collect();
    assert_eq!(
        ranges,
        [range(1, 11, 1, 12), range(2, 10, 2, 11), range(3, 10, 3, 11)]
    );
}

#[test]
fn function_references_cross_source_edges() {
    let analyzer = analyzer_with(&[
        ("file:///tmp/lib.fish", "function helper\nend\n"),
        (
            "file:///tmp/main.fish",
            "source ./lib.fish\nhelper\nhelper --verbose\n",
        ),
    ]);
    let locations = FindReferences::new(&analyzer)
        .find_references("file:///tmp/lib.fish", Position::new(0, 9))
        .unwrap();
    assert_eq!(locations.len(), 3);
    assert_eq!(locations[0].uri, "file:///tmp/lib.fish");
    assert!(locations[1..].iter().all(|l| l.uri == "file:///tmp/main.fish"));
}

#[test]
fn argparse_references_cover_both_spellings() {
    let uri = "file:///fish/functions/go.fish";
    let analyzer = analyzer_with(&[(
        uri,
        "function go\n    argparse h/help -- $argv\n    echo $_flag_h $_flag_help\nend\n",
    )]);
    let locations = FindReferences::new(&analyzer)
        .find_references(uri, Position::new(2, 11))
        .unwrap();
    let ranges: Vec<Range> = locations.iter().map(|l| l.range).collect();
    // Both halves of `h/help`, then both expansions.
    assert_eq!(
        ranges,
        [
            range(1, 13, 1, 14),
            range(1, 15, 1, 19),
            range(2, 10, 2, 17),
            range(2, 19, 2, 29),
        ]
    );
}

#[test]
fn shadowed_bindings_are_not_references() {
    let uri = "file:///tmp/shadow.fish";
    let analyzer = analyzer_with(&[(
        uri,
        "set -l x 1\necho $x\nfunction f\n    set -l x 2\n    echo $x\nend\n",
    )]);
    let locations = FindReferences::new(&analyzer)
        .find_references(uri, Position::new(1, 6))
        .unwrap();
    let ranges: Vec<Range> = locations.iter().map(|l| l.range).collect();
    assert_eq!(ranges, [range(0, 7, 0, 8), range(1, 6, 1, 7)]);
}

#[test]
fn cancelled_scans_discard_partial_results() {
    let uri = "file:///tmp/c.fish";
    let analyzer = analyzer_with(&[(uri, "set -l x 1\necho $x\n")]);
    let target = Resolver::new(&analyzer)
        .resolve(uri, Position::new(1, 6))
        .unwrap();
    let token = CancellationToken::new();
    token.cancel();
    assert!(
        FindReferences::new(&analyzer)
            .references_to(&target, &token)
            .is_empty()
    );
}

#[test]
fn locations_are_ordered_and_deduplicated() {
    let uri = "file:///tmp/o.fish";
    let analyzer = analyzer_with(&[(uri, "set -g v 1\necho $v\necho $v $v\n")]);
    let locations = FindReferences::new(&analyzer)
        .find_references(uri, Position::new(0, 7))
        .unwrap();
    for pair in locations.windows(2) {
        assert!(
            (pair[0].uri.as_str(), pair[0].range.start)
                < (pair[1].uri.as_str(), pair[1].range.start)
        );
    }
    assert_eq!(locations.len(), 4);
}
