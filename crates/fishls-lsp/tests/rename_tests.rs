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
fn user_functions_can_be_renamed() {
    let uri = "file:///fish/functions/greet.fish";
    let analyzer = analyzer_with(&[(uri, "function greet\n    echo hi\nend\ngreet\n")]);
    let provider = RenameProvider::new(&analyzer);
    assert!(provider.can_rename(uri, Position::new(0, 9)));
    let locations = provider.rename_locations(uri, Position::new(0, 9)).unwrap();
    assert_eq!(locations.len(), 2);
}

#[test]
fn reserved_names_are_refused() {
    let uri = "file:///fish/functions/f.fish";
    let analyzer = analyzer_with(&[(uri, "function f\n    echo $argv\nend\n")]);
    let provider = RenameProvider::new(&analyzer);
    // `argv` resolves to the implicit argument symbol but stays reserved.
    assert!(!provider.can_rename(uri, Position::new(1, 10)));
    assert!(provider.rename_locations(uri, Position::new(1, 10)).is_none());
}

#[test]
fn positions_without_a_symbol_cannot_rename() {
    let uri = "file:///tmp/x.fish";
    let analyzer = analyzer_with(&[(uri, "grep TODO src\n")]);
    let provider = RenameProvider::new(&analyzer);
    assert!(!provider.can_rename(uri, Position::new(0, 1)));
    assert!(provider.rename_locations(uri, Position::new(0, 1)).is_none());
}

#[test]
fn rename_locations_match_find_references() {
    let uri = "file:///tmp/r.fish";
    let analyzer = analyzer_with(&[(uri, "set -g color red\necho $color\n")]);
    let position = Position::new(1, 7);
    let renames = RenameProvider::new(&analyzer)
        .rename_locations(uri, position)
        .unwrap();
    let references = FindReferences::new(&analyzer)
        .find_references(uri, position)
        .unwrap();
    assert_eq!(renames, references);
}
