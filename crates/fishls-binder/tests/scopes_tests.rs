use fishls_binder::{DocumentSymbolIndex, FishKind, ScopeTag};
use fishls_common::LspDocument;
use fishls_parser::parse;

fn index(uri: &str, source: &str) -> DocumentSymbolIndex {
    let document = LspDocument::new(uri, source);
    let tree = parse(source);
    DocumentSymbolIndex::build(&document, &tree)
}

fn tag_of(index: &DocumentSymbolIndex, name: &str) -> ScopeTag {
    index
        .symbols()
        .find(|s| s.name == name)
        .map(|s| s.scope.tag)
        .unwrap()
}

#[test]
fn unflagged_set_in_function_pins_to_the_function() {
    let index = index(
        "file:///fish/functions/f.fish",
        "function f\n    set count 1\nend\n",
    );
    assert_eq!(tag_of(&index, "count"), ScopeTag::Function);
    let count = index.symbols().find(|s| s.name == "count").unwrap();
    let func = index.symbols().find(|s| s.name == "f").unwrap();
    assert_eq!(count.scope.range, func.range);
}

#[test]
fn unflagged_set_at_config_top_level_is_global() {
    let index = index("file:///fish/conf.d/env.fish", "set fish_greeting ''\n");
    assert_eq!(tag_of(&index, "fish_greeting"), ScopeTag::Global);
}

#[test]
fn unflagged_set_in_a_script_inherits() {
    let index = index("file:///tmp/run.fish", "set staging_dir /tmp/stage\n");
    assert_eq!(tag_of(&index, "staging_dir"), ScopeTag::Inherit);
    let sym = index.symbols().find(|s| s.name == "staging_dir").unwrap();
    assert!(sym.is_local());
}

#[test]
fn explicit_global_escapes_the_function() {
    let index = index(
        "file:///fish/functions/f.fish",
        "function f\n    set -g shared 1\nend\n",
    );
    assert_eq!(tag_of(&index, "shared"), ScopeTag::Global);
    let sym = index.symbols().find(|s| s.name == "shared").unwrap();
    assert!(sym.is_global());
}

#[test]
fn universal_counts_as_global_visibility() {
    let index = index("file:///tmp/u.fish", "set -U fish_key_bindings vi\n");
    assert_eq!(tag_of(&index, "fish_key_bindings"), ScopeTag::Universal);
    let sym = index
        .symbols()
        .find(|s| s.name == "fish_key_bindings")
        .unwrap();
    assert!(sym.is_global());
    assert!(!sym.is_local());
}

#[test]
fn bundled_export_flag_keeps_the_scope_flag() {
    let index = index("file:///tmp/b.fish", "set -gx EDITOR vim\n");
    assert_eq!(tag_of(&index, "EDITOR"), ScopeTag::Global);
}

#[test]
fn last_scope_modifier_wins() {
    let index = index("file:///tmp/l.fish", "set -g -l tmp 1\n");
    assert_eq!(tag_of(&index, "tmp"), ScopeTag::Local);
}

#[test]
fn function_flag_targets_the_enclosing_function() {
    let index = index(
        "file:///fish/functions/f.fish",
        "function f\n    for i in 1 2\n        set -f acc $acc $i\n    end\nend\n",
    );
    assert_eq!(tag_of(&index, "acc"), ScopeTag::Function);
    let acc = index.symbols().find(|s| s.name == "acc").unwrap();
    let func = index.symbols().find(|s| s.name == "f").unwrap();
    // `-f` skips past the loop scope.
    assert_eq!(acc.scope.range, func.range);
}

#[test]
fn autoload_matching_function_is_global() {
    let index = index(
        "file:///fish/functions/fish_prompt.fish",
        "function fish_prompt\nend\nfunction _prompt_helper\nend\n",
    );
    assert_eq!(tag_of(&index, "fish_prompt"), ScopeTag::Global);
    assert_eq!(tag_of(&index, "_prompt_helper"), ScopeTag::Local);
}

#[test]
fn config_top_level_functions_are_global_but_nested_are_not() {
    let index = index(
        "file:///fish/config.fish",
        "function outer\n    function inner\n    end\nend\n",
    );
    assert_eq!(tag_of(&index, "outer"), ScopeTag::Global);
    assert_eq!(tag_of(&index, "inner"), ScopeTag::Local);
}

#[test]
fn script_functions_are_local() {
    let index = index("file:///tmp/tool.fish", "function helper\nend\n");
    assert_eq!(tag_of(&index, "helper"), ScopeTag::Local);
}

#[test]
fn scope_transparent_blocks_do_not_capture_definitions() {
    let index = index(
        "file:///tmp/t.fish",
        "if true\n    set -l inside 1\nend\n",
    );
    let inside = index.symbols().find(|s| s.name == "inside").unwrap();
    // The scope is the whole file, not the if block.
    assert_eq!(inside.scope.tag, ScopeTag::Local);
    assert!(
        inside
            .scope
            .range
            .contains_position(fishls_common::Position::new(0, 0))
    );
}

#[test]
fn function_argv_is_visible_through_the_body_only() {
    let source = "function f\n    echo $argv\nend\necho $argv\n";
    let index = index("file:///fish/functions/f.fish", source);
    let argv = index.symbols().find(|s| s.name == "argv").unwrap();
    assert!(
        argv.scope_contains_position(fishls_common::Position::new(1, 10)),
        "inside the body"
    );
    assert!(
        !argv.scope_contains_position(fishls_common::Position::new(3, 6)),
        "after the function"
    );
}

#[test]
fn fish_kind_drives_the_generic_kind() {
    let index = index(
        "file:///fish/config.fish",
        "function f\nend\nalias g='git'\nset -g v 1\nexport P=1\n",
    );
    for symbol in index.symbols() {
        match symbol.fish_kind {
            FishKind::Function | FishKind::Alias => assert!(symbol.is_function()),
            _ => assert!(symbol.is_variable()),
        }
    }
}
