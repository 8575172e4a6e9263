//! Short/long command-line flag matching.
//!
//! Fish commands accept bundled short flags (`set -gx` carries both `-g`
//! and `-x`) and `--flag=value` long forms. `Opt` describes one flag pair
//! and matches argument text accordingly.

use crate::classify::is_option;
use crate::node::{NodeIndex, SyntaxTree};

/// One flag, in its short and/or long spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opt {
    short: Option<char>,
    long: Option<&'static str>,
}

impl Opt {
    /// Both spellings, e.g. `Opt::new("-l", "--local")`.
    pub fn new(short: &'static str, long: &'static str) -> Self {
        debug_assert!(short.len() == 2 && short.starts_with('-'), "bad short flag {short}");
        debug_assert!(long.starts_with("--"), "bad long flag {long}");
        Opt {
            short: short.chars().nth(1),
            long: Some(&long[2..]),
        }
    }

    /// Long-only flag, e.g. `Opt::long("--path")`.
    pub fn long(long: &'static str) -> Self {
        debug_assert!(long.starts_with("--"), "bad long flag {long}");
        Opt {
            short: None,
            long: Some(&long[2..]),
        }
    }

    /// Short-only flag.
    pub fn short(short: &'static str) -> Self {
        debug_assert!(short.len() == 2 && short.starts_with('-'), "bad short flag {short}");
        Opt {
            short: short.chars().nth(1),
            long: None,
        }
    }

    /// Match raw argument text against this flag. Bundled shorts match any
    /// contained letter; `--flag=value` matches on the flag part.
    pub fn matches_text(&self, text: &str) -> bool {
        if let Some(rest) = text.strip_prefix("--") {
            let flag = rest.split('=').next().unwrap_or(rest);
            return self.long == Some(flag);
        }
        if let Some(rest) = text.strip_prefix('-') {
            if rest.is_empty() {
                return false;
            }
            if let Some(short) = self.short {
                return rest.chars().all(|c| c.is_ascii_alphanumeric()) && rest.contains(short);
            }
        }
        false
    }

    /// Match an option node in the tree.
    pub fn matches(&self, tree: &SyntaxTree, idx: NodeIndex) -> bool {
        is_option(tree, idx) && self.matches_text(tree.text(idx))
    }
}

/// First node in `nodes` matching `opt`.
pub fn find_opt(tree: &SyntaxTree, nodes: &[NodeIndex], opt: Opt) -> Option<NodeIndex> {
    nodes.iter().copied().find(|&n| opt.matches(tree, n))
}

pub fn has_opt(tree: &SyntaxTree, nodes: &[NodeIndex], opt: Opt) -> bool {
    find_opt(tree, nodes, opt).is_some()
}

/// First of `opts` that any node matches, scanning nodes in order.
pub fn first_matching_opt(tree: &SyntaxTree, nodes: &[NodeIndex], opts: &[Opt]) -> Option<Opt> {
    for &node in nodes {
        for &opt in opts {
            if opt.matches(tree, node) {
                return Some(opt);
            }
        }
    }
    None
}

/// True if `idx` is an option taking a separate value argument and
/// `value` is that argument (the next sibling).
pub fn is_opt_value(tree: &SyntaxTree, value: NodeIndex, opt: Opt) -> bool {
    match tree.arena().prev_sibling(value) {
        Some(prev) => opt.matches(tree, prev) && !is_option(tree, value),
        None => false,
    }
}

/// Value nodes of a flag taking multiple values: all non-option siblings
/// following the flag, up to the next option.
pub fn opt_values(tree: &SyntaxTree, nodes: &[NodeIndex], opt: Opt) -> Vec<NodeIndex> {
    let mut values = Vec::new();
    let mut collecting = false;
    for &node in nodes {
        if opt.matches(tree, node) {
            collecting = true;
            continue;
        }
        if is_option(tree, node) {
            collecting = false;
            continue;
        }
        if collecting {
            values.push(node);
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{is_long_option, is_short_option};

    #[test]
    fn short_flags_match_bundles() {
        let global = Opt::new("-g", "--global");
        assert!(global.matches_text("-g"));
        assert!(global.matches_text("-gx"));
        assert!(global.matches_text("-xg"));
        assert!(!global.matches_text("-x"));
        assert!(!global.matches_text("--g"));
    }

    #[test]
    fn long_flags_match_exactly_and_with_values() {
        let names = Opt::new("-a", "--argument-names");
        assert!(names.matches_text("--argument-names"));
        assert!(names.matches_text("--argument-names=x"));
        assert!(!names.matches_text("--argument"));
        assert!(names.matches_text("-a"));
    }

    #[test]
    fn long_only_flags_reject_shorts() {
        let path = Opt::long("--path");
        assert!(path.matches_text("--path"));
        assert!(!path.matches_text("-p"));
    }

    #[test]
    fn double_dash_is_not_a_flag_match() {
        let local = Opt::new("-l", "--local");
        assert!(!local.matches_text("--"));
        assert!(!local.matches_text("-"));
    }

    #[test]
    fn short_option_checks_use_node_kinds() {
        let tree = crate::parser::parse("set -gx PATH /usr/bin\n");
        let root = tree.root();
        let command = tree.arena().children(root)[0];
        let args = tree.arena().children(command);
        assert!(is_short_option(&tree, args[1]));
        assert!(!is_long_option(&tree, args[1]));
        assert!(Opt::new("-x", "--export").matches(&tree, args[1]));
    }
}
