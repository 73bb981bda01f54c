use std::collections::BTreeSet;

use luamod_lexer::NameTables;
use pretty_assertions::assert_eq;
use rustc_hash::FxHashSet;

use super::{NameGenerator, RenameMap};

fn locals(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

#[test]
fn generator_order_is_length_then_alphabet() {
    let names: Vec<String> = NameGenerator::new(NameTables::lua()).take(54).collect();
    assert_eq!(names[0], "a");
    assert_eq!(names[25], "z");
    assert_eq!(names[26], "A");
    assert_eq!(names[51], "Z");
    assert_eq!(names[52], "aa");
    assert_eq!(names[53], "ab");
}

#[test]
fn generator_skips_keywords() {
    let names: FxHashSet<String> = NameGenerator::new(NameTables::lua()).collect();
    for kw in ["do", "if", "in", "or", "and", "end", "for", "nil", "not"] {
        assert!(!names.contains(kw), "{kw}");
    }
    assert!(names.contains("a_1"));
}

#[test]
fn generator_covers_three_characters() {
    let count = NameGenerator::new(NameTables::lua()).count();
    let keywords_up_to_three = NameTables::lua()
        .keywords()
        .iter()
        .filter(|k| k.len() <= 3)
        .count();
    assert_eq!(count, NameGenerator::CAPACITY - keywords_up_to_three);
}

#[test]
fn sorted_locals_take_names_in_order() {
    let map = RenameMap::build(
        &locals(&["zeta", "alpha", "Mid"]),
        &FxHashSet::default(),
        NameTables::lua(),
    );
    assert_eq!(map.get("Mid"), Some("a"));
    assert_eq!(map.get("alpha"), Some("b"));
    assert_eq!(map.get("zeta"), Some("c"));
    assert_eq!(map.len(), 3);
}

#[test]
fn names_in_use_are_skipped() {
    let in_use: FxHashSet<&str> = ["a", "b"].into_iter().collect();
    let map = RenameMap::build(&locals(&["value"]), &in_use, NameTables::lua());
    assert_eq!(map.get("value"), Some("c"));
}

#[test]
fn empty_locals_give_empty_map() {
    let map = RenameMap::build(&BTreeSet::new(), &FxHashSet::default(), NameTables::lua());
    assert!(map.is_empty());
    assert_eq!(map.iter().count(), 0);
}
