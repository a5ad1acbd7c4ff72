//! Rule table and the bundled Markdown rule sets.

mod basic;
mod gfm;
mod rule;

pub use basic::basic_renderer;
pub use gfm::gfm_renderer;
pub use rule::{converter, Converter, Rule};

use indexmap::IndexMap;

use crate::node::NodeRef;
use crate::selector::Selector;

/// Rules keyed by normalized selector.
///
/// Keys are unique and the last write wins. Overwriting a key moves it to the
/// newest position, which is what breaks ties between equally specific
/// matches: the most recently inserted key is chosen.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: IndexMap<String, Rule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one entry per comma-separated piece of `keys`, all sharing
    /// `converter`. Returns how many entries were written.
    pub fn insert(&mut self, keys: &str, converter: Converter) -> usize {
        let mut written = 0;
        for selector in Selector::parse_list(keys) {
            self.insert_rule(Rule::new(selector, converter.clone()));
            written += 1;
        }
        written
    }

    /// Insert a single rule, replacing any rule with the same key
    pub fn insert_rule(&mut self, rule: Rule) {
        let key = rule.selector.key();
        self.rules.shift_remove(&key);
        self.rules.insert(key, rule);
    }

    /// Overwrite this table with every entry of `other`, key by key
    pub fn extend_from(&mut self, other: &RuleTable) {
        for rule in other.rules.values() {
            self.insert_rule(rule.clone());
        }
    }

    /// Look up a rule by key (normalized before the lookup)
    pub fn get(&self, key: &str) -> Option<&Rule> {
        let selector = Selector::parse(key)?;
        self.rules.get(&selector.key())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Find the most specific rule matching `node`
    pub fn best_match(&self, node: NodeRef<'_>) -> Option<&Rule> {
        self.rules
            .values()
            .filter_map(|rule| rule.matches(node).map(|specificity| (specificity, rule)))
            // max_by_key keeps the last of equal maxima, i.e. the newest key
            .max_by_key(|(specificity, _)| *specificity)
            .map(|(_, rule)| rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Dom;

    fn fixed(text: &'static str) -> Converter {
        converter(move |_, _| Some(text.to_string()))
    }

    #[test]
    fn test_comma_keys_expand() {
        let mut table = RuleTable::new();
        assert_eq!(table.insert("H1, H2,H3", fixed("h")), 3);
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["H1", "H2", "H3"]);
        assert!(table.get("h2").is_some());
    }

    #[test]
    fn test_overwrite_moves_key_to_end() {
        let mut table = RuleTable::new();
        table.insert("A, B", fixed("first"));
        table.insert("a", fixed("second"));

        assert_eq!(table.len(), 2);
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["B", "A"]);
    }

    #[test]
    fn test_extend_from_is_idempotent() {
        let mut source = RuleTable::new();
        source.insert("P, DIV H3", fixed("source"));

        let mut once = RuleTable::new();
        once.insert("H3, P", fixed("target"));
        let mut twice = once.clone();

        once.extend_from(&source);
        twice.extend_from(&source);
        twice.extend_from(&source);

        assert_eq!(
            once.keys().collect::<Vec<_>>(),
            twice.keys().collect::<Vec<_>>()
        );
        assert_eq!(once.keys().collect::<Vec<_>>(), vec!["H3", "P", "DIV H3"]);
    }

    #[test]
    fn test_equal_specificity_prefers_newest() {
        let mut dom = Dom::new();
        let div = dom.append_element(dom.root_id(), "div").unwrap();
        let section = dom.append_element(div, "section").unwrap();
        let h3 = dom.append_element(section, "h3").unwrap();
        let node = dom.get(h3).unwrap();

        let mut table = RuleTable::new();
        table.insert("DIV H3", fixed("div"));
        table.insert("SECTION H3", fixed("section"));
        assert_eq!(table.best_match(node).unwrap().convert(node, ""), Some("section".to_string()));

        table.insert("DIV H3", fixed("div again"));
        assert_eq!(table.best_match(node).unwrap().convert(node, ""), Some("div again".to_string()));
    }

    #[test]
    fn test_empty_result_is_none() {
        let mut dom = Dom::new();
        let p = dom.append_element(dom.root_id(), "p").unwrap();
        let node = dom.get(p).unwrap();

        let rule = Rule::new(Selector::parse("P").unwrap(), fixed(""));
        assert_eq!(rule.convert(node, "content"), None);
    }
}
