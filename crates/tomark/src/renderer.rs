//! Renderer - picks and runs the most specific rule for a node.

use std::sync::Arc;

use crate::node::NodeRef;
use crate::rules::{Converter, RuleTable};
use crate::utilities;

/// Owns a [`RuleTable`] and converts nodes with it.
///
/// Build it with [`Renderer::factory`] / [`Renderer::add_rule`] and
/// [`Renderer::mix`], then call [`Renderer::convert`] as often as needed.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    rules: RuleTable,
}

impl Renderer {
    /// Create a renderer with an empty rule table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer seeded with `(selector, converter)` pairs.
    ///
    /// Selectors may be comma-joined; pairs are registered in order.
    pub fn factory<I, K>(rules: I) -> Self
    where
        I: IntoIterator<Item = (K, Converter)>,
        K: AsRef<str>,
    {
        let mut renderer = Self::new();
        for (selector, converter) in rules {
            renderer.add_converter(selector.as_ref(), converter);
        }
        renderer
    }

    /// Register `f` under every chain of `selector`
    pub fn add_rule<F>(&mut self, selector: &str, f: F) -> &mut Self
    where
        F: Fn(NodeRef<'_>, &str) -> Option<String> + Send + Sync + 'static,
    {
        self.add_converter(selector, Arc::new(f))
    }

    /// Register an already shared converter
    pub fn add_converter(&mut self, selector: &str, converter: Converter) -> &mut Self {
        let written = self.rules.insert(selector, converter);
        log::debug!("registered {} rule(s) for `{}`", written, selector);
        self
    }

    /// Copy every rule of `other` into this renderer, overwriting equal keys
    pub fn mix(&mut self, other: &Renderer) -> &mut Self {
        log::debug!("mixing {} rule(s) into a table of {}", other.rules.len(), self.rules.len());
        self.rules.extend_from(&other.rules);
        self
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Convert `node`, falling back to `fallback` when no rule matches or the
    /// matching rule returns nothing.
    ///
    /// `fallback` is also what the rule receives as the converted content of
    /// the node's children.
    pub fn convert(&self, node: NodeRef<'_>, fallback: &str) -> String {
        let Some(rule) = self.rules.best_match(node) else {
            log::trace!("no rule for {}, using fallback", node.rule_name());
            return fallback.to_string();
        };

        match rule.convert(node, fallback) {
            Some(text) => text,
            None => {
                log::trace!("rule `{}` abstained for {}", rule.selector, node.rule_name());
                fallback.to_string()
            }
        }
    }

    /// See [`utilities::trim`]
    pub fn trim<'t>(&self, text: &'t str) -> &'t str {
        utilities::trim(text)
    }

    /// See [`utilities::escape_text`]
    pub fn escape_text(&self, text: &str) -> String {
        utilities::escape_text(text)
    }

    /// See [`utilities::get_space_controlled`]
    pub fn get_space_controlled(&self, text: &str, node: NodeRef<'_>) -> String {
        utilities::get_space_controlled(text, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Dom, NodeId};
    use crate::rules::converter;

    fn fixed(text: &'static str) -> Converter {
        converter(move |_, _| Some(text.to_string()))
    }

    fn headings(text: &'static str) -> (&'static str, Converter) {
        ("H1, H2, H3, H4, H5, H6", fixed(text))
    }

    fn chain(dom: &mut Dom, tags: &[&str]) -> NodeId {
        let mut parent = dom.root_id();
        for tag in tags {
            parent = dom.append_element(parent, tag).unwrap();
        }
        parent
    }

    fn convert(renderer: &Renderer, tags: &[&str], fallback: &str) -> String {
        let mut dom = Dom::new();
        let id = chain(&mut dom, tags);
        renderer.convert(dom.get(id).unwrap(), fallback)
    }

    #[test]
    fn test_add_rule() {
        let mut renderer = Renderer::new();
        renderer.add_rule("H1, H2, H3, H4, H5, H6", |_, _| Some("markdownText".to_string()));

        assert_eq!(convert(&renderer, &["h1"], ""), "markdownText");
        assert_eq!(convert(&renderer, &["h6"], ""), "markdownText");
    }

    #[test]
    fn test_factory() {
        let renderer = Renderer::factory([headings("markdownText")]);
        assert_eq!(convert(&renderer, &["h2"], ""), "markdownText");
    }

    #[test]
    fn test_no_rule_returns_fallback() {
        let renderer = Renderer::factory([headings("markdownText")]);
        assert_eq!(convert(&renderer, &["em"], "subContents"), "subContents");
        assert_eq!(convert(&Renderer::new(), &["h1"], "subContents"), "subContents");
    }

    #[test]
    fn test_falsy_converter_returns_fallback() {
        let renderer = Renderer::factory([
            ("H1, H2, H3, H4, H5, H6", converter(|_, _| None)),
            ("EM", converter(|_, _| Some(String::new()))),
        ]);

        assert_eq!(convert(&renderer, &["h1"], "subContents"), "subContents");
        assert_eq!(convert(&renderer, &["em"], "subContents"), "subContents");
    }

    #[test]
    fn test_converter_receives_fallback_as_content() {
        let mut renderer = Renderer::new();
        renderer.add_rule("STRONG", |_, content| Some(format!("**{}**", content)));
        assert_eq!(convert(&renderer, &["strong"], "bold"), "**bold**");
    }

    #[test]
    fn test_nested_selectors() {
        let renderer = Renderer::factory([("UL LI", fixed("ulli")), ("OL LI", fixed("olli"))]);

        assert_eq!(convert(&renderer, &["ul", "li"], ""), "ulli");
        assert_eq!(convert(&renderer, &["ol", "li"], ""), "olli");
        assert_eq!(convert(&renderer, &["li"], "plain"), "plain");
    }

    #[test]
    fn test_longer_chain_wins_regardless_of_order() {
        let first = Renderer::factory([("DIV P", fixed("div p")), ("P", fixed("p"))]);
        let second = Renderer::factory([("P", fixed("p")), ("DIV P", fixed("div p"))]);

        for renderer in [&first, &second] {
            assert_eq!(convert(renderer, &["div", "p"], ""), "div p");
            assert_eq!(convert(renderer, &["p"], ""), "p");
        }
    }

    #[test]
    fn test_comma_registration_equals_separate_registration() {
        let mut grouped = Renderer::factory([("A, B", fixed("f"))]);
        let mut separate = Renderer::new();
        separate.add_converter("A", fixed("f")).add_converter("B", fixed("f"));

        let patch = Renderer::factory([("A", fixed("g"))]);
        grouped.mix(&patch);
        separate.mix(&patch);

        for renderer in [&grouped, &separate] {
            assert_eq!(convert(renderer, &["a"], ""), "g");
            assert_eq!(convert(renderer, &["b"], ""), "f");
            assert_eq!(renderer.rules().keys().collect::<Vec<_>>(), vec!["B", "A"]);
        }
    }

    #[test]
    fn test_mix() {
        let mut renderer1 = Renderer::factory([
            headings("renderer1"),
            ("P DIV H3", fixed("renderer1")),
            ("DIV H3", fixed("renderer1")),
        ]);
        let renderer2 = Renderer::factory([
            ("H1", fixed("renderer2")),
            ("P", fixed("renderer2")),
            ("P DIV H3", fixed("renderer2")),
        ]);

        renderer1.mix(&renderer2);

        assert_eq!(convert(&renderer1, &["h1"], ""), "renderer2");
        assert_eq!(convert(&renderer1, &["h2"], ""), "renderer1");
        assert_eq!(convert(&renderer1, &["p"], ""), "renderer2");
        assert_eq!(convert(&renderer1, &["p", "h3"], ""), "renderer1");
        assert_eq!(convert(&renderer1, &["div", "h3"], ""), "renderer1");
        assert_eq!(convert(&renderer1, &["p", "div", "h3"], ""), "renderer2");
    }

    #[test]
    fn test_mix_is_idempotent() {
        let source = Renderer::factory([("P", fixed("s")), ("DIV P", fixed("s"))]);
        let mut once = Renderer::factory([headings("t"), ("P", fixed("t"))]);
        let mut twice = once.clone();

        once.mix(&source);
        twice.mix(&source).mix(&source);

        assert_eq!(
            once.rules().keys().collect::<Vec<_>>(),
            twice.rules().keys().collect::<Vec<_>>()
        );
        assert_eq!(convert(&twice, &["div", "p"], ""), "s");
    }

    #[test]
    fn test_text_node_rule() {
        let renderer = Renderer::factory([("TEXT_NODE", fixed("text node"))]);

        let mut dom = Dom::new();
        let p = chain(&mut dom, &["p"]);
        let text = dom.append_text(p, "tttt").unwrap();

        assert_eq!(renderer.convert(dom.get(text).unwrap(), ""), "text node");
        assert_eq!(renderer.convert(dom.get(p).unwrap(), "x"), "x");
    }

    #[test]
    fn test_hygiene_methods() {
        let renderer = Renderer::new();
        assert_eq!(renderer.trim(" aa aa "), "aa aa");
        assert_eq!(renderer.escape_text("im ## text"), "im \\#\\# text");
    }

    #[cfg(feature = "html")]
    mod html {
        use super::*;
        use crate::html::parse_html;
        use crate::runner::DomRunner;

        fn space_controlled(html: &str, steps: usize, text: &str) -> String {
            let dom = parse_html(html).unwrap();
            let node = DomRunner::new(&dom).nth(steps - 1).unwrap();
            Renderer::new().get_space_controlled(text, node)
        }

        #[test]
        fn test_convert_parsed_nodes() {
            let renderer = Renderer::factory([headings("markdownText"), ("UL LI", fixed("ulli"))]);

            let dom = parse_html("<h1>test</h1>").unwrap();
            let h1 = DomRunner::new(&dom).next().unwrap();
            assert_eq!(renderer.convert(h1, ""), "markdownText");

            let dom = parse_html("<ul><li>test</li></ul>").unwrap();
            let li = DomRunner::new(&dom).nth(1).unwrap();
            assert_eq!(renderer.convert(li, ""), "ulli");
        }

        #[test]
        fn test_nesting_rules_skip_parser_root() {
            let renderer = Renderer::factory([("DIV P", fixed("div p")), ("P", fixed("p"))]);

            let dom = parse_html("<p></p>").unwrap();
            let p = DomRunner::new(&dom).next().unwrap();
            assert_eq!(renderer.convert(p, ""), "p");
        }

        #[test]
        fn test_trim_keeps_nbsp() {
            let dom = parse_html("<p>Hello&nbsp; </p>").unwrap();
            let text = DomRunner::new(&dom).nth(1).unwrap();
            assert_eq!(Renderer::new().trim(text.value().unwrap()), "Hello\u{a0}");
        }

        #[test]
        fn test_get_space_controlled() {
            assert_eq!(space_controlled("<p>Hello <em>world</em></p>", 2, "Hello"), "Hello ");
            assert_eq!(space_controlled("<p>Hello <em> world</em></p>", 2, "Hello"), "Hello ");
            assert_eq!(space_controlled("<p>Hello<em> world</em></p>", 2, "Hello"), "Hello ");
            assert_eq!(space_controlled("<p>Hello<em>&nbsp;world</em></p>", 2, "Hello"), "Hello");
            assert_eq!(space_controlled("<p><em>Hello</em> world</p>", 4, "world"), " world");
        }
    }
}
