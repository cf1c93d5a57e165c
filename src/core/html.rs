// src/core/html.rs
//
// Small read-only DOM helpers over `scraper`. Everything tolerates missing
// nodes and returns empty strings / None instead of failing.

use scraper::{ElementRef, Selector};

use super::sanitize::normalize_ws;

/// Visible text of an element, whitespace-collapsed. Empty for `None`.
pub fn text_of(el: Option<ElementRef<'_>>) -> String {
    match el {
        Some(e) => normalize_ws(&e.text().collect::<String>()),
        None => s!(),
    }
}

/// Attribute value, trimmed; `None` when absent or blank.
pub fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name).map(str::trim).filter(|v| !v.is_empty())
}

/// First descendant matching `sel`.
pub fn first<'a>(scope: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    scope.select(sel).next()
}

/// First descendant matching any selector, tried in order.
pub fn first_of<'a>(scope: ElementRef<'a>, sels: &[&Selector]) -> Option<ElementRef<'a>> {
    sels.iter().find_map(|s| first(scope, s))
}

/// Nearest ancestor (or self) matching `sel`.
pub fn closest<'a>(el: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    if sel.matches(&el) {
        return Some(el);
    }
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| sel.matches(a))
}

/// Direct parent element.
pub fn parent<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.parent().and_then(ElementRef::wrap)
}

/// True when `inner` is `outer` or sits somewhere below it.
pub fn contains(outer: ElementRef<'_>, inner: ElementRef<'_>) -> bool {
    outer.id() == inner.id() || inner.ancestors().any(|a| a.id() == outer.id())
}

/// Selector built at runtime (class fragments etc). Bad input yields `None`.
pub fn dyn_selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn closest_and_contains_walk_ancestors() {
        let doc = Html::parse_fragment(
            r#"<div class="item"><span class="x"><b id="leaf">  hi  there </b></span></div><p id="other"></p>"#,
        );
        let leaf = doc.select(selector!("#leaf")).next().unwrap();
        let item = closest(leaf, selector!(".item")).unwrap();
        let other = doc.select(selector!("#other")).next().unwrap();

        assert!(contains(item, leaf));
        assert!(!contains(other, leaf));
        assert_eq!(text_of(Some(leaf)), "hi there");
        assert_eq!(text_of(None), "");
        assert_eq!(attr(leaf, "id"), Some("leaf"));
        assert_eq!(parent(leaf).map(|p| p.value().name().to_string()), Some(s!("span")));
    }

    #[test]
    fn first_of_respects_order() {
        let doc = Html::parse_fragment(r#"<div><i class="b">B</i><i class="a">A</i></div>"#);
        let root = doc.root_element();
        let got = first_of(root, &[selector!(".a"), selector!(".b")]);
        assert_eq!(text_of(got), "A");
        assert!(dyn_selector("[class*=").is_none());
    }
}
