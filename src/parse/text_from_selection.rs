use super::Error;
use scraper::{ElementRef, Selector};

/// Returns the text of the first element matching `selector`, with all of its text nodes joined.
/// Fails if nothing matches or if the match holds no text at all.
pub fn text_from_selection(
    selector: &Selector,
    element: ElementRef<'_>,
    parent_label: &str,
    child_label: &str,
) -> Result<String, Error> {
    let child = element
        .select(selector)
        .next() // first match
        .ok_or_else(|| {
            Error::HtmlParse(format!(
                "Every {parent_label} element should have a {child_label}."
            ))
        })?;
    get_inner_text(child, child_label)
}

/// Joins every text node under `element`. Fails if there is no text node at all.
pub fn get_inner_text(element: ElementRef<'_>, text_label: &str) -> Result<String, Error> {
    let mut text_iter = element.text().peekable();
    if text_iter.peek().is_none() {
        return Err(Error::TextNodeParse(format!(
            "{text_label} should have text inside."
        )));
    }
    Ok(text_iter.collect())
}

/// Trimmed, non-empty text of every element matching `selector`, in document order.
pub fn texts_from_selection<'a>(
    selector: &'a Selector,
    element: ElementRef<'a>,
) -> impl Iterator<Item = String> + 'a {
    element
        .select(selector)
        .map(|el| el.text().collect::<String>().trim().to_owned())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_text_from_selection_joins_nodes() {
        let doc = Html::parse_fragment("<h5><strong>4 <em>Ocvrti</em> sir</strong></h5>");
        let sel = Selector::parse("h5 strong").unwrap();
        let text = text_from_selection(&sel, doc.root_element(), "menu item", "title").unwrap();
        assert_eq!(text, "4 Ocvrti sir");
    }

    #[test]
    fn test_text_from_selection_missing() {
        let doc = Html::parse_fragment("<h5></h5>");
        let sel = Selector::parse("h5 strong").unwrap();
        let err = text_from_selection(&sel, doc.root_element(), "menu item", "title").unwrap_err();
        assert!(matches!(err, Error::HtmlParse(_)));

        let doc = Html::parse_fragment("<h5><strong></strong></h5>");
        let err = text_from_selection(&sel, doc.root_element(), "menu item", "title").unwrap_err();
        assert!(matches!(err, Error::TextNodeParse(_)));
    }

    #[test]
    fn test_texts_from_selection_skips_blank() {
        let doc = Html::parse_fragment(
            "<ul><li><i> gluten </i></li><li><i>  </i></li><li><i>mleko</i></li></ul>",
        );
        let sel = Selector::parse("li i").unwrap();
        let texts: Vec<_> = texts_from_selection(&sel, doc.root_element()).collect();
        assert_eq!(texts, vec!["gluten", "mleko"]);
    }
}
