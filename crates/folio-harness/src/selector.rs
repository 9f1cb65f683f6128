#![forbid(unsafe_code)]

//! The selector subset the headless document understands:
//! `tag`, `.class`, `#id`, `[attr]` and `[attr=value]`, combined as a single
//! compound (`img.lightbox-trigger[src]`). Descendant combinators and lists
//! are not supported.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Selector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, Option<String>)>,
}

impl Selector {
    /// Parse a compound selector. Unparseable input yields a selector that
    /// matches nothing.
    pub fn parse(src: &str) -> Option<Self> {
        let mut sel = Self::default();
        let mut rest = src.trim();
        if rest.is_empty() {
            return None;
        }

        let tag_len = rest
            .find(|c: char| matches!(c, '.' | '#' | '['))
            .unwrap_or(rest.len());
        if tag_len > 0 {
            let tag = &rest[..tag_len];
            if !is_name(tag) {
                return None;
            }
            sel.tag = Some(tag.to_ascii_lowercase());
        }
        rest = &rest[tag_len..];

        while let Some(first) = rest.chars().next() {
            match first {
                '.' | '#' => {
                    let body = &rest[1..];
                    let len = body
                        .find(|c: char| matches!(c, '.' | '#' | '['))
                        .unwrap_or(body.len());
                    if len == 0 || !is_name(&body[..len]) {
                        return None;
                    }
                    let name = body[..len].to_owned();
                    if first == '.' {
                        sel.classes.push(name);
                    } else {
                        sel.id = Some(name);
                    }
                    rest = &body[len..];
                }
                '[' => {
                    let close = rest.find(']')?;
                    let inner = &rest[1..close];
                    let attr = match inner.split_once('=') {
                        Some((name, value)) => (
                            name.trim().to_owned(),
                            Some(value.trim().trim_matches('"').to_owned()),
                        ),
                        None => (inner.trim().to_owned(), None),
                    };
                    if attr.0.is_empty() {
                        return None;
                    }
                    sel.attrs.push(attr);
                    rest = &rest[close + 1..];
                }
                _ => return None,
            }
        }
        Some(sel)
    }
}

fn is_name(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compound() {
        let sel = Selector::parse("img.lightbox-trigger[data-src]").unwrap();
        assert_eq!(sel.tag.as_deref(), Some("img"));
        assert_eq!(sel.classes, vec!["lightbox-trigger".to_owned()]);
        assert_eq!(sel.attrs, vec![("data-src".to_owned(), None)]);
    }

    #[test]
    fn parses_attr_value_and_id() {
        let sel = Selector::parse("#nav[role=\"dialog\"]").unwrap();
        assert_eq!(sel.id.as_deref(), Some("nav"));
        assert_eq!(
            sel.attrs,
            vec![("role".to_owned(), Some("dialog".to_owned()))]
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(Selector::parse("").is_none());
        assert!(Selector::parse("div > p").is_none());
        assert!(Selector::parse(".").is_none());
        assert!(Selector::parse("[unterminated").is_none());
    }
}
