use serde::{Deserialize, Serialize};

/// A heading found on a category page, with its resolved link and the
/// relative publish time of the article it points to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineRecord {
    pub headline: String,
    pub link: String,
    pub published: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: String,
    pub url: String,
    pub headlines: Vec<HeadlineRecord>,
}

/// One anchor of the site's navigation menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    pub name: String,
    pub link: String,
}

/// Outcome of a collector run. Collectors never return an error; a failure is
/// logged where it happens and surfaces here as `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum Collected<T> {
    Items(Vec<T>),
    Empty,
    Failed,
}

impl<T> Collected<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            Collected::Empty
        } else {
            Collected::Items(items)
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Collected::Failed)
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Collected::Items(items) => items,
            Collected::Empty | Collected::Failed => Vec::new(),
        }
    }
}

/// Resolves a scraped href against the site origin. Anything already starting
/// with `http` is kept as-is.
pub fn resolve_link(origin: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", origin, href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn relative_href_gets_origin_prefix() {
        assert_eq!(
            resolve_link("https://www.prothomalo.com", "/economy"),
            "https://www.prothomalo.com/economy"
        );
    }

    #[test]
    fn absolute_href_is_unchanged() {
        assert_eq!(
            resolve_link("https://www.prothomalo.com", "https://external.com/x"),
            "https://external.com/x"
        );
    }

    #[test]
    fn collected_from_empty_vec_is_empty() {
        let c: Collected<NavLink> = Collected::from_items(vec![]);
        assert_eq!(c, Collected::Empty);
        assert!(Collected::<NavLink>::Failed.into_items().is_empty());
    }

    #[test]
    fn category_serializes_with_original_field_names() {
        let category = CategoryResult {
            category: "Economy".into(),
            url: "https://www.prothomalo.com/economy".into(),
            headlines: vec![HeadlineRecord {
                headline: "Budget".into(),
                link: "https://www.prothomalo.com/economy/budget".into(),
                published: "Unknown".into(),
            }],
        };
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json["category"], "Economy");
        assert_eq!(json["headlines"][0]["published"], "Unknown");
    }
}
