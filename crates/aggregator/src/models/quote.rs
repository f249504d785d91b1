use serde::{Deserialize, Deserializer, Serialize};

/// A quote as served by the upstream provider.
///
/// Quotes are immutable once fetched; identity is [`Quote::id`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Provider-unique identifier. favqs sends a JSON number; it is kept as a string.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    /// Whether the quote is a dialogue between several speakers
    #[serde(default)]
    pub dialogue: bool,

    /// Whether the quote is private to its owner
    #[serde(default)]
    pub private: bool,

    /// Tags attached to the quote; order carries no meaning
    #[serde(default)]
    pub tags: Vec<String>,

    /// Permalink on the provider site
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub favorites_count: u64,

    #[serde(default)]
    pub upvotes_count: u64,

    #[serde(default)]
    pub downvotes_count: u64,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub author_permalink: String,

    /// The quote text
    pub body: String,
}

impl Quote {
    /// Create a quote with only identity, author and text set.
    pub fn new(id: impl Into<String>, author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dialogue: false,
            private: false,
            tags: Vec::new(),
            url: String::new(),
            favorites_count: 0,
            upvotes_count: 0,
            downvotes_count: 0,
            author: author.into(),
            author_permalink: String::new(),
            body: body.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_new() {
        let quote = Quote::new(
            "42",
            "Seneca",
            "Luck is what happens when preparation meets opportunity.",
        );
        assert_eq!(quote.id, "42");
        assert_eq!(quote.author, "Seneca");
        assert!(quote.tags.is_empty());
        assert_eq!(quote.upvotes_count, 0);
    }

    #[test]
    fn test_numeric_id_is_normalized_to_string() {
        let json = r#"{
            "id": 31155,
            "dialogue": false,
            "private": false,
            "tags": ["wisdom", "life"],
            "url": "https://favqs.com/quotes/seneca/31155",
            "favorites_count": 3,
            "upvotes_count": 1,
            "downvotes_count": 0,
            "author": "Seneca",
            "author_permalink": "seneca",
            "body": "While we are postponing, life speeds by."
        }"#;

        let quote: Quote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.id, "31155");
        assert_eq!(quote.tags, vec!["wisdom", "life"]);
        assert_eq!(quote.favorites_count, 3);
        assert_eq!(quote.author_permalink, "seneca");
    }

    #[test]
    fn test_string_id_and_missing_optional_fields() {
        let json = r#"{ "id": "abc", "body": "Short." }"#;

        let quote: Quote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.id, "abc");
        assert!(!quote.dialogue);
        assert!(quote.author.is_empty());
    }

    #[test]
    fn test_serializes_id_as_string() {
        let quote = Quote::new("7", "Anon", "Hello");
        let value = serde_json::to_value(&quote).unwrap();
        assert_eq!(value["id"], "7");
        assert_eq!(value["favorites_count"], 0);
    }
}
