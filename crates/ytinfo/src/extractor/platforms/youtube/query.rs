use rustc_hash::FxHashMap;

/// Flat view of a form-urlencoded response body.
///
/// Every key maps to all of its values in response order. Blank values are
/// dropped, so a key that only ever appears as `key=` is absent.
#[derive(Debug, Clone, Default)]
pub struct QueryFields {
    fields: FxHashMap<String, Vec<String>>,
}

impl QueryFields {
    pub fn parse(body: &str) -> Self {
        let mut fields: FxHashMap<String, Vec<String>> = FxHashMap::default();
        for (key, value) in url::form_urlencoded::parse(body.trim().as_bytes()) {
            if value.is_empty() {
                continue;
            }
            fields
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        Self { fields }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn all(&self, key: &str) -> &[String] {
        self.fields.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.all(key).first().map(String::as_str)
    }

    pub fn last(&self, key: &str) -> Option<&str> {
        self.all(key).last().map(String::as_str)
    }

    /// A field that is expected once. Repeated fields resolve to their first
    /// occurrence rather than being dropped.
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.first(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_plus_and_percent() {
        let fields = QueryFields::parse("title=Hello+World%21&status=ok");
        assert_eq!(fields.scalar("title"), Some("Hello World!"));
        assert_eq!(fields.scalar("status"), Some("ok"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_repeated_keys() {
        let fields = QueryFields::parse("reason=first&reason=second");
        assert_eq!(fields.all("reason"), ["first", "second"]);
        assert_eq!(fields.first("reason"), Some("first"));
        assert_eq!(fields.last("reason"), Some("second"));
        assert_eq!(fields.scalar("reason"), Some("first"));
    }

    #[test]
    fn test_blank_and_missing() {
        let fields = QueryFields::parse("title=&errorcode=150");
        assert!(!fields.contains("title"));
        assert_eq!(fields.scalar("title"), None);
        assert!(fields.all("missing").is_empty());
        assert!(fields.contains("errorcode"));
    }

    #[test]
    fn test_nested_value_is_decoded_once() {
        let fields = QueryFields::parse("map=itag%3D18%26url%3Dhttp%253A%252F%252Fx%2Citag%3D22");
        assert_eq!(
            fields.scalar("map"),
            Some("itag=18&url=http%3A%2F%2Fx,itag=22")
        );
    }

    #[test]
    fn test_empty_body() {
        assert!(QueryFields::parse("").is_empty());
        assert!(QueryFields::parse("  \n").is_empty());
    }
}
