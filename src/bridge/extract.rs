use std::sync::LazyLock;

use regex::Regex;

/// One `web.leer(url, key, destination)` call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub json_key: String,
    pub destination: String,
}

// Exactly three quoted literal arguments; anything else is ignored.
static WEB_READ_RE: LazyLock<Regex> = LazyLock::new(|| {
    let literal = r#"["']([^"']+)["']"#;
    let pattern = format!(r"web\.leer\s*\(\s*{literal}\s*,\s*{literal}\s*,\s*{literal}\s*\)");
    Regex::new(&pattern).expect("valid web.leer pattern")
});

/// Fetch requests in order of appearance
pub fn extract_requests(text: &str) -> Vec<FetchRequest> {
    WEB_READ_RE
        .captures_iter(text)
        .map(|caps| FetchRequest {
            url: caps[1].to_string(),
            json_key: caps[2].to_string(),
            destination: caps[3].to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_in_source_order() {
        let text = r#"
web.leer("https://a.io/p", "price", "precio")
mostrar(precio)
web.leer( 'https://b.io' , '0' , 'raw' )
"#;
        let requests = extract_requests(text);
        assert_eq!(
            requests,
            vec![
                FetchRequest {
                    url: "https://a.io/p".to_string(),
                    json_key: "price".to_string(),
                    destination: "precio".to_string(),
                },
                FetchRequest {
                    url: "https://b.io".to_string(),
                    json_key: "0".to_string(),
                    destination: "raw".to_string(),
                },
            ]
        );
    }

    #[test]
    fn other_arities_are_ignored() {
        let text = r#"
web.leer("https://a.io", "price")
web.leer("https://a.io", "price", "x", "y")
web.leer(url, "price", "x")
"#;
        assert!(extract_requests(text).is_empty());
    }

    #[test]
    fn empty_literals_are_ignored() {
        assert!(extract_requests(r#"web.leer("", "k", "v")"#).is_empty());
    }
}
