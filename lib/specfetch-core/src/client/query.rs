use serde_json::Value;

use super::path::{encode_component, value_to_string};

/// Builds the query string for the given parameters, `?` included.
///
/// `null` values are skipped, and an empty string is returned when nothing is
/// left, so a URL never ends with a bare `?`.
pub(super) fn to_query_string<'a>(params: impl IntoIterator<Item = (&'a str, &'a Value)>) -> String {
    let pairs = params
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| {
            let name = encode_component(name);
            let value = encode_component(&value_to_string(value));
            format!("{name}={value}")
        })
        .collect::<Vec<_>>();

    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case::single(json!({ "q": "x" }), "?q=x")]
    #[case::null_dropped(json!({ "q": "x", "page": null }), "?q=x")]
    #[case::null_first(json!({ "page": null, "q": "x" }), "?q=x")]
    #[case::all_null(json!({ "page": null }), "")]
    #[case::empty(json!({}), "")]
    #[case::keeps_order(json!({ "b": 2, "a": 1 }), "?b=2&a=1")]
    #[case::encoded(json!({ "q": "a b&c=d" }), "?q=a%20b%26c%3Dd")]
    #[case::array(json!({ "tags": ["rust", "web"] }), "?tags=rust%2Cweb")]
    #[case::boolean(json!({ "unread": false }), "?unread=false")]
    fn should_build_query_string(#[case] params: Value, #[case] expected: &str) {
        let params = params.as_object().expect("an object");

        let query = to_query_string(params.iter().map(|(name, value)| (name.as_str(), value)));

        assert_eq!(query, expected);
    }

    #[test]
    fn should_encode_parameter_names() {
        let value = json!("1");

        let query = to_query_string([("filter[id]", &value)]);

        insta::assert_snapshot!(query, @"?filter%5Bid%5D=1");
    }
}
