//! Rule feeds: JSON documents a control plane fetches and passes to `refresh`.
//!
//! Either a bare array of rules or an object with a `rules` array is accepted:
//!
//! ```json
//! { "rules": [
//!     { "tag_id": "1.1.z.1", "target_key": "a", "exclusive": true, "weight": 0.1 },
//!     { "tag_id": "1.1.z.1", "target_key": "c", "exclusive": false }
//! ] }
//! ```

use serde::Deserialize;

use crate::{Result, TrafficRule};

#[derive(Deserialize)]
#[serde(untagged)]
enum RuleFeed {
    Bare(Vec<TrafficRule>),
    Wrapped { rules: Vec<TrafficRule> },
}

/// Parse a rule feed. Rules are returned in document order; no validation happens here.
pub fn rules_from_json(doc: &str) -> Result<Vec<TrafficRule>> {
    let feed: RuleFeed = serde_json::from_str(doc)?;
    Ok(match feed {
        RuleFeed::Bare(rules) | RuleFeed::Wrapped { rules } => rules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn accepts_both_shapes() {
        let bare = r#"[{"tag_id":"t","target_key":"a","exclusive":true,"weight":0.4}]"#;
        let wrapped = r#"{"rules":[{"tagId":"t","targetKey":"a","exclusive":true,"weight":0.4}]}"#;
        let want = vec![TrafficRule::exclusive("t", "a", 0.4)];
        assert_eq!(rules_from_json(bare).unwrap(), want);
        assert_eq!(rules_from_json(wrapped).unwrap(), want);
    }

    #[test]
    fn pooled_rules_may_omit_weight() {
        let doc = r#"[{"tag_id":"t","target_key":"c","exclusive":false}]"#;
        assert_eq!(
            rules_from_json(doc).unwrap(),
            vec![TrafficRule::nonexclusive("t", "c")]
        );
    }

    #[test]
    fn malformed_feed_is_an_error() {
        assert!(matches!(rules_from_json("{\"rules\": 3}"), Err(Error::Feed(_))));
        assert!(matches!(rules_from_json("[{\"tag_id\":\"t\"}]"), Err(Error::Feed(_))));
    }
}
