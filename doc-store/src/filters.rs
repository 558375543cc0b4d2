//! Namespace restriction as a Qdrant `Filter`.

use qdrant_client::qdrant::{
    Condition, FieldCondition, Filter, Match, condition::ConditionOneOf, r#match::MatchValue,
};

/// Payload key holding the namespace of each point.
pub const NAMESPACE_FIELD: &str = "namespace";

/// `must` filter: `namespace == ns` (keyword match).
pub fn namespace_filter(ns: &str) -> Filter {
    Filter {
        must: vec![Condition {
            condition_one_of: Some(ConditionOneOf::Field(FieldCondition {
                key: NAMESPACE_FIELD.to_string(),
                r#match: Some(Match {
                    match_value: Some(MatchValue::Keyword(ns.to_string())),
                }),
                ..Default::default()
            })),
        }],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_is_a_must_keyword_condition() {
        let f = namespace_filter("api_docs");
        assert!(f.should.is_empty());
        assert_eq!(f.must.len(), 1);
        match &f.must[0].condition_one_of {
            Some(ConditionOneOf::Field(fc)) => {
                assert_eq!(fc.key, "namespace");
                assert_eq!(
                    fc.r#match.as_ref().and_then(|m| m.match_value.clone()),
                    Some(MatchValue::Keyword("api_docs".into()))
                );
            }
            other => panic!("unexpected condition: {other:?}"),
        }
    }
}
