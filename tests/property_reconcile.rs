//! Property-based tests for the pure pieces of the reconciliation engine.

use proptest::prelude::*;
use serde_json::Value;

use poolctl::services::diff::{matches, mismatched_fields};
use poolctl::services::projector::project;
use poolctl::services::status::{classify, extract_status, Readiness};
use poolctl::{PoolSnapshot, PoolSpec, Scaling};

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}"
}

fn arb_tags() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z:]{1,10}", 0..5)
}

fn arb_scaling() -> impl Strategy<Value = Scaling> {
    prop_oneof![
        proptest::option::of(0u64..100).prop_map(|size| Scaling::Fixed { size }),
        (proptest::option::of(0u64..50), proptest::option::of(0u64..100)).prop_map(
            |(min_size, max_size)| Scaling::Autoscaling { min_size, max_size }
        ),
    ]
}

prop_compose! {
    fn arb_spec()(
        name in arb_name(),
        node_type in "[A-Z]{2,4}[0-9]-[SML]",
        scaling in arb_scaling(),
        root_volume_size in proptest::option::of(10u64..500),
        autohealing in any::<bool>(),
        public_ip_disabled in any::<bool>(),
        tags in arb_tags(),
    ) -> PoolSpec {
        let mut spec = PoolSpec::new("fr-par", "proj", "c1", name, node_type);
        spec.scaling = scaling;
        spec.root_volume_size = root_volume_size;
        spec.autohealing = autohealing;
        spec.public_ip_disabled = public_ip_disabled;
        spec.tags = tags;
        spec
    }
}

/// Arbitrary JSON documents, shallow enough to stay fast.
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| serde_json::json!(n)),
        "[a-zA-Z0-9_ ]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(
                // Bias toward the keys the heuristics look at so the
                // interesting branches actually get exercised.
                prop_oneof![
                    Just("status".to_string()),
                    Just("phase".to_string()),
                    Just("conditions".to_string()),
                    Just("ready".to_string()),
                    Just("nodes".to_string()),
                    Just("desired_size".to_string()),
                    Just("current_size".to_string()),
                    "[a-z_]{1,10}",
                ],
                inner,
                0..5
            )
            .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    /// A fixed-size spec never projects autoscaler bounds, and an autoscaled
    /// spec never projects a fixed size.
    #[test]
    fn prop_scaling_fields_are_mutually_exclusive(spec in arb_spec()) {
        let payload = project(&spec);
        let wire = serde_json::to_value(&payload).unwrap();
        let obj = wire.as_object().unwrap();

        match spec.scaling {
            Scaling::Fixed { .. } => {
                prop_assert_eq!(&wire["autoscaling"], &serde_json::json!(false));
                prop_assert!(!obj.contains_key("min_size"));
                prop_assert!(!obj.contains_key("max_size"));
            }
            Scaling::Autoscaling { .. } => {
                prop_assert_eq!(&wire["autoscaling"], &serde_json::json!(true));
                prop_assert!(!obj.contains_key("size"));
            }
        }
    }

    /// Reading a projected payload back as a live document always matches.
    #[test]
    fn prop_diff_is_reflexive(spec in arb_spec()) {
        let payload = project(&spec);
        let live = PoolSnapshot::from_value(serde_json::to_value(&payload).unwrap());
        let diff = mismatched_fields(&live, &payload);
        prop_assert!(diff.is_empty(), "unexpected mismatches: {diff:?}");
    }

    /// Permuting the tag list on the live side never changes the verdict.
    #[test]
    fn prop_tag_order_is_insignificant(
        spec in arb_spec(),
        shuffle_seed in any::<u64>(),
    ) {
        let payload = project(&spec);
        let mut live_doc = serde_json::to_value(&payload).unwrap();

        if let Some(tags) = live_doc.get_mut("tags").and_then(Value::as_array_mut) {
            // Deterministic rotation; enough to exercise ordering.
            if !tags.is_empty() {
                let split = (shuffle_seed as usize) % tags.len();
                tags.rotate_left(split);
            }
        }

        let live = PoolSnapshot::from_value(live_doc);
        prop_assert!(matches(&live, &payload));
    }

    /// The extractor is total: any document yields a lowercase token
    /// (possibly empty) and classification never panics.
    #[test]
    fn prop_extractor_is_total(doc in arb_json()) {
        let snapshot = PoolSnapshot::from_value(doc);
        let status = extract_status(&snapshot);
        prop_assert_eq!(status.clone(), status.to_lowercase());
        // Classification must be consistent with a failed token.
        let verdict = classify(&snapshot);
        if ["error", "failed", "degraded"].contains(&status.as_str()) {
            prop_assert_eq!(verdict, Readiness::Failed);
        }
    }

    /// Projection is deterministic: the same spec always yields the same
    /// payload.
    #[test]
    fn prop_projection_is_pure(spec in arb_spec()) {
        prop_assert_eq!(project(&spec), project(&spec));
    }
}
