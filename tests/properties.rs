//! Property-based tests for the tree walk and name translation.
//!
//! Random trees are generated over a small numeric/categorical schema and
//! evaluated against random, possibly incomplete, records.

use std::sync::Arc;

use proptest::collection::{btree_map, vec as prop_vec};
use proptest::prelude::*;

use treeval::repr::{Guard, Operand, Operator, Summary};
use treeval::{
    Field, FieldCatalog, FieldValue, InputRecord, LocalModel, MissingBranches, Node, Optype,
    Predicate,
};

// =============================================================================
// Generators
// =============================================================================

fn schema() -> Vec<Field> {
    vec![
        Field::new("000000", "alpha", Optype::Numeric),
        Field::new("000001", "beta", Optype::Numeric),
        Field::new("000002", "gamma", Optype::Categorical),
        Field::new("000003", "delta", Optype::Datetime),
    ]
}

fn arb_summary() -> impl Strategy<Value = Summary> {
    ("[a-z]{1,6}", 0.0f64..=1.0).prop_map(|(label, confidence)| {
        Summary::new(label.into(), confidence, "generated").unwrap()
    })
}

fn arb_predicate() -> impl Strategy<Value = Predicate> {
    let numeric = (
        prop::sample::select(vec![0usize, 1, 3]),
        prop::sample::select(vec!["<", "<=", "=", "!=", ">=", ">", "<*", ">=*"]),
        -10.0f64..10.0,
    )
        .prop_map(|(field, symbol, operand)| {
            let (op, or_missing) = Operator::parse(symbol).unwrap();
            Predicate::new(&schema()[field], op, Some(Operand::Number(operand.round())), or_missing)
                .unwrap()
        });
    let categorical = (
        prop::sample::select(vec![Operator::Eq, Operator::Ne]),
        prop::sample::select(vec!["red", "green", "blue"]),
    )
        .prop_map(|(op, label)| {
            Predicate::new(&schema()[2], op, Some(Operand::Text(label.into())), false).unwrap()
        });
    prop_oneof![numeric, categorical]
}

fn arb_tree() -> impl Strategy<Value = Node> {
    let leaf = (arb_predicate(), arb_summary())
        .prop_map(|(p, summary)| Node::leaf(Guard::When(p), summary));
    let subtree = leaf.prop_recursive(4, 48, 4, |inner| {
        (arb_predicate(), arb_summary(), prop_vec(inner, 1..4)).prop_map(
            |(p, summary, children)| Node::with_children(Guard::When(p), summary, children),
        )
    });
    (arb_summary(), prop_vec(subtree, 0..4))
        .prop_map(|(summary, children)| Node::with_children(Guard::Always, summary, children))
}

fn arb_value() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        (-12i32..12).prop_map(FieldValue::from),
        prop::sample::select(vec!["red", "green", "blue", "cyan"]).prop_map(FieldValue::from),
        Just(FieldValue::Missing),
    ]
}

fn arb_record() -> impl Strategy<Value = InputRecord> {
    btree_map(
        prop::sample::select(vec!["000000", "000001", "000002", "000003"]),
        arb_value(),
        0..4,
    )
    .prop_map(|m| m.into_iter().collect())
}

fn arb_policy() -> impl Strategy<Value = MissingBranches> {
    prop::sample::select(vec![MissingBranches::Follow, MissingBranches::Ignore])
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prediction_is_a_node_summary_with_valid_confidence(
        tree in arb_tree(),
        record in arb_record(),
        policy in arb_policy(),
    ) {
        let stop = treeval::inference::traverse(&tree, &record, policy);
        let prediction = treeval::inference::predict_tree(&tree, &record, policy);

        prop_assert!((0.0..=1.0).contains(&prediction.confidence));
        prop_assert_eq!(&prediction.value, stop.summary().output());
        prop_assert_eq!(prediction.confidence, stop.summary().confidence());
        prop_assert!(tree.iter().any(|n| std::ptr::eq(n, stop)));
    }

    #[test]
    fn walk_stops_only_at_leaves_or_unmatched_nodes(
        tree in arb_tree(),
        record in arb_record(),
        policy in arb_policy(),
    ) {
        let stop = treeval::inference::traverse(&tree, &record, policy);
        prop_assert!(
            stop.is_leaf()
                || stop.children().iter().all(|c| !c.guard().matches(&record, policy))
        );
        let path = treeval::inference::decision_path(&tree, &record, policy);
        prop_assert!(path.len() <= tree.depth());
    }

    #[test]
    fn prediction_is_deterministic(tree in arb_tree(), record in arb_record()) {
        let first = treeval::inference::predict_tree(&tree, &record, MissingBranches::Follow);
        for _ in 0..4 {
            let again = treeval::inference::predict_tree(&tree, &record, MissingBranches::Follow);
            prop_assert_eq!(&again, &first);
        }
    }

    #[test]
    fn reaching_a_leaf_returns_its_summary(summary in arb_summary(), x in -5i32..5) {
        let field = &schema()[0];
        let always = Predicate::new(field, Operator::Ne, None, false).unwrap();
        let root = Node::with_children(
            Guard::Always,
            Summary::new("root".into(), 0.5, "root").unwrap(),
            vec![Node::leaf(Guard::When(always), summary.clone())],
        );
        let record = InputRecord::new().with("000000", x);
        let p = treeval::inference::predict_tree(&root, &record, MissingBranches::Follow);
        prop_assert_eq!(&p.value, summary.output());
        prop_assert_eq!(p.confidence, summary.confidence());
    }

    #[test]
    fn name_translation_round_trips(
        values in btree_map(prop::sample::select(vec!["alpha", "beta", "gamma", "delta"]), arb_value(), 0..4),
    ) {
        let catalog = FieldCatalog::new(schema());
        let by_name: InputRecord = values.into_iter().collect();
        let by_id = catalog.translate_by_name(by_name.clone());

        prop_assert!(by_id.keys().all(|k| catalog.contains(k)));
        prop_assert_eq!(catalog.to_named(&by_id), by_name);
    }

    #[test]
    fn mixed_name_and_id_keys_translate_deterministically(
        names in btree_map(prop::sample::select(vec!["alpha", "beta", "gamma", "delta"]), arb_value(), 0..4),
        ids in btree_map(prop::sample::select(vec!["000000", "000001", "000002", "000003"]), arb_value(), 0..4),
    ) {
        let catalog = FieldCatalog::new(schema());
        let mixed: InputRecord = names.clone().into_iter().chain(ids.clone()).collect();
        let by_id = catalog.translate_by_name(mixed.clone());

        for _ in 0..4 {
            prop_assert_eq!(&catalog.translate_by_name(mixed.clone()), &by_id);
        }
        for (id, value) in &ids {
            prop_assert_eq!(by_id.entry(id), Some(value));
        }
        for (name, value) in &names {
            let id = catalog.id_for_name(name).unwrap();
            if !ids.contains_key(id.as_str()) {
                prop_assert_eq!(by_id.entry(id), Some(value));
            }
        }
    }

    #[test]
    fn duplicate_names_follow_the_smallest_id(
        values in btree_map(prop::sample::select(vec!["000000", "000001", "000002"]), arb_value(), 1..3),
    ) {
        let catalog: FieldCatalog = ["000002", "000000", "000001"]
            .into_iter()
            .map(|id| Field::new(id, "twin", Optype::Numeric))
            .collect();
        let by_id: InputRecord = values.clone().into_iter().collect();

        let named = catalog.to_named(&by_id);
        let (_, smallest) = values.iter().next().unwrap();
        prop_assert_eq!(named.len(), 1);
        prop_assert_eq!(named.entry("twin"), Some(smallest));

        let back = catalog.translate_by_name(named);
        prop_assert_eq!(back.keys().collect::<Vec<_>>(), vec!["000000"]);
    }
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn concurrent_predictions_share_one_model() {
    let model = Arc::new(LocalModel::from_value(&treeval::testing::two_level_document()).unwrap());
    let expected = model.predict(&InputRecord::new().with("000001", 9).with("000002", "blue"));

    std::thread::scope(|scope| {
        for _ in 0..8 {
            let model = Arc::clone(&model);
            let expected = expected.clone();
            scope.spawn(move || {
                for _ in 0..100 {
                    let p = model.predict(&InputRecord::new().with("000001", 9).with("000002", "blue"));
                    assert_eq!(p, expected);
                }
            });
        }
    });
}
