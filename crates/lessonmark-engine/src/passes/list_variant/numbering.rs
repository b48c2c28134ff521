use crate::tree::{ListItemProps, ListProps, ListVariant, Node, NodeKind, keys};

use super::labels::Label;

/// True when any item label anywhere under `list` is a `1.1`-style label.
pub fn has_nested_decimal(list: &Node) -> bool {
    list.children.iter().any(|item| match &item.kind {
        NodeKind::ListItem(props) => {
            props
                .label
                .as_deref()
                .is_some_and(|l| Label::new(l).is_nested_decimal())
                || item
                    .children
                    .iter()
                    .filter(|c| matches!(c.kind, NodeKind::List(_)))
                    .any(has_nested_decimal)
        }
        _ => false,
    })
}

/// Picks the numbering scheme for one list of a tree.
pub fn classify(list: &Node, nested_decimal: bool) -> ListVariant {
    let NodeKind::List(props) = &list.kind else {
        return ListVariant::Plain;
    };
    let labelled = list.children.iter().any(|item| {
        matches!(&item.kind, NodeKind::ListItem(ListItemProps { label: Some(_), .. }))
    });
    if !props.ordered && !labelled {
        ListVariant::Plain
    } else if nested_decimal {
        ListVariant::DecimalNested
    } else if labelled {
        ListVariant::Custom
    } else {
        ListVariant::Plain
    }
}

/// The computed ordinal of the `k`-th item (1-based), before labels apply.
pub fn ordinal(
    variant: ListVariant,
    props: &ListProps,
    k: u64,
    parent_display: Option<&str>,
) -> Option<String> {
    let sequential = props.start.unwrap_or(1) + k - 1;
    match variant {
        ListVariant::Plain if !props.ordered => None,
        ListVariant::Plain | ListVariant::Custom => Some(sequential.to_string()),
        ListVariant::DecimalNested => Some(match parent_display {
            Some(parent) => format!("{parent}.{k}"),
            None => sequential.to_string(),
        }),
    }
}

/// Resolves the shown number: an explicit label that differs from the
/// computed value replaces it and is reported as the custom number.
pub fn resolve(computed: Option<String>, label: Option<&str>) -> (Option<String>, Option<String>) {
    match label {
        Some(label) if computed.as_deref() != Some(label) => {
            (Some(label.to_string()), Some(label.to_string()))
        }
        _ => (computed, None),
    }
}

pub fn annotate_list(list: &mut Node) {
    let NodeKind::List(props) = &list.kind else {
        return;
    };
    let (counter, decimal, variant) = (
        props.counter_id.clone(),
        props.is_decimal,
        props.variant.as_str(),
    );
    let notes = &mut list.annotations;
    match counter {
        Some(id) => notes.insert(keys::COUNTER_ID, id),
        None => {
            notes.remove(keys::COUNTER_ID);
        }
    }
    notes.insert(keys::IS_DECIMAL_LIST, decimal.to_string());
    notes.insert(keys::LIST_VARIANT, variant);
}

pub fn annotate_item(item: &mut Node) {
    let NodeKind::ListItem(props) = &item.kind else {
        return;
    };
    let (level, display, custom) = (
        props.level,
        props.display_number.clone(),
        props.custom_number.clone(),
    );
    let notes = &mut item.annotations;
    notes.insert(keys::LEVEL, level.to_string());
    match display {
        Some(number) => notes.insert(keys::DISPLAY_NUMBER, number),
        None => {
            notes.remove(keys::DISPLAY_NUMBER);
        }
    }
    match custom {
        Some(number) => notes.insert(keys::CUSTOM_NUMBER, number),
        None => {
            notes.remove(keys::CUSTOM_NUMBER);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn props(ordered: bool, start: Option<u64>) -> ListProps {
        ListProps {
            ordered,
            start,
            ..ListProps::default()
        }
    }

    #[rstest]
    #[case(ListVariant::Plain, true, Some(1), 3, None, Some("3"))]
    #[case(ListVariant::Plain, true, Some(5), 2, None, Some("6"))]
    #[case(ListVariant::Plain, false, None, 2, None, None)]
    #[case(ListVariant::DecimalNested, true, None, 2, None, Some("2"))]
    #[case(ListVariant::DecimalNested, true, None, 2, Some("3"), Some("3.2"))]
    #[case(ListVariant::DecimalNested, false, None, 1, Some("1.4"), Some("1.4.1"))]
    #[case(ListVariant::Custom, false, None, 4, None, Some("4"))]
    fn ordinals(
        #[case] variant: ListVariant,
        #[case] ordered: bool,
        #[case] start: Option<u64>,
        #[case] k: u64,
        #[case] parent: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(
            ordinal(variant, &props(ordered, start), k, parent).as_deref(),
            expected
        );
    }

    #[test]
    fn differing_label_becomes_custom_number() {
        assert_eq!(
            resolve(Some("2".into()), Some("b")),
            (Some("b".to_string()), Some("b".to_string()))
        );
        assert_eq!(
            resolve(Some("1.2".into()), Some("1.2")),
            (Some("1.2".to_string()), None)
        );
        assert_eq!(resolve(None, None), (None, None));
    }

    #[test]
    fn annotations_drop_stale_custom_number() {
        let mut item = Node::new(NodeKind::ListItem(ListItemProps {
            level: 1,
            display_number: Some("1.1".into()),
            ..ListItemProps::default()
        }));
        item.annotations.insert(keys::CUSTOM_NUMBER, "x");

        annotate_item(&mut item);

        assert_eq!(item.annotations.get(keys::CUSTOM_NUMBER), None);
        assert_eq!(item.annotations.get(keys::DISPLAY_NUMBER), Some("1.1"));
        assert_eq!(item.annotations.get(keys::LEVEL), Some("1"));
    }
}
