use super::flatten::{FlatItem, Origin};

/// Assigns every item its indentation-derived level.
///
/// The stack holds the indent of each open level. An item deeper than the
/// innermost open level opens exactly one new level; otherwise it snaps to
/// the deepest open level whose indent does not exceed its own. An item
/// shallower than every open level lands on level 0.
///
/// When an item sits at the same indent as the item before it, a decimal
/// label decides: `1.2` after `1.1` stays on level 1, `2` after `1.1` returns
/// to level 0, and `1.1` after `1` goes one deeper. This is what lets lazy
/// continuation lines (which carry no indentation) nest. Unlabelled
/// CommonMark items fall back to their native nesting depth. Either way the
/// result is at most one level below the previous item.
pub fn assign_levels(items: &mut [FlatItem]) {
    let mut stack: Vec<usize> = Vec::new();
    let mut previous: Option<(usize, usize)> = None;

    for item in items.iter_mut() {
        let indent = item.indent;
        let mut level = match stack.last() {
            None => 0,
            Some(&top) if indent > top => stack.len(),
            Some(_) => stack.iter().rposition(|&i| i <= indent).unwrap_or(0),
        };

        if let Some((prev_indent, prev_level)) = previous
            && prev_indent == indent
            && let Some(depth) = hinted_depth(item)
        {
            level = depth.min(prev_level + 1);
        }

        stack.truncate(level);
        stack.push(indent);
        item.level = level;
        previous = Some((indent, level));
    }
}

fn hinted_depth(item: &FlatItem) -> Option<usize> {
    item.label
        .as_ref()
        .and_then(|l| l.decimal_depth())
        .or(match item.origin {
            Origin::Native { depth } => Some(depth),
            Origin::Line => None,
        })
}
