//! The fixed color-step palette shared by the typography and list passes.
//!
//! Steps are 1-based. Number → name wraps modulo the palette length in both
//! directions (`0` is the last color, `23` is the first); name → number is an
//! exact, case-insensitive lookup.

pub const STEP_COLORS: [&str; 22] = [
    "red", "orange", "amber", "yellow", "lime", "green", "emerald", "teal", "cyan", "sky", "blue",
    "indigo", "violet", "purple", "fuchsia", "pink", "rose", "slate", "gray", "zinc", "neutral",
    "stone",
];

pub const STEP_COUNT: i64 = STEP_COLORS.len() as i64;

/// Color name for a step number, wrapping out-of-range numbers.
pub fn get_step_color(step: i64) -> &'static str {
    let index = (step - 1).rem_euclid(STEP_COUNT);
    STEP_COLORS[index as usize]
}

/// 1-based step number of a color name, or `None` for unknown names.
pub fn get_color_step(name: &str) -> Option<i64> {
    STEP_COLORS
        .iter()
        .position(|c| c.eq_ignore_ascii_case(name))
        .map(|ix| ix as i64 + 1)
}

/// The canonical spelling of a known color name.
pub fn canonical_color(name: &str) -> Option<&'static str> {
    STEP_COLORS
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn palette_has_no_duplicates() {
        let mut names = STEP_COLORS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), STEP_COLORS.len());
    }

    #[rstest]
    #[case(1, "red")]
    #[case(22, "stone")]
    #[case(23, "red")]
    #[case(0, "stone")]
    #[case(-21, "red")]
    #[case(45, "red")]
    fn step_lookup_wraps(#[case] step: i64, #[case] color: &str) {
        assert_eq!(get_step_color(step), color);
    }

    #[test]
    fn round_trip_reduces_modulo_palette() {
        for n in -100i64..=100 {
            let expected = (n - 1).rem_euclid(STEP_COUNT) + 1;
            assert_eq!(get_color_step(get_step_color(n)), Some(expected), "n = {n}");
        }
    }

    #[test]
    fn color_lookup_is_case_insensitive() {
        assert_eq!(get_color_step("Teal"), Some(8));
        assert_eq!(canonical_color("TEAL"), Some("teal"));
        assert_eq!(get_color_step("chartreuse"), None);
    }
}
