// Final ordering of merged rows.

use std::cmp::Ordering;

use crate::valuation::merge::MergedRow;

/// Sort descending by per-game composite, then per-36 composite.
///
/// A missing per-36 score ranks below any present one. The sort is stable,
/// so full ties keep their input order.
pub fn rank(mut rows: Vec<MergedRow>) -> Vec<MergedRow> {
    rows.sort_by(compare_rows);
    rows
}

fn compare_rows(a: &MergedRow, b: &MergedRow) -> Ordering {
    b.zscore_per_game
        .total_cmp(&a.zscore_per_game)
        .then_with(|| match (a.zscore_per_36, b.zscore_per_36) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, pergame: f64, per36: Option<f64>) -> MergedRow {
        MergedRow {
            player_id: id,
            player_name: format!("Player {id}"),
            age: 25.0,
            games_played: 70.0,
            minutes: 30.0,
            zscore_per_game: pergame,
            zscore_per_36: per36,
            zscore_diff: per36.map(|s| s - pergame),
        }
    }

    fn ids(rows: &[MergedRow]) -> Vec<i64> {
        rows.iter().map(|r| r.player_id).collect()
    }

    #[test]
    fn sorts_by_per_game_descending() {
        let ranked = rank(vec![
            row(1, -1.0, Some(0.0)),
            row(2, 3.0, Some(0.0)),
            row(3, 0.5, Some(0.0)),
        ]);
        assert_eq!(ids(&ranked), vec![2, 3, 1]);
    }

    #[test]
    fn per_36_breaks_ties() {
        let ranked = rank(vec![
            row(1, 1.0, Some(0.2)),
            row(2, 1.0, Some(0.9)),
            row(3, 1.0, Some(-4.0)),
        ]);
        assert_eq!(ids(&ranked), vec![2, 1, 3]);
    }

    #[test]
    fn missing_per_36_sorts_last_within_tie() {
        let ranked = rank(vec![row(1, 1.0, None), row(2, 1.0, Some(-10.0))]);
        assert_eq!(ids(&ranked), vec![2, 1]);
    }

    #[test]
    fn full_ties_keep_input_order() {
        let input = vec![row(5, 0.0, Some(0.0)), row(3, 0.0, Some(0.0)), row(4, 0.0, Some(0.0))];
        assert_eq!(ids(&rank(input.clone())), vec![5, 3, 4]);
        assert_eq!(rank(input.clone()), rank(input));
    }

    #[test]
    fn output_is_non_increasing() {
        let ranked = rank(vec![
            row(1, 0.3, Some(1.0)),
            row(2, -2.0, Some(5.0)),
            row(3, 0.3, Some(2.0)),
            row(4, 4.1, None),
            row(5, -0.7, Some(-1.0)),
        ]);
        for pair in ranked.windows(2) {
            assert_ne!(compare_rows(&pair[0], &pair[1]), Ordering::Greater);
        }
        assert_eq!(ids(&ranked), vec![4, 3, 1, 5, 2]);
    }
}
