//! Scoring module - points, leveling and drop pacing
//!
//! - Every cleared line is worth a flat 100 points (no level multiplier).
//! - Level rises by the number of lines cleared in a settle, capped at 10.
//! - The drop interval is `1000 / level` milliseconds with a 100ms floor.

use crate::types::{BASE_DROP_MS, DROP_INTERVAL_MIN_MS, MAX_LEVEL, POINTS_PER_LINE};

/// Points for clearing `lines` rows in one settle
pub fn line_clear_score(lines: u32) -> u32 {
    lines.saturating_mul(POINTS_PER_LINE)
}

/// Level after clearing `lines` rows at `level`
pub fn next_level(level: u32, lines: u32) -> u32 {
    level.saturating_add(lines).min(MAX_LEVEL)
}

/// Get drop interval for a level (in milliseconds).
/// Level 0 is treated as level 1.
pub fn drop_interval_ms(level: u32) -> u32 {
    (BASE_DROP_MS / level.max(1)).max(DROP_INTERVAL_MIN_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores() {
        assert_eq!(line_clear_score(0), 0);
        assert_eq!(line_clear_score(1), 100);
        assert_eq!(line_clear_score(4), 400);
    }

    #[test]
    fn test_level_progression() {
        assert_eq!(next_level(1, 0), 1);
        assert_eq!(next_level(1, 1), 2);
        assert_eq!(next_level(3, 4), 7);
        assert_eq!(next_level(8, 4), 10); // Cap
        assert_eq!(next_level(10, 1), 10);
    }

    #[test]
    fn test_drop_intervals() {
        assert_eq!(drop_interval_ms(0), 1000);
        assert_eq!(drop_interval_ms(1), 1000);
        assert_eq!(drop_interval_ms(2), 500);
        assert_eq!(drop_interval_ms(3), 333);
        assert_eq!(drop_interval_ms(7), 142);
        assert_eq!(drop_interval_ms(10), 100);
        assert_eq!(drop_interval_ms(50), 100); // Floor
    }
}
