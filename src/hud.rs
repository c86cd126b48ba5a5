//! Pure helpers for presenting health and run time

use crate::consts::PLAYER_MAX_HEALTH;

/// Hit points shown by one heart
pub const POINTS_PER_HEART: i32 = 2;

/// Number of hearts in the health bar
pub const HEART_COUNT: usize = (PLAYER_MAX_HEALTH / POINTS_PER_HEART) as usize;

/// Fill level of each heart: 0 empty, 1 half, 2 full
pub fn hearts(health: i32) -> [u8; HEART_COUNT] {
    let mut fill = [0u8; HEART_COUNT];
    for (i, heart) in fill.iter_mut().enumerate() {
        let points = (health - i as i32 * POINTS_PER_HEART).clamp(0, POINTS_PER_HEART);
        *heart = points as u8;
    }
    fill
}

/// Run time as `m:ss`
pub fn format_elapsed(ms: f64) -> String {
    let total_secs = (ms.max(0.0) / 1000.0).floor() as u64;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hearts() {
        assert_eq!(hearts(10), [2, 2, 2, 2, 2]);
        assert_eq!(hearts(7), [2, 2, 2, 1, 0]);
        assert_eq!(hearts(1), [1, 0, 0, 0, 0]);
        assert_eq!(hearts(0), [0; 5]);
        assert_eq!(hearts(-4), [0; 5]);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0.0), "0:00");
        assert_eq!(format_elapsed(9_999.0), "0:09");
        assert_eq!(format_elapsed(61_000.0), "1:01");
        assert_eq!(format_elapsed(754_321.0), "12:34");
    }
}
