//! Meal-time classification from the hour of day.

use chrono::Timelike;

use crate::nutrition_model::MealTime;

/// Bucket an hour of day into a meal period
///
/// `[6, 12)` is morning, `[12, 18)` midday, everything else evening. Hours
/// outside `0..=23` are treated as evening.
///
/// # Examples
///
/// ```rust
/// use nutrition_coach::meal_time::classify_meal_time;
/// use nutrition_coach::nutrition_model::MealTime;
///
/// assert_eq!(classify_meal_time(7), MealTime::Morning);
/// assert_eq!(classify_meal_time(2), MealTime::Evening);
/// ```
pub fn classify_meal_time(hour: u32) -> MealTime {
    match hour {
        6..=11 => MealTime::Morning,
        12..=17 => MealTime::Midday,
        _ => MealTime::Evening,
    }
}

/// Meal period for any time-of-day value
pub fn meal_time_at<T: Timelike>(time: &T) -> MealTime {
    classify_meal_time(time.hour())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_examples() {
        assert_eq!(classify_meal_time(7), MealTime::Morning);
        assert_eq!(classify_meal_time(13), MealTime::Midday);
        assert_eq!(classify_meal_time(21), MealTime::Evening);
        assert_eq!(classify_meal_time(2), MealTime::Evening);
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(classify_meal_time(5), MealTime::Evening);
        assert_eq!(classify_meal_time(6), MealTime::Morning);
        assert_eq!(classify_meal_time(11), MealTime::Morning);
        assert_eq!(classify_meal_time(12), MealTime::Midday);
        assert_eq!(classify_meal_time(17), MealTime::Midday);
        assert_eq!(classify_meal_time(18), MealTime::Evening);
        assert_eq!(classify_meal_time(23), MealTime::Evening);
        assert_eq!(classify_meal_time(0), MealTime::Evening);
    }

    #[test]
    fn test_partition_of_the_day() {
        let morning = (0..24).filter(|&h| classify_meal_time(h) == MealTime::Morning).count();
        let midday = (0..24).filter(|&h| classify_meal_time(h) == MealTime::Midday).count();
        let evening = (0..24).filter(|&h| classify_meal_time(h) == MealTime::Evening).count();
        assert_eq!((morning, midday, evening), (6, 6, 12));
    }

    #[test]
    fn test_out_of_range_hour_is_evening() {
        assert_eq!(classify_meal_time(24), MealTime::Evening);
        assert_eq!(classify_meal_time(u32::MAX), MealTime::Evening);
    }

    #[test]
    fn test_meal_time_at() {
        let time = NaiveTime::from_hms_opt(12, 30, 0).unwrap();
        assert_eq!(meal_time_at(&time), MealTime::Midday);

        let datetime = NaiveDate::from_ymd_opt(2025, 8, 1)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap();
        assert_eq!(meal_time_at(&datetime), MealTime::Morning);
    }
}
