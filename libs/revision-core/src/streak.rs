//! Consecutive-day study streaks.

use chrono::NaiveDate;

/// Current streak from study dates sorted newest first, one per day.
///
/// The streak is anchored at `today` or, if nothing was studied today yet,
/// at yesterday. Anything older means the streak is broken and returns 0.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let Some(&latest) = dates.first() else {
        return 0;
    };

    let yesterday = today.pred_opt();
    let mut expected = if latest == today {
        today
    } else if Some(latest) == yesterday {
        latest
    } else {
        return 0;
    };

    let mut streak = 0;
    for &date in dates {
        if date != expected {
            break;
        }
        streak += 1;
        match expected.pred_opt() {
            Some(prev) => expected = prev,
            None => break,
        }
    }

    streak
}
