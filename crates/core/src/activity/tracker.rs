use crate::domain::DailyActivity;
use chrono::NaiveDate;

/// Records one review event against `activity` for calendar day `today`
/// (already resolved to the learner's timezone by the caller). Returns
/// `true` the moment `today_count` first reaches `daily_goal`; subsequent
/// reviews the same day return `false` even though the goal remains met.
pub fn record_review(activity: &mut DailyActivity, today: NaiveDate, daily_goal: u32) -> bool {
    let is_first_review_today = activity.today_day != Some(today);

    if is_first_review_today {
        let streak_continues = activity
            .last_active_day
            .map(|day| day == today.pred_opt().expect("NaiveDate underflow"))
            .unwrap_or(false);

        activity.streak = if streak_continues { activity.streak + 1 } else { 1 };
        activity.today_count = 1;
        activity.today_day = Some(today);
        activity.last_active_day = Some(today);
    } else {
        activity.today_count += 1;
    }

    activity.today_count == daily_goal
}
