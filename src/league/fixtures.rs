//! Double round-robin schedule builder.
//!
//! Pure: takes the active team roster and an invocation time, returns the
//! full fixture list. Persistence and the lifecycle guard live in the
//! storage layer; this module only decides who plays whom and when.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

/// Matches per calendar window (four kickoff slots per day).
const SLOTS_PER_DAY: usize = 4;

/// Kickoff hours for slots 0..2; slot 3 rolls over to 00:00 the next day.
const SLOT_HOURS: [u32; 3] = [18, 20, 22];

/// One generated fixture, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSlot {
    pub home_team_id: i64,
    pub away_team_id: i64,
    /// 1-based sequence number in shuffled order
    pub round: u32,
    pub scheduled_at: DateTime<Utc>,
}

/// Build the full double round-robin schedule for the given teams.
///
/// Every unordered pair of teams yields two directed fixtures (home/away
/// swapped), so `N` teams produce exactly `N * (N - 1)` fixtures. The list
/// is shuffled with a uniform permutation to avoid predictable adjacency,
/// then renumbered and slotted onto the calendar starting the day after
/// `now`.
pub fn build_schedule<R: Rng + ?Sized>(
    team_ids: &[i64],
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<FixtureSlot> {
    let mut pairs: Vec<(i64, i64)> = Vec::with_capacity(team_ids.len() * team_ids.len());
    for (i, &home) in team_ids.iter().enumerate() {
        for &away in team_ids.iter().skip(i + 1) {
            pairs.push((home, away));
            pairs.push((away, home));
        }
    }

    pairs.shuffle(rng);

    pairs
        .into_iter()
        .enumerate()
        .map(|(idx, (home, away))| FixtureSlot {
            home_team_id: home,
            away_team_id: away,
            round: idx as u32 + 1,
            scheduled_at: slot_time(now, idx),
        })
        .collect()
}

/// Calendar slot for the fixture at 0-based position `idx`.
///
/// Window 0 is the day after `now` (time-of-day discarded). Each window
/// holds four fixtures: 18:00, 20:00, 22:00, then 00:00 of the following
/// date, so a match day effectively runs until the small hours.
pub fn slot_time(now: DateTime<Utc>, idx: usize) -> DateTime<Utc> {
    let window = (idx / SLOTS_PER_DAY) as i64;
    let slot = idx % SLOTS_PER_DAY;

    let base_date = (now + Duration::days(1)).date_naive() + Duration::days(window);

    let (date, hour) = match slot {
        s @ 0..=2 => (base_date, SLOT_HOURS[s]),
        _ => (base_date + Duration::days(1), 0),
    };

    // Fixed wall-clock hours, always representable.
    let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    date.and_time(time).and_utc()
}
