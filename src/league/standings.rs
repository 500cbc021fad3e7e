//! Standings aggregator.
//!
//! Pure replay of persisted matches + results into a per-team standing.
//! Nothing is cached or persisted; the table can be recomputed at any time
//! from the match rows alone. Points model is fixed: win 3, draw 1, loss 0.

use crate::models::{result_status, Match, MatchResult, Standing};

const POINTS_WIN: u32 = 3;
const POINTS_DRAW: u32 = 1;

/// Compute one team's standing from the given matches.
///
/// Matches without an attached result, matches not in `finished` status,
/// matches the team did not take part in, and cancelled results are all
/// skipped entirely. Status comparisons are trimmed and case-insensitive;
/// both the "cancelled" and "canceled" spellings mark a voided result
/// (the result writer has used both).
pub fn compute_standing(team_id: i64, matches: &[(Match, Option<MatchResult>)]) -> Standing {
    let mut standing = Standing::default();

    for (game, result) in matches {
        let result = match result {
            Some(r) => r,
            None => continue,
        };

        if normalize(&game.status) != "finished" {
            continue;
        }

        let is_home = game.home_team_id == team_id;
        let is_away = game.away_team_id == team_id;
        if !is_home && !is_away {
            continue;
        }

        let outcome = normalize(&result.result_status);
        if outcome == "cancelled" || outcome == "canceled" {
            continue;
        }

        let (scored, conceded) = if is_home {
            (result.home_score, result.away_score)
        } else {
            (result.away_score, result.home_score)
        };

        standing.matches_played += 1;
        standing.goals_for += scored;
        standing.goals_against += conceded;

        if outcome == result_status::DRAW {
            standing.draws += 1;
            standing.points += POINTS_DRAW;
            continue;
        }

        let won = result.winner_team_id == Some(team_id)
            || (outcome == result_status::HOME_WIN && is_home)
            || (outcome == result_status::AWAY_WIN && is_away);

        if won {
            standing.wins += 1;
            standing.points += POINTS_WIN;
        } else {
            standing.losses += 1;
        }
    }

    standing.goal_diff = i64::from(standing.goals_for) - i64::from(standing.goals_against);
    standing
}

fn normalize(status: &str) -> String {
    status.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::match_status;
    use chrono::Utc;

    fn game(id: i64, home: i64, away: i64, status: &str) -> Match {
        Match {
            id,
            league_id: 1,
            home_team_id: home,
            away_team_id: away,
            round: id as u32,
            stage: "regular".to_string(),
            zone: "default".to_string(),
            scheduled_at: Utc::now(),
            status: status.to_string(),
        }
    }

    fn result(
        match_id: i64,
        home_score: u32,
        away_score: u32,
        status: &str,
        winner: Option<i64>,
    ) -> MatchResult {
        MatchResult {
            match_id,
            home_score,
            away_score,
            result_status: status.to_string(),
            winner_team_id: winner,
        }
    }

    #[test]
    fn test_zero_finished_matches_yields_all_zero() {
        let matches = vec![
            (game(1, 10, 20, match_status::SCHEDULED), None),
            (
                game(2, 10, 20, match_status::ONGOING),
                Some(result(2, 1, 0, result_status::HOME_WIN, Some(10))),
            ),
            (
                game(3, 10, 20, match_status::CANCELED),
                Some(result(3, 1, 0, result_status::HOME_WIN, Some(10))),
            ),
        ];
        assert_eq!(compute_standing(10, &matches), Standing::default());
    }

    #[test]
    fn test_win_awards_three_points() {
        let matches = vec![(
            game(1, 10, 20, match_status::FINISHED),
            Some(result(1, 2, 1, result_status::HOME_WIN, Some(10))),
        )];

        let home = compute_standing(10, &matches);
        assert_eq!(home.matches_played, 1);
        assert_eq!(home.wins, 1);
        assert_eq!(home.points, 3);
        assert_eq!(home.goals_for, 2);
        assert_eq!(home.goals_against, 1);
        assert_eq!(home.goal_diff, 1);

        let away = compute_standing(20, &matches);
        assert_eq!(away.losses, 1);
        assert_eq!(away.points, 0);
        assert_eq!(away.goal_diff, -1);
    }

    #[test]
    fn test_draw_awards_one_point_each_with_mirrored_goals() {
        let matches = vec![(
            game(1, 10, 20, match_status::FINISHED),
            Some(result(1, 2, 2, result_status::DRAW, None)),
        )];

        for team in [10, 20] {
            let standing = compute_standing(team, &matches);
            assert_eq!(standing.draws, 1);
            assert_eq!(standing.points, 1);
            assert_eq!(standing.wins, 0);
            assert_eq!(standing.losses, 0);
            assert_eq!(standing.goals_for, 2);
            assert_eq!(standing.goals_against, 2);
            assert_eq!(standing.goal_diff, 0);
        }
    }

    #[test]
    fn test_home_win_without_winner_id_still_credits_home() {
        let matches = vec![(
            game(1, 10, 20, match_status::FINISHED),
            Some(result(1, 1, 0, result_status::HOME_WIN, None)),
        )];

        assert_eq!(compute_standing(10, &matches).points, 3);
        let away = compute_standing(20, &matches);
        assert_eq!(away.losses, 1);
        assert_eq!(away.points, 0);
    }

    #[test]
    fn test_winner_id_decides_regardless_of_orientation() {
        // Result writer set winner_team_id to the away side
        let matches = vec![(
            game(1, 10, 20, match_status::FINISHED),
            Some(result(1, 0, 3, result_status::AWAY_WIN, Some(20))),
        )];

        assert_eq!(compute_standing(20, &matches).wins, 1);
        assert_eq!(compute_standing(10, &matches).losses, 1);
    }

    #[test]
    fn test_both_cancelled_spellings_are_skipped() {
        for spelling in ["cancelled", "canceled", " Cancelled ", "CANCELED"] {
            let matches = vec![(
                game(1, 10, 20, match_status::FINISHED),
                Some(result(1, 3, 0, spelling, Some(10))),
            )];
            let standing = compute_standing(10, &matches);
            assert_eq!(standing.matches_played, 0, "spelling {spelling:?}");
            assert_eq!(standing, Standing::default());
        }
    }

    #[test]
    fn test_status_comparison_tolerates_case_and_whitespace() {
        let matches = vec![(
            game(1, 10, 20, " Finished "),
            Some(result(1, 1, 0, " HOME_WIN ", None)),
        )];
        assert_eq!(compute_standing(10, &matches).wins, 1);
    }

    #[test]
    fn test_non_participant_is_untouched() {
        let matches = vec![(
            game(1, 10, 20, match_status::FINISHED),
            Some(result(1, 1, 0, result_status::HOME_WIN, Some(10))),
        )];
        assert_eq!(compute_standing(99, &matches), Standing::default());
    }

    #[test]
    fn test_mixed_history_accumulates() {
        let matches = vec![
            (
                game(1, 10, 20, match_status::FINISHED),
                Some(result(1, 2, 0, result_status::HOME_WIN, Some(10))),
            ),
            (
                game(2, 20, 10, match_status::FINISHED),
                Some(result(2, 1, 1, result_status::DRAW, None)),
            ),
            (
                game(3, 10, 30, match_status::FINISHED),
                Some(result(3, 0, 2, result_status::AWAY_WIN, Some(30))),
            ),
            // Voided, never counted
            (
                game(4, 10, 30, match_status::FINISHED),
                Some(result(4, 9, 0, "cancelled", Some(10))),
            ),
        ];

        let standing = compute_standing(10, &matches);
        assert_eq!(standing.matches_played, 3);
        assert_eq!(standing.wins, 1);
        assert_eq!(standing.draws, 1);
        assert_eq!(standing.losses, 1);
        assert_eq!(standing.points, 4);
        assert_eq!(standing.goals_for, 3);
        assert_eq!(standing.goals_against, 3);
        assert_eq!(standing.goal_diff, 0);
    }
}
