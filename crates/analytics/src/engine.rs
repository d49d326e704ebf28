use crate::error::AnalyticsError;
use crate::filter::{filter_by_drills, filter_by_player, filter_calendar, filter_sessions};
use crate::metric::{percentage, Metric, Section};
use crate::report::{
    ActivityCount, PlayerHighlights, PlayerKpis, PlayerProfile, PlayerReport, PlayerSummary,
    SessionLine, TeamReport, TopSpeed, TrendPoint, WellnessAverage, WorkloadComparison,
};
use crate::rollup::{
    drill_rollups, player_drill_matrix, player_rollups, session_totals, PlayerRollup,
    SessionTotals,
};
use chrono::NaiveDate;
use core_types::{
    CalendarEntry, DateRange, DrillAllowList, RosterEntry, SessionRecord, WellnessRecord,
};
use std::collections::{BTreeMap, HashMap};

/// Borrowed view of the four loaded tables.
#[derive(Debug, Clone, Copy)]
pub struct Tables<'a> {
    pub calendar: &'a [CalendarEntry],
    pub sessions: &'a [SessionRecord],
    pub wellness: &'a [WellnessRecord],
    pub roster: &'a [RosterEntry],
}

impl<'a> Tables<'a> {
    fn roster_entry(&self, player: &str) -> Option<&'a RosterEntry> {
        self.roster.iter().find(|entry| entry.player == player)
    }
}

/// What the team page is asked to show.
#[derive(Debug, Clone)]
pub struct TeamSelection {
    pub range: DateRange,
    pub drills: DrillAllowList,
}

/// What the player page is asked to show.
#[derive(Debug, Clone)]
pub struct PlayerSelection {
    pub player: String,
    pub range: DateRange,
    /// Reference day for the age on the profile card.
    pub today: NaiveDate,
}

/// A stateless calculator turning loaded tables and a selection into reports.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the team page.
    ///
    /// GPS rows are narrowed to the date window and the drill allow-list, then
    /// rolled up in order: session totals, per-player rollups and their KPIs,
    /// per-drill rollups, and the player × drill matrix. Wellness and calendar
    /// rows are narrowed to the same window.
    pub fn team_report(&self, tables: &Tables<'_>, selection: &TeamSelection) -> TeamReport {
        let range = selection.range;
        let in_range = filter_sessions(tables.sessions, range.start, range.end);
        let sessions = filter_by_drills(&in_range, &selection.drills);
        tracing::debug!(rows = sessions.len(), ?range, "Building team report.");

        let totals = session_totals(&sessions);
        let summaries: Vec<PlayerSummary> = player_rollups(&sessions)
            .into_iter()
            .map(|rollup| {
                let kpis = player_kpis(&rollup, &totals, tables.roster_entry(&rollup.player));
                PlayerSummary { rollup, kpis }
            })
            .collect();

        let matrix = player_drill_matrix(&sessions);
        let wellness = filter_sessions(tables.wellness, range.start, range.end);
        let calendar = filter_calendar(tables.calendar, range);

        TeamReport {
            range,
            totals: if totals.rows == 0 {
                Section::NoData
            } else {
                Section::Ready(totals)
            },
            players: Section::non_empty(summaries),
            drills: Section::non_empty(drill_rollups(&sessions)),
            matrix: if matrix.is_empty() {
                Section::NoData
            } else {
                Section::Ready(matrix)
            },
            top_speed: Section::from_result(top_speed(&sessions)),
            wellness: Section::non_empty(wellness_averages(&wellness)),
            activities: Section::non_empty(activity_counts(&calendar)),
        }
    }

    /// Builds the player page. Each section is computed on its own, so an unknown
    /// player fails the profile card while the data sections report `NoData`.
    pub fn player_report(&self, tables: &Tables<'_>, selection: &PlayerSelection) -> PlayerReport {
        let range = selection.range;
        let player = selection.player.as_str();
        let sessions = filter_by_player(
            &filter_sessions(tables.sessions, range.start, range.end),
            player,
        );
        let wellness = filter_by_player(
            &filter_sessions(tables.wellness, range.start, range.end),
            player,
        );
        let roster = tables.roster_entry(player);
        tracing::debug!(
            player,
            sessions = sessions.len(),
            wellness = wellness.len(),
            "Building player report."
        );

        PlayerReport {
            player: player.to_string(),
            range,
            profile: Section::from_result(profile(player, roster, selection.today)),
            highlights: Section::from_result(highlights(&sessions, &wellness)),
            sessions: Section::non_empty(session_lines(&sessions)),
            workload: Section::from_result(workload(&sessions, roster)),
            hsr_trend: Section::non_empty(hsr_trend(&sessions)),
            energy_zscores: Section::from_result(energy_zscores(&wellness)),
            wellness: Section::non_empty(wellness),
        }
    }
}

/// Percentage KPIs for one player. Every ratio is independent: an undefined
/// denominator turns that metric into n/a and leaves the rest untouched.
pub fn player_kpis(
    rollup: &PlayerRollup,
    totals: &SessionTotals,
    roster: Option<&RosterEntry>,
) -> PlayerKpis {
    let max_speed = rollup.max_speed.unwrap_or(0.0);
    PlayerKpis {
        pct_total_distance: percentage(
            rollup.total_distance,
            Some(totals.total_distance),
            "pct_total_distance",
        )
        .into(),
        pct_window_max_speed: percentage(max_speed, totals.max_speed, "pct_window_max_speed")
            .into(),
        pct_season_max_speed: percentage(
            max_speed,
            roster.and_then(|r| r.max_game_speed),
            "pct_season_max_speed",
        )
        .into(),
        pct_max_game_total_distance: percentage(
            rollup.total_distance,
            roster.map(|r| r.max_game_total_distance),
            "pct_max_game_total_distance",
        )
        .into(),
        pct_max_game_high_speed_running: percentage(
            rollup.high_speed_running,
            roster.map(|r| r.max_game_high_speed_running),
            "pct_max_game_high_speed_running",
        )
        .into(),
    }
}

/// The fastest single reading in the set. Ties go to the earliest row.
fn top_speed(sessions: &[SessionRecord]) -> Result<TopSpeed, AnalyticsError> {
    sessions
        .iter()
        .filter(|row| row.max_speed.is_finite())
        .fold(None::<&SessionRecord>, |best, row| match best {
            Some(b) if b.max_speed >= row.max_speed => Some(b),
            _ => Some(row),
        })
        .map(|row| TopSpeed {
            player: row.player.clone(),
            max_speed: row.max_speed,
            session_date: row.session_date,
        })
        .ok_or_else(|| AnalyticsError::EmptySelection("no GPS rows in range".to_string()))
}

fn wellness_averages(rows: &[WellnessRecord]) -> Vec<WellnessAverage> {
    let mut groups: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for row in rows {
        let entry = groups.entry(row.player.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += row.total_score;
    }
    groups
        .into_iter()
        .map(|(player, (entries, sum))| WellnessAverage {
            player: player.to_string(),
            entries,
            mean_total_score: sum / entries as f64,
        })
        .collect()
}

/// Activity labels by descending frequency, ties broken by name.
fn activity_counts(entries: &[CalendarEntry]) -> Vec<ActivityCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.activity.as_str()).or_insert(0) += 1;
    }
    let mut out: Vec<ActivityCount> = counts
        .into_iter()
        .map(|(activity, count)| ActivityCount {
            activity: activity.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.activity.cmp(&b.activity)));
    out
}

fn profile(
    player: &str,
    roster: Option<&RosterEntry>,
    today: NaiveDate,
) -> Result<PlayerProfile, AnalyticsError> {
    let entry = roster.ok_or_else(|| AnalyticsError::UnknownPlayer(player.to_string()))?;
    Ok(PlayerProfile {
        player: entry.player.clone(),
        position: entry.position.clone(),
        age: entry.age_on(today),
        player_image: entry.player_image.clone(),
        international_image: entry.international_image.clone(),
    })
}

fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (count, sum) = values
        .into_iter()
        .fold((0usize, 0.0), |(n, s), v| (n + 1, s + v));
    (count > 0).then(|| sum / count as f64)
}

fn highlights(
    sessions: &[SessionRecord],
    wellness: &[WellnessRecord],
) -> Result<PlayerHighlights, AnalyticsError> {
    let highlights = PlayerHighlights {
        mean_high_speed_running: mean(sessions.iter().map(|s| s.high_speed_running)),
        mean_wellness_score: mean(wellness.iter().map(|w| w.total_score)),
    };
    if highlights.mean_high_speed_running.is_none() && highlights.mean_wellness_score.is_none() {
        return Err(AnalyticsError::EmptySelection(
            "no GPS or wellness rows for player".to_string(),
        ));
    }
    Ok(highlights)
}

fn session_lines(sessions: &[SessionRecord]) -> Vec<SessionLine> {
    sessions
        .iter()
        .map(|s| SessionLine {
            session_date: s.session_date,
            drill: s.drill.clone(),
            total_distance: s.total_distance,
            high_speed_running: s.high_speed_running,
            session_minutes: s.session_minutes,
        })
        .collect()
}

fn workload(
    sessions: &[SessionRecord],
    roster: Option<&RosterEntry>,
) -> Result<WorkloadComparison, AnalyticsError> {
    if sessions.is_empty() {
        return Err(AnalyticsError::EmptySelection("no GPS rows for player".to_string()));
    }
    let total_distance: f64 = sessions.iter().map(|s| s.total_distance).sum();
    let total_hsr: f64 = sessions.iter().map(|s| s.high_speed_running).sum();
    let row_max = |f: fn(&SessionRecord) -> f64| sessions.iter().map(f).reduce(f64::max);

    Ok(WorkloadComparison {
        pct_max_game_high_speed_running: Metric::from(percentage(
            total_hsr,
            roster.map(|r| r.max_game_high_speed_running),
            "pct_max_game_high_speed_running",
        )),
        pct_max_game_total_distance: Metric::from(percentage(
            total_distance,
            roster.map(|r| r.max_game_total_distance),
            "pct_max_game_total_distance",
        )),
        pct_max_total_distance: Metric::from(percentage(
            total_distance,
            row_max(|s| s.total_distance),
            "pct_max_total_distance",
        )),
        pct_max_high_speed_running: Metric::from(percentage(
            total_hsr,
            row_max(|s| s.high_speed_running),
            "pct_max_high_speed_running",
        )),
    })
}

fn hsr_trend(sessions: &[SessionRecord]) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = sessions
        .iter()
        .map(|s| TrendPoint {
            date: s.session_date,
            value: s.high_speed_running,
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// Energy standardised against the player's own window (population standard deviation).
fn energy_zscores(wellness: &[WellnessRecord]) -> Result<Vec<TrendPoint>, AnalyticsError> {
    let mean_energy = mean(wellness.iter().map(|w| w.energy))
        .ok_or_else(|| AnalyticsError::EmptySelection("no wellness rows for player".to_string()))?;
    let variance = wellness
        .iter()
        .map(|w| (w.energy - mean_energy).powi(2))
        .sum::<f64>()
        / wellness.len() as f64;
    let std_dev = variance.sqrt();
    if std_dev == 0.0 || !std_dev.is_finite() {
        return Err(AnalyticsError::DivisionUndefined {
            metric: "energy_zscore".to_string(),
        });
    }

    let mut points: Vec<TrendPoint> = wellness
        .iter()
        .map(|w| TrendPoint {
            date: w.session_date,
            value: (w.energy - mean_energy) / std_dev,
        })
        .collect();
    points.sort_by_key(|p| p.date);
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::DISTANCE_ZONES;
    use proptest::prelude::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    fn session(player: &str, date: NaiveDate, drill: &str, distance: f64) -> SessionRecord {
        SessionRecord {
            player: player.to_string(),
            session_date: date,
            drill: drill.to_string(),
            total_distance: distance,
            metres_per_minute: distance / 10.0,
            max_speed: 20.0 + distance / 100.0,
            explosive_distance: 1.0,
            session_minutes: 10.0,
            zone_distances: [0.0; DISTANCE_ZONES],
            high_speed_running: distance / 20.0,
        }
    }

    fn roster(player: &str, max_td: f64, max_hsr: f64, max_speed: Option<f64>) -> RosterEntry {
        RosterEntry {
            player: player.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2000, 5, 20).unwrap(),
            position: "Forward".to_string(),
            player_image: "a.png".to_string(),
            international_image: "b.png".to_string(),
            max_game_high_speed_running: max_hsr,
            max_game_total_distance: max_td,
            max_game_speed: max_speed,
        }
    }

    fn wellness(player: &str, date: NaiveDate, energy: f64, total: f64) -> WellnessRecord {
        WellnessRecord {
            player: player.to_string(),
            session_date: date,
            energy,
            soreness: 3.0,
            sleep_quality: 7.0,
            stress: 2.0,
            total_score: total,
        }
    }

    struct Fixture {
        calendar: Vec<CalendarEntry>,
        sessions: Vec<SessionRecord>,
        wellness: Vec<WellnessRecord>,
        roster: Vec<RosterEntry>,
    }

    impl Fixture {
        /// Three in-range rows for A (100, 200, 300) and one out-of-range row for B (400).
        fn example() -> Self {
            Self {
                calendar: vec![
                    CalendarEntry {
                        date: day(2),
                        activity: "Training".into(),
                    },
                    CalendarEntry {
                        date: day(3),
                        activity: "Training".into(),
                    },
                    CalendarEntry {
                        date: day(4),
                        activity: "Match".into(),
                    },
                    CalendarEntry {
                        date: day(20),
                        activity: "Recovery".into(),
                    },
                ],
                sessions: vec![
                    session("A", day(2), "Warm Up", 100.0),
                    session("A", day(3), "Rondo", 200.0),
                    session("A", day(4), "Warm Up", 300.0),
                    session("B", day(20), "Warm Up", 400.0),
                ],
                wellness: vec![
                    wellness("A", day(2), 6.0, 18.0),
                    wellness("A", day(3), 8.0, 22.0),
                    wellness("B", day(20), 5.0, 15.0),
                ],
                roster: vec![roster("A", 1200.0, 60.0, Some(30.0)), roster("B", 0.0, 0.0, None)],
            }
        }

        fn tables(&self) -> Tables<'_> {
            Tables {
                calendar: &self.calendar,
                sessions: &self.sessions,
                wellness: &self.wellness,
                roster: &self.roster,
            }
        }
    }

    fn team(range: DateRange) -> TeamSelection {
        TeamSelection {
            range,
            drills: DrillAllowList::default(),
        }
    }

    #[test]
    fn worked_example_excludes_the_out_of_range_player() {
        let fixture = Fixture::example();
        let report = AnalyticsEngine::new()
            .team_report(&fixture.tables(), &team(DateRange::new(day(1), day(10))));

        let totals = report.totals.ready().unwrap();
        assert_eq!(totals.total_distance, 600.0);

        let players = report.players.ready().unwrap();
        assert_eq!(players.len(), 1);
        let a = &players[0];
        assert_eq!(a.rollup.player, "A");
        assert_eq!(a.rollup.total_distance, 600.0);
        assert_eq!(a.kpis.pct_total_distance, Metric::Value(100.0));
        assert_eq!(a.kpis.pct_window_max_speed, Metric::Value(100.0));
        assert_eq!(a.kpis.pct_season_max_speed.value().unwrap(), 23.0 / 30.0 * 100.0);
        assert_eq!(a.kpis.pct_max_game_total_distance, Metric::Value(50.0));
        assert_eq!(a.kpis.pct_max_game_high_speed_running, Metric::Value(50.0));
    }

    #[test]
    fn zero_roster_maximum_is_reported_as_not_applicable() {
        let fixture = Fixture::example();
        let report = AnalyticsEngine::new()
            .team_report(&fixture.tables(), &team(DateRange::new(day(15), day(25))));

        let b = &report.players.ready().unwrap()[0];
        assert_eq!(b.rollup.player, "B");
        assert_eq!(b.kpis.pct_max_game_total_distance, Metric::NotApplicable);
        assert_eq!(b.kpis.pct_max_game_high_speed_running, Metric::NotApplicable);
        assert_eq!(b.kpis.pct_season_max_speed, Metric::NotApplicable);
        // The other KPIs are unaffected.
        assert_eq!(b.kpis.pct_total_distance, Metric::Value(100.0));
    }

    #[test]
    fn inverted_range_renders_no_data_everywhere() {
        let fixture = Fixture::example();
        let report = AnalyticsEngine::new()
            .team_report(&fixture.tables(), &team(DateRange::new(day(10), day(1))));

        assert!(report.totals.is_no_data());
        assert!(report.players.is_no_data());
        assert!(report.drills.is_no_data());
        assert!(report.matrix.is_no_data());
        assert!(report.top_speed.is_no_data());
        assert!(report.wellness.is_no_data());
        assert!(report.activities.is_no_data());
    }

    #[test]
    fn team_report_side_sections() {
        let fixture = Fixture::example();
        let report = AnalyticsEngine::new()
            .team_report(&fixture.tables(), &team(DateRange::new(day(1), day(30))));

        let top = report.top_speed.ready().unwrap();
        assert_eq!(top.player, "B");
        assert_eq!(top.max_speed, 24.0);

        let wellness = report.wellness.ready().unwrap();
        assert_eq!(wellness[0].player, "A");
        assert_eq!(wellness[0].mean_total_score, 20.0);

        let activities = report.activities.ready().unwrap();
        assert_eq!(
            activities[0],
            ActivityCount {
                activity: "Training".into(),
                count: 2,
            }
        );
        assert_eq!(activities[1].activity, "Match");
        assert_eq!(activities[2].activity, "Recovery");

        let drills = report.drills.ready().unwrap();
        assert_eq!(drills.len(), 2);
        let matrix = report.matrix.ready().unwrap();
        assert!(matrix.cell("B", "Rondo").is_none());
    }

    #[test]
    fn drill_allow_list_restricts_the_rollups() {
        let fixture = Fixture::example();
        let selection = TeamSelection {
            range: DateRange::new(day(1), day(10)),
            drills: DrillAllowList::new(["Warm Up"]),
        };
        let report = AnalyticsEngine::new().team_report(&fixture.tables(), &selection);
        assert_eq!(report.totals.ready().unwrap().total_distance, 400.0);
        let drills = report.drills.ready().unwrap();
        assert_eq!(drills.len(), 1);
        assert_eq!(drills[0].drill, "Warm Up");
    }

    #[test]
    fn pipeline_is_idempotent() {
        let fixture = Fixture::example();
        let engine = AnalyticsEngine::new();
        let selection = team(DateRange::new(day(1), day(30)));
        assert_eq!(
            engine.team_report(&fixture.tables(), &selection),
            engine.team_report(&fixture.tables(), &selection)
        );
        let player = PlayerSelection {
            player: "A".into(),
            range: DateRange::new(day(1), day(30)),
            today: day(30),
        };
        assert_eq!(
            engine.player_report(&fixture.tables(), &player),
            engine.player_report(&fixture.tables(), &player)
        );
    }

    #[test]
    fn player_report_sections() {
        let fixture = Fixture::example();
        let selection = PlayerSelection {
            player: "A".into(),
            range: DateRange::new(day(1), day(10)),
            today: NaiveDate::from_ymd_opt(2024, 5, 19).unwrap(),
        };
        let report = AnalyticsEngine::new().player_report(&fixture.tables(), &selection);

        let profile = report.profile.ready().unwrap();
        assert_eq!(profile.age, 23);
        assert_eq!(profile.position, "Forward");

        let highlights = report.highlights.ready().unwrap();
        assert_eq!(highlights.mean_high_speed_running, Some(10.0));
        assert_eq!(highlights.mean_wellness_score, Some(20.0));

        let workload = report.workload.ready().unwrap();
        assert_eq!(workload.pct_max_game_total_distance, Metric::Value(50.0));
        assert_eq!(workload.pct_max_game_high_speed_running, Metric::Value(50.0));
        assert_eq!(workload.pct_max_total_distance, Metric::Value(200.0));
        assert_eq!(workload.pct_max_high_speed_running, Metric::Value(200.0));

        assert_eq!(report.sessions.ready().unwrap().len(), 3);
        let trend = report.hsr_trend.ready().unwrap();
        assert_eq!(trend.first().unwrap().date, day(2));

        let z = report.energy_zscores.ready().unwrap();
        assert_eq!(z[0].value, -1.0);
        assert_eq!(z[1].value, 1.0);
    }

    #[test]
    fn unknown_player_fails_only_the_profile() {
        let fixture = Fixture::example();
        let selection = PlayerSelection {
            player: "a".into(),
            range: DateRange::new(day(1), day(30)),
            today: day(30),
        };
        let report = AnalyticsEngine::new().player_report(&fixture.tables(), &selection);
        assert!(matches!(report.profile, Section::Failed(_)));
        assert!(report.sessions.is_no_data());
        assert!(report.workload.is_no_data());
        assert!(report.energy_zscores.is_no_data());
    }

    #[test]
    fn constant_energy_has_no_zscore() {
        let rows = vec![wellness("A", day(2), 7.0, 20.0), wellness("A", day(3), 7.0, 21.0)];
        assert!(matches!(
            energy_zscores(&rows),
            Err(AnalyticsError::DivisionUndefined { .. })
        ));
    }

    fn arb_sessions() -> impl Strategy<Value = Vec<SessionRecord>> {
        prop::collection::vec((0usize..4, 1u32..28, 0.0f64..5000.0), 1..30).prop_map(|cells| {
            cells
                .into_iter()
                .map(|(p, d, dist)| session(["A", "B", "C", "D"][p], day(d), "Rondo", dist))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn player_totals_add_up_to_the_session_total(
            sessions in arb_sessions(),
            a in 1u32..28,
            b in 1u32..28,
        ) {
            let filtered = filter_sessions(&sessions, day(a), day(b));
            let totals = session_totals(&filtered);
            let summed: f64 = player_rollups(&filtered).iter().map(|p| p.total_distance).sum();
            prop_assert!((summed - totals.total_distance).abs() < 1e-6);
        }

        #[test]
        fn distance_shares_sum_to_one_hundred(sessions in arb_sessions()) {
            let totals = session_totals(&sessions);
            prop_assume!(totals.total_distance > 0.0);
            let share: f64 = player_rollups(&sessions)
                .iter()
                .map(|p| player_kpis(p, &totals, None).pct_total_distance.value().unwrap())
                .sum();
            prop_assert!((share - 100.0).abs() < 1e-6);
        }
    }
}
