use crate::{AppState, error::AppError, pages};
use analytics::{PlayerReport, TeamReport};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{Local, NaiveDate};
use core_types::{DrillAllowList, parse_date};
use datastore::Snapshot;
use injury_risk::{InjuryFeatures, RiskAssessment, assess};
use plan_client::{PlayerAttributes, render_to_pdf};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct TeamReportQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    /// Comma-separated drill names overriding the configured allow-list.
    pub drill: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayerReportQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Either explicit features or a player and day to derive them from.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InjuryRiskRequest {
    Features(InjuryFeatures),
    SessionDay { player: String, date: String },
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| parse_date(s).map_err(|e| AppError::BadRequest(e.to_string())))
        .transpose()
}

/// Loads the tables and runs `f` on a blocking thread.
async fn with_snapshot<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&Snapshot) -> Result<T, AppError> + Send + 'static,
{
    let cache = state.cache.clone();
    tokio::task::spawn_blocking(move || {
        let snapshot = cache.snapshot()?;
        f(&snapshot)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?
}

/// # GET /api/home
pub async fn get_home() -> Json<pages::HomePage> {
    Json(pages::home_page())
}

/// # GET /api/players
pub async fn get_players(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<pages::PlayerListing>>, AppError> {
    let players = with_snapshot(&state, |snapshot| Ok(pages::player_listing(snapshot))).await?;
    Ok(Json(players))
}

/// # GET /api/team-report?from&to&drill
pub async fn get_team_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TeamReportQuery>,
) -> Result<Json<TeamReport>, AppError> {
    let from = optional_date(query.from.as_deref())?;
    let to = optional_date(query.to.as_deref())?;
    let drills = match query.drill.as_deref() {
        Some(list) if !list.trim().is_empty() => {
            DrillAllowList::new(list.split(',').map(str::trim).filter(|d| !d.is_empty()))
        }
        _ => state.analysis.drill_allow_list.clone(),
    };

    let report = with_snapshot(&state, move |snapshot| {
        Ok(pages::team_page(snapshot, from, to, drills, today()))
    })
    .await?;
    Ok(Json(report))
}

/// # GET /api/players/:name/report?from&to
pub async fn get_player_report(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<PlayerReportQuery>,
) -> Result<Json<PlayerReport>, AppError> {
    let from = optional_date(query.from.as_deref())?;
    let to = optional_date(query.to.as_deref())?;
    let report = with_snapshot(&state, move |snapshot| {
        pages::player_page(snapshot, &name, from, to, today())
    })
    .await?;
    Ok(Json(report))
}

/// # POST /api/injury-risk
pub async fn post_injury_risk(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InjuryRiskRequest>,
) -> Result<Json<RiskAssessment>, AppError> {
    let predictor = state
        .predictor
        .clone()
        .ok_or_else(|| AppError::Unavailable("injury risk model is not loaded".to_string()))?;

    let features = match request {
        InjuryRiskRequest::Features(features) => features,
        InjuryRiskRequest::SessionDay { player, date } => {
            let date = parse_date(&date).map_err(|e| AppError::BadRequest(e.to_string()))?;
            with_snapshot(&state, move |snapshot| {
                Ok(InjuryFeatures::from_session_day(
                    &player,
                    date,
                    &snapshot.sessions,
                    &snapshot.wellness,
                )?)
            })
            .await?
        }
    };

    Ok(Json(assess(predictor.as_ref(), &features)?))
}

/// # POST /api/plan
/// Generates a plan and returns it as a PDF download.
pub async fn post_plan(
    State(state): State<Arc<AppState>>,
    Json(attributes): Json<PlayerAttributes>,
) -> Result<Response, AppError> {
    let planner = state
        .planner
        .clone()
        .ok_or_else(|| AppError::Unavailable("plan generator is not configured".to_string()))?;

    let plan = planner.generate(&attributes).await?;
    let pdf = render_to_pdf("Personalized Plan", &plan)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"personalized_plan.pdf\"",
            ),
        ],
        pdf,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{Metric, Section};
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use configuration::{AnalysisConfig, DataSources};
    use core_types::RiskLevel;
    use datastore::SnapshotCache;
    use injury_risk::{FeatureVector, InjuryPredictor, InjuryRiskError};
    use plan_client::{PlanError, PlanGenerator};
    use tempfile::TempDir;

    const GPS: &str = "Player Name,Session Date,Drill Title,Total Distance,Metres Per Minute,Maximum Speed,Explosive Distance,Session Time(mins),Distance Zone 1,Distance Zone 2,Distance Zone 3,Distance Zone 4,Distance Zone 5,Distance Zone 6\n\
Vinicius Junior,2024-09-02,Warm Up,1200,95,27.5,40,12,300,300,300,200,60,40\n\
Vinicius Junior,2024-09-02,Rondo,800,70,22.1,15,11,400,200,100,80,15,5\n\
Jude Bellingham,2024-09-03,Warm Up,1000,90,26.0,30,12,300,300,200,120,50,30\n";
    const WELLNESS: &str = "Player Name,Session Date,Energy,Soreness,Sleep Quality,Stress,Total Score\n\
Vinicius Junior,2024-09-02,7,3,8,2,20\n";
    const ROSTER: &str = "Player Name,DOB,Position,Player Image,International Image,Max Game High Speed Running,Max Game Total Distance\n\
Vinicius Junior,2000-07-12,Forward,vini.png,brazil.png,400,10000\n\
Jude Bellingham,2003-06-29,Midfielder,jude.png,england.png,0,11000\n";
    const CALENDAR: &str = "Date,Activity\n2024-09-02,Training\n2024-09-03,Training\n";

    struct AlwaysHigh;

    impl InjuryPredictor for AlwaysHigh {
        fn predict(&self, _: &FeatureVector) -> Result<RiskLevel, InjuryRiskError> {
            Ok(RiskLevel::High)
        }
    }

    struct CannedPlan;

    #[async_trait]
    impl PlanGenerator for CannedPlan {
        async fn generate(&self, attributes: &PlayerAttributes) -> Result<String, PlanError> {
            Ok(format!("Training Plan\n- BMI {:.1}", attributes.bmi()))
        }
    }

    fn state(dir: &TempDir) -> Arc<AppState> {
        let sources = DataSources {
            calendar: dir.path().join("calendar.csv"),
            gps: dir.path().join("gps.csv"),
            wellness: dir.path().join("wellness.csv"),
            roster: dir.path().join("roster.csv"),
        };
        std::fs::write(&sources.calendar, CALENDAR).unwrap();
        std::fs::write(&sources.gps, GPS).unwrap();
        std::fs::write(&sources.wellness, WELLNESS).unwrap();
        std::fs::write(&sources.roster, ROSTER).unwrap();
        Arc::new(AppState {
            cache: Arc::new(SnapshotCache::new(&sources)),
            analysis: AnalysisConfig::default(),
            predictor: Some(Arc::new(AlwaysHigh)),
            planner: Some(Arc::new(CannedPlan)),
        })
    }

    fn attributes() -> PlayerAttributes {
        PlayerAttributes {
            weight_kg: 73.0,
            height_cm: 176.0,
            energy: 8,
            stress: 2,
            sleep_quality: 7,
            soreness: 3,
            total_distance_km: 10.0,
            high_speed_running_km: 0.7,
            minutes_per_session: 90,
            sprints: 30,
        }
    }

    #[tokio::test]
    async fn team_report_defaults_to_the_full_span() {
        let dir = TempDir::new().unwrap();
        let Json(report) = get_team_report(State(state(&dir)), Query(TeamReportQuery::default()))
            .await
            .unwrap();
        assert_eq!(report.range.start, NaiveDate::from_ymd_opt(2024, 9, 2).unwrap());
        assert_eq!(report.totals.ready().unwrap().total_distance, 3000.0);

        let players = report.players.ready().unwrap();
        let jude = players.iter().find(|p| p.rollup.player == "Jude Bellingham").unwrap();
        assert_eq!(jude.kpis.pct_max_game_high_speed_running, Metric::NotApplicable);
    }

    #[tokio::test]
    async fn team_report_honours_the_drill_query() {
        let dir = TempDir::new().unwrap();
        let query = TeamReportQuery { drill: Some("Rondo".into()), ..Default::default() };
        let Json(report) = get_team_report(State(state(&dir)), Query(query)).await.unwrap();
        assert_eq!(report.totals.ready().unwrap().total_distance, 800.0);
    }

    #[tokio::test]
    async fn bad_dates_are_rejected() {
        let dir = TempDir::new().unwrap();
        let query = TeamReportQuery { from: Some("next tuesday".into()), ..Default::default() };
        let err = get_team_report(State(state(&dir)), Query(query)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn player_report_and_unknown_player() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let Json(report) = get_player_report(
            State(state.clone()),
            Path("Vinicius Junior".to_string()),
            Query(PlayerReportQuery::default()),
        )
        .await
        .unwrap();
        assert_eq!(report.profile.ready().unwrap().position, "Forward");
        assert_eq!(report.sessions.ready().unwrap().len(), 2);
        // A single questionnaire has no spread.
        assert!(matches!(report.energy_zscores, Section::NotApplicable(_)));

        let err = get_player_report(
            State(state),
            Path("Kylian".to_string()),
            Query(PlayerReportQuery::default()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn broken_data_source_is_a_server_error() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        std::fs::write(dir.path().join("roster.csv"), "Player Name\nNobody\n").unwrap();
        let err = get_players(State(state)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn injury_risk_from_features_and_from_a_session_day() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let features = InjuryFeatures {
            total_distance: 2000.0,
            metres_per_minute: 82.5,
            high_speed_running: 120.0,
            energy: 7.0,
            soreness: 3.0,
            stress: 2.0,
        };
        let Json(direct) = post_injury_risk(
            State(state.clone()),
            Json(InjuryRiskRequest::Features(features.clone())),
        )
        .await
        .unwrap();
        assert_eq!(direct.risk, RiskLevel::High);

        let request = InjuryRiskRequest::SessionDay {
            player: "Vinicius Junior".into(),
            date: "02/09/2024".into(),
        };
        let Json(derived) = post_injury_risk(State(state), Json(request)).await.unwrap();
        assert_eq!(derived.features, features);
    }

    #[tokio::test]
    async fn invalid_features_are_unprocessable() {
        let dir = TempDir::new().unwrap();
        let features = InjuryFeatures {
            total_distance: -5.0,
            metres_per_minute: 80.0,
            high_speed_running: 100.0,
            energy: 5.0,
            soreness: 5.0,
            stress: 5.0,
        };
        let err = post_injury_risk(State(state(&dir)), Json(InjuryRiskRequest::Features(features)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn missing_collaborators_are_unavailable() {
        let dir = TempDir::new().unwrap();
        let mut bare = (*state(&dir)).clone();
        bare.predictor = None;
        bare.planner = None;
        let bare = Arc::new(bare);

        let request = InjuryRiskRequest::SessionDay {
            player: "x".into(),
            date: "2024-09-02".into(),
        };
        let err = post_injury_risk(State(bare.clone()), Json(request)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        let err = post_plan(State(bare), Json(attributes())).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn plan_is_returned_as_a_pdf() {
        let dir = TempDir::new().unwrap();
        let response = post_plan(State(state(&dir)), Json(attributes())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"%PDF"));
    }

    #[test]
    fn request_body_shapes() {
        let by_day: InjuryRiskRequest =
            serde_json::from_str(r#"{"player":"Vinicius Junior","date":"2024-09-02"}"#).unwrap();
        assert!(matches!(by_day, InjuryRiskRequest::SessionDay { .. }));
        let explicit: InjuryRiskRequest = serde_json::from_str(
            r#"{"total_distance":1,"metres_per_minute":2,"high_speed_running":3,"energy":4,"soreness":5,"stress":6}"#,
        )
        .unwrap();
        assert!(matches!(explicit, InjuryRiskRequest::Features(_)));
    }
}
