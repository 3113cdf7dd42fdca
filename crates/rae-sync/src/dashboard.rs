//! Dashboard figures derived from the project and report lists.

use chrono::{Datelike, Local, Months, NaiveDate};
use serde::Serialize;

use rae_core::dates::{in_month, parse_display};
use rae_core::entities::{Project, Report};
use rae_core::enums::{ProjectStatus, SortOrder};

use crate::context::AppContext;
use crate::list::sort_by_order;
use crate::projects::{ProjectsState, StatusCounts};
use crate::reports::ReportsState;
use crate::{Freshness, Refresh};

const RECENT_PROJECTS: usize = 3;
const MONTHS_SHOWN: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    ProjectCreated,
    ProjectUpdated,
    ReportGenerated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub kind: ActivityKind,
    pub id: String,
    pub title: String,
    pub date: String,
    /// Project id or report URL.
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    pub year: i32,
    pub month: u32,
    pub reports: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub total_projects: usize,
    pub projects_in_progress: usize,
    pub total_reports: usize,
    pub reports_this_month: usize,
    pub recent_projects: Vec<Project>,
    pub recent_reports: Vec<Report>,
    pub activity: Vec<Activity>,
    pub status_breakdown: StatusCounts,
    /// Reports per month, oldest month first, ending with `today`'s month.
    pub reports_by_month: Vec<MonthCount>,
}

impl Dashboard {
    /// Compute every figure for the given day.
    pub fn compute(
        projects: &[Project],
        reports: &[Report],
        today: NaiveDate,
        activity_limit: usize,
    ) -> Self {
        let status_breakdown = StatusCounts::tally(projects);

        let mut recent_projects = projects.to_vec();
        sort_by_order(&mut recent_projects, SortOrder::Newest, |p| p.date.as_str(), |p| p.title.as_str());
        recent_projects.truncate(RECENT_PROJECTS);

        let mut recent_reports = reports.to_vec();
        sort_by_order(&mut recent_reports, SortOrder::Newest, |r| r.date.as_str(), |r| r.title.as_str());
        recent_reports.truncate(RECENT_PROJECTS);

        Self {
            total_projects: projects.len(),
            projects_in_progress: status_breakdown.get(ProjectStatus::InProgress),
            total_reports: reports.len(),
            reports_this_month: count_in_month(reports, today.year(), today.month()),
            recent_projects,
            recent_reports,
            activity: activity_feed(projects, reports, activity_limit),
            status_breakdown,
            reports_by_month: (0..MONTHS_SHOWN)
                .rev()
                .filter_map(|back| today.checked_sub_months(Months::new(back)))
                .map(|day| MonthCount {
                    year: day.year(),
                    month: day.month(),
                    reports: count_in_month(reports, day.year(), day.month()),
                })
                .collect(),
        }
    }

    /// Refresh both lists and compute for the local date.
    ///
    /// Returns the dashboard with the freshness of the project and report
    /// lists.
    pub async fn load(ctx: &AppContext) -> (Self, Freshness, Freshness) {
        let mut projects = ProjectsState::new(ctx);
        let mut reports = ReportsState::new(ctx);
        let project_freshness = projects.refresh().await;
        let report_freshness = reports.refresh().await;
        let dashboard = Self::compute(
            projects.raw(),
            reports.raw(),
            Local::now().date_naive(),
            ctx.config.general.recent_limit,
        );
        (dashboard, project_freshness, report_freshness)
    }
}

fn count_in_month(reports: &[Report], year: i32, month: u32) -> usize {
    reports
        .iter()
        .filter(|r| in_month(&r.date, year, month))
        .count()
}

/// Projects then reports, merged newest first. Equal dates keep that order.
fn activity_feed(projects: &[Project], reports: &[Report], limit: usize) -> Vec<Activity> {
    let projects = projects.iter().map(|p| Activity {
        kind: if p.status == ProjectStatus::Draft {
            ActivityKind::ProjectCreated
        } else {
            ActivityKind::ProjectUpdated
        },
        id: p.id.clone(),
        title: p.title.clone(),
        date: p.date.clone(),
        link: Some(p.id.clone()),
    });
    let reports = reports.iter().map(|r| Activity {
        kind: ActivityKind::ReportGenerated,
        id: r.id.clone(),
        title: r.title.clone(),
        date: r.date.clone(),
        link: r.url.clone(),
    });
    let mut feed: Vec<Activity> = projects.chain(reports).collect();
    feed.sort_by(|a, b| parse_display(&b.date).cmp(&parse_display(&a.date)));
    feed.truncate(limit);
    feed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::project;
    use pretty_assertions::assert_eq;

    fn report(id: &str, date: &str) -> Report {
        Report {
            id: id.into(),
            title: format!("Rapport {id}"),
            project_id: None,
            project_name: "Unspecified project".into(),
            client_name: "Unspecified client".into(),
            date: date.into(),
            url: Some(format!("https://files.test/{id}.pdf")),
        }
    }

    fn fixture() -> (Vec<Project>, Vec<Report>) {
        let projects = vec![
            project("p1", "Usine", "Vinci", ProjectStatus::InProgress, "02/05/2025"),
            project("p2", "Campus", "Eiffage", ProjectStatus::Draft, "20/05/2025"),
            project("p3", "Gare", "SNCF", ProjectStatus::InProgress, "15/03/2025"),
            project("p4", "Halle", "Ville", ProjectStatus::Completed, "10/04/2025"),
        ];
        let reports = vec![
            report("r1", "18/05/2025"),
            report("r2", "03/04/2025"),
            report("r3", "pas une date"),
        ];
        (projects, reports)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 21).unwrap()
    }

    #[test]
    fn kpis() {
        let (projects, reports) = fixture();
        let d = Dashboard::compute(&projects, &reports, today(), 5);
        assert_eq!(d.total_projects, 4);
        assert_eq!(d.projects_in_progress, 2);
        assert_eq!(d.total_reports, 3);
        assert_eq!(d.reports_this_month, 1);
        assert_eq!(d.status_breakdown.get(ProjectStatus::Completed), 1);
        let recent: Vec<&str> = d.recent_projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(recent, vec!["p2", "p1", "p4"]);
    }

    #[test]
    fn activity_merges_by_date() {
        let (projects, reports) = fixture();
        let d = Dashboard::compute(&projects, &reports, today(), 4);
        let feed: Vec<(&str, ActivityKind)> =
            d.activity.iter().map(|a| (a.id.as_str(), a.kind)).collect();
        assert_eq!(
            feed,
            vec![
                ("p2", ActivityKind::ProjectCreated),
                ("r1", ActivityKind::ReportGenerated),
                ("p1", ActivityKind::ProjectUpdated),
                ("p4", ActivityKind::ProjectUpdated),
            ]
        );
    }

    #[test]
    fn months_end_with_the_current_one() {
        let (projects, reports) = fixture();
        let d = Dashboard::compute(&projects, &reports, today(), 5);
        let months: Vec<(u32, usize)> = d
            .reports_by_month
            .iter()
            .map(|m| (m.month, m.reports))
            .collect();
        assert_eq!(months, vec![(12, 0), (1, 0), (2, 0), (3, 0), (4, 1), (5, 1)]);
        assert_eq!(d.reports_by_month[0].year, 2024);
    }
}
