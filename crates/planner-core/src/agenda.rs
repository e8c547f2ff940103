//! Per-day view over a master schedule.

use chrono::NaiveDate;
use serde::Serialize;

use crate::clock::ClockTime;
use crate::snapshot::MasterSchedule;

/// What kind of entry an agenda line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgendaKind {
    /// A user-entered fixed task.
    Commitment,
    /// A generated work session.
    WorkSession,
    /// An assignment due that day.
    Deadline,
}

/// One line of a day's agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaItem {
    pub kind: AgendaKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<ClockTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<ClockTime>,
}

/// Everything happening on `day`: commitments occurring that day, sessions
/// placed on it, and assignments due on it.
///
/// Timed items come first in start order; untimed commitments follow.
pub fn agenda_for(day: NaiveDate, schedule: &MasterSchedule) -> Vec<AgendaItem> {
    let commitments = schedule
        .fixed_tasks
        .iter()
        .filter(|task| task.occurrence.occurs_on(day))
        .map(|task| AgendaItem {
            kind: AgendaKind::Commitment,
            title: task.title.clone(),
            start: task.time_range.map(|r| r.start()),
            end: task.time_range.map(|r| r.end()),
        });

    let sessions = schedule
        .work_sessions
        .iter()
        .filter(|s| s.date == day)
        .map(|s| AgendaItem {
            kind: AgendaKind::WorkSession,
            title: s.title.clone(),
            start: Some(ClockTime::from(s.start.time())),
            end: Some(ClockTime::from(s.end.time())),
        });

    let deadlines = schedule
        .assignments
        .iter()
        .filter(|a| a.due_at.date() == day)
        .map(|a| AgendaItem {
            kind: AgendaKind::Deadline,
            title: a.title.clone(),
            start: Some(ClockTime::from(a.due_at.time())),
            end: None,
        });

    let mut items: Vec<AgendaItem> = commitments.chain(sessions).chain(deadlines).collect();
    items.sort_by_key(|item| (item.start.is_none(), item.start));
    items
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDateTime, Weekday};

    use super::*;
    use crate::assignment::Assignment;
    use crate::commitment::{FixedTask, FixedTaskRecord};
    use crate::scheduler::{SchedulerConfig, SequentialSessionIds};
    use crate::snapshot::generate_master_schedule;
    use crate::types::{AssignmentId, TaskId};
    use crate::work_hours::WorkHours;

    // 2025-03-03 is a Monday
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn at(h: u32) -> NaiveDateTime {
        monday().and_hms_opt(h, 0, 0).unwrap()
    }

    fn schedule() -> MasterSchedule {
        let records = vec![
            FixedTaskRecord::new(TaskId::new("gym").unwrap(), "Gym")
                .with_times("17:00", "18:00")
                .weekly(&[Weekday::Mon]),
            FixedTaskRecord::new(TaskId::new("lecture").unwrap(), "Lecture")
                .with_times("08:00", "10:00")
                .on_date(monday()),
            FixedTaskRecord::new(TaskId::new("reading").unwrap(), "Reading").on_date(monday()),
            FixedTaskRecord::new(TaskId::new("other").unwrap(), "Tuesday thing")
                .with_times("08:00", "09:00")
                .weekly(&[Weekday::Tue]),
        ];
        let assignments = vec![Assignment::new(
            AssignmentId::new("quiz").unwrap(),
            "Quiz",
            at(21),
        )];
        let hours = WorkHours::parse("08:00", "20:00").unwrap();
        generate_master_schedule(
            &records,
            assignments,
            Some(&hours),
            at(8),
            &SchedulerConfig::default(),
            &mut SequentialSessionIds::new("ws"),
        )
        .unwrap()
    }

    #[test]
    fn agenda_orders_by_start() {
        let items = agenda_for(monday(), &schedule());
        let lines: Vec<String> = items
            .iter()
            .map(|i| {
                format!(
                    "{:?} {} {}",
                    i.kind,
                    i.start.map_or_else(|| "--:--".to_string(), |t| t.to_string()),
                    i.title
                )
            })
            .collect();
        assert_eq!(
            lines,
            vec![
                "Commitment 08:00 Lecture",
                "WorkSession 10:00 Work on Quiz",
                "WorkSession 11:00 Work on Quiz",
                "WorkSession 12:00 Work on Quiz",
                "Commitment 17:00 Gym",
                "Deadline 21:00 Quiz",
                "Commitment --:-- Reading",
            ]
        );
    }

    #[test]
    fn empty_day_has_empty_agenda() {
        let sunday = monday().pred_opt().unwrap();
        assert!(agenda_for(sunday, &schedule()).is_empty());
    }

    #[test]
    fn untimed_tasks_keep_input_order() {
        let mut schedule = schedule();
        schedule.fixed_tasks.push(FixedTask::from_record(
            &FixedTaskRecord::new(TaskId::new("errand").unwrap(), "Errand").on_date(monday()),
        ));
        let titles: Vec<_> = agenda_for(monday(), &schedule)
            .into_iter()
            .filter(|i| i.start.is_none())
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["Reading", "Errand"]);
    }
}
