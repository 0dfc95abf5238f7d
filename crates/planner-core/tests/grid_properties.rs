use chrono::{Datelike, NaiveDate};
use planner_core::{
    MonthBoard, Task, TaskIndex, WeekStart, YearMonth, build_grid_for, tasks_for_day,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn months() -> impl Iterator<Item = YearMonth> {
    [1900, 1999, 2000, 2015, 2024, 2100]
        .into_iter()
        .flat_map(|year| (1..=12).map(move |month| YearMonth::new(year, month).expect("month")))
}

fn week_starts() -> impl Iterator<Item = WeekStart> {
    (0..7).map(|index| WeekStart::from_index(index).expect("week start"))
}

/// Deterministic pseudo-random tasks spread over 2024.
fn scattered_tasks(count: usize) -> Vec<Task> {
    let mut seed: u64 = 0x5eed;
    (0..count)
        .map(|n| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let offset = (seed >> 33) % 366;
            let day = date(2024, 1, 1) + chrono::Duration::days(offset as i64);
            Task::new(format!("t{n}"), format!("task {n}"), &day.format("%Y-%m-%d").to_string())
                .expect("task")
                .with_completed(n % 3 == 0)
        })
        .collect()
}

#[test]
fn grids_are_whole_contiguous_weeks() {
    for month in months() {
        for week_start in week_starts() {
            let grid = build_grid_for(month, month.first_day(), week_start).expect("grid");
            let cells: Vec<_> = grid.cells().collect();

            assert_eq!(cells.len() % 7, 0, "{month} {week_start}");
            assert!((4..=6).contains(&grid.week_count()), "{month} {week_start}");
            assert_eq!(cells[0].date().weekday(), week_start.weekday());

            for pair in cells.windows(2) {
                assert_eq!(pair[1].date() - pair[0].date(), chrono::Duration::days(1));
            }
            for week in grid.weeks() {
                assert_eq!(week.cells().len(), 7);
            }

            let in_month = cells.iter().filter(|cell| cell.in_current_month()).count();
            assert_eq!(in_month as u32, month.days_in_month(), "{month} {week_start}");
            for cell in &cells {
                assert_eq!(cell.in_current_month(), month.contains(cell.date()));
                assert_eq!(cell.key().as_str(), cell.date().format("%Y-%m-%d").to_string());
            }
        }
    }
}

#[test]
fn today_appears_at_most_once() {
    for month in months() {
        let now = month.first_day() + chrono::Duration::days(14);
        let grid = build_grid_for(month, now, WeekStart::SUNDAY).expect("grid");
        let flagged: Vec<_> = grid.cells().filter(|cell| cell.is_today()).collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].date(), now);

        let far = build_grid_for(month, date(1700, 6, 1), WeekStart::SUNDAY).expect("grid");
        assert!(far.cells().all(|cell| !cell.is_today()));
    }
}

#[test]
fn index_partitions_every_task_exactly_once() {
    let tasks = scattered_tasks(400);
    let index = TaskIndex::build(&tasks);

    let total: usize = index.days().into_iter().map(|key| index.count(key)).sum();
    assert_eq!(total, tasks.len());

    let mut month_total = 0;
    for month in 1..=12 {
        let month = YearMonth::new(2024, month).expect("month");
        let grid = build_grid_for(month, date(2024, 6, 1), WeekStart::MONDAY).expect("grid");
        let board = MonthBoard::new(&grid, &index);

        let expected: Vec<&str> = tasks
            .iter()
            .filter(|task| month.contains(task.date().date()))
            .map(|task| task.id().as_str())
            .collect();
        let mut got: Vec<&str> = board.month_tasks().iter().map(|task| task.id().as_str()).collect();
        let mut expected_sorted = expected.clone();
        got.sort_unstable();
        expected_sorted.sort_unstable();
        assert_eq!(got, expected_sorted, "{month}");

        let stats = board.stats();
        assert_eq!(stats.total, expected.len());
        assert_eq!(stats.completed + stats.pending, stats.total);
        month_total += stats.total;
    }
    assert_eq!(month_total, tasks.len());
}

#[test]
fn lookup_keeps_input_order_and_rebuild_is_idempotent() {
    let tasks = scattered_tasks(250);
    let first = TaskIndex::build(&tasks);
    let second = TaskIndex::build(&tasks);

    fn ids(index: &TaskIndex<'_>, day: NaiveDate) -> Vec<String> {
        tasks_for_day(index, day).iter().map(|task| task.id().to_string()).collect()
    }

    for day in date(2024, 1, 1).iter_days().take(366) {
        let expected: Vec<String> = tasks
            .iter()
            .filter(|task| task.date().date() == day)
            .map(|task| task.id().to_string())
            .collect();

        assert_eq!(ids(&first, day), expected);
        assert_eq!(ids(&second, day), expected);
    }
}

#[test]
fn incremental_maintenance_matches_rebuild() {
    let tasks = scattered_tasks(120);
    let moved: Vec<Task> = tasks
        .iter()
        .step_by(7)
        .map(|task| {
            let mut copy = task.clone();
            let next = task.date().date() + chrono::Duration::days(3);
            let draft = planner_core::TaskDraft {
                title: copy.title().to_string(),
                description: String::new(),
                date: next.format("%Y-%m-%d").to_string(),
                subject_id: None,
            };
            copy.apply(draft).expect("apply");
            copy
        })
        .collect();
    let extra = Task::new("late", "added later", "2024-07-04").expect("task");

    let mut index = TaskIndex::build(&tasks);
    for task in &moved {
        index.update(task);
    }
    for task in tasks.iter().skip(3).step_by(11) {
        index.remove(task.id());
    }
    index.add(&extra);

    let removed: Vec<&str> = tasks.iter().skip(3).step_by(11).map(|task| task.id().as_str()).collect();
    let mut collection: Vec<Task> = tasks
        .iter()
        .map(|task| {
            moved
                .iter()
                .find(|candidate| candidate.id() == task.id())
                .cloned()
                .unwrap_or_else(|| task.clone())
        })
        .filter(|task| !removed.contains(&task.id().as_str()))
        .collect();
    collection.push(extra.clone());
    let rebuilt = TaskIndex::build(&collection);

    assert_eq!(index.len(), rebuilt.len());
    for day in date(2024, 1, 1).iter_days().take(400) {
        let left: Vec<&str> = tasks_for_day(&index, day).iter().map(|task| task.id().as_str()).collect();
        let right: Vec<&str> = tasks_for_day(&rebuilt, day).iter().map(|task| task.id().as_str()).collect();
        assert_eq!(left, right, "{day}");
    }
}
