use askama::Template;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use crate::models::Workout;

pub const LOADING_HTML: &str = r#"<p class="loading">Loading workouts...</p>"#;
pub const EMPTY_HTML: &str = r#"<p class="empty">No workouts found.</p>"#;
pub const ERROR_HTML: &str = r#"<p class="error">Error loading workouts. Is the API running?</p>"#;

const INVALID_DATE: &str = "Invalid Date";
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

struct CardView {
    date: String,
    exercise_count: u32,
    volume: i64,
    exercises: Vec<TagView>,
}

struct TagView {
    name: String,
    num_sets: u32,
    max_weight: String,
    total_reps: u32,
}

#[derive(Template)]
#[template(path = "history/workout_list.html")]
struct WorkoutListTemplate {
    cards: Vec<CardView>,
}

struct FilterOption<'a> {
    value: &'a str,
    selected: bool,
}

#[derive(Template)]
#[template(path = "history/page.html")]
struct PageTemplate<'a> {
    options: Vec<FilterOption<'a>>,
    all_selected: bool,
    content: &'a str,
}

/// Formats a workout date as `Fri, Mar 15, 2024`.
pub fn format_date(input: &str) -> String {
    format_date_in(input, Tz::UTC)
}

/// Like [`format_date`], converting offset date-times into `tz` first.
/// Unparsable input renders as `Invalid Date`.
pub fn format_date_in(input: &str, tz: Tz) -> String {
    match parse_calendar_date(input, tz) {
        Some(date) => date.format("%a, %b %-d, %Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

fn parse_calendar_date(input: &str, tz: Tz) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Some(datetime.with_timezone(&tz).date_naive());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|datetime| datetime.date())
}

fn card_view(workout: &Workout, tz: Tz) -> CardView {
    CardView {
        date: format_date_in(&workout.workout_date, tz),
        exercise_count: workout.num_exercises,
        volume: workout.total_volume.round() as i64,
        exercises: workout
            .exercises
            .iter()
            .map(|exercise| TagView {
                name: exercise.name.clone(),
                num_sets: exercise.num_sets,
                max_weight: exercise.max_weight.to_string(),
                total_reps: exercise.total_reps,
            })
            .collect(),
    }
}

/// Renders one card per workout, in input order.
pub fn render_workouts(workouts: &[Workout], tz: Tz) -> Result<String, askama::Error> {
    let template = WorkoutListTemplate {
        cards: workouts.iter().map(|w| card_view(w, tz)).collect(),
    };
    template.render()
}

pub fn render_page(users: &[String], filter: &str, content: &str) -> Result<String, askama::Error> {
    let mut options: Vec<FilterOption<'_>> = users
        .iter()
        .map(|user| FilterOption {
            value: user.as_str(),
            selected: user == filter,
        })
        .collect();
    if !filter.is_empty() && !users.iter().any(|user| user == filter) {
        options.push(FilterOption {
            value: filter,
            selected: true,
        });
    }

    PageTemplate {
        options,
        all_selected: filter.is_empty(),
        content,
    }
    .render()
}
