//! Inline SVG Gantt rendering of a timeline: one row per core, one bar per
//! schedule entry, with a stable per-task palette.
use std::collections::BTreeSet;

use lib::scheduler::ScheduleEntry;

const CHART_WIDTH: i32 = 1000;
const ROW_HEIGHT: i32 = 28;
const ROW_GAP: i32 = 8;
const LEFT_MARGIN: i32 = 72;
const TOP_MARGIN: i32 = 12;

fn task_color(task_index: usize, task_count: usize) -> String {
    let hue = (task_index * 360) / task_count.max(1);
    format!("hsl({}, 65%, 50%)", hue)
}

pub fn render_svg(schedule: &[ScheduleEntry], num_cores: usize) -> String {
    let tasks: Vec<&str> = schedule
        .iter()
        .map(|entry| entry.name.as_str())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .collect();
    let makespan = schedule
        .iter()
        .map(|entry| entry.finish_time)
        .max()
        .unwrap_or(0)
        .max(1);
    let scale = (CHART_WIDTH - LEFT_MARGIN) as f32 / makespan as f32;
    let height = TOP_MARGIN * 2 + num_cores as i32 * (ROW_HEIGHT + ROW_GAP);

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" font-family="sans-serif" font-size="12">"#,
        CHART_WIDTH, height
    );

    for core in 0..num_cores {
        let y = TOP_MARGIN + core as i32 * (ROW_HEIGHT + ROW_GAP);
        svg.push_str(&format!(
            r#"<text x="4" y="{}">Core {}</text>"#,
            y + ROW_HEIGHT / 2 + 4,
            core
        ));
        svg.push_str(&format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="lightgray"/>"#,
            LEFT_MARGIN,
            y + ROW_HEIGHT,
            CHART_WIDTH,
            y + ROW_HEIGHT
        ));
    }

    for entry in schedule {
        let task_index = tasks
            .iter()
            .position(|&task| task == entry.name)
            .unwrap_or(0);
        let x = LEFT_MARGIN + (entry.start_time as f32 * scale) as i32;
        let width = (((entry.finish_time - entry.start_time) as f32) * scale).max(1.0) as i32;
        let y = TOP_MARGIN + entry.core as i32 * (ROW_HEIGHT + ROW_GAP);
        svg.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="black"><title>{} [{}, {})</title></rect>"#,
            x,
            y,
            width,
            ROW_HEIGHT,
            task_color(task_index, tasks.len()),
            entry.name,
            entry.start_time,
            entry.finish_time
        ));
    }

    svg.push_str("</svg>");
    svg
}
