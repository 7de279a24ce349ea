use crate::request::Plan;
use anyhow::Error as AnyError;
use coverage::{GeodeticPoint, LocalFrame, Waypoint};
use std::io::Write;
use textplots::{Chart, Plot, Shape};

/// # Example with gnuplot
///
/// ```sh
/// cargo run -- plan demos/area.json csv | tail -n +2 | tr ',' ' ' > ~/.tmp/plan && gnuplot -p -e "plot '~/.tmp/plan' using 3:2 with linespoints"
/// ```
pub fn print_csv(waypoints: &[Waypoint]) -> Result<(), AnyError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "Index,Latitude,Longitude,Altitude")?;
    for (
        idx,
        Waypoint {
            latitude,
            longitude,
            altitude,
        },
    ) in waypoints.iter().enumerate()
    {
        writeln!(stdout, "{idx},{latitude},{longitude},{altitude}")?;
    }
    Ok(())
}

pub fn print_json(plan: &Plan) -> Result<(), AnyError> {
    let json = serde_json::to_string(plan)?;
    println!("{json}");
    Ok(())
}

/// Plots the flight path in meters east and north of its first
/// waypoint.
pub fn plot_ascii(waypoints: &[Waypoint]) {
    let Some(first) = waypoints.first() else {
        return;
    };
    let frame = LocalFrame::new(first.latitude, first.longitude);
    let path: Vec<(f32, f32)> = waypoints
        .iter()
        .map(|wp| {
            let xy = frame.to_planar(&GeodeticPoint::new(wp.latitude, wp.longitude));
            (xy.x as f32, xy.y as f32)
        })
        .collect();
    let (min_x, max_x) = path
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), (x, _)| {
            (lo.min(*x), hi.max(*x))
        });
    Chart::new(200, 100, min_x, max_x.max(min_x + 1.0))
        .lineplot(&Shape::Lines(&path))
        .display();
}
