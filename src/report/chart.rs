use std::f64::consts::TAU;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{Report, ReportError};

pub const CHART_TITLE: &str = "Comment Language Distribution";

const WIDTH: u32 = 640;
const HEIGHT: u32 = 520;
const CENTER: (i32, i32) = (320, 280);
const RADIUS: f64 = 190.0;
/// Where the first slice starts, counter-clockwise from three o'clock.
const START_ANGLE_DEG: f64 = 140.0;

const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

fn chart_error<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Chart(e.to_string())
}

/// Point on the circle at `angle` radians, y growing downwards.
fn polar(angle: f64, distance: f64) -> (i32, i32) {
    (
        CENTER.0 + (distance * angle.cos()).round() as i32,
        CENTER.1 - (distance * angle.sin()).round() as i32,
    )
}

fn slice_points(start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = ((sweep * 60.0).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(CENTER);
    for step in 0..=steps {
        points.push(polar(start + sweep * step as f64 / steps as f64, RADIUS));
    }
    points
}

/// Pie chart with one slice per language, as a standalone SVG document.
pub fn render_pie_svg(report: &Report) -> Result<String, ReportError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let centered = Pos::new(HPos::Center, VPos::Center);
        root.draw(&Text::new(
            CHART_TITLE,
            (CENTER.0, 32),
            ("sans-serif", 22).into_font().color(&BLACK).pos(centered),
        ))
        .map_err(chart_error)?;

        let total = report.total() as f64;
        let mut angle = START_ANGLE_DEG.to_radians();

        for (i, row) in report.rows().iter().enumerate() {
            let share = row.count as f64 / total;
            let sweep = share * TAU;
            let color = PALETTE[i % PALETTE.len()];

            let points = slice_points(angle, sweep);
            root.draw(&Polygon::new(points.clone(), color.filled()))
                .map_err(chart_error)?;
            root.draw(&PathElement::new(points, WHITE.stroke_width(2)))
                .map_err(chart_error)?;

            let middle = angle + sweep / 2.0;
            root.draw(&Text::new(
                format!("{:.1}%", row.percentage),
                polar(middle, RADIUS * 0.6),
                ("sans-serif", 14).into_font().color(&BLACK).pos(centered),
            ))
            .map_err(chart_error)?;
            root.draw(&Text::new(
                row.language.to_string(),
                polar(middle, RADIUS * 1.12),
                ("sans-serif", 16).into_font().color(&BLACK).pos(centered),
            ))
            .map_err(chart_error)?;

            angle += sweep;
        }

        root.present().map_err(chart_error)?;
    }
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LanguageLabel;
    use crate::report::LanguageTally;

    #[test]
    fn test_svg_has_slice_labels() {
        let report = ["en", "ko", "en"]
            .into_iter()
            .map(LanguageLabel::from)
            .collect::<LanguageTally>()
            .into_report();

        let svg = render_pie_svg(&report).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains(CHART_TITLE));
        assert!(svg.contains("66.7%"));
        assert!(svg.contains("33.3%"));
        // the SVG backend puts text content on its own line
        assert!(svg.contains("\nen\n</text>"));
        assert!(svg.contains("\nko\n</text>"));
        assert_eq!(svg.matches("<polygon").count(), 2);
    }

    #[test]
    fn test_first_slice_starts_at_start_angle() {
        let points = slice_points(START_ANGLE_DEG.to_radians(), 1.0);
        assert_eq!(points[0], CENTER);
        let expected = polar(START_ANGLE_DEG.to_radians(), RADIUS);
        assert_eq!(points[1], expected);
        // 140 degrees lies up and to the left of the centre
        assert!(expected.0 < CENTER.0 && expected.1 < CENTER.1);
    }
}
