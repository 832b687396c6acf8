use chrono::NaiveDate;
use log::info;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use crate::config::ChartParameters;
use crate::errors::ChartError;
use crate::series::ElementSeries;

/// Returns the relative path of a chart image
///
/// # Arguments
///
/// * 'tables_dir' - directory holding the chart images
/// * 'date' - the run date
/// * 'key' - canonical element key
/// * 'index' - position of the location in the forecast document
pub fn artifact_path(tables_dir: &str, date: NaiveDate, key: &str, index: usize) -> String {
    format!("{}/{}_{}_{}.png", tables_dir.trim_end_matches('/'), date.format("%Y-%m-%d"), key, index)
}

/// Returns the chart caption for an element at a location
pub fn chart_title(location: &str, element: &str) -> String {
    format!("{} 每小時{}變化", location, element)
}

/// Renders a line chart of an element series and saves it as a png image.
/// The x axis is categorical, one tick per sample, and every point is annotated with its value.
///
/// The tables directory must exist, it is never created here.
///
/// # Arguments
///
/// * 'params' - image size and font
/// * 'tables_dir' - directory to save the image in
/// * 'date' - the run date, part of the file name
/// * 'location' - location name for the caption
/// * 'series' - the series to plot
/// * 'index' - position of the location, part of the file name
pub fn plot_table(params: &ChartParameters, tables_dir: &str, date: NaiveDate, location: &str,
                  series: &ElementSeries, index: usize) -> Result<String, ChartError> {

    let save_link = artifact_path(tables_dir, date, &series.key, index);
    draw_line_chart(params, &save_link, &chart_title(location, &series.name), series)?;
    info!("Chart saved to {}", save_link);

    Ok(save_link)
}

/// Returns y axis bounds with some head room above the highest point for its label
fn value_range(values: &[i64]) -> (i64, i64) {
    match (values.iter().min(), values.iter().max()) {
        (Some(&min), Some(&max)) => {
            let pad = (max.saturating_sub(min) / 10).max(1);
            (min.saturating_sub(pad), max.saturating_add(pad.saturating_mul(2)))
        }
        _ => (0, 1),
    }
}

fn draw_line_chart(params: &ChartParameters, path: &str, title: &str, series: &ElementSeries) -> Result<(), ChartError> {
    let font = params.font_family.as_str();
    let height = params.height.max(1) as f64;
    let labels = series.labels();
    let count = labels.len() as i32;
    let (y_min, y_max) = value_range(&series.values());

    let points: Vec<(SegmentValue<i32>, i64)> = series.samples
        .iter()
        .enumerate()
        .map(|(i, s)| (SegmentValue::CenterOf(i as i32), s.value))
        .collect();

    let root = BitMapBackend::new(path, (params.width, params.height)).into_drawing_area();
    root.fill(&BLACK)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (font, height / 25.0).into_font().color(&WHITE))
        .margin((height / 40.0) as i32)
        .x_label_area_size((height / 8.0) as i32)
        .y_label_area_size((height / 10.0) as i32)
        .build_cartesian_2d((0..count.max(1)).into_segmented(), y_min..y_max)?;

    let label_font = (font, height / 50.0).into_font();
    chart
        .configure_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                labels.get(*i as usize).map(|l| l.to_string()).unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .x_desc("時 (Hour)")
        .y_desc(series.name.as_str())
        .axis_style(WHITE)
        .bold_line_style(WHITE.mix(0.25))
        .light_line_style(TRANSPARENT)
        .label_style(label_font.color(&WHITE))
        .axis_desc_style(label_font.color(&WHITE))
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().cloned(), CYAN.stroke_width(2)))?;

    let value_style = (font, height / 45.0)
        .into_font()
        .color(&WHITE)
        .pos(Pos::new(HPos::Center, VPos::Bottom));

    chart.draw_series(PointSeries::of_element(
        points.iter().cloned(),
        5,
        CYAN,
        &|c: (SegmentValue<i32>, i64), s: i32, st: ShapeStyle| {
            EmptyElement::at(c.clone())
                + Circle::new((0, 0), s, st.filled())
                + Text::new(c.1.to_string(), (0, -s - 4), value_style.clone())
        },
    ))?;

    root.present()?;

    Ok(())
}
