//! Grouped bar charts: one figure per observable, species on x, one bar
//! per condition. Bar height is the mean over parameter sets, the error bar
//! the sample standard deviation. Undefined coefficients are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_svg::SVGBackend;

use crate::math::stats::{nan_mean, nan_std};
use crate::plot::{SensitivityFigures, display_title, file_stem};

#[derive(Debug, Clone, Copy)]
struct Bar {
    condition: usize,
    left: f64,
    right: f64,
    mean: f64,
    sd: Option<f64>,
}

pub fn draw_barplots(figures: &SensitivityFigures<'_>, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let mut written = Vec::with_capacity(figures.observables.len());
    for (k, obs) in figures.observables.iter().enumerate() {
        let path = out_dir.join(format!("{}.svg", file_stem(obs)));
        draw_observable(figures, k, &path)
            .with_context(|| format!("failed to draw {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

fn layout_bars(figures: &SensitivityFigures<'_>, k: usize) -> Vec<Bar> {
    let n_cond = figures.conditions.len();
    let width = figures.style.bar_width.min(0.9 / n_cond.max(1) as f64);
    let group = width * n_cond as f64;
    let mut bars = Vec::new();
    for j in 0..figures.species.len() {
        for l in 0..n_cond {
            let values = figures.coefficients.across_sets(j, k, l);
            let Some(mean) = nan_mean(&values) else {
                continue;
            };
            let left = j as f64 + 0.5 - group / 2.0 + l as f64 * width;
            bars.push(Bar {
                condition: l,
                left,
                right: left + width,
                mean,
                sd: nan_std(&values),
            });
        }
    }
    bars
}

fn draw_observable(figures: &SensitivityFigures<'_>, k: usize, path: &Path) -> Result<()> {
    let style = figures.style;
    let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let title = display_title(&figures.observables[k]);
    let bars = layout_bars(figures, k);
    if bars.is_empty() {
        root.draw(&Text::new(
            format!("{}: no defined coefficients", title),
            ((style.width / 2) as i32, (style.height / 2) as i32),
            ("sans-serif", style.font_size).into_font().color(&BLACK),
        ))?;
        root.present()?;
        return Ok(());
    }

    let (lo, hi) = bars.iter().fold((0.0f64, 0.0f64), |(lo, hi), b| {
        let sd = b.sd.unwrap_or(0.0);
        (lo.min(b.mean - sd), hi.max(b.mean + sd))
    });
    let pad = ((hi - lo) * 0.1).max(1e-3);
    let (y_min, y_max) = (lo - pad, hi + pad);
    let n_species = figures.species.len() as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} ({})", title, figures.metric),
            ("sans-serif", style.font_size + 4),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..n_species, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|_| String::new())
        .y_desc("Sensitivity coefficient")
        .axis_style(BLACK.stroke_width(style.stroke()))
        .label_style(("sans-serif", style.font_size))
        .draw()?;

    let colors = style.condition_colors(figures.conditions.len());
    for (l, cond) in figures.conditions.iter().enumerate() {
        let color = colors[l];
        chart
            .draw_series(
                bars.iter()
                    .filter(|b| b.condition == l)
                    .map(|b| Rectangle::new([(b.left, 0.0), (b.right, b.mean)], color.filled())),
            )?
            .label(cond.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart.draw_series(
        bars.iter()
            .filter_map(|b| b.sd.map(|sd| (b, sd)))
            .flat_map(|(b, sd)| {
                let c = 0.5 * (b.left + b.right);
                let cap = 0.25 * (b.right - b.left);
                let (y0, y1) = (b.mean - sd, b.mean + sd);
                [
                    PathElement::new(vec![(c, y0), (c, y1)], BLACK.stroke_width(1)),
                    PathElement::new(vec![(c - cap, y0), (c + cap, y0)], BLACK.stroke_width(1)),
                    PathElement::new(vec![(c - cap, y1), (c + cap, y1)], BLACK.stroke_width(1)),
                ]
            }),
    )?;

    chart.draw_series(LineSeries::new(
        vec![(0.0, 0.0), (n_species, 0.0)],
        &BLACK,
    ))?;

    chart
        .configure_series_labels()
        .position(style.legend.into())
        .label_font(("sans-serif", style.font_size))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    let label_style = TextStyle::from(("sans-serif", style.font_size).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    let (_, axis_y) = chart.backend_coord(&(0.0, y_min));
    for (j, name) in figures.species.iter().enumerate() {
        let (x, _) = chart.backend_coord(&(j as f64 + 0.5, y_min));
        root.draw(&Text::new(name.clone(), (x, axis_y + 8), label_style.clone()))?;
    }

    root.present()?;
    Ok(())
}
