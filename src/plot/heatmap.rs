//! Parameter-set x species heatmaps, one per (condition, observable).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters_svg::SVGBackend;

use crate::plot::{SensitivityFigures, display_title, file_stem};

pub fn draw_heatmaps(figures: &SensitivityFigures<'_>, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let mut written = Vec::new();
    for (l, cond) in figures.conditions.iter().enumerate() {
        for (k, obs) in figures.observables.iter().enumerate() {
            let path = out_dir.join(format!("{}_{}.svg", file_stem(cond), file_stem(obs)));
            draw_matrix(figures, k, l, &path)
                .with_context(|| format!("failed to draw {}", path.display()))?;
            written.push(path);
        }
    }
    Ok(written)
}

fn draw_matrix(figures: &SensitivityFigures<'_>, k: usize, l: usize, path: &Path) -> Result<()> {
    let style = figures.style;
    let coefficients = figures.coefficients;
    let n_sets = figures.paramsets.len();
    let n_species = figures.species.len();

    let mut vmax = 0.0f64;
    for i in 0..n_sets {
        for j in 0..n_species {
            if let Some(v) = coefficients.get(i, j, k, l) {
                vmax = vmax.max(v.abs());
            }
        }
    }
    if vmax == 0.0 {
        vmax = 1.0;
    }

    let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "{} / {} ({})",
                display_title(&figures.observables[k]),
                figures.conditions[l],
                figures.metric
            ),
            ("sans-serif", style.font_size + 4),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(
            (0..n_species).into_segmented(),
            (0..n_sets).into_segmented(),
        )?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n_species)
        .y_labels(n_sets.min(50))
        .x_label_formatter(&|x| {
            if let SegmentValue::CenterOf(idx) = x {
                if let Some(name) = figures.species.get(*idx) {
                    return name.clone();
                }
            }
            String::new()
        })
        .y_label_formatter(&|y| {
            if let SegmentValue::CenterOf(idx) = y {
                if let Some(ordinal) = figures.paramsets.get(*idx) {
                    return ordinal.to_string();
                }
            }
            String::new()
        })
        .x_desc("Perturbed species")
        .y_desc("Parameter set")
        .axis_style(BLACK.stroke_width(style.stroke()))
        .label_style(("sans-serif", style.font_size))
        .draw()?;

    chart.draw_series(
        (0..n_sets)
            .flat_map(|i| (0..n_species).map(move |j| (i, j)))
            .filter_map(|(i, j)| {
                let v = coefficients.get(i, j, k, l)?;
                Some(Rectangle::new(
                    [
                        (SegmentValue::Exact(j), SegmentValue::Exact(i)),
                        (SegmentValue::Exact(j + 1), SegmentValue::Exact(i + 1)),
                    ],
                    diverging_color(v / vmax).filled(),
                ))
            }),
    )?;

    root.draw(&Text::new(
        format!("|max| = {:.3}", vmax),
        (style.width as i32 - 160, 20),
        ("sans-serif", style.font_size).into_font().color(&BLACK),
    ))?;

    root.present()?;
    Ok(())
}

/// Blue (-1) through white (0) to red (+1).
pub fn diverging_color(value: f64) -> RGBColor {
    let v = value.clamp(-1.0, 1.0);
    if v < 0.0 {
        let t = v + 1.0;
        RGBColor((255.0 * t) as u8, (255.0 * t) as u8, 255)
    } else {
        let t = v;
        RGBColor(255, (255.0 * (1.0 - t)) as u8, (255.0 * (1.0 - t)) as u8)
    }
}
