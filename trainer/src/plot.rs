use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use machine_learning::{
    dataset::Dataset,
    feature::{Feature, LABEL},
};
use ndarray::ArrayView1;
use plotters::{
    prelude::*,
    style::{FontStyle, register_font},
};

use crate::{Result, TrainerErr};

const SIZE: (u32, u32) = (1200, 800);
const FONT_FAMILY: &str = "sans-serif";
const FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

static FONT_REGISTERED: OnceLock<bool> = OnceLock::new();

/// Makes the embedded font available to plotters, once per process.
fn ensure_font(path: &Path) -> Result<()> {
    let registered = *FONT_REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT).is_ok());

    if registered {
        Ok(())
    } else {
        Err(TrainerErr::Plot {
            path: path.to_path_buf(),
            msg: "the embedded font could not be loaded".to_string(),
        })
    }
}

/// Where the scatter plot of `feature` against the label is written.
pub fn scatter_plot_path(dir: &Path, feature: Feature) -> PathBuf {
    dir.join(format!(
        "scatter_plot_{}_vs_{LABEL}.png",
        feature.column_name()
    ))
}

/// Draws one scatter plot per feature against the label.
///
/// # Arguments
/// * `dataset` - The data to plot.
/// * `dir` - An existing directory the images are written to.
///
/// # Returns
/// The written paths, in canonical feature order.
pub(crate) fn scatter_plots(dataset: &Dataset, dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(TrainerErr::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("figures directory {} does not exist", dir.display()),
        )));
    }

    Feature::ALL
        .iter()
        .map(|&feature| {
            let path = scatter_plot_path(dir, feature);
            draw_scatter(
                dataset.column(feature),
                dataset.targets(),
                feature.column_name(),
                &path,
            )?;
            log::debug!("wrote {}", path.display());
            Ok(path)
        })
        .collect()
}

fn draw_scatter(x: ArrayView1<f64>, y: ArrayView1<f64>, name: &str, path: &Path) -> Result<()> {
    let err = |e: &dyn Display| TrainerErr::Plot {
        path: path.to_path_buf(),
        msg: e.to_string(),
    };

    ensure_font(path)?;
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| err(&e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Scatter plot between {name} and {LABEL}"),
            (FONT_FAMILY, 28),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(bounds(x), bounds(y))
        .map_err(|e| err(&e))?;

    chart
        .configure_mesh()
        .x_desc(name)
        .y_desc(LABEL)
        .label_style((FONT_FAMILY, 16))
        .draw()
        .map_err(|e| err(&e))?;

    chart
        .draw_series(
            x.iter()
                .zip(y.iter())
                .map(|(&a, &b)| Circle::new((a, b), 3, BLUE.mix(0.5).filled())),
        )
        .map_err(|e| err(&e))?;

    root.present().map_err(|e| err(&e))
}

/// Axis range covering every value, padded so points never sit on the border.
fn bounds(values: ArrayView1<f64>) -> std::ops::Range<f64> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }

    let pad = if max > min { (max - min) * 0.05 } else { 0.5 };
    (min - pad)..(max + pad)
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn path_is_named_after_the_feature() {
        let path = scatter_plot_path(Path::new("figs"), Feature::FreeSulfurDioxide);
        assert_eq!(
            path,
            Path::new("figs/scatter_plot_free sulfur dioxide_vs_quality.png")
        );
    }

    #[test]
    fn scatter_is_drawn_with_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scatter.png");
        let x = array![7.4, 7.8, 11.2, 6.7];
        let y = array![5.0, 5.0, 6.0, 5.0];

        draw_scatter(x.view(), y.view(), "fixed acidity", &path).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), SIZE);

        // The caption band above the plotting area holds the only dark pixels there.
        let caption_has_ink = (0..SIZE.0)
            .flat_map(|x| (0..60).map(move |y| (x, y)))
            .any(|(x, y)| img.get_pixel(x, y).0.iter().all(|&c| c < 128));
        assert!(caption_has_ink);
    }

    #[test]
    fn bounds_pad_the_range() {
        let r = bounds(array![0.0, 10.0].view());
        assert_eq!(r, -0.5..10.5);

        let r = bounds(array![3.0, 3.0].view());
        assert_eq!(r, 2.5..3.5);

        let empty: [f64; 0] = [];
        assert_eq!(bounds(ArrayView1::from(&empty)), 0.0..1.0);
    }
}
