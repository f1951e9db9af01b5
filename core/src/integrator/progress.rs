//! Progress reporting and image metadata

use crate::film::TimeAxis;
use crate::pbrt::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write;
use std::time::SystemTime;

/// Returns a progress bar counting `len` units of work. The bar is hidden
/// when `quiet` is set.
///
/// * `len`   - Total units of work.
/// * `quiet` - Suppress output.
pub fn create_progress_reporter(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");

    let progress = ProgressBar::new(len);
    progress.set_style(style);
    progress
}

/// Builds the `key: value` properties stored after the pixel data of a
/// transient image.
///
/// * `scene_name`        - Name of the scene.
/// * `samples_per_pixel` - Camera samples per pixel.
/// * `time_axis`         - The film's time axis.
/// * `file_info`         - Additional entries, e.g. exporter metadata.
/// * `render_time`       - When the render finished.
pub fn image_properties(
    scene_name: &str,
    samples_per_pixel: usize,
    time_axis: &TimeAxis,
    file_info: &[(String, String)],
    render_time: SystemTime,
) -> String {
    let mut s = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(s, "Renderer: nlos-pbrt {}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(s, "SceneName: {scene_name}");
    let _ = writeln!(s, "RenderTime: {}", format_time(render_time));
    let _ = writeln!(s, "SamplesPerPixel: {samples_per_pixel}");
    let _ = writeln!(s, "TResolution: {}", time_axis.num_bins);
    let _ = writeln!(s, "TMin: {}", time_axis.t_min);
    let _ = writeln!(s, "TMax: {}", time_axis.t_max);
    for (key, value) in file_info {
        let _ = writeln!(s, "{key}: {value}");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn properties_list_render_settings() {
        let axis = TimeAxis::new(64, 0.5, 8.5).unwrap();
        let info = vec![(String::from("BlenderFilename"), String::from("room.blend"))];
        let props = image_properties(
            "room",
            16,
            &axis,
            &info,
            UNIX_EPOCH + Duration::from_secs(1_582_981_509),
        );

        let lines: Vec<&str> = props.lines().collect();
        assert!(lines[0].starts_with("Renderer: nlos-pbrt"));
        assert_eq!(
            &lines[1..],
            &[
                "SceneName: room",
                "RenderTime: 2020-02-29 13:05:09",
                "SamplesPerPixel: 16",
                "TResolution: 64",
                "TMin: 0.5",
                "TMax: 8.5",
                "BlenderFilename: room.blend",
            ]
        );
    }

    #[test]
    fn quiet_progress_is_hidden() {
        assert!(create_progress_reporter(10, true).is_hidden());
    }
}
