//! Application related stuff

use crate::film::{DEFAULT_RESOLUTION, DEFAULT_TIME_RESOLUTION};
use crate::paramset::ParamSet;
use crate::pbrt::*;
use clap::Parser;

lazy_static! {
    /// The global application options.
    pub static ref OPTIONS: Options = Options::parse();
}

/// System wide options.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Transient NLOS renderer", long_about = None)]
pub struct Options {
    /// Number of threads to use for rendering.
    #[arg(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = 0,
        help = "Use specified number of threads for rendering (0 uses all logical CPUs)."
    )]
    n_threads: usize,

    /// Path to the transient image file.
    #[arg(
        long = "outfile",
        short = 'o',
        value_name = "FILE",
        help = "Write the final transient image to the given filename."
    )]
    pub image_file: Option<String>,

    /// Automatically reduce a number of quality settings to render more quickly.
    #[arg(
        long = "quick",
        help = "Automatically reduce a number of quality settings to render more quickly."
    )]
    pub quick_render: bool,

    /// Suppress all text output other than error messages.
    #[arg(long, help = "Suppress all text output other than error messages.")]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long, help = "Print debug messages.", conflicts_with = "quiet")]
    pub verbose: bool,

    /// Tile size.
    #[arg(
        long = "tilesize",
        short = 'p',
        value_name = "NUM",
        default_value_t = 16,
        help = "Size in pixels of square tiles rendered per thread."
    )]
    pub tile_size: usize,

    /// The crop window x0, x1, y0, y1.
    #[arg(
        long = "cropwindow",
        short = 'c',
        value_name = "FLOAT",
        num_args = 4,
        help = "Specify an image crop window (x0 x1 y0 y1)."
    )]
    pub crop_window: Vec<Float>,

    /// Seed mixed into every tile's sampler.
    #[arg(long, value_name = "NUM", default_value_t = 0, help = "Global random seed.")]
    pub seed: u64,

    /// Samples per pixel.
    #[arg(long, value_name = "NUM", help = "Number of samples per pixel.")]
    pub spp: Option<Int>,

    /// Maximum path depth.
    #[arg(long = "maxdepth", value_name = "NUM", help = "Maximum number of bounces.")]
    pub max_depth: Option<Int>,

    /// Number of time bins.
    #[arg(long = "tresolution", value_name = "NUM", help = "Number of time bins.")]
    pub t_resolution: Option<Int>,

    /// Start of the time axis.
    #[arg(long = "tmin", value_name = "FLOAT", help = "Start of the recorded time window.")]
    pub t_min: Option<Float>,

    /// End of the time axis.
    #[arg(long = "tmax", value_name = "FLOAT", help = "End of the recorded time window.")]
    pub t_max: Option<Float>,

    /// Spatial resolution x, y.
    #[arg(
        long = "resolution",
        value_name = "NUM",
        num_args = 2,
        help = "Spatial image resolution (x y)."
    )]
    pub resolution: Vec<Int>,

    /// Do not count the segment from the camera to the first hit.
    #[arg(
        long = "ignore-distance-to-camera",
        help = "Exclude the camera to first hit distance from the time of flight."
    )]
    pub ignore_distance_to_camera: bool,

    /// Light sampling strategy.
    #[arg(
        long = "lightsamplestrategy",
        value_name = "NAME",
        help = "Light selection strategy: uniform, power or spatial."
    )]
    pub light_sample_strategy: Option<String>,

    /// Path to the PNG preview.
    #[arg(
        long = "preview",
        value_name = "FILE",
        help = "Also write a PNG of the time-integrated image."
    )]
    pub preview_file: Option<String>,

    /// Transient images to inspect.
    #[arg(
        long = "info",
        value_name = "FILE",
        num_args = 1..,
        help = "Print the headers of transient image files and exit."
    )]
    pub info_files: Vec<String>,
}

impl Options {
    /// Returns the number of threads to use. Zero selects all logical CPUs.
    pub fn threads(&self) -> usize {
        let max_threads = num_cpus::get();
        match self.n_threads {
            0 => max_threads,
            n if n > max_threads => {
                warn!("Num threads > max logical CPUs {}", max_threads);
                max_threads
            }
            n => n,
        }
    }

    /// Apply the command line film settings to the film parameters.
    ///
    /// * `params` - Film parameters.
    pub fn apply_to_film(&self, params: &mut ParamSet) {
        if let [x, y] = self.resolution[..] {
            params.add_int("xresolution", &[x]);
            params.add_int("yresolution", &[y]);
        }
        if let Some(tres) = self.t_resolution {
            params.add_int("tresolution", &[tres]);
        }
        if let Some(t_min) = self.t_min {
            params.add_float("t_min", &[t_min]);
        }
        if let Some(t_max) = self.t_max {
            params.add_float("t_max", &[t_max]);
        }
        if !self.crop_window.is_empty() {
            params.add_float("cropwindow", &self.crop_window);
        }

        if self.quick_render {
            for (name, default) in [
                ("xresolution", DEFAULT_RESOLUTION),
                ("yresolution", DEFAULT_RESOLUTION),
                ("tresolution", DEFAULT_TIME_RESOLUTION),
            ] {
                let v = params.find_one_int(name, default);
                params.add_int(name, &[max(1, v / 4)]);
            }
        }

        if let Some(image_file) = self.image_file.as_ref() {
            let filename = params.find_one_string("filename", String::new());
            if filename.is_empty() {
                params.add_string("filename", &[image_file.clone()]);
            } else {
                warn!(
                    "Output filename supplied on command line, '{image_file}', ignored \
                     due to filename provided in scene description, '{filename}'."
                );
            }
        }
    }

    /// Apply the command line integrator settings to the integrator
    /// parameters.
    ///
    /// * `params` - Integrator parameters.
    pub fn apply_to_integrator(&self, params: &mut ParamSet) {
        if let Some(max_depth) = self.max_depth {
            params.add_int("maxdepth", &[max_depth]);
        }
        if self.ignore_distance_to_camera {
            params.add_bool("ignoreDistanceToCamera", &[true]);
        }
        if let Some(strategy) = self.light_sample_strategy.as_ref() {
            params.add_string("lightsamplestrategy", &[strategy.clone()]);
        }
    }

    /// Apply the command line sampler settings to the sampler parameters.
    ///
    /// * `params` - Sampler parameters.
    pub fn apply_to_sampler(&self, params: &mut ParamSet) {
        if let Some(spp) = self.spp {
            params.add_int("pixelsamples", &[spp]);
        }
        if self.quick_render {
            params.add_int("pixelsamples", &[1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Options {
        Options::parse_from(std::iter::once("nlos-pbrt").chain(args.iter().copied()))
    }

    #[test]
    fn quick_divides_resolutions() {
        let options = parse(&["--quick", "--resolution", "64", "6"]);
        let mut params = ParamSet::new();
        options.apply_to_film(&mut params);

        assert_eq!(params.find_one_int("xresolution", 0), 16);
        assert_eq!(params.find_one_int("yresolution", 0), 1);
        assert_eq!(params.find_one_int("tresolution", 0), DEFAULT_TIME_RESOLUTION / 4);
    }

    #[test]
    fn outfile_fills_missing_filename() {
        let options = parse(&["-o", "out.ti"]);
        let mut params = ParamSet::new();
        options.apply_to_film(&mut params);
        assert_eq!(params.find_one_string("filename", String::new()), "out.ti");

        let mut params = ParamSet::new();
        params.add_string("filename", &[String::from("scene.ti")]);
        options.apply_to_film(&mut params);
        assert_eq!(params.find_one_string("filename", String::new()), "scene.ti");
    }

    #[test]
    fn time_axis_and_crop_window() {
        let options = parse(&["--tmin", "1.5", "--tmax", "9", "--cropwindow", "0", "0.5", "0.25", "1"]);
        let mut params = ParamSet::new();
        options.apply_to_film(&mut params);

        assert_eq!(params.find_one_float("t_min", 0.0), 1.5);
        assert_eq!(params.find_one_float("t_max", 0.0), 9.0);
        assert_eq!(params.find_float("cropwindow"), vec![0.0, 0.5, 0.25, 1.0]);
    }

    #[test]
    fn integrator_flags() {
        let options = parse(&["--maxdepth", "3", "--ignore-distance-to-camera"]);
        let mut params = ParamSet::new();
        options.apply_to_integrator(&mut params);
        assert_eq!(params.find_one_int("maxdepth", 5), 3);
        assert!(params.find_one_bool("ignoreDistanceToCamera", false));
        assert_eq!(params.find_one_string("lightsamplestrategy", String::from("spatial")), "spatial");
    }

    #[test]
    fn thread_count_is_clamped() {
        let options = parse(&["-t", "100000"]);
        assert_eq!(options.threads(), num_cpus::get());
        assert_eq!(parse(&[]).threads(), num_cpus::get());
    }
}
