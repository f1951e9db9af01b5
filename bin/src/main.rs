#[macro_use]
extern crate log;

mod scene;

use cameras::PerspectiveCamera;
use env_logger::Env;
use filters::create_filter;
use integrators::TransientPathIntegrator;
use log::LevelFilter;
use nlos_core::app::OPTIONS;
use nlos_core::camera::ArcCamera;
use nlos_core::film::TransientFilm;
use nlos_core::integrator::*;
use nlos_core::paramset::ParamSet;
use nlos_core::sampler::ArcSampler;
use nlos_core::scene::Scene;
use nlos_core::transient_image::*;
use samplers::RandomSampler;
use scene::NlosScene;
use std::sync::Arc;

fn main() {
    // Initialize `env_logger`.
    init_logger();

    if let Err(e) = run() {
        error!("{e}");
        std::process::exit(1);
    }
}

/// `--quiet` and `--verbose` take precedence over `RUST_LOG`.
fn init_logger() {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if OPTIONS.quiet {
        builder.filter_level(LevelFilter::Error);
    } else if OPTIONS.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn run() -> Result<(), String> {
    if !OPTIONS.info_files.is_empty() {
        for filename in OPTIONS.info_files.iter() {
            print_info(filename)?;
        }
        return Ok(());
    }
    render()
}

fn render() -> Result<(), String> {
    let nlos = NlosScene::new()?;

    let filter = create_filter("box", &ParamSet::new());

    let mut film_params = scene::film_params();
    OPTIONS.apply_to_film(&mut film_params);
    let film = TransientFilm::from((&film_params, filter))
        .with_pixel_interpretation(nlos.pixel_interpretation);

    let camera: ArcCamera = Arc::new(PerspectiveCamera::from((&nlos.camera_params(), film)));

    let mut sampler_params = scene::sampler_params();
    OPTIONS.apply_to_sampler(&mut sampler_params);
    let sampler: ArcSampler = Arc::new(RandomSampler::from(&sampler_params));

    let mut integrator_params = scene::integrator_params();
    OPTIONS.apply_to_integrator(&mut integrator_params);
    let mut integrator = TransientPathIntegrator::from((&integrator_params, sampler, camera));

    let scene = Scene::new(nlos.primitives, nlos.lights);
    if scene.nlos.is_none() {
        warn!("Scene has no NLOS objects");
    }
    integrator.preprocess(&scene);

    let mut scheduler = TileScheduler::new(
        OPTIONS.tile_size,
        OPTIONS.threads(),
        OPTIONS.seed,
        scene::SCENE_NAME,
    );
    scheduler.quiet = OPTIONS.quiet;
    scheduler
        .file_info
        .push((String::from("Seed"), OPTIONS.seed.to_string()));

    let result = scheduler
        .render(&integrator, &scene)
        .map_err(|e| e.to_string())?;
    info!(
        "Rendered '{}' in {:.2?}: {} tiles at {} spp, {} rejected and {} discarded samples",
        result.scene_name,
        result.elapsed,
        result.tile_count,
        result.samples_per_pixel,
        result.rejected_samples,
        result.discarded_samples,
    );
    info!("Transient image written to '{}'", result.output_file);

    if let Some(preview) = OPTIONS.preview_file.as_ref() {
        integrator
            .get_data()
            .camera
            .get_data()
            .film
            .write_preview(preview)?;
        info!("Preview written to '{preview}'");
    }

    Ok(())
}

/// Prints the header of a transient image file of any supported version.
///
/// * `filename` - The file.
fn print_info(filename: &str) -> Result<(), String> {
    let version = read_file_version(filename).map_err(|e| e.to_string())?;
    let image = match version {
        CURRENT_FILE_VERSION => TransientImage::read_file(filename),
        _ => LegacyTransientImage::read_file(filename).map(TransientImage::from),
    }
    .map_err(|e| e.to_string())?;

    let h = &image.header;
    let pi = &image.pixel_interpretation;
    println!("{filename}: TI{version:02}");
    println!(
        "  pixels:     {} x {} ({} total)",
        pi.u_resolution, pi.v_resolution, h.num_pixels
    );
    println!(
        "  time bins:  {} starting at {} with width {}",
        h.num_bins, h.t_min, h.t_delta
    );
    if version == CURRENT_FILE_VERSION {
        println!("  top left:     {:?}", pi.top_left);
        println!("  top right:    {:?}", pi.top_right);
        println!("  bottom left:  {:?}", pi.bottom_left);
        println!("  bottom right: {:?}", pi.bottom_right);
        println!("  laser:        {:?}", pi.laser_position);
    }

    let properties = image.properties();
    if !properties.is_empty() {
        println!("  properties:");
        for line in properties.lines() {
            println!("    {line}");
        }
    }
    Ok(())
}
