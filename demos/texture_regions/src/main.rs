use argh::FromArgs;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pcv::image::{Image, ImageSize};
use pcv::imgproc::glcm::{glcm_descriptors, GlcmDirection, GrayLevel};
use pcv::imgproc::region::{connection, partition_regions_by_area, take_max_area_region};

#[derive(FromArgs)]
/// Compute texture descriptors and region statistics on a synthetic image
struct Args {
    /// width of the synthetic image
    #[argh(option, default = "256")]
    width: usize,

    /// height of the synthetic image
    #[argh(option, default = "256")]
    height: usize,

    /// number of gray levels of the co-occurrence matrices
    #[argh(option, default = "64")]
    levels: usize,

    /// number of rectangles drawn in the mask
    #[argh(option, default = "12")]
    blobs: usize,

    /// smallest region area to keep
    #[argh(option, default = "50.0")]
    min_area: f64,

    /// largest region area to keep, unbounded if not set
    #[argh(option)]
    max_area: Option<f64>,

    /// seed of the random generator
    #[argh(option, default = "42")]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let size = ImageSize {
        width: args.width,
        height: args.height,
    };
    let mut rng = StdRng::seed_from_u64(args.seed);

    // horizontal stripes with some noise on top
    let mut gray = Image::<u8, 1>::from_size_val(size, 0)?;
    for (i, v) in gray.as_slice_mut().iter_mut().enumerate() {
        let stripe = if (i / args.width.max(1)) % 8 < 4 {
            64
        } else {
            192
        };
        *v = (stripe + rng.random_range(-32i32..32)) as u8;
    }

    let gray_level = GrayLevel::try_from(args.levels)?;
    for direction in GlcmDirection::ALL {
        let desc = glcm_descriptors(&gray, direction, gray_level)?;
        println!("{desc}\n");
    }

    // filled rectangles of random size and position
    let mut mask = Image::<u8, 1>::from_size_val(size, 0)?;
    for _ in 0..args.blobs {
        let w = rng.random_range(1..=args.width.clamp(1, 48));
        let h = rng.random_range(1..=args.height.clamp(1, 48));
        let x0 = rng.random_range(0..=args.width.saturating_sub(w));
        let y0 = rng.random_range(0..=args.height.saturating_sub(h));
        for y in y0..(y0 + h).min(args.height) {
            for x in x0..(x0 + w).min(args.width) {
                mask.set_pixel(x, y, 0, 255)?;
            }
        }
    }

    let (num_labels, mut regions) = connection(&mask)?;
    println!("{} labels, {} regions", num_labels, regions.len());

    if let Some((label, region)) = take_max_area_region(&mut regions) {
        let rect = region.bounding_rect();
        let rotated = region.min_area_rect();
        println!(
            "largest region {}: area {:.1}, centroid ({:.2}, {:.2}), bounding rect {}x{} at ({}, {}), rotated rect area {:.1} at {:.1}°",
            label,
            region.area(),
            region.centroid().x,
            region.centroid().y,
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            region.min_area_rect_area(),
            rotated.angle,
        );
    }

    let max_area = args.max_area.unwrap_or(f64::INFINITY);
    let (kept, rejected) = partition_regions_by_area(regions, args.min_area, max_area)?;
    log::info!(
        "area range [{}, {}]: {} kept, {} rejected",
        args.min_area,
        max_area,
        kept.len(),
        rejected.len()
    );

    for (label, region) in &kept {
        println!(
            "region {}: area {:.1}, {} contours",
            label,
            region.area(),
            region.contours().len()
        );
    }

    Ok(())
}
