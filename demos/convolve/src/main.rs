use std::path::PathBuf;
use std::time::Instant;

use argh::FromArgs;

use convfilter_imgproc::{filter2d, kernel::presets, Kernel3};
use convfilter_io::{read_image, write_image_png};

#[derive(FromArgs)]
/// Apply a 3x3 convolution kernel to an image and report the elapsed time
struct Args {
    /// path to the input image (jpg, png or bmp)
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to write the filtered image (png)
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// nine comma-separated integer weights, row major, or a preset name
    /// (identity, box, gaussian, sharpen, laplacian, emboss)
    #[argh(option, short = 'k')]
    kernel: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    // the kernel must parse before anything else runs; a malformed kernel
    // aborts the whole operation and the filter is never invoked
    let kernel = match presets::by_name(&args.kernel) {
        Some(kernel) => kernel,
        None => args.kernel.parse::<Kernel3>()?,
    };
    log::info!(
        "kernel {:?}, weight sum {}, normalization {}",
        kernel.weights(),
        kernel.weight_sum(),
        kernel.normalization()
    );

    let image = read_image(&args.input)?;
    log::info!(
        "loaded {} ({}x{}, {:?})",
        args.input.display(),
        image.width(),
        image.height(),
        image.format()
    );

    let start = Instant::now();
    let filtered = filter2d(&image, &kernel)?;
    let elapsed = start.elapsed();

    println!("{}ms", elapsed.as_millis());

    write_image_png(&args.output, &filtered)?;
    log::info!("wrote {}", args.output.display());

    Ok(())
}
