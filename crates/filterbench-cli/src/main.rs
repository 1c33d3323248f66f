//! Benchmark CLI: time every kernel across every execution strategy and
//! write the result images.
//!
//! Usage: `filterbench <input-image> <output-dir> [rounds]`
//!
//! Exit codes: 0 success, 1 wrong arguments, 2 invalid input path,
//! 3 invalid output path, 4 unreadable/unsupported input image, 5 failed
//! to write an output image. Negative values are reserved for "no
//! compatible device".

use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::Parser;
use filterbench_core::{
    codec, DevicePointerExecutor, Executor, GpuContext, HostExecutor, Kernel, MorphMask,
    PixelBuffer, StagedExecutor,
};

const DEFAULT_ROUNDS: u64 = 1000;

const EXIT_BAD_ARGS: i32 = 1;
const EXIT_BAD_INPUT_PATH: i32 = 2;
const EXIT_BAD_OUTPUT_PATH: i32 = 3;
const EXIT_UNREADABLE_IMAGE: i32 = 4;
const EXIT_WRITE_FAILED: i32 = 5;
const EXIT_NO_DEVICE: i32 = -1;

#[derive(Parser)]
#[command(name = "filterbench")]
#[command(version, about = "Benchmark pixel kernels across execution strategies", long_about = None)]
struct Cli {
    /// Input image (8-bit PNG)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Directory for result images
    #[arg(value_name = "OUTPUT_DIR")]
    output: PathBuf,

    /// Timed repetitions per kernel and strategy (non-negative integer)
    #[arg(value_name = "ROUNDS")]
    rounds: Option<String>,
}

fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{}", e);
                exit(0);
            }
            _ => {
                eprintln!("{}", e);
                exit(EXIT_BAD_ARGS);
            }
        }
    });

    // A bad rounds value is non-fatal: warn and keep the default.
    let rounds = match cli.rounds.as_deref() {
        None => DEFAULT_ROUNDS,
        Some(raw) => match raw.parse::<u64>() {
            Ok(n) => n,
            Err(_) => {
                eprintln!(
                    "[WARN] [ROUNDS] is not a non-negative integer, using default {}",
                    DEFAULT_ROUNDS
                );
                DEFAULT_ROUNDS
            }
        },
    };

    if !cli.input.is_file() {
        eprintln!("Error: [INPUT] must be an image file, e.g. a PNG");
        exit(EXIT_BAD_INPUT_PATH);
    }
    if !cli.output.is_dir() {
        eprintln!("Error: [OUTPUT_DIR] must be an existing directory for output images");
        exit(EXIT_BAD_OUTPUT_PATH);
    }

    let input = match codec::load(&cli.input) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error: [INPUT] is not a readable, supported image: {}", e);
            exit(EXIT_UNREADABLE_IMAGE);
        }
    };

    let ctx = match GpuContext::new() {
        Ok(ctx) => Arc::new(ctx),
        Err(e) => {
            eprintln!("Error: no compatible device: {}", e);
            exit(EXIT_NO_DEVICE);
        }
    };

    let info = ctx.adapter_info();
    println!("Device:       {}", info.name);
    println!("Backend:      {:?}", info.backend);
    println!("Device type:  {:?}", info.device_type);
    println!("Memory model: {}", ctx.memory_model());
    println!();

    let strategies: Vec<Box<dyn Executor>> = vec![
        Box::new(HostExecutor::new()),
        Box::new(DevicePointerExecutor::new(ctx.clone())),
        Box::new(StagedExecutor::new(ctx)),
    ];

    let kernels = vec![
        Kernel::Inversion,
        Kernel::Grayscale,
        Kernel::threshold_default(),
        Kernel::Erode {
            mask: MorphMask::cross_3x3(),
        },
        Kernel::Dilate {
            mask: MorphMask::cross_3x3(),
        },
        Kernel::gaussian_blur_3x3(),
        Kernel::gaussian_blur_5x5(),
    ];

    let input_name = cli
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image.png".to_string());

    let mut output = PixelBuffer::new(input.width, input.height, input.channels);

    for kernel in &kernels {
        for strategy in &strategies {
            let timing = measure_time(
                || strategy.run(kernel, &input, &mut output),
                rounds,
            );
            let (once_ms, total_ms) = match timing {
                Ok(t) => t,
                Err(e) => {
                    eprintln!(
                        "[WARN] {} [{}] failed, skipping: {}",
                        kernel.name(),
                        strategy.name(),
                        e
                    );
                    continue;
                }
            };

            println!(
                "{} [{}]: {:.3}ms (once) | {:.3}ms ({} times)",
                kernel.name(),
                strategy.name(),
                once_ms,
                total_ms,
                rounds
            );

            let out_path = cli
                .output
                .join(format!("{}-{}-{}", kernel.name(), strategy.name(), input_name));
            if let Err(e) = codec::save(&out_path, &output) {
                eprintln!("Error: failed to write {}: {}", out_path.display(), e);
                exit(EXIT_WRITE_FAILED);
            }
        }
    }
}

/// Time one invocation, then `rounds` further invocations, in milliseconds.
///
/// The first error aborts the measurement; partial timings are discarded.
fn measure_time<E>(
    mut f: impl FnMut() -> Result<(), E>,
    rounds: u64,
) -> Result<(f64, f64), E> {
    let start = Instant::now();
    f()?;
    let once = start.elapsed().as_secs_f64() * 1000.0;

    let start = Instant::now();
    for _ in 0..rounds {
        f()?;
    }
    let total = start.elapsed().as_secs_f64() * 1000.0;

    Ok((once, total))
}
