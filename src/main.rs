use image::error::ImageError;

use qtree_img::QuadTree;

/// Helper function for `main`.
fn error_exit(msg: &str, code: i32) -> ! {
	eprintln!("{}", msg);
	std::process::exit(code)
}

/// `clap`-based CLI around the quadtree core.
///
/// Builds the quadtree approximation of an input image, optionally
/// prunes, mirrors and rotates it, then renders the result back out as a
/// PNG at an integer upscale.
///
/// May exit process with status code if there are errors:
///
/// 1: `clap` error
///
/// 2: invalid arguments
///
/// 3: file I/O issues
///
/// 4: invalid image data
///
/// 5: computation limits exceeded
///
/// 10: other, potentially unknown error
fn main() {
	let clap_matches = clap::App::new("qtree_img")
		.version("0.1.0")
		.about("Approximates a raster image with a region quadtree; supports lossy pruning, horizontal mirroring, counter-clockwise rotation, and upscaled re-rendering.")
		.arg_from_usage("-p, --prune=[TOL] 'Collapse regions whose colors all lie within TOL of the region average'")
		.arg_from_usage("-m, --mirror 'Mirror the image horizontally'")
		.arg_from_usage("-r, --rotate=[N] 'Rotate 90 degrees counter-clockwise N times; defaults to 0'")
		.arg_from_usage("-s, --scale=[N] 'Integer upscale factor for the rendered output; defaults to 1'")
		.arg_from_usage("<INPUT> 'Path to input image'")
		.arg_from_usage("[OUTPUT] 'Path to output PNG; defaults to INPUT with a modified file extension'")
		.get_matches();

	let input_path = clap_matches.value_of("INPUT").unwrap();
	let source = match image::open(input_path) {
		Ok(i) => i,
		Err(e) => {
			let (msg, code) = match e {
				ImageError::Decoding(_) => ("Invalid image data", 4),
				ImageError::Limits(_) => ("Computation limits exceeded", 5),
				ImageError::IoError(_) => ("File not found or could not be read", 3),
				_ => ("An error occurred", 10)
			};
			error_exit(msg, code)
		}
	}.into_rgba();

	// The core leaves its geometric preconditions to the caller, so the
	// degenerate inputs get refused here.
	if source.width() == 0 || source.height() == 0 {
		error_exit("Input image has no pixels", 4);
	}
	let scale = match clap_matches.value_of("scale").unwrap_or("1").parse::<u32>() {
		Ok(0) => error_exit("Scale must be at least 1", 2),
		Ok(n) => n,
		Err(_) => error_exit("Non-numeric value for scale", 2)
	};
	let rotations = match clap_matches.value_of("rotate").unwrap_or("0").parse::<u32>() {
		// Four quarter-turns are the identity
		Ok(n) => n % 4,
		Err(_) => error_exit("Non-numeric value for rotate", 2)
	};

	let mut tree = QuadTree::from_image(&source);
	eprintln!("{} nodes in quadtree", tree.node_count());
	if let Some(tol) = clap_matches.value_of("prune") {
		let tolerance = match tol.parse::<f64>() {
			Ok(t) if t >= 0. => t,
			_ => error_exit("Prune tolerance must be a non-negative number", 2)
		};
		tree.prune(tolerance);
		eprintln!("{} nodes after pruning", tree.node_count());
	}
	if clap_matches.is_present("mirror") {
		tree.flip_horizontal();
	}
	for _ in 0..rotations {
		tree.rotate_ccw();
	}

	let output = tree.render(scale);
	let output_path = clap_matches.value_of("OUTPUT")
		.map(str::to_string)
		.unwrap_or_else(|| input_path.rsplitn(2, '.').last().unwrap().to_string() + ".qtree.png");
	match output.save(&output_path) {
		Ok(_) => (),
		Err(_) => error_exit("Could not save output", 3)
	}
}
