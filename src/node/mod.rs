use ::image::{Rgba, RgbaImage};

/// Color type stored in every node and exchanged with the raster
/// collaborators. The alpha channel is carried along but unused; all
/// rendered output is opaque.
pub type Pixel = Rgba<u8>;

fn abs_sub(a: u8, b: u8) -> u8 {
	(a as i16 - b as i16).abs() as u8
}

fn vec3_len_squared(a: u8, b: u8, c: u8) -> u32 {
	(a as u32 * a as u32) +
	(b as u32 * b as u32) +
	(c as u32 * c as u32)
}

/// Euclidean distance between two colors over the three color channels.
///
/// Alpha is ignored, since the tree treats every color as opaque.
pub fn color_distance(a: &Pixel, b: &Pixel) -> f64 {
	(vec3_len_squared(
		abs_sub(a.0[0], b.0[0]),
		abs_sub(a.0[1], b.0[1]),
		abs_sub(a.0[2], b.0[2]),
	) as f64).sqrt()
}

/// Axis-aligned rectangle of pixels, stored as inclusive upper-left and
/// lower-right corners.
///
/// Both corners are part of the rectangle, so the smallest representable
/// rectangle is a single pixel with `ul == lr`, and width and height are
/// always at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
	pub ul: (u32, u32),
	pub lr: (u32, u32),
}

impl Rect {
	pub fn width(&self) -> u32 {
		self.lr.0 - self.ul.0 + 1
	}

	pub fn height(&self) -> u32 {
		self.lr.1 - self.ul.1 + 1
	}

	/// Number of pixels covered, as a `u64` so area-weighted sums cannot
	/// overflow on large images.
	pub fn area(&self) -> u64 {
		self.width() as u64 * self.height() as u64
	}
}

/// Child slot within a node, named by the compass corner it renders to.
///
/// The discriminant doubles as the index into `Node::children`; bit 0 is
/// the west/east axis and bit 1 the north/south axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
	Nw = 0,
	Ne = 1,
	Sw = 2,
	Se = 3,
}

/// How a node's rectangle subdivides, decided once from its dimensions.
///
/// `VerticalOnly` is the 1-pixel-wide strip (NW/SW children only) and
/// `HorizontalOnly` the 1-pixel-tall strip (NW/NE children only). This
/// pattern is only guaranteed right after construction; flipping and
/// rotating may leave a thin node with children in the mirror-image
/// slots instead.
#[derive(Clone, Copy, Debug)]
enum SplitKind {
	FourWay,
	VerticalOnly,
	HorizontalOnly,
}

impl SplitKind {
	fn of(w: u32, h: u32) -> SplitKind {
		if w == 1 {
			SplitKind::VerticalOnly
		} else if h == 1 {
			SplitKind::HorizontalOnly
		} else {
			SplitKind::FourWay
		}
	}
}

/// Node in a region quadtree over a raster image.
///
/// Covers `rect` and stores the (approximate) average color of that
/// region. A node with all four child slots empty is a leaf and paints
/// its whole rectangle in one color; a branch node's children tile its
/// rectangle exactly, with no gaps and no overlap.
///
/// Children are exclusively owned, so dropping a node tears down its
/// whole subtree and cloning one duplicates it.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub rect: Rect,
	pub avg: Pixel,
	pub children: [Option<Box<Node>>; 4],
}

impl Node {
	pub fn is_leaf(&self) -> bool {
		self.children.iter().all(Option::is_none)
	}

	pub fn child(&self, q: Quadrant) -> Option<&Node> {
		self.children[q as usize].as_deref()
	}

	/// Number of nodes in this subtree, including this one.
	pub fn node_count(&self) -> usize {
		1 + self.children.iter().flatten().map(|c| c.node_count()).sum::<usize>()
	}

	/// Recursively builds the subtree covering `rect` of `img`.
	///
	/// A single pixel becomes a leaf holding that pixel's color. Anything
	/// larger splits at `ceil(w/2)` and `ceil(h/2)`, so an odd dimension
	/// puts the extra line in the left/upper half; 1-pixel-wide
	/// rectangles split into NW/SW only and 1-pixel-tall ones into NW/NE
	/// only.
	///
	/// The average color combines only the direct children's
	/// already-computed averages, weighted by area, in constant time per
	/// node. Truncating integer division makes shallow nodes accumulate
	/// rounding error; that is the intended trade for linear-time
	/// construction, and the pruner relies on reproducing exactly these
	/// values.
	pub fn build(img: &RgbaImage, rect: Rect) -> Node {
		let (x0, y0) = rect.ul;
		let (x1, y1) = rect.lr;
		let (w, h) = (rect.width(), rect.height());

		if w == 1 && h == 1 {
			let p = img.get_pixel(x0, y0);
			return Node {
				rect,
				avg: Rgba([p.0[0], p.0[1], p.0[2], 255]),
				children: Default::default(),
			};
		}

		let (half_w, half_h) = ((w + 1) / 2, (h + 1) / 2);
		let mut children: [Option<Box<Node>>; 4] = Default::default();
		let quarter = |ul, lr| Some(Box::new(Node::build(img, Rect { ul, lr })));
		match SplitKind::of(w, h) {
			SplitKind::VerticalOnly => {
				children[Quadrant::Nw as usize] = quarter((x0, y0), (x0, y0 + half_h - 1));
				children[Quadrant::Sw as usize] = quarter((x0, y0 + half_h), (x0, y1));
			},
			SplitKind::HorizontalOnly => {
				children[Quadrant::Nw as usize] = quarter((x0, y0), (x0 + half_w - 1, y0));
				children[Quadrant::Ne as usize] = quarter((x0 + half_w, y0), (x1, y0));
			},
			SplitKind::FourWay => {
				children[Quadrant::Nw as usize] = quarter((x0, y0), (x0 + half_w - 1, y0 + half_h - 1));
				children[Quadrant::Ne as usize] = quarter((x0 + half_w, y0), (x1, y0 + half_h - 1));
				children[Quadrant::Sw as usize] = quarter((x0, y0 + half_h), (x0 + half_w - 1, y1));
				children[Quadrant::Se as usize] = quarter((x0 + half_w, y0 + half_h), (x1, y1));
			},
		}
		let avg = area_weighted_avg(children.iter().flatten());
		Node { rect, avg, children }
	}
}

/// Integer-truncating mean of the given nodes' averages, weighted by each
/// node's pixel area. One fold covers all three split arities.
fn area_weighted_avg<'a, I>(children: I) -> Pixel
where
	I: Iterator<Item = &'a Box<Node>>,
{
	let mut total = 0u64;
	let mut sums = [0u64; 3];
	for child in children {
		let area = child.rect.area();
		total += area;
		for (sum, channel) in sums.iter_mut().zip(child.avg.0.iter()) {
			*sum += area * *channel as u64;
		}
	}
	Rgba([
		(sums[0] / total) as u8,
		(sums[1] / total) as u8,
		(sums[2] / total) as u8,
		255,
	])
}

/// A region quadtree approximating a raster image.
///
/// Holds the root node plus the image's global dimensions; the
/// dimensions are tracked separately from the root's rectangle because
/// rotation swaps them at the tree level. The tree has value semantics:
/// `clone` is a deep copy sharing no nodes with the source, and dropping
/// (or assigning over) a tree releases every owned node.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadTree {
	pub width: u32,
	pub height: u32,
	pub root: Node,
}

impl QuadTree {
	/// Number of nodes in the whole tree.
	pub fn node_count(&self) -> usize {
		self.root.node_count()
	}
}

pub mod image;
pub mod transform;

#[cfg(test)]
mod tests {
	use super::*;

	fn image_of(w: u32, h: u32, rgb: &[[u8; 3]]) -> RgbaImage {
		RgbaImage::from_fn(w, h, |x, y| {
			let [r, g, b] = rgb[(y * w + x) as usize];
			Rgba([r, g, b, 255])
		})
	}

	fn demo_2x2() -> RgbaImage {
		image_of(2, 2, &[[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0]])
	}

	#[test]
	fn average_is_area_weighted_and_truncated() {
		let tree = QuadTree::from_image(&demo_2x2());
		// (510, 510, 255) / 4, truncated
		assert_eq!(tree.root.avg, Rgba([127, 127, 63, 255]));
		assert_eq!(tree.node_count(), 5);
		for q in &[Quadrant::Nw, Quadrant::Ne, Quadrant::Sw, Quadrant::Se] {
			let child = tree.root.child(*q).unwrap();
			assert!(child.is_leaf());
			assert_eq!(child.rect.area(), 1);
		}
	}

	#[test]
	fn odd_split_favors_upper_left() {
		let img = image_of(3, 2, &[[0; 3]; 6]);
		let tree = QuadTree::from_image(&img);
		let root = &tree.root;
		assert_eq!(root.child(Quadrant::Nw).unwrap().rect, Rect { ul: (0, 0), lr: (1, 0) });
		assert_eq!(root.child(Quadrant::Ne).unwrap().rect, Rect { ul: (2, 0), lr: (2, 0) });
		assert_eq!(root.child(Quadrant::Sw).unwrap().rect, Rect { ul: (0, 1), lr: (1, 1) });
		assert_eq!(root.child(Quadrant::Se).unwrap().rect, Rect { ul: (2, 1), lr: (2, 1) });
	}

	#[test]
	fn one_wide_strip_splits_north_south_only() {
		let img = image_of(1, 4, &[[0; 3]; 4]);
		let tree = QuadTree::from_image(&img);
		let root = &tree.root;
		assert!(root.child(Quadrant::Ne).is_none());
		assert!(root.child(Quadrant::Se).is_none());
		assert_eq!(root.child(Quadrant::Nw).unwrap().rect, Rect { ul: (0, 0), lr: (0, 1) });
		assert_eq!(root.child(Quadrant::Sw).unwrap().rect, Rect { ul: (0, 2), lr: (0, 3) });
	}

	#[test]
	fn one_tall_strip_splits_west_east_only() {
		let img = image_of(3, 1, &[[0; 3]; 3]);
		let tree = QuadTree::from_image(&img);
		let root = &tree.root;
		assert!(root.child(Quadrant::Sw).is_none());
		assert!(root.child(Quadrant::Se).is_none());
		assert_eq!(root.child(Quadrant::Nw).unwrap().rect, Rect { ul: (0, 0), lr: (1, 0) });
		assert_eq!(root.child(Quadrant::Ne).unwrap().rect, Rect { ul: (2, 0), lr: (2, 0) });
	}

	#[test]
	fn weighted_average_on_uneven_areas() {
		// The NW strip covers two pixels, the NE child one.
		let img = image_of(3, 1, &[[30, 0, 0], [60, 0, 0], [90, 0, 0]]);
		let tree = QuadTree::from_image(&img);
		assert_eq!(tree.root.child(Quadrant::Nw).unwrap().avg, Rgba([45, 0, 0, 255]));
		// (2 * 45 + 1 * 90) / 3
		assert_eq!(tree.root.avg, Rgba([60, 0, 0, 255]));
	}

	#[test]
	fn build_is_deterministic() {
		let a = QuadTree::from_image(&demo_2x2());
		let b = QuadTree::from_image(&demo_2x2());
		assert_eq!(a, b);
	}

	#[test]
	fn single_pixel_image_is_a_lone_leaf() {
		let img = image_of(1, 1, &[[9, 8, 7]]);
		let tree = QuadTree::from_image(&img);
		assert!(tree.root.is_leaf());
		assert_eq!(tree.root.avg, Rgba([9, 8, 7, 255]));
		assert_eq!(tree.node_count(), 1);
	}

	#[test]
	fn distance_is_euclidean_over_rgb() {
		let a = Rgba([0, 0, 0, 255]);
		let b = Rgba([3, 4, 0, 0]);
		// Alpha difference must not contribute.
		assert_eq!(color_distance(&a, &b), 5.0);
	}
}
