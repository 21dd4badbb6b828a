use super::{Node, QuadTree, Rect};

impl QuadTree {
	/// Builds the quadtree approximation of `img`.
	///
	/// Every leaf of the fresh tree corresponds to one pixel of the
	/// source; the source is only read, never modified, and the tree
	/// keeps no reference to it afterwards.
	///
	/// `img` must be at least 1x1 in both dimensions. That precondition
	/// is the caller's to uphold; the core does not check it.
	pub fn from_image(img: &image::RgbaImage) -> QuadTree {
		let (width, height) = img.dimensions();
		let root = Node::build(img, Rect { ul: (0, 0), lr: (width - 1, height - 1) });
		QuadTree { width, height, root }
	}

	/// Renders the tree into a fresh raster, with `scale` output pixels
	/// per original pixel along each axis.
	///
	/// Paints every leaf's scaled rectangle with the leaf's average
	/// color. No interpolation happens across block or leaf boundaries,
	/// so a pruned tree renders each collapsed region as one flat block.
	/// The tree itself is not touched.
	///
	/// `scale` must be at least 1; a zero scale is a contract violation
	/// and yields an empty image at best.
	pub fn render(&self, scale: u32) -> image::RgbaImage {
		let mut img = image::RgbaImage::new(self.width * scale, self.height * scale);
		self.root.render_into(&mut img, scale);
		img
	}
}

impl Node {
	fn render_into(&self, img: &mut image::RgbaImage, scale: u32) {
		if self.is_leaf() {
			let block = image::RgbaImage::from_pixel(
				self.rect.width() * scale,
				self.rect.height() * scale,
				self.avg,
			);
			image::imageops::replace(img, &block, self.rect.ul.0 * scale, self.rect.ul.1 * scale);
			return;
		}
		for child in self.children.iter().flatten() {
			child.render_into(img, scale);
		}
	}
}
