use std::mem;

use super::{Node, QuadTree, Quadrant, Rect};

impl QuadTree {
	/// Rearranges the tree so that rendering it yields the horizontal
	/// mirror of the current rendering.
	///
	/// West and east child pairs swap slots at every level, and every
	/// child's rectangle is rewritten against its parent's unchanged
	/// rectangle. May be called repeatedly and freely mixed with `prune`
	/// and `rotate_ccw`.
	///
	/// After any transform the build-time rule that 1-pixel-wide or
	/// 1-pixel-tall nodes keep their eastern/southern slots empty no
	/// longer holds; what remains guaranteed is that each slot names the
	/// physical corner it renders to and that the leaves still tile the
	/// image exactly.
	pub fn flip_horizontal(&mut self) {
		self.root.flip();
	}

	/// Rearranges the tree so that rendering it yields the current
	/// rendering rotated 90 degrees counter-clockwise.
	///
	/// The tree's global width and height swap, as do the root
	/// rectangle's extents. Four applications restore the original tree.
	/// May be called repeatedly and freely mixed with `prune` and
	/// `flip_horizontal`; the arity relaxation described on
	/// `flip_horizontal` applies here too, independently in both axes.
	pub fn rotate_ccw(&mut self) {
		mem::swap(&mut self.width, &mut self.height);
		let (x, y) = self.root.rect.lr;
		self.root.rect.lr = (y, x);
		self.root.rotate();
	}
}

impl Node {
	/// West/east split width and north/south split height of the current
	/// children, inferred from whichever slots are occupied. `w` and `h`
	/// are the parent's extents in the same frame the children's
	/// rectangles are in. Either value may be 0 when the corresponding
	/// column or row of slots is empty.
	fn split_line(&self, w: u32, h: u32) -> (u32, u32) {
		if let Some(nw) = self.child(Quadrant::Nw) {
			(nw.rect.width(), nw.rect.height())
		} else if let Some(ne) = self.child(Quadrant::Ne) {
			(w - ne.rect.width(), ne.rect.height())
		} else if let Some(sw) = self.child(Quadrant::Sw) {
			(sw.rect.width(), h - sw.rect.height())
		} else if let Some(se) = self.child(Quadrant::Se) {
			(w - se.rect.width(), h - se.rect.height())
		} else {
			(w, h)
		}
	}

	/// Rewrites the rectangles of the present children so they occupy
	/// their named corners of this node's rectangle, given the width of
	/// the west column and the height of the north row. An occupied slot
	/// always ends up with extent of at least 1 in both axes, since its
	/// column width and row height came from a real rectangle.
	fn place_children(&mut self, west_w: u32, north_h: u32) {
		let rect = self.rect;
		for (slot, child) in self.children.iter_mut().enumerate() {
			if let Some(child) = child {
				let (x0, x1) = if slot & 1 != 0 {
					(rect.ul.0 + west_w, rect.lr.0)
				} else {
					(rect.ul.0, rect.ul.0 + west_w - 1)
				};
				let (y0, y1) = if slot & 2 != 0 {
					(rect.ul.1 + north_h, rect.lr.1)
				} else {
					(rect.ul.1, rect.ul.1 + north_h - 1)
				};
				child.rect = Rect { ul: (x0, y0), lr: (x1, y1) };
			}
		}
	}

	fn flip(&mut self) {
		if self.is_leaf() {
			return;
		}
		let (west_w, north_h) = self.split_line(self.rect.width(), self.rect.height());
		let [nw, ne, sw, se] = mem::take(&mut self.children);
		self.children = [ne, nw, se, sw];
		// The old west column mirrors onto the east, so the new west
		// column is as wide as the old east column was.
		self.place_children(self.rect.width() - west_w, north_h);
		for child in self.children.iter_mut().flatten() {
			child.flip();
		}
	}

	fn rotate(&mut self) {
		if self.is_leaf() {
			return;
		}
		// This node's rectangle is already in the rotated frame, while
		// the children still carry pre-rotation rectangles. Measure them
		// against the pre-rotation extents, then cycle each child one
		// corner counter-clockwise.
		let (old_w, old_h) = (self.rect.height(), self.rect.width());
		let (west_w, north_h) = self.split_line(old_w, old_h);
		let [nw, ne, sw, se] = mem::take(&mut self.children);
		self.children = [ne, se, nw, sw];
		// The old north row height becomes the new west column width and
		// the old east column width the new north row height.
		self.place_children(north_h, old_w - west_w);
		for child in self.children.iter_mut().flatten() {
			child.rotate();
		}
	}
}
