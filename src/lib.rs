pub mod node;

pub use node::*;

impl QuadTree {
	/// Collapses every subtree whose leaves all lie within `tolerance`
	/// (color distance) of that subtree's own average color.
	///
	/// Evaluates top-down and collapses at the shallowest qualifying
	/// node; a collapsed node keeps the average it already had and simply
	/// drops its descendants. Leaves are vacuously uniform and are left
	/// alone.
	///
	/// The uniformity test reads the tree's current leaves, so a tree
	/// must not be pruned twice (nor should a clone of an already-pruned
	/// tree be pruned): a second pass would judge uniformity against
	/// already-collapsed, coarser data and give different results.
	/// Pruning after `flip_horizontal` or `rotate_ccw` is fine; those
	/// rearrange the leaves without discarding any.
	pub fn prune(&mut self, tolerance: f64) {
		self.root.prune(tolerance);
	}
}

impl Node {
	fn prune(&mut self, tolerance: f64) {
		if self.is_leaf() {
			return;
		}
		if self.leaves_within(self.avg, tolerance) {
			self.children = Default::default();
			return;
		}
		for child in self.children.iter_mut().flatten() {
			child.prune(tolerance);
		}
	}

	/// Whether every leaf under this node is within `tolerance` of
	/// `target`.
	fn leaves_within(&self, target: Pixel, tolerance: f64) -> bool {
		if self.is_leaf() {
			color_distance(&self.avg, &target) <= tolerance
		} else {
			self.children.iter().flatten().all(|c| c.leaves_within(target, tolerance))
		}
	}
}
