use crate::mesh::{Triangle, Vertex};
use crate::{Bounds3f, Float, Interaction, Ray};
use partition::partition;
use smallvec::SmallVec;
use std::time::Instant;
use tracing::info;

const N_BUCKETS: usize = 12;
const MAX_LEAF_TRIANGLES: usize = 255;
const TRAVERSAL_COST: Float = 1.0;

/// Inline capacity of the traversal stack. SAH trees stay well under this
/// for any realistic input; deeper trees spill to the heap instead of
/// overflowing.
const STACK_CAPACITY: usize = 64;

/// A node of the flattened hierarchy.
///
/// The node array is laid out in pre-order: the left child of an internal
/// node at index `k` is always at `k + 1`, only the right child index is
/// stored. Leaves are marked by `axis == -1` and `right_child == -1` and own
/// the triangle range `[start, end)`. Traversal depends on this layout; it
/// must survive any serialization round trip unchanged.
#[derive(Copy, Clone, Debug)]
pub struct BvhNode {
    pub bound: Bounds3f,
    pub axis: i32,
    pub right_child: i32,
    pub start: u32,
    pub end: u32,
}

impl BvhNode {
    pub fn is_leaf(&self) -> bool {
        self.right_child < 0
    }
}

/// Bounding volume hierarchy over a triangle soup.
///
/// `build` takes ownership of the vertex and triangle arrays and partitions
/// the triangles in place; afterwards the whole structure is immutable and
/// safe to query concurrently. Light indices and any serialized layout are
/// only meaningful against the permuted `triangles` order.
pub struct Bvh {
    pub nodes: Vec<BvhNode>,
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
    max_depth: usize,
}

impl Bvh {
    pub fn build(vertices: Vec<Vertex>, mut triangles: Vec<Triangle>) -> Self {
        let start = Instant::now();
        let mut builder = Builder {
            triangles: &mut triangles,
            nodes: Vec::new(),
            max_depth: 0,
        };
        let n = builder.triangles.len();
        if n == 0 {
            // an empty scene still gets a root so queries just report no hit
            builder.nodes.push(BvhNode {
                bound: Bounds3f::empty(),
                axis: -1,
                right_child: -1,
                start: 0,
                end: 0,
            });
        } else {
            builder.build_range(0, n, 0);
        }

        let (nodes, max_depth) = (builder.nodes, builder.max_depth);
        info!(
            nodes = nodes.len(),
            triangles = triangles.len(),
            max_depth,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "built BVH"
        );
        Self { nodes, vertices, triangles, max_depth }
    }

    /// Maximum node depth reached during construction; the traversal stack
    /// grows past its inline capacity only beyond this.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn world_bound(&self) -> Bounds3f {
        self.nodes.first().map_or_else(Bounds3f::empty, |n| n.bound)
    }

    /// Nearest-hit query. The closest distance found so far is threaded
    /// through the loop explicitly; the ray itself is never written to.
    pub fn intersect(&self, ray: &Ray) -> Option<Interaction> {
        let mut t_max = ray.t_max;
        let mut closest: Option<Interaction> = None;

        let mut stack: SmallVec<[u32; STACK_CAPACITY]> = SmallVec::new();
        stack.push(0);
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id as usize];
            if !node.bound.intersect_p(ray, t_max) {
                continue;
            }
            if node.is_leaf() {
                for tri in &self.triangles[node.start as usize..node.end as usize] {
                    if let Some(isect) = tri.intersect(&self.vertices, ray, t_max) {
                        t_max = isect.t;
                        closest = Some(isect);
                    }
                }
            } else {
                // pop order is LIFO: push the far child first so the child
                // nearer along the ray shrinks t_max before the far one is
                // tested
                if ray.dir[node.axis as usize] < 0.0 {
                    stack.push(id + 1);
                    stack.push(node.right_child as u32);
                } else {
                    stack.push(node.right_child as u32);
                    stack.push(id + 1);
                }
            }
        }
        closest
    }

    /// Any-hit query. Returns on the first occluder found; the interval is
    /// taken from `ray.t_max` and never shrunk.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        let mut stack: SmallVec<[u32; STACK_CAPACITY]> = SmallVec::new();
        stack.push(0);
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id as usize];
            if !node.bound.intersect_p(ray, ray.t_max) {
                continue;
            }
            if node.is_leaf() {
                for tri in &self.triangles[node.start as usize..node.end as usize] {
                    if tri.intersect_p(&self.vertices, ray, ray.t_max) {
                        return true;
                    }
                }
            } else if ray.dir[node.axis as usize] < 0.0 {
                stack.push(id + 1);
                stack.push(node.right_child as u32);
            } else {
                stack.push(node.right_child as u32);
                stack.push(id + 1);
            }
        }
        false
    }
}

struct Builder<'a> {
    triangles: &'a mut [Triangle],
    nodes: Vec<BvhNode>,
    max_depth: usize,
}

#[derive(Copy, Clone)]
struct Bucket {
    count: usize,
    bound: Bounds3f,
}

impl<'a> Builder<'a> {
    /// Recursively split `[l, r)`, emitting nodes in pre-order. Returns the
    /// emitted subtree root's index.
    fn build_range(&mut self, l: usize, r: usize, depth: usize) -> i32 {
        self.max_depth = self.max_depth.max(depth);
        let node_id = self.nodes.len() as i32;

        let bound = self.triangles[l..r]
            .iter()
            .fold(Bounds3f::empty(), |b, tri| b.join(&tri.bound));
        let n_triangles = r - l;

        if n_triangles <= 2 {
            self.push_leaf(bound, l, r);
            return node_id;
        }

        let centroid_bound = self.triangles[l..r]
            .iter()
            .fold(Bounds3f::empty(), |b, tri| b.join_point(&tri.centroid));

        // split along the widest extent of the centroids
        let diagonal = centroid_bound.diagonal();
        let axis = if diagonal.x >= diagonal.y && diagonal.x >= diagonal.z {
            0
        } else if diagonal.y >= diagonal.x && diagonal.y >= diagonal.z {
            1
        } else {
            2
        };

        // all centroids on one point: nothing to partition
        if centroid_bound.max[axis] == centroid_bound.min[axis] {
            self.push_leaf(bound, l, r);
            return node_id;
        }

        let bucket_of = |tri: &Triangle| -> usize {
            let offset = (tri.centroid[axis] - centroid_bound.min[axis]) / diagonal[axis];
            ((offset * N_BUCKETS as Float) as usize).min(N_BUCKETS - 1)
        };

        let mut buckets = [Bucket { count: 0, bound: Bounds3f::empty() }; N_BUCKETS];
        for tri in &self.triangles[l..r] {
            let b = &mut buckets[bucket_of(tri)];
            b.count += 1;
            b.bound = b.bound.join(&tri.bound);
        }

        // surface-area cost of each of the 11 internal boundaries
        let mut min_cost = Float::INFINITY;
        let mut mid_bucket = 0;
        for m in 0..N_BUCKETS - 1 {
            let (left, right) = buckets.split_at(m + 1);
            let (b0, c0) = left
                .iter()
                .fold((Bounds3f::empty(), 0), |(b, c), bk| (b.join(&bk.bound), c + bk.count));
            let (b1, c1) = right
                .iter()
                .fold((Bounds3f::empty(), 0), |(b, c), bk| (b.join(&bk.bound), c + bk.count));
            if c0 == 0 || c1 == 0 {
                continue;
            }
            let cost = TRAVERSAL_COST
                + (b0.surface_area() * c0 as Float + b1.surface_area() * c1 as Float)
                    / bound.surface_area();
            if cost < min_cost {
                min_cost = cost;
                mid_bucket = m;
            }
        }

        let (left, _right) = partition(&mut self.triangles[l..r], |tri| bucket_of(tri) <= mid_bucket);
        let mid = l + left.len();

        // keep the leaf if splitting does not pay off, or if the partition
        // degenerated
        let leaf_cost = n_triangles as Float;
        if (n_triangles <= MAX_LEAF_TRIANGLES && leaf_cost <= min_cost) || mid == l {
            self.push_leaf(bound, l, r);
            return node_id;
        }

        self.nodes.push(BvhNode {
            bound,
            axis: axis as i32,
            right_child: 0, // patched after the right subtree is built
            start: l as u32,
            end: r as u32,
        });
        self.build_range(l, mid, depth + 1);
        let right_child = self.build_range(mid, r, depth + 1);
        self.nodes[node_id as usize].right_child = right_child;
        node_id
    }

    fn push_leaf(&mut self, bound: Bounds3f, l: usize, r: usize) {
        self.nodes.push(BvhNode {
            bound,
            axis: -1,
            right_child: -1,
            start: l as u32,
            end: r as u32,
        });
    }
}
