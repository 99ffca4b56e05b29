use glam::{Vec2, vec2};

const LEAF_CAPACITY: usize = 12;
const MAX_DEPTH: usize = 10;

#[derive(Clone, Copy)]
pub(super) struct CellBounds {
    pub(super) center: Vec2,
    pub(super) half_extent: f32,
}

impl CellBounds {
    fn around(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for point in points {
            min = min.min(*point);
            max = max.max(*point);
        }
        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return None;
        }

        let span = (max - min).max_element().max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            half_extent: span * 0.5 + 1.0,
        })
    }

    fn quadrant(self, point: Vec2) -> usize {
        ((point.x >= self.center.x) as usize) | (((point.y >= self.center.y) as usize) << 1)
    }

    fn shrink(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let dx = if quadrant & 1 == 0 { -quarter } else { quarter };
        let dy = if quadrant & 2 == 0 { -quarter } else { quarter };
        Self {
            center: self.center + vec2(dx, dy),
            half_extent: quarter,
        }
    }

    pub(super) fn width(self) -> f32 {
        self.half_extent * 2.0
    }

    /// Squared distance between the closest points of two cells, zero when
    /// they touch or overlap.
    pub(super) fn gap_sq(self, other: Self) -> f32 {
        let reach = self.half_extent + other.half_extent;
        let dx = ((self.center.x - other.center.x).abs() - reach).max(0.0);
        let dy = ((self.center.y - other.center.y).abs() - reach).max(0.0);
        dx * dx + dy * dy
    }
}

/// Center-of-mass quadtree over point indices. Internal cells keep their
/// aggregate count and centroid; members live only in the leaves.
pub(super) struct QuadCell {
    pub(super) bounds: CellBounds,
    pub(super) center_of_mass: Vec2,
    pub(super) count: f32,
    pub(super) members: Vec<usize>,
    pub(super) children: [Option<Box<QuadCell>>; 4],
}

impl QuadCell {
    pub(super) fn build(points: &[Vec2]) -> Option<Self> {
        let bounds = CellBounds::around(points)?;
        Some(Self::subdivide(bounds, (0..points.len()).collect(), points, 0))
    }

    fn subdivide(bounds: CellBounds, members: Vec<usize>, points: &[Vec2], depth: usize) -> Self {
        let mut center_of_mass = Vec2::ZERO;
        for &member in &members {
            center_of_mass += points[member];
        }
        let count = members.len() as f32;
        if count > 0.0 {
            center_of_mass /= count;
        }

        let mut cell = Self {
            bounds,
            center_of_mass,
            count,
            members,
            children: std::array::from_fn(|_| None),
        };

        if depth >= MAX_DEPTH || cell.members.len() <= LEAF_CAPACITY {
            return cell;
        }

        let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
        for &member in &cell.members {
            buckets[bounds.quadrant(points[member])].push(member);
        }

        // all members in one quadrant means splitting cannot separate them
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return cell;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            cell.children[quadrant] = Some(Box::new(Self::subdivide(
                bounds.shrink(quadrant),
                bucket,
                points,
                depth + 1,
            )));
        }
        cell.members.clear();
        cell
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(|child| child.is_none())
    }
}
