use pcv_image::{Image, ImageError};

use crate::contours::Point;

/// Pixel neighborhood used to connect foreground pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// Horizontal and vertical neighbors.
    Four,
    /// Horizontal, vertical and diagonal neighbors.
    #[default]
    Eight,
}

/// Bounding box and pixel count of a labeled component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComponentStats {
    /// Leftmost column of the component.
    pub left: usize,
    /// Topmost row of the component.
    pub top: usize,
    /// Number of columns spanned by the component.
    pub width: usize,
    /// Number of rows spanned by the component.
    pub height: usize,
    /// Number of pixels of the component.
    pub area: usize,
}

/// The result of [`connected_components_with_stats`].
#[derive(Debug, Clone)]
pub struct ConnectedComponents {
    /// Number of labels, background included.
    pub num_labels: usize,
    /// Label of every pixel, 0 being the background.
    pub labels: Image<u32, 1>,
    /// Statistics per label, indexed by label.
    pub stats: Vec<ComponentStats>,
    /// Center of mass per label, indexed by label.
    pub centroids: Vec<Point<f64>>,
}

/// A disjoint-set (union-find) structure over provisional labels.
struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    fn new() -> Self {
        Self {
            parent: Vec::new(),
            size: Vec::new(),
        }
    }

    /// Adds a new singleton set and returns its id.
    fn make_set(&mut self) -> usize {
        let id = self.parent.len();
        self.parent.push(id);
        self.size.push(1);
        id
    }

    /// Returns the representative (root) of the set containing `id`, with path compression.
    fn get_representative(&mut self, mut id: usize) -> usize {
        let mut root = id;

        // Chase down the root
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // Go back and collapse the tree
        while self.parent[id] != root {
            let tmp = self.parent[id];
            self.parent[id] = root;
            id = tmp;
        }

        root
    }

    /// Unites the sets containing `aid` and `bid`, returning the representative of the
    /// resulting set.
    fn connect(&mut self, aid: usize, bid: usize) -> usize {
        let aroot = self.get_representative(aid);
        let broot = self.get_representative(bid);

        if aroot == broot {
            return aroot;
        }

        let asize = self.size[aroot];
        let bsize = self.size[broot];

        if asize > bsize {
            self.parent[broot] = aroot;
            self.size[aroot] += bsize;
            aroot
        } else {
            self.parent[aroot] = broot;
            self.size[broot] += asize;
            broot
        }
    }

    fn len(&self) -> usize {
        self.parent.len()
    }
}

/// Label the connected components of a binary image.
///
/// Every non-zero pixel is foreground. Labels are numbered from 1 in the order a
/// raster scan first meets each component; the background is label 0.
///
/// # Arguments
///
/// * `src` - The binary image.
/// * `connectivity` - How foreground pixels connect to each other.
///
/// # Returns
///
/// The label map with the bounding box, pixel count and centroid of every label.
///
/// # Example
///
/// ```
/// use pcv_image::{Image, ImageSize};
/// use pcv_imgproc::connected_components::{connected_components_with_stats, Connectivity};
///
/// let src = Image::<u8, 1>::new(
///     ImageSize { width: 5, height: 1 },
///     vec![255, 255, 0, 0, 255],
/// ).unwrap();
///
/// let cc = connected_components_with_stats(&src, Connectivity::Eight).unwrap();
/// assert_eq!(cc.num_labels, 3);
/// assert_eq!(cc.labels.as_slice(), &[1, 1, 0, 0, 2]);
/// assert_eq!(cc.stats[1].area, 2);
/// ```
pub fn connected_components_with_stats(
    src: &Image<u8, 1>,
    connectivity: Connectivity,
) -> Result<ConnectedComponents, ImageError> {
    let (width, height) = (src.width(), src.height());
    let data = src.as_slice();

    // first pass: provisional labels, 0 is background, provisional label k is set k - 1
    let mut provisional = vec![0usize; data.len()];
    let mut uf = UnionFind::new();

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            if data[idx] == 0 {
                continue;
            }

            let mut neighbors = [0usize; 4];
            let mut num_neighbors = 0;
            let mut push = |label: usize| {
                if label != 0 {
                    neighbors[num_neighbors] = label;
                    num_neighbors += 1;
                }
            };

            if x > 0 {
                push(provisional[idx - 1]);
            }
            if y > 0 {
                push(provisional[idx - width]);
                if connectivity == Connectivity::Eight {
                    if x > 0 {
                        push(provisional[idx - width - 1]);
                    }
                    if x + 1 < width {
                        push(provisional[idx - width + 1]);
                    }
                }
            }

            provisional[idx] = match neighbors[..num_neighbors] {
                [] => uf.make_set() + 1,
                [first, ref rest @ ..] => {
                    for &other in rest {
                        uf.connect(first - 1, other - 1);
                    }
                    first
                }
            };
        }
    }

    // resolve the sets into consecutive labels in raster order
    let mut final_label = vec![0u32; uf.len()];
    let mut num_labels = 1usize;
    let mut labels = vec![0u32; data.len()];

    for (idx, &label) in provisional.iter().enumerate() {
        if label == 0 {
            continue;
        }
        let root = uf.get_representative(label - 1);
        if final_label[root] == 0 {
            final_label[root] = num_labels as u32;
            num_labels += 1;
        }
        labels[idx] = final_label[root];
    }

    // statistics, background included
    let mut bounds = vec![(usize::MAX, usize::MAX, 0usize, 0usize); num_labels];
    let mut areas = vec![0usize; num_labels];
    let mut sums = vec![(0.0f64, 0.0f64); num_labels];

    for (idx, &label) in labels.iter().enumerate() {
        let (x, y) = (idx % width.max(1), idx / width.max(1));
        let label = label as usize;
        let b = &mut bounds[label];
        b.0 = b.0.min(x);
        b.1 = b.1.min(y);
        b.2 = b.2.max(x);
        b.3 = b.3.max(y);
        areas[label] += 1;
        sums[label].0 += x as f64;
        sums[label].1 += y as f64;
    }

    let stats = bounds
        .iter()
        .zip(&areas)
        .map(|(&(left, top, right, bottom), &area)| {
            if area == 0 {
                return ComponentStats::default();
            }
            ComponentStats {
                left,
                top,
                width: right - left + 1,
                height: bottom - top + 1,
                area,
            }
        })
        .collect();

    let centroids = sums
        .iter()
        .zip(&areas)
        .map(|(&(sx, sy), &area)| {
            if area == 0 {
                Point::new(f64::NAN, f64::NAN)
            } else {
                Point::new(sx / area as f64, sy / area as f64)
            }
        })
        .collect();

    log::debug!(
        "connected components: {} labels in a {}x{} image",
        num_labels,
        width,
        height
    );

    Ok(ConnectedComponents {
        num_labels,
        labels: Image::new(src.size(), labels)?,
        stats,
        centroids,
    })
}
