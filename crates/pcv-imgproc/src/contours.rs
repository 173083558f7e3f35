use std::collections::VecDeque;
use std::ops::{Add, Sub};

use num_traits::Num;
use pcv_image::Image;

/// Kind of border traced by [`find_contours`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BorderType {
    /// Perimeter of foreground regions
    Outer,
    /// Perimeter of background regions enclosed by foreground.
    Hole,
}

/// A 2-dimensional point.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Point<T> {
    /// x-coordinate.
    pub x: T,
    /// y-coordinate.
    pub y: T,
}

impl<T> Point<T> {
    /// Construct a point at (x, y).
    pub fn new(x: T, y: T) -> Point<T> {
        Point::<T> { x, y }
    }
}

impl<T: Num> Add for Point<T> {
    type Output = Self;

    fn add(self, other: Point<T>) -> Point<T> {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl<T: Num> Sub for Point<T> {
    type Output = Self;

    fn sub(self, other: Point<T>) -> Point<T> {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// The border of a foreground region or of a hole inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    /// The pixels on the border, in tracing order.
    pub points: Vec<Point<i32>>,
    /// The type of the border. Outer or Hole.
    pub border_type: BorderType,
    /// Index of the enclosing border, `None` for top level outer borders.
    pub parent: Option<usize>,
}

impl Contour {
    /// Constructor for contour.
    pub fn new(points: Vec<Point<i32>>, border_type: BorderType, parent: Option<usize>) -> Self {
        Contour {
            points,
            border_type,
            parent,
        }
    }

    /// Shift every point of the contour by `offset`.
    pub fn translate(&mut self, offset: Point<i32>) {
        self.points.iter_mut().for_each(|p| *p = *p + offset);
    }
}

// Neighbor offsets in clockwise order (y points down): E, SE, S, SW, W, NW, N, NE.
const NEIGHBORS: [Point<i32>; 8] = [
    Point { x: 1, y: 0 },
    Point { x: 1, y: 1 },
    Point { x: 0, y: 1 },
    Point { x: -1, y: 1 },
    Point { x: -1, y: 0 },
    Point { x: -1, y: -1 },
    Point { x: 0, y: -1 },
    Point { x: 1, y: -1 },
];

fn rotate_to_value<U: PartialEq + Copy>(values: &mut VecDeque<U>, value: U) {
    if let Some(rotate_pos) = values.iter().position(|x| *x == value) {
        values.rotate_left(rotate_pos);
    }
}

/// Finds the borders of the foreground regions of a binary image.
///
/// Every non-zero pixel is foreground. The borders are traced with the border
/// following algorithm of Suzuki and Abe, which also recovers the nesting of
/// outer borders and holes through [`Contour::parent`]. All the border pixels are
/// kept, no point is simplified away. Pixels connect through their 8 neighbors.
///
/// # Arguments
///
/// * `src` - The binary image.
///
/// # Returns
///
/// The contours in the order their starting pixel is met by a raster scan.
///
/// # Example
///
/// ```
/// use pcv_image::{Image, ImageSize};
/// use pcv_imgproc::contours::{find_contours, BorderType};
///
/// #[rustfmt::skip]
/// let src = Image::<u8, 1>::new(
///     ImageSize { width: 4, height: 4 },
///     vec![
///         0, 0, 0, 0,
///         0, 255, 255, 0,
///         0, 255, 255, 0,
///         0, 0, 0, 0,
///     ],
/// ).unwrap();
///
/// let contours = find_contours(&src);
/// assert_eq!(contours.len(), 1);
/// assert_eq!(contours[0].border_type, BorderType::Outer);
/// assert_eq!(contours[0].points.len(), 4);
/// ```
pub fn find_contours(src: &Image<u8, 1>) -> Vec<Contour> {
    // pad the image with a frame of background so every traced pixel has 8 neighbors
    let width = src.width() + 2;
    let height = src.height() + 2;
    let mut image_values = vec![0i32; height * width];
    let mut contours: Vec<Contour> = Vec::new();
    let mut nbd = 1i32; // new-border label

    let at = |x: usize, y: usize| x + y * width;

    for (y, row) in src.as_slice().chunks_exact(src.width().max(1)).enumerate() {
        for (x, &v) in row.iter().enumerate() {
            if v != 0 {
                image_values[at(x + 1, y + 1)] = 1;
            }
        }
    }

    let mut directions = VecDeque::from(NEIGHBORS.to_vec());

    let non_zero_neighbor = |image: &[i32], curr: Point<usize>, diff: &Point<i32>| {
        let x = (curr.x as i32 + diff.x) as usize;
        let y = (curr.y as i32 + diff.y) as usize;
        if image[at(x, y)] != 0 {
            Some(Point::new(x, y))
        } else {
            None
        }
    };

    let direction_to = |from: Point<usize>, to: Point<usize>| {
        Point::new(to.x as i32 - from.x as i32, to.y as i32 - from.y as i32)
    };

    for y in 1..height - 1 {
        let mut lnbd = 1i32;

        for x in 1..width - 1 {
            let value = image_values[at(x, y)];
            if value == 0 {
                continue;
            }

            // Determine border type and the background pixel it starts from.
            let maybe_border = if value == 1 && image_values[at(x - 1, y)] == 0 {
                Some((Point::new(x - 1, y), BorderType::Outer))
            } else if value >= 1 && image_values[at(x + 1, y)] == 0 {
                if value > 1 {
                    lnbd = value;
                }
                Some((Point::new(x + 1, y), BorderType::Hole))
            } else {
                None
            };

            if let Some((adj, border_type)) = maybe_border {
                nbd += 1;

                // lnbd == 1 is the frame, which encloses the top level borders
                let parent = if lnbd >= 2 {
                    let parent_index = (lnbd - 2) as usize;
                    let parent_contour = &contours[parent_index];
                    if (border_type == BorderType::Outer)
                        ^ (parent_contour.border_type == BorderType::Outer)
                    {
                        Some(parent_index)
                    } else {
                        parent_contour.parent
                    }
                } else {
                    None
                };

                let mut contour_points = Vec::new();
                let curr = Point::new(x, y);
                rotate_to_value(&mut directions, direction_to(curr, adj));

                let first = directions
                    .iter()
                    .find_map(|diff| non_zero_neighbor(&image_values[..], curr, diff));

                if let Some(pos1) = first {
                    let mut pos2 = pos1;
                    let mut pos3 = curr;

                    loop {
                        contour_points.push(Point::new(pos3.x as i32 - 1, pos3.y as i32 - 1));

                        rotate_to_value(&mut directions, direction_to(pos3, pos2));

                        // counterclockwise search starting after pos2, it always meets pos2
                        let Some(pos4) = directions
                            .iter()
                            .rev()
                            .find_map(|diff| non_zero_neighbor(&image_values[..], pos3, diff))
                        else {
                            break;
                        };

                        let mut is_right_edge = false;
                        for diff in directions.iter().rev() {
                            if *diff == direction_to(pos3, pos4) {
                                break;
                            }
                            if *diff == Point::new(1, 0) {
                                is_right_edge = true;
                                break;
                            }
                        }

                        if is_right_edge {
                            image_values[at(pos3.x, pos3.y)] = -nbd;
                        } else if image_values[at(pos3.x, pos3.y)] == 1 {
                            image_values[at(pos3.x, pos3.y)] = nbd;
                        }

                        if pos4 == curr && pos3 == pos1 {
                            break;
                        }
                        pos2 = pos3;
                        pos3 = pos4;
                    }
                } else {
                    // Single pixel contour.
                    contour_points.push(Point::new(x as i32 - 1, y as i32 - 1));
                    image_values[at(x, y)] = -nbd;
                }

                // if hole border, reverse points to make counter clockwise.
                if border_type == BorderType::Hole {
                    contour_points.reverse();
                }

                contours.push(Contour::new(contour_points, border_type, parent));
            }

            let value = image_values[at(x, y)];
            if value != 1 {
                lnbd = value.abs();
            }
        }
    }

    contours
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcv_image::{ImageError, ImageSize};

    fn create_test_image_basic() -> Result<Image<u8, 1>, ImageError> {
        let mut img = Image::from_size_val(
            ImageSize {
                width: 10,
                height: 10,
            },
            0u8,
        )?;

        for y in 2..=7 {
            for x in 2..=7 {
                img.set_pixel(x, y, 0, 255)?;
            }
        }

        for y in 4..=5 {
            for x in 4..=5 {
                img.set_pixel(x, y, 0, 0)?;
            }
        }

        Ok(img)
    }

    fn create_test_image_nested() -> Result<Image<u8, 1>, ImageError> {
        let mut img = Image::from_size_val(
            ImageSize {
                width: 20,
                height: 20,
            },
            0u8,
        )?;

        for y in 2..=17 {
            for x in 2..=17 {
                img.set_pixel(x, y, 0, 255)?;
            }
        }

        for y in 5..=14 {
            for x in 5..=14 {
                img.set_pixel(x, y, 0, 0)?;
            }
        }

        for y in 8..=11 {
            for x in 8..=11 {
                img.set_pixel(x, y, 0, 255)?;
            }
        }

        Ok(img)
    }

    #[test]
    fn test_basic_contours() -> Result<(), ImageError> {
        let img = create_test_image_basic()?;
        let contours = find_contours(&img);

        assert_eq!(contours.len(), 2);

        // Outer contour
        let outer = &contours[0];
        assert_eq!(outer.border_type, BorderType::Outer);
        assert_eq!(outer.parent, None);
        assert_eq!(outer.points[0], Point::new(2, 2));
        assert!(outer.points.contains(&Point::new(7, 2)));
        assert!(outer.points.contains(&Point::new(7, 7)));
        assert!(outer.points.contains(&Point::new(2, 7)));
        // every pixel of the 6x6 perimeter, once
        assert_eq!(outer.points.len(), 20);

        // Hole contour
        let hole = &contours[1];
        assert_eq!(hole.border_type, BorderType::Hole);
        assert_eq!(hole.parent, Some(0));
        assert!(hole.points.contains(&Point::new(3, 4)));
        assert!(hole.points.contains(&Point::new(6, 4)));
        assert!(hole.points.contains(&Point::new(5, 6)));
        assert!(hole.points.contains(&Point::new(5, 3)));

        Ok(())
    }

    #[test]
    fn test_single_pixel() -> Result<(), ImageError> {
        let mut img = Image::from_size_val(
            ImageSize {
                width: 5,
                height: 5,
            },
            0u8,
        )?;
        img.set_pixel(2, 2, 0, 255)?;

        let contours = find_contours(&img);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points.len(), 1);
        assert_eq!(contours[0].points[0], Point::new(2, 2));
        assert_eq!(contours[0].border_type, BorderType::Outer);

        Ok(())
    }

    #[test]
    fn test_nested_contours() -> Result<(), ImageError> {
        let img = create_test_image_nested()?;

        let contours = find_contours(&img);
        assert_eq!(contours.len(), 3);

        // Outer contour
        assert_eq!(contours[0].border_type, BorderType::Outer);
        assert_eq!(contours[0].parent, None);
        // Middle contour (hole)
        assert_eq!(contours[1].border_type, BorderType::Hole);
        assert_eq!(contours[1].parent, Some(0));
        // Inner contour
        assert_eq!(contours[2].border_type, BorderType::Outer);
        assert_eq!(contours[2].parent, Some(1));
        Ok(())
    }

    #[test]
    fn test_region_touching_the_image_border() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let img = Image::<u8, 1>::new(
            ImageSize { width: 3, height: 3 },
            vec![
                255, 255, 255,
                255, 0, 255,
                255, 255, 255,
            ],
        )?;

        let contours = find_contours(&img);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].border_type, BorderType::Outer);
        assert_eq!(contours[0].points.len(), 8);
        assert_eq!(contours[1].border_type, BorderType::Hole);
        assert_eq!(contours[1].parent, Some(0));
        Ok(())
    }

    #[test]
    fn test_two_separate_regions() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let img = Image::<u8, 1>::new(
            ImageSize { width: 5, height: 1 },
            vec![255, 255, 0, 0, 255],
        )?;

        let contours = find_contours(&img);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].points, vec![Point::new(0, 0), Point::new(1, 0)]);
        assert_eq!(contours[1].points, vec![Point::new(4, 0)]);
        assert!(contours.iter().all(|c| c.parent.is_none()));
        Ok(())
    }

    #[test]
    fn test_empty_image() -> Result<(), ImageError> {
        let img = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            0,
        )?;
        assert!(find_contours(&img).is_empty());

        let empty = Image::<u8, 1>::new(ImageSize::default(), vec![])?;
        assert!(find_contours(&empty).is_empty());
        Ok(())
    }

    #[test]
    fn test_translate() {
        let mut contour = Contour::new(
            vec![Point::new(0, 0), Point::new(1, 2)],
            BorderType::Outer,
            None,
        );
        contour.translate(Point::new(3, -1));
        assert_eq!(contour.points, vec![Point::new(3, -1), Point::new(4, 1)]);
    }
}
