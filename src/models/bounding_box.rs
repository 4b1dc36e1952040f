use crate::models::Point;

/// Axis-aligned extent of a barcode candidate
///
/// Tracks the four corner points alongside the integer pixel extremes.
/// A side whose corner pair was not supplied by the coarse locator is
/// substituted with the image edge, so `min_x <= max_x` and `min_y <= max_y`
/// hold for every constructed box.
#[derive(Debug, Clone)]
pub struct BoundingBox {
    image_width: usize,
    image_height: usize,
    top_left: Point,
    bottom_left: Point,
    top_right: Point,
    bottom_right: Point,
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
}

impl BoundingBox {
    /// Build a box from up to four corner points
    ///
    /// Returns `None` when both the left and the right corner pair are
    /// missing; a single missing side is replaced by the image edge at the
    /// present side's rows.
    pub fn new(
        image_width: usize,
        image_height: usize,
        top_left: Option<Point>,
        bottom_left: Option<Point>,
        top_right: Option<Point>,
        bottom_right: Option<Point>,
    ) -> Option<Self> {
        let left_unspecified = top_left.is_none() || bottom_left.is_none();
        let right_unspecified = top_right.is_none() || bottom_right.is_none();
        let (top_left, bottom_left, top_right, bottom_right) =
            match (left_unspecified, right_unspecified) {
                (true, true) => return None,
                (true, false) => {
                    let tr = top_right?;
                    let br = bottom_right?;
                    (Point::new(0.0, tr.y), Point::new(0.0, br.y), tr, br)
                }
                (false, true) => {
                    let tl = top_left?;
                    let bl = bottom_left?;
                    let edge = (image_width - 1) as f32;
                    (tl, bl, Point::new(edge, tl.y), Point::new(edge, bl.y))
                }
                (false, false) => (top_left?, bottom_left?, top_right?, bottom_right?),
            };
        Some(Self::from_corners(
            image_width,
            image_height,
            top_left,
            bottom_left,
            top_right,
            bottom_right,
        ))
    }

    fn from_corners(
        image_width: usize,
        image_height: usize,
        top_left: Point,
        bottom_left: Point,
        top_right: Point,
        bottom_right: Point,
    ) -> Self {
        Self {
            image_width,
            image_height,
            top_left,
            bottom_left,
            top_right,
            bottom_right,
            min_x: top_left.column().min(bottom_left.column()),
            max_x: top_right.column().max(bottom_right.column()),
            min_y: top_left.row().min(top_right.row()),
            max_y: bottom_left.row().max(bottom_right.row()),
        }
    }

    /// Combine the left half of one box with the right half of another
    pub fn merge(left: Option<BoundingBox>, right: Option<BoundingBox>) -> Option<BoundingBox> {
        match (left, right) {
            (None, None) => None,
            (Some(b), None) | (None, Some(b)) => Some(b),
            (Some(l), Some(r)) => Some(Self::from_corners(
                l.image_width,
                l.image_height,
                l.top_left,
                l.bottom_left,
                r.top_right,
                r.bottom_right,
            )),
        }
    }

    /// Grow the box by estimated rows missing above and below one indicator
    ///
    /// The adjusted corners stay clamped to the image, so existing codeword
    /// coordinates remain valid.
    pub fn add_missing_rows(
        &self,
        missing_start_rows: i32,
        missing_end_rows: i32,
        is_left: bool,
    ) -> BoundingBox {
        let mut top_left = self.top_left;
        let mut bottom_left = self.bottom_left;
        let mut top_right = self.top_right;
        let mut bottom_right = self.bottom_right;
        if missing_start_rows > 0 {
            let top = if is_left { self.top_left } else { self.top_right };
            let new_min_y = (top.row() - missing_start_rows).max(0);
            let new_top = Point::new(top.x, new_min_y as f32);
            if is_left {
                top_left = new_top;
            } else {
                top_right = new_top;
            }
        }
        if missing_end_rows > 0 {
            let bottom = if is_left {
                self.bottom_left
            } else {
                self.bottom_right
            };
            let new_max_y = (bottom.row() + missing_end_rows).min(self.image_height as i32 - 1);
            let new_bottom = Point::new(bottom.x, new_max_y as f32);
            if is_left {
                bottom_left = new_bottom;
            } else {
                bottom_right = new_bottom;
            }
        }
        Self::from_corners(
            self.image_width,
            self.image_height,
            top_left,
            bottom_left,
            top_right,
            bottom_right,
        )
    }

    /// Leftmost column covered by the box
    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    /// Rightmost column covered by the box
    pub fn max_x(&self) -> i32 {
        self.max_x
    }

    /// Topmost row covered by the box
    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Bottommost row covered by the box
    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Top-left corner
    pub fn top_left(&self) -> Point {
        self.top_left
    }

    /// Bottom-left corner
    pub fn bottom_left(&self) -> Point {
        self.bottom_left
    }

    /// Top-right corner
    pub fn top_right(&self) -> Point {
        self.top_right
    }

    /// Bottom-right corner
    pub fn bottom_right(&self) -> Point {
        self.bottom_right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_one_full_side() {
        assert!(
            BoundingBox::new(
                100,
                100,
                Some(Point::new(10.0, 10.0)),
                None,
                None,
                Some(Point::new(90.0, 40.0))
            )
            .is_none()
        );
    }

    #[test]
    fn test_missing_right_side_uses_image_edge() {
        let b = BoundingBox::new(
            100,
            50,
            Some(Point::new(10.0, 5.0)),
            Some(Point::new(10.0, 45.0)),
            None,
            None,
        )
        .unwrap();
        assert_eq!(b.min_x(), 10);
        assert_eq!(b.max_x(), 99);
        assert_eq!(b.min_y(), 5);
        assert_eq!(b.max_y(), 45);
    }

    #[test]
    fn test_add_missing_rows_clamps_to_image() {
        let b = BoundingBox::new(
            100,
            50,
            Some(Point::new(10.0, 5.0)),
            Some(Point::new(10.0, 45.0)),
            Some(Point::new(90.0, 5.0)),
            Some(Point::new(90.0, 45.0)),
        )
        .unwrap();
        let grown = b.add_missing_rows(10, 10, true);
        assert_eq!(grown.min_y(), 0);
        assert_eq!(grown.max_y(), 49);
        // the untouched right side keeps its rows
        assert_eq!(grown.top_right().row(), 5);
    }

    #[test]
    fn test_merge_takes_outer_corners() {
        let left = BoundingBox::new(
            100,
            50,
            Some(Point::new(10.0, 6.0)),
            Some(Point::new(10.0, 44.0)),
            Some(Point::new(40.0, 6.0)),
            Some(Point::new(40.0, 44.0)),
        )
        .unwrap();
        let right = BoundingBox::new(
            100,
            50,
            Some(Point::new(60.0, 4.0)),
            Some(Point::new(60.0, 46.0)),
            Some(Point::new(90.0, 4.0)),
            Some(Point::new(90.0, 46.0)),
        )
        .unwrap();
        let merged = BoundingBox::merge(Some(left), Some(right)).unwrap();
        assert_eq!(merged.min_x(), 10);
        assert_eq!(merged.max_x(), 90);
        assert_eq!(merged.min_y(), 4);
        assert_eq!(merged.max_y(), 46);
    }
}
