/// A bounded 2D tilemap grid addressed as `(x, y)` with `x` in `0..width`.
///
/// Unlike a world map this grid does not wrap: anything outside the extent is
/// simply out of bounds, and callers decide what "outside" means for them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Build a tilemap from row-major data (`y * width + x`).
    ///
    /// Returns `None` if the data length does not match the dimensions.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self { width, height, data })
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "({}, {}) out of bounds", x, y);
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Whether a signed coordinate lies inside the map.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Signed lookup, `None` outside the map.
    pub fn get_checked(&self, x: i32, y: i32) -> Option<&T> {
        if self.in_bounds(x, y) {
            Some(self.get(x as usize, y as usize))
        } else {
            None
        }
    }

    /// Signed write; out-of-bounds writes are ignored. Returns whether the cell was written.
    pub fn set_checked(&mut self, x: i32, y: i32, value: T) -> bool {
        if self.in_bounds(x, y) {
            self.set(x as usize, y as usize, value);
            true
        } else {
            false
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 4-connected neighbours in the order left, down, up, right.
    ///
    /// Coordinates may be out of bounds; filter with [`Tilemap::in_bounds`].
    pub fn neighbors_4(x: i32, y: i32) -> [(i32, i32); 4] {
        [(x - 1, y), (x, y - 1), (x, y + 1), (x + 1, y)]
    }

    /// 8-connected neighbours, x-major, skipping the centre.
    pub fn neighbors_8(x: i32, y: i32) -> impl Iterator<Item = (i32, i32)> {
        (x - 1..=x + 1)
            .flat_map(move |nx| (y - 1..=y + 1).map(move |ny| (nx, ny)))
            .filter(move |&(nx, ny)| nx != x || ny != y)
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }

    /// Copy this map into a larger one, offset by `margin` on every side,
    /// with the frame filled by `value`.
    pub fn framed(&self, margin: usize, value: T) -> Self {
        let mut result = Tilemap::new_with(self.width + margin * 2, self.height + margin * 2, value);
        for (x, y, cell) in self.iter() {
            result.set(x + margin, y + margin, cell.clone());
        }
        result
    }
}

impl<T: Clone + PartialEq> Tilemap<T> {
    /// Number of cells equal to `value`.
    pub fn count(&self, value: &T) -> usize {
        self.data.iter().filter(|v| *v == value).count()
    }
}
