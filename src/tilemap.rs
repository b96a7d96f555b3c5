/// A bounded 2D tile grid stored row-major.
///
/// Unlike a world map there is no wrapping on either axis: coordinates
/// outside `0..width` / `0..height` are simply off the map.
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

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "({}, {}) off map", x, y);
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    /// Overwrite a cell and hand back what was there before.
    pub fn replace(&mut self, x: usize, y: usize, value: T) -> T {
        let idx = self.index(x, y);
        std::mem::replace(&mut self.data[idx], value)
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Fill the entire map with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Whether a signed coordinate lands on the map.
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// All on-map coordinates in the square of the given radius around
    /// `(x, y)`, clipped at the edges. Row-major order.
    pub fn window(&self, x: usize, y: usize, radius: usize) -> Vec<(usize, usize)> {
        let x0 = x.saturating_sub(radius);
        let y0 = y.saturating_sub(radius);
        let x1 = x.saturating_add(radius).min(self.width.saturating_sub(1));
        let y1 = y.saturating_add(radius).min(self.height.saturating_sub(1));

        let mut result = Vec::with_capacity((x1 - x0 + 1) * (y1 - y0 + 1));
        for ny in y0..=y1 {
            for nx in x0..=x1 {
                result.push((nx, ny));
            }
        }
        result
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.width.max(1))
    }

    pub fn count_where(&self, mut pred: impl FnMut(&T) -> bool) -> usize {
        self.data.iter().filter(|&v| pred(v)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_clipped_at_corner() {
        let map: Tilemap<u8> = Tilemap::new(5, 5);
        let cells = map.window(0, 0, 2);
        assert_eq!(cells.len(), 9);
        assert_eq!(cells.first(), Some(&(0, 0)));
        assert_eq!(cells.last(), Some(&(2, 2)));
    }

    #[test]
    fn test_window_full_inside() {
        let map: Tilemap<u8> = Tilemap::new(10, 10);
        assert_eq!(map.window(5, 5, 2).len(), 25);
    }

    #[test]
    fn test_window_huge_radius_covers_map() {
        let map: Tilemap<u8> = Tilemap::new(3, 2);
        let cells = map.window(1, 1, usize::MAX);
        assert_eq!(cells.len(), 6);
        assert_eq!(cells.first(), Some(&(0, 0)));
        assert_eq!(cells.last(), Some(&(2, 1)));
    }

    #[test]
    fn test_rows_and_iter_agree() {
        let mut map = Tilemap::new_with(3, 2, 0u8);
        map.set(2, 1, 7);
        let rows: Vec<&[u8]> = map.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], &[0, 0, 7]);
        assert_eq!(map.iter().find(|(_, _, v)| **v == 7).map(|(x, y, _)| (x, y)), Some((2, 1)));
    }

    #[test]
    fn test_replace_returns_previous() {
        let mut map = Tilemap::new_with(2, 2, 'a');
        assert_eq!(map.replace(1, 1, 'b'), 'a');
        assert_eq!(*map.get(1, 1), 'b');
    }

    #[test]
    fn test_in_bounds() {
        let map: Tilemap<u8> = Tilemap::new(4, 3);
        assert!(map.in_bounds(0, 0));
        assert!(map.in_bounds(3, 2));
        assert!(!map.in_bounds(-1, 0));
        assert!(!map.in_bounds(4, 0));
        assert!(!map.in_bounds(0, 3));
    }
}
