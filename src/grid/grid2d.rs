use glam::{IVec2, UVec2, Vec2};

use crate::types::{MapError, MapInfo};

#[derive(Debug, Clone)]
pub struct Grid2d<T> {
    info: MapInfo,
    data: Vec<T>,
}

impl<T> Grid2d<T> {
    pub fn new(info: MapInfo, data: Vec<T>) -> Result<Self, MapError> {
        let expected_len = info.cell_count();
        if data.len() != expected_len {
            return Err(MapError::InvalidMetadata(format!(
                "data length {} does not match map size {}",
                data.len(),
                expected_len
            )));
        }
        if info.resolution.is_nan() || info.resolution <= 0.0 {
            return Err(MapError::InvalidMetadata(format!(
                "resolution must be positive, got {}",
                info.resolution
            )));
        }

        Ok(Self { info, data })
    }

    /// Build a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(info: MapInfo, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let mut data = Vec::with_capacity(info.cell_count());
        for y in 0..info.height {
            for x in 0..info.width {
                data.push(f(x, y));
            }
        }
        Self { info, data }
    }

    pub fn info(&self) -> &MapInfo {
        &self.info
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn get(&self, pos: UVec2) -> Option<&T> {
        if pos.x >= self.info.width || pos.y >= self.info.height {
            return None;
        }
        let idx = self.index(pos);
        Some(&self.data[idx])
    }

    pub fn set(&mut self, pos: UVec2, value: T) -> Result<(), MapError> {
        if pos.x >= self.info.width || pos.y >= self.info.height {
            return Err(MapError::OutOfBounds(format!(
                "cell ({}, {}) out of bounds for map {}x{}",
                pos.x, pos.y, self.info.width, self.info.height
            )));
        }
        let idx = self.index(pos);
        self.data[idx] = value;
        Ok(())
    }

    fn index(&self, pos: UVec2) -> usize {
        (pos.y as usize) * (self.info.width as usize) + (pos.x as usize)
    }

    pub fn map_to_world(&self, pos: &Vec2) -> Vec2 {
        self.info.origin + *pos * self.info.resolution
    }

    /// Continuous map coordinates of a world point, or `None` if outside the map.
    pub fn world_to_map(&self, pos: &Vec2) -> Option<Vec2> {
        let mx = (pos.x - self.info.origin.x) / self.info.resolution;
        let my = (pos.y - self.info.origin.y) / self.info.resolution;
        // Written positively so NaN coordinates fall outside.
        let inside = mx >= 0.0
            && my >= 0.0
            && mx < self.info.width as f32
            && my < self.info.height as f32;
        if !inside {
            return None;
        }
        Some(Vec2::new(mx, my))
    }

    /// Cell containing a world point, or `None` if outside the map.
    pub fn world_to_cell(&self, pos: &Vec2) -> Option<UVec2> {
        let map_pos = self.world_to_map(pos)?;
        Some(map_pos.floor().as_uvec2())
    }

    /// Cell a world point would fall in without bounds checking. Used for diagnostics
    /// about points that failed [`Grid2d::world_to_cell`].
    pub fn world_to_cell_unbounded(&self, pos: &Vec2) -> IVec2 {
        ((*pos - self.info.origin) / self.info.resolution)
            .floor()
            .as_ivec2()
    }
}

impl<T: Clone> Grid2d<T> {
    /// Grid with every cell set to `value`.
    pub fn filled(info: MapInfo, value: T) -> Self {
        let data = vec![value; info.cell_count()];
        Self { info, data }
    }
}

impl<T: Clone + Default> Grid2d<T> {
    pub fn empty(info: MapInfo) -> Self {
        Self::filled(info, T::default())
    }
}
