//! Render colors attached to redraw entries.

use serde::{Deserialize, Serialize};

use super::grid::Coord;
use super::lifecycle::Lifecycle;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The four lifecycle colors plus the grid-line color used by renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Rgb,
    pub new: Rgb,
    pub survivor: Rgb,
    pub dead: Rgb,
    pub grid_line: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb(5, 5, 5),
            new: Rgb(50, 250, 5),
            survivor: Rgb(40, 100, 40),
            dead: Rgb(60, 0, 0),
            grid_line: Rgb(20, 20, 20),
        }
    }
}

impl Palette {
    #[inline(always)]
    pub fn color_for(&self, class: Lifecycle) -> Rgb {
        match class {
            Lifecycle::Empty => self.background,
            Lifecycle::New => self.new,
            Lifecycle::Survivor => self.survivor,
            Lifecycle::Dead => self.dead,
        }
    }
}

/// Repaint `coord` with `color`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Redraw {
    pub coord: Coord,
    pub color: Rgb,
}

#[cfg(test)]
mod tests {
    use super::{Palette, Rgb};
    use crate::bloomlife::Lifecycle;

    #[test]
    fn colors_follow_classification() {
        let palette = Palette::default();
        assert_eq!(palette.color_for(Lifecycle::Empty), palette.background);
        assert_eq!(palette.color_for(Lifecycle::New), Rgb(50, 250, 5));
        assert_eq!(palette.color_for(Lifecycle::Survivor), palette.survivor);
        assert_eq!(palette.color_for(Lifecycle::Dead), palette.dead);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let palette: Palette = serde_json::from_str(r#"{"new": [1, 2, 3]}"#).unwrap();
        assert_eq!(palette.new, Rgb(1, 2, 3));
        assert_eq!(palette.dead, Palette::default().dead);

        let json = serde_json::to_string(&palette).unwrap();
        let back: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(back, palette);
    }
}
