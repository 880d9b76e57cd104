//! Presentation tunables. Nothing here affects puzzle rules.

use crate::grid::ColorId;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// CSS colors indexed by color id (1-based), cycling when ids exceed the list.
    pub palette: Vec<String>,
    /// Delay between solving and loading the next level (ms).
    pub advance_delay_ms: i32,
    /// Particles spawned per completed connection.
    pub particle_count: usize,
    /// Max particle speed (px per frame, per axis).
    pub particle_speed: f64,
    /// Life lost per frame; particles start at 1.0.
    pub particle_decay: f64,
    /// Smallest board edge in px.
    pub min_board_px: f64,
    /// Vertical space kept free around the board (px).
    pub layout_margin_px: f64,
    pub win_audio_src: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            palette: ["#FF3333", "#33FF33", "#3366FF", "#FFFF33", "#FF33FF", "#33FFFF"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            advance_delay_ms: 1500,
            particle_count: 20,
            particle_speed: 5.0,
            particle_decay: 0.02,
            min_board_px: 200.0,
            layout_margin_px: 40.0,
            win_audio_src: Some("WORKERSWORKING.m4a".to_string()),
        }
    }
}

impl GameConfig {
    pub fn color_css(&self, color: ColorId) -> &str {
        if self.palette.is_empty() {
            return "#FFFFFF";
        }
        let idx = (color.get() as usize - 1) % self.palette.len();
        &self.palette[idx]
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
