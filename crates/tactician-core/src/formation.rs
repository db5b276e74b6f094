//! Formation planner: eleven tokens on a pitch, seven on the bench.
//!
//! Positions are percentages of the pitch rectangle, measured to the
//! token's top-left corner. Pointer coordinates and rectangles are in the
//! caller's pixel space; the planner only needs them to be consistent.

use crate::capability::{pulse, Haptics, NoHaptics};
use crate::error::{Result, TacticianError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Rendered token size, in pixels, on both axes.
pub const TOKEN_SIZE_PX: f64 = 40.0;

const STARTING_XI: [(&str, f64, f64); 11] = [
    ("GK", 50.0, 92.0),
    ("DR", 85.0, 75.0),
    ("DC", 65.0, 80.0),
    ("DC", 35.0, 80.0),
    ("DL", 15.0, 75.0),
    ("MR", 80.0, 50.0),
    ("MC", 60.0, 55.0),
    ("MC", 40.0, 55.0),
    ("ML", 20.0, 50.0),
    ("ST", 60.0, 25.0),
    ("ST", 40.0, 25.0),
];
const BENCH_SIZE: u32 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Edges count as inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: u32,
    pub label: String,
    pub position: Point,
    pub on_pitch: bool,
}

/// The 4-4-2 starting layout plus the bench.
pub fn template() -> Vec<Player> {
    let xi = STARTING_XI.iter().zip(1u32..).map(|(&(label, x, y), id)| Player {
        id,
        label: label.to_string(),
        position: Point::new(x, y),
        on_pitch: true,
    });
    let first_sub = STARTING_XI.len() as u32 + 1;
    let bench = (first_sub..first_sub + BENCH_SIZE).map(|id| Player {
        id,
        label: "SUB".to_string(),
        position: Point::default(),
        on_pitch: false,
    });
    xi.chain(bench).collect()
}

/// Largest percentage a token can sit at on one axis of length `extent_px`.
fn max_percent(extent_px: f64) -> f64 {
    (100.0 - TOKEN_SIZE_PX * 100.0 / extent_px).max(0.0)
}

pub struct FormationPlanner {
    players: Vec<Player>,
    dragging: Option<u32>,
    haptics: Arc<dyn Haptics>,
}

impl Default for FormationPlanner {
    fn default() -> Self {
        Self::new(Arc::new(NoHaptics))
    }
}

impl std::fmt::Debug for FormationPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormationPlanner")
            .field("players", &self.players)
            .field("dragging", &self.dragging)
            .finish_non_exhaustive()
    }
}

impl FormationPlanner {
    pub fn new(haptics: Arc<dyn Haptics>) -> Self {
        Self {
            players: template(),
            dragging: None,
            haptics,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn on_pitch(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.on_pitch)
    }

    pub fn on_bench(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.on_pitch)
    }

    pub fn dragging(&self) -> Option<u32> {
        self.dragging
    }

    /// Pick up a token. It moves onto the pitch immediately, even if it was
    /// on the bench.
    pub fn start_drag(&mut self, id: u32) -> Result<()> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| TacticianError::InvalidEdit(format!("no player with id {id}")))?;
        player.on_pitch = true;
        self.dragging = Some(id);
        self.haptics.pulse(pulse::TAP);
        Ok(())
    }

    /// Move the dragged token under the pointer. `grab_offset` is where the
    /// pointer sits inside the token. Returns the new position, or `None`
    /// when nothing is being dragged or the pitch has no area.
    pub fn drag_to(&mut self, pointer: Point, pitch: Rect, grab_offset: Point) -> Option<Point> {
        let id = self.dragging?;
        if pitch.width <= 0.0 || pitch.height <= 0.0 {
            return None;
        }
        let x = (pointer.x - pitch.left - grab_offset.x) / pitch.width * 100.0;
        let y = (pointer.y - pitch.top - grab_offset.y) / pitch.height * 100.0;
        let position = Point::new(
            x.clamp(0.0, max_percent(pitch.width)),
            y.clamp(0.0, max_percent(pitch.height)),
        );
        let player = self.players.iter_mut().find(|p| p.id == id)?;
        player.position = position;
        Some(position)
    }

    /// Drop the dragged token. Released over the bench, it leaves the pitch.
    /// Returns whether it was benched, or `None` if nothing was dragged.
    pub fn end_drag(&mut self, pointer: Point, bench: Option<Rect>) -> Option<bool> {
        let id = self.dragging.take()?;
        let benched = bench.is_some_and(|b| b.contains(pointer));
        if benched {
            if let Some(player) = self.players.iter_mut().find(|p| p.id == id) {
                player.on_pitch = false;
            }
        }
        self.haptics.pulse(pulse::TAP);
        Some(benched)
    }

    pub fn reset(&mut self) {
        self.players = template();
        self.dragging = None;
        self.haptics.pulse(pulse::REMOVE);
    }
}
