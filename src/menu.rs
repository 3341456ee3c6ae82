//! Menu buttons
//!
//! Start screen has a single start button; game-over has play-again and quit.
//! Only layout and hit testing live here; glow and flicker are the renderer's
//! business.

use glam::Vec2;
use serde::Serialize;

use crate::config::GameConfig;
use crate::sim::GamePhase;
use crate::sim::collision::Aabb;

/// What a button does when clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MenuAction {
    StartGame,
    PlayAgain,
    QuitGame,
}

impl MenuAction {
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::StartGame => "START GAME",
            MenuAction::PlayAgain => "PLAY AGAIN",
            MenuAction::QuitGame => "QUIT GAME",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Button {
    pub action: MenuAction,
    pub bounds: Aabb,
}

/// Buttons are stacked down the horizontal centre of the screen
fn button(action: MenuAction, row: usize, config: &GameConfig) -> Button {
    let top = config.first_button_top + row as f32 * config.button_pitch;
    let center = Vec2::new(
        config.screen_width * 0.5,
        top + config.button_size.y * 0.5,
    );
    Button {
        action,
        bounds: Aabb::new(center, config.button_size),
    }
}

/// Buttons shown in a phase
pub fn buttons(phase: GamePhase, config: &GameConfig) -> Vec<Button> {
    match phase {
        GamePhase::Start => vec![button(MenuAction::StartGame, 0, config)],
        GamePhase::Playing => Vec::new(),
        GamePhase::GameOver => vec![
            button(MenuAction::PlayAgain, 0, config),
            button(MenuAction::QuitGame, 1, config),
        ],
    }
}

/// Button under the pointer, if any
pub fn hovered(phase: GamePhase, pointer: Vec2, config: &GameConfig) -> Option<MenuAction> {
    buttons(phase, config)
        .into_iter()
        .find(|b| b.bounds.contains(pointer))
        .map(|b| b.action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = GameConfig::default();
        let start = buttons(GamePhase::Start, &config);
        assert_eq!(start.len(), 1);
        assert_eq!(start[0].bounds.min(), Vec2::new(300.0, 400.0));
        assert_eq!(start[0].bounds.max(), Vec2::new(500.0, 450.0));

        let over = buttons(GamePhase::GameOver, &config);
        assert_eq!(over[1].action, MenuAction::QuitGame);
        assert_eq!(over[1].bounds.min(), Vec2::new(300.0, 470.0));

        assert!(buttons(GamePhase::Playing, &config).is_empty());
    }

    #[test]
    fn test_layout_follows_config() {
        let config = GameConfig {
            screen_width: 1000.0,
            screen_height: 800.0,
            lane_width: 400.0,
            button_size: Vec2::new(240.0, 60.0),
            first_button_top: 500.0,
            button_pitch: 90.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));

        let over = buttons(GamePhase::GameOver, &config);
        assert_eq!(over[0].bounds.min(), Vec2::new(380.0, 500.0));
        assert_eq!(over[0].bounds.max(), Vec2::new(620.0, 560.0));
        assert_eq!(over[1].bounds.min(), Vec2::new(380.0, 590.0));
        // Same size and spacing on every row
        assert_eq!(over[1].bounds.half_extents, over[0].bounds.half_extents);
        assert!(over[0].bounds.max().y < over[1].bounds.min().y);
    }

    #[test]
    fn test_hover_by_phase() {
        let config = GameConfig::default();
        let on_first = Vec2::new(400.0, 425.0);
        let on_second = Vec2::new(400.0, 495.0);

        assert_eq!(
            hovered(GamePhase::Start, on_first, &config),
            Some(MenuAction::StartGame)
        );
        assert_eq!(hovered(GamePhase::Start, on_second, &config), None);
        assert_eq!(hovered(GamePhase::Playing, on_first, &config), None);
        assert_eq!(
            hovered(GamePhase::GameOver, on_first, &config),
            Some(MenuAction::PlayAgain)
        );
        assert_eq!(
            hovered(GamePhase::GameOver, on_second, &config),
            Some(MenuAction::QuitGame)
        );
    }
}
