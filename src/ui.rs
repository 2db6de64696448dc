//! HUD text and overlay state
//!
//! Pure formatting of what the page shows around the canvas. The wasm entry
//! point copies a `HudView` into the DOM, writing only fields that changed.

use crate::sim::{GamePhase, GameState, WeaponState};

/// Which full-screen overlay is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Title screen with the start button
    Menu,
    Paused,
    /// Final score and restart button
    GameOver,
    None,
}

impl Overlay {
    pub fn for_phase(phase: GamePhase) -> Self {
        match phase {
            GamePhase::Menu => Overlay::Menu,
            GamePhase::Paused => Overlay::Paused,
            GamePhase::GameOver => Overlay::GameOver,
            GamePhase::Playing => Overlay::None,
        }
    }
}

/// Everything the HUD displays for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    pub score: String,
    pub lives: String,
    pub weapon: String,
    pub overlay: Overlay,
    /// Final score text, set only on game over
    pub final_score: Option<String>,
}

impl HudView {
    pub fn from_state(state: &GameState) -> Self {
        let overlay = Overlay::for_phase(state.phase);
        Self {
            score: state.score.to_string(),
            lives: state.player.lives.to_string(),
            weapon: weapon_label(&state.weapon),
            overlay,
            final_score: (overlay == Overlay::GameOver).then(|| state.score.to_string()),
        }
    }
}

/// Weapon name, with whole seconds left (rounded up) for timed weapons
pub fn weapon_label(weapon: &WeaponState) -> String {
    if weapon.is_timed() {
        format!("{} ({}s)", weapon.kind.name(), weapon.remaining_secs())
    } else {
        weapon.kind.name().to_string()
    }
}

/// Label for the mute toggle
pub fn mute_label(muted: bool) -> &'static str {
    if muted { "Unmute" } else { "Mute" }
}

/// Whether the pause and resume buttons act in this phase
pub fn can_toggle_pause(phase: GamePhase) -> bool {
    matches!(phase, GamePhase::Playing | GamePhase::Paused)
}

/// Label for the pause toggle
pub fn pause_label(phase: GamePhase) -> &'static str {
    if phase == GamePhase::Paused {
        "Resume"
    } else {
        "Pause"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::WEAPON_DURATION_MS;
    use crate::sim::WeaponKind;

    #[test]
    fn test_untimed_weapon_has_plain_name() {
        assert_eq!(weapon_label(&WeaponState::default()), "Normal");
    }

    #[test]
    fn test_timed_weapon_rounds_seconds_up() {
        let mut weapon = WeaponState::default();
        weapon.equip(WeaponKind::Laser, WEAPON_DURATION_MS);
        assert_eq!(weapon_label(&weapon), "Laser (10s)");

        weapon.tick();
        assert_eq!(weapon_label(&weapon), "Laser (10s)");

        // 60 steps = 1000 ms left
        weapon.remaining_ticks = 60;
        assert_eq!(weapon_label(&weapon), "Laser (1s)");
        weapon.remaining_ticks = 1;
        assert_eq!(weapon_label(&weapon), "Laser (1s)");
    }

    #[test]
    fn test_whole_second_marks_are_exact() {
        let mut weapon = WeaponState::default();
        weapon.equip(WeaponKind::Plasma, WEAPON_DURATION_MS);
        for ticks in [60, 120, 180, 300, 540, 600] {
            weapon.remaining_ticks = ticks;
            assert_eq!(weapon_label(&weapon), format!("Plasma ({}s)", ticks / 60));
            weapon.remaining_ticks = ticks + 1;
            assert_eq!(weapon_label(&weapon), format!("Plasma ({}s)", ticks / 60 + 1));
        }
    }

    #[test]
    fn test_hud_tracks_phase() {
        let mut state = GameState::new(3, 480.0, 720.0);
        let hud = HudView::from_state(&state);
        assert_eq!(hud.overlay, Overlay::Menu);
        assert_eq!(hud.lives, "3");
        assert_eq!(hud.final_score, None);

        state.start();
        state.score = 120;
        assert_eq!(HudView::from_state(&state).overlay, Overlay::None);

        state.phase = GamePhase::GameOver;
        let hud = HudView::from_state(&state);
        assert_eq!(hud.overlay, Overlay::GameOver);
        assert_eq!(hud.score, "120");
        assert_eq!(hud.final_score.as_deref(), Some("120"));
    }

    #[test]
    fn test_toggle_labels() {
        assert_eq!(mute_label(true), "Unmute");
        assert_eq!(pause_label(GamePhase::Paused), "Resume");
        assert_eq!(pause_label(GamePhase::Playing), "Pause");
    }

    #[test]
    fn test_pause_toggle_only_mid_run() {
        assert!(can_toggle_pause(GamePhase::Playing));
        assert!(can_toggle_pause(GamePhase::Paused));
        assert!(!can_toggle_pause(GamePhase::Menu));
        assert!(!can_toggle_pause(GamePhase::GameOver));
    }
}
