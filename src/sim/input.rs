//! Input aggregation
//!
//! Keyboard and on-screen joystick state, merged into one normalized
//! direction per frame. Device glue only records key/pointer changes here;
//! the simulation only ever sees the merged vector.

use glam::Vec2;

/// Movement keys, tracked individually so releasing `d` while `ArrowRight`
/// is still held keeps moving right
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
}

impl MoveKey {
    /// Map a DOM `KeyboardEvent.key` value (any case)
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "arrowup" => Some(MoveKey::ArrowUp),
            "arrowdown" => Some(MoveKey::ArrowDown),
            "arrowleft" => Some(MoveKey::ArrowLeft),
            "arrowright" => Some(MoveKey::ArrowRight),
            "w" => Some(MoveKey::W),
            "a" => Some(MoveKey::A),
            "s" => Some(MoveKey::S),
            "d" => Some(MoveKey::D),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of currently held movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    bits: u8,
}

impl HeldKeys {
    pub fn press(&mut self, key: MoveKey) {
        self.bits |= key.bit();
    }

    pub fn release(&mut self, key: MoveKey) {
        self.bits &= !key.bit();
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn is_held(&self, key: MoveKey) -> bool {
        self.bits & key.bit() != 0
    }

    fn any(&self, a: MoveKey, b: MoveKey) -> bool {
        self.is_held(a) || self.is_held(b)
    }

    /// Keyboard axes, each component -1, 0 or +1 (y grows downward)
    pub fn axes(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(
            axis(
                self.any(MoveKey::ArrowLeft, MoveKey::A),
                self.any(MoveKey::ArrowRight, MoveKey::D),
            ),
            axis(
                self.any(MoveKey::ArrowUp, MoveKey::W),
                self.any(MoveKey::ArrowDown, MoveKey::S),
            ),
        )
    }
}

/// Gap between the stick's travel limit and the pad rim (px)
pub const JOYSTICK_RIM: f32 = 10.0;

/// On-screen analog stick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Joystick {
    active: bool,
    /// Stick offset from the pad centre, clamped to the travel limit (px)
    offset: Vec2,
    /// Normalized stick vector, magnitude <= 1
    vector: Vec2,
}

impl Joystick {
    /// Pointer went down on the pad
    pub fn begin(&mut self, offset: Vec2, pad_radius: f32) {
        self.active = true;
        self.move_to(offset, pad_radius);
    }

    /// Pointer moved; ignored unless the stick is held
    pub fn move_to(&mut self, offset: Vec2, pad_radius: f32) {
        if !self.active {
            return;
        }
        let max = (pad_radius - JOYSTICK_RIM).max(1.0);
        let mag = match offset.length() {
            m if m > 0.0 => m,
            _ => 1.0,
        };
        self.offset = offset / mag * mag.min(max);
        self.vector = self.offset / max;
    }

    /// Pointer released anywhere
    pub fn end(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Visual stick displacement for the DOM knob
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn vector(&self) -> Vec2 {
        self.vector
    }
}

/// Merge keyboard and joystick into a unit direction, or zero
pub fn aggregate(keys: &HeldKeys, joystick: Vec2) -> Vec2 {
    normalize_direction(keys.axes() + joystick)
}

/// Scale to unit length; zero stays zero
pub fn normalize_direction(v: Vec2) -> Vec2 {
    let mag = match v.length() {
        m if m > 0.0 && m.is_finite() => m,
        _ => 1.0,
    };
    let n = v / mag;
    if n.is_finite() { n } else { Vec2::ZERO }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping_is_case_insensitive() {
        assert_eq!(MoveKey::from_key("ArrowUp"), Some(MoveKey::ArrowUp));
        assert_eq!(MoveKey::from_key("W"), Some(MoveKey::W));
        assert_eq!(MoveKey::from_key("d"), Some(MoveKey::D));
        assert_eq!(MoveKey::from_key(" "), None);
        assert_eq!(MoveKey::from_key("p"), None);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut keys = HeldKeys::default();
        keys.press(MoveKey::A);
        keys.press(MoveKey::ArrowRight);
        assert_eq!(keys.axes(), Vec2::ZERO);
    }

    #[test]
    fn test_releasing_one_of_two_keys_keeps_direction() {
        let mut keys = HeldKeys::default();
        keys.press(MoveKey::D);
        keys.press(MoveKey::ArrowRight);
        keys.release(MoveKey::D);
        assert_eq!(keys.axes(), Vec2::new(1.0, 0.0));
        keys.release(MoveKey::ArrowRight);
        assert_eq!(keys.axes(), Vec2::ZERO);
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let mut keys = HeldKeys::default();
        keys.press(MoveKey::W);
        keys.press(MoveKey::D);
        let dir = aggregate(&keys, Vec2::ZERO);
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.x > 0.0 && dir.y < 0.0);
    }

    #[test]
    fn test_no_input_stays_zero() {
        assert_eq!(aggregate(&HeldKeys::default(), Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_keyboard_and_joystick_combine() {
        let mut keys = HeldKeys::default();
        keys.press(MoveKey::ArrowRight);
        let dir = aggregate(&keys, Vec2::new(0.0, 1.0));
        let expected = Vec2::new(1.0, 1.0).normalize();
        assert!((dir - expected).length() < 1e-6);
    }

    #[test]
    fn test_joystick_clamps_to_travel() {
        let mut stick = Joystick::default();
        // Pad radius 60 -> 50 px of travel
        stick.begin(Vec2::new(100.0, 0.0), 60.0);
        assert_eq!(stick.offset(), Vec2::new(50.0, 0.0));
        assert_eq!(stick.vector(), Vec2::new(1.0, 0.0));

        stick.move_to(Vec2::new(0.0, -25.0), 60.0);
        assert_eq!(stick.vector(), Vec2::new(0.0, -0.5));

        stick.end();
        assert!(!stick.is_active());
        assert_eq!(stick.vector(), Vec2::ZERO);
    }

    #[test]
    fn test_joystick_ignores_moves_when_released() {
        let mut stick = Joystick::default();
        stick.move_to(Vec2::new(30.0, 0.0), 60.0);
        assert_eq!(stick.vector(), Vec2::ZERO);
    }

    #[test]
    fn test_joystick_centre_is_zero() {
        let mut stick = Joystick::default();
        stick.begin(Vec2::ZERO, 60.0);
        assert_eq!(stick.vector(), Vec2::ZERO);
    }
}
