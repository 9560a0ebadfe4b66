use glam::Vec2;

/// Most recent pointer (mouse or single touch) sample in surface-local
/// coordinates.
///
/// `velocity` is the difference between the last two samples and
/// restarts from zero after [`PointerState::clear`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub pos: Option<Vec2>,
    pub prev: Option<Vec2>,
    pub velocity: Vec2,
    pub active: bool,
}

impl PointerState {
    /// Records a new pointer sample and marks the pointer active.
    pub fn move_to(&mut self, pos: Vec2) {
        self.velocity = match self.pos {
            Some(last) => pos - last,
            None => Vec2::ZERO,
        };
        self.prev = self.pos;
        self.pos = Some(pos);
        self.active = true;
    }

    /// Pointer left the surface or the touch ended.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Position to use for forces and the halo, if the pointer is active.
    pub fn active_pos(&self) -> Option<Vec2> {
        if self.active { self.pos } else { None }
    }

    /// Converts client-space coordinates to surface-local ones, given the
    /// top-left corner of the surface's bounding box in client space.
    pub fn local_from_client(client: Vec2, surface_origin: Vec2) -> Vec2 {
        client - surface_origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_has_zero_velocity() {
        let mut p = PointerState::default();
        p.move_to(Vec2::new(5.0, 5.0));
        assert!(p.active);
        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(p.prev, None);
    }

    #[test]
    fn velocity_is_difference_of_last_two_samples() {
        let mut p = PointerState::default();
        p.move_to(Vec2::new(5.0, 5.0));
        p.move_to(Vec2::new(8.0, 1.0));
        assert_eq!(p.velocity, Vec2::new(3.0, -4.0));
        assert_eq!(p.prev, Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn clear_resets_everything_and_restarts_velocity() {
        let mut p = PointerState::default();
        p.move_to(Vec2::new(5.0, 5.0));
        p.move_to(Vec2::new(8.0, 1.0));
        p.clear();
        assert_eq!(p, PointerState::default());
        assert_eq!(p.active_pos(), None);

        p.move_to(Vec2::new(100.0, 100.0));
        assert_eq!(p.velocity, Vec2::ZERO);
    }

    #[test]
    fn local_from_client_subtracts_origin() {
        let local = PointerState::local_from_client(Vec2::new(120.0, 80.0), Vec2::new(20.0, 30.0));
        assert_eq!(local, Vec2::new(100.0, 50.0));
    }
}
