//! Section-exit confirmation state

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    Left,
    Right,
    #[default]
    None,
}

/// A category offered as a hand-off target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborCategory {
    pub index: usize,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionExitState {
    pub is_visible: bool,
    pub current_category_index: usize,
    pub current_category_title: String,
    pub left_category: Option<NeighborCategory>,
    pub right_category: Option<NeighborCategory>,
    pub selected_side: Side,
}

impl SectionExitState {
    /// Neighbour on `side`, if any
    pub fn neighbor(&self, side: Side) -> Option<&NeighborCategory> {
        match side {
            Side::Left => self.left_category.as_ref(),
            Side::Right => self.right_category.as_ref(),
            Side::None => None,
        }
    }
}
