/// Which surface of the studio has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StudioState {
    #[default]
    Gallery,
    Editing,
}

impl StudioState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gallery => "gallery",
            Self::Editing => "editing",
        }
    }
}
