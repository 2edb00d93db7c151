#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Left, Dir::Right, Dir::Down, Dir::Up];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn reverse(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    pub fn bit(self) -> u8 {
        match self {
            Dir::Left => Moves::LEFT,
            Dir::Right => Moves::RIGHT,
            Dir::Down => Moves::DOWN,
            Dir::Up => Moves::UP,
        }
    }
}

/// Legal-move bitmask handed to entities every update.
///
/// The bit layout (LEFT, RIGHT, DOWN, UP from the low bit up) is part of the
/// entity contract and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Moves(pub u8);

impl Moves {
    pub const LEFT: u8 = 1 << 0;
    pub const RIGHT: u8 = 1 << 1;
    pub const DOWN: u8 = 1 << 2;
    pub const UP: u8 = 1 << 3;

    pub const NONE: Moves = Moves(0);

    pub fn allows(self, dir: Dir) -> bool {
        self.0 & dir.bit() != 0
    }

    pub fn with(self, dir: Dir) -> Moves {
        Moves(self.0 | dir.bit())
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Dir> {
        Dir::ALL.into_iter().filter(move |dir| self.allows(*dir))
    }
}
