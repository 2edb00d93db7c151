//! Tile alphabet of the maze and the wall membership tables.
//!
//! Level files store every cell as a single byte in the IBM code page 437
//! box-drawing range: double lines for the outer border, single lines for the
//! inner blocks.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallPiece {
    InnerHorizontal,
    InnerVertical,
    InnerTopLeft,
    InnerTopRight,
    InnerBottomLeft,
    InnerBottomRight,
    OuterHorizontal,
    OuterVertical,
    OuterTopLeft,
    OuterTopRight,
    OuterBottomLeft,
    OuterBottomRight,
}

// Ordered by how often they show up in a typical maze.
const INNER_WALLS: [WallPiece; 6] = [
    WallPiece::InnerHorizontal,
    WallPiece::InnerVertical,
    WallPiece::InnerTopLeft,
    WallPiece::InnerTopRight,
    WallPiece::InnerBottomLeft,
    WallPiece::InnerBottomRight,
];

const OUTER_WALLS: [WallPiece; 6] = [
    WallPiece::OuterHorizontal,
    WallPiece::OuterVertical,
    WallPiece::OuterTopLeft,
    WallPiece::OuterTopRight,
    WallPiece::OuterBottomLeft,
    WallPiece::OuterBottomRight,
];

const ALL_WALLS: [WallPiece; 12] = [
    WallPiece::InnerHorizontal,
    WallPiece::InnerVertical,
    WallPiece::InnerTopLeft,
    WallPiece::InnerTopRight,
    WallPiece::InnerBottomLeft,
    WallPiece::InnerBottomRight,
    WallPiece::OuterHorizontal,
    WallPiece::OuterVertical,
    WallPiece::OuterTopLeft,
    WallPiece::OuterTopRight,
    WallPiece::OuterBottomLeft,
    WallPiece::OuterBottomRight,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallGroup {
    Inner,
    Outer,
    Both,
}

impl WallGroup {
    pub fn members(self) -> &'static [WallPiece] {
        match self {
            WallGroup::Inner => &INNER_WALLS,
            WallGroup::Outer => &OUTER_WALLS,
            WallGroup::Both => &ALL_WALLS,
        }
    }

    pub fn contains(self, piece: WallPiece) -> bool {
        self.members().contains(&piece)
    }
}

impl WallPiece {
    fn code(self) -> u8 {
        match self {
            WallPiece::InnerHorizontal => 0xC4,
            WallPiece::InnerVertical => 0xB3,
            WallPiece::InnerTopLeft => 0xDA,
            WallPiece::InnerTopRight => 0xBF,
            WallPiece::InnerBottomLeft => 0xC0,
            WallPiece::InnerBottomRight => 0xD9,
            WallPiece::OuterHorizontal => 0xCD,
            WallPiece::OuterVertical => 0xBA,
            WallPiece::OuterTopLeft => 0xC9,
            WallPiece::OuterTopRight => 0xBB,
            WallPiece::OuterBottomLeft => 0xC8,
            WallPiece::OuterBottomRight => 0xBC,
        }
    }

    fn glyph(self) -> char {
        match self {
            WallPiece::InnerHorizontal => '─',
            WallPiece::InnerVertical => '│',
            WallPiece::InnerTopLeft => '┌',
            WallPiece::InnerTopRight => '┐',
            WallPiece::InnerBottomLeft => '└',
            WallPiece::InnerBottomRight => '┘',
            WallPiece::OuterHorizontal => '═',
            WallPiece::OuterVertical => '║',
            WallPiece::OuterTopLeft => '╔',
            WallPiece::OuterTopRight => '╗',
            WallPiece::OuterBottomLeft => '╚',
            WallPiece::OuterBottomRight => '╝',
        }
    }

    /// What continues to the right of the piece when a cell is two columns
    /// wide: a line for pieces that join their right neighbour, else blank.
    pub fn fill(self) -> char {
        match self {
            WallPiece::InnerHorizontal | WallPiece::InnerTopLeft | WallPiece::InnerBottomLeft => '─',
            WallPiece::OuterHorizontal | WallPiece::OuterTopLeft | WallPiece::OuterBottomLeft => '═',
            _ => ' ',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Empty,
    Pellet,
    Power,
    /// Solid padding outside the playfield; drawn as a styled blank.
    Filler,
    Wall(WallPiece),
}

pub const EMPTY_CODE: u8 = 0x20;
pub const PELLET_CODE: u8 = 0xFA;
pub const POWER_CODE: u8 = 0xFE;
pub const FILLER_CODE: u8 = 0xDB;

impl Tile {
    pub fn from_code(code: u8) -> Option<Tile> {
        match code {
            EMPTY_CODE => Some(Tile::Empty),
            PELLET_CODE => Some(Tile::Pellet),
            POWER_CODE => Some(Tile::Power),
            FILLER_CODE => Some(Tile::Filler),
            _ => ALL_WALLS
                .iter()
                .copied()
                .find(|piece| piece.code() == code)
                .map(Tile::Wall),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Tile::Empty => EMPTY_CODE,
            Tile::Pellet => PELLET_CODE,
            Tile::Power => POWER_CODE,
            Tile::Filler => FILLER_CODE,
            Tile::Wall(piece) => piece.code(),
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Tile::Empty | Tile::Filler => ' ',
            Tile::Pellet => '·',
            Tile::Power => '●',
            Tile::Wall(piece) => piece.glyph(),
        }
    }

    pub fn is_pellet(self) -> bool {
        matches!(self, Tile::Pellet | Tile::Power)
    }

    /// Tiles an entity may stand on.
    pub fn is_open(self) -> bool {
        matches!(self, Tile::Empty | Tile::Pellet | Tile::Power)
    }

    pub fn is_wall_in(self, group: WallGroup) -> bool {
        match self {
            Tile::Wall(piece) => group.contains(piece),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_and_outer_groups_are_disjoint() {
        for piece in WallGroup::Inner.members() {
            assert!(!WallGroup::Outer.contains(*piece));
        }
        for piece in WallGroup::Outer.members() {
            assert!(!WallGroup::Inner.contains(*piece));
        }
    }

    #[test]
    fn both_is_the_union_of_inner_and_outer() {
        let both = WallGroup::Both.members();
        assert_eq!(both.len(), 12);
        for piece in both {
            assert!(WallGroup::Inner.contains(*piece) ^ WallGroup::Outer.contains(*piece));
        }
    }

    #[test]
    fn every_code_maps_back_to_its_tile() {
        let mut tiles = vec![Tile::Empty, Tile::Pellet, Tile::Power, Tile::Filler];
        tiles.extend(ALL_WALLS.iter().copied().map(Tile::Wall));
        for tile in tiles {
            assert_eq!(Tile::from_code(tile.code()), Some(tile));
        }
        assert_eq!(Tile::from_code(0x41), None);
    }

    #[test]
    fn only_walls_belong_to_wall_groups() {
        for tile in [Tile::Empty, Tile::Pellet, Tile::Power, Tile::Filler] {
            assert!(!tile.is_wall_in(WallGroup::Both));
        }
        let corner = Tile::Wall(WallPiece::OuterTopLeft);
        assert!(corner.is_wall_in(WallGroup::Outer));
        assert!(corner.is_wall_in(WallGroup::Both));
        assert!(!corner.is_wall_in(WallGroup::Inner));
    }

    #[test]
    fn open_tiles_are_empty_or_pellets() {
        assert!(Tile::Empty.is_open());
        assert!(Tile::Pellet.is_open());
        assert!(Tile::Power.is_open());
        assert!(!Tile::Filler.is_open());
        assert!(!Tile::Wall(WallPiece::InnerVertical).is_open());
    }
}
